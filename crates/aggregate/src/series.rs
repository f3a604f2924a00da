//! Growing per-variable series with interval averages and slopes.

use crate::error::AggregateError;
use crate::window::{WindowConfig, interval_mean, window_slope};

/// Values of one variable at one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepValues {
    /// Global mean read at this step.
    pub raw: f64,
    /// Short-window interval average.
    pub short_mean: f64,
    /// Long-window interval average.
    pub long_mean: f64,
    /// Annualized short-window slope.
    pub short_slope: f64,
    /// Annualized long-window slope.
    pub long_slope: f64,
}

/// Append-only series of one tracked variable.
///
/// All five sequences always have the same length, one entry per ingested
/// step.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSeries {
    windows: WindowConfig,
    raw: Vec<f64>,
    short_mean: Vec<f64>,
    long_mean: Vec<f64>,
    short_slope: Vec<f64>,
    long_slope: Vec<f64>,
}

impl VariableSeries {
    /// Creates an empty series using `windows`.
    pub fn new(windows: WindowConfig) -> Self {
        Self {
            windows,
            raw: Vec::new(),
            short_mean: Vec::new(),
            long_mean: Vec::new(),
            short_slope: Vec::new(),
            long_slope: Vec::new(),
        }
    }

    /// Records `value` at step `index` and recomputes derived values.
    ///
    /// `index` may be the next unwritten step or an already written one. An
    /// overwrite recomputes every later step, so re-ingesting an unchanged
    /// value leaves the series identical.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::IndexGap`] if `index > len()`; the series is
    /// left untouched.
    pub fn ingest(&mut self, index: usize, value: f64) -> Result<StepValues, AggregateError> {
        let len = self.raw.len();
        if index > len {
            return Err(AggregateError::IndexGap { index, len });
        }
        if index == len {
            self.raw.push(value);
        } else {
            self.raw[index] = value;
        }
        self.short_mean.truncate(index);
        self.long_mean.truncate(index);
        self.short_slope.truncate(index);
        self.long_slope.truncate(index);
        for i in index..self.raw.len() {
            self.extend_derived(i);
        }
        Ok(self.values_at(index))
    }

    fn extend_derived(&mut self, i: usize) {
        let short = self.windows.short();
        let long = self.windows.long();
        self.short_mean.push(interval_mean(&self.raw, i, short.months()));
        self.long_mean.push(interval_mean(&self.raw, i, long.months()));
        self.short_slope.push(window_slope(&self.short_mean, i, short));
        self.long_slope.push(window_slope(&self.long_mean, i, long));
    }

    fn values_at(&self, i: usize) -> StepValues {
        StepValues {
            raw: self.raw[i],
            short_mean: self.short_mean[i],
            long_mean: self.long_mean[i],
            short_slope: self.short_slope[i],
            long_slope: self.long_slope[i],
        }
    }

    /// Values at step `i`, if written.
    pub fn at(&self, i: usize) -> Option<StepValues> {
        (i < self.raw.len()).then(|| self.values_at(i))
    }

    /// Values at the last written step.
    pub fn latest(&self) -> Option<StepValues> {
        self.raw.len().checked_sub(1).map(|i| self.values_at(i))
    }

    /// Number of ingested steps.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if nothing has been ingested.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Raw global means.
    pub fn raw(&self) -> &[f64] {
        &self.raw
    }

    /// Short-window interval averages.
    pub fn short_mean(&self) -> &[f64] {
        &self.short_mean
    }

    /// Long-window interval averages.
    pub fn long_mean(&self) -> &[f64] {
        &self.long_mean
    }

    /// Short-window slopes.
    pub fn short_slope(&self) -> &[f64] {
        &self.short_slope
    }

    /// Long-window slopes.
    pub fn long_slope(&self) -> &[f64] {
        &self.long_slope
    }

    /// Window configuration in use.
    pub fn windows(&self) -> WindowConfig {
        self.windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowSpec;
    use approx::assert_relative_eq;

    fn small_windows() -> WindowConfig {
        WindowConfig::default()
            .with_short(WindowSpec::new(2, 1.0).unwrap())
            .with_long(WindowSpec::new(4, 2.0).unwrap())
    }

    #[test]
    fn first_step_is_flat() {
        let mut s = VariableSeries::new(WindowConfig::default());
        let v = s.ingest(0, 287.5).unwrap();
        assert_relative_eq!(v.raw, 287.5);
        assert_relative_eq!(v.short_mean, 287.5);
        assert_relative_eq!(v.long_mean, 287.5);
        assert_eq!(v.short_slope, 0.0);
        assert_eq!(v.long_slope, 0.0);
    }

    #[test]
    fn gap_rejected_without_mutation() {
        let mut s = VariableSeries::new(WindowConfig::default());
        s.ingest(0, 1.0).unwrap();
        let before = s.clone();
        let err = s.ingest(2, 3.0).unwrap_err();
        assert_eq!(err, AggregateError::IndexGap { index: 2, len: 1 });
        assert_eq!(s, before);
    }

    #[test]
    fn small_window_values() {
        let mut s = VariableSeries::new(small_windows());
        for (i, v) in [1.0, 3.0, 5.0, 7.0].into_iter().enumerate() {
            s.ingest(i, v).unwrap();
        }
        // short window 2: [1], [1,3], [1,3], [3,5]
        assert_eq!(s.short_mean(), &[1.0, 2.0, 2.0, 4.0]);
        // short slopes: ref 0, 0, 0, 1
        assert_eq!(s.short_slope(), &[0.0, 1.0, 1.0, 2.0]);
        // long window 4 still growing
        assert_eq!(s.long_mean(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.long_slope(), &[0.0, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn overwrite_recomputes_tail() {
        let mut a = VariableSeries::new(small_windows());
        let mut b = VariableSeries::new(small_windows());
        for (i, v) in [1.0, 2.0, 3.0, 4.0, 5.0].into_iter().enumerate() {
            a.ingest(i, v).unwrap();
            b.ingest(i, if i == 1 { 10.0 } else { v }).unwrap();
        }
        b.ingest(1, 2.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn reingest_is_idempotent() {
        let mut s = VariableSeries::new(small_windows());
        for (i, v) in [4.0, 1.0, 8.0].into_iter().enumerate() {
            s.ingest(i, v).unwrap();
        }
        let before = s.clone();
        let v = s.ingest(2, 8.0).unwrap();
        assert_eq!(s, before);
        assert_eq!(Some(v), s.latest());
    }

    #[test]
    fn accessors() {
        let mut s = VariableSeries::new(small_windows());
        assert!(s.is_empty());
        assert!(s.latest().is_none());
        s.ingest(0, 1.0).unwrap();
        assert_eq!(s.len(), 1);
        assert!(s.at(1).is_none());
        assert_eq!(s.raw(), &[1.0]);
    }
}
