//! Averaging windows and the interval-mean and slope rules.

use crate::error::AggregateError;

/// A trailing averaging window: its length in steps (months) and the span
/// in years used to annualize slopes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSpec {
    months: usize,
    years: f64,
}

impl WindowSpec {
    /// Creates a window of `months` steps spanning `years` years.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::InvalidWindow`] if `months` is zero or
    /// `years` is not finite and positive.
    pub fn new(months: usize, years: f64) -> Result<Self, AggregateError> {
        let spec = Self { months, years };
        spec.validate()?;
        Ok(spec)
    }

    /// One-year window: 12 months.
    pub fn annual() -> Self {
        Self {
            months: 12,
            years: 1.0,
        }
    }

    /// Ten-year window: 120 months.
    pub fn decadal() -> Self {
        Self {
            months: 120,
            years: 10.0,
        }
    }

    /// Window length in steps.
    pub fn months(&self) -> usize {
        self.months
    }

    /// Window length in years (the slope divisor).
    pub fn years(&self) -> f64 {
        self.years
    }

    /// Validates this window.
    pub fn validate(&self) -> Result<(), AggregateError> {
        if self.months == 0 || !self.years.is_finite() || self.years <= 0.0 {
            return Err(AggregateError::InvalidWindow {
                months: self.months,
                years: self.years,
            });
        }
        Ok(())
    }
}

/// The short and long windows applied to every tracked variable.
///
/// # Example
///
/// ```
/// use drift_aggregate::{WindowConfig, WindowSpec};
///
/// let windows = WindowConfig::default()
///     .with_long(WindowSpec::new(60, 5.0).unwrap());
///
/// assert_eq!(windows.short().months(), 12);
/// assert_eq!(windows.long().months(), 60);
/// assert!(windows.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowConfig {
    short: WindowSpec,
    long: WindowSpec,
}

impl WindowConfig {
    /// Sets the short window.
    pub fn with_short(mut self, short: WindowSpec) -> Self {
        self.short = short;
        self
    }

    /// Sets the long window.
    pub fn with_long(mut self, long: WindowSpec) -> Self {
        self.long = long;
        self
    }

    /// Returns the short window.
    pub fn short(&self) -> WindowSpec {
        self.short
    }

    /// Returns the long window.
    pub fn long(&self) -> WindowSpec {
        self.long
    }

    /// Validates both windows.
    pub fn validate(&self) -> Result<(), AggregateError> {
        self.short.validate()?;
        self.long.validate()
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            short: WindowSpec::annual(),
            long: WindowSpec::decadal(),
        }
    }
}

/// Interval average at step `i` over a window of `window` steps.
///
/// While `i < window` this is the growing mean of `raw[0..=i]`; afterwards
/// it is the mean of the `window` samples preceding `i`, i.e.
/// `raw[i - window..i]`, which excludes `raw[i]`.
///
/// `raw` must hold at least `i + 1` samples.
pub fn interval_mean(raw: &[f64], i: usize, window: usize) -> f64 {
    let slice = if i < window {
        &raw[..=i]
    } else {
        &raw[i - window..i]
    };
    slice.iter().sum::<f64>() / slice.len() as f64
}

/// Annualized slope of an interval-average series at step `i`.
///
/// Compares `avg[i]` with the reference `avg[0]` while `i < window` and with
/// `avg[i - window]` afterwards, dividing by the window span in years.
pub fn window_slope(avg: &[f64], i: usize, spec: WindowSpec) -> f64 {
    let reference = if i < spec.months { 0 } else { i - spec.months };
    (avg[i] - avg[reference]) / spec.years
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults() {
        let cfg = WindowConfig::default();
        assert_eq!(cfg.short(), WindowSpec::annual());
        assert_eq!(cfg.long(), WindowSpec::decadal());
        assert_eq!(cfg.long().months(), 120);
        assert_relative_eq!(cfg.long().years(), 10.0);
    }

    #[test]
    fn invalid_windows() {
        assert!(WindowSpec::new(0, 1.0).is_err());
        assert!(WindowSpec::new(12, 0.0).is_err());
        assert!(WindowSpec::new(12, f64::NAN).is_err());
        assert!(WindowSpec::new(12, -1.0).is_err());
        assert!(WindowSpec::new(1, 0.25).is_ok());
    }

    #[test]
    fn interval_mean_growing_then_trailing() {
        let raw = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(interval_mean(&raw, 0, 3), 1.0);
        assert_relative_eq!(interval_mean(&raw, 2, 3), 2.0);
        // Full window: the three samples before index 3.
        assert_relative_eq!(interval_mean(&raw, 3, 3), 2.0);
        assert_relative_eq!(interval_mean(&raw, 4, 3), 3.0);
    }

    #[test]
    fn slope_reference_switches_at_window() {
        let avg = [0.0, 1.0, 2.0, 3.0, 4.0];
        let spec = WindowSpec::new(2, 0.5).unwrap();
        assert_relative_eq!(window_slope(&avg, 0, spec), 0.0);
        assert_relative_eq!(window_slope(&avg, 1, spec), 2.0);
        assert_relative_eq!(window_slope(&avg, 2, spec), 4.0);
        assert_relative_eq!(window_slope(&avg, 4, spec), 4.0);
    }

    #[test]
    fn nan_propagates() {
        let raw = [1.0, f64::NAN, 3.0];
        assert!(interval_mean(&raw, 2, 12).is_nan());
    }
}
