//! Per-component series aggregation.

use tracing::warn;

use crate::energy::{EnergyBalance, EnergyBalanceCalculator};
use crate::error::AggregateError;
use crate::series::{StepValues, VariableSeries};
use crate::variables::{Component, DerivedQuantity, DerivedSlot, SlotKind, VariableSet};
use crate::window::WindowConfig;

/// Owns the series of every tracked variable of one component.
///
/// Raw slots are ingested from spatial means; derived slots are computed
/// from the same step's raw means and ingested alongside.
#[derive(Debug, Clone)]
pub struct SeriesAggregator {
    set: VariableSet,
    raw_count: usize,
    /// Slot index of each tracked series.
    slots: Vec<usize>,
    series: Vec<VariableSeries>,
    energy: Option<EnergyBalanceCalculator>,
}

impl SeriesAggregator {
    /// Creates an empty aggregator for `set`.
    ///
    /// If the set requests the energy balance but lacks flux variables, the
    /// problem is logged and both balance slots hold NaN at every step.
    pub fn new(set: VariableSet, windows: WindowConfig) -> Self {
        let energy = if set.requests(DerivedQuantity::Energy) {
            match EnergyBalanceCalculator::from_variable_set(&set) {
                Ok(calc) => Some(calc),
                Err(e) => {
                    warn!(component = %set.component(), error = %e, "energy balance unavailable");
                    None
                }
            }
        } else {
            None
        };
        let slots: Vec<usize> = (0..set.len())
            .filter(|&i| set.kind(i) != Some(SlotKind::Coordinate))
            .collect();
        let raw_count = set.raw_names().count();
        let series = slots.iter().map(|_| VariableSeries::new(windows)).collect();
        Self {
            set,
            raw_count,
            slots,
            series,
            energy,
        }
    }

    /// The component aggregated.
    pub fn component(&self) -> Component {
        self.set.component()
    }

    /// The variable set.
    pub fn variable_set(&self) -> &VariableSet {
        &self.set
    }

    /// Number of raw means expected per step.
    pub fn raw_count(&self) -> usize {
        self.raw_count
    }

    /// Number of ingested steps.
    pub fn len(&self) -> usize {
        self.series.first().map_or(0, VariableSeries::len)
    }

    /// Returns `true` if no step has been ingested.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ingests step `index` from `raw_means`, one value per raw slot in
    /// read-list order.
    ///
    /// Returns the step values of every tracked slot, raw then derived.
    ///
    /// # Errors
    ///
    /// - [`AggregateError::WidthMismatch`] if `raw_means` has the wrong length.
    /// - [`AggregateError::IndexGap`] if `index` is past the next free step.
    ///
    /// Both are detected before any series changes.
    pub fn ingest(
        &mut self,
        index: usize,
        raw_means: &[f64],
    ) -> Result<Vec<StepValues>, AggregateError> {
        if raw_means.len() != self.raw_count {
            return Err(AggregateError::WidthMismatch {
                component: self.component(),
                expected: self.raw_count,
                actual: raw_means.len(),
            });
        }
        let len = self.len();
        if index > len {
            return Err(AggregateError::IndexGap { index, len });
        }

        let balance = self
            .energy
            .as_ref()
            .map_or(EnergyBalance::MISSING, |calc| calc.compute(raw_means));

        let mut out = Vec::with_capacity(self.series.len());
        let mut raw = raw_means.iter();
        for (series, &slot) in self.series.iter_mut().zip(&self.slots) {
            let value = match self.set.kind(slot) {
                Some(SlotKind::Derived(DerivedSlot::ToaBalance)) => balance.toa,
                Some(SlotKind::Derived(DerivedSlot::SurfaceBalance)) => balance.surface,
                _ => raw.next().copied().unwrap_or(f64::NAN),
            };
            out.push(series.ingest(index, value)?);
        }
        Ok(out)
    }

    /// Series of the tracked variable `name`.
    pub fn series(&self, name: &str) -> Option<&VariableSeries> {
        let slot = self.set.index_of(name)?;
        let pos = self.slots.iter().position(|&s| s == slot)?;
        self.series.get(pos)
    }

    /// Tracked variables and their series, raw then derived.
    pub fn tracked(&self) -> impl Iterator<Item = (&str, &VariableSeries)> {
        self.slots
            .iter()
            .map(|&slot| self.set.names()[slot].as_str())
            .zip(&self.series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn energy_set() -> VariableSet {
        VariableSet::new(
            Component::Atmosphere,
            &["TS", "FSNT", "FLNT", "FSNS", "FLNS", "LHFLX", "SHFLX"],
            &[DerivedQuantity::Energy],
        )
        .unwrap()
    }

    #[test]
    fn ingest_fills_derived_slots() {
        let mut agg = SeriesAggregator::new(energy_set(), WindowConfig::default());
        let out = agg
            .ingest(0, &[288.0, 300.0, 240.0, 150.0, 50.0, 70.0, 20.0])
            .unwrap();
        assert_eq!(out.len(), 9);
        assert_relative_eq!(out[0].raw, 288.0);
        assert_relative_eq!(out[7].raw, 60.0);
        assert_relative_eq!(out[8].raw, 10.0);
        assert_relative_eq!(agg.series("toa_balance").unwrap().raw()[0], 60.0);
        assert_relative_eq!(agg.series("surface_balance").unwrap().long_mean()[0], 10.0);
    }

    #[test]
    fn missing_flux_gives_nan_slots() {
        let set =
            VariableSet::new(Component::Atmosphere, &["TS", "FSNT"], &[DerivedQuantity::Energy])
                .unwrap();
        let mut agg = SeriesAggregator::new(set, WindowConfig::default());
        let out = agg.ingest(0, &[288.0, 300.0]).unwrap();
        assert_relative_eq!(out[0].raw, 288.0);
        assert!(out[2].raw.is_nan());
        assert!(out[3].raw.is_nan());
    }

    #[test]
    fn width_mismatch_leaves_state() {
        let mut agg = SeriesAggregator::new(energy_set(), WindowConfig::default());
        let err = agg.ingest(0, &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            AggregateError::WidthMismatch {
                component: Component::Atmosphere,
                expected: 7,
                actual: 2,
            }
        );
        assert!(agg.is_empty());
    }

    #[test]
    fn gap_rejected_before_any_series_changes() {
        let set = VariableSet::new(Component::Land, &["TSA", "FSH"], &[]).unwrap();
        let mut agg = SeriesAggregator::new(set, WindowConfig::default());
        agg.ingest(0, &[280.0, 5.0]).unwrap();
        assert!(matches!(
            agg.ingest(2, &[281.0, 6.0]),
            Err(AggregateError::IndexGap { index: 2, len: 1 })
        ));
        assert!(agg.tracked().all(|(_, s)| s.len() == 1));
    }

    #[test]
    fn coordinates_are_not_tracked() {
        let agg = SeriesAggregator::new(energy_set(), WindowConfig::default());
        assert!(agg.series("lat").is_none());
        assert!(agg.series("missing").is_none());
        let names: Vec<&str> = agg.tracked().map(|(n, _)| n).collect();
        assert_eq!(names.first(), Some(&"TS"));
        assert_eq!(names.last(), Some(&"surface_balance"));
    }
}
