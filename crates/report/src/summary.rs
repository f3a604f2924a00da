//! JSON summary of a finished run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use drift_aggregate::{RunSummary, SeriesAggregator, StopReason};
use serde::Serialize;
use tracing::info;

use crate::error::ReportError;
use crate::label::RunLabel;

/// Why the run ended, in serializable form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopRecord {
    /// The month budget was used up.
    StepBudget,
    /// A component's file for `month` was absent.
    MissingData {
        /// Component short name.
        component: String,
        /// `YYYY-MM` label.
        month: String,
    },
    /// No month in the seek range had data.
    NoData,
    /// December of the last four-digit year was processed.
    CalendarEnd,
}

impl From<StopReason> for StopRecord {
    fn from(stop: StopReason) -> Self {
        match stop {
            StopReason::StepBudget => StopRecord::StepBudget,
            StopReason::MissingData { component, month } => StopRecord::MissingData {
                component: component.short_name().to_string(),
                month: month.label(),
            },
            StopReason::NoData => StopRecord::NoData,
            StopReason::CalendarEnd => StopRecord::CalendarEnd,
        }
    }
}

/// Last values of one tracked variable. Non-finite values become `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalValues {
    pub raw: Option<f64>,
    pub short_mean: Option<f64>,
    pub long_mean: Option<f64>,
    pub short_slope: Option<f64>,
    pub long_slope: Option<f64>,
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Machine-readable record of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub case_id: String,
    pub first: Option<String>,
    pub last: Option<String>,
    pub steps: usize,
    pub stop: StopRecord,
    /// Component short name → variable → final values.
    pub components: BTreeMap<String, BTreeMap<String, FinalValues>>,
}

impl RunReport {
    /// Collects the final state of every aggregator.
    pub fn new(case_id: &str, summary: &RunSummary, aggregators: &[SeriesAggregator]) -> Self {
        let components = aggregators
            .iter()
            .map(|agg| {
                let vars = agg
                    .tracked()
                    .filter_map(|(name, series)| {
                        let v = series.latest()?;
                        Some((
                            name.to_string(),
                            FinalValues {
                                raw: finite(v.raw),
                                short_mean: finite(v.short_mean),
                                long_mean: finite(v.long_mean),
                                short_slope: finite(v.short_slope),
                                long_slope: finite(v.long_slope),
                            },
                        ))
                    })
                    .collect();
                (agg.component().short_name().to_string(), vars)
            })
            .collect();
        Self {
            case_id: case_id.to_string(),
            first: summary.first.map(|m| m.label()),
            last: summary.last.map(|m| m.label()),
            steps: summary.steps,
            stop: summary.stop.into(),
            components,
        }
    }

    /// Serializes to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ReportError> {
        serde_json::to_string_pretty(self).map_err(|e| ReportError::Serialization {
            reason: e.to_string(),
        })
    }

    /// Writes `<dir>/<case>_<first>-<last>_summary.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if serialization or the write fails.
    pub fn write_json(&self, dir: &Path, label: &RunLabel) -> Result<PathBuf, ReportError> {
        let json = self.to_json()?;
        std::fs::create_dir_all(dir).map_err(ReportError::io(dir))?;
        let path = dir.join(format!(
            "{}_{}-{}_summary.json",
            label.case_id(),
            label.first(),
            label.last()
        ));
        std::fs::write(&path, json).map_err(ReportError::io(&path))?;
        info!(path = %path.display(), "wrote run summary");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use drift_aggregate::{Component, VariableSet, WindowConfig};
    use drift_calendar::ModelMonth;

    use super::*;

    fn report() -> RunReport {
        let set = VariableSet::new(Component::Ice, &["hi", "aice"], &[]).unwrap();
        let mut agg = SeriesAggregator::new(set, WindowConfig::default());
        agg.ingest(0, &[1.5, f64::NAN]).unwrap();
        let month = ModelMonth::first_of_year(3).unwrap();
        let summary = RunSummary {
            first: Some(month),
            last: Some(month),
            steps: 1,
            stop: StopReason::MissingData {
                component: Component::Ice,
                month: month.next(),
            },
        };
        RunReport::new("exo", &summary, &[agg])
    }

    #[test]
    fn json_contains_fields() {
        let json = report().to_json().unwrap();
        assert!(json.contains("\"case_id\": \"exo\""));
        assert!(json.contains("\"first\": \"0003-01\""));
        assert!(json.contains("\"reason\": \"missing_data\""));
        assert!(json.contains("\"month\": \"0003-02\""));
        assert!(json.contains("\"cice\""));
    }

    #[test]
    fn non_finite_values_become_null() {
        let r = report();
        let aice = &r.components["cice"]["aice"];
        assert_eq!(aice.raw, None);
        assert_eq!(r.components["cice"]["hi"].raw, Some(1.5));
        assert!(r.to_json().unwrap().contains("\"raw\": null"));
    }

    #[test]
    fn stop_without_data() {
        let record = StopRecord::from(StopReason::NoData);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"reason":"no_data"}"#);
    }

    #[test]
    fn stop_at_calendar_end() {
        let record = StopRecord::from(StopReason::CalendarEnd);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"reason":"calendar_end"}"#);
    }
}
