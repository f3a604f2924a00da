//! Output naming shared by text files and plots.

use drift_aggregate::{Component, RunSummary};
use drift_calendar::ModelMonth;

/// Case id and processed date range, used to name every output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLabel {
    case_id: String,
    first: ModelMonth,
    last: ModelMonth,
}

impl RunLabel {
    /// Label for `case_id` covering `first..=last`.
    pub fn new(case_id: impl Into<String>, first: ModelMonth, last: ModelMonth) -> Self {
        Self {
            case_id: case_id.into(),
            first,
            last,
        }
    }

    /// Label for a finished run; `None` if no step was processed.
    pub fn from_summary(case_id: impl Into<String>, summary: &RunSummary) -> Option<Self> {
        Some(Self::new(case_id, summary.first?, summary.last?))
    }

    /// Case identifier.
    pub fn case_id(&self) -> &str {
        &self.case_id
    }

    /// First processed month.
    pub fn first(&self) -> ModelMonth {
        self.first
    }

    /// Last processed month.
    pub fn last(&self) -> ModelMonth {
        self.last
    }

    /// `<case>_<first>-<last>_<component>`.
    pub fn stem(&self, component: Component) -> String {
        format!(
            "{}_{}-{}_{}",
            self.case_id,
            self.first.label(),
            self.last.label(),
            component.short_name()
        )
    }

    /// Calendar month of step `index`.
    pub fn month_of(&self, index: usize) -> ModelMonth {
        self.first.advance(index)
    }
}
