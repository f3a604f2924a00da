//! # drift-report
//!
//! Presentation of aggregated series: periodic screen lines during a run,
//! and after it per-component text tables, SVG line plots and a JSON run
//! summary. Nothing here computes statistics; every value comes from
//! [`SeriesAggregator`](drift_aggregate::SeriesAggregator).
//!
//! All output files are named `<case>_<first>-<last>_<component>...` via
//! [`RunLabel`].

mod error;
mod label;
mod plot;
mod screen;
mod summary;
mod text;

pub use error::ReportError;
pub use label::RunLabel;
pub use plot::write_plots;
pub use screen::ScreenReporter;
pub use summary::{FinalValues, RunReport, StopRecord};
pub use text::{write_table, write_text_file};
