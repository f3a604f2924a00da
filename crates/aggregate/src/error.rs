//! Error types for the drift-aggregate crate.

use drift_calendar::ModelMonth;

use crate::variables::Component;

/// Error type for configuration and ingestion failures in the aggregation
/// engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    /// Returned when a sample is ingested past the end of a series.
    #[error("step index {index} leaves a gap (series length {len})")]
    IndexGap {
        /// The requested step index.
        index: usize,
        /// Current series length (the next writable index).
        len: usize,
    },

    /// Returned when the number of raw means does not match the number of
    /// raw variables of a component.
    #[error("{component}: expected {expected} raw values, got {actual}")]
    WidthMismatch {
        /// Component receiving the values.
        component: Component,
        /// Number of raw variables configured.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// Returned when a print or plot list names a variable the component does
    /// not read.
    #[error("{component}: {list} variable '{name}' is not in the read list")]
    UnknownVariable {
        /// Component owning the list.
        component: Component,
        /// Which list (`print` or `plot`).
        list: &'static str,
        /// The offending name.
        name: String,
    },

    /// Returned when a variable name occurs twice in one component.
    #[error("{component}: duplicate variable '{name}'")]
    DuplicateVariable {
        /// Component owning the variable set.
        component: Component,
        /// The repeated name.
        name: String,
    },

    /// Returned when the energy balance is requested but flux variables are
    /// absent.
    #[error("{component}: energy balance needs {}", .missing.join(", "))]
    MissingFlux {
        /// Component requesting the energy balance.
        component: Component,
        /// Flux names absent from the read list.
        missing: Vec<String>,
    },

    /// Returned when a window has zero length or a non-positive year span.
    #[error("invalid window: {months} months over {years} years")]
    InvalidWindow {
        /// Window length in months.
        months: usize,
        /// Window length in years.
        years: f64,
    },

    /// Returned when no model component is activated.
    #[error("no model component selected (use --cam, --cice or --clm)")]
    NoComponents,

    /// Returned when a spatial field does not match its coordinate axes.
    #[error("field has {actual} cells, grid {nlat}x{nlon} needs a multiple of {}", .nlat * .nlon)]
    FieldShape {
        /// Number of latitudes.
        nlat: usize,
        /// Number of longitudes.
        nlon: usize,
        /// Number of values in the field.
        actual: usize,
    },

    /// Returned when the print interval is zero.
    #[error("print interval must be >= 1, got {interval}")]
    InvalidPrintInterval {
        /// The invalid interval.
        interval: usize,
    },
}

/// Boxed error produced by a [`StepSource`](crate::driver::StepSource).
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for the timestep driver.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Returned when a present step cannot be read.
    #[error("failed to read {component} data for {month}")]
    Source {
        /// Component being read.
        component: Component,
        /// Calendar month being read.
        month: ModelMonth,
        /// Underlying reader failure.
        #[source]
        source: SourceError,
    },

    /// Returned when aggregation rejects a step.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    /// Returned when a step observer fails to write its output.
    #[error("step observer failed")]
    Observer(#[from] std::io::Error),
}
