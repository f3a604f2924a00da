//! Streaming aggregation of monthly global means.
//!
//! For a sequence of monthly spatial fields of unknown length, this crate
//! maintains per variable the raw global mean, a short and a long trailing
//! interval average, and the annualized slope of each average. Variables are
//! grouped by model [`Component`]; every component owns an independent
//! [`SeriesAggregator`].
//!
//! # Quick start
//!
//! ```
//! use drift_aggregate::{Component, SeriesAggregator, VariableSet, WindowConfig};
//!
//! let set = VariableSet::new(Component::Land, &["TSA"], &[]).unwrap();
//! let mut agg = SeriesAggregator::new(set, WindowConfig::default());
//!
//! for (i, t) in [280.0, 281.0, 282.0].into_iter().enumerate() {
//!     agg.ingest(i, &[t]).unwrap();
//! }
//! let tsa = agg.series("TSA").unwrap();
//! assert_eq!(tsa.short_mean()[2], 281.0);
//! ```
//!
//! # Architecture
//!
//! ```text
//! TimestepDriver::run()
//!   ├─ StepSource::has_step / read_step    (driver.rs)
//!   ├─ area_weighted_mean()   in parallel   (spatial.rs)
//!   └─ SeriesAggregator::ingest()          (aggregator.rs)
//!        ├─ EnergyBalanceCalculator         (energy.rs)
//!        └─ VariableSeries::ingest()        (series.rs)
//!             └─ interval_mean / window_slope (window.rs)
//! ```
//!
//! Names and slots are fixed up front by [`VariableRegistry::build`], which
//! rejects configuration errors before any step is read.

pub mod aggregator;
pub mod driver;
pub mod energy;
pub mod error;
pub mod registry;
pub mod series;
pub mod spatial;
pub mod variables;
pub mod window;

pub use aggregator::SeriesAggregator;
pub use driver::{
    DriverConfig, DriverState, RunSummary, SilentObserver, StepFields, StepObserver, StepReport,
    StepSource, StopReason, TimestepDriver,
};
pub use energy::{EnergyBalance, EnergyBalanceCalculator, FLUX_VARIABLES, energy_balance};
pub use error::{AggregateError, DriverError, SourceError};
pub use registry::{RegistryEntry, VariableLists, VariableRegistry};
pub use series::{StepValues, VariableSeries};
pub use spatial::area_weighted_mean;
pub use variables::{Component, DerivedQuantity, DerivedSlot, SlotKind, VariableSet};
pub use window::{WindowConfig, WindowSpec, interval_mean, window_slope};
