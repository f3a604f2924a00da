//! # drift-io
//!
//! Locate and read a model case's monthly NetCDF history files and parse
//! the variable-list file. Bridges the on-disk archive into the
//! [`StepSource`](drift_aggregate::StepSource) seam of drift-aggregate.

mod error;
mod layout;
mod netcdf_read;
mod source;
mod vars_file;

pub use error::IoError;
pub use layout::{ArchiveLayout, RunMode, history_infix};
pub use netcdf_read::{GridInfo, peek_grid};
pub use source::NetcdfArchive;
pub use vars_file::{parse_variable_lists, read_variable_lists};
