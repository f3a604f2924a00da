//! # drift-calendar
//!
//! Month arithmetic for model output written once per simulated month.
//!
//! Model years start at 0 and carry no real-world calendar: a step is a
//! `(year, month)` pair, and consecutive steps differ by exactly one month.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["(year, month)"] -->|"ModelMonth::new()"| B["ModelMonth"]
//!     B -->|".next()"| B
//!     B -->|".label()"| C["YYYY-MM"]
//!     C -->|"ModelMonth::parse_label()"| B
//!     B -->|"month_sequence()"| D["Vec of ModelMonth"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use drift_calendar::{ModelMonth, month_sequence};
//!
//! let start = ModelMonth::first_of_year(1).unwrap();
//! assert_eq!(start.label(), "0001-01");
//!
//! let months = month_sequence(start, 24);
//! assert_eq!(months[12].label(), "0002-01");
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `month` | Year/month pair with labels and stepping |
//! | `sequence` | Month sequence generation |
//! | `error` | Error types |

mod error;
mod month;
mod sequence;

pub use error::CalendarError;
pub use month::{MAX_YEAR, ModelMonth};
pub use sequence::month_sequence;
