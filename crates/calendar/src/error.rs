//! Error types for the drift-calendar crate.

/// Error type for all fallible operations in the drift-calendar crate.
///
/// Covers out-of-range years and months and `YYYY-MM` labels that cannot
/// be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum CalendarError {
    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a model year cannot be written as four digits.
    #[error("invalid model year: {year} (must be 0..=9999)")]
    InvalidYear {
        /// The invalid year that was provided.
        year: i32,
    },

    /// Returned when a label is not of the form `YYYY-MM`.
    #[error("invalid month label: '{label}' (expected YYYY-MM)")]
    InvalidLabel {
        /// The label that failed to parse.
        label: String,
    },
}
