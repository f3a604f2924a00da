//! Model month with year context.

use std::fmt;

use crate::error::CalendarError;

/// Largest model year that still fits the four-digit `YYYY` label.
pub const MAX_YEAR: i32 = 9999;

/// One simulated month: a model year and a month number.
///
/// Ordering is chronological (year first, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelMonth {
    year: i32,
    month: u8,
}

impl ModelMonth {
    /// December of [`MAX_YEAR`], the last addressable month.
    pub const LAST: Self = Self {
        year: MAX_YEAR,
        month: 12,
    };

    /// Creates a new `ModelMonth`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12 and
    /// [`CalendarError::InvalidYear`] if `year` is outside 0..=[`MAX_YEAR`].
    pub fn new(year: i32, month: u8) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        if !(0..=MAX_YEAR).contains(&year) {
            return Err(CalendarError::InvalidYear { year });
        }
        Ok(Self { year, month })
    }

    /// January of `year`.
    pub fn first_of_year(year: i32) -> Result<Self, CalendarError> {
        Self::new(year, 1)
    }

    /// Parses a `YYYY-MM` label.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidLabel`] if the text is not two
    /// dash-separated integers, or the range errors of [`ModelMonth::new`].
    pub fn parse_label(label: &str) -> Result<Self, CalendarError> {
        let invalid = || CalendarError::InvalidLabel {
            label: label.to_string(),
        };
        let (year, month) = label.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }

    /// Returns the model year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Returns the month (1..=12).
    pub fn month(self) -> u8 {
        self.month
    }

    /// Returns the following month, wrapping December into January of the
    /// next year, or `None` past December of [`MAX_YEAR`].
    pub fn checked_next(self) -> Option<Self> {
        self.checked_advance(1)
    }

    /// Returns the month `n` months after this one, or `None` past December
    /// of [`MAX_YEAR`].
    pub fn checked_advance(self, n: usize) -> Option<Self> {
        let n = i64::try_from(n).ok()?;
        let zero_based = (self.month as i64 - 1).checked_add(n)?;
        let year = (self.year as i64).checked_add(zero_based / 12)?;
        if year > MAX_YEAR as i64 {
            return None;
        }
        Some(Self {
            year: year as i32,
            month: (zero_based % 12) as u8 + 1,
        })
    }

    /// Like [`checked_next`](Self::checked_next), saturating at December of
    /// [`MAX_YEAR`].
    pub fn next(self) -> Self {
        self.advance(1)
    }

    /// Like [`checked_advance`](Self::checked_advance), saturating at
    /// December of [`MAX_YEAR`].
    pub fn advance(self, n: usize) -> Self {
        self.checked_advance(n).unwrap_or(Self::LAST)
    }

    /// Signed number of months from `earlier` to `self`.
    pub fn months_since(self, earlier: Self) -> i64 {
        (self.year as i64 - earlier.year as i64) * 12 + (self.month as i64 - earlier.month as i64)
    }

    /// Zero-padded `YYYY-MM` label, as used in output file names.
    pub fn label(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Model time in fractional years, with January at the whole year.
    pub fn decimal_year(self) -> f64 {
        self.year as f64 + (self.month - 1) as f64 / 12.0
    }
}

impl fmt::Display for ModelMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
