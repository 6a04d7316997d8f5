use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Offset between the ROC (Minguo) calendar year and the Gregorian year.
pub const ROC_YEAR_OFFSET: i32 = 1911;

/// Errors when parsing a period code.
#[derive(Error, Debug, PartialEq)]
pub enum PeriodError {
    #[error("malformed period code '{0}' (expected YYY.MM, e.g. 114.01)")]
    Malformed(String),

    #[error("month {0} out of range in period code")]
    MonthOutOfRange(u8),
}

/// A reporting month in ROC-calendar notation, e.g. `114.01` for 2025-01.
///
/// Codes are zero-padded to fixed width (`YYY.MM`), which is what makes the
/// extractor's plain string comparison order them correctly. This type
/// serves the presentation side only (default floors, chart labels,
/// Gregorian conversion); extraction compares raw label text and never
/// parses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodCode {
    pub roc_year: u16,
    pub month: u8,
}

impl PeriodCode {
    pub fn new(roc_year: u16, month: u8) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::MonthOutOfRange(month));
        }
        Ok(Self { roc_year, month })
    }

    /// Parse a `YYY.MM` code. Accepts unpadded input ("114.1"); formatting
    /// back out via `Display` yields the canonical fixed-width form.
    pub fn parse(s: &str) -> Result<Self, PeriodError> {
        let malformed = || PeriodError::Malformed(s.to_string());
        let (year_part, month_part) = s.trim().split_once('.').ok_or_else(malformed)?;
        let roc_year: u16 = year_part.parse().map_err(|_| malformed())?;
        let month: u8 = month_part.parse().map_err(|_| malformed())?;
        Self::new(roc_year, month)
    }

    /// January of the ROC year containing `date`. Used as the default
    /// period floor: "this year's months".
    pub fn year_start(date: NaiveDate) -> Self {
        let roc_year = (date.year() - ROC_YEAR_OFFSET).max(1) as u16;
        Self { roc_year, month: 1 }
    }

    /// The period containing `date`.
    pub fn from_gregorian(date: NaiveDate) -> Self {
        let roc_year = (date.year() - ROC_YEAR_OFFSET).max(1) as u16;
        Self {
            roc_year,
            month: date.month() as u8,
        }
    }

    /// First day of the period in the Gregorian calendar.
    pub fn to_gregorian(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            self.roc_year as i32 + ROC_YEAR_OFFSET,
            self.month as u32,
            1,
        )
    }
}

impl fmt::Display for PeriodCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}.{:02}", self.roc_year, self.month)
    }
}

#[cfg(test)]
mod test {
    use super::{PeriodCode, PeriodError};
    use chrono::NaiveDate;

    #[test]
    fn test_parse_and_display_round_trip() {
        let code = PeriodCode::parse("114.01").unwrap();
        assert_eq!(code.roc_year, 114);
        assert_eq!(code.month, 1);
        assert_eq!(code.to_string(), "114.01");
    }

    #[test]
    fn test_parse_normalizes_unpadded_month() {
        assert_eq!(PeriodCode::parse("114.1").unwrap().to_string(), "114.01");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            PeriodCode::parse("last month"),
            Err(PeriodError::Malformed(_))
        ));
        assert_eq!(
            PeriodCode::parse("114.13"),
            Err(PeriodError::MonthOutOfRange(13))
        );
    }

    #[test]
    fn test_ordering_matches_calendar() {
        let dec = PeriodCode::parse("113.12").unwrap();
        let jan = PeriodCode::parse("114.01").unwrap();
        assert!(dec < jan);
    }

    #[test]
    fn test_gregorian_conversion() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let code = PeriodCode::from_gregorian(date);
        assert_eq!(code.to_string(), "114.01");
        assert_eq!(
            code.to_gregorian(),
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
        assert_eq!(PeriodCode::year_start(date).to_string(), "114.01");
    }
}
