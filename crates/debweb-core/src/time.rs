//! Date ranges used by list filters and report headers

use crate::error::{CoreError, CoreResult};
use chrono::{Datelike, NaiveDate};
use debweb_config::DatePreset;
use serde::{Deserialize, Serialize};

/// Inclusive date filter; either end may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Both ends open
    pub fn all() -> Self {
        Self::default()
    }

    /// Resolve a configured preset against `today`
    pub fn from_preset(preset: DatePreset, today: NaiveDate) -> Self {
        match preset {
            DatePreset::All => Self::all(),
            DatePreset::Today => Self::new(Some(today), Some(today)),
            DatePreset::Month => {
                let start = today.with_day(1).unwrap_or(today);
                let end = start
                    .checked_add_months(chrono::Months::new(1))
                    .and_then(|d| d.pred_opt())
                    .unwrap_or(today);
                Self::new(Some(start), Some(end))
            }
            DatePreset::Year => Self::new(
                NaiveDate::from_ymd_opt(today.year(), 1, 1),
                NaiveDate::from_ymd_opt(today.year(), 12, 31),
            ),
        }
    }

    /// Parse raw `YYYY-MM-DD` inputs; blank inputs leave that end open
    pub fn parse(start: &str, end: &str) -> CoreResult<Self> {
        Ok(Self::new(
            parse_date("startDate", start)?,
            parse_date("endDate", end)?,
        ))
    }

    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Start after end; the backend answers such ranges with no rows
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s > e)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        match (self.start, self.end) {
            (None, None) => true,
            (Some(s), None) => *date >= s,
            (None, Some(e)) => *date <= e,
            (Some(s), Some(e)) => *date >= s && *date <= e,
        }
    }

    /// Human-readable description for report headers
    pub fn description(&self) -> String {
        match (self.start, self.end) {
            (None, None) => "All dates".to_string(),
            (Some(s), None) => format!("From {}", s),
            (None, Some(e)) => format!("Until {}", e),
            (Some(s), Some(e)) if s == e => s.to_string(),
            (Some(s), Some(e)) => format!("{} to {}", s, e),
        }
    }

    /// Filename fragment: `2024-01-01_to_2024-01-31`, or `all_dates`
    pub fn file_label(&self) -> String {
        match (self.start, self.end) {
            (None, None) => "all_dates".to_string(),
            (Some(s), None) => format!("{}_onwards", s),
            (None, Some(e)) => format!("until_{}", e),
            (Some(s), Some(e)) => format!("{}_to_{}", s, e),
        }
    }
}

fn parse_date(field: &str, raw: &str) -> CoreResult<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| CoreError::invalid(field, format!("'{}' is not a valid date (YYYY-MM-DD)", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_presets() {
        let today = date(2024, 2, 14);
        assert!(DateRange::from_preset(DatePreset::All, today).is_open());
        assert_eq!(
            DateRange::from_preset(DatePreset::Today, today),
            DateRange::new(Some(today), Some(today))
        );
        assert_eq!(
            DateRange::from_preset(DatePreset::Month, today),
            DateRange::new(Some(date(2024, 2, 1)), Some(date(2024, 2, 29)))
        );
        assert_eq!(
            DateRange::from_preset(DatePreset::Month, date(2023, 12, 5)).end,
            Some(date(2023, 12, 31))
        );
        assert_eq!(
            DateRange::from_preset(DatePreset::Year, today),
            DateRange::new(Some(date(2024, 1, 1)), Some(date(2024, 12, 31)))
        );
    }

    #[test]
    fn test_parse() {
        let range = DateRange::parse("2024-01-01", " ").unwrap();
        assert_eq!(range.start, Some(date(2024, 1, 1)));
        assert!(range.end.is_none());

        let err = DateRange::parse("01/02/2024", "").unwrap_err();
        assert_eq!(err.field_errors()[0].field, "startDate");
    }

    #[test]
    fn test_inverted() {
        let range = DateRange::new(Some(date(2024, 3, 1)), Some(date(2024, 2, 1)));
        assert!(range.is_inverted());
        assert!(!range.contains(&date(2024, 2, 15)));
        assert!(!DateRange::all().is_inverted());
    }

    #[test]
    fn test_labels() {
        let range = DateRange::new(Some(date(2024, 1, 1)), Some(date(2024, 1, 31)));
        assert_eq!(range.description(), "2024-01-01 to 2024-01-31");
        assert_eq!(range.file_label(), "2024-01-01_to_2024-01-31");
        assert_eq!(DateRange::all().file_label(), "all_dates");
        assert_eq!(DateRange::all().description(), "All dates");
        let day = DateRange::new(Some(date(2024, 1, 5)), Some(date(2024, 1, 5)));
        assert_eq!(day.description(), "2024-01-05");
    }
}
