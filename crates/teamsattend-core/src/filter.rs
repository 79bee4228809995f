//! Filter criteria for narrowing the event list.
//!
//! [`FilterCriteria`] is built once per run from user input. Date strings are
//! validated at construction; an unparsable date is a [`FilterError`], never
//! a silently dropped bound.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::parse_calendar_date;

/// Errors raised while building filter criteria.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The start date is not a `YYYY-MM-DD` calendar date.
    #[error("invalid start date {0:?}: expected YYYY-MM-DD")]
    InvalidStartDate(String),

    /// The end date is not a `YYYY-MM-DD` calendar date.
    #[error("invalid end date {0:?}: expected YYYY-MM-DD")]
    InvalidEndDate(String),
}

/// Optional subject and date bounds for the event list.
///
/// Dates are held as midnight of the given day, matching how the calendar
/// service compares `start/dateTime` and `end/dateTime`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    subject: Option<String>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
}

impl FilterCriteria {
    /// Criteria that match every event.
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds criteria from raw user input.
    ///
    /// Blank values (empty or whitespace only) count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if a non-blank date does not parse as
    /// `YYYY-MM-DD`.
    pub fn from_input(
        subject: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Self, FilterError> {
        let start = parse_bound(start_date, FilterError::InvalidStartDate)?;
        let end = parse_bound(end_date, FilterError::InvalidEndDate)?;

        Ok(Self {
            subject: non_blank(subject).map(str::to_string),
            start,
            end,
        })
    }

    /// Builder method to set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        let subject = subject.into();
        self.subject = non_blank(Some(&subject)).map(str::to_string);
        self
    }

    /// Builder method to set the lower bound on event start.
    pub fn with_start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    /// Builder method to set the upper bound on event end.
    pub fn with_end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Returns the subject to match exactly, if any.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Returns the inclusive lower bound on event start, if any.
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.start
    }

    /// Returns the inclusive upper bound on event end, if any.
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.end
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.start.is_none() && self.end.is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bound(
    input: Option<&str>,
    err: fn(String) -> FilterError,
) -> Result<Option<NaiveDateTime>, FilterError> {
    match non_blank(input) {
        None => Ok(None),
        Some(raw) => parse_calendar_date(raw)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Some)
            .ok_or_else(|| err(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn from_input_all_fields() {
        let criteria = FilterCriteria::from_input(
            Some("Sprint Review"),
            Some("2024-01-01"),
            Some("2024-01-31"),
        )
        .unwrap();

        assert_eq!(criteria.subject(), Some("Sprint Review"));
        assert_eq!(criteria.start(), Some(midnight(2024, 1, 1)));
        assert_eq!(criteria.end(), Some(midnight(2024, 1, 31)));
        assert!(!criteria.is_empty());
    }

    #[test]
    fn blank_input_is_absent() {
        let criteria = FilterCriteria::from_input(Some("   "), Some(""), None).unwrap();
        assert!(criteria.is_empty());
        assert_eq!(criteria, FilterCriteria::none());
    }

    #[test]
    fn subject_is_trimmed() {
        let criteria = FilterCriteria::from_input(Some("  Standup "), None, None).unwrap();
        assert_eq!(criteria.subject(), Some("Standup"));
    }

    #[test]
    fn invalid_start_date_is_an_error() {
        let err = FilterCriteria::from_input(None, Some("2024-02-30"), None).unwrap_err();
        assert_eq!(err, FilterError::InvalidStartDate("2024-02-30".to_string()));
        assert!(err.to_string().contains("start date"));
    }

    #[test]
    fn invalid_end_date_is_an_error() {
        let err = FilterCriteria::from_input(None, Some("2024-01-01"), Some("31/01/2024"))
            .unwrap_err();
        assert_eq!(err, FilterError::InvalidEndDate("31/01/2024".to_string()));
    }

    #[test]
    fn builder_methods() {
        let criteria = FilterCriteria::none()
            .with_subject("Retro")
            .with_start(midnight(2024, 3, 1))
            .with_end(midnight(2024, 3, 2));

        assert_eq!(criteria.subject(), Some("Retro"));
        assert_eq!(criteria.start(), Some(midnight(2024, 3, 1)));
        assert_eq!(criteria.end(), Some(midnight(2024, 3, 2)));
    }

    #[test]
    fn blank_subject_builder_clears() {
        let criteria = FilterCriteria::none().with_subject("  ");
        assert!(criteria.subject().is_none());
    }
}
