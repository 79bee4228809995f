//! Time types for calendar events and attendance reports.
//!
//! This module provides [`EventTimestamp`] for event start/end values as the
//! calendar service reports them (a wall-clock datetime plus the zone it is
//! expressed in), and [`ReportTime`] for attendance report timestamps, which
//! are kept verbatim when they cannot be parsed.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format used for calendar dates entered by the user.
pub const CALENDAR_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used when rendering datetimes into query predicates.
pub const QUERY_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), CALENDAR_DATE_FORMAT).ok()
}

/// Parses a datetime as returned by the calendar service.
///
/// Accepts both the zone-less form (`2024-01-15T10:00:00.0000000`, the zone
/// travelling in a sibling field) and RFC 3339 with an offset, which is
/// converted to UTC wall-clock time.
pub fn parse_remote_datetime(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).naive_utc())
}

/// A point in time attached to a calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTimestamp {
    /// Wall-clock datetime in `time_zone`.
    pub date_time: NaiveDateTime,
    /// The zone `date_time` is expressed in (e.g. `"UTC"`), when reported.
    pub time_zone: Option<String>,
}

impl EventTimestamp {
    /// Creates a timestamp without zone information.
    pub fn new(date_time: NaiveDateTime) -> Self {
        Self {
            date_time,
            time_zone: None,
        }
    }

    /// Builder method to set the time zone.
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }
}

impl fmt::Display for EventTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date_time.format("%Y-%m-%d %H:%M:%S"))?;
        if let Some(ref tz) = self.time_zone {
            write!(f, " ({})", tz)?;
        }
        Ok(())
    }
}

/// A timestamp from an attendance report.
///
/// Reports carry RFC 3339 timestamps; anything that does not parse is kept
/// as the raw string so it can still be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportTime {
    /// A parsed instant.
    Instant(DateTime<Utc>),
    /// The unparsed value as sent by the service.
    Raw(String),
}

impl ReportTime {
    /// Parses a report timestamp, falling back to the raw string.
    pub fn parse(input: &str) -> Self {
        match DateTime::parse_from_rfc3339(input.trim()) {
            Ok(dt) => Self::Instant(dt.with_timezone(&Utc)),
            Err(_) => Self::Raw(input.to_string()),
        }
    }

    /// Returns the instant if the value parsed.
    pub fn as_instant(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Instant(dt) => Some(dt),
            Self::Raw(_) => None,
        }
    }
}

impl fmt::Display for ReportTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instant(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S UTC")),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}
