//! Core types: filters, OData queries, events, attendance reports, formatting

pub mod event;
pub mod filter;
pub mod format;
pub mod query;
pub mod time;
pub mod tracing;

pub use event::{
    AttendanceOutcome, AttendanceReport, EventDetails, EventSummary, MeetingAttendance,
    NO_JOIN_URL, NO_LOCATION, Organizer,
};
pub use filter::{FilterCriteria, FilterError};
pub use format::{FormatOptions, JsonOutput, OutputFormat, OutputFormatter, ellipsis};
pub use query::{FilterExpression, ListQuery, Predicate, join_url_filter};
pub use time::{EventTimestamp, ReportTime, parse_calendar_date, parse_remote_datetime};
pub use tracing::{LogFormat, TracingConfig, TracingError, init_tracing};
