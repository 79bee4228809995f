//! Output formatting for pipeline results.
//!
//! This module renders what the pipeline produces in two output formats:
//! - **Text**: the human-readable console report, one block per stage
//! - **JSON**: a single machine-readable document of the whole run
//!
//! # Example
//!
//! ```rust
//! use teamsattend_core::format::{FormatOptions, OutputFormatter};
//! use teamsattend_core::EventSummary;
//!
//! let formatter = OutputFormatter::new(FormatOptions::default());
//! let text = formatter.format_summaries(&[EventSummary::new("AAMk1", "Standup", true)]);
//! assert!(text.contains("Subject: Standup"));
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::event::{
    AttendanceOutcome, AttendanceReport, EventDetails, EventSummary, MeetingAttendance,
};
use crate::time::ReportTime;


/// Shown when the list request returned nothing.
pub const NO_EVENTS_TEXT: &str = "No events found.";

/// Shown when the selected event has no join URL.
pub const ATTENDANCE_SKIPPED_TEXT: &str =
    "No online meeting URL available to fetch attendance report.";

/// Shown when the join URL matched no online meeting.
pub const NO_MEETING_FOUND_TEXT: &str = "No meetings found with the specified Join URL.";

/// Shown when a meeting has no attendance reports yet.
pub const NO_ATTENDANCE_DATA_TEXT: &str = "No attendance data available.";

/// Shown for report timestamps the service omitted.
const NOT_REPORTED: &str = "not reported";

/// The output format for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable console output.
    #[default]
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Configuration options for output formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Maximum length for subjects in the event list (truncated with ellipsis).
    pub max_subject_length: Option<usize>,
    /// Width of the separator rule between blocks.
    pub rule_width: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_subject_length: None,
            rule_width: 50,
        }
    }
}

/// JSON document describing a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonOutput {
    /// The events returned by the list request.
    pub events: Vec<EventSummary>,
    /// Details of the selected event, if one was fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<EventDetails>,
    /// The attendance stage result, if the run got that far.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<AttendanceOutcome>,
}

/// Output formatter for pipeline results.
#[derive(Debug, Clone, Default)]
pub struct OutputFormatter {
    options: FormatOptions,
}

impl OutputFormatter {
    /// Creates a new OutputFormatter with the given options.
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    fn rule(&self) -> String {
        "-".repeat(self.options.rule_width)
    }

    fn subject<'a>(&self, subject: &'a str) -> Cow<'a, str> {
        match self.options.max_subject_length {
            Some(max) => ellipsis(subject, max),
            None => Cow::Borrowed(subject),
        }
    }

    /// Formats the event list, or [`NO_EVENTS_TEXT`] when empty.
    pub fn format_summaries(&self, events: &[EventSummary]) -> String {
        if events.is_empty() {
            return NO_EVENTS_TEXT.to_string();
        }

        events
            .iter()
            .map(|e| {
                format!(
                    "Event ID: {}\nSubject: {}\nIs Online Meeting: {}",
                    e.id,
                    self.subject(&e.subject),
                    e.is_online_meeting
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats the details block of the selected event.
    pub fn format_details(&self, details: &EventDetails) -> String {
        let rule = self.rule();
        let mut lines = vec![
            rule.clone(),
            "Meeting Details/Report:".to_string(),
            rule.clone(),
            format!("ID: {}", details.id),
        ];
        if let Some(ref subject) = details.subject {
            lines.push(format!("Subject: {}", subject));
        }
        lines.extend([
            format!("Is Online Meeting: {}", details.is_online_meeting),
            format!("Start: {}", details.start),
            format!("End: {}", details.end),
            format!("Location: {}", details.location_name),
            format!(
                "Organizer: {} ({})",
                details.organizer.name, details.organizer.email
            ),
            format!("Join URL: {}", details.join_url),
            rule,
        ]);
        lines.join("\n")
    }

    /// Formats the attendance reports of one resolved meeting.
    pub fn format_meeting_attendance(&self, attendance: &MeetingAttendance) -> String {
        let rule = self.rule();
        let mut lines = vec![
            format!("Meeting ID: {}", attendance.meeting_id),
            rule.clone(),
            "Attendance Report:".to_string(),
            rule.clone(),
        ];

        if attendance.reports.is_empty() {
            lines.push(NO_ATTENDANCE_DATA_TEXT.to_string());
            lines.push(rule);
        } else {
            for report in &attendance.reports {
                lines.push(self.format_report(report));
                lines.push(rule.clone());
            }
        }
        lines.join("\n")
    }

    fn format_report(&self, report: &AttendanceReport) -> String {
        format!(
            "Attendance ID: {}\nStart Time: {}\nEnd Time: {}\nTotal Participants: {}",
            report.report_id,
            report_time(report.meeting_start.as_ref()),
            report_time(report.meeting_end.as_ref()),
            report.total_participant_count
        )
    }

    /// Formats the outcome of the attendance stage.
    pub fn format_attendance(&self, outcome: &AttendanceOutcome) -> String {
        match outcome {
            AttendanceOutcome::Skipped => ATTENDANCE_SKIPPED_TEXT.to_string(),
            AttendanceOutcome::NoMeetingFound => NO_MEETING_FOUND_TEXT.to_string(),
            AttendanceOutcome::Resolved(meetings) => meetings
                .iter()
                .map(|m| self.format_meeting_attendance(m))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

fn report_time(time: Option<&ReportTime>) -> Cow<'static, str> {
    match time {
        Some(t) => Cow::Owned(t.to_string()),
        None => Cow::Borrowed(NOT_REPORTED),
    }
}

/// Truncates a string to `max_len` characters, adding an ellipsis if needed.
pub fn ellipsis(s: &str, max_len: usize) -> Cow<'_, str> {
    if s.chars().count() <= max_len {
        return Cow::Borrowed(s);
    }
    if max_len == 0 {
        return Cow::Borrowed("");
    }
    let truncated: String = s.chars().take(max_len - 1).collect();
    Cow::Owned(format!("{}…", truncated))
}
