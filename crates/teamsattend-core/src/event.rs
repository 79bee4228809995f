//! Event and attendance types.
//!
//! This module provides the normalized records the pipeline hands around:
//! - [`EventSummary`]: one row of the event list
//! - [`EventDetails`]: the full view of a selected event
//! - [`AttendanceReport`]: one attendance snapshot of an online meeting

use serde::{Deserialize, Serialize};

use crate::time::{EventTimestamp, ReportTime};

/// Location shown when the event has none.
pub const NO_LOCATION: &str = "No location specified";

/// Join URL shown when the event is not an online meeting.
///
/// The orchestrator compares against this value to decide whether an
/// attendance lookup applies.
pub const NO_JOIN_URL: &str = "No online meeting URL";

/// A lightweight event from the list request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    /// Opaque event identifier, never empty.
    pub id: String,
    /// The event subject.
    pub subject: String,
    /// Whether the event is an online meeting.
    pub is_online_meeting: bool,
}

impl EventSummary {
    /// Creates a new summary.
    pub fn new(id: impl Into<String>, subject: impl Into<String>, is_online_meeting: bool) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            is_online_meeting,
        }
    }
}

/// The organizer of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organizer {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl Organizer {
    /// Creates a new organizer.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Full details of a single event.
///
/// `end` is not checked against `start`; both are passed through as the
/// calendar service reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    /// Opaque event identifier.
    pub id: String,
    /// The event subject, when the service returned one.
    pub subject: Option<String>,
    /// Whether the event is an online meeting.
    pub is_online_meeting: bool,
    /// When the event starts.
    pub start: EventTimestamp,
    /// When the event ends.
    pub end: EventTimestamp,
    /// Location display name, or [`NO_LOCATION`].
    pub location_name: String,
    /// The organizer.
    pub organizer: Organizer,
    /// Online meeting join URL, or [`NO_JOIN_URL`].
    pub join_url: String,
}

impl EventDetails {
    /// Creates details with default location and join URL.
    pub fn new(
        id: impl Into<String>,
        start: EventTimestamp,
        end: EventTimestamp,
        organizer: Organizer,
    ) -> Self {
        Self {
            id: id.into(),
            subject: None,
            is_online_meeting: false,
            start,
            end,
            location_name: NO_LOCATION.to_string(),
            organizer,
            join_url: NO_JOIN_URL.to_string(),
        }
    }

    /// Builder method to set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Builder method to set the online meeting flag.
    pub fn with_online_meeting(mut self, is_online_meeting: bool) -> Self {
        self.is_online_meeting = is_online_meeting;
        self
    }

    /// Builder method to set the location name.
    pub fn with_location(mut self, location_name: impl Into<String>) -> Self {
        self.location_name = location_name.into();
        self
    }

    /// Builder method to set the join URL.
    pub fn with_join_url(mut self, join_url: impl Into<String>) -> Self {
        self.join_url = join_url.into();
        self
    }

    /// Returns the join URL if the event has a real one.
    pub fn attendance_join_url(&self) -> Option<&str> {
        if self.join_url == NO_JOIN_URL {
            None
        } else {
            Some(&self.join_url)
        }
    }
}

/// One attendance report snapshot for an online meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceReport {
    /// Report identifier.
    pub report_id: String,
    /// When the meeting started, as reported.
    pub meeting_start: Option<ReportTime>,
    /// When the meeting ended, as reported.
    pub meeting_end: Option<ReportTime>,
    /// Number of participants who joined.
    pub total_participant_count: u32,
}

impl AttendanceReport {
    /// Creates a report with no timestamps.
    pub fn new(report_id: impl Into<String>, total_participant_count: u32) -> Self {
        Self {
            report_id: report_id.into(),
            meeting_start: None,
            meeting_end: None,
            total_participant_count,
        }
    }

    /// Builder method to set the meeting start and end.
    pub fn with_times(mut self, start: Option<ReportTime>, end: Option<ReportTime>) -> Self {
        self.meeting_start = start;
        self.meeting_end = end;
        self
    }
}

/// Attendance reports gathered for one resolved online meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingAttendance {
    /// The online meeting identifier.
    pub meeting_id: String,
    /// Reports in the order the service returned them; may be empty.
    pub reports: Vec<AttendanceReport>,
}

impl MeetingAttendance {
    /// Creates a new meeting attendance entry.
    pub fn new(meeting_id: impl Into<String>, reports: Vec<AttendanceReport>) -> Self {
        Self {
            meeting_id: meeting_id.into(),
            reports,
        }
    }
}

/// What the attendance stage produced for a selected event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "meetings", rename_all = "snake_case")]
pub enum AttendanceOutcome {
    /// The event has no join URL; no lookup was made.
    Skipped,
    /// The join URL matched no online meeting.
    NoMeetingFound,
    /// One entry per matching online meeting, in service order.
    Resolved(Vec<MeetingAttendance>),
}
