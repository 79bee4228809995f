//! Raw Graph payload to domain record conversion.
//!
//! Fields the contract guarantees are required here: a missing one becomes a
//! [`ProviderErrorCode::MalformedResponse`](crate::ProviderErrorCode) error
//! naming the field. Optional fields fall back to the documented defaults
//! ([`NO_LOCATION`], [`NO_JOIN_URL`]).

use teamsattend_core::{
    AttendanceReport, EventDetails, EventSummary, EventTimestamp, NO_JOIN_URL, NO_LOCATION,
    Organizer, ReportTime, parse_remote_datetime,
};
use tracing::warn;

use crate::error::{ProviderError, ProviderResult};
use crate::raw_event::{
    RawAttendanceReport, RawDateTimeTimeZone, RawEvent, RawEventItem, RawOnlineMeeting,
};

/// Converts one event list item to an [`EventSummary`].
pub fn normalize_summary(raw: RawEventItem) -> ProviderResult<EventSummary> {
    let id = required_id(raw.id, "event list item")?;
    let subject = raw
        .subject
        .ok_or_else(|| missing("subject", &format!("event {}", id)))?;
    let is_online_meeting = raw
        .is_online_meeting
        .ok_or_else(|| missing("isOnlineMeeting", &format!("event {}", id)))?;

    Ok(EventSummary::new(id, subject, is_online_meeting))
}

/// Converts every list item, failing on the first malformed one.
pub fn normalize_summaries(items: Vec<RawEventItem>) -> ProviderResult<Vec<EventSummary>> {
    items.into_iter().map(normalize_summary).collect()
}

/// Converts a full event to [`EventDetails`].
///
/// Location and join URL default when absent or blank; every other field
/// the details view shows is required.
pub fn normalize_details(raw: RawEvent) -> ProviderResult<EventDetails> {
    let id = required_id(raw.id, "event")?;
    let context = format!("event {}", id);

    let start = convert_timestamp(raw.start, "start", &context)?;
    let end = convert_timestamp(raw.end, "end", &context)?;

    let email = raw
        .organizer
        .and_then(|o| o.email_address)
        .ok_or_else(|| missing("organizer.emailAddress", &context))?;
    let organizer = Organizer::new(
        email
            .name
            .ok_or_else(|| missing("organizer.emailAddress.name", &context))?,
        email
            .address
            .ok_or_else(|| missing("organizer.emailAddress.address", &context))?,
    );

    let mut details = EventDetails::new(id, start, end, organizer)
        .with_online_meeting(raw.is_online_meeting.unwrap_or(false));

    if let Some(subject) = raw.subject {
        details = details.with_subject(subject);
    }

    details = details.with_location(
        non_blank(raw.location.and_then(|l| l.display_name)).unwrap_or_else(|| NO_LOCATION.into()),
    );
    details = details.with_join_url(
        non_blank(raw.online_meeting.and_then(|m| m.join_url))
            .unwrap_or_else(|| NO_JOIN_URL.into()),
    );

    Ok(details)
}

/// Extracts the identifier of an online meeting.
pub fn normalize_meeting_id(raw: RawOnlineMeeting) -> ProviderResult<String> {
    required_id(raw.id, "online meeting")
}

/// Converts an attendance report.
///
/// Timestamps that do not parse are kept verbatim; a missing participant
/// count is reported as zero.
pub fn normalize_report(raw: RawAttendanceReport) -> ProviderResult<AttendanceReport> {
    let id = required_id(raw.id, "attendance report")?;

    let count = match raw.total_participant_count {
        Some(count) => count,
        None => {
            warn!(report_id = %id, "attendance report has no totalParticipantCount");
            0
        }
    };

    Ok(AttendanceReport::new(id, count).with_times(
        raw.meeting_start_date_time.as_deref().map(ReportTime::parse),
        raw.meeting_end_date_time.as_deref().map(ReportTime::parse),
    ))
}

fn convert_timestamp(
    raw: Option<RawDateTimeTimeZone>,
    field: &str,
    context: &str,
) -> ProviderResult<EventTimestamp> {
    let raw = raw.ok_or_else(|| missing(field, context))?;
    let value = raw
        .date_time
        .ok_or_else(|| missing(&format!("{}.dateTime", field), context))?;
    let date_time = parse_remote_datetime(&value).ok_or_else(|| {
        ProviderError::malformed(format!(
            "{} has an unparseable {}.dateTime: {}",
            context, field, value
        ))
    })?;

    let timestamp = EventTimestamp::new(date_time);
    Ok(match raw.time_zone {
        Some(tz) => timestamp.with_time_zone(tz),
        None => timestamp,
    })
}

fn required_id(id: Option<String>, what: &str) -> ProviderResult<String> {
    match id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(ProviderError::malformed(format!("{} has no id", what))),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn missing(field: &str, context: &str) -> ProviderError {
    ProviderError::malformed(format!("{} is missing {}", context, field))
}
