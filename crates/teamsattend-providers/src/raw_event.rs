//! Raw Microsoft Graph payloads.
//!
//! These mirror the JSON the service sends, with every field optional so a
//! missing field surfaces as a [`ProviderError`](crate::ProviderError) from
//! [`normalize`](crate::normalize) naming what was missing, instead of an
//! opaque deserialization failure.

use serde::{Deserialize, Serialize};

/// A collection response: `{"value": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCollection<T> {
    /// The items, when the service included the array.
    pub value: Option<Vec<T>>,
}

impl<T> RawCollection<T> {
    /// Creates a collection holding the given items.
    pub fn of(items: Vec<T>) -> Self {
        Self { value: Some(items) }
    }
}

/// One item of the event list request (`$select=id,subject,isOnlineMeeting`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventItem {
    pub id: Option<String>,
    pub subject: Option<String>,
    pub is_online_meeting: Option<bool>,
}

/// A `dateTimeTimeZone` value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDateTimeTimeZone {
    pub date_time: Option<String>,
    pub time_zone: Option<String>,
}

/// An event location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    pub display_name: Option<String>,
}

/// An email address with display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEmailAddress {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// A recipient, such as the organizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecipient {
    pub email_address: Option<RawEmailAddress>,
}

/// Online meeting info embedded in an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOnlineMeetingInfo {
    pub join_url: Option<String>,
}

/// A full event from `GET /me/events/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub id: Option<String>,
    pub subject: Option<String>,
    pub is_online_meeting: Option<bool>,
    pub start: Option<RawDateTimeTimeZone>,
    pub end: Option<RawDateTimeTimeZone>,
    pub location: Option<RawLocation>,
    pub organizer: Option<RawRecipient>,
    pub online_meeting: Option<RawOnlineMeetingInfo>,
}

/// An online meeting from `GET /me/onlineMeetings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOnlineMeeting {
    pub id: Option<String>,
    pub subject: Option<String>,
    pub join_web_url: Option<String>,
}

/// A meeting attendance report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttendanceReport {
    pub id: Option<String>,
    pub meeting_start_date_time: Option<String>,
    pub meeting_end_date_time: Option<String>,
    pub total_participant_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_event_list() {
        let json = r#"{
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users('me')/calendar/events(id,subject,isOnlineMeeting)",
            "value": [
                {"@odata.etag": "W/\"1\"", "id": "AAMk1", "subject": "Standup", "isOnlineMeeting": true},
                {"id": "AAMk2", "subject": "Lunch", "isOnlineMeeting": false}
            ]
        }"#;

        let list: RawCollection<RawEventItem> = serde_json::from_str(json).unwrap();
        let items = list.value.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id.as_deref(), Some("AAMk1"));
        assert_eq!(items[0].is_online_meeting, Some(true));
        assert_eq!(items[1].subject.as_deref(), Some("Lunch"));
    }

    #[test]
    fn parse_collection_without_value() {
        let list: RawCollection<RawEventItem> = serde_json::from_str("{}").unwrap();
        assert!(list.value.is_none());
    }

    #[test]
    fn parse_full_event() {
        let json = r#"{
            "id": "AAMkAGI2",
            "subject": "Sprint Review",
            "isOnlineMeeting": true,
            "start": {"dateTime": "2024-01-15T10:00:00.0000000", "timeZone": "UTC"},
            "end": {"dateTime": "2024-01-15T11:00:00.0000000", "timeZone": "UTC"},
            "location": {"displayName": "Room 4", "locationType": "default"},
            "organizer": {"emailAddress": {"name": "Ada Lovelace", "address": "ada@example.com"}},
            "onlineMeeting": {"joinUrl": "https://teams.microsoft.com/l/meetup-join/abc"}
        }"#;

        let event: RawEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event.start.unwrap().date_time.as_deref(),
            Some("2024-01-15T10:00:00.0000000")
        );
        assert_eq!(
            event.organizer.unwrap().email_address.unwrap().address.as_deref(),
            Some("ada@example.com")
        );
        assert_eq!(
            event.online_meeting.unwrap().join_url.as_deref(),
            Some("https://teams.microsoft.com/l/meetup-join/abc")
        );
    }

    #[test]
    fn parse_event_with_nulls() {
        let json = r#"{"id": "AAMk3", "location": null, "onlineMeeting": null}"#;
        let event: RawEvent = serde_json::from_str(json).unwrap();
        assert!(event.location.is_none());
        assert!(event.online_meeting.is_none());
        assert!(event.start.is_none());
    }

    #[test]
    fn parse_attendance_report() {
        let json = r#"{
            "id": "rep-1",
            "totalParticipantCount": 7,
            "meetingStartDateTime": "2024-01-15T10:01:00.123Z",
            "meetingEndDateTime": "2024-01-15T10:58:30Z"
        }"#;
        let report: RawAttendanceReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.total_participant_count, Some(7));
        assert_eq!(
            report.meeting_end_date_time.as_deref(),
            Some("2024-01-15T10:58:30Z")
        );
    }
}
