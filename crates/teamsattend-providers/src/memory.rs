//! In-memory [`CalendarService`].
//!
//! Serves canned payloads and records every call, so the stages and the
//! pipeline can be exercised without a network. Unknown event ids answer
//! the way Graph does: status 404 with an `ErrorItemNotFound` body.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use teamsattend_core::{ListQuery, join_url_filter};

use crate::credentials::BearerToken;
use crate::error::{ProviderError, ProviderResult};
use crate::raw_event::{
    RawAttendanceReport, RawCollection, RawEvent, RawEventItem, RawOnlineMeeting,
};
use crate::service::{BoxFuture, CalendarService};

const ITEM_NOT_FOUND_BODY: &str = r#"{"error":{"code":"ErrorItemNotFound","message":"The specified object was not found in the store."}}"#;

/// A call received by [`MemoryService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    ListEvents(ListQuery),
    GetEvent(String),
    ListOnlineMeetings(String),
    ListAttendanceReports(String),
}

/// A scripted calendar service.
#[derive(Debug, Default)]
pub struct MemoryService {
    events: Option<RawCollection<RawEventItem>>,
    list_error: Option<ProviderError>,
    details: HashMap<String, RawEvent>,
    event_errors: HashMap<String, ProviderError>,
    meetings: HashMap<String, RawCollection<RawOnlineMeeting>>,
    meeting_error: Option<ProviderError>,
    reports: HashMap<String, RawCollection<RawAttendanceReport>>,
    report_errors: HashMap<String, ProviderError>,
    calls: Mutex<Vec<ServiceCall>>,
}

impl MemoryService {
    /// Creates a service with an empty calendar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the event list response.
    pub fn with_events(mut self, events: RawCollection<RawEventItem>) -> Self {
        self.events = Some(events);
        self
    }

    /// Makes the list request fail.
    pub fn failing_list(mut self, error: ProviderError) -> Self {
        self.list_error = Some(error);
        self
    }

    /// Adds an event served by id.
    pub fn with_event(mut self, event: RawEvent) -> Self {
        let id = event.id.clone().unwrap_or_default();
        self.details.insert(id, event);
        self
    }

    /// Makes fetching one event fail.
    pub fn failing_event(mut self, event_id: impl Into<String>, error: ProviderError) -> Self {
        self.event_errors.insert(event_id.into(), error);
        self
    }

    /// Sets the online meetings matching a join URL.
    pub fn with_online_meetings(
        mut self,
        join_url: &str,
        meetings: RawCollection<RawOnlineMeeting>,
    ) -> Self {
        self.meetings.insert(join_url_filter(join_url), meetings);
        self
    }

    /// Makes the online meeting lookup fail.
    pub fn failing_meeting_lookup(mut self, error: ProviderError) -> Self {
        self.meeting_error = Some(error);
        self
    }

    /// Sets the attendance reports of a meeting.
    pub fn with_reports(
        mut self,
        meeting_id: impl Into<String>,
        reports: RawCollection<RawAttendanceReport>,
    ) -> Self {
        self.reports.insert(meeting_id.into(), reports);
        self
    }

    /// Makes the report request for one meeting fail.
    pub fn failing_reports(mut self, meeting_id: impl Into<String>, error: ProviderError) -> Self {
        self.report_errors.insert(meeting_id.into(), error);
        self
    }

    /// Returns every call received, in order.
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the queries of every list call.
    pub fn list_queries(&self) -> Vec<ListQuery> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ServiceCall::ListEvents(query) => Some(query),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ServiceCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

/// Rebuilds a stored error, since errors are not `Clone`.
fn replay(error: &ProviderError) -> ProviderError {
    match error.status() {
        Some(status) => ProviderError::remote_fetch(status, error.body().unwrap_or_default()),
        None => ProviderError::new(error.code(), error.message()),
    }
}

impl CalendarService for MemoryService {
    fn list_events<'a>(
        &'a self,
        _token: &'a BearerToken,
        query: &'a ListQuery,
    ) -> BoxFuture<'a, ProviderResult<RawCollection<RawEventItem>>> {
        self.record(ServiceCall::ListEvents(query.clone()));
        let result = match self.list_error {
            Some(ref error) => Err(replay(error)),
            None => Ok(self
                .events
                .clone()
                .unwrap_or_else(|| RawCollection::of(Vec::new()))),
        };
        Box::pin(async move { result })
    }

    fn get_event<'a>(
        &'a self,
        _token: &'a BearerToken,
        event_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<RawEvent>> {
        self.record(ServiceCall::GetEvent(event_id.to_string()));
        let result = if let Some(error) = self.event_errors.get(event_id) {
            Err(replay(error))
        } else {
            self.details
                .get(event_id)
                .cloned()
                .ok_or_else(|| ProviderError::remote_fetch(404, ITEM_NOT_FOUND_BODY))
        };
        Box::pin(async move { result })
    }

    fn list_online_meetings<'a>(
        &'a self,
        _token: &'a BearerToken,
        filter: &'a str,
    ) -> BoxFuture<'a, ProviderResult<RawCollection<RawOnlineMeeting>>> {
        self.record(ServiceCall::ListOnlineMeetings(filter.to_string()));
        let result = match self.meeting_error {
            Some(ref error) => Err(replay(error)),
            None => Ok(self
                .meetings
                .get(filter)
                .cloned()
                .unwrap_or_else(|| RawCollection::of(Vec::new()))),
        };
        Box::pin(async move { result })
    }

    fn list_attendance_reports<'a>(
        &'a self,
        _token: &'a BearerToken,
        meeting_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<RawCollection<RawAttendanceReport>>> {
        self.record(ServiceCall::ListAttendanceReports(meeting_id.to_string()));
        let result = if let Some(error) = self.report_errors.get(meeting_id) {
            Err(replay(error))
        } else {
            Ok(self
                .reports
                .get(meeting_id)
                .cloned()
                .unwrap_or_else(|| RawCollection::of(Vec::new())))
        };
        Box::pin(async move { result })
    }
}
