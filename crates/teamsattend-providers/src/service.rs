//! CalendarService trait definition.
//!
//! [`CalendarService`] is the seam between the pipeline stages and the
//! remote calendar. [`GraphClient`](crate::graph::GraphClient) implements it
//! over HTTP; tests implement it in memory.
//!
//! Implementations only transport: they return raw payloads, and map a
//! non-success response to a [`ProviderErrorCode::RemoteFetch`] error
//! carrying status and body. Interpreting payloads is left to
//! [`normalize`](crate::normalize) and the stages.
//!
//! [`ProviderErrorCode::RemoteFetch`]: crate::ProviderErrorCode::RemoteFetch

use std::future::Future;
use std::pin::Pin;

use teamsattend_core::ListQuery;

use crate::credentials::BearerToken;
use crate::error::ProviderResult;
use crate::raw_event::{
    RawAttendanceReport, RawCollection, RawEvent, RawEventItem, RawOnlineMeeting,
};

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe, so stages can hold a
/// `&dyn CalendarService`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read access to the signed-in user's calendar and online meetings.
///
/// # Example Implementation
///
/// ```ignore
/// impl CalendarService for FixtureService {
///     fn get_event<'a>(
///         &'a self,
///         _token: &'a BearerToken,
///         event_id: &'a str,
///     ) -> BoxFuture<'a, ProviderResult<RawEvent>> {
///         Box::pin(async move { self.events.get(event_id).cloned().ok_or(...) })
///     }
///     // ... other methods
/// }
/// ```
pub trait CalendarService: Send + Sync {
    /// Lists events of the default calendar matching the query.
    fn list_events<'a>(
        &'a self,
        token: &'a BearerToken,
        query: &'a ListQuery,
    ) -> BoxFuture<'a, ProviderResult<RawCollection<RawEventItem>>>;

    /// Fetches one event by id.
    fn get_event<'a>(
        &'a self,
        token: &'a BearerToken,
        event_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<RawEvent>>;

    /// Lists online meetings matching an OData filter.
    fn list_online_meetings<'a>(
        &'a self,
        token: &'a BearerToken,
        filter: &'a str,
    ) -> BoxFuture<'a, ProviderResult<RawCollection<RawOnlineMeeting>>>;

    /// Lists the attendance reports of an online meeting.
    fn list_attendance_reports<'a>(
        &'a self,
        token: &'a BearerToken,
        meeting_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<RawCollection<RawAttendanceReport>>>;
}
