//! Attendance resolution stage.
//!
//! Attendance reports are keyed by the online meeting's internal id, not by
//! the join URL a calendar event carries, so resolution takes two requests:
//! join URL to meeting ids, then meeting id to reports.

use teamsattend_core::{AttendanceReport, join_url_filter};
use tracing::debug;

use crate::credentials::BearerToken;
use crate::error::{ProviderError, ProviderResult};
use crate::normalize::{normalize_meeting_id, normalize_report};
use crate::service::CalendarService;

/// Resolves a join URL to attendance reports.
pub struct AttendanceResolver<'a> {
    service: &'a dyn CalendarService,
}

impl<'a> AttendanceResolver<'a> {
    /// Creates a resolver over the given service.
    pub fn new(service: &'a dyn CalendarService) -> Self {
        Self { service }
    }

    /// Returns the ids of every online meeting with exactly this join URL.
    ///
    /// No match yields an empty list. Duplicates are kept in service order.
    pub async fn resolve_meeting_ids(
        &self,
        token: &BearerToken,
        join_url: &str,
    ) -> ProviderResult<Vec<String>> {
        let filter = join_url_filter(join_url);
        debug!(%filter, "resolving online meeting");

        let items = self
            .service
            .list_online_meetings(token, &filter)
            .await?
            .value
            .ok_or_else(|| {
                ProviderError::malformed("online meeting response has no value array")
            })?;

        let ids = items
            .into_iter()
            .map(normalize_meeting_id)
            .collect::<ProviderResult<Vec<_>>>()?;
        debug!(count = ids.len(), "resolved online meetings");
        Ok(ids)
    }

    /// Fetches the attendance reports of one meeting.
    ///
    /// A meeting without reports yields an empty list.
    pub async fn fetch_reports(
        &self,
        token: &BearerToken,
        meeting_id: &str,
    ) -> ProviderResult<Vec<AttendanceReport>> {
        debug!(meeting_id, "fetching attendance reports");

        self.service
            .list_attendance_reports(token, meeting_id)
            .await?
            .value
            .ok_or_else(|| {
                ProviderError::malformed("attendance report response has no value array")
            })?
            .into_iter()
            .map(normalize_report)
            .collect()
    }
}
