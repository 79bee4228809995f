//! Event listing stage.

use teamsattend_core::{EventSummary, FilterCriteria, ListQuery};
use tracing::debug;

use crate::credentials::BearerToken;
use crate::error::{ProviderError, ProviderResult};
use crate::normalize::normalize_summaries;
use crate::service::CalendarService;

/// Lists calendar events matching [`FilterCriteria`].
pub struct EventLister<'a> {
    service: &'a dyn CalendarService,
}

impl<'a> EventLister<'a> {
    /// Creates a lister over the given service.
    pub fn new(service: &'a dyn CalendarService) -> Self {
        Self { service }
    }

    /// Issues one list request and returns the events in service order.
    ///
    /// At most one page is requested; an empty result is not an error.
    ///
    /// # Errors
    ///
    /// `RemoteFetch` when the request fails, `MalformedResponse` when the
    /// response has no `value` array or an item lacks a required field.
    pub async fn list(
        &self,
        token: &BearerToken,
        criteria: &FilterCriteria,
    ) -> ProviderResult<Vec<EventSummary>> {
        let query = ListQuery::from_criteria(criteria);
        debug!(filter = ?query.filter, "listing events");

        let collection = self.service.list_events(token, &query).await?;
        let items = collection
            .value
            .ok_or_else(|| ProviderError::malformed("event list response has no value array"))?;

        let events = normalize_summaries(items)?;
        debug!(count = events.len(), "listed events");
        Ok(events)
    }
}
