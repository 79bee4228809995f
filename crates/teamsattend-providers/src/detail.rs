//! Event detail stage.

use teamsattend_core::EventDetails;
use tracing::debug;

use crate::credentials::BearerToken;
use crate::error::{ProviderError, ProviderResult};
use crate::normalize::normalize_details;
use crate::service::CalendarService;

/// Fetches the full details of one event.
pub struct EventDetailFetcher<'a> {
    service: &'a dyn CalendarService,
}

impl<'a> EventDetailFetcher<'a> {
    /// Creates a fetcher over the given service.
    pub fn new(service: &'a dyn CalendarService) -> Self {
        Self { service }
    }

    /// Fetches and normalizes the event with the given id.
    ///
    /// # Errors
    ///
    /// `NotFound` when the service reports that no such event exists,
    /// `RemoteFetch` for any other failed request, and `MalformedResponse`
    /// when start, end, or organizer is missing.
    pub async fn fetch(&self, token: &BearerToken, event_id: &str) -> ProviderResult<EventDetails> {
        let event_id = event_id.trim();
        if event_id.is_empty() {
            return Err(ProviderError::not_found("event id is empty"));
        }

        debug!(event_id, "fetching event details");
        let raw = self
            .service
            .get_event(token, event_id)
            .await
            .map_err(|err| {
                if err.signals_missing_item() {
                    ProviderError::not_found(format!("no event with id {}", event_id))
                        .with_source(err)
                } else {
                    err
                }
            })?;

        normalize_details(raw)
    }
}
