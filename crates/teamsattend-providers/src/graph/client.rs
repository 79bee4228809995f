//! Microsoft Graph API client.
//!
//! This module provides the HTTP implementation of [`CalendarService`]:
//! request building, bearer authorization, status mapping, and JSON parsing.

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use teamsattend_core::ListQuery;
use tracing::{debug, warn};

use crate::credentials::BearerToken;
use crate::error::{ProviderError, ProviderResult};
use crate::raw_event::{
    RawAttendanceReport, RawCollection, RawEvent, RawEventItem, RawOnlineMeeting,
};
use crate::service::{BoxFuture, CalendarService};

use super::config::GraphConfig;

/// Microsoft Graph API client.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GraphClient {
    /// Creates a client for the configured Graph root.
    pub fn new(config: &GraphConfig) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issues a GET and parses the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &BearerToken,
        path: &str,
        query: &[(&str, String)],
    ) -> ProviderResult<T> {
        debug!(path, "GET");

        let response = self
            .http_client
            .get(self.endpoint(path))
            .bearer_auth(token.secret())
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::transport("request timeout")
                } else if e.is_connect() {
                    ProviderError::transport(format!("connection failed: {}", e))
                } else {
                    ProviderError::transport(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::transport(format!("failed to read response: {}", e))
        })?;

        if !status.is_success() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                warn!(path, "access token rejected, sign in again with `teamsattend auth`");
            }
            debug!(path, status = status.as_u16(), "request failed");
            return Err(ProviderError::remote_fetch(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::malformed(format!("failed to parse response from {}: {}", path, e))
        })
    }
}

impl CalendarService for GraphClient {
    fn list_events<'a>(
        &'a self,
        token: &'a BearerToken,
        query: &'a ListQuery,
    ) -> BoxFuture<'a, ProviderResult<RawCollection<RawEventItem>>> {
        Box::pin(async move {
            self.get_json(token, "/me/calendar/events", &query.to_query_pairs())
                .await
        })
    }

    fn get_event<'a>(
        &'a self,
        token: &'a BearerToken,
        event_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<RawEvent>> {
        Box::pin(async move {
            let path = format!("/me/events/{}", urlencoding::encode(event_id));
            self.get_json(token, &path, &[]).await
        })
    }

    fn list_online_meetings<'a>(
        &'a self,
        token: &'a BearerToken,
        filter: &'a str,
    ) -> BoxFuture<'a, ProviderResult<RawCollection<RawOnlineMeeting>>> {
        Box::pin(async move {
            self.get_json(token, "/me/onlineMeetings", &[("$filter", filter.to_string())])
                .await
        })
    }

    fn list_attendance_reports<'a>(
        &'a self,
        token: &'a BearerToken,
        meeting_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<RawCollection<RawAttendanceReport>>> {
        Box::pin(async move {
            let path = format!(
                "/me/onlineMeetings/{}/attendanceReports",
                urlencoding::encode(meeting_id)
            );
            self.get_json(token, &path, &[]).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use mockito::Matcher;
    use teamsattend_core::FilterCriteria;

    fn client_for(url: &str) -> GraphClient {
        GraphClient::new(&GraphConfig::new("tenant", "client").with_base_url(url)).unwrap()
    }

    fn token() -> BearerToken {
        BearerToken::new("test-token")
    }

    #[tokio::test]
    async fn list_events_sends_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/me/calendar/events")
            .match_header("authorization", "Bearer test-token")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("$select".into(), "id,subject,isOnlineMeeting".into()),
                Matcher::UrlEncoded("$top".into(), "50".into()),
                Matcher::UrlEncoded("$filter".into(), "subject eq 'Standup'".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"value": [{"id": "AAMk1", "subject": "Standup", "isOnlineMeeting": true}]}"#)
            .create_async()
            .await;

        let query = ListQuery::from_criteria(&FilterCriteria::none().with_subject("Standup"));
        let list = client_for(&server.url())
            .list_events(&token(), &query)
            .await
            .unwrap();

        mock.assert_async().await;
        let items = list.value.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].subject.as_deref(), Some("Standup"));
    }

    #[tokio::test]
    async fn get_event_by_id() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/me/events/AAMkAGI2")
            .with_status(200)
            .with_body(r#"{"id": "AAMkAGI2", "subject": "Sprint Review"}"#)
            .create_async()
            .await;

        let event = client_for(&server.url())
            .get_event(&token(), "AAMkAGI2")
            .await
            .unwrap();
        assert_eq!(event.subject.as_deref(), Some("Sprint Review"));
    }

    #[tokio::test]
    async fn non_success_status_is_remote_fetch() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{"error": {"code": "ErrorItemNotFound", "message": "The specified object was not found in the store."}}"#;
        let _mock = server
            .mock("GET", "/me/events/missing")
            .with_status(404)
            .with_body(body)
            .create_async()
            .await;

        let err = client_for(&server.url())
            .get_event(&token(), "missing")
            .await
            .unwrap_err();

        assert_eq!(err.code(), ProviderErrorCode::RemoteFetch);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some(body));
        assert!(err.signals_missing_item());
    }

    #[tokio::test]
    async fn unauthorized_is_remote_fetch() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/me/calendar/events")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error": {"code": "InvalidAuthenticationToken"}}"#)
            .create_async()
            .await;

        let query = ListQuery::from_criteria(&FilterCriteria::none());
        let err = client_for(&server.url())
            .list_events(&token(), &query)
            .await
            .unwrap_err();

        assert_eq!(err.code(), ProviderErrorCode::RemoteFetch);
        assert_eq!(err.status(), Some(401));
        assert!(!err.signals_missing_item());
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/me/events/AAMk1")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let err = client_for(&server.url())
            .get_event(&token(), "AAMk1")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::MalformedResponse);
    }

    #[tokio::test]
    async fn connection_failure_is_transport() {
        let err = client_for("http://127.0.0.1:1")
            .get_event(&token(), "AAMk1")
            .await
            .unwrap_err();

        assert_eq!(err.code(), ProviderErrorCode::RemoteFetch);
        assert!(err.status().is_none());
    }

    #[tokio::test]
    async fn online_meetings_filter_by_join_url() {
        let mut server = mockito::Server::new_async().await;
        let join_url = "https://teams.microsoft.com/l/meetup-join/abc";
        let mock = server
            .mock("GET", "/me/onlineMeetings")
            .match_query(Matcher::UrlEncoded(
                "$filter".into(),
                format!("joinWebUrl eq '{}'", join_url),
            ))
            .with_status(200)
            .with_body(r#"{"value": [{"id": "MSpkYzE3", "joinWebUrl": "https://teams.microsoft.com/l/meetup-join/abc"}]}"#)
            .create_async()
            .await;

        let filter = teamsattend_core::join_url_filter(join_url);
        let list = client_for(&server.url())
            .list_online_meetings(&token(), &filter)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(list.value.unwrap()[0].id.as_deref(), Some("MSpkYzE3"));
    }

    #[tokio::test]
    async fn attendance_reports_for_meeting() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/me/onlineMeetings/MSpkYzE3/attendanceReports")
            .with_status(200)
            .with_body(r#"{"value": [{"id": "rep-1", "totalParticipantCount": 3}]}"#)
            .create_async()
            .await;

        let list = client_for(&server.url())
            .list_attendance_reports(&token(), "MSpkYzE3")
            .await
            .unwrap();
        let reports = list.value.unwrap();
        assert_eq!(reports[0].total_participant_count, Some(3));
    }
}
