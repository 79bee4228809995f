//! OAuth 2.0 device authorization grant for the Microsoft identity platform.
//!
//! # Flow Overview
//!
//! 1. Request a device code and a short user code for the app
//! 2. Show the user where to go and which code to enter
//! 3. Poll the token endpoint until the user completes sign-in, the code
//!    expires, or the request is declined
//!
//! Polling honors the server's interval, backing off by five seconds on
//! `slow_down`. Every failure in the flow is reported as
//! [`ProviderErrorCode::AuthenticationFailed`](crate::ProviderErrorCode).

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::credentials::{BearerToken, CredentialProvider};
use crate::error::{ProviderError, ProviderResult};
use crate::service::BoxFuture;

use super::config::GraphConfig;

/// Grant type for polling the token endpoint.
const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Extra wait added when the server answers `slow_down`.
const SLOW_DOWN_STEP: Duration = Duration::from_secs(5);

/// Default poll interval when the server does not send one.
const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Response of the device authorization endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceCode {
    /// Code the user types on the verification page.
    pub user_code: String,
    /// Code the client polls with.
    pub device_code: String,
    /// Page where the user enters `user_code`.
    pub verification_uri: String,
    /// Seconds until the codes expire.
    pub expires_in: u64,
    /// Minimum seconds between polls.
    #[serde(default = "default_interval")]
    pub interval: u64,
    /// Ready-made instructions for the user.
    pub message: Option<String>,
}

impl DeviceCode {
    /// Returns the text to show the user.
    pub fn instructions(&self) -> String {
        match self.message {
            Some(ref message) => message.clone(),
            None => format!(
                "To sign in, open {} and enter the code {}",
                self.verification_uri, self.user_code
            ),
        }
    }

    /// Returns the wait between polls, never less than one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.interval.max(1))
    }
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// What to do after a failed token poll.
#[derive(Debug)]
enum PollDecision {
    /// The user has not finished yet.
    Wait,
    /// Wait longer between polls.
    SlowDown,
    /// Give up.
    Fail(ProviderError),
}

fn classify_token_error(response: &TokenErrorResponse) -> PollDecision {
    let detail = response
        .error_description
        .as_deref()
        .unwrap_or(response.error.as_str());
    match response.error.as_str() {
        "authorization_pending" => PollDecision::Wait,
        "slow_down" => PollDecision::SlowDown,
        "expired_token" => PollDecision::Fail(ProviderError::authentication(
            "device code expired before sign-in completed",
        )),
        "authorization_declined" | "access_denied" => PollDecision::Fail(
            ProviderError::authentication(format!("sign-in was declined: {}", detail)),
        ),
        other => PollDecision::Fail(ProviderError::authentication(format!(
            "sign-in failed ({}): {}",
            other, detail
        ))),
    }
}

type PromptFn = dyn Fn(&DeviceCode) + Send + Sync;

/// Interactive sign-in through the device authorization grant.
#[derive(Clone)]
pub struct DeviceCodeFlow {
    config: GraphConfig,
    http_client: reqwest::Client,
    prompt: Arc<PromptFn>,
}

impl fmt::Debug for DeviceCodeFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceCodeFlow")
            .field("tenant_id", &self.config.tenant_id)
            .field("client_id", &self.config.client_id)
            .finish_non_exhaustive()
    }
}

impl DeviceCodeFlow {
    /// Creates a flow that prints sign-in instructions to stderr.
    pub fn new(config: GraphConfig) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            config,
            http_client,
            prompt: Arc::new(|code: &DeviceCode| eprintln!("\n{}\n", code.instructions())),
        })
    }

    /// Replaces how sign-in instructions are shown.
    pub fn with_prompt(mut self, prompt: impl Fn(&DeviceCode) + Send + Sync + 'static) -> Self {
        self.prompt = Arc::new(prompt);
        self
    }

    /// Requests a device code for the configured app and scopes.
    pub async fn request_device_code(&self) -> ProviderResult<DeviceCode> {
        let scope = self.config.scope_param();
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("scope", scope.as_str()),
        ];

        let response = self
            .http_client
            .post(self.config.device_code_url())
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                ProviderError::authentication(format!("device code request failed: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::authentication(format!("failed to read response: {}", e))
        })?;

        if !status.is_success() {
            return Err(ProviderError::authentication(format!(
                "device code request failed ({}): {}",
                status, body
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::authentication(format!("invalid device code response: {}", e))
        })
    }

    /// Polls the token endpoint until sign-in completes or fails.
    pub async fn poll_token(&self, code: &DeviceCode) -> ProviderResult<BearerToken> {
        let deadline = Instant::now() + Duration::from_secs(code.expires_in);
        let mut interval = code.poll_interval();
        let params = [
            ("grant_type", DEVICE_CODE_GRANT),
            ("client_id", self.config.client_id.as_str()),
            ("device_code", code.device_code.as_str()),
        ];

        loop {
            if Instant::now() >= deadline {
                return Err(ProviderError::authentication(
                    "device code expired before sign-in completed",
                ));
            }
            tokio::time::sleep(interval).await;

            let response = self
                .http_client
                .post(self.config.token_url())
                .form(&params)
                .send()
                .await
                .map_err(|e| {
                    ProviderError::authentication(format!("token request failed: {}", e))
                })?;

            let status = response.status();
            let body = response.text().await.map_err(|e| {
                ProviderError::authentication(format!("failed to read response: {}", e))
            })?;

            if status.is_success() {
                let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
                    ProviderError::authentication(format!("invalid token response: {}", e))
                })?;
                info!(expires_in = ?token.expires_in, "signed in");
                return Ok(BearerToken::new(token.access_token));
            }

            let error: TokenErrorResponse = serde_json::from_str(&body).map_err(|_| {
                ProviderError::authentication(format!(
                    "token request failed ({}): {}",
                    status, body
                ))
            })?;

            match classify_token_error(&error) {
                PollDecision::Wait => debug!("authorization pending"),
                PollDecision::SlowDown => {
                    interval += SLOW_DOWN_STEP;
                    debug!(interval_secs = interval.as_secs(), "slowing down");
                }
                PollDecision::Fail(err) => return Err(err),
            }
        }
    }

    /// Runs the whole flow.
    pub async fn authorize(&self) -> ProviderResult<BearerToken> {
        let code = self.request_device_code().await?;
        (self.prompt)(&code);

        if self.config.open_browser {
            if let Err(e) = open::that(&code.verification_uri) {
                warn!("failed to open browser: {}", e);
            }
        }

        self.poll_token(&code).await
    }
}

impl CredentialProvider for DeviceCodeFlow {
    fn acquire(&self) -> BoxFuture<'_, ProviderResult<BearerToken>> {
        Box::pin(self.authorize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use mockito::Matcher;
    use std::sync::Mutex;

    fn config_for(url: &str) -> GraphConfig {
        GraphConfig::new("tenant-1", "client-1").with_authority(url)
    }

    fn error_response(error: &str) -> TokenErrorResponse {
        TokenErrorResponse {
            error: error.to_string(),
            error_description: None,
        }
    }

    #[test]
    fn classify_pending_and_slow_down() {
        assert!(matches!(
            classify_token_error(&error_response("authorization_pending")),
            PollDecision::Wait
        ));
        assert!(matches!(
            classify_token_error(&error_response("slow_down")),
            PollDecision::SlowDown
        ));
    }

    #[test]
    fn classify_terminal_errors() {
        for error in ["expired_token", "authorization_declined", "bad_verification_code"] {
            match classify_token_error(&error_response(error)) {
                PollDecision::Fail(err) => {
                    assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed)
                }
                other => panic!("unexpected decision for {}: {:?}", error, other),
            }
        }
    }

    #[test]
    fn device_code_defaults_interval() {
        let code: DeviceCode = serde_json::from_str(
            r#"{"user_code": "ABCD-1234", "device_code": "dc", "verification_uri": "https://microsoft.com/devicelogin", "expires_in": 900}"#,
        )
        .unwrap();
        assert_eq!(code.interval, 5);
        assert_eq!(
            code.instructions(),
            "To sign in, open https://microsoft.com/devicelogin and enter the code ABCD-1234"
        );
    }

    #[test]
    fn zero_interval_polls_every_second() {
        let mut code: DeviceCode = serde_json::from_str(
            r#"{"user_code": "ABCD-1234", "device_code": "dc", "verification_uri": "https://microsoft.com/devicelogin", "expires_in": 900, "interval": 0}"#,
        )
        .unwrap();
        assert_eq!(code.interval, 0);
        assert_eq!(code.poll_interval(), Duration::from_secs(1));

        code.interval = 7;
        assert_eq!(code.poll_interval(), Duration::from_secs(7));
    }

    #[tokio::test]
    async fn authorize_success() {
        let mut server = mockito::Server::new_async().await;
        let _device = server
            .mock("POST", "/tenant-1/oauth2/v2.0/devicecode")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("client_id".into(), "client-1".into()),
                Matcher::UrlEncoded("scope".into(), "https://graph.microsoft.com/.default".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"user_code": "ABCD-1234", "device_code": "dc-1", "verification_uri": "https://microsoft.com/devicelogin", "expires_in": 60, "interval": 0, "message": "Enter ABCD-1234"}"#,
            )
            .create_async()
            .await;
        let _token = server
            .mock("POST", "/tenant-1/oauth2/v2.0/token")
            .match_body(Matcher::UrlEncoded("device_code".into(), "dc-1".into()))
            .with_status(200)
            .with_body(r#"{"token_type": "Bearer", "access_token": "at-1", "expires_in": 3599}"#)
            .create_async()
            .await;

        let shown = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&shown);
        let flow = DeviceCodeFlow::new(config_for(&server.url()))
            .unwrap()
            .with_prompt(move |code| sink.lock().unwrap().push(code.instructions()));

        let token = flow.acquire().await.unwrap();
        assert_eq!(token.secret(), "at-1");
        assert_eq!(*shown.lock().unwrap(), vec!["Enter ABCD-1234".to_string()]);
    }

    #[tokio::test]
    async fn declined_sign_in_fails() {
        let mut server = mockito::Server::new_async().await;
        let _token = server
            .mock("POST", "/tenant-1/oauth2/v2.0/token")
            .with_status(400)
            .with_body(r#"{"error": "authorization_declined", "error_description": "AADSTS70000: user declined"}"#)
            .create_async()
            .await;

        let flow = DeviceCodeFlow::new(config_for(&server.url())).unwrap();
        let code = DeviceCode {
            user_code: "ABCD-1234".to_string(),
            device_code: "dc-1".to_string(),
            verification_uri: "https://microsoft.com/devicelogin".to_string(),
            expires_in: 60,
            interval: 0,
            message: None,
        };

        let err = flow.poll_token(&code).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
        assert!(err.message().contains("declined"));
    }

    #[tokio::test]
    async fn expired_code_stops_polling() {
        let flow = DeviceCodeFlow::new(config_for("http://127.0.0.1:1")).unwrap();
        let code = DeviceCode {
            user_code: "ABCD-1234".to_string(),
            device_code: "dc-1".to_string(),
            verification_uri: "https://microsoft.com/devicelogin".to_string(),
            expires_in: 0,
            interval: 0,
            message: None,
        };

        let err = flow.poll_token(&code).await.unwrap_err();
        assert!(err.message().contains("expired"));
    }

    #[tokio::test]
    async fn device_code_request_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _device = server
            .mock("POST", "/tenant-1/oauth2/v2.0/devicecode")
            .with_status(400)
            .with_body(r#"{"error": "invalid_client"}"#)
            .create_async()
            .await;

        let flow = DeviceCodeFlow::new(config_for(&server.url())).unwrap();
        let err = flow.acquire().await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
        assert!(err.message().contains("invalid_client"));
    }
}
