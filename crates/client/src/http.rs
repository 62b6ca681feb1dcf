//! reqwest-backed [`UserApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use tokio_util::sync::CancellationToken;

use relay_common::config::AppConfig;
use relay_common::error::{AttemptFailure, DeliveryError, FetchError};
use relay_common::types::{User, UserPayload};

use crate::UserApi;
use crate::retry::{DeliveryPolicy, deliver_with_retry};

const USER_AGENT: &str = concat!("user-relay/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the source and destination APIs.
///
/// Holds one `reqwest::Client` for the lifetime of the run so the fetch and
/// every delivery share its connection pool.
#[derive(Debug, Clone)]
pub struct HttpUserApi {
    client: reqwest::Client,
    source_url: String,
    policy: DeliveryPolicy,
}

impl HttpUserApi {
    pub fn new(
        source_url: impl Into<String>,
        timeout: Duration,
        policy: DeliveryPolicy,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self::with_client(client, source_url, policy))
    }

    /// Wrap an already-built client.
    pub fn with_client(
        client: reqwest::Client,
        source_url: impl Into<String>,
        policy: DeliveryPolicy,
    ) -> Self {
        Self {
            client,
            source_url: source_url.into(),
            policy,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.source_url.clone(),
            config.http_timeout(),
            DeliveryPolicy::from_config(config),
        )
    }

    pub fn policy(&self) -> &DeliveryPolicy {
        &self.policy
    }

    /// One POST of an already-encoded payload.
    async fn post_once(
        &self,
        cancel: &CancellationToken,
        destination_url: &str,
        body: Vec<u8>,
    ) -> Result<(), AttemptFailure> {
        let exchange = async {
            let response = self
                .client
                .post(destination_url)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await
                .map_err(|e| AttemptFailure::Transport(e.to_string()))?;

            let status = response.status();
            if status.is_success() {
                return Ok(());
            }

            let body = response.text().await.unwrap_or_default();
            Err(AttemptFailure::Status {
                status: status.as_u16(),
                body,
            })
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AttemptFailure::Transport("request cancelled".to_string())),
            result = exchange => result,
        }
    }
}

#[async_trait]
impl UserApi for HttpUserApi {
    async fn fetch_users(&self, cancel: &CancellationToken) -> Result<Vec<User>, FetchError> {
        let exchange = async {
            let response = self
                .client
                .get(&self.source_url)
                .send()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            if response.status() != StatusCode::OK {
                return Err(FetchError::Status(response.status().as_u16()));
            }

            response
                .bytes()
                .await
                .map_err(|e| FetchError::Transport(format!("failed to read response body: {e}")))
        };

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(FetchError::Transport("request cancelled".to_string()));
            }
            result = exchange => result?,
        };

        let users: Vec<User> =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        tracing::debug!(url = %self.source_url, count = users.len(), "API A: users fetched");
        Ok(users)
    }

    async fn send_user(
        &self,
        cancel: &CancellationToken,
        payload: &UserPayload,
        destination_url: &str,
    ) -> Result<(), DeliveryError> {
        let body = serde_json::to_vec(payload).map_err(|e| DeliveryError::Encode(e.to_string()))?;

        match deliver_with_retry(&self.policy, cancel, |_| {
            self.post_once(cancel, destination_url, body.clone())
        })
        .await
        {
            Ok(attempt) => {
                tracing::info!(email = %payload.email, attempt, "API B: user sent");
                Ok(())
            }
            Err(e) => {
                if !e.is_cancelled() {
                    tracing::error!(
                        email = %payload.email,
                        attempts = e.attempts(),
                        error = %e,
                        "API B: delivery failed"
                    );
                }
                Err(e)
            }
        }
    }
}
