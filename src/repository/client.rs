//! HTTP client for the field sales backend.
//!
//! Every backend answer is wrapped in `{ ok, error?, message?, ...payload }`.
//! Reads and writes map failures differently: a refused write is an
//! [`AppError::ActionRejected`], a failed read is a network or backend error.

use std::time::Duration;

use reqwest::{header, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::UpstreamConfig,
    error::{AppError, AppResult},
    models::SessionToken,
};

/// Response envelope shared by all backend endpoints
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub ok: bool,
    pub error: Option<String>,
    pub message: Option<String>,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Envelope<T> {
    fn failure_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "Request failed".to_string())
    }
}

/// Payload of responses that carry nothing but the envelope
#[derive(Debug, Default, Deserialize)]
pub struct Empty {}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Read,
    Write,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session_cookie: String,
}

impl ApiClient {
    pub fn new(config: &UpstreamConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::Internal(format!("Invalid upstream URL '{}': {}", config.base_url, e))
        })?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            session_cookie: config.session_cookie.clone(),
        })
    }

    /// Join path segments onto the base URL, percent-encoding each one
    fn url(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Upstream URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn cookie(&self, token: &SessionToken) -> String {
        format!("{}={}", self.session_cookie, token.as_str())
    }

    /// GET a JSON resource
    pub async fn get<T: DeserializeOwned>(
        &self,
        token: &SessionToken,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> AppResult<T> {
        let url = self.url(segments)?;
        tracing::debug!("GET {}", url.path());

        let response = self
            .http
            .get(url)
            .query(query)
            .header(header::COOKIE, self.cookie(token))
            .send()
            .await?;

        Self::read_envelope(response, Call::Read).await
    }

    /// PATCH a JSON body
    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        token: &SessionToken,
        segments: &[&str],
        body: &B,
    ) -> AppResult<T> {
        let url = self.url(segments)?;
        let request_id = Uuid::new_v4();
        tracing::debug!(%request_id, "PATCH {}", url.path());

        let response = self
            .http
            .patch(url)
            .header(header::COOKIE, self.cookie(token))
            .header("x-request-id", request_id.to_string())
            .json(body)
            .send()
            .await?;

        Self::read_envelope(response, Call::Write).await
    }

    async fn read_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
        call: Call,
    ) -> AppResult<T> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body: ErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
            return Err(failure(call, status, body.error.or(body.message)));
        }

        let envelope: Envelope<T> = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::Upstream(format!("Malformed backend response: {}", e)))?;

        if envelope.ok {
            Ok(envelope.body)
        } else {
            let message = envelope.failure_message();
            tracing::warn!(?call, "Backend answered ok=false: {}", message);
            Err(match call {
                Call::Read => AppError::Upstream(message),
                Call::Write => AppError::ActionRejected(message),
            })
        }
    }
}

/// Map a non-2xx status to the error surfaced to the dashboard
fn failure(call: Call, status: StatusCode, message: Option<String>) -> AppError {
    let message = message.unwrap_or_else(|| format!("Backend returned {}", status));
    match status {
        StatusCode::UNAUTHORIZED => AppError::Authentication(message),
        s if call == Call::Write && s.is_client_error() => AppError::ActionRejected(message),
        StatusCode::FORBIDDEN => AppError::Authorization(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        _ => AppError::Network(message),
    }
}
