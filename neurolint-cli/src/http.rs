//! HTTP transport for a remote NeuroLint API.

use std::time::Duration;

use neurolint_core::config::AppConfig;
use neurolint_core::domain::{
    AnalysisRequest, AnalysisResult, EngineStatus, FixRequest, FixResult, LayerInfo,
};
use neurolint_core::wire::{RawAnalysisResponse, RawFixResponse, normalize_analysis, normalize_fix};
use neurolint_core::{NeuroLintError, Transport, TransportFuture};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::CliResult;

const CLIENT_ID_HEADER: &str = "X-Client-ID";
const USER_AGENT: &str = concat!("neurolint-cli/", env!("CARGO_PKG_VERSION"));
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Error body returned by the API on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Sends requests to `{baseUrl}/analyze`, `/fix`, `/status` and `/layers`.
pub(crate) struct HttpTransport {
    client: Client,
    config: AppConfig,
    client_id: String,
    retry_delay: Duration,
}

impl HttpTransport {
    /// Build a transport using the configured timeout.
    pub(crate) fn new(config: AppConfig, client_id: impl Into<String>) -> CliResult<Self> {
        let client = Client::builder()
            .timeout(config.api.timeout_duration())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            config,
            client_id: client_id.into(),
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    /// Base delay between retries; the n-th retry waits n times this long.
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    async fn execute<T, F>(&self, endpoint: &str, build: F) -> Result<T, NeuroLintError>
    where
        T: DeserializeOwned,
        F: Fn(&Client, String) -> RequestBuilder,
    {
        let url = self.config.api_url(endpoint);
        let retries = self.config.api.retries;
        let mut attempt = 0;
        loop {
            let sent = build(&self.client, url.clone())
                .header(CLIENT_ID_HEADER, &self.client_id)
                .send()
                .await;
            let retryable = match &sent {
                Ok(response) => response.status().is_server_error(),
                Err(err) => err.is_connect(),
            };
            if !retryable || attempt >= retries {
                let response = sent.map_err(|err| NeuroLintError::Transport(err.to_string()))?;
                return read_response(response).await;
            }
            attempt += 1;
            log::warn!("{url} failed, retrying ({attempt}/{retries})");
            tokio::time::sleep(self.retry_delay * attempt).await;
        }
    }
}

async fn read_response<T: DeserializeOwned>(response: Response) -> Result<T, NeuroLintError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(NeuroLintError::Transport(error_message(status, &body)));
    }
    response
        .json::<T>()
        .await
        .map_err(|err| NeuroLintError::InvalidResponse(err.to_string()))
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
        .filter(|error| !error.is_empty())
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        })
}

impl Transport for HttpTransport {
    fn analyze<'a>(&'a self, request: &'a AnalysisRequest) -> TransportFuture<'a, AnalysisResult> {
        Box::pin(async move {
            let raw: RawAnalysisResponse = self
                .execute("analyze", |client, url| client.post(url).json(request))
                .await?;
            Ok(normalize_analysis(raw))
        })
    }

    fn fix<'a>(&'a self, request: &'a FixRequest) -> TransportFuture<'a, FixResult> {
        Box::pin(async move {
            let raw: RawFixResponse = self
                .execute("fix", |client, url| client.post(url).json(request))
                .await?;
            Ok(normalize_fix(raw))
        })
    }

    fn status<'a>(&'a self) -> TransportFuture<'a, EngineStatus> {
        Box::pin(self.execute("status", |client, url| client.get(url)))
    }

    fn layers<'a>(&'a self) -> TransportFuture<'a, Vec<LayerInfo>> {
        Box::pin(self.execute("layers", |client, url| client.get(url)))
    }
}
