//! OpenAI-compatible chat/completions client.
//! Connection pooling via reqwest, a simple minimum-interval rate limiter,
//! no retries: a failed call surfaces once to the caller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Completion, CompletionError, CompletionRequest};
use crate::config::CompletionConfig;
use crate::metrics::{metric_names, MetricsRegistry};

/// Non-streaming chat/completions client. The credential never leaves the server.
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    /// Simple token-bucket: tracks the next allowed request time.
    next_allowed: Arc<tokio::sync::Mutex<Instant>>,
    min_interval: Duration,
    metrics: Arc<MetricsRegistry>,
}

impl ChatCompletionsClient {
    /// Build a client from config. Fails when no credential is configured.
    pub fn new(
        config: &CompletionConfig,
        metrics: Arc<MetricsRegistry>,
    ) -> Result<Self, CompletionError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(CompletionError::MissingCredential)?;

        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(config.timeout)
            .build()
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            next_allowed: Arc::new(tokio::sync::Mutex::new(Instant::now())),
            min_interval: config.min_interval,
            metrics,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Wait until the rate limiter allows a request.
    async fn rate_limit_wait(&self) {
        let mut next = self.next_allowed.lock().await;
        let now = Instant::now();
        if *next > now {
            tokio::time::sleep(*next - now).await;
        }
        *next = Instant::now() + self.min_interval;
    }
}

#[async_trait]
impl Completion for ChatCompletionsClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.rate_limit_wait().await;

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user}
            ],
            "temperature": request.sampling.temperature,
            "max_tokens": request.sampling.max_tokens
        });

        // Failures are timed too, so slow errors show up in the summary.
        let span = self.metrics.span(metric_names::COMPLETION_ROUNDTRIP);
        let result = self.round_trip(&body).await;
        let elapsed_ms = span.finish() / 1000.0;

        match &result {
            Ok(content) => debug!(
                model = %self.model,
                chars = content.chars().count(),
                elapsed_ms,
                "completion received"
            ),
            Err(e) => warn!(model = %self.model, error = %e, elapsed_ms, "completion failed"),
        }
        result
    }
}

impl ChatCompletionsClient {
    async fn round_trip(&self, body: &serde_json::Value) -> Result<String, CompletionError> {
        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: body_text.chars().take(200).collect(),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                CompletionError::Timeout
            } else {
                CompletionError::Malformed(e.to_string())
            }
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CompletionError::Malformed("response has no choices".into()))
    }
}

fn transport_error(e: reqwest::Error) -> CompletionError {
    if e.is_timeout() {
        CompletionError::Timeout
    } else {
        CompletionError::Transport(e.to_string())
    }
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageBody,
}

#[derive(Deserialize)]
struct ChatMessageBody {
    content: String,
}
