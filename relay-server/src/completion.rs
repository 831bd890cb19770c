//! Streaming completion client for the upstream chat API.
//!
//! The request is always issued with `stream: true`; the response arrives as
//! server-sent events whose `data:` payloads each carry a content delta. The
//! client accumulates the fragments and hands back the assembled reply as a
//! single string.

use async_trait::async_trait;
use futures_util::StreamExt;
use relay_common::{Error, LlmConfig, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::store::Turn;

/// Fixed sampling parameters sent with every completion request.
const TEMPERATURE: f64 = 1.0;
const MAX_TOKENS: u32 = 1024;
const TOP_P: f64 = 1.0;

/// Seam between the request handler and the upstream model.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Produce an assistant reply for the given turn history.
    async fn complete(&self, turns: &[Turn]) -> Result<String>;
}

/// Completion client for the Groq OpenAI-compatible API.
pub struct GroqClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl GroqClient {
    /// Create a new client with a bearer token and upstream settings.
    pub fn new(api_key: &str, config: &LlmConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .unwrap_or_else(|_| HeaderValue::from_static("")),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, turns: &[Turn]) -> Result<String> {
        let url = format!(
            "{}/openai/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: turns
                .iter()
                .map(|t| WireMessage {
                    role: t.role.clone(),
                    content: t.content.clone(),
                })
                .collect(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            top_p: TOP_P,
            stream: true,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("API error ({}): {}", status, body)));
        }

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut content = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| Error::Upstream(format!("Stream read failed: {}", e)))?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            // SSE events are separated by a blank line
            while let Some(pos) = buffer.find("\n\n") {
                let event_text = buffer[..pos].to_string();
                buffer = buffer[pos + 2..].to_string();

                if let Some(done) = accumulate_event(&event_text, &mut content) {
                    if done {
                        return Ok(content);
                    }
                }
            }
        }

        // Stream closed without a [DONE] marker; return what we collected
        Ok(content)
    }
}

/// Fold one SSE event into the accumulated content.
///
/// Returns `Some(true)` on the `[DONE]` sentinel, `Some(false)` after a data
/// payload, and `None` for events without a data line (comments, keepalives).
/// Unparseable payloads are logged and skipped rather than aborting the
/// stream.
fn accumulate_event(event_text: &str, content: &mut String) -> Option<bool> {
    let data_line = event_text
        .lines()
        .find_map(|line| line.strip_prefix("data:"))
        .map(str::trim)?;

    if data_line == "[DONE]" {
        return Some(true);
    }

    match serde_json::from_str::<StreamChunk>(data_line) {
        Ok(chunk) => {
            for choice in chunk.choices {
                if let Some(fragment) = choice.delta.content {
                    content.push_str(&fragment);
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Skipping unparseable stream event");
        }
    }
    Some(false)
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Debug, Deserialize, Default)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}
