//! Upstream generation API client
//!
//! One `generateContent` call per chat request: no retries, no backoff. The
//! call is bounded by the configured timeout and every failure is mapped to a
//! single [`Error`] variant:
//!
//! | Failure                         | Error               |
//! |---------------------------------|---------------------|
//! | no API key                      | `Error::Config`     |
//! | non-2xx status                  | `Error::Upstream`   |
//! | timeout / DNS / connection      | `Error::Transport`  |
//! | body missing the generated text | `Error::Parse`      |

use crate::config::UpstreamConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use zeroize::Zeroizing;

/// Anything that turns a prompt into generated text
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one prompt and return the generated text
    async fn send(&self, prompt: &str) -> Result<String>;

    /// Whether the backend has the credentials it needs
    fn is_configured(&self) -> bool;
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

// =============================================================================
// Gemini client
// =============================================================================

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: Option<Zeroizing<String>>,
}

impl GeminiClient {
    /// Build a client from configuration
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Self::with_timeout(config, Duration::from_secs(config.timeout_secs))
    }

    /// Build a client with an explicit request timeout
    pub fn with_timeout(config: &UpstreamConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("notechat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        let api_key = config
            .api_key
            .as_ref()
            .filter(|k| !k.is_empty())
            .map(|k| Zeroizing::new(k.clone()));

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Fully qualified `generateContent` URL (without the key)
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for GeminiClient {
    async fn send(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| Error::Config("Gemini API key not configured".to_string()))?;

        let payload = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(prompt_len = prompt.len(), endpoint = %self.endpoint, "Calling upstream");

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::from(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::from(e.without_url()))?;

        if !status.is_success() {
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("Invalid upstream response: {}", e)))?;

        parsed.into_text().ok_or_else(|| {
            Error::Parse("Upstream response has no candidates[0].content.parts[0].text".to_string())
        })
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
