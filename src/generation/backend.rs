use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::service::error::ScriptError;

pub const GENERATION_SERVICE: &str = "generation";

// ============================================================================
// TextInference trait: prompt in, single completion out
// ============================================================================

#[async_trait]
pub trait TextInference: Send + Sync {
    async fn infer_text(&self, prompt: &str) -> Result<String, ScriptError>;
}

fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ScriptError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ScriptError::external(GENERATION_SERVICE, e))
}

fn non_empty(text: String) -> Result<String, ScriptError> {
    if text.trim().is_empty() {
        Err(ScriptError::external(GENERATION_SERVICE, "empty completion"))
    } else {
        Ok(text)
    }
}

// ============================================================================
// Gemini Backend (Google Generative Language API)
// ============================================================================

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

pub struct GeminiBackend {
    pub endpoint: String,
    pub model: String,
    api_key: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiCandidateContent>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiBackend {
    pub fn new(
        endpoint: &str,
        model: &str,
        api_key: &str,
        timeout_secs: u64,
    ) -> Result<Self, ScriptError> {
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            timeout_secs,
            client: http_client(timeout_secs)?,
        })
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl TextInference for GeminiBackend {
    async fn infer_text(&self, prompt: &str) -> Result<String, ScriptError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        debug!("gemini request: model={}, prompt {} chars", self.model, prompt.len());

        let response = self
            .client
            .post(self.url())
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| ScriptError::from_reqwest(GENERATION_SERVICE, self.timeout_secs, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScriptError::external(
                GENERATION_SERVICE,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ScriptError::from_reqwest(GENERATION_SERVICE, self.timeout_secs, e))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .unwrap_or_default();

        non_empty(text)
    }
}

// ============================================================================
// Ollama Backend
// ============================================================================

pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5:1.5b";

pub struct OllamaBackend {
    pub endpoint: String,
    pub model: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaBackend {
    pub fn new(endpoint: &str, model: &str, timeout_secs: u64) -> Result<Self, ScriptError> {
        Ok(Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            timeout_secs,
            client: http_client(timeout_secs)?,
        })
    }
}

#[async_trait]
impl TextInference for OllamaBackend {
    async fn infer_text(&self, prompt: &str) -> Result<String, ScriptError> {
        let request = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScriptError::from_reqwest(GENERATION_SERVICE, self.timeout_secs, e))?
            .error_for_status()
            .map_err(|e| ScriptError::external(GENERATION_SERVICE, e))?;

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| ScriptError::from_reqwest(GENERATION_SERVICE, self.timeout_secs, e))?;

        non_empty(ollama_response.response)
    }
}

// ============================================================================
// Mock Backend (for testing without a model)
// ============================================================================

/// Returns a canned completion for every prompt.
pub struct MockTextInference {
    pub response: String,
}

impl MockTextInference {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

#[async_trait]
impl TextInference for MockTextInference {
    async fn infer_text(&self, _prompt: &str) -> Result<String, ScriptError> {
        non_empty(self.response.clone())
    }
}
