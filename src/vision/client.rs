use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::service::error::ScriptError;
use crate::vision::vision_model::AnnotateResult;

pub const VISION_SERVICE: &str = "vision";
pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

// ============================================================================
// VisionBackend trait: text detection, object localization, color stats
// ============================================================================

#[async_trait]
pub trait VisionBackend: Send + Sync {
    async fn annotate(&self, image: &[u8]) -> Result<AnnotateResult, ScriptError>;
}

// ============================================================================
// Google Cloud Vision backend
// ============================================================================

pub struct GoogleVisionBackend {
    pub endpoint: String,
    api_key: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct AnnotateBatch<'a> {
    requests: Vec<AnnotateImageRequest<'a>>,
}

#[derive(Serialize)]
struct AnnotateImageRequest<'a> {
    image: ImageContent,
    features: Vec<Feature<'a>>,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Deserialize)]
struct AnnotateBatchResponse {
    #[serde(default)]
    responses: Vec<AnnotateResult>,
}

impl GoogleVisionBackend {
    pub fn new(endpoint: &str, api_key: &str, timeout_secs: u64) -> Result<Self, ScriptError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ScriptError::external(VISION_SERVICE, e))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            timeout_secs,
            client,
        })
    }
}

#[async_trait]
impl VisionBackend for GoogleVisionBackend {
    async fn annotate(&self, image: &[u8]) -> Result<AnnotateResult, ScriptError> {
        let batch = AnnotateBatch {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(image),
                },
                features: ["TEXT_DETECTION", "OBJECT_LOCALIZATION", "IMAGE_PROPERTIES"]
                    .into_iter()
                    .map(|kind| Feature { kind })
                    .collect(),
            }],
        };

        debug!("annotate request: {} image bytes", image.len());

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", &self.api_key)])
            .json(&batch)
            .send()
            .await
            .map_err(|e| ScriptError::from_reqwest(VISION_SERVICE, self.timeout_secs, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScriptError::external(
                VISION_SERVICE,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let parsed: AnnotateBatchResponse = response
            .json()
            .await
            .map_err(|e| ScriptError::from_reqwest(VISION_SERVICE, self.timeout_secs, e))?;

        let result = parsed.responses.into_iter().next().unwrap_or_default();
        if let Some(err) = &result.error {
            return Err(ScriptError::external(
                VISION_SERVICE,
                format!("code {}: {}", err.code, err.message),
            ));
        }

        Ok(result)
    }
}

// ============================================================================
// Fixture backend: replays a saved annotate response
// ============================================================================

/// Serves a recorded annotate result from disk, whatever image is passed in.
pub struct FixtureVisionBackend {
    pub path: PathBuf,
}

impl FixtureVisionBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl VisionBackend for FixtureVisionBackend {
    async fn annotate(&self, _image: &[u8]) -> Result<AnnotateResult, ScriptError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ScriptError::FileSystem {
                path: self.path.clone(),
                source,
            })?;

        // Accept both a bare result and the batch envelope.
        if let Ok(batch) = serde_json::from_str::<AnnotateBatchResponse>(&content) {
            if let Some(first) = batch.responses.into_iter().next() {
                return Ok(first);
            }
        }
        serde_json::from_str(&content).map_err(|e| ScriptError::external(VISION_SERVICE, e))
    }
}

// ============================================================================
// Disabled backend
// ============================================================================

/// Used when no vision provider is configured: screenshots cannot be analysed.
pub struct DisabledVisionBackend;

#[async_trait]
impl VisionBackend for DisabledVisionBackend {
    async fn annotate(&self, _image: &[u8]) -> Result<AnnotateResult, ScriptError> {
        Err(ScriptError::external(
            VISION_SERVICE,
            "no vision provider configured; supply predefinedElements instead",
        ))
    }
}

// ============================================================================
// Mock backend (for testing without network access)
// ============================================================================

pub struct MockVisionBackend {
    pub result: AnnotateResult,
}

#[async_trait]
impl VisionBackend for MockVisionBackend {
    async fn annotate(&self, _image: &[u8]) -> Result<AnnotateResult, ScriptError> {
        Ok(self.result.clone())
    }
}
