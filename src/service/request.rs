use std::path::{Path, PathBuf};

use serde::Deserialize;
use tempfile::TempPath;
use tracing::warn;

use crate::screen::naming::{case_identifier, is_valid_identifier};
use crate::screen::screen_model::{ElementType, UiElement, VisualContext};
use crate::service::error::ScriptError;
use crate::vision::vision_model::BoundingBox;

/// Where the screenshot for a request lives.
#[derive(Debug)]
pub enum ScreenshotSource {
    /// Caller-owned file, left in place.
    Path(PathBuf),
    /// Uploaded scratch file, removed when the request finishes.
    Upload(TempPath),
}

impl ScreenshotSource {
    pub fn path(&self) -> &Path {
        match self {
            ScreenshotSource::Path(p) => p.as_path(),
            ScreenshotSource::Upload(t) => &**t,
        }
    }
}

/// Inputs of one generate call.
#[derive(Debug, Default)]
pub struct GenerateRequest {
    pub screenshot: Option<ScreenshotSource>,
    pub use_case: String,
    pub framework: String,
    pub pattern: Option<String>,
    /// JSON array of elements; takes precedence over the screenshot.
    pub predefined_elements: Option<String>,
}

impl GenerateRequest {
    pub fn new(framework: &str) -> Self {
        Self {
            framework: framework.to_string(),
            ..Self::default()
        }
    }

    pub fn with_use_case(mut self, use_case: &str) -> Self {
        self.use_case = use_case.to_string();
        self
    }

    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    pub fn with_screenshot(mut self, screenshot: ScreenshotSource) -> Self {
        self.screenshot = Some(screenshot);
        self
    }

    pub fn with_predefined_elements(mut self, json: &str) -> Self {
        self.predefined_elements = Some(json.to_string());
        self
    }

    /// Pattern id with blanks treated as absent.
    pub fn pattern_id(&self) -> Option<&str> {
        self.pattern.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    /// Predefined list with blanks treated as absent.
    pub fn predefined_json(&self) -> Option<&str> {
        self.predefined_elements
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

// ============================================================================
// Predefined element parsing
// ============================================================================

/// Accepts the analysed shape (`text`, `caseIdentifier`) and the hand-written
/// shape (`name`, `identifier`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PredefinedElement {
    #[serde(rename = "type")]
    element_type: String,
    #[serde(default, alias = "name")]
    text: String,
    #[serde(default, alias = "identifier", alias = "caseName")]
    case_identifier: Option<String>,
    #[serde(default)]
    bounds: BoundingBox,
    #[serde(default, alias = "visualProperties")]
    visual_context: VisualContext,
}

pub fn parse_predefined_elements(json: &str) -> Result<Vec<UiElement>, ScriptError> {
    let raw: Vec<PredefinedElement> = serde_json::from_str(json)
        .map_err(|e| ScriptError::validation(format!("Invalid predefinedElements JSON: {}", e)))?;

    raw.into_iter().map(into_element).collect()
}

fn into_element(raw: PredefinedElement) -> Result<UiElement, ScriptError> {
    let element_type = ElementType::parse(&raw.element_type).ok_or_else(|| {
        ScriptError::validation(format!("Unknown element type '{}'", raw.element_type))
    })?;

    let given_id = raw
        .case_identifier
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());

    let text = match (raw.text.trim(), &given_id) {
        ("", Some(id)) => id.clone(),
        ("", None) => {
            return Err(ScriptError::validation(
                "Predefined element needs a text/name or an identifier",
            ));
        }
        (text, _) => text.to_string(),
    };

    let case_identifier = match given_id {
        Some(id) if is_valid_identifier(&id) => id,
        Some(id) => {
            warn!("replacing invalid identifier '{}' for '{}'", id, text);
            case_identifier(&text, element_type)
        }
        None => case_identifier(&text, element_type),
    };

    Ok(UiElement {
        element_type,
        text,
        case_identifier,
        bounds: raw.bounds,
        visual_context: raw.visual_context,
    })
}
