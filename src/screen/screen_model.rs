use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vision::vision_model::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    Button,
    TextField,
    StaticText,
}

impl ElementType {
    /// Suffix appended to generated case identifiers.
    pub fn suffix(&self) -> &'static str {
        match self {
            ElementType::Button => "Btn",
            ElementType::TextField => "Txt",
            ElementType::StaticText => "Lbl",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Button => "button",
            ElementType::TextField => "textField",
            ElementType::StaticText => "staticText",
        }
    }

    /// Parse the wire name; accepts a few spellings seen in hand-written lists.
    pub fn parse(name: &str) -> Option<ElementType> {
        match name.trim().to_lowercase().as_str() {
            "button" | "btn" => Some(ElementType::Button),
            "textfield" | "text_field" | "input" | "field" => Some(ElementType::TextField),
            "statictext" | "static_text" | "label" | "text" => Some(ElementType::StaticText),
            _ => None,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vertical screen region a span falls in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenPosition {
    Header,
    #[default]
    Content,
    Footer,
}

/// Visual signals derived once per span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualContext {
    #[serde(default)]
    pub has_distinct_background: bool,
    #[serde(default)]
    pub is_in_button_like_object: bool,
    #[serde(default, alias = "hasStandardButtonSize")]
    pub has_standard_size: bool,
    #[serde(default, alias = "isAlignedWithOthers")]
    pub is_aligned: bool,
    #[serde(default)]
    pub position: ScreenPosition,
}

/// A classified UI element ready to be named in generated code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiElement {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub text: String,
    pub case_identifier: String,
    #[serde(default)]
    pub bounds: BoundingBox,
    #[serde(default)]
    pub visual_context: VisualContext,
}

impl UiElement {
    pub fn top(&self) -> f64 {
        self.bounds.top().unwrap_or(0.0)
    }
}
