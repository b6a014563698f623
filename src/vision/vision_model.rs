use serde::{Deserialize, Serialize};

// ============================================================================
// OCR / vision annotation model (mirrors the annotate response shape)
// ============================================================================

/// A polygon corner. Pixel space for text spans, 0..1 for normalized object
/// vertices. The annotate API omits zero coordinates, hence the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Corner points of a detected region, clockwise from the top-left.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundingBox {
    pub vertices: Vec<Vertex>,
}

impl BoundingBox {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle helper.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            vertices: vec![
                Vertex::new(x, y),
                Vertex::new(x + width, y),
                Vertex::new(x + width, y + height),
                Vertex::new(x, y + height),
            ],
        }
    }

    /// Top edge (first corner's y), if the box has any corners.
    pub fn top(&self) -> Option<f64> {
        self.vertices.first().map(|v| v.y)
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Scale normalized (0..1) corners into the pixel space of `frame`.
    pub fn scaled(&self, frame: ImageFrame) -> Self {
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|v| Vertex::new(v.x * frame.width as f64, v.y * frame.height as f64))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingPoly {
    #[serde(default)]
    pub vertices: BoundingBox,
    #[serde(default)]
    pub normalized_vertices: BoundingBox,
}

/// One detected text span. Index 0 of a result aggregates the whole page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnnotation {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bounding_poly: BoundingPoly,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl TextAnnotation {
    pub fn new(description: &str, bounds: BoundingBox) -> Self {
        Self {
            description: description.to_string(),
            bounding_poly: BoundingPoly {
                vertices: bounds,
                normalized_vertices: BoundingBox::default(),
            },
            locale: None,
        }
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounding_poly.vertices
    }
}

/// A UI-object region found by a separate detection pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedObject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub bounding_poly: BoundingPoly,
}

impl LocalizedObject {
    /// The object's region in span pixel space.
    ///
    /// Normalized corners are scaled when the frame is known; without a frame
    /// they are compared as-is, matching the raw annotate output.
    pub fn pixel_box(&self, frame: Option<ImageFrame>) -> BoundingBox {
        let poly = &self.bounding_poly;
        if poly.normalized_vertices.is_empty() {
            return poly.vertices.clone();
        }
        match frame {
            Some(frame) => poly.normalized_vertices.scaled(frame),
            None => poly.normalized_vertices.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    #[serde(default)]
    pub red: f64,
    #[serde(default)]
    pub green: f64,
    #[serde(default)]
    pub blue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorInfo {
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub pixel_fraction: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DominantColors {
    #[serde(default)]
    pub colors: Vec<ColorInfo>,
}

/// Page color statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProperties {
    #[serde(default)]
    pub dominant_colors: Option<DominantColors>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotateError {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Full result of one annotate call: text spans, objects and color stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateResult {
    #[serde(default)]
    pub text_annotations: Vec<TextAnnotation>,
    #[serde(default)]
    pub localized_object_annotations: Vec<LocalizedObject>,
    #[serde(default)]
    pub image_properties_annotation: Option<ImageProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<AnnotateError>,
}

/// Pixel dimensions of the analysed screenshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFrame {
    pub width: u32,
    pub height: u32,
}
