#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, RgbImage};
use screen_script::generation::backend::{MockTextInference, TextInference};
use screen_script::screen::classifier::Classifier;
use screen_script::screen::naming::case_identifier;
use screen_script::screen::screen_model::{ElementType, ScreenPosition, UiElement, VisualContext};
use screen_script::service::script_service::ScriptService;
use screen_script::templates::registry::TemplateRegistry;
use screen_script::vision::client::{MockVisionBackend, VisionBackend};
use screen_script::vision::vision_model::{
    AnnotateResult, BoundingBox, BoundingPoly, Color, ColorInfo, DominantColors, ImageProperties,
    LocalizedObject, TextAnnotation, Vertex,
};

pub const GENERATED: &str = "test('generated', async () => {});";

/// Text span with an axis-aligned pixel box.
pub fn span(text: &str, x: f64, y: f64, width: f64, height: f64) -> TextAnnotation {
    TextAnnotation::new(text, BoundingBox::rect(x, y, width, height))
}

/// Annotate result with the page-wide aggregate span at index 0.
pub fn annotate(spans: Vec<TextAnnotation>) -> AnnotateResult {
    let full_text = spans
        .iter()
        .map(|s| s.description.clone())
        .collect::<Vec<_>>()
        .join("\n");

    let mut text_annotations = vec![span(&full_text, 0.0, 0.0, 1000.0, 1000.0)];
    text_annotations.extend(spans);

    AnnotateResult {
        text_annotations,
        ..AnnotateResult::default()
    }
}

/// Page colors with one bright, dominant swatch.
pub fn bright_page() -> ImageProperties {
    ImageProperties {
        dominant_colors: Some(DominantColors {
            colors: vec![ColorInfo {
                color: Color {
                    red: 255.0,
                    green: 120.0,
                    blue: 0.0,
                },
                score: 0.8,
                pixel_fraction: 0.4,
            }],
        }),
    }
}

pub fn pixel_object(name: &str, x: f64, y: f64, width: f64, height: f64) -> LocalizedObject {
    LocalizedObject {
        name: name.to_string(),
        score: 0.9,
        bounding_poly: BoundingPoly {
            vertices: BoundingBox::rect(x, y, width, height),
            normalized_vertices: BoundingBox::default(),
        },
    }
}

pub fn normalized_object(name: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> LocalizedObject {
    LocalizedObject {
        name: name.to_string(),
        score: 0.9,
        bounding_poly: BoundingPoly {
            vertices: BoundingBox::default(),
            normalized_vertices: BoundingBox::new(vec![
                Vertex::new(x0, y0),
                Vertex::new(x1, y0),
                Vertex::new(x1, y1),
                Vertex::new(x0, y1),
            ]),
        },
    }
}

pub fn element(element_type: ElementType, text: &str) -> UiElement {
    element_at(element_type, text, ScreenPosition::Content)
}

pub fn element_at(element_type: ElementType, text: &str, position: ScreenPosition) -> UiElement {
    UiElement {
        element_type,
        text: text.to_string(),
        case_identifier: case_identifier(text, element_type),
        bounds: BoundingBox::rect(0.0, 0.0, 100.0, 30.0),
        visual_context: VisualContext {
            position,
            ..VisualContext::default()
        },
    }
}

pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, ImageFormat::Png)
}

/// OCR output for a small login screen, 200x200 px.
pub fn login_annotation() -> AnnotateResult {
    annotate(vec![
        span("Sign In", 20.0, 10.0, 80.0, 20.0),
        span("Email", 20.0, 80.0, 120.0, 20.0),
        span("5", 180.0, 180.0, 10.0, 10.0),
    ])
}

pub fn service_with(
    vision: Arc<dyn VisionBackend>,
    generator: Arc<dyn TextInference>,
) -> ScriptService {
    ScriptService::new(
        Arc::new(TemplateRegistry::builtin()),
        Classifier::default(),
        vision,
        generator,
    )
}

pub fn mock_service(result: AnnotateResult) -> ScriptService {
    service_with(
        Arc::new(MockVisionBackend { result }),
        Arc::new(MockTextInference::new(GENERATED)),
    )
}

pub const LOGIN_ELEMENTS_JSON: &str = r#"[
    {"type": "textField", "name": "Email"},
    {"type": "button", "name": "Sign In", "identifier": "signInBtn"}
]"#;
