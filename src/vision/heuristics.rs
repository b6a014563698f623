use serde::{Deserialize, Serialize};

use crate::screen::screen_model::ScreenPosition;
use crate::vision::vision_model::{BoundingBox, ImageFrame, ImageProperties, LocalizedObject};

// ============================================================================
// Tunable thresholds
// ============================================================================

/// Thresholds for the geometric heuristics and duplicate detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    /// Accepted height band for interactive elements, in pixels.
    pub min_height: f64,
    pub max_height: f64,
    /// Max top-edge distance for two regions to count as one row.
    pub alignment_tolerance: f64,
    /// Slack allowed when testing span-inside-object containment.
    pub containment_tolerance: f64,
    /// Max top-edge distance for two same-text elements to be duplicates.
    pub duplicate_tolerance: f64,
    /// Header/footer boundaries as fractions of the screenshot height.
    pub header_fraction: f64,
    pub footer_fraction: f64,
    /// Height assumed when the screenshot size is unknown.
    pub nominal_height: f64,
    /// A dominant swatch must beat this score...
    pub contrast_min_score: f64,
    /// ...and have one channel above this value.
    pub contrast_min_channel: f64,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            min_height: 24.0,
            max_height: 60.0,
            alignment_tolerance: 10.0,
            containment_tolerance: 5.0,
            duplicate_tolerance: 10.0,
            header_fraction: 0.1,
            footer_fraction: 0.8,
            nominal_height: 1000.0,
            contrast_min_score: 0.5,
            contrast_min_channel: 200.0,
        }
    }
}

// ============================================================================
// Geometry
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Area {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Origin and size from the first and diagonally opposite corner.
///
/// Fewer than three corners yields a zero-size area.
pub fn area(bounds: &BoundingBox) -> Area {
    let v = &bounds.vertices;
    if v.len() < 3 {
        return v
            .first()
            .map(|first| Area {
                x: first.x,
                y: first.y,
                ..Area::default()
            })
            .unwrap_or_default();
    }

    Area {
        x: v[0].x,
        y: v[0].y,
        width: (v[2].x - v[0].x).max(0.0),
        height: (v[2].y - v[0].y).max(0.0),
    }
}

/// Coarse filled-background signal from the page color histogram.
///
/// Page-level only: every span on the page gets the same answer. Real per-span
/// pixel sampling would need the decoded image around `_area`.
pub fn has_contrasting_background(
    _area: &Area,
    properties: Option<&ImageProperties>,
    config: &HeuristicsConfig,
) -> bool {
    let Some(colors) = properties.and_then(|p| p.dominant_colors.as_ref()) else {
        return false;
    };

    colors.colors.iter().any(|info| {
        let c = info.color;
        info.score > config.contrast_min_score
            && (c.red > config.contrast_min_channel
                || c.green > config.contrast_min_channel
                || c.blue > config.contrast_min_channel)
    })
}

/// Containment of `element` in `container`, with `tolerance` pixels of slack.
pub fn is_within_bounds(element: &BoundingBox, container: &BoundingBox, tolerance: f64) -> bool {
    if element.vertices.len() < 3 || container.vertices.len() < 3 {
        return false;
    }

    let (e0, e2) = (element.vertices[0], element.vertices[2]);
    let (c0, c2) = (container.vertices[0], container.vertices[2]);

    e0.x >= c0.x - tolerance
        && e0.y >= c0.y - tolerance
        && e2.x <= c2.x + tolerance
        && e2.y <= c2.y + tolerance
}

/// True if the span sits inside any independently detected object.
pub fn is_within_interactive_object(
    bounds: &BoundingBox,
    objects: &[LocalizedObject],
    frame: Option<ImageFrame>,
    config: &HeuristicsConfig,
) -> bool {
    objects
        .iter()
        .any(|obj| is_within_bounds(bounds, &obj.pixel_box(frame), config.containment_tolerance))
}

pub fn is_standard_interactive_size(bounds: &BoundingBox, config: &HeuristicsConfig) -> bool {
    let h = area(bounds).height;
    h >= config.min_height && h <= config.max_height
}

/// Horizontal-row alignment: some object's top edge is within tolerance of ours.
pub fn check_alignment(
    bounds: &BoundingBox,
    objects: &[LocalizedObject],
    frame: Option<ImageFrame>,
    config: &HeuristicsConfig,
) -> bool {
    let Some(top) = bounds.top() else {
        return false;
    };

    objects
        .iter()
        .filter_map(|obj| obj.pixel_box(frame).top())
        .any(|y| (y - top).abs() < config.alignment_tolerance)
}

/// Header / content / footer bucket by the span's top edge.
///
/// Boundaries scale with the screenshot height; an unknown frame uses the
/// nominal height (100 px / 800 px with the default fractions).
pub fn determine_screen_position(
    bounds: &BoundingBox,
    frame: Option<ImageFrame>,
    config: &HeuristicsConfig,
) -> ScreenPosition {
    let y = area(bounds).y;
    let height = frame
        .map(|f| f.height as f64)
        .unwrap_or(config.nominal_height);

    if y < height * config.header_fraction {
        ScreenPosition::Header
    } else if y > height * config.footer_fraction {
        ScreenPosition::Footer
    } else {
        ScreenPosition::Content
    }
}
