use tracing::debug;

use crate::screen::naming::{case_identifier, disambiguate_identifiers};
use crate::screen::patterns::PatternLibrary;
use crate::screen::screen_model::{ElementType, ScreenPosition, UiElement, VisualContext};
use crate::vision::heuristics::{
    HeuristicsConfig, area, check_alignment, determine_screen_position,
    has_contrasting_background, is_standard_interactive_size, is_within_interactive_object,
};
use crate::vision::vision_model::{AnnotateResult, ImageFrame, TextAnnotation};

/// Turns OCR output into UI elements using geometry and wording heuristics.
pub struct Classifier {
    pub config: HeuristicsConfig,
    patterns: PatternLibrary,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(HeuristicsConfig::default())
    }
}

impl Classifier {
    pub fn new(config: HeuristicsConfig) -> Self {
        Self {
            config,
            patterns: PatternLibrary::default(),
        }
    }

    pub fn with_patterns(config: HeuristicsConfig, patterns: PatternLibrary) -> Self {
        Self { config, patterns }
    }

    pub fn patterns(&self) -> &PatternLibrary {
        &self.patterns
    }

    /// Classify every span of an annotate result, in input order, deduplicated.
    ///
    /// Span 0 aggregates the whole page text and is skipped.
    pub fn classify(&self, result: &AnnotateResult, frame: Option<ImageFrame>) -> Vec<UiElement> {
        let mut elements = Vec::new();

        for span in result.text_annotations.iter().skip(1) {
            let context = self.visual_context(span, result, frame);
            let text = span.description.trim();

            if !self.is_significant(text, &context) {
                continue;
            }

            if let Some(element_type) = self.classify_span(text, &context) {
                elements.push(UiElement {
                    element_type,
                    text: text.to_string(),
                    case_identifier: case_identifier(text, element_type),
                    bounds: span.bounds().clone(),
                    visual_context: context,
                });
            }
        }

        let before = elements.len();
        let mut elements = dedupe_elements(elements, self.config.duplicate_tolerance);
        disambiguate_identifiers(&mut elements);
        debug!(
            "classified {} spans into {} elements ({} duplicates dropped)",
            result.text_annotations.len().saturating_sub(1),
            elements.len(),
            before - elements.len()
        );
        elements
    }

    pub fn visual_context(
        &self,
        span: &TextAnnotation,
        result: &AnnotateResult,
        frame: Option<ImageFrame>,
    ) -> VisualContext {
        let bounds = span.bounds();
        let objects = &result.localized_object_annotations;

        VisualContext {
            has_distinct_background: has_contrasting_background(
                &area(bounds),
                result.image_properties_annotation.as_ref(),
                &self.config,
            ),
            is_in_button_like_object: is_within_interactive_object(
                bounds,
                objects,
                frame,
                &self.config,
            ),
            has_standard_size: is_standard_interactive_size(bounds, &self.config),
            is_aligned: check_alignment(bounds, objects, frame, &self.config),
            position: determine_screen_position(bounds, frame, &self.config),
        }
    }

    /// Noise filter: single characters and bare numbers never qualify.
    /// Otherwise a visual cue or interactive wording is enough.
    pub fn is_significant(&self, text: &str, context: &VisualContext) -> bool {
        if text.chars().count() <= 1 || text.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }

        if context.has_distinct_background
            || context.is_in_button_like_object
            || context.has_standard_size
        {
            return true;
        }

        self.patterns.is_interactive_text(text)
    }

    /// Type by strict priority: button, then text field, then static text.
    pub fn classify_span(&self, text: &str, context: &VisualContext) -> Option<ElementType> {
        if self.is_button_like(text, context) {
            Some(ElementType::Button)
        } else if self.is_input_like(text, context) {
            Some(ElementType::TextField)
        } else if context.position == ScreenPosition::Header || text.chars().count() > 3 {
            Some(ElementType::StaticText)
        } else {
            None
        }
    }

    fn is_button_like(&self, text: &str, context: &VisualContext) -> bool {
        context.has_distinct_background
            || context.is_in_button_like_object
            || self.patterns.is_button_verb(text)
            || (context.has_standard_size && context.is_aligned)
    }

    fn is_input_like(&self, text: &str, context: &VisualContext) -> bool {
        self.patterns.is_input_keyword(text)
            || (context.position == ScreenPosition::Content && !context.has_distinct_background)
    }
}

/// Keep only the first occurrence of each text (ignoring case). An element is
/// dropped when any earlier input element, kept or not, has the same text and a
/// top edge closer than `tolerance`.
pub fn dedupe_elements(elements: Vec<UiElement>, tolerance: f64) -> Vec<UiElement> {
    let keep: Vec<bool> = elements
        .iter()
        .enumerate()
        .map(|(i, el)| {
            let text = el.text.to_lowercase();
            !elements[..i].iter().any(|earlier| {
                earlier.text.to_lowercase() == text && (earlier.top() - el.top()).abs() < tolerance
            })
        })
        .collect();

    elements
        .into_iter()
        .zip(keep)
        .filter_map(|(el, keep)| keep.then_some(el))
        .collect()
}
