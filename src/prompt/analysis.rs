use std::collections::HashSet;

use crate::screen::naming::pascal_case;
use crate::screen::screen_model::{ElementType, ScreenPosition, UiElement};

// ============================================================================
// Element type grouping
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TypeGroup {
    pub element_type: ElementType,
    pub count: usize,
    pub recommendation: &'static str,
}

pub fn type_recommendation(element_type: ElementType) -> &'static str {
    match element_type {
        ElementType::Button => "Include tap/click validations",
        ElementType::TextField => "Include input validation and error cases",
        ElementType::StaticText => "Include text content verification",
    }
}

/// Count elements per type, in order of first appearance.
pub fn group_by_type(elements: &[UiElement]) -> Vec<TypeGroup> {
    let mut groups: Vec<TypeGroup> = Vec::new();

    for el in elements {
        match groups.iter_mut().find(|g| g.element_type == el.element_type) {
            Some(group) => group.count += 1,
            None => groups.push(TypeGroup {
                element_type: el.element_type,
                count: 1,
                recommendation: type_recommendation(el.element_type),
            }),
        }
    }

    groups
}

// ============================================================================
// Page name
// ============================================================================

pub const DEFAULT_PAGE_NAME: &str = "Screen";

/// PascalCase name from the first header element, or the first element
/// mentioning "page"/"screen". Falls back to `Screen`.
pub fn infer_page_name(elements: &[UiElement]) -> String {
    elements
        .iter()
        .filter(|el| {
            let lower = el.text.to_lowercase();
            el.visual_context.position == ScreenPosition::Header
                || lower.contains("page")
                || lower.contains("screen")
        })
        .map(|el| pascal_case(&el.text))
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_PAGE_NAME.to_string())
}

// ============================================================================
// Purpose inference
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementPurpose {
    Authentication,
    Navigation,
    DataEntry,
    Action,
    Validation,
    Selection,
    General,
}

struct PurposeRule {
    purpose: ElementPurpose,
    keywords: &'static [&'static str],
}

/// Checked in order; the first rule with a keyword hit wins.
const PURPOSE_RULES: &[PurposeRule] = &[
    PurposeRule {
        purpose: ElementPurpose::Authentication,
        keywords: &["login", "signin", "signup", "password", "username"],
    },
    PurposeRule {
        purpose: ElementPurpose::Navigation,
        keywords: &["menu", "nav", "back", "next", "previous", "tab"],
    },
    PurposeRule {
        purpose: ElementPurpose::DataEntry,
        keywords: &["input", "field", "form", "txt", "enter", "type"],
    },
    PurposeRule {
        purpose: ElementPurpose::Action,
        keywords: &["submit", "save", "delete", "add", "create", "update", "btn"],
    },
    PurposeRule {
        purpose: ElementPurpose::Validation,
        keywords: &["error", "success", "warning", "message", "status", "label"],
    },
    PurposeRule {
        purpose: ElementPurpose::Selection,
        keywords: &["select", "choose", "pick", "option", "dropdown", "list"],
    },
];

impl ElementPurpose {
    pub fn label(&self) -> &'static str {
        match self {
            ElementPurpose::Authentication => "authentication",
            ElementPurpose::Navigation => "navigation",
            ElementPurpose::DataEntry => "data_entry",
            ElementPurpose::Action => "action",
            ElementPurpose::Validation => "validation",
            ElementPurpose::Selection => "selection",
            ElementPurpose::General => "general interaction",
        }
    }

    pub fn test_focus(&self) -> &'static str {
        match self {
            ElementPurpose::Authentication => "Test authentication flow and validation",
            ElementPurpose::Navigation => "Test navigation flow and state changes",
            ElementPurpose::DataEntry => "Test input validation and form submission",
            ElementPurpose::Action => "Test action completion and response",
            ElementPurpose::Validation => "Test feedback display and validation",
            ElementPurpose::Selection => "Test selection behavior and state",
            ElementPurpose::General => "Test basic functionality",
        }
    }
}

/// Keyword match over the element's text and identifier.
pub fn infer_purpose(element: &UiElement) -> ElementPurpose {
    let text = element.text.to_lowercase();
    let identifier = element.case_identifier.to_lowercase();

    PURPOSE_RULES
        .iter()
        .find(|rule| {
            rule.keywords
                .iter()
                .any(|k| text.contains(k) || identifier.contains(k))
        })
        .map(|rule| rule.purpose)
        .unwrap_or(ElementPurpose::General)
}

// ============================================================================
// Suggested test flows
// ============================================================================

/// Flow outline lines. Base flows always; the rest depend on the element set.
pub fn suggest_test_flows(elements: &[UiElement]) -> Vec<String> {
    let types: HashSet<ElementType> = elements.iter().map(|e| e.element_type).collect();
    let purposes: HashSet<ElementPurpose> = elements.iter().map(infer_purpose).collect();

    let mut flows: Vec<&str> = vec![
        "- Basic element existence validation",
        "- Screen loading and initial state verification",
    ];

    if types.contains(&ElementType::TextField) {
        flows.extend([
            "- Input field validation:",
            "  * Valid input cases",
            "  * Invalid input cases",
            "  * Empty field validation",
            "  * Maximum length validation",
        ]);
    }

    if types.contains(&ElementType::Button) {
        flows.extend([
            "- Button interaction flows:",
            "  * Button state validation (enabled/disabled)",
            "  * Button tap response verification",
        ]);
    }

    if purposes.contains(&ElementPurpose::Authentication) {
        flows.extend([
            "- Authentication flows:",
            "  * Successful login/signup",
            "  * Failed authentication handling",
            "  * Error message validation",
        ]);
    }

    if purposes.contains(&ElementPurpose::Navigation) {
        flows.extend([
            "- Navigation flows:",
            "  * Navigation state changes",
            "  * Back/forward navigation",
            "  * Navigation history",
        ]);
    }

    if purposes.contains(&ElementPurpose::DataEntry) || purposes.contains(&ElementPurpose::Action) {
        flows.extend([
            "- Form submission flows:",
            "  * Successful submission",
            "  * Validation error handling",
            "  * Required field checking",
        ]);
    }

    if types.contains(&ElementType::StaticText) {
        flows.extend([
            "- Error handling and messaging:",
            "  * Error message display",
            "  * Success message verification",
            "  * Message content validation",
        ]);
    }

    flows.into_iter().map(str::to_string).collect()
}
