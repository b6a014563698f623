use crate::prompt::analysis::{group_by_type, infer_page_name, infer_purpose, suggest_test_flows};
use crate::prompt::framework::Framework;
use crate::prompt::test_data::suggest_test_data;
use crate::screen::screen_model::{ElementType, UiElement};
use crate::templates::registry::TemplateRegistry;

pub const DEFAULT_USE_CASE: &str = "Verify the screen loads and its elements behave correctly";
pub const DEFAULT_PATTERN_LABEL: &str = "standard";

// ============================================================================
// Prompt construction
// ============================================================================

/// Composes the generation prompt from classified elements and a use case.
pub struct PromptBuilder<'a> {
    registry: &'a TemplateRegistry,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(registry: &'a TemplateRegistry) -> Self {
        Self { registry }
    }

    pub fn build(
        &self,
        elements: &[UiElement],
        use_case: &str,
        framework: Framework,
        pattern: Option<&str>,
    ) -> String {
        let page_name = infer_page_name(elements);
        let class_name = format!("{}Tests", page_name);
        let pattern_id = pattern.unwrap_or("");
        let pattern_label = if pattern_id.is_empty() {
            DEFAULT_PATTERN_LABEL
        } else {
            pattern_id
        };
        let use_case = if use_case.trim().is_empty() {
            DEFAULT_USE_CASE
        } else {
            use_case.trim()
        };

        let element_types = group_by_type(elements)
            .iter()
            .map(|g| format!("- {} {}(s) - {}", g.count, g.element_type, g.recommendation))
            .collect::<Vec<_>>()
            .join("\n");

        let test_data = suggest_test_data(elements)
            .iter()
            .map(|(id, value)| format!("- {}: \"{}\"", id, value))
            .collect::<Vec<_>>()
            .join("\n");

        let best_practices = framework
            .best_practices()
            .iter()
            .map(|p| format!("- {}", p))
            .collect::<Vec<_>>()
            .join("\n");

        let skeleton = self.registry.skeleton(framework.as_str(), pattern_id);
        let pattern_example = if skeleton.is_empty() {
            String::new()
        } else {
            format!(
                "\nREFERENCE PATTERN EXAMPLE ({}):\n{}\n",
                pattern_label,
                skeleton.trim_start_matches('\n')
            )
        };

        format!(
            r#"
You are an expert test automation engineer. Generate a {framework} test script following the {pattern} pattern.

TEST CONTEXT:
1. Screen Name: {page_name}

2. Available UI Elements:
{elements}

3. Element Types Present:
{element_types}

4. Use Case to Test:
{use_case}

5. Suggested Test Flows:
{flows}

6. Suggested Test Data:
{test_data}

FRAMEWORK-SPECIFIC REQUIREMENTS:
{specifics}

TECHNICAL REQUIREMENTS:
1. Follow these {framework} best practices:
{best_practices}

2. Code Structure:
- Use proper element selectors for {framework}
- Include appropriate waits/synchronization
- Add meaningful assertions
- Handle setup/teardown correctly
- Use framework-specific utilities
- Follow naming conventions

3. Test Organization:
- Group related tests logically
- Use clear test method names
- Include proper validation points
- Handle test data appropriately
{pattern_example}
Base your implementation on this template:
{template}

Generate production-ready test code that follows {framework} conventions and best practices.
Important: Generate only the code without any explanation or additional comments outside the code."#,
            framework = framework,
            pattern = pattern_label,
            page_name = page_name,
            elements = format_elements(elements, framework),
            element_types = element_types,
            use_case = use_case,
            flows = suggest_test_flows(elements).join("\n"),
            test_data = if test_data.is_empty() { "- (no input fields)".to_string() } else { test_data },
            specifics = framework.pattern_specifics(pattern_id),
            best_practices = best_practices,
            pattern_example = pattern_example,
            template = framework.base_template(&class_name),
        )
    }
}

/// One block per element: type, text, identifier, selector, assertions and purpose.
pub fn format_elements(elements: &[UiElement], framework: Framework) -> String {
    elements
        .iter()
        .map(|el| {
            let purpose = infer_purpose(el);
            let selector = framework.selector(el.element_type, &el.case_identifier);
            let mut block = format!(
                "- {}: \"{}\"\n  Identifier: \"{}\"\n  Selector: {}\n  Assertion: {}",
                el.element_type,
                el.text,
                el.case_identifier,
                selector,
                framework.exists_assertion(&selector),
            );
            if el.element_type == ElementType::Button {
                block.push_str(&format!(
                    "\n  Enabled: {}",
                    framework.enabled_assertion(&selector)
                ));
            }
            block.push_str(&format!(
                "\n  Purpose: {} - {}",
                purpose.label(),
                purpose.test_focus()
            ));
            block
        })
        .collect::<Vec<_>>()
        .join("\n")
}
