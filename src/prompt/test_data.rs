use crate::screen::screen_model::{ElementType, UiElement};

/// Derive a sensible input value from a field's visible text.
pub fn guess_value(label: &str) -> String {
    let l = label.to_lowercase();

    // Checked in order
    if l.contains("email") {
        return "user@example.com".into();
    }
    if l.contains("password") {
        return "TestPass123!".into();
    }
    if l.contains("phone") || l.contains("tel") {
        return "555-0100".into();
    }
    if l.contains("url") || l.contains("website") {
        return "https://example.com".into();
    }
    if l.contains("zip") || l.contains("postal") {
        return "90210".into();
    }
    if l.contains("username") || l.contains("user") {
        return "testuser".into();
    }
    if l.contains("name") {
        return "Jane Doe".into();
    }
    if l.contains("search") || l.contains("query") {
        return "test query".into();
    }
    if l.contains("date") {
        return "2025-01-15".into();
    }
    if l.contains("number") || l.contains("amount") || l.contains("quantity") {
        return "42".into();
    }

    "test".into()
}

/// (identifier, value) pairs for every text field.
pub fn suggest_test_data(elements: &[UiElement]) -> Vec<(String, String)> {
    elements
        .iter()
        .filter(|el| el.element_type == ElementType::TextField)
        .map(|el| (el.case_identifier.clone(), guess_value(&el.text)))
        .collect()
}
