use std::collections::HashSet;

use crate::screen::screen_model::{ElementType, UiElement};

/// camelCase identifier for `text`, suffixed by element type.
///
/// "Sign In" as a button becomes `signInBtn`. Characters other than ASCII
/// letters, digits, `_`, `-` and whitespace are dropped first.
pub fn case_identifier(text: &str, element_type: ElementType) -> String {
    let words = words(text);

    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }

    if out.is_empty() {
        out.push_str("element");
    }
    out.push_str(element_type.suffix());
    out
}

/// Make every `case_identifier` unique by numbering repeats in input order:
/// the first keeps its name, later ones become `elementBtn2`, `elementBtn3`.
pub fn disambiguate_identifiers(elements: &mut [UiElement]) {
    let mut taken: HashSet<String> = HashSet::with_capacity(elements.len());

    for el in elements.iter_mut() {
        if taken.insert(el.case_identifier.clone()) {
            continue;
        }
        let base = el.case_identifier.clone();
        let mut n = 2;
        while taken.contains(&format!("{}{}", base, n)) {
            n += 1;
        }
        el.case_identifier = format!("{}{}", base, n);
        taken.insert(el.case_identifier.clone());
    }
}

/// PascalCase form of `text` ("login screen" -> "LoginScreen").
pub fn pascal_case(text: &str) -> String {
    words(text).iter().map(|w| capitalize(w)).collect()
}

/// Identifiers must start with a letter and contain only letters and digits.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

fn words(text: &str) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    cleaned
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
