use serde::Serialize;

use crate::screen::screen_model::UiElement;

/// Elements that appeared or disappeared between two screens.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ElementChanges {
    pub added: Vec<UiElement>,
    pub removed: Vec<UiElement>,
}

impl ElementChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compare two element sets by text, ignoring case and position.
pub fn compare_elements(before: &[UiElement], after: &[UiElement]) -> ElementChanges {
    let present = |set: &[UiElement], el: &UiElement| {
        set.iter().any(|o| o.text.eq_ignore_ascii_case(&el.text))
    };

    ElementChanges {
        added: after.iter().filter(|a| !present(before, a)).cloned().collect(),
        removed: before.iter().filter(|b| !present(after, b)).cloned().collect(),
    }
}
