use regex::Regex;
use tracing::warn;

// ============================================================================
// Interactive-word library (declarative: category -> regex patterns)
// ============================================================================

pub struct PatternGroup {
    pub category: &'static str,
    pub patterns: &'static [&'static str],
}

/// Wording that marks a span as interactive even without visual cues.
/// Matched against lowercased text; first matching group wins.
pub const INTERACTIVE_PATTERNS: &[PatternGroup] = &[
    PatternGroup {
        category: "action_verbs",
        patterns: &[r"submit|send|save|cancel|delete|edit|update|create|add|remove|sign|log|click"],
    },
    PatternGroup {
        category: "confirmation",
        patterns: &[r"^ok$", r"^yes$", r"^no$", r"^back$"],
    },
    PatternGroup {
        category: "navigation",
        patterns: &[r"continue|proceed|next|previous|prev|begin|start|end|finish"],
    },
    PatternGroup {
        category: "view_controls",
        patterns: &[r"\bgo\b|\bview\b|\bshow\b|\bhide\b|\bclose\b|\bopen\b"],
    },
    PatternGroup {
        category: "authentication",
        patterns: &[r"\blogin\b|\blogout\b|\bregister\b|\bsignup\b|\bsignin\b"],
    },
    PatternGroup {
        category: "form_fields",
        patterns: &[r"username|password|email|search|query|phone|address|name|message"],
    },
    PatternGroup {
        category: "input_prompts",
        patterns: &[r"enter\s|type\s|input\s|fill"],
    },
    PatternGroup {
        category: "form_chrome",
        patterns: &[r"field|box|form"],
    },
    PatternGroup {
        category: "link_phrases",
        patterns: &[r"learn more|read more|see more|view more|details"],
    },
    PatternGroup {
        category: "navigation_chrome",
        patterns: &[r"menu|navigation|nav|home|about|contact|help|support"],
    },
];

/// Leading verbs that make a span a button outright.
pub const BUTTON_VERB_PATTERN: &str = r"^(send|build|create|edit|ok|cancel|learn|more)(\s|$)";

/// Wording that suggests a text input.
pub const INPUT_KEYWORD_PATTERN: &str = r"input|field|enter|type|email|password|search";

struct CompiledGroup {
    category: &'static str,
    patterns: Vec<Regex>,
}

/// Compiled form of the pattern tables, built once and shared by the classifier.
pub struct PatternLibrary {
    groups: Vec<CompiledGroup>,
    button_verbs: Option<Regex>,
    input_keywords: Option<Regex>,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new(INTERACTIVE_PATTERNS, BUTTON_VERB_PATTERN, INPUT_KEYWORD_PATTERN)
    }
}

impl PatternLibrary {
    /// Compile the tables. Patterns that fail to compile are logged and skipped.
    pub fn new(groups: &[PatternGroup], button_verbs: &str, input_keywords: &str) -> Self {
        let groups = groups
            .iter()
            .map(|g| CompiledGroup {
                category: g.category,
                patterns: g.patterns.iter().filter_map(|p| compile(p)).collect(),
            })
            .collect();

        Self {
            groups,
            button_verbs: compile(button_verbs),
            input_keywords: compile(input_keywords),
        }
    }

    /// Category of the first interactive-word group matching `text`.
    pub fn interactive_category(&self, text: &str) -> Option<&'static str> {
        let lower = text.to_lowercase();
        self.groups
            .iter()
            .find(|g| g.patterns.iter().any(|re| re.is_match(&lower)))
            .map(|g| g.category)
    }

    pub fn is_interactive_text(&self, text: &str) -> bool {
        self.interactive_category(text).is_some()
    }

    pub fn is_button_verb(&self, text: &str) -> bool {
        matches_lower(self.button_verbs.as_ref(), text)
    }

    pub fn is_input_keyword(&self, text: &str) -> bool {
        matches_lower(self.input_keywords.as_ref(), text)
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("skipping invalid classifier pattern '{}': {}", pattern, e);
            None
        }
    }
}

fn matches_lower(re: Option<&Regex>, text: &str) -> bool {
    re.is_some_and(|re| re.is_match(&text.to_lowercase()))
}
