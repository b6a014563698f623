use serde::Serialize;
use sha1::{Digest, Sha1};
use std::time::{SystemTime, UNIX_EPOCH};

/// One record per generate request, written as a JSON line.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationTrace {
    pub timestamp_ms: u128,

    pub framework: String,
    pub pattern: Option<String>,

    pub element_source: Option<String>,
    pub element_count: usize,
    pub screenshot_sha1: Option<String>,

    pub outcome: String,
    pub error_kind: Option<String>,
    pub duration_ms: u128,
}

impl GenerationTrace {
    pub fn now(framework: &str, pattern: Option<&str>) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            framework: framework.to_string(),
            pattern: pattern.map(str::to_string),
            element_source: None,
            element_count: 0,
            screenshot_sha1: None,
            outcome: "pending".to_string(),
            error_kind: None,
            duration_ms: 0,
        }
    }

    pub fn record_source(&mut self, source: &str, count: usize) {
        self.element_source = Some(source.to_string());
        self.element_count = count;
    }

    pub fn record_screenshot(&mut self, bytes: &[u8]) {
        self.screenshot_sha1 = Some(fingerprint(bytes));
    }

    pub fn succeeded(mut self, duration_ms: u128) -> Self {
        self.outcome = "success".to_string();
        self.duration_ms = duration_ms;
        self
    }

    pub fn failed(mut self, kind: &str, duration_ms: u128) -> Self {
        self.outcome = "failure".to_string();
        self.error_kind = Some(kind.to_string());
        self.duration_ms = duration_ms;
        self
    }
}

/// Hex SHA-1 of the screenshot bytes.
pub fn fingerprint(bytes: &[u8]) -> String {
    let digest = Sha1::digest(bytes);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
