use std::path::PathBuf;

use thiserror::Error;

pub const NO_ELEMENTS_MESSAGE: &str =
    "No UI elements detected. Please check your input or define elements manually.";

#[derive(Debug, Error)]
pub enum ScriptError {
    /// Bad or missing request input (unsupported framework, malformed elements, bad image)
    #[error("{0}")]
    Validation(String),

    /// Neither the predefined list nor the screenshot produced any element
    #[error("{}", NO_ELEMENTS_MESSAGE)]
    NoElementsDetected,

    /// OCR or generation call failed upstream
    #[error("{service} request failed: {message}")]
    ExternalService { service: String, message: String },

    /// OCR or generation call did not answer in time
    #[error("{service} request timed out after {seconds}s")]
    Timeout { service: String, seconds: u64 },

    /// Reading or writing a screenshot file failed
    #[error("file error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScriptError {
    pub fn validation(message: impl Into<String>) -> Self {
        ScriptError::Validation(message.into())
    }

    pub fn external(service: &str, message: impl ToString) -> Self {
        ScriptError::ExternalService {
            service: service.to_string(),
            message: message.to_string(),
        }
    }

    /// Stable taxonomy name reported to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            ScriptError::Validation(_) => "ValidationError",
            ScriptError::NoElementsDetected => "NoElementsDetectedError",
            ScriptError::ExternalService { .. } => "ExternalServiceError",
            ScriptError::Timeout { .. } => "TimeoutError",
            ScriptError::FileSystem { .. } => "FileSystemError",
        }
    }

    /// Map a transport error, keeping client-side timeouts distinct.
    pub fn from_reqwest(service: &str, seconds: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScriptError::Timeout {
                service: service.to_string(),
                seconds,
            }
        } else {
            ScriptError::external(service, err)
        }
    }
}
