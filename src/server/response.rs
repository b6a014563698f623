use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::service::error::ScriptError;

pub const SUCCESS_MESSAGE: &str = "Script generated successfully";

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub script: String,
    pub message: String,
}

impl GenerateResponse {
    pub fn ok(script: String) -> Self {
        Self {
            success: true,
            script,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub success: bool,
    pub message: String,
    pub error: String,
    pub kind: String,
}

impl From<&ScriptError> for FailureResponse {
    fn from(err: &ScriptError) -> Self {
        let message = err.to_string();
        Self {
            success: false,
            error: message.clone(),
            message,
            kind: err.kind().to_string(),
        }
    }
}

/// Every failure keeps the documented 500 contract; `kind` tells them apart.
impl IntoResponse for ScriptError {
    fn into_response(self) -> Response {
        let body = FailureResponse::from(&self);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
