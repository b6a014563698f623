use std::io::Write;
use std::path::{Path, PathBuf};

use axum::Json;
use axum::extract::{Multipart, Path as UrlPath, State};
use serde_json::{Value, json};
use tempfile::TempPath;
use tracing::{debug, info};

use crate::server::AppState;
use crate::server::response::GenerateResponse;
use crate::service::error::ScriptError;
use crate::service::request::{GenerateRequest, ScreenshotSource};
use crate::templates::registry::PatternSummary;

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /api/patterns/:framework. Unknown frameworks list nothing.
pub async fn patterns_handler(
    State(state): State<AppState>,
    UrlPath(framework): UrlPath<String>,
) -> Json<Vec<PatternSummary>> {
    let patterns = state.service.list_patterns(&framework);
    debug!("{} patterns for '{}'", patterns.len(), framework);
    Json(patterns)
}

/// POST /api/generate
///
/// Multipart fields: `screenshot` (file, optional), `useCase`, `framework`,
/// `pattern`, `predefinedElements` (JSON string, optional).
pub async fn generate_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, ScriptError> {
    let request = read_generate_form(&state.upload_dir, multipart).await?;
    info!(
        "generate request: framework={} pattern={:?} screenshot={} predefined={}",
        request.framework,
        request.pattern_id(),
        request.screenshot.is_some(),
        request.predefined_json().is_some()
    );

    let script = state.service.generate(request).await?;
    Ok(Json(GenerateResponse::ok(script)))
}

async fn read_generate_form(
    upload_dir: &Path,
    mut multipart: Multipart,
) -> Result<GenerateRequest, ScriptError> {
    let mut request = GenerateRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ScriptError::validation(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "screenshot" => {
                let extension = field
                    .file_name()
                    .and_then(|f| Path::new(f).extension())
                    .and_then(|e| e.to_str())
                    .map(|e| format!(".{}", e))
                    .unwrap_or_default();
                let bytes = field.bytes().await.map_err(|e| {
                    ScriptError::validation(format!("Could not read screenshot upload: {}", e))
                })?;
                if bytes.is_empty() {
                    continue;
                }
                let saved = store_upload(upload_dir.to_path_buf(), extension, bytes).await?;
                request.screenshot = Some(ScreenshotSource::Upload(saved));
            }
            "useCase" | "framework" | "pattern" | "predefinedElements" => {
                let value = field.text().await.map_err(|e| {
                    ScriptError::validation(format!("Could not read field '{}': {}", name, e))
                })?;
                match name.as_str() {
                    "useCase" => request.use_case = value,
                    "framework" => request.framework = value.trim().to_string(),
                    "pattern" => request.pattern = Some(value),
                    _ => request.predefined_elements = Some(value),
                }
            }
            other => debug!("ignoring multipart field '{}'", other),
        }
    }

    Ok(request)
}

/// Write the upload to a scratch file that the service removes after the request.
/// The write runs on the blocking pool.
async fn store_upload(
    dir: PathBuf,
    extension: String,
    bytes: axum::body::Bytes,
) -> Result<TempPath, ScriptError> {
    let error_path = dir.clone();
    tokio::task::spawn_blocking(move || write_upload(&dir, &extension, &bytes))
        .await
        .map_err(|e| ScriptError::FileSystem {
            path: error_path,
            source: std::io::Error::other(e),
        })?
}

fn write_upload(dir: &Path, extension: &str, bytes: &[u8]) -> Result<TempPath, ScriptError> {
    let fs_error = |source: std::io::Error| ScriptError::FileSystem {
        path: dir.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(fs_error)?;
    let mut file = tempfile::Builder::new()
        .prefix("screenshot-")
        .suffix(extension)
        .tempfile_in(dir)
        .map_err(fs_error)?;
    file.write_all(bytes).map_err(fs_error)?;

    Ok(file.into_temp_path())
}
