pub mod response;
pub mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::service::script_service::ScriptService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ScriptService>,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(service: ScriptService, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            service: Arc::new(service),
            upload_dir: upload_dir.into(),
        }
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(routes::health_handler))
        .route("/api/patterns/:framework", get(routes::patterns_handler))
        .route("/api/generate", post(routes::generate_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState, max_upload_bytes: usize) -> anyhow::Result<()> {
    std::fs::create_dir_all(&state.upload_dir)?;
    info!("screen-script listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state, max_upload_bytes)).await?;

    Ok(())
}
