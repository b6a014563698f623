use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::cli::config::{AppConfig, build_service};
use crate::server::{self, AppState};
use crate::service::request::{GenerateRequest, ScreenshotSource};
use crate::templates::registry::TemplateRegistry;

// ============================================================================
// serve subcommand
// ============================================================================

pub async fn cmd_serve(config: &AppConfig, host: &str, port: u16) -> anyhow::Result<()> {
    let service = build_service(config)?;
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", host, port))?;

    let state = AppState::new(service, &config.server.upload_dir);
    server::serve(addr, state, config.server.max_upload_bytes).await
}

// ============================================================================
// generate subcommand
// ============================================================================

pub struct GenerateArgs<'a> {
    pub framework: &'a str,
    pub pattern: Option<&'a str>,
    pub use_case: &'a str,
    pub screenshot: Option<&'a str>,
    pub elements: Option<&'a str>,
    pub output: Option<&'a str>,
}

pub async fn cmd_generate(config: &AppConfig, args: GenerateArgs<'_>) -> anyhow::Result<()> {
    let service = build_service(config)?;

    let mut request = GenerateRequest::new(args.framework).with_use_case(args.use_case);
    if let Some(pattern) = args.pattern {
        request = request.with_pattern(pattern);
    }
    if let Some(path) = args.screenshot {
        request = request.with_screenshot(ScreenshotSource::Path(PathBuf::from(path)));
    }
    if let Some(path) = args.elements {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("could not read elements file {}", path))?;
        request = request.with_predefined_elements(&json);
    }

    let script = service.generate(request).await?;

    match args.output {
        Some(path) => {
            std::fs::write(path, &script).with_context(|| format!("could not write {}", path))?;
            info!("wrote {} ({} chars)", path, script.len());
        }
        None => println!("{}", script),
    }

    Ok(())
}

// ============================================================================
// patterns subcommand
// ============================================================================

pub fn cmd_patterns(framework: &str) -> anyhow::Result<()> {
    let registry = TemplateRegistry::builtin();
    let patterns = registry.list_patterns(framework);

    if patterns.is_empty() {
        eprintln!(
            "No patterns for '{}'. Known frameworks: {}",
            framework,
            registry.frameworks().join(", ")
        );
        return Ok(());
    }

    for pattern in &patterns {
        println!("{:<22} {} - {}", pattern.id, pattern.name, pattern.description);
    }

    Ok(())
}

// ============================================================================
// analyze subcommand
// ============================================================================

/// Only the vision and classifier stages run, so no generation provider is needed.
fn analysis_config(config: &AppConfig) -> AppConfig {
    let mut config = config.clone();
    config.generation.provider = "mock".to_string();
    config
}

pub async fn cmd_analyze(config: &AppConfig, screenshot: &str) -> anyhow::Result<()> {
    let service = build_service(&analysis_config(config))?;
    let elements = service.analyze_screenshot(Path::new(screenshot)).await?;

    info!("{} elements detected", elements.len());
    println!("{}", serde_json::to_string_pretty(&elements)?);

    Ok(())
}

// ============================================================================
// compare subcommand
// ============================================================================

pub async fn cmd_compare(config: &AppConfig, before: &str, after: &str) -> anyhow::Result<()> {
    let service = build_service(&analysis_config(config))?;
    let changes = service
        .compare_screenshots(Path::new(before), Path::new(after))
        .await?;

    if changes.is_empty() {
        info!("no element changes between {} and {}", before, after);
    }
    println!("{}", serde_json::to_string_pretty(&changes)?);

    Ok(())
}
