use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::generation::backend::{
    DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL, DEFAULT_OLLAMA_ENDPOINT, DEFAULT_OLLAMA_MODEL,
    GeminiBackend, MockTextInference, OllamaBackend, TextInference,
};
use crate::screen::classifier::Classifier;
use crate::service::error::ScriptError;
use crate::service::script_service::{ScriptService, ServiceTimeouts};
use crate::templates::registry::TemplateRegistry;
use crate::trace::logger::TraceLogger;
use crate::vision::client::{
    DEFAULT_VISION_ENDPOINT, DisabledVisionBackend, FixtureVisionBackend, GoogleVisionBackend,
    VisionBackend,
};
use crate::vision::heuristics::HeuristicsConfig;

pub const DEFAULT_CONFIG_PATH: &str = "screen-script.yaml";
pub const DEFAULT_PORT: u16 = 5000;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "screen-script",
    version,
    about = "Generate UI test scripts from screenshots or element lists"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: screen-script.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Generate one test script and print it (or write it to --output)
    Generate {
        /// XCUITest, Espresso or Playwright
        #[arg(long)]
        framework: String,

        /// Pattern id from the template registry
        #[arg(long)]
        pattern: Option<String>,

        /// Free-text description of the flow under test
        #[arg(long, default_value = "")]
        use_case: String,

        /// Screenshot to analyse
        #[arg(long)]
        screenshot: Option<String>,

        /// JSON file with predefined elements (takes precedence over --screenshot)
        #[arg(long)]
        elements: Option<String>,

        #[arg(short, long)]
        output: Option<String>,
    },

    /// List the registered patterns of a framework
    Patterns {
        #[arg(long)]
        framework: String,
    },

    /// Print the classified elements of a screenshot as JSON
    Analyze {
        #[arg(long)]
        screenshot: String,
    },

    /// Report elements added or removed between two screenshots
    Compare {
        #[arg(long)]
        before: String,

        #[arg(long)]
        after: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `screen-script.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub vision: VisionConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub heuristics: HeuristicsConfig,
    #[serde(default)]
    pub timeouts: ServiceTimeouts,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    pub port: Option<u16>,

    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// google, fixture or none
    #[serde(default = "default_vision_provider")]
    pub provider: String,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub fixture: Option<String>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            provider: default_vision_provider(),
            api_key: None,
            endpoint: None,
            fixture: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// gemini, ollama or mock
    #[serde(default = "default_generation_provider")]
    pub provider: String,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub mock_response: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_generation_provider(),
            api_key: None,
            model: None,
            endpoint: None,
            mock_response: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_upload_dir() -> String { "uploads".to_string() }
fn default_max_upload_bytes() -> usize { 50 * 1024 * 1024 }
fn default_vision_provider() -> String { "google".to_string() }
fn default_generation_provider() -> String { "gemini".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => {
            debug!("no config at '{}', using defaults", config_path);
            AppConfig::default()
        }
    }
}

// ============================================================================
// Setting resolution: CLI > config file > environment > default
// ============================================================================

pub fn resolve_port(cli: Option<u16>, config: &AppConfig) -> u16 {
    cli.or(config.server.port)
        .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or(DEFAULT_PORT)
}

pub fn resolve_host(cli: Option<&str>, config: &AppConfig) -> String {
    cli.map(str::to_string)
        .unwrap_or_else(|| config.server.host.clone())
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|k| !k.trim().is_empty())
}

fn generation_key(config: &GenerationConfig) -> Option<String> {
    config.api_key.clone().or_else(|| env_key("GOOGLE_AI_KEY"))
}

fn vision_key(config: &VisionConfig) -> Option<String> {
    config
        .api_key
        .clone()
        .or_else(|| env_key("GOOGLE_VISION_API_KEY"))
        .or_else(|| env_key("GOOGLE_AI_KEY"))
}

// ============================================================================
// Backend builders
// ============================================================================

pub fn build_vision(
    config: &VisionConfig,
    timeout_secs: u64,
) -> Result<Arc<dyn VisionBackend>, ScriptError> {
    match config.provider.as_str() {
        "google" => match vision_key(config) {
            Some(key) => {
                let endpoint = config.endpoint.as_deref().unwrap_or(DEFAULT_VISION_ENDPOINT);
                Ok(Arc::new(GoogleVisionBackend::new(endpoint, &key, timeout_secs)?))
            }
            None => {
                warn!("no vision API key set; screenshot analysis is disabled");
                Ok(Arc::new(DisabledVisionBackend))
            }
        },
        "fixture" => {
            let path = config.fixture.as_deref().ok_or_else(|| {
                ScriptError::validation("vision.fixture must be set for the fixture provider")
            })?;
            Ok(Arc::new(FixtureVisionBackend::new(path)))
        }
        "none" => Ok(Arc::new(DisabledVisionBackend)),
        other => Err(ScriptError::validation(format!(
            "Unknown vision provider '{}'",
            other
        ))),
    }
}

pub fn build_generator(
    config: &GenerationConfig,
    timeout_secs: u64,
) -> Result<Arc<dyn TextInference>, ScriptError> {
    match config.provider.as_str() {
        "gemini" => {
            let key = generation_key(config).ok_or_else(|| {
                ScriptError::validation("GOOGLE_AI_KEY (or generation.api_key) is required for gemini")
            })?;
            let endpoint = config.endpoint.as_deref().unwrap_or(DEFAULT_GEMINI_ENDPOINT);
            let model = config.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL);
            Ok(Arc::new(GeminiBackend::new(endpoint, model, &key, timeout_secs)?))
        }
        "ollama" => {
            let endpoint = config.endpoint.as_deref().unwrap_or(DEFAULT_OLLAMA_ENDPOINT);
            let model = config.model.as_deref().unwrap_or(DEFAULT_OLLAMA_MODEL);
            Ok(Arc::new(OllamaBackend::new(endpoint, model, timeout_secs)?))
        }
        "mock" => {
            let response = config.mock_response.as_deref().unwrap_or("// generated test");
            Ok(Arc::new(MockTextInference::new(response)))
        }
        other => Err(ScriptError::validation(format!(
            "Unknown generation provider '{}'",
            other
        ))),
    }
}

/// Wire the service from a resolved config.
pub fn build_service(config: &AppConfig) -> Result<ScriptService, ScriptError> {
    let vision = build_vision(&config.vision, config.timeouts.vision_secs)?;
    let generator = build_generator(&config.generation, config.timeouts.generation_secs)?;

    let mut service = ScriptService::new(
        Arc::new(TemplateRegistry::builtin()),
        Classifier::new(config.heuristics.clone()),
        vision,
        generator,
    )
    .with_timeouts(config.timeouts);

    if let Some(path) = &config.trace.path {
        service = service.with_tracer(TraceLogger::new(path));
    }

    Ok(service)
}
