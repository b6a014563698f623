use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::generation::backend::{GENERATION_SERVICE, TextInference};
use crate::prompt::builder::PromptBuilder;
use crate::prompt::framework::Framework;
use crate::screen::changes::{ElementChanges, compare_elements};
use crate::screen::classifier::Classifier;
use crate::screen::screen_model::UiElement;
use crate::service::error::ScriptError;
use crate::service::request::{GenerateRequest, ScreenshotSource, parse_predefined_elements};
use crate::templates::registry::{PatternSummary, TemplateRegistry};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::GenerationTrace;
use crate::vision::client::{VISION_SERVICE, VisionBackend};
use crate::vision::image_check::inspect_screenshot;

/// Upper bounds for the two external round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceTimeouts {
    pub vision_secs: u64,
    pub generation_secs: u64,
}

impl Default for ServiceTimeouts {
    fn default() -> Self {
        Self {
            vision_secs: 30,
            generation_secs: 120,
        }
    }
}

// ============================================================================
// ScriptService: elements -> prompt -> generation -> combined script
// ============================================================================

/// Stateless per request; collaborators are injected once at startup and shared.
pub struct ScriptService {
    registry: Arc<TemplateRegistry>,
    classifier: Classifier,
    vision: Arc<dyn VisionBackend>,
    generator: Arc<dyn TextInference>,
    timeouts: ServiceTimeouts,
    tracer: TraceLogger,
}

impl ScriptService {
    pub fn new(
        registry: Arc<TemplateRegistry>,
        classifier: Classifier,
        vision: Arc<dyn VisionBackend>,
        generator: Arc<dyn TextInference>,
    ) -> Self {
        Self {
            registry,
            classifier,
            vision,
            generator,
            timeouts: ServiceTimeouts::default(),
            tracer: TraceLogger::disabled(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: ServiceTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn list_patterns(&self, framework: &str) -> Vec<PatternSummary> {
        self.registry.list_patterns(framework)
    }

    /// Run one request end to end. Uploaded screenshots are removed on every
    /// exit path; a failed removal is only logged.
    pub async fn generate(&self, request: GenerateRequest) -> Result<String, ScriptError> {
        let started = Instant::now();
        let mut trace = GenerationTrace::now(&request.framework, request.pattern_id());

        let result = self.run(&request, &mut trace).await;
        release_screenshot(request.screenshot);

        let elapsed = started.elapsed().as_millis();
        let trace = match &result {
            Ok(script) => {
                info!(
                    "generated {} script ({} chars) in {}ms",
                    request.framework,
                    script.len(),
                    elapsed
                );
                trace.succeeded(elapsed)
            }
            Err(e) => {
                warn!("script generation failed [{}]: {}", e.kind(), e);
                trace.failed(e.kind(), elapsed)
            }
        };
        self.tracer.log(&trace).await;

        result
    }

    async fn run(
        &self,
        request: &GenerateRequest,
        trace: &mut GenerationTrace,
    ) -> Result<String, ScriptError> {
        if request.framework.trim().is_empty() {
            return Err(ScriptError::validation(
                "framework is required (XCUITest, Espresso or Playwright)",
            ));
        }
        let framework: Framework = request.framework.parse()?;

        if let Some(screenshot) = &request.screenshot {
            let path = screenshot.path();
            if !path.exists() {
                return Err(ScriptError::validation(format!(
                    "Screenshot file not found at path: {}",
                    path.display()
                )));
            }
        }

        let elements = self.resolve_elements(request, trace).await?;
        if elements.is_empty() {
            return Err(ScriptError::NoElementsDetected);
        }
        debug!("{} elements for {} generation", elements.len(), framework);

        let prompt = PromptBuilder::new(&self.registry).build(
            &elements,
            &request.use_case,
            framework,
            request.pattern_id(),
        );
        let generated = self.call_generator(&prompt).await?;

        let template = self.pattern_template(framework, request.pattern_id());
        Ok(combine_scripts(template, &generated))
    }

    /// Predefined elements win over screenshot analysis, even when empty.
    pub async fn resolve_elements(
        &self,
        request: &GenerateRequest,
        trace: &mut GenerationTrace,
    ) -> Result<Vec<UiElement>, ScriptError> {
        if let Some(json) = request.predefined_json() {
            let elements = parse_predefined_elements(json)?;
            debug!("using {} predefined elements", elements.len());
            trace.record_source("predefined", elements.len());
            return Ok(elements);
        }

        if let Some(screenshot) = &request.screenshot {
            let bytes = read_screenshot(screenshot.path()).await?;
            trace.record_screenshot(&bytes);
            let elements = self.analyze_bytes(&bytes).await?;
            trace.record_source("screenshot", elements.len());
            return Ok(elements);
        }

        Ok(Vec::new())
    }

    /// Vision + classifier stages only.
    pub async fn analyze_screenshot(&self, path: &Path) -> Result<Vec<UiElement>, ScriptError> {
        let bytes = read_screenshot(path).await?;
        self.analyze_bytes(&bytes).await
    }

    /// Analyse two screenshots of the same screen and report which elements
    /// appeared or disappeared between them.
    pub async fn compare_screenshots(
        &self,
        before: &Path,
        after: &Path,
    ) -> Result<ElementChanges, ScriptError> {
        let (before_elements, after_elements) =
            tokio::try_join!(self.analyze_screenshot(before), self.analyze_screenshot(after))?;

        let changes = compare_elements(&before_elements, &after_elements);
        info!(
            "compared screenshots: {} added, {} removed",
            changes.added.len(),
            changes.removed.len()
        );
        Ok(changes)
    }

    async fn analyze_bytes(&self, bytes: &[u8]) -> Result<Vec<UiElement>, ScriptError> {
        let frame = inspect_screenshot(bytes)?;
        debug!("screenshot {}x{}", frame.width, frame.height);

        let seconds = self.timeouts.vision_secs;
        let result = tokio::time::timeout(Duration::from_secs(seconds), self.vision.annotate(bytes))
            .await
            .map_err(|_| ScriptError::Timeout {
                service: VISION_SERVICE.to_string(),
                seconds,
            })??;

        Ok(self.classifier.classify(&result, Some(frame)))
    }

    async fn call_generator(&self, prompt: &str) -> Result<String, ScriptError> {
        let seconds = self.timeouts.generation_secs;
        tokio::time::timeout(Duration::from_secs(seconds), self.generator.infer_text(prompt))
            .await
            .map_err(|_| ScriptError::Timeout {
                service: GENERATION_SERVICE.to_string(),
                seconds,
            })?
    }

    /// Best effort: a missing pattern just means no scaffold.
    fn pattern_template(&self, framework: Framework, pattern: Option<&str>) -> &'static str {
        let Some(pattern) = pattern else {
            return "";
        };
        let skeleton = self.registry.skeleton(framework.as_str(), pattern);
        if skeleton.is_empty() {
            warn!("pattern '{}' not found for framework '{}'", pattern, framework);
        }
        skeleton
    }
}

/// Prefix the generated code with the pattern skeleton under labeled separators.
pub fn combine_scripts(template: &str, generated: &str) -> String {
    let template = template.trim_start_matches('\n');
    if template.trim().is_empty() {
        return generated.to_string();
    }

    format!(
        "// Template Pattern:\n{}\n\n// Generated Implementation:\n{}",
        template, generated
    )
}

async fn read_screenshot(path: &Path) -> Result<Vec<u8>, ScriptError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| ScriptError::FileSystem {
            path: path.to_path_buf(),
            source,
        })
}

fn release_screenshot(screenshot: Option<ScreenshotSource>) {
    if let Some(ScreenshotSource::Upload(temp)) = screenshot {
        let path = temp.to_path_buf();
        match temp.close() {
            Ok(()) => debug!("removed upload {}", path.display()),
            Err(e) => warn!("could not delete temporary screenshot {}: {}", path.display(), e),
        }
    }
}
