use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::ImageFormat;
use screen_script::generation::backend::{MockTextInference, TextInference};
use screen_script::screen::screen_model::{ElementType, ScreenPosition};
use screen_script::service::error::{NO_ELEMENTS_MESSAGE, ScriptError};
use screen_script::service::request::{
    GenerateRequest, ScreenshotSource, parse_predefined_elements,
};
use screen_script::service::script_service::{ServiceTimeouts, combine_scripts};
use screen_script::templates::registry::TemplateRegistry;
use screen_script::trace::logger::TraceLogger;
use screen_script::trace::trace::fingerprint;
use screen_script::vision::client::{DisabledVisionBackend, FixtureVisionBackend, VisionBackend};
use screen_script::vision::image_check::inspect_screenshot;
use screen_script::vision::vision_model::{AnnotateResult, ImageFrame};

mod common;
use common::{
    GENERATED, LOGIN_ELEMENTS_JSON, annotate, image_bytes, login_annotation, mock_service,
    png_bytes, service_with, span,
};

struct SlowGenerator;

#[async_trait]
impl TextInference for SlowGenerator {
    async fn infer_text(&self, _prompt: &str) -> Result<String, ScriptError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("too late".to_string())
    }
}

struct FailingGenerator;

#[async_trait]
impl TextInference for FailingGenerator {
    async fn infer_text(&self, _prompt: &str) -> Result<String, ScriptError> {
        Err(ScriptError::external("generation", "quota exceeded"))
    }
}

struct SlowVision;

#[async_trait]
impl VisionBackend for SlowVision {
    async fn annotate(&self, _image: &[u8]) -> Result<AnnotateResult, ScriptError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(AnnotateResult::default())
    }
}

fn short_timeouts() -> ServiceTimeouts {
    ServiceTimeouts {
        vision_secs: 1,
        generation_secs: 1,
    }
}

// =========================================================================
// Happy paths
// =========================================================================

#[tokio::test]
async fn predefined_elements_with_pattern_prefix_skeleton() {
    let service = mock_service(AnnotateResult::default());
    let request = GenerateRequest::new("Playwright")
        .with_use_case("Log in")
        .with_pattern("pageObjectModel")
        .with_predefined_elements(LOGIN_ELEMENTS_JSON);

    let script = service.generate(request).await.unwrap();

    let skeleton = TemplateRegistry::builtin().skeleton("Playwright", "pageObjectModel");
    let expected = format!(
        "// Template Pattern:\n{}\n\n// Generated Implementation:\n{}",
        skeleton.trim_start_matches('\n'),
        GENERATED
    );
    assert_eq!(script, expected);
}

#[tokio::test]
async fn missing_or_unknown_pattern_returns_generated_text_only() {
    let service = mock_service(AnnotateResult::default());

    let plain = GenerateRequest::new("Espresso").with_predefined_elements(LOGIN_ELEMENTS_JSON);
    assert_eq!(service.generate(plain).await.unwrap(), GENERATED);

    let unknown = GenerateRequest::new("Espresso")
        .with_pattern("pageObjectModel")
        .with_predefined_elements(LOGIN_ELEMENTS_JSON);
    assert_eq!(service.generate(unknown).await.unwrap(), GENERATED);
}

#[tokio::test]
async fn screenshot_is_classified_when_no_elements_given() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("login.png");
    std::fs::write(&path, png_bytes(200, 200)).unwrap();

    let service = mock_service(login_annotation());
    let elements = service.analyze_screenshot(&path).await.unwrap();

    let summary: Vec<(&str, ElementType)> = elements
        .iter()
        .map(|e| (e.text.as_str(), e.element_type))
        .collect();
    assert_eq!(
        summary,
        vec![("Sign In", ElementType::StaticText), ("Email", ElementType::TextField)]
    );
    assert_eq!(elements[0].visual_context.position, ScreenPosition::Header);

    let request = GenerateRequest::new("XCUITest")
        .with_screenshot(ScreenshotSource::Path(path.clone()));
    assert_eq!(service.generate(request).await.unwrap(), GENERATED);
    assert!(path.exists(), "Caller-owned screenshots are left alone");
}

#[tokio::test]
async fn predefined_elements_take_precedence_over_screenshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shot.png");
    std::fs::write(&path, png_bytes(200, 200)).unwrap();

    // Vision would fail if it were called
    let service = service_with(
        Arc::new(DisabledVisionBackend),
        Arc::new(MockTextInference::new(GENERATED)),
    );
    let request = GenerateRequest::new("Playwright")
        .with_screenshot(ScreenshotSource::Path(path))
        .with_predefined_elements(LOGIN_ELEMENTS_JSON);

    assert_eq!(service.generate(request).await.unwrap(), GENERATED);
}

// =========================================================================
// Failures
// =========================================================================

#[tokio::test]
async fn empty_predefined_list_reports_no_elements() {
    let service = mock_service(login_annotation());
    let request = GenerateRequest::new("Playwright").with_predefined_elements("[]");

    let err = service.generate(request).await.unwrap_err();
    assert!(matches!(err, ScriptError::NoElementsDetected));
    assert_eq!(err.to_string(), NO_ELEMENTS_MESSAGE);
    assert_eq!(err.kind(), "NoElementsDetectedError");
}

#[tokio::test]
async fn no_input_at_all_reports_no_elements() {
    let service = mock_service(login_annotation());
    let err = service.generate(GenerateRequest::new("XCUITest")).await.unwrap_err();
    assert_eq!(err.kind(), "NoElementsDetectedError");
}

#[tokio::test]
async fn framework_is_validated() {
    let service = mock_service(AnnotateResult::default());

    let unsupported = GenerateRequest::new("Cypress").with_predefined_elements(LOGIN_ELEMENTS_JSON);
    let err = service.generate(unsupported).await.unwrap_err();
    assert_eq!(err.kind(), "ValidationError");
    assert!(err.to_string().contains("Cypress"));

    let missing = GenerateRequest::new("  ").with_predefined_elements(LOGIN_ELEMENTS_JSON);
    let err = service.generate(missing).await.unwrap_err();
    assert_eq!(err.kind(), "ValidationError");
    assert!(err.to_string().starts_with("framework is required"));
}

#[tokio::test]
async fn missing_screenshot_path_is_a_validation_error() {
    let service = mock_service(login_annotation());
    let request = GenerateRequest::new("XCUITest")
        .with_screenshot(ScreenshotSource::Path("/nonexistent/shot.png".into()));

    let err = service.generate(request).await.unwrap_err();
    assert_eq!(err.kind(), "ValidationError");
    assert!(err.to_string().starts_with("Screenshot file not found at path:"));
}

#[tokio::test]
async fn generation_failures_surface_unchanged() {
    let failing = service_with(
        Arc::new(DisabledVisionBackend),
        Arc::new(FailingGenerator),
    );
    let request = GenerateRequest::new("Playwright").with_predefined_elements(LOGIN_ELEMENTS_JSON);
    let err = failing.generate(request).await.unwrap_err();
    assert_eq!(err.kind(), "ExternalServiceError");
    assert!(err.to_string().contains("quota exceeded"));

    let empty = service_with(
        Arc::new(DisabledVisionBackend),
        Arc::new(MockTextInference::new("   ")),
    );
    let request = GenerateRequest::new("Playwright").with_predefined_elements(LOGIN_ELEMENTS_JSON);
    assert_eq!(
        empty.generate(request).await.unwrap_err().kind(),
        "ExternalServiceError"
    );
}

#[tokio::test]
async fn slow_generation_times_out() {
    let service = service_with(Arc::new(DisabledVisionBackend), Arc::new(SlowGenerator))
        .with_timeouts(short_timeouts());
    let request = GenerateRequest::new("Playwright").with_predefined_elements(LOGIN_ELEMENTS_JSON);

    let err = service.generate(request).await.unwrap_err();
    assert_eq!(err.kind(), "TimeoutError");
    assert!(err.to_string().contains("generation"));
}

#[tokio::test]
async fn slow_vision_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shot.png");
    std::fs::write(&path, png_bytes(200, 200)).unwrap();

    let service = service_with(Arc::new(SlowVision), Arc::new(MockTextInference::new(GENERATED)))
        .with_timeouts(short_timeouts());

    let err = service.analyze_screenshot(&path).await.unwrap_err();
    assert!(matches!(err, ScriptError::Timeout { seconds: 1, .. }));
}

// =========================================================================
// Upload cleanup
// =========================================================================

fn upload(dir: &std::path::Path) -> (ScreenshotSource, std::path::PathBuf) {
    let file = tempfile::NamedTempFile::new_in(dir).unwrap();
    std::fs::write(file.path(), png_bytes(200, 200)).unwrap();
    let temp = file.into_temp_path();
    let path = temp.to_path_buf();
    (ScreenshotSource::Upload(temp), path)
}

#[tokio::test]
async fn uploads_are_removed_after_success() {
    let dir = tempfile::tempdir().unwrap();
    let (source, path) = upload(dir.path());

    let service = mock_service(login_annotation());
    let request = GenerateRequest::new("XCUITest").with_screenshot(source);

    service.generate(request).await.unwrap();
    assert!(!path.exists());
}

#[tokio::test]
async fn uploads_are_removed_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    let (source, path) = upload(dir.path());

    let service = mock_service(login_annotation());
    let request = GenerateRequest::new("Cypress").with_screenshot(source);

    assert!(service.generate(request).await.is_err());
    assert!(!path.exists());
}

// =========================================================================
// Trace log
// =========================================================================

#[tokio::test]
async fn each_request_appends_one_trace_line() {
    let dir = tempfile::tempdir().unwrap();
    let trace_path = dir.path().join("trace.jsonl");
    let shot = dir.path().join("shot.png");
    let bytes = png_bytes(200, 200);
    std::fs::write(&shot, &bytes).unwrap();

    let service = mock_service(login_annotation()).with_tracer(TraceLogger::new(&trace_path));

    let ok = GenerateRequest::new("Playwright")
        .with_pattern("fixtureBasedTests")
        .with_predefined_elements(LOGIN_ELEMENTS_JSON);
    service.generate(ok).await.unwrap();

    let from_shot = GenerateRequest::new("XCUITest").with_screenshot(ScreenshotSource::Path(shot));
    service.generate(from_shot).await.unwrap();

    let failing = GenerateRequest::new("Playwright").with_predefined_elements("[]");
    assert!(service.generate(failing).await.is_err());

    let content = std::fs::read_to_string(&trace_path).unwrap();
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);

    assert_eq!(lines[0]["outcome"], "success");
    assert_eq!(lines[0]["framework"], "Playwright");
    assert_eq!(lines[0]["pattern"], "fixtureBasedTests");
    assert_eq!(lines[0]["element_source"], "predefined");
    assert_eq!(lines[0]["element_count"], 2);
    assert!(lines[0]["screenshot_sha1"].is_null());

    assert_eq!(lines[1]["element_source"], "screenshot");
    assert_eq!(lines[1]["screenshot_sha1"], fingerprint(&bytes).as_str());

    assert_eq!(lines[2]["outcome"], "failure");
    assert_eq!(lines[2]["error_kind"], "NoElementsDetectedError");
}

#[test]
fn fingerprint_is_hex_sha1() {
    assert_eq!(fingerprint(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
}

// =========================================================================
// Script combination
// =========================================================================

#[test]
fn combine_scripts_labels_both_parts() {
    assert_eq!(
        combine_scripts("\n\nclass Page {}", "test()"),
        "// Template Pattern:\nclass Page {}\n\n// Generated Implementation:\ntest()"
    );
    assert_eq!(combine_scripts("", "test()"), "test()");
    assert_eq!(combine_scripts("\n  \n", "test()"), "test()");
}

// =========================================================================
// Predefined element parsing
// =========================================================================

#[test]
fn predefined_manual_shape_gets_identifiers() {
    let elements = parse_predefined_elements(LOGIN_ELEMENTS_JSON).unwrap();

    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].element_type, ElementType::TextField);
    assert_eq!(elements[0].text, "Email");
    assert_eq!(elements[0].case_identifier, "emailTxt");
    assert_eq!(elements[1].case_identifier, "signInBtn");
}

#[test]
fn predefined_analysed_shape_round_trips_context() {
    let json = r#"[{
        "type": "staticText",
        "text": "Welcome",
        "caseIdentifier": "welcomeTitle",
        "bounds": [{"x": 10, "y": 20}, {"x": 110, "y": 20}, {"x": 110, "y": 50}, {"x": 10, "y": 50}],
        "visualContext": {"position": "header", "hasStandardSize": true}
    }]"#;
    let elements = parse_predefined_elements(json).unwrap();

    let el = &elements[0];
    assert_eq!(el.case_identifier, "welcomeTitle");
    assert_eq!(el.visual_context.position, ScreenPosition::Header);
    assert!(el.visual_context.has_standard_size);
    assert_eq!(el.top(), 20.0);
}

#[test]
fn predefined_visual_properties_keep_original_key_names() {
    let json = r#"[{
        "type": "button",
        "text": "Continue",
        "visualProperties": {
            "hasDistinctBackground": false,
            "isInButtonLikeObject": true,
            "hasStandardButtonSize": true,
            "isAlignedWithOthers": true,
            "position": "footer"
        }
    }]"#;
    let elements = parse_predefined_elements(json).unwrap();

    let context = elements[0].visual_context;
    assert!(context.is_in_button_like_object);
    assert!(context.has_standard_size);
    assert!(context.is_aligned);
    assert_eq!(context.position, ScreenPosition::Footer);
}

#[test]
fn predefined_invalid_identifier_falls_back() {
    let json = r#"[
        {"type": "input", "name": "Email", "identifier": "email-input"},
        {"type": "button", "identifier": "saveBtn"}
    ]"#;
    let elements = parse_predefined_elements(json).unwrap();

    assert_eq!(elements[0].element_type, ElementType::TextField);
    assert_eq!(elements[0].case_identifier, "emailTxt");
    assert_eq!(elements[1].text, "saveBtn", "Identifier doubles as text");
    assert_eq!(elements[1].case_identifier, "saveBtn");
}

#[test]
fn predefined_rejects_bad_input() {
    let unknown = parse_predefined_elements(r#"[{"type": "slider", "name": "Volume"}]"#);
    assert_eq!(unknown.unwrap_err().kind(), "ValidationError");

    let malformed = parse_predefined_elements("[{");
    assert_eq!(malformed.unwrap_err().kind(), "ValidationError");

    let anonymous = parse_predefined_elements(r#"[{"type": "button"}]"#);
    assert_eq!(anonymous.unwrap_err().kind(), "ValidationError");

    assert!(parse_predefined_elements("[]").unwrap().is_empty());
}

#[test]
fn blank_optional_fields_count_as_absent() {
    let request = GenerateRequest::new("XCUITest")
        .with_pattern("  ")
        .with_predefined_elements(" ");
    assert_eq!(request.pattern_id(), None);
    assert_eq!(request.predefined_json(), None);
}

// =========================================================================
// Screenshot checks and vision fixtures
// =========================================================================

#[test]
fn screenshot_checks() {
    assert_eq!(
        inspect_screenshot(&png_bytes(320, 640)).unwrap(),
        ImageFrame {
            width: 320,
            height: 640
        }
    );
    assert!(inspect_screenshot(&image_bytes(150, 150, ImageFormat::Jpeg)).is_ok());

    let tiny = inspect_screenshot(&png_bytes(50, 50)).unwrap_err();
    assert!(tiny.to_string().contains("too small"));

    assert_eq!(inspect_screenshot(b"not an image").unwrap_err().kind(), "ValidationError");
    assert_eq!(inspect_screenshot(&[]).unwrap_err().kind(), "ValidationError");
    assert_eq!(
        inspect_screenshot(&image_bytes(120, 120, ImageFormat::Bmp))
            .unwrap_err()
            .kind(),
        "ValidationError"
    );
}

#[tokio::test]
async fn fixture_backend_reads_bare_and_batch_shapes() {
    let dir = tempfile::tempdir().unwrap();
    let result = login_annotation();

    let bare = dir.path().join("bare.json");
    std::fs::write(&bare, serde_json::to_string(&result).unwrap()).unwrap();
    let loaded = FixtureVisionBackend::new(&bare).annotate(&[]).await.unwrap();
    assert_eq!(loaded, result);

    let batch = dir.path().join("batch.json");
    let envelope = serde_json::json!({ "responses": [result] });
    std::fs::write(&batch, envelope.to_string()).unwrap();
    let loaded = FixtureVisionBackend::new(&batch).annotate(&[]).await.unwrap();
    assert_eq!(loaded.text_annotations.len(), 4);
    assert_eq!(loaded.text_annotations[1].description, "Sign In");

    let missing = FixtureVisionBackend::new(dir.path().join("missing.json"));
    assert_eq!(missing.annotate(&[]).await.unwrap_err().kind(), "FileSystemError");
}

#[tokio::test]
async fn disabled_vision_reports_external_error() {
    let err = DisabledVisionBackend.annotate(&[]).await.unwrap_err();
    assert_eq!(err.kind(), "ExternalServiceError");
}

// =========================================================================
// Screenshot comparison
// =========================================================================

/// Answers with the login screen for 200px wide images and with a
/// password-only form for anything wider.
struct ScreenByWidth;

#[async_trait]
impl VisionBackend for ScreenByWidth {
    async fn annotate(&self, image: &[u8]) -> Result<AnnotateResult, ScriptError> {
        let frame = inspect_screenshot(image)?;
        if frame.width == 200 {
            return Ok(login_annotation());
        }
        Ok(annotate(vec![
            span("Email", 20.0, 80.0, 120.0, 20.0),
            span("Password", 20.0, 150.0, 120.0, 20.0),
        ]))
    }
}

#[tokio::test]
async fn compare_screenshots_reports_added_and_removed() {
    let dir = tempfile::tempdir().unwrap();
    let before = dir.path().join("before.png");
    let after = dir.path().join("after.png");
    std::fs::write(&before, png_bytes(200, 200)).unwrap();
    std::fs::write(&after, png_bytes(300, 300)).unwrap();

    let service = service_with(
        Arc::new(ScreenByWidth),
        Arc::new(MockTextInference::new(GENERATED)),
    );
    let changes = service.compare_screenshots(&before, &after).await.unwrap();

    let added: Vec<&str> = changes.added.iter().map(|e| e.text.as_str()).collect();
    let removed: Vec<&str> = changes.removed.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(added, vec!["Password"]);
    assert_eq!(removed, vec!["Sign In"]);
}

#[tokio::test]
async fn compare_identical_screens_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("login.png");
    std::fs::write(&path, png_bytes(200, 200)).unwrap();

    let service = mock_service(login_annotation());
    let changes = service.compare_screenshots(&path, &path).await.unwrap();
    assert!(changes.is_empty());
}

#[tokio::test]
async fn compare_with_missing_screenshot_is_a_file_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("login.png");
    std::fs::write(&path, png_bytes(200, 200)).unwrap();

    let service = mock_service(login_annotation());
    let err = service
        .compare_screenshots(&path, &dir.path().join("missing.png"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "FileSystemError");
}
