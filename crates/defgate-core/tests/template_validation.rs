use std::sync::Arc;
use std::time::Duration;

use defgate_core::template::fakes::{ScriptedCompiler, ScriptedSharedCompiler, ScriptedValue};
use defgate_core::{
    CompileOptions, ContextTemplateValidator, GateError, TemplateError, TemplateValidator,
};
use tokio_util::sync::CancellationToken;

const DEFERRED: &str = r#"foo: reference "context" not found"#;
const DEFERRED_EXTRA: &str = r#"foo: reference "context" not found extra"#;
const SYNTAX: &str = "expected '}', found 'EOF'";

fn compiler() -> ScriptedCompiler {
    ScriptedCompiler::new()
        .on("clean", ScriptedValue::clean())
        .on("deferred", ScriptedValue::clean().with_compile_error(DEFERRED))
        .on(
            "deferred-extra",
            ScriptedValue::clean().with_compile_error(DEFERRED_EXTRA),
        )
        .on("syntax", ScriptedValue::clean().with_compile_error(SYNTAX))
        .on(
            "incomplete",
            ScriptedValue::clean()
                .with_validate_error(DEFERRED)
                .with_validate_error("output.spec.replicas: incomplete value int"),
        )
}

// ---- Local compile ----

#[test]
fn template_without_diagnostics_passes() {
    assert!(TemplateValidator::new(compiler()).validate("clean").is_ok());
}

#[test]
fn deferred_context_reference_is_suppressed() {
    assert!(TemplateValidator::new(compiler())
        .validate("deferred")
        .is_ok());
}

#[test]
fn trailing_text_after_context_reference_fails() {
    let err = TemplateValidator::new(compiler())
        .validate("deferred-extra")
        .unwrap_err();
    assert_eq!(err.to_string(), DEFERRED_EXTRA);
}

#[test]
fn syntax_error_fails_with_message() {
    let err = TemplateValidator::new(compiler())
        .validate("syntax")
        .unwrap_err();
    assert!(!err.to_string().is_empty());
    assert_eq!(err.diagnostics(), [SYNTAX.to_string()]);
    assert!(!err.is_infrastructure());
}

#[test]
fn validation_pass_errors_surface() {
    let err = TemplateValidator::new(compiler())
        .validate("incomplete")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "output.spec.replicas: incomplete value int"
    );
}

#[test]
fn failed_compile_does_not_leak_into_later_calls() {
    let validator = TemplateValidator::new(compiler());
    validator.validate("clean").unwrap();
    validator.validate("clean").unwrap();
    assert!(validator.validate("syntax").is_err());
    assert!(validator.validate("clean").is_ok());
}

// ---- Context-aware compile ----

#[tokio::test]
async fn shared_compiler_applies_same_policy() {
    let validator = ContextTemplateValidator::new(Arc::new(ScriptedSharedCompiler::new(compiler())));
    let cancel = CancellationToken::new();

    assert!(validator.validate("clean", &cancel).await.is_ok());
    assert!(validator.validate("deferred", &cancel).await.is_ok());
    assert!(validator.validate("deferred-extra", &cancel).await.is_err());
    assert!(validator.validate("syntax", &cancel).await.is_err());
}

#[tokio::test]
async fn options_reach_shared_compiler() {
    let shared = Arc::new(ScriptedSharedCompiler::new(compiler()));
    let options = CompileOptions::default().with_reference_resolution();
    let validator = ContextTemplateValidator::new(shared.clone()).with_options(options.clone());

    validator
        .validate("clean", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(shared.seen_options(), vec![options]);
}

#[tokio::test]
async fn concurrent_callers_share_one_compiler() {
    let shared = Arc::new(ScriptedSharedCompiler::new(compiler()));
    let validator = ContextTemplateValidator::new(shared.clone());

    let mut handles = Vec::new();
    for i in 0..8 {
        let validator = validator.clone();
        handles.push(tokio::spawn(async move {
            let source = if i % 2 == 0 { "clean" } else { "syntax" };
            validator
                .validate(source, &CancellationToken::new())
                .await
                .is_ok()
        }));
    }

    let mut passed = 0;
    for handle in handles {
        if handle.await.unwrap() {
            passed += 1;
        }
    }
    assert_eq!(passed, 4);
    assert_eq!(shared.compiles(), 8);
}

#[tokio::test(start_paused = true)]
async fn cancellation_aborts_slow_compile() {
    let shared = ScriptedSharedCompiler::new(compiler()).with_latency(Duration::from_secs(3600));
    let validator = ContextTemplateValidator::new(Arc::new(shared));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        trigger.cancel();
    });

    let err = validator.validate("clean", &cancel).await.unwrap_err();
    assert!(matches!(err, TemplateError::Cancelled));
    assert!(GateError::from(err).is_infrastructure());
}

#[tokio::test]
async fn already_cancelled_token_skips_compile() {
    let shared = Arc::new(ScriptedSharedCompiler::new(compiler()));
    let validator = ContextTemplateValidator::new(shared.clone());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = validator.validate("clean", &cancel).await.unwrap_err();
    assert!(matches!(err, TemplateError::Cancelled));
    assert_eq!(shared.compiles(), 0);
}

#[tokio::test(start_paused = true)]
async fn timeout_bounds_compile() {
    let shared = ScriptedSharedCompiler::new(compiler()).with_latency(Duration::from_secs(60));
    let validator = ContextTemplateValidator::new(Arc::new(shared))
        .with_options(CompileOptions::default().with_timeout(Duration::from_secs(5)));

    let err = validator
        .validate("clean", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TemplateError::Timeout(d) if d == Duration::from_secs(5)));
    assert!(err.is_infrastructure());
}
