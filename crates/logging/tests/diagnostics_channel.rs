//! Integration tests for the diagnostics side channel.
//!
//! Configuration problems and unregistered-tag notices travel through
//! [`Diagnostics`], never through the message callback.

use std::sync::Arc;

use logging::{
    CallbackUpdate, DiagnosticEvent, Diagnostics, Engine, EngineOptions, InvalidLevelFallback,
    LevelConfig, RecordingDiagnostics, Severity, args,
};
use test_support::Capture;

fn recorded(options: EngineOptions) -> (Engine, Arc<RecordingDiagnostics>) {
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    let engine = Engine::with_diagnostics(options, diagnostics.clone() as Arc<dyn Diagnostics>);
    (engine, diagnostics)
}

/// The warning names the tag, the rejected value and the substitute.
#[test]
fn invalid_level_warning_text() {
    let (mut engine, diagnostics) = recorded(EngineOptions::default());
    let capture = Capture::new();

    engine
        .init(
            &LevelConfig::from([("invalidTag", "INVALID_LEVEL")]),
            CallbackUpdate::replace(capture.sink()),
        )
        .unwrap();

    assert_eq!(
        diagnostics.drain_events(),
        [DiagnosticEvent::InvalidLevel {
            tag: "invalidTag".to_owned(),
            raw: "INVALID_LEVEL".to_owned(),
            substituted: Severity::Info,
            message: "Invalid log level \"INVALID_LEVEL\" for tag \"invalidTag\". Using default (INFO)."
                .to_owned(),
        }]
    );
    assert!(capture.is_empty());
}

/// Every invalid entry is reported and the rest of the configuration still applies.
#[test]
fn invalid_entries_do_not_abort_configuration() {
    let (mut engine, diagnostics) = recorded(EngineOptions::default());

    engine
        .configure(
            &LevelConfig::new()
                .with("a", "LOUD")
                .with("b", "DEBUG")
                .with("c", "")
                .with("*", "WARN"),
        )
        .unwrap();

    assert_eq!(
        diagnostics.warnings(),
        [
            "Invalid log level \"LOUD\" for tag \"a\". Using default (WARN).",
            "Invalid log level \"\" for tag \"c\". Using default (WARN).",
        ]
    );
    assert_eq!(engine.effective_level("b"), Severity::Debug);
    assert_eq!(engine.tags().to_vec(), ["a", "b", "c"]);
}

/// A fixed fallback is announced without the "default" wording.
#[test]
fn fixed_fallback_warning_text() {
    let (mut engine, diagnostics) = recorded(
        EngineOptions::default().with_invalid_fallback(InvalidLevelFallback::Fixed(Severity::Debug)),
    );
    engine
        .configure(&LevelConfig::from([("x", "nope")]))
        .unwrap();

    assert_eq!(
        diagnostics.warnings(),
        ["Invalid log level \"nope\" for tag \"x\". Using DEBUG."]
    );
}

/// A string that is not a registered tag is noticed, then logged as message text.
#[test]
fn unregistered_tag_notice() {
    let (mut engine, diagnostics) = recorded(EngineOptions::default());
    let capture = Capture::new();
    engine
        .init(
            &LevelConfig::from([("known", "INFO")]),
            CallbackUpdate::replace(capture.sink()),
        )
        .unwrap();

    engine.info(args!["unknownTag", "text"]).unwrap();
    engine.info(args!["plain message"]).unwrap();
    engine.info(args!["known", "tagged"]).unwrap();

    assert_eq!(
        diagnostics.drain_events(),
        [DiagnosticEvent::UnregisteredTag {
            candidate: "unknownTag".to_owned()
        }]
    );
    assert_eq!(
        capture.rendered(),
        ["INFO: unknownTag, text", "INFO: plain message", "INFO: [known] tagged"]
    );
}

/// Nothing is reported for a clean configuration.
#[test]
fn clean_configuration_is_silent() {
    let (mut engine, diagnostics) = recorded(EngineOptions::default());
    engine
        .configure(&"net=TRACE, ui=OFF, WARN".parse::<LevelConfig>().unwrap())
        .unwrap();
    assert!(diagnostics.drain_events().is_empty());
    assert_eq!(engine.default_level(), Severity::Warn);
}

/// Level names are matched exactly; other spellings take the fallback path.
#[test]
fn non_canonical_level_spellings_are_invalid() {
    let (mut engine, diagnostics) = recorded(EngineOptions::default());
    engine
        .configure(&LevelConfig::from([("x", "trace"), ("y", " ERROR ")]))
        .unwrap();

    assert_eq!(
        diagnostics.warnings(),
        [
            "Invalid log level \"trace\" for tag \"x\". Using default (INFO).",
            "Invalid log level \" ERROR \" for tag \"y\". Using default (INFO).",
        ]
    );
    assert_eq!(engine.effective_level("x"), Severity::Info);
    assert_eq!(engine.effective_level("y"), Severity::Info);
    assert!(!engine.is_level_enabled("info", None));
    assert!(engine.is_level_enabled("INFO", None));
}
