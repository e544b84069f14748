use super::*;
use crate::args;
use crate::diagnostics::{DiagnosticEvent, RecordingDiagnostics};
use serde_json::json;
use test_support::Capture;

fn config<const N: usize>(entries: [(&str, &str); N]) -> LevelConfig {
    LevelConfig::from(entries)
}

fn recorded(options: EngineOptions) -> (Engine, Arc<RecordingDiagnostics>) {
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    let engine = Engine::with_diagnostics(options, Arc::clone(&diagnostics) as Arc<dyn Diagnostics>);
    (engine, diagnostics)
}

fn configured(entries: &LevelConfig, capture: &Capture) -> Engine {
    let mut engine = Engine::new();
    engine
        .init(entries, CallbackUpdate::replace(capture.sink()))
        .unwrap();
    engine
}

#[test]
fn fresh_engine_uses_baseline() {
    let engine = Engine::new();
    assert_eq!(engine.default_level(), Severity::Info);
    assert!(!engine.is_initialized());
    assert!(!engine.has_callback());
    assert!(engine.is_level_enabled("INFO", None));
    assert!(!engine.is_level_enabled("DEBUG", None));
}

#[test]
fn tagged_trace_reaches_callback() {
    let capture = Capture::new();
    let mut engine = configured(&config([("network", "TRACE"), ("*", "INFO")]), &capture);

    engine.trace(args!["network", "connected"]).unwrap();

    let records = capture.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, "TRACE");
    assert_eq!(records[0].tag, "network");
    assert_eq!(records[0].message, json!("connected"));
    assert!(records[0].params.is_empty());
}

#[test]
fn untagged_debug_is_filtered_by_default() {
    let capture = Capture::new();
    let mut engine = configured(&config([("*", "INFO")]), &capture);

    engine.debug(args!["no logging here"]).unwrap();
    assert!(capture.is_empty());
}

#[test]
fn tag_level_above_request_suppresses() {
    let capture = Capture::new();
    let mut engine = configured(&config([("security", "ERROR")]), &capture);

    engine.info(args!["security", "login ok"]).unwrap();
    engine.error(args!["security", "breach"]).unwrap();
    assert_eq!(capture.rendered(), ["ERROR: [security] breach"]);
}

#[test]
fn invalid_level_falls_back_to_default_and_warns() {
    let (mut engine, diagnostics) = recorded(EngineOptions::default());
    let capture = Capture::new();
    engine
        .init(
            &config([("bogus", "NOT_A_LEVEL"), ("*", "WARN")]),
            CallbackUpdate::replace(capture.sink()),
        )
        .unwrap();

    assert_eq!(
        diagnostics.warnings(),
        ["Invalid log level \"NOT_A_LEVEL\" for tag \"bogus\". Using default (WARN)."]
    );
    assert!(engine.tags().contains("bogus"));
    assert_eq!(engine.effective_level("bogus"), Severity::Warn);

    engine.info(args!["bogus", "x"]).unwrap();
    assert!(capture.is_empty());
    engine.warn(args!["bogus", "x"]).unwrap();
    assert_eq!(capture.len(), 1);
}

#[test]
fn fixed_fallback_is_used_when_selected() {
    let options =
        EngineOptions::default().with_invalid_fallback(InvalidLevelFallback::Fixed(Severity::Debug));
    let (mut engine, diagnostics) = recorded(options);
    engine
        .configure(&config([("invalidTag", "INVALID_LEVEL")]))
        .unwrap();

    assert_eq!(engine.effective_level("invalidTag"), Severity::Debug);
    assert_eq!(
        diagnostics.warnings(),
        ["Invalid log level \"INVALID_LEVEL\" for tag \"invalidTag\". Using DEBUG."]
    );
}

#[test]
fn invalid_wildcard_keeps_default() {
    let (mut engine, diagnostics) = recorded(EngineOptions::default());
    engine.configure(&config([("*", "LOUD")])).unwrap();

    assert_eq!(engine.default_level(), Severity::Info);
    assert_eq!(diagnostics.warnings().len(), 1);
    assert!(engine.tags().is_empty());
}

#[test]
fn wildcard_is_never_registered() {
    let mut engine = Engine::new();
    engine
        .configure(&config([("*", "DEBUG"), ("ui", "WARN")]))
        .unwrap();
    assert_eq!(engine.tags().to_vec(), ["ui"]);
    assert!(!engine.tags().contains("*"));
}

#[test]
fn init_merges_with_previous_configuration() {
    let mut engine = Engine::new();
    engine.configure(&config([("a", "ERROR")])).unwrap();
    engine.configure(&config([("b", "TRACE")])).unwrap();

    assert_eq!(engine.effective_level("a"), Severity::Error);
    assert_eq!(engine.effective_level("b"), Severity::Trace);
    assert_eq!(engine.tags().to_vec(), ["a", "b"]);
}

#[test]
fn callback_is_kept_unless_replaced_or_disabled() {
    let first = Capture::new();
    let second = Capture::new();
    let mut engine = configured(&config([("*", "INFO")]), &first);

    engine.configure(&config([("x", "INFO")])).unwrap();
    engine.info(args!["kept"]).unwrap();
    assert_eq!(first.len(), 1);

    engine
        .init(&LevelConfig::new(), CallbackUpdate::replace(second.sink()))
        .unwrap();
    engine.info(args!["replaced"]).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);

    engine.init(&LevelConfig::new(), CallbackUpdate::Disable).unwrap();
    assert!(!engine.has_callback());
    for severity in Severity::EMITTABLE {
        engine.log(severity, args!["silenced"]).unwrap();
    }
    assert_eq!(second.len(), 1);
}

#[test]
fn unknown_first_argument_is_part_of_message() {
    let (mut engine, diagnostics) = recorded(EngineOptions::default());
    let capture = Capture::new();
    engine
        .init(&config([("*", "INFO")]), CallbackUpdate::replace(capture.sink()))
        .unwrap();

    engine.info(args!["unknownTag", "should log as default"]).unwrap();

    let records = capture.records();
    assert_eq!(records[0].tag, "");
    assert_eq!(records[0].message, json!("unknownTag"));
    assert_eq!(records[0].params, [json!("should log as default")]);
    assert!(!engine.tags().contains("unknownTag"));
    assert_eq!(
        diagnostics.drain_events(),
        [DiagnosticEvent::UnregisteredTag {
            candidate: "unknownTag".to_owned()
        }]
    );
}

#[test]
fn tag_only_call_is_a_no_op() {
    let capture = Capture::new();
    let mut engine = configured(&config([("loader", "TRACE")]), &capture);
    engine.info(args!["loader"]).unwrap();
    engine.info(args!["loader", None::<&str>]).unwrap();
    engine.info(Vec::new()).unwrap();
    assert!(capture.is_empty());
}

#[test]
fn empty_message_policy_is_configurable() {
    let capture = Capture::new();
    let mut engine = configured(&LevelConfig::new(), &capture);
    engine.info(args![""]).unwrap();
    assert!(capture.is_empty());

    let mut permissive =
        Engine::with_options(EngineOptions::default().with_skip_empty_messages(false));
    permissive
        .init(&LevelConfig::new(), CallbackUpdate::replace(capture.sink()))
        .unwrap();
    permissive.info(args![""]).unwrap();
    assert_eq!(capture.len(), 1);
}

#[test]
fn undefined_params_are_dropped_before_delivery() {
    let capture = Capture::new();
    let mut engine = configured(&config([("loader", "INFO")]), &capture);
    engine
        .info(args!["loader", "msg", None::<&str>, "keep", None::<i64>])
        .unwrap();
    assert_eq!(capture.records()[0].params, [json!("keep")]);
}

#[test]
fn message_values_pass_through_untouched() {
    let capture = Capture::new();
    let mut engine = configured(&config([("*", "DEBUG")]), &capture);
    let payload = json!({"foo": "bar", "n": [1, 2]});
    engine.debug(args![payload.clone(), 7, true]).unwrap();

    let record = &capture.records()[0];
    assert_eq!(record.message, payload);
    assert_eq!(record.params, [json!(7), json!(true)]);
}

#[test]
fn off_is_never_emitted() {
    let capture = Capture::new();
    let mut engine = configured(&config([("*", "TRACE")]), &capture);
    engine.log(Severity::Off, args!["never"]).unwrap();
    assert!(capture.is_empty());
    assert!(!engine.is_level_enabled("OFF", None));
}

#[test]
fn off_tag_suppresses_everything() {
    let capture = Capture::new();
    let mut engine = configured(&config([("system", "OFF")]), &capture);
    for severity in Severity::EMITTABLE {
        engine.log(severity, args!["system", "quiet"]).unwrap();
    }
    assert!(capture.is_empty());
    assert!(engine.tags().describe("system").unwrap().enumerable);
}

#[test]
fn callback_failure_propagates() {
    let capture = Capture::new();
    let mut engine = configured(&config([("*", "INFO")]), &capture);
    capture.fail_with("Test Error");

    let err = engine.error(args!["boom"]).unwrap_err();
    assert!(matches!(err, LogError::Callback { level: Severity::Error, .. }));
    assert!(err.to_string().contains("Test Error"));
}

#[test]
fn level_queries() {
    let mut engine = Engine::new();
    engine
        .configure(&config([("*", "WARN"), ("db", "TRACE")]))
        .unwrap();

    assert!(engine.is_trace_enabled(Some("db")));
    assert!(!engine.is_debug_enabled(None));
    assert!(!engine.is_info_enabled(Some("")));
    assert!(engine.is_warn_enabled(Some("*")));
    assert!(engine.is_error_enabled(Some("unconfigured")));
    assert!(!engine.is_level_enabled("INVALID", None));
    assert!(engine.is_level_enabled(" debug ", Some("db")));
}

#[test]
fn queries_do_not_require_a_callback() {
    let mut engine = Engine::new();
    engine.configure(&config([("*", "DEBUG")])).unwrap();
    assert!(!engine.has_callback());
    assert!(engine.is_debug_enabled(None));
}

#[test]
fn reset_restores_baseline_and_keeps_callback() {
    let capture = Capture::new();
    let mut engine = configured(&config([("*", "ERROR"), ("net", "TRACE")]), &capture);

    engine.reset();

    assert_eq!(engine.default_level(), Severity::Info);
    assert!(engine.tags().is_empty());
    assert!(!engine.is_initialized());
    assert!(engine.has_callback());
    assert_eq!(
        engine.is_level_enabled("INFO", None),
        Engine::new().is_level_enabled("INFO", None)
    );
}

#[test]
fn reset_resumes_buffering() {
    let capture = Capture::new();
    let mut engine = configured(&LevelConfig::new(), &capture);
    engine.reset();

    engine.info(args!["held"]).unwrap();
    assert!(capture.is_empty());
    assert_eq!(engine.buffered_len(), 1);

    engine.configure(&LevelConfig::new()).unwrap();
    assert_eq!(capture.rendered(), ["INFO: held"]);
}

#[test]
fn pre_init_calls_replay_through_new_configuration() {
    let capture = Capture::new();
    let mut engine = Engine::new();

    engine.info(args!["early"]).unwrap();
    engine.debug(args!["filtered"]).unwrap();
    engine.trace(args!["net", "tagged early"]).unwrap();
    assert_eq!(engine.buffered_len(), 3);

    engine
        .init(
            &config([("*", "INFO"), ("net", "TRACE")]),
            CallbackUpdate::replace(capture.sink()),
        )
        .unwrap();

    assert_eq!(capture.rendered(), ["INFO: early", "TRACE: [net] tagged early"]);
    assert_eq!(engine.buffered_len(), 0);

    engine
        .init(&LevelConfig::new(), CallbackUpdate::Keep)
        .unwrap();
    assert_eq!(capture.len(), 2);
}

#[test]
fn buffer_overflow_drops_newest() {
    let capture = Capture::new();
    let mut engine = Engine::with_options(EngineOptions::default().with_buffer_capacity(2));
    for n in 0..5 {
        engine.info(args![format!("call {n}")]).unwrap();
    }
    assert_eq!(engine.buffered_len(), 2);

    engine
        .init(&LevelConfig::new(), CallbackUpdate::replace(capture.sink()))
        .unwrap();
    assert_eq!(capture.rendered(), ["INFO: call 0", "INFO: call 1"]);
}

#[test]
fn zero_capacity_evaluates_live() {
    let capture = Capture::new();
    let mut engine = Engine::with_options(EngineOptions::default().with_buffer_capacity(0));
    engine
        .init(&LevelConfig::new(), CallbackUpdate::replace(capture.sink()))
        .unwrap();
    engine.reset();

    engine.info(args!["live"]).unwrap();
    assert_eq!(engine.buffered_len(), 0);
    assert_eq!(capture.len(), 1);
}

#[test]
fn replay_stops_at_first_failure() {
    let capture = Capture::new();
    capture.fail_with("sink down");
    let mut engine = Engine::new();
    engine.info(args!["first"]).unwrap();
    engine.info(args!["second"]).unwrap();

    let err = engine
        .init(&LevelConfig::new(), CallbackUpdate::replace(capture.sink()))
        .unwrap_err();
    assert!(err.to_string().contains("sink down"));
    assert!(engine.is_initialized());
    assert_eq!(engine.buffered_len(), 0);

    capture.succeed();
    engine.configure(&LevelConfig::new()).unwrap();
    assert!(capture.is_empty());
}

#[test]
fn cache_is_transparent_and_invalidated_by_init() {
    let mut engine = Engine::new();
    engine.configure(&config([("net", "WARN")])).unwrap();

    assert!(!engine.is_info_enabled(Some("net")));
    assert!(!engine.is_info_enabled(Some("net")));
    let stats = engine.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);

    engine.configure(&config([("net", "DEBUG")])).unwrap();
    assert!(engine.is_info_enabled(Some("net")));
    assert_eq!(engine.cache_stats().entries, 1);
}

#[test]
fn unconfigured_tags_share_the_default_cache_row() {
    let engine = Engine::new();
    assert!(engine.is_info_enabled(Some("a")));
    assert!(engine.is_info_enabled(Some("b")));
    assert!(engine.is_info_enabled(None));
    assert_eq!(engine.cache_stats().entries, 1);
    assert_eq!(engine.cache_stats().hits, 2);
}

#[test]
fn engine_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<Engine>();
}

#[test]
fn debug_output_hides_callback() {
    let engine = Engine::new();
    let rendered = format!("{engine:?}");
    assert!(rendered.contains("has_callback: false"));
    assert!(rendered.contains("initialized: false"));
}
