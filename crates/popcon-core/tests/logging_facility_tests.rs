#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{empty_builder_handler, noise_handler};
use popcon_core::core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_CYCLE_ID, FIELD_DURATION_MS, FIELD_ERR_CODE,
    FIELD_HANDLER, FIELD_SINCE, FIELD_TAG,
};
use popcon_core::core_types::CycleContext;
use popcon_core::errors::{ExError, ExErrorKind};
use popcon_core::logging_facility::test_capture::init_test_capture;
use popcon_core::{log_op_end, log_op_error, log_op_start};
use popcon_core::{HandlerConfig, PopConSourceHandler, TagState};
use tracing::Level;

#[test]
fn test_log_op_start_and_end_macros() {
    let capture = init_test_capture();
    let op_name = "test_log_op_boundaries_unique_1";

    log_op_start!(op_name, tag = "SiStripNoise_v1");
    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    let starts = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .count();
    let ends: Vec<_> = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(starts, 1, "Should have exactly one start event");
    assert_eq!(ends.len(), 1, "Should have exactly one end event");
    assert_eq!(ends[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_2";

    let err = ExError::new(ExErrorKind::Persistence).with_message("database is locked");
    log_op_error!(op_name, err, duration_ms = 10);

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let events = capture.events_for_op(op_name);
    assert_eq!(events[0].field(FIELD_ERR_CODE), Some("ERR_PERSISTENCE"));
    assert_eq!(events[0].level, Level::ERROR);
}

#[test]
fn test_missing_payload_logged_at_error_level() {
    let capture = init_test_capture();
    let handler_name = "logging_missing_payload_handler";

    let mut handler = empty_builder_handler(HandlerConfig::new(handler_name), "runB");
    handler.get_new_objects(&TagState::with_last_upload("T", 3, "h@runA"));

    let errors = capture.count_events(|e| {
        e.level == Level::ERROR
            && e.op.as_deref() == Some("set_for_transfer")
            && e.field(FIELD_HANDLER) == Some(handler_name)
            && e.field(FIELD_ERR_CODE) == Some("ERR_MISSING_PAYLOAD")
    });
    assert_eq!(errors, 1);
}

#[test]
fn test_staged_since_is_logged() {
    let capture = init_test_capture();
    let handler_name = "logging_staged_since_handler";

    let mut handler = noise_handler(HandlerConfig::new(handler_name).with_debug(true), "runB");
    handler.get_new_objects(&TagState::with_last_upload("T", 41, "h@runA"));

    let staged = capture.count_events(|e| {
        e.op.as_deref() == Some("set_for_transfer")
            && e.field(FIELD_HANDLER) == Some(handler_name)
            && e.field(FIELD_SINCE) == Some("42")
    });
    assert_eq!(staged, 1);
}

#[test]
fn test_debug_snapshot_emitted_only_in_debug_mode() {
    let capture = init_test_capture();
    let quiet = "logging_quiet_handler";
    let verbose = "logging_verbose_handler";
    let state = TagState::with_last_upload("T", 2, "h@runA");

    noise_handler(HandlerConfig::new(quiet), "runA").get_new_objects(&state);
    noise_handler(HandlerConfig::new(verbose).with_debug(true), "runA").get_new_objects(&state);

    let snapshots = |name: &str| {
        capture.count_events(|e| {
            e.field(FIELD_HANDLER) == Some(name)
                && e.field("message")
                    .map(|m| m.contains("got offlineInfo"))
                    .unwrap_or(false)
        })
    };
    assert_eq!(snapshots(quiet), 0);
    assert_eq!(snapshots(verbose), 1);
}

#[test]
fn test_cycle_context_fields_on_every_boundary_event() {
    let capture = init_test_capture();
    let op_name = "test_log_op_cycle_context_unique_3";
    let ctx = CycleContext::new("logging_ctx_handler", "SiStripNoise_ctx_v1");

    log_op_start!(op_name, ctx = &ctx, dry_run = true);
    log_op_end!(op_name, duration_ms = 5, ctx = &ctx, outcome = "staged");
    let err = ExError::new(ExErrorKind::Concurrency).with_message("tag moved");
    log_op_error!(op_name, err, duration_ms = 6, ctx = &ctx);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 3);
    for event in &events {
        assert_eq!(event.field(FIELD_CYCLE_ID), Some(ctx.cycle_id.as_str()));
        assert_eq!(event.field(FIELD_HANDLER), Some("logging_ctx_handler"));
        assert_eq!(event.field(FIELD_TAG), Some("SiStripNoise_ctx_v1"));
    }

    let start = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_START))
        .expect("start event");
    assert_eq!(start.field("dry_run"), Some("true"));

    let end = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .expect("end event");
    assert_eq!(end.field("outcome"), Some("staged"));
    assert_eq!(end.field(FIELD_DURATION_MS), Some("5"));

    let error = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("end_error event");
    assert_eq!(error.field(FIELD_ERR_CODE), Some("ERR_CONCURRENCY"));
}
