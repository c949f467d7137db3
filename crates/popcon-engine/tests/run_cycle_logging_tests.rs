#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{handler, setup_ledger};
use popcon_core::core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_CYCLE_ID, FIELD_DURATION_MS, FIELD_ERR_CODE,
    FIELD_HANDLER, FIELD_TAG,
};
use popcon_core::logging_facility::test_capture::init_test_capture;
use popcon_engine::{run_cycle, RunOptions};

#[test]
fn test_run_cycle_logs_start_and_end() {
    let capture = init_test_capture();
    let (_dir, mut conn) = setup_ledger();
    let handler_name = "LoggingHandler_unique_1";

    run_cycle(&mut conn, &mut handler(handler_name, "runA"), "Logging_Tag_1", &RunOptions::default()).unwrap();

    let events: Vec<_> = capture
        .events_for_op("run_cycle")
        .into_iter()
        .filter(|e| e.field(FIELD_HANDLER) == Some(handler_name))
        .collect();

    assert_eq!(events.iter().filter(|e| e.event.as_deref() == Some(EVENT_START)).count(), 1);
    let end = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .expect("end event");
    assert_eq!(end.field("outcome"), Some("staged"));
    assert_eq!(end.field("committed"), Some("true"));
    assert!(end.field(FIELD_DURATION_MS).is_some());
    assert_eq!(end.field(FIELD_TAG), Some("Logging_Tag_1"));

    // start and end share one cycle id
    let start = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_START))
        .expect("start event");
    assert!(end.field(FIELD_CYCLE_ID).is_some());
    assert_eq!(start.field(FIELD_CYCLE_ID), end.field(FIELD_CYCLE_ID));
}

#[test]
fn test_run_cycle_logs_end_error_with_code() {
    let capture = init_test_capture();
    let (_dir, mut conn) = setup_ledger();
    let handler_name = "LoggingHandler_unique_2";

    let result = run_cycle(&mut conn, &mut handler(handler_name, "runA"), "bad tag", &RunOptions::default());
    assert!(result.is_err());

    let errors: Vec<_> = capture
        .events_for_op("run_cycle")
        .into_iter()
        .filter(|e| e.field(FIELD_HANDLER) == Some(handler_name))
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field(FIELD_ERR_CODE), Some("ERR_INVALID_INPUT"));
    assert_eq!(errors[0].field(FIELD_TAG), Some("bad tag"));
    assert!(errors[0].field(FIELD_CYCLE_ID).is_some());
}
