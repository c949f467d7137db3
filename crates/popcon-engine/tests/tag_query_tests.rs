mod common;

use common::{handler, setup_ledger, TAG};
use popcon_core::errors::ExErrorKind;
use popcon_engine::{apply_engine_query, run_cycle, EngineQuery, EngineQueryResult, RunOptions};

#[test]
fn test_tag_state_query_on_unknown_tag() {
    let (_dir, conn) = setup_ledger();
    let result = apply_engine_query(EngineQuery::TagState { tag: TAG.to_string() }, &conn).unwrap();

    match result {
        EngineQueryResult::TagState(r) => {
            assert!(r.state.is_empty());
            assert_eq!(r.fingerprint, "");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_tag_queries_after_upload() {
    let (_dir, mut conn) = setup_ledger();
    run_cycle(&mut conn, &mut handler("h", "runA"), TAG, &RunOptions::default()).unwrap();

    match apply_engine_query(EngineQuery::TagState { tag: TAG.to_string() }, &conn).unwrap() {
        EngineQueryResult::TagState(r) => {
            assert_eq!(r.state.size(), 1);
            assert_eq!(r.fingerprint, "runA");
        }
        other => panic!("unexpected result: {:?}", other),
    }

    match apply_engine_query(EngineQuery::TagHistory { tag: TAG.to_string() }, &conn).unwrap() {
        EngineQueryResult::TagHistory(iovs) => {
            assert_eq!(iovs.len(), 1);
            assert_eq!(iovs[0].since, 1);
            assert_eq!(iovs[0].payload, common::noise_payload());
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_query_rejects_blank_tag() {
    let (_dir, conn) = setup_ledger();
    let err = apply_engine_query(EngineQuery::TagHistory { tag: String::new() }, &conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(err.op(), Some("tag_history"));
}
