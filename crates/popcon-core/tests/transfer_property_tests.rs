//! Property tests for the decision and staging steps

mod common;

use common::noise_handler;
use popcon_core::fingerprint::{compose_user_text, extract_fingerprint};
use popcon_core::staging::next_since;
use popcon_core::{is_transfer_needed, CycleOutcome, HandlerConfig, PopConSourceHandler, TagState};
use proptest::prelude::*;

fn fingerprint_strategy() -> impl Strategy<Value = String> {
    // Fingerprints written by this workspace never contain the delimiter
    "[a-zA-Z0-9=_ .:-]{0,24}"
}

proptest! {
    #[test]
    fn no_op_is_idempotent(fp in fingerprint_strategy(), last_since in 1u64..1_000_000, cycles in 1usize..6) {
        let state = TagState::with_last_upload("T", last_since, compose_user_text("h", &fp));
        let mut handler = noise_handler(HandlerConfig::default().with_debug(true), &fp);
        for _ in 0..cycles {
            prop_assert_eq!(handler.get_new_objects(&state), CycleOutcome::NoTransfer);
        }
        prop_assert!(handler.queue().is_empty());
    }

    #[test]
    fn distinct_fingerprints_trigger_transfer(
        f1 in fingerprint_strategy(),
        f2 in fingerprint_strategy(),
        last_since in 1u64..1_000_000,
    ) {
        prop_assume!(f1 != f2);
        let state = TagState::with_last_upload("T", last_since, compose_user_text("h", &f1));
        prop_assert!(!is_transfer_needed(&state, &f1));
        prop_assert!(is_transfer_needed(&state, &f2));
    }

    #[test]
    fn empty_tag_since_is_one(carried in any::<u64>(), debug in any::<bool>()) {
        let config = HandlerConfig::default().with_debug(debug);
        prop_assert_eq!(next_since(&TagState::empty("T"), carried, &config), Ok(1));
    }

    #[test]
    fn debug_since_is_last_plus_one(last_since in 0u64..u64::MAX, carried in any::<u64>()) {
        let state = TagState::with_last_upload("T", last_since, "h@x");
        let config = HandlerConfig::default().with_debug(true);
        prop_assert_eq!(next_since(&state, carried, &config), Ok(last_since + 1));
    }

    #[test]
    fn extraction_returns_suffix_without_delimiter(prefix in ".{0,16}", fp in fingerprint_strategy()) {
        let text = format!("{}@{}", prefix, fp);
        prop_assert_eq!(extract_fingerprint(&text), fp.as_str());
    }
}
