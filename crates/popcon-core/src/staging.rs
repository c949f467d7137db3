//! Staging: pick the `since` of the next upload and queue the payload.

use crate::builder::PayloadBuilder;
use crate::config::HandlerConfig;
use crate::errors::StagingError;
use crate::model::{TagState, TransferItem, TransferQueue};

/// `since` for the next upload.
///
/// `1` for an empty tag. Otherwise `last_since + 1` when the configured
/// policy advances, else the carried value unchanged.
///
/// # Errors
///
/// `SinceOverflow` when `last_since + 1` does not fit in a `u64`.
pub fn next_since(
    tag_state: &TagState,
    carried: u64,
    config: &HandlerConfig,
) -> Result<u64, StagingError> {
    if tag_state.is_empty() {
        Ok(1)
    } else if config.since_policy.advances(config.debug) {
        tag_state
            .last_since()
            .checked_add(1)
            .ok_or_else(|| StagingError::SinceOverflow {
                handler: config.name.clone(),
                last_since: tag_state.last_since(),
            })
    } else {
        Ok(carried)
    }
}

/// Fetch the payload and append `(payload, since)` to `queue`.
///
/// `since` is the carried value; it is updated before the payload check,
/// so a failed cycle still moves it. On any error the queue is left
/// untouched, and on `SinceOverflow` the carried value is too.
pub fn stage<'q, T, B>(
    tag_state: &TagState,
    builder: &mut B,
    config: &HandlerConfig,
    since: &mut u64,
    queue: &'q mut TransferQueue<T>,
) -> Result<&'q TransferItem<T>, StagingError>
where
    B: PayloadBuilder<T> + ?Sized,
{
    let obj = builder.get_obj();
    *since = next_since(tag_state, *since, config)?;

    match obj {
        Some(payload) => Ok(queue.push(TransferItem::new(payload, *since))),
        None => Err(StagingError::MissingPayload {
            handler: config.name.clone(),
            data_type: config.data_type,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StaticPayloadBuilder;
    use crate::config::SincePolicy;

    #[test]
    fn test_next_since_empty_tag_is_one() {
        let state = TagState::empty("T");
        for debug in [false, true] {
            let config = HandlerConfig::default().with_debug(debug);
            assert_eq!(next_since(&state, 99, &config), Ok(1));
        }
    }

    #[test]
    fn test_next_since_debug_increments() {
        let state = TagState::with_last_upload("T", 41, "h@a");
        let config = HandlerConfig::default().with_debug(true);
        assert_eq!(next_since(&state, 5, &config), Ok(42));
    }

    #[test]
    fn test_next_since_non_debug_keeps_carried() {
        let state = TagState::with_last_upload("T", 41, "h@a");
        let config = HandlerConfig::default();
        assert_eq!(next_since(&state, 5, &config), Ok(5));
    }

    #[test]
    fn test_next_since_always_advance() {
        let state = TagState::with_last_upload("T", 41, "h@a");
        let config = HandlerConfig::default().with_since_policy(SincePolicy::AlwaysAdvance);
        assert_eq!(next_since(&state, 5, &config), Ok(42));
    }

    #[test]
    fn test_next_since_overflow_is_reported() {
        let state = TagState::with_last_upload("T", u64::MAX, "h@a");
        let config = HandlerConfig::new("SiStripNoiseHandler").with_debug(true);
        assert_eq!(
            next_since(&state, 5, &config),
            Err(StagingError::SinceOverflow {
                handler: "SiStripNoiseHandler".to_string(),
                last_since: u64::MAX,
            })
        );
    }

    #[test]
    fn test_stage_overflow_keeps_queue_and_carried_since() {
        let state = TagState::with_last_upload("T", u64::MAX, "h@a");
        let mut builder = StaticPayloadBuilder::new("runB", Some(1u8));
        let config = HandlerConfig::default().with_debug(true);
        let mut since = config.since;
        let mut queue = TransferQueue::new();

        let err = stage(&state, &mut builder, &config, &mut since, &mut queue).unwrap_err();
        assert!(matches!(err, StagingError::SinceOverflow { last_since, .. } if last_since == u64::MAX));
        assert!(queue.is_empty());
        assert_eq!(since, 5);
    }

    #[test]
    fn test_stage_appends_item() {
        let state = TagState::empty("T");
        let mut builder = StaticPayloadBuilder::new("runA", Some("noise-v1"));
        let config = HandlerConfig::default();
        let mut since = config.since;
        let mut queue = TransferQueue::new();

        let item = stage(&state, &mut builder, &config, &mut since, &mut queue).unwrap();
        assert_eq!(item.since(), 1);
        assert_eq!(*item.payload(), "noise-v1");
        assert_eq!(since, 1);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_stage_missing_payload_leaves_queue() {
        let state = TagState::with_last_upload("T", 7, "h@a");
        let mut builder = StaticPayloadBuilder::<u8>::without_payload("runB");
        let config = HandlerConfig::new("SiStripNoiseHandler").with_debug(true);
        let mut since = config.since;
        let mut queue = TransferQueue::new();

        let err = stage(&state, &mut builder, &config, &mut since, &mut queue).unwrap_err();
        assert!(matches!(err, StagingError::MissingPayload { ref handler, .. } if handler == "SiStripNoiseHandler"));
        assert!(queue.is_empty());
        // carried since still moves
        assert_eq!(since, 8);
    }
}
