//! Source handler: one transfer cycle per `get_new_objects` call.
//!
//! A cycle reads the tag snapshot, optionally logs a diagnostic dump of it,
//! decides whether the builder's fingerprint differs from the last upload,
//! and if so stages the payload. Exactly one of [`CycleOutcome`]'s variants
//! ends every cycle.

use std::fmt::Write as _;

use crate::builder::PayloadBuilder;
use crate::config::HandlerConfig;
use crate::decision::{decide, TransferDecision};
use crate::errors::{ExError, StagingError};
use crate::fingerprint::recorded_fingerprint;
use crate::history::TagHistoryReader;
use crate::model::{TagState, TransferItem, TransferQueue};
use crate::staging::stage;

/// How a cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Fingerprint unchanged; nothing staged
    NoTransfer,
    /// One item appended to the transfer queue
    Staged { since: u64 },
    /// A transfer was needed but staging failed; queue unchanged
    StagingFailed(StagingError),
}

impl CycleOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleOutcome::NoTransfer => "no_transfer",
            CycleOutcome::Staged { .. } => "staged",
            CycleOutcome::StagingFailed(_) => "staging_failed",
        }
    }

    pub fn is_staged(&self) -> bool {
        matches!(self, CycleOutcome::Staged { .. })
    }
}

/// The interface the upload machinery drives.
///
/// Implementors own their transfer queue and the user text of the next log
/// entry; the upload layer drains both after a cycle.
pub trait PopConSourceHandler {
    type Payload;

    /// Handler instance name
    fn id(&self) -> &str;

    fn config(&self) -> &HandlerConfig;

    /// Run one cycle against a fresh tag snapshot
    fn get_new_objects(&mut self, tag_state: &TagState) -> CycleOutcome;

    /// Text to be written into the next log entry
    fn user_text_log(&self) -> &str;

    /// Remove and return every staged item
    fn take_transfers(&mut self) -> Vec<TransferItem<Self::Payload>>;

    /// Read the tag from `history`, then run a cycle
    ///
    /// # Errors
    ///
    /// Only reader failures are returned; staging failures are reported in
    /// the outcome.
    #[allow(clippy::result_large_err)]
    fn run(
        &mut self,
        history: &dyn TagHistoryReader,
        tag: &str,
    ) -> Result<CycleOutcome, ExError> {
        let tag_state = history.read_tag_state(tag)?;
        Ok(self.get_new_objects(&tag_state))
    }
}

/// Handler for strip-tracker conditions built by an injected builder.
#[derive(Debug)]
pub struct DbObjHandler<T, B> {
    config: HandlerConfig,
    since: u64,
    builder: B,
    to_transfer: TransferQueue<T>,
    user_text_log: String,
}

impl<T, B> DbObjHandler<T, B>
where
    B: PayloadBuilder<T>,
{
    pub fn new(config: HandlerConfig, builder: B) -> Self {
        Self {
            since: config.since,
            config,
            builder,
            to_transfer: TransferQueue::new(),
            user_text_log: String::new(),
        }
    }

    /// Carried `since`: the configured value until a cycle moves it
    pub fn since(&self) -> u64 {
        self.since
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut B {
        &mut self.builder
    }

    pub fn queue(&self) -> &TransferQueue<T> {
        &self.to_transfer
    }

    fn is_transfer_needed(&mut self, tag_state: &TagState) -> bool {
        tracing::info!(op = "is_transfer_needed", handler = %self.config.name, "checking for transfer");

        let current = self.builder.metadata_string();
        match decide(tag_state, &current) {
            TransferDecision::UpToDate { fingerprint } => {
                tracing::info!(
                    op = "is_transfer_needed",
                    handler = %self.config.name,
                    tag = tag_state.tag(),
                    last_since = tag_state.last_since(),
                    payload_name = tag_state.last_log().map(|l| l.payload_name.as_str()).unwrap_or(""),
                    destination_db = tag_state.last_log().map(|l| l.destination_db.as_str()).unwrap_or(""),
                    fingerprint = %fingerprint,
                    transfer = false,
                    "selected conditions are already uploaded in the last iov, no transfer needed"
                );
                false
            }
            TransferDecision::Needed { current, previous } => {
                tracing::info!(
                    op = "is_transfer_needed",
                    handler = %self.config.name,
                    tag = tag_state.tag(),
                    fingerprint = %current,
                    previous = %previous,
                    transfer = true,
                    "selected conditions will be uploaded"
                );
                self.user_text_log = current;
                true
            }
        }
    }

    fn set_for_transfer(&mut self, tag_state: &TagState) -> CycleOutcome {
        tracing::info!(
            op = "set_for_transfer",
            handler = %self.config.name,
            data_type = %self.config.data_type,
            "getting data to be transferred"
        );

        match stage(
            tag_state,
            &mut self.builder,
            &self.config,
            &mut self.since,
            &mut self.to_transfer,
        ) {
            Ok(item) => {
                let since = item.since();
                tracing::info!(
                    op = "set_for_transfer",
                    handler = %self.config.name,
                    since = since,
                    "setting since"
                );
                CycleOutcome::Staged { since }
            }
            Err(err) => {
                tracing::error!(
                    op = "set_for_transfer",
                    handler = %self.config.name,
                    data_type = %self.config.data_type,
                    err.code = ExError::from(err.clone()).code(),
                    "{}",
                    err
                );
                CycleOutcome::StagingFailed(err)
            }
        }
    }
}

impl<T, B> PopConSourceHandler for DbObjHandler<T, B>
where
    B: PayloadBuilder<T>,
{
    type Payload = T;

    fn id(&self) -> &str {
        &self.config.name
    }

    fn config(&self) -> &HandlerConfig {
        &self.config
    }

    fn get_new_objects(&mut self, tag_state: &TagState) -> CycleOutcome {
        tracing::info!(op = "get_new_objects", handler = %self.config.name, "for PopCon application");

        if self.config.debug {
            tracing::info!(
                op = "get_new_objects",
                handler = %self.config.name,
                "{}",
                debug_snapshot(&self.config.name, &self.user_text_log, tag_state)
            );
        }

        let outcome = if self.is_transfer_needed(tag_state) {
            self.set_for_transfer(tag_state)
        } else {
            CycleOutcome::NoTransfer
        };

        tracing::info!(
            op = "get_new_objects",
            handler = %self.config.name,
            outcome = outcome.as_str(),
            "done"
        );
        outcome
    }

    fn user_text_log(&self) -> &str {
        &self.user_text_log
    }

    fn take_transfers(&mut self) -> Vec<TransferItem<T>> {
        self.to_transfer.drain()
    }
}

/// Human-readable dump of a tag snapshot for debug mode.
///
/// `user_text_log` is the handler's pending log text (empty until a cycle
/// decides to transfer), not the text stored with the last upload.
pub fn debug_snapshot(handler_name: &str, user_text_log: &str, tag_state: &TagState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "------- {} -> getNewObjects", handler_name);

    if tag_state.is_empty() {
        let _ = writeln!(out, " First object for this tag {}", tag_state.tag());
        return out;
    }

    let _ = writeln!(
        out,
        "got offlineInfo {}, size {}, last object valid since {} token {}",
        tag_state.tag(),
        tag_state.size(),
        tag_state.last_since(),
        tag_state.last_payload_token().unwrap_or("-"),
    );
    let _ = writeln!(out, " UserText {}", user_text_log);

    if let Some(log) = tag_state.last_log() {
        let _ = writeln!(out, " LogDBEntry");
        let _ = writeln!(out, "  logId {}", log.log_id);
        let _ = writeln!(out, "  destinationDB {}", log.destination_db);
        let _ = writeln!(out, "  provenance {}", log.provenance);
        let _ = writeln!(out, "  usertext {}", log.user_text);
        let _ = writeln!(out, "  iovtag {}", log.iov_tag);
        let _ = writeln!(out, "  iovtimetype {}", log.iov_time_type);
        let _ = writeln!(out, "  payloadIdx {}", log.payload_idx);
        let _ = writeln!(out, "  payloadName {}", log.payload_name);
        let _ = writeln!(out, "  payloadToken {}", log.payload_token);
        let _ = writeln!(out, "  payloadContainer {}", log.payload_container);
        let _ = writeln!(out, "  exectime {}", log.exec_time);
        let _ = writeln!(out, "  execmessage {}", log.exec_message);
    }
    let _ = writeln!(out, "-- fingerprint {}", recorded_fingerprint(tag_state));
    out
}
