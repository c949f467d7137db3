//! One upload cycle against the ledger.
//!
//! ## Pipeline (in order):
//! 1. Validate the destination tag name
//! 2. Read the tag snapshot
//! 3. `get_new_objects` (decision + staging)
//! 4. Drain the handler's queue
//! 5. dry_run short-circuit (no writes)
//! 6. Commit IOVs plus one log entry (size mismatch and non-increasing
//!    since surface from store)

#![allow(clippy::result_large_err)]

use popcon_core::config::validate_tag_name;
use popcon_core::errors::ExError;
use popcon_core::fingerprint::compose_user_text;
use popcon_core::{log_op_end, log_op_error, log_op_start};
use popcon_core::{CycleOutcome, PopConSourceHandler, TagHistoryReader};
use popcon_core_types::{CycleContext, CycleId};
use popcon_store::errors::Result;
use popcon_store::{commit_transfers, CommitOptions, CommitResult, SqliteTagHistory, UploadLog};
use rusqlite::Connection;
use serde::Serialize;

/// Options for one cycle.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Run the decision and staging steps but write nothing
    pub dry_run: bool,
    /// Destination label stored in the log entry; never a raw connect string
    pub destination_db: String,
    /// Record name stored with the tag on its first upload
    pub record: Option<String>,
}

/// What a cycle did.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub cycle_id: CycleId,
    pub outcome: CycleOutcome,
    /// IOV count of the tag when the cycle read it
    pub tag_size_before: u64,
    /// Items drained from the handler this cycle
    pub staged: usize,
    /// `None` when nothing was staged or in dry-run mode
    pub committed: Option<CommitResult>,
}

/// Run one cycle of `handler` against `tag`.
///
/// A `NoTransfer` or `StagingFailed` cycle writes nothing; a missing payload
/// is reported in `RunReport::outcome`, not as an error.
///
/// ## Errors
///
/// - `InvalidInput`: tag name is empty or contains whitespace
/// - `Concurrency`: another writer changed the tag between read and commit
/// - `ConstraintViolation`: the staged since does not follow the tag's last since
/// - `Serialization`: a staged payload could not be serialized
/// - `Persistence`: database error
pub fn run_cycle<H>(
    conn: &mut Connection,
    handler: &mut H,
    tag: &str,
    options: &RunOptions,
) -> Result<RunReport>
where
    H: PopConSourceHandler,
    H::Payload: Serialize,
{
    let ctx = CycleContext::new(handler.id(), tag);
    log_op_start!("run_cycle", ctx = &ctx, dry_run = options.dry_run);
    let start = std::time::Instant::now();

    let report = run_cycle_impl(conn, handler, &ctx, options).map_err(|e| {
        let e = e
            .with_handler(ctx.handler.clone())
            .with_cycle_id(ctx.cycle_id.clone());
        log_op_error!(
            "run_cycle",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            ctx = &ctx
        );
        e
    })?;

    log_op_end!(
        "run_cycle",
        duration_ms = start.elapsed().as_millis() as u64,
        ctx = &ctx,
        outcome = report.outcome.as_str(),
        committed = report.committed.is_some()
    );

    Ok(report)
}

fn run_cycle_impl<H>(
    conn: &mut Connection,
    handler: &mut H,
    ctx: &CycleContext,
    options: &RunOptions,
) -> Result<RunReport>
where
    H: PopConSourceHandler,
    H::Payload: Serialize,
{
    validate_tag_name(&ctx.tag).map_err(|e| ExError::from(e).with_op("run_cycle"))?;

    let tag_state = SqliteTagHistory::new(conn).read_tag_state(&ctx.tag)?;
    let outcome = handler.get_new_objects(&tag_state);
    let items = handler.take_transfers();

    let mut report = RunReport {
        cycle_id: ctx.cycle_id.clone(),
        outcome,
        tag_size_before: tag_state.size(),
        staged: items.len(),
        committed: None,
    };

    if items.is_empty() {
        return Ok(report);
    }

    if options.dry_run {
        tracing::info!(
            op = "run_cycle",
            cycle_id = %ctx.cycle_id,
            staged = items.len(),
            "dry run, staged items discarded"
        );
        return Ok(report);
    }

    let fingerprint = handler.user_text_log();
    let log = UploadLog::new(
        ctx.tag.clone(),
        compose_user_text(handler.id(), fingerprint),
        fingerprint,
    )
    .with_destination_db(options.destination_db.clone())
    .with_payload_name(handler.config().data_type.as_str())
    .with_record(options.record.clone());

    let commit_options = CommitOptions {
        expected_size: Some(tag_state.size()),
    };
    report.committed = Some(commit_transfers(conn, &log, &items, &commit_options)?);

    Ok(report)
}
