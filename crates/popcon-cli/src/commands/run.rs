//! Transfer cycle command

use clap::Args;
use popcon_core::{CycleOutcome, DbObjHandler, PopConConfig, StaticPayloadBuilder};
use popcon_engine::{run_cycle, RunOptions};
use popcon_store::db::{open_ledger, resolve_connect};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Job configuration (TOML)
    #[arg(long)]
    pub config: PathBuf,

    /// Ledger file; defaults to the path in `destination.connect`
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Payload to upload (JSON)
    #[arg(long)]
    pub payload: PathBuf,

    #[arg(long)]
    pub dry_run: bool,
}

pub fn execute(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = PopConConfig::load(&args.config)?;

    let db_path = match args.db {
        Some(path) => path,
        None => resolve_connect(config.destination.connect.expose())?,
    };

    let text = std::fs::read_to_string(&args.payload)
        .map_err(|e| format!("Failed to read payload {}: {}", args.payload.display(), e))?;
    let payload: Value = serde_json::from_str(&text)?;

    let builder = StaticPayloadBuilder::from_selection(&config.selection, Some(payload));
    let mut handler = DbObjHandler::new(config.handler.clone(), builder);

    let options = RunOptions {
        dry_run: args.dry_run,
        destination_db: format!("sqlite_file:{}", db_path.display()),
        record: config.record().map(str::to_string),
    };

    let mut conn = open_ledger(&db_path)?;
    let report = run_cycle(&mut conn, &mut handler, &config.destination.tag, &options)?;

    println!("cycle: {}", report.cycle_id);
    println!("tag: {}", config.destination.tag);
    match &report.outcome {
        CycleOutcome::NoTransfer => println!("outcome: no transfer needed"),
        CycleOutcome::Staged { since } => println!("outcome: staged since {}", since),
        CycleOutcome::StagingFailed(err) => println!("outcome: staging failed ({})", err),
    }
    match &report.committed {
        Some(commit) => {
            println!("committed: log {} ({} iov)", commit.log_id, commit.iov_count);
            println!("payload token: {}", commit.last_payload_token);
        }
        None if args.dry_run && report.staged > 0 => println!("committed: no (dry run)"),
        None => println!("committed: no"),
    }

    Ok(())
}
