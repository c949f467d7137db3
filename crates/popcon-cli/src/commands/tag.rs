//! Tag inspection commands

use clap::{Args, Subcommand};
use popcon_engine::{apply_engine_query, EngineQuery, EngineQueryResult};
use popcon_store::db::open_ledger;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct TagArgs {
    #[command(subcommand)]
    pub command: TagCommand,
}

#[derive(Debug, Subcommand)]
pub enum TagCommand {
    /// Show the tag snapshot a cycle would decide against
    Show(TagTarget),
    /// List the tag's IOVs in upload order
    History(TagTarget),
}

#[derive(Debug, Args)]
pub struct TagTarget {
    #[arg(long)]
    pub tag: String,

    #[arg(long, default_value = "conditions.db")]
    pub db: PathBuf,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: TagArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        TagCommand::Show(target) => execute_show(target),
        TagCommand::History(target) => execute_history(target),
    }
}

fn execute_show(target: TagTarget) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_ledger(&target.db)?;
    let EngineQueryResult::TagState(result) =
        apply_engine_query(EngineQuery::TagState { tag: target.tag }, &conn)?
    else {
        return Err("unexpected query result".into());
    };

    if target.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let state = &result.state;
    println!("tag: {}", state.tag());
    if state.is_empty() {
        println!("empty");
        return Ok(());
    }
    println!("size: {}", state.size());
    println!("last since: {}", state.last_since());
    println!("last payload token: {}", state.last_payload_token().unwrap_or("-"));
    println!("user text: {}", state.last_log_text());
    println!("fingerprint: {}", result.fingerprint);
    Ok(())
}

fn execute_history(target: TagTarget) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_ledger(&target.db)?;
    let EngineQueryResult::TagHistory(iovs) =
        apply_engine_query(EngineQuery::TagHistory { tag: target.tag }, &conn)?
    else {
        return Err("unexpected query result".into());
    };

    if target.json {
        println!("{}", serde_json::to_string_pretty(&iovs)?);
        return Ok(());
    }

    for iov in &iovs {
        println!(
            "since {}\ttoken {}\tlog {}",
            iov.since, iov.payload_token, iov.log_id
        );
    }
    println!("{} iov(s)", iovs.len());
    Ok(())
}
