//! PopCon CLI
//!
//! Command-line interface for the conditions transfer gate

use clap::{Parser, Subcommand};
use popcon_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "popcon")]
#[command(about = "PopCon - conditions transfer gate", long_about = None)]
struct Cli {
    /// Emit JSON logs instead of human-readable ones
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one transfer cycle
    Run(commands::run::RunArgs),
    /// Inspect a destination tag
    Tag(commands::tag::TagArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Tag(args) => commands::tag::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
