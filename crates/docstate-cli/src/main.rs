//! docstate CLI entry point.
//!
//! Binary name: `docstate`
//!
//! Parses CLI arguments, initializes tracing, then dispatches to the
//! command handlers. Fatal errors are reported as a `{msg}` failure
//! record with a nonzero exit status; success prints the command's
//! result record.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,docstate=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // The host-facing failure record. `{:#}` renders the anyhow
            // context chain on one line.
            let msg = format!("{err:#}");
            if json {
                println!("{}", serde_json::json!({ "msg": msg }));
            } else {
                eprintln!();
                eprintln!("  {} {}", style("failed").red().bold(), msg);
                eprintln!();
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Apply(args) => cli::apply::run(args, cli.json, cli.quiet).await,
        Commands::Encrypt(args) => cli::filter::run_encrypt(args, cli.json),
        Commands::Decrypt(args) => cli::filter::run_decrypt(args, cli.json),
    }
}
