//! CLI command definitions and dispatch for the `docstate` binary.
//!
//! Uses clap derive macros for argument parsing. `apply` is the
//! reconciliation entry point; `encrypt`/`decrypt` expose the text filter
//! pair for embedding secrets in templates.

pub mod apply;
pub mod filter;

use clap::{Parser, Subcommand};

/// Declarative single-document state management for a document store.
#[derive(Parser)]
#[command(name = "docstate", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ensure a document is present in (or absent from) a collection.
    Apply(apply::ApplyArgs),

    /// Encrypt a string for embedding in a template.
    Encrypt(filter::FilterArgs),

    /// Decrypt a string produced by `encrypt`.
    Decrypt(filter::FilterArgs),
}
