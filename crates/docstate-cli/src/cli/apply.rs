//! The `apply` command: reconcile one document against a collection.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use secrecy::{ExposeSecret, SecretString};

use docstate_core::reconcile::reconcile;
use docstate_infra::sqlite::{DatabasePool, SqliteDocumentStore};
use docstate_types::document::Document;
use docstate_types::error::StoreError;
use docstate_types::reconcile::{DesiredState, ReconcileOutcome, ReconcileRequest};

/// Arguments for `docstate apply`.
///
/// No `Debug` derive: `database` is a connection string and must never
/// reach log or error output.
#[derive(Args)]
pub struct ApplyArgs {
    /// Connection string of the document store.
    #[arg(long, env = "DOCSTATE_DATABASE", hide_env_values = true)]
    pub database: String,

    /// Collection to reconcile against.
    #[arg(long)]
    pub collection: String,

    /// Desired state of the document.
    #[arg(long, default_value = "present")]
    pub state: String,

    /// Check mode: report what would change without mutating the store.
    #[arg(long)]
    pub check: bool,

    /// The document, as inline JSON, `@path` to a file, or `-` for stdin.
    pub document: String,
}

/// Run one reconciliation and print the `{changed, found, _id}` record.
pub async fn run(args: ApplyArgs, json: bool, quiet: bool) -> Result<()> {
    let database = SecretString::from(args.database);

    // Host-boundary validation: bad parameters never reach the store.
    let state: DesiredState = args.state.parse()?;
    let document = load_document(&args.document)?;
    let request = ReconcileRequest::new(document, state, args.check);

    let pool = open_pool(database.expose_secret()).await?;
    let store = SqliteDocumentStore::new(pool.clone(), &args.collection);

    // The pool is released on both the success and the error path.
    let result = reconcile(&store, &request).await;
    pool.close().await;
    let outcome = result?;

    if !quiet {
        print_outcome(&outcome, &args.collection, state, args.check, json)?;
    }
    Ok(())
}

/// Open the store behind the connection string.
///
/// A malformed connection string surfaces with its own message; only a
/// store that cannot actually be reached maps to the "Server not
/// available" connectivity failure of the host contract.
async fn open_pool(connection_string: &str) -> Result<DatabasePool> {
    match DatabasePool::new(connection_string).await {
        Ok(pool) => Ok(pool),
        Err(err @ sqlx::Error::Configuration(_)) => {
            Err(anyhow::Error::new(err).context("invalid connection string"))
        }
        Err(_) => Err(StoreError::Unavailable.into()),
    }
}

/// Resolve the document argument: `-` reads stdin, `@path` reads a file,
/// anything else is inline JSON.
fn load_document(arg: &str) -> Result<Document> {
    let raw = if arg == "-" {
        std::io::read_to_string(std::io::stdin()).context("failed to read document from stdin")?
    } else if let Some(path) = arg.strip_prefix('@') {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read document from '{path}'"))?
    } else {
        arg.to_string()
    };

    let value: serde_json::Value =
        serde_json::from_str(&raw).context("document is not valid JSON")?;
    Ok(Document::new(value)?)
}

fn print_outcome(
    outcome: &ReconcileOutcome,
    collection: &str,
    state: DesiredState,
    check: bool,
    json: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    let verdict = if outcome.changed {
        style(if check { "would change" } else { "changed" }).yellow()
    } else {
        style("ok").green()
    };
    let id = outcome
        .id
        .as_ref()
        .map(|id| format!(" (_id: {id})"))
        .unwrap_or_default();

    println!();
    println!(
        "  {} document {} in '{}'{}",
        verdict,
        style(state).cyan(),
        style(collection).cyan(),
        id,
    );
    println!();
    Ok(())
}
