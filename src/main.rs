mod cli;

use crate::cli::batch::{Batch, BatchRunner};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use investplan::{EntityKind, Store, StoreConfig};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "investplan")]
#[command(about = "Apply batches of planning commands to an in-memory store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a JSON batch of commands and print the outcome of each
    Run {
        batch: PathBuf,
        #[arg(long, default_value = "investplan://investplan")]
        store_url: String,
        /// Also print every committed row once the batch is applied
        #[arg(long)]
        dump: bool,
    },
    /// List the entity kinds
    Kinds,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            batch,
            store_url,
            dump,
        } => run(&batch, &store_url, dump).await,
        Command::Kinds => {
            for kind in EntityKind::ALL {
                println!("{}", kind);
            }
            Ok(())
        }
    }
}

async fn run(path: &Path, store_url: &str, dump: bool) -> Result<()> {
    let config = StoreConfig::from_url(store_url).map_err(|err| anyhow!(err))?;

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read batch {}", path.display()))?;
    let batch: Batch = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse batch {}", path.display()))?;

    let store = Store::with_config(config);
    let reports = BatchRunner::new(store.clone()).apply(batch).await;
    println!("{}", serde_json::to_string_pretty(&reports)?);

    if dump {
        let tables = store.snapshot().await;
        println!("{}", serde_json::to_string_pretty(&*tables)?);
    }
    Ok(())
}
