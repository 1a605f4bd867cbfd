//! whyhere-export - one-shot CSV export
//!
//! Scores the configured entity source once under the given priority order
//! and writes the ranked analysis as CSV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use whyhere_common::config::{DataSource, TomlConfig};
use whyhere_common::export::default_filename;
use whyhere_common::priority::PriorityList;
use whyhere_common::selection::Bookmarks;
use whyhere_rank::logging::init_tracing;
use whyhere_rank::services::{EntitySource, RankingSession};

/// Command-line arguments for whyhere-export
#[derive(Parser, Debug)]
#[command(name = "whyhere-export")]
#[command(about = "Export a WhyHere ranking as CSV")]
#[command(version)]
struct Args {
    /// Path to whyhere.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Entity source: mock or backend (overrides config)
    #[arg(long)]
    data_source: Option<DataSource>,

    /// Priority order, comma-separated wire names (highest first)
    #[arg(long)]
    priorities: Option<PriorityList>,

    /// Entity ids to mark as bookmarked
    #[arg(long, value_delimiter = ',')]
    bookmark: Vec<String>,

    /// Output file (default: whyhere-atlanta-analysis-<unix millis>.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(source) = args.data_source {
        config.data_source = source;
    }
    init_tracing(&config.logging, "whyhere_export")?;

    let source = EntitySource::from_config(&config).context("Failed to create backend client")?;
    let priorities = args.priorities.unwrap_or_default();
    info!(data_source = %config.data_source, priorities = %priorities, "Scoring entities");

    let session = RankingSession::new(source, priorities, config.profile.clone());
    session.refresh().await.context("Failed to fetch entities")?;
    let (entities, priorities) = session.ranked().await;

    let bookmarks: Bookmarks = args.bookmark.into_iter().collect();
    let csv = whyhere_common::export::export_csv(&entities, &priorities, &bookmarks);

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(default_filename(chrono::Utc::now().timestamp_millis())));
    tokio::fs::write(&output, csv)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(entities = entities.len(), path = %output.display(), "CSV export written");
    println!("{}", output.display());
    Ok(())
}
