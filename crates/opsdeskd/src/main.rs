//! Opsdesk daemon CLI - ticket triage driver.
//!
//! Local driver around the decision engine: ingest the bundled sample SOPs,
//! triage tickets, print decisions. Transport lives elsewhere; this binary
//! is for operators and demos.

use anyhow::Result;
use clap::{Parser, Subcommand};
use opsdesk_common::{EngineConfig, Priority, Ticket};
use opsdeskd::chunker::Chunker;
use opsdeskd::classifier::scorer::{ExternalScorer, HttpScorer};
use opsdeskd::classifier::HybridClassifier;
use opsdeskd::demo;
use opsdeskd::embedding::HashEmbedder;
use opsdeskd::engine::DecisionEngine;
use opsdeskd::index::{InMemorySopIndex, SopIndex};
use opsdeskd::ingest::SopIngestor;
use opsdeskd::retriever::Retriever;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "opsdeskd", version, about = "Opsdesk ticket triage engine")]
struct Cli {
    /// Path to the engine configuration file
    #[arg(long, default_value = "/etc/opsdesk/config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest sample SOPs and triage the sample tickets
    Demo,
    /// Triage a single ticket against the sample SOP corpus
    Decide {
        #[arg(long)]
        tenant: String,
        #[arg(long)]
        subject: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Show index statistics for one tenant
    Stats {
        #[arg(long)]
        tenant: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::load_or_default(&cli.config);

    info!("opsdeskd v{} starting", env!("CARGO_PKG_VERSION"));

    let index: Arc<InMemorySopIndex> = Arc::new(InMemorySopIndex::new());
    let embedder = Arc::new(HashEmbedder::default());

    let ingestor = SopIngestor::new(
        Chunker::from_settings(&config.chunking),
        embedder.clone(),
        index.clone(),
    );
    let report = ingestor.ingest_batch(&demo::sample_sops()).await;
    info!(
        sops = report.total_sops,
        chunks = report.total_chunks,
        failed = report.failed,
        "sample SOP corpus ingested"
    );

    let scorer: Option<Arc<dyn ExternalScorer>> = if config.scorer.enabled {
        Some(Arc::new(HttpScorer::new(config.scorer.clone())))
    } else {
        None
    };
    let classifier = HybridClassifier::new(config.classifier.clone(), scorer);
    let retriever = Retriever::new(index.clone(), embedder, config.retrieval.clone());
    let engine = DecisionEngine::new(classifier, retriever);

    match cli.command {
        Command::Demo => {
            for ticket in demo::sample_tickets() {
                let decision = engine.decide(&ticket).await?;
                println!("{}", serde_json::to_string_pretty(&decision)?);
            }
        }
        Command::Decide {
            tenant,
            subject,
            description,
        } => {
            let ticket = Ticket {
                id: format!("TCK-{}", Uuid::new_v4()),
                tenant_id: tenant,
                subject,
                description,
                priority: Priority::Medium,
                requester_email: None,
            };
            let decision = engine.decide(&ticket).await?;
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        Command::Stats { tenant } => {
            let stats = index.stats(&tenant).await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
