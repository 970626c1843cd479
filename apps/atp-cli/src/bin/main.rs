use std::path::PathBuf;

use clap::{Parser, Subcommand};

use atp_cli::ollama::OllamaSynthesizer;
use atp_cli::{Overrides, Workspace, init_tracing};
use atp_core::config::Config;
use atp_hybrid::{AskService, HybridRetriever, QueryRouter};

#[derive(Parser)]
#[command(name = "atp")]
#[command(about = "Question answering over ATP match history")]
struct Cli {
    /// Match table to load instead of `data.matches_csv`.
    #[arg(long, global = true, value_name = "CSV")]
    matches: Option<PathBuf>,
    /// Snapshot directory instead of `data.index_dir`.
    #[arg(long, global = true, value_name = "DIR")]
    index_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build or refresh the index snapshot.
    BuildIndex {
        #[arg(long)]
        force: bool,
    },
    /// Print the chunks retrieved for a query.
    Retrieve {
        query: String,
        #[arg(long)]
        top_k: Option<usize>,
        /// Skip the dense ranking.
        #[arg(long)]
        sparse_only: bool,
    },
    /// Show which path a question takes and the context it produces.
    Route { query: String },
    /// Answer a question with the configured Ollama model.
    Ask {
        question: String,
        #[arg(long)]
        access_code: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {e:#}"); e })?;
    let force_rebuild = matches!(cli.command, Commands::BuildIndex { force: true });
    let ws = Workspace::open(&config, Overrides { matches_csv: cli.matches, index_dir: cli.index_dir, force_rebuild })?;
    let retrieval = ws.settings.retrieval;

    match cli.command {
        Commands::BuildIndex { .. } => {
            let report = ws.corpus.report();
            println!("✅ Index ready: {} chunks ({} rows dropped, {:?})", ws.store.len(), report.dropped, ws.store.origin());
        }
        Commands::Retrieve { query, top_k, sparse_only } => {
            let encoder = if sparse_only { None } else { Some(ws.embedder.as_ref()) };
            let retriever = HybridRetriever::new(&ws.store, encoder, retrieval);
            let hit = retriever.retrieve(&query, top_k.unwrap_or(retrieval.top_k))?;
            println!("{} chunk(s), {:?}", hit.chunks.len(), hit.mode);
            for (pos, chunk) in hit.positions.iter().zip(&hit.chunks) {
                println!("  [{pos}] {chunk}");
            }
        }
        Commands::Route { query } => {
            let retriever = HybridRetriever::new(&ws.store, Some(ws.embedder.as_ref()), retrieval);
            let routed = QueryRouter::new(ws.corpus.records(), retriever).route(&query)?;
            println!("{:?} ({} source(s))", routed.kind, routed.sources.len());
            println!("{}", routed.context);
        }
        Commands::Ask { question, access_code } => {
            let retriever = HybridRetriever::new(&ws.store, Some(ws.embedder.as_ref()), retrieval);
            let router = QueryRouter::new(ws.corpus.records(), retriever);
            let synthesizer = OllamaSynthesizer::new(&ws.settings.service.ollama_url, ws.settings.service.model.clone())?;
            let service = AskService::new(router, Box::new(synthesizer), ws.settings.service.access_code.clone());
            let answer = service.ask(&question, access_code.as_deref())?;
            println!("{}", answer.answer);
            if !answer.sources.is_empty() {
                println!("\nSources:");
                for s in &answer.sources { println!("  - {s}"); }
            }
        }
    }
    Ok(())
}
