//! Shared setup for the `atp` binaries.

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use atp_core::config::{Config, Settings};
use atp_core::traits::Embedder;
use atp_core::Corpus;
use atp_embed::get_default_embedder;
use atp_hybrid::{IndexSettings, IndexStore};

pub mod ollama;

/// Log to stderr, `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Everything a query needs, built once at startup.
pub struct Workspace {
    pub settings: Settings,
    pub corpus: Corpus,
    pub embedder: Box<dyn Embedder>,
    pub store: IndexStore,
}

pub struct Overrides {
    pub matches_csv: Option<PathBuf>,
    pub index_dir: Option<PathBuf>,
    pub force_rebuild: bool,
}

impl Workspace {
    pub fn open(config: &Config, overrides: Overrides) -> anyhow::Result<Self> {
        let settings = config.settings()?;
        let csv = overrides.matches_csv.unwrap_or_else(|| config.path(&settings.data.matches_csv));
        let corpus = Corpus::load(&csv).with_context(|| format!("loading match data from {}", csv.display()))?;

        let model_dir = settings.embedding.model_dir.as_deref().map(|d| config.path(d));
        let embedder = get_default_embedder(model_dir.as_deref()).context("loading sentence encoder")?;

        let mut index = IndexSettings::from_settings(&settings, |p| config.path(p));
        if let Some(dir) = overrides.index_dir { index.dir = dir; }
        let store = if overrides.force_rebuild {
            IndexStore::rebuild(&index, corpus.chunks(), embedder.as_ref())
        } else {
            IndexStore::build(&index, &corpus, embedder.as_ref())
        }
        .with_context(|| format!("building index under {}", index.dir.display()))?;
        info!(chunks = store.len(), origin = ?store.origin(), "index ready");
        Ok(Self { settings, corpus, embedder, store })
    }
}
