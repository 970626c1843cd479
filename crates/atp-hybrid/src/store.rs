use std::path::{Path, PathBuf};

use anyhow::{Result, ensure};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use atp_core::config::Settings;
use atp_core::traits::Embedder;
use atp_core::Corpus;
use atp_text::SparseIndex;
use atp_vector::DenseIndex;

use crate::snapshot::{SPARSE_DIR, Snapshot, SnapshotError};

#[derive(Debug, Clone)]
pub struct IndexSettings {
    pub dir: PathBuf,
    pub batch_size: usize,
}

impl IndexSettings {
    pub fn from_settings(settings: &Settings, resolve: impl Fn(&str) -> PathBuf) -> Self {
        Self { dir: resolve(&settings.data.index_dir), batch_size: settings.embedding.batch_size }
    }
}

/// How the store came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOrigin {
    Snapshot,
    Encoded,
}

/// Chunk texts with their dense and sparse indexes, position-aligned.
///
/// Read-only once built; share it by reference across queries.
pub struct IndexStore {
    chunks: Vec<String>,
    dense: DenseIndex,
    sparse: SparseIndex,
    origin: StoreOrigin,
}

impl IndexStore {
    /// Reuse the snapshot under `settings.dir` when it matches `corpus`,
    /// otherwise encode every chunk and persist a fresh snapshot.
    pub fn build(settings: &IndexSettings, corpus: &Corpus, embedder: &dyn Embedder) -> Result<Self> {
        match Snapshot::load(&settings.dir, embedder.dim()) {
            Ok(snapshot) if snapshot.chunks == corpus.chunks() => {
                info!(dir = %settings.dir.display(), chunks = snapshot.chunks.len(), "loaded index snapshot");
                return Ok(Self::from_snapshot(snapshot, StoreOrigin::Snapshot));
            }
            Ok(snapshot) => warn!(
                stored = snapshot.chunks.len(),
                corpus = corpus.len(),
                "snapshot was built from different match data, rebuilding"
            ),
            Err(SnapshotError::Missing(path)) => info!(missing = %path.display(), "no usable snapshot, building"),
            Err(e) => warn!(error = %e, "discarding inconsistent snapshot"),
        }
        Self::rebuild(settings, corpus.chunks(), embedder)
    }

    /// Encode `chunks` and overwrite the snapshot under `settings.dir`.
    pub fn rebuild(settings: &IndexSettings, chunks: &[String], embedder: &dyn Embedder) -> Result<Self> {
        let dense = encode(chunks, embedder, settings.batch_size)?;
        Snapshot::write(&settings.dir, chunks, &dense)?;
        let sparse = SparseIndex::open_in_dir(&settings.dir.join(SPARSE_DIR))?;
        let store = Self { chunks: chunks.to_vec(), dense, sparse, origin: StoreOrigin::Encoded };
        store.check()?;
        Ok(store)
    }

    /// Load a snapshot without comparing it to any corpus.
    pub fn load(dir: &Path, dim: usize) -> Result<Self, SnapshotError> {
        Snapshot::load(dir, dim).map(|s| Self::from_snapshot(s, StoreOrigin::Snapshot))
    }

    /// Build without touching disk. The sparse index lives in RAM.
    pub fn in_memory(chunks: &[String], embedder: &dyn Embedder, batch_size: usize) -> Result<Self> {
        let dense = encode(chunks, embedder, batch_size)?;
        let sparse = SparseIndex::in_ram(chunks.iter().enumerate().map(|(pos, text)| (pos, text.as_str())))?;
        let store = Self { chunks: chunks.to_vec(), dense, sparse, origin: StoreOrigin::Encoded };
        store.check()?;
        Ok(store)
    }

    fn from_snapshot(snapshot: Snapshot, origin: StoreOrigin) -> Self {
        let Snapshot { chunks, dense, sparse } = snapshot;
        Self { chunks, dense, sparse, origin }
    }

    fn check(&self) -> Result<()> {
        ensure!(self.dense.len() == self.chunks.len(), "{} embeddings for {} chunks", self.dense.len(), self.chunks.len());
        ensure!(
            self.sparse.document_count() == self.chunks.len() as u64,
            "{} sparse documents for {} chunks",
            self.sparse.document_count(),
            self.chunks.len()
        );
        Ok(())
    }

    pub fn chunks(&self) -> &[String] { &self.chunks }
    pub fn chunk(&self, pos: usize) -> Option<&str> { self.chunks.get(pos).map(String::as_str) }
    pub fn dense(&self) -> &DenseIndex { &self.dense }
    pub fn sparse(&self) -> &SparseIndex { &self.sparse }
    pub fn len(&self) -> usize { self.chunks.len() }
    pub fn is_empty(&self) -> bool { self.chunks.is_empty() }
    pub fn origin(&self) -> StoreOrigin { self.origin }
}

fn encode(chunks: &[String], embedder: &dyn Embedder, batch_size: usize) -> Result<DenseIndex> {
    let batch_size = batch_size.max(1);
    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner} encoding [{bar:40}] {pos}/{len} chunks ({eta})")?
            .progress_chars("=> "),
    );
    let mut rows = Vec::with_capacity(chunks.len());
    for batch in chunks.chunks(batch_size) {
        let vectors = embedder.embed_batch(batch)?;
        ensure!(vectors.len() == batch.len(), "encoder returned {} vectors for {} chunks", vectors.len(), batch.len());
        rows.extend(vectors);
        pb.inc(batch.len() as u64);
    }
    pb.finish_and_clear();
    DenseIndex::from_rows(&rows, embedder.dim())
}
