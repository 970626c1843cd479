//! On-disk snapshot of the index store.
//!
//! A snapshot directory holds three artifacts that must agree with each other:
//! the chunk texts (`chunks.json`), the embedding matrix (`embeddings.npy`) and
//! the sparse index (`sparse/`). Writes go to a sibling staging directory that
//! is renamed over the snapshot once every artifact is complete.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info};

use atp_text::SparseIndex;
use atp_vector::DenseIndex;

pub const CHUNKS_FILE: &str = "chunks.json";
pub const EMBEDDINGS_FILE: &str = "embeddings.npy";
pub const SPARSE_DIR: &str = "sparse";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot artifact missing: {0}")]
    Missing(PathBuf),
    #[error("unreadable snapshot artifact {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
    #[error("embedding matrix has {rows} rows for {chunks} chunks")]
    RowCount { rows: usize, chunks: usize },
    #[error("embedding width {found} does not match encoder width {expected}")]
    Width { found: usize, expected: usize },
    #[error("sparse index holds {docs} documents for {chunks} chunks")]
    DocCount { docs: u64, chunks: usize },
}

pub struct Snapshot {
    pub chunks: Vec<String>,
    pub dense: DenseIndex,
    pub sparse: SparseIndex,
}

impl Snapshot {
    /// Load and cross-check all three artifacts.
    pub fn load(dir: &Path, dim: usize) -> Result<Self, SnapshotError> {
        let chunks_path = dir.join(CHUNKS_FILE);
        let embeddings_path = dir.join(EMBEDDINGS_FILE);
        let sparse_path = dir.join(SPARSE_DIR);
        for path in [&chunks_path, &embeddings_path] {
            if !path.is_file() { return Err(SnapshotError::Missing(path.clone())); }
        }
        if !SparseIndex::exists(&sparse_path) { return Err(SnapshotError::Missing(sparse_path)); }

        let chunks = read_chunks(&chunks_path)?;
        let dense = DenseIndex::load_npy(&embeddings_path).map_err(|e| unreadable(&embeddings_path, e))?;
        if dense.len() != chunks.len() {
            return Err(SnapshotError::RowCount { rows: dense.len(), chunks: chunks.len() });
        }
        if dense.dim() != dim {
            return Err(SnapshotError::Width { found: dense.dim(), expected: dim });
        }
        let sparse = SparseIndex::open_in_dir(&sparse_path).map_err(|e| unreadable(&sparse_path, e))?;
        let docs = sparse.document_count();
        if docs != chunks.len() as u64 {
            return Err(SnapshotError::DocCount { docs, chunks: chunks.len() });
        }
        debug!(dir = %dir.display(), chunks = chunks.len(), "snapshot is consistent");
        Ok(Self { chunks, dense, sparse })
    }

    /// Persist `chunks` and `dense` with a freshly built sparse index, replacing
    /// whatever snapshot `dir` held before.
    pub fn write(dir: &Path, chunks: &[String], dense: &DenseIndex) -> anyhow::Result<()> {
        anyhow::ensure!(dense.len() == chunks.len(), "{} embeddings for {} chunks", dense.len(), chunks.len());
        if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let staging = sibling(dir, "staging");
        if staging.exists() { fs::remove_dir_all(&staging)?; }
        fs::create_dir_all(&staging).with_context(|| format!("creating {}", staging.display()))?;

        let file = File::create(staging.join(CHUNKS_FILE))?;
        serde_json::to_writer(BufWriter::new(file), chunks)?;
        dense.save_npy(&staging.join(EMBEDDINGS_FILE))?;
        let sparse = SparseIndex::create_in_dir(
            &staging.join(SPARSE_DIR),
            chunks.iter().enumerate().map(|(pos, text)| (pos, text.as_str())),
        )?;
        drop(sparse);

        let retired = sibling(dir, "old");
        if retired.exists() { fs::remove_dir_all(&retired)?; }
        if dir.exists() { fs::rename(dir, &retired).with_context(|| format!("retiring {}", dir.display()))?; }
        fs::rename(&staging, dir).with_context(|| format!("publishing snapshot to {}", dir.display()))?;
        if retired.exists() { fs::remove_dir_all(&retired)?; }
        info!(dir = %dir.display(), chunks = chunks.len(), "wrote index snapshot");
        Ok(())
    }
}

fn read_chunks(path: &Path) -> Result<Vec<String>, SnapshotError> {
    let file = File::open(path).map_err(|e| unreadable(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| unreadable(path, e))
}

fn unreadable(path: &Path, err: impl std::fmt::Display) -> SnapshotError {
    SnapshotError::Unreadable { path: path.to_path_buf(), reason: err.to_string() }
}

fn sibling(dir: &Path, suffix: &str) -> PathBuf {
    let name = dir.file_name().map_or_else(|| "index".into(), |n| n.to_string_lossy().into_owned());
    dir.with_file_name(format!("{name}.{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> (Vec<String>, DenseIndex) {
        let chunks = vec!["a defeated b".to_string(), "c defeated d".to_string()];
        let dense = DenseIndex::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]], 2).unwrap();
        (chunks, dense)
    }

    #[test]
    fn write_then_load() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("index");
        let (chunks, dense) = sample();
        Snapshot::write(&dir, &chunks, &dense).unwrap();
        assert!(!sibling(&dir, "staging").exists());

        let snap = Snapshot::load(&dir, 2).unwrap();
        assert_eq!(snap.chunks, chunks);
        assert_eq!(snap.dense.len(), 2);
        assert_eq!(snap.sparse.document_count(), 2);
    }

    #[test]
    fn missing_artifact_is_reported() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("index");
        let (chunks, dense) = sample();
        Snapshot::write(&dir, &chunks, &dense).unwrap();
        fs::remove_file(dir.join(EMBEDDINGS_FILE)).unwrap();
        assert!(matches!(Snapshot::load(&dir, 2), Err(SnapshotError::Missing(_))));
    }

    #[test]
    fn width_mismatch_is_reported() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("index");
        let (chunks, dense) = sample();
        Snapshot::write(&dir, &chunks, &dense).unwrap();
        assert!(matches!(Snapshot::load(&dir, 384), Err(SnapshotError::Width { found: 2, expected: 384 })));
    }

    #[test]
    fn truncated_chunk_list_is_reported() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("index");
        let (chunks, dense) = sample();
        Snapshot::write(&dir, &chunks, &dense).unwrap();
        fs::write(dir.join(CHUNKS_FILE), r#"["a defeated b"]"#).unwrap();
        assert!(matches!(Snapshot::load(&dir, 2), Err(SnapshotError::RowCount { rows: 2, chunks: 1 })));
    }

    #[test]
    fn garbage_chunk_file_is_unreadable() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("index");
        let (chunks, dense) = sample();
        Snapshot::write(&dir, &chunks, &dense).unwrap();
        fs::write(dir.join(CHUNKS_FILE), "not json").unwrap();
        assert!(matches!(Snapshot::load(&dir, 2), Err(SnapshotError::Unreadable { .. })));
    }

    #[test]
    fn rewrite_replaces_previous_snapshot() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("index");
        let (chunks, dense) = sample();
        Snapshot::write(&dir, &chunks, &dense).unwrap();
        let one = DenseIndex::from_rows(&[vec![0.5, 0.5]], 2).unwrap();
        Snapshot::write(&dir, &chunks[..1], &one).unwrap();
        let snap = Snapshot::load(&dir, 2).unwrap();
        assert_eq!(snap.chunks.len(), 1);
        assert_eq!(snap.sparse.document_count(), 1);
    }
}
