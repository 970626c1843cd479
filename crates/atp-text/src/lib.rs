//! atp-text
//!
//! Tantivy-backed BM25 index over match chunks. The same index type serves the
//! persisted whole-corpus statistics and the per-query candidate pools.
pub mod tantivy_utils;
pub mod index;

pub use index::SparseIndex;
