use std::collections::HashSet;

use anyhow::Result;
use tracing::{debug, warn};

use atp_core::config::RetrievalSettings;
use atp_core::extract_tournament;
use atp_core::traits::Embedder;
use atp_core::types::ChunkPos;
use atp_text::SparseIndex;

use crate::fusion::reciprocal_rank_fusion;
use crate::store::IndexStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalMode {
    /// Candidate pool small enough to hand back whole, in corpus order.
    Unranked,
    /// Dense and sparse rankings merged by reciprocal rank fusion.
    Fused,
    /// Dense ranking was unavailable; sparse ranking only.
    SparseOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval {
    pub chunks: Vec<String>,
    pub positions: Vec<ChunkPos>,
    pub tournament: Option<&'static str>,
    pub mode: RetrievalMode,
}

/// Outcome of asking the dense side for a ranking.
#[derive(Debug)]
pub enum DenseRanking {
    Ranked(Vec<ChunkPos>),
    Unavailable(String),
}

pub struct HybridRetriever<'a> {
    store: &'a IndexStore,
    encoder: Option<&'a dyn Embedder>,
    settings: RetrievalSettings,
}

impl<'a> HybridRetriever<'a> {
    pub fn new(store: &'a IndexStore, encoder: Option<&'a dyn Embedder>, settings: RetrievalSettings) -> Self {
        Self { store, encoder, settings }
    }

    pub fn settings(&self) -> RetrievalSettings { self.settings }

    /// Retrieve with the configured `top_k`.
    pub fn retrieve_default(&self, query: &str) -> Result<Retrieval> {
        self.retrieve(query, self.settings.top_k)
    }

    pub fn retrieve(&self, query: &str, top_k: usize) -> Result<Retrieval> {
        let tournament = extract_tournament(query);
        let (candidates, filtered) = self.candidates(tournament);

        if candidates.len() <= self.settings.rank_threshold {
            debug!(pool = candidates.len(), tournament = ?tournament, "returning candidate pool unranked");
            return Ok(self.collect(candidates, tournament, RetrievalMode::Unranked));
        }

        let sparse = self.sparse_ranking(query, &candidates, filtered, top_k)?;

        let (positions, mode) = match self.dense_ranking(query, &candidates, top_k) {
            DenseRanking::Ranked(dense) => {
                let fused = reciprocal_rank_fusion(&[dense.as_slice(), sparse.as_slice()], self.settings.rrf_k);
                (fused.into_iter().take(top_k).map(|(pos, _)| pos).collect::<Vec<_>>(), RetrievalMode::Fused)
            }
            DenseRanking::Unavailable(reason) => {
                warn!(%reason, "dense ranking unavailable, using sparse ranking only");
                (sparse.into_iter().take(top_k).collect::<Vec<_>>(), RetrievalMode::SparseOnly)
            }
        };
        debug!(pool = candidates.len(), returned = positions.len(), ?mode, "ranked candidate pool");
        Ok(self.collect(positions, tournament, mode))
    }

    /// BM25 ranking over the candidate pool, `min(k, pool)` long. Scored hits
    /// come first; candidates sharing no term with the query follow in corpus
    /// order.
    fn sparse_ranking(&self, query: &str, candidates: &[ChunkPos], filtered: bool, k: usize) -> Result<Vec<ChunkPos>> {
        let hits = if filtered {
            let pool = SparseIndex::in_ram(candidates.iter().map(|&p| (p, self.store.chunks()[p].as_str())))?;
            pool.top_positions(query, k)?
        } else {
            self.store.sparse().top_positions(query, k)?
        };
        Ok(pad_ranking(hits, candidates, k))
    }

    /// Candidate positions for the query, and whether the tournament filter
    /// narrowed them. An empty filtered pool widens back to the full corpus.
    /// The match is a case-sensitive substring test on the canonical name.
    fn candidates(&self, tournament: Option<&str>) -> (Vec<ChunkPos>, bool) {
        let all = || (0..self.store.len()).collect::<Vec<_>>();
        let Some(name) = tournament else { return (all(), false) };
        let pool: Vec<ChunkPos> = self
            .store
            .chunks()
            .iter()
            .enumerate()
            .filter(|(_, text)| text.contains(name))
            .map(|(pos, _)| pos)
            .collect();
        if pool.is_empty() {
            debug!(tournament = name, "no chunk mentions the tournament, searching the whole corpus");
            return (all(), false);
        }
        (pool, true)
    }

    pub fn dense_ranking(&self, query: &str, candidates: &[ChunkPos], k: usize) -> DenseRanking {
        let Some(encoder) = self.encoder else {
            return DenseRanking::Unavailable("no query encoder configured".to_string());
        };
        let vector = match encoder.embed_query(query) {
            Ok(v) => v,
            Err(e) => return DenseRanking::Unavailable(format!("query encoding failed: {e:#}")),
        };
        match self.store.dense().nearest(&vector, candidates, k) {
            Ok(ranked) => DenseRanking::Ranked(ranked),
            Err(e) => DenseRanking::Unavailable(format!("dense search failed: {e:#}")),
        }
    }

    fn collect(&self, positions: Vec<ChunkPos>, tournament: Option<&'static str>, mode: RetrievalMode) -> Retrieval {
        let chunks = positions.iter().map(|&p| self.store.chunks()[p].clone()).collect();
        Retrieval { chunks, positions, tournament, mode }
    }
}

fn pad_ranking(mut ranked: Vec<ChunkPos>, candidates: &[ChunkPos], k: usize) -> Vec<ChunkPos> {
    let target = k.min(candidates.len());
    if ranked.len() >= target { return ranked; }
    let seen: HashSet<ChunkPos> = ranked.iter().copied().collect();
    ranked.extend(candidates.iter().copied().filter(|p| !seen.contains(p)).take(target - ranked.len()));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_appends_unscored_candidates_in_order() {
        assert_eq!(pad_ranking(vec![9, 4], &[2, 4, 7, 9, 11], 4), vec![9, 4, 2, 7]);
    }

    #[test]
    fn padding_stops_at_pool_size() {
        assert_eq!(pad_ranking(vec![], &[3, 5], 15), vec![3, 5]);
        assert_eq!(pad_ranking(vec![5], &[3, 5], 2), vec![5, 3]);
    }
}
