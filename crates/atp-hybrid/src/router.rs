use anyhow::Result;
use tracing::debug;

use atp_core::types::{MatchRecord, RouteKind};

use crate::aggregate::Aggregator;
use crate::retriever::{HybridRetriever, RetrievalMode};

/// Phrases that mark a counting question.
pub const AGGREGATION_TRIGGERS: &[&str] = &[
    "most wins",
    "most matches",
    "who won the most",
    "how many",
    "total wins",
    "win count",
    "most victories",
    "best record",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Aggregation,
    Lookup,
}

pub fn classify(query: &str) -> QueryKind {
    let lowered = query.to_lowercase();
    if AGGREGATION_TRIGGERS.iter().any(|t| lowered.contains(t)) { QueryKind::Aggregation } else { QueryKind::Lookup }
}

/// Context assembled for one question.
#[derive(Debug, Clone, PartialEq)]
pub struct Routed {
    pub kind: RouteKind,
    pub context: String,
    pub sources: Vec<String>,
    /// Set when the context came from the retriever.
    pub mode: Option<RetrievalMode>,
}

pub struct QueryRouter<'a> {
    aggregator: Aggregator<'a>,
    retriever: HybridRetriever<'a>,
}

impl<'a> QueryRouter<'a> {
    pub fn new(records: &'a [MatchRecord], retriever: HybridRetriever<'a>) -> Self {
        Self { aggregator: Aggregator::new(records), retriever }
    }

    pub fn route(&self, query: &str) -> Result<Routed> {
        if classify(query) == QueryKind::Aggregation {
            let agg = self.aggregator.aggregate(query);
            if let Some(summary) = agg.summary {
                return Ok(Routed { kind: RouteKind::Aggregation, context: summary, sources: agg.snippets, mode: None });
            }
            debug!(tournament = ?agg.tournament, "aggregation found nothing, falling back to retrieval");
        }
        let hit = self.retriever.retrieve_default(query)?;
        Ok(Routed { kind: RouteKind::Retrieval, context: hit.chunks.join("\n"), sources: hit.chunks, mode: Some(hit.mode) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_phrases_route_to_aggregation() {
        assert_eq!(classify("Who won the most matches at Halle?"), QueryKind::Aggregation);
        assert_eq!(classify("HOW MANY titles in Basel"), QueryKind::Aggregation);
        assert_eq!(classify("best record on grass"), QueryKind::Aggregation);
    }

    #[test]
    fn other_questions_are_lookups() {
        assert_eq!(classify("Who won the 2019 Wimbledon final?"), QueryKind::Lookup);
        assert_eq!(classify(""), QueryKind::Lookup);
    }
}
