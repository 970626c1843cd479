//! Hybrid retrieval over ATP match chunks: the persisted index store, dense +
//! sparse ranking fused by reciprocal rank, win-count aggregation and the
//! router that chooses between them.

pub mod aggregate;
pub mod fusion;
pub mod retriever;
pub mod router;
pub mod service;
pub mod snapshot;
pub mod store;

pub use aggregate::{Aggregation, Aggregator};
pub use fusion::reciprocal_rank_fusion;
pub use retriever::{DenseRanking, HybridRetriever, Retrieval, RetrievalMode};
pub use router::{QueryKind, QueryRouter, Routed, classify};
pub use service::{AskError, AskService};
pub use snapshot::SnapshotError;
pub use store::{IndexSettings, IndexStore, StoreOrigin};
