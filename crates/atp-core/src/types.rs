//! Domain types shared by the loader, the indexes and the router.

use serde::{Deserialize, Serialize};

/// Width of the sentence encoder's output (all-MiniLM-L6-v2).
pub const EMBEDDING_DIM: usize = 384;

/// Position of a chunk in the corpus. Position is identity: the dense matrix
/// row, the sparse document and the chunk text all share it.
pub type ChunkPos = usize;

/// One row of the match table.
///
/// Every column is optional so that partial exports still load; rows missing
/// `winner_name`, `loser_name` or `score` are dropped by the loader. Numeric
/// columns stay textual because they are only ever rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRecord {
    pub tourney_name: Option<String>,
    pub surface: Option<String>,
    pub tourney_date: Option<String>,
    pub round: Option<String>,
    pub winner_name: Option<String>,
    pub loser_name: Option<String>,
    pub score: Option<String>,
    pub winner_rank: Option<String>,
    pub loser_rank: Option<String>,
    pub winner_age: Option<String>,
    pub loser_age: Option<String>,
    pub w_ace: Option<String>,
    pub l_ace: Option<String>,
    pub w_svpt: Option<String>,
    pub l_svpt: Option<String>,
    #[serde(rename = "w_1stWon")]
    pub w_1st_won: Option<String>,
    #[serde(rename = "l_1stWon")]
    pub l_1st_won: Option<String>,
    pub minutes: Option<String>,
}

impl MatchRecord {
    /// True when winner, loser and score are all present and non-blank.
    pub fn is_identified(&self) -> bool {
        [&self.winner_name, &self.loser_name, &self.score]
            .iter()
            .all(|f| f.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }

    pub fn tournament(&self) -> Option<&str> { self.tourney_name.as_deref() }
    pub fn winner(&self) -> &str { self.winner_name.as_deref().unwrap_or_default() }
    pub fn loser(&self) -> &str { self.loser_name.as_deref().unwrap_or_default() }
}

/// Where the answer context of a routed query came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RouteKind {
    Aggregation,
    Retrieval,
}

/// Final answer handed back to the API layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<String>,
}

/// Prompt handed to the text-completion collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}
