//! Match table loading and chunk rendering.
//!
//! A `Corpus` pairs every kept `MatchRecord` with the text chunk rendered from
//! it. Both vectors share positions, and that position is the chunk identity
//! used by the dense and sparse indexes.

use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::MatchRecord;

/// Substring aliases rewritten to a canonical tournament name on load.
const TOURNAMENT_ALIASES: &[(&str, &str)] = &[("monte-carlo", "Monte Carlo Masters")];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub kept: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<MatchRecord>,
    chunks: Vec<String>,
    report: LoadReport,
}

impl Corpus {
    pub fn load(path: &Path) -> Result<Self> {
        let reader = csv::Reader::from_path(path).map_err(|source| Error::Corpus { path: path.to_path_buf(), source })?;
        let corpus = Self::from_csv(reader)?;
        info!(path = %path.display(), kept = corpus.report.kept, dropped = corpus.report.dropped, "loaded match data");
        Ok(corpus)
    }

    /// Load from any CSV source with a header row.
    pub fn from_reader<R: Read>(input: R) -> Result<Self> {
        Self::from_csv(csv::Reader::from_reader(input))
    }

    pub fn from_records(rows: impl IntoIterator<Item = MatchRecord>) -> Self {
        let mut records = Vec::new();
        let mut dropped = 0usize;
        for mut record in rows {
            if !record.is_identified() {
                dropped += 1;
                continue;
            }
            record.tourney_name = record.tourney_name.map(|name| normalize_tournament(&name));
            records.push(record);
        }
        if dropped > 0 {
            debug!(dropped, "dropped rows without winner, loser or score");
        }
        let chunks = records.iter().map(render_chunk).collect();
        let report = LoadReport { kept: records.len(), dropped };
        Self { records, chunks, report }
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut rows = Vec::new();
        for (i, row) in reader.deserialize::<MatchRecord>().enumerate() {
            rows.push(row.map_err(|source| Error::Row { row: i + 1, source })?);
        }
        Ok(Self::from_records(rows))
    }

    pub fn records(&self) -> &[MatchRecord] { &self.records }
    pub fn chunks(&self) -> &[String] { &self.chunks }
    pub fn report(&self) -> LoadReport { self.report }
    pub fn len(&self) -> usize { self.chunks.len() }
    pub fn is_empty(&self) -> bool { self.chunks.is_empty() }
}

pub fn normalize_tournament(name: &str) -> String {
    let lowered = name.to_lowercase();
    TOURNAMENT_ALIASES
        .iter()
        .find(|(alias, _)| lowered.contains(alias))
        .map_or_else(|| name.to_string(), |(_, canonical)| (*canonical).to_string())
}

/// Render one match as a retrievable passage. Absent optional fields get a
/// placeholder so the template is stable across partial exports.
pub fn render_chunk(record: &MatchRecord) -> String {
    fn or<'a>(field: &'a Option<String>, placeholder: &'a str) -> &'a str {
        field.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or(placeholder)
    }
    format!(
        "{} defeated {} at {} on {} surface in the {} round with score {}. Winner rank: {}, Loser rank: {}. Match duration: {} minutes.",
        record.winner(),
        record.loser(),
        or(&record.tourney_name, "Unknown Tournament"),
        or(&record.surface, "Unknown"),
        or(&record.round, "Unknown"),
        or(&record.score, "N/A"),
        or(&record.winner_rank, "N/A"),
        or(&record.loser_rank, "N/A"),
        or(&record.minutes, "N/A"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monte_carlo_spellings_collapse() {
        assert_eq!(normalize_tournament("Monte-Carlo Masters"), "Monte Carlo Masters");
        assert_eq!(normalize_tournament("monte-carlo"), "Monte Carlo Masters");
        assert_eq!(normalize_tournament("Wimbledon"), "Wimbledon");
    }

    #[test]
    fn render_uses_placeholders_for_missing_fields() {
        let record = MatchRecord {
            winner_name: Some("A".into()),
            loser_name: Some("B".into()),
            score: Some("6-4 6-4".into()),
            ..Default::default()
        };
        let text = render_chunk(&record);
        assert_eq!(
            text,
            "A defeated B at Unknown Tournament on Unknown surface in the Unknown round with score 6-4 6-4. Winner rank: N/A, Loser rank: N/A. Match duration: N/A minutes."
        );
    }
}
