//! Win-count aggregation over the structured match table.

use std::collections::HashMap;

use tracing::debug;

use atp_core::extract_tournament;
use atp_core::types::MatchRecord;

/// Result of a "who won the most" question.
///
/// `summary` is `None` when no match survived the tournament filter; callers
/// fall back to retrieval in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub tournament: Option<&'static str>,
    pub summary: Option<String>,
    pub snippets: Vec<String>,
    pub leader: Option<(String, usize)>,
}

impl Aggregation {
    pub fn empty(tournament: Option<&'static str>) -> Self {
        Self { tournament, ..Self::default() }
    }

    pub fn is_empty(&self) -> bool { self.summary.is_none() }
}

pub struct Aggregator<'a> {
    records: &'a [MatchRecord],
}

impl<'a> Aggregator<'a> {
    pub fn new(records: &'a [MatchRecord]) -> Self { Self { records } }

    pub fn aggregate(&self, query: &str) -> Aggregation {
        let tournament = extract_tournament(query);
        let needle = tournament.map(str::to_lowercase);
        let rows: Vec<&MatchRecord> = self
            .records
            .iter()
            .filter(|r| match &needle {
                Some(needle) => r.tournament().is_some_and(|t| t.to_lowercase().contains(needle.as_str())),
                None => true,
            })
            .collect();

        let mut wins: HashMap<&str, usize> = HashMap::new();
        for r in &rows {
            *wins.entry(r.winner()).or_default() += 1;
        }
        // highest count; equal counts go to the alphabetically first name
        let Some((leader, count)) = wins.into_iter().max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0))) else {
            debug!(tournament = ?tournament, "no matches to aggregate");
            return Aggregation::empty(tournament);
        };

        let summary = match tournament {
            Some(t) => format!("{leader} won the most matches at {t} with {count} wins."),
            None => format!("{leader} won the most matches with {count} wins."),
        };
        let snippets = rows
            .iter()
            .filter(|r| r.winner() == leader)
            .map(|r| {
                format!(
                    "{} defeated {} in the {} with score {}",
                    leader,
                    r.loser(),
                    r.round.as_deref().unwrap_or("Unknown"),
                    r.score.as_deref().unwrap_or("N/A"),
                )
            })
            .collect();
        debug!(tournament = ?tournament, leader, count, pool = rows.len(), "aggregated wins");
        Aggregation { tournament, summary: Some(summary), snippets, leader: Some((leader.to_string(), count)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(t: &str, w: &str, l: &str) -> MatchRecord {
        MatchRecord {
            tourney_name: Some(t.into()),
            winner_name: Some(w.into()),
            loser_name: Some(l.into()),
            round: Some("R32".into()),
            score: Some("6-3 6-3".into()),
            ..Default::default()
        }
    }

    #[test]
    fn ties_go_to_first_name_alphabetically() {
        let records = vec![rec("Basel", "Zed", "A"), rec("Basel", "Amy", "B")];
        let agg = Aggregator::new(&records).aggregate("most wins in Basel");
        assert_eq!(agg.leader, Some(("Amy".to_string(), 1)));
    }

    #[test]
    fn no_tournament_counts_everything() {
        let records = vec![rec("Basel", "Zed", "A"), rec("Vienna", "Zed", "B"), rec("Tokyo", "Amy", "C")];
        let agg = Aggregator::new(&records).aggregate("who has the most wins overall?");
        assert_eq!(agg.tournament, None);
        assert_eq!(agg.summary.as_deref(), Some("Zed won the most matches with 2 wins."));
        assert_eq!(agg.snippets.len(), 2);
    }

    #[test]
    fn unmatched_tournament_is_empty() {
        let records = vec![rec("Basel", "Zed", "A")];
        let agg = Aggregator::new(&records).aggregate("most wins at Wimbledon");
        assert!(agg.is_empty());
        assert_eq!(agg.tournament, Some("Wimbledon"));
        assert!(agg.snippets.is_empty());
    }
}
