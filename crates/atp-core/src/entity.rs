//! Tournament entity extraction from free-text questions.

/// Keyword to canonical tournament name, scanned top to bottom.
///
/// The first keyword found in the lower-cased query wins, so order is the
/// resolution rule when a query mentions several. Keep more specific keywords
/// above generic ones (e.g. "australian open" above any bare "open").
pub const TOURNAMENT_KEYWORDS: &[(&str, &str)] = &[
    ("acapulco", "Acapulco"),
    ("australian open", "Australian Open"),
    ("roland garros", "Roland Garros"),
    ("french open", "Roland Garros"),
    ("wimbledon", "Wimbledon"),
    ("us open", "Us Open"),
    ("indian wells", "Indian Wells Masters"),
    ("miami", "Miami Masters"),
    ("monte carlo", "Monte Carlo Masters"),
    ("madrid", "Madrid Masters"),
    ("rome", "Rome Masters"),
    ("canada", "Canada Masters"),
    ("cincinnati", "Cincinnati Masters"),
    ("shanghai", "Shanghai Masters"),
    ("paris", "Paris Masters"),
    ("toronto", "Canada Masters"),
    ("halle", "Halle"),
    ("queens", "Queen's Club"),
    ("barcelona", "Barcelona"),
    ("hamburg", "Hamburg"),
    ("vienna", "Vienna"),
    ("basel", "Basel"),
    ("tokyo", "Tokyo"),
];

pub fn extract_tournament(query: &str) -> Option<&'static str> {
    let lowered = query.to_lowercase();
    TOURNAMENT_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, canonical)| *canonical)
}
