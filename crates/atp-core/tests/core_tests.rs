use std::fs;

use tempfile::TempDir;

use atp_core::config::Config;
use atp_core::corpus::Corpus;

const HEADER: &str = "tourney_name,surface,round,winner_name,loser_name,score,winner_rank,loser_rank,minutes";

#[test]
fn load_csv_file_into_ordered_chunks() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("matches.csv");
    fs::write(
        &path,
        format!("{HEADER}\nWimbledon,Grass,F,Player A,Player B,6-4 6-4,1,2,120\nHalle,Grass,SF,Player C,Player D,7-6 6-3,5,9,95\n"),
    )
    .unwrap();

    let corpus = Corpus::load(&path).expect("load");

    assert_eq!(corpus.len(), 2);
    assert_eq!(
        corpus.chunks()[0],
        "Player A defeated Player B at Wimbledon on Grass surface in the F round with score 6-4 6-4. Winner rank: 1, Loser rank: 2. Match duration: 120 minutes."
    );
    assert!(corpus.chunks()[1].starts_with("Player C defeated Player D at Halle"));
}

#[test]
fn rows_missing_identity_are_dropped_one_for_one() {
    let csv = format!(
        "{HEADER}\n\
         Wimbledon,Grass,F,A,B,6-4 6-4,1,2,120\n\
         Wimbledon,Grass,SF,,B,6-4 6-4,1,2,120\n\
         Wimbledon,Grass,QF,A,,6-4 6-4,1,2,120\n\
         Wimbledon,Grass,R16,A,C,,1,2,120\n\
         Halle,Grass,F,C,D,7-5 7-5,3,4,100\n"
    );

    let corpus = Corpus::from_reader(csv.as_bytes()).expect("load");

    assert_eq!(corpus.report().kept, 2);
    assert_eq!(corpus.report().dropped, 3);
    assert_eq!(corpus.len(), 2, "each incomplete row removes exactly one chunk");
    assert_eq!(corpus.records().len(), corpus.chunks().len());
    assert!(corpus.chunks()[1].contains("at Halle"));
}

#[test]
fn extra_columns_ignored_and_missing_ones_substituted() {
    let csv = "winner_name,loser_name,score,tourney_id,best_of\nA,B,6-0 6-0,2024-540,3\n";

    let corpus = Corpus::from_reader(csv.as_bytes()).expect("load");

    assert_eq!(corpus.len(), 1);
    let chunk = &corpus.chunks()[0];
    assert!(chunk.contains("at Unknown Tournament on Unknown surface"));
    assert!(chunk.contains("Winner rank: N/A, Loser rank: N/A"));
    assert!(!chunk.contains("2024-540"));
}

#[test]
fn monte_carlo_is_normalized_on_load() {
    let csv = format!("{HEADER}\nMonte-Carlo Masters,Clay,F,A,B,6-2 6-2,1,2,80\n");

    let corpus = Corpus::from_reader(csv.as_bytes()).expect("load");

    assert_eq!(corpus.records()[0].tournament(), Some("Monte Carlo Masters"));
    assert!(corpus.chunks()[0].contains("at Monte Carlo Masters"));
}

#[test]
fn missing_file_is_a_corpus_error() {
    let tmp = TempDir::new().unwrap();
    let err = Corpus::load(&tmp.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, atp_core::Error::Corpus { .. }));
}

#[test]
fn config_reads_toml_and_fills_defaults() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[data]\nindex_dir = \"snap\"\n\n[retrieval]\ntop_k = 5\n",
    )
    .unwrap();

    let config = Config::load_in(tmp.path()).expect("config");
    let settings = config.settings().expect("settings");

    assert_eq!(settings.retrieval.top_k, 5);
    assert_eq!(settings.retrieval.rank_threshold, 50);
    assert_eq!(settings.retrieval.rrf_k, 60);
    assert_eq!(settings.data.matches_csv, "data/atp_matches.csv");
    assert_eq!(config.path(&settings.data.index_dir), tmp.path().join("snap"));
    assert_eq!(config.get::<usize>("retrieval.top_k").unwrap(), 5);
}
