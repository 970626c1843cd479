use atp_text::SparseIndex;
use tempfile::TempDir;

fn chunks() -> Vec<String> {
    vec![
        "Player A defeated Player B at Wimbledon on Grass surface in the F round".to_string(),
        "Player C defeated Player D at Halle on Grass surface in the SF round".to_string(),
        "Player A defeated Player E at Halle on Grass surface in the F round".to_string(),
        "Player F defeated Player G at Basel on Hard surface in the QF round".to_string(),
    ]
}

#[test]
fn persisted_index_reopens_with_same_ranking() {
    let tmp = TempDir::new().expect("tmp");
    let dir = tmp.path().join("sparse");
    let chunks = chunks();

    let built = SparseIndex::create_in_dir(&dir, chunks.iter().enumerate().map(|(i, c)| (i, c.as_str()))).expect("build");
    assert!(SparseIndex::exists(&dir));
    assert_eq!(built.document_count(), chunks.len() as u64);
    let before = built.top_positions("halle final", 3).expect("search");
    drop(built);

    let reopened = SparseIndex::open_in_dir(&dir).expect("open");
    assert_eq!(reopened.document_count(), 4);
    let after = reopened.top_positions("halle final", 3).expect("search");

    assert_eq!(before, after);
    assert!(after.starts_with(&[1]) || after.starts_with(&[2]));
    assert!(after.iter().all(|&p| p == 1 || p == 2), "only Halle chunks match: {after:?}");
}

#[test]
fn pool_index_reports_corpus_positions() {
    let chunks = chunks();
    let pool = [1usize, 2];
    let index = SparseIndex::in_ram(pool.iter().map(|&p| (p, chunks[p].as_str()))).expect("pool");

    assert_eq!(index.document_count(), 2);
    let hits = index.top_positions("player a", 5).expect("search");
    assert_eq!(hits.first(), Some(&2));
}

#[test]
fn missing_dir_is_not_an_index() {
    let tmp = TempDir::new().expect("tmp");
    assert!(!SparseIndex::exists(&tmp.path().join("absent")));
    assert!(!SparseIndex::exists(tmp.path()));
}
