use atp_core::traits::Embedder;
use atp_embed::FakeEmbedder;
use atp_vector::DenseIndex;
use tempfile::TempDir;

#[test]
fn npy_snapshot_reloads_same_neighbours() {
    let embedder = FakeEmbedder::default();
    let chunks: Vec<String> = (0..20).map(|i| format!("Player {i} defeated Player {} at Basel", i + 1)).collect();
    let rows = embedder.embed_batch(&chunks).expect("embed");
    let index = DenseIndex::from_rows(&rows, embedder.dim()).expect("index");
    assert_eq!(index.len(), 20);
    assert_eq!(index.dim(), 384);

    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("embeddings.npy");
    index.save_npy(&path).expect("save");
    let reloaded = DenseIndex::load_npy(&path).expect("load");
    assert_eq!((reloaded.len(), reloaded.dim()), (20, 384));
    assert_eq!(reloaded.row(7).expect("row"), rows[7]);

    let q = embedder.embed_query(&chunks[3]).expect("query");
    let all: Vec<usize> = (0..20).collect();
    let before = index.nearest(&q, &all, 5).expect("search");
    let after = reloaded.nearest(&q, &all, 5).expect("search");
    assert_eq!(before, after);
    assert_eq!(after[0], 3, "a chunk is its own nearest neighbour");
}

#[test]
fn ragged_rows_are_rejected() {
    assert!(DenseIndex::from_rows(&[vec![1.0, 2.0], vec![1.0]], 2).is_err());
}
