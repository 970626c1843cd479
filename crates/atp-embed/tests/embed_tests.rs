use atp_core::traits::Embedder;
use atp_core::types::EMBEDDING_DIM;
use atp_embed::{get_default_embedder, FakeEmbedder};

#[test]
fn fake_embedder_shapes_and_determinism() {
    // Force fake embedder to avoid loading the model
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");

    let embedder = get_default_embedder(None).expect("embedder");
    let texts = vec!["Player A defeated Player B".to_string(), "Player A defeated Player B".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(embedder.dim(), EMBEDDING_DIM);
    assert_eq!(v1.len(), 384, "embedding dim is 384");

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn embed_query_matches_batch_row() {
    let embedder = FakeEmbedder::default();
    let q = embedder.embed_query("wimbledon final").expect("query");
    let batch = embedder.embed_batch(&["wimbledon final".to_string()]).expect("batch");
    assert_eq!(q, batch[0]);
}

#[test]
fn empty_batch_is_empty() {
    let embedder = FakeEmbedder::new(8);
    assert!(embedder.embed_batch(&[]).expect("batch").is_empty());
}
