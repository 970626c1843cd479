//! Sentence encoder for match chunks and questions.
//!
//! `MiniLmEmbedder` runs sentence-transformers/all-MiniLM-L6-v2 (BERT, 384-d,
//! mean pooled, L2 normalised) on candle from a local model directory.
//! `APP_USE_FAKE_EMBEDDINGS=1` swaps in `FakeEmbedder`, a deterministic
//! hashing encoder for tests and development.

use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use atp_core::traits::Embedder;
use atp_core::types::EMBEDDING_DIM;

pub mod device;
pub mod pool;
pub mod tokenize;

pub use pool::masked_mean_l2;
pub use tokenize::tokenize_batch;

/// Default model directory name, looked up relative to the working directory.
pub const MODEL_NAME: &str = "all-MiniLM-L6-v2";
const MAX_LEN: usize = 256;

pub struct MiniLmEmbedder { model: BertModel, tokenizer: Tokenizer, device: Device }

impl MiniLmEmbedder {
    pub fn new(model_dir: Option<&Path>) -> Result<Self> {
        let device = device::select_device();
        let model_dir = resolve_model_dir(model_dir)?;
        info!(dir = %model_dir.display(), "loading {MODEL_NAME}");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let config_path = model_dir.join("config.json");
        let config: BertConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;
        let weights = load_weights(&model_dir, &device)?;
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let model = BertModel::load(vb, &config)?;
        info!("{MODEL_NAME} loaded");
        Ok(Self { model, tokenizer, device })
    }

    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize_batch(&self.tokenizer, texts, MAX_LEN, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let rows: Vec<Vec<f32>> = pooled.to_device(&Device::Cpu)?.to_vec2()?;
        debug!(batch = texts.len(), elapsed_ms = start.elapsed().as_millis() as u64, "encoded batch");
        Ok(rows)
    }
}

impl Embedder for MiniLmEmbedder {
    fn dim(&self) -> usize { EMBEDDING_DIM }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() { return Ok(Vec::new()); }
        self.encode(texts)
    }
}

/// Hashing encoder: each whitespace token bumps one bucket. Same text, same
/// vector; shared tokens pull vectors together.
pub struct FakeEmbedder { dim: usize }

impl FakeEmbedder { pub fn new(dim: usize) -> Self { Self { dim } } }

impl Default for FakeEmbedder { fn default() -> Self { Self::new(EMBEDDING_DIM) } }

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        use std::hash::{Hash, Hasher}; use twox_hash::XxHash64;
        Ok(texts.iter().map(|text| {
            let mut v = vec![0f32; self.dim];
            for (i, token) in text.to_lowercase().split_whitespace().enumerate() { let mut hasher = XxHash64::with_seed(0); token.hash(&mut hasher); let h = hasher.finish(); let idx = (h as usize) % self.dim; let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32); v[idx] += val + (i as f32 % 3.0) * 0.01; }
            let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6); for x in &mut v { *x /= norm; } v
        }).collect())
    }
}

pub fn use_fake_embeddings() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

pub fn get_default_embedder(model_dir: Option<&Path>) -> Result<Box<dyn Embedder>> {
    if use_fake_embeddings() { warn!("APP_USE_FAKE_EMBEDDINGS set, using FakeEmbedder"); return Ok(Box::new(FakeEmbedder::default())); }
    Ok(Box::new(MiniLmEmbedder::new(model_dir)?))
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<HashMap<String, Tensor>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        return Ok(candle_core::safetensors::load(&safetensors, device)?);
    }
    let pickle = model_dir.join("pytorch_model.bin");
    if pickle.exists() {
        let weights = candle_core::pickle::read_all(&pickle)?;
        return Ok(weights.into_iter().collect());
    }
    Err(anyhow!("No model.safetensors or pytorch_model.bin under {}", model_dir.display()))
}

fn resolve_model_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit { if p.exists() { return Ok(p.to_path_buf()); } warn!(dir = %p.display(), "configured model dir does not exist"); }
    if let Ok(dir) = std::env::var("APP_MODEL_DIR") { let p = PathBuf::from(&dir); if p.exists() { return Ok(p); } }
    if let Ok(dir) = std::env::var("MODEL_DIR") { let p = PathBuf::from(&dir); if p.exists() { return Ok(p); } }
    let local = Path::new("models").join(MODEL_NAME); if local.exists() { return Ok(local); }
    let parent = Path::new("../models").join(MODEL_NAME); if parent.exists() { return Ok(parent); }
    Err(anyhow!("Could not locate {MODEL_NAME} model directory (set embedding.model_dir or APP_MODEL_DIR)"))
}
