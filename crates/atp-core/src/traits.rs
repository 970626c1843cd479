use crate::types::CompletionRequest;

/// Sentence encoder used for both chunks and queries.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("encoder returned no vector for query"))
    }
}

/// Text-completion service that turns a prompt into prose.
pub trait Synthesizer: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String>;
}
