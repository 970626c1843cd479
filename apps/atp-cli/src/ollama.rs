//! Completion through a local Ollama server.

use anyhow::Result;
use ollama_rs::generation::completion::request::GenerationRequest;
use ollama_rs::models::ModelOptions;
use ollama_rs::Ollama;
use tokio::runtime::Runtime;
use tracing::debug;

use atp_core::traits::Synthesizer;
use atp_core::types::CompletionRequest;

pub struct OllamaSynthesizer {
    client: Ollama,
    model: String,
    runtime: Runtime,
}

impl OllamaSynthesizer {
    pub fn new(url: &str, model: impl Into<String>) -> Result<Self> {
        Ok(Self { client: Ollama::try_new(url)?, model: model.into(), runtime: Runtime::new()? })
    }
}

impl Synthesizer for OllamaSynthesizer {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let options = ModelOptions::default().num_predict(i32::try_from(request.max_tokens).unwrap_or(i32::MAX));
        let generation = GenerationRequest::new(self.model.clone(), request.user.clone())
            .system(request.system.clone())
            .options(options);
        let response = self.runtime.block_on(self.client.generate(generation))?;
        debug!(model = %self.model, chars = response.response.len(), "completion finished");
        Ok(response.response)
    }
}
