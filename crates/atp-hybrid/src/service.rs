//! Question answering on top of the router: access check, prompt assembly and
//! the completion call.

use thiserror::Error;
use tracing::{info, warn};

use atp_core::traits::Synthesizer;
use atp_core::types::{Answer, CompletionRequest, RouteKind};

use crate::router::{QueryRouter, Routed};

const ASSISTANT: &str = "You are ATPInsight, an assistant for ATP tennis match history.";
const SUMMARY_TOKENS: u32 = 256;
const CONTEXT_TOKENS: u32 = 512;

#[derive(Debug, Error)]
pub enum AskError {
    #[error("invalid access code")]
    Unauthorized,
    #[error("question is empty")]
    EmptyQuestion,
    #[error(transparent)]
    Routing(#[from] anyhow::Error),
    #[error("answer synthesis failed: {0}")]
    Synthesis(String),
}

pub struct AskService<'a> {
    router: QueryRouter<'a>,
    synthesizer: Box<dyn Synthesizer + 'a>,
    access_code: Option<String>,
}

impl<'a> AskService<'a> {
    /// `access_code = None` leaves the service open.
    pub fn new(router: QueryRouter<'a>, synthesizer: Box<dyn Synthesizer + 'a>, access_code: Option<String>) -> Self {
        Self { router, synthesizer, access_code }
    }

    pub fn ask(&self, question: &str, access_code: Option<&str>) -> Result<Answer, AskError> {
        if let Some(expected) = &self.access_code {
            if access_code != Some(expected.as_str()) {
                warn!("rejected question with a wrong access code");
                return Err(AskError::Unauthorized);
            }
        }
        let question = question.trim();
        if question.is_empty() {
            return Err(AskError::EmptyQuestion);
        }
        let routed = self.router.route(question)?;
        let request = build_prompt(&routed, question);
        let answer = self.synthesizer.complete(&request).map_err(|e| AskError::Synthesis(format!("{e:#}")))?;
        info!(kind = ?routed.kind, sources = routed.sources.len(), "answered question");
        Ok(Answer { answer: answer.trim().to_string(), sources: routed.sources })
    }
}

pub fn build_prompt(routed: &Routed, question: &str) -> CompletionRequest {
    match routed.kind {
        RouteKind::Aggregation => CompletionRequest {
            system: format!("{ASSISTANT}\nReply in a single short sentence. No tables, lists or explanations unless asked."),
            user: format!("Data summary: {}\n\nUser question: {question}", routed.context),
            max_tokens: SUMMARY_TOKENS,
        },
        RouteKind::Retrieval => CompletionRequest {
            system: format!(
                "{ASSISTANT}\nAnswer only from the supplied context and be specific.\nIf the context is not enough to answer, say so briefly."
            ),
            user: format!("Context:\n{}\n\nQuestion: {question}", routed.context),
            max_tokens: CONTEXT_TOKENS,
        },
    }
}
