//! Retrieval-augmented process analyzer
//!
//! Transforms one [`ProcessRecord`] into an [`AnalysisResult`]: embed
//! the combined text, retrieve the most similar historical cases, ask
//! the language model for improvement opportunities and parse the
//! structured response. Each call is atomic: it either returns a fully
//! shaped result or fails.

mod parse;
mod prompt;

use crate::config::Config;
use crate::error::Result;
use crate::index::CaseIndex;
use crate::llm::{ChatMessage, LlmClient, OpenAiClient};
use crate::record::{AnalysisResult, ProcessRecord};
use parse::parse_opportunities;
use prompt::{build_analysis_prompt, CORRECTIVE_PROMPT, SYSTEM_PERSONA};
use std::path::Path;
use std::sync::Arc;

/// How many historical cases are retrieved as context
pub const RETRIEVAL_K: usize = 4;

/// One question/answer turn of the analyzer's conversation history
#[derive(Debug, Clone)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

/// Retrieval-augmented analyzer for one end-user analysis session.
///
/// Owns its conversation history; construct a fresh instance per
/// end-user request so history never accumulates across unrelated
/// process records. Many instances may share the same on-disk index.
pub struct ProcessAnalyzer {
    index: CaseIndex,
    client: Arc<dyn LlmClient>,
    history: Vec<Exchange>,
}

impl std::fmt::Debug for ProcessAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessAnalyzer")
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

impl ProcessAnalyzer {
    /// Create an analyzer against a pre-built index.
    ///
    /// Fails fast before any network call if the index is missing. A
    /// query-time embedding model differing from the one recorded at
    /// build time silently degrades retrieval, so it is logged loudly.
    pub fn new(index_path: impl AsRef<Path>, client: Arc<dyn LlmClient>) -> Result<Self> {
        let index = CaseIndex::open(index_path)?;

        if let Some(built_with) = index.embedding_model()? {
            if built_with != client.embedding_model() {
                tracing::warn!(
                    index_model = %built_with,
                    query_model = %client.embedding_model(),
                    "embedding model differs from the one the index was built with; \
                     retrieval quality will degrade"
                );
            }
        }

        Ok(Self {
            index,
            client,
            history: Vec::new(),
        })
    }

    /// Create from process-wide configuration (credential resolved once
    /// at startup).
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = OpenAiClient::new(config.llm_service.clone())?;
        Self::new(config.resolved_index_path(), Arc::new(client))
    }

    /// Analyze one process record.
    ///
    /// Resolves once the language-model round trip completes. Upstream
    /// provider errors propagate unmodified; a response that fails the
    /// structural contract gets exactly one corrective follow-up turn
    /// before the whole call fails with zero rows.
    pub async fn analyze(&mut self, record: &ProcessRecord) -> Result<AnalysisResult> {
        let process_text = record.combined_text();

        let query_embedding = self.client.embed(&process_text).await?;
        let cases = self.index.search(&query_embedding, RETRIEVAL_K)?;
        tracing::debug!(retrieved = cases.len(), "context cases retrieved");

        let question = build_analysis_prompt(&process_text, &cases);

        let mut messages = Vec::with_capacity(self.history.len() * 2 + 2);
        messages.push(ChatMessage::system(SYSTEM_PERSONA));
        for exchange in &self.history {
            messages.push(ChatMessage::user(exchange.question.clone()));
            messages.push(ChatMessage::assistant(exchange.answer.clone()));
        }
        messages.push(ChatMessage::user(question.clone()));

        let answer = self.client.chat_completion(messages.clone()).await?;

        let (rows, final_answer) = match parse_opportunities(&answer) {
            Ok(rows) => (rows, answer),
            Err(parse_err) => {
                tracing::debug!(error = %parse_err, "malformed response, issuing corrective turn");
                messages.push(ChatMessage::assistant(answer));
                messages.push(ChatMessage::user(CORRECTIVE_PROMPT));

                let retry_answer = self.client.chat_completion(messages).await?;
                let rows = parse_opportunities(&retry_answer)?;
                (rows, retry_answer)
            }
        };

        self.history.push(Exchange {
            question,
            answer: final_answer,
        });

        Ok(AnalysisResult::new(rows))
    }

    /// Conversation history, one exchange per successful call
    pub fn history(&self) -> &[Exchange] {
        &self.history
    }
}
