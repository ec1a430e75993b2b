pub mod answer;
pub mod fetcher;
pub mod search;

pub use answer::{AnswerResponse, AnswerStatus, Answerer};
pub use fetcher::{DocFetcher, FetchError};
pub use search::{extract_keywords, RelevanceSearch, ScoredSection};

use std::sync::Arc;
use thiserror::Error;

use crate::classifier::{KeywordRules, RuleError};
use crate::config::ServiceConfig;
use crate::knowledge::{KnowledgeBase, KnowledgeError};
use crate::network::{HttpPageSource, NetworkError, RetryPolicy, TokioSleeper};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Knowledge base rejected: {0}")]
    Knowledge(#[from] KnowledgeError),

    #[error("Keyword rules rejected: {0}")]
    Rules(#[from] RuleError),

    #[error("HTTP client setup failed: {0}")]
    Network(#[from] NetworkError),
}

/// Wires the built-in knowledge base, validated keyword rules and a live HTTP source.
/// Fails fast if the rules and the knowledge base disagree.
pub fn build_answerer(config: &ServiceConfig) -> Result<Answerer, EngineError> {
    let knowledge = Arc::new(KnowledgeBase::builtin()?);
    let rules = KeywordRules::builtin(&knowledge)?;
    let source = Arc::new(HttpPageSource::new(config.request_timeout)?);

    let fetcher = DocFetcher::new(
        knowledge.clone(),
        source,
        Arc::new(TokioSleeper),
        RetryPolicy::new(config.max_retries, config.retry_delay),
    );

    Ok(Answerer::new(knowledge, rules, fetcher, config.max_results))
}
