// * Answer composition
// * The single entry point behind the HTTP surface: classify, try the direct section,
// * fall back to the relevance search, and phrase the result.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::classifier::{Coordinate, KeywordRules, QueryClassifier};
use crate::config::constants::SEARCH_SNIPPET_CHARS;
use crate::engine::fetcher::DocFetcher;
use crate::engine::search::{extract_keywords, RelevanceSearch, ScoredSection};
use crate::knowledge::KnowledgeBase;
use crate::ops::telemetry;

pub const EMPTY_QUESTION_ERROR: &str = "No question provided";
pub const BAD_REQUEST_MESSAGE: &str =
    "Please ask a question about CDP platforms like Segment, mParticle, Lytics, or Zeotap.";
pub const SUPPORTED_PLATFORMS_MESSAGE: &str = "I currently support questions about Segment, mParticle, Lytics, and Zeotap. Try asking about sources, destinations, events, user profiles, audiences, APIs, or integrations!";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request. Our engineering team has been notified. Please try again later!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    Success,
    Error,
    Info,
    NotFound,
}

impl AnswerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerStatus::Success => "success",
            AnswerStatus::Error => "error",
            AnswerStatus::Info => "info",
            AnswerStatus::NotFound => "not_found",
        }
    }
}

/// Response body for a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub status: AnswerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnswerResponse {
    fn new(answer: String, status: AnswerStatus) -> Self {
        Self {
            answer,
            status,
            platform: None,
            section: None,
            sections: None,
            platforms: None,
            error: None,
        }
    }

    /// Response for failures whose cause must stay in the logs
    pub fn generic_error() -> Self {
        Self::new(GENERIC_ERROR_MESSAGE.to_string(), AnswerStatus::Error)
    }

    /// Response for a request that carried no usable question
    pub fn bad_request(reason: &str) -> Self {
        let mut response = Self::new(BAD_REQUEST_MESSAGE.to_string(), AnswerStatus::Error);
        response.error = Some(reason.to_string());
        response
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub struct Answerer {
    knowledge: Arc<KnowledgeBase>,
    rules: KeywordRules,
    fetcher: DocFetcher,
    max_results: usize,
}

impl Answerer {
    pub fn new(
        knowledge: Arc<KnowledgeBase>,
        rules: KeywordRules,
        fetcher: DocFetcher,
        max_results: usize,
    ) -> Self {
        Self {
            knowledge,
            rules,
            fetcher,
            max_results,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Platform keys in registration order
    pub fn supported_platforms(&self) -> Vec<String> {
        self.knowledge.platform_names().map(str::to_string).collect()
    }

    pub fn classify(&self, question: &str) -> Coordinate {
        QueryClassifier::new(&self.knowledge, &self.rules).classify(question)
    }

    /// Answers a question: direct section first, relevance search second, not-found last
    pub async fn answer_question(&self, question: &str) -> AnswerResponse {
        let response = self.compose(question).await;
        telemetry::record_answer(response.status.as_str());
        response
    }

    async fn compose(&self, question: &str) -> AnswerResponse {
        if question.trim().is_empty() {
            return AnswerResponse::bad_request(EMPTY_QUESTION_ERROR);
        }

        let keywords = extract_keywords(question);
        let coordinate = self.classify(question);
        info!(
            platform = coordinate.platform.as_deref(),
            section = coordinate.section.as_deref(),
            "Classified question"
        );

        let platform = match coordinate.platform {
            Some(platform) => platform,
            None => {
                let mut response = AnswerResponse::new(
                    SUPPORTED_PLATFORMS_MESSAGE.to_string(),
                    AnswerStatus::Info,
                );
                response.platforms = Some(self.supported_platforms());
                return response;
            }
        };

        let display_name = match self.knowledge.platform(&platform) {
            Ok(spec) => spec.display_name().to_string(),
            Err(e) => {
                error!(error = %e, "Classifier returned an unregistered platform");
                return AnswerResponse::generic_error();
            }
        };

        // * Primary: the classified section
        if let Some(section) = coordinate.section {
            match self.fetcher.fetch(&platform, &section).await {
                Ok(text) => {
                    let mut response = AnswerResponse::new(
                        format!(
                            "From {} documentation on {}:\n\n{}",
                            display_name, section, text
                        ),
                        AnswerStatus::Success,
                    );
                    response.platform = Some(platform);
                    response.section = Some(section);
                    return response;
                }
                Err(e) if e.is_configuration_error() => {
                    error!(platform = %platform, section = %section, error = %e, "Classified section is not in the knowledge base, falling back to search");
                }
                Err(e) => {
                    warn!(platform = %platform, section = %section, error = %e, "Direct fetch failed, falling back to search");
                }
            }
        }

        // * Fallback: sweep every section
        let results = match RelevanceSearch::new(&self.fetcher)
            .search(&platform, &keywords, self.max_results)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                error!(error = %e, "Relevance search failed");
                return AnswerResponse::generic_error();
            }
        };

        if !results.is_empty() {
            let mut response = AnswerResponse::new(
                compose_search_answer(&display_name, &results),
                AnswerStatus::Success,
            );
            response.platform = Some(platform);
            response.sections = Some(results.into_iter().map(|r| r.section).collect());
            return response;
        }

        let mut response = AnswerResponse::new(
            format!(
                "I couldn't find specific information about '{}' in the {} documentation. Please try rephrasing your question or check the official documentation directly.",
                question, platform
            ),
            AnswerStatus::NotFound,
        );
        response.platform = Some(platform);
        response
    }
}

/// Header line followed by a snippet block per ranked section
pub fn compose_search_answer(display_name: &str, results: &[ScoredSection]) -> String {
    let mut answer = format!("Here's what I found in {} documentation:\n\n", display_name);
    for result in results {
        answer.push_str(&format!(
            "--- {} ---\n{}...\n\n",
            result.section.to_uppercase(),
            truncate_chars(&result.content, SEARCH_SNIPPET_CHARS)
        ));
    }
    answer
}
