// * Relevance Search
// * Fallback when a question cannot be answered from a single section: fetch every
// * section of the platform, count keyword hits and keep the best few.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use crate::config::constants::MIN_KEYWORD_LEN;
use crate::engine::fetcher::DocFetcher;
use crate::knowledge::KnowledgeError;
use crate::ops::telemetry;

// * Word tokens of three or more characters
static PATTERN_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b\w{{{},}}\b", MIN_KEYWORD_LEN)).expect("Invalid keyword regex")
});

const STOP_WORDS: &[&str] = &["how", "what", "when", "where", "why", "the", "and", "for", "with"];

/// One ranked section of a search sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSection {
    pub section: String,
    pub score: usize,
    pub content: String,
}

/// Lower-cased word tokens of the question minus stop words, in question order.
/// Repeated words are kept and count once per repetition.
pub fn extract_keywords(question: &str) -> Vec<String> {
    let lowered = question.to_lowercase();
    PATTERN_KEYWORD
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Compiled whole-word matchers for a keyword list
pub struct KeywordMatcher {
    patterns: Vec<Regex>,
}

impl KeywordMatcher {
    pub fn new(keywords: &[String]) -> Self {
        let patterns = keywords
            .iter()
            .filter_map(|k| {
                let pattern = format!(r"\b{}\b", regex::escape(&k.to_lowercase()));
                match Regex::new(&pattern) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        warn!(keyword = %k, error = %e, "Skipping unusable keyword");
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    /// Sum over keywords of whole-word, case-insensitive occurrences
    pub fn score(&self, content: &str) -> usize {
        let lowered = content.to_lowercase();
        self.patterns
            .iter()
            .map(|re| re.find_iter(&lowered).count())
            .sum()
    }
}

pub fn score_content(content: &str, keywords: &[String]) -> usize {
    KeywordMatcher::new(keywords).score(content)
}

pub struct RelevanceSearch<'a> {
    fetcher: &'a DocFetcher,
}

impl<'a> RelevanceSearch<'a> {
    pub fn new(fetcher: &'a DocFetcher) -> Self {
        Self { fetcher }
    }

    /// Sweeps every section of `platform` in declaration order, one fetch at a time.
    ///
    /// Sections that fail to fetch are skipped, zero scores are dropped, and the rest
    /// are stably sorted by descending score so ties keep declaration order.
    pub async fn search(
        &self,
        platform: &str,
        keywords: &[String],
        max_results: usize,
    ) -> Result<Vec<ScoredSection>, KnowledgeError> {
        let sections: Vec<String> = self
            .fetcher
            .knowledge()
            .section_names(platform)?
            .into_iter()
            .map(str::to_string)
            .collect();

        info!(platform, ?keywords, "Searching across all documentation sections");
        let matcher = KeywordMatcher::new(keywords);
        let mut results = Vec::new();

        for section in sections {
            let content = match self.fetcher.fetch(platform, &section).await {
                Ok(content) => content,
                Err(e) => {
                    debug!(platform, section = %section, error = %e, "Skipping section");
                    continue;
                }
            };

            let score = matcher.score(&content);
            telemetry::record_section_scored();
            debug!(platform, section = %section, score, "Scored section");

            if score > 0 {
                results.push(ScoredSection {
                    section,
                    score,
                    content,
                });
            }
        }

        results.sort_by(|a, b| b.score.cmp(&a.score));
        results.truncate(max_results);
        Ok(results)
    }
}
