// * Query Classifier
// * Maps a free-text question to a (platform, section) coordinate using keyword rules.
// * An explicit platform mention is checked first; otherwise the platform is inferred
// * from the total vocabulary hits across its sections.

pub mod rules;

pub use rules::{KeywordRules, PlatformRules, RuleError, SectionRule};

use serde::Serialize;
use tracing::debug;

use crate::knowledge::KnowledgeBase;

/// Result of classification. `section` is only absent when `platform` is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Coordinate {
    pub platform: Option<String>,
    pub section: Option<String>,
}

impl Coordinate {
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn new(platform: &str, section: &str) -> Self {
        Self {
            platform: Some(platform.to_string()),
            section: Some(section.to_string()),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.platform.is_some()
    }
}

pub struct QueryClassifier<'a> {
    knowledge: &'a KnowledgeBase,
    rules: &'a KeywordRules,
}

impl<'a> QueryClassifier<'a> {
    pub fn new(knowledge: &'a KnowledgeBase, rules: &'a KeywordRules) -> Self {
        Self { knowledge, rules }
    }

    pub fn classify(&self, question: &str) -> Coordinate {
        let question = question.to_lowercase();

        // * Pass 1: explicit mention, in registration order
        for platform in self.knowledge.platform_names() {
            if !question.contains(platform) {
                continue;
            }
            if let Some(section) = self.best_section(platform, &question) {
                debug!(platform, section, "Classified by explicit mention");
                return Coordinate::new(platform, section);
            }
        }

        // * Pass 2: infer the platform from total vocabulary hits
        let mut best: Option<(&str, usize)> = None;
        for platform_rules in self.rules.platforms() {
            let score: usize = platform_rules
                .sections
                .iter()
                .map(|rule| rule.count_matches(&question))
                .sum();
            // * Strict comparison keeps the earliest registered platform on ties
            if best.map_or(true, |(_, max)| score > max) {
                best = Some((platform_rules.platform.as_str(), score));
            }
        }

        let platform = match best {
            Some((platform, score)) if score > 0 => platform,
            _ => {
                debug!("No platform vocabulary in question");
                return Coordinate::unresolved();
            }
        };

        if let Some(section) = self.best_section(platform, &question) {
            debug!(platform, section, "Classified by inference");
            return Coordinate::new(platform, section);
        }

        // * Platform known but no section hit: fall back to the first declared section
        match self
            .knowledge
            .platform(platform)
            .ok()
            .and_then(|spec| spec.first_section())
        {
            Some(section) => Coordinate::new(platform, section),
            None => Coordinate {
                platform: Some(platform.to_string()),
                section: None,
            },
        }
    }

    // * Section with the strictly highest non-zero match count; first maximum wins
    fn best_section(&self, platform: &str, question: &str) -> Option<&'a str> {
        let rules = self.rules.for_platform(platform)?;
        let mut max_score = 0;
        let mut best = None;

        for rule in &rules.sections {
            let score = rule.count_matches(question);
            if score > max_score {
                max_score = score;
                best = Some(rule.section.as_str());
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(question: &str) -> Coordinate {
        let knowledge = KnowledgeBase::builtin().unwrap();
        let rules = KeywordRules::builtin(&knowledge).unwrap();
        QueryClassifier::new(&knowledge, &rules).classify(question)
    }

    #[test]
    fn test_explicit_mention_picks_platform() {
        assert_eq!(
            classify("How do I set up a source in Segment?"),
            Coordinate::new("segment", "sources")
        );
    }

    #[test]
    fn test_inference_without_platform_name() {
        assert_eq!(
            classify("What is GDPR compliance?"),
            Coordinate::new("segment", "privacy")
        );
    }

    #[test]
    fn test_no_vocabulary_is_unresolved() {
        let coordinate = classify("hello there");
        assert_eq!(coordinate, Coordinate::unresolved());
        assert!(!coordinate.is_resolved());
    }

    #[test]
    fn test_first_maximum_wins_within_platform() {
        // * "audience" hits lytics/audiences once, "campaign" hits lytics/campaigns once
        assert_eq!(
            classify("lytics audience campaign"),
            Coordinate::new("lytics", "audiences")
        );
    }

    #[test]
    fn test_mention_without_section_hit_falls_through() {
        // * "zeotap" has no section hit here, so inference decides
        assert_eq!(
            classify("zeotap? campaign journey"),
            Coordinate::new("lytics", "campaigns")
        );
    }

    #[test]
    fn test_inference_ties_prefer_registration_order() {
        // * "audience" scores 1 for mparticle, lytics and zeotap; mparticle registers first
        assert_eq!(classify("audience"), Coordinate::new("mparticle", "audiences"));
    }
}
