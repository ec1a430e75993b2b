// * Keyword rule set
// * Per platform, an ordered list of (section, matcher) pairs checked against the
// * knowledge base at construction so a rule can never point at a missing section.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::knowledge::KnowledgeBase;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuleError {
    #[error("Keyword rules reference unknown platform '{0}'")]
    UnknownPlatform(String),

    #[error("Keyword rule for '{platform}/{section}' has no matching knowledge base section")]
    UnknownSection { platform: String, section: String },

    #[error("Knowledge base section '{platform}/{section}' has no keyword rule")]
    MissingRule { platform: String, section: String },

    #[error("Invalid keyword pattern for '{platform}/{section}': {reason}")]
    InvalidPattern {
        platform: String,
        section: String,
        reason: String,
    },
}

// * Section vocabularies. Alternation order matters: the leftmost alternative wins.
const SEGMENT_RULES: &[(&str, &str)] = &[
    ("sources", r"\b(source|sources|setup|create|implement|install|integration|integrate|sdk|library|connector)\b"),
    ("destinations", r"\b(destination|destinations|connect|integration|send data|export|forward|warehouse)\b"),
    ("tracking", r"\b(track|tracking|event|events|analytics|identify|page|screen|group|alias)\b"),
    ("api", r"\b(api|endpoint|request|authentication|token|key|curl|http|post|get)\b"),
    ("privacy", r"\b(privacy|gdpr|ccpa|consent|opt-out|regulation|compliance|pii|personal data)\b"),
];

const MPARTICLE_RULES: &[(&str, &str)] = &[
    ("profiles", r"\b(profile|profiles|user|customer|attribute|property|traits)\b"),
    ("events", r"\b(event|events|track|tracking|custom event|commerce|transaction|revenue)\b"),
    ("identity", r"\b(identity|id|identification|customer id|device id|email|mpid|login|logout)\b"),
    ("audiences", r"\b(audience|segment|segmentation|targeting|cohort|filter)\b"),
    ("sdk", r"\b(sdk|library|implementation|mobile|web|installation|setup|configure|init)\b"),
];

const LYTICS_RULES: &[(&str, &str)] = &[
    ("apis", r"\b(api|endpoint|request|authentication|token|key|curl|http|post|get)\b"),
    ("integrations", r"\b(integration|connect|connector|source|destination|setup|implement)\b"),
    ("audiences", r"\b(audience|segment|segmentation|targeting|cohort|filter)\b"),
    ("campaigns", r"\b(campaign|journey|flow|message|trigger|activation|personalization)\b"),
    ("security", r"\b(security|privacy|compliance|access|permission|role|user|admin)\b"),
];

const ZEOTAP_RULES: &[(&str, &str)] = &[
    ("data", r"\b(data|collection|source|import|upload|dataset|schema|field)\b"),
    ("identities", r"\b(identity|id|identification|resolution|graph|match|merge|customer)\b"),
    ("audiences", r"\b(audience|segment|segmentation|targeting|cohort|filter|criteria)\b"),
    ("insights", r"\b(insight|analytics|report|dashboard|metric|measure|visualization)\b"),
    ("integrations", r"\b(integration|connect|connector|partner|destination|activation)\b"),
];

/// The vocabulary table shipped with the service
pub fn builtin_rule_table() -> Vec<(&'static str, &'static [(&'static str, &'static str)])> {
    vec![
        ("segment", SEGMENT_RULES),
        ("mparticle", MPARTICLE_RULES),
        ("lytics", LYTICS_RULES),
        ("zeotap", ZEOTAP_RULES),
    ]
}

/// Compiled matcher for one section
#[derive(Debug, Clone)]
pub struct SectionRule {
    pub section: String,
    pub matcher: Regex,
}

impl SectionRule {
    /// Number of non-overlapping matches in `text`
    pub fn count_matches(&self, text: &str) -> usize {
        self.matcher.find_iter(text).count()
    }
}

/// Rules for one platform, in knowledge base section order
#[derive(Debug, Clone)]
pub struct PlatformRules {
    pub platform: String,
    pub sections: Vec<SectionRule>,
}

#[derive(Debug, Clone)]
pub struct KeywordRules {
    platforms: Vec<PlatformRules>,
}

impl KeywordRules {
    pub fn builtin(knowledge: &KnowledgeBase) -> Result<Self, RuleError> {
        Self::from_table(&builtin_rule_table(), knowledge)
    }

    /// Compiles a rule table and validates it in both directions against the knowledge base.
    /// Platforms and sections are re-ordered to follow knowledge base registration order.
    pub fn from_table(
        table: &[(&str, &[(&str, &str)])],
        knowledge: &KnowledgeBase,
    ) -> Result<Self, RuleError> {
        for (platform, sections) in table {
            let spec = knowledge
                .platform(platform)
                .map_err(|_| RuleError::UnknownPlatform(platform.to_string()))?;
            for (section, _) in sections.iter() {
                if !spec.has_section(section) {
                    return Err(RuleError::UnknownSection {
                        platform: platform.to_string(),
                        section: section.to_string(),
                    });
                }
            }
        }

        let mut platforms = Vec::with_capacity(knowledge.platforms().len());
        for spec in knowledge.platforms() {
            let entry = table.iter().find(|(platform, _)| *platform == spec.name());
            let mut sections = Vec::new();

            for section in spec.section_names() {
                let pattern = entry
                    .and_then(|(_, rules)| rules.iter().find(|(name, _)| *name == section))
                    .map(|(_, pattern)| *pattern)
                    .ok_or_else(|| RuleError::MissingRule {
                        platform: spec.name().to_string(),
                        section: section.to_string(),
                    })?;

                let matcher = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| RuleError::InvalidPattern {
                        platform: spec.name().to_string(),
                        section: section.to_string(),
                        reason: e.to_string(),
                    })?;

                sections.push(SectionRule {
                    section: section.to_string(),
                    matcher,
                });
            }

            platforms.push(PlatformRules {
                platform: spec.name().to_string(),
                sections,
            });
        }

        Ok(Self { platforms })
    }

    pub fn platforms(&self) -> &[PlatformRules] {
        &self.platforms
    }

    pub fn for_platform(&self, platform: &str) -> Option<&PlatformRules> {
        self.platforms.iter().find(|p| p.platform == platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::PlatformSpec;

    fn tiny_knowledge() -> KnowledgeBase {
        KnowledgeBase::new(vec![PlatformSpec::new(
            "acme",
            "https://docs.acme.test/",
            &[("billing", "billing/"), ("webhooks", "webhooks/")],
            &["article"],
            &["nav"],
        )
        .unwrap()])
        .unwrap()
    }

    #[test]
    fn test_builtin_rules_cover_builtin_knowledge() {
        let knowledge = KnowledgeBase::builtin().unwrap();
        let rules = KeywordRules::builtin(&knowledge).unwrap();

        assert_eq!(rules.platforms().len(), 4);
        for spec in knowledge.platforms() {
            let platform_rules = rules.for_platform(spec.name()).unwrap();
            let names: Vec<&str> = platform_rules.sections.iter().map(|r| r.section.as_str()).collect();
            let expected: Vec<&str> = spec.section_names().collect();
            assert_eq!(names, expected);
        }
    }

    #[test]
    fn test_rule_for_unknown_section_fails_fast() {
        let table: Vec<(&str, &[(&str, &str)])> = vec![(
            "acme",
            &[
                ("billing", r"\b(invoice)\b"),
                ("webhooks", r"\b(hook)\b"),
                ("refunds", r"\b(refund)\b"),
            ],
        )];
        let err = KeywordRules::from_table(&table, &tiny_knowledge()).unwrap_err();
        assert_eq!(
            err,
            RuleError::UnknownSection {
                platform: "acme".to_string(),
                section: "refunds".to_string()
            }
        );
    }

    #[test]
    fn test_section_without_rule_fails_fast() {
        let table: Vec<(&str, &[(&str, &str)])> = vec![("acme", &[("billing", r"\b(invoice)\b")])];
        let err = KeywordRules::from_table(&table, &tiny_knowledge()).unwrap_err();
        assert!(matches!(err, RuleError::MissingRule { ref section, .. } if section == "webhooks"));
    }

    #[test]
    fn test_unknown_platform_fails_fast() {
        let table: Vec<(&str, &[(&str, &str)])> = vec![("globex", &[("billing", r"\b(invoice)\b")])];
        let err = KeywordRules::from_table(&table, &tiny_knowledge()).unwrap_err();
        assert_eq!(err, RuleError::UnknownPlatform("globex".to_string()));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let table: Vec<(&str, &[(&str, &str)])> = vec![(
            "acme",
            &[("billing", r"\b(invoice"), ("webhooks", r"\b(hook)\b")],
        )];
        let err = KeywordRules::from_table(&table, &tiny_knowledge()).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { .. }));
    }

    #[test]
    fn test_match_counting_is_case_insensitive() {
        let knowledge = KnowledgeBase::builtin().unwrap();
        let rules = KeywordRules::builtin(&knowledge).unwrap();
        let privacy = rules
            .for_platform("segment")
            .unwrap()
            .sections
            .iter()
            .find(|r| r.section == "privacy")
            .unwrap();

        assert_eq!(privacy.count_matches("GDPR and CCPA Compliance"), 3);
        assert_eq!(privacy.count_matches("opt-out of personal data sharing"), 2);
    }
}
