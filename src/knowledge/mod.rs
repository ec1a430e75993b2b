// * Knowledge Base
// * Immutable registry of documentation platforms: where each section lives and
// * which page regions hold readable content.

pub mod catalog;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum KnowledgeError {
    #[error("Unknown platform '{0}'")]
    UnknownPlatform(String),

    #[error("Unknown section '{section}' for platform '{platform}'")]
    UnknownSection { platform: String, section: String },

    #[error("Invalid URL for '{context}': {reason}")]
    InvalidUrl { context: String, reason: String },

    #[error("Duplicate {kind} '{name}'")]
    Duplicate { kind: &'static str, name: String },
}

/// Static description of one documentation site
#[derive(Debug, Clone)]
pub struct PlatformSpec {
    name: String,
    display_name: String,
    base_url: Url,
    sections: Vec<(String, String)>,
    content_selectors: Vec<String>,
    exclude_selectors: Vec<String>,
}

impl PlatformSpec {
    /// Builds a platform and checks that every section resolves to an absolute URL.
    /// A missing trailing slash on the base URL is added so relative joins keep the prefix.
    pub fn new(
        name: &str,
        base_url: &str,
        sections: &[(&str, &str)],
        content_selectors: &[&str],
        exclude_selectors: &[&str],
    ) -> Result<Self, KnowledgeError> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        let base_url = Url::parse(&normalized).map_err(|e| KnowledgeError::InvalidUrl {
            context: name.to_string(),
            reason: e.to_string(),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(KnowledgeError::InvalidUrl {
                context: name.to_string(),
                reason: "base URL cannot be joined".to_string(),
            });
        }

        let mut owned_sections: Vec<(String, String)> = Vec::with_capacity(sections.len());
        for (section, path) in sections {
            if owned_sections.iter().any(|(existing, _)| existing == section) {
                return Err(KnowledgeError::Duplicate {
                    kind: "section",
                    name: format!("{}/{}", name, section),
                });
            }
            base_url.join(path).map_err(|e| KnowledgeError::InvalidUrl {
                context: format!("{}/{}", name, section),
                reason: e.to_string(),
            })?;
            owned_sections.push((section.to_string(), path.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            display_name: capitalize(name),
            base_url,
            sections: owned_sections,
            content_selectors: content_selectors.iter().map(|s| s.to_string()).collect(),
            exclude_selectors: exclude_selectors.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name used in answer text, e.g. "Mparticle"
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn content_selectors(&self) -> &[String] {
        &self.content_selectors
    }

    pub fn exclude_selectors(&self) -> &[String] {
        &self.exclude_selectors
    }

    /// Section names in declaration order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(name, _)| name.as_str())
    }

    pub fn first_section(&self) -> Option<&str> {
        self.sections.first().map(|(name, _)| name.as_str())
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.iter().any(|(name, _)| name == section)
    }

    pub fn section_path(&self, section: &str) -> Result<&str, KnowledgeError> {
        self.sections
            .iter()
            .find(|(name, _)| name == section)
            .map(|(_, path)| path.as_str())
            .ok_or_else(|| KnowledgeError::UnknownSection {
                platform: self.name.clone(),
                section: section.to_string(),
            })
    }

    pub fn section_url(&self, section: &str) -> Result<Url, KnowledgeError> {
        let path = self.section_path(section)?;
        self.base_url
            .join(path)
            .map_err(|e| KnowledgeError::InvalidUrl {
                context: format!("{}/{}", self.name, section),
                reason: e.to_string(),
            })
    }
}

/// Ordered, read-only set of platforms. Registration order matters to the classifier.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    platforms: Vec<PlatformSpec>,
}

impl KnowledgeBase {
    pub fn new(platforms: Vec<PlatformSpec>) -> Result<Self, KnowledgeError> {
        for (idx, platform) in platforms.iter().enumerate() {
            if platforms[..idx].iter().any(|p| p.name == platform.name) {
                return Err(KnowledgeError::Duplicate {
                    kind: "platform",
                    name: platform.name.clone(),
                });
            }
        }
        Ok(Self { platforms })
    }

    /// The four CDP documentation sites this service answers questions about
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::new(catalog::builtin_platforms()?)
    }

    pub fn platforms(&self) -> &[PlatformSpec] {
        &self.platforms
    }

    pub fn platform_names(&self) -> impl Iterator<Item = &str> {
        self.platforms.iter().map(|p| p.name.as_str())
    }

    pub fn platform_exists(&self, name: &str) -> bool {
        self.platforms.iter().any(|p| p.name == name)
    }

    pub fn platform(&self, name: &str) -> Result<&PlatformSpec, KnowledgeError> {
        self.platforms
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| KnowledgeError::UnknownPlatform(name.to_string()))
    }

    pub fn section_path(&self, platform: &str, section: &str) -> Result<&str, KnowledgeError> {
        self.platform(platform)?.section_path(section)
    }

    pub fn section_url(&self, platform: &str, section: &str) -> Result<Url, KnowledgeError> {
        self.platform(platform)?.section_url(section)
    }

    /// (content selectors, exclude selectors)
    pub fn selectors(&self, platform: &str) -> Result<(&[String], &[String]), KnowledgeError> {
        let spec = self.platform(platform)?;
        Ok((spec.content_selectors(), spec.exclude_selectors()))
    }

    pub fn section_names(&self, platform: &str) -> Result<Vec<&str>, KnowledgeError> {
        Ok(self.platform(platform)?.section_names().collect())
    }
}

// * First character upper-cased, the rest lower-cased
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}
