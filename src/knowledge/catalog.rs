// * Built-in platform catalog
// * Registration order is significant: it decides which platform wins classifier ties.

use super::{KnowledgeError, PlatformSpec};

// * Regions stripped from every page before extraction
const COMMON_EXCLUDES: &[&str] = &["nav", "header", "footer", ".sidebar", ".navigation", ".toc"];

pub fn builtin_platforms() -> Result<Vec<PlatformSpec>, KnowledgeError> {
    Ok(vec![
        PlatformSpec::new(
            "segment",
            "https://segment.com/docs/",
            &[
                ("sources", "connections/sources/"),
                ("destinations", "connections/destinations/"),
                ("tracking", "connections/sources/catalog/"),
                ("api", "api/"),
                ("privacy", "privacy/"),
            ],
            &["article", "main", ".documentation-content", ".docs-content", ".markdown-body"],
            COMMON_EXCLUDES,
        )?,
        PlatformSpec::new(
            "mparticle",
            "https://docs.mparticle.com/",
            &[
                ("profiles", "guides/guides/user-profiles/"),
                ("events", "developers/events/"),
                ("identity", "guides/identity/"),
                ("audiences", "guides/platform-guide/audiences/"),
                ("sdk", "developers/sdk/"),
            ],
            &["article", "main", ".content", ".documentation-body", ".docs-content"],
            COMMON_EXCLUDES,
        )?,
        PlatformSpec::new(
            "lytics",
            "https://docs.lytics.com/",
            &[
                ("apis", "developer/apis/"),
                ("integrations", "integrations/"),
                ("audiences", "user-guides/audiences/"),
                ("campaigns", "user-guides/campaigns/"),
                ("security", "admin/security/"),
            ],
            &["article", "main", ".docs-content", ".content-wrapper", ".markdown-section"],
            COMMON_EXCLUDES,
        )?,
        PlatformSpec::new(
            "zeotap",
            "https://docs.zeotap.com/home/en-us/",
            &[
                ("data", "data-management/"),
                ("identities", "identity-management/"),
                ("audiences", "audience-management/"),
                ("insights", "analytics-and-insights/"),
                ("integrations", "integrations/"),
            ],
            &["article", "main", ".markdown-content", ".docs-content", ".content-body"],
            COMMON_EXCLUDES,
        )?,
    ])
}
