// * Documentation Fetcher
// * Resolves a (platform, section) coordinate to a URL, retrieves it with bounded retries
// * and runs the page through the refinery. Nothing is cached: every call re-fetches.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::knowledge::{KnowledgeBase, KnowledgeError};
use crate::network::{PageSource, RetryPolicy, Sleeper};
use crate::ops::telemetry;
use crate::refinery::extract_document;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error("Failed to retrieve {url} after {attempts} attempts: {last_error}")]
    Exhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Unexpected error while extracting {url}: {reason}")]
    Unexpected { url: String, reason: String },

    #[error("No readable content at {0}")]
    EmptyDocument(String),
}

impl FetchError {
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, FetchError::Knowledge(_))
    }
}

pub struct DocFetcher {
    knowledge: Arc<KnowledgeBase>,
    source: Arc<dyn PageSource>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
}

impl DocFetcher {
    pub fn new(
        knowledge: Arc<KnowledgeBase>,
        source: Arc<dyn PageSource>,
        sleeper: Arc<dyn Sleeper>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            knowledge,
            source,
            sleeper,
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Retrieves and extracts one documentation section.
    ///
    /// Coordinate resolution errors are returned immediately. Transport failures and
    /// non-2xx responses are retried per the policy. Extraction failures are not retried.
    pub async fn fetch(&self, platform: &str, section: &str) -> Result<String, FetchError> {
        let spec = self.knowledge.platform(platform)?;
        let url = spec.section_url(section)?;
        let url = url.as_str();

        info!(platform, section, url, "Scraping documentation");
        let started = Instant::now();

        let source = self.source.as_ref();
        let html = self
            .policy
            .run(self.sleeper.as_ref(), |attempt| async move {
                debug!(url, attempt, "Fetch attempt");
                let result = source.get(url).await;
                if result.is_err() {
                    telemetry::record_fetch_outcome("transient");
                }
                result
            })
            .await
            .map_err(|exhausted| {
                telemetry::record_fetch_outcome("exhausted");
                error!(
                    url,
                    attempts = exhausted.attempts,
                    "Failed to retrieve documentation after {} attempts",
                    self.policy.max_attempts
                );
                FetchError::Exhausted {
                    url: url.to_string(),
                    attempts: exhausted.attempts,
                    last_error: exhausted
                        .last_error
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "no attempts allowed".to_string()),
                }
            })?;

        // * Parsing and conversion are treated as untrusted: a panic becomes an error
        let extracted = catch_unwind(AssertUnwindSafe(|| extract_document(&html, spec)));
        let text = match extracted {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                telemetry::record_fetch_outcome("unexpected");
                error!(url, error = %e, "Unexpected error");
                return Err(FetchError::Unexpected {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                telemetry::record_fetch_outcome("unexpected");
                error!(url, "Extraction panicked");
                return Err(FetchError::Unexpected {
                    url: url.to_string(),
                    reason: "extraction panicked".to_string(),
                });
            }
        };

        telemetry::record_fetch_duration(started.elapsed().as_secs_f64());

        if text.trim().is_empty() {
            telemetry::record_fetch_outcome("empty");
            return Err(FetchError::EmptyDocument(url.to_string()));
        }

        telemetry::record_fetch_outcome("success");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{RecordingSleeper, StaticPageSource};
    use std::time::Duration;

    fn fetcher_with(source: StaticPageSource) -> (DocFetcher, Arc<StaticPageSource>, Arc<RecordingSleeper>) {
        let source = Arc::new(source);
        let sleeper = Arc::new(RecordingSleeper::new());
        let fetcher = DocFetcher::new(
            Arc::new(KnowledgeBase::builtin().unwrap()),
            source.clone(),
            sleeper.clone(),
            RetryPolicy::new(3, Duration::from_secs(2)),
        );
        (fetcher, source, sleeper)
    }

    #[tokio::test]
    async fn test_fetch_extracts_content_region() {
        let (fetcher, source, sleeper) = fetcher_with(StaticPageSource::new().with_page(
            "https://segment.com/docs/privacy/",
            "<html><body><nav>Menu</nav><article><p>GDPR requests are handled here.</p></article></body></html>",
        ));

        let text = fetcher.fetch("segment", "privacy").await.unwrap();

        assert!(text.contains("GDPR requests are handled here."));
        assert!(!text.contains("Menu"));
        assert_eq!(source.calls().len(), 1);
        assert!(sleeper.naps().is_empty());
    }

    #[tokio::test]
    async fn test_exhaustion_after_three_attempts() {
        let (fetcher, source, sleeper) = fetcher_with(StaticPageSource::new());

        let err = fetcher.fetch("lytics", "apis").await.unwrap_err();

        match err {
            FetchError::Exhausted { url, attempts, .. } => {
                assert_eq!(url, "https://docs.lytics.com/developer/apis/");
                assert_eq!(attempts, 3);
            }
            other => panic!("Expected exhaustion, got {:?}", other),
        }
        assert_eq!(source.calls_to("https://docs.lytics.com/developer/apis/"), 3);
        assert_eq!(sleeper.naps(), vec![Duration::from_secs(2); 2]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_retried() {
        let (fetcher, source, sleeper) = fetcher_with(
            StaticPageSource::new().with_status("https://docs.mparticle.com/developers/sdk/", 503),
        );

        let err = fetcher.fetch("mparticle", "sdk").await.unwrap_err();

        assert!(matches!(err, FetchError::Exhausted { ref last_error, .. } if last_error.contains("503")));
        assert_eq!(source.calls().len(), 3);
        assert_eq!(sleeper.naps().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_coordinates_are_not_retried() {
        let (fetcher, source, _) = fetcher_with(StaticPageSource::new());

        let err = fetcher.fetch("hubspot", "crm").await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Knowledge(KnowledgeError::UnknownPlatform(_))
        ));

        let err = fetcher.fetch("segment", "billing").await.unwrap_err();
        assert!(err.is_configuration_error());
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_page_is_reported() {
        let (fetcher, _, _) = fetcher_with(StaticPageSource::new().with_page(
            "https://docs.zeotap.com/home/en-us/data-management/",
            "<html><body>   </body></html>",
        ));

        let err = fetcher.fetch("zeotap", "data").await.unwrap_err();
        assert!(matches!(err, FetchError::EmptyDocument(_)));
        assert!(!err.is_configuration_error());
    }
}
