use crate::network::errors::NetworkError;
use crate::network::identity::BrowserIdentity;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::time::Duration;

// * Anything that can turn a URL into an HTML body.
// * One call is one attempt; retrying is the caller's job.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, NetworkError>;
}

// * The production PageSource: a plain HTTPS GET with a browser identity.
pub struct HttpPageSource {
    inner: Client,
}

impl HttpPageSource {
    // * Builds the client with the desktop identity and a per-attempt timeout.
    // * The timeout bounds both connecting and reading the body.
    pub fn new(timeout: Duration) -> Result<Self, NetworkError> {
        Self::with_identity(&BrowserIdentity::desktop_chrome(), timeout)
    }

    pub fn with_identity(identity: &BrowserIdentity, timeout: Duration) -> Result<Self, NetworkError> {
        let mut headers = HeaderMap::new();
        identity.apply_to_headers(&mut headers);

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self { inner: client })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    // * Fetches a URL; any non-2xx status is reported as an error.
    async fn get(&self, url: &str) -> Result<String, NetworkError> {
        let resp = self.inner.get(url).send().await?;
        let status = resp.status();

        if !status.is_success() {
            return Err(NetworkError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        tracing::debug!(url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
