// * Offline stand-ins for the web and the clock.
// * Used by the test suites and for running the service against canned pages.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::network::client::PageSource;
use crate::network::errors::NetworkError;
use crate::network::retry::Sleeper;

// * Serves canned bodies by exact URL; unknown URLs fail like a refused connection.
#[derive(Debug, Default)]
pub struct StaticPageSource {
    pages: HashMap<String, String>,
    statuses: HashMap<String, u16>,
    calls: Mutex<Vec<String>>,
}

impl StaticPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    // * Answers `url` with a non-2xx status instead of a body
    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.statuses.insert(url.to_string(), status);
        self
    }

    // * URLs requested so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == url).count()
    }
}

#[async_trait]
impl PageSource for StaticPageSource {
    async fn get(&self, url: &str) -> Result<String, NetworkError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }
        if let Some(status) = self.statuses.get(url) {
            return Err(NetworkError::Status(*status));
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| NetworkError::Connection(format!("connection refused: {}", url)))
    }
}

// * Records requested sleeps and returns immediately
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    naps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn naps(&self) -> Vec<Duration> {
        self.naps.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut naps) = self.naps.lock() {
            naps.push(duration);
        }
    }
}
