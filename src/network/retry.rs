// * Bounded retry with an injectable sleep.
// * Production waits on the tokio clock; tests swap in a Sleeper that only records.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::constants::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS};

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

// * Real waiting via tokio::time
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// All attempts failed. Carries the last error seen (absent when zero attempts were allowed).
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: Option<E>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }

    /// Runs `op` up to `max_attempts` times, sleeping `delay` between attempts
    /// (never after the last one). `op` receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut>(
        &self,
        sleeper: &dyn Sleeper,
        mut op: F,
    ) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut last_error = None;
        let mut attempt = 0;

        while attempt < self.max_attempts {
            attempt += 1;
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(attempt, max_attempts = self.max_attempts, error = %e, "Attempt failed");
                    last_error = Some(e);
                    if attempt < self.max_attempts {
                        info!(
                            "Retrying in {:?}... (Attempt {}/{})",
                            self.delay,
                            attempt + 1,
                            self.max_attempts
                        );
                        sleeper.sleep(self.delay).await;
                    }
                }
            }
        }

        Err(RetryExhausted {
            attempts: attempt,
            last_error,
        })
    }
}
