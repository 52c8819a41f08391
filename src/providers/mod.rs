/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the inference backends:
 * - Hugging Face: hosted inference for the registry's pretrained model ids
 * - Ollama: Local LLM server
 * - Anthropic: Anthropic API integration
 * - Mock: deterministic provider for tests
 */

use async_trait::async_trait;
use log::warn;
use parking_lot::Mutex;
use std::fmt::Debug;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::errors::ProviderError;

/// Common trait for all providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    ///
    /// # Arguments
    /// * `response` - The response from the provider
    ///
    /// # Returns
    /// * `String` - The extracted text
    fn extract_text(response: &Self::Response) -> String;
}

/// Retry policy shared by the HTTP providers
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Base backoff in milliseconds, doubled on each retry
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self { max_retries, backoff_base_ms }
    }

    /// No retries at all
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    /// Backoff before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.backoff_base_ms.saturating_mul(factor))
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or the retries are exhausted
    pub async fn run<T, F, Fut>(&self, provider_name: &str, mut operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.backoff(attempt);
                    warn!(
                        "{} request failed ({}), retrying in {:?} (attempt {}/{})",
                        provider_name, e, delay, attempt, self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 1000)
    }
}

/// Client-side spacing of requests to stay under a requests-per-minute limit
#[derive(Debug, Default)]
pub struct RateLimiter {
    /// Minimum interval between two requests
    min_interval: Option<Duration>,
    /// When the last request was let through
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter; `None` or `Some(0)` disables limiting
    pub fn new(requests_per_minute: Option<u32>) -> Self {
        let min_interval = requests_per_minute
            .filter(|rpm| *rpm > 0)
            .map(|rpm| Duration::from_millis(60_000 / rpm as u64));
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Time to wait before the next request may be sent, reserving the slot
    pub fn reserve(&self) -> Duration {
        let Some(min_interval) = self.min_interval else {
            return Duration::ZERO;
        };

        let now = Instant::now();
        let mut last = self.last_request.lock();
        let wait = match *last {
            Some(previous) => (previous + min_interval).saturating_duration_since(now),
            None => Duration::ZERO,
        };
        *last = Some(now + wait);
        wait
    }

    /// Wait until the next request may be sent
    pub async fn acquire(&self) {
        let wait = self.reserve();
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}

/// Read an error body and map it onto a provider error
pub(crate) async fn error_from_response(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    ProviderError::from_status(status, body)
}

pub mod anthropic;
pub mod huggingface;
pub mod mock;
pub mod ollama;
