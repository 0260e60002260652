use crate::types::{InsightError, Result};
use backoff::backoff::Backoff;
use backoff::exponential::ExponentialBackoff;
use backoff::SystemClock;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Marker the model API puts in the error text when it wants callers to slow down.
pub const RATE_LIMIT_MARKER: &str = "429";

/// Exponential backoff applied only to rate-limit failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(2000),
            multiplier: 2.0,
        }
    }
}

pub fn is_rate_limited(error: &InsightError) -> bool {
    error.to_string().contains(RATE_LIMIT_MARKER)
}

impl RetryPolicy {
    fn backoff(&self) -> ExponentialBackoff<SystemClock> {
        let max_interval = self
            .base_delay
            .mul_f64(self.multiplier.powi(self.max_retries as i32));

        // No jitter: the delays are part of the contract.
        ExponentialBackoff {
            current_interval: self.base_delay,
            initial_interval: self.base_delay,
            randomization_factor: 0.0,
            multiplier: self.multiplier,
            max_interval,
            max_elapsed_time: None,
            ..Default::default()
        }
    }

    /// Delays that will be waited, in order, if every attempt is rate limited.
    pub fn schedule(&self) -> Vec<Duration> {
        let mut backoff = self.backoff();
        (0..self.max_retries)
            .filter_map(|_| backoff.next_backoff())
            .collect()
    }

    /// Runs `operation`, re-invoking it after a growing delay while it fails with a rate limit.
    ///
    /// Any other failure, or a rate limit once the retries are spent, is returned unchanged.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut backoff = self.backoff();
        let mut retries_left = self.max_retries;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if retries_left > 0 && is_rate_limited(&e) => {
                    let delay = backoff.next_backoff().unwrap_or(self.base_delay);
                    retries_left -= 1;
                    warn!(
                        "Rate limited ({}), retrying in {:?} ({} retries left)",
                        e, delay, retries_left
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    debug!("Giving up: {}", e);
                    return Err(e);
                }
            }
        }
    }
}
