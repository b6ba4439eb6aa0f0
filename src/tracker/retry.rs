//! Bounded retry with exponential backoff for tracker calls.

use crate::domain::RetryConfig;
use crate::tracker::TrackerError;
use std::time::Duration;

const MAX_DELAY_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    attempts: usize,
    base_delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(attempts: usize, base_delay_ms: u64) -> Self {
        Self { attempts: attempts.max(1), base_delay_ms }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.attempts, config.base_delay_ms)
    }

    /// Delay before attempt `attempt + 1`, doubling per attempt.
    pub fn delay(&self, attempt: usize) -> Duration {
        let exp = attempt.saturating_sub(1).min(16) as u32;
        let ms = self.base_delay_ms.saturating_mul(1u64 << exp).min(MAX_DELAY_MS);
        Duration::from_millis(ms)
    }

    /// Run `op`, retrying transient failures until attempts are exhausted.
    pub fn run<T, F>(&self, operation: &str, mut op: F) -> Result<T, TrackerError>
    where
        F: FnMut() -> Result<T, TrackerError>,
    {
        let mut attempt = 0usize;
        loop {
            attempt += 1;
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.attempts && err.is_retryable() => {
                    let delay = self.delay(attempt);
                    tracing::warn!(
                        "{operation} failed (attempt {attempt}/{}): {err}; retrying in {}ms",
                        self.attempts,
                        delay.as_millis()
                    );
                    std::thread::sleep(delay);
                }
                Err(err) => return Err(err),
            }
        }
    }
}
