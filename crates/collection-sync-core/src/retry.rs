use collection_sync_config::{RetryBackoff, RetryConfig};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How long to wait after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDelay {
    Fixed(Duration),
    /// `base * 2^(attempt - 1)`, capped at `max`
    Exponential { base: Duration, max: Duration },
}

impl RetryDelay {
    /// Delay after the given (1-based) failed attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match *self {
            RetryDelay::Fixed(delay) => delay,
            RetryDelay::Exponential { base, max } => {
                let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
                base.checked_mul(factor).unwrap_or(max).min(max)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: RetryDelay,
}

/// The operation kept failing, or failed in a way that shouldn't be retried
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(5))
    }
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay: RetryDelay::Fixed(delay),
        }
    }

    pub fn exponential(max_attempts: u32, base: Duration, max: Duration) -> Self {
        Self {
            max_attempts,
            delay: RetryDelay::Exponential { base, max },
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        let delay = Duration::from_secs(config.delay_secs);
        match config.backoff {
            RetryBackoff::Fixed => Self::fixed(config.max_attempts, delay),
            RetryBackoff::Exponential => {
                Self::exponential(config.max_attempts, delay, Duration::from_secs(config.max_delay_secs))
            }
        }
    }

    /// Run `op` until it succeeds, `is_retryable` rejects the error, or attempts run out.
    pub async fn run<T, E, F, Fut, R>(&self, operation: &str, is_retryable: R, mut op: F) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts && is_retryable(&e) => {
                    let delay = self.delay.delay_for(attempt);
                    warn!(
                        operation = operation,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(RetryExhausted {
                        attempts: attempt,
                        last_error: e,
                    })
                }
            }
        }
    }
}
