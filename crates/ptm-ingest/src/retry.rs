//! Bounded retry with a fixed delay
//!
//! Only transient source failures are retried. A lookup that found nothing returns on
//! the first attempt without sleeping.

use ptm_common::{Protein, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::source::ProteinSource;

/// Retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Pause between attempts, in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// How often and how patiently to retry a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Additional attempts after the first one
    pub max_retries: u32,
    /// Fixed delay between attempts
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            delay_ms: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Run `op` until it succeeds, fails permanently, or the policy is exhausted.
///
/// `operation` names the call in logs.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, operation: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;

    loop {
        debug!(operation, attempt, max_attempts, "Fetch attempt");

        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_attempts => {
                warn!(
                    operation,
                    attempt,
                    max_attempts,
                    delay_ms = policy.delay_ms,
                    error = %e,
                    "Fetch failed, retrying"
                );
                tokio::time::sleep(policy.delay()).await;
                attempt += 1;
            }
            Err(e) => {
                if e.is_transient() {
                    error!(operation, attempts = attempt, error = %e, "Fetch failed, giving up");
                }
                return Err(e);
            }
        }
    }
}

/// Single-protein lookup with retry.
///
/// `NotFound` is returned immediately; transient failures are retried per `policy`.
pub async fn fetch_one_with_retry<S>(source: &S, gene: &str, policy: &RetryPolicy) -> Result<Protein>
where
    S: ProteinSource + ?Sized,
{
    let operation = format!("{} lookup of {}", source.name(), gene);
    retry(policy, &operation, || source.fetch_one(gene)).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use ptm_common::PtmError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(2, Duration::from_millis(250));

        let value = retry(&policy, "flaky", || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(PtmError::transient("connection reset"))
            } else {
                Ok(7)
            }
        })
        .await
        .unwrap();

        assert_eq!(value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry(&RetryPolicy::default(), "broken", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(PtmError::MalformedPage("unexpected body".into()))
        })
        .await;

        assert!(matches!(result, Err(PtmError::MalformedPage(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(RetryPolicy::none().max_attempts(), 1);
    }
}
