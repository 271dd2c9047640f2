//! Bounded polling with exponential backoff
//!
//! Providers use this to implement [`crate::Provider::wait_until`]. Running
//! out of attempts is a timeout; the caller never retries.

use crate::error::{ProviderError, ProviderResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Backoff settings for terminal-state polling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 40,
            initial_delay_ms: 2_000,
            max_delay_ms: 15_000,
            multiplier: 1.5,
        }
    }
}

impl WaitConfig {
    /// No delay between attempts; for in-memory providers and tests
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay_ms: 0,
            max_delay_ms: 0,
            multiplier: 1.0,
        }
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        let delay = self.initial_delay_ms as f64 * self.multiplier.powi(attempt as i32);
        (delay as u64).min(self.max_delay_ms)
    }
}

/// Poll `probe` until it reports `true`
///
/// A probe error other than not-found aborts the wait immediately. A
/// not-found answer counts as "not there yet", which covers resources that
/// are briefly invisible right after creation.
pub async fn poll_until<F, Fut>(what: &str, config: &WaitConfig, mut probe: F) -> ProviderResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProviderResult<bool>>,
{
    for attempt in 0..config.max_attempts {
        match probe().await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        if attempt + 1 < config.max_attempts {
            let delay_ms = config.delay_for_attempt(attempt);
            debug!(what, attempt, delay_ms, "Waiting");
            sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    Err(ProviderError::timeout(format!(
        "Timed out waiting for {} after {} attempts",
        what, config.max_attempts
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorKind;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_delay_calculation() {
        let config = WaitConfig {
            max_attempts: 5,
            initial_delay_ms: 1000,
            max_delay_ms: 10000,
            multiplier: 2.0,
        };

        assert_eq!(config.delay_for_attempt(0), 1000);
        assert_eq!(config.delay_for_attempt(1), 2000);
        assert_eq!(config.delay_for_attempt(2), 4000);
        assert_eq!(config.delay_for_attempt(3), 8000);
        assert_eq!(config.delay_for_attempt(4), 10000);
    }

    #[tokio::test]
    async fn test_poll_until_succeeds_after_retries() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = poll_until("vpc-1 available", &WaitConfig::immediate(5), move || async move {
            Ok(counter.fetch_add(1, Ordering::SeqCst) >= 2)
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poll_until_times_out() {
        let result = poll_until("i-1 running", &WaitConfig::immediate(3), || async {
            Ok(false)
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_poll_until_tolerates_not_found() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = poll_until("ami-1 available", &WaitConfig::immediate(3), move || async move {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ProviderError::not_found("InvalidAMIID.NotFound"))
            } else {
                Ok(true)
            }
        })
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_poll_until_aborts_on_error() {
        let result = poll_until("ami-1 available", &WaitConfig::immediate(3), || async {
            Err(ProviderError::other("image failed"))
        })
        .await;

        assert_eq!(result.unwrap_err().kind, ProviderErrorKind::Other);
    }
}
