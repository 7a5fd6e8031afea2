use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::classification::ErrorClassification;
use super::types::AssetIntelError;

/// Ceiling for the 429 back-off ladder.
const RATE_LIMIT_CEILING: Duration = Duration::from_secs(120);
/// Ceiling for network and gateway-timeout back-off.
const TRANSIENT_CEILING_SECS: f64 = 30.0;

impl ErrorClassification {
    /// Pause before re-issuing a platform request that failed with this
    /// classification. `attempt` counts failures so far, starting at 0.
    ///
    /// A 429 from the platform waits 15s and adds 10s per failure. Dropped
    /// connections and gateway timeouts double from 1s with up to a second
    /// of jitter so concurrent chunk downloads do not retry in lockstep.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        if self.error_type == "RateLimitError" {
            let ladder = Duration::from_secs(15 + u64::from(attempt) * 10);
            return ladder.min(RATE_LIMIT_CEILING);
        }
        let doubled = 2.0_f64.powi(attempt.min(16) as i32);
        Duration::from_secs_f64((doubled + rand::random::<f64>()).min(TRANSIENT_CEILING_SECS))
    }
}

/// How persistently export requests, status polls and chunk downloads are
/// re-issued after a transient platform failure.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Re-issues after the first failure; 0 means a single attempt.
    pub max_retries: u32,
    /// Clamp on every pause, whatever the classification asks for.
    pub backoff_cap: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_cap: Duration::from_secs(120),
        }
    }
}

/// Issue a platform call built by `request`, re-issuing it while the failure
/// is transient (429, dropped connection, gateway timeout) and the retry
/// allowance lasts. Credential, permission and argument errors surface on
/// the first failure.
pub async fn with_retry<F, Fut, T>(
    call: &str,
    config: &RetryConfig,
    mut request: F,
) -> Result<T, AssetIntelError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AssetIntelError>>,
{
    let mut failures: u32 = 0;
    loop {
        let err = match request().await {
            Ok(value) => {
                if failures > 0 {
                    debug!(call, failures, "Platform call recovered");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        let class = err.classify();
        if !class.retryable {
            warn!(call, kind = class.error_type, error = %err, "Platform call rejected, not retrying");
            return Err(err);
        }
        if failures >= config.max_retries {
            warn!(call, attempts = failures + 1, kind = class.error_type, "Giving up on platform call");
            return Err(err);
        }

        let pause = class.retry_delay(failures).min(config.backoff_cap);
        failures += 1;
        warn!(
            call,
            retry = failures,
            of = config.max_retries,
            kind = class.error_type,
            pause_ms = pause.as_millis() as u64,
            error = %err,
            "Transient platform failure, backing off"
        );
        tokio::time::sleep(pause).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn instant_retries(max_retries: u32) -> RetryConfig {
        RetryConfig { max_retries, backoff_cap: Duration::ZERO }
    }

    #[test]
    fn test_retry_delay_rate_limit() {
        let class = ErrorClassification { error_type: "RateLimitError", retryable: true };
        assert_eq!(class.retry_delay(0), Duration::from_secs(15));
        assert_eq!(class.retry_delay(1), Duration::from_secs(25));
        assert_eq!(class.retry_delay(20), Duration::from_secs(120)); // capped
    }

    #[test]
    fn test_retry_delay_default_exponential() {
        let class = ErrorClassification { error_type: "NetworkError", retryable: true };
        let d0 = class.retry_delay(0);
        let d1 = class.retry_delay(1);
        assert!(d0.as_secs_f64() >= 1.0 && d0.as_secs_f64() < 2.0);
        assert!(d1.as_secs_f64() >= 2.0 && d1.as_secs_f64() < 3.0);
        assert!(class.retry_delay(10).as_secs_f64() <= 30.0);
    }

    #[tokio::test]
    async fn test_with_retry_succeeds_first_try() {
        let result = with_retry("test", &instant_retries(3), || async {
            Ok::<_, AssetIntelError>(42)
        }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_retry_recovers_from_transient_error() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result = with_retry("test", &instant_retries(3), || {
            let attempts = attempts_clone.clone();
            async move {
                if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(AssetIntelError::Network("reset by peer".into()))
                } else {
                    Ok("chunk")
                }
            }
        }).await;

        assert_eq!(result.unwrap(), "chunk");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retry_non_retryable_fails_immediately() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result = with_retry("test", &instant_retries(3), || {
            let attempts = attempts_clone.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(AssetIntelError::Authentication("bad keys".into()))
            }
        }).await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_retry_exhausts_attempts() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result = with_retry("test", &instant_retries(2), || {
            let attempts = attempts_clone.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(AssetIntelError::Timeout("gateway".into()))
            }
        }).await;

        assert!(matches!(result, Err(AssetIntelError::Timeout(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_retries_issues_a_single_request() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result = with_retry("export_status", &instant_retries(0), || {
            let attempts = attempts_clone.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(AssetIntelError::RateLimit("429".into()))
            }
        }).await;

        assert!(matches!(result, Err(AssetIntelError::RateLimit(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
