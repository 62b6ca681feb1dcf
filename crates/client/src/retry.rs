//! Bounded fixed-delay retry for destination deliveries.
//!
//! Each attempt either succeeds, ending the loop, or yields an
//! [`AttemptFailure`]. Transport failures and non-2xx responses are treated
//! the same: both consume one attempt and both wait out the delay before the
//! next try. The wait races the run's cancellation token; a cancellation
//! there ends the loop with [`DeliveryError::Cancelled`].

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use relay_common::config::AppConfig;
use relay_common::error::{AttemptFailure, DeliveryError};

/// Default attempt budget per delivery.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default wait between failed attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Retry policy for a single delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    /// Total attempts, including the first one. Never below 1.
    pub max_attempts: u32,
    /// Fixed wait between a failed attempt and the next one.
    pub retry_delay: Duration,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl DeliveryPolicy {
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.max_attempts, config.retry_delay())
    }
}

/// Run `attempt` until it succeeds or the policy's budget is spent.
///
/// `attempt` receives the 1-based attempt number. Returns the number of the
/// attempt that succeeded.
pub async fn deliver_with_retry<F, Fut>(
    policy: &DeliveryPolicy,
    cancel: &CancellationToken,
    mut attempt: F,
) -> Result<u32, DeliveryError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<(), AttemptFailure>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt_no = 0;

    loop {
        attempt_no += 1;

        let failure = match attempt(attempt_no).await {
            Ok(()) => return Ok(attempt_no),
            Err(failure) => failure,
        };

        tracing::warn!(
            attempt = attempt_no,
            max_attempts,
            reason = %failure,
            "Delivery attempt failed"
        );

        if attempt_no >= max_attempts {
            return Err(DeliveryError::Exhausted {
                attempts: attempt_no,
                last: failure,
            });
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::warn!(attempt = attempt_no, "Cancelled while waiting to retry delivery");
                return Err(DeliveryError::Cancelled { attempts: attempt_no });
            }
            _ = tokio::time::sleep(policy.retry_delay) => {}
        }
    }
}
