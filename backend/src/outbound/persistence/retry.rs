//! Retry policy for transient store failures.
//!
//! Serialization conflicts, dropped connections, and timeouts get up to
//! [`MAX_RETRIES`] further attempts with exponential backoff plus jitter;
//! everything else propagates immediately.

use std::future::Future;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::domain::ports::StoreError;

/// Additional attempts after the first failure.
pub(super) const MAX_RETRIES: u32 = 3;

const BASE_BACKOFF_MS: u64 = 100;
const JITTER_MS: u64 = 100;

fn backoff(retry: u32) -> Duration {
    let jitter = SmallRng::from_entropy().gen_range(0..JITTER_MS);
    Duration::from_millis(2_u64.pow(retry) * BASE_BACKOFF_MS + jitter)
}

/// Run `attempt` until it succeeds, fails non-transiently, or the retry
/// budget is spent. Each call builds a fresh future so per-attempt state
/// (locks, borrows of the session) is re-acquired every time.
pub(super) async fn with_retries<T, F, Fut>(
    operation: &'static str,
    mut attempt: F,
) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Err(error) if error.is_transient() && retries < MAX_RETRIES => {
                retries += 1;
                let delay = backoff(retries);
                tracing::warn!(
                    operation,
                    retry = retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %error,
                    "retrying transient store failure"
                );
                tokio::time::sleep(delay).await;
            }
            other => return other,
        }
    }
}
