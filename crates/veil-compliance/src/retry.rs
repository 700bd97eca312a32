//! Backoff for risk-provider requests.
//!
//! Only transient transport failures are retried: the connection could not
//! be established or the request timed out. Anything else reqwest reports
//! (a request that could not be built, a redirect loop, a body error) would
//! fail the same way again and is returned on the first attempt. HTTP
//! status codes are the caller's concern.

use std::future::Future;
use std::time::Duration;

/// How often and how patiently to retry a provider request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry. Doubles for each retry after it.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    /// Three retries at 200ms, 400ms and 800ms.
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    fn delay_before(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << retry.min(16))
    }
}

/// Whether a request error is worth another attempt.
pub(crate) fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

/// Run `send` until it yields a response, a non-transient error, or the
/// policy's retries are spent.
pub(crate) async fn retry_send<F, Fut>(
    policy: RetryPolicy,
    send: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut retry = 0;
    loop {
        let err = match send().await {
            Ok(resp) => return Ok(resp),
            Err(err) => err,
        };
        if !is_transient(&err) || retry >= policy.max_retries {
            return Err(err);
        }

        let delay = policy.delay_before(retry);
        retry += 1;
        tracing::warn!(
            retry,
            max_retries = policy.max_retries,
            ?delay,
            error = %err,
            "risk provider unreachable, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}
