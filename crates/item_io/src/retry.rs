//! Bounded retry of fallible work.

use tracing::{debug, warn};

/// The work kept failing after every allowed retry. Holds the last failure.
#[derive(Debug, thiserror::Error)]
#[error("gave up after {attempts} attempts: {source}")]
pub struct RetryExhausted<E>
where
    E: std::error::Error + 'static,
{
    pub attempts: u32,
    #[source]
    pub source: E,
}

/// Run `work` until it succeeds, retrying at most `max_retries` times.
///
/// `work` receives the 1-based attempt number. At most `max_retries + 1`
/// attempts are made; every failure but the last is logged at `warn`.
pub fn perform_with_retry<U, E, F>(max_retries: u32, mut work: F) -> Result<U, RetryExhausted<E>>
where
    E: std::error::Error + 'static,
    F: FnMut(u32) -> Result<U, E>,
{
    let mut attempt = 1;
    loop {
        debug!(attempt, "performing work");
        match work(attempt) {
            Ok(value) => return Ok(value),
            Err(source) if attempt > max_retries => {
                return Err(RetryExhausted {
                    attempts: attempt,
                    source,
                })
            }
            Err(error) => {
                warn!(attempt, %error, "attempt failed, retrying");
                attempt += 1;
            }
        }
    }
}
