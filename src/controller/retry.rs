//! Bounded retries for writes that must not be lost.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Attempts made to record the identity of a freshly created instance.
pub const CREATED_STATUS_ATTEMPTS: u32 = 5;

/// Delay between attempts to record a freshly created instance.
pub const CREATED_STATUS_DELAY: Duration = Duration::from_millis(500);

/// Runs `write` until it succeeds or `attempts` tries have failed, sleeping
/// `delay` between tries. The last error is returned.
///
/// # Errors
///
/// Returns the error of the final attempt.
pub async fn retry_write<E, F, Fut>(attempts: u32, delay: Duration, mut write: F) -> Result<(), E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let mut attempt = 1;
    loop {
        match write().await {
            Ok(()) => return Ok(()),
            Err(err) if attempt >= attempts => return Err(err),
            Err(err) => {
                warn!(attempt, attempts, error = %err, "write failed, retrying");
                attempt += 1;
                tokio::time::sleep(delay).await;
            }
        }
    }
}
