use std::future::Future;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation timed out after {0:?}")]
pub struct TimedOut(pub Duration);

/// Race `operation` against a timer of length `limit`.
///
/// Whichever settles first decides the result; if the timer wins the
/// operation future is dropped and its eventual outcome is never observed.
pub async fn race<F: Future>(operation: F, limit: Duration) -> Result<F::Output, TimedOut> {
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| TimedOut(limit))
}
