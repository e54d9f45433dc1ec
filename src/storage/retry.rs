//! Bounded retry for operations that lost a race against another writer.

use crate::storage::error::StoreResult;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

pub const MAX_ATTEMPTS: u32 = 5;
const BASE_BACKOFF: Duration = Duration::from_millis(10);

/// Runs `op` until it succeeds, fails permanently, or `MAX_ATTEMPTS` is reached.
///
/// Only errors for which [`StoreError::is_transient`](crate::storage::StoreError::is_transient)
/// holds are retried; each retry waits a little longer than the last.
pub async fn with_retry<T, F, Fut>(operation: &'static str, mut op: F) -> StoreResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = StoreResult<T>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(err) if err.is_transient() && attempt < MAX_ATTEMPTS => {
                warn!(operation, attempt, error = %err, "transient store conflict, retrying");
                tokio::time::sleep(BASE_BACKOFF * attempt).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}
