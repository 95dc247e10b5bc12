//! Bounded waiting
//!
//! Every UI wait in the suite goes through [`until`]: poll an async
//! predicate until it reports true or the deadline passes, then fail with a
//! timeout error naming what was being waited for. Waits never hang and are
//! never retried beyond their bound.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::{E2eError, E2eResult};

/// How long an element may take to appear in the DOM at all.
pub const EXIST_TIMEOUT: Duration = Duration::from_secs(10);

/// How long an element may take to become visible once present.
pub const DISPLAY_TIMEOUT: Duration = Duration::from_secs(5);

/// Bound for custom condition waits (e.g. a toggle flipping after an update).
pub const CONDITION_TIMEOUT: Duration = Duration::from_secs(5);

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Poll `probe` every `poll` until it returns true or `timeout` elapses.
/// Probe errors propagate immediately; expiry fails with a timeout error
/// carrying `what`.
pub async fn until<F, Fut>(
    what: &str,
    timeout: Duration,
    poll: Duration,
    mut probe: F,
) -> E2eResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = E2eResult<bool>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if probe().await? {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(E2eError::Timeout(what.to_string()));
        }
        tokio::time::sleep(poll).await;
    }
}
