use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};

/// Retry `op` at a constant interval until it succeeds or the elapsed-time
/// budget runs out, then propagate the last error.
///
/// The interval never grows; this exists to ride out a server that is still
/// starting up, not to back off a loaded one.
pub async fn with_deadline<T, E, F, Fut>(
    budget: Duration,
    interval: Duration,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if start.elapsed() + interval >= budget {
                    return Err(err);
                }
                sleep(interval).await;
            }
        }
    }
}
