use std::time::{Duration, SystemTime};

/// Retries an operation with exponential backoff until a timeout is reached.
/// Errors rejected by `is_transient` are returned immediately.
///
/// # Arguments
/// * `operation` - The async operation to retry
/// * `is_transient` - Decides whether a failed attempt is worth repeating
/// * `base_delay` - Base delay for exponential backoff
/// * `max_delay` - Maximum delay between retries
/// * `timeout` - Total timeout duration after which to stop retrying
pub async fn backoff_retry_with_timeout<T, F, Fut>(
    operation: F,
    is_transient: impl Fn(&anyhow::Error) -> bool,
    base_delay: Duration,
    max_delay: Duration,
    timeout: Duration,
) -> Result<T, anyhow::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, anyhow::Error>>,
{
    let start_time = SystemTime::now();
    let mut current_delay = base_delay;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if !is_transient(&e) => return Err(e),
            Err(e) => {
                let elapsed = start_time.elapsed().unwrap_or_else(|_| {
                    tracing::error!(
                        "backoff_retry_with_timeout: start_time.elapsed() failed, using 0"
                    );
                    Duration::from_secs(0)
                });
                if elapsed.saturating_add(current_delay) >= timeout {
                    return Err(e.context(format!("Operation timed out after {timeout:?}")));
                }
                tracing::warn!("Retrying in {:?} after error: {:#}", current_delay, e);
                tokio::time::sleep(current_delay).await;

                current_delay = std::cmp::min(current_delay.saturating_mul(2), max_delay);
            }
        }
    }
}
