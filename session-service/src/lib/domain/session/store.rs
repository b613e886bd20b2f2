use std::future::Future;
use std::time::Duration;

use crate::domain::session::errors::SessionError;

/// Run a store call under `timeout`.
///
/// An elapsed timeout surfaces as `StoreUnavailable` instead of hanging the caller.
pub(crate) async fn bounded<T, F>(
    timeout: Duration,
    operation: &'static str,
    call: F,
) -> Result<T, SessionError>
where
    F: Future<Output = Result<T, SessionError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(
                operation,
                timeout_ms = timeout.as_millis() as u64,
                "Store call timed out"
            );
            Err(SessionError::StoreUnavailable(format!(
                "{} timed out after {:?}",
                operation, timeout
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passes_result_through() {
        let result = bounded(Duration::from_secs(1), "noop", async { Ok::<_, SessionError>(7) }).await;

        assert_eq!(result, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_timeout_is_store_unavailable() {
        let result = bounded(Duration::from_millis(50), "slow", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, SessionError>(())
        })
        .await;

        assert!(matches!(result, Err(SessionError::StoreUnavailable(_))));
    }
}
