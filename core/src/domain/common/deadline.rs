use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::domain::common::entities::app_errors::CoreError;

/// Races `operation` against `duration`.
///
/// Expiry surfaces as [`CoreError::UpstreamTimeout`] and drops the pending
/// future, so the caller never sees a late answer.
pub async fn with_deadline<F, T>(duration: Duration, operation: F) -> Result<T, CoreError>
where
    F: Future<Output = Result<T, CoreError>>,
{
    match timeout(duration, operation).await {
        Ok(result) => result,
        Err(_) => {
            let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(timeout_ms = millis, "Upstream call timed out");
            Err(CoreError::UpstreamTimeout(millis))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_value_before_deadline() {
        let result =
            with_deadline(Duration::from_millis(200), async { Ok::<_, CoreError>(42) }).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_propagates_inner_error() {
        let result: Result<(), CoreError> = with_deadline(Duration::from_millis(200), async {
            Err(CoreError::UpstreamFailure("boom".to_string()))
        })
        .await;
        assert_eq!(result, Err(CoreError::UpstreamFailure("boom".to_string())));
    }

    #[tokio::test]
    async fn test_times_out_slow_operation() {
        let result = with_deadline(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok::<_, CoreError>(())
        })
        .await;
        assert_eq!(result, Err(CoreError::UpstreamTimeout(10)));
    }
}
