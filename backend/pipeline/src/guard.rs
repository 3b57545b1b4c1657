use std::future::Future;

use layoutforge_core::{CancelToken, ForgeError};

/// Run `fut` unless the token fires first; the losing future is dropped.
pub(crate) async fn until_cancelled<F>(cancel: &CancelToken, fut: F) -> Result<F::Output, ForgeError>
where
    F: Future,
{
    if cancel.is_cancelled() {
        return Err(ForgeError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ForgeError::Cancelled),
        out = fut => Ok(out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn completes_when_not_cancelled() {
        let token = CancelToken::new();
        assert_eq!(until_cancelled(&token, async { 7 }).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn cancellation_drops_pending_future() {
        let token = CancelToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });
        let result = until_cancelled(&token, futures::future::pending::<()>()).await;
        assert!(matches!(result, Err(ForgeError::Cancelled)));
    }
}
