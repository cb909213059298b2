use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;

use crate::error::QueryError;

/// Cancellation signal for in-flight queries. Sending `true` cancels.
/// A dropped sender never cancels.
pub type CancelSignal = watch::Receiver<bool>;

pub fn cancel_channel() -> (watch::Sender<bool>, CancelSignal) {
    watch::channel(false)
}

async fn cancelled(signal: Option<CancelSignal>) {
    if let Some(mut rx) = signal {
        if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
            return;
        }
    }
    futures::future::pending::<()>().await
}

/// Run `query` until it settles, `timeout` elapses, or `cancel` fires.
/// The query future is dropped in the latter two cases.
pub async fn bounded<T, F>(
    query: F,
    timeout: Duration,
    cancel: Option<&CancelSignal>,
) -> Result<T, QueryError>
where
    F: Future<Output = Result<T, QueryError>>,
{
    tokio::select! {
        biased;
        _ = cancelled(cancel.cloned()) => Err(QueryError::Cancelled),
        result = tokio::time::timeout(timeout, query) => {
            result.map_err(|_| QueryError::Timeout(timeout))?
        }
    }
}
