//! Cooperative cancellation helpers.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::RuntimeError;

/// Races `fut` against `cancel`. An already-cancelled token wins without
/// polling `fut`.
pub(crate) async fn with_cancel<T, Fut>(
    cancel: Option<&CancellationToken>,
    function: &str,
    fut: Fut,
) -> Result<T, RuntimeError>
where
    Fut: Future<Output = Result<T, RuntimeError>>,
{
    match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(RuntimeError::cancelled(function)),
                result = fut => result,
            }
        }
        None => fut.await,
    }
}

/// Fails with [`RuntimeError::Cancelled`] once `token` has fired.
pub(crate) fn ensure_active(token: &CancellationToken, function: &str) -> Result<(), RuntimeError> {
    if token.is_cancelled() {
        return Err(RuntimeError::cancelled(function));
    }
    Ok(())
}
