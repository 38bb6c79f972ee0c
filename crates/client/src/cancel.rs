use crate::error::{ApiError, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::watch;

/// Cloneable handle that cancels one or more requests
///
/// Cancelling is sticky: once set, every request watching the handle
/// resolves to [`ApiError::Cancelled`].
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves once the flag is set. Never resolves if every handle is dropped
/// without cancelling.
async fn cancelled(mut rx: watch::Receiver<bool>) {
    let fired = rx.wait_for(|cancelled| *cancelled).await.is_ok();
    if !fired {
        std::future::pending::<()>().await;
    }
}

/// In-flight API call that can be cancelled
///
/// Awaiting yields the response value or an [`ApiError`]. After
/// [`CancelableRequest::cancel`] the inner future is dropped on the next
/// poll, which aborts the network operation, and the request resolves to
/// [`ApiError::Cancelled`].
#[must_use = "requests do nothing unless awaited"]
pub struct CancelableRequest<T> {
    inner: BoxFuture<'static, Result<T>>,
    handle: CancelHandle,
}

impl<T: Send + 'static> CancelableRequest<T> {
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self::with_handle(future, CancelHandle::new())
    }

    /// Wrap `future` so it is cancelled through a caller-supplied handle
    pub fn with_handle<F>(future: F, handle: CancelHandle) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let rx = handle.subscribe();
        let inner = async move {
            tokio::select! {
                biased;
                () = cancelled(rx) => Err(ApiError::Cancelled),
                result = future => result,
            }
        }
        .boxed();

        Self { inner, handle }
    }

    /// Request that completes immediately with `result`
    pub fn ready(result: Result<T>) -> Self {
        Self::new(futures::future::ready(result))
    }

    /// Also cancel this request when `other` is cancelled
    pub fn cancel_with(self, other: &CancelHandle) -> Self {
        let rx = other.subscribe();
        let inner = self.inner;
        let inner = async move {
            tokio::select! {
                biased;
                () = cancelled(rx) => Err(ApiError::Cancelled),
                result = inner => result,
            }
        }
        .boxed();

        Self {
            inner,
            handle: self.handle,
        }
    }
}

impl<T> CancelableRequest<T> {
    /// Handle that cancels this request from elsewhere, e.g. another task
    #[must_use]
    pub fn handle(&self) -> CancelHandle {
        self.handle.clone()
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }
}

impl<T> Future for CancelableRequest<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

impl<T> std::fmt::Debug for CancelableRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelableRequest")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_resolves_with_inner_value() {
        let request = CancelableRequest::new(async { Ok(42) });
        assert_eq!(request.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_cancel_before_poll() {
        let request = CancelableRequest::new(async { Ok(42) });
        request.cancel();
        assert!(request.is_cancelled());
        assert!(request.await.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_mid_flight_drops_inner_future(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let request = CancelableRequest::new(async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

        let handle = request.handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        });

        let result = tokio::time::timeout(Duration::from_secs(5), request).await?;
        assert!(matches!(result, Err(ApiError::Cancelled)));
        assert!(!finished.load(Ordering::SeqCst));

        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_with_external_handle() {
        let external = CancelHandle::new();
        let request = CancelableRequest::new(futures::future::pending::<Result<()>>())
            .cancel_with(&external);

        external.cancel();
        assert!(request.await.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_dropped_handles_do_not_cancel() {
        let request = CancelableRequest::new(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok("done")
        });
        drop(request.handle());
        assert_eq!(request.await.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_ready_error_passes_through() {
        let request: CancelableRequest<()> =
            CancelableRequest::ready(Err(ApiError::MissingParameter("user_id".to_string())));
        assert!(matches!(request.await, Err(ApiError::MissingParameter(_))));
    }
}
