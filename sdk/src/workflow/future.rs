//! FanOutFuture - handle to one concurrently running unit of workflow work

use crate::error::{CourierError, Result};
use courier_core::ActivityError;
use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::task::{AbortHandle, JoinError, JoinHandle};

/// A unit of work launched by [`spawn`](crate::workflow::spawn).
///
/// The unit runs on its own tokio task whether or not the future is polled.
/// Dropping the future detaches the unit; only [`abort`](Self::abort) stops it.
pub struct FanOutFuture<T> {
    handle: JoinHandle<Result<T>>,
    label: String,
}

impl<T: Send + 'static> FanOutFuture<T> {
    pub(crate) fn spawn<F>(label: impl Into<String>, future: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
            label: label.into(),
        }
    }
}

impl<T> FanOutFuture<T> {
    /// Label used when reporting a panic or abort
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Cancel this unit. Siblings are unaffected.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Handle that aborts the unit without owning the future
    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }

    /// Whether the unit has finished running
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T> Future for FanOutFuture<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.handle).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) => Poll::Ready(Err(join_error(&this.label, e))),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> std::fmt::Debug for FanOutFuture<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanOutFuture")
            .field("label", &self.label)
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}

/// Map a failed join into the error reported for that unit
pub(crate) fn join_error(label: &str, error: JoinError) -> CourierError {
    if error.is_panic() {
        CourierError::ActivityFailure {
            activity: label.to_string(),
            error: panic_error(error.into_panic()),
        }
    } else {
        CourierError::Cancelled(label.to_string())
    }
}

/// Failure payload for a caught panic
pub(crate) fn panic_error(payload: Box<dyn Any + Send>) -> ActivityError {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    };
    ActivityError::new(message).with_type("PANIC")
}
