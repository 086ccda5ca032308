//! Combinator functions for joining fan-out units
//!
//! Results always come back in the position the caller supplied, whatever
//! order the units finish in. A failing unit never cancels its siblings.
//!
//! # Example
//!
//! ```ignore
//! use courier_sdk::workflow::{join_all, spawn};
//!
//! let greetings = join_all(vec![
//!     spawn("hello", hello_chain()),
//!     spawn("bye", bye_chain()),
//! ]).await?;
//! ```

use crate::error::Result;
use crate::workflow::future::FanOutFuture;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Launch a unit of work concurrently with the caller
pub fn spawn<F, T>(label: impl Into<String>, future: F) -> FanOutFuture<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    FanOutFuture::spawn(label, future)
}

/// Future that waits for every inner future and keeps each outcome.
///
/// Created by [`join`].
pub struct Join<F, T>
where
    F: Future<Output = Result<T>>,
{
    futures: Vec<Option<F>>,
    results: Vec<Option<Result<T>>>,
}

impl<F, T> Unpin for Join<F, T> where F: Future<Output = Result<T>> + Unpin {}

impl<F, T> Join<F, T>
where
    F: Future<Output = Result<T>> + Unpin,
{
    fn new(futures: Vec<F>) -> Self {
        let len = futures.len();
        Self {
            futures: futures.into_iter().map(Some).collect(),
            results: (0..len).map(|_| None).collect(),
        }
    }
}

impl<F, T> Future for Join<F, T>
where
    F: Future<Output = Result<T>> + Unpin,
{
    type Output = Vec<Result<T>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut all_done = true;

        for (slot, result) in this.futures.iter_mut().zip(this.results.iter_mut()) {
            if let Some(future) = slot {
                match Pin::new(future).poll(cx) {
                    Poll::Ready(outcome) => {
                        *result = Some(outcome);
                        *slot = None;
                    }
                    Poll::Pending => all_done = false,
                }
            }
        }

        if all_done {
            Poll::Ready(this.results.iter_mut().filter_map(Option::take).collect())
        } else {
            Poll::Pending
        }
    }
}

/// Wait for all futures, returning each outcome in input order
pub fn join<F, T>(futures: Vec<F>) -> Join<F, T>
where
    F: Future<Output = Result<T>> + Unpin,
{
    Join::new(futures)
}

/// Wait for all futures; the first error in input order wins.
///
/// Every future runs to completion before the error is returned.
pub async fn join_all<F, T>(futures: Vec<F>) -> Result<Vec<T>>
where
    F: Future<Output = Result<T>> + Unpin,
{
    join(futures).await.into_iter().collect()
}

/// Wait for two futures of different types
pub async fn join2<A, B, FA, FB>(a: FA, b: FB) -> (Result<A>, Result<B>)
where
    FA: Future<Output = Result<A>>,
    FB: Future<Output = Result<B>>,
{
    tokio::join!(a, b)
}
