//! [`RouteStream`] and related items.
use core::pin::Pin;
use core::task::{Context, Poll, ready};

use futures_util::Stream;
use futures_util::stream::FusedStream;
use pin_project_lite::pin_project;

use crate::{IntoStreamRoute, Route};

pin_project! {
    /// Async version of [`crate::route_iter::RouteIter`].
    ///
    /// Created by [`crate::route`]. Takes an async closure `F(Item) -> Future`, awaits each result, and routes it to
    /// nothing, a single output, or every item of a [`Stream`].
    ///
    /// At most one item is in flight: the next source item is not pulled until the previous item's future has
    /// resolved and all of its routed outputs have been emitted. Dropping this stream drops the source, along with any
    /// pending future or partially drained output stream.
    #[must_use = "streams do nothing unless polled"]
    pub struct RouteStream<St, Func, Fut, Many> {
        #[pin]
        source: Option<St>,
        func: Func,
        // Pending result of `func`.
        #[pin]
        future: Option<Fut>,
        // Remaining outputs of the current `Route::Many`.
        #[pin]
        many: Option<Many>,
    }
}

impl<St, Func, Fut> RouteStream<St, Func, Fut, <Fut::Output as IntoStreamRoute>::Stream>
where
    St: Stream,
    Func: FnMut(St::Item) -> Fut,
    Fut: Future,
    Fut::Output: IntoStreamRoute,
{
    /// Create with async routing function `func` and `source` stream.
    pub fn new(source: St, func: Func) -> Self {
        Self {
            source: Some(source),
            func,
            future: None,
            many: None,
        }
    }
}

impl<St, Func, Fut> Stream for RouteStream<St, Func, Fut, <Fut::Output as IntoStreamRoute>::Stream>
where
    St: Stream,
    Func: FnMut(St::Item) -> Fut,
    Fut: Future,
    Fut::Output: IntoStreamRoute,
{
    type Item = <Fut::Output as IntoStreamRoute>::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(many) = this.many.as_mut().as_pin_mut() {
                if let Some(item) = ready!(many.poll_next(cx)) {
                    return Poll::Ready(Some(item));
                }
                this.many.set(None);
            } else if let Some(future) = this.future.as_mut().as_pin_mut() {
                let out = ready!(future.poll(cx));
                this.future.set(None);
                match out.into_stream_route() {
                    Route::Absent => {}
                    Route::Single(item) => return Poll::Ready(Some(item)),
                    Route::Many(many) => this.many.set(Some(many)),
                }
            } else if let Some(source) = this.source.as_mut().as_pin_mut() {
                if let Some(item) = ready!(source.poll_next(cx)) {
                    this.future.set(Some((this.func)(item)));
                } else {
                    tracing::trace!("Route source exhausted.");
                    this.source.set(None);
                    return Poll::Ready(None);
                }
            } else {
                return Poll::Ready(None);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.many.as_ref().map_or((0, Some(0)), Stream::size_hint);
        if self.source.is_some() || self.future.is_some() {
            (lower, None)
        } else {
            (lower, upper)
        }
    }
}

impl<St, Func, Fut> FusedStream for RouteStream<St, Func, Fut, <Fut::Output as IntoStreamRoute>::Stream>
where
    St: Stream,
    Func: FnMut(St::Item) -> Fut,
    Fut: Future,
    Fut::Output: IntoStreamRoute,
{
    fn is_terminated(&self) -> bool {
        self.source.is_none() && self.future.is_none() && self.many.is_none()
    }
}

#[cfg(test)]
mod tests {
    use core::future::ready;

    use futures_util::stream::{self, StreamExt};

    use super::*;

    #[tokio::test]
    async fn test_route_stream_map() {
        let out = RouteStream::new(stream::iter(0..5), |x| ready(Some(x * 2)))
            .collect::<Vec<_>>()
            .await;
        assert_eq!(vec![0, 2, 4, 6, 8], out);
    }

    #[tokio::test]
    async fn test_route_stream_async_many() {
        let out = RouteStream::new(stream::iter(1..4), |x| async move {
            tokio::task::yield_now().await;
            Route::Many(stream::repeat(x).take(x))
        })
        .collect::<Vec<_>>()
        .await;
        assert_eq!(vec![1, 2, 2, 3, 3, 3], out);
    }

    #[tokio::test]
    async fn test_route_stream_terminated() {
        let mut route = RouteStream::new(stream::iter([1, 2]), |x| ready([x]));
        assert!(!route.is_terminated());
        assert_eq!(Some(1), route.next().await);
        assert_eq!(Some(2), route.next().await);
        assert_eq!(None, route.next().await);
        assert!(route.is_terminated());
        assert_eq!((0, Some(0)), route.size_hint());
        assert_eq!(None, route.next().await);
    }
}
