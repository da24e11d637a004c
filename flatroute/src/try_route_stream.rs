//! [`TryRouteStream`] and related items.
use core::pin::Pin;
use core::task::{Context, Poll, ready};

use futures_util::Stream;
use futures_util::stream::FusedStream;
use pin_project_lite::pin_project;

use crate::{IntoStreamRoute, Route};

pin_project! {
    #[project = TryRouteStreamProj]
    /// Fallible version of [`crate::route_stream::RouteStream`].
    ///
    /// Created by [`crate::try_route`]. The first `Err`, whether pulled from the source, resolved from the routing
    /// function's future, or yielded from within a [`Route::Many`] stream, is emitted unchanged and terminates the
    /// stream. Everything still held (source, pending future, output stream) is dropped at that point.
    #[must_use = "streams do nothing unless polled"]
    pub struct TryRouteStream<St, Func, Fut, Many> {
        #[pin]
        source: Option<St>,
        func: Func,
        #[pin]
        future: Option<Fut>,
        #[pin]
        many: Option<Many>,
    }
}

impl<St, Func, Fut, Many> TryRouteStreamProj<'_, St, Func, Fut, Many> {
    fn terminate<R, E>(&mut self, error: E) -> Poll<Option<Result<R, E>>> {
        self.source.set(None);
        self.future.set(None);
        self.many.set(None);
        Poll::Ready(Some(Err(error)))
    }
}

impl<St, Func, Fut, T, E, R> TryRouteStream<St, Func, Fut, <Fut::Output as IntoStreamRoute>::Stream>
where
    St: Stream<Item = Result<T, E>>,
    Func: FnMut(T) -> Fut,
    Fut: Future,
    Fut::Output: IntoStreamRoute<Item = Result<R, E>>,
{
    /// Create with async routing function `func` and fallible `source` stream.
    pub fn new(source: St, func: Func) -> Self {
        Self {
            source: Some(source),
            func,
            future: None,
            many: None,
        }
    }
}

impl<St, Func, Fut, T, E, R> Stream
    for TryRouteStream<St, Func, Fut, <Fut::Output as IntoStreamRoute>::Stream>
where
    St: Stream<Item = Result<T, E>>,
    Func: FnMut(T) -> Fut,
    Fut: Future,
    Fut::Output: IntoStreamRoute<Item = Result<R, E>>,
{
    type Item = Result<R, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(many) = this.many.as_mut().as_pin_mut() {
                match ready!(many.poll_next(cx)) {
                    Some(Ok(item)) => return Poll::Ready(Some(Ok(item))),
                    Some(Err(error)) => return this.terminate(error),
                    None => this.many.set(None),
                }
            } else if let Some(future) = this.future.as_mut().as_pin_mut() {
                let out = ready!(future.poll(cx));
                this.future.set(None);
                match out.into_stream_route() {
                    Route::Absent => {}
                    Route::Single(Ok(item)) => return Poll::Ready(Some(Ok(item))),
                    Route::Single(Err(error)) => return this.terminate(error),
                    Route::Many(many) => this.many.set(Some(many)),
                }
            } else if let Some(source) = this.source.as_mut().as_pin_mut() {
                match ready!(source.poll_next(cx)) {
                    Some(Ok(item)) => this.future.set(Some((this.func)(item))),
                    Some(Err(error)) => return this.terminate(error),
                    None => {
                        tracing::trace!("Route source exhausted.");
                        this.source.set(None);
                        return Poll::Ready(None);
                    }
                }
            } else {
                return Poll::Ready(None);
            }
        }
    }
}

impl<St, Func, Fut, T, E, R> FusedStream
    for TryRouteStream<St, Func, Fut, <Fut::Output as IntoStreamRoute>::Stream>
where
    St: Stream<Item = Result<T, E>>,
    Func: FnMut(T) -> Fut,
    Fut: Future,
    Fut::Output: IntoStreamRoute<Item = Result<R, E>>,
{
    fn is_terminated(&self) -> bool {
        self.source.is_none() && self.future.is_none() && self.many.is_none()
    }
}

#[cfg(test)]
mod tests {
    use core::future::ready;
    use core::pin::pin;

    use futures_util::stream::{self, StreamExt};

    use super::*;

    #[cfg(feature = "alloc")]
    #[tokio::test]
    async fn test_try_route_stream_ok() {
        let out = TryRouteStream::new(stream::iter(0..3).map(Ok::<_, &str>), |x| {
            ready(Ok(vec![x; x]))
        })
        .collect::<Vec<_>>()
        .await;
        assert_eq!(vec![Ok(1), Ok(2), Ok(2)], out);
    }

    #[tokio::test]
    async fn test_try_route_stream_future_error() {
        let mut route = pin!(TryRouteStream::new(stream::iter(0..5).map(Ok), |x| async move {
            if 1 == x { Err("one") } else { Ok(Some(x)) }
        }));
        assert_eq!(Some(Ok(0)), route.next().await);
        assert_eq!(Some(Err("one")), route.next().await);
        assert!(route.is_terminated());
        assert_eq!(None, route.next().await);
    }

    #[tokio::test]
    async fn test_try_route_stream_source_error() {
        let source = stream::iter([Ok(0), Err("bad source"), Ok(2)]);
        let out = TryRouteStream::new(source, |x| ready(Ok(Some(x))))
            .collect::<Vec<_>>()
            .await;
        assert_eq!(vec![Ok(0), Err("bad source")], out);
    }

    #[tokio::test]
    async fn test_try_route_stream_many_error() {
        let out = TryRouteStream::new(stream::iter([0]).map(Ok), |x| {
            ready(Route::many_iter([Ok(x), Err("inner"), Ok(x + 1)]))
        })
        .collect::<Vec<_>>()
        .await;
        assert_eq!(vec![Ok(0), Err("inner")], out);
    }
}
