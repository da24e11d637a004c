#![doc = include_str!("../README.md")]
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

use futures_util::Stream;
use futures_util::stream;

pub mod route;
pub mod route_iter;
pub mod route_stream;
pub mod try_route_iter;
pub mod try_route_stream;

#[cfg(feature = "dynamic")]
#[cfg_attr(docsrs, doc(cfg(feature = "dynamic")))]
pub mod dynamic;

pub use route::{IntoRoute, IntoStreamRoute, Route};
use route_iter::RouteIter;
use route_stream::RouteStream;
use try_route_iter::TryRouteIter;
use try_route_stream::TryRouteStream;

/// Routes each item of a synchronous `source` through `func`, lazily emitting zero, one, or many outputs per item.
///
/// `func`'s result is classified via [`IntoRoute`]: `None` / [`Route::Absent`] emits nothing, `Some` /
/// [`Route::Single`] emits one item, and sequences ([`Route::Many`], [`Vec`], arrays) emit each of their elements in
/// order. Flattening is one level only.
///
/// `func` is called exactly once per source item, in source order, and only after the previous item's outputs have all
/// been emitted.
pub fn route_sync<I, Func, Out>(source: I, func: Func) -> RouteIter<I::IntoIter, Func, Out::IntoIter>
where
    I: IntoIterator,
    Func: FnMut(I::Item) -> Out,
    Out: IntoRoute,
{
    RouteIter::new(source.into_iter(), func)
}

/// Fallible [`route_sync`]: routes the `Ok` items of `source`, stopping at the first `Err`.
///
/// An `Err` pulled from `source`, returned by `func`, or yielded within a [`Route::Many`] is emitted unchanged and ends
/// the iterator.
pub fn try_route_sync<I, Func, Out, T, E, R>(
    source: I,
    func: Func,
) -> TryRouteIter<I::IntoIter, Func, Out::IntoIter>
where
    I: IntoIterator<Item = Result<T, E>>,
    Func: FnMut(T) -> Out,
    Out: IntoRoute<Item = Result<R, E>>,
{
    TryRouteIter::new(source.into_iter(), func)
}

/// Routes each item of an async `source` stream through the async function `func`, emitting zero, one, or many
/// outputs per item.
///
/// Each future returned by `func` is awaited, then its output is classified via [`IntoStreamRoute`], the same as
/// [`route_sync`] but with [`Stream`]s as the [`Route::Many`] sequences. Use [`route_iter`] for synchronous sources.
///
/// Strictly sequential: the next source item is not pulled until the previous item's future has resolved and all of
/// its outputs have been emitted.
pub fn route<St, Func, Fut>(
    source: St,
    func: Func,
) -> RouteStream<St, Func, Fut, <Fut::Output as IntoStreamRoute>::Stream>
where
    St: Stream,
    Func: FnMut(St::Item) -> Fut,
    Fut: Future,
    Fut::Output: IntoStreamRoute,
{
    RouteStream::new(source, func)
}

/// [`route`] over a synchronous `source`.
pub fn route_iter<I, Func, Fut>(
    source: I,
    func: Func,
) -> RouteStream<stream::Iter<I::IntoIter>, Func, Fut, <Fut::Output as IntoStreamRoute>::Stream>
where
    I: IntoIterator,
    Func: FnMut(I::Item) -> Fut,
    Fut: Future,
    Fut::Output: IntoStreamRoute,
{
    RouteStream::new(stream::iter(source), func)
}

/// Fallible [`route`]: routes the `Ok` items of `source`, stopping at the first `Err`.
///
/// An `Err` pulled from `source`, resolved from `func`'s future, or yielded within a [`Route::Many`] stream is emitted
/// unchanged and ends the stream.
pub fn try_route<St, Func, Fut, T, E, R>(
    source: St,
    func: Func,
) -> TryRouteStream<St, Func, Fut, <Fut::Output as IntoStreamRoute>::Stream>
where
    St: Stream<Item = Result<T, E>>,
    Func: FnMut(T) -> Fut,
    Fut: Future,
    Fut::Output: IntoStreamRoute<Item = Result<R, E>>,
{
    TryRouteStream::new(source, func)
}

/// Blanket extension trait for routing the items of an [`Iterator`].
pub trait RouteIterExt: Iterator {
    /// See [`route_sync`].
    fn route_sync<Func, Out>(self, func: Func) -> RouteIter<Self, Func, Out::IntoIter>
    where
        Self: Sized,
        Func: FnMut(Self::Item) -> Out,
        Out: IntoRoute,
    {
        RouteIter::new(self, func)
    }

    /// See [`try_route_sync`].
    fn try_route_sync<Func, Out, T, E, R>(self, func: Func) -> TryRouteIter<Self, Func, Out::IntoIter>
    where
        Self: Sized + Iterator<Item = Result<T, E>>,
        Func: FnMut(T) -> Out,
        Out: IntoRoute<Item = Result<R, E>>,
    {
        TryRouteIter::new(self, func)
    }
}
impl<I> RouteIterExt for I where I: Iterator {}

/// Blanket extension trait for routing the items of a [`Stream`].
pub trait RouteStreamExt: Stream {
    /// See [`route`].
    fn route<Func, Fut>(
        self,
        func: Func,
    ) -> RouteStream<Self, Func, Fut, <Fut::Output as IntoStreamRoute>::Stream>
    where
        Self: Sized,
        Func: FnMut(Self::Item) -> Fut,
        Fut: Future,
        Fut::Output: IntoStreamRoute,
    {
        RouteStream::new(self, func)
    }

    /// See [`try_route`].
    fn try_route<Func, Fut, T, E, R>(
        self,
        func: Func,
    ) -> TryRouteStream<Self, Func, Fut, <Fut::Output as IntoStreamRoute>::Stream>
    where
        Self: Sized + Stream<Item = Result<T, E>>,
        Func: FnMut(T) -> Fut,
        Fut: Future,
        Fut::Output: IntoStreamRoute<Item = Result<R, E>>,
    {
        TryRouteStream::new(self, func)
    }
}
impl<St> RouteStreamExt for St where St: Stream {}
