//! [`Route`], the classification of a routing function's result, and the conversion traits
//! [`IntoRoute`] and [`IntoStreamRoute`].

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use futures_util::stream::{self, Stream, StreamExt};

/// What a single input item is routed to.
///
/// A routing function's result is classified into exactly one of three shapes:
/// * [`Route::Absent`]: the input produces no output (filtering, or buffering inside stateful functions).
/// * [`Route::Single`]: the input produces exactly one output.
/// * [`Route::Many`]: the input produces every element of `M`, in order.
///
/// Flattening is one level only: the elements of a `Many` sequence are emitted as-is, even if they
/// are themselves sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route<R, M> {
    /// No output for this input item.
    Absent,
    /// Exactly one output item.
    Single(R),
    /// A sequence of output items, emitted in order.
    Many(M),
}

impl<R, M> Route<R, M> {
    /// Returns `true` if this is [`Route::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Maps the [`Route::Single`] output, leaving other shapes unchanged.
    pub fn map_single<R2>(self, func: impl FnOnce(R) -> R2) -> Route<R2, M> {
        match self {
            Self::Absent => Route::Absent,
            Self::Single(item) => Route::Single(func(item)),
            Self::Many(many) => Route::Many(many),
        }
    }

    /// Maps the [`Route::Many`] sequence, leaving other shapes unchanged.
    pub fn map_many<M2>(self, func: impl FnOnce(M) -> M2) -> Route<R, M2> {
        match self {
            Self::Absent => Route::Absent,
            Self::Single(item) => Route::Single(item),
            Self::Many(many) => Route::Many(func(many)),
        }
    }
}

impl<R, Iter> Route<R, stream::Iter<Iter>>
where
    Iter: Iterator<Item = R>,
{
    /// Lifts a synchronous sequence into a [`Route::Many`] usable by async routing functions.
    pub fn many_iter(iter: impl IntoIterator<IntoIter = Iter>) -> Self {
        Self::Many(stream::iter(iter))
    }
}

impl<R, M> From<Option<R>> for Route<R, M> {
    fn from(value: Option<R>) -> Self {
        value.map_or(Self::Absent, Self::Single)
    }
}

/// Conversion of a synchronous routing function's result into a [`Route`] over an [`Iterator`].
pub trait IntoRoute {
    /// Output item type.
    type Item;
    /// Iterator type for [`Route::Many`].
    type IntoIter: Iterator<Item = Self::Item>;

    /// Classifies `self`.
    fn into_route(self) -> Route<Self::Item, Self::IntoIter>;
}

impl<R, M> IntoRoute for Route<R, M>
where
    M: IntoIterator<Item = R>,
{
    type Item = R;
    type IntoIter = M::IntoIter;

    fn into_route(self) -> Route<R, M::IntoIter> {
        self.map_many(IntoIterator::into_iter)
    }
}

/// `None` is [`Route::Absent`], `Some` is [`Route::Single`].
impl<R> IntoRoute for Option<R> {
    type Item = R;
    type IntoIter = core::iter::Empty<R>;

    fn into_route(self) -> Route<R, Self::IntoIter> {
        self.into()
    }
}

#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
impl<R> IntoRoute for Vec<R> {
    type Item = R;
    type IntoIter = alloc::vec::IntoIter<R>;

    fn into_route(self) -> Route<R, Self::IntoIter> {
        Route::Many(self.into_iter())
    }
}

impl<R, const N: usize> IntoRoute for [R; N] {
    type Item = R;
    type IntoIter = core::array::IntoIter<R, N>;

    fn into_route(self) -> Route<R, Self::IntoIter> {
        Route::Many(self.into_iter())
    }
}

/// `Err` is routed as a single `Err` item, `Ok` is classified as `O` with its items wrapped in `Ok`.
///
/// Used by [`crate::try_route_sync`] to stop at the first error.
impl<O, E> IntoRoute for Result<O, E>
where
    O: IntoRoute,
{
    type Item = Result<O::Item, E>;
    type IntoIter = core::iter::Map<O::IntoIter, fn(O::Item) -> Result<O::Item, E>>;

    fn into_route(self) -> Route<Self::Item, Self::IntoIter> {
        match self {
            Ok(out) => out
                .into_route()
                .map_single(Ok)
                .map_many(|many| Iterator::map(many, Ok as fn(O::Item) -> Result<O::Item, E>)),
            Err(error) => Route::Single(Err(error)),
        }
    }
}

/// Conversion of an async routing function's (resolved) result into a [`Route`] over a [`Stream`].
pub trait IntoStreamRoute {
    /// Output item type.
    type Item;
    /// Stream type for [`Route::Many`].
    type Stream: Stream<Item = Self::Item>;

    /// Classifies `self`.
    fn into_stream_route(self) -> Route<Self::Item, Self::Stream>;
}

/// Synchronous sequences can be used via [`Route::many_iter`].
impl<R, St> IntoStreamRoute for Route<R, St>
where
    St: Stream<Item = R>,
{
    type Item = R;
    type Stream = St;

    fn into_stream_route(self) -> Route<R, St> {
        self
    }
}

impl<R> IntoStreamRoute for Option<R> {
    type Item = R;
    type Stream = stream::Empty<R>;

    fn into_stream_route(self) -> Route<R, Self::Stream> {
        self.into()
    }
}

#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
impl<R> IntoStreamRoute for Vec<R> {
    type Item = R;
    type Stream = stream::Iter<alloc::vec::IntoIter<R>>;

    fn into_stream_route(self) -> Route<R, Self::Stream> {
        Route::many_iter(self)
    }
}

impl<R, const N: usize> IntoStreamRoute for [R; N] {
    type Item = R;
    type Stream = stream::Iter<core::array::IntoIter<R, N>>;

    fn into_stream_route(self) -> Route<R, Self::Stream> {
        Route::many_iter(self)
    }
}

/// Same as the [`IntoRoute`] impl for [`Result`], used by [`crate::try_route`].
impl<O, E> IntoStreamRoute for Result<O, E>
where
    O: IntoStreamRoute,
{
    type Item = Result<O::Item, E>;
    type Stream = stream::Map<O::Stream, fn(O::Item) -> Result<O::Item, E>>;

    fn into_stream_route(self) -> Route<Self::Item, Self::Stream> {
        match self {
            Ok(out) => out
                .into_stream_route()
                .map_single(Ok)
                .map_many(|many| StreamExt::map(many, Ok as fn(O::Item) -> Result<O::Item, E>)),
            Err(error) => Route::Single(Err(error)),
        }
    }
}
