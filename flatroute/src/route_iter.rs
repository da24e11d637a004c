//! [`RouteIter`] and related items.
use core::iter::FusedIterator;

use crate::{IntoRoute, Route};

/// Same as [`Iterator::flat_map`], but the function may also route an item to nothing or to a single output.
///
/// Created by [`crate::route_sync`]. Items are pulled from `source` one at a time, and each item's routed outputs
/// are emitted completely before the next item is pulled. The source is dropped as soon as it is exhausted.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct RouteIter<I, Func, Many> {
    source: Option<I>,
    func: Func,
    // Remaining outputs of the current `Route::Many`.
    many: Option<Many>,
}

impl<I, Func, Out> RouteIter<I, Func, Out::IntoIter>
where
    I: Iterator,
    Func: FnMut(I::Item) -> Out,
    Out: IntoRoute,
{
    /// Create with routing function `func` and `source` iterator.
    pub fn new(source: I, func: Func) -> Self {
        Self {
            source: Some(source),
            func,
            many: None,
        }
    }
}

impl<I, Func, Out> Iterator for RouteIter<I, Func, Out::IntoIter>
where
    I: Iterator,
    Func: FnMut(I::Item) -> Out,
    Out: IntoRoute,
{
    type Item = Out::Item;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(many) = self.many.as_mut() {
                if let Some(item) = many.next() {
                    return Some(item);
                }
                self.many = None;
            }

            let source = self.source.as_mut()?;
            let Some(item) = source.next() else {
                tracing::trace!("Route source exhausted.");
                self.source = None;
                return None;
            };
            match (self.func)(item).into_route() {
                Route::Absent => {}
                Route::Single(out) => return Some(out),
                Route::Many(many) => self.many = Some(many),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.many.as_ref().map_or((0, Some(0)), Iterator::size_hint);
        if self.source.is_some() {
            (lower, None)
        } else {
            (lower, upper)
        }
    }
}

impl<I, Func, Out> FusedIterator for RouteIter<I, Func, Out::IntoIter>
where
    I: Iterator,
    Func: FnMut(I::Item) -> Out,
    Out: IntoRoute,
{
}
