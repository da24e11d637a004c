//! [`TryRouteIter`] and related items.
use core::iter::FusedIterator;

use crate::{IntoRoute, Route};

/// Fallible version of [`crate::route_iter::RouteIter`].
///
/// Created by [`crate::try_route_sync`]. The source yields `Result<T, E>` and the routing function's outputs are
/// `Result<R, E>`. The first `Err`, whether pulled from the source, returned by the function, or yielded from
/// within a [`Route::Many`], is emitted unchanged and ends the iterator.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct TryRouteIter<I, Func, Many> {
    source: Option<I>,
    func: Func,
    many: Option<Many>,
}

impl<I, Func, Out, T, E, R> TryRouteIter<I, Func, Out::IntoIter>
where
    I: Iterator<Item = Result<T, E>>,
    Func: FnMut(T) -> Out,
    Out: IntoRoute<Item = Result<R, E>>,
{
    /// Create with routing function `func` and fallible `source` iterator.
    pub fn new(source: I, func: Func) -> Self {
        Self {
            source: Some(source),
            func,
            many: None,
        }
    }

    fn terminate(&mut self, error: E) -> Option<Result<R, E>> {
        self.source = None;
        self.many = None;
        Some(Err(error))
    }
}

impl<I, Func, Out, T, E, R> Iterator for TryRouteIter<I, Func, Out::IntoIter>
where
    I: Iterator<Item = Result<T, E>>,
    Func: FnMut(T) -> Out,
    Out: IntoRoute<Item = Result<R, E>>,
{
    type Item = Result<R, E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(many) = self.many.as_mut() {
                match many.next() {
                    Some(Ok(item)) => return Some(Ok(item)),
                    Some(Err(error)) => return self.terminate(error),
                    None => self.many = None,
                }
            }

            let item = match self.source.as_mut()?.next() {
                Some(Ok(item)) => item,
                Some(Err(error)) => return self.terminate(error),
                None => {
                    tracing::trace!("Route source exhausted.");
                    self.source = None;
                    return None;
                }
            };
            match (self.func)(item).into_route() {
                Route::Absent => {}
                Route::Single(Ok(out)) => return Some(Ok(out)),
                Route::Single(Err(error)) => return self.terminate(error),
                Route::Many(many) => self.many = Some(many),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let upper = self.many.as_ref().map_or(Some(0), |many| many.size_hint().1);
        if self.source.is_some() {
            (0, None)
        } else {
            (0, upper)
        }
    }
}

impl<I, Func, Out, T, E, R> FusedIterator for TryRouteIter<I, Func, Out::IntoIter>
where
    I: Iterator<Item = Result<T, E>>,
    Func: FnMut(T) -> Out,
    Out: IntoRoute<Item = Result<R, E>>,
{
}
