//! Routing over dynamically-typed [`Value`]s.
//!
//! The typed API in the crate root checks its arguments' capabilities at compile time. This module checks them at
//! runtime instead (see [`Value`] for which variants have which capability) and reports violations as
//! [`InvalidArgument`] errors, whose messages are stable.
//!
//! Routing function results are classified once:
//! * [`Value::Undefined`] routes to nothing.
//! * Sequences are flattened by one level. For [`route_sync`] that is any [iterable](Value::is_iterable) value. For
//!   [`route`] it also includes [async iterable](Value::is_async_iterable) values, and [`Value::Future`]s are resolved
//!   before classifying. [`route`] also resolves `Value::Future` elements of synchronous sequences, both in the source
//!   and in routed results.
//! * Anything else is a single output.

use core::iter::FusedIterator;

use futures_util::future;
use futures_util::stream::{self, BoxStream, StreamExt};

use crate::Route;

mod error;
pub use error::{Error, InvalidArgument};

mod value;
pub use value::{Function, Value, ValueFuture, ValueIter, ValueStream, settle};

/// Output stream of [`route`].
pub type DynRouteStream = BoxStream<'static, Result<Value, Error>>;

/// Dynamic version of [`crate::route_sync`].
///
/// Fails immediately, before anything is pulled from `source`, if `source` is not iterable
/// ([`InvalidArgument::NotIterable`]) or if `action` is not a function ([`InvalidArgument::NotFunction`]). The source is
/// checked first.
///
/// An `Err` from the source, from `action`, or from a routed sequence is yielded in place and ends the iterator.
pub fn route_sync(
    source: Value,
    action: Value,
) -> Result<impl FusedIterator<Item = Result<Value, Error>> + Send, Error> {
    let source_type = source.type_name();
    let source = source
        .into_iterable()
        .map_err(|_| InvalidArgument::NotIterable)?;
    let mut func = into_function(action)?;

    tracing::trace!(source = source_type, "Routing iterable.");
    Ok(crate::try_route_sync(source, move |item| {
        classify_sync(func.call(item))
    }))
}

/// Dynamic version of [`crate::route`], accepting both iterable and async iterable sources.
///
/// If `source` is neither iterable nor async iterable ([`InvalidArgument::NotIterableOrAsyncIterable`]), or if `action`
/// is not a function ([`InvalidArgument::NotFunction`]), the returned stream yields that error as its only item.
///
/// An `Err` from the source, from `action`, from resolving a [`Value::Future`], or from a routed sequence is yielded in
/// place and ends the stream.
pub fn route(source: Value, action: Value) -> DynRouteStream {
    let source_type = source.type_name();
    match validate_async(source, action) {
        Ok((source, mut func)) => {
            tracing::trace!(source = source_type, "Routing async iterable.");
            crate::try_route(source, move |item| resolve(func.call(item))).boxed()
        }
        Err(invalid) => stream::once(future::ready(Err::<Value, _>(Error::from(invalid)))).boxed(),
    }
}

fn validate_async(source: Value, action: Value) -> Result<(ValueStream, Function), InvalidArgument> {
    let source = source
        .into_async_iterable()
        .map_err(|_| InvalidArgument::NotIterableOrAsyncIterable)?;
    Ok((source, into_function(action)?))
}

fn into_function(action: Value) -> Result<Function, InvalidArgument> {
    match action {
        Value::Function(func) => Ok(func),
        other => Err(InvalidArgument::NotFunction {
            received: other.type_name(),
        }),
    }
}

fn classify_sync(result: Result<Value, Error>) -> Route<Result<Value, Error>, ValueIter> {
    match result {
        Ok(Value::Undefined) => Route::Absent,
        Ok(value) => match value.into_iterable() {
            Ok(many) => Route::Many(many),
            Err(value) => Route::Single(Ok(value)),
        },
        Err(error) => Route::Single(Err(error)),
    }
}

/// Resolves nested [`Value::Future`]s, then classifies.
async fn resolve(result: Result<Value, Error>) -> Route<Result<Value, Error>, ValueStream> {
    match settle(result).await {
        Ok(Value::Undefined) => Route::Absent,
        Ok(value) => match value.into_async_iterable() {
            Ok(many) => Route::Many(many),
            Err(value) => Route::Single(Ok(value)),
        },
        Err(error) => Route::Single(Err(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_sync() {
        assert!(classify_sync(Ok(Value::Undefined)).is_absent());
        assert!(matches!(
            classify_sync(Ok(Value::Null)),
            Route::Single(Ok(Value::Null))
        ));
        assert!(matches!(
            classify_sync(Ok(Value::list([1]))),
            Route::Many(_)
        ));
        // Streams are not synchronously iterable.
        assert!(matches!(
            classify_sync(Ok(Value::stream(stream::empty()))),
            Route::Single(Ok(Value::Stream(_)))
        ));
        assert!(matches!(
            classify_sync(Err(Error::failure("boom"))),
            Route::Single(Err(Error::Failure(_)))
        ));
    }

    #[tokio::test]
    async fn test_resolve_nested_futures() {
        let nested = Value::future(async { Ok(Value::future(async { Ok(Value::from(7)) })) });
        assert!(matches!(
            resolve(Ok(nested)).await,
            Route::Single(Ok(Value::Number(n))) if 7.0 == n
        ));

        let absent = Value::future(async { Ok(Value::Undefined) });
        assert!(resolve(Ok(absent)).await.is_absent());

        let Route::Many(many) = resolve(Ok(Value::list([1, 2]))).await else {
            panic!("expected `Route::Many`");
        };
        let items = many.map(Result::unwrap).collect::<Vec<_>>().await;
        assert_eq!(vec![Value::from(1), Value::from(2)], items);
    }
}
