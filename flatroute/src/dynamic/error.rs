//! Errors for dynamic routing.

/// A dynamic routing call was given an argument without the required capability.
///
/// The display messages are stable and may be matched on by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArgument {
    /// The source of [`super::route_sync`] is not iterable.
    #[error(r#"Argument type mismatch: The first argument is expected to be "iterable"."#)]
    NotIterable,
    /// The source of [`super::route`] is neither iterable nor async iterable.
    #[error(r#"Argument type mismatch: The first argument is expected to be "iterable" or "asyncIterable"."#)]
    NotIterableOrAsyncIterable,
    /// The routing action is not a function.
    #[error(
        r#"Argument type mismatch: The second argument is expected to be a "function", but received "{received}"."#
    )]
    NotFunction {
        /// Type name of the received value, see [`super::Value::type_name`].
        received: &'static str,
    },
}

/// Error yielded by dynamic routing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Argument validation failed before any item was pulled.
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
    /// An error raised by the source, the routing function, or a routed sequence, passed through unchanged.
    #[error(transparent)]
    Failure(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps a caller error (or message) as [`Error::Failure`].
    pub fn failure(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Failure(error.into())
    }
}
