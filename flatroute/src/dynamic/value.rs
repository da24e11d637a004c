//! [`Value`], the dynamically-typed item of [`super::route`] and [`super::route_sync`].

use std::collections::BTreeMap;
use std::fmt;

use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{self, BoxStream, Stream, StreamExt};

use super::Error;

/// A synchronous sequence of fallible [`Value`]s.
pub type ValueIter = Box<dyn Iterator<Item = Result<Value, Error>> + Send>;
/// An asynchronous sequence of fallible [`Value`]s.
pub type ValueStream = BoxStream<'static, Result<Value, Error>>;
/// An eventual fallible [`Value`].
pub type ValueFuture = BoxFuture<'static, Result<Value, Error>>;

/// A callable [`Value`].
pub struct Function(Box<dyn FnMut(Value) -> Result<Value, Error> + Send>);

impl Function {
    /// Wraps `func`.
    pub fn new(func: impl FnMut(Value) -> Result<Value, Error> + Send + 'static) -> Self {
        Self(Box::new(func))
    }

    /// Calls the function with `arg`.
    pub fn call(&mut self, arg: Value) -> Result<Value, Error> {
        (self.0)(arg)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Function(..)")
    }
}

/// A dynamically-typed value.
///
/// Capabilities are probed at runtime:
/// * iterable: [`Value::List`], [`Value::String`] (as one-character strings), and [`Value::Iter`].
/// * async iterable: [`Value::Stream`].
/// * eventual: [`Value::Future`].
/// * callable: [`Value::Function`].
///
/// [`Value::Undefined`] is the absent marker, distinct from [`Value::Null`].
#[derive(Default)]
pub enum Value {
    /// No value.
    #[default]
    Undefined,
    /// The null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    String(String),
    /// A list of values.
    List(Vec<Value>),
    /// A non-iterable record.
    Object(BTreeMap<String, Value>),
    /// A lazy synchronous sequence.
    Iter(ValueIter),
    /// A lazy asynchronous sequence.
    Stream(ValueStream),
    /// An eventual value.
    Future(ValueFuture),
    /// A function.
    Function(Function),
}

impl Value {
    /// Creates a [`Value::Function`].
    pub fn function(func: impl FnMut(Value) -> Result<Value, Error> + Send + 'static) -> Self {
        Self::Function(Function::new(func))
    }

    /// Creates a [`Value::Function`] which returns a [`Value::Future`] for each call.
    pub fn async_function<Fut>(mut func: impl FnMut(Value) -> Fut + Send + 'static) -> Self
    where
        Fut: Future<Output = Result<Value, Error>> + Send + 'static,
    {
        Self::function(move |arg| Ok(Self::future(func(arg))))
    }

    /// Creates a [`Value::List`].
    pub fn list<T>(items: impl IntoIterator<Item = T>) -> Self
    where
        T: Into<Value>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Creates a [`Value::Object`].
    pub fn object<K>(entries: impl IntoIterator<Item = (K, Value)>) -> Self
    where
        K: Into<String>,
    {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Creates a [`Value::Iter`] from an infallible iterator.
    pub fn iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: Send + 'static,
    {
        Self::Iter(Box::new(iter.into_iter().map(Ok::<_, Error>)))
    }

    /// Creates a [`Value::Iter`] from a fallible iterator.
    pub fn try_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Result<Value, Error>>,
        I::IntoIter: Send + 'static,
    {
        Self::Iter(Box::new(iter.into_iter()))
    }

    /// Creates a [`Value::Stream`] from an infallible stream.
    pub fn stream(stream: impl Stream<Item = Value> + Send + 'static) -> Self {
        Self::Stream(stream.map(Ok::<_, Error>).boxed())
    }

    /// Creates a [`Value::Stream`] from a fallible stream.
    pub fn try_stream(stream: impl Stream<Item = Result<Value, Error>> + Send + 'static) -> Self {
        Self::Stream(stream.boxed())
    }

    /// Creates a [`Value::Future`].
    pub fn future(future: impl Future<Output = Result<Value, Error>> + Send + 'static) -> Self {
        Self::Future(future.boxed())
    }

    /// Name of this value's type: `"undefined"`, `"null"`, `"boolean"`, `"number"`, `"string"`, `"function"`, or
    /// `"object"` for everything else.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Function(_) => "function",
            Self::List(_) | Self::Object(_) | Self::Iter(_) | Self::Stream(_) | Self::Future(_) => {
                "object"
            }
        }
    }

    /// If this value can be iterated synchronously.
    pub fn is_iterable(&self) -> bool {
        matches!(self, Self::List(_) | Self::String(_) | Self::Iter(_))
    }

    /// If this value can be iterated asynchronously (but not synchronously).
    pub fn is_async_iterable(&self) -> bool {
        matches!(self, Self::Stream(_))
    }

    /// Converts into a synchronous sequence, or returns `self` if not [iterable](Self::is_iterable).
    pub fn into_iterable(self) -> Result<ValueIter, Self> {
        match self {
            Self::List(items) => Ok(Box::new(items.into_iter().map(Ok::<_, Error>))),
            Self::String(string) => {
                let chars = string
                    .chars()
                    .map(|c| Ok::<_, Error>(Self::String(c.into())))
                    .collect::<Vec<_>>();
                Ok(Box::new(chars.into_iter()))
            }
            Self::Iter(iter) => Ok(iter),
            other => Err(other),
        }
    }

    /// Converts into an asynchronous sequence, or returns `self` if neither [iterable](Self::is_iterable) nor
    /// [async iterable](Self::is_async_iterable).
    ///
    /// Elements of a synchronous sequence are [settled](settle) one at a time as the stream is polled, so a
    /// [`Value::Future`] element yields its resolved value (or its error).
    pub fn into_async_iterable(self) -> Result<ValueStream, Self> {
        match self {
            Self::Stream(stream) => Ok(stream),
            other => other
                .into_iterable()
                .map(|iter| stream::iter(iter).then(settle).boxed()),
        }
    }

    /// Gets a field of a [`Value::Object`].
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Gets a [`Value::Number`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

}

/// Awaits nested [`Value::Future`]s until a non-future value (or an error) results.
pub async fn settle(mut result: Result<Value, Error>) -> Result<Value, Error> {
    while let Ok(Value::Future(future)) = result {
        result = future.await;
    }
    result
}

/// Data values compare structurally. Sequences, futures, and functions are opaque and never equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("Undefined"),
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Object(fields) => f.debug_tuple("Object").field(fields).finish(),
            Self::Iter(_) => f.write_str("Iter(..)"),
            Self::Stream(_) => f.write_str("Stream(..)"),
            Self::Future(_) => f.write_str("Future(..)"),
            Self::Function(func) => fmt::Debug::fmt(func, f),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}
