//! Routing laws for the typed [`route_sync`] and [`route`] APIs.
#![cfg(feature = "alloc")]

use std::cell::{Cell, RefCell};
use std::future::ready;
use std::rc::Rc;

use flatroute::*;
use futures_util::stream::{self, StreamExt};
use tokio::sync::mpsc::unbounded_channel;
use tokio_stream::wrappers::UnboundedReceiverStream;

fn init_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn double(x: i32) -> i32 {
    2 * x
}

fn keep_even(x: i32) -> Option<i32> {
    (0 == x % 2).then_some(x)
}

fn duplicate(x: i32) -> [i32; 2] {
    [x, 2 * x]
}

/// Buffers every other item, routing the sum of each consecutive pair.
fn sum_pairs() -> impl FnMut(i32) -> Option<i32> {
    let mut memo = None;
    move |x| match memo.take() {
        None => {
            memo = Some(x);
            None
        }
        Some(prev) => Some(prev + x),
    }
}

/// Iterator which sets a flag when dropped.
struct DropFlag<I> {
    iter: I,
    dropped: Rc<Cell<bool>>,
}
impl<I> Iterator for DropFlag<I>
where
    I: Iterator,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}
impl<I> Drop for DropFlag<I> {
    fn drop(&mut self) {
        self.dropped.set(true);
    }
}

#[test]
fn test_sync_identity() {
    init_tracing();
    let out = route_sync(0..5, Some).collect::<Vec<_>>();
    assert_eq!(vec![0, 1, 2, 3, 4], out);
}

#[test]
fn test_sync_map() {
    let out = route_sync(0..5, |x| Some(double(x))).collect::<Vec<_>>();
    assert_eq!((0..5).map(double).collect::<Vec<_>>(), out);
}

#[test]
fn test_sync_filter() {
    let out = route_sync(0..5, keep_even).collect::<Vec<_>>();
    assert_eq!(vec![0, 2, 4], out);
}

#[test]
fn test_sync_merge() {
    let out = route_sync(0..5, sum_pairs()).collect::<Vec<_>>();
    assert_eq!(vec![1, 5], out);
}

#[test]
fn test_sync_split() {
    let out = route_sync(0..5, duplicate).collect::<Vec<_>>();
    assert_eq!((0..5).flat_map(duplicate).collect::<Vec<_>>(), out);
    assert_eq!(10, out.len());
}

#[test]
fn test_sync_flattens_one_level() {
    let input = vec![vec![vec![1, 2]], vec![vec![3], vec![]]];
    let out = route_sync(input, |x| x).collect::<Vec<_>>();
    assert_eq!(vec![vec![1, 2], vec![3], vec![]], out);
}

#[test]
fn test_sync_invocation_order() {
    let log = RefCell::new(Vec::new());
    let iter = route_sync(0..3, |x| {
        log.borrow_mut().push(format!("call {}", x));
        vec![x; 2]
    });
    for item in iter {
        log.borrow_mut().push(format!("emit {}", item));
    }
    assert_eq!(
        &[
            "call 0", "emit 0", "emit 0", "call 1", "emit 1", "emit 1", "call 2", "emit 2", "emit 2",
        ],
        &log.borrow()[..]
    );
}

#[test]
fn test_sync_early_drop_releases_source() {
    let dropped = Rc::new(Cell::new(false));
    let source = DropFlag {
        iter: 0..,
        dropped: dropped.clone(),
    };
    let mut iter = route_sync(source, |x| Some(x));
    assert_eq!(Some(0), iter.next());
    assert!(!dropped.get());
    drop(iter);
    assert!(dropped.get());
}

#[test]
fn test_sync_try_stops_at_error() {
    let mut calls = 0;
    let out = try_route_sync((0..5).map(Ok), |x| {
        calls += 1;
        if 3 == x { Err("three") } else { Ok(Some(x)) }
    })
    .collect::<Vec<_>>();
    assert_eq!(vec![Ok(0), Ok(1), Ok(2), Err("three")], out);
    assert_eq!(4, calls);
}

#[test]
fn test_sync_ext() {
    let out = (0..3).route_sync(duplicate).collect::<Vec<_>>();
    assert_eq!(vec![0, 0, 1, 2, 2, 4], out);

    let out = vec![Ok(1), Err("bad")]
        .into_iter()
        .try_route_sync(|x| Ok(Some(x)))
        .collect::<Vec<_>>();
    assert_eq!(vec![Ok(1), Err("bad")], out);
}

#[tokio::test]
async fn test_async_identity() {
    init_tracing();
    let out = route(stream::iter(0..5), |x| ready(Some(x)))
        .collect::<Vec<_>>()
        .await;
    assert_eq!(vec![0, 1, 2, 3, 4], out);
}

#[tokio::test]
async fn test_async_map() {
    let out = route_iter(0..5, |x| async move { Some(double(x)) })
        .collect::<Vec<_>>()
        .await;
    assert_eq!(vec![0, 2, 4, 6, 8], out);
}

#[tokio::test]
async fn test_async_filter() {
    let out = route_iter(0..5, |x| ready(keep_even(x)))
        .collect::<Vec<_>>()
        .await;
    assert_eq!(vec![0, 2, 4], out);
}

#[tokio::test]
async fn test_async_merge() {
    let mut sum_pairs = sum_pairs();
    let out = route_iter(0..5, |x| ready(sum_pairs(x)))
        .collect::<Vec<_>>()
        .await;
    assert_eq!(vec![1, 5], out);
}

#[tokio::test]
async fn test_async_split() {
    let out = route_iter(0..5, |x| ready(duplicate(x)))
        .collect::<Vec<_>>()
        .await;
    assert_eq!(vec![0, 0, 1, 2, 2, 4, 3, 6, 4, 8], out);
}

#[tokio::test]
async fn test_async_many_stream() {
    let out = route_iter(["ab", "", "cde"], |s| {
        ready(Route::Many(stream::iter(s.chars())))
    })
    .collect::<String>()
    .await;
    assert_eq!("abcde", out);
}

#[tokio::test]
async fn test_async_push_based_source() {
    let (send, recv) = unbounded_channel();
    for x in 0..5 {
        send.send(x).unwrap();
    }
    drop(send);

    let from_channel = route(UnboundedReceiverStream::new(recv), |x| ready(Some(double(x))))
        .collect::<Vec<_>>()
        .await;
    let from_iter = route_iter(0..5, |x| ready(Some(double(x))))
        .collect::<Vec<_>>()
        .await;
    assert_eq!(from_iter, from_channel);
}

#[tokio::test]
async fn test_async_invocation_order() {
    let in_flight = Rc::new(Cell::new(0));
    let calls = Rc::new(RefCell::new(Vec::new()));

    let out = route_iter(0..4, |x| {
        let in_flight = in_flight.clone();
        let calls = calls.clone();
        async move {
            in_flight.set(in_flight.get() + 1);
            assert_eq!(1, in_flight.get());
            calls.borrow_mut().push(x);
            tokio::task::yield_now().await;
            in_flight.set(in_flight.get() - 1);
            Route::many_iter([x, x])
        }
    })
    .collect::<Vec<_>>()
    .await;

    assert_eq!(vec![0, 0, 1, 1, 2, 2, 3, 3], out);
    assert_eq!(&[0, 1, 2, 3], &calls.borrow()[..]);
}

#[tokio::test]
async fn test_async_early_drop_releases_source() {
    let dropped = Rc::new(Cell::new(false));
    let source = DropFlag {
        iter: 0..,
        dropped: dropped.clone(),
    };
    let mut route = route_iter(source, |x| ready([x, x]));
    assert_eq!(Some(0), route.next().await);
    assert!(!dropped.get());
    drop(route);
    assert!(dropped.get());
}

#[tokio::test]
async fn test_async_try_stops_at_error() {
    let out = stream::iter(0..5)
        .map(Ok)
        .try_route(|x| async move {
            if 2 == x { Err("two") } else { Ok(vec![x]) }
        })
        .collect::<Vec<_>>()
        .await;
    assert_eq!(vec![Ok(0), Ok(1), Err("two")], out);
}

#[tokio::test]
async fn test_async_ext() {
    let out = stream::iter(0..3)
        .route(|x| ready(keep_even(x)))
        .collect::<Vec<_>>()
        .await;
    assert_eq!(vec![0, 2], out);
}
