//! Bounded fan-out execution with index-aligned results.
//!
//! Per-episode secondary lookups fan out across a bounded worker pool. The
//! pool drains a read-only enumerated range into per-task result slots, so
//! no shared mutable cursor exists; completion order is irrelevant and
//! output order always matches input order.
//!
//! Failure of one item's operation is caught locally and mapped to that
//! slot's default value. It never aborts sibling work or the overall call:
//! whole-request success is independent of any single flaky upstream call.

use futures::stream::{self, StreamExt};
use std::future::Future;
use tracing::warn;

use crate::error::Result;

/// Runs `op` once per item with at most `limit` operations in flight.
///
/// Returns one result per input item, index-aligned. A failing operation
/// leaves its slot at `R::default()` and is logged; the limit is clamped to
/// `1..=items.len()`.
///
/// # Examples
///
/// ```rust
/// use nagare::fanout::map_bounded;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let doubled = map_bounded(vec![1u32, 2, 3], 2, |n, _idx| async move {
///     Ok(n * 2)
/// })
/// .await;
/// assert_eq!(doubled, vec![2, 4, 6]);
/// # }
/// ```
pub async fn map_bounded<T, R, F, Fut>(items: Vec<T>, limit: usize, op: F) -> Vec<R>
where
    F: Fn(T, usize) -> Fut,
    Fut: Future<Output = Result<R>>,
    R: Default,
{
    if items.is_empty() {
        return Vec::new();
    }
    let limit = limit.clamp(1, items.len());

    let mut slots: Vec<R> = Vec::new();
    slots.resize_with(items.len(), R::default);

    let mut results = stream::iter(items.into_iter().enumerate())
        .map(|(index, item)| {
            let fut = op(item, index);
            async move { (index, fut.await) }
        })
        .buffer_unordered(limit);

    while let Some((index, result)) = results.next().await {
        match result {
            Ok(value) => slots[index] = value,
            Err(e) => warn!(index, error = %e, "fan-out task failed; keeping default"),
        }
    }

    slots
}
