//! Bounded fan-out executor tests: alignment, isolation, concurrency cap.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use nagare::error::Error;
use nagare::fanout::map_bounded;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_results_align_with_input_order() {
        // later items finish first, so completion order differs from input
        let items: Vec<u64> = (0..10).collect();
        let results = map_bounded(items, 10, |n, _| async move {
            tokio::time::sleep(Duration::from_millis((10 - n) * 5)).await;
            Ok(n * 100)
        })
        .await;

        assert_eq!(results, (0..10).map(|n| n * 100).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_failures_are_isolated_per_item() {
        let items: Vec<u32> = (0..6).collect();
        let results: Vec<Vec<u32>> = map_bounded(items, 3, |n, _| async move {
            if n == 3 {
                Err(Error::parse("upstream hiccup"))
            } else {
                Ok(vec![n])
            }
        })
        .await;

        assert_eq!(results.len(), 6);
        assert!(results[3].is_empty());
        for (i, result) in results.iter().enumerate() {
            if i != 3 {
                assert_eq!(result, &vec![i as u32]);
            }
        }
    }

    #[tokio::test]
    async fn test_in_flight_never_exceeds_limit() {
        const LIMIT: usize = 3;

        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let items: Vec<usize> = (0..12).collect();
        let results = map_bounded(items, LIMIT, |n, _| {
            let current = Arc::clone(&current);
            let peak = Arc::clone(&peak);
            async move {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                current.fetch_sub(1, Ordering::SeqCst);
                Ok(n)
            }
        })
        .await;

        assert_eq!(results.len(), 12);
        assert!(
            peak.load(Ordering::SeqCst) <= LIMIT,
            "peak concurrency {} exceeded limit {}",
            peak.load(Ordering::SeqCst),
            LIMIT
        );
    }

    #[tokio::test]
    async fn test_limit_is_clamped_to_item_count() {
        let results = map_bounded(vec![1u8, 2], 50, |n, _| async move { Ok(n) }).await;
        assert_eq!(results, vec![1, 2]);

        let results = map_bounded(vec![1u8, 2, 3], 0, |n, _| async move { Ok(n) }).await;
        assert_eq!(results, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_output() {
        let results: Vec<u8> =
            map_bounded(Vec::<u8>::new(), 4, |n, _| async move { Ok(n) }).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_index_argument_matches_position() {
        let items = vec!["a", "b", "c"];
        let results = map_bounded(items, 2, |item, idx| async move {
            Ok(format!("{}{}", item, idx))
        })
        .await;
        assert_eq!(results, vec!["a0", "b1", "c2"]);
    }
}
