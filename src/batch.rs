//! Batched execution of homogeneous async operations.
//!
//! The Figma API rate-limits aggressively, so fan-out requests (node
//! batches, image downloads) run in fixed-size waves: a wave must settle
//! completely before the next one starts, and results come back in input
//! order.

use std::future::Future;

use crate::error::{FigmageError, Result};

/// Run `op` over `items` in waves of at most `batch_size` concurrent
/// operations.
///
/// Output order matches input order. The first failed operation aborts
/// the run: in-flight siblings are dropped and no further wave starts.
pub async fn run_batched<T, R, F, Fut>(items: Vec<T>, batch_size: usize, op: F) -> Result<Vec<R>>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    if batch_size == 0 {
        return Err(FigmageError::config("batch size must be at least 1"));
    }

    let mut results = Vec::with_capacity(items.len());
    let mut remaining = items.into_iter();

    loop {
        let batch: Vec<T> = remaining.by_ref().take(batch_size).collect();
        if batch.is_empty() {
            break;
        }
        let settled = futures::future::try_join_all(batch.into_iter().map(&op)).await?;
        results.extend(settled);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn preserves_input_order() {
        let items: Vec<u64> = (0..17).collect();
        let results = run_batched(items.clone(), 4, |n| async move {
            // Later items finish first; order must still hold.
            tokio::time::sleep(Duration::from_millis(20u64.saturating_sub(n))).await;
            Ok(n * 2)
        })
        .await
        .unwrap();

        let expected: Vec<u64> = items.iter().map(|n| n * 2).collect();
        assert_eq!(results, expected);
    }

    #[tokio::test]
    async fn never_exceeds_batch_size_in_flight() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let items: Vec<u32> = (0..20).collect();
        run_batched(items, 3, |_| {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await
        .unwrap();

        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn failure_stops_later_batches() {
        let started = Arc::new(AtomicUsize::new(0));

        let items: Vec<u32> = (0..10).collect();
        let result = run_batched(items, 2, |n| {
            let started = Arc::clone(&started);
            async move {
                started.fetch_add(1, Ordering::SeqCst);
                if n == 1 {
                    Err(FigmageError::config("boom"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert!(result.is_err());
        // Only the first wave of two may have started.
        assert!(started.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn zero_batch_size_is_a_config_error() {
        let result = run_batched(vec![1], 0, |n| async move { Ok(n) }).await;
        assert!(matches!(result, Err(FigmageError::Config(_))));
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let results: Vec<u32> = run_batched(Vec::new(), 5, |n| async move { Ok(n) })
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
