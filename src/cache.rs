use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Result;

/// How long a computed result stays valid.
pub const CACHE_TTL_MINUTES: i64 = 5;

struct CacheEntry<T> {
    value: T,
    computed_at: DateTime<Utc>,
}

/// Single-slot expiring cache for the computed summaries list.
///
/// The slot is guarded by an async mutex held across the whole
/// check-compute-store sequence, so concurrent cache-miss requests cannot
/// run the pipeline twice for one expiry.
pub struct ResponseCache<T> {
    slot: Mutex<Option<CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> ResponseCache<T> {
    pub fn new() -> Self {
        Self::with_ttl(Duration::minutes(CACHE_TTL_MINUTES))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        ResponseCache {
            slot: Mutex::new(None),
            ttl,
        }
    }

    /// Returns the stored value while it is still valid; otherwise runs
    /// `compute`, stores its result with a fresh timestamp, and returns it.
    /// A failed `compute` leaves the slot unchanged, stale entry included.
    pub async fn get_or_compute<F, Fut>(&self, compute: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(entry) = slot.as_ref() {
            if Utc::now() - entry.computed_at < self.ttl {
                debug!("cache hit");
                return Ok(entry.value.clone());
            }
        }

        debug!("cache miss, computing");
        let value = compute().await?;
        *slot = Some(CacheEntry {
            value: value.clone(),
            computed_at: Utc::now(),
        });

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn compute_once(counter: &AtomicUsize) -> Result<Vec<String>> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(vec!["headline summary".to_string()])
    }

    #[tokio::test]
    async fn read_within_ttl_skips_compute() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_compute(|| compute_once(&calls)).await.unwrap();
        let second = cache.get_or_compute(|| compute_once(&calls)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn read_within_ttl_keeps_computed_at() {
        let cache = ResponseCache::new();
        cache.get_or_compute(|| async { Ok(1u32) }).await.unwrap();

        let first_computed_at = cache.slot.lock().await.as_ref().unwrap().computed_at;
        cache.get_or_compute(|| async { Ok(2u32) }).await.unwrap();

        let slot = cache.slot.lock().await;
        let entry = slot.as_ref().unwrap();
        assert_eq!(entry.computed_at, first_computed_at);
        assert_eq!(entry.value, 1);
    }

    #[tokio::test]
    async fn expired_entry_recomputes() {
        let cache = ResponseCache::with_ttl(Duration::zero());
        let calls = AtomicUsize::new(0);

        cache.get_or_compute(|| compute_once(&calls)).await.unwrap();
        cache.get_or_compute(|| compute_once(&calls)).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_compute_keeps_stale_entry() {
        let cache = ResponseCache::with_ttl(Duration::zero());
        cache
            .get_or_compute(|| async { Ok(vec!["old".to_string()]) })
            .await
            .unwrap();

        let result = cache
            .get_or_compute(|| async { Err(AppError::FetchError("news API down".to_string())) })
            .await;
        assert!(result.is_err());

        let slot = cache.slot.lock().await;
        assert_eq!(slot.as_ref().unwrap().value, vec!["old"]);
    }
}
