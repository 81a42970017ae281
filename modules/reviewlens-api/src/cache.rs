use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

struct Entry<T> {
    value: T,
    inserted_at: Instant,
}

/// A single cached value with a time-to-live. Owners call `invalidate` after
/// a mutation that makes the value stale.
pub struct SnapshotCache<T> {
    ttl: Duration,
    entry: RwLock<Option<Entry<T>>>,
    /// Bumped by every `invalidate`; a load that straddles one is not stored.
    generation: AtomicU64,
}

impl<T: Clone> SnapshotCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn get(&self) -> Option<T> {
        let entry = self.entry.read().await;
        let entry = entry.as_ref()?;
        if entry.inserted_at.elapsed() < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub async fn put(&self, value: T) {
        *self.entry.write().await = Some(Entry {
            value,
            inserted_at: Instant::now(),
        });
    }

    pub async fn invalidate(&self) {
        let mut entry = self.entry.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        *entry = None;
    }

    /// Cached value, or the result of `load` (which is then cached). Errors are
    /// returned as-is and leave the cache empty. A value loaded while an
    /// `invalidate` ran is returned to the caller but not cached.
    pub async fn get_or_try_load<E, F, Fut>(&self, load: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get().await {
            return Ok(value);
        }
        let generation = self.generation.load(Ordering::SeqCst);
        let value = load().await?;
        let mut entry = self.entry.write().await;
        if self.generation.load(Ordering::SeqCst) == generation {
            *entry = Some(Entry {
                value: value.clone(),
                inserted_at: Instant::now(),
            });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_invalidate() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        assert_eq!(cache.get().await, None::<u32>);
        cache.put(7).await;
        assert_eq!(cache.get().await, Some(7));
        cache.invalidate().await;
        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn test_zero_ttl_never_hits() {
        let cache = SnapshotCache::new(Duration::ZERO);
        cache.put("x".to_string()).await;
        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn test_load_runs_once_while_fresh() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        let calls = std::sync::atomic::AtomicUsize::new(0);
        for _ in 0..3 {
            let value: Result<u32, ()> = cache
                .get_or_try_load(|| async {
                    calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    Ok(42)
                })
                .await;
            assert_eq!(value, Ok(42));
        }
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_during_load_discards_stale_value() {
        let cache = std::sync::Arc::new(SnapshotCache::new(Duration::from_secs(60)));
        let loader = {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .get_or_try_load(|| async {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok::<_, ()>("before".to_string())
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        cache.invalidate().await;

        let loaded = loader.await.unwrap();
        assert_eq!(loaded, Ok("before".to_string()));
        assert_eq!(cache.get().await, None);

        let fresh: Result<String, ()> = cache.get_or_try_load(|| async { Ok("after".to_string()) }).await;
        assert_eq!(fresh, Ok("after".to_string()));
        assert_eq!(cache.get().await, Some("after".to_string()));
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let cache: SnapshotCache<u32> = SnapshotCache::new(Duration::from_secs(60));
        let err: Result<u32, &str> = cache.get_or_try_load(|| async { Err("down") }).await;
        assert_eq!(err, Err("down"));
        assert_eq!(cache.get().await, None);
    }
}
