//! TTL-bounded memoization for server-side uniqueness checks.
//!
//! Blur-driven validators can hammer the same uniqueness endpoint with the
//! same value; callers inject a [`TtlCache`] to absorb the repeats. The
//! cache is an explicit component with a configurable time-to-live, shared
//! by reference wherever the validator runs.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use client::ApiResult;
use tracing::debug;

/// In-memory cache whose entries expire after a fixed time-to-live.
///
/// Interior mutability lets a shared reference serve concurrent validators;
/// expired entries are evicted on read.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value if it is still fresh.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some((stored, value)) if stored.elapsed() < self.ttl => {
                debug!("uniqueness cache hit, age {:?}", stored.elapsed());
                Some(value.clone())
            }
            Some(_) => {
                debug!("uniqueness cache entry expired");
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, (Instant::now(), value));
    }

    pub fn invalidate(&self, key: &K) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }
}

/// Memoized uniqueness check.
///
/// Consults the cache first; on a miss, invokes the injected checker and
/// memoizes the answer. Only successful answers are cached, so a transient
/// failure never poisons later checks.
pub async fn check_unique<K, F, Fut>(
    cache: &TtlCache<K, bool>,
    key: K,
    fetch_fn: F,
) -> ApiResult<bool>
where
    K: Eq + Hash,
    F: FnOnce() -> Fut,
    Fut: Future<Output = ApiResult<bool>>,
{
    if let Some(cached) = cache.get(&key) {
        return Ok(cached);
    }
    let fresh = fetch_fn().await?;
    cache.insert(key, fresh);
    Ok(fresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use client::AppError;

    #[test]
    fn fresh_entries_hit() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("alice".to_string(), true);
        assert_eq!(cache.get(&"alice".to_string()), Some(true));
    }

    #[test]
    fn missing_and_invalidated_entries_miss() {
        let cache: TtlCache<String, bool> = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get(&"bob".to_string()), None);

        cache.insert("bob".to_string(), false);
        cache.invalidate(&"bob".to_string());
        assert_eq!(cache.get(&"bob".to_string()), None);
    }

    #[tokio::test]
    async fn expired_entries_are_evicted() {
        let cache = TtlCache::new(Duration::from_millis(10));
        cache.insert("carol".to_string(), true);
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert_eq!(cache.get(&"carol".to_string()), None);
    }

    #[tokio::test]
    async fn check_unique_memoizes_successful_answers() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicU32::new(0);

        for _ in 0..3 {
            let taken = check_unique(&cache, "dave".to_string(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            })
            .await
            .unwrap();
            assert!(taken);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_checks_are_not_cached() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicU32::new(0);

        let first = check_unique(&cache, "erin".to_string(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::network("flaky"))
        })
        .await;
        assert!(first.is_err());

        let second = check_unique(&cache, "erin".to_string(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(false)
        })
        .await
        .unwrap();
        assert!(!second);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
