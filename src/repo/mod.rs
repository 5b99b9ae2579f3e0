//! Repository layer: in-memory response cache
use moka::sync::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct CachedBody {
    body: String,
    ttl: Duration,
}

/// Each entry lives for the duration it was written with
struct PerEntryTtl;

impl Expiry<String, CachedBody> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedBody,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedBody,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Time-bounded response cache keyed by full request URL.
///
/// Cloning shares the underlying store. Once `capacity` entries are held,
/// moka's admission policy decides which entry gives way.
#[derive(Debug, Clone)]
pub struct CacheRepo {
    entries: Cache<String, CachedBody>,
}

impl CacheRepo {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity.max(1) as u64)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    /// Store a raw response body for `ttl_seconds`. A zero duration stores nothing.
    pub fn write(&self, key: &str, body: &str, ttl_seconds: u64) {
        if ttl_seconds == 0 {
            return;
        }
        self.entries.insert(
            key.to_string(),
            CachedBody {
                body: body.to_string(),
                ttl: Duration::from_secs(ttl_seconds),
            },
        );
        debug!("cache write {} (ttl {}s)", key, ttl_seconds);
    }

    /// Latest body for `key`, if it has not expired
    pub fn get_latest(&self, key: &str) -> Option<String> {
        let cached = self.entries.get(key)?;
        debug!("cache hit {}", key);
        Some(cached.body)
    }

    /// Drop expired entries now instead of on moka's next maintenance pass
    pub fn purge_expired(&self) {
        self.entries.run_pending_tasks();
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.run_pending_tasks();
        self.entries.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CacheRepo {
    fn default() -> Self {
        Self::new(crate::config::CACHE_MAXSIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_write_then_read() {
        let cache = CacheRepo::new(4);
        cache.write("https://api/psi", r#"{"code":0}"#, 60);
        assert_eq!(cache.get_latest("https://api/psi").as_deref(), Some(r#"{"code":0}"#));
        assert_eq!(cache.get_latest("https://api/pm25"), None);
    }

    #[test]
    fn test_zero_duration_never_cached() {
        let cache = CacheRepo::new(4);
        cache.write("k", "v", 0);
        assert!(cache.is_empty());
        assert_eq!(cache.get_latest("k"), None);
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let cache = CacheRepo::new(4);
        cache.write("k", "old", 60);
        cache.write("k", "new", 60);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_latest("k").as_deref(), Some("new"));
    }

    #[test]
    fn test_entry_expires_after_its_duration() {
        let cache = CacheRepo::new(4);
        cache.write("short", "1", 1);
        cache.write("long", "2", 3600);
        assert_eq!(cache.get_latest("short").as_deref(), Some("1"));

        thread::sleep(Duration::from_millis(1200));
        assert_eq!(cache.get_latest("short"), None);
        assert_eq!(cache.get_latest("long").as_deref(), Some("2"));
        cache.purge_expired();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_size_stays_within_capacity() {
        let cache = CacheRepo::new(2);
        for i in 0..10 {
            cache.write(&format!("k{i}"), "body", 600);
        }
        assert!(cache.len() <= 2);
    }

    #[test]
    fn test_clear() {
        let cache = CacheRepo::new(4);
        cache.write("a", "1", 60);
        cache.write("b", "2", 60);
        cache.clear();
        assert_eq!(cache.get_latest("a"), None);
        assert_eq!(cache.get_latest("b"), None);
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = CacheRepo::new(64);
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                thread::spawn(move || cache.write(&format!("k{i}"), "body", 60))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 8);
    }
}
