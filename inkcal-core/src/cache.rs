//! Fetch-or-reuse cache in front of a calendar source.
//!
//! One JSON blob per source under a stable, hash-derived filename, so
//! repeated runs reuse the same storage slot. Entries are replaced
//! wholesale on refresh and never partially mutated. A run is a single
//! sequential process, so no locking is done beyond that assumption.

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{InkCalError, InkCalResult};
use crate::event::Event;
use crate::ics;

/// Where raw calendar text comes from. Network transport, retries and
/// timeouts live behind this trait; a timed-out fetch must return an
/// error rather than hang.
pub trait EventSource {
    fn fetch(&self, source_id: &str) -> impl Future<Output = InkCalResult<String>> + Send;
}

/// One cached fetch result for a source.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    events: Vec<Event>,
}

/// TTL cache keyed by source identifier, backed by `EventSource`.
pub struct CalendarCache<S: EventSource> {
    dir: PathBuf,
    source: S,
}

impl<S: EventSource> CalendarCache<S> {
    pub fn new(dir: impl Into<PathBuf>, source: S) -> Self {
        CalendarCache {
            dir: dir.into(),
            source,
        }
    }

    /// Return the events for `source_id`, fetching only if the cached
    /// entry is older than `ttl` (or missing/unreadable).
    pub async fn get(&self, source_id: &str, ttl: Duration) -> InkCalResult<Vec<Event>> {
        self.get_at(source_id, ttl, Utc::now()).await
    }

    /// `get` with an explicit notion of "now"; the TTL comparison is
    /// `now - fetched_at < ttl`.
    pub async fn get_at(
        &self,
        source_id: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> InkCalResult<Vec<Event>> {
        let path = self.entry_path(source_id);

        if let Some(entry) = read_entry(&path) {
            let age = now - entry.fetched_at;
            if age < ttl {
                info!(
                    source_id,
                    age_minutes = age.num_minutes(),
                    "using cached calendar data"
                );
                return Ok(entry.events);
            }
            debug!(
                source_id,
                age_minutes = age.num_minutes(),
                "cache entry expired"
            );
        }

        self.refresh(source_id, now, &path).await
    }

    /// Fetch, parse and store a fresh entry. Failures surface as
    /// `SourceUnavailable`; a stale entry is deliberately not substituted
    /// here, that call is the caller's to make.
    async fn refresh(
        &self,
        source_id: &str,
        now: DateTime<Utc>,
        path: &Path,
    ) -> InkCalResult<Vec<Event>> {
        info!(source_id, "fetching fresh calendar data");

        let text = self
            .source
            .fetch(source_id)
            .await
            .map_err(|e| unavailable(source_id, e))?;
        let events =
            ics::parse_calendar(&text, source_id).map_err(|e| unavailable(source_id, e))?;

        let entry = CacheEntry {
            fetched_at: now,
            events,
        };
        if let Err(e) = self.write_entry(path, &entry) {
            // A broken cache dir degrades to fetch-every-run, not failure.
            warn!(source_id, error = %e, "failed to write cache entry");
        }
        Ok(entry.events)
    }

    fn write_entry(&self, path: &Path, entry: &CacheEntry) -> InkCalResult<()> {
        fs::create_dir_all(&self.dir)?;
        let blob =
            serde_json::to_vec(entry).map_err(|e| InkCalError::Serialization(e.to_string()))?;
        fs::write(path, blob)?;
        Ok(())
    }

    /// Stable storage slot for a source: hash of its identifier.
    fn entry_path(&self, source_id: &str) -> PathBuf {
        let hash = Sha256::digest(source_id.as_bytes());
        self.dir.join(format!("{:x}.json", hash))
    }
}

/// Read a cache entry; corruption of any kind is a miss, never an error.
fn read_entry(path: &Path) -> Option<CacheEntry> {
    let blob = fs::read(path).ok()?;
    match serde_json::from_slice(&blob) {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "discarding unreadable cache entry");
            None
        }
    }
}

fn unavailable(source_id: &str, err: InkCalError) -> InkCalError {
    InkCalError::SourceUnavailable {
        source_id: source_id.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const SAMPLE_ICS: &str = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:cached-1
SUMMARY:Cached Event
DTSTART:20250610T140000Z
DTEND:20250610T150000Z
END:VEVENT
END:VCALENDAR"#;

    struct MockSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl MockSource {
        fn new(fail: bool) -> Self {
            MockSource {
                calls: AtomicUsize::new(0),
                fail,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl EventSource for MockSource {
        fn fetch(&self, source_id: &str) -> impl Future<Output = InkCalResult<String>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = if self.fail {
                Err(InkCalError::Network(format!("refused: {source_id}")))
            } else {
                Ok(SAMPLE_ICS.to_string())
            };
            async move { result }
        }
    }

    fn now() -> DateTime<Utc> {
        use chrono::TimeZone;
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_second_get_within_ttl_issues_no_fetch() {
        let dir = TempDir::new().unwrap();
        let cache = CalendarCache::new(dir.path(), MockSource::new(false));
        let ttl = Duration::minutes(60);

        let first = cache.get_at("work", ttl, now()).await.unwrap();
        let second = cache.get_at("work", ttl, now()).await.unwrap();

        assert_eq!(cache.source.call_count(), 1);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, second[0].id);
    }

    #[tokio::test]
    async fn test_entry_age_30_of_60_minutes_is_reused() {
        let dir = TempDir::new().unwrap();
        let cache = CalendarCache::new(dir.path(), MockSource::new(false));
        let ttl = Duration::minutes(60);

        cache.get_at("work", ttl, now()).await.unwrap();
        cache
            .get_at("work", ttl, now() + Duration::minutes(30))
            .await
            .unwrap();

        assert_eq!(cache.source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_entry_age_70_of_60_minutes_triggers_one_refetch() {
        let dir = TempDir::new().unwrap();
        let cache = CalendarCache::new(dir.path(), MockSource::new(false));
        let ttl = Duration::minutes(60);

        cache.get_at("work", ttl, now()).await.unwrap();
        cache
            .get_at("work", ttl, now() + Duration::minutes(70))
            .await
            .unwrap();
        // The replacement entry is fresh again at +80min
        cache
            .get_at("work", ttl, now() + Duration::minutes(80))
            .await
            .unwrap();

        assert_eq!(cache.source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces_as_source_unavailable() {
        let dir = TempDir::new().unwrap();
        let cache = CalendarCache::new(dir.path(), MockSource::new(true));

        let result = cache.get_at("work", Duration::minutes(60), now()).await;
        assert!(matches!(
            result,
            Err(InkCalError::SourceUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_stale_entry_is_not_substituted_on_fetch_failure() {
        let dir = TempDir::new().unwrap();
        let ttl = Duration::minutes(60);

        // Seed the cache with a working source
        let cache = CalendarCache::new(dir.path(), MockSource::new(false));
        cache.get_at("work", ttl, now()).await.unwrap();

        // Same directory, now the source is down and the entry is stale
        let cache = CalendarCache::new(dir.path(), MockSource::new(true));
        let result = cache
            .get_at("work", ttl, now() + Duration::minutes(90))
            .await;

        assert!(matches!(
            result,
            Err(InkCalError::SourceUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_a_miss_not_an_error() {
        let dir = TempDir::new().unwrap();
        let cache = CalendarCache::new(dir.path(), MockSource::new(false));

        fs::create_dir_all(dir.path()).unwrap();
        fs::write(cache.entry_path("work"), b"{ not json").unwrap();

        let events = cache
            .get_at("work", Duration::minutes(60), now())
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(cache.source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_feed_surfaces_as_source_unavailable() {
        struct GarbageSource;
        impl EventSource for GarbageSource {
            fn fetch(&self, _: &str) -> impl Future<Output = InkCalResult<String>> + Send {
                async { Ok("hello world".to_string()) }
            }
        }

        let dir = TempDir::new().unwrap();
        let cache = CalendarCache::new(dir.path(), GarbageSource);

        let result = cache.get_at("work", Duration::minutes(60), now()).await;
        assert!(matches!(
            result,
            Err(InkCalError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_entry_path_is_stable_per_identifier() {
        let dir = TempDir::new().unwrap();
        let cache = CalendarCache::new(dir.path(), MockSource::new(false));

        assert_eq!(cache.entry_path("work"), cache.entry_path("work"));
        assert_ne!(cache.entry_path("work"), cache.entry_path("home"));
    }
}
