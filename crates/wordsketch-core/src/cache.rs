//! Offline cache for the active word set and in-progress drawings.
//!
//! Entries are JSON values in a [`KeyValueStore`], stamped with the time they
//! were written. Reads past the entry's time-to-live behave as if the entry
//! were absent and remove it. Read failures (I/O, corrupt JSON) are logged and
//! also reported as absent, so a broken cache never blocks drawing.

use crate::storage::{KeyValueStore, StorageError, StorageResult};
use crate::stroke::{Stroke, sanitize_strokes};
use crate::word_set::WordSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Key of the cached active word set.
pub const ACTIVE_WORD_SET_KEY: &str = "activeWordSet";

/// Prefix of per-word drawing progress keys.
pub const PROGRESS_KEY_PREFIX: &str = "drawing_progress_";

/// How long a cached word set stays usable.
pub const DEFAULT_WORD_SET_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// How long saved drawing progress stays usable.
pub const DEFAULT_PROGRESS_TTL: Duration = Duration::from_secs(60 * 60);

/// Storage key for a word's drawing progress.
pub fn progress_key(word_id: u32) -> String {
    format!("{PROGRESS_KEY_PREFIX}{word_id}")
}

/// Source of wall-clock time in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    pub fn new(millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(millis),
        }
    }

    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.millis.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// Maximum age of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub max_age: Duration,
    /// Whether an entry exactly `max_age` old is still fresh.
    pub inclusive: bool,
}

impl TtlPolicy {
    /// Entries are fresh while younger than `max_age`.
    pub fn new(max_age: Duration) -> Self {
        Self {
            max_age,
            inclusive: false,
        }
    }

    /// Entries are fresh up to and including `max_age`.
    pub fn inclusive(max_age: Duration) -> Self {
        Self {
            max_age,
            inclusive: true,
        }
    }

    /// Policy of the cached active word set, served until it is more than a day old.
    pub fn word_set() -> Self {
        Self::inclusive(DEFAULT_WORD_SET_TTL)
    }

    /// Policy of saved drawing progress, served while under an hour old.
    pub fn progress() -> Self {
        Self::new(DEFAULT_PROGRESS_TTL)
    }

    /// Check the age of an entry written at `written_at`.
    ///
    /// Entries stamped in the future count as fresh.
    pub fn is_fresh(&self, written_at: u64, now: u64) -> bool {
        let age = u128::from(now.saturating_sub(written_at));
        let max_age = self.max_age.as_millis();
        if self.inclusive {
            age <= max_age
        } else {
            age < max_age
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedWordSet {
    #[serde(flatten)]
    word_set: WordSet,
    #[serde(rename = "cachedAt")]
    cached_at: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedProgress {
    strokes: Vec<Stroke>,
    #[serde(rename = "savedAt")]
    saved_at: u64,
}

/// Typed, expiring view over a [`KeyValueStore`].
pub struct OfflineCache<S, C = SystemClock> {
    store: S,
    clock: C,
    word_set_ttl: TtlPolicy,
    progress_ttl: TtlPolicy,
}

impl<S: KeyValueStore> OfflineCache<S, SystemClock> {
    /// Cache with the system clock and default TTLs.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> OfflineCache<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            word_set_ttl: TtlPolicy::word_set(),
            progress_ttl: TtlPolicy::progress(),
        }
    }

    /// Override both time-to-live policies.
    pub fn with_ttls(mut self, word_set: TtlPolicy, progress: TtlPolicy) -> Self {
        self.word_set_ttl = word_set;
        self.progress_ttl = progress;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Cache the active word set, stamped with the current time.
    pub async fn cache_word_set(&self, word_set: &WordSet) -> StorageResult<()> {
        let entry = CachedWordSet {
            word_set: word_set.clone(),
            cached_at: self.clock.now_millis(),
        };
        self.write(ACTIVE_WORD_SET_KEY, &entry).await
    }

    /// The cached word set, if present and not expired.
    pub async fn cached_word_set(&self) -> Option<WordSet> {
        let entry: CachedWordSet = self.read(ACTIVE_WORD_SET_KEY).await?;
        if !self.word_set_ttl.is_fresh(entry.cached_at, self.clock.now_millis()) {
            log::debug!("Cached word set {} expired", entry.word_set.id);
            self.discard(ACTIVE_WORD_SET_KEY).await;
            return None;
        }
        let mut word_set = entry.word_set;
        word_set.sort_items();
        Some(word_set)
    }

    pub async fn clear_word_set(&self) -> StorageResult<()> {
        self.store.remove(ACTIVE_WORD_SET_KEY).await
    }

    /// Save the committed strokes of the drawing for `word_id`.
    pub async fn save_progress(&self, word_id: u32, strokes: &[Stroke]) -> StorageResult<()> {
        let entry = SavedProgress {
            strokes: strokes.to_vec(),
            saved_at: self.clock.now_millis(),
        };
        self.write(&progress_key(word_id), &entry).await
    }

    /// Saved strokes for `word_id`, if present and recent. Invalid strokes are dropped.
    pub async fn load_progress(&self, word_id: u32) -> Option<Vec<Stroke>> {
        let key = progress_key(word_id);
        let entry: SavedProgress = self.read(&key).await?;
        if !self.progress_ttl.is_fresh(entry.saved_at, self.clock.now_millis()) {
            log::debug!("Drawing progress for word {word_id} expired");
            self.discard(&key).await;
            return None;
        }
        Some(sanitize_strokes(entry.strokes))
    }

    pub async fn clear_progress(&self, word_id: u32) -> StorageResult<()> {
        self.store.remove(&progress_key(word_id)).await
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(key, json).await
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = match self.store.get(key).await {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read cache entry {key}: {e}");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Discarding corrupt cache entry {key}: {e}");
                self.discard(key).await;
                None
            }
        }
    }

    async fn discard(&self, key: &str) {
        if let Err(e) = self.store.remove(key).await {
            log::warn!("Failed to remove cache entry {key}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_util::block_on;
    use crate::storage::{FileStore, MemoryStore};
    use crate::word_set::WordItem;
    use kurbo::Point;
    use std::sync::Arc;

    const HOUR: Duration = Duration::from_secs(60 * 60);

    fn week() -> WordSet {
        WordSet::new(7, "Week 7", vec![WordItem::new("cat", 1), WordItem::new("dog", 2)])
    }

    fn stroke() -> Stroke {
        let points = vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        Stroke::from_points("#ff0000", 4.0, points)
    }

    fn setup() -> (OfflineCache<MemoryStore, Arc<ManualClock>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        (OfflineCache::with_clock(MemoryStore::new(), Arc::clone(&clock)), clock)
    }

    #[test]
    fn test_ttl_policy() {
        let ttl = TtlPolicy::new(Duration::from_millis(100));
        assert!(ttl.is_fresh(1000, 1099));
        assert!(!ttl.is_fresh(1000, 1100));
        assert!(ttl.is_fresh(2000, 1000));

        let ttl = TtlPolicy::inclusive(Duration::from_millis(100));
        assert!(ttl.is_fresh(1000, 1100));
        assert!(!ttl.is_fresh(1000, 1101));
    }

    #[test]
    fn test_word_set_roundtrip() {
        let (cache, clock) = setup();
        block_on(cache.cache_word_set(&week())).unwrap();

        clock.advance(23 * HOUR);
        assert_eq!(block_on(cache.cached_word_set()), Some(week()));
    }

    #[test]
    fn test_word_set_expires_after_a_day() {
        let (cache, clock) = setup();
        block_on(cache.cache_word_set(&week())).unwrap();

        // still served at exactly a day old
        clock.advance(24 * HOUR);
        assert_eq!(block_on(cache.cached_word_set()), Some(week()));

        clock.advance(Duration::from_millis(1));
        assert!(block_on(cache.cached_word_set()).is_none());
        assert!(block_on(cache.store().get(ACTIVE_WORD_SET_KEY)).unwrap().is_none());
    }

    #[test]
    fn test_word_set_entry_format() {
        let (cache, _clock) = setup();
        block_on(cache.cache_word_set(&week())).unwrap();

        let json = block_on(cache.store().get(ACTIVE_WORD_SET_KEY)).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["cachedAt"], 1_000_000);
        assert_eq!(value["items"][0]["word"], "cat");
    }

    #[test]
    fn test_progress_expires_after_an_hour() {
        let (cache, clock) = setup();
        block_on(cache.save_progress(3, &[stroke()])).unwrap();

        clock.advance(HOUR - Duration::from_millis(1));
        assert_eq!(block_on(cache.load_progress(3)), Some(vec![stroke()]));

        clock.advance(Duration::from_millis(1));
        assert!(block_on(cache.load_progress(3)).is_none());
    }

    #[test]
    fn test_progress_is_per_word() {
        let (cache, _clock) = setup();
        block_on(cache.save_progress(1, &[stroke()])).unwrap();

        assert!(block_on(cache.load_progress(2)).is_none());
        block_on(cache.clear_progress(1)).unwrap();
        assert!(block_on(cache.load_progress(1)).is_none());
    }

    #[test]
    fn test_corrupt_entry_is_absent() {
        let (cache, _clock) = setup();
        block_on(cache.store().set(&progress_key(5), "{not json".to_string())).unwrap();

        assert!(block_on(cache.load_progress(5)).is_none());
        assert!(block_on(cache.store().get(&progress_key(5))).unwrap().is_none());
    }

    #[test]
    fn test_progress_through_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(0));
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        let cache = OfflineCache::with_clock(store, Arc::clone(&clock));

        block_on(cache.save_progress(9, &[stroke()])).unwrap();
        assert!(dir.path().join("drawing_progress_9.json").exists());
        assert_eq!(block_on(cache.load_progress(9)), Some(vec![stroke()]));
    }
}
