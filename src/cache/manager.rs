//! In-memory request cache with capacity and age bounds
//!
//! Provides a `RequestCache` that maps request fingerprints to previously
//! received responses. Entries expire lazily once they are older than the
//! configured max age, and the oldest-inserted entry is evicted whenever an
//! insert pushes the cache past its capacity.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::RequestFingerprint;

/// Default maximum number of cached responses
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Default maximum age of a cached response
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(600);

/// A fully read HTTP response as stored in the cache
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    /// HTTP status returned by the upstream
    pub status: StatusCode,
    /// Final URL of the response
    pub url: String,
    /// Response headers as name/value pairs
    pub headers: Vec<(String, String)>,
    /// Raw response body
    pub body: String,
    /// When the response was received
    pub fetched_at: DateTime<Utc>,
}

impl CachedResponse {
    /// Whether the upstream answered with a 2xx status
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decodes the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

/// Counters describing cache activity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found nothing usable (absent or expired)
    pub misses: u64,
    /// Entries dropped because they outlived the max age
    pub expirations: u64,
    /// Entries dropped to stay within capacity
    pub evictions: u64,
    /// Current number of entries
    pub entries: usize,
}

#[derive(Debug)]
struct CacheEntry {
    response: CachedResponse,
    inserted_at: Instant,
    seq: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<RequestFingerprint, CacheEntry>,
    /// Insertion order: sequence number -> key
    order: BTreeMap<u64, RequestFingerprint>,
    next_seq: u64,
    stats: CacheStats,
}

impl CacheState {
    fn remove(&mut self, key: &RequestFingerprint) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.order.remove(&entry.seq);
        Some(entry)
    }
}

/// Thread-safe response cache bounded by entry count and entry age
///
/// All operations take a single lock, so a lookup that finds an expired entry
/// removes it atomically and an insert evicts atomically.
#[derive(Debug)]
pub struct RequestCache {
    state: Mutex<CacheState>,
    max_entries: usize,
    max_age: Duration,
}

impl Default for RequestCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_MAX_AGE)
    }
}

impl RequestCache {
    /// Creates a new cache
    ///
    /// A capacity of zero is raised to one so that a freshly inserted entry
    /// is always retrievable.
    pub fn new(max_entries: usize, max_age: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            max_entries: max_entries.max(1),
            max_age,
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // A panic while holding the lock cannot leave the map half-updated
        // in a way later operations would trip over.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_expired(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) > self.max_age
    }

    /// Looks up a response by fingerprint
    ///
    /// # Returns
    /// * `Some(CachedResponse)` - a copy of the stored response if it is still fresh
    /// * `None` - if nothing is stored, or the stored entry has expired (it is removed)
    pub fn get(&self, key: &RequestFingerprint) -> Option<CachedResponse> {
        let now = Instant::now();
        let mut state = self.lock();

        let expired = state
            .entries
            .get(key)
            .map(|entry| self.is_expired(entry, now));

        match expired {
            None => {
                state.stats.misses += 1;
                None
            }
            Some(true) => {
                state.remove(key);
                state.stats.expirations += 1;
                state.stats.misses += 1;
                None
            }
            Some(false) => {
                state.stats.hits += 1;
                state.entries.get(key).map(|entry| entry.response.clone())
            }
        }
    }

    /// Stores a response under the given fingerprint
    ///
    /// Overwriting an existing key resets its timestamp and moves it to the
    /// newest position. If the cache grows past capacity the oldest-inserted
    /// entries are evicted; the entry just stored is never one of them.
    pub fn set(&self, key: RequestFingerprint, response: CachedResponse) {
        let now = Instant::now();
        let mut state = self.lock();

        state.remove(&key);

        let seq = state.next_seq;
        state.next_seq += 1;
        state.order.insert(seq, key.clone());
        state.entries.insert(
            key,
            CacheEntry {
                response,
                inserted_at: now,
                seq,
            },
        );

        while state.entries.len() > self.max_entries {
            let Some((_, oldest)) = state.order.pop_first() else {
                break;
            };
            state.entries.remove(&oldest);
            state.stats.evictions += 1;
        }
    }

    /// Removes every expired entry and returns how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut state = self.lock();

        let expired: Vec<RequestFingerprint> = state
            .entries
            .iter()
            .filter(|(_, entry)| self.is_expired(entry, now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            state.remove(key);
        }
        state.stats.expirations += expired.len() as u64;
        expired.len()
    }

    /// Drops all entries
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.order.clear();
    }

    /// Number of stored entries, including ones that have expired but were not read yet
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a snapshot of the cache counters
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            entries: state.entries.len(),
            ..state.stats.clone()
        }
    }
}
