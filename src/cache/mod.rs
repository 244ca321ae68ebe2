//! Cache module for de-duplicating API requests
//!
//! This module provides a short-lived, in-memory cache of upstream responses
//! keyed by request fingerprint. It bounds both the number of entries and their
//! age, so repeated identical calls inside the age window never reach the
//! rate-limited upstream.

mod fingerprint;
mod manager;

pub use fingerprint::RequestFingerprint;
pub use manager::{CacheStats, CachedResponse, RequestCache, DEFAULT_MAX_AGE, DEFAULT_MAX_ENTRIES};
