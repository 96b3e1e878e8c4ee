//! Release-list cache.
//!
//! Every build starts by asking the release API for the recent tags. CI runs
//! the pipeline repeatedly against the same repository, so the fetched list is
//! cached on disk and reused while fresh. The network fetch is the only thing
//! the cache removes; everything downstream of it always runs.
//!
//! # Design
//!
//! The cache is a single JSON manifest at `.docshelf/releases.json`:
//!
//! - **`key`**: SHA-256 over `(api_base, repo, count)`. A config change that
//!   alters what would be fetched produces a different key, and a mismatched
//!   key is treated as a miss.
//! - **`fetched_at`**: unix seconds of the fetch. An entry older than
//!   `releases.cache_ttl_secs` is stale and refetched.
//!
//! A corrupt, unreadable, or version-mismatched manifest is never an error,
//! it is simply a miss. Writes are best-effort: a build on a read-only
//! checkout still works, it just refetches next time.
//!
//! ## Bypassing the cache
//!
//! Pass `--no-cache` to the `build` command to ignore any cached list and
//! fetch fresh. The fresh result still gets written back.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Name of the cache manifest file within the cache directory.
const MANIFEST_FILENAME: &str = "releases.json";

/// Version of the cache manifest format. Bump this to invalidate all
/// existing caches when the format or key computation changes.
const MANIFEST_VERSION: u32 = 1;

/// On-disk cache manifest holding one fetched release list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseCache {
    pub version: u32,
    /// Content key over the fetch parameters, see [`cache_key`].
    pub key: String,
    /// Unix seconds when the list was fetched.
    pub fetched_at: u64,
    /// Tags exactly as the API returned them, newest first.
    pub tags: Vec<String>,
}

impl ReleaseCache {
    pub fn new(key: String, tags: Vec<String>) -> Self {
        Self {
            version: MANIFEST_VERSION,
            key,
            fetched_at: now_unix(),
            tags,
        }
    }

    /// True when this entry can stand in for a fresh fetch with the given key.
    pub fn is_fresh(&self, key: &str, ttl_secs: u64, now: u64) -> bool {
        self.version == MANIFEST_VERSION
            && self.key == key
            && now.saturating_sub(self.fetched_at) < ttl_secs
    }
}

/// Content key over the fetch parameters.
pub fn cache_key(api_base: &str, repo: &str, count: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_base.as_bytes());
    hasher.update(b"|");
    hasher.update(repo.as_bytes());
    hasher.update(b"|");
    hasher.update(count.to_le_bytes());
    format!("{:x}", hasher.finalize())
}

/// Load the cache manifest from a cache directory.
///
/// Any failure (missing file, unreadable, unparsable) is a miss, not an error.
pub fn load(cache_dir: &Path) -> Option<ReleaseCache> {
    let content = std::fs::read_to_string(manifest_path(cache_dir)).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write the cache manifest, best-effort.
pub fn save(cache_dir: &Path, cache: &ReleaseCache) {
    let Ok(content) = serde_json::to_string_pretty(cache) else {
        return;
    };
    if std::fs::create_dir_all(cache_dir).is_err() {
        return;
    }
    let _ = std::fs::write(manifest_path(cache_dir), content);
}

/// Path of the manifest file within a cache directory.
pub fn manifest_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(MANIFEST_FILENAME)
}

/// Current unix time in seconds.
pub fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_cache(key: &str) -> ReleaseCache {
        ReleaseCache::new(key.to_string(), vec!["v3.0.0".into(), "v2.4.7".into()])
    }

    #[test]
    fn roundtrip_through_disk() {
        let tmp = TempDir::new().unwrap();
        let cache = sample_cache("abc");
        save(tmp.path(), &cache);
        assert_eq!(load(tmp.path()), Some(cache));
    }

    #[test]
    fn missing_manifest_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(load(tmp.path()), None);
    }

    #[test]
    fn corrupt_manifest_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(manifest_path(tmp.path()), "{not json").unwrap();
        assert_eq!(load(tmp.path()), None);
    }

    #[test]
    fn fresh_within_ttl() {
        let cache = sample_cache("k");
        let now = cache.fetched_at + 100;
        assert!(cache.is_fresh("k", 900, now));
    }

    #[test]
    fn stale_after_ttl() {
        let cache = sample_cache("k");
        let now = cache.fetched_at + 901;
        assert!(!cache.is_fresh("k", 900, now));
    }

    #[test]
    fn key_mismatch_is_stale() {
        let cache = sample_cache("k");
        let now = cache.fetched_at + 1;
        assert!(!cache.is_fresh("other", 900, now));
    }

    #[test]
    fn version_mismatch_is_stale() {
        let mut cache = sample_cache("k");
        cache.version = MANIFEST_VERSION + 1;
        let now = cache.fetched_at;
        assert!(!cache.is_fresh("k", 900, now));
    }

    #[test]
    fn cache_key_depends_on_every_parameter() {
        let base = cache_key("https://api.github.com", "acme/widgets", 3);
        assert_ne!(base, cache_key("https://api.example.com", "acme/widgets", 3));
        assert_ne!(base, cache_key("https://api.github.com", "acme/gadgets", 3));
        assert_ne!(base, cache_key("https://api.github.com", "acme/widgets", 4));
    }
}
