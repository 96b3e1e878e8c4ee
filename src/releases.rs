//! Release list fetching and latest-version selection.
//!
//! Stage 1 of the build pipeline. Asks the release host for the most recent
//! release tags and decides which of them counts as the published "latest"
//! version: the tag the redirect page will point at.
//!
//! ## API Contract
//!
//! The release host exposes a GitHub-style listing endpoint:
//!
//! ```text
//! GET {api_base}/repos/{owner}/{name}/releases?per_page={count}
//! Accept: application/vnd.github.v3+json
//! ```
//!
//! The response is a JSON array ordered newest-first; only `tag_name` is
//! consumed. The list is transient: fetched (or read from the cache), used
//! for one pipeline run, and discarded.
//!
//! ## Latest Selection
//!
//! The *second*-newest tag (index 1) is the published latest. The newest tag
//! is treated as still in staging and never selected. With fewer than two
//! tags the latest version is undefined and the run fails.
//!
//! ## Failure Behavior
//!
//! Network errors, non-2xx responses, and undecodable bodies are fatal.
//! There is no retry and no partial result.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::cache::{self, ReleaseCache};
use crate::config::ReleasesConfig;

const USER_AGENT: &str = concat!("docshelf/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github.v3+json";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("release API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("found {found} release tag(s); at least 2 are needed to resolve the published latest")]
    LatestUndefined { found: usize },
}

/// One entry of the release listing. Everything but the tag name is ignored.
#[derive(Debug, Deserialize)]
struct ApiRelease {
    tag_name: String,
}

/// Where a resolved tag list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Cache,
    Network,
}

/// Fetch the configured number of recent release tags, newest first.
pub fn fetch_release_tags(
    releases: &ReleasesConfig,
    repo: &str,
) -> Result<Vec<String>, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(HTTP_TIMEOUT)
        .build()?;

    let url = format!(
        "{}/repos/{}/releases",
        releases.api_base.trim_end_matches('/'),
        repo
    );
    let list: Vec<ApiRelease> = client
        .get(&url)
        .header(reqwest::header::ACCEPT, ACCEPT)
        .query(&[("per_page", releases.count.to_string())])
        .send()?
        .error_for_status()?
        .json()?;

    Ok(list.into_iter().map(|r| r.tag_name).collect())
}

/// Resolve the tag list, consulting the on-disk cache first.
///
/// With `use_cache`, a fresh cached list for the same fetch parameters is
/// returned without touching the network. Otherwise the list is fetched and
/// the cache refreshed (best-effort).
pub fn resolve_tags(
    releases: &ReleasesConfig,
    repo: &str,
    cache_dir: &Path,
    use_cache: bool,
) -> Result<(Vec<String>, FetchSource), FetchError> {
    let key = cache::cache_key(&releases.api_base, repo, releases.count);

    if use_cache {
        if let Some(cached) = cache::load(cache_dir) {
            if cached.is_fresh(&key, releases.cache_ttl_secs, cache::now_unix()) {
                return Ok((cached.tags, FetchSource::Cache));
            }
        }
    }

    let tags = fetch_release_tags(releases, repo)?;
    cache::save(cache_dir, &ReleaseCache::new(key, tags.clone()));
    Ok((tags, FetchSource::Network))
}

/// The published latest version: the second-newest fetched tag.
///
/// The newest tag is never selected; it is treated as still in staging.
pub fn select_latest(tags: &[String]) -> Result<&str, FetchError> {
    tags.get(1)
        .map(String::as_str)
        .ok_or(FetchError::LatestUndefined { found: tags.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn latest_is_the_second_newest_tag() {
        let list = tags(&["v3.0.0", "v2.4.7"]);
        assert_eq!(select_latest(&list).unwrap(), "v2.4.7");
    }

    #[test]
    fn latest_ignores_everything_after_index_one() {
        let list = tags(&["v3.1.0", "v3.0.0", "v2.4.7", "v2.4.6"]);
        assert_eq!(select_latest(&list).unwrap(), "v3.0.0");
    }

    #[test]
    fn latest_is_always_a_member_of_the_list() {
        let list = tags(&["v9.9.9", "v1.0.0", "v0.9.0"]);
        let latest = select_latest(&list).unwrap();
        assert!(list.iter().any(|t| t == latest));
    }

    #[test]
    fn empty_list_leaves_latest_undefined() {
        let err = select_latest(&[]).unwrap_err();
        assert!(matches!(err, FetchError::LatestUndefined { found: 0 }));
    }

    #[test]
    fn single_tag_leaves_latest_undefined() {
        let list = tags(&["v3.0.0"]);
        let err = select_latest(&list).unwrap_err();
        assert!(matches!(err, FetchError::LatestUndefined { found: 1 }));
    }

    #[test]
    fn resolve_tags_uses_a_fresh_cache_without_network() {
        let tmp = TempDir::new().unwrap();
        let releases = ReleasesConfig {
            // Unroutable endpoint: any network attempt would error out
            api_base: "http://127.0.0.1:1".to_string(),
            ..ReleasesConfig::default()
        };
        let key = cache::cache_key(&releases.api_base, "acme/widgets", releases.count);
        cache::save(
            tmp.path(),
            &ReleaseCache::new(key, tags(&["v3.0.0", "v2.4.7", "v2.4.6"])),
        );

        let (resolved, source) =
            resolve_tags(&releases, "acme/widgets", tmp.path(), true).unwrap();
        assert_eq!(source, FetchSource::Cache);
        assert_eq!(resolved, tags(&["v3.0.0", "v2.4.7", "v2.4.6"]));
    }

    #[test]
    fn resolve_tags_ignores_cache_for_other_parameters() {
        let tmp = TempDir::new().unwrap();
        let releases = ReleasesConfig {
            api_base: "http://127.0.0.1:1".to_string(),
            ..ReleasesConfig::default()
        };
        let key = cache::cache_key(&releases.api_base, "acme/gadgets", releases.count);
        cache::save(tmp.path(), &ReleaseCache::new(key, tags(&["v1.0.0", "v0.9.0"])));

        // Cached entry is for acme/gadgets; fetching acme/widgets must go to
        // the network, which fails against the unroutable endpoint.
        let result = resolve_tags(&releases, "acme/widgets", tmp.path(), true);
        assert!(matches!(result, Err(FetchError::Http(_))));
    }
}
