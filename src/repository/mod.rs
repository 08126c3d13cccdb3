use crate::error::{CheckerError, Result};
use crate::version::VersionComparator;
use serde::Deserialize;
use std::collections::HashMap;
use url::Url;

pub mod http;
pub use http::HttpFetcher;

/// File name of a Helm repository index, relative to the repository URL.
pub const INDEX_FILE: &str = "index.yaml";

/// Retrieves raw bytes from a URL.
pub trait IndexFetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

/// Chart name mapped to its latest stable version.
pub type LatestVersions = HashMap<String, String>;

#[derive(Debug, Default, Deserialize)]
struct ChartIndex {
    #[serde(default)]
    entries: HashMap<String, Vec<ChartRelease>>,
}

#[derive(Debug, Deserialize)]
struct ChartRelease {
    #[serde(default, deserialize_with = "crate::manifest::yaml::lenient_string")]
    version: String,
}

/// Build `<repository>/index.yaml`, tolerating a trailing slash on the base.
pub fn index_url(repository: &str) -> Result<Url> {
    let invalid = |reason: String| CheckerError::InvalidUrl {
        url: repository.to_string(),
        reason,
    };

    let mut url = Url::parse(repository).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("URL cannot be a base".to_string()))?
        .pop_if_empty()
        .push(INDEX_FILE);
    Ok(url)
}

/// Fetch a repository's index and reduce it to the latest stable version of
/// every chart it lists.
///
/// Charts with only pre-release versions are left out. A malformed stable
/// version anywhere in the index fails the whole repository.
pub fn fetch_latest_versions(fetcher: &dyn IndexFetcher, repository: &str) -> Result<LatestVersions> {
    let url = index_url(repository)?;
    log::debug!("Fetching {}", url);

    let body = fetcher.fetch(&url)?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(CheckerError::EmptyIndex {
            url: url.to_string(),
        });
    }

    let index: ChartIndex =
        serde_yaml::from_slice(&body).map_err(|source| CheckerError::IndexDecode {
            url: url.to_string(),
            source,
        })?;

    let mut latest = LatestVersions::new();
    for (name, releases) in index.entries {
        let versions: Vec<String> = releases.into_iter().map(|r| r.version).collect();
        if let Some(version) = VersionComparator::get_latest(&versions)? {
            latest.insert(name, version);
        }
    }

    log::debug!("Resolved {} charts from {}", latest.len(), url);
    Ok(latest)
}
