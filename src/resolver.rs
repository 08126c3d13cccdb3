use crate::error::{CheckerError, Result};
use crate::manifest::ChartReference;
use crate::repository::{self, IndexFetcher, LatestVersions};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Repository URL mapped to the latest versions of its charts. Lives for one
/// run only.
pub type RepositoryCache = HashMap<String, LatestVersions>;

/// A declared chart paired with the latest version its repository offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartStatus {
    #[serde(flatten)]
    pub chart: ChartReference,
    pub latest: String,
}

impl ChartStatus {
    /// Plain string comparison: `1.2` and `1.2.0` count as different.
    pub fn is_outdated(&self) -> bool {
        self.chart.version != self.latest
    }
}

/// Resolves chart references against their repository indexes, fetching
/// each distinct repository exactly once.
pub struct ChartResolver {
    fetcher: Arc<dyn IndexFetcher>,
    jobs: usize,
    show_progress: bool,
}

impl ChartResolver {
    pub fn new(fetcher: Arc<dyn IndexFetcher>) -> Self {
        Self {
            fetcher,
            jobs: 1,
            show_progress: false,
        }
    }

    /// Number of concurrent index fetches. `1` fetches sequentially.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Fetch every distinct repository referenced by `charts`.
    ///
    /// Fetches run in discovery order. With several jobs they run
    /// concurrently, and the failure reported is still the first one in
    /// discovery order.
    pub fn fetch_repositories(&self, charts: &[ChartReference]) -> Result<RepositoryCache> {
        let repositories = distinct_repositories(charts);

        let pb = ProgressBar::new(repositories.len() as u64);
        if !self.show_progress {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  [{bar:40}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        let fetch = |url: &str| {
            pb.set_message(format!("Fetching {url}"));
            let result = repository::fetch_latest_versions(self.fetcher.as_ref(), url);
            pb.inc(1);
            result
        };

        let results: Vec<Result<LatestVersions>> = if self.jobs > 1 {
            let pool = ThreadPoolBuilder::new().num_threads(self.jobs).build()?;
            pool.install(|| repositories.par_iter().map(|url| fetch(*url)).collect())
        } else {
            let mut results = Vec::with_capacity(repositories.len());
            for url in &repositories {
                let result = fetch(*url);
                let failed = result.is_err();
                results.push(result);
                if failed {
                    break;
                }
            }
            results
        };
        pb.finish_and_clear();

        let mut cache = RepositoryCache::with_capacity(repositories.len());
        for (url, result) in repositories.into_iter().zip(results) {
            cache.insert(url.to_string(), result?);
        }
        Ok(cache)
    }

    /// Pair every distinct reference with its latest version.
    ///
    /// A chart missing from its repository's index fails the whole
    /// resolution.
    pub fn resolve(&self, charts: &[ChartReference]) -> Result<Vec<ChartStatus>> {
        let cache = self.fetch_repositories(charts)?;
        lookup_statuses(&cache, charts)
    }
}

fn distinct_repositories(charts: &[ChartReference]) -> Vec<&str> {
    let mut seen = HashSet::new();
    charts
        .iter()
        .map(|c| c.repository.as_str())
        .filter(|url| seen.insert(*url))
        .collect()
}

fn lookup_statuses(cache: &RepositoryCache, charts: &[ChartReference]) -> Result<Vec<ChartStatus>> {
    let mut seen = HashSet::new();
    let mut statuses = Vec::new();

    for chart in charts.iter().filter(|c| seen.insert(*c)) {
        let latest = cache
            .get(&chart.repository)
            .and_then(|versions| versions.get(&chart.name))
            .ok_or_else(|| CheckerError::ChartNotFound {
                name: chart.name.clone(),
                repository: chart.repository.clone(),
            })?;

        statuses.push(ChartStatus {
            chart: chart.clone(),
            latest: latest.clone(),
        });
    }

    Ok(statuses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::tests::StubFetcher;

    const INDEX_A: &str = "entries:\n  app:\n    - version: 1.0.0\n    - version: 1.1.0\n  db:\n    - version: 2.0.0\n";
    const INDEX_B: &str = "entries:\n  cache:\n    - version: 3.0.0\n    - version: 3.1.0-rc.1\n";

    fn chart(repository: &str, name: &str, version: &str) -> ChartReference {
        ChartReference::new(repository, name, version).unwrap()
    }

    fn stub() -> Arc<StubFetcher> {
        Arc::new(
            StubFetcher::default()
                .with("https://a.example.test/index.yaml", INDEX_A)
                .with("https://b.example.test/index.yaml", INDEX_B),
        )
    }

    #[test]
    fn fetches_each_repository_once() {
        let fetcher = stub();
        let charts = vec![
            chart("https://a.example.test", "app", "1.0.0").with_path("/x/Chart.yaml"),
            chart("https://b.example.test", "cache", "3.0.0").with_path("/x/Chart.yaml"),
            chart("https://a.example.test", "db", "2.0.0").with_path("/y/helmfile.yaml"),
        ];

        let statuses = ChartResolver::new(fetcher.clone()).resolve(&charts).unwrap();

        assert_eq!(
            fetcher.requests(),
            vec![
                "https://a.example.test/index.yaml".to_string(),
                "https://b.example.test/index.yaml".to_string(),
            ]
        );
        let outdated: Vec<(&str, &str)> = statuses
            .iter()
            .filter(|s| s.is_outdated())
            .map(|s| (s.chart.name.as_str(), s.latest.as_str()))
            .collect();
        assert_eq!(outdated, vec![("app", "1.1.0")]);
    }

    #[test]
    fn parallel_fetch_matches_sequential() {
        let charts = vec![
            chart("https://a.example.test", "app", "1.0.0"),
            chart("https://b.example.test", "cache", "3.0.0"),
        ];

        let sequential = ChartResolver::new(stub()).resolve(&charts).unwrap();
        let parallel = ChartResolver::new(stub()).with_jobs(4).resolve(&charts).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn chart_missing_from_index_is_an_error() {
        let charts = vec![chart("https://a.example.test", "ghost", "1.0.0")];
        let err = ChartResolver::new(stub()).resolve(&charts).unwrap_err();
        assert!(matches!(err, CheckerError::ChartNotFound { .. }));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn first_failure_in_discovery_order_wins() {
        let charts = vec![
            chart("https://a.example.test", "app", "1.0.0"),
            chart("https://missing-1.example.test", "x", "1.0.0"),
            chart("https://missing-2.example.test", "y", "1.0.0"),
        ];

        for jobs in [1, 3] {
            let err = ChartResolver::new(stub())
                .with_jobs(jobs)
                .resolve(&charts)
                .unwrap_err();
            assert!(err.to_string().contains("missing-1"), "jobs={jobs}: {err}");
        }
    }

    #[test]
    fn sequential_fetch_stops_at_first_failure() {
        let fetcher = stub();
        let charts = vec![
            chart("https://missing.example.test", "x", "1.0.0"),
            chart("https://a.example.test", "app", "1.0.0"),
        ];

        assert!(ChartResolver::new(fetcher.clone()).resolve(&charts).is_err());
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[test]
    fn identical_references_are_reported_once() {
        let charts = vec![
            chart("https://a.example.test", "app", "1.0.0").with_path("/x/Chart.yaml"),
            chart("https://a.example.test", "app", "1.0.0").with_path("/x/Chart.yaml"),
            chart("https://a.example.test", "app", "1.0.0").with_path("/y/Chart.yaml"),
        ];

        let statuses = ChartResolver::new(stub()).resolve(&charts).unwrap();
        assert_eq!(statuses.len(), 2);
    }

    #[test]
    fn version_spelling_differences_are_outdated() {
        let status = ChartStatus {
            chart: chart("https://a.example.test", "app", "1.1"),
            latest: "1.1.0".to_string(),
        };
        assert!(status.is_outdated());
    }
}
