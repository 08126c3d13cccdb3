use crate::error::Result;
use crate::manifest::yaml::{self, lenient_string, null_as_default};
use crate::manifest::{ChartReference, ManifestExtractor};
use serde::Deserialize;

/// Subchart dependencies declared in a Helm `Chart.yaml`.
///
/// Only dependencies served from an HTTP(S) repository are reported; `file://`
/// paths and `@alias` repositories have no index to check against.
pub struct HelmChartExtractor;

#[derive(Debug, Default, Deserialize)]
struct HelmChart {
    #[serde(default, deserialize_with = "null_as_default")]
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    #[serde(default, deserialize_with = "lenient_string")]
    name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    repository: String,
    #[serde(default, deserialize_with = "lenient_string")]
    version: String,
}

fn is_http_repository(repository: &str) -> bool {
    repository.starts_with("http://") || repository.starts_with("https://")
}

impl ManifestExtractor for HelmChartExtractor {
    fn extract(&self, source: &str) -> Result<Vec<ChartReference>> {
        let chart: HelmChart = yaml::document(source)?;

        Ok(chart
            .dependencies
            .into_iter()
            .filter(|d| is_http_repository(&d.repository))
            .filter_map(|d| ChartReference::new(d.repository, d.name, d.version))
            .collect())
    }
}
