use crate::error::Result;
use crate::manifest::yaml::{self, lenient_string, null_as_default};
use crate::manifest::{ChartReference, ManifestExtractor};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;

const TEMPLATE_ACTION: &str = r"\{\{.*?\}\}";

/// Releases of a `helmfile.yaml` whose chart is `<repository alias>/<chart>`.
///
/// Go template actions are stripped rather than rendered, so a helmfile that
/// relies on templates to produce its YAML structure fails to decode.
/// Helmfile keeps only the last occurrence of a property, so each document
/// replaces both the alias table and the release list of the one before it.
pub struct HelmfileExtractor;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Helmfile {
    #[serde(deserialize_with = "null_as_default")]
    repositories: Vec<Repository>,
    #[serde(deserialize_with = "null_as_default")]
    releases: Vec<Release>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Repository {
    #[serde(deserialize_with = "lenient_string")]
    name: String,
    #[serde(deserialize_with = "lenient_string")]
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Release {
    #[serde(deserialize_with = "lenient_string")]
    chart: String,
    #[serde(deserialize_with = "lenient_string")]
    version: String,
}

pub fn strip_template_actions(source: &str) -> Result<String> {
    let template = Regex::new(TEMPLATE_ACTION)?;
    Ok(template.replace_all(source, "").into_owned())
}

fn resolve_releases(helmfile: Helmfile) -> Vec<ChartReference> {
    let repositories: HashMap<String, String> = helmfile
        .repositories
        .into_iter()
        .map(|r| (r.name, r.url))
        .collect();

    helmfile
        .releases
        .into_iter()
        .filter_map(|release| {
            let (alias, name) = release.chart.split_once('/')?;
            let url = repositories.get(alias)?;
            ChartReference::new(url.as_str(), name, release.version)
        })
        .collect()
}

impl ManifestExtractor for HelmfileExtractor {
    fn extract(&self, source: &str) -> Result<Vec<ChartReference>> {
        let stripped = strip_template_actions(source)?;
        let documents: Vec<Helmfile> = yaml::documents(&stripped)?;

        Ok(documents
            .into_iter()
            .last()
            .map(resolve_releases)
            .unwrap_or_default())
    }
}
