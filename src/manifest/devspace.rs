use crate::error::Result;
use crate::manifest::yaml::{self, lenient_string, null_as_default};
use crate::manifest::{ChartReference, ManifestExtractor};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Helm charts of the `deployments` section of a `devspace.yaml`.
pub struct DevSpaceExtractor;

#[derive(Debug, Default, Deserialize)]
struct DevSpaceConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    deployments: BTreeMap<String, Deployment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Deployment {
    #[serde(deserialize_with = "null_as_default")]
    helm: HelmDeployment,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HelmDeployment {
    #[serde(deserialize_with = "null_as_default")]
    chart: ChartDescriptor,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChartDescriptor {
    #[serde(deserialize_with = "lenient_string")]
    name: String,
    #[serde(deserialize_with = "lenient_string")]
    repo: String,
    #[serde(deserialize_with = "lenient_string")]
    version: String,
}

impl ManifestExtractor for DevSpaceExtractor {
    fn extract(&self, source: &str) -> Result<Vec<ChartReference>> {
        let config: DevSpaceConfig = yaml::document(source)?;

        Ok(config
            .deployments
            .into_values()
            .map(|deployment| deployment.helm.chart)
            .filter_map(|chart| ChartReference::new(chart.repo, chart.name, chart.version))
            .collect())
    }
}
