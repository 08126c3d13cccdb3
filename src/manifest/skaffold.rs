use crate::error::Result;
use crate::manifest::yaml::{self, lenient_string, null_as_default};
use crate::manifest::{ChartReference, ManifestExtractor};
use serde::Deserialize;

/// Remote Helm releases of a `skaffold.yaml`.
///
/// Releases may sit under `deploy.helm` or `manifests.helm`. Every document
/// of a multi-config file contributes its releases.
pub struct SkaffoldExtractor;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SkaffoldConfig {
    #[serde(deserialize_with = "null_as_default")]
    manifests: Section,
    #[serde(deserialize_with = "null_as_default")]
    deploy: Section,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Section {
    #[serde(deserialize_with = "null_as_default")]
    helm: Helm,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Helm {
    #[serde(deserialize_with = "null_as_default")]
    releases: Vec<Release>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Release {
    #[serde(deserialize_with = "lenient_string")]
    repo: String,
    #[serde(deserialize_with = "lenient_string")]
    remote_chart: String,
    #[serde(deserialize_with = "lenient_string")]
    version: String,
}

impl ManifestExtractor for SkaffoldExtractor {
    fn extract(&self, source: &str) -> Result<Vec<ChartReference>> {
        let mut charts = Vec::new();

        for config in yaml::documents::<SkaffoldConfig>(source)? {
            let releases = config
                .deploy
                .helm
                .releases
                .into_iter()
                .chain(config.manifests.helm.releases);

            charts.extend(
                releases
                    .filter(|r| !r.remote_chart.is_empty())
                    .filter_map(|r| ChartReference::new(r.repo, r.remote_chart, r.version)),
            );
        }

        Ok(charts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_deploy_then_manifests_releases() {
        let source = r#"
apiVersion: skaffold/v4beta6
kind: Config
manifests:
  helm:
    releases:
      - name: ingress
        repo: https://kubernetes.github.io/ingress-nginx
        remoteChart: ingress-nginx
        version: 4.7.1
deploy:
  helm:
    releases:
      - name: db
        repo: https://charts.example.com
        remoteChart: postgresql
        version: 12.1.0
      - name: app
        chartPath: ./charts/app
"#;

        let charts = SkaffoldExtractor.extract(source).unwrap();
        let names: Vec<&str> = charts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["postgresql", "ingress-nginx"]);
    }

    #[test]
    fn accumulates_across_documents() {
        let source = r#"
deploy:
  helm:
    releases:
      - repo: https://a.example.test
        remoteChart: first
        version: 1.0.0
---
manifests:
  helm:
    releases:
      - repo: https://b.example.test
        remoteChart: second
        version: 2.0.0
---
apiVersion: skaffold/v4beta6
"#;

        let charts = SkaffoldExtractor.extract(source).unwrap();
        assert_eq!(
            charts,
            vec![
                ChartReference::new("https://a.example.test", "first", "1.0.0").unwrap(),
                ChartReference::new("https://b.example.test", "second", "2.0.0").unwrap(),
            ]
        );
    }

    #[test]
    fn drops_releases_without_repo_or_version() {
        let source = r#"
deploy:
  helm:
    releases:
      - remoteChart: no-repo
        version: 1.0.0
      - repo: https://example.test
        remoteChart: no-version
"#;
        assert!(SkaffoldExtractor.extract(source).unwrap().is_empty());
    }
}
