use crate::error::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub mod chart;
pub mod devspace;
pub mod helmfile;
pub mod skaffold;
pub mod yaml;

pub use chart::HelmChartExtractor;
pub use devspace::DevSpaceExtractor;
pub use helmfile::HelmfileExtractor;
pub use skaffold::SkaffoldExtractor;

/// A chart pinned to a version in some manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ChartReference {
    /// Manifest that declared the chart. Empty until the scanner tags it.
    pub path: PathBuf,
    pub repository: String,
    pub name: String,
    pub version: String,
}

impl ChartReference {
    /// Returns `None` when the reference cannot be resolved against a
    /// repository index, i.e. the repository or version is missing.
    pub fn new(
        repository: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Option<Self> {
        let repository = repository.into();
        let version = version.into();
        if repository.is_empty() || version.is_empty() {
            return None;
        }

        Some(Self {
            path: PathBuf::new(),
            repository,
            name: name.into(),
            version,
        })
    }

    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }
}

/// Turns the raw text of one manifest dialect into chart references.
pub trait ManifestExtractor: Send + Sync {
    fn extract(&self, source: &str) -> Result<Vec<ChartReference>>;
}

/// Maps manifest file names to the extractor that understands them.
pub struct ExtractorRegistry {
    extractors: HashMap<&'static str, Box<dyn ManifestExtractor>>,
}

impl ExtractorRegistry {
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    pub fn register(&mut self, file_name: &'static str, extractor: Box<dyn ManifestExtractor>) {
        self.extractors.insert(file_name, extractor);
    }

    /// File names are matched exactly and case-sensitively.
    pub fn get(&self, file_name: &str) -> Option<&dyn ManifestExtractor> {
        self.extractors.get(file_name).map(|e| e.as_ref())
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("Chart.yaml", Box::new(HelmChartExtractor));
        registry.register("helmfile.yaml", Box::new(HelmfileExtractor));
        registry.register("skaffold.yaml", Box::new(SkaffoldExtractor));
        registry.register("devspace.yaml", Box::new(DevSpaceExtractor));
        registry
    }
}
