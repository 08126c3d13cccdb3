use crate::error::{CheckerError, Result};
use crate::manifest::{ChartReference, ExtractorRegistry};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Walks a directory tree and extracts chart references from every
/// recognised manifest.
pub struct ManifestScanner {
    registry: ExtractorRegistry,
}

impl ManifestScanner {
    pub fn new(registry: ExtractorRegistry) -> Self {
        Self { registry }
    }

    /// Scan `root` recursively. Entries are visited in file name order and
    /// symlinked directories are not followed. The first unreadable
    /// directory, unreadable file or undecodable manifest aborts the scan.
    pub fn scan<P: AsRef<Path>>(&self, root: P) -> Result<Vec<ChartReference>> {
        let mut charts = Vec::new();

        for entry in WalkDir::new(root.as_ref()).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }

            let Some(extractor) = entry.file_name().to_str().and_then(|n| self.registry.get(n))
            else {
                continue;
            };

            let path = entry.path();
            log::debug!("Reading {}", path.display());

            let source = fs::read_to_string(path).map_err(|source| CheckerError::Io {
                path: path.to_path_buf(),
                source,
            })?;

            let found = extractor
                .extract(&source)
                .map_err(|e| CheckerError::Manifest {
                    path: path.to_path_buf(),
                    source: Box::new(e),
                })?;

            log::debug!("Found {} charts in {}", found.len(), path.display());
            charts.extend(found.into_iter().map(|chart| chart.with_path(path)));
        }

        Ok(charts)
    }
}

impl Default for ManifestScanner {
    fn default() -> Self {
        Self::new(ExtractorRegistry::default())
    }
}
