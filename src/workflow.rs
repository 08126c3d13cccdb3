use crate::cli::OutputFormat;
use crate::error::{CheckerError, Result};
use crate::repository::{HttpFetcher, IndexFetcher};
use crate::resolver::{ChartResolver, ChartStatus};
use crate::scanner::ManifestScanner;
use crate::utils::PathValidator;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub jobs: usize,
    pub timeout: Duration,
    pub format: OutputFormat,
    pub show_progress: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            timeout: Duration::from_secs(30),
            format: OutputFormat::Text,
            show_progress: false,
        }
    }
}

/// Execute the check workflow and print outdated charts to stdout
pub fn execute_check<P: AsRef<Path>>(project_path: P, options: &CheckOptions) -> Result<()> {
    let root = PathValidator::validate_root_path(project_path)?;
    let fetcher = Arc::new(HttpFetcher::new(options.timeout)?);

    let report = check(&root, fetcher, options)?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(report.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|source| CheckerError::Io {
            path: "<stdout>".into(),
            source,
        })
}

/// Scan `root`, resolve every chart found and render the outdated ones.
pub fn check(root: &Path, fetcher: Arc<dyn IndexFetcher>, options: &CheckOptions) -> Result<String> {
    let charts = ManifestScanner::default().scan(root)?;
    log::debug!("Found {} chart references under {}", charts.len(), root.display());

    let statuses = ChartResolver::new(fetcher)
        .with_jobs(options.jobs)
        .with_progress(options.show_progress)
        .resolve(&charts)?;

    render_report(&statuses, options.format)
}

pub fn render_report(statuses: &[ChartStatus], format: OutputFormat) -> Result<String> {
    let outdated: Vec<&ChartStatus> = statuses.iter().filter(|s| s.is_outdated()).collect();

    match format {
        OutputFormat::Text => Ok(outdated.into_iter().map(report_line).collect()),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&outdated)?;
            out.push('\n');
            Ok(out)
        }
    }
}

fn report_line(status: &ChartStatus) -> String {
    let chart = &status.chart;
    format!(
        "{}: {} {} {} -> {}\n",
        chart.path.display(),
        chart.repository,
        chart.name,
        chart.version,
        status.latest
    )
}
