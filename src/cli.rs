use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "helm-update-checker",
    about = "Find Helm charts pinned in deployment manifests and report the ones with newer releases",
    version
)]
pub struct Cli {
    /// Directory to scan (defaults to the current directory)
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, env = "HELM_UPDATE_CHECKER_VERBOSE")]
    pub verbose: bool,

    /// Number of repository indexes to fetch concurrently
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// HTTP timeout in seconds for each repository index request
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Output format for outdated charts
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// `<manifest>: <repository> <chart> <version> -> <latest>` per line
    Text,
    /// JSON array of outdated charts
    Json,
}
