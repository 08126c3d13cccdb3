mod cli;
mod error;
mod manifest;
mod repository;
mod resolver;
mod scanner;
mod utils;
mod version;
mod workflow;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use std::process;
use std::time::Duration;
use workflow::CheckOptions;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let options = CheckOptions {
        jobs: usize::from(cli.jobs),
        timeout: Duration::from_secs(cli.timeout),
        format: cli.format,
        show_progress: !cli.verbose,
    };

    if let Err(e) = workflow::execute_check(&cli.path, &options) {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(1);
    }
}
