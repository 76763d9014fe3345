//! GDPR Loader - load the GDPR CSV datasets into PostgreSQL

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use gdpr_common::logging::{init_logging, LogConfig, LogLevel};
use gdpr_loader::config::Config;
use gdpr_loader::runner;
use gdpr_loader::LoadError;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "gdpr-loader")]
#[command(author, version, about = "Load the GDPR CSV datasets into PostgreSQL")]
#[command(long_about = "Connection settings, CSV paths and the insert batch size are read \
from PGHOST, PGPORT, PGUSER, PGPASSWORD, PGDATABASE, CSV_GDPR_TEXT, CSV_GDPR_VIOLATIONS, \
CSV_GDPR_DATASET and BATCH_SIZE (a .env file is honored).")]
struct Cli {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // `.env` has to be applied before LOG_* is read
    dotenvy::dotenv().ok();

    let (logging, overridden_level) = log_config(cli.verbose, |key| std::env::var(key).ok())?;
    let _log_guard = init_logging(&logging)?;
    if let Some(level) = overridden_level {
        warn!(log_level = %level, "--verbose overrides LOG_LEVEL, logging at debug");
    }

    let config = Config::load()?;

    match runner::run(&config).await {
        Ok(summary) => {
            for table in &summary.tables {
                info!(
                    table = table.table,
                    rows = table.rows,
                    batches = table.batches,
                    "Loaded table"
                );
            }
            info!(rows = summary.total_rows(), "All inserts completed successfully");
            Ok(ExitCode::SUCCESS)
        },
        Err(LoadError::MissingFile(path)) => {
            error!(path = %path.display(), "CSV not found");
            Ok(ExitCode::FAILURE)
        },
        Err(err) => {
            error!(error = %err, "An error occurred, current table rolled back");
            Ok(ExitCode::FAILURE)
        },
    }
}

/// Logging settings from `LOG_*`, raised to debug by `--verbose`.
///
/// Also returns the `LOG_LEVEL` value that `--verbose` replaced, if any.
fn log_config<F>(verbose: bool, lookup: F) -> Result<(LogConfig, Option<String>)>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = LogConfig::from_lookup(&lookup)?;
    let mut overridden = None;

    if verbose {
        if config.level != LogLevel::Debug {
            overridden = lookup("LOG_LEVEL");
        }
        config.level = LogLevel::Debug;
    }

    Ok((config, overridden))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn env(level: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
        move |key| match key {
            "LOG_LEVEL" => level.map(str::to_string),
            _ => None,
        }
    }

    #[test]
    fn test_log_level_from_env_without_verbose() {
        let (config, overridden) = log_config(false, env(Some("warn"))).unwrap();
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(overridden, None);
    }

    #[test]
    fn test_verbose_reports_overridden_log_level() {
        let (config, overridden) = log_config(true, env(Some("warn"))).unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(overridden.as_deref(), Some("warn"));
    }

    #[test]
    fn test_verbose_without_log_level_is_silent() {
        let (config, overridden) = log_config(true, env(None)).unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(overridden, None);
    }

    #[test]
    fn test_verbose_matching_log_level_is_silent() {
        let (_, overridden) = log_config(true, env(Some("debug"))).unwrap();
        assert_eq!(overridden, None);
    }

    #[test]
    fn test_cli_parses_verbose_flag() {
        assert!(Cli::try_parse_from(["gdpr-loader", "-v"]).unwrap().verbose);
        assert!(!Cli::try_parse_from(["gdpr-loader"]).unwrap().verbose);
    }
}
