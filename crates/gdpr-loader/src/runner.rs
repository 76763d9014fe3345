//! Run coordination
//!
//! Checks inputs, opens a single connection, loads the three tables strictly
//! in order and always closes the connection.

use sqlx::{ConnectOptions, Connection, PgConnection};
use tracing::{info, warn};

use crate::config::{Config, SourcePaths};
use crate::error::{LoadError, Result};
use crate::loader::{load_table, LoadStats};

/// Per-table results of a successful run, in load order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub tables: Vec<LoadStats>,
}

impl RunSummary {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

/// Fail on the first configured source file that does not exist.
pub fn ensure_sources_exist(sources: &SourcePaths) -> Result<()> {
    for (_, path) in sources.bindings() {
        if !path.exists() {
            return Err(LoadError::MissingFile(path.to_path_buf()));
        }
    }
    Ok(())
}

/// Load every table.
///
/// Source files are checked before any connection is opened. Each table is
/// committed on its own, so a failure leaves earlier tables in place and
/// skips the remaining ones.
pub async fn run(config: &Config) -> Result<RunSummary> {
    ensure_sources_exist(&config.sources)?;

    info!(
        host = %config.database.host,
        port = config.database.port,
        db = %config.database.dbname,
        "Connecting to Postgres"
    );
    let mut conn = config.database.connect_options().connect().await?;
    info!("Connected");

    let result = load_all(&mut conn, config).await;

    if let Err(err) = conn.close().await {
        warn!(error = %err, "Failed to close connection cleanly");
    }
    info!("Connection closed");

    result
}

async fn load_all(conn: &mut PgConnection, config: &Config) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for (binding, path) in config.sources.bindings() {
        let stats = load_table(conn, binding, path, config.batch_size).await?;
        summary.tables.push(stats);
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sources(dir: &std::path::Path) -> SourcePaths {
        SourcePaths {
            gdpr_text: dir.join("gdpr_text.csv"),
            gdpr_violations: dir.join("violations.csv"),
            gdpr_dataset: dir.join("dataset.csv"),
        }
    }

    #[test]
    fn test_all_sources_present() {
        let dir = tempfile::tempdir().unwrap();
        let paths = sources(dir.path());
        for (_, path) in paths.bindings() {
            std::fs::write(path, "a\n").unwrap();
        }

        assert!(ensure_sources_exist(&paths).is_ok());
    }

    #[test]
    fn test_reports_first_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let paths = sources(dir.path());
        std::fs::write(&paths.gdpr_text, "a\n").unwrap();

        match ensure_sources_exist(&paths) {
            Err(LoadError::MissingFile(path)) => assert_eq!(path, paths.gdpr_violations),
            other => panic!("expected missing file, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_fails_before_connecting_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::from_lookup(|_| None).unwrap();
        config.sources = sources(dir.path());
        // Nothing listens here; reaching the connect step would yield a
        // database error instead.
        config.database.port = 1;

        let err = run(&config).await.unwrap_err();
        assert!(matches!(err, LoadError::MissingFile(p) if p == dir.path().join("gdpr_text.csv")));
    }

    #[test]
    fn test_summary_total_rows() {
        let summary = RunSummary {
            tables: vec![
                LoadStats {
                    table: "gdpr_text",
                    rows: 3,
                    batches: 1,
                },
                LoadStats {
                    table: "GDPR_dataset",
                    rows: 4,
                    batches: 2,
                },
            ],
        };
        assert_eq!(summary.total_rows(), 7);
    }
}
