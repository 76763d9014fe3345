//! Configuration management
//!
//! Everything is read once from the environment (and an optional `.env`
//! file) into an immutable [`Config`] that is passed to the runner.

use std::path::{Path, PathBuf};

use anyhow::Context;
use sqlx::postgres::PgConnectOptions;

use crate::batch::DEFAULT_BATCH_SIZE;
use crate::binding::{TableBinding, GDPR_DATASET, GDPR_TEXT, GDPR_VIOLATIONS_DERIVED};

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_PG_HOST: &str = "localhost";
pub const DEFAULT_PG_PORT: u16 = 5432;
pub const DEFAULT_PG_USER: &str = "postgres";
pub const DEFAULT_PG_PASSWORD: &str = "mypwd1";
pub const DEFAULT_PG_DATABASE: &str = "capstone";

pub const DEFAULT_CSV_GDPR_TEXT: &str = "/workspaces/AI-Capstone/gdpr_text.csv";
pub const DEFAULT_CSV_GDPR_VIOLATIONS: &str =
    "/workspaces/AI-Capstone/gdpr_violations_with_derivatives_clean.csv";
pub const DEFAULT_CSV_GDPR_DATASET: &str = "/workspaces/AI-Capstone/GDPRdataset.csv";

/// Loader configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub sources: SourcePaths,
    /// Rows per multi-row insert
    pub batch_size: usize,
}

/// PostgreSQL connection parameters
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("dbname", &self.dbname)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.dbname)
    }
}

/// The three CSV inputs
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub gdpr_text: PathBuf,
    pub gdpr_violations: PathBuf,
    pub gdpr_dataset: PathBuf,
}

impl SourcePaths {
    /// Each table binding with its input file, in load order
    pub fn bindings(&self) -> [(&'static TableBinding, &Path); 3] {
        [
            (&GDPR_TEXT, self.gdpr_text.as_path()),
            (&GDPR_VIOLATIONS_DERIVED, self.gdpr_violations.as_path()),
            (&GDPR_DATASET, self.gdpr_dataset.as_path()),
        ]
    }
}

impl Config {
    /// Load configuration from `.env` (if present) and the environment.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let path = |key: &str, default: &str| PathBuf::from(string(key, default));

        let config = Config {
            database: DatabaseConfig {
                host: string("PGHOST", DEFAULT_PG_HOST),
                port: parse_var(&lookup, "PGPORT")?.unwrap_or(DEFAULT_PG_PORT),
                user: string("PGUSER", DEFAULT_PG_USER),
                password: string("PGPASSWORD", DEFAULT_PG_PASSWORD),
                dbname: string("PGDATABASE", DEFAULT_PG_DATABASE),
            },
            sources: SourcePaths {
                gdpr_text: path("CSV_GDPR_TEXT", DEFAULT_CSV_GDPR_TEXT),
                gdpr_violations: path("CSV_GDPR_VIOLATIONS", DEFAULT_CSV_GDPR_VIOLATIONS),
                gdpr_dataset: path("CSV_GDPR_DATASET", DEFAULT_CSV_GDPR_DATASET),
            },
            batch_size: parse_var(&lookup, "BATCH_SIZE")?.unwrap_or(DEFAULT_BATCH_SIZE),
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.host.trim().is_empty() {
            anyhow::bail!("PGHOST cannot be empty");
        }

        if self.database.port == 0 {
            anyhow::bail!("PGPORT must be greater than 0");
        }

        if self.database.dbname.trim().is_empty() {
            anyhow::bail!("PGDATABASE cannot be empty");
        }

        if self.batch_size == 0 {
            anyhow::bail!("BATCH_SIZE must be greater than 0");
        }

        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> anyhow::Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .with_context(|| format!("{} has an invalid value: '{}'", key, raw))
        })
        .transpose()
}
