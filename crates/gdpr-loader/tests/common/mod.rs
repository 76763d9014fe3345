//! Shared helpers for PostgreSQL integration tests using testcontainers
//!
//! Every test gets its own container with the three destination tables
//! created, so tests never share state.

#![allow(dead_code)]

use anyhow::{Context, Result};
use gdpr_loader::config::{Config, DatabaseConfig, SourcePaths};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::{Path, PathBuf};
use testcontainers::{core::IntoContainerPort, runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tracing::info;

/// Destination tables, as provisioned in production
pub const SCHEMA: &str = r#"
CREATE TABLE gdpr_text (
    chapter INTEGER,
    chapter_title TEXT,
    article INTEGER,
    article_title TEXT,
    sub_article TEXT,
    gdpr_text TEXT,
    href TEXT
);

CREATE TABLE gdpr_violations_derived (
    id INTEGER,
    picture_path TEXT,
    country_name TEXT,
    fine_price NUMERIC,
    authority TEXT,
    date DATE,
    controller TEXT,
    article_violated TEXT,
    type TEXT,
    source TEXT,
    summary TEXT,
    article_no_der INTEGER,
    sub_article_no_der TEXT
);

CREATE TABLE GDPR_dataset (
    Content TEXT,
    Article_Number INTEGER,
    Article_Name TEXT,
    Chapter_Number INTEGER,
    Chapter_Name TEXT,
    Article_Word_Count INTEGER,
    Question TEXT,
    Answer TEXT,
    Question_Word_Count INTEGER,
    Answer_Word_Count INTEGER
);
"#;

/// Install a test subscriber once; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("gdpr_loader=debug,sqlx=warn")
        .with_test_writer()
        .try_init();
}

/// PostgreSQL container with the destination schema applied
pub struct TestPostgres {
    _container: ContainerAsync<Postgres>,
    pool: PgPool,
    database: DatabaseConfig,
}

impl TestPostgres {
    pub async fn start() -> Result<Self> {
        info!("Starting PostgreSQL test container...");

        let container = Postgres::default()
            .with_tag("16-alpine")
            .start()
            .await
            .context("Failed to start PostgreSQL container")?;

        let host = container
            .get_host()
            .await
            .context("Failed to get container host")?;
        let port = container
            .get_host_port_ipv4(5432.tcp())
            .await
            .context("Failed to get container port")?;

        let database = DatabaseConfig {
            host: host.to_string(),
            port,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            dbname: "postgres".to_string(),
        };

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect_with(database.connect_options())
            .await
            .context("Failed to connect to PostgreSQL")?;

        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .context("Failed to create destination tables")?;

        Ok(Self {
            _container: container,
            pool,
            database,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Loader configuration pointing at this container and the given files
    pub fn config(&self, sources: SourcePaths, batch_size: usize) -> Config {
        Config {
            database: self.database.clone(),
            sources,
            batch_size,
        }
    }

    pub async fn count(&self, table: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

pub const TEXT_CSV: &str = "\
chapter,chapter_title,article,article_title,sub_article,gdpr_text,href
1,General provisions,1,Subject-matter and objectives,1,This Regulation lays down rules,https://gdpr-info.eu/art-1-gdpr/
1,General provisions,2,Material scope,,This Regulation applies,https://gdpr-info.eu/art-2-gdpr/
";

pub const VIOLATIONS_CSV: &str = "\
id,picture,name,price,authority,date,controller,article_violated,type,source,summary,Article_no_der,Sub_article_no_der
1,poland.svg,Poland,\"9,380\",UODO,10/18/2019,Polish Mayor,Art. 28 GDPR,Non-compliance,https://uodo.gov.pl,No processing agreement,28,
2,spain.svg,Spain,\"2,500.75\",AEPD,not-a-date,Xfera Moviles,Art. 6 GDPR,Insufficient legal basis,https://aepd.es,Processing without consent,6,1
";

pub const DATASET_CSV: &str = "\
Content,Article Number,Article Name,Chapter Number,Chapter Name,Article Word Count,Question,Answer,Question Word Count,Answer Word Count
Personal data shall be processed lawfully,5,Principles,2,Principles,420,What are the principles?,Lawfulness and fairness,4,3
Processing shall be lawful only if,6,Lawfulness,2,Principles,n/a,When is processing lawful?,With a legal basis,4,4
Consent must be demonstrable,7,Conditions for consent,2,Principles,210,What about consent?,It must be demonstrable,3,4
";

/// Write the three inputs into `dir` and return their paths
pub fn write_sources(dir: &Path, text: &str, violations: &str, dataset: &str) -> SourcePaths {
    let write = |name: &str, contents: &str| -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("Failed to write CSV fixture");
        path
    };

    SourcePaths {
        gdpr_text: write("gdpr_text.csv", text),
        gdpr_violations: write("gdpr_violations_with_derivatives_clean.csv", violations),
        gdpr_dataset: write("GDPRdataset.csv", dataset),
    }
}
