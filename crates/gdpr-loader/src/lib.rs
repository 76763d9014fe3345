//! GDPR CSV Loader
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Loads the three GDPR datasets (regulation text, enforcement decisions and
//! question/answer pairs) from CSV into pre-provisioned PostgreSQL tables.
//!
//! Each CSV field is coerced to its column type (integer, text, exact
//! decimal, date). A field that cannot be coerced becomes `NULL` (or `""` for
//! text) instead of rejecting the row. Rows are inserted with multi-row
//! `INSERT` statements of bounded size, one transaction per table.
//!
//! # Example
//!
//! ```no_run
//! use gdpr_loader::{config::Config, runner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let summary = runner::run(&config).await?;
//!     println!("loaded {} rows", summary.total_rows());
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod binding;
pub mod coerce;
pub mod config;
pub mod error;
pub mod loader;
pub mod mapper;
pub mod runner;
pub mod sink;
pub mod source;
pub mod value;

pub use error::{LoadError, Result};
