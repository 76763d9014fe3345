//! Bulk insert target
//!
//! [`BatchSink`] is the seam between row preparation and the database. The
//! PostgreSQL implementation issues one multi-row `INSERT` per batch on a
//! `PgConnection`, which is also what a `Transaction` derefs to.

use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, QueryBuilder};

use crate::binding::TableBinding;
use crate::error::Result;
use crate::value::{Row, Value};

/// Receives batches of rows for one table, in order
#[async_trait]
pub trait BatchSink: Send {
    /// Insert every row of `rows` with a single statement
    async fn insert_batch(&mut self, binding: &TableBinding, rows: &[Row]) -> Result<()>;
}

#[async_trait]
impl BatchSink for PgConnection {
    async fn insert_batch(&mut self, binding: &TableBinding, rows: &[Row]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut query_builder = build_insert(binding, rows);
        query_builder.build().execute(&mut *self).await?;

        Ok(())
    }
}

/// `INSERT INTO <table> (<columns>) VALUES (...), (...)` with one bind per cell.
/// Absent values bind as `NULL` of the column's own type.
pub fn build_insert(binding: &TableBinding, rows: &[Row]) -> QueryBuilder<'static, Postgres> {
    let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(binding.insert_prefix());

    query_builder.push_values(rows, |mut b, row| {
        for value in row.values() {
            match value {
                Value::Integer(v) => b.push_bind(*v),
                Value::Text(v) => b.push_bind(v.clone()),
                Value::Decimal(v) => b.push_bind(v.clone()),
                Value::Date(v) => b.push_bind(*v),
            };
        }
    });

    query_builder
}
