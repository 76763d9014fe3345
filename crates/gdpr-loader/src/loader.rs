//! Table loading
//!
//! One load per destination table: read the CSV, validate its header, coerce
//! every row, then insert in batches inside a single transaction that is
//! committed once all batches succeed.

use std::path::Path;

use sqlx::{Connection, PgConnection};
use tracing::{info, warn};

use crate::batch::{batch_count, chunk};
use crate::binding::TableBinding;
use crate::error::Result;
use crate::mapper::map_rows;
use crate::sink::BatchSink;
use crate::source::SourceTable;
use crate::value::Row;

/// Outcome of loading one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStats {
    pub table: &'static str,
    pub rows: usize,
    pub batches: usize,
}

/// Read `path` and turn it into row tuples for `binding`.
pub fn prepare_rows(binding: &TableBinding, path: &Path) -> Result<Vec<Row>> {
    info!(table = binding.table, path = %path.display(), "Reading CSV");
    let source = SourceTable::from_path(path)?;
    let rows = map_rows(binding, &source)?;
    let absent_fields: usize = rows.iter().map(Row::absent_fields).sum();
    info!(
        table = binding.table,
        rows = rows.len(),
        absent_fields,
        "Rows prepared"
    );
    Ok(rows)
}

/// Batch size actually used for `binding`: `requested`, lowered if it would
/// exceed the bind parameter limit of a single statement.
pub fn effective_batch_size(binding: &TableBinding, requested: usize) -> usize {
    let max = binding.max_rows_per_statement();
    if requested > max {
        warn!(
            table = binding.table,
            requested,
            max,
            "Batch size exceeds the bind parameter limit, lowering it"
        );
        max
    } else {
        requested.max(1)
    }
}

/// Insert `rows` through `sink` in order, one call per batch. Returns the
/// number of batches issued.
pub async fn insert_rows<S>(
    sink: &mut S,
    binding: &TableBinding,
    rows: &[Row],
    batch_size: usize,
) -> Result<usize>
where
    S: BatchSink + ?Sized,
{
    let batch_size = effective_batch_size(binding, batch_size);
    let total_batches = batch_count(rows.len(), batch_size);

    for (batch_idx, batch) in chunk(rows, batch_size).enumerate() {
        info!(
            table = binding.table,
            "Inserting chunk {} / {} ({} rows)",
            batch_idx + 1,
            total_batches,
            batch.len()
        );
        sink.insert_batch(binding, batch).await?;
    }

    Ok(total_batches)
}

/// Read, validate, map and insert one table through `sink`, without any
/// transaction handling.
pub async fn load_into<S>(
    sink: &mut S,
    binding: &TableBinding,
    path: &Path,
    batch_size: usize,
) -> Result<LoadStats>
where
    S: BatchSink + ?Sized,
{
    let rows = prepare_rows(binding, path)?;
    let batches = insert_rows(sink, binding, &rows, batch_size).await?;

    Ok(LoadStats {
        table: binding.table,
        rows: rows.len(),
        batches,
    })
}

/// Load one table in its own transaction.
///
/// Committed only after every batch succeeds; on error the transaction is
/// rolled back before the error is returned. Tables loaded earlier on the same
/// connection keep their commits.
pub async fn load_table(
    conn: &mut PgConnection,
    binding: &TableBinding,
    path: &Path,
    batch_size: usize,
) -> Result<LoadStats> {
    let mut tx = conn.begin().await?;

    match load_into(&mut *tx, binding, path, batch_size).await {
        Ok(stats) => {
            tx.commit().await?;
            info!(
                table = stats.table,
                rows = stats.rows,
                batches = stats.batches,
                "Insert complete"
            );
            Ok(stats)
        },
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(
                    table = binding.table,
                    error = %rollback_err,
                    "Rollback failed"
                );
            }
            Err(err)
        },
    }
}
