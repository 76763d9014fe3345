//! Row mapping: CSV records -> typed row tuples

use crate::binding::TableBinding;
use crate::error::{LoadError, Result};
use crate::source::SourceTable;
use crate::value::Row;

/// Required source fields absent from `headers`, in binding order
pub fn missing_columns(binding: &TableBinding, headers: &[String]) -> Vec<String> {
    binding
        .required_fields()
        .filter(|field| !headers.iter().any(|h| h == field))
        .map(str::to_string)
        .collect()
}

/// Resolve each binding column to its header position, or fail with the full
/// list of missing fields.
pub fn resolve_columns(binding: &TableBinding, source: &SourceTable) -> Result<Vec<usize>> {
    let missing = missing_columns(binding, source.headers());
    if !missing.is_empty() {
        return Err(LoadError::SchemaMismatch {
            table: binding.table,
            missing,
        });
    }

    Ok(binding
        .columns
        .iter()
        .filter_map(|c| source.column_index(c.source))
        .collect())
}

/// Validate the header, then coerce every record in file order.
pub fn map_rows(binding: &TableBinding, source: &SourceTable) -> Result<Vec<Row>> {
    let positions = resolve_columns(binding, source)?;

    let rows = source
        .records()
        .map(|record| {
            Row::new(
                binding
                    .columns
                    .iter()
                    .zip(&positions)
                    .map(|(column, &index)| column.kind.coerce(record.field(index)))
                    .collect(),
            )
        })
        .collect();

    Ok(rows)
}
