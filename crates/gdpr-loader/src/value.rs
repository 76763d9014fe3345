//! Coerced values and row tuples

use chrono::NaiveDate;
use sqlx::types::BigDecimal;

/// Declared type of a destination column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// PostgreSQL `INTEGER`
    Integer,
    /// PostgreSQL `TEXT`
    Text,
    /// PostgreSQL `NUMERIC`
    Decimal,
    /// PostgreSQL `DATE`
    Date,
}

/// A single coerced field.
///
/// The variant always matches the destination column type, even when the
/// value is absent, so a `NULL` is bound with the right SQL type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(Option<i32>),
    /// Text columns encode "no value" as the empty string, never `NULL`
    Text(String),
    Decimal(Option<BigDecimal>),
    Date(Option<NaiveDate>),
}

impl Value {
    /// True for the `NULL` marker. Empty text is a value, not absent.
    pub fn is_absent(&self) -> bool {
        match self {
            Value::Integer(v) => v.is_none(),
            Value::Text(_) => false,
            Value::Decimal(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
        }
    }
}

/// One destination row, positionally aligned with its table's column order
#[derive(Debug, Clone, PartialEq)]
pub struct Row(Vec<Value>);

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Number of fields that will be stored as `NULL`
    pub fn absent_fields(&self) -> usize {
        self.0.iter().filter(|v| v.is_absent()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_not_absent() {
        assert!(!Value::Text(String::new()).is_absent());
        assert!(Value::Integer(None).is_absent());
        assert!(Value::Date(None).is_absent());
        assert!(!Value::Integer(Some(0)).is_absent());
    }

    #[test]
    fn test_absent_fields_counts_nulls_only() {
        let row = Row::new(vec![
            Value::Integer(None),
            Value::Text(String::new()),
            Value::Decimal(None),
            Value::Date(NaiveDate::from_ymd_opt(2021, 3, 1)),
        ]);
        assert_eq!(row.absent_fields(), 2);
    }
}
