//! Static table bindings
//!
//! A binding ties each CSV header to a destination column and its coercer.
//! Column order in a binding is the column order of the `INSERT` statement.

use crate::value::ColumnKind::{self, Date, Decimal, Integer, Text};

/// PostgreSQL's limit on bind parameters in one statement
pub const MAX_BIND_PARAMS: usize = 65_535;

/// One source field -> destination column mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnBinding {
    /// CSV header name
    pub source: &'static str,
    /// Destination column name
    pub column: &'static str,
    pub kind: ColumnKind,
}

const fn col(source: &'static str, column: &'static str, kind: ColumnKind) -> ColumnBinding {
    ColumnBinding {
        source,
        column,
        kind,
    }
}

/// Destination table and its ordered column mappings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableBinding {
    pub table: &'static str,
    pub columns: &'static [ColumnBinding],
}

impl TableBinding {
    /// Every source field must be present in the CSV header.
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.source)
    }

    /// `INSERT INTO <table> (<columns>) `, ready for a `VALUES` list.
    pub fn insert_prefix(&self) -> String {
        let columns: Vec<&str> = self.columns.iter().map(|c| c.column).collect();
        format!("INSERT INTO {} ({}) ", self.table, columns.join(", "))
    }

    /// Most rows a single multi-row insert can carry for this table
    pub fn max_rows_per_statement(&self) -> usize {
        MAX_BIND_PARAMS / self.columns.len().max(1)
    }
}

/// Regulation text, one row per (sub-)article
pub static GDPR_TEXT: TableBinding = TableBinding {
    table: "gdpr_text",
    columns: &[
        col("chapter", "chapter", Integer),
        col("chapter_title", "chapter_title", Text),
        col("article", "article", Integer),
        col("article_title", "article_title", Text),
        col("sub_article", "sub_article", Text),
        col("gdpr_text", "gdpr_text", Text),
        col("href", "href", Text),
    ],
};

/// Enforcement decisions (fines) with derived article references
pub static GDPR_VIOLATIONS_DERIVED: TableBinding = TableBinding {
    table: "gdpr_violations_derived",
    columns: &[
        col("id", "id", Integer),
        col("picture", "picture_path", Text),
        col("name", "country_name", Text),
        col("price", "fine_price", Decimal),
        col("authority", "authority", Text),
        col("date", "date", Date),
        col("controller", "controller", Text),
        col("article_violated", "article_violated", Text),
        col("type", "type", Text),
        col("source", "source", Text),
        col("summary", "summary", Text),
        col("Article_no_der", "article_no_der", Integer),
        col("Sub_article_no_der", "sub_article_no_der", Text),
    ],
};

/// Question/answer pairs about the regulation. CSV headers contain spaces.
pub static GDPR_DATASET: TableBinding = TableBinding {
    table: "GDPR_dataset",
    columns: &[
        col("Content", "Content", Text),
        col("Article Number", "Article_Number", Integer),
        col("Article Name", "Article_Name", Text),
        col("Chapter Number", "Chapter_Number", Integer),
        col("Chapter Name", "Chapter_Name", Text),
        col("Article Word Count", "Article_Word_Count", Integer),
        col("Question", "Question", Text),
        col("Answer", "Answer", Text),
        col("Question Word Count", "Question_Word_Count", Integer),
        col("Answer Word Count", "Answer_Word_Count", Integer),
    ],
};
