//! The ordered buckets produced by one scan.

use core::fmt::{self, Display};

use indexmap::IndexMap;

use super::{InsertStatement, RawStatement};
use crate::errors::Warning;

/// Everything extracted from a dump, in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub(crate) schemas: Vec<RawStatement>,
    pub(crate) sequences: Vec<RawStatement>,
    pub(crate) sequence_ownerships: Vec<String>,
    pub(crate) column_defaults: Vec<String>,
    pub(crate) constraints: Vec<RawStatement>,
    pub(crate) data_statements: Vec<InsertStatement>,
    pub(crate) warnings: Vec<Warning>,
}

impl Extraction {
    /// `CREATE TABLE` statements.
    #[must_use]
    pub fn schemas(&self) -> &[RawStatement] {
        &self.schemas
    }

    /// `CREATE SEQUENCE` statements.
    #[must_use]
    pub fn sequences(&self) -> &[RawStatement] {
        &self.sequences
    }

    /// `ALTER SEQUENCE ... OWNED BY` lines.
    #[must_use]
    pub fn sequence_ownerships(&self) -> &[String] {
        &self.sequence_ownerships
    }

    /// Lines assigning a `DEFAULT nextval(...)` to a column.
    #[must_use]
    pub fn column_defaults(&self) -> &[String] {
        &self.column_defaults
    }

    /// Retained `ALTER TABLE ONLY` constraint statements.
    #[must_use]
    pub fn constraints(&self) -> &[RawStatement] {
        &self.constraints
    }

    /// INSERT statements rendered from COPY regions.
    #[must_use]
    pub fn data_statements(&self) -> &[InsertStatement] {
        &self.data_statements
    }

    /// Warnings collected during the scan.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Number of statements dropped because they never closed.
    #[must_use]
    pub fn malformed_count(&self) -> usize {
        self.warnings.iter().filter(|w| w.is_malformed()).count()
    }

    /// Rows extracted per table, in the order tables were first seen.
    #[must_use]
    pub fn row_counts(&self) -> IndexMap<&str, usize> {
        let mut counts = IndexMap::new();
        for insert in &self.data_statements {
            *counts.entry(insert.table()).or_insert(0) += insert.rows().len();
        }
        counts
    }

    /// Bucket sizes for reporting.
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary {
            tables: self.schemas.len(),
            sequences: self.sequences.len(),
            sequence_ownerships: self.sequence_ownerships.len(),
            column_defaults: self.column_defaults.len(),
            constraints: self.constraints.len(),
            data_statements: self.data_statements.len(),
            rows: self.data_statements.iter().map(|i| i.rows().len()).sum(),
            warnings: self.warnings.len(),
        }
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Extracted tables.
    pub tables: usize,
    /// Extracted sequences.
    pub sequences: usize,
    /// Sequence ownership lines.
    pub sequence_ownerships: usize,
    /// Column default lines.
    pub column_defaults: usize,
    /// Retained constraints.
    pub constraints: usize,
    /// Rendered INSERT statements.
    pub data_statements: usize,
    /// Rows across all INSERT statements.
    pub rows: usize,
    /// Warnings of any kind.
    pub warnings: usize,
}

impl Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Extraction complete:")?;
        writeln!(f, "  Tables: {}", self.tables)?;
        writeln!(f, "  Sequences: {}", self.sequences)?;
        writeln!(f, "  Sequence ownerships: {}", self.sequence_ownerships)?;
        writeln!(f, "  Column defaults: {}", self.column_defaults)?;
        writeln!(f, "  Constraints: {}", self.constraints)?;
        writeln!(
            f,
            "  Data statements: {} ({} rows)",
            self.data_statements, self.rows
        )?;
        write!(f, "  Warnings: {}", self.warnings)
    }
}
