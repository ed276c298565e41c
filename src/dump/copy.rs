//! `COPY ... FROM stdin` regions and the INSERT statements rendered from them.

use core::fmt::{self, Display, Write};

/// Field value marking SQL `NULL` in COPY data.
pub const NULL_MARKER: &str = "\\N";

/// Field delimiter of COPY data rows.
const FIELD_DELIMITER: char = '\t';

/// One raw data row of a COPY region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRow {
    /// One-based line number of the row.
    pub line: usize,
    /// Row text with its line terminator removed.
    pub text: String,
}

impl CopyRow {
    /// Build a row from a dump line, dropping its `\n` or `\r\n` terminator.
    #[must_use]
    pub fn new(line: usize, raw: &str) -> Self {
        let text = raw
            .strip_suffix('\n')
            .map_or(raw, |text| text.strip_suffix('\r').unwrap_or(text));
        Self {
            line,
            text: text.to_owned(),
        }
    }

    /// Number of tab-separated fields in the row.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.text.split(FIELD_DELIMITER).count()
    }

    /// Decode the row into values.
    #[must_use]
    pub fn values(&self) -> Vec<CopyValue> {
        self.text.split(FIELD_DELIMITER).map(CopyValue::from).collect()
    }
}

/// Transient state for one open COPY region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyBlock {
    table: String,
    columns: String,
    line: usize,
    rows: Vec<CopyRow>,
}

impl CopyBlock {
    /// Open a region for `table` with the comma-joined `columns` list.
    #[must_use]
    pub fn new(table: impl Into<String>, columns: impl Into<String>, line: usize) -> Self {
        Self {
            table: table.into(),
            columns: columns.into(),
            line,
            rows: Vec::new(),
        }
    }

    /// Target table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Comma-joined column list, exactly as written in the COPY header.
    #[must_use]
    pub fn columns(&self) -> &str {
        &self.columns
    }

    /// Number of declared columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.split(',').count()
    }

    /// One-based line number of the COPY header.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Rows accumulated so far.
    #[must_use]
    pub fn rows(&self) -> &[CopyRow] {
        &self.rows
    }

    /// Append a data row.
    pub fn push_row(&mut self, row: CopyRow) {
        self.rows.push(row);
    }

    /// Close the region. Returns `None` when no rows were accumulated.
    #[must_use]
    pub fn into_insert(self) -> Option<InsertStatement> {
        if self.rows.is_empty() {
            return None;
        }
        let rows = self.rows.iter().map(CopyRow::values).collect();
        Some(InsertStatement {
            table: self.table,
            columns: self.columns,
            rows,
        })
    }
}

/// A single COPY field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyValue {
    /// The `\N` marker.
    Null,
    /// Any other field, kept as text regardless of the column type.
    Text(String),
}

impl From<&str> for CopyValue {
    fn from(field: &str) -> Self {
        if field == NULL_MARKER {
            Self::Null
        } else {
            Self::Text(field.to_owned())
        }
    }
}

impl Display for CopyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Text(s) => {
                // Escape single quotes by doubling them
                f.write_char('\'')?;
                for c in s.chars() {
                    if c == '\'' {
                        f.write_str("''")?;
                    } else {
                        f.write_char(c)?;
                    }
                }
                f.write_char('\'')
            }
        }
    }
}

/// All rows of one COPY region as a single multi-row `INSERT`.
///
/// # Example
///
/// ```rust
/// use dump_subset::dump::{CopyBlock, CopyRow};
///
/// let mut block = CopyBlock::new("sec_user", "id, name", 1);
/// block.push_row(CopyRow::new(2, "1\tAlice\n"));
/// block.push_row(CopyRow::new(3, "2\t\\N\n"));
///
/// let insert = block.into_insert().unwrap();
/// assert_eq!(
///     insert.to_string(),
///     "-- Data for sec_user\nINSERT INTO sec_user (id, name) VALUES\n  ('1', 'Alice'),\n  ('2', NULL);\n"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    table: String,
    columns: String,
    rows: Vec<Vec<CopyValue>>,
}

impl InsertStatement {
    /// Target table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Comma-joined column list.
    #[must_use]
    pub fn columns(&self) -> &str {
        &self.columns
    }

    /// Decoded rows, one value tuple each.
    #[must_use]
    pub fn rows(&self) -> &[Vec<CopyValue>] {
        &self.rows
    }
}

impl Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-- Data for {}", self.table)?;
        write!(f, "INSERT INTO {} ({}) VALUES", self.table, self.columns)?;
        let last = self.rows.len().saturating_sub(1);
        for (i, row) in self.rows.iter().enumerate() {
            f.write_str("\n  (")?;
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{value}")?;
            }
            f.write_str(if i == last { ");" } else { ")," })?;
        }
        f.write_char('\n')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_copy_value() {
        assert_eq!(CopyValue::Null.to_string(), "NULL");
        assert_eq!(CopyValue::from("hello").to_string(), "'hello'");
        assert_eq!(CopyValue::from("it's").to_string(), "'it''s'");
        assert_eq!(CopyValue::from("").to_string(), "''");
        assert_eq!(CopyValue::from("\\\\N").to_string(), "'\\\\N'");
        assert_eq!(CopyValue::from("\\N"), CopyValue::Null);
    }

    #[test]
    fn test_row_strips_only_line_terminator() {
        let row = CopyRow::new(7, "1\t  padded  \t\r\n");
        assert_eq!(row.text, "1\t  padded  \t");
        assert_eq!(row.field_count(), 3);
        assert_eq!(
            row.values(),
            vec![
                CopyValue::Text("1".into()),
                CopyValue::Text("  padded  ".into()),
                CopyValue::Text(String::new()),
            ]
        );

        let last_line = CopyRow::new(8, "no newline");
        assert_eq!(last_line.text, "no newline");
    }

    #[test]
    fn test_empty_block_renders_nothing() {
        let block = CopyBlock::new("pdat_person", "id", 1);
        assert_eq!(block.into_insert(), None);
    }

    #[test]
    fn test_single_row_insert() {
        let mut block = CopyBlock::new("pdat_person", "id, first_name, last_name", 10);
        block.push_row(CopyRow::new(11, "5\tO'Brien\t\\N\n"));
        assert_eq!(block.column_count(), 3);

        let insert = block.into_insert().unwrap();
        assert_eq!(insert.table(), "pdat_person");
        assert_eq!(insert.rows().len(), 1);
        assert_eq!(
            insert.to_string(),
            "-- Data for pdat_person\nINSERT INTO pdat_person (id, first_name, last_name) VALUES\n  ('5', 'O''Brien', NULL);\n"
        );
    }

    #[test]
    fn test_arity_is_not_enforced() {
        let mut block = CopyBlock::new("sec_role", "id, name", 1);
        block.push_row(CopyRow::new(2, "1\tadmin\textra\n"));
        let insert = block.into_insert().unwrap();
        assert_eq!(
            insert.to_string(),
            "-- Data for sec_role\nINSERT INTO sec_role (id, name) VALUES\n  ('1', 'admin', 'extra');\n"
        );
    }
}
