//! Verbatim multi-line statements.

use core::fmt::{self, Display};

/// The kinds of statement the scanner buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// `CREATE TABLE`, closed by a line ending in `);`.
    Table,
    /// `CREATE SEQUENCE`, closed by a line ending in `;`.
    Sequence,
    /// `ALTER TABLE ONLY`, closed by a line ending in `;`.
    Constraint,
    /// `COPY ... FROM stdin`, closed by the `\.` marker.
    Copy,
}

impl StatementKind {
    /// Returns whether `line` closes a statement of this kind.
    ///
    /// COPY regions never close through this check, see [`crate::dump::CopyBlock`].
    #[must_use]
    pub fn is_terminator(self, line: &str) -> bool {
        let line = line.trim();
        match self {
            Self::Table => line.ends_with(");"),
            Self::Sequence | Self::Constraint => line.ends_with(';'),
            Self::Copy => false,
        }
    }
}

impl Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "CREATE TABLE",
            Self::Sequence => "CREATE SEQUENCE",
            Self::Constraint => "ALTER TABLE ONLY",
            Self::Copy => "COPY",
        })
    }
}

/// An ordered sequence of dump lines forming one closed statement.
///
/// Lines keep their original terminators, so displaying the statement
/// reproduces the dump text exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatement {
    kind: StatementKind,
    name: Option<String>,
    line: usize,
    lines: Vec<String>,
}

impl RawStatement {
    pub(crate) fn new(
        kind: StatementKind,
        name: Option<String>,
        line: usize,
        lines: Vec<String>,
    ) -> Self {
        Self {
            kind,
            name,
            line,
            lines,
        }
    }

    /// Kind of the statement.
    #[must_use]
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Table or sequence name taken from the opening line.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// One-based line number of the opening line.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// The physical lines of the statement.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The statement text, lines joined verbatim.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.concat()
    }
}

impl Display for RawStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.lines.iter().try_for_each(|line| f.write_str(line))
    }
}
