//! Submodule defining the errors and warnings used across the crate.

use std::io;
use std::path::PathBuf;

use crate::dump::StatementKind;

/// Errors that abort an extraction run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The dump file could not be opened or read.
    #[error("Failed to read dump file {}: {source}", .path.display())]
    ReadDump {
        /// Path of the dump file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// One of the output documents could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    WriteOutput {
        /// Path of the output document.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The configuration names no target prefix.
    #[error("At least one target prefix is required")]
    NoTargetPrefixes,
    /// A configured prefix is the empty string, which would match every name.
    #[error("Empty prefix in {0} list")]
    EmptyPrefix(&'static str),
    /// A line pattern failed to compile.
    #[error("Invalid line pattern: {0}")]
    Pattern(#[from] regex::Error),
    /// Strict mode found statements that never reached their terminator.
    #[error("{count} malformed statement(s) found in strict mode")]
    Malformed {
        /// Number of malformed-statement warnings.
        count: usize,
    },
}

/// Non-fatal findings collected while scanning a dump.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Warning {
    /// A statement or COPY region was still open when the input ended.
    #[error("{kind} {} starting at line {line} never reached its terminator", display_name(.name.as_deref()))]
    Unterminated {
        /// Kind of the dropped statement.
        kind: StatementKind,
        /// Object name, when the opening line carries one.
        name: Option<String>,
        /// Line number of the opening line.
        line: usize,
    },
    /// A pending statement was replaced by a new statement start.
    #[error("{kind} {} starting at line {line} abandoned by a new statement at line {restarted_at}", display_name(.name.as_deref()))]
    Abandoned {
        /// Kind of the dropped statement.
        kind: StatementKind,
        /// Object name, when the opening line carries one.
        name: Option<String>,
        /// Line number of the opening line.
        line: usize,
        /// Line number of the statement that replaced it.
        restarted_at: usize,
    },
    /// A COPY row has a different number of fields than the declared columns.
    #[error("COPY row for {table} at line {line} has {found} field(s), expected {expected}")]
    ArityMismatch {
        /// Target table of the COPY region.
        table: String,
        /// Line number of the row.
        line: usize,
        /// Number of declared columns.
        expected: usize,
        /// Number of tab-separated fields in the row.
        found: usize,
    },
}

impl Warning {
    /// Returns whether this warning means a statement was dropped from the output.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Unterminated { .. } | Self::Abandoned { .. })
    }
}

fn display_name(name: Option<&str>) -> &str {
    name.unwrap_or("<unnamed>")
}
