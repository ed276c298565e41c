//! Scanner modes and the buffer for statements awaiting their terminator.

use super::constraint::ConstraintReader;
use crate::dump::{CopyBlock, RawStatement, StatementKind};
use crate::errors::Warning;

/// Mutually exclusive scanner modes.
///
/// While any mode other than [`ScanState::Idle`] is active, lines are routed
/// to that mode and never classified.
#[derive(Debug, Default)]
pub(crate) enum ScanState {
    /// Classifying lines.
    #[default]
    Idle,
    /// Buffering an in-scope `CREATE TABLE`.
    InCreateTable(PendingStatement),
    /// Buffering an in-scope `CREATE SEQUENCE`.
    InCreateSequence(PendingStatement),
    /// Reading an `ALTER TABLE ONLY` constraint.
    InConstraint(ConstraintReader),
    /// Collecting rows of an in-scope COPY region.
    InCopy(CopyBlock),
}

/// Outcome of feeding one line to a [`PendingStatement`].
#[derive(Debug)]
pub(crate) enum Progress {
    /// Still waiting for the terminator.
    Open(PendingStatement),
    /// The line closed the statement.
    Closed(RawStatement),
}

/// Lines of a statement that has not reached its terminator yet.
#[derive(Debug)]
pub(crate) struct PendingStatement {
    kind: StatementKind,
    name: Option<String>,
    line: usize,
    lines: Vec<String>,
}

impl PendingStatement {
    /// Start a statement with its opening line, which may also close it.
    pub(crate) fn open(
        kind: StatementKind,
        name: Option<String>,
        line: usize,
        text: &str,
    ) -> Progress {
        Self {
            kind,
            name,
            line,
            lines: Vec::new(),
        }
        .feed(text)
    }

    pub(crate) fn feed(mut self, text: &str) -> Progress {
        self.lines.push(text.to_owned());
        if self.kind.is_terminator(text) {
            Progress::Closed(RawStatement::new(self.kind, self.name, self.line, self.lines))
        } else {
            Progress::Open(self)
        }
    }

    /// Warning for a statement still open at end of input.
    pub(crate) fn unterminated(self) -> Warning {
        Warning::Unterminated {
            kind: self.kind,
            name: self.name,
            line: self.line,
        }
    }

    /// Warning for a statement replaced by a new start at `restarted_at`.
    pub(crate) fn abandoned(self, restarted_at: usize) -> Warning {
        Warning::Abandoned {
            kind: self.kind,
            name: self.name,
            line: self.line,
            restarted_at,
        }
    }
}
