//! Sub-scanner for `ALTER TABLE ONLY` constraint statements.
//!
//! A constraint may span several physical lines. The reader consumes lines,
//! the opening one included, until one ends with `;`, and hands back the
//! completed statement together with the number of lines it consumed.

use super::state::{PendingStatement, Progress};
use crate::dump::{RawStatement, StatementKind};
use crate::errors::Warning;

/// A completed constraint statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintScan {
    /// The statement, verbatim.
    pub statement: RawStatement,
    /// Physical lines consumed, the opening line included.
    pub consumed: usize,
}

/// Outcome of feeding one line to a [`ConstraintReader`].
#[derive(Debug)]
pub(crate) enum ConstraintStep {
    /// The statement needs more lines.
    Reading(ConstraintReader),
    /// The statement is complete.
    Done(ConstraintScan),
}

/// Accumulates one constraint statement.
#[derive(Debug)]
pub(crate) struct ConstraintReader {
    pending: PendingStatement,
}

impl ConstraintReader {
    /// Begin with the triggering line.
    pub(crate) fn start(table: Option<String>, line: usize, text: &str) -> ConstraintStep {
        Self::step(PendingStatement::open(
            StatementKind::Constraint,
            table,
            line,
            text,
        ))
    }

    pub(crate) fn feed(self, text: &str) -> ConstraintStep {
        Self::step(self.pending.feed(text))
    }

    pub(crate) fn unterminated(self) -> Warning {
        self.pending.unterminated()
    }

    fn step(progress: Progress) -> ConstraintStep {
        match progress {
            Progress::Open(pending) => ConstraintStep::Reading(Self { pending }),
            Progress::Closed(statement) => ConstraintStep::Done(ConstraintScan {
                consumed: statement.lines().len(),
                statement,
            }),
        }
    }
}
