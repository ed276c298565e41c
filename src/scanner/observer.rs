//! Progress reporting hooks for the scanner.

use crate::dump::{InsertStatement, RawStatement};
use crate::errors::Warning;

/// Receives scan events as they happen.
///
/// Every method defaults to doing nothing, so implementors only override the
/// events they care about.
pub trait ScanObserver {
    /// A `CREATE TABLE` statement was closed and kept.
    fn on_table(&mut self, _statement: &RawStatement) {}
    /// A `CREATE SEQUENCE` statement was closed and kept.
    fn on_sequence(&mut self, _statement: &RawStatement) {}
    /// A COPY region for `table` was opened.
    fn on_copy(&mut self, _table: &str) {}
    /// A COPY region was closed and rendered.
    fn on_insert(&mut self, _insert: &InsertStatement) {}
    /// A constraint statement was closed; `retained` tells whether it was kept.
    fn on_constraint(&mut self, _statement: &RawStatement, _retained: bool) {}
    /// A warning was recorded.
    fn on_warning(&mut self, _warning: &Warning) {}
}

impl<O: ScanObserver + ?Sized> ScanObserver for &mut O {
    fn on_table(&mut self, statement: &RawStatement) {
        (**self).on_table(statement);
    }

    fn on_sequence(&mut self, statement: &RawStatement) {
        (**self).on_sequence(statement);
    }

    fn on_copy(&mut self, table: &str) {
        (**self).on_copy(table);
    }

    fn on_insert(&mut self, insert: &InsertStatement) {
        (**self).on_insert(insert);
    }

    fn on_constraint(&mut self, statement: &RawStatement, retained: bool) {
        (**self).on_constraint(statement, retained);
    }

    fn on_warning(&mut self, warning: &Warning) {
        (**self).on_warning(warning);
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}

/// Observer forwarding events to the [`log`] facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ScanObserver for LogObserver {
    fn on_table(&mut self, statement: &RawStatement) {
        log::info!("{:<24}{}", "found table", statement.name().unwrap_or_default());
    }

    fn on_sequence(&mut self, statement: &RawStatement) {
        log::debug!("{:<24}{}", "found sequence", statement.name().unwrap_or_default());
    }

    fn on_copy(&mut self, table: &str) {
        log::info!("{:<24}{}", "found copy data", table);
    }

    fn on_insert(&mut self, insert: &InsertStatement) {
        log::debug!(
            "{:<24}{} ({} rows)",
            "rendered insert",
            insert.table(),
            insert.rows().len()
        );
    }

    fn on_constraint(&mut self, statement: &RawStatement, retained: bool) {
        log::debug!(
            "{:<24}{} at line {}",
            if retained { "kept constraint" } else { "skipped constraint" },
            statement.name().unwrap_or_default(),
            statement.line()
        );
    }

    fn on_warning(&mut self, warning: &Warning) {
        log::warn!("{warning}");
    }
}
