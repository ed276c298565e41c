//! Invariant checks over arbitrary input, for fuzzing.
//!
//! This module is gated behind the `testing` feature.
//!
//! # Provided helpers
//!
//! - [`test_scan`]: scan arbitrary bytes and assert the bucket invariants
//! - [`test_copy_region`]: render arbitrary rows and assert the INSERT shape

use crate::config::ExtractConfig;
use crate::dump::{CopyBlock, CopyRow, CopyValue, NULL_MARKER, StatementKind};
use crate::scanner::Scanner;
use crate::writers::{write_init, write_load};

/// Scan `data` with the default configuration and check that every kept
/// statement is well formed and that rendering is deterministic.
///
/// # Panics
///
/// Panics if any invariant is violated.
pub fn test_scan(data: &[u8]) {
    let config = ExtractConfig::default();
    let mut scanner = Scanner::new(&config).unwrap();
    scanner.scan(data).unwrap();
    let extraction = scanner.finish();

    for table in extraction.schemas() {
        assert!(table.lines()[0].starts_with("CREATE TABLE "));
        assert!(StatementKind::Table.is_terminator(table.lines().last().unwrap()));
        let name = table.name().unwrap();
        assert!(config.target_prefixes().iter().any(|p| name.starts_with(p.as_str())));
    }
    for sequence in extraction.sequences() {
        assert!(sequence.lines()[0].starts_with("CREATE SEQUENCE "));
        assert!(StatementKind::Sequence.is_terminator(sequence.lines().last().unwrap()));
    }
    for constraint in extraction.constraints() {
        assert!(constraint.lines()[0].contains("ALTER TABLE ONLY"));
        assert!(StatementKind::Constraint.is_terminator(constraint.lines().last().unwrap()));
    }
    for insert in extraction.data_statements() {
        assert!(!insert.rows().is_empty());
    }

    let render = || {
        let mut init = Vec::new();
        let mut load = Vec::new();
        write_init(&mut init, &extraction, &config).unwrap();
        write_load(&mut load, &extraction, &config).unwrap();
        (init, load)
    };
    assert_eq!(render(), render());
}

/// Render `rows` as one COPY region and check the tuple count and NULL handling.
///
/// # Panics
///
/// Panics if any invariant is violated.
pub fn test_copy_region(rows: &[String]) {
    let rows: Vec<String> = rows.iter().map(|row| row.replace(['\n', '\r'], " ")).collect();
    let mut block = CopyBlock::new("sec_fuzz", "a, b", 1);
    for (i, row) in rows.iter().enumerate() {
        block.push_row(CopyRow::new(i + 2, row));
    }
    let Some(insert) = block.into_insert() else {
        assert!(rows.is_empty());
        return;
    };
    assert_eq!(insert.rows().len(), rows.len());

    for (row, values) in rows.iter().zip(insert.rows()) {
        let nulls = row.split('\t').filter(|field| *field == NULL_MARKER).count();
        let rendered_nulls = values.iter().filter(|v| **v == CopyValue::Null).count();
        assert_eq!(nulls, rendered_nulls);
    }

    let rendered = insert.to_string();
    let tuples = rendered.lines().filter(|line| line.starts_with("  (")).count();
    assert_eq!(tuples, rows.len());
    assert!(rendered.ends_with(");\n"));
}
