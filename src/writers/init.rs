//! The init document: sequences, tables and constraints.

use std::io::{self, Write};

use super::{PREAMBLE, write_banner, write_entries, write_header, write_preamble};
use crate::config::ExtractConfig;
use crate::dump::Extraction;

/// Write the schema document.
///
/// Sections, in order: SEQUENCES, sequence ownerships (only when present),
/// TABLES, column defaults (only when enabled and present), CONSTRAINTS.
///
/// # Errors
///
/// Returns any error raised by `out`.
pub fn write_init<W: Write>(
    out: &mut W,
    extraction: &Extraction,
    config: &ExtractConfig,
) -> io::Result<()> {
    write_header(out, "Database Initialization", "schema definitions", config)?;
    write_preamble(out, &PREAMBLE)?;

    write_banner(out, "SEQUENCES")?;
    write_entries(out, extraction.sequences())?;

    if !extraction.sequence_ownerships().is_empty() {
        writeln!(out, "\n-- Sequence Ownerships")?;
        write_entries(out, extraction.sequence_ownerships())?;
    }

    writeln!(out)?;
    write_banner(out, "TABLES")?;
    write_entries(out, extraction.schemas())?;

    if config.includes_column_defaults() && !extraction.column_defaults().is_empty() {
        writeln!(out, "\n-- Column Defaults")?;
        write_entries(out, extraction.column_defaults())?;
    }

    writeln!(out)?;
    write_banner(out, "CONSTRAINTS")?;
    write_entries(out, extraction.constraints())
}
