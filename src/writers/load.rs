//! The load document: seed data.

use std::io::{self, Write};

use super::{LOAD_PREAMBLE_LEN, PREAMBLE, write_banner, write_entries, write_header, write_preamble};
use crate::config::ExtractConfig;
use crate::dump::Extraction;

/// Write the data document, one INSERT per COPY region in encounter order.
///
/// # Errors
///
/// Returns any error raised by `out`.
pub fn write_load<W: Write>(
    out: &mut W,
    extraction: &Extraction,
    config: &ExtractConfig,
) -> io::Result<()> {
    write_header(out, "Database Data Load", "seed data", config)?;
    write_preamble(out, &PREAMBLE[..LOAD_PREAMBLE_LEN])?;
    write_banner(out, "DATA")?;
    write_entries(out, extraction.data_statements())
}
