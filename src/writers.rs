//! Serialization of an [`Extraction`] into the init and load SQL documents.
//!
//! Both documents open with a comment header and a block of `SET`
//! directives. Entries are written exactly as stored, each followed by one
//! extra newline.

mod init;
mod load;

use core::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub use init::write_init;
pub use load::write_load;

use crate::config::ExtractConfig;
use crate::dump::Extraction;
use crate::errors::Error;

/// Environment directives opening the init document. The load document uses
/// the first [`LOAD_PREAMBLE_LEN`] of them.
const PREAMBLE: [&str; 6] = [
    "SET statement_timeout = 0;",
    "SET lock_timeout = 0;",
    "SET client_encoding = 'UTF8';",
    "SET standard_conforming_strings = on;",
    "SET check_function_bodies = false;",
    "SET client_min_messages = warning;",
];

const LOAD_PREAMBLE_LEN: usize = 4;

const BANNER_RULE: &str = "-- =============================================";

fn write_header<W: Write>(
    out: &mut W,
    heading: &str,
    contents: &str,
    config: &ExtractConfig,
) -> io::Result<()> {
    writeln!(out, "-- {} {heading}", config.title())?;
    writeln!(
        out,
        "-- This file contains {contents} for {} tables",
        config.describe_prefixes()
    )?;
    writeln!(out, "-- Generated from {}", config.source_label())?;
    writeln!(out)
}

fn write_preamble<W: Write>(out: &mut W, directives: &[&str]) -> io::Result<()> {
    for directive in directives {
        writeln!(out, "{directive}")?;
    }
    writeln!(out)
}

fn write_banner<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "{BANNER_RULE}")?;
    writeln!(out, "-- {title}")?;
    writeln!(out, "{BANNER_RULE}")?;
    writeln!(out)
}

/// Write `entries`, each followed by a newline.
fn write_entries<W: Write, T: Display>(out: &mut W, entries: &[T]) -> io::Result<()> {
    for entry in entries {
        writeln!(out, "{entry}")?;
    }
    Ok(())
}

/// Create (or truncate) `path` and fill it through `write`.
fn write_file(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<(), Error> {
    let wrap = |source| Error::WriteOutput {
        path: path.to_path_buf(),
        source,
    };
    let mut out = BufWriter::new(File::create(path).map_err(wrap)?);
    write(&mut out).map_err(wrap)?;
    out.flush().map_err(wrap)
}

/// Write the init document to `path`, overwriting any existing file.
///
/// # Errors
///
/// Returns [`Error::WriteOutput`] if the file cannot be created or written.
pub fn write_init_file(
    path: &Path,
    extraction: &Extraction,
    config: &ExtractConfig,
) -> Result<(), Error> {
    log::info!("{:<24}{}", "writing init file", path.display());
    write_file(path, |out| write_init(out, extraction, config))
}

/// Write the load document to `path`, overwriting any existing file.
///
/// # Errors
///
/// Returns [`Error::WriteOutput`] if the file cannot be created or written.
pub fn write_load_file(
    path: &Path,
    extraction: &Extraction,
    config: &ExtractConfig,
) -> Result<(), Error> {
    log::info!("{:<24}{}", "writing load file", path.display());
    write_file(path, |out| write_load(out, extraction, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header() {
        let config = ExtractConfig::default()
            .with_title("Crm")
            .with_source_label("dump.sql");
        let mut out = Vec::new();
        write_header(&mut out, "Database Initialization", "schema definitions", &config).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "-- Crm Database Initialization\n-- This file contains schema definitions for sec_* and pdat_* tables\n-- Generated from dump.sql\n\n"
        );
    }

    #[test]
    fn test_banner() {
        let mut out = Vec::new();
        write_banner(&mut out, "DATA").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{BANNER_RULE}\n-- DATA\n{BANNER_RULE}\n\n")
        );
    }

    #[test]
    fn test_unwritable_path() {
        let path = Path::new("/nonexistent-directory/for/sure/init.sql");
        let result = write_init_file(path, &Extraction::default(), &ExtractConfig::default());
        assert!(matches!(result, Err(Error::WriteOutput { .. })));
    }
}
