//! Data model for statements extracted from a dump.
//!
//! The scanner produces:
//! - [`RawStatement`]s for `CREATE TABLE`, `CREATE SEQUENCE` and
//!   `ALTER TABLE ONLY` constraint statements, kept verbatim
//! - [`InsertStatement`]s rendered from the rows of a `COPY ... FROM stdin` region
//! - an [`Extraction`] holding every bucket in encounter order

mod copy;
mod extraction;
mod statement;

pub use copy::{CopyBlock, CopyRow, CopyValue, InsertStatement, NULL_MARKER};
pub use extraction::{Extraction, Summary};
pub use statement::{RawStatement, StatementKind};
