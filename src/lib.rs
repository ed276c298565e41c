#![doc = include_str!("../README.md")]
#![deny(clippy::mod_module_files)]
#![allow(private_bounds, private_interfaces)]

pub mod config;
pub mod dump;
pub mod errors;
pub mod extract;
pub mod scanner;
#[cfg(feature = "testing")]
pub mod testing;
pub mod writers;

// Re-export main types
pub use config::ExtractConfig;
pub use dump::{CopyValue, Extraction, InsertStatement, RawStatement, StatementKind, Summary};
pub use extract::{DumpPaths, extract_file, run};
pub use scanner::{LogObserver, NoopObserver, ScanObserver, Scanner};
pub use writers::{write_init, write_init_file, write_load, write_load_file};

// Re-export errors
pub use errors::{Error, Warning};
