//! End-to-end run: read a dump file, scan it, write both documents.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::config::ExtractConfig;
use crate::dump::Extraction;
use crate::errors::Error;
use crate::scanner::{ScanObserver, Scanner};
use crate::writers::{write_init_file, write_load_file};

/// Input and output locations of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpPaths {
    /// The text dump to read.
    pub dump: PathBuf,
    /// Destination of the schema document.
    pub init: PathBuf,
    /// Destination of the data document.
    pub load: PathBuf,
}

impl DumpPaths {
    /// Bundle the three paths.
    #[must_use]
    pub fn new(
        dump: impl Into<PathBuf>,
        init: impl Into<PathBuf>,
        load: impl Into<PathBuf>,
    ) -> Self {
        Self {
            dump: dump.into(),
            init: init.into(),
            load: load.into(),
        }
    }
}

/// Scan the dump at `path`.
///
/// # Errors
///
/// Returns [`Error::ReadDump`] if the file cannot be opened or read, or a
/// configuration error from [`ExtractConfig::validate`].
pub fn extract_file<O: ScanObserver>(
    path: &Path,
    config: &ExtractConfig,
    observer: O,
) -> Result<Extraction, Error> {
    let wrap = |source| Error::ReadDump {
        path: path.to_path_buf(),
        source,
    };
    let mut scanner = Scanner::with_observer(config, observer)?;
    log::info!("{:<24}{}", "reading dump file", path.display());
    let file = File::open(path).map_err(wrap)?;
    scanner.scan(BufReader::new(file)).map_err(wrap)?;
    Ok(scanner.finish())
}

/// Scan `paths.dump` and write the init and load documents.
///
/// When the config has no explicit source label, the dump's file name is
/// used in the document headers. In strict mode nothing is written if any
/// statement was left unterminated.
///
/// # Errors
///
/// Returns [`Error::ReadDump`], [`Error::WriteOutput`], a configuration
/// error, or [`Error::Malformed`] in strict mode.
pub fn run<O: ScanObserver>(
    paths: &DumpPaths,
    config: &ExtractConfig,
    observer: O,
) -> Result<Extraction, Error> {
    let config = labelled(config, &paths.dump);
    let extraction = extract_file(&paths.dump, &config, observer)?;

    let malformed = extraction.malformed_count();
    if config.is_strict() && malformed > 0 {
        return Err(Error::Malformed { count: malformed });
    }

    write_init_file(&paths.init, &extraction, &config)?;
    write_load_file(&paths.load, &extraction, &config)?;
    Ok(extraction)
}

fn labelled(config: &ExtractConfig, dump: &Path) -> ExtractConfig {
    match dump.file_name() {
        Some(name) if !config.has_source_label() => {
            config.clone().with_source_label(name.to_string_lossy())
        }
        _ => config.clone(),
    }
}
