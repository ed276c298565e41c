//! Command-line entry point.
//!
//! Extracts prefix-filtered sequences, tables, constraints and COPY data from
//! a text dump into an init document (schema) and a load document (data).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use dump_subset::config::{DEFAULT_EXCLUDED_REFERENCE_PREFIXES, DEFAULT_TARGET_PREFIXES};
use dump_subset::{DumpPaths, ExtractConfig, LogObserver};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text dump to read.
    #[arg(required = true)]
    dump: PathBuf,
    /// Destination of the schema document.
    #[arg(required = true)]
    init: PathBuf,
    /// Destination of the data document.
    #[arg(required = true)]
    load: PathBuf,
    /// Table/sequence name prefix to extract (repeatable).
    #[arg(long = "prefix", value_name = "PREFIX")]
    prefixes: Vec<String>,
    /// Foreign-key reference prefix that drops a constraint (repeatable).
    #[arg(long = "exclude-ref", value_name = "PREFIX")]
    excluded_references: Vec<String>,
    /// Title used in the document headers.
    #[arg(long, default_value = "Extracted")]
    title: String,
    /// Fail without writing anything if a statement is never terminated.
    #[arg(long)]
    strict: bool,
    /// Also emit `DEFAULT nextval` column defaults in the init document.
    #[arg(long)]
    column_defaults: bool,
}

impl Args {
    fn config(&self) -> ExtractConfig {
        let prefixes = if self.prefixes.is_empty() {
            DEFAULT_TARGET_PREFIXES.map(String::from).to_vec()
        } else {
            self.prefixes.clone()
        };
        let excluded = if self.excluded_references.is_empty() {
            DEFAULT_EXCLUDED_REFERENCE_PREFIXES.map(String::from).to_vec()
        } else {
            self.excluded_references.clone()
        };
        ExtractConfig::default()
            .with_target_prefixes(prefixes)
            .with_excluded_reference_prefixes(excluded)
            .with_title(self.title.as_str())
            .with_strict(self.strict)
            .with_column_defaults(self.column_defaults)
    }
}

fn log() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    log();
    match run(&Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let paths = DumpPaths::new(&args.dump, &args.init, &args.load);
    let extraction = dump_subset::run(&paths, &args.config(), LogObserver)
        .with_context(|| format!("extraction from {} failed", args.dump.display()))?;

    println!("{}", extraction.summary());
    for (table, rows) in extraction.row_counts() {
        println!("    {table:<32}{rows:>8}");
    }
    println!("Schema file: {}", paths.init.display());
    println!("Data file: {}", paths.load.display());
    Ok(())
}
