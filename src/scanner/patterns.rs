//! Line patterns, compiled once per scanner from the configured prefixes.

use regex::Regex;

use crate::config::ExtractConfig;

/// Regex alternation of the escaped prefixes, e.g. `sec_|pdat_`.
fn alternation(prefixes: &[String]) -> String {
    prefixes
        .iter()
        .map(|prefix| regex::escape(prefix))
        .collect::<Vec<_>>()
        .join("|")
}

/// Compiled classifiers for dump lines.
#[derive(Debug, Clone)]
pub(crate) struct Patterns {
    create_table: Regex,
    create_sequence: Regex,
    sequence_ownership: Regex,
    copy_header: Regex,
    constraint_table: Regex,
    references_target: Regex,
    references_excluded: Option<Regex>,
    target_prefixes: Vec<String>,
}

impl Patterns {
    pub(crate) fn new(config: &ExtractConfig) -> Result<Self, regex::Error> {
        let targets = alternation(config.target_prefixes());
        let excluded = config.excluded_reference_prefixes();
        let references_excluded = if excluded.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(
                r"REFERENCES (?:{})",
                alternation(excluded)
            ))?)
        };

        Ok(Self {
            create_table: Regex::new(&format!(r"^CREATE TABLE ((?:{targets})\w+)"))?,
            // A sequence name may carry an unrelated qualifier before the prefix.
            create_sequence: Regex::new(&format!(r"^CREATE SEQUENCE (\w*(?:{targets})\w+)"))?,
            sequence_ownership: Regex::new(&format!(
                r"^ALTER SEQUENCE \w+ OWNED BY (?:{targets})\w+"
            ))?,
            copy_header: Regex::new(&format!(
                r"^COPY ((?:{targets})\w+) \(([^)]+)\) FROM stdin;"
            ))?,
            constraint_table: Regex::new(r"ALTER TABLE ONLY\s+([\w.]+)")?,
            references_target: Regex::new(&format!(r"REFERENCES (?:{targets})\w+"))?,
            references_excluded,
            target_prefixes: config.target_prefixes().to_vec(),
        })
    }

    /// Whether `text` contains any target prefix anywhere.
    fn mentions_target(&self, text: &str) -> bool {
        self.target_prefixes
            .iter()
            .any(|prefix| text.contains(prefix.as_str()))
    }

    /// Table name of an in-scope `CREATE TABLE` line.
    pub(crate) fn create_table<'l>(&self, line: &'l str) -> Option<&'l str> {
        self.create_table
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Sequence name of an in-scope `CREATE SEQUENCE` line.
    pub(crate) fn create_sequence<'l>(&self, line: &'l str) -> Option<&'l str> {
        self.create_sequence
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub(crate) fn is_sequence_ownership(&self, line: &str) -> bool {
        self.sequence_ownership.is_match(line)
    }

    pub(crate) fn is_column_default(&self, line: &str) -> bool {
        line.contains("DEFAULT nextval") && self.mentions_target(line)
    }

    /// Table name and raw column list of an in-scope `COPY ... FROM stdin;` header.
    pub(crate) fn copy_header<'l>(&self, line: &'l str) -> Option<(&'l str, &'l str)> {
        let caps = self.copy_header.captures(line)?;
        Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
    }

    pub(crate) fn is_constraint_start(&self, line: &str) -> bool {
        line.contains("ALTER TABLE ONLY") && self.mentions_target(line)
    }

    /// Table named after `ALTER TABLE ONLY`, if it sits on the same line.
    pub(crate) fn constraint_table<'l>(&self, line: &'l str) -> Option<&'l str> {
        self.constraint_table
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Whether a closed constraint statement belongs in the output.
    ///
    /// Foreign keys survive only when they reference a target table and no
    /// excluded table; every other constraint is kept.
    pub(crate) fn retains_constraint(&self, text: &str) -> bool {
        if !text.contains("FOREIGN KEY") {
            return true;
        }
        self.references_target.is_match(text)
            && !self
                .references_excluded
                .as_ref()
                .is_some_and(|excluded| excluded.is_match(text))
    }
}
