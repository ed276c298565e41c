//! Single-pass, line-oriented scanner over a text dump.
//!
//! The scanner is a small state machine. In [`ScanState::Idle`] each line is
//! tried against an ordered table of rules, first match wins:
//!
//! 1. in-scope `CREATE TABLE` opens a table statement
//! 2. in-scope `CREATE SEQUENCE` opens a sequence statement
//! 3. `ALTER SEQUENCE ... OWNED BY` an in-scope table is kept verbatim
//! 4. any line with `DEFAULT nextval` and a target prefix is kept verbatim
//! 5. in-scope `COPY ... FROM stdin;` opens a COPY region
//! 6. `ALTER TABLE ONLY` with a target prefix opens a constraint statement
//!
//! Lines matching no rule are ignored. Any other state consumes lines until
//! its terminator, then flushes into the matching bucket of the
//! [`Extraction`].

mod constraint;
mod observer;
mod patterns;
mod state;

use std::io::{self, BufRead};
use std::mem;

pub use constraint::ConstraintScan;
use constraint::{ConstraintReader, ConstraintStep};
pub use observer::{LogObserver, NoopObserver, ScanObserver};
use patterns::Patterns;
use state::{PendingStatement, Progress, ScanState};

use crate::config::ExtractConfig;
use crate::dump::{CopyBlock, CopyRow, Extraction, RawStatement, StatementKind};
use crate::errors::{Error, Warning};

/// Terminator line of a COPY region.
const END_OF_DATA: &str = "\\.";

/// A rule tried against a line in idle mode: `None` means no match.
type Rule<O> = fn(&mut Scanner<O>, &str) -> Option<ScanState>;

/// Scans a dump line by line and fills an [`Extraction`].
///
/// # Example
///
/// ```rust
/// use dump_subset::{ExtractConfig, Scanner};
///
/// let dump = "CREATE TABLE sec_user (id integer, name text);\n\
///             COPY sec_user (id, name) FROM stdin;\n\
///             1\tAlice\n\
///             2\t\\N\n\
///             \\.\n";
///
/// let mut scanner = Scanner::new(&ExtractConfig::default()).unwrap();
/// scanner.scan_str(dump);
/// let extraction = scanner.finish();
///
/// assert_eq!(extraction.schemas()[0].name(), Some("sec_user"));
/// assert!(extraction.data_statements()[0].to_string().contains("('2', NULL);"));
/// ```
#[derive(Debug)]
pub struct Scanner<O = NoopObserver> {
    patterns: Patterns,
    state: ScanState,
    line_number: usize,
    extraction: Extraction,
    observer: O,
}

impl Scanner<NoopObserver> {
    /// Create a scanner that reports nothing while scanning.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &ExtractConfig) -> Result<Self, Error> {
        Self::with_observer(config, NoopObserver)
    }
}

impl<O: ScanObserver> Scanner<O> {
    /// Idle classification rules, in priority order.
    const IDLE_RULES: [Rule<O>; 6] = [
        Self::start_table,
        Self::start_sequence,
        Self::sequence_ownership,
        Self::column_default,
        Self::start_copy,
        Self::start_constraint,
    ];

    /// Create a scanner reporting progress to `observer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_observer(config: &ExtractConfig, observer: O) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            patterns: Patterns::new(config)?,
            state: ScanState::Idle,
            line_number: 0,
            extraction: Extraction::default(),
            observer,
        })
    }

    /// Number of lines fed so far.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Feed every line of `reader`.
    ///
    /// Lines are split on `\n` and decoded lossily, so invalid UTF-8 never
    /// stops the scan.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by `reader`.
    pub fn scan<R: BufRead>(&mut self, mut reader: R) -> io::Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                return Ok(());
            }
            self.feed_line(&String::from_utf8_lossy(&buf));
        }
    }

    /// Feed every line of an in-memory dump.
    pub fn scan_str(&mut self, input: &str) {
        for line in input.split_inclusive('\n') {
            self.feed_line(line);
        }
    }

    /// Feed one physical line, terminator included.
    pub fn feed_line(&mut self, line: &str) {
        self.line_number += 1;
        self.state = match mem::take(&mut self.state) {
            ScanState::Idle => self.classify(line),
            ScanState::InCreateTable(pending) => {
                self.continue_definition(pending, line, ScanState::InCreateTable)
            }
            ScanState::InCreateSequence(pending) => {
                self.continue_definition(pending, line, ScanState::InCreateSequence)
            }
            ScanState::InConstraint(reader) => self.constraint_step(reader.feed(line)),
            ScanState::InCopy(block) => self.continue_copy(block, line),
        };
    }

    /// End the scan. Any statement still open is reported as unterminated.
    #[must_use]
    pub fn finish(mut self) -> Extraction {
        match mem::take(&mut self.state) {
            ScanState::Idle => {}
            ScanState::InCreateTable(pending) | ScanState::InCreateSequence(pending) => {
                self.warn(pending.unterminated());
            }
            ScanState::InConstraint(reader) => self.warn(reader.unterminated()),
            ScanState::InCopy(block) => self.warn(Warning::Unterminated {
                kind: StatementKind::Copy,
                name: Some(block.table().to_owned()),
                line: block.line(),
            }),
        }
        self.extraction
    }

    fn classify(&mut self, line: &str) -> ScanState {
        Self::IDLE_RULES
            .iter()
            .find_map(|rule| rule(self, line))
            .unwrap_or_default()
    }

    fn warn(&mut self, warning: Warning) {
        self.observer.on_warning(&warning);
        self.extraction.warnings.push(warning);
    }

    fn start_table(&mut self, line: &str) -> Option<ScanState> {
        let name = self.patterns.create_table(line)?.to_owned();
        Some(self.open_definition(StatementKind::Table, name, line))
    }

    fn start_sequence(&mut self, line: &str) -> Option<ScanState> {
        let name = self.patterns.create_sequence(line)?.to_owned();
        Some(self.open_definition(StatementKind::Sequence, name, line))
    }

    fn sequence_ownership(&mut self, line: &str) -> Option<ScanState> {
        if !self.patterns.is_sequence_ownership(line) {
            return None;
        }
        self.extraction.sequence_ownerships.push(line.to_owned());
        Some(ScanState::Idle)
    }

    fn column_default(&mut self, line: &str) -> Option<ScanState> {
        if !self.patterns.is_column_default(line) {
            return None;
        }
        self.extraction.column_defaults.push(line.to_owned());
        Some(ScanState::Idle)
    }

    fn start_copy(&mut self, line: &str) -> Option<ScanState> {
        let (table, columns) = self.patterns.copy_header(line)?;
        let block = CopyBlock::new(table, columns, self.line_number);
        self.observer.on_copy(block.table());
        Some(ScanState::InCopy(block))
    }

    fn start_constraint(&mut self, line: &str) -> Option<ScanState> {
        if !self.patterns.is_constraint_start(line) {
            return None;
        }
        let table = self.patterns.constraint_table(line).map(str::to_owned);
        let step = ConstraintReader::start(table, self.line_number, line);
        Some(self.constraint_step(step))
    }

    fn open_definition(&mut self, kind: StatementKind, name: String, line: &str) -> ScanState {
        match PendingStatement::open(kind, Some(name), self.line_number, line) {
            Progress::Open(pending) if kind == StatementKind::Table => {
                ScanState::InCreateTable(pending)
            }
            Progress::Open(pending) => ScanState::InCreateSequence(pending),
            Progress::Closed(statement) => {
                self.close_definition(statement);
                ScanState::Idle
            }
        }
    }

    /// Buffer one more line of a table or sequence. A new in-scope
    /// `CREATE TABLE` or `CREATE SEQUENCE` abandons the pending statement.
    fn continue_definition(
        &mut self,
        pending: PendingStatement,
        line: &str,
        resume: fn(PendingStatement) -> ScanState,
    ) -> ScanState {
        if let Some(restart) = self
            .start_table(line)
            .or_else(|| self.start_sequence(line))
        {
            let warning = pending.abandoned(self.line_number);
            self.warn(warning);
            return restart;
        }
        match pending.feed(line) {
            Progress::Open(pending) => resume(pending),
            Progress::Closed(statement) => {
                self.close_definition(statement);
                ScanState::Idle
            }
        }
    }

    fn close_definition(&mut self, statement: RawStatement) {
        if statement.kind() == StatementKind::Table {
            self.observer.on_table(&statement);
            self.extraction.schemas.push(statement);
        } else {
            self.observer.on_sequence(&statement);
            self.extraction.sequences.push(statement);
        }
    }

    fn constraint_step(&mut self, step: ConstraintStep) -> ScanState {
        match step {
            ConstraintStep::Reading(reader) => ScanState::InConstraint(reader),
            ConstraintStep::Done(scan) => {
                self.close_constraint(scan);
                ScanState::Idle
            }
        }
    }

    fn close_constraint(&mut self, scan: ConstraintScan) {
        let ConstraintScan { statement, consumed } = scan;
        let retained = self.patterns.retains_constraint(&statement.text());
        log::trace!(
            "constraint at line {} closed after {consumed} line(s)",
            statement.line()
        );
        self.observer.on_constraint(&statement, retained);
        if retained {
            self.extraction.constraints.push(statement);
        }
    }

    fn continue_copy(&mut self, mut block: CopyBlock, line: &str) -> ScanState {
        if line.trim() == END_OF_DATA {
            if let Some(insert) = block.into_insert() {
                self.observer.on_insert(&insert);
                self.extraction.data_statements.push(insert);
            }
            return ScanState::Idle;
        }

        let row = CopyRow::new(self.line_number, line);
        let (expected, found) = (block.column_count(), row.field_count());
        if expected != found {
            self.warn(Warning::ArityMismatch {
                table: block.table().to_owned(),
                line: self.line_number,
                expected,
                found,
            });
        }
        block.push_row(row);
        ScanState::InCopy(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::InsertStatement;

    fn scan(input: &str) -> Extraction {
        let mut scanner = Scanner::new(&ExtractConfig::default()).unwrap();
        scanner.scan_str(input);
        scanner.finish()
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl ScanObserver for Recorder {
        fn on_table(&mut self, statement: &RawStatement) {
            self.events.push(format!("table {}", statement.name().unwrap()));
        }

        fn on_sequence(&mut self, statement: &RawStatement) {
            self.events.push(format!("sequence {}", statement.name().unwrap()));
        }

        fn on_copy(&mut self, table: &str) {
            self.events.push(format!("copy {table}"));
        }

        fn on_insert(&mut self, insert: &InsertStatement) {
            self.events
                .push(format!("insert {} {}", insert.table(), insert.rows().len()));
        }

        fn on_constraint(&mut self, _statement: &RawStatement, retained: bool) {
            self.events.push(format!("constraint {retained}"));
        }

        fn on_warning(&mut self, _warning: &Warning) {
            self.events.push("warning".into());
        }
    }

    #[test]
    fn test_multi_line_table() {
        let extraction = scan(
            "CREATE TABLE sec_user (\n    id integer NOT NULL,\n    name text\n);\n\nCREATE TABLE cmn_account (\n    id integer\n);\n",
        );
        assert_eq!(extraction.schemas().len(), 1);
        assert_eq!(
            extraction.schemas()[0].text(),
            "CREATE TABLE sec_user (\n    id integer NOT NULL,\n    name text\n);\n"
        );
        assert!(extraction.warnings().is_empty());
    }

    #[test]
    fn test_table_lines_are_not_classified() {
        let extraction = scan(
            "CREATE TABLE sec_user (\n    note text DEFAULT nextval('sec_x')\n);\n",
        );
        assert_eq!(extraction.schemas().len(), 1);
        assert!(extraction.column_defaults().is_empty());
    }

    #[test]
    fn test_sequence_and_ownership() {
        let extraction = scan(
            "CREATE SEQUENCE sec_user_id_seq\n    START WITH 1\n    CACHE 1;\n\nALTER SEQUENCE sec_user_id_seq OWNED BY sec_user.id;\n",
        );
        assert_eq!(extraction.sequences().len(), 1);
        assert_eq!(extraction.sequences()[0].lines().len(), 3);
        assert_eq!(
            extraction.sequence_ownerships(),
            ["ALTER SEQUENCE sec_user_id_seq OWNED BY sec_user.id;\n"]
        );
    }

    #[test]
    fn test_column_default_wins_over_constraint() {
        let line = "ALTER TABLE ONLY sec_user ALTER COLUMN id SET DEFAULT nextval('sec_user_id_seq'::regclass);\n";
        let extraction = scan(line);
        assert_eq!(extraction.column_defaults(), [line]);
        assert!(extraction.constraints().is_empty());
    }

    #[test]
    fn test_copy_region() {
        let extraction = scan(
            "COPY sec_user (id, name) FROM stdin;\n1\tAlice\n2\t\\N\n\\.\n",
        );
        assert_eq!(extraction.data_statements().len(), 1);
        assert_eq!(
            extraction.data_statements()[0].to_string(),
            "-- Data for sec_user\nINSERT INTO sec_user (id, name) VALUES\n  ('1', 'Alice'),\n  ('2', NULL);\n"
        );
    }

    #[test]
    fn test_copy_rows_are_not_classified() {
        let extraction = scan(
            "COPY pdat_note (id, body) FROM stdin;\n1\tCREATE TABLE sec_fake (\n\\.\n",
        );
        assert!(extraction.schemas().is_empty());
        assert_eq!(extraction.data_statements()[0].rows().len(), 1);
    }

    #[test]
    fn test_empty_copy_region_renders_nothing() {
        let extraction = scan("COPY sec_user (id, name) FROM stdin;\n\\.\n");
        assert!(extraction.data_statements().is_empty());
        assert!(extraction.warnings().is_empty());
    }

    #[test]
    fn test_out_of_scope_copy_is_ignored() {
        let extraction = scan("COPY cmn_user (id) FROM stdin;\n1\n\\.\n");
        assert!(extraction.data_statements().is_empty());
    }

    #[test]
    fn test_arity_mismatch_is_reported_and_kept() {
        let extraction = scan("COPY sec_user (id, name) FROM stdin;\n1\tAlice\textra\n\\.\n");
        assert_eq!(extraction.data_statements()[0].rows()[0].len(), 3);
        assert_eq!(
            extraction.warnings(),
            [Warning::ArityMismatch {
                table: "sec_user".into(),
                line: 2,
                expected: 2,
                found: 3,
            }]
        );
        assert_eq!(extraction.malformed_count(), 0);
    }

    #[test]
    fn test_multi_line_constraint() {
        let extraction = scan(
            "ALTER TABLE ONLY sec_user\n    ADD CONSTRAINT sec_user_pkey PRIMARY KEY (id);\n",
        );
        assert_eq!(extraction.constraints().len(), 1);
        assert_eq!(extraction.constraints()[0].lines().len(), 2);
        assert_eq!(extraction.constraints()[0].name(), Some("sec_user"));
    }

    #[test]
    fn test_constraint_consumes_following_lines() {
        let extraction = scan(
            "ALTER TABLE ONLY sec_user\n    ADD CONSTRAINT fk FOREIGN KEY (role_id)\n    REFERENCES sec_role(id);\nCREATE TABLE sec_role (id integer);\n",
        );
        assert_eq!(extraction.constraints().len(), 1);
        assert_eq!(extraction.constraints()[0].lines().len(), 3);
        assert_eq!(extraction.schemas().len(), 1);
    }

    #[test]
    fn test_foreign_key_filter() {
        let extraction = scan(concat!(
            "ALTER TABLE ONLY sec_order ADD CONSTRAINT fk FOREIGN KEY (cmn_id) REFERENCES cmn_account(id);\n",
            "ALTER TABLE ONLY sec_user ADD CONSTRAINT fk2 FOREIGN KEY (person_id) REFERENCES pdat_person(id);\n",
            "ALTER TABLE ONLY pdat_person ADD CONSTRAINT fk3 FOREIGN KEY (x) REFERENCES other(id);\n",
            "ALTER TABLE ONLY sec_user ADD CONSTRAINT sec_user_name_key UNIQUE (name);\n",
        ));
        let names: Vec<String> = extraction.constraints().iter().map(RawStatement::text).collect();
        assert_eq!(names.len(), 2);
        assert!(names[0].contains("fk2"));
        assert!(names[1].contains("UNIQUE"));
    }

    #[test]
    fn test_unterminated_table_is_reported() {
        let extraction = scan("CREATE TABLE pdat_x (\n    id integer\n");
        assert!(extraction.schemas().is_empty());
        assert_eq!(
            extraction.warnings(),
            [Warning::Unterminated {
                kind: StatementKind::Table,
                name: Some("pdat_x".into()),
                line: 1,
            }]
        );
        assert_eq!(extraction.malformed_count(), 1);
    }

    #[test]
    fn test_unterminated_copy_is_reported() {
        let extraction = scan("\nCOPY sec_user (id) FROM stdin;\n1\n");
        assert!(extraction.data_statements().is_empty());
        assert_eq!(
            extraction.warnings(),
            [Warning::Unterminated {
                kind: StatementKind::Copy,
                name: Some("sec_user".into()),
                line: 2,
            }]
        );
    }

    #[test]
    fn test_new_start_abandons_pending_table() {
        let extraction = scan(
            "CREATE TABLE sec_a (\n    id integer\nCREATE TABLE sec_b (\n    id integer\n);\n",
        );
        assert_eq!(extraction.schemas().len(), 1);
        assert_eq!(extraction.schemas()[0].name(), Some("sec_b"));
        assert_eq!(
            extraction.warnings(),
            [Warning::Abandoned {
                kind: StatementKind::Table,
                name: Some("sec_a".into()),
                line: 1,
                restarted_at: 3,
            }]
        );
    }

    #[test]
    fn test_scan_reader_decodes_lossily() {
        let mut scanner = Scanner::new(&ExtractConfig::default()).unwrap();
        let input: &[u8] = b"COPY sec_user (id, name) FROM stdin;\n1\tcaf\xe9\n\\.\n";
        scanner.scan(input).unwrap();
        assert_eq!(scanner.line_number(), 3);
        let extraction = scanner.finish();
        assert_eq!(
            extraction.data_statements()[0].to_string(),
            "-- Data for sec_user\nINSERT INTO sec_user (id, name) VALUES\n  ('1', 'caf\u{FFFD}');\n"
        );
    }

    #[test]
    fn test_observer_sees_events_in_order() {
        let mut recorder = Recorder::default();
        let mut scanner =
            Scanner::with_observer(&ExtractConfig::default(), &mut recorder).unwrap();
        scanner.scan_str(concat!(
            "CREATE SEQUENCE sec_user_id_seq START 1;\n",
            "CREATE TABLE sec_user (id integer);\n",
            "COPY sec_user (id) FROM stdin;\n1\n\\.\n",
            "ALTER TABLE ONLY sec_user ADD CONSTRAINT pk PRIMARY KEY (id);\n",
            "CREATE TABLE pdat_x (\n",
        ));
        let _ = scanner.finish();
        assert_eq!(
            recorder.events,
            [
                "sequence sec_user_id_seq",
                "table sec_user",
                "copy sec_user",
                "insert sec_user 1",
                "constraint true",
                "warning",
            ]
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ExtractConfig::default().with_target_prefixes(Vec::<String>::new());
        assert!(matches!(
            Scanner::new(&config),
            Err(Error::NoTargetPrefixes)
        ));
    }
}
