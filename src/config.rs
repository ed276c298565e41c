//! Extraction settings shared by the scanner and the writers.

use crate::errors::Error;

/// Table and sequence name prefixes extracted when none are configured.
pub const DEFAULT_TARGET_PREFIXES: [&str; 2] = ["sec_", "pdat_"];

/// Foreign-key reference prefixes that cause a constraint to be discarded.
pub const DEFAULT_EXCLUDED_REFERENCE_PREFIXES: [&str; 4] = ["cmn_", "mde_", "stage_", "tmp_"];

/// Settings for one extraction run.
///
/// # Example
///
/// ```rust
/// use dump_subset::ExtractConfig;
///
/// let config = ExtractConfig::default()
///     .with_target_prefixes(["crm_"])
///     .with_title("Crm")
///     .with_strict(true);
///
/// assert_eq!(config.target_prefixes(), ["crm_"]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    target_prefixes: Vec<String>,
    excluded_reference_prefixes: Vec<String>,
    title: String,
    source_label: Option<String>,
    strict: bool,
    include_column_defaults: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            target_prefixes: DEFAULT_TARGET_PREFIXES.map(String::from).to_vec(),
            excluded_reference_prefixes: DEFAULT_EXCLUDED_REFERENCE_PREFIXES
                .map(String::from)
                .to_vec(),
            title: "Extracted".into(),
            source_label: None,
            strict: false,
            include_column_defaults: false,
        }
    }
}

impl ExtractConfig {
    /// Replace the target prefixes.
    #[must_use]
    pub fn with_target_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the excluded foreign-key reference prefixes.
    #[must_use]
    pub fn with_excluded_reference_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_reference_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the title shown in both document headers.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the name of the dump shown in both document headers.
    #[must_use]
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = Some(label.into());
        self
    }

    /// Fail the run when any statement never reaches its terminator.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Emit the collected `DEFAULT nextval` lines in the init document.
    #[must_use]
    pub fn with_column_defaults(mut self, include: bool) -> Self {
        self.include_column_defaults = include;
        self
    }

    /// Prefixes selecting the tables and sequences to extract.
    #[must_use]
    pub fn target_prefixes(&self) -> &[String] {
        &self.target_prefixes
    }

    /// Prefixes of tables that foreign keys must not reference.
    #[must_use]
    pub fn excluded_reference_prefixes(&self) -> &[String] {
        &self.excluded_reference_prefixes
    }

    /// Title shown in both document headers.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Name of the dump shown in both document headers.
    #[must_use]
    pub fn source_label(&self) -> &str {
        self.source_label.as_deref().unwrap_or("database dump")
    }

    /// Whether a source label was set explicitly.
    #[must_use]
    pub fn has_source_label(&self) -> bool {
        self.source_label.is_some()
    }

    /// Whether malformed statements abort the run.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Whether the init document carries a column defaults section.
    #[must_use]
    pub fn includes_column_defaults(&self) -> bool {
        self.include_column_defaults
    }

    /// Human-readable prefix list, e.g. `sec_* and pdat_*`.
    #[must_use]
    pub fn describe_prefixes(&self) -> String {
        let globs: Vec<String> = self
            .target_prefixes
            .iter()
            .map(|prefix| format!("{prefix}*"))
            .collect();
        match globs.split_last() {
            None => String::new(),
            Some((last, [])) => last.clone(),
            Some((last, rest)) => format!("{} and {last}", rest.join(", ")),
        }
    }

    /// Check that the configuration can drive a scan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTargetPrefixes`] if no target prefix is configured,
    /// or [`Error::EmptyPrefix`] if any prefix is the empty string.
    pub fn validate(&self) -> Result<(), Error> {
        if self.target_prefixes.is_empty() {
            return Err(Error::NoTargetPrefixes);
        }
        if self.target_prefixes.iter().any(String::is_empty) {
            return Err(Error::EmptyPrefix("target"));
        }
        if self.excluded_reference_prefixes.iter().any(String::is_empty) {
            return Err(Error::EmptyPrefix("excluded reference"));
        }
        Ok(())
    }
}
