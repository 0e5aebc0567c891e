//! Parser configuration and error-handling strategy.
//!
//! A [`ParserConfig`] is built once per parse operation through the fluent
//! builder and never mutated afterwards. The target record shape is the
//! type parameter; everything else is the option table from the crate docs.

use std::collections::HashMap;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};

/// Strategy applied to row-level parsing errors.
///
/// Configuration-level errors (empty input, empty header, empty delimiter)
/// are always fatal and bypass the strategy entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorStrategy {
    /// Log the error as a warning and move on to the next line.
    #[default]
    Continue,

    /// Fail the whole parse call with the first row-level error.
    Halt,

    /// Record every error with its line number, keep parsing, and surface
    /// the batch alongside the records at the end.
    Collect,
}

/// Immutable configuration for one parse operation over records of type `T`.
#[derive(Debug, Clone)]
pub struct ParserConfig<T> {
    delimiter: String,
    skip_empty_lines: bool,
    trim_fields: bool,
    header_aliases: HashMap<String, String>,
    ignore_unknown_columns: bool,
    error_strategy: ErrorStrategy,
    _shape: PhantomData<fn() -> T>,
}

impl<T> ParserConfig<T> {
    /// Start building a configuration with the default option table.
    pub fn builder() -> ParserConfigBuilder<T> {
        ParserConfigBuilder::new()
    }

    /// Literal token rows are split on. Never empty.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn skip_empty_lines(&self) -> bool {
        self.skip_empty_lines
    }

    pub fn trim_fields(&self) -> bool {
        self.trim_fields
    }

    /// Alias table from raw-or-normalized header name to canonical field name.
    pub fn header_aliases(&self) -> &HashMap<String, String> {
        &self.header_aliases
    }

    pub fn ignore_unknown_columns(&self) -> bool {
        self.ignore_unknown_columns
    }

    pub fn error_strategy(&self) -> ErrorStrategy {
        self.error_strategy
    }
}

impl<T> Default for ParserConfig<T> {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            skip_empty_lines: true,
            trim_fields: true,
            header_aliases: HashMap::new(),
            ignore_unknown_columns: false,
            error_strategy: ErrorStrategy::default(),
            _shape: PhantomData,
        }
    }
}

/// Fluent builder for [`ParserConfig`].
#[derive(Debug, Clone)]
pub struct ParserConfigBuilder<T> {
    config: ParserConfig<T>,
}

impl<T> ParserConfigBuilder<T> {
    fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Set the literal split token (e.g. `","` or `"|"`).
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.config.delimiter = delimiter.into();
        self
    }

    pub fn with_skip_empty_lines(mut self, skip: bool) -> Self {
        self.config.skip_empty_lines = skip;
        self
    }

    pub fn with_trim_fields(mut self, trim: bool) -> Self {
        self.config.trim_fields = trim;
        self
    }

    /// Set the header alias table. Keys may be raw or normalized; they are
    /// normalized (trimmed, lowercased) before matching.
    pub fn with_header_aliases(mut self, aliases: HashMap<String, String>) -> Self {
        self.config.header_aliases = aliases;
        self
    }

    /// Add a single header alias.
    pub fn with_header_alias(
        mut self,
        header: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        self.config
            .header_aliases
            .insert(header.into(), field.into());
        self
    }

    pub fn with_ignore_unknown_columns(mut self, ignore: bool) -> Self {
        self.config.ignore_unknown_columns = ignore;
        self
    }

    pub fn with_error_strategy(mut self, strategy: ErrorStrategy) -> Self {
        self.config.error_strategy = strategy;
        self
    }

    /// Validate and finish. Fails with
    /// [`InvalidDelimiter`](ParseError::InvalidDelimiter) when the delimiter
    /// is empty.
    pub fn build(self) -> Result<ParserConfig<T>> {
        if self.config.delimiter.is_empty() {
            return Err(ParseError::InvalidDelimiter);
        }
        Ok(self.config)
    }
}
