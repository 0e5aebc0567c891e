//! Parse orchestration: drives the line source through header resolution,
//! tokenization, and record mapping, and applies the configured
//! error-handling strategy.
//!
//! A parse call moves through AwaitHeader → StreamingRows → Done; a halting
//! error is the only other terminal. There is no retry or resumption within
//! a call, and the line source is released on every exit path.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::{ErrorStrategy, ParserConfig};
use crate::convert::ConversionRegistry;
use crate::error::{ParseError, Result};
use crate::header::HeaderBinding;
use crate::mapper::map_row;
use crate::record::Record;
use crate::tokenize::split_line;

/// Result of a successful parse call: records in input row order and, under
/// the [`Collect`](ErrorStrategy::Collect) strategy, the errors in input
/// order too.
#[derive(Debug)]
pub struct ParseOutput<T> {
    pub records: Vec<T>,
    pub errors: Vec<ErrorRecord>,
}

/// One collected row-level error: line number and rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub line: usize,
    pub message: String,
}

/// Parser for delimited-text input, mapping rows onto caller-supplied
/// record shapes.
///
/// The parser itself only carries the conversion registry; all per-call
/// behavior lives in the [`ParserConfig`] passed to each parse.
#[derive(Debug, Clone)]
pub struct CsvParser {
    registry: Arc<ConversionRegistry>,
}

impl CsvParser {
    /// Create a parser backed by the process-wide conversion registry.
    pub fn new() -> Self {
        Self {
            registry: ConversionRegistry::global(),
        }
    }

    /// Create a parser backed by a private registry, isolated from
    /// registrations made on the global one.
    pub fn with_registry(registry: Arc<ConversionRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this parser converts through.
    pub fn registry(&self) -> &ConversionRegistry {
        &self.registry
    }

    /// Parse a file on disk. Thin wrapper over [`parse_lines`](Self::parse_lines).
    pub fn parse_path<T: Record>(
        &self,
        path: &Path,
        config: &ParserConfig<T>,
    ) -> Result<ParseOutput<T>> {
        info!("parsing {}", path.display());

        let file = File::open(path)
            .map_err(|e| ParseError::io(format!("failed to open {}", path.display()), e))?;

        self.parse_lines(BufReader::new(file), config)
    }

    /// Parse a sequential line source.
    ///
    /// The first line is the header (line 1); data rows are counted from
    /// line 2. A trailing carriage return is stripped from every line, so
    /// CRLF input parses identically to LF input.
    pub fn parse_lines<T: Record>(
        &self,
        reader: impl BufRead,
        config: &ParserConfig<T>,
    ) -> Result<ParseOutput<T>> {
        let mut lines = reader.lines();

        // AwaitHeader: no strategy applies before the header is in hand.
        let header_line = match lines.next() {
            None => return Err(ParseError::EmptyFile),
            Some(Err(e)) => return Err(ParseError::io("failed to read header line", e)),
            Some(Ok(line)) => line,
        };
        let binding = HeaderBinding::resolve(strip_cr(&header_line), config)?;

        let mut records = Vec::new();
        let mut errors = Vec::new();
        let mut line_number = 1;

        // StreamingRows
        for read in lines {
            line_number += 1;

            let line = match read {
                Ok(line) => line,
                Err(e) => {
                    let fault =
                        ParseError::io(format!("read failed at line {line_number}"), e);
                    handle_row_error(config.error_strategy(), fault, line_number, &mut errors)?;
                    continue;
                }
            };
            let line = strip_cr(&line);

            if config.skip_empty_lines() && line.trim().is_empty() {
                continue;
            }

            let tokens = split_line(line, config.delimiter())?;

            let row = map_row(&tokens, &binding, config, &self.registry, line_number);

            // Soft per-column errors precede the hard outcome in column
            // order, so under Halt the earliest error of the row is the one
            // raised, and under Collect every error of the row is recorded.
            for soft in row.column_errors {
                handle_row_error(config.error_strategy(), soft, line_number, &mut errors)?;
            }
            match row.outcome {
                Ok(record) => records.push(record),
                Err(e) => {
                    handle_row_error(config.error_strategy(), e, line_number, &mut errors)?;
                }
            }
        }

        // Done: surface the collected batch without aborting.
        if config.error_strategy() == ErrorStrategy::Collect && !errors.is_empty() {
            for entry in &errors {
                error!("line {}: {}", entry.line, entry.message);
            }
        }

        Ok(ParseOutput { records, errors })
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply the error strategy to one row-level error. Returns `Err` only
/// under [`Halt`](ErrorStrategy::Halt); the lenient strategies log or
/// collect and let streaming continue.
fn handle_row_error(
    strategy: ErrorStrategy,
    error: ParseError,
    line: usize,
    errors: &mut Vec<ErrorRecord>,
) -> Result<()> {
    match strategy {
        ErrorStrategy::Continue => {
            warn!("parsing error: {error}");
            Ok(())
        }
        ErrorStrategy::Halt => Err(error),
        ErrorStrategy::Collect => {
            errors.push(ErrorRecord {
                line,
                message: error.to_string(),
            });
            Ok(())
        }
    }
}

/// Strip one trailing carriage return, as a line reader over CRLF input
/// leaves it attached.
fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}
