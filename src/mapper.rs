//! Row-to-record mapping.
//!
//! Assigns the tokens of one row to the fields of a fresh record instance,
//! using the header binding and the conversion registry. Column-count
//! mismatches and conversion failures are hard row errors; an unknown
//! column is a *soft* per-column error that suppresses the column but keeps
//! the fields already written, leaving the verdict to the orchestrator's
//! error strategy.

use crate::config::ParserConfig;
use crate::convert::{ConversionRegistry, ConvertError};
use crate::error::{ParseError, Result};
use crate::header::HeaderBinding;
use crate::record::Record;

/// Outcome of mapping one row: the populated record (or the hard error
/// that dropped it) plus any soft per-column errors raised before the
/// mapping finished. Soft errors are reported even when a later column
/// hard-fails the row, so none of them goes unobserved.
#[derive(Debug)]
pub struct MappedRow<T> {
    pub outcome: Result<T>,
    pub column_errors: Vec<ParseError>,
}

/// Map one row's tokens onto a fresh record.
///
/// `line` is the 1-based input line number, used for error context only.
pub fn map_row<T: Record>(
    tokens: &[&str],
    binding: &HeaderBinding<T>,
    config: &ParserConfig<T>,
    registry: &ConversionRegistry,
    line: usize,
) -> MappedRow<T> {
    if tokens.len() != binding.column_count() {
        return MappedRow {
            outcome: Err(ParseError::ColumnCountMismatch {
                line,
                expected: binding.column_count(),
                found: tokens.len(),
            }),
            column_errors: Vec::new(),
        };
    }

    let mut record = T::default();
    let mut column_errors = Vec::new();

    for (token, column) in tokens.iter().zip(binding.columns()) {
        let Some(spec) = column.field else {
            if !config.ignore_unknown_columns() {
                column_errors.push(ParseError::UnknownColumn {
                    column: column.name.clone(),
                    line,
                });
            }
            continue;
        };

        let raw = if config.trim_fields() {
            token.trim()
        } else {
            *token
        };

        // Absence for nullable fields; the registry's empty-value rule
        // covers everything else.
        if raw.is_empty() && spec.nullable {
            continue;
        }

        let converted = match registry.convert(raw, &spec.ty) {
            Ok(converted) => converted,
            Err(e) => {
                let hard = match e {
                    ConvertError::Unsupported { ty } => ParseError::UnsupportedType { ty, line },
                    ConvertError::Failed { value, ty, reason } => ParseError::ConversionFailed {
                        value,
                        ty,
                        line,
                        reason,
                    },
                };
                return MappedRow {
                    outcome: Err(hard),
                    column_errors,
                };
            }
        };

        if let Some(value) = converted {
            if let Err(mismatch) = (spec.assign)(&mut record, value) {
                return MappedRow {
                    outcome: Err(ParseError::ConversionFailed {
                        value: raw.to_string(),
                        ty: spec.ty.clone(),
                        line,
                        reason: mismatch.to_string(),
                    }),
                    column_errors,
                };
            }
        }
    }

    MappedRow {
        outcome: Ok(record),
        column_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_record;

    csv_record! {
        #[derive(Debug)]
        struct Quote {
            symbol: String,
            bid: f64,
            rungs: i32,
        }
    }

    fn setup(config: &ParserConfig<Quote>) -> (HeaderBinding<Quote>, ConversionRegistry) {
        let binding = HeaderBinding::resolve("symbol,bid,rungs", config).unwrap();
        (binding, ConversionRegistry::with_builtins())
    }

    #[test]
    fn test_maps_full_row() {
        let config = ParserConfig::<Quote>::builder().build().unwrap();
        let (binding, registry) = setup(&config);

        let row = map_row(&["EUR/USD", "1.1", "5"], &binding, &config, &registry, 2);

        assert!(row.column_errors.is_empty());
        let record = row.outcome.unwrap();
        assert_eq!(record.symbol, "EUR/USD");
        assert_eq!(record.bid, 1.1);
        assert_eq!(record.rungs, 5);
    }

    #[test]
    fn test_trim_fields() {
        let config = ParserConfig::<Quote>::builder().build().unwrap();
        let (binding, registry) = setup(&config);

        let row = map_row(&[" EUR/USD ", " 1.1", "5 "], &binding, &config, &registry, 2);

        let record = row.outcome.unwrap();
        assert_eq!(record.symbol, "EUR/USD");
        assert_eq!(record.rungs, 5);
    }

    #[test]
    fn test_untrimmed_numeric_fails_when_trim_disabled() {
        let config = ParserConfig::<Quote>::builder()
            .with_trim_fields(false)
            .build()
            .unwrap();
        let (binding, registry) = setup(&config);

        let row = map_row(&["EUR/USD", " 1.1", "5"], &binding, &config, &registry, 2);

        assert!(matches!(
            row.outcome,
            Err(ParseError::ConversionFailed { line: 2, .. })
        ));
    }

    #[test]
    fn test_column_count_mismatch() {
        let config = ParserConfig::<Quote>::builder().build().unwrap();
        let (binding, registry) = setup(&config);

        let row = map_row(&["EUR/USD", "1.1"], &binding, &config, &registry, 3);

        assert!(matches!(
            row.outcome,
            Err(ParseError::ColumnCountMismatch {
                line: 3,
                expected: 3,
                found: 2,
            })
        ));
        assert!(row.column_errors.is_empty());
    }

    #[test]
    fn test_unknown_column_is_soft_and_keeps_assigned_fields() {
        let config = ParserConfig::<Quote>::builder().build().unwrap();
        let binding = HeaderBinding::resolve("symbol,note,rungs", &config).unwrap();
        let registry = ConversionRegistry::with_builtins();

        let row = map_row(&["EUR/USD", "ignored", "5"], &binding, &config, &registry, 2);

        assert_eq!(row.column_errors.len(), 1);
        assert!(matches!(
            &row.column_errors[0],
            ParseError::UnknownColumn { column, line: 2 } if column == "note"
        ));
        // Fields on either side of the unknown column are still written.
        let record = row.outcome.unwrap();
        assert_eq!(record.symbol, "EUR/USD");
        assert_eq!(record.rungs, 5);
    }

    #[test]
    fn test_unknown_column_ignored_when_configured() {
        let config = ParserConfig::<Quote>::builder()
            .with_ignore_unknown_columns(true)
            .build()
            .unwrap();
        let binding = HeaderBinding::resolve("symbol,note,rungs", &config).unwrap();
        let registry = ConversionRegistry::with_builtins();

        let row = map_row(&["EUR/USD", "ignored", "5"], &binding, &config, &registry, 2);

        assert!(row.column_errors.is_empty());
        assert!(row.outcome.is_ok());
    }

    #[test]
    fn test_empty_tokens_take_zero_values() {
        let config = ParserConfig::<Quote>::builder().build().unwrap();
        let (binding, registry) = setup(&config);

        let row = map_row(&["", "", ""], &binding, &config, &registry, 2);

        let record = row.outcome.unwrap();
        assert_eq!(record.symbol, "");
        assert_eq!(record.bid, 0.0);
        assert_eq!(record.rungs, 0);
    }

    #[test]
    fn test_conversion_failure_is_hard() {
        let config = ParserConfig::<Quote>::builder().build().unwrap();
        let (binding, registry) = setup(&config);

        let row = map_row(
            &["EUR/USD", "not_a_number", "5"],
            &binding,
            &config,
            &registry,
            4,
        );

        match row.outcome {
            Err(ParseError::ConversionFailed { value, line, .. }) => {
                assert_eq!(value, "not_a_number");
                assert_eq!(line, 4);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_soft_errors_survive_a_later_hard_failure() {
        let config = ParserConfig::<Quote>::builder().build().unwrap();
        let binding = HeaderBinding::resolve("symbol,note,rungs", &config).unwrap();
        let registry = ConversionRegistry::with_builtins();

        let row = map_row(
            &["EUR/USD", "ignored", "not_a_number"],
            &binding,
            &config,
            &registry,
            2,
        );

        // The unknown column was raised before the conversion failed and
        // must still be reported alongside it.
        assert_eq!(row.column_errors.len(), 1);
        assert!(matches!(
            &row.column_errors[0],
            ParseError::UnknownColumn { column, line: 2 } if column == "note"
        ));
        assert!(matches!(
            row.outcome,
            Err(ParseError::ConversionFailed { line: 2, .. })
        ));
    }
}
