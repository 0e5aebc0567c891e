//! rowbind
//!
//! A Rust library for mapping delimited-text (CSV) rows onto strongly typed
//! records, with a configurable header-to-field mapping and per-type value
//! conversion.
//!
//! This library provides tools for:
//! - Resolving and normalizing header lines, with case-insensitive matching
//!   and an alias table for awkward column names
//! - Splitting rows on a literal delimiter (no quoting or escaping)
//! - Converting string tokens through a registry of per-type converters,
//!   extensible with caller-defined types
//! - Three error-handling strategies: continue past bad rows, halt on the
//!   first error, or collect every error alongside the parsed records
//!
//! ## Usage
//!
//! ```rust
//! use rowbind::{CsvParser, ErrorStrategy, ParserConfig};
//!
//! rowbind::csv_record! {
//!     #[derive(Debug)]
//!     pub struct Quote {
//!         pub currency_pair: String,
//!         pub bid: f64,
//!         pub rungs: i32,
//!     }
//! }
//!
//! # fn main() -> rowbind::Result<()> {
//! let config = ParserConfig::<Quote>::builder()
//!     .with_header_alias("currency pair", "currency_pair")
//!     .with_header_alias("num. of rungs", "rungs")
//!     .with_error_strategy(ErrorStrategy::Collect)
//!     .build()?;
//!
//! let input = "Currency Pair,Bid,Num. Of Rungs\nEUR/USD,1.1,5\nGBP/USD,1.5,7\n";
//! let output = CsvParser::new().parse_lines(input.as_bytes(), &config)?;
//!
//! assert_eq!(output.records.len(), 2);
//! assert_eq!(output.records[0].currency_pair, "EUR/USD");
//! assert_eq!(output.records[1].rungs, 7);
//! assert!(output.errors.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! Quoted-field CSV grammar is out of scope: splitting is delimiter-literal
//! only, so a delimiter character inside a value always splits there.

pub mod config;
pub mod convert;
pub mod error;
pub mod header;
pub mod mapper;
pub mod parser;
pub mod record;
pub mod tokenize;

// Re-export the commonly used types
pub use config::{ErrorStrategy, ParserConfig, ParserConfigBuilder};
pub use convert::{ConversionRegistry, ConvertError, FieldType, FieldValue};
pub use error::{ParseError, Result};
pub use header::HeaderBinding;
pub use mapper::MappedRow;
pub use parser::{CsvParser, ErrorRecord, ParseOutput};
pub use record::{FieldSpec, FromField, Record, ValueMismatch};
