//! String-to-value conversion registry.
//!
//! Maps a [`FieldType`] descriptor to a conversion closure and holds the
//! built-in converters for the standard field types. Callers may register
//! converters for their own types (or override the built-ins) at any time;
//! the last registration for a type wins and is visible to every subsequent
//! conversion, regardless of which parse call triggered it.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

/// Type descriptor for a record field.
///
/// The primitive-like variants (`Int` through `Char`) substitute a zero value
/// for empty input; the reference-like variants yield absence instead.
/// `Other` identifies a caller-defined type by tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Int,
    Long,
    Double,
    Float,
    Bool,
    Char,
    Decimal,
    Date,
    DateTime,
    /// Caller-defined type, matched by exact tag.
    Other(&'static str),
}

impl FieldType {
    /// Value substituted for empty input, if the type has one.
    ///
    /// Primitive-like types map an empty string to their zero value; all
    /// other types map it to absence (`None`), leaving the record field at
    /// its default.
    pub fn empty_value(&self) -> Option<FieldValue> {
        match self {
            FieldType::Int => Some(FieldValue::Int(0)),
            FieldType::Long => Some(FieldValue::Long(0)),
            FieldType::Double => Some(FieldValue::Double(0.0)),
            FieldType::Float => Some(FieldValue::Float(0.0)),
            FieldType::Bool => Some(FieldValue::Bool(false)),
            FieldType::Char => Some(FieldValue::Char('\0')),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Text => "text",
            FieldType::Int => "int",
            FieldType::Long => "long",
            FieldType::Double => "double",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Char => "char",
            FieldType::Decimal => "decimal",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Other(tag) => tag,
        };
        f.write_str(name)
    }
}

/// A converted field value, produced by the registry and consumed by a
/// record's field assigners.
pub enum FieldValue {
    Text(String),
    Int(i32),
    Long(i64),
    Double(f64),
    Float(f32),
    Bool(bool),
    Char(char),
    Decimal(Decimal),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Value of a caller-defined type, downcast by the field assigner.
    Other(Box<dyn Any + Send>),
}

impl FieldValue {
    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Int(_) => "int",
            FieldValue::Long(_) => "long",
            FieldValue::Double(_) => "double",
            FieldValue::Float(_) => "float",
            FieldValue::Bool(_) => "bool",
            FieldValue::Char(_) => "char",
            FieldValue::Decimal(_) => "decimal",
            FieldValue::Date(_) => "date",
            FieldValue::DateTime(_) => "datetime",
            FieldValue::Other(_) => "other",
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(v) => write!(f, "Text({v:?})"),
            FieldValue::Int(v) => write!(f, "Int({v})"),
            FieldValue::Long(v) => write!(f, "Long({v})"),
            FieldValue::Double(v) => write!(f, "Double({v})"),
            FieldValue::Float(v) => write!(f, "Float({v})"),
            FieldValue::Bool(v) => write!(f, "Bool({v})"),
            FieldValue::Char(v) => write!(f, "Char({v:?})"),
            FieldValue::Decimal(v) => write!(f, "Decimal({v})"),
            FieldValue::Date(v) => write!(f, "Date({v})"),
            FieldValue::DateTime(v) => write!(f, "DateTime({v})"),
            FieldValue::Other(_) => f.write_str("Other(..)"),
        }
    }
}

/// Conversion failure local to the registry. The record mapper lifts these
/// into [`ParseError`](crate::error::ParseError) with line context attached.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("no converter registered for {ty}")]
    Unsupported { ty: FieldType },

    #[error("failed to convert '{value}' to {ty}: {reason}")]
    Failed {
        value: String,
        ty: FieldType,
        reason: String,
    },
}

type Converter = Arc<dyn Fn(&str) -> std::result::Result<FieldValue, String> + Send + Sync>;

static GLOBAL: OnceLock<Arc<ConversionRegistry>> = OnceLock::new();

/// Registry of string-to-value converters, keyed by [`FieldType`].
///
/// Interior mutability lets converters be registered while parses are
/// running; the design makes no ordering promise between a concurrent
/// `register` and an in-flight `convert` of the same type, so callers
/// should register converters before starting concurrent parses.
pub struct ConversionRegistry {
    converters: RwLock<HashMap<FieldType, Converter>>,
}

impl ConversionRegistry {
    /// Create a registry pre-populated with the built-in converters.
    ///
    /// Built-ins cover text (identity), int, long, double, float, bool,
    /// decimal, date, and datetime, each via the type's canonical `FromStr`
    /// parse. `char` has a zero value for empty input but no built-in
    /// converter; register one if non-empty char columns are expected.
    pub fn with_builtins() -> Self {
        let registry = Self {
            converters: RwLock::new(HashMap::new()),
        };

        registry.register(FieldType::Text, |raw| Ok(FieldValue::Text(raw.to_string())));
        registry.register(FieldType::Int, |raw| parse_builtin::<i32>(raw));
        registry.register(FieldType::Long, |raw| parse_builtin::<i64>(raw));
        registry.register(FieldType::Double, |raw| parse_builtin::<f64>(raw));
        registry.register(FieldType::Float, |raw| parse_builtin::<f32>(raw));
        registry.register(FieldType::Bool, |raw| parse_builtin::<bool>(raw));
        registry.register(FieldType::Decimal, |raw| parse_builtin::<Decimal>(raw));
        registry.register(FieldType::Date, |raw| parse_builtin::<NaiveDate>(raw));
        registry.register(FieldType::DateTime, |raw| parse_builtin::<NaiveDateTime>(raw));

        registry
    }

    /// The process-wide shared registry, initialized with the built-ins on
    /// first use. Registrations on it are visible to every parser that was
    /// created with [`CsvParser::new`](crate::parser::CsvParser::new).
    pub fn global() -> Arc<ConversionRegistry> {
        GLOBAL
            .get_or_init(|| Arc::new(Self::with_builtins()))
            .clone()
    }

    /// Install or overwrite the converter for `ty`. Last registration wins.
    pub fn register<F>(&self, ty: FieldType, convert: F)
    where
        F: Fn(&str) -> std::result::Result<FieldValue, String> + Send + Sync + 'static,
    {
        debug!("registering converter for {}", ty);
        self.converters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ty, Arc::new(convert));
    }

    /// Convert a raw string to a value of the given type.
    ///
    /// Empty input never reaches a converter: primitive-like types yield
    /// `Ok(Some(zero value))` and reference-like types yield `Ok(None)`
    /// (absence), even when no converter is registered for the type.
    pub fn convert(
        &self,
        raw: &str,
        ty: &FieldType,
    ) -> std::result::Result<Option<FieldValue>, ConvertError> {
        if raw.is_empty() {
            return Ok(ty.empty_value());
        }

        let converter = self
            .converters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ty)
            .cloned()
            .ok_or_else(|| ConvertError::Unsupported { ty: ty.clone() })?;

        converter(raw)
            .map(Some)
            .map_err(|reason| ConvertError::Failed {
                value: raw.to_string(),
                ty: ty.clone(),
                reason,
            })
    }
}

impl Default for ConversionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for ConversionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self
            .converters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("ConversionRegistry")
            .field("converters", &count)
            .finish()
    }
}

/// Parse a raw string with the type's canonical `FromStr` implementation.
fn parse_builtin<T>(raw: &str) -> std::result::Result<FieldValue, String>
where
    T: FromStr,
    T::Err: fmt::Display,
    FieldValue: From<T>,
{
    raw.parse::<T>()
        .map(FieldValue::from)
        .map_err(|e| e.to_string())
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Long(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Double(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<char> for FieldValue {
    fn from(v: char) -> Self {
        FieldValue::Char(v)
    }
}

impl From<Decimal> for FieldValue {
    fn from(v: Decimal) -> Self {
        FieldValue::Decimal(v)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(v: NaiveDate) -> Self {
        FieldValue::Date(v)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(v: NaiveDateTime) -> Self {
        FieldValue::DateTime(v)
    }
}
