//! Record shape description and field assignment.
//!
//! A target record shape is described by an ordered set of field
//! capabilities, built once per type rather than rediscovered per row:
//! each [`FieldSpec`] carries the field's name, its declared [`FieldType`],
//! and an assignment function that writes a converted value into a fresh
//! record instance. The [`csv_record!`] macro derives the [`Record`] impl
//! for plain structs; hand-written impls work the same way.

use std::fmt;

use crate::convert::{FieldType, FieldValue};

/// A record shape rows can be mapped onto.
///
/// `Default` supplies the zero-valued instance each row starts from;
/// [`fields`](Record::fields) supplies the per-field capabilities.
pub trait Record: Default + 'static {
    /// Ordered field capabilities for this shape, built once per type.
    fn fields() -> &'static [FieldSpec<Self>]
    where
        Self: Sized;
}

/// One field capability of a record shape: name, declared type, and a way
/// to write a converted value into an instance.
pub struct FieldSpec<T> {
    /// Field name, matched case-sensitively against canonical column names.
    pub name: &'static str,

    /// Declared type, used to look up a converter in the registry.
    pub ty: FieldType,

    /// Whether empty input means absence rather than a zero value.
    pub nullable: bool,

    /// Write a converted value into the record.
    pub assign: fn(&mut T, FieldValue) -> std::result::Result<(), ValueMismatch>,
}

impl<T> fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("nullable", &self.nullable)
            .finish()
    }
}

/// A converter produced a value of a different kind than the field expects.
///
/// Reachable only when a registered converter returns the wrong
/// [`FieldValue`] variant for the type it was registered under.
#[derive(Debug, Clone)]
pub struct ValueMismatch {
    expected: &'static str,
    found: &'static str,
}

impl ValueMismatch {
    pub fn new(expected: &'static str, found: &'static str) -> Self {
        Self { expected, found }
    }
}

impl fmt::Display for ValueMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "converter produced {} where {} was expected",
            self.found, self.expected
        )
    }
}

/// Conversion from a [`FieldValue`] into a concrete field type.
///
/// Implemented for the standard field types, for `Option<F>` (absence maps
/// to `None`), and by callers for their own types registered under
/// [`FieldType::Other`].
pub trait FromField: Sized {
    /// The type descriptor this field is converted under.
    const TYPE: FieldType;

    /// Whether empty input means absence for this field. `Option` fields
    /// set this; everything else takes the registry's empty-value rule.
    const NULLABLE: bool = false;

    fn from_field(value: FieldValue) -> std::result::Result<Self, ValueMismatch>;
}

macro_rules! impl_from_field {
    ($rust:ty, $variant:ident, $ty:expr, $name:literal) => {
        impl FromField for $rust {
            const TYPE: FieldType = $ty;

            fn from_field(value: FieldValue) -> std::result::Result<Self, ValueMismatch> {
                match value {
                    FieldValue::$variant(v) => Ok(v),
                    other => Err(ValueMismatch::new($name, other.kind())),
                }
            }
        }
    };
}

impl_from_field!(String, Text, FieldType::Text, "text");
impl_from_field!(i32, Int, FieldType::Int, "int");
impl_from_field!(i64, Long, FieldType::Long, "long");
impl_from_field!(f64, Double, FieldType::Double, "double");
impl_from_field!(f32, Float, FieldType::Float, "float");
impl_from_field!(bool, Bool, FieldType::Bool, "bool");
impl_from_field!(char, Char, FieldType::Char, "char");
impl_from_field!(rust_decimal::Decimal, Decimal, FieldType::Decimal, "decimal");
impl_from_field!(chrono::NaiveDate, Date, FieldType::Date, "date");
impl_from_field!(chrono::NaiveDateTime, DateTime, FieldType::DateTime, "datetime");

impl<F: FromField> FromField for Option<F> {
    const TYPE: FieldType = F::TYPE;
    const NULLABLE: bool = true;

    fn from_field(value: FieldValue) -> std::result::Result<Self, ValueMismatch> {
        F::from_field(value).map(Some)
    }
}

impl FieldValue {
    /// Downcast a caller-defined value produced by a custom converter.
    pub fn into_custom<T: 'static>(self) -> std::result::Result<T, ValueMismatch> {
        match self {
            FieldValue::Other(any) => any
                .downcast::<T>()
                .map(|v| *v)
                .map_err(|_| ValueMismatch::new(std::any::type_name::<T>(), "other")),
            other => Err(ValueMismatch::new(std::any::type_name::<T>(), other.kind())),
        }
    }
}

/// Define a record struct and derive its [`Record`] impl.
///
/// Every field type must implement [`FromField`] and `Default`. Field names
/// become the canonical column names they bind to, so headers (after
/// normalization and aliasing) must match them exactly.
///
/// ```
/// rowbind::csv_record! {
///     #[derive(Debug)]
///     pub struct Quote {
///         pub symbol: String,
///         pub bid: f64,
///         pub rungs: i32,
///     }
/// }
///
/// use rowbind::Record;
/// assert_eq!(Quote::fields().len(), 3);
/// assert_eq!(Quote::fields()[0].name, "symbol");
/// ```
#[macro_export]
macro_rules! csv_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $ftype:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Default)]
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field : $ftype, )+
        }

        impl $crate::record::Record for $name {
            fn fields() -> &'static [$crate::record::FieldSpec<Self>] {
                const FIELDS: &[$crate::record::FieldSpec<$name>] = &[
                    $(
                        $crate::record::FieldSpec {
                            name: stringify!($field),
                            ty: <$ftype as $crate::record::FromField>::TYPE,
                            nullable: <$ftype as $crate::record::FromField>::NULLABLE,
                            assign: |record: &mut $name, value: $crate::convert::FieldValue| {
                                record.$field =
                                    <$ftype as $crate::record::FromField>::from_field(value)?;
                                Ok(())
                            },
                        },
                    )+
                ];
                FIELDS
            }
        }
    };
}
