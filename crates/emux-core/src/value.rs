// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field kinds and the values written into entity fields.
//!
//! Every field of a [`Definition`](crate::Definition) is described by a
//! closed [`FieldKind`], resolved once when the type description is
//! generated. Writes go through [`FieldValue`], reads produce JSON
//! [`Value`]s.
//!
//! # Kinds
//!
//! | Rust type | Kind |
//! |-----------|------|
//! | `String` | `Scalar(Str)` |
//! | `i8`..`i64`, `u8`..`u64`, `isize`, `usize` | `Scalar(Int)` |
//! | `f32`, `f64` | `Scalar(Float)` |
//! | `bool` | `Scalar(Bool)` |
//! | `Vec<scalar>` | `List(..)` |
//! | any other struct `T` | `Record(T)` |
//! | `Vec<T>` | `Collection(T)` |

use std::{
    any::{TypeId, type_name},
    fmt,
    hash::{Hash, Hasher}
};

use serde_json::{Map, Value};

use crate::definition::Record;

/// Store document: a string-keyed JSON map.
pub type Document = Map<String, Value>;

/// Untyped request payload: a string-keyed JSON map.
pub type Payload = Map<String, Value>;

/// Identity of a Rust type, comparable at runtime.
///
/// Equality and hashing only consider the [`TypeId`]; the name is kept for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id:   TypeId,
    name: &'static str
}

impl TypeKey {
    /// Key for type `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id:   TypeId::of::<T>(),
            name: type_name::<T>()
        }
    }

    /// Underlying type id.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

/// Scalar field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `String`.
    Str,
    /// Any integer primitive.
    Int,
    /// `f32` or `f64`.
    Float,
    /// `bool`.
    Bool
}

impl ScalarKind {
    /// Human-readable kind name used in error messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool"
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of an entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single scalar value.
    Scalar(ScalarKind),
    /// `Vec` of scalars.
    List(ScalarKind),
    /// Nested record stored by value.
    Record(TypeKey),
    /// `Vec` of nested records.
    Collection(TypeKey)
}

impl FieldKind {
    /// Record type this field can embed, if any.
    ///
    /// For collections this is the element type.
    pub fn record_type(&self) -> Option<TypeKey> {
        match self {
            Self::Record(key) | Self::Collection(key) => Some(*key),
            Self::Scalar(_) | Self::List(_) => None
        }
    }

    /// Check if this is a collection-typed field.
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    /// Human-readable kind name used in error messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scalar(kind) => kind.as_str(),
            Self::List(_) => "list",
            Self::Record(_) => "record",
            Self::Collection(_) => "collection"
        }
    }
}

/// Value written into a single entity field.
#[derive(Debug)]
pub enum FieldValue {
    /// String value.
    Str(String),
    /// Integer value.
    Int(i64),
    /// Integer value above `i64::MAX`.
    UInt(u64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// List of scalar values.
    List(Vec<FieldValue>),
    /// Decoded nested record.
    Record(Box<dyn Record>),
    /// Decoded nested records, in payload order.
    Records(Vec<Box<dyn Record>>)
}

impl FieldValue {
    /// Convert a JSON value into a scalar or list field value.
    ///
    /// Objects, `null`, and arrays containing anything but scalars have no
    /// scalar representation and yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Some(Self::Int(i)),
                (None, Some(u)) => Some(Self::UInt(u)),
                (None, None) => n.as_f64().map(Self::Float)
            },
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Array(_) => None,
                    other => Self::from_json(other)
                })
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
            Value::Null | Value::Object(_) => None
        }
    }

    /// Human-readable kind name used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) | Self::UInt(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::List(_) => "list",
            Self::Record(_) => "record",
            Self::Records(_) => "collection"
        }
    }
}

/// Rust types accepted as scalar fields.
///
/// Implemented for `String`, `bool`, every integer primitive, `f32` and
/// `f64`. Conversions accept integral floats for integer slots and integers
/// for float slots; everything else is a mismatch.
pub trait Scalar: Sized {
    /// Kind reported in the field schema.
    const KIND: ScalarKind;

    /// Convert a written value, or `None` on mismatch.
    fn from_field_value(value: FieldValue) -> Option<Self>;

    /// Render the current value as JSON.
    fn to_json(&self) -> Value;
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::Str;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Str(s) => Some(s),
            _ => None
        }
    }

    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }
}

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(b) => Some(b),
            _ => None
        }
    }

    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }
}

/// Integral `f64` within `i64` range, as `i64`.
fn integral(f: f64) -> Option<i64> {
    // 2^63 is exactly representable; the open upper bound keeps the cast exact.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    (f.is_finite() && f.fract() == 0.0 && f >= -BOUND && f < BOUND).then_some(f as i64)
}

macro_rules! int_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: ScalarKind = ScalarKind::Int;

                fn from_field_value(value: FieldValue) -> Option<Self> {
                    match value {
                        FieldValue::Int(i) => <$ty>::try_from(i).ok(),
                        FieldValue::UInt(u) => <$ty>::try_from(u).ok(),
                        FieldValue::Float(f) => integral(f).and_then(|i| <$ty>::try_from(i).ok()),
                        _ => None
                    }
                }

                fn to_json(&self) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

int_scalar!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: ScalarKind = ScalarKind::Float;

                fn from_field_value(value: FieldValue) -> Option<Self> {
                    match value {
                        FieldValue::Int(i) => Some(i as $ty),
                        FieldValue::UInt(u) => Some(u as $ty),
                        FieldValue::Float(f) => Some(f as $ty),
                        _ => None
                    }
                }

                fn to_json(&self) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

float_scalar!(f32, f64);

/// Check whether a rendered field value is its type's zero value.
///
/// `null`, `""`, `0`, `0.0`, `false`, and empty arrays or objects are zero.
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty()
    }
}

/// JSON type name used in error messages.
pub(crate) const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn type_key_compares_by_id() {
        assert_eq!(TypeKey::of::<String>(), TypeKey::of::<String>());
        assert_ne!(TypeKey::of::<String>(), TypeKey::of::<i64>());
        assert!(TypeKey::of::<String>().name().contains("String"));
    }

    #[test]
    fn from_json_scalars() {
        assert!(matches!(FieldValue::from_json(&json!("x")), Some(FieldValue::Str(s)) if s == "x"));
        assert!(matches!(FieldValue::from_json(&json!(3)), Some(FieldValue::Int(3))));
        assert!(matches!(FieldValue::from_json(&json!(1.5)), Some(FieldValue::Float(f)) if f == 1.5));
        assert!(matches!(FieldValue::from_json(&json!(true)), Some(FieldValue::Bool(true))));
        assert!(FieldValue::from_json(&json!(null)).is_none());
        assert!(FieldValue::from_json(&json!({"a": 1})).is_none());
    }

    #[test]
    fn from_json_lists() {
        let list = FieldValue::from_json(&json!(["a", "b"]));
        assert!(matches!(list, Some(FieldValue::List(items)) if items.len() == 2));
        assert!(FieldValue::from_json(&json!([{"a": 1}])).is_none());
        assert!(FieldValue::from_json(&json!([[1]])).is_none());
    }

    #[test]
    fn int_coercions() {
        assert_eq!(i64::from_field_value(FieldValue::Int(7)), Some(7));
        assert_eq!(i32::from_field_value(FieldValue::Float(7.0)), Some(7));
        assert_eq!(i32::from_field_value(FieldValue::Float(7.5)), None);
        assert_eq!(u8::from_field_value(FieldValue::Int(300)), None);
        assert_eq!(u8::from_field_value(FieldValue::Int(-1)), None);
        assert_eq!(i64::from_field_value(FieldValue::Str("7".into())), None);
    }

    #[test]
    fn unsigned_above_i64_range() {
        let value = FieldValue::from_json(&json!(u64::MAX));
        assert!(matches!(value, Some(FieldValue::UInt(u64::MAX))));
        assert_eq!(u64::from_field_value(FieldValue::UInt(u64::MAX)), Some(u64::MAX));
        assert_eq!(i64::from_field_value(FieldValue::UInt(u64::MAX)), None);
        assert_eq!(u32::from_field_value(FieldValue::UInt(1 << 40)), None);
        assert_eq!(f64::from_field_value(FieldValue::UInt(1 << 63)), Some(9_223_372_036_854_775_808.0));
        assert_eq!(u64::MAX.to_json(), json!(u64::MAX));
    }

    #[test]
    fn float_coercions() {
        assert_eq!(f64::from_field_value(FieldValue::Int(2)), Some(2.0));
        assert_eq!(f32::from_field_value(FieldValue::Float(0.5)), Some(0.5));
        assert_eq!(f64::from_field_value(FieldValue::Bool(true)), None);
    }

    #[test]
    fn string_and_bool_are_strict() {
        assert_eq!(String::from_field_value(FieldValue::Int(1)), None);
        assert_eq!(bool::from_field_value(FieldValue::Str("true".into())), None);
        assert_eq!(bool::from_field_value(FieldValue::Bool(false)), Some(false));
    }

    #[test]
    fn zero_values() {
        assert!(is_zero(&json!(null)));
        assert!(is_zero(&json!("")));
        assert!(is_zero(&json!(0)));
        assert!(is_zero(&json!(0.0)));
        assert!(is_zero(&json!(false)));
        assert!(is_zero(&json!([])));
        assert!(!is_zero(&json!("a")));
        assert!(!is_zero(&json!(-1)));
        assert!(!is_zero(&json!(true)));
    }

    #[test]
    fn field_kind_record_type() {
        let key = TypeKey::of::<u8>();
        assert_eq!(FieldKind::Record(key).record_type(), Some(key));
        assert_eq!(FieldKind::Collection(key).record_type(), Some(key));
        assert!(FieldKind::Collection(key).is_collection());
        assert_eq!(FieldKind::Scalar(ScalarKind::Int).record_type(), None);
    }
}
