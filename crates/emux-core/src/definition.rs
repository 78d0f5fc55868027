// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Static type descriptions of entity structs.
//!
//! A [`Definition`] describes a named struct: its ordered fields, their
//! kinds and raw annotations, and typed accessors to write and read each
//! field by name. `#[derive(Definition)]` generates it; [`Record`] is the
//! object-safe view the registry and decoder work with.
//!
//! # Manual implementation
//!
//! ```rust,ignore
//! #[derive(Debug, Default)]
//! struct Task {
//!     title: String
//! }
//!
//! impl Definition for Task {
//!     const TYPE_NAME: &'static str = "Task";
//!
//!     fn schema() -> Vec<FieldSchema> {
//!         vec![FieldSchema {
//!             name:        "title",
//!             kind:        FieldKind::Scalar(ScalarKind::Str),
//!             annotations: Annotations {
//!                 identity: Some("task"),
//!                 handle: Some("c"),
//!                 ..Annotations::NONE
//!             }
//!         }]
//!     }
//!
//!     fn write_field(&mut self, field: &str, value: FieldValue) -> Result<(), WriteError> {
//!         match field {
//!             "title" => access::assign_scalar(&mut self.title, field, value),
//!             _ => Err(WriteError::unknown(field, Self::TYPE_NAME))
//!         }
//!     }
//!
//!     fn read_field(&self, field: &str) -> Option<Value> {
//!         match field {
//!             "title" => Some(access::encode_scalar(&self.title)),
//!             _ => None
//!         }
//!     }
//! }
//! ```

use std::{any::Any, fmt};

use serde_json::Value;

use crate::{
    error::WriteError,
    value::{FieldKind, FieldValue, TypeKey}
};

/// Raw per-field annotations, exactly as written on the field.
///
/// Interpretation (which values are affirmative, which characters are
/// classification tokens) belongs to the [`Classifier`](crate::Classifier).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Annotations {
    /// Entity identifier (`id = "user"`), optionally with the suppression
    /// prefix.
    pub identity: Option<&'static str>,
    /// Axis flag (`axis = "true"`).
    pub axis:     Option<&'static str>,
    /// Index flag (`index = "true"`), effective together with `axis`.
    pub index:    Option<&'static str>,
    /// Classification tokens (`handle = "ce"`).
    pub handle:   Option<&'static str>,
    /// Primary external name, used first for request keys.
    pub json:     Option<&'static str>,
    /// Secondary external name, used first for storage keys.
    pub document: Option<&'static str>,
    /// Validator tag (`re/<pattern>/` or `rep/<preset>/`).
    pub validate: Option<&'static str>
}

impl Annotations {
    /// No annotations at all.
    pub const NONE: Self = Self {
        identity: None,
        axis:     None,
        index:    None,
        handle:   None,
        json:     None,
        document: None,
        validate: None
    };
}

/// Description of one struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    /// Rust field name.
    pub name:        &'static str,
    /// Kind resolved from the declared type.
    pub kind:        FieldKind,
    /// Raw annotations.
    pub annotations: Annotations
}

/// Static description of an entity struct.
///
/// Field names passed to [`write_field`](Self::write_field) and
/// [`read_field`](Self::read_field) are the Rust names reported by
/// [`schema`](Self::schema).
pub trait Definition: Default + fmt::Debug + Send + Sync + 'static {
    /// Struct name, used in diagnostics.
    const TYPE_NAME: &'static str;

    /// Fields in declaration order.
    fn schema() -> Vec<FieldSchema>;

    /// Write a value into the named field.
    ///
    /// # Errors
    ///
    /// [`WriteError::InvalidDataType`] when the value does not fit the field
    /// kind, [`WriteError::UnknownField`] for names not in the schema.
    fn write_field(&mut self, field: &str, value: FieldValue) -> Result<(), WriteError>;

    /// Render the named field as JSON, or `None` for unknown names.
    fn read_field(&self, field: &str) -> Option<Value>;
}

/// Object-safe view of a [`Definition`] value.
///
/// Implemented for every `Definition`; the registry stores zero-value
/// factories returning `Box<dyn Record>`.
pub trait Record: Any + fmt::Debug + Send + Sync {
    /// Type of the underlying struct.
    fn record_type(&self) -> TypeKey;

    /// Struct name of the underlying type.
    fn type_name(&self) -> &'static str;

    /// Schema of the underlying type.
    fn fields(&self) -> Vec<FieldSchema>;

    /// See [`Definition::write_field`].
    ///
    /// # Errors
    ///
    /// Propagates the [`WriteError`] of the underlying writer.
    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), WriteError>;

    /// See [`Definition::read_field`].
    fn get(&self, field: &str) -> Option<Value>;

    /// Borrow as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Convert into a sendable `Any` box for downcasting by value.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

impl<T: Definition> Record for T {
    fn record_type(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn fields(&self) -> Vec<FieldSchema> {
        T::schema()
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), WriteError> {
        self.write_field(field, value)
    }

    fn get(&self, field: &str) -> Option<Value> {
        self.read_field(field)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }
}

impl dyn Record {
    /// Check if the underlying type is `T`.
    pub fn is<T: Definition>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrow the underlying value as `T`.
    pub fn downcast_ref<T: Definition>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Take the underlying value as `T`.
    pub fn downcast<T: Definition>(self: Box<Self>) -> Option<T> {
        self.into_any().downcast::<T>().ok().map(|value| *value)
    }
}

fn zero<T: Definition>() -> Box<dyn Record> {
    Box::new(T::default())
}

/// Everything the registry needs to compile one definition.
#[derive(Clone)]
pub struct Blueprint {
    key:     TypeKey,
    name:    &'static str,
    fields:  Vec<FieldSchema>,
    factory: fn() -> Box<dyn Record>
}

impl Blueprint {
    /// Blueprint of type `T`.
    pub fn of<T: Definition>() -> Self {
        Self {
            key:     TypeKey::of::<T>(),
            name:    T::TYPE_NAME,
            fields:  T::schema(),
            factory: zero::<T>
        }
    }

    /// Source type.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Struct name.
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Zero-value factory.
    pub fn factory(&self) -> fn() -> Box<dyn Record> {
        self.factory
    }
}

impl fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blueprint")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
