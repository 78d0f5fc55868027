// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error types, one enum per concern.
//!
//! | Phase | Type | Recovery |
//! |-------|------|----------|
//! | Registration | [`RegistrationError`] | Fatal to the definition |
//! | Validator tags | [`ValidatorError`] | Wrapped in [`RegistrationError`] |
//! | Decode structure | [`DecodeError`] | Aborts the subtree, propagates |
//! | Field writes | [`WriteError`] | Field skipped, decoding continues |
//! | Value validation | [`ValidationError`] | Returned to the caller |
//! | Store | [`StoreError`] | Passed through unchanged |
//! | Entity operations | [`EntityError`] | Returned to the caller |
//! | Request context | [`ContextError`] | Returned to the caller |

use thiserror::Error;

/// Configuration-time failures of [`EntityRegistry`](crate::EntityRegistry)
/// registration.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// No store was supplied.
    #[error("store uninitialized")]
    StoreUninitialized,

    /// No field carries a usable identity annotation.
    #[error("missing identity annotation on '{type_name}'")]
    MissingIdentity {
        /// Offending struct.
        type_name: &'static str
    },

    /// Another definition already registered this identifier.
    #[error("duplicate identifier '{identifier}' on '{type_name}'")]
    DuplicateIdentifier {
        /// Colliding identifier.
        identifier: String,
        /// Struct that tried to reuse it.
        type_name:  &'static str
    },

    /// A `validate` annotation could not be compiled.
    #[error("invalid validator on '{type_name}.{field}': {source}")]
    InvalidValidator {
        /// Offending struct.
        type_name: &'static str,
        /// Offending field.
        field:     &'static str,
        /// Underlying tag error.
        #[source]
        source:    ValidatorError
    }
}

/// Failures compiling a validator tag.
#[derive(Debug, Clone, Error)]
pub enum ValidatorError {
    /// `rep/<name>/` names no known preset.
    #[error("unknown validation preset '{0}'")]
    UnknownPreset(String),

    /// `re/<pattern>/` is not a valid regular expression.
    #[error("invalid validation pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Raw pattern.
        pattern: String,
        /// Regex compiler error.
        #[source]
        source:  regex::Error
    }
}

/// Structural decode failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No entity is registered under the identifier.
    #[error("invalid entity reference '{0}'")]
    InvalidEntity(String),

    /// The entity declares no CREATE fields.
    #[error("no creatable fields on entity '{0}'")]
    NoCreatableFields(String),

    /// An embedded field received a payload of the wrong shape.
    #[error("invalid embedded payload for '{entity}.{field}': expected {expected}, got {found}")]
    InvalidEmbeddedPayload {
        /// Entity being decoded.
        entity:   String,
        /// Embedded field.
        field:    String,
        /// Expected shape.
        expected: &'static str,
        /// Shape received.
        found:    &'static str
    },

    /// The identifier names an entity of another type.
    #[error("entity '{entity}' is a '{found}', not a '{expected}'")]
    TypeMismatch {
        /// Entity identifier.
        entity:   String,
        /// Requested type.
        expected: &'static str,
        /// Registered type.
        found:    &'static str
    }
}

/// Field-level write failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// The value does not fit the field kind.
    #[error("invalid data type for field '{field}': expected {expected}, got {found}")]
    InvalidDataType {
        /// Field name.
        field:    String,
        /// Field kind.
        expected: &'static str,
        /// Kind of the value.
        found:    &'static str
    },

    /// The struct has no such field.
    #[error("unknown field '{field}' on '{type_name}'")]
    UnknownField {
        /// Field name.
        field:     String,
        /// Struct name.
        type_name: &'static str
    }
}

impl WriteError {
    /// Build an [`InvalidDataType`](Self::InvalidDataType) error.
    pub fn invalid(field: &str, expected: &'static str, found: &'static str) -> Self {
        Self::InvalidDataType {
            field: field.to_owned(),
            expected,
            found
        }
    }

    /// Build an [`UnknownField`](Self::UnknownField) error.
    pub fn unknown(field: &str, type_name: &'static str) -> Self {
        Self::UnknownField {
            field: field.to_owned(),
            type_name
        }
    }

    /// Field the error refers to.
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidDataType {
                field, ..
            }
            | Self::UnknownField {
                field, ..
            } => field
        }
    }
}

/// Field validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The validator expected a string.
    #[error("unexpected input type for field '{field}'")]
    InputTypeInvalid {
        /// Field name.
        field: String
    },

    /// The input did not match the pattern.
    #[error("input validation failed for field '{field}'")]
    InputInvalid {
        /// Field name.
        field: String
    }
}

/// Document store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("duplicate key for index '{index}' in collection '{collection}'")]
    DuplicateKey {
        /// Collection name.
        collection: String,
        /// Index name.
        index:      String
    },

    /// The filter or update used an operator the store does not support.
    #[error("unsupported operator '{0}'")]
    UnsupportedOperator(String),

    /// The update document is malformed.
    #[error("invalid update document: {0}")]
    InvalidUpdate(String),

    /// Backend-specific failure.
    #[error("store backend failure: {0}")]
    Backend(String)
}

/// Failures of [`Entity`](crate::Entity) operations.
#[derive(Debug, Error)]
pub enum EntityError {
    /// The value is not of the entity's source type.
    #[error("incompatible entity type: '{entity}' expects '{expected}', got '{found}'")]
    IncompatibleType {
        /// Entity identifier.
        entity:   String,
        /// Source type.
        expected: &'static str,
        /// Type of the value.
        found:    &'static str
    },

    /// No filter can be built from the value.
    #[error("entity axis undefined for '{0}' (axis policy)")]
    UndefinedAxis(String),

    /// The entity was registered without a collection.
    #[error("entity '{0}' has no storage collection")]
    NoStorage(String),

    /// The value failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError)
}

/// Request context failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The error slot was already set for this request.
    #[error("request error slot already set")]
    ErrorAlreadySet
}
