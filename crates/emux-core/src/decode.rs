// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Recursive payload decoding.
//!
//! # Rules
//!
//! For every CREATE field of the entity, in declaration order:
//!
//! | Payload value | Field | Result |
//! |---------------|-------|--------|
//! | absent, `null`, `""` | any | skipped, zero value kept |
//! | map | single embedding | decoded recursively |
//! | array of maps | collection embedding | decoded in order |
//! | anything else | embedding | [`DecodeError::InvalidEmbeddedPayload`] |
//! | scalar or scalar array | not embedded | written, or [`WriteError`] recorded |
//!
//! Structural errors abort the entity and every enclosing entity. Field
//! write errors are recovered locally: the field keeps its zero value and
//! the error is reported in [`Decoded::skipped`].

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::{
    definition::{Definition, Record},
    error::{DecodeError, WriteError},
    metadata::{Embedding, EntityMetadata, FieldDescriptor},
    registry::EntityRegistry,
    value::{FieldValue, Payload, TypeKey, json_kind}
};

/// Successfully decoded value.
#[derive(Debug)]
pub struct Decoded {
    /// Decoded entity value.
    pub value:   Box<dyn Record>,
    /// Field writes that were rejected, including nested ones.
    pub skipped: Vec<WriteError>
}

/// Structural decode failure.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct DecodeFailure {
    /// Value decoded up to the failure, when one was allocated.
    pub partial: Option<Box<dyn Record>>,
    /// Cause.
    #[source]
    pub error:   DecodeError
}

impl DecodeFailure {
    fn new(partial: Option<Box<dyn Record>>, error: DecodeError) -> Self {
        Self {
            partial,
            error
        }
    }
}

impl From<DecodeFailure> for DecodeError {
    fn from(failure: DecodeFailure) -> Self {
        failure.error
    }
}

fn invalid_embedded(meta: &EntityMetadata, field: &FieldDescriptor, expected: &'static str, found: &Value) -> DecodeError {
    DecodeError::InvalidEmbeddedPayload {
        entity: meta.id().to_owned(),
        field: field.name().to_owned(),
        expected,
        found: json_kind(found)
    }
}

impl EntityRegistry {
    /// Decode `payload` into a value of entity `entity`.
    ///
    /// # Errors
    ///
    /// A [`DecodeFailure`] carrying the partial value and one of
    /// [`DecodeError::InvalidEntity`], [`DecodeError::NoCreatableFields`] or
    /// [`DecodeError::InvalidEmbeddedPayload`].
    pub fn decode(&self, entity: &str, payload: &Payload) -> Result<Decoded, DecodeFailure> {
        let mut skipped = Vec::new();
        let value = self.decode_entity(entity, payload, &mut skipped)?;
        Ok(Decoded {
            value,
            skipped
        })
    }

    /// Decode `payload` into a `T`.
    ///
    /// Field write errors are dropped; use [`decode`](Self::decode) to
    /// inspect them.
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] when `entity` is not registered for
    /// `T`, otherwise any error of [`decode`](Self::decode).
    pub fn decode_as<T: Definition>(&self, entity: &str, payload: &Payload) -> Result<T, DecodeError> {
        let meta = self
            .metadata(entity)
            .ok_or_else(|| DecodeError::InvalidEntity(entity.to_owned()))?;
        let mismatch = || DecodeError::TypeMismatch {
            entity:   entity.to_owned(),
            expected: T::TYPE_NAME,
            found:    meta.type_name()
        };
        if meta.source() != TypeKey::of::<T>() {
            return Err(mismatch());
        }
        self.decode(entity, payload)?.value.downcast::<T>().ok_or_else(mismatch)
    }

    fn decode_entity(
        &self,
        entity: &str,
        payload: &Payload,
        skipped: &mut Vec<WriteError>
    ) -> Result<Box<dyn Record>, DecodeFailure> {
        let meta = self
            .metadata(entity)
            .ok_or_else(|| DecodeFailure::new(None, DecodeError::InvalidEntity(entity.to_owned())))?;
        let mut value = meta.zero_value();
        if meta.creatable().next().is_none() {
            return Err(DecodeFailure::new(
                Some(value),
                DecodeError::NoCreatableFields(entity.to_owned())
            ));
        }

        for field in meta.creatable() {
            let Some(raw) = payload.get(field.request_key()) else {
                continue;
            };
            if raw.is_null() || raw.as_str() == Some("") {
                debug!(entity, field = field.name(), "empty payload value skipped");
                continue;
            }

            let written = match field.embedding() {
                Some(Embedding::Single(target)) => {
                    let Value::Object(nested) = raw else {
                        return Err(DecodeFailure::new(Some(value), invalid_embedded(meta, field, "map", raw)));
                    };
                    match self.decode_entity(target, nested, skipped) {
                        Ok(record) => FieldValue::Record(record),
                        Err(inner) => return Err(DecodeFailure::new(Some(value), inner.error))
                    }
                }
                Some(Embedding::Collection(target)) => {
                    let Value::Array(items) = raw else {
                        return Err(DecodeFailure::new(
                            Some(value),
                            invalid_embedded(meta, field, "array of maps", raw)
                        ));
                    };
                    let mut records = Vec::with_capacity(items.len());
                    for item in items {
                        let Value::Object(nested) = item else {
                            return Err(DecodeFailure::new(
                                Some(value),
                                invalid_embedded(meta, field, "array of maps", item)
                            ));
                        };
                        match self.decode_entity(target, nested, skipped) {
                            Ok(record) => records.push(record),
                            Err(inner) => return Err(DecodeFailure::new(Some(value), inner.error))
                        }
                    }
                    FieldValue::Records(records)
                }
                None => match FieldValue::from_json(raw) {
                    Some(scalar) => scalar,
                    None => {
                        debug!(entity, field = field.name(), found = json_kind(raw), "field value rejected");
                        skipped.push(WriteError::invalid(field.name(), field.kind().as_str(), json_kind(raw)));
                        continue;
                    }
                }
            };

            if let Err(error) = value.set(field.name(), written) {
                debug!(entity, field = field.name(), %error, "field write rejected");
                skipped.push(error);
            }
        }
        Ok(value)
    }
}
