// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field classification.
//!
//! The [`Classifier`] interprets raw [`Annotations`] into classification
//! tokens, external keys and the entity identity. All tokens and markers
//! come from a caller-owned [`ClassifierConfig`].
//!
//! # Key resolution
//!
//! | Key | Priority |
//! |-----|----------|
//! | Request key | `json` → `document` → field name |
//! | Storage key | `document` → `json` → field name |
//!
//! Empty values and `-` are treated as absent.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    definition::{Annotations, Blueprint, FieldSchema},
    error::RegistrationError,
    metadata::FieldDescriptor,
    validator::StrValidator
};

/// Operational role of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Classification {
    /// Names the entity (one winner per type).
    Identity,
    /// Assumed unique per instance; used to build lookup filters.
    Axis,
    /// Read from request payloads on creation.
    Create,
    /// Editable through update specs.
    Edit,
    /// Participates in deletion requests.
    Delete,
    /// Part of the combined axis index.
    Index
}

impl Classification {
    /// Lowercase name, used in logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Axis => "axis",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Index => "index"
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tokens and markers understood by the [`Classifier`].
///
/// Deserialisable so it can live in application configuration; every field
/// falls back to its default when omitted.
///
/// ```rust,ignore
/// let config: ClassifierConfig = serde_json::from_str(r#"{"create": "n"}"#)?;
/// assert_eq!(config.create, 'n');
/// assert_eq!(config.edit, 'e');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// `handle` token marking CREATE fields.
    pub create:      char,
    /// `handle` token marking EDIT fields.
    pub edit:        char,
    /// `handle` token marking DELETE fields.
    pub delete:      char,
    /// Identity prefix registering the entity without a collection.
    pub suppress:    char,
    /// Value enabling `axis` and `index`.
    pub affirmative: String,
    /// Document key of the store's primary key.
    pub primary_key: String
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            create:      'c',
            edit:        'e',
            delete:      'd',
            suppress:    '!',
            affirmative: "true".into(),
            primary_key: "_id".into()
        }
    }
}

/// Resolved identity of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Entity identifier, without the suppression prefix.
    pub identifier: String,
    /// `false` when the suppression prefix was present.
    pub persistent: bool,
    /// Field carrying the winning annotation.
    pub field:      &'static str
}

/// Treat empty and `-` annotations as absent.
fn present(value: Option<&'static str>) -> Option<&'static str> {
    value.filter(|v| !v.is_empty() && *v != "-")
}

/// Request key: `json`, then `document`, then the field name.
pub fn request_key(schema: &FieldSchema) -> &'static str {
    present(schema.annotations.json)
        .or_else(|| present(schema.annotations.document))
        .unwrap_or(schema.name)
}

/// Storage key: `document`, then `json`, then the field name.
pub fn storage_key(schema: &FieldSchema) -> &'static str {
    present(schema.annotations.document)
        .or_else(|| present(schema.annotations.json))
        .unwrap_or(schema.name)
}

/// Interprets field annotations according to a [`ClassifierConfig`].
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig
}

impl Classifier {
    /// Create a classifier over `config`.
    #[must_use]
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Identity candidate of a single field.
    ///
    /// Returns the identifier and whether it is persistent, or `None` when
    /// the annotation is absent or empty after stripping the prefix.
    pub fn identity_of(&self, annotations: &Annotations) -> Option<(String, bool)> {
        let raw = present(annotations.identity)?;
        let (identifier, persistent) = match raw.strip_prefix(self.config.suppress) {
            Some(rest) => (rest, false),
            None => (raw, true)
        };
        (!identifier.is_empty()).then(|| (identifier.to_owned(), persistent))
    }

    /// Winning identity of a type: the last usable annotation.
    pub fn identity(&self, fields: &[FieldSchema]) -> Option<Identity> {
        fields.iter().rev().find_map(|schema| {
            self.identity_of(&schema.annotations).map(|(identifier, persistent)| Identity {
                identifier,
                persistent,
                field: schema.name
            })
        })
    }

    /// Classification tokens of a field, IDENTITY excluded.
    pub fn classes(&self, annotations: &Annotations) -> BTreeSet<Classification> {
        let affirmative = |value: Option<&str>| value == Some(self.config.affirmative.as_str());
        let handle = annotations.handle.unwrap_or_default();

        let mut classes = BTreeSet::new();
        if affirmative(annotations.axis) {
            classes.insert(Classification::Axis);
        }
        if affirmative(annotations.index) {
            classes.insert(Classification::Index);
        }
        for (token, class) in [
            (self.config.create, Classification::Create),
            (self.config.edit, Classification::Edit),
            (self.config.delete, Classification::Delete)
        ] {
            if handle.contains(token) {
                classes.insert(class);
            }
        }
        classes
    }

    /// Describe one field.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::InvalidValidator`] when the `validate`
    /// annotation does not compile.
    pub fn describe(
        &self,
        type_name: &'static str,
        schema: &FieldSchema
    ) -> Result<FieldDescriptor, RegistrationError> {
        let validator = present(schema.annotations.validate)
            .map(StrValidator::from_tag)
            .transpose()
            .map_err(|source| RegistrationError::InvalidValidator {
                type_name,
                field: schema.name,
                source
            })?;
        let primary = present(schema.annotations.document) == Some(self.config.primary_key.as_str());
        Ok(FieldDescriptor::new(
            schema,
            request_key(schema),
            storage_key(schema),
            self.classes(&schema.annotations),
            validator,
            primary
        ))
    }

    /// Classify every field of a blueprint.
    ///
    /// The IDENTITY token is attached to the winning field only.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::MissingIdentity`] when no field resolves an
    /// identity, [`RegistrationError::InvalidValidator`] from
    /// [`describe`](Self::describe).
    pub fn classify(
        &self,
        blueprint: &Blueprint
    ) -> Result<(Identity, Vec<FieldDescriptor>), RegistrationError> {
        let identity = self
            .identity(blueprint.fields())
            .ok_or(RegistrationError::MissingIdentity {
                type_name: blueprint.type_name()
            })?;

        let mut descriptors = Vec::with_capacity(blueprint.fields().len());
        for schema in blueprint.fields() {
            let mut descriptor = self.describe(blueprint.type_name(), schema)?;
            if schema.name == identity.field {
                descriptor.mark_identity();
            }
            debug!(
                entity = %identity.identifier,
                field = schema.name,
                classes = ?descriptor.classes(),
                "field classified"
            );
            descriptors.push(descriptor);
        }
        Ok((identity, descriptors))
    }
}
