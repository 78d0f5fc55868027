// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Compiled per-entity metadata.
//!
//! [`FieldDescriptor`]s and [`EntityMetadata`] are built once during
//! registration and are read-only afterwards. The only post-classification
//! mutation is the embedding link, applied before the registry is frozen.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::Arc
};

use crate::{
    classify::{Classification, Identity},
    definition::{Annotations, FieldSchema, Record},
    error::ValidationError,
    filter,
    store::{Collection, IndexModel},
    validator::{StrValidator, Validator},
    value::{Document, FieldKind, TypeKey}
};

/// Embedding reference of a CREATE field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Embedding {
    /// Field holds one record of the named entity.
    Single(String),
    /// Field holds a collection of records of the named entity.
    Collection(String)
}

impl Embedding {
    /// Identifier of the embedded entity.
    #[must_use]
    pub fn entity(&self) -> &str {
        match self {
            Self::Single(id) | Self::Collection(id) => id
        }
    }
}

/// Compiled description of one field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name:        &'static str,
    kind:        FieldKind,
    request_key: &'static str,
    storage_key: &'static str,
    annotations: Annotations,
    classes:     BTreeSet<Classification>,
    embedding:   Option<Embedding>,
    validator:   Option<StrValidator>,
    primary:     bool
}

impl FieldDescriptor {
    pub(crate) fn new(
        schema: &FieldSchema,
        request_key: &'static str,
        storage_key: &'static str,
        classes: BTreeSet<Classification>,
        validator: Option<StrValidator>,
        primary: bool
    ) -> Self {
        Self {
            name: schema.name,
            kind: schema.kind,
            request_key,
            storage_key,
            annotations: schema.annotations,
            classes,
            embedding: None,
            validator,
            primary
        }
    }

    pub(crate) fn mark_identity(&mut self) {
        self.classes.insert(Classification::Identity);
    }

    pub(crate) fn link(&mut self, embedding: Embedding) {
        self.embedding = Some(embedding);
    }

    /// Rust field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Key looked up in request payloads.
    #[must_use]
    pub fn request_key(&self) -> &'static str {
        self.request_key
    }

    /// Key used in store documents.
    #[must_use]
    pub fn storage_key(&self) -> &'static str {
        self.storage_key
    }

    /// Declared `document` annotation, verbatim.
    #[must_use]
    pub fn document_key(&self) -> Option<&'static str> {
        self.annotations.document
    }

    /// Raw annotations.
    #[must_use]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Classification tokens.
    #[must_use]
    pub fn classes(&self) -> &BTreeSet<Classification> {
        &self.classes
    }

    /// Check for a classification token.
    #[must_use]
    pub fn is(&self, class: Classification) -> bool {
        self.classes.contains(&class)
    }

    /// Embedding reference, set by the linker.
    #[must_use]
    pub fn embedding(&self) -> Option<&Embedding> {
        self.embedding.as_ref()
    }

    /// Compiled validator.
    #[must_use]
    pub fn validator(&self) -> Option<&StrValidator> {
        self.validator.as_ref()
    }

    /// Whether the document key names the store's primary key.
    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.primary
    }
}

/// Compiled metadata of one entity.
#[derive(Clone)]
pub struct EntityMetadata {
    id:        String,
    source:    TypeKey,
    type_name: &'static str,
    fields:    Vec<FieldDescriptor>,
    classes:   BTreeMap<Classification, Vec<usize>>,
    storage:   Option<Arc<dyn Collection>>,
    factory:   fn() -> Box<dyn Record>
}

impl EntityMetadata {
    pub(crate) fn new(
        identity: Identity,
        source: TypeKey,
        type_name: &'static str,
        fields: Vec<FieldDescriptor>,
        storage: Option<Arc<dyn Collection>>,
        factory: fn() -> Box<dyn Record>
    ) -> Self {
        let mut classes: BTreeMap<Classification, Vec<usize>> = BTreeMap::new();
        for (idx, field) in fields.iter().enumerate() {
            for class in field.classes() {
                classes.entry(*class).or_default().push(idx);
            }
        }
        Self {
            id: identity.identifier,
            source,
            type_name,
            fields,
            classes,
            storage,
            factory
        }
    }

    pub(crate) fn fields_mut(&mut self) -> &mut [FieldDescriptor] {
        &mut self.fields
    }

    /// Entity identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Source type.
    #[must_use]
    pub fn source(&self) -> TypeKey {
        self.source
    }

    /// Struct name of the source type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// All fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Field by Rust name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Fields carrying `class`, in declaration order.
    pub fn classified(&self, class: Classification) -> impl Iterator<Item = &FieldDescriptor> {
        self.classes
            .get(&class)
            .into_iter()
            .flatten()
            .map(|idx| &self.fields[*idx])
    }

    /// CREATE fields, in declaration order.
    pub fn creatable(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.classified(Classification::Create)
    }

    /// Check if the entity owns a collection.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    /// Collection handle, absent for suppressed entities.
    #[must_use]
    pub fn storage(&self) -> Option<&Arc<dyn Collection>> {
        self.storage.as_ref()
    }

    /// Fresh zero value of the source type.
    #[must_use]
    pub fn zero_value(&self) -> Box<dyn Record> {
        (self.factory)()
    }

    /// Combined unique index over the fields carrying both AXIS and INDEX.
    ///
    /// `None` when no field qualifies.
    #[must_use]
    pub fn index_model(&self) -> Option<IndexModel> {
        let keys: Vec<String> = self
            .classified(Classification::Axis)
            .filter(|field| field.is(Classification::Index))
            .map(|field| field.storage_key.to_owned())
            .collect();
        (!keys.is_empty()).then(|| IndexModel {
            name: format!("{}_axis", self.id),
            keys,
            unique: true
        })
    }

    /// Run every field validator against the current value.
    ///
    /// # Errors
    ///
    /// The first [`ValidationError`] in declaration order.
    pub fn validate(&self, value: &dyn Record) -> Result<(), ValidationError> {
        for field in &self.fields {
            if let Some(validator) = &field.validator {
                let current = value.get(field.name).unwrap_or_default();
                validator.validate(field.name, &current)?;
            }
        }
        Ok(())
    }

    /// Uniqueness filter for `value`; see [`filter::axis_filter`].
    #[must_use]
    pub fn filter(&self, value: &dyn Record) -> Option<Document> {
        filter::axis_filter(self, value)
    }
}

impl fmt::Debug for EntityMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMetadata")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field("classes", &self.classes)
            .field("persistent", &self.is_persistent())
            .finish_non_exhaustive()
    }
}
