// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity registry.
//!
//! Registration is an explicit two-phase build:
//!
//! ```text
//! RegistryBuilder::new(store)
//!     │ add(blueprint) / define::<T>()     classify, collect, reverse-map
//!     ▼
//! finish().await
//!     ├── index pass                      AXIS+INDEX unique index per entity
//!     └── link pass                       attach embeddings to CREATE fields
//!     ▼
//! EntityRegistry (immutable, Send + Sync)
//! ```
//!
//! Linking runs only after every definition is known, so an entity may embed
//! one registered after it.

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
    classify::{Classifier, ClassifierConfig},
    definition::{Blueprint, Definition, Record},
    entity::Entity,
    error::{RegistrationError, StoreError},
    link,
    metadata::EntityMetadata,
    store::{Collection, Store},
    value::{Document, TypeKey}
};

/// Index creation failure recorded during [`RegistryBuilder::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexFailure {
    /// Entity whose index failed.
    pub entity: String,
    /// Index name.
    pub index:  String,
    /// Store error.
    pub error:  StoreError
}

/// Incremental builder of an [`EntityRegistry`].
pub struct RegistryBuilder {
    store:      Arc<dyn Store>,
    classifier: Classifier,
    entities:   HashMap<String, EntityMetadata>,
    types:      HashMap<TypeKey, String>
}

impl RegistryBuilder {
    /// Start a registry over `store`.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::StoreUninitialized`] when `store` is `None`.
    pub fn new(store: Option<Arc<dyn Store>>) -> Result<Self, RegistrationError> {
        Self::with_config(store, ClassifierConfig::default())
    }

    /// Start a registry over `store` classifying every definition with
    /// `config`.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::StoreUninitialized`] when `store` is `None`.
    pub fn with_config(store: Option<Arc<dyn Store>>, config: ClassifierConfig) -> Result<Self, RegistrationError> {
        let store = store.ok_or(RegistrationError::StoreUninitialized)?;
        Ok(Self {
            store,
            classifier: Classifier::new(config),
            entities: HashMap::new(),
            types: HashMap::new()
        })
    }

    /// Register one definition.
    ///
    /// On failure nothing is recorded; an entry registered earlier under the
    /// same identifier is kept.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::MissingIdentity`]
    /// - [`RegistrationError::DuplicateIdentifier`]
    /// - [`RegistrationError::InvalidValidator`]
    pub fn add(&mut self, blueprint: Blueprint) -> Result<&EntityMetadata, RegistrationError> {
        let (identity, fields) = self.classifier.classify(&blueprint)?;
        if self.entities.contains_key(&identity.identifier) {
            return Err(RegistrationError::DuplicateIdentifier {
                identifier: identity.identifier,
                type_name:  blueprint.type_name()
            });
        }

        let storage = identity
            .persistent
            .then(|| self.store.collection(&identity.identifier));
        let id = identity.identifier.clone();
        let metadata = EntityMetadata::new(
            identity,
            blueprint.key(),
            blueprint.type_name(),
            fields,
            storage,
            blueprint.factory()
        );
        debug!(
            entity = %id,
            type_name = blueprint.type_name(),
            persistent = metadata.is_persistent(),
            "entity registered"
        );

        self.types.insert(blueprint.key(), id.clone());
        Ok(self.entities.entry(id).or_insert(metadata))
    }

    /// Register the definition of `T`.
    ///
    /// # Errors
    ///
    /// See [`add`](Self::add).
    pub fn define<T: Definition>(&mut self) -> Result<&EntityMetadata, RegistrationError> {
        self.add(Blueprint::of::<T>())
    }

    /// Check if an identifier is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// Metadata registered so far under `id`.
    #[must_use]
    pub fn metadata(&self, id: &str) -> Option<&EntityMetadata> {
        self.entities.get(id)
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        sorted_ids(&self.entities)
    }

    /// Build the indexes, link embeddings and freeze the registry.
    ///
    /// Index failures are logged and recorded, never rolled back.
    pub async fn finish(mut self) -> EntityRegistry {
        let mut index_failures = Vec::new();
        for id in sorted_ids(&self.entities) {
            let meta = &self.entities[id];
            let (Some(collection), Some(model)) = (meta.storage(), meta.index_model()) else {
                continue;
            };
            let index = model.name.clone();
            match collection.create_index(model).await {
                Ok(name) => debug!(entity = id, index = %name, "axis index created"),
                Err(error) => {
                    warn!(entity = id, %index, %error, "axis index creation failed");
                    index_failures.push(IndexFailure {
                        entity: id.to_owned(),
                        index,
                        error
                    });
                }
            }
        }

        link::link(&mut self.entities, &self.types);
        info!(
            entities = self.entities.len(),
            index_failures = index_failures.len(),
            "entity registry built"
        );

        EntityRegistry {
            store: self.store,
            config: self.classifier.config().clone(),
            entities: self.entities,
            types: self.types,
            index_failures
        }
    }
}

fn sorted_ids(entities: &HashMap<String, EntityMetadata>) -> Vec<&str> {
    let mut ids: Vec<_> = entities.keys().map(String::as_str).collect();
    ids.sort_unstable();
    ids
}

/// Registry of compiled entities.
///
/// Immutable once built; share it behind an [`Arc`].
pub struct EntityRegistry {
    store:          Arc<dyn Store>,
    config:         ClassifierConfig,
    entities:       HashMap<String, EntityMetadata>,
    types:          HashMap<TypeKey, String>,
    index_failures: Vec<IndexFailure>
}

impl EntityRegistry {
    /// Start an incremental build; see [`RegistryBuilder`].
    ///
    /// # Errors
    ///
    /// [`RegistrationError::StoreUninitialized`] when `store` is `None`.
    pub fn builder(store: Option<Arc<dyn Store>>) -> Result<RegistryBuilder, RegistrationError> {
        RegistryBuilder::new(store)
    }

    /// Register every blueprint with the default configuration and build.
    ///
    /// # Errors
    ///
    /// The first [`RegistrationError`] encountered.
    pub async fn register(
        store: Option<Arc<dyn Store>>,
        blueprints: impl IntoIterator<Item = Blueprint>
    ) -> Result<Self, RegistrationError> {
        let mut builder = RegistryBuilder::new(store)?;
        for blueprint in blueprints {
            builder.add(blueprint)?;
        }
        Ok(builder.finish().await)
    }

    /// Metadata of an entity.
    #[must_use]
    pub fn metadata(&self, id: &str) -> Option<&EntityMetadata> {
        self.entities.get(id)
    }

    /// Identifier registered for type `T`.
    #[must_use]
    pub fn entity_id_of<T: 'static>(&self) -> Option<&str> {
        self.types.get(&TypeKey::of::<T>()).map(String::as_str)
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        sorted_ids(&self.entities)
    }

    /// Number of registered entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Collection of an entity, absent for unknown or suppressed entities.
    #[must_use]
    pub fn collection(&self, id: &str) -> Option<&Arc<dyn Collection>> {
        self.metadata(id)?.storage()
    }

    /// Underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Classifier configuration the registry was built with.
    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Index failures recorded while building.
    #[must_use]
    pub fn index_failures(&self) -> &[IndexFailure] {
        &self.index_failures
    }

    /// Metadata of the entity whose source type is the type of `value`.
    #[must_use]
    pub fn metadata_of(&self, value: &dyn Record) -> Option<&EntityMetadata> {
        self.metadata(self.types.get(&value.record_type())?)
    }

    /// Uniqueness filter of `value`, or `None` when its type is not
    /// registered or no filter can be constructed.
    #[must_use]
    pub fn filter(&self, value: &dyn Record) -> Option<Document> {
        self.metadata_of(value)?.filter(value)
    }

    /// CRUD handle of an entity.
    #[must_use]
    pub fn entity(&self, id: &str) -> Option<Entity<'_>> {
        self.metadata(id).map(Entity::new)
    }
}

impl std::fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("entities", &self.ids())
            .field("config", &self.config)
            .field("index_failures", &self.index_failures)
            .finish_non_exhaustive()
    }
}
