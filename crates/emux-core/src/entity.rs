// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! CRUD handle of a registered entity.
//!
//! # Axis policy
//!
//! Lookups never scan: [`exists`](Entity::exists), [`edit`](Entity::edit)
//! and [`delete`](Entity::delete) all go through the uniqueness filter of
//! the given value and fail with [`EntityError::UndefinedAxis`] when none
//! can be built. [`optimize`](Entity::optimize) builds the unique index
//! that backs the policy.
//!
//! ```rust,ignore
//! let users = registry.entity("user").unwrap();
//! let id = users.add(&user).await?;
//! users.edit(&user, &ESpec::new("name", "Jane")).await?;
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::{
    definition::Record,
    encode::to_document,
    error::EntityError,
    metadata::EntityMetadata,
    spec::ESpec,
    store::Collection,
    value::{Document, is_zero}
};

/// Borrowed handle over one entity's metadata and collection.
#[derive(Debug, Clone, Copy)]
pub struct Entity<'r> {
    meta: &'r EntityMetadata
}

impl<'r> Entity<'r> {
    pub(crate) fn new(meta: &'r EntityMetadata) -> Self {
        Self {
            meta
        }
    }

    /// Entity identifier.
    #[must_use]
    pub fn id(&self) -> &'r str {
        self.meta.id()
    }

    /// Compiled metadata.
    #[must_use]
    pub fn metadata(&self) -> &'r EntityMetadata {
        self.meta
    }

    fn collection(&self) -> Result<&'r Arc<dyn Collection>, EntityError> {
        self.meta
            .storage()
            .ok_or_else(|| EntityError::NoStorage(self.meta.id().to_owned()))
    }

    fn check(&self, value: &dyn Record) -> Result<(), EntityError> {
        if value.record_type() == self.meta.source() {
            Ok(())
        } else {
            Err(EntityError::IncompatibleType {
                entity:   self.meta.id().to_owned(),
                expected: self.meta.type_name(),
                found:    value.type_name()
            })
        }
    }

    fn filter(&self, value: &dyn Record) -> Result<Document, EntityError> {
        self.check(value)?;
        self.meta
            .filter(value)
            .ok_or_else(|| EntityError::UndefinedAxis(self.meta.id().to_owned()))
    }

    /// Validate and insert `value`, returning the stored identifier.
    ///
    /// A zero-valued primary key is left out so the store generates one.
    ///
    /// # Errors
    ///
    /// [`EntityError::IncompatibleType`], [`EntityError::NoStorage`],
    /// [`EntityError::Validation`], or the store error.
    pub async fn add(&self, value: &dyn Record) -> Result<String, EntityError> {
        self.check(value)?;
        let collection = self.collection()?;
        self.meta.validate(value)?;

        let mut document = to_document(value);
        for field in self.meta.fields().iter().filter(|field| field.is_primary_key()) {
            if document.get(field.storage_key()).is_some_and(is_zero) {
                document.remove(field.storage_key());
            }
        }
        let id = collection.insert_one(document).await?;
        debug!(entity = self.meta.id(), %id, "entity added");
        Ok(id)
    }

    /// Stored document matching the uniqueness filter of `value`.
    ///
    /// # Errors
    ///
    /// [`EntityError::IncompatibleType`], [`EntityError::UndefinedAxis`],
    /// [`EntityError::NoStorage`], or the store error.
    pub async fn exists(&self, value: &dyn Record) -> Result<Option<Document>, EntityError> {
        let filter = self.filter(value)?;
        Ok(self.collection()?.find_one(&filter).await?)
    }

    /// Apply `spec` as an update to the document matching `value`.
    ///
    /// Returns whether a document matched.
    ///
    /// # Errors
    ///
    /// [`EntityError::IncompatibleType`], [`EntityError::UndefinedAxis`],
    /// [`EntityError::NoStorage`], or the store error.
    pub async fn edit(&self, value: &dyn Record, spec: &ESpec) -> Result<bool, EntityError> {
        let filter = self.filter(value)?;
        let update = spec.to_update_document();
        let matched = self.collection()?.find_one_and_update(&filter, &update).await?;
        debug!(entity = self.meta.id(), field = %spec.field, matched = matched.is_some(), "entity edited");
        Ok(matched.is_some())
    }

    /// Remove the document matching `value`.
    ///
    /// Returns whether a document matched.
    ///
    /// # Errors
    ///
    /// [`EntityError::IncompatibleType`], [`EntityError::UndefinedAxis`],
    /// [`EntityError::NoStorage`], or the store error.
    pub async fn delete(&self, value: &dyn Record) -> Result<bool, EntityError> {
        let filter = self.filter(value)?;
        let removed = self.collection()?.find_one_and_delete(&filter).await?;
        Ok(removed.is_some())
    }

    /// Build the combined AXIS+INDEX unique index.
    ///
    /// Returns the index name, or `None` when no field qualifies.
    ///
    /// # Errors
    ///
    /// [`EntityError::NoStorage`], or the store error.
    pub async fn optimize(&self) -> Result<Option<String>, EntityError> {
        let collection = self.collection()?;
        let Some(model) = self.meta.index_model() else {
            return Ok(None);
        };
        Ok(Some(collection.create_index(model).await?))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        definition::Blueprint,
        error::{StoreError, ValidationError},
        fixtures::{Account, Note, Task},
        memory::MemoryStore,
        registry::EntityRegistry,
        store::Store
    };

    async fn registry() -> (Arc<MemoryStore>, EntityRegistry) {
        let memory = Arc::new(MemoryStore::new());
        let store: Arc<dyn Store> = memory.clone();
        let registry = EntityRegistry::register(
            Some(store),
            [Blueprint::of::<Account>(), Blueprint::of::<Task>(), Blueprint::of::<Note>()]
        )
        .await
        .unwrap();
        (memory, registry)
    }

    fn account(email: &str) -> Account {
        Account {
            email: email.into(),
            name: "Jane".into(),
            age: 30,
            ..Account::default()
        }
    }

    #[tokio::test]
    async fn add_drops_zero_primary_key() {
        let (memory, registry) = registry().await;
        let accounts = registry.entity("account").unwrap();
        let id = accounts.add(&account("jane@example.com")).await.unwrap();

        let stored = memory.memory_collection("account").documents();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["_id"], Value::String(id));
        assert_eq!(stored[0]["mail"], json!("jane@example.com"));
    }

    #[tokio::test]
    async fn add_keeps_explicit_primary_key() {
        let (_, registry) = registry().await;
        let accounts = registry.entity("account").unwrap();
        let value = Account {
            id: "a1".into(),
            ..account("jane@example.com")
        };
        assert_eq!(accounts.add(&value).await.unwrap(), "a1");
    }

    #[tokio::test]
    async fn add_rejects_taken_primary_key() {
        let (memory, registry) = registry().await;
        let accounts = registry.entity("account").unwrap();
        let first = Account {
            id: "a1".into(),
            ..account("jane@example.com")
        };
        let second = Account {
            id: "a1".into(),
            ..account("john@example.com")
        };
        accounts.add(&first).await.unwrap();
        let err = accounts.add(&second).await.unwrap_err();
        assert!(matches!(err, EntityError::Store(StoreError::DuplicateKey { ref index, .. }) if index == "_id_"));
        assert_eq!(memory.memory_collection("account").len(), 1);
    }

    #[tokio::test]
    async fn add_validates() {
        let (_, registry) = registry().await;
        let err = registry.entity("account").unwrap().add(&account("nope")).await.unwrap_err();
        assert!(matches!(err, EntityError::Validation(ValidationError::InputInvalid { .. })));
    }

    #[tokio::test]
    async fn type_is_checked() {
        let (_, registry) = registry().await;
        let err = registry.entity("account").unwrap().add(&Task::default()).await.unwrap_err();
        assert!(matches!(
            err,
            EntityError::IncompatibleType { expected: "Account", found: "Task", .. }
        ));
    }

    #[tokio::test]
    async fn unique_axis_is_enforced() {
        let (_, registry) = registry().await;
        let accounts = registry.entity("account").unwrap();
        accounts.add(&account("jane@example.com")).await.unwrap();
        let err = accounts.add(&account("jane@example.com")).await.unwrap_err();
        assert!(matches!(err, EntityError::Store(StoreError::DuplicateKey { .. })));
    }

    #[tokio::test]
    async fn exists_edit_delete_round_trip() {
        let (_, registry) = registry().await;
        let accounts = registry.entity("account").unwrap();
        let jane = account("jane@example.com");
        accounts.add(&jane).await.unwrap();

        let found = accounts.exists(&jane).await.unwrap().unwrap();
        assert_eq!(found["name"], json!("Jane"));

        assert!(accounts.edit(&jane, &ESpec::new("name", "Janet")).await.unwrap());
        let found = accounts.exists(&jane).await.unwrap().unwrap();
        assert_eq!(found["name"], json!("Janet"));

        assert!(accounts.delete(&jane).await.unwrap());
        assert!(accounts.exists(&jane).await.unwrap().is_none());
        assert!(!accounts.delete(&jane).await.unwrap());
    }

    #[tokio::test]
    async fn undefined_axis() {
        let (_, registry) = registry().await;
        let accounts = registry.entity("account").unwrap();
        let err = accounts.exists(&Account::default()).await.unwrap_err();
        assert!(matches!(err, EntityError::UndefinedAxis(id) if id == "account"));
    }

    #[tokio::test]
    async fn suppressed_entity_has_no_storage() {
        let (_, registry) = registry().await;
        let notes = registry.entity("note").unwrap();
        let err = notes.add(&Note::default()).await.unwrap_err();
        assert!(matches!(err, EntityError::NoStorage(id) if id == "note"));
        assert!(matches!(notes.optimize().await, Err(EntityError::NoStorage(_))));
    }

    #[tokio::test]
    async fn optimize_builds_axis_index() {
        let (memory, registry) = registry().await;
        let name = registry.entity("account").unwrap().optimize().await.unwrap();
        assert_eq!(name.as_deref(), Some("account_axis"));
        assert_eq!(memory.memory_collection("account").indexes().len(), 1);
        assert_eq!(registry.entity("task").unwrap().optimize().await.unwrap(), None);
    }
}
