// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! The document store seam.
//!
//! The registry only ever talks to a store through these traits. Filters
//! and updates are plain [`Document`]s in the usual operator syntax
//! (`{"age": {"$gt": 3}}`, `{"$set": {"name": "x"}}`), so a MongoDB driver
//! adapter is a thin wrapper.
//!
//! ```text
//! EntityRegistry ──► Store::collection(id) ──► Arc<dyn Collection>
//!                                                   │
//!                      Entity::add/exists/edit/delete/optimize
//! ```

use std::{fmt, sync::Arc};

use async_trait::async_trait;

use crate::{error::StoreError, value::Document};

/// Secondary index definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexModel {
    /// Index name.
    pub name:   String,
    /// Indexed storage keys, in order.
    pub keys:   Vec<String>,
    /// Reject documents sharing all key values.
    pub unique: bool
}

/// Source of named collections.
pub trait Store: Send + Sync {
    /// Handle to the named collection, created on demand.
    fn collection(&self, name: &str) -> Arc<dyn Collection>;
}

/// A single collection of documents.
#[async_trait]
pub trait Collection: Send + Sync + fmt::Debug {
    /// Collection name.
    fn name(&self) -> &str;

    /// Insert a document and return its identifier.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateKey`] when a unique index rejects the document,
    /// or a backend error.
    async fn insert_one(&self, document: Document) -> Result<String, StoreError>;

    /// First document matching `filter`.
    ///
    /// # Errors
    ///
    /// Backend errors, or [`StoreError::UnsupportedOperator`].
    async fn find_one(&self, filter: &Document) -> Result<Option<Document>, StoreError>;

    /// Apply `update` to the first document matching `filter`.
    ///
    /// Returns the document as it was before the update.
    ///
    /// # Errors
    ///
    /// Backend errors, [`StoreError::InvalidUpdate`], or
    /// [`StoreError::DuplicateKey`] when the update breaks a unique index.
    async fn find_one_and_update(
        &self,
        filter: &Document,
        update: &Document
    ) -> Result<Option<Document>, StoreError>;

    /// Remove the first document matching `filter` and return it.
    ///
    /// # Errors
    ///
    /// Backend errors, or [`StoreError::UnsupportedOperator`].
    async fn find_one_and_delete(&self, filter: &Document) -> Result<Option<Document>, StoreError>;

    /// Create an index and return its name.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateKey`] when existing documents already violate
    /// the unique constraint, or a backend error.
    async fn create_index(&self, model: IndexModel) -> Result<String, StoreError>;
}
