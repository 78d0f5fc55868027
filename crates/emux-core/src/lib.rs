// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Core runtime for emux.
//!
//! This crate compiles per-field annotations into entity metadata, keeps the
//! registry of entities, and decodes untyped request payloads into typed
//! values. The `#[derive(Definition)]` macro from `emux-derive` generates the
//! static type description consumed here, but every trait can also be
//! implemented by hand.
//!
//! # Overview
//!
//! - [`Definition`] / [`Record`] - Static and type-erased views of an entity
//!   struct
//! - [`Classifier`] - Turns [`FieldSchema`] annotations into
//!   [`FieldDescriptor`]s
//! - [`EntityRegistry`] - Compiled metadata, embedding links, decoding and
//!   axis filters
//! - [`ESpec`] - Field/value/operator triples rendered as query and update
//!   documents
//! - [`Store`] / [`Collection`] - The document store seam; [`MemoryStore`] is
//!   the in-process implementation
//! - [`RequestContext`] / [`CreationStage`] - Request pre-processing
//! - [`prelude`] - Convenient re-exports
//!
//! # Pipeline
//!
//! ```text
//! FieldSchema ──► Classifier ──► EntityMetadata ──► RegistryBuilder
//!                                                        │ finish()
//!                                                        ▼
//!                       payload ──► decode() ◄── EntityRegistry (indexed, linked)
//!                                      │
//!                                      ▼
//!                         typed value ──► filter() / Entity::add()
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use emux_core::prelude::*;
//!
//! let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
//! let registry = EntityRegistry::register(
//!     Some(store),
//!     [Blueprint::of::<User>(), Blueprint::of::<Task>()]
//! )
//! .await?;
//!
//! let user: User = registry.decode_as("user", &payload)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

#[cfg(test)]
extern crate self as emux;

pub mod access;
pub mod classify;
pub mod context;
pub mod decode;
pub mod definition;
pub mod encode;
pub mod entity;
pub mod error;
pub mod filter;
mod link;
pub mod memory;
pub mod metadata;
pub mod pipeline;
pub mod prelude;
pub mod registry;
pub mod spec;
pub mod store;
pub mod validator;
pub mod value;

/// Re-export async_trait for store implementations.
pub use async_trait::async_trait;
pub use classify::{Classification, Classifier, ClassifierConfig, Identity};
pub use context::{RequestContext, SharedError};
pub use decode::{DecodeFailure, Decoded};
pub use definition::{Annotations, Blueprint, Definition, FieldSchema, Record};
pub use encode::to_document;
pub use entity::Entity;
pub use error::{
    ContextError, DecodeError, EntityError, RegistrationError, StoreError, ValidationError,
    ValidatorError, WriteError
};
pub use memory::{MemoryCollection, MemoryStore};
pub use metadata::{Embedding, EntityMetadata, FieldDescriptor};
pub use pipeline::{BadRequest, CreationStage};
pub use registry::{EntityRegistry, IndexFailure, RegistryBuilder};
/// Re-export of the JSON value type used for payloads and documents.
pub use serde_json::Value;
pub use spec::ESpec;
pub use store::{Collection, IndexModel, Store};
pub use validator::{StrValidator, Validator};
pub use value::{Document, FieldKind, FieldValue, Payload, Scalar, ScalarKind, TypeKey};

#[cfg(test)]
mod fixtures;
