// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Transport-agnostic request pre-processing.
//!
//! A [`CreationStage`] sits in front of a creation handler:
//!
//! ```text
//! body ──► parse JSON ──► decode(entity) ──► ctx.set(entity, value)
//!              │                 │
//!              ▼                 ▼
//!         BadRequest      ctx.set_error(err)
//! ```
//!
//! Malformed bodies are the caller's problem and are returned directly;
//! decode errors belong to the handler and go into the context.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::{
    context::RequestContext,
    error::{ContextError, DecodeError},
    registry::EntityRegistry
};

/// Request rejected before decoding.
#[derive(Debug, Error)]
pub enum BadRequest {
    /// Body is not valid JSON.
    #[error("malformed request body: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Body is valid JSON but not an object.
    #[error("request body must be a JSON object")]
    NotAnObject,

    /// The request context already carries an error.
    #[error(transparent)]
    Context(#[from] ContextError)
}

/// Decodes creation requests of one entity into the request context.
#[derive(Debug, Clone)]
pub struct CreationStage {
    registry: Arc<EntityRegistry>,
    entity:   String
}

impl CreationStage {
    /// Stage for `entity`.
    ///
    /// # Errors
    ///
    /// [`DecodeError::InvalidEntity`] for unknown identifiers,
    /// [`DecodeError::NoCreatableFields`] when the entity has nothing to
    /// decode.
    pub fn new(registry: Arc<EntityRegistry>, entity: &str) -> Result<Self, DecodeError> {
        let meta = registry
            .metadata(entity)
            .ok_or_else(|| DecodeError::InvalidEntity(entity.to_owned()))?;
        if meta.creatable().next().is_none() {
            return Err(DecodeError::NoCreatableFields(entity.to_owned()));
        }
        Ok(Self {
            registry,
            entity: entity.to_owned()
        })
    }

    /// Entity this stage decodes.
    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Parse and decode `body` into `ctx`.
    ///
    /// On success the decoded value is stored under the entity identifier
    /// as a `T` (retrieve it with [`RequestContext::take`]). Decode failures
    /// are recorded with [`RequestContext::set_error`] and are not returned.
    ///
    /// # Errors
    ///
    /// [`BadRequest`] for bodies that are not JSON objects, or when the
    /// context error slot is already taken.
    pub fn process(&self, body: &[u8], ctx: &RequestContext) -> Result<(), BadRequest> {
        let Value::Object(payload) = serde_json::from_slice::<Value>(body)? else {
            return Err(BadRequest::NotAnObject);
        };
        match self.registry.decode(&self.entity, &payload) {
            Ok(decoded) => {
                debug!(
                    entity = %self.entity,
                    skipped = decoded.skipped.len(),
                    "request payload decoded"
                );
                ctx.set_boxed(self.entity.clone(), decoded.value.into_any());
            }
            Err(failure) => {
                debug!(entity = %self.entity, error = %failure.error, "request payload rejected");
                ctx.set_error(failure.error)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        definition::Blueprint,
        fixtures::{Tag, Task, User},
        memory::MemoryStore,
        store::Store
    };

    async fn registry() -> Arc<EntityRegistry> {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let registry = EntityRegistry::register(
            Some(store),
            [Blueprint::of::<User>(), Blueprint::of::<Task>(), Blueprint::of::<Tag>()]
        )
        .await
        .unwrap();
        Arc::new(registry)
    }

    #[tokio::test]
    async fn construction_checks_entity() {
        let registry = registry().await;
        assert_eq!(
            CreationStage::new(Arc::clone(&registry), "ghost").unwrap_err(),
            DecodeError::InvalidEntity("ghost".into())
        );
        assert_eq!(
            CreationStage::new(Arc::clone(&registry), "tag").unwrap_err(),
            DecodeError::NoCreatableFields("tag".into())
        );
        assert_eq!(CreationStage::new(registry, "user").unwrap().entity(), "user");
    }

    #[tokio::test]
    async fn decoded_value_lands_in_context() {
        let stage = CreationStage::new(registry().await, "user").unwrap();
        let ctx = RequestContext::new();
        stage.process(br#"{"task": {"title": "x"}}"#, &ctx).unwrap();

        assert!(ctx.error().is_none());
        let user = ctx.take::<User>("user").unwrap();
        assert_eq!(user.assignment.title, "x");
    }

    #[tokio::test]
    async fn bad_requests_are_returned() {
        let stage = CreationStage::new(registry().await, "user").unwrap();
        let ctx = RequestContext::new();
        assert!(matches!(stage.process(b"{not json", &ctx), Err(BadRequest::Malformed(_))));
        assert!(matches!(stage.process(b"[1, 2]", &ctx), Err(BadRequest::NotAnObject)));
        assert!(ctx.error().is_none());
        assert!(!ctx.contains("user"));
    }

    #[tokio::test]
    async fn decode_errors_go_to_context() {
        let stage = CreationStage::new(registry().await, "user").unwrap();
        let ctx = RequestContext::new();
        stage.process(br#"{"task": 1}"#, &ctx).unwrap();

        assert!(!ctx.contains("user"));
        let error = ctx.error().unwrap();
        assert!(error.to_string().contains("invalid embedded payload for 'user.assignment'"));

        let err = stage.process(br#"{"task": 2}"#, &ctx).unwrap_err();
        assert!(matches!(err, BadRequest::Context(ContextError::ErrorAlreadySet)));
    }
}
