// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Embedding linker, the second registration phase.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    classify::Classification,
    metadata::{Embedding, EntityMetadata},
    value::TypeKey
};

/// Attach embeddings to every CREATE field whose record type is registered.
pub(crate) fn link(entities: &mut HashMap<String, EntityMetadata>, types: &HashMap<TypeKey, String>) {
    for meta in entities.values_mut() {
        let entity = meta.id().to_owned();
        for field in meta.fields_mut() {
            if !field.is(Classification::Create) {
                continue;
            }
            let Some(target) = field.kind().record_type().and_then(|key| types.get(&key)) else {
                continue;
            };
            let embedding = if field.kind().is_collection() {
                Embedding::Collection(target.clone())
            } else {
                Embedding::Single(target.clone())
            };
            debug!(%entity, field = field.name(), ?embedding, "embedding linked");
            field.link(embedding);
        }
    }
}
