// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use emux::prelude::*;
//! ```

pub use std::sync::Arc;

pub use async_trait::async_trait;
pub use serde_json::{Value, json};

pub use crate::{
    classify::{Classification, ClassifierConfig},
    context::RequestContext,
    decode::{DecodeFailure, Decoded},
    definition::{Blueprint, Definition, Record},
    entity::Entity,
    error::{
        ContextError, DecodeError, EntityError, RegistrationError, StoreError, ValidationError,
        WriteError
    },
    memory::MemoryStore,
    pipeline::{BadRequest, CreationStage},
    registry::{EntityRegistry, RegistryBuilder},
    spec::ESpec,
    store::{Collection, IndexModel, Store},
    value::{Document, Payload}
};
