// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # emux
//!
//! One crate, all features. Re-exports:
//! - [`Definition`] derive macro from `emux-derive`
//! - All types from `emux-core` ([`EntityRegistry`], [`ESpec`],
//!   [`MemoryStore`], [`CreationStage`])
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use emux::prelude::*;
//! use emux::Definition;
//!
//! #[derive(Debug, Default, Definition)]
//! pub struct Task {
//!     #[emux(id = "task", handle = "c")]
//!     pub title: String
//! }
//!
//! #[derive(Debug, Default, Definition)]
//! pub struct User {
//!     #[emux(id = "user", axis = "true", handle = "c")]
//!     pub name: String,
//!     #[emux(json = "task", handle = "c")]
//!     pub assignment: Task
//! }
//!
//! let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
//! let registry = EntityRegistry::register(
//!     Some(store),
//!     [Blueprint::of::<Task>(), Blueprint::of::<User>()]
//! )
//! .await?;
//!
//! let payload = json!({ "name": "ann", "task": { "title": "x" } });
//! let user: User = registry.decode_as("user", payload.as_object().unwrap())?;
//! assert_eq!(user.assignment.title, "x");
//! ```

pub use emux_core::*;
pub use emux_derive::Definition;
