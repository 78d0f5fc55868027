// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

//! Derive macro for emux entity definitions.
//!
//! Use the `emux` crate instead; this crate only carries the proc macro.
//!
//! # Attribute Quick Reference
//!
//! ```rust,ignore
//! #[derive(Debug, Default, Definition)]
//! pub struct User {
//!     #[emux(id = "user", axis = "true", index = "true", handle = "c")]
//!     pub email: String,
//!
//!     #[emux(json = "task", handle = "ce")]   // Embeds a registered `Task`
//!     pub assignment: Task,
//!
//!     #[emux(document = "_id")]               // Store primary key
//!     pub key: String,
//! }
//! ```

mod definition;

use proc_macro::TokenStream;

/// Derive the static type description of an entity struct.
///
/// Generates an `impl emux::Definition` with the ordered field schema, one
/// typed writer per field and one reader per field. No reflection happens
/// at runtime: every field kind is resolved here.
///
/// # Field Attributes
///
/// All values are strings and all keys are optional. Their meaning is
/// decided at registration by the classifier configuration.
///
/// | Key | Description |
/// |-----|-------------|
/// | `id` | Entity identifier; the last annotated field wins. Prefix `!` to register without a collection. |
/// | `axis` | `"true"` marks a field assumed unique per instance. |
/// | `index` | `"true"` adds an axis field to the combined unique index. |
/// | `handle` | Classification tokens: `c` create, `e` edit, `d` delete. |
/// | `json` | Request key; also the storage key fallback. |
/// | `document` | Storage key; also the request key fallback. `"_id"` marks the primary key. |
/// | `validate` | `re/<pattern>/` or `rep/email/`. |
///
/// # Field Types
///
/// | Type | Kind |
/// |------|------|
/// | `String`, integers, `f32`, `f64`, `bool` | Scalar |
/// | `Vec<scalar>` | List |
/// | `Vec<T>` | Collection of `T: Definition` |
/// | any other path `T` | Record `T: Definition` |
///
/// `Option`, references, tuples, arrays and nested `Vec`s are rejected;
/// the zero value of the field stands for "absent".
///
/// # Errors
///
/// Generic structs, enums, tuple structs and unit structs are rejected at
/// compile time.
#[proc_macro_derive(Definition, attributes(emux))]
pub fn derive_definition(input: TokenStream) -> TokenStream {
    definition::derive(input)
}
