// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity values rendered as store documents.

use serde_json::Map;

use crate::{
    classify::storage_key,
    definition::Record,
    value::Document
};

/// Render every field of `value` under its storage key.
///
/// Nested records and collections are rendered recursively through their
/// own readers.
pub fn to_document(value: &dyn Record) -> Document {
    let mut document = Map::new();
    for schema in value.fields() {
        if let Some(rendered) = value.get(schema.name) {
            document.insert(storage_key(&schema).to_owned(), rendered);
        }
    }
    document
}
