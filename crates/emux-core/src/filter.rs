// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Uniqueness filters built from live entity values.
//!
//! A non-zero primary key always wins. Otherwise the first AXIS field with a
//! non-zero value, in declaration order, keyed by its storage key. When no
//! field qualifies there is no filter: callers must treat this as "cannot
//! be constructed", never as "match everything".

use serde_json::{Map, Value};

use crate::{
    classify::Classification,
    definition::Record,
    metadata::{EntityMetadata, FieldDescriptor},
    value::{Document, is_zero}
};

fn non_zero(value: &dyn Record, field: &FieldDescriptor) -> Option<Value> {
    value.get(field.name()).filter(|current| !is_zero(current))
}

/// Build the uniqueness filter of `value` under `meta`.
pub fn axis_filter(meta: &EntityMetadata, value: &dyn Record) -> Option<Document> {
    let primary = meta.fields().iter().filter(|field| field.is_primary_key()).find_map(|field| {
        non_zero(value, field).map(|current| (field.storage_key(), current))
    });
    let (key, current) = primary.or_else(|| {
        meta.classified(Classification::Axis)
            .find_map(|field| non_zero(value, field).map(|current| (field.storage_key(), current)))
    })?;

    let mut filter = Map::new();
    filter.insert(key.to_owned(), current);
    Some(filter)
}
