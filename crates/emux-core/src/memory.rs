// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! In-process [`Store`] implementation.
//!
//! Collections are created on first use and hold their documents in
//! insertion order behind a [`parking_lot::Mutex`]. The supported query and
//! update language is the subset the entity handle emits:
//!
//! | Filter | Update |
//! |--------|--------|
//! | `{key: value}` equality | `$set` |
//! | `$eq` `$ne` | `$unset` |
//! | `$gt` `$gte` `$lt` `$lte` | `$inc` |
//!
//! Unique indexes are enforced on insert and update, and `_id` is always
//! unique. A document missing every key of an index is not indexed.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::StoreError,
    store::{Collection, IndexModel, Store},
    value::Document
};

const ID: &str = "_id";
const ID_INDEX: &str = "_id_";

/// Store keeping every collection in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Arc<MemoryCollection>>>
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Concrete handle to the named collection, created on demand.
    pub fn memory_collection(&self, name: &str) -> Arc<MemoryCollection> {
        let mut collections = self.collections.lock();
        Arc::clone(
            collections
                .entry(name.to_owned())
                .or_insert_with(|| Arc::new(MemoryCollection::new(name)))
        )
    }

    /// Names of the collections created so far.
    #[must_use]
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.collections.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Store for MemoryStore {
    fn collection(&self, name: &str) -> Arc<dyn Collection> {
        self.memory_collection(name)
    }
}

#[derive(Debug, Default)]
struct State {
    documents: Vec<Document>,
    indexes:   Vec<IndexModel>
}

impl State {
    fn position(&self, filter: &Document) -> Result<Option<usize>, StoreError> {
        for (idx, document) in self.documents.iter().enumerate() {
            if matches(document, filter)? {
                return Ok(Some(idx));
            }
        }
        Ok(None)
    }

    /// Name of the first unique index `candidate` would violate.
    ///
    /// `_id` is always unique and reported as `_id_`.
    fn violation(&self, candidate: &Document, skip: Option<usize>) -> Option<&str> {
        let others = || {
            self.documents
                .iter()
                .enumerate()
                .filter(move |(idx, _)| Some(*idx) != skip)
                .map(|(_, other)| other)
        };
        if let Some(id) = candidate.get(ID)
            && others().any(|other| other.get(ID) == Some(id))
        {
            return Some(ID_INDEX);
        }
        self.indexes
            .iter()
            .filter(|index| index.unique)
            .find(|index| {
                let key = index_key(candidate, &index.keys);
                key.iter().any(Option::is_some)
                    && others().any(|other| index_key(other, &index.keys) == key)
            })
            .map(|index| index.name.as_str())
    }
}

/// One in-memory collection.
#[derive(Debug)]
pub struct MemoryCollection {
    name:  String,
    state: Mutex<State>
}

impl MemoryCollection {
    fn new(name: &str) -> Self {
        Self {
            name:  name.to_owned(),
            state: Mutex::new(State::default())
        }
    }

    /// Snapshot of the stored documents, in insertion order.
    #[must_use]
    pub fn documents(&self) -> Vec<Document> {
        self.state.lock().documents.clone()
    }

    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().documents.len()
    }

    /// Check if the collection holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Indexes created so far.
    #[must_use]
    pub fn indexes(&self) -> Vec<IndexModel> {
        self.state.lock().indexes.clone()
    }

    fn duplicate(&self, index: &str) -> StoreError {
        StoreError::DuplicateKey {
            collection: self.name.clone(),
            index:      index.to_owned()
        }
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_one(&self, mut document: Document) -> Result<String, StoreError> {
        let id = match document.get(ID) {
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                document.insert(ID.to_owned(), Value::String(id.clone()));
                id
            }
        };
        let mut state = self.state.lock();
        if let Some(index) = state.violation(&document, None) {
            return Err(self.duplicate(index));
        }
        state.documents.push(document);
        debug!(collection = %self.name, %id, "document inserted");
        Ok(id)
    }

    async fn find_one(&self, filter: &Document) -> Result<Option<Document>, StoreError> {
        let state = self.state.lock();
        Ok(state.position(filter)?.map(|idx| state.documents[idx].clone()))
    }

    async fn find_one_and_update(
        &self,
        filter: &Document,
        update: &Document
    ) -> Result<Option<Document>, StoreError> {
        let mut state = self.state.lock();
        let Some(idx) = state.position(filter)? else {
            return Ok(None);
        };
        let before = state.documents[idx].clone();
        let mut after = before.clone();
        apply(&mut after, update)?;
        if let Some(index) = state.violation(&after, Some(idx)) {
            return Err(self.duplicate(index));
        }
        state.documents[idx] = after;
        Ok(Some(before))
    }

    async fn find_one_and_delete(&self, filter: &Document) -> Result<Option<Document>, StoreError> {
        let mut state = self.state.lock();
        Ok(state.position(filter)?.map(|idx| state.documents.remove(idx)))
    }

    async fn create_index(&self, model: IndexModel) -> Result<String, StoreError> {
        let mut state = self.state.lock();
        if model.unique {
            let keys: Vec<_> = state
                .documents
                .iter()
                .map(|document| index_key(document, &model.keys))
                .filter(|key| key.iter().any(Option::is_some))
                .collect();
            let duplicated = keys
                .iter()
                .enumerate()
                .any(|(idx, key)| keys[idx + 1..].contains(key));
            if duplicated {
                return Err(self.duplicate(&model.name));
            }
        }
        let name = model.name.clone();
        state.indexes.retain(|index| index.name != name);
        state.indexes.push(model);
        debug!(collection = %self.name, index = %name, "index created");
        Ok(name)
    }
}

fn index_key<'a>(document: &'a Document, keys: &[String]) -> Vec<Option<&'a Value>> {
    keys.iter().map(|key| document.get(key)).collect()
}

fn is_operator_map(value: &Value) -> Option<&Document> {
    match value {
        Value::Object(map) if !map.is_empty() && map.keys().all(|key| key.starts_with('$')) => {
            Some(map)
        }
        _ => None
    }
}

fn matches(document: &Document, filter: &Document) -> Result<bool, StoreError> {
    for (key, condition) in filter {
        let actual = document.get(key);
        let satisfied = match is_operator_map(condition) {
            Some(operators) => {
                let mut all = true;
                for (op, operand) in operators {
                    all &= evaluate(op, actual, operand)?;
                }
                all
            }
            None => actual == Some(condition)
        };
        if !satisfied {
            return Ok(false);
        }
    }
    Ok(true)
}

fn evaluate(op: &str, actual: Option<&Value>, operand: &Value) -> Result<bool, StoreError> {
    let order = || actual.and_then(|value| compare(value, operand));
    Ok(match op {
        "$eq" => actual == Some(operand),
        "$ne" => actual != Some(operand),
        "$gt" => order() == Some(Ordering::Greater),
        "$gte" => matches!(order(), Some(Ordering::Greater | Ordering::Equal)),
        "$lt" => order() == Some(Ordering::Less),
        "$lte" => matches!(order(), Some(Ordering::Less | Ordering::Equal)),
        other => return Err(StoreError::UnsupportedOperator(other.to_owned()))
    })
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.as_f64()?.partial_cmp(&r.as_f64()?),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
        _ => None
    }
}

fn apply(document: &mut Document, update: &Document) -> Result<(), StoreError> {
    if update.is_empty() || !update.keys().all(|key| key.starts_with('$')) {
        return Err(StoreError::InvalidUpdate(
            "update document must only contain operators".into()
        ));
    }
    for (op, fields) in update {
        let Value::Object(fields) = fields else {
            return Err(StoreError::InvalidUpdate(format!("'{op}' expects a map")));
        };
        match op.as_str() {
            "$set" => {
                for (key, value) in fields {
                    document.insert(key.clone(), value.clone());
                }
            }
            "$unset" => {
                for key in fields.keys() {
                    document.remove(key);
                }
            }
            "$inc" => {
                for (key, delta) in fields {
                    let next = increment(document.get(key), delta).ok_or_else(|| {
                        StoreError::InvalidUpdate(format!("cannot increment '{key}'"))
                    })?;
                    document.insert(key.clone(), next);
                }
            }
            other => return Err(StoreError::UnsupportedOperator(other.to_owned()))
        }
    }
    Ok(())
}

fn increment(current: Option<&Value>, delta: &Value) -> Option<Value> {
    let Value::Number(delta) = delta else {
        return None;
    };
    match current {
        None => Some(Value::Number(delta.clone())),
        Some(Value::Number(current)) => match (current.as_i64(), delta.as_i64()) {
            (Some(c), Some(d)) => c.checked_add(d).map(Value::from),
            _ => Some(Value::from(current.as_f64()? + delta.as_f64()?))
        },
        Some(_) => None
    }
}
