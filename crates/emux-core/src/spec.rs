// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field/value/operator triples for queries and updates.
//!
//! | Spec | Query document | Update document |
//! |------|----------------|-----------------|
//! | `{field: "age", target: 3}` | `{"age": 3}` | `{"$set": {"age": 3}}` |
//! | `+ queryOperator: "gt"` | `{"age": {"$gt": 3}}` | `{"$set": {"age": {"$gt": 3}}}` |
//! | `+ updateOperator: "inc"` | `{"age": 3}` | `{"$inc": {"age": 3}}` |
//!
//! Specs meant for updates should leave the query operator empty and vice
//! versa.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value::Document;

/// Update operator used when none is given.
pub const DEFAULT_UPDATE_OPERATOR: &str = "set";

/// Entity specification: a store field, a target value, and operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ESpec {
    /// Store field the spec constrains or updates.
    pub field:           String,
    /// Target value.
    #[serde(default)]
    pub target:          Value,
    /// Query operator without the `$` prefix; equality when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_operator:  Option<String>,
    /// Update operator without the `$` prefix; `set` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_operator: Option<String>
}

fn operator(op: Option<&str>) -> Option<&str> {
    op.filter(|op| !op.is_empty())
}

impl ESpec {
    /// Equality spec on `field`.
    pub fn new(field: impl Into<String>, target: impl Into<Value>) -> Self {
        Self {
            field:           field.into(),
            target:          target.into(),
            query_operator:  None,
            update_operator: None
        }
    }

    /// Set the query operator.
    #[must_use]
    pub fn with_query_operator(mut self, op: impl Into<String>) -> Self {
        self.query_operator = Some(op.into());
        self
    }

    /// Set the update operator.
    #[must_use]
    pub fn with_update_operator(mut self, op: impl Into<String>) -> Self {
        self.update_operator = Some(op.into());
        self
    }

    /// Render as a query filter.
    #[must_use]
    pub fn to_query_document(&self) -> Document {
        let condition = match operator(self.query_operator.as_deref()) {
            Some(op) => {
                let mut inner = Map::new();
                inner.insert(format!("${op}"), self.target.clone());
                Value::Object(inner)
            }
            None => self.target.clone()
        };
        let mut document = Map::new();
        document.insert(self.field.clone(), condition);
        document
    }

    /// Render as an update document.
    #[must_use]
    pub fn to_update_document(&self) -> Document {
        let op = operator(self.update_operator.as_deref()).unwrap_or(DEFAULT_UPDATE_OPERATOR);
        let mut document = Map::new();
        document.insert(format!("${op}"), Value::Object(self.to_query_document()));
        document
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn query_without_operator_is_equality() {
        let spec = ESpec::new("qs1", "v");
        assert_eq!(Value::Object(spec.to_query_document()), json!({"qs1": "v"}));
    }

    #[test]
    fn query_with_operator() {
        let spec = ESpec::new("qs2", "v").with_query_operator("in");
        assert_eq!(Value::Object(spec.to_query_document()), json!({"qs2": {"$in": "v"}}));
    }

    #[test]
    fn update_defaults_to_set() {
        let spec = ESpec::new("name", "x");
        assert_eq!(Value::Object(spec.to_update_document()), json!({"$set": {"name": "x"}}));
    }

    #[test]
    fn update_with_operator() {
        let spec = ESpec::new("count", 1).with_update_operator("inc");
        assert_eq!(Value::Object(spec.to_update_document()), json!({"$inc": {"count": 1}}));
    }

    #[test]
    fn empty_operators_count_as_absent() {
        let spec: ESpec = serde_json::from_value(json!({
            "field": "name",
            "target": "x",
            "queryOperator": "",
            "updateOperator": ""
        }))
        .unwrap();
        assert_eq!(Value::Object(spec.to_update_document()), json!({"$set": {"name": "x"}}));
    }

    #[test]
    fn deserializes_camel_case() {
        let spec: ESpec = serde_json::from_value(json!({
            "field": "age",
            "target": 3,
            "queryOperator": "gt"
        }))
        .unwrap();
        assert_eq!(spec, ESpec::new("age", 3).with_query_operator("gt"));
    }
}
