// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity definitions shared by the unit tests.

use emux_derive::Definition;
use serde_json::Value;

use crate::{
    access,
    definition::{Annotations, Definition, FieldSchema},
    error::WriteError,
    value::{FieldKind, FieldValue, ScalarKind}
};

#[derive(Debug, Default, Clone, PartialEq, Definition)]
pub struct Task {
    #[emux(id = "task", handle = "c")]
    pub title:    String,
    #[emux(handle = "ce")]
    pub priority: i64,
    #[emux(handle = "c")]
    pub tags:     Vec<String>,
    pub done:     bool
}

#[derive(Debug, Default, Clone, PartialEq, Definition)]
pub struct User {
    #[emux(id = "user", axis = "true", handle = "c")]
    pub name:       String,
    #[emux(json = "task", handle = "c")]
    pub assignment: Task,
    #[emux(handle = "c")]
    pub history:    Vec<Task>,
    pub score:      f64
}

#[derive(Debug, Default, Clone, PartialEq, Definition)]
pub struct Account {
    #[emux(id = "account", document = "_id", axis = "true")]
    pub id:    String,
    #[emux(json = "email", document = "mail", axis = "true", index = "true", handle = "ce", validate = "rep/email/")]
    pub email: String,
    #[emux(handle = "ce")]
    pub name:  String,
    #[emux(handle = "c")]
    pub age:   u32
}

/// Index flag on a field that is not an axis.
#[derive(Debug, Default, Clone, PartialEq, Definition)]
pub struct Ledger {
    #[emux(id = "ledger", axis = "true", index = "true", handle = "c")]
    pub code:  String,
    #[emux(index = "true", handle = "c")]
    pub owner: String
}

/// Suppressed identity: registered without a collection.
#[derive(Debug, Default, Clone, PartialEq, Definition)]
pub struct Note {
    #[emux(id = "!note", handle = "c")]
    pub text: String
}

/// Identity but nothing to decode.
#[derive(Debug, Default, Clone, PartialEq, Definition)]
pub struct Tag {
    #[emux(id = "tag")]
    pub label: String
}

/// Reuses the identifier of [`Task`].
#[derive(Debug, Default, Clone, PartialEq, Definition)]
pub struct Clash {
    #[emux(id = "task", handle = "c")]
    pub body: String
}

/// Hand-written definition without an identity.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Manual {
    pub label: String
}

impl Definition for Manual {
    const TYPE_NAME: &'static str = "Manual";

    fn schema() -> Vec<FieldSchema> {
        vec![FieldSchema {
            name:        "label",
            kind:        FieldKind::Scalar(ScalarKind::Str),
            annotations: Annotations {
                handle: Some("c"),
                ..Annotations::NONE
            }
        }]
    }

    fn write_field(&mut self, field: &str, value: FieldValue) -> Result<(), WriteError> {
        match field {
            "label" => access::assign_scalar(&mut self.label, field, value),
            _ => Err(WriteError::unknown(field, Self::TYPE_NAME))
        }
    }

    fn read_field(&self, field: &str) -> Option<Value> {
        match field {
            "label" => Some(access::encode_scalar(&self.label)),
            _ => None
        }
    }
}
