// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Shared entity definitions for integration tests.

#![allow(dead_code)]

use emux::{Definition, prelude::*};

#[derive(Debug, Default, Clone, PartialEq, Definition)]
pub struct Task {
    #[emux(id = "task", axis = "true", handle = "ce")]
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
    #[emux(handle = "c")]
    pub score:      f64
}

#[derive(Debug, Default, Clone, PartialEq, Definition)]
pub struct Account {
    #[emux(id = "account", document = "_id", axis = "true")]
    pub id:    String,
    #[emux(
        json = "email",
        document = "mail",
        axis = "true",
        index = "true",
        handle = "ce",
        validate = "rep/email/"
    )]
    pub email: String,
    #[emux(handle = "ce")]
    pub name:  String,
    #[emux(handle = "c")]
    pub age:   u32
}

#[derive(Debug, Default, Clone, PartialEq, Definition)]
pub struct Note {
    #[emux(id = "!note", handle = "c")]
    pub text: String
}

#[derive(Debug, Default, Clone, PartialEq, Definition)]
pub struct Tag {
    #[emux(id = "tag")]
    pub label: String
}

pub fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        other => panic!("payload must be an object, got {other}")
    }
}

pub async fn registry(store: Arc<MemoryStore>) -> EntityRegistry {
    let store: Arc<dyn Store> = store;
    EntityRegistry::register(
        Some(store),
        [
            Blueprint::of::<Task>(),
            Blueprint::of::<User>(),
            Blueprint::of::<Account>(),
            Blueprint::of::<Note>(),
            Blueprint::of::<Tag>()
        ]
    )
    .await
    .unwrap()
}
