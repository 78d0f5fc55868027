// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use emux::{Definition, FieldValue};

#[derive(Debug, Default, Definition)]
pub struct Item {
    #[emux(id = "item", handle = "c")]
    pub r#type: String,
    #[emux(json = "match", handle = "c")]
    pub r#match: bool
}

fn main() {
    let names: Vec<_> = Item::schema().into_iter().map(|field| field.name).collect();
    assert_eq!(names, vec!["type", "match"]);

    let mut item = Item::default();
    item.write_field("type", FieldValue::Str("gear".into())).unwrap();
    assert_eq!(item.r#type, "gear");
    assert!(item.write_field("r#type", FieldValue::Str("x".into())).is_err());
}
