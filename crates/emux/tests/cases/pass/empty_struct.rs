// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use emux::{Definition, FieldValue, WriteError};

#[derive(Debug, Default, Definition)]
pub struct Marker {}

fn main() {
    assert!(Marker::schema().is_empty());
    let err = Marker::default().write_field("x", FieldValue::Bool(true)).unwrap_err();
    assert_eq!(err, WriteError::unknown("x", "Marker"));
    assert!(Marker::default().read_field("x").is_none());
}
