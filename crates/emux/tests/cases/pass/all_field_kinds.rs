// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use emux::{Definition, FieldKind, ScalarKind};

#[derive(Debug, Default, Definition)]
pub struct Part {
    #[emux(id = "part", handle = "c")]
    pub sku: String
}

#[derive(Debug, Default, Definition)]
pub struct Machine {
    #[emux(id = "machine", axis = "true", index = "true", handle = "ced")]
    pub serial:   String,
    pub small:    i8,
    pub wide:     u64,
    pub size:     usize,
    pub ratio:    f32,
    pub enabled:  bool,
    pub labels:   Vec<String>,
    pub readings: Vec<f64>,
    pub main:     Part,
    pub spares:   Vec<Part>
}

fn main() {
    let kinds: Vec<_> = Machine::schema().into_iter().map(|field| field.kind).collect();
    assert_eq!(kinds[1], FieldKind::Scalar(ScalarKind::Int));
    assert_eq!(kinds[4], FieldKind::Scalar(ScalarKind::Float));
    assert_eq!(kinds[7], FieldKind::List(ScalarKind::Float));
    assert!(kinds[9].is_collection());
}
