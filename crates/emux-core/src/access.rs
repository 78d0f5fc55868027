// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Typed field writers and readers.
//!
//! `#[derive(Definition)]` expands every field into exactly one writer and
//! one reader from this module, chosen by the field kind:
//!
//! | Kind | Writer | Reader |
//! |------|--------|--------|
//! | `Scalar` | [`assign_scalar`] | [`encode_scalar`] |
//! | `List` | [`assign_list`] | [`encode_list`] |
//! | `Record` | [`assign_record`] | [`encode_record`] |
//! | `Collection` | [`assign_records`] | [`encode_records`] |
//!
//! Writers never panic: a value of the wrong shape is reported as
//! [`WriteError::InvalidDataType`] and the slot is left untouched.

use serde_json::Value;

use crate::{
    definition::{Definition, Record},
    encode::to_document,
    error::WriteError,
    value::{FieldValue, Scalar}
};

/// Write a scalar field.
///
/// # Errors
///
/// [`WriteError::InvalidDataType`] when `value` does not convert to `T`.
pub fn assign_scalar<T: Scalar>(slot: &mut T, field: &str, value: FieldValue) -> Result<(), WriteError> {
    let found = value.kind_name();
    *slot = T::from_field_value(value).ok_or_else(|| WriteError::invalid(field, T::KIND.as_str(), found))?;
    Ok(())
}

/// Write a list-of-scalars field.
///
/// # Errors
///
/// [`WriteError::InvalidDataType`] when `value` is not a list or one of its
/// items does not convert to `T`.
pub fn assign_list<T: Scalar>(slot: &mut Vec<T>, field: &str, value: FieldValue) -> Result<(), WriteError> {
    let found = value.kind_name();
    let FieldValue::List(items) = value else {
        return Err(WriteError::invalid(field, "list", found));
    };
    let mut converted = Vec::with_capacity(items.len());
    for item in items {
        let found = item.kind_name();
        converted.push(T::from_field_value(item).ok_or_else(|| WriteError::invalid(field, T::KIND.as_str(), found))?);
    }
    *slot = converted;
    Ok(())
}

/// Write a nested record field.
///
/// # Errors
///
/// [`WriteError::InvalidDataType`] when `value` is not a record of type `T`.
pub fn assign_record<T: Definition>(slot: &mut T, field: &str, value: FieldValue) -> Result<(), WriteError> {
    let found = value.kind_name();
    let FieldValue::Record(record) = value else {
        return Err(WriteError::invalid(field, T::TYPE_NAME, found));
    };
    *slot = downcast::<T>(field, record)?;
    Ok(())
}

/// Write a collection-of-records field, preserving order.
///
/// # Errors
///
/// [`WriteError::InvalidDataType`] when `value` is not a collection or one
/// of its records is not of type `T`.
pub fn assign_records<T: Definition>(
    slot: &mut Vec<T>,
    field: &str,
    value: FieldValue
) -> Result<(), WriteError> {
    let found = value.kind_name();
    let FieldValue::Records(records) = value else {
        return Err(WriteError::invalid(field, "collection", found));
    };
    *slot = records
        .into_iter()
        .map(|record| downcast::<T>(field, record))
        .collect::<Result<_, _>>()?;
    Ok(())
}

fn downcast<T: Definition>(field: &str, record: Box<dyn Record>) -> Result<T, WriteError> {
    let found = record.type_name();
    record.downcast::<T>().ok_or_else(|| WriteError::invalid(field, T::TYPE_NAME, found))
}

/// Read a scalar field.
pub fn encode_scalar<T: Scalar>(slot: &T) -> Value {
    slot.to_json()
}

/// Read a list-of-scalars field.
pub fn encode_list<T: Scalar>(slot: &[T]) -> Value {
    Value::Array(slot.iter().map(Scalar::to_json).collect())
}

/// Read a nested record field as a storage document.
pub fn encode_record<T: Definition>(slot: &T) -> Value {
    Value::Object(to_document(slot))
}

/// Read a collection-of-records field as an array of storage documents.
pub fn encode_records<T: Definition>(slot: &[T]) -> Value {
    Value::Array(slot.iter().map(encode_record).collect())
}
