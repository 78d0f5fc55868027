// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Parsing of `#[derive(Definition)]` input.
//!
//! Struct-level checks go through darling; each named field is parsed by
//! [`FieldDef::from_field`].
//!
//! # Rejected input
//!
//! | Input | Reason |
//! |-------|--------|
//! | enum, union, tuple or unit struct | only named fields can be addressed |
//! | generic struct | the schema must name concrete field types |
//! | unsupported field type | see [`KindDef::from_type`] |

mod field;
mod kind;

use darling::FromDeriveInput;
use syn::{DeriveInput, Generics, Ident};

pub use self::{
    field::{FieldAttrs, FieldDef},
    kind::KindDef
};

/// Struct-level attributes.
///
/// No struct-level keys exist yet; unknown `#[emux(...)]` keys on the
/// struct are errors.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(emux), supports(struct_named))]
pub struct DefinitionAttrs {
    /// Struct identifier.
    pub ident:    Ident,
    /// Struct generics, which must be empty.
    pub generics: Generics
}

/// Parsed entity definition.
#[derive(Debug)]
pub struct DefinitionDef {
    ident:  Ident,
    fields: Vec<FieldDef>
}

impl DefinitionDef {
    /// Parse a definition from syn's `DeriveInput`.
    ///
    /// # Errors
    ///
    /// - Applied to an enum, union, tuple struct or unit struct
    /// - Applied to a generic struct
    /// - Unknown `#[emux(...)]` keys or non-string values
    /// - Unsupported field types
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let attrs = DefinitionAttrs::from_derive_input(input)?;
        if !attrs.generics.params.is_empty() {
            return Err(darling::Error::custom("Definition cannot be derived for generic structs")
                .with_span(&attrs.generics));
        }

        let fields = match &input.data {
            syn::Data::Struct(data) => match &data.fields {
                syn::Fields::Named(named) => {
                    let mut errors = darling::Error::accumulator();
                    let fields: Vec<_> = named
                        .named
                        .iter()
                        .filter_map(|field| errors.handle(FieldDef::from_field(field)))
                        .collect();
                    errors.finish()?;
                    fields
                }
                _ => {
                    return Err(darling::Error::custom("Definition requires named fields")
                        .with_span(&input.ident));
                }
            },
            _ => {
                return Err(
                    darling::Error::custom("Definition can only be derived for structs")
                        .with_span(&input.ident)
                );
            }
        };

        Ok(Self {
            ident: attrs.ident,
            fields
        })
    }

    /// Struct identifier.
    #[must_use]
    pub fn ident(&self) -> &Ident {
        &self.ident
    }

    /// Struct name as reported by `TYPE_NAME`.
    #[must_use]
    pub fn type_name(&self) -> String {
        self.ident.to_string()
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
}
