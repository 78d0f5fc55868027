// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field-level attribute parsing.
//!
//! ```rust,ignore
//! #[emux(id = "user", axis = "true", handle = "ce", json = "mail")]
//! pub email: String,
//! ```
//!
//! Values are kept verbatim. Interpreting them (affirmative values, handle
//! tokens, the suppression prefix) is the runtime classifier's job, so the
//! same definition can be registered under different configurations.

use darling::FromField;
use syn::{Field, Ident, ext::IdentExt};

use super::KindDef;

/// Raw `#[emux(...)]` keys of one field.
#[derive(Debug, Default, Clone, FromField)]
#[darling(attributes(emux))]
pub struct FieldAttrs {
    /// Entity identifier.
    pub id:       Option<String>,
    /// Axis flag.
    pub axis:     Option<String>,
    /// Index flag.
    pub index:    Option<String>,
    /// Classification tokens.
    pub handle:   Option<String>,
    /// Request key.
    pub json:     Option<String>,
    /// Storage key.
    pub document: Option<String>,
    /// Validator tag.
    pub validate: Option<String>
}

/// Field definition with its resolved kind.
#[derive(Debug)]
pub struct FieldDef {
    ident: Ident,
    name:  String,
    kind:  KindDef,
    attrs: FieldAttrs
}

impl FieldDef {
    /// Parse a field definition from syn's `Field`.
    ///
    /// # Errors
    ///
    /// Returns error for unnamed fields, malformed attributes or unsupported
    /// types.
    pub fn from_field(field: &Field) -> darling::Result<Self> {
        let ident = field.ident.clone().ok_or_else(|| {
            darling::Error::custom("Definition fields must be named").with_span(field)
        })?;
        let attrs = FieldAttrs::from_field(field)?;
        let kind = KindDef::from_type(&field.ty)?;

        Ok(Self {
            name: ident.unraw().to_string(),
            ident,
            kind,
            attrs
        })
    }

    /// Field identifier as written, raw prefix included.
    #[must_use]
    pub fn ident(&self) -> &Ident {
        &self.ident
    }

    /// Field name without the raw prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved kind.
    #[must_use]
    pub fn kind(&self) -> &KindDef {
        &self.kind
    }

    /// Raw annotations.
    #[must_use]
    pub fn attrs(&self) -> &FieldAttrs {
        &self.attrs
    }
}
