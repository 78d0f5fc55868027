// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `#[derive(Definition)]` implementation.
//!
//! # Architecture
//!
//! ```text
//! definition.rs (orchestrator)
//! ├── parse.rs        - darling attributes → DefinitionDef
//! │   ├── field.rs    - per-field annotations
//! │   └── kind.rs     - field type → KindDef
//! ├── schema.rs       - TYPE_NAME and schema()
//! └── access.rs       - write_field() and read_field()
//! ```

mod access;
pub mod parse;
mod schema;

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

use self::parse::DefinitionDef;

/// Main entry point for the Definition derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match DefinitionDef::from_derive_input(&input) {
        Ok(def) => generate(&def).into(),
        Err(err) => err.write_errors().into()
    }
}

fn generate(def: &DefinitionDef) -> proc_macro2::TokenStream {
    let ident = def.ident();
    let schema = schema::generate(def);
    let access = access::generate(def);

    quote! {
        #[automatically_derived]
        impl ::emux::Definition for #ident {
            #schema
            #access
        }
    }
}
