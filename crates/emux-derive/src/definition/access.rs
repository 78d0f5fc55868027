// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `write_field()` and `read_field()` generation.
//!
//! Each field becomes one match arm dispatching to the writer or reader in
//! `::emux::access` chosen by its kind.

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::DefinitionDef;

/// Generate the accessor methods of the impl block.
pub fn generate(def: &DefinitionDef) -> TokenStream {
    let writes = def.fields().iter().map(|field| {
        let ident = field.ident();
        let name = field.name();
        let writer = field.kind().writer();
        quote! {
            #name => ::emux::access::#writer(&mut self.#ident, field, value)
        }
    });
    let reads = def.fields().iter().map(|field| {
        let ident = field.ident();
        let name = field.name();
        let reader = field.kind().reader();
        quote! {
            #name => ::core::option::Option::Some(::emux::access::#reader(&self.#ident))
        }
    });

    quote! {
        #[allow(unused_variables)]
        fn write_field(
            &mut self,
            field: &str,
            value: ::emux::FieldValue
        ) -> ::core::result::Result<(), ::emux::WriteError> {
            match field {
                #(#writes,)*
                _ => ::core::result::Result::Err(::emux::WriteError::unknown(
                    field,
                    <Self as ::emux::Definition>::TYPE_NAME
                ))
            }
        }

        fn read_field(&self, field: &str) -> ::core::option::Option<::emux::Value> {
            match field {
                #(#reads,)*
                _ => ::core::option::Option::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn one_arm_per_field() {
        let input: syn::DeriveInput = parse_quote! {
            struct User {
                name: String,
                tags: Vec<String>,
                assignment: Task,
                history: Vec<Task>
            }
        };
        let output = generate(&DefinitionDef::from_derive_input(&input).unwrap()).to_string();
        for call in [
            "assign_scalar (& mut self . name",
            "assign_list (& mut self . tags",
            "assign_record (& mut self . assignment",
            "assign_records (& mut self . history",
            "encode_scalar (& self . name)",
            "encode_list (& self . tags)",
            "encode_record (& self . assignment)",
            "encode_records (& self . history)"
        ] {
            assert!(output.contains(call), "missing `{call}` in {output}");
        }
    }

    #[test]
    fn raw_idents_keep_prefix_in_access() {
        let input: syn::DeriveInput = parse_quote! {
            struct Item {
                r#type: String
            }
        };
        let output = generate(&DefinitionDef::from_derive_input(&input).unwrap()).to_string();
        assert!(output.contains("\"type\" => :: emux :: access :: assign_scalar (& mut self . r#type"));
    }

    #[test]
    fn empty_struct_has_fallback_only() {
        let input: syn::DeriveInput = parse_quote! {
            struct Empty {}
        };
        let output = generate(&DefinitionDef::from_derive_input(&input).unwrap()).to_string();
        assert!(output.contains("WriteError :: unknown"));
        assert!(!output.contains("access ::"));
    }
}
