// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `TYPE_NAME` and `schema()` generation.
//!
//! ```rust,ignore
//! const TYPE_NAME: &'static str = "User";
//!
//! fn schema() -> Vec<::emux::FieldSchema> {
//!     vec![::emux::FieldSchema {
//!         name: "email",
//!         kind: ::emux::FieldKind::Scalar(<String as ::emux::Scalar>::KIND),
//!         annotations: ::emux::Annotations { identity: Some("user"), .. }
//!     }]
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{DefinitionDef, FieldAttrs, FieldDef};

/// Generate the schema items of the impl block.
pub fn generate(def: &DefinitionDef) -> TokenStream {
    let type_name = def.type_name();
    let fields = def.fields().iter().map(field_schema);

    quote! {
        const TYPE_NAME: &'static str = #type_name;

        fn schema() -> ::std::vec::Vec<::emux::FieldSchema> {
            ::std::vec![#(#fields),*]
        }
    }
}

fn field_schema(field: &FieldDef) -> TokenStream {
    let name = field.name();
    let kind = field.kind().kind_tokens();
    let annotations = annotations(field.attrs());

    quote! {
        ::emux::FieldSchema {
            name: #name,
            kind: #kind,
            annotations: #annotations
        }
    }
}

fn annotations(attrs: &FieldAttrs) -> TokenStream {
    let identity = optional(attrs.id.as_deref());
    let axis = optional(attrs.axis.as_deref());
    let index = optional(attrs.index.as_deref());
    let handle = optional(attrs.handle.as_deref());
    let json = optional(attrs.json.as_deref());
    let document = optional(attrs.document.as_deref());
    let validate = optional(attrs.validate.as_deref());

    quote! {
        ::emux::Annotations {
            identity: #identity,
            axis: #axis,
            index: #index,
            handle: #handle,
            json: #json,
            document: #document,
            validate: #validate
        }
    }
}

fn optional(value: Option<&str>) -> TokenStream {
    match value {
        Some(value) => quote! { ::core::option::Option::Some(#value) },
        None => quote! { ::core::option::Option::None }
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn expand(input: syn::DeriveInput) -> String {
        generate(&DefinitionDef::from_derive_input(&input).unwrap()).to_string()
    }

    #[test]
    fn type_name_is_struct_name() {
        let output = expand(parse_quote! {
            struct Task {
                title: String
            }
        });
        assert!(output.contains("const TYPE_NAME : & 'static str = \"Task\""));
    }

    #[test]
    fn annotations_are_verbatim() {
        let output = expand(parse_quote! {
            struct Account {
                #[emux(id = "!account", json = "mail", validate = "rep/email/")]
                email: String
            }
        });
        assert!(output.contains("identity : :: core :: option :: Option :: Some (\"!account\")"));
        assert!(output.contains("json : :: core :: option :: Option :: Some (\"mail\")"));
        assert!(output.contains("validate : :: core :: option :: Option :: Some (\"rep/email/\")"));
        assert!(output.contains("axis : :: core :: option :: Option :: None"));
    }

    #[test]
    fn raw_field_names_are_unprefixed() {
        let output = expand(parse_quote! {
            struct Item {
                r#type: String
            }
        });
        assert!(output.contains("name : \"type\""));
    }

    #[test]
    fn kinds_follow_types() {
        let output = expand(parse_quote! {
            struct User {
                tags: Vec<String>,
                assignment: Task,
                history: Vec<Task>
            }
        });
        assert!(output.contains(":: emux :: FieldKind :: List"));
        assert!(output.contains(":: emux :: FieldKind :: Record (:: emux :: TypeKey :: of :: < Task > ())"));
        assert!(output.contains(":: emux :: FieldKind :: Collection (:: emux :: TypeKey :: of :: < Task > ())"));
    }
}
