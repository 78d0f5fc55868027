// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field type classification.
//!
//! Kinds are resolved syntactically from the last path segment:
//!
//! | Type | Kind |
//! |------|------|
//! | `String`, `bool`, integer primitives, `f32`, `f64` | [`KindDef::Scalar`] |
//! | `Vec<scalar>` | [`KindDef::List`] |
//! | `Vec<T>` | [`KindDef::Collection`] |
//! | any other path | [`KindDef::Record`] |
//!
//! Whether a record type really implements `Definition` is left to the
//! type checker on the generated code.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, Ident, PathArguments, Type};

const SCALARS: &[&str] = &[
    "String", "bool", "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize",
    "f32", "f64"
];

/// Field kind together with the type it was resolved from.
#[derive(Debug, Clone)]
pub enum KindDef {
    /// Scalar of the given type.
    Scalar(Type),
    /// `Vec` of the given scalar type.
    List(Type),
    /// Nested record of the given type.
    Record(Type),
    /// `Vec` of the given record type.
    Collection(Type)
}

fn unsupported(ty: &Type, message: &str) -> darling::Error {
    darling::Error::custom(message).with_span(ty)
}

/// Single generic type argument of a path segment, as in `Vec<T>`.
fn single_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first() {
        Some(GenericArgument::Type(inner)) => Some(inner),
        _ => None
    }
}

impl KindDef {
    /// Resolve the kind of a field type.
    ///
    /// # Errors
    ///
    /// `Option`, references, tuples, arrays, qualified paths and nested
    /// `Vec`s are rejected.
    pub fn from_type(ty: &Type) -> darling::Result<Self> {
        match ty {
            Type::Paren(inner) => Self::from_type(&inner.elem),
            Type::Group(inner) => Self::from_type(&inner.elem),
            Type::Path(path) if path.qself.is_none() => {
                let Some(last) = path.path.segments.last() else {
                    return Err(unsupported(ty, "empty type path"));
                };
                let name = last.ident.to_string();
                if SCALARS.contains(&name.as_str()) && last.arguments.is_none() {
                    return Ok(Self::Scalar(ty.clone()));
                }
                match name.as_str() {
                    "Option" => Err(unsupported(
                        ty,
                        "Option fields are not supported; the zero value stands for absent"
                    )),
                    "Vec" => {
                        let inner = single_argument(&last.arguments)
                            .ok_or_else(|| unsupported(ty, "Vec requires one type argument"))?;
                        match Self::from_type(inner)? {
                            Self::Scalar(item) => Ok(Self::List(item)),
                            Self::Record(item) => Ok(Self::Collection(item)),
                            Self::List(_) | Self::Collection(_) => {
                                Err(unsupported(ty, "nested collections are not supported"))
                            }
                        }
                    }
                    _ => Ok(Self::Record(ty.clone()))
                }
            }
            _ => Err(unsupported(
                ty,
                "unsupported field type; expected a scalar, a struct or a Vec of either"
            ))
        }
    }

    /// `::emux::FieldKind` expression for this kind.
    pub fn kind_tokens(&self) -> TokenStream {
        match self {
            Self::Scalar(ty) => quote! { ::emux::FieldKind::Scalar(<#ty as ::emux::Scalar>::KIND) },
            Self::List(ty) => quote! { ::emux::FieldKind::List(<#ty as ::emux::Scalar>::KIND) },
            Self::Record(ty) => quote! { ::emux::FieldKind::Record(::emux::TypeKey::of::<#ty>()) },
            Self::Collection(ty) => {
                quote! { ::emux::FieldKind::Collection(::emux::TypeKey::of::<#ty>()) }
            }
        }
    }

    /// Writer function in `::emux::access`.
    pub fn writer(&self) -> Ident {
        let name = match self {
            Self::Scalar(_) => "assign_scalar",
            Self::List(_) => "assign_list",
            Self::Record(_) => "assign_record",
            Self::Collection(_) => "assign_records"
        };
        Ident::new(name, proc_macro2::Span::call_site())
    }

    /// Reader function in `::emux::access`.
    pub fn reader(&self) -> Ident {
        let name = match self {
            Self::Scalar(_) => "encode_scalar",
            Self::List(_) => "encode_list",
            Self::Record(_) => "encode_record",
            Self::Collection(_) => "encode_records"
        };
        Ident::new(name, proc_macro2::Span::call_site())
    }

    /// Short kind name, used in tests.
    #[cfg(test)]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::List(_) => "list",
            Self::Record(_) => "record",
            Self::Collection(_) => "collection"
        }
    }
}
