//! Implementation of the `#[derive(Listable)]` macro.
//!
//! This macro generates an implementation of the `Listable` trait and
//! field name constants for building criteria and sorts without string typos.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_list_attrs, parse_struct_attrs, ListType};

/// Main implementation of the Listable derive macro.
pub fn listable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let struct_attrs = parse_struct_attrs(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Listable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Listable can only be derived for structs",
            ))
        }
    };

    let mut id_field = None;
    let mut query_names: Vec<String> = Vec::new();
    let mut search_names: Vec<String> = Vec::new();
    let mut sort_names: Vec<String> = Vec::new();
    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let list_attrs = parse_list_attrs(&field.attrs)?;

        if list_attrs.id {
            if id_field.is_some() {
                return Err(Error::new(
                    field.span(),
                    "only one field can be marked #[list(id)]",
                ));
            }
            id_field = Some((field_name, &field.ty));
        }

        if list_attrs.skip {
            continue;
        }

        let list_type = match list_attrs.list_type {
            Some(t) => t,
            None if list_attrs.search || list_attrs.sort => {
                return Err(Error::new(
                    field.span(),
                    "search and sort need a list type, e.g. #[list(String, search)]",
                ))
            }
            None => continue,
        };

        let query_name = list_attrs
            .rename
            .unwrap_or_else(|| field_name.to_string());

        if list_attrs.search {
            if list_type != ListType::String {
                return Err(Error::new(
                    list_attrs.span,
                    "only String fields can be searched",
                ));
            }
            search_names.push(query_name.clone());
        }
        if list_attrs.sort {
            sort_names.push(query_name.clone());
        }

        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));
        field_constants.push(quote! {
            /// Field name for criteria and sorts.
            pub const #const_name: &'static str = #query_name;
        });

        let value_expr = match list_type {
            ListType::String => {
                quote! { ::listkit_query::Value::String(&self.#field_name) }
            }
            ListType::Number => {
                quote! {
                    ::listkit_query::Value::Number(::listkit_query::Number::from(self.#field_name))
                }
            }
            ListType::Timestamp => {
                quote! {
                    ::listkit_query::Value::Timestamp(
                        ::listkit_query::ListTimestamp::list_timestamp(&self.#field_name)
                    )
                }
            }
            ListType::Enum => {
                quote! {
                    ::listkit_query::Value::Enum(
                        ::listkit_query::ListEnum::list_discriminant(&self.#field_name)
                    )
                }
            }
            ListType::Bool => {
                quote! { ::listkit_query::Value::Bool(self.#field_name) }
            }
        };

        field_matches.push(quote! {
            #query_name => #value_expr,
        });
        query_names.push(query_name);
    }

    let (id_name, id_ty) = id_field.ok_or_else(|| {
        Error::new(
            input.ident.span(),
            "Listable needs one field marked #[list(id)]",
        )
    })?;

    let default_sort = match &struct_attrs.default_sort {
        Some(lit) => {
            let spec = lit.value();
            let field = spec.strip_prefix('-').unwrap_or(&spec);
            if !query_names.iter().any(|name| name == field) {
                return Err(Error::new(
                    lit.span(),
                    format!("default_sort names unknown field '{}'", field),
                ));
            }
            quote! {
                fn default_sort() -> ::core::option::Option<::listkit_query::SortSpec> {
                    ::core::option::Option::Some(::listkit_query::SortSpec::parse(#lit))
                }
            }
        }
        None => quote! {},
    };

    let sort_fields = if sort_names.is_empty() {
        quote! {}
    } else {
        quote! {
            fn sort_fields() -> &'static [&'static str] {
                &[#(#sort_names),*]
            }
        }
    };

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::listkit_query::Listable for #struct_name #ty_generics #where_clause {
            type Id = #id_ty;

            fn list_id(&self) -> Self::Id {
                ::core::clone::Clone::clone(&self.#id_name)
            }

            fn list_field_value(&self, field: &str) -> ::listkit_query::Value<'_> {
                match field {
                    #(#field_matches)*
                    _ => ::listkit_query::Value::None,
                }
            }

            fn search_fields() -> &'static [&'static str] {
                &[#(#search_names),*]
            }

            #sort_fields

            #default_sort
        }
    };

    Ok(expanded)
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}
