//! Attribute parsing for the Listable derive macro.
//!
//! Field attributes:
//!
//! ```text
//! #[list(id)]
//! #[list(String, search, sort)]
//! #[list(Timestamp, rename = "created")]
//! #[list(ty = "enum")]
//! #[list(skip)]
//! ```
//!
//! Struct attribute:
//!
//! ```text
//! #[list(default_sort = "-created_at")]
//! ```

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Ident, Lit, LitStr, Meta, Result, Token,
};

const TYPE_NAMES: &str = "String, Number, Timestamp, Enum, Bool";

/// How a field is exposed to filters and sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    String,
    Number,
    Timestamp,
    Enum,
    Bool,
}

impl ListType {
    /// Parse from an identifier: `#[list(Number)]`.
    pub fn from_ident(ident: &Ident) -> Result<Self> {
        Self::from_name(&ident.to_string(), ident.span())
    }

    /// Parse from `ty = "..."`, for names that are keywords (`enum`, `bool`).
    pub fn from_name(name: &str, span: Span) -> Result<Self> {
        match name {
            "String" | "string" => Ok(ListType::String),
            "Number" | "number" => Ok(ListType::Number),
            "Timestamp" | "timestamp" => Ok(ListType::Timestamp),
            "Enum" | "enum" | "enumeration" => Ok(ListType::Enum),
            "Bool" | "bool" | "boolean" => Ok(ListType::Bool),
            other => Err(Error::new(
                span,
                format!(
                    "unknown list type: '{}'. Expected one of: {}",
                    other, TYPE_NAMES
                ),
            )),
        }
    }
}

/// Field-level attributes from `#[list(...)]`.
#[derive(Debug, Clone)]
pub struct ListAttr {
    pub list_type: Option<ListType>,
    /// The field is the record's stable identifier.
    pub id: bool,
    /// Free-text search looks at this field.
    pub search: bool,
    /// The field is a declared sort key.
    pub sort: bool,
    pub skip: bool,
    /// Query name override (default: the field name).
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for ListAttr {
    fn default() -> Self {
        ListAttr {
            list_type: None,
            id: false,
            search: false,
            sort: false,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

fn string_value(expr: &Expr, what: &str) -> Result<LitStr> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.clone()),
        other => Err(Error::new(
            other.span(),
            format!("{} must be a string literal", what),
        )),
    }
}

impl Parse for ListAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ListAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    if p.is_ident("id") {
                        attr.id = true;
                    } else if p.is_ident("search") {
                        attr.search = true;
                    } else if p.is_ident("sort") {
                        attr.sort = true;
                    } else if p.is_ident("skip") {
                        attr.skip = true;
                    } else if let Some(ident) = p.get_ident() {
                        attr.list_type = Some(ListType::from_ident(ident)?);
                        attr.span = ident.span();
                    } else {
                        return Err(Error::new(
                            p.span(),
                            format!("expected a list type ({}) or a flag", TYPE_NAMES),
                        ));
                    }
                }

                Meta::NameValue(nv) => {
                    if nv.path.is_ident("rename") {
                        attr.rename = Some(string_value(&nv.value, "rename")?.value());
                    } else if nv.path.is_ident("ty") {
                        let s = string_value(&nv.value, "ty")?;
                        attr.list_type = Some(ListType::from_name(&s.value(), s.span())?);
                        attr.span = s.span();
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename or ty",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        concat!(
                            "unknown list attribute. Expected: a list type, id, search, sort, ",
                            "skip, rename = \"...\", or ty = \"...\"",
                        ),
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Struct-level attributes from `#[list(...)]`.
#[derive(Debug, Clone, Default)]
pub struct ListStructAttr {
    /// `"-field"` for descending, `"field"` for ascending.
    pub default_sort: Option<LitStr>,
}

impl Parse for ListStructAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ListStructAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("default_sort") => {
                    attr.default_sort = Some(string_value(&nv.value, "default_sort")?);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown struct attribute. Expected: default_sort = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[list(...)]` from a field's attributes.
pub fn parse_list_attrs(attrs: &[Attribute]) -> Result<ListAttr> {
    for attr in attrs {
        if attr.path().is_ident("list") {
            return attr.parse_args::<ListAttr>();
        }
    }
    Ok(ListAttr::default())
}

/// Extract `#[list(...)]` from the struct's attributes.
pub fn parse_struct_attrs(attrs: &[Attribute]) -> Result<ListStructAttr> {
    for attr in attrs {
        if attr.path().is_ident("list") {
            return attr.parse_args::<ListStructAttr>();
        }
    }
    Ok(ListStructAttr::default())
}
