//! Parsing of `#[serializable(...)]` attributes.

use proc_macro2::Span;
use syn::{Attribute, Expr, LitStr, meta::ParseNestedMeta, spanned::Spanned};

use crate::SERIALIZABLE_ATTRIBUTE_NAME;

fn duplicate(meta: &ParseNestedMeta) -> syn::Error {
    meta.error("duplicate attribute")
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// Attributes on the class itself.
///
/// - `#[serializable(auto_register)]`
/// - `#[serializable(name = "Person")]`
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub auto_register: Option<Span>,
    pub name: Option<LitStr>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(SERIALIZABLE_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
        }
        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("auto_register") {
            if self.auto_register.is_some() {
                return Err(duplicate(&meta));
            }
            self.auto_register = Some(meta.path.span());
            Ok(())
        } else if meta.path.is_ident("name") {
            if self.name.is_some() {
                return Err(duplicate(&meta));
            }
            self.name = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("expected `auto_register` or `name = \"...\"`"))
        }
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// How a field takes part in serialization.
pub(crate) enum FieldKind {
    /// `#[serializable(schema = <expr>)]`
    Schema(Expr),
    /// `#[serializable(class)]`, the field holds another registered class.
    Class,
    /// `#[serializable(skip)]` or no attribute at all.
    Skip,
}

/// Attributes on one field.
///
/// - `#[serializable(schema = vc_schema::string())]`
/// - `#[serializable(class)]`
/// - `#[serializable(rename = "fullName")]`
/// - `#[serializable(skip)]`
pub(crate) struct FieldAttributes {
    pub kind: FieldKind,
    pub rename: Option<LitStr>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut kind: Option<(Span, FieldKind)> = None;
        let mut rename = None;

        for attr in attrs {
            if !attr.path().is_ident(SERIALIZABLE_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                let span = meta.path.span();
                let parsed = if meta.path.is_ident("schema") {
                    FieldKind::Schema(meta.value()?.parse()?)
                } else if meta.path.is_ident("class") {
                    FieldKind::Class
                } else if meta.path.is_ident("skip") {
                    FieldKind::Skip
                } else if meta.path.is_ident("rename") {
                    if rename.is_some() {
                        return Err(duplicate(&meta));
                    }
                    rename = Some(meta.value()?.parse::<LitStr>()?);
                    return Ok(());
                } else {
                    return Err(meta.error(
                        "expected `schema = ...`, `class`, `skip` or `rename = \"...\"`",
                    ));
                };

                if kind.is_some() {
                    return Err(syn::Error::new(
                        span,
                        "`schema`, `class` and `skip` are mutually exclusive",
                    ));
                }
                kind = Some((span, parsed));
                Ok(())
            })?;
        }

        let kind = kind.map_or(FieldKind::Skip, |(_, kind)| kind);
        if let (FieldKind::Skip, Some(rename)) = (&kind, &rename) {
            return Err(syn::Error::new(
                rename.span(),
                "`rename` needs a serialized field, add `schema = ...` or `class`",
            ));
        }

        Ok(Self { kind, rename })
    }
}
