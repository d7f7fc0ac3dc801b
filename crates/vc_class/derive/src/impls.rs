use proc_macro2::TokenStream;
use quote::{ToTokens, quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Field, Fields, LitStr};

use vc_macro_utils::full_path::ResultFP;

use crate::attributes::{FieldAttributes, FieldKind, TypeAttributes};

// -----------------------------------------------------------------------------
// Serializable

pub(crate) fn derive_serializable(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let fields: Vec<&Field> = match &ast.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new(
                    ast.ident.span(),
                    "`Serializable` can only be derived for structs with named fields",
                ));
            }
        },
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span(),
                "`Serializable` cannot be derived for enums",
            ));
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span(),
                "`Serializable` cannot be derived for unions",
            ));
        }
    };

    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new(
            ast.generics.span(),
            "`Serializable` cannot be derived for generic types",
        ));
    }

    let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

    let vc_class_path = crate::path::vc_class();
    let serializable_ = crate::path::serializable_(&vc_class_path);
    let class_builder_ = crate::path::class_builder_(&vc_class_path);
    let register_error_ = crate::path::register_error_(&vc_class_path);

    let mut declarations = Vec::with_capacity(fields.len());
    for field in fields {
        let field_attrs = FieldAttributes::parse_attrs(&field.attrs)?;
        let Some(member) = &field.ident else {
            continue;
        };
        let ty = &field.ty;
        let name = field_attrs
            .rename
            .unwrap_or_else(|| LitStr::new(&member.to_string(), member.span()));

        let declaration = match field_attrs.kind {
            FieldKind::Skip => continue,
            FieldKind::Schema(schema) => quote_spanned! { field.span() =>
                class.field::<#ty>(
                    #name,
                    #schema,
                    |this| &this.#member,
                    |this| &mut this.#member,
                )?;
            },
            FieldKind::Class => quote_spanned! { field.span() =>
                class.nested::<#ty>(
                    #name,
                    |this| &this.#member,
                    |this| &mut this.#member,
                )?;
            },
        };
        declarations.push(declaration);
    }

    let ident = &ast.ident;
    let class_name = attrs
        .name
        .clone()
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));

    let auto_register = get_auto_register_impl(&attrs, &vc_class_path, ident.to_token_stream());

    Ok(quote! {
        impl #serializable_ for #ident {
            #[allow(unused_variables, reason = "classes without serialized fields")]
            fn declare(
                class: &mut #class_builder_<'_, Self>,
            ) -> #ResultFP<(), #register_error_> {
                #(#declarations)*
                #ResultFP::Ok(())
            }

            #[inline]
            fn class_name() -> &'static str {
                #class_name
            }
        }

        #auto_register
    })
}

// -----------------------------------------------------------------------------
// auto_register

/// Submit `ty` to the `auto_register` collection.
#[cfg(feature = "auto_register")]
pub(crate) fn submit_auto_register(vc_class_path: &syn::Path, ty: TokenStream) -> TokenStream {
    let auto_register_ = crate::path::auto_register_(vc_class_path);
    quote! {
        const _: () = {
            #auto_register_::inventory::submit!{
                #auto_register_::__AutoRegisterFunc(
                    <#ty as #auto_register_::__RegisterClass>::__register
                )
            }
        };
    }
}

#[cfg(feature = "auto_register")]
fn get_auto_register_impl(
    attrs: &TypeAttributes,
    vc_class_path: &syn::Path,
    ty: TokenStream,
) -> TokenStream {
    match attrs.auto_register {
        Some(_) => submit_auto_register(vc_class_path, ty),
        None => TokenStream::new(),
    }
}

#[cfg(not(feature = "auto_register"))]
fn get_auto_register_impl(_: &TypeAttributes, _: &syn::Path, _: TokenStream) -> TokenStream {
    TokenStream::new()
}
