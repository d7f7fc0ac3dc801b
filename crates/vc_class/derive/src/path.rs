//! Paths of `vc_class` items used by the generated code.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `vc_class` crate.
///
/// 1. For crates that depend on `vc_class`, `::vc_class` is returned.
/// 2. For crates that depend on `vc_serial`, `::vc_serial::class` is returned.
/// 3. For other situations, `::vc_class` is returned, but this may be incorrect.
///
/// Reading the manifest is not cheap, so the path is obtained once per
/// macro invocation and passed around.
pub(crate) fn vc_class() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_class"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn serializable_(vc_class_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_class_path::Serializable
    }
}

#[inline(always)]
pub(crate) fn class_builder_(vc_class_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_class_path::ClassBuilder
    }
}

#[inline(always)]
pub(crate) fn register_error_(vc_class_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_class_path::RegisterError
    }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(vc_class_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_class_path::__macro_exports::auto_register
    }
}
