//! Fully qualified paths of `core` items, for use in generated code.
//!
//! Generated code must not depend on what the caller has imported or shadowed,
//! so prelude items are spelled out from the crate root.
//!
//! ```
//! use quote::quote;
//! use vc_macro_utils::full_path::ResultFP;
//!
//! let tokens = quote! { #ResultFP<(), ()> };
//! assert!(tokens.to_string().contains("result"));
//! ```

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

/// `::core::result::Result`
#[derive(Debug, Clone, Copy)]
pub struct ResultFP;

impl ToTokens for ResultFP {
    #[inline]
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(quote!(::core::result::Result));
    }
}
