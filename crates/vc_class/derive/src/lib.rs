//! See following macros:
//!
//! - [`Serializable`](derive_serializable)
//! - [`impl_auto_register`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static SERIALIZABLE_ATTRIBUTE_NAME: &str = "serializable";

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Serializable Derivation
///
/// `#[derive(Serializable)]` implements `Serializable` for a struct with named
/// fields. The struct must also implement `Default`, deserialization starts
/// from the default instance and assigns every validated field onto it.
///
/// ## Field Binding
///
/// Only fields carrying a `#[serializable(...)]` attribute are serialized,
/// in declaration order.
///
/// ```rust, ignore
/// #[derive(Default, Serializable)]
/// struct Person {
///     #[serializable(schema = vc_schema::string())]
///     name: String,
///     #[serializable(schema = vc_schema::optional_with(vc_schema::number(), 0))]
///     age: u32,
///     #[serializable(class)]
///     address: Address,
///     // Not serialized.
///     cache: Vec<u8>,
/// }
/// ```
///
/// - `schema = <expr>`: The field is validated by the schema expression.
///   The field type must implement `FieldValue`.
/// - `class`: The field holds another class deriving `Serializable`,
///   validated with that class's construct schema.
/// - `skip`: Explicitly not serialized, same as no attribute.
/// - `rename = "..."`: The key used in the serialized record,
///   the field name by default.
///
/// Static items cannot be bound, Rust has no static fields.
/// `ClassBuilder::bind_field` reports `StaticFieldUnsupported` for a static accessor.
///
/// ## Type Attributes
///
/// - `name = "..."`: The class name used in messages,
///   the struct ident by default.
/// - `auto_register`: Collect the class for `Registry::auto_register`.
///   Requires the `auto_register` feature, otherwise ignored.
///
/// ```rust, ignore
/// #[derive(Default, Serializable)]
/// #[serializable(auto_register, name = "app.Person")]
/// struct Person { /* ... */ }
/// ```
///
/// Generic structs, tuple structs, enums and unions are not supported.
#[proc_macro_derive(Serializable, attributes(serializable))]
pub fn derive_serializable(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match impls::derive_serializable(&ast) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Add a class to the automatic registry.
///
/// For classes implementing `Serializable` by hand. If the feature is not
/// enabled, this macro will not do anything.
///
/// ## Example
///
/// ```ignore
/// impl Serializable for Foo { /* ... */ }
///
/// impl_auto_register!(Foo);
/// ```
///
/// This does not conflict with the `serializable(auto_register)` attribute,
/// a class is registered once.
#[proc_macro]
pub fn impl_auto_register(_input: TokenStream) -> TokenStream {
    #[cfg(not(feature = "auto_register"))]
    return TokenStream::new();

    #[cfg(feature = "auto_register")]
    {
        let ty = parse_macro_input!(_input as syn::Type);
        let vc_class_path = path::vc_class();
        impls::submit_auto_register(&vc_class_path, quote::ToTokens::to_token_stream(&ty)).into()
    }
}
