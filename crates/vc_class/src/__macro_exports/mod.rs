//! Items used by the code `vc_class_derive` generates. Not public API.

#[cfg(feature = "auto_register")]
pub mod auto_register;
