//! Serializable classes: plain structs converted to and from validated
//! plain records.
//!
//! ## Menu
//!
//! - [`Serializable`]: A class with declared fields, usually derived.
//! - [`ClassBuilder`]: Declares the fields of a class, each bound to a
//!   [`vc_schema::Schema`].
//! - [`Registry`]: Keyed by [`ClassId`], stores the aggregated object schema
//!   of every registered class.
//! - Conversions: [`serialize`], [`deserialize`], [`resolve_schema`].
//!
//! Fields holding another registered class are validated with that class's
//! construct schema, so deserialization rebuilds real nested instances,
//! not plain records.
//!
//! # Example
//!
//! ```
//! use vc_class::{Registry, Serializable};
//! use vc_schema::Value;
//!
//! #[derive(Default, Serializable)]
//! struct Address {
//!     #[serializable(schema = vc_schema::string())]
//!     city: String,
//! }
//!
//! impl Address {
//!     fn label(&self) -> String {
//!         format!("in {}", self.city)
//!     }
//! }
//!
//! #[derive(Default, Serializable)]
//! struct Person {
//!     #[serializable(schema = vc_schema::string())]
//!     name: String,
//!     #[serializable(class)]
//!     address: Address,
//! }
//!
//! let mut registry = Registry::new();
//! registry.register::<Address>().unwrap();
//! registry.register::<Person>().unwrap();
//!
//! let input = Value::record([
//!     ("name", Value::from("Jane")),
//!     ("address", Value::record([("city", Value::from("Paris"))])),
//! ]);
//! let person: Person = registry.deserialize(input).unwrap();
//! assert_eq!(person.address.label(), "in Paris");
//! ```
//!
//! ## Features
//!
//! - `std` (default): [`SharedRegistry`] and `std` error integration.
//! - `auto_register` (default): [`Registry::auto_register`] through `inventory`.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Extern Self

// `crate` inside the crate, `vc_class` in doc tests: the derive emits the latter.
extern crate self as vc_class;

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod class;
mod config;
mod convert;
mod error;
mod field;
mod registry;

#[doc(hidden)]
pub mod __macro_exports;

// -----------------------------------------------------------------------------
// Exports

pub use builder::ClassBuilder;
pub use class::{ClassId, Serializable};
pub use config::{RegistryConfig, UnresolvedClass};
pub use convert::{deserialize, resolve_schema, resolve_schema_by_id, serialize, serialize_any};
pub use error::{RegisterError, SerialError};
pub use field::{Accessor, FieldDescriptor, FieldValue};
pub use registry::{ClassEntry, Registry};

#[cfg(feature = "std")]
pub use registry::SharedRegistry;

pub use vc_class_derive::{Serializable, impl_auto_register};
