//! A small validation engine over plain structured values.
//!
//! ## Menu
//!
//! - [`Value`]: A plain structured value (null, bool, number, string, array, record),
//!   which can also carry a materialized [`Instance`].
//! - [`Schema`]: A validation rule, built from the constructors in this crate:
//!     - primitives: [`any`], [`null`], [`boolean`], [`number`], [`integer`], [`string`], [`literal`]
//!     - wrappers: [`optional`], [`optional_with`], [`nullable`], [`nullable_with`], [`nullish`], [`array`]
//!     - composition: [`object`], [`object_with`], [`strict_object`], [`loose_object`]
//!     - pipelines: [`pipe`], [`Schema::check`], [`Schema::transform`]
//! - [`parse`]: Validate a value and return the (possibly transformed) output.
//! - [`ValidationError`]: Every [`Issue`] found, each with its [`FieldPath`].
//!
//! # Example
//!
//! ```
//! use vc_schema::{Value, parse};
//!
//! let person = vc_schema::object([
//!     ("name", vc_schema::string()),
//!     ("age", vc_schema::optional_with(vc_schema::number(), 0)),
//! ]);
//!
//! let input = Value::record([("name", Value::from("John Doe"))]);
//! let output = parse(&person, input).unwrap();
//!
//! assert_eq!(output.get("age"), Some(&Value::Number(0.0)));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod parse;
mod path;
mod schema;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use error::{Issue, IssueKind, ValidationError};
pub use parse::{is, parse};
pub use path::{FieldPath, PathSegment};
pub use schema::{Action, Schema, SchemaKind, Transform, UnknownKeys};
pub use schema::{any, array, boolean, integer, literal, null, number, string, unresolved};
pub use schema::{loose_object, object, object_with, strict_object};
pub use schema::{max_length, max_value, min_length, min_value, pipe};
pub use schema::{nullable, nullable_with, nullish, optional, optional_with};
pub use value::{Instance, Object, Record, Value};
