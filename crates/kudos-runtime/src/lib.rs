//! Runtime support for classes processed by the Kudos synthesis engine.
//!
//! Generated bodies call into three surfaces:
//! - [`reader::JsonReader`], the token-stream reader handed to `deserialize`;
//! - [`nested::parse_nested_value`], for container and nested adapter fields;
//! - the validator primitives in [`validator`].
//!
//! [`interp::Interpreter`] executes the generated IR against a class model so
//! the whole chain can be driven without a host compiler.
#![warn(unreachable_pub)]

pub mod error;
pub mod interp;
pub mod nested;
pub mod reader;
pub mod validator;
pub mod value;

pub use error::RuntimeError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        RuntimeError,
        interp::Interpreter,
        nested::{NestedObjects, parse_nested_value},
        reader::{JsonReader, TokenReader},
        validator::{PresenceMap, validate_array, validate_collection, validate_field},
        value::{Instance, TypeDescriptor, Value},
    };
}
