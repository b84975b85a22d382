use kudos_core::{ir::JsonToken, model::ClassId};
use thiserror::Error as ThisError;

///
/// RuntimeError
///
/// Raised by the reader, the validator primitives and the interpreter.
/// Reader and validator errors reach the caller unchanged.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum RuntimeError {
    #[error("expected {expected} but was {found}")]
    Expected {
        expected: JsonToken,
        found: JsonToken,
    },

    #[error("'{value}' is not a valid {target}")]
    InvalidNumber { value: String, target: &'static str },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("field '{field}' required but missing")]
    MissingField { field: String },

    #[error("class '{class}' has no constructor callable without arguments")]
    NoConstructor { class: ClassId },

    #[error("class '{class}' has no generated deserializer")]
    NoDeserializer { class: ClassId },

    #[error("element of array '{field}' must not be null")]
    NullArrayElement { field: String },

    #[error("element of collection '{field}' must not be null ({element_type})")]
    NullCollectionElement { field: String, element_type: String },

    #[error("expected {expected} value, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("name '{name}' is not bound")]
    Unbound { name: String },

    #[error("class '{class}' is unknown to the runtime")]
    UnknownClass { class: ClassId },

    #[error("cannot parse a value of type '{descriptor}'")]
    UnsupportedDescriptor { descriptor: String },
}
