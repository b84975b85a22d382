use crate::model::ClassId;
use thiserror::Error as ThisError;

///
/// SynthesisError
///
/// Every synthesis failure is fatal for the compilation. Nothing is partially
/// committed for the class that raised it.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum SynthesisError {
    #[error(
        "adapter factory '{factory}' not found while the reflective adapter is enabled for \
         '{class}'; check your dependencies to ensure the gson adapter library is present"
    )]
    AdapterFactoryMissing { class: ClassId, factory: String },

    #[error("cyclic class hierarchy detected at '{class}'")]
    CyclicHierarchy { class: ClassId },

    #[error(
        "no noarg super constructor for '{class}' in '{superclass}':\n{}",
        .available.join("\n")
    )]
    MissingNoArgSuperConstructor {
        class: ClassId,
        superclass: ClassId,
        available: Vec<String>,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("class '{class}' is not declared in the class model")]
    UnknownClass { class: ClassId },

    #[error("unknown kudos annotation argument {value} on '{class}'")]
    UnknownFlag { class: ClassId, value: i32 },

    #[error("kudos unsupported type '{ty}' for field '{field}' of '{class}'")]
    UnsupportedType {
        class: ClassId,
        field: String,
        ty: String,
    },
}

impl SynthesisError {
    pub(crate) fn unknown_class(class: &ClassId) -> Self {
        Self::UnknownClass {
            class: class.clone(),
        }
    }
}

///
/// ModelError
/// raised while building class declarations, before synthesis starts
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ModelError {
    #[error("duplicate class '{0}' in class table")]
    DuplicateClass(ClassId),

    #[error("invalid type expression '{input}': {reason}")]
    InvalidType { input: String, reason: String },

    #[error("'{0}' must follow a property")]
    NoProperty(&'static str),
}
