use kudos_core::ModelError;
use std::path::PathBuf;
use thiserror::Error as ThisError;

///
/// FrontendError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum FrontendError {
    #[error(transparent)]
    Darling(#[from] darling::Error),

    #[error("class '{class}': '{value}' is not a kudos flag value")]
    InvalidFlag { class: String, value: String },

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Syn(#[from] syn::Error),

    #[error("'{}' is neither a .json descriptor nor a .rs source file", path.display())]
    UnsupportedFile { path: PathBuf },

    #[error("field '{field}': '{expr}' is not a constant default")]
    UnsupportedLiteral { field: String, expr: String },

    #[error("type '{ty}' has no host equivalent")]
    UnsupportedType { ty: String },
}
