//! Frontends producing Kudos class declarations.
//!
//! - [`descriptor`]: JSON class descriptors in host type syntax.
//! - [`source`]: Rust-syntax declarations annotated with `#[kudos]`,
//!   `#[class]` and `#[field]`.

pub mod descriptor;
pub mod error;
pub mod source;

mod resolve;

pub use descriptor::parse_descriptor;
pub use error::FrontendError;
pub use source::parse_source;

use kudos_core::model::ClassDecl;
use std::{fs, path::Path};

/// Loads declarations from a file, choosing the frontend by extension.
/// Source files use their file stem as the package.
pub fn load_path(path: impl AsRef<Path>) -> Result<Vec<ClassDecl>, FrontendError> {
    let path = path.as_ref();
    let read = || {
        fs::read_to_string(path).map_err(|source| FrontendError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => parse_descriptor(&read()?),
        Some("rs") => {
            let package = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default();
            parse_source(&read()?, package)
        }
        _ => Err(FrontendError::UnsupportedFile {
            path: path.to_path_buf(),
        }),
    }
}
