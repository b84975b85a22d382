//! ## Crate layout
//! - `config`: `kudos.toml` parsing into feature toggles.
//! - `core`: class model, synthesis IR, synthesizers and the pipeline.
//! - `frontend`: descriptor and Rust-syntax frontends producing class models.
//! - `runtime`: token reader, validator primitives and the IR interpreter.
//!
//! The `prelude` module covers the usual flow: load declarations, run the
//! pipeline, then drive the generated members at runtime.

pub use kudos_config as config;
pub use kudos_core as core;
pub use kudos_frontend as frontend;
pub use kudos_runtime as runtime;

pub mod error;

pub use error::{Error, ErrorKind};

use kudos_core::{
    Options,
    model::{ClassDecl, ClassTable},
    obs::{LogSink, SynthesisSink},
    pipeline::{Pipeline, SynthesisReport},
};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builtins plus `classes`, optionally with the reflective JSON library.
pub fn class_table(
    classes: impl IntoIterator<Item = ClassDecl>,
    reflective_library: bool,
) -> Result<ClassTable, Error> {
    let mut table = ClassTable::with_builtins();
    if reflective_library {
        table = table.with_gson_library();
    }
    table.extend(classes)?;

    Ok(table)
}

/// Runs every synthesis phase, reporting through the `log` facade.
pub fn synthesize(table: &mut ClassTable, options: Options) -> Result<SynthesisReport, Error> {
    synthesize_with(table, options, &LogSink)
}

pub fn synthesize_with(
    table: &mut ClassTable,
    options: Options,
    sink: &dyn SynthesisSink,
) -> Result<SynthesisReport, Error> {
    Ok(Pipeline::new(options, sink).run(table)?)
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{Error, ErrorKind, class_table, synthesize, synthesize_with};
    pub use kudos_config::KudosConfig;
    pub use kudos_core::prelude::*;
    pub use kudos_frontend::{load_path, parse_descriptor, parse_source};
    pub use kudos_runtime::prelude::*;
}
