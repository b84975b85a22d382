//! Core synthesis engine for Kudos: the class model handed over by a host
//! compiler frontend, the IR for generated members, and the synthesizers
//! that fill it in.
//!
//! ## Crate layout
//! - `model`: class declarations, types, members and the `ClassModel` seam.
//! - `ir`: statements and expressions emitted for synthetic members.
//! - `shape`: one-shot classification of field types.
//! - `synth`: supertype injection, name declaration and body generation.
//! - `pipeline`: phase ordering over a whole `ClassTable`.
//! - `obs`: synthesis events and sinks.
#![warn(unreachable_pub)]

pub mod context;
pub mod error;
pub mod features;
pub mod ir;
pub mod model;
pub mod names;
pub mod obs;
pub mod pipeline;
pub mod shape;
pub mod synth;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{ModelError, SynthesisError};
pub use kudos_config::Options;

///
/// Prelude
///
/// Vocabulary needed by frontends and hosts. Synthesizers stay one module
/// level down.
///

pub mod prelude {
    pub use crate::{
        context::SynthesisContext,
        features::{Features, Flag},
        ir::{Expr, JsonToken, ReaderOp, Stmt, SyntheticMember},
        model::{
            Annotation, AnnotationArg, BodyState, ClassBuilder, ClassDecl, ClassId, ClassKind,
            ClassModel, ClassTable, Constructor, Literal, Member, Parameter, Property,
            PropertyOrigin, TypeRef,
        },
        obs::{LogSink, RecordingSink, SynthesisEvent, SynthesisSink},
        pipeline::{Pipeline, SynthesisReport},
        Options, SynthesisError,
    };
}
