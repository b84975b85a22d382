//! Class model handed over by the host frontend.
//!
//! The core reads declarations through [`ClassModel`] and only ever appends
//! to them through [`ClassTable`].

mod builder;
mod class;
mod table;
mod ty;

pub use builder::ClassBuilder;
pub use class::{
    Annotation, AnnotationArg, BodyState, ClassDecl, ClassKind, Constructor, Member, Parameter,
    Property, PropertyOrigin, SyntheticField,
};
pub use table::{ClassModel, ClassTable};
pub use ty::{ClassId, Literal, TypeRef};
