//! Synthesizers.
//!
//! Each one reads a class through [`ClassModel`](crate::model::ClassModel)
//! and returns what it would add. Committing is left to the caller.

mod adapter;
mod constructor;
mod declare;
mod deserializer;
mod supertype;
mod transform;
mod validator;

pub use adapter::annotate_adapter;
pub use constructor::{NoArgConstructor, ensure_no_arg_constructor, needs_no_arg_constructor};
pub use declare::{declare_deserializer, synthetic_member_names};
pub use deserializer::{DeserializerInputs, fill_deserializer};
pub use supertype::inject_supertypes;
pub use transform::{ClassSynthesis, ClassTransformer};
pub use validator::{ValidatorOutcome, ValidatorPlan, ensure_validator, plan_validator};
