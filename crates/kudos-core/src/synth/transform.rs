use crate::{
    context::SynthesisContext,
    error::SynthesisError,
    features::Features,
    ir::{Expr, SyntheticMember},
    model::{Annotation, ClassDecl, ClassId, ClassModel, SyntheticField, TypeRef},
    names,
    obs::SynthesisEvent,
    synth::{
        adapter::annotate_adapter,
        constructor::{NoArgConstructor, ensure_no_arg_constructor, needs_no_arg_constructor},
        deserializer::{DeserializerInputs, fill_deserializer},
        validator::{ValidatorOutcome, ensure_validator},
    },
};
use std::{collections::BTreeSet, fmt};

///
/// ClassSynthesis
///
/// Everything body generation adds to one class. Built completely before
/// the table sees any of it.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ClassSynthesis {
    pub class: ClassId,
    pub annotations: Vec<Annotation>,
    pub fields: Vec<SyntheticField>,
    pub members: Vec<SyntheticMember>,
}

impl ClassSynthesis {
    #[must_use]
    pub const fn new(class: ClassId) -> Self {
        Self {
            class,
            annotations: Vec::new(),
            fields: Vec::new(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty() && self.fields.is_empty() && self.members.is_empty()
    }

    #[must_use]
    pub fn member(&self, kind: &str) -> Option<&SyntheticMember> {
        self.members.iter().find(|m| m.kind() == kind)
    }
}

impl fmt::Display for ClassSynthesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "class {}", self.class)?;
        for annotation in &self.annotations {
            writeln!(f, "{annotation}")?;
        }
        for field in &self.fields {
            writeln!(f, "{field}")?;
        }
        for member in &self.members {
            write!(f, "{member}")?;
        }

        Ok(())
    }
}

///
/// ClassTransformer
///
/// Body generation for one class: adapter annotation, no-arg constructor,
/// validator, presence map field, then the deserializer.
///

pub struct ClassTransformer<'c, 'a> {
    ctx: &'c mut SynthesisContext<'a>,
    model: &'c dyn ClassModel,
}

impl<'c, 'a> ClassTransformer<'c, 'a> {
    pub fn new(ctx: &'c mut SynthesisContext<'a>, model: &'c dyn ClassModel) -> Self {
        Self { ctx, model }
    }

    pub fn transform(&mut self, decl: &ClassDecl) -> Result<ClassSynthesis, SynthesisError> {
        let mut out = ClassSynthesis::new(decl.id.clone());
        if !decl.is_class() || !decl.has_marker() {
            return Ok(out);
        }

        let features = Features::resolve(decl, self.ctx.options)?;

        if features.reflective_adapter
            && let Some(annotation) = annotate_adapter(self.ctx, self.model, decl)?
        {
            out.annotations.push(annotation);
        }

        let mut defaulted = BTreeSet::new();
        if needs_no_arg_constructor(decl)
            && let NoArgConstructor::Synthesized(ctor) =
                ensure_no_arg_constructor(self.ctx, self.model, &decl.id)?
        {
            defaulted.clone_from(&ctor.defaulted);
            out.members.push(SyntheticMember::Constructor(ctor));
        }

        let validator = if features.validator {
            ensure_validator(self.ctx, self.model, decl, &defaulted)
        } else {
            ValidatorOutcome::Absent
        };
        let has_validator = validator.exists();
        if let ValidatorOutcome::Synthesized(v) = validator {
            out.members.push(SyntheticMember::Validator(v));
        }

        if features.streaming_reader {
            let presence_field = has_validator.then_some(names::STATUS_FIELD);
            if has_validator && decl.field(names::STATUS_FIELD).is_none() {
                out.fields.push(SyntheticField {
                    name: names::STATUS_FIELD.to_string(),
                    ty: TypeRef::presence_map(),
                    initializer: Expr::NewPresenceMap,
                });
                self.ctx.record(SynthesisEvent::PresenceFieldAdded {
                    class: decl.id.clone(),
                });
            }

            let inputs = DeserializerInputs {
                presence_field,
                validator: has_validator,
            };
            if let Some(deserializer) = fill_deserializer(self.ctx, self.model, decl, inputs)? {
                out.members.push(SyntheticMember::Deserializer(deserializer));
            }
        }

        Ok(out)
    }
}

///
/// TESTS
///
