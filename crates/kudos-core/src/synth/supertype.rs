use crate::{
    context::SynthesisContext,
    error::SynthesisError,
    features::Features,
    model::{ClassDecl, ClassId, ClassModel, TypeRef},
    names,
    obs::SynthesisEvent,
};

// inject_supertypes
// capabilities already present anywhere in the hierarchy are not repeated
pub fn inject_supertypes(
    ctx: &SynthesisContext<'_>,
    model: &dyn ClassModel,
    decl: &ClassDecl,
) -> Result<Vec<TypeRef>, SynthesisError> {
    if !decl.is_class() || !decl.has_marker() {
        return Ok(Vec::new());
    }

    let features = Features::resolve(decl, ctx.options)?;
    let closure = model.supertype_closure(&decl.supertypes);
    let mut injected = Vec::new();

    let wanted = [
        (names::KUDOS_VALIDATOR, features.validator, false),
        (names::KUDOS_JSON_ADAPTER, features.streaming_reader, true),
    ];
    for (capability, enabled, self_typed) in wanted {
        if !enabled || closure.iter().any(|c| *c == capability) {
            continue;
        }

        let id = ClassId::from(capability);
        if model.class(&id).is_none() {
            return Err(SynthesisError::unknown_class(&id));
        }

        let mut ty = TypeRef::new(id);
        if self_typed {
            ty = ty.with_args([decl.self_type()]);
        }
        ctx.record(SynthesisEvent::SupertypeInjected {
            class: decl.id.clone(),
            supertype: ty.to_string(),
        });
        injected.push(ty);
    }

    Ok(injected)
}

///
/// TESTS
///
