use crate::{
    context::SynthesisContext,
    error::SynthesisError,
    model::{Annotation, AnnotationArg, ClassDecl, ClassId, ClassModel},
    names,
    obs::SynthesisEvent,
};

// annotate_adapter
// points the reflective framework at the kudos adapter factory
pub fn annotate_adapter(
    ctx: &SynthesisContext<'_>,
    model: &dyn ClassModel,
    decl: &ClassDecl,
) -> Result<Option<Annotation>, SynthesisError> {
    if decl.annotation(names::JSON_ADAPTER_ANNOTATION).is_some() {
        return Ok(None);
    }

    let factory = ClassId::from(names::ADAPTER_FACTORY);
    let resolvable = model
        .class(&ClassId::from(names::JSON_ADAPTER_ANNOTATION))
        .is_some()
        && model.class(&factory).is_some();
    if !resolvable {
        return Err(SynthesisError::AdapterFactoryMissing {
            class: decl.id.clone(),
            factory: factory.to_string(),
        });
    }

    ctx.record(SynthesisEvent::AdapterAttached {
        class: decl.id.clone(),
    });

    Ok(Some(
        Annotation::new(names::JSON_ADAPTER_ANNOTATION).with_arg(AnnotationArg::Class(factory)),
    ))
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Options,
        model::{ClassBuilder, ClassTable},
        obs::RecordingSink,
    };

    fn user() -> ClassDecl {
        ClassBuilder::new("demo.User")
            .kudos(&[1])
            .build()
            .expect("class should build")
    }

    #[test]
    fn attaches_factory_annotation() {
        let table = ClassTable::with_builtins().with_gson_library();
        let sink = RecordingSink::new();
        let ctx = SynthesisContext::new(Options::default(), &sink);

        let annotation = annotate_adapter(&ctx, &table, &user())
            .expect("annotation should attach")
            .expect("annotation is new");
        assert_eq!(annotation.to_string(), "@JsonAdapter(kudos.gson.KudosReflectiveTypeAdapterFactory::class)");
    }

    #[test]
    fn missing_library_is_fatal() {
        let table = ClassTable::with_builtins();
        let sink = RecordingSink::new();
        let ctx = SynthesisContext::new(Options::default(), &sink);

        let err = annotate_adapter(&ctx, &table, &user()).expect_err("gson is absent");
        assert!(err.to_string().contains("check your dependencies"));
    }
}
