use crate::{
    context::SynthesisContext,
    error::SynthesisError,
    features::Features,
    model::{ClassDecl, ClassId, ClassModel, Member, Parameter, TypeRef},
    names,
    obs::SynthesisEvent,
};

/// Names of members the class will receive, answered during name
/// resolution before any body exists.
pub fn synthetic_member_names(
    ctx: &SynthesisContext<'_>,
    decl: &ClassDecl,
) -> Result<Vec<&'static str>, SynthesisError> {
    if !decl.is_class() || !decl.has_marker() {
        return Ok(Vec::new());
    }

    let features = Features::resolve(decl, ctx.options)?;
    if features.streaming_reader {
        Ok(vec![names::DESERIALIZE])
    } else {
        Ok(Vec::new())
    }
}

// declare_deserializer
// signature only; the body is filled during body generation
pub fn declare_deserializer(
    ctx: &SynthesisContext<'_>,
    model: &dyn ClassModel,
    decl: &ClassDecl,
) -> Result<Option<Member>, SynthesisError> {
    if !synthetic_member_names(ctx, decl)?.contains(&names::DESERIALIZE) {
        return Ok(None);
    }

    if model.class(&ClassId::from(names::JSON_READER)).is_none() {
        ctx.record(SynthesisEvent::ReaderUnavailable {
            class: decl.id.clone(),
        });
        return Ok(None);
    }

    let reader = TypeRef::json_reader();
    if decl
        .member(names::DESERIALIZE, std::slice::from_ref(&reader))
        .is_some()
    {
        return Ok(None);
    }

    ctx.record(SynthesisEvent::MemberDeclared {
        class: decl.id.clone(),
        member: names::DESERIALIZE,
    });

    Ok(Some(Member::new(
        names::DESERIALIZE,
        vec![Parameter::new(names::READER_PARAM, reader)],
        decl.self_type(),
    )))
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Options,
        model::{BodyState, ClassBuilder, ClassTable},
        obs::RecordingSink,
        test_support::table_with,
    };

    fn declare(table: &ClassTable, class: &str) -> Option<Member> {
        let sink = RecordingSink::new();
        let ctx = SynthesisContext::new(Options::default(), &sink);
        let decl = table.require(&ClassId::from(class)).expect("class exists");

        declare_deserializer(&ctx, table, decl).expect("declaration should succeed")
    }

    #[test]
    fn declares_signature_without_body() {
        let table = table_with([ClassBuilder::new("demo.User").kudos(&[2])]);

        let member = declare(&table, "demo.User").expect("deserializer declared");
        assert_eq!(member.to_string(), "fun deserialize(jsonReader: kudos.json.reader.JsonReader): demo.User");
        assert_eq!(member.body, BodyState::Declared);
    }

    #[test]
    fn declared_at_most_once() {
        let mut table = table_with([ClassBuilder::new("demo.User").kudos(&[2])]);
        let id = ClassId::from("demo.User");

        let member = declare(&table, "demo.User").expect("first declaration");
        table.add_member(&id, member).expect("member should apply");

        assert!(declare(&table, "demo.User").is_none());
    }

    #[test]
    fn needs_streaming_feature_and_reader_type() {
        let table = table_with([ClassBuilder::new("demo.User").kudos(&[])]);
        assert!(declare(&table, "demo.User").is_none());

        let mut bare = ClassTable::new();
        bare.insert(
            ClassBuilder::new("demo.User")
                .kudos(&[2])
                .build()
                .expect("class should build"),
        )
        .expect("class should insert");
        assert!(declare(&bare, "demo.User").is_none());
    }
}
