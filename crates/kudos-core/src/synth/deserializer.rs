use crate::{
    context::SynthesisContext,
    error::SynthesisError,
    ir::{Branch, Expr, JsonToken, ReaderOp, Stmt, SyntheticDeserializer},
    model::{BodyState, ClassDecl, ClassModel, Property, TypeRef},
    names,
    obs::SynthesisEvent,
    shape,
};
use std::collections::BTreeMap;

const NAME_LOCAL: &str = "name";

///
/// DeserializerInputs
/// what the class transformer already decided for this class
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DeserializerInputs<'a> {
    /// Presence map field, when one is added.
    pub presence_field: Option<&'a str>,

    /// A validator exists on the class.
    pub validator: bool,
}

// fill_deserializer
// only a declared member without a body is filled
pub fn fill_deserializer(
    ctx: &SynthesisContext<'_>,
    model: &dyn ClassModel,
    decl: &ClassDecl,
    inputs: DeserializerInputs<'_>,
) -> Result<Option<SyntheticDeserializer>, SynthesisError> {
    let Some(member) = decl.member(names::DESERIALIZE, &[TypeRef::json_reader()]) else {
        return Ok(None);
    };
    if member.body != BodyState::Declared {
        return Ok(None);
    }

    let fields = decl
        .properties
        .iter()
        .filter(|p| p.has_candidate_field())
        .collect::<Vec<_>>();
    report_collisions(ctx, decl, &fields);

    let mut branches = Vec::with_capacity(fields.len());
    for property in &fields {
        let shape = shape::classify(model, &decl.id, &property.name, &property.ty)?;

        let mut body = vec![Stmt::SetField {
            field: property.name.clone(),
            value: shape.read_expr(&property.ty),
        }];
        if let Some(presence) = inputs.presence_field {
            body.push(Stmt::Expr(Expr::PresencePut {
                field: presence.to_string(),
                key: property.name.clone(),
                value: Box::new(Expr::field(property.name.clone()).not_null()),
            }));
        }

        branches.push(Branch {
            key: property.json_key().to_string(),
            body,
        });
    }

    let skip = || Stmt::Expr(Expr::Read(ReaderOp::SkipValue));
    let mut body = vec![
        Stmt::Expr(Expr::Read(ReaderOp::BeginObject)),
        Stmt::While {
            cond: Expr::Read(ReaderOp::HasNext),
            body: vec![
                Stmt::Let {
                    name: NAME_LOCAL.to_string(),
                    value: Expr::Read(ReaderOp::NextName),
                },
                Stmt::IfThen {
                    cond: Expr::PeekIs(JsonToken::Null),
                    then: vec![skip(), Stmt::Continue],
                },
                Stmt::When {
                    subject: Expr::Local(NAME_LOCAL.to_string()),
                    branches,
                    default: vec![skip()],
                },
            ],
        },
        Stmt::Expr(Expr::Read(ReaderOp::EndObject)),
    ];

    if inputs.validator
        && let Some(presence) = inputs.presence_field
    {
        body.push(Stmt::Expr(Expr::CallValidator {
            status: Box::new(Expr::field(presence)),
        }));
    }
    body.push(Stmt::Return(Expr::This));

    ctx.record(SynthesisEvent::DeserializerFilled {
        class: decl.id.clone(),
        fields: fields.len(),
    });

    Ok(Some(SyntheticDeserializer {
        class: decl.id.clone(),
        body,
    }))
}

// report_collisions
// the first field keeps a duplicated key; later ones are unreachable
fn report_collisions(ctx: &SynthesisContext<'_>, decl: &ClassDecl, fields: &[&Property]) {
    let mut owners = BTreeMap::<&str, &str>::new();

    for property in fields {
        let key = property.json_key();
        match owners.get(key) {
            Some(kept) => ctx.record(SynthesisEvent::JsonNameCollision {
                class: decl.id.clone(),
                key: key.to_string(),
                kept: (*kept).to_string(),
                shadowed: property.name.clone(),
            }),
            None => {
                owners.insert(key, &property.name);
            }
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Options,
        model::{ClassBuilder, ClassId, ClassTable, Member, Parameter},
        obs::RecordingSink,
        test_support::{table_with, user_table},
    };
    use proptest::prelude::*;

    fn declared_deserializer(class: &str) -> Member {
        Member::new(
            names::DESERIALIZE,
            vec![Parameter::new(names::READER_PARAM, TypeRef::json_reader())],
            TypeRef::new(class),
        )
    }

    fn with_declared(mut table: ClassTable, class: &str) -> ClassTable {
        table
            .add_member(&ClassId::from(class), declared_deserializer(class))
            .expect("member should apply");
        table
    }

    fn fill(
        table: &ClassTable,
        sink: &RecordingSink,
        class: &str,
        inputs: DeserializerInputs<'_>,
    ) -> Result<Option<SyntheticDeserializer>, SynthesisError> {
        let ctx = SynthesisContext::new(Options::default(), sink);
        let decl = table.require(&ClassId::from(class)).expect("class exists");

        fill_deserializer(&ctx, table, decl, inputs)
    }

    fn listing(deserializer: &SyntheticDeserializer) -> String {
        deserializer.body.iter().map(ToString::to_string).collect()
    }

    fn branch_keys(deserializer: &SyntheticDeserializer) -> Vec<String> {
        let Stmt::While { body, .. } = &deserializer.body[1] else {
            panic!("second statement is the read loop");
        };
        let Stmt::When { branches, .. } = &body[2] else {
            panic!("loop ends with the key dispatch");
        };
        branches.iter().map(|b| b.key.clone()).collect()
    }

    #[test]
    fn emits_reader_loop_with_presence_and_validation() {
        let table = with_declared(user_table(), "demo.User");
        let sink = RecordingSink::new();
        let inputs = DeserializerInputs {
            presence_field: Some(names::STATUS_FIELD),
            validator: true,
        };

        let deserializer = fill(&table, &sink, "demo.User", inputs)
            .expect("fill should succeed")
            .expect("declared member gets a body");
        let text = listing(&deserializer);

        assert!(text.contains("jsonReader.beginObject()"));
        assert!(text.contains("this.name = jsonReader.nextString()"));
        assert!(text.contains("this.age = jsonReader.nextInt()"));
        assert!(text.contains("this.kudosFieldStatusMap.put(\"name\", this.name != null)"));
        assert!(text.contains("this.validate(this.kudosFieldStatusMap)"));
        assert_eq!(deserializer.body.last(), Some(&Stmt::Return(Expr::This)));
    }

    #[test]
    fn no_presence_map_means_no_puts_and_no_validate_call() {
        let table = with_declared(user_table(), "demo.User");
        let sink = RecordingSink::new();

        let deserializer = fill(&table, &sink, "demo.User", DeserializerInputs::default())
            .expect("fill should succeed")
            .expect("declared member gets a body");
        let text = listing(&deserializer);

        assert!(!text.contains(".put("));
        assert!(!text.contains("validate"));
    }

    #[test]
    fn materialized_or_missing_member_is_left_alone() {
        let sink = RecordingSink::new();
        let missing = user_table();
        assert!(
            fill(&missing, &sink, "demo.User", DeserializerInputs::default())
                .expect("fill should succeed")
                .is_none()
        );

        let authored = table_with([ClassBuilder::new("demo.User")
            .kudos(&[2])
            .param("name", "String")
            .member(declared_deserializer("demo.User").with_body(BodyState::Authored))]);
        assert!(
            fill(&authored, &sink, "demo.User", DeserializerInputs::default())
                .expect("fill should succeed")
                .is_none()
        );
    }

    #[test]
    fn unsupported_type_aborts() {
        let table = with_declared(
            table_with([ClassBuilder::new("demo.User")
                .kudos(&[2])
                .param("name", "String")
                .param("callback", "Function")]),
            "demo.User",
        );
        let sink = RecordingSink::new();

        let err = fill(&table, &sink, "demo.User", DeserializerInputs::default())
            .expect_err("function field is unsupported");
        assert!(matches!(
            err,
            SynthesisError::UnsupportedType { ref field, .. } if field == "callback"
        ));
        assert_eq!(
            sink.count(|e| matches!(e, SynthesisEvent::DeserializerFilled { .. })),
            0
        );
    }

    #[test]
    fn collisions_are_flagged_and_first_field_kept() {
        let table = with_declared(
            table_with([ClassBuilder::new("demo.User")
                .kudos(&[2])
                .param("id", "String")
                .param("legacyId", "String?")
                .json_name("id")]),
            "demo.User",
        );
        let sink = RecordingSink::new();

        let deserializer = fill(&table, &sink, "demo.User", DeserializerInputs::default())
            .expect("fill should succeed")
            .expect("declared member gets a body");

        assert_eq!(branch_keys(&deserializer), vec!["id", "id"]);
        let warnings = sink
            .events()
            .into_iter()
            .filter(SynthesisEvent::is_warning)
            .collect::<Vec<_>>();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            SynthesisEvent::JsonNameCollision { kept, shadowed, .. } if kept == "id" && shadowed == "legacyId"
        ));
    }

    proptest! {
        #[test]
        fn renamed_fields_use_only_their_renamed_key(
            rename in proptest::option::of("[a-z_]{1,8}"),
            field in "[a-z]{1,8}",
        ) {
            let mut builder = ClassBuilder::new("demo.User").kudos(&[2]).param(&field, "String");
            if let Some(rename) = &rename {
                builder = builder.json_name(rename);
            }
            let table = with_declared(table_with([builder]), "demo.User");
            let sink = RecordingSink::new();

            let deserializer = fill(&table, &sink, "demo.User", DeserializerInputs::default())
                .expect("fill should succeed")
                .expect("declared member gets a body");

            let expected = rename.unwrap_or(field);
            prop_assert_eq!(branch_keys(&deserializer), vec![expected]);
        }
    }
}
