use crate::{
    context::SynthesisContext,
    ir::{Expr, Stmt, SyntheticValidator, ValidatorCall},
    model::{BodyState, ClassDecl, ClassModel, PropertyOrigin, TypeRef},
    names,
    obs::SynthesisEvent,
};
use std::collections::BTreeSet;

///
/// ValidatorPlan
/// checks derived from the field types, in emission order
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidatorPlan {
    pub required: Vec<String>,
    pub collections: Vec<(String, String)>,
    pub arrays: Vec<String>,
}

impl ValidatorPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.collections.is_empty() && self.arrays.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.required.len() + self.collections.len() + self.arrays.len()
    }

    fn calls(&self) -> impl Iterator<Item = ValidatorCall> + '_ {
        let required = self
            .required
            .iter()
            .map(|name| ValidatorCall::Field { name: name.clone() });
        let collections = self
            .collections
            .iter()
            .map(|(name, element)| ValidatorCall::Collection {
                name: name.clone(),
                element_type: element.clone(),
            });
        let arrays = self
            .arrays
            .iter()
            .map(|name| ValidatorCall::Array { name: name.clone() });

        required.chain(collections).chain(arrays)
    }
}

///
/// ValidatorOutcome
///

#[derive(Clone, Debug, PartialEq)]
pub enum ValidatorOutcome {
    /// Nothing to check; the class gets no validator.
    Absent,

    /// A user-written validator is kept as is.
    Reused,

    Synthesized(SyntheticValidator),
}

impl ValidatorOutcome {
    /// A validator will exist on the class.
    #[must_use]
    pub const fn exists(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

/// Scans candidate fields. `defaulted` holds fields that receive a declared
/// default from the synthesized constructor.
#[must_use]
pub fn plan_validator(
    model: &dyn ClassModel,
    decl: &ClassDecl,
    defaulted: &BTreeSet<String>,
) -> ValidatorPlan {
    let primary_defaults = decl
        .primary_constructor()
        .map(|ctor| {
            ctor.params
                .iter()
                .filter(|p| p.default.is_some())
                .map(|p| p.name.as_str())
                .collect::<BTreeSet<_>>()
        })
        .unwrap_or_default();

    let mut plan = ValidatorPlan::default();
    for property in decl.properties.iter().filter(|p| p.has_candidate_field()) {
        let name = &property.name;

        // body properties are always initialized
        if property.origin == PropertyOrigin::ConstructorParameter
            && !property.ty.nullable
            && !defaulted.contains(name)
            && !primary_defaults.contains(name.as_str())
        {
            plan.required.push(name.clone());
        }

        let Some(element) = checked_element(&property.ty) else {
            continue;
        };
        if model.is_subclass_of(&property.ty.class, names::ARRAY) {
            plan.arrays.push(name.clone());
        } else if model.is_subclass_of(&property.ty.class, names::COLLECTION) {
            plan.collections
                .push((name.clone(), element.short_name().to_string()));
        }
    }

    plan
}

// first type argument, when it is non-nullable
fn checked_element(ty: &TypeRef) -> Option<&TypeRef> {
    ty.element().filter(|element| !element.nullable)
}

// ensure_validator
// user bodies win, placeholders are replaced, otherwise synthesize
pub fn ensure_validator(
    ctx: &SynthesisContext<'_>,
    model: &dyn ClassModel,
    decl: &ClassDecl,
    defaulted: &BTreeSet<String>,
) -> ValidatorOutcome {
    let plan = plan_validator(model, decl, defaulted);
    if plan.is_empty() {
        ctx.record(SynthesisEvent::ValidatorSkipped {
            class: decl.id.clone(),
        });
        return ValidatorOutcome::Absent;
    }

    let existing = decl.member(names::VALIDATE, &[TypeRef::presence_map()]);
    if existing.is_some_and(|m| m.body.is_materialized()) {
        ctx.record(SynthesisEvent::ValidatorReused {
            class: decl.id.clone(),
        });
        return ValidatorOutcome::Reused;
    }
    let replaces_placeholder =
        existing.is_some_and(|m| matches!(m.body, BodyState::FakeOverride { .. }));

    let status = || Box::new(Expr::Param(names::STATUS_PARAM.to_string()));
    let mut body = Vec::with_capacity(plan.len() + 1);

    if let Some(superclass) = model.superclass(&decl.id)
        && model.is_subclass_of(&superclass, names::KUDOS_VALIDATOR)
    {
        body.push(Stmt::Expr(Expr::CallSuperValidator {
            class: superclass,
            status: status(),
        }));
    }
    body.extend(plan.calls().map(|call| Stmt::Expr(Expr::Validate(call))));

    ctx.record(SynthesisEvent::ValidatorSynthesized {
        class: decl.id.clone(),
        checks: plan.len(),
        replaced_placeholder: replaces_placeholder,
    });

    ValidatorOutcome::Synthesized(SyntheticValidator {
        class: decl.id.clone(),
        body,
        replaces_placeholder,
    })
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Options,
        model::{ClassBuilder, ClassId, ClassTable, Literal, Member, Parameter},
        obs::RecordingSink,
        test_support::table_with,
    };

    fn validator_member(body: BodyState) -> Member {
        Member::new(
            names::VALIDATE,
            vec![Parameter::new(names::STATUS_PARAM, TypeRef::presence_map())],
            TypeRef::new(names::UNIT),
        )
        .with_body(body)
    }

    fn outcome(table: &ClassTable, class: &str) -> ValidatorOutcome {
        let sink = RecordingSink::new();
        let ctx = SynthesisContext::new(Options::default(), &sink);
        let decl = table.require(&ClassId::from(class)).expect("class exists");

        ensure_validator(&ctx, table, decl, &BTreeSet::new())
    }

    fn synthesized(outcome: ValidatorOutcome) -> SyntheticValidator {
        match outcome {
            ValidatorOutcome::Synthesized(v) => v,
            other => panic!("expected a synthesized validator, got {other:?}"),
        }
    }

    #[test]
    fn plan_picks_required_collections_and_arrays() {
        let table = table_with([ClassBuilder::new("demo.User")
            .kudos(&[])
            .param("name", "String")
            .param("nick", "String?")
            .param_default("age", "Int", Literal::Int(1))
            .param("tags", "List<String>")
            .param("maybe", "List<String?>")
            .param("scores", "Array<Int>")
            .property("notes", "Set<String>")
            .property("cache", "String")
            .param("lazy", "String")
            .delegated()]);
        let decl = table.require(&ClassId::from("demo.User")).expect("class exists");

        let plan = plan_validator(&table, decl, &BTreeSet::new());
        assert_eq!(plan.required, vec!["name", "tags", "maybe", "scores"]);
        assert_eq!(
            plan.collections,
            vec![
                ("tags".to_string(), "String".to_string()),
                ("notes".to_string(), "String".to_string()),
            ]
        );
        assert_eq!(plan.arrays, vec!["scores"]);
    }

    #[test]
    fn nothing_to_check_means_no_validator() {
        let table = table_with([ClassBuilder::new("demo.User")
            .kudos(&[])
            .param("nick", "String?")
            .property("notes", "String")]);

        assert_eq!(outcome(&table, "demo.User"), ValidatorOutcome::Absent);
    }

    #[test]
    fn body_order_is_super_then_fields_then_collections_then_arrays() {
        let table = table_with([
            ClassBuilder::new("demo.Base")
                .kudos(&[])
                .implements(names::KUDOS_VALIDATOR),
            ClassBuilder::new("demo.User")
                .kudos(&[])
                .extends("demo.Base")
                .param("scores", "Array<Int>")
                .param("tags", "List<String>")
                .param("name", "String"),
        ]);

        let validator = synthesized(outcome(&table, "demo.User"));
        let lines = validator
            .body
            .iter()
            .map(|s| s.to_string().trim().to_string())
            .collect::<Vec<_>>();

        assert_eq!(
            lines,
            vec![
                "super<Base>.validate(status)",
                "validateField(\"scores\", status)",
                "validateField(\"tags\", status)",
                "validateField(\"name\", status)",
                "validateCollection(\"tags\", this.tags, \"String\")",
                "validateArray(\"scores\", this.scores)",
            ]
        );
    }

    #[test]
    fn user_body_is_reused_and_placeholder_replaced() {
        let table = table_with([
            ClassBuilder::new("demo.Authored")
                .kudos(&[])
                .param("name", "String")
                .member(validator_member(BodyState::Authored)),
            ClassBuilder::new("demo.Fake")
                .kudos(&[])
                .param("name", "String")
                .member(validator_member(BodyState::FakeOverride {
                    from: ClassId::from(names::KUDOS_VALIDATOR),
                })),
        ]);

        assert_eq!(outcome(&table, "demo.Authored"), ValidatorOutcome::Reused);
        assert!(synthesized(outcome(&table, "demo.Fake")).replaces_placeholder);
    }

    #[test]
    fn synthesized_defaults_are_not_required() {
        let table = table_with([ClassBuilder::new("demo.User")
            .kudos(&[])
            .param("name", "String")
            .param("id", "Long")]);
        let decl = table.require(&ClassId::from("demo.User")).expect("class exists");
        let defaulted = BTreeSet::from(["id".to_string()]);

        let plan = plan_validator(&table, decl, &defaulted);
        assert_eq!(plan.required, vec!["name"]);
    }
}
