use crate::{
    context::SynthesisContext,
    error::SynthesisError,
    ir::{Expr, Stmt, SyntheticConstructor},
    model::{ClassDecl, ClassId, ClassModel, Constructor, PropertyOrigin},
    names,
    obs::SynthesisEvent,
};
use std::collections::BTreeSet;

///
/// NoArgConstructor
/// the zero-argument constructor a class ends up with
///

#[derive(Clone, Debug, PartialEq)]
pub enum NoArgConstructor {
    /// Already declared; `index` into the class's constructor list.
    Declared { class: ClassId, index: usize },
    Synthesized(SyntheticConstructor),
}

impl NoArgConstructor {
    #[must_use]
    pub const fn class(&self) -> &ClassId {
        match self {
            Self::Declared { class, .. } => class,
            Self::Synthesized(ctor) => &ctor.class,
        }
    }
}

/// A marked class with no constructor callable without arguments.
#[must_use]
pub fn needs_no_arg_constructor(decl: &ClassDecl) -> bool {
    decl.is_class()
        && decl.has_marker()
        && !decl.constructors.iter().any(Constructor::is_zero_parameter)
}

// ensure_no_arg_constructor
// repeated calls for the same class return the memoized constructor
pub fn ensure_no_arg_constructor(
    ctx: &mut SynthesisContext<'_>,
    model: &dyn ClassModel,
    class: &ClassId,
) -> Result<NoArgConstructor, SynthesisError> {
    let decl = model
        .class(class)
        .ok_or_else(|| SynthesisError::unknown_class(class))?;

    if needs_no_arg_constructor(decl) {
        get_or_synthesize(ctx, model, decl).map(NoArgConstructor::Synthesized)
    } else {
        let index = declared_no_arg(class, decl)?;

        Ok(NoArgConstructor::Declared {
            class: class.clone(),
            index,
        })
    }
}

fn get_or_synthesize(
    ctx: &mut SynthesisContext<'_>,
    model: &dyn ClassModel,
    decl: &ClassDecl,
) -> Result<SyntheticConstructor, SynthesisError> {
    if let Some(ctor) = ctx.memo.get(&decl.id) {
        let ctor = ctor.clone();
        ctx.record(SynthesisEvent::ConstructorMemoHit {
            class: decl.id.clone(),
        });

        return Ok(ctor);
    }

    if !ctx.memo.begin(&decl.id) {
        return Err(SynthesisError::CyclicHierarchy {
            class: decl.id.clone(),
        });
    }

    match synthesize(ctx, model, decl) {
        Ok(ctor) => {
            ctx.record(SynthesisEvent::ConstructorSynthesized {
                class: ctor.class.clone(),
                delegate: ctor.delegate.clone(),
                defaults: ctor.defaulted.len(),
            });
            ctx.memo.finish(ctor.clone());

            Ok(ctor)
        }
        Err(err) => {
            ctx.memo.abandon(&decl.id);

            Err(err)
        }
    }
}

fn synthesize(
    ctx: &mut SynthesisContext<'_>,
    model: &dyn ClassModel,
    decl: &ClassDecl,
) -> Result<SyntheticConstructor, SynthesisError> {
    let super_id = model
        .superclass(&decl.id)
        .unwrap_or_else(|| ClassId::from(names::ANY));
    let superclass = model
        .class(&super_id)
        .ok_or_else(|| SynthesisError::unknown_class(&super_id))?;

    let synthetic = if needs_no_arg_constructor(superclass) {
        get_or_synthesize(ctx, model, superclass)?;
        true
    } else {
        declared_no_arg(&decl.id, superclass)?;
        false
    };

    let mut body = vec![
        Stmt::DelegateCtor {
            class: super_id.clone(),
            synthetic,
        },
        Stmt::InstanceInit {
            class: decl.id.clone(),
        },
    ];

    // defaults for fields initialized straight from a primary parameter
    let mut defaulted = BTreeSet::new();
    if let Some(primary) = decl.primary_constructor() {
        for param in &primary.params {
            let Some(default) = &param.default else {
                continue;
            };
            let from_param = decl.property(&param.name).is_some_and(|p| {
                p.origin == PropertyOrigin::ConstructorParameter && p.backing_field
            });
            if !from_param {
                continue;
            }

            defaulted.insert(param.name.clone());
            body.push(Stmt::SetField {
                field: param.name.clone(),
                value: Expr::Literal(default.clone()),
            });
        }
    }

    Ok(SyntheticConstructor {
        class: decl.id.clone(),
        delegate: super_id,
        body,
        defaulted,
    })
}

// declared_no_arg
// exactly one zero-argument constructor, else the full list is reported
fn declared_no_arg(requester: &ClassId, decl: &ClassDecl) -> Result<usize, SynthesisError> {
    let mut zero = decl
        .constructors
        .iter()
        .enumerate()
        .filter(|(_, ctor)| ctor.is_zero_parameter());

    match (zero.next(), zero.next()) {
        (Some((index, _)), None) => Ok(index),
        _ => Err(SynthesisError::MissingNoArgSuperConstructor {
            class: requester.clone(),
            superclass: decl.id.clone(),
            available: decl.constructors.iter().map(ToString::to_string).collect(),
        }),
    }
}

///
/// TESTS
///
