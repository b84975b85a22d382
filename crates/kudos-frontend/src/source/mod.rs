//! Source frontend.
//!
//! Reads Rust-syntax declarations and lowers them to the host class model:
//!
//! ```ignore
//! #[kudos(flags = "2")]
//! #[class(extends = "Base")]
//! struct User {
//!     #[field(param)]
//!     name: String,
//!     #[field(param, default = None)]
//!     #[kudos(json_name = "years")]
//!     age: Option<i32>,
//! }
//! ```
//!
//! Structs become classes, traits become interfaces and enums become enum
//! classes. Methods in `impl` blocks are user-written members; an
//! associated `new` returning `Self` is a secondary constructor.

mod attr;
mod types;

use crate::{error::FrontendError, resolve};
use attr::{ClassArgs, FieldArgs, KudosArgs};
use darling::{Error as DarlingError, FromDeriveInput};
use kudos_core::{
    model::{
        Annotation, BodyState, ClassDecl, ClassId, ClassKind, Constructor, Member, Parameter,
        Property, PropertyOrigin, TypeRef,
    },
    names,
};
use syn::{
    DeriveInput, FnArg, ImplItem, Item, ItemImpl, ItemStruct, ItemTrait, Pat, ReturnType,
    Signature, TraitItem, Type, TypeParamBound,
};

// marker traits with no host counterpart
const SKIPPED_BOUNDS: [&str; 3] = ["Send", "Sized", "Sync"];

/// Parses a Rust source file; top-level items land in `package`, inline
/// modules extend it.
pub fn parse_source(text: &str, package: &str) -> Result<Vec<ClassDecl>, FrontendError> {
    let file = syn::parse_file(text)?;
    let mut classes = Vec::new();
    let mut impls = Vec::new();

    collect(file.items, package, &mut classes, &mut impls)?;
    for (item, package) in impls {
        apply_impl(&item, &package, &mut classes)?;
    }

    Ok(classes)
}

fn collect(
    items: Vec<Item>,
    package: &str,
    classes: &mut Vec<ClassDecl>,
    impls: &mut Vec<(ItemImpl, String)>,
) -> Result<(), FrontendError> {
    for item in items {
        match item {
            Item::Struct(item) => classes.push(lower_struct(item, package)?),
            Item::Trait(item) => classes.push(lower_trait(&item, package)?),
            Item::Enum(item) => {
                let id = resolve::class_id(&item.ident.to_string(), Some(package));
                classes.push(ClassDecl::new(id, ClassKind::Enum));
            }
            Item::Impl(item) => impls.push((item, package.to_string())),
            Item::Mod(module) => {
                if let Some((_, items)) = module.content {
                    let package = format!("{package}.{}", module.ident);
                    collect(items, &package, classes, impls)?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

// lower_struct
// primary constructor parameters keep field order
fn lower_struct(item: ItemStruct, package: &str) -> Result<ClassDecl, FrontendError> {
    let input = DeriveInput::from(item);
    let args = ClassArgs::from_derive_input(&input)?;

    let id = resolve::class_id(&args.ident.to_string(), Some(package));
    let mut decl = ClassDecl::new(id, ClassKind::Class);

    if let Some(kudos) = KudosArgs::find(&args.attrs)? {
        let flags = parse_flags(&decl.id, kudos.flags.as_deref())?;
        decl.annotations.push(Annotation::kudos(&flags));
    }
    for supertype in args.extends.iter().chain(&args.implements) {
        decl.supertypes.push(host_text(supertype, package)?);
    }

    let fields = args
        .data
        .take_struct()
        .map(|fields| fields.fields)
        .unwrap_or_default();

    let mut primary = Vec::new();
    for field in fields {
        let (property, param) = lower_field(field, package)?;
        if let Some(param) = param {
            primary.push(param);
        }
        decl.properties.push(property);
    }

    if !args.no_primary.is_present() {
        let mut ctor = Constructor::primary(primary);
        ctor.overloads = args.overloads.is_present();
        decl.constructors.push(ctor);
    }

    Ok(decl)
}

fn lower_field(
    field: FieldArgs,
    package: &str,
) -> Result<(Property, Option<Parameter>), FrontendError> {
    let Some(ident) = &field.ident else {
        return Err(DarlingError::custom("fields must be named").into());
    };
    let name = ident.to_string();
    let ty = types::host_type(&field.ty, package)?;
    let param = field.param.is_present();

    if field.default.is_some() && !param {
        return Err(DarlingError::custom("`default` needs `param`; use `init` instead")
            .with_span(ident)
            .into());
    }
    if field.init.is_some() && param {
        return Err(DarlingError::custom("`init` applies to body properties only")
            .with_span(ident)
            .into());
    }

    let origin = if param {
        PropertyOrigin::ConstructorParameter
    } else {
        PropertyOrigin::Body
    };
    let mut property = Property::new(name.clone(), ty.clone(), origin);
    property.delegated = field.delegated.is_present();
    property.backing_field = !field.transient.is_present();
    property.json_name = KudosArgs::find(&field.attrs)?.and_then(|k| k.json_name);
    if let Some(init) = &field.init {
        property.initializer = Some(types::literal(&init.0, &ty, &name)?);
    }

    if !param {
        return Ok((property, None));
    }

    let mut parameter = Parameter::new(name.clone(), ty.clone());
    if let Some(default) = &field.default {
        parameter.default = Some(types::literal(&default.0, &ty, &name)?);
    }

    Ok((property, Some(parameter)))
}

fn lower_trait(item: &ItemTrait, package: &str) -> Result<ClassDecl, FrontendError> {
    let id = resolve::class_id(&item.ident.to_string(), Some(package));
    let mut decl = ClassDecl::new(id, ClassKind::Interface);

    for bound in &item.supertraits {
        let TypeParamBound::Trait(bound) = bound else {
            continue;
        };
        if bound
            .path
            .segments
            .last()
            .is_some_and(|s| SKIPPED_BOUNDS.contains(&s.ident.to_string().as_str()))
        {
            continue;
        }

        let ty = Type::Path(syn::TypePath {
            qself: None,
            path: bound.path.clone(),
        });
        decl.supertypes.push(types::host_type(&ty, package)?);
    }

    for trait_item in &item.items {
        if let TraitItem::Fn(method) = trait_item {
            let body = if method.default.is_some() {
                BodyState::Authored
            } else {
                BodyState::Declared
            };
            let member = lower_signature(&method.sig, &decl.id, package)?.with_body(body);
            decl.members.push(member);
        }
    }

    Ok(decl)
}

// apply_impl
// trait impls add a supertype; `new` without a receiver is a constructor,
// other associated fns count only when they author a generated member
fn apply_impl(
    item: &ItemImpl,
    package: &str,
    classes: &mut [ClassDecl],
) -> Result<(), FrontendError> {
    let target = types::host_type(&item.self_ty, package)?.class;
    let Some(decl) = classes.iter_mut().find(|decl| decl.id == target) else {
        return Err(DarlingError::custom(format!(
            "impl block for '{target}' which is not declared in this file"
        ))
        .into());
    };

    if let Some((_, path, _)) = &item.trait_ {
        let ty = Type::Path(syn::TypePath {
            qself: None,
            path: path.clone(),
        });
        decl.supertypes.push(types::host_type(&ty, package)?);
    }

    for impl_item in &item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };

        let has_receiver = method
            .sig
            .inputs
            .iter()
            .any(|arg| matches!(arg, FnArg::Receiver(_)));
        if !has_receiver {
            if method.sig.ident == "new" && returns_self(&method.sig) {
                let params = lower_params(&method.sig, &decl.id, package)?;
                decl.constructors.push(Constructor::secondary(params));
                continue;
            }
            if method.sig.ident != names::DESERIALIZE && method.sig.ident != names::VALIDATE {
                continue;
            }
        }

        let member = lower_signature(&method.sig, &decl.id, package)?;
        decl.members.push(member.with_body(BodyState::Authored));
    }

    Ok(())
}

fn lower_signature(
    sig: &Signature,
    owner: &ClassId,
    package: &str,
) -> Result<Member, FrontendError> {
    let params = lower_params(sig, owner, package)?;
    let returns = match &sig.output {
        ReturnType::Default => TypeRef::new(names::UNIT),
        ReturnType::Type(_, ty) => self_or_host(ty, owner, package)?,
    };

    Ok(Member::new(sig.ident.to_string(), params, returns))
}

fn lower_params(
    sig: &Signature,
    owner: &ClassId,
    package: &str,
) -> Result<Vec<Parameter>, FrontendError> {
    let mut params = Vec::new();

    for arg in &sig.inputs {
        let FnArg::Typed(typed) = arg else {
            continue;
        };
        let Pat::Ident(pat) = typed.pat.as_ref() else {
            return Err(DarlingError::custom("parameters must be plain identifiers").into());
        };

        let ty = self_or_host(&typed.ty, owner, package)?;
        params.push(Parameter::new(pat.ident.to_string(), ty));
    }

    Ok(params)
}

fn returns_self(sig: &Signature) -> bool {
    match &sig.output {
        ReturnType::Type(_, ty) => is_self(ty),
        ReturnType::Default => false,
    }
}

fn is_self(ty: &Type) -> bool {
    matches!(ty, Type::Path(path) if path.path.is_ident("Self"))
}

fn self_or_host(ty: &Type, owner: &ClassId, package: &str) -> Result<TypeRef, FrontendError> {
    if is_self(ty) {
        Ok(TypeRef::new(owner.clone()))
    } else {
        types::host_type(ty, package)
    }
}

// host_text
// attribute values are written in host syntax
fn host_text(text: &str, package: &str) -> Result<TypeRef, FrontendError> {
    Ok(resolve::type_ref(text.parse()?, Some(package)))
}

fn parse_flags(class: &ClassId, flags: Option<&str>) -> Result<Vec<i32>, FrontendError> {
    let Some(flags) = flags else {
        return Ok(Vec::new());
    };

    flags
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            value.parse::<i32>().map_err(|_| FrontendError::InvalidFlag {
                class: class.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

///
/// TESTS
///
