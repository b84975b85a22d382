//! Name resolution shared by the frontends.

use kudos_core::{
    model::{ClassId, TypeRef},
    names,
};

/// Builtins and kudos runtime types by short name, dotted names as
/// written, anything else inside `package`.
pub(crate) fn class_id(name: &str, package: Option<&str>) -> ClassId {
    if let Some(builtin) = names::qualify(name).or_else(|| names::qualify_library(name)) {
        return ClassId::from(builtin);
    }

    match package {
        Some(package) if !name.contains('.') && !package.is_empty() => {
            ClassId::from(format!("{package}.{name}"))
        }
        _ => ClassId::from(name),
    }
}

pub(crate) fn type_ref(mut ty: TypeRef, package: Option<&str>) -> TypeRef {
    ty.class = class_id(ty.class.as_str(), package);
    ty.args = ty
        .args
        .into_iter()
        .map(|arg| type_ref(arg, package))
        .collect();

    ty
}

///
/// TESTS
///
