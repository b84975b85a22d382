//! Rust syntax to host types and constants.

use crate::{error::FrontendError, resolve};
use kudos_core::{
    model::{Literal, TypeRef},
    names,
};
use quote::ToTokens;
use syn::{
    Expr, ExprLit, ExprUnary, GenericArgument, Lit, Path, PathArguments, Type, TypeParamBound,
    TypePath, UnOp,
};

// host_type
// `Option` carries nullability; references and boxes are transparent
pub(crate) fn host_type(ty: &Type, package: &str) -> Result<TypeRef, FrontendError> {
    match ty {
        Type::Path(path) => path_type(path, package),
        Type::Reference(reference) => host_type(&reference.elem, package),
        Type::Paren(inner) => host_type(&inner.elem, package),
        Type::Group(inner) => host_type(&inner.elem, package),
        Type::Array(array) => {
            Ok(TypeRef::new(names::ARRAY).with_args([host_type(&array.elem, package)?]))
        }
        Type::Slice(slice) => {
            Ok(TypeRef::new(names::ARRAY).with_args([host_type(&slice.elem, package)?]))
        }
        Type::BareFn(_) => Ok(TypeRef::new(names::FUNCTION)),
        Type::TraitObject(object) => trait_type(object.bounds.iter(), ty, package),
        Type::ImplTrait(traits) => trait_type(traits.bounds.iter(), ty, package),
        other => Err(unsupported(other)),
    }
}

fn path_type(path: &TypePath, package: &str) -> Result<TypeRef, FrontendError> {
    let Some(last) = path.path.segments.last() else {
        return Err(unsupported(path));
    };
    let args = generic_args(&last.arguments, package)?;
    let ident = last.ident.to_string();

    // u64 and usize can exceed the host long
    if matches!(ident.as_str(), "u64" | "usize" | "u128" | "i128") {
        return Err(unsupported(path));
    }

    let scalar = match ident.as_str() {
        "String" | "str" | "char" => Some(names::STRING),
        "i64" | "u32" | "isize" => Some(names::LONG),
        "i8" | "i16" | "i32" | "u8" | "u16" => Some(names::INT),
        "f64" => Some(names::DOUBLE),
        "f32" => Some(names::FLOAT),
        "bool" => Some(names::BOOLEAN),
        _ => None,
    };
    if let Some(scalar) = scalar {
        return Ok(TypeRef::new(scalar));
    }

    let container = match ident.as_str() {
        "Option" => return single(args, path).map(TypeRef::nullable),
        "Box" | "Rc" | "Arc" => return single(args, path),
        "Vec" | "VecDeque" | "LinkedList" => names::LIST,
        "HashSet" | "BTreeSet" | "IndexSet" => names::SET,
        "HashMap" | "BTreeMap" | "IndexMap" => names::MAP,
        _ => {
            let name = path
                .path
                .segments
                .iter()
                .map(|segment| segment.ident.to_string())
                .collect::<Vec<_>>()
                .join(".");

            return Ok(TypeRef::new(resolve::class_id(&name, Some(package))).with_args(args));
        }
    };

    Ok(TypeRef::new(container).with_args(args))
}

fn generic_args(arguments: &PathArguments, package: &str) -> Result<Vec<TypeRef>, FrontendError> {
    let PathArguments::AngleBracketed(bracketed) = arguments else {
        return Ok(Vec::new());
    };

    bracketed
        .args
        .iter()
        .filter_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(host_type(ty, package)),
            _ => None,
        })
        .collect()
}

fn single(args: Vec<TypeRef>, path: &TypePath) -> Result<TypeRef, FrontendError> {
    let mut args = args.into_iter();

    match (args.next(), args.next()) {
        (Some(arg), None) => Ok(arg),
        _ => Err(unsupported(path)),
    }
}

// trait_type
// closures are functions; otherwise the one non-marker trait names the type
fn trait_type<'a>(
    bounds: impl Iterator<Item = &'a TypeParamBound>,
    ty: &Type,
    package: &str,
) -> Result<TypeRef, FrontendError> {
    let mut traits = bounds
        .filter_map(|bound| match bound {
            TypeParamBound::Trait(bound) => Some(&bound.path),
            _ => None,
        })
        .filter(|path| !last_ident_in(path, &["Send", "Sync", "Unpin"]));

    match (traits.next(), traits.next()) {
        (Some(path), None) if last_ident_in(path, &["Fn", "FnMut", "FnOnce"]) => {
            Ok(TypeRef::new(names::FUNCTION))
        }
        (Some(path), None) => path_type(
            &TypePath {
                qself: None,
                path: path.clone(),
            },
            package,
        ),
        _ => Err(unsupported(ty)),
    }
}

fn last_ident_in(path: &Path, idents: &[&str]) -> bool {
    path.segments
        .last()
        .is_some_and(|segment| idents.iter().any(|ident| segment.ident == *ident))
}

fn unsupported(ty: &impl ToTokens) -> FrontendError {
    FrontendError::UnsupportedType {
        ty: ty.to_token_stream().to_string(),
    }
}

// literal
// numeric literals take the width of the field type
pub(crate) fn literal(expr: &Expr, ty: &TypeRef, field: &str) -> Result<Literal, FrontendError> {
    let fail = || FrontendError::UnsupportedLiteral {
        field: field.to_string(),
        expr: expr.to_token_stream().to_string(),
    };

    match expr {
        Expr::Lit(ExprLit { lit, .. }) => lit_value(lit, ty, false).ok_or_else(fail),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr: inner,
            ..
        }) => match inner.as_ref() {
            Expr::Lit(ExprLit { lit, .. }) => lit_value(lit, ty, true).ok_or_else(fail),
            _ => Err(fail()),
        },
        Expr::Path(path) if path.path.is_ident("None") => Ok(Literal::Null),
        Expr::Macro(mac) if mac.mac.path.is_ident("vec") && mac.mac.tokens.is_empty() => {
            Ok(Literal::EmptyList)
        }
        Expr::Call(call) if call.args.is_empty() => {
            let Expr::Path(func) = call.func.as_ref() else {
                return Err(fail());
            };
            let segments = func
                .path
                .segments
                .iter()
                .map(|s| s.ident.to_string())
                .collect::<Vec<_>>();

            match segments.as_slice() {
                [.., owner, ctor] if ctor == "new" || ctor == "default" => {
                    match owner.as_str() {
                        "String" => Ok(Literal::Str(String::new())),
                        "Vec" | "VecDeque" | "HashSet" | "BTreeSet" => Ok(Literal::EmptyList),
                        "HashMap" | "BTreeMap" => Ok(Literal::EmptyMap),
                        _ => Err(fail()),
                    }
                }
                _ => Err(fail()),
            }
        }
        _ => Err(fail()),
    }
}

fn lit_value(lit: &Lit, ty: &TypeRef, negative: bool) -> Option<Literal> {
    let class = ty.class.as_str();

    match lit {
        Lit::Str(s) if !negative => Some(Literal::Str(s.value())),
        Lit::Bool(b) if !negative => Some(Literal::Bool(b.value)),
        Lit::Int(int) => {
            let digits = signed(int.base10_digits(), negative);
            match class {
                names::LONG => digits.parse().ok().map(Literal::Long),
                names::DOUBLE => digits.parse().ok().map(Literal::Double),
                names::FLOAT => digits.parse().ok().map(Literal::Float),
                _ => digits.parse().ok().map(Literal::Int),
            }
        }
        Lit::Float(float) => {
            let digits = signed(float.base10_digits(), negative);
            match class {
                names::FLOAT => digits.parse().ok().map(Literal::Float),
                _ => digits.parse().ok().map(Literal::Double),
            }
        }
        _ => None,
    }
}

fn signed(digits: &str, negative: bool) -> String {
    if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    }
}

///
/// TESTS
///
