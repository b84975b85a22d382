use darling::{FromDeriveInput, FromField, FromMeta, ast, util::Flag};
use syn::{Attribute, Expr, Ident, Meta, Type};

///
/// ClassArgs
/// `#[class(...)]` on a struct
///

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(class), forward_attrs(kudos), supports(struct_named, struct_unit))]
pub(crate) struct ClassArgs {
    pub ident: Ident,
    pub attrs: Vec<Attribute>,
    pub data: ast::Data<(), FieldArgs>,

    #[darling(default)]
    pub extends: Option<String>,

    /// One interface type per occurrence.
    #[darling(multiple)]
    pub implements: Vec<String>,

    pub no_primary: Flag,
    pub overloads: Flag,
}

///
/// FieldArgs
/// `#[field(...)]` on a struct field
///

#[derive(Debug, FromField)]
#[darling(attributes(field), forward_attrs(kudos))]
pub(crate) struct FieldArgs {
    pub ident: Option<Ident>,
    pub ty: Type,
    pub attrs: Vec<Attribute>,

    /// Declared in the primary constructor.
    pub param: Flag,

    #[darling(default)]
    pub default: Option<ValueExpr>,

    #[darling(default)]
    pub init: Option<ValueExpr>,

    pub delegated: Flag,
    pub transient: Flag,
}

///
/// KudosArgs
/// `#[kudos]`, `#[kudos(flags = "1,2")]` or `#[kudos(json_name = "...")]`
///

#[derive(Debug, Default, FromMeta)]
pub(crate) struct KudosArgs {
    #[darling(default)]
    pub flags: Option<String>,

    #[darling(default)]
    pub json_name: Option<String>,
}

impl KudosArgs {
    /// The first forwarded `kudos` attribute, if any. A bare `#[kudos]`
    /// carries no arguments.
    pub fn find(attrs: &[Attribute]) -> darling::Result<Option<Self>> {
        let Some(attr) = attrs.iter().find(|a| a.path().is_ident("kudos")) else {
            return Ok(None);
        };

        match &attr.meta {
            Meta::Path(_) => Ok(Some(Self::default())),
            meta => Self::from_meta(meta).map(Some),
        }
    }
}

///
/// ValueExpr
/// a constant expression kept verbatim; string literals stay strings
///

#[derive(Clone, Debug)]
pub(crate) struct ValueExpr(pub Expr);

impl FromMeta for ValueExpr {
    fn from_expr(expr: &Expr) -> darling::Result<Self> {
        Ok(Self(expr.clone()))
    }
}
