use crate::{
    ir::{Expr, Stmt},
    model::{ClassId, Literal, TypeRef},
    names,
};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// ClassKind
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Object,
    Enum,
    Annotation,
}

///
/// Annotation
///

#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub class: ClassId,
    pub args: Vec<AnnotationArg>,
}

impl Annotation {
    #[must_use]
    pub fn new(class: impl Into<ClassId>) -> Self {
        Self {
            class: class.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, arg: AnnotationArg) -> Self {
        self.args.push(arg);
        self
    }

    /// The marker annotation carrying the given flag values.
    #[must_use]
    pub fn kudos(flags: &[i32]) -> Self {
        Self::new(names::KUDOS).with_arg(AnnotationArg::IntList(flags.to_vec()))
    }

    /// Integer values of every argument, flattened in declaration order.
    #[must_use]
    pub fn int_values(&self) -> Vec<i32> {
        self.args
            .iter()
            .flat_map(|arg| match arg {
                AnnotationArg::Int(v) => vec![*v],
                AnnotationArg::IntList(vs) => vs.clone(),
                AnnotationArg::Str(_) | AnnotationArg::Class(_) => Vec::new(),
            })
            .collect()
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.class.short_name())?;
        if self.args.is_empty() {
            return Ok(());
        }

        f.write_str("(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match arg {
                AnnotationArg::Int(v) => write!(f, "{v}")?,
                AnnotationArg::IntList(vs) => {
                    let vs = vs.iter().map(ToString::to_string).collect::<Vec<_>>();
                    write!(f, "[{}]", vs.join(", "))?;
                }
                AnnotationArg::Str(v) => write!(f, "{v:?}")?,
                AnnotationArg::Class(c) => write!(f, "{c}::class")?,
            }
        }
        f.write_str(")")
    }
}

///
/// AnnotationArg
///

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnnotationArg {
    Int(i32),
    IntList(Vec<i32>),
    Str(String),
    Class(ClassId),
}

///
/// PropertyOrigin
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyOrigin {
    /// Backing field initialized straight from the same-named primary
    /// constructor parameter.
    ConstructorParameter,

    #[default]
    Body,
}

///
/// Property
///

#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub name: String,
    pub ty: TypeRef,
    pub origin: PropertyOrigin,
    pub delegated: bool,
    pub backing_field: bool,

    /// Value of the rename annotation, if any.
    pub json_name: Option<String>,

    /// Constant initializer for body properties.
    pub initializer: Option<Literal>,
}

impl Property {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef, origin: PropertyOrigin) -> Self {
        Self {
            name: name.into(),
            ty,
            origin,
            delegated: false,
            backing_field: true,
            json_name: None,
            initializer: None,
        }
    }

    /// Properties the validator and deserializer look at.
    #[must_use]
    pub const fn has_candidate_field(&self) -> bool {
        !self.delegated && self.backing_field
    }

    /// Key used in the JSON document: the non-empty rename, else the name.
    #[must_use]
    pub fn json_key(&self) -> &str {
        match self.json_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.name,
        }
    }
}

///
/// Parameter
///

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
    pub default: Option<Literal>,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: Literal) -> Self {
        self.default = Some(default);
        self
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)?;
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }

        Ok(())
    }
}

///
/// Constructor
///

#[derive(Clone, Debug, PartialEq)]
pub struct Constructor {
    pub params: Vec<Parameter>,
    pub primary: bool,

    /// Independently invocable with no arguments through generated overloads.
    pub overloads: bool,

    /// Generated statements; `None` for host-authored constructors.
    pub body: Option<Vec<Stmt>>,
}

impl Constructor {
    #[must_use]
    pub const fn primary(params: Vec<Parameter>) -> Self {
        Self {
            params,
            primary: true,
            overloads: false,
            body: None,
        }
    }

    #[must_use]
    pub const fn secondary(params: Vec<Parameter>) -> Self {
        Self {
            params,
            primary: false,
            overloads: false,
            body: None,
        }
    }

    /// Callable with no arguments: every parameter has a default, and the
    /// defaults are reachable without arguments.
    #[must_use]
    pub fn is_zero_parameter(&self) -> bool {
        self.params.iter().all(|p| p.default.is_some())
            && (self.params.is_empty() || self.primary || self.overloads)
    }

    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        self.body.is_some()
    }
}

impl fmt::Display for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.overloads {
            f.write_str("@JvmOverloads ")?;
        }
        if self.primary {
            f.write_str("primary ")?;
        }

        let params = self
            .params
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();

        write!(f, "constructor({})", params.join(", "))
    }
}

///
/// BodyState
///
/// Explicit state of a member body. Synthesis checks this before
/// regenerating anything.
///

#[derive(Clone, Debug, PartialEq)]
pub enum BodyState {
    /// Signature announced, body still to be generated.
    Declared,

    /// Placeholder inherited from a supertype, never materialized.
    FakeOverride { from: ClassId },

    /// Written by the user; opaque to the core.
    Authored,

    /// Generated by the core.
    Synthesized(Vec<Stmt>),
}

impl BodyState {
    /// A real body exists and must not be regenerated.
    #[must_use]
    pub const fn is_materialized(&self) -> bool {
        matches!(self, Self::Authored | Self::Synthesized(_))
    }
}

///
/// Member
///

#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    pub name: String,
    pub params: Vec<Parameter>,
    pub return_type: TypeRef,
    pub body: BodyState,
}

impl Member {
    #[must_use]
    pub fn new(name: impl Into<String>, params: Vec<Parameter>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
            body: BodyState::Declared,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: BodyState) -> Self {
        self.body = body;
        self
    }

    /// Same name and same parameter types, in order.
    #[must_use]
    pub fn has_signature(&self, name: &str, param_types: &[TypeRef]) -> bool {
        self.name == name
            && self.params.len() == param_types.len()
            && self
                .params
                .iter()
                .zip(param_types)
                .all(|(param, ty)| param.ty == *ty)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self
            .params
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();

        write!(
            f,
            "fun {}({}): {}",
            self.name,
            params.join(", "),
            self.return_type
        )
    }
}

///
/// SyntheticField
/// backing field added by the core, with its initializer
///

#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticField {
    pub name: String,
    pub ty: TypeRef,
    pub initializer: Expr,
}

impl fmt::Display for SyntheticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "val {}: {} = {}", self.name, self.ty, self.initializer)
    }
}

///
/// ClassDecl
///

#[derive(Clone, Debug, PartialEq)]
pub struct ClassDecl {
    pub id: ClassId,
    pub kind: ClassKind,
    pub annotations: Vec<Annotation>,
    pub supertypes: Vec<TypeRef>,
    pub properties: Vec<Property>,
    pub constructors: Vec<Constructor>,
    pub members: Vec<Member>,
    pub fields: Vec<SyntheticField>,
}

impl ClassDecl {
    #[must_use]
    pub fn new(id: impl Into<ClassId>, kind: ClassKind) -> Self {
        Self {
            id: id.into(),
            kind,
            annotations: Vec::new(),
            supertypes: Vec::new(),
            properties: Vec::new(),
            constructors: Vec::new(),
            members: Vec::new(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn annotation(&self, class: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.class == class)
    }

    /// Carries the kudos marker annotation.
    #[must_use]
    pub fn has_marker(&self) -> bool {
        self.annotation(names::KUDOS).is_some()
    }

    #[must_use]
    pub fn is_class(&self) -> bool {
        self.kind == ClassKind::Class
    }

    #[must_use]
    pub fn primary_constructor(&self) -> Option<&Constructor> {
        self.constructors.iter().find(|c| c.primary)
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn member(&self, name: &str, param_types: &[TypeRef]) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| m.has_signature(name, param_types))
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SyntheticField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The type of `this`.
    #[must_use]
    pub fn self_type(&self) -> TypeRef {
        TypeRef::new(self.id.clone())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> TypeRef {
        TypeRef::new(names::INT)
    }

    #[test]
    fn zero_parameter_constructor_rules() {
        assert!(Constructor::secondary(Vec::new()).is_zero_parameter());

        let defaulted = vec![Parameter::new("a", int()).with_default(Literal::Int(1))];
        assert!(Constructor::primary(defaulted.clone()).is_zero_parameter());
        assert!(
            !Constructor::secondary(defaulted.clone()).is_zero_parameter(),
            "secondary constructors need overloads to be callable without arguments"
        );

        let mut overloaded = Constructor::secondary(defaulted);
        overloaded.overloads = true;
        assert!(overloaded.is_zero_parameter());

        let required = vec![Parameter::new("a", int())];
        assert!(!Constructor::primary(required).is_zero_parameter());
    }

    #[test]
    fn json_key_prefers_non_empty_rename() {
        let mut property = Property::new("userName", TypeRef::new(names::STRING), PropertyOrigin::Body);
        assert_eq!(property.json_key(), "userName");

        property.json_name = Some(String::new());
        assert_eq!(property.json_key(), "userName");

        property.json_name = Some("user_name".to_string());
        assert_eq!(property.json_key(), "user_name");
    }

    #[test]
    fn marker_flags_flatten_in_order() {
        let annotation = Annotation::kudos(&[2, 1]).with_arg(AnnotationArg::Int(3));

        assert_eq!(annotation.int_values(), vec![2, 1, 3]);
        assert_eq!(annotation.to_string(), "@Kudos([2, 1], 3)");
    }
}
