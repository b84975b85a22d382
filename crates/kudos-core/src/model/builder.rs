use crate::{
    error::ModelError,
    model::{
        Annotation, ClassDecl, ClassId, ClassKind, Constructor, Literal, Member, Parameter,
        Property, PropertyOrigin, TypeRef,
    },
};

///
/// ClassBuilder
///
/// Fluent construction of a [`ClassDecl`]. Type strings are parsed and
/// builtin short names qualified; the first error is kept and returned from
/// [`ClassBuilder::build`].
///

#[derive(Debug)]
pub struct ClassBuilder {
    decl: ClassDecl,
    primary: Option<Vec<Parameter>>,
    error: Option<ModelError>,
}

impl ClassBuilder {
    #[must_use]
    pub fn new(id: impl Into<ClassId>) -> Self {
        Self {
            decl: ClassDecl::new(id, ClassKind::Class),
            primary: Some(Vec::new()),
            error: None,
        }
    }

    #[must_use]
    pub const fn kind(mut self, kind: ClassKind) -> Self {
        self.decl.kind = kind;
        self
    }

    #[must_use]
    pub fn kudos(self, flags: &[i32]) -> Self {
        self.annotation(Annotation::kudos(flags))
    }

    #[must_use]
    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.decl.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn extends(self, ty: &str) -> Self {
        self.supertype(ty)
    }

    #[must_use]
    pub fn implements(self, ty: &str) -> Self {
        self.supertype(ty)
    }

    fn supertype(mut self, ty: &str) -> Self {
        if let Some(ty) = self.parse(ty) {
            self.decl.supertypes.push(ty);
        }
        self
    }

    /// Primary constructor parameter backing a property of the same name.
    #[must_use]
    pub fn param(self, name: &str, ty: &str) -> Self {
        self.primary_param(name, ty, None)
    }

    #[must_use]
    pub fn param_default(self, name: &str, ty: &str, default: Literal) -> Self {
        self.primary_param(name, ty, Some(default))
    }

    fn primary_param(mut self, name: &str, ty: &str, default: Option<Literal>) -> Self {
        let Some(ty) = self.parse(ty) else {
            return self;
        };

        if let Some(params) = self.primary.as_mut() {
            params.push(Parameter {
                name: name.to_string(),
                ty: ty.clone(),
                default,
            });
        }
        self.decl.properties.push(Property::new(
            name,
            ty,
            PropertyOrigin::ConstructorParameter,
        ));

        self
    }

    /// Body property without initializer.
    #[must_use]
    pub fn property(mut self, name: &str, ty: &str) -> Self {
        if let Some(ty) = self.parse(ty) {
            self.decl
                .properties
                .push(Property::new(name, ty, PropertyOrigin::Body));
        }
        self
    }

    #[must_use]
    pub fn property_init(mut self, name: &str, ty: &str, init: Literal) -> Self {
        if let Some(ty) = self.parse(ty) {
            let mut property = Property::new(name, ty, PropertyOrigin::Body);
            property.initializer = Some(init);
            self.decl.properties.push(property);
        }
        self
    }

    #[must_use]
    pub fn json_name(self, json_name: &str) -> Self {
        self.last_property("json_name", |p| p.json_name = Some(json_name.to_string()))
    }

    #[must_use]
    pub fn delegated(self) -> Self {
        self.last_property("delegated", |p| p.delegated = true)
    }

    /// Property without a backing field.
    #[must_use]
    pub fn transient(self) -> Self {
        self.last_property("transient", |p| p.backing_field = false)
    }

    fn last_property(mut self, what: &'static str, f: impl FnOnce(&mut Property)) -> Self {
        match self.decl.properties.last_mut() {
            Some(property) => f(property),
            None => self.fail(ModelError::NoProperty(what)),
        }
        self
    }

    /// Drops the implicit primary constructor.
    #[must_use]
    pub fn no_primary(mut self) -> Self {
        self.primary = None;
        self
    }

    #[must_use]
    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.decl.constructors.push(constructor);
        self
    }

    #[must_use]
    pub fn member(mut self, member: Member) -> Self {
        self.decl.members.push(member);
        self
    }

    pub fn build(self) -> Result<ClassDecl, ModelError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut decl = self.decl;
        if let Some(params) = self.primary {
            decl.constructors.insert(0, Constructor::primary(params));
        }

        Ok(decl)
    }

    fn parse(&mut self, ty: &str) -> Option<TypeRef> {
        match ty.parse::<TypeRef>() {
            Ok(ty) => Some(ty.qualified()),
            Err(err) => {
                self.fail(err);
                None
            }
        }
    }

    fn fail(&mut self, err: ModelError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names;

    #[test]
    fn builds_primary_constructor_from_params() {
        let decl = ClassBuilder::new("demo.User")
            .kudos(&[])
            .param("name", "String")
            .param_default("age", "Int", Literal::Int(18))
            .property("nick", "String?")
            .build()
            .expect("class should build");

        let primary = decl.primary_constructor().expect("primary constructor");
        assert_eq!(primary.params.len(), 2);
        assert_eq!(primary.params[1].default, Some(Literal::Int(18)));

        let name = decl.property("name").expect("name property");
        assert_eq!(name.origin, PropertyOrigin::ConstructorParameter);
        assert_eq!(name.ty.class, names::STRING);

        let nick = decl.property("nick").expect("nick property");
        assert_eq!(nick.origin, PropertyOrigin::Body);
        assert!(nick.ty.nullable);
        assert!(decl.has_marker());
    }

    #[test]
    fn modifiers_apply_to_last_property() {
        let decl = ClassBuilder::new("demo.User")
            .param("userName", "String")
            .json_name("user_name")
            .property("cache", "String?")
            .transient()
            .build()
            .expect("class should build");

        assert_eq!(decl.properties[0].json_key(), "user_name");
        assert!(!decl.properties[1].has_candidate_field());
    }

    #[test]
    fn first_error_wins() {
        let err = ClassBuilder::new("demo.Broken")
            .delegated()
            .param("x", "List<")
            .build()
            .expect_err("build should fail");

        assert!(matches!(err, ModelError::NoProperty("delegated")));
    }

    #[test]
    fn no_primary_keeps_only_explicit_constructors() {
        let decl = ClassBuilder::new("demo.Plain")
            .no_primary()
            .constructor(Constructor::secondary(vec![Parameter::new(
                "x",
                TypeRef::new(names::INT),
            )]))
            .build()
            .expect("class should build");

        assert!(decl.primary_constructor().is_none());
        assert_eq!(decl.constructors.len(), 1);
    }
}
