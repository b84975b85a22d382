//! Descriptor frontend.
//!
//! A JSON document listing class declarations the way a host compiler
//! would hand them over. Type strings use the host syntax
//! (`List<String?>?`); unqualified names resolve against builtins first,
//! then against the document package.

use crate::{error::FrontendError, resolve};
use kudos_core::model::{
    Annotation, BodyState, ClassDecl, ClassKind, Constructor, Literal, Member, Parameter,
    Property, PropertyOrigin, TypeRef,
};
use kudos_core::names;
use serde::Deserialize;

///
/// Document
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    #[serde(default)]
    pub package: Option<String>,

    #[serde(default)]
    pub classes: Vec<ClassDescriptor>,
}

impl Document {
    pub fn from_json(json: &str) -> Result<Self, FrontendError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_classes(self) -> Result<Vec<ClassDecl>, FrontendError> {
        let package = self.package.as_deref();

        self.classes
            .into_iter()
            .map(|class| class.lower(package))
            .collect()
    }
}

///
/// ClassDescriptor
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassDescriptor {
    pub name: String,

    #[serde(default)]
    pub kind: ClassKind,

    /// Marker flag values; absent means the class is not marked.
    #[serde(default)]
    pub kudos: Option<Vec<i32>>,

    #[serde(default)]
    pub annotations: Vec<String>,

    #[serde(default)]
    pub supertypes: Vec<String>,

    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,

    /// No primary constructor at all.
    #[serde(default)]
    pub no_primary: bool,

    /// Primary constructor overloads are generated for its defaults.
    #[serde(default)]
    pub overloads: bool,

    /// Secondary constructors, one parameter list each.
    #[serde(default)]
    pub constructors: Vec<Vec<ParameterDescriptor>>,

    #[serde(default)]
    pub members: Vec<MemberDescriptor>,
}

impl ClassDescriptor {
    fn lower(self, package: Option<&str>) -> Result<ClassDecl, FrontendError> {
        let ty = |text: &str| -> Result<TypeRef, FrontendError> {
            Ok(resolve::type_ref(text.parse()?, package))
        };

        let mut decl = ClassDecl::new(resolve::class_id(&self.name, package), self.kind);

        if let Some(flags) = &self.kudos {
            decl.annotations.push(Annotation::kudos(flags));
        }
        for annotation in &self.annotations {
            decl.annotations
                .push(Annotation::new(resolve::class_id(annotation, package)));
        }
        for supertype in &self.supertypes {
            decl.supertypes.push(ty(supertype)?);
        }

        let mut primary = Vec::new();
        for property in self.properties {
            let mut lowered = Property::new(
                property.name.clone(),
                ty(&property.ty)?,
                if property.param {
                    PropertyOrigin::ConstructorParameter
                } else {
                    PropertyOrigin::Body
                },
            );
            lowered.delegated = property.delegated;
            lowered.backing_field = property.backing_field;
            lowered.json_name = property.json_name;
            lowered.initializer = property.init;

            if property.param {
                let mut param = Parameter::new(property.name, lowered.ty.clone());
                param.default = property.default;
                primary.push(param);
            }
            decl.properties.push(lowered);
        }

        if !self.no_primary {
            let mut ctor = Constructor::primary(primary);
            ctor.overloads = self.overloads;
            decl.constructors.push(ctor);
        }
        for params in self.constructors {
            let params = params
                .into_iter()
                .map(|p| p.lower(package))
                .collect::<Result<Vec<_>, _>>()?;
            decl.constructors.push(Constructor::secondary(params));
        }

        for member in self.members {
            let params = member
                .params
                .into_iter()
                .map(|p| p.lower(package))
                .collect::<Result<Vec<_>, _>>()?;
            let returns = match &member.returns {
                Some(returns) => ty(returns)?,
                None => TypeRef::new(names::UNIT),
            };
            let body = match member.body {
                BodyDescriptor::Authored => BodyState::Authored,
                BodyDescriptor::Declared => BodyState::Declared,
                BodyDescriptor::FakeOverride { from } => BodyState::FakeOverride {
                    from: resolve::class_id(&from, package),
                },
            };

            decl.members
                .push(Member::new(member.name, params, returns).with_body(body));
        }

        Ok(decl)
    }
}

///
/// PropertyDescriptor
///

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDescriptor {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,

    /// Declared in the primary constructor.
    #[serde(default)]
    pub param: bool,

    #[serde(default)]
    pub default: Option<Literal>,

    #[serde(default)]
    pub init: Option<Literal>,

    #[serde(default)]
    pub json_name: Option<String>,

    #[serde(default)]
    pub delegated: bool,

    #[serde(default = "backing_field_default")]
    pub backing_field: bool,
}

const fn backing_field_default() -> bool {
    true
}

///
/// ParameterDescriptor
///

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDescriptor {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default)]
    pub default: Option<Literal>,
}

impl ParameterDescriptor {
    fn lower(self, package: Option<&str>) -> Result<Parameter, FrontendError> {
        let ty = resolve::type_ref(self.ty.parse()?, package);
        let mut param = Parameter::new(self.name, ty);
        param.default = self.default;

        Ok(param)
    }
}

///
/// MemberDescriptor
///

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberDescriptor {
    pub name: String,

    #[serde(default)]
    pub params: Vec<ParameterDescriptor>,

    #[serde(default)]
    pub returns: Option<String>,

    #[serde(default)]
    pub body: BodyDescriptor,
}

///
/// BodyDescriptor
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyDescriptor {
    #[default]
    Authored,
    Declared,
    FakeOverride {
        from: String,
    },
}

/// Parses a descriptor document into class declarations.
pub fn parse_descriptor(json: &str) -> Result<Vec<ClassDecl>, FrontendError> {
    Document::from_json(json)?.into_classes()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use kudos_core::model::ClassId;

    const USER: &str = r#"{
        "package": "demo",
        "classes": [
            {
                "name": "User",
                "kudos": [2],
                "supertypes": ["Base"],
                "properties": [
                    { "name": "name", "type": "String", "param": true },
                    { "name": "age", "type": "Int?", "param": true, "default": "null" },
                    { "name": "userTags", "type": "List<String>", "param": true, "json_name": "tags" },
                    { "name": "cache", "type": "Map<String, Int>", "init": "empty_map" },
                    { "name": "derived", "type": "String", "backing_field": false }
                ],
                "members": [
                    {
                        "name": "validate",
                        "params": [{ "name": "status", "type": "Map<String, Boolean>" }],
                        "body": { "fake_override": { "from": "kudos.validator.KudosValidator" } }
                    }
                ]
            },
            { "name": "Base", "constructors": [[]], "no_primary": true }
        ]
    }"#;

    #[test]
    fn lowers_a_marked_class() {
        let classes = parse_descriptor(USER).expect("document should parse");
        let user = &classes[0];

        assert_eq!(user.id, "demo.User");
        assert!(user.has_marker());
        assert_eq!(user.supertypes[0].to_string(), "demo.Base");

        let primary = user.primary_constructor().expect("primary constructor");
        let params = primary.params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
        assert_eq!(params, vec!["name", "age", "userTags"]);
        assert_eq!(primary.params[1].default, Some(Literal::Null));

        let tags = user.property("userTags").expect("tags property");
        assert_eq!(tags.json_key(), "tags");
        assert_eq!(tags.ty.to_string(), "kotlin.collections.List<kotlin.String>");

        let cache = user.property("cache").expect("cache property");
        assert_eq!(cache.origin, PropertyOrigin::Body);
        assert_eq!(cache.initializer, Some(Literal::EmptyMap));
        assert!(!user.property("derived").expect("derived").has_candidate_field());

        let validate = user
            .member(names::VALIDATE, &[TypeRef::presence_map()])
            .expect("validate member");
        assert_eq!(
            validate.body,
            BodyState::FakeOverride {
                from: ClassId::from(names::KUDOS_VALIDATOR)
            }
        );
    }

    #[test]
    fn secondary_constructors_replace_the_primary() {
        let classes = parse_descriptor(USER).expect("document should parse");
        let base = &classes[1];

        assert!(base.primary_constructor().is_none());
        assert_eq!(base.constructors.len(), 1);
        assert!(base.constructors[0].is_zero_parameter());
    }

    #[test]
    fn unknown_keys_and_bad_types_are_rejected() {
        assert!(matches!(
            parse_descriptor(r#"{ "classes": [{ "name": "A", "color": "red" }] }"#),
            Err(FrontendError::Json(_))
        ));
        assert!(matches!(
            parse_descriptor(
                r#"{ "classes": [{ "name": "A", "properties": [{ "name": "x", "type": "List<" }] }] }"#
            ),
            Err(FrontendError::Model(_))
        ));
    }
}
