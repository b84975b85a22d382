use crate::{error::RuntimeError, validator::PresenceMap};
use kudos_core::model::{ClassId, Literal};
use std::{collections::BTreeMap, fmt};

///
/// TypeDescriptor
/// runtime type value handed to the nested parser
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeDescriptor {
    Class(ClassId),
    Parameterized {
        raw: ClassId,
        args: Vec<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    #[must_use]
    pub const fn raw(&self) -> &ClassId {
        match self {
            Self::Class(raw) | Self::Parameterized { raw, .. } => raw,
        }
    }

    #[must_use]
    pub fn args(&self) -> &[Self] {
        match self {
            Self::Class(_) => &[],
            Self::Parameterized { args, .. } => args,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())?;
        if let Self::Parameterized { args, .. } = self {
            let args = args.iter().map(ToString::to_string).collect::<Vec<_>>();
            write!(f, "<{}>", args.join(", "))?;
        }

        Ok(())
    }
}

///
/// Value
///

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Presence(PresenceMap),
    Object(Instance),
    Type(TypeDescriptor),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Presence(_) => "presence map",
            Self::Object(_) => "object",
            Self::Type(_) => "type",
        }
    }

    pub fn as_bool(&self) -> Result<bool, RuntimeError> {
        match self {
            Self::Bool(v) => Ok(*v),
            other => Err(mismatch("boolean", other)),
        }
    }

    pub fn as_str(&self) -> Result<&str, RuntimeError> {
        match self {
            Self::Str(v) => Ok(v),
            other => Err(mismatch("string", other)),
        }
    }

    pub fn into_type(self) -> Result<TypeDescriptor, RuntimeError> {
        match self {
            Self::Type(ty) => Ok(ty),
            other => Err(mismatch("type", &other)),
        }
    }

    pub fn into_presence(self) -> Result<PresenceMap, RuntimeError> {
        match self {
            Self::Presence(map) => Ok(map),
            other => Err(mismatch("presence map", &other)),
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Null => Self::Null,
            Literal::Bool(v) => Self::Bool(*v),
            Literal::Int(v) => Self::Int(*v),
            Literal::Long(v) => Self::Long(*v),
            Literal::Float(v) => Self::Float(*v),
            Literal::Double(v) => Self::Double(*v),
            Literal::Str(v) => Self::Str(v.clone()),
            Literal::EmptyList => Self::List(Vec::new()),
            Literal::EmptyMap => Self::Map(BTreeMap::new()),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

pub(crate) const fn mismatch(expected: &'static str, found: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

///
/// Instance
/// field storage of one object; unset fields read as null
///

#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub class: ClassId,
    fields: BTreeMap<String, Value>,
}

impl Instance {
    #[must_use]
    pub const fn new(class: ClassId) -> Self {
        Self {
            class,
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> &Value {
        const NULL: &Value = &Value::Null;
        self.fields.get(field).unwrap_or(NULL)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields.get_mut(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}
