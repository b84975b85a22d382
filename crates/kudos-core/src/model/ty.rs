use crate::{error::ModelError, names};
use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

///
/// ClassId
/// fully-qualified, dot separated class name
///

#[derive(
    Clone, Debug, Deref, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct ClassId(String);

impl ClassId {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment of the qualified name.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    #[must_use]
    pub fn package(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(package, _)| package)
    }
}

impl From<&str> for ClassId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ClassId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for ClassId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ClassId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

///
/// TypeRef
///
/// A resolved type as the host sees it: a class, its nullability and its
/// generic arguments. Element nullability of containers lives on the
/// argument types.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TypeRef {
    pub class: ClassId,
    pub nullable: bool,
    pub args: Vec<Self>,
}

impl TypeRef {
    #[must_use]
    pub fn new(class: impl Into<ClassId>) -> Self {
        Self {
            class: class.into(),
            nullable: false,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = Self>) -> Self {
        self.args = args.into_iter().collect();
        self
    }

    /// First generic argument; the element type for collections and arrays.
    #[must_use]
    pub fn element(&self) -> Option<&Self> {
        self.args.first()
    }

    #[must_use]
    pub fn short_name(&self) -> &str {
        self.class.short_name()
    }

    #[must_use]
    pub const fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    /// Rewrites unqualified builtin names, arguments included.
    #[must_use]
    pub fn qualified(mut self) -> Self {
        if let Some(name) = names::qualify(self.class.as_str()) {
            self.class = ClassId::from(name);
        }
        self.args = self.args.into_iter().map(Self::qualified).collect();

        self
    }

    /// `Map<String, Boolean>`, the presence map handed to validators.
    #[must_use]
    pub fn presence_map() -> Self {
        Self::new(names::MAP).with_args([Self::new(names::STRING), Self::new(names::BOOLEAN)])
    }

    #[must_use]
    pub fn json_reader() -> Self {
        Self::new(names::JSON_READER)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class)?;

        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }

        if self.nullable {
            f.write_str("?")?;
        }

        Ok(())
    }
}

impl FromStr for TypeRef {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = TypeParser { input: s, pos: 0 };
        let ty = parser.parse_type()?;

        parser.skip_ws();
        if parser.pos != s.len() {
            return Err(parser.error("trailing input"));
        }

        Ok(ty)
    }
}

// TypeParser
// recursive descent over `a.b.C<d.E?, F>?`
struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
}

impl TypeParser<'_> {
    fn parse_type(&mut self) -> Result<TypeRef, ModelError> {
        self.skip_ws();
        let name = self.parse_name()?;
        let mut ty = TypeRef::new(name);

        self.skip_ws();
        if self.eat('<') {
            loop {
                ty.args.push(self.parse_type()?);
                self.skip_ws();
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.error("expected ',' or '>'"));
            }
        }

        self.skip_ws();
        if self.eat('?') {
            ty.nullable = true;
        }

        Ok(ty)
    }

    fn parse_name(&mut self) -> Result<String, ModelError> {
        let rest = &self.input[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '.' | '$')))
            .unwrap_or(rest.len());

        if len == 0 {
            return Err(self.error("expected a class name"));
        }

        let name = &rest[..len];
        if name.starts_with('.') || name.ends_with('.') || name.contains("..") {
            return Err(self.error("malformed qualified name"));
        }
        self.pos += len;

        Ok(name.to_string())
    }

    fn eat(&mut self, c: char) -> bool {
        if self.input[self.pos..].starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn error(&self, reason: &str) -> ModelError {
        ModelError::InvalidType {
            input: self.input.to_string(),
            reason: format!("{reason} at offset {}", self.pos),
        }
    }
}

///
/// Literal
/// constant default values and body initializers
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    EmptyList,
    EmptyMap,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}L"),
            Self::Float(v) => write!(f, "{v:?}f"),
            Self::Double(v) => write!(f, "{v:?}"),
            Self::Str(v) => write!(f, "{v:?}"),
            Self::EmptyList => f.write_str("emptyList()"),
            Self::EmptyMap => f.write_str("emptyMap()"),
        }
    }
}

///
/// TESTS
///
