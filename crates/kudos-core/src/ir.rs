//! Statements and expressions of synthesized members.
//!
//! The IR is closed: every generated body is built from these enums and the
//! runtime interpreter executes exactly this set. `Display` renders a stable
//! pseudo-source listing.

use crate::{
    model::{ClassId, Literal},
    names,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};

const INDENT: &str = "    ";

///
/// JsonToken
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum JsonToken {
    #[display("BEGIN_ARRAY")]
    BeginArray,
    #[display("END_ARRAY")]
    EndArray,
    #[display("BEGIN_OBJECT")]
    BeginObject,
    #[display("END_OBJECT")]
    EndObject,
    #[display("NAME")]
    Name,
    #[display("STRING")]
    String,
    #[display("NUMBER")]
    Number,
    #[display("BOOLEAN")]
    Boolean,
    #[display("NULL")]
    Null,
    #[display("END_DOCUMENT")]
    EndDocument,
}

///
/// ReaderOp
/// one call on the token-stream reader parameter
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ReaderOp {
    #[display("beginObject()")]
    BeginObject,
    #[display("endObject()")]
    EndObject,
    #[display("beginArray()")]
    BeginArray,
    #[display("endArray()")]
    EndArray,
    #[display("hasNext()")]
    HasNext,
    #[display("nextName()")]
    NextName,
    #[display("peek()")]
    Peek,
    #[display("skipValue()")]
    SkipValue,
    #[display("nextString()")]
    NextString,
    #[display("nextLong()")]
    NextLong,
    #[display("nextInt()")]
    NextInt,
    #[display("nextDouble()")]
    NextDouble,
    #[display("nextBoolean()")]
    NextBoolean,
}

///
/// ValidatorCall
/// calls into the runtime validator primitives
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidatorCall {
    /// `validateField(name, status)`
    Field { name: String },

    /// `validateCollection(name, this.name, elementTypeName)`
    Collection { name: String, element_type: String },

    /// `validateArray(name, this.name)`
    Array { name: String },
}

impl ValidatorCall {
    #[must_use]
    pub fn field_name(&self) -> &str {
        match self {
            Self::Field { name } | Self::Collection { name, .. } | Self::Array { name } => name,
        }
    }
}

impl fmt::Display for ValidatorCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field { name } => {
                write!(f, "validateField({name:?}, {})", names::STATUS_PARAM)
            }
            Self::Collection { name, element_type } => {
                write!(f, "validateCollection({name:?}, this.{name}, {element_type:?})")
            }
            Self::Array { name } => write!(f, "validateArray({name:?}, this.{name})"),
        }
    }
}

///
/// Expr
///

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    This,
    Param(String),
    Local(String),
    Literal(Literal),
    GetField(String),

    /// Call on the reader parameter.
    Read(ReaderOp),

    /// `jsonReader.peek() == JsonToken.X`
    PeekIs(JsonToken),

    ParseFloat(Box<Self>),
    NotNull(Box<Self>),

    /// Recursive adapter call for containers and nested adapter types.
    ParseNested { descriptor: Box<Self> },

    /// Runtime class token of a non-generic type.
    ClassToken(ClassId),

    /// Parameterized type value: raw class token plus argument descriptors.
    Parameterized { raw: ClassId, args: Vec<Self> },

    /// `this.field.put(key, value)`
    PresencePut {
        field: String,
        key: String,
        value: Box<Self>,
    },

    Validate(ValidatorCall),

    /// `this.validate(status)`
    CallValidator { status: Box<Self> },

    /// `super<Class>.validate(status)`
    CallSuperValidator { class: ClassId, status: Box<Self> },

    NewPresenceMap,
}

impl Expr {
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self::GetField(name.into())
    }

    #[must_use]
    pub fn not_null(self) -> Self {
        Self::NotNull(Box::new(self))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::This => f.write_str("this"),
            Self::Param(name) | Self::Local(name) => f.write_str(name),
            Self::Literal(lit) => write!(f, "{lit}"),
            Self::GetField(name) => write!(f, "this.{name}"),
            Self::Read(op) => write!(f, "{}.{op}", names::READER_PARAM),
            Self::PeekIs(token) => write!(
                f,
                "{}.peek() == JsonToken.{token}",
                names::READER_PARAM
            ),
            Self::ParseFloat(inner) => write!(f, "{inner}.toFloat()"),
            Self::NotNull(inner) => write!(f, "{inner} != null"),
            Self::ParseNested { descriptor } => write!(
                f,
                "parseNestedValue({}, {descriptor})",
                names::READER_PARAM
            ),
            Self::ClassToken(class) => write!(f, "{class}::class"),
            Self::Parameterized { raw, args } => {
                write!(f, "ParameterizedType({raw}::class")?;
                for arg in args {
                    write!(f, ", {arg}")?;
                }
                f.write_str(")")
            }
            Self::PresencePut { field, key, value } => {
                write!(f, "this.{field}.put({key:?}, {value})")
            }
            Self::Validate(call) => write!(f, "{call}"),
            Self::CallValidator { status } => write!(f, "this.{}({status})", names::VALIDATE),
            Self::CallSuperValidator { class, status } => write!(
                f,
                "super<{}>.{}({status})",
                class.short_name(),
                names::VALIDATE
            ),
            Self::NewPresenceMap => f.write_str("hashMapOf()"),
        }
    }
}

///
/// Branch
/// one arm of a `when` over a string subject
///

#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub key: String,
    pub body: Vec<Stmt>,
}

///
/// Stmt
///

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    SetField {
        field: String,
        value: Expr,
    },
    Let {
        name: String,
        value: Expr,
    },

    /// Zero-argument delegation to the superclass constructor.
    DelegateCtor {
        class: ClassId,
        synthetic: bool,
    },

    /// Runs the class's field initializers.
    InstanceInit {
        class: ClassId,
    },

    While {
        cond: Expr,
        body: Vec<Self>,
    },
    IfThen {
        cond: Expr,
        then: Vec<Self>,
    },

    /// First matching branch wins; `default` runs when none match.
    When {
        subject: Expr,
        branches: Vec<Branch>,
        default: Vec<Self>,
    },

    Continue,
    Return(Expr),
}

impl Stmt {
    fn write(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = INDENT.repeat(depth);

        match self {
            Self::Expr(expr) => writeln!(f, "{pad}{expr}"),
            Self::SetField { field, value } => writeln!(f, "{pad}this.{field} = {value}"),
            Self::Let { name, value } => writeln!(f, "{pad}val {name} = {value}"),
            Self::DelegateCtor { class, synthetic } => {
                let marker = if *synthetic { " // synthesized" } else { "" };
                writeln!(f, "{pad}super<{}>(){marker}", class.short_name())
            }
            Self::InstanceInit { class } => {
                writeln!(f, "{pad}<init {}>", class.short_name())
            }
            Self::While { cond, body } => {
                writeln!(f, "{pad}while ({cond}) {{")?;
                write_block(f, body, depth + 1)?;
                writeln!(f, "{pad}}}")
            }
            Self::IfThen { cond, then } => {
                writeln!(f, "{pad}if ({cond}) {{")?;
                write_block(f, then, depth + 1)?;
                writeln!(f, "{pad}}}")
            }
            Self::When {
                subject,
                branches,
                default,
            } => {
                let inner = INDENT.repeat(depth + 1);
                writeln!(f, "{pad}when ({subject}) {{")?;
                for branch in branches {
                    writeln!(f, "{inner}{:?} -> {{", branch.key)?;
                    write_block(f, &branch.body, depth + 2)?;
                    writeln!(f, "{inner}}}")?;
                }
                writeln!(f, "{inner}else -> {{")?;
                write_block(f, default, depth + 2)?;
                writeln!(f, "{inner}}}")?;
                writeln!(f, "{pad}}}")
            }
            Self::Continue => writeln!(f, "{pad}continue"),
            Self::Return(expr) => writeln!(f, "{pad}return {expr}"),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, 0)
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, stmts: &[Stmt], depth: usize) -> fmt::Result {
    for stmt in stmts {
        stmt.write(f, depth)?;
    }

    Ok(())
}

///
/// SyntheticConstructor
///

#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticConstructor {
    pub class: ClassId,
    pub delegate: ClassId,
    pub body: Vec<Stmt>,

    /// Fields assigned from a declared default.
    pub defaulted: BTreeSet<String>,
}

///
/// SyntheticValidator
///

#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticValidator {
    pub class: ClassId,
    pub body: Vec<Stmt>,
    pub replaces_placeholder: bool,
}

///
/// SyntheticDeserializer
///

#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticDeserializer {
    pub class: ClassId,
    pub body: Vec<Stmt>,
}

///
/// SyntheticMember
///

#[derive(Clone, Debug, PartialEq)]
pub enum SyntheticMember {
    Constructor(SyntheticConstructor),
    Validator(SyntheticValidator),
    Deserializer(SyntheticDeserializer),
}

impl SyntheticMember {
    #[must_use]
    pub const fn class(&self) -> &ClassId {
        match self {
            Self::Constructor(c) => &c.class,
            Self::Validator(v) => &v.class,
            Self::Deserializer(d) => &d.class,
        }
    }

    #[must_use]
    pub fn body(&self) -> &[Stmt] {
        match self {
            Self::Constructor(c) => &c.body,
            Self::Validator(v) => &v.body,
            Self::Deserializer(d) => &d.body,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Constructor(_) => "constructor",
            Self::Validator(_) => "validator",
            Self::Deserializer(_) => "deserializer",
        }
    }
}

impl fmt::Display for SyntheticMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructor(_) => writeln!(f, "constructor() {{")?,
            Self::Validator(_) => writeln!(
                f,
                "override fun {}({}: Map<String, Boolean>) {{",
                names::VALIDATE,
                names::STATUS_PARAM
            )?,
            Self::Deserializer(d) => writeln!(
                f,
                "fun {}({}: JsonReader): {} {{",
                names::DESERIALIZE,
                names::READER_PARAM,
                d.class.short_name()
            )?,
        }
        write_block(f, self.body(), 1)?;
        writeln!(f, "}}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_blocks() {
        let stmt = Stmt::While {
            cond: Expr::Read(ReaderOp::HasNext),
            body: vec![
                Stmt::Let {
                    name: "name".to_string(),
                    value: Expr::Read(ReaderOp::NextName),
                },
                Stmt::IfThen {
                    cond: Expr::PeekIs(JsonToken::Null),
                    then: vec![Stmt::Expr(Expr::Read(ReaderOp::SkipValue)), Stmt::Continue],
                },
            ],
        };

        let expected = "\
while (jsonReader.hasNext()) {
    val name = jsonReader.nextName()
    if (jsonReader.peek() == JsonToken.NULL) {
        jsonReader.skipValue()
        continue
    }
}
";
        assert_eq!(stmt.to_string(), expected);
    }

    #[test]
    fn renders_when_with_default() {
        let stmt = Stmt::When {
            subject: Expr::Local("name".to_string()),
            branches: vec![Branch {
                key: "user_name".to_string(),
                body: vec![Stmt::SetField {
                    field: "userName".to_string(),
                    value: Expr::Read(ReaderOp::NextString),
                }],
            }],
            default: vec![Stmt::Expr(Expr::Read(ReaderOp::SkipValue))],
        };

        let text = stmt.to_string();
        assert!(text.contains("\"user_name\" -> {"));
        assert!(text.contains("this.userName = jsonReader.nextString()"));
        assert!(text.contains("else -> {"));
    }

    #[test]
    fn renders_parameterized_descriptor() {
        let expr = Expr::ParseNested {
            descriptor: Box::new(Expr::Parameterized {
                raw: ClassId::from(names::LIST),
                args: vec![Expr::ClassToken(ClassId::from(names::STRING))],
            }),
        };

        assert_eq!(
            expr.to_string(),
            "parseNestedValue(jsonReader, ParameterizedType(kotlin.collections.List::class, kotlin.String::class))"
        );
    }
}
