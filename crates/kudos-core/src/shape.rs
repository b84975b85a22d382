//! Field shapes.
//!
//! A field type is classified once into a closed [`FieldShape`]; code
//! generation then matches on the shape only.

use crate::{
    error::SynthesisError,
    ir::{Expr, ReaderOp},
    model::{ClassId, ClassModel, TypeRef},
    names,
};

///
/// Scalar
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scalar {
    String,
    Long,
    Int,
    Double,
    Float,
    Bool,
}

impl Scalar {
    // dispatch order matters: first match wins
    const ORDER: [(&'static str, Self); 6] = [
        (names::STRING, Self::String),
        (names::LONG, Self::Long),
        (names::INT, Self::Int),
        (names::DOUBLE, Self::Double),
        (names::FLOAT, Self::Float),
        (names::BOOLEAN, Self::Bool),
    ];

    #[must_use]
    pub fn of(class: &ClassId) -> Option<Self> {
        Self::ORDER
            .iter()
            .find(|(name, _)| *class == *name)
            .map(|(_, scalar)| *scalar)
    }

    /// Reader call producing the value. Floats are read as strings.
    #[must_use]
    pub const fn read_op(self) -> ReaderOp {
        match self {
            Self::String | Self::Float => ReaderOp::NextString,
            Self::Long => ReaderOp::NextLong,
            Self::Int => ReaderOp::NextInt,
            Self::Double => ReaderOp::NextDouble,
            Self::Bool => ReaderOp::NextBoolean,
        }
    }
}

///
/// Container
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Container {
    List,
    Array,
    Set,
    Map,
}

impl Container {
    #[must_use]
    pub fn of(model: &dyn ClassModel, class: &ClassId) -> Option<Self> {
        [
            (names::LIST, Self::List),
            (names::ARRAY, Self::Array),
            (names::SET, Self::Set),
            (names::MAP, Self::Map),
        ]
        .into_iter()
        .find(|(name, _)| model.is_subclass_of(class, name))
        .map(|(_, container)| container)
    }
}

///
/// FieldShape
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldShape {
    Scalar(Scalar),
    Container(Container),

    /// Class carrying the adapter capability; parsed through its own
    /// generated deserializer.
    NestedAdapter,
}

impl FieldShape {
    /// Expression reading one value of this shape from the reader.
    #[must_use]
    pub fn read_expr(self, ty: &TypeRef) -> Expr {
        match self {
            Self::Scalar(Scalar::Float) => {
                Expr::ParseFloat(Box::new(Expr::Read(ReaderOp::NextString)))
            }
            Self::Scalar(scalar) => Expr::Read(scalar.read_op()),
            Self::Container(_) | Self::NestedAdapter => Expr::ParseNested {
                descriptor: Box::new(descriptor_expr(ty)),
            },
        }
    }
}

// classify
// scalars first, then containers, then adapter types
pub fn classify(
    model: &dyn ClassModel,
    owner: &ClassId,
    field: &str,
    ty: &TypeRef,
) -> Result<FieldShape, SynthesisError> {
    if let Some(scalar) = Scalar::of(&ty.class) {
        return Ok(FieldShape::Scalar(scalar));
    }
    if let Some(container) = Container::of(model, &ty.class) {
        return Ok(FieldShape::Container(container));
    }
    if model.is_subclass_of(&ty.class, names::KUDOS_JSON_ADAPTER) {
        return Ok(FieldShape::NestedAdapter);
    }

    Err(SynthesisError::UnsupportedType {
        class: owner.clone(),
        field: field.to_string(),
        ty: ty.to_string(),
    })
}

/// Runtime type value: a bare class token, or a parameterized type built
/// from the argument descriptors.
#[must_use]
pub fn descriptor_expr(ty: &TypeRef) -> Expr {
    if ty.args.is_empty() {
        Expr::ClassToken(ty.class.clone())
    } else {
        Expr::Parameterized {
            raw: ty.class.clone(),
            args: ty.args.iter().map(descriptor_expr).collect(),
        }
    }
}

///
/// TESTS
///
