//! Recursive parsing of container and nested adapter values.

use crate::{
    error::RuntimeError,
    reader::JsonReader,
    value::{Instance, TypeDescriptor, Value},
};
use kudos_core::{
    ir::JsonToken,
    model::{ClassId, ClassModel},
    names,
    shape::{Container, Scalar},
};
use std::collections::BTreeMap;

///
/// NestedObjects
///
/// Resolves classes named by descriptors and runs their generated
/// deserializers.
///

pub trait NestedObjects {
    fn model(&self) -> &dyn ClassModel;

    fn deserialize_object(
        &self,
        class: &ClassId,
        reader: &mut dyn JsonReader,
    ) -> Result<Instance, RuntimeError>;
}

// parse_nested_value
// same dispatch order as generated field reads
pub fn parse_nested_value(
    reader: &mut dyn JsonReader,
    descriptor: &TypeDescriptor,
    objects: &dyn NestedObjects,
) -> Result<Value, RuntimeError> {
    if reader.peek()? == JsonToken::Null {
        reader.skip_value()?;
        return Ok(Value::Null);
    }

    let raw = descriptor.raw();
    if let Some(scalar) = Scalar::of(raw) {
        return read_scalar(reader, scalar);
    }

    let model = objects.model();
    match Container::of(model, raw) {
        Some(Container::List | Container::Array) => {
            let element = argument(descriptor, 0)?;
            let items = read_array(reader, element, objects)?;

            Ok(Value::List(items))
        }
        Some(Container::Set) => {
            let element = argument(descriptor, 0)?;
            let mut items = Vec::new();
            for item in read_array(reader, element, objects)? {
                if !items.contains(&item) {
                    items.push(item);
                }
            }

            Ok(Value::List(items))
        }
        Some(Container::Map) => {
            let value_type = argument(descriptor, 1)?;
            let mut entries = BTreeMap::new();

            reader.begin_object()?;
            while reader.has_next()? {
                let key = reader.next_name()?;
                let value = parse_nested_value(reader, value_type, objects)?;
                entries.insert(key, value);
            }
            reader.end_object()?;

            Ok(Value::Map(entries))
        }
        None if model.is_subclass_of(raw, names::KUDOS_JSON_ADAPTER) => objects
            .deserialize_object(raw, reader)
            .map(Value::Object),
        None => Err(unsupported(descriptor)),
    }
}

fn read_scalar(reader: &mut dyn JsonReader, scalar: Scalar) -> Result<Value, RuntimeError> {
    let value = match scalar {
        Scalar::String => Value::Str(reader.next_string()?),
        Scalar::Long => Value::Long(reader.next_long()?),
        Scalar::Int => Value::Int(reader.next_int()?),
        Scalar::Double => Value::Double(reader.next_double()?),
        Scalar::Float => Value::Float(parse_float(&reader.next_string()?)?),
        Scalar::Bool => Value::Bool(reader.next_boolean()?),
    };

    Ok(value)
}

fn read_array(
    reader: &mut dyn JsonReader,
    element: &TypeDescriptor,
    objects: &dyn NestedObjects,
) -> Result<Vec<Value>, RuntimeError> {
    let mut items = Vec::new();

    reader.begin_array()?;
    while reader.has_next()? {
        items.push(parse_nested_value(reader, element, objects)?);
    }
    reader.end_array()?;

    Ok(items)
}

pub(crate) fn parse_float(text: &str) -> Result<f32, RuntimeError> {
    text.trim()
        .parse::<f32>()
        .map_err(|_| RuntimeError::InvalidNumber {
            value: text.to_string(),
            target: "float",
        })
}

fn argument(descriptor: &TypeDescriptor, index: usize) -> Result<&TypeDescriptor, RuntimeError> {
    descriptor
        .args()
        .get(index)
        .ok_or_else(|| unsupported(descriptor))
}

fn unsupported(descriptor: &TypeDescriptor) -> RuntimeError {
    RuntimeError::UnsupportedDescriptor {
        descriptor: descriptor.to_string(),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::TokenReader;
    use kudos_core::model::ClassTable;

    struct NoObjects(ClassTable);

    impl NestedObjects for NoObjects {
        fn model(&self) -> &dyn ClassModel {
            &self.0
        }

        fn deserialize_object(
            &self,
            class: &ClassId,
            _reader: &mut dyn JsonReader,
        ) -> Result<Instance, RuntimeError> {
            Err(RuntimeError::NoDeserializer {
                class: class.clone(),
            })
        }
    }

    fn class(name: &str) -> TypeDescriptor {
        TypeDescriptor::Class(ClassId::from(name))
    }

    fn generic(raw: &str, args: Vec<TypeDescriptor>) -> TypeDescriptor {
        TypeDescriptor::Parameterized {
            raw: ClassId::from(raw),
            args,
        }
    }

    fn parse(json: &str, descriptor: &TypeDescriptor) -> Result<Value, RuntimeError> {
        let objects = NoObjects(ClassTable::with_builtins());
        let mut reader = TokenReader::from_json(json).expect("valid json");

        parse_nested_value(&mut reader, descriptor, &objects)
    }

    #[test]
    fn lists_keep_null_elements() {
        let list = generic(names::LIST, vec![class(names::STRING)]);

        let value = parse(r#"["a", null, "b"]"#, &list).expect("list should parse");
        assert_eq!(
            value,
            Value::List(vec![Value::from("a"), Value::Null, Value::from("b")])
        );
    }

    #[test]
    fn maps_read_values_with_the_second_argument() {
        let map = generic(
            names::MAP,
            vec![
                class(names::STRING),
                generic(names::LIST, vec![class(names::INT)]),
            ],
        );

        let Value::Map(entries) = parse(r#"{"a": [1, 2], "b": []}"#, &map).expect("map") else {
            panic!("map descriptor yields a map");
        };
        assert_eq!(entries["a"], Value::List(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(entries["b"], Value::List(Vec::new()));
    }

    #[test]
    fn sets_drop_duplicates_and_floats_parse_from_numbers() {
        let set = generic(names::HASH_SET, vec![class(names::FLOAT)]);

        let value = parse("[1.5, 1.5, 2]", &set).expect("set should parse");
        assert_eq!(value, Value::List(vec![Value::Float(1.5), Value::Float(2.0)]));
    }

    #[test]
    fn raw_containers_and_unknown_classes_are_unsupported() {
        assert!(matches!(
            parse("[]", &class(names::LIST)),
            Err(RuntimeError::UnsupportedDescriptor { .. })
        ));
        assert!(matches!(
            parse("{}", &class("demo.Unknown")),
            Err(RuntimeError::UnsupportedDescriptor { descriptor }) if descriptor == "demo.Unknown"
        ));
        assert_eq!(parse("null", &class("demo.Unknown")).expect("null"), Value::Null);
    }
}
