//! Validator primitives called from generated `validate` bodies.

use crate::{error::RuntimeError, value::Value};
use derive_more::{Deref, DerefMut};
use std::collections::BTreeMap;

///
/// PresenceMap
/// field name to "seen with a non-null value" while reading
///

#[derive(Clone, Debug, Default, Deref, DerefMut, Eq, PartialEq)]
pub struct PresenceMap(BTreeMap<String, bool>);

impl PresenceMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_present(&self, field: &str) -> bool {
        self.0.get(field).copied().unwrap_or(false)
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for PresenceMap {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// A required field must have been read with a non-null value.
pub fn validate_field(name: &str, status: &PresenceMap) -> Result<(), RuntimeError> {
    if status.is_present(name) {
        Ok(())
    } else {
        Err(RuntimeError::MissingField {
            field: name.to_string(),
        })
    }
}

// validate_collection
// a null collection is the presence check's concern, not this one's
pub fn validate_collection(
    name: &str,
    value: &Value,
    element_type: &str,
) -> Result<(), RuntimeError> {
    if has_null_element(value) {
        return Err(RuntimeError::NullCollectionElement {
            field: name.to_string(),
            element_type: element_type.to_string(),
        });
    }

    Ok(())
}

pub fn validate_array(name: &str, value: &Value) -> Result<(), RuntimeError> {
    if has_null_element(value) {
        return Err(RuntimeError::NullArrayElement {
            field: name.to_string(),
        });
    }

    Ok(())
}

fn has_null_element(value: &Value) -> bool {
    match value {
        Value::List(items) => items.iter().any(Value::is_null),
        _ => false,
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn field_needs_a_true_entry() {
        let status = PresenceMap::from_iter([("name", true), ("age", false)]);

        validate_field("name", &status).expect("name was read");
        assert!(matches!(
            validate_field("age", &status),
            Err(RuntimeError::MissingField { field }) if field == "age"
        ));
        assert!(validate_field("email", &status).is_err());
    }

    #[test]
    fn collections_reject_null_elements() {
        let ok = Value::List(vec![Value::from("a"), Value::from("b")]);
        let bad = Value::List(vec![Value::from("a"), Value::Null]);

        validate_collection("tags", &ok, "String").expect("no nulls");
        validate_collection("tags", &Value::Null, "String").expect("null collection is skipped");

        let err = validate_collection("tags", &bad, "String").expect_err("null element");
        assert_eq!(
            err.to_string(),
            "element of collection 'tags' must not be null (String)"
        );
        assert!(validate_array("scores", &bad).is_err());
    }

    proptest! {
        #[test]
        fn field_check_follows_presence(
            entries in prop::collection::btree_map("[a-z]{1,6}", any::<bool>(), 0..8),
            probe in "[a-z]{1,6}",
        ) {
            let status = entries.iter().map(|(k, v)| (k.clone(), *v)).collect::<PresenceMap>();
            let expected = entries.get(&probe).copied().unwrap_or(false);

            prop_assert_eq!(validate_field(&probe, &status).is_ok(), expected);
        }
    }
}
