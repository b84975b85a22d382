//! Rust-syntax declarations through the whole pipeline.

use kudos::prelude::*;
use std::fs;

const SHOP: &str = r#"
    #[kudos(flags = "2")]
    pub struct Address {
        #[field(param)]
        street: String,

        #[field(param, default = None)]
        zip: Option<String>,
    }

    #[kudos(flags = "2")]
    pub struct Customer {
        #[field(param)]
        name: String,

        #[field(param)]
        address: Address,

        #[field(param, default = vec![])]
        tags: Vec<String>,

        #[field(param, default = None)]
        #[kudos(json_name = "score")]
        rating: Option<f32>,

        #[field(init = 0)]
        visits: i64,
    }
"#;

fn shop() -> ClassTable {
    let classes = parse_source(SHOP, "shop").expect("source lowers");
    let mut table = class_table(classes, false).expect("classes insert");
    synthesize(&mut table, Options::default()).expect("shop synthesizes");

    table
}

fn customer(table: &ClassTable, json: &str) -> Result<Instance, RuntimeError> {
    Interpreter::new(table).deserialize_json(&ClassId::from("shop.Customer"), json)
}

#[test]
fn nested_adapter_objects_are_read_through_their_own_reader() {
    let table = shop();
    let customer = customer(
        &table,
        r#"{
            "name": "Ada",
            "address": { "street": "Main St", "unused": [1, 2] },
            "tags": ["vip", "early"],
            "score": "4.5"
        }"#,
    )
    .expect("document is valid");

    let Value::Object(address) = customer.get("address") else {
        panic!("address is a nested object");
    };
    assert_eq!(address.class, "shop.Address");
    assert_eq!(address.get("street"), &Value::from("Main St"));
    assert!(address.get("zip").is_null());

    assert_eq!(
        customer.get("tags"),
        &Value::List(vec![Value::from("vip"), Value::from("early")])
    );
    assert_eq!(customer.get("rating"), &Value::Float(4.5));
    assert_eq!(customer.get("visits"), &Value::Long(0));
}

#[test]
fn absent_fields_keep_their_defaults() {
    let table = shop();
    let customer = customer(&table, r#"{"name":"Ada","address":{"street":"x"}}"#)
        .expect("document is valid");

    assert_eq!(customer.get("tags"), &Value::List(Vec::new()));
    assert!(customer.get("rating").is_null());
}

#[test]
fn nested_validation_failures_surface() {
    let table = shop();

    let err = customer(&table, r#"{"name":"Ada","address":{}}"#)
        .expect_err("street is required");
    assert_eq!(err.to_string(), "field 'street' required but missing");

    let err = customer(&table, r#"{"name":"Ada"}"#).expect_err("address is required");
    assert!(matches!(err, RuntimeError::MissingField { field } if field == "address"));
}

#[test]
fn null_collection_elements_are_rejected() {
    let table = shop();

    let err = customer(
        &table,
        r#"{"name":"Ada","address":{"street":"x"},"tags":["a",null]}"#,
    )
    .expect_err("tags hold non-null strings");
    assert!(matches!(err, RuntimeError::NullCollectionElement { .. }));
}

#[test]
fn report_lists_every_marked_class() {
    let classes = parse_source(SHOP, "shop").expect("source lowers");
    let mut table = class_table(classes, false).expect("classes insert");
    let sink = RecordingSink::new();

    let report = synthesize_with(&mut table, Options::default(), &sink).expect("synthesizes");
    assert!(report.class("shop.Address").is_some());
    assert!(report.class("shop.Customer").is_some());
    assert!(!sink.events().is_empty());
}

#[test]
fn user_written_deserializer_is_kept() {
    let classes = parse_source(
        r#"
        #[kudos(flags = "2")]
        pub struct Ticket {
            #[field(param)]
            code: String,
        }

        impl Ticket {
            pub fn deserialize(json_reader: &mut dyn JsonReader) -> Self {
                Self { code: String::new() }
            }
        }
        "#,
        "events",
    )
    .expect("source lowers");
    let mut table = class_table(classes, false).expect("classes insert");
    let report = synthesize(&mut table, Options::default()).expect("synthesizes");

    let ticket = report.class("events.Ticket").expect("ticket synthesized");
    assert!(ticket.member("constructor").is_some());
    assert!(ticket.member("deserializer").is_none());

    let decl = table.require(&ClassId::from("events.Ticket")).expect("ticket declared");
    let deserialize = decl
        .member(kudos::core::names::DESERIALIZE, &[TypeRef::json_reader()])
        .expect("user deserializer");
    assert_eq!(deserialize.body, BodyState::Authored);
    assert_eq!(
        decl.members
            .iter()
            .filter(|m| m.name == kudos::core::names::DESERIALIZE)
            .count(),
        1
    );
}

#[test]
fn files_are_loaded_by_extension() {
    let dir = std::env::temp_dir().join(format!("kudos-source-flow-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");

    let source = dir.join("shop.rs");
    fs::write(&source, SHOP).expect("source written");
    let classes = load_path(&source).expect("source loads");
    assert!(classes.iter().any(|c| c.id == "shop.Customer"));

    let unknown = dir.join("shop.txt");
    fs::write(&unknown, "").expect("file written");
    let err: Error = load_path(&unknown).expect_err("unknown extension").into();
    assert_eq!(err.kind, ErrorKind::Frontend);

    fs::remove_dir_all(&dir).expect("temp dir removed");
}
