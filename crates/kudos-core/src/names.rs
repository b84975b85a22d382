//! Well-known class and member names the synthesizers rely on.

// host language builtins
pub const ANY: &str = "kotlin.Any";
pub const ARRAY: &str = "kotlin.Array";
pub const BOOLEAN: &str = "kotlin.Boolean";
pub const CHAR_SEQUENCE: &str = "kotlin.CharSequence";
pub const COMPARABLE: &str = "kotlin.Comparable";
pub const DOUBLE: &str = "kotlin.Double";
pub const FLOAT: &str = "kotlin.Float";
pub const FUNCTION: &str = "kotlin.Function";
pub const INT: &str = "kotlin.Int";
pub const LONG: &str = "kotlin.Long";
pub const NUMBER: &str = "kotlin.Number";
pub const STRING: &str = "kotlin.String";
pub const UNIT: &str = "kotlin.Unit";

// collections
pub const ARRAY_LIST: &str = "kotlin.collections.ArrayList";
pub const COLLECTION: &str = "kotlin.collections.Collection";
pub const HASH_MAP: &str = "kotlin.collections.HashMap";
pub const HASH_SET: &str = "kotlin.collections.HashSet";
pub const ITERABLE: &str = "kotlin.collections.Iterable";
pub const LINKED_HASH_MAP: &str = "kotlin.collections.LinkedHashMap";
pub const LINKED_HASH_SET: &str = "kotlin.collections.LinkedHashSet";
pub const LIST: &str = "kotlin.collections.List";
pub const MAP: &str = "kotlin.collections.Map";
pub const MUTABLE_LIST: &str = "kotlin.collections.MutableList";
pub const MUTABLE_MAP: &str = "kotlin.collections.MutableMap";
pub const MUTABLE_SET: &str = "kotlin.collections.MutableSet";
pub const SET: &str = "kotlin.collections.Set";

// kudos annotations
pub const KUDOS: &str = "kudos.annotations.Kudos";
pub const KUDOS_JSON_NAME: &str = "kudos.annotations.KudosJsonName";

// kudos runtime library
pub const KUDOS_VALIDATOR: &str = "kudos.validator.KudosValidator";
pub const KUDOS_JSON_ADAPTER: &str = "kudos.json.reader.KudosJsonAdapter";
pub const JSON_READER: &str = "kudos.json.reader.JsonReader";
pub const JSON_TOKEN: &str = "kudos.json.reader.JsonToken";

// reflective framework (gson) and its kudos adapter factory
pub const JSON_ADAPTER_ANNOTATION: &str = "com.google.gson.annotations.JsonAdapter";
pub const ADAPTER_FACTORY: &str = "kudos.gson.KudosReflectiveTypeAdapterFactory";

// synthesized members
pub const VALIDATE: &str = "validate";
pub const DESERIALIZE: &str = "deserialize";
pub const STATUS_PARAM: &str = "status";
pub const READER_PARAM: &str = "jsonReader";
pub const STATUS_FIELD: &str = "kudosFieldStatusMap";

const BUILTIN_SHORT_NAMES: &[&str] = &[
    ANY,
    ARRAY,
    BOOLEAN,
    CHAR_SEQUENCE,
    COMPARABLE,
    DOUBLE,
    FLOAT,
    FUNCTION,
    INT,
    LONG,
    NUMBER,
    STRING,
    UNIT,
    ARRAY_LIST,
    COLLECTION,
    HASH_MAP,
    HASH_SET,
    ITERABLE,
    LINKED_HASH_MAP,
    LINKED_HASH_SET,
    LIST,
    MAP,
    MUTABLE_LIST,
    MUTABLE_MAP,
    MUTABLE_SET,
    SET,
];

// kudos runtime types user code refers to by short name
const LIBRARY_SHORT_NAMES: &[&str] = &[JSON_READER, JSON_TOKEN, KUDOS_JSON_ADAPTER, KUDOS_VALIDATOR];

/// Qualified name of an unqualified builtin such as `String` or `List`.
#[must_use]
pub fn qualify(short: &str) -> Option<&'static str> {
    find_short(BUILTIN_SHORT_NAMES, short)
}

/// Qualified name of a kudos runtime type such as `JsonReader`.
#[must_use]
pub fn qualify_library(short: &str) -> Option<&'static str> {
    find_short(LIBRARY_SHORT_NAMES, short)
}

fn find_short(names: &[&'static str], short: &str) -> Option<&'static str> {
    if short.contains('.') {
        return None;
    }

    names
        .iter()
        .copied()
        .find(|name| name.rsplit('.').next() == Some(short))
}
