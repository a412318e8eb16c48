//! Deterministic dummy instances for OpenAPI schemas.
//!
//! Values depend only on the schema and the property name, never on a random
//! source, so re-running generation yields byte-identical fixtures.

use crate::naming::camel_to_snake;
use crate::openapi::SCHEMA_REF_PREFIX;
use serde_json::{Map, Number, Value};

/// `$ref` chains deeper than this produce `null` (covers recursive schemas).
const MAX_DEPTH: usize = 8;

/// Number of elements generated for array-typed properties.
pub const ARRAY_DUMMY_ITEMS: usize = 2;

/// Placeholder used for wallet addresses and token ids.
pub const ETHEREUM_ADDRESS: &str = "0xETHEREUM_ADDRESS000000000000000000000000";

/// Build a dummy instance for `schema`, following `$ref`s into `schemas`
/// (the `components.schemas` table).
pub fn dummy_value(schema: &Value, schemas: &Map<String, Value>) -> Value {
    dummy_at_depth(schema, "", schemas, 0)
}

fn dummy_at_depth(schema: &Value, name: &str, schemas: &Map<String, Value>, depth: usize) -> Value {
    if depth > MAX_DEPTH {
        return Value::Null;
    }
    let Some(obj) = schema.as_object() else {
        return Value::Null;
    };

    if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
        return match reference
            .strip_prefix(SCHEMA_REF_PREFIX)
            .and_then(|target| schemas.get(target))
        {
            Some(target) => dummy_at_depth(target, name, schemas, depth + 1),
            None => Value::Null,
        };
    }
    if let Some(example) = obj.get("example") {
        return example.clone();
    }
    if let Some(first) = obj.get("enum").and_then(Value::as_array).and_then(|v| v.first()) {
        return first.clone();
    }
    if let Some(parts) = obj.get("allOf").and_then(Value::as_array) {
        let mut merged = Map::new();
        for part in parts {
            if let Value::Object(fields) = dummy_at_depth(part, name, schemas, depth + 1) {
                merged.extend(fields);
            }
        }
        return Value::Object(merged);
    }
    for combinator in ["oneOf", "anyOf"] {
        if let Some(first) = obj.get(combinator).and_then(Value::as_array).and_then(|v| v.first()) {
            return dummy_at_depth(first, name, schemas, depth + 1);
        }
    }

    match declared_type(obj) {
        "integer" => Value::Number(Number::from(42)),
        "number" => Number::from_f64(42.0).map_or(Value::Null, Value::Number),
        "boolean" => Value::Bool(true),
        "null" => Value::Null,
        "array" => {
            let items = obj.get("items").cloned().unwrap_or(Value::Null);
            Value::Array(
                (0..ARRAY_DUMMY_ITEMS)
                    .map(|_| dummy_at_depth(&items, name, schemas, depth + 1))
                    .collect(),
            )
        }
        "object" => {
            let mut instance = Map::new();
            if let Some(properties) = obj.get("properties").and_then(Value::as_object) {
                for (prop_name, prop_schema) in properties {
                    instance.insert(
                        prop_name.clone(),
                        dummy_at_depth(prop_schema, prop_name, schemas, depth + 1),
                    );
                }
            }
            Value::Object(instance)
        }
        _ => Value::String(string_dummy(name, obj.get("format").and_then(Value::as_str))),
    }
}

/// The schema's `type`, inferring `object`/`array` from `properties`/`items`
/// and falling back to `string`. OpenAPI 3.1 type lists use the first
/// non-null entry.
pub(crate) fn declared_type(obj: &Map<String, Value>) -> &str {
    match obj.get("type") {
        Some(Value::String(t)) => t.as_str(),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null")
            .unwrap_or("null"),
        _ if obj.contains_key("properties") => "object",
        _ if obj.contains_key("items") => "array",
        _ => "string",
    }
}

fn string_dummy(name: &str, format: Option<&str>) -> String {
    let normalized = camel_to_snake(name);
    let by_name = [
        ("wallet_address", ETHEREUM_ADDRESS),
        ("token_id", ETHEREUM_ADDRESS),
        ("email", "user@example.com"),
        ("phone_number", "+1-555-0100"),
        ("url", "https://example.com"),
        ("uuid", "00000000-0000-4000-8000-000000000000"),
        ("chain_id", "1"),
    ];
    if let Some((_, value)) = by_name.iter().find(|(needle, _)| normalized.contains(needle)) {
        return (*value).to_string();
    }
    match format {
        Some("email") => "user@example.com",
        Some("uuid") => "00000000-0000-4000-8000-000000000000",
        Some("uri") | Some("url") => "https://example.com",
        Some("date") => "2024-01-01",
        Some("date-time") => "2024-01-01T00:00:00Z",
        _ => "STRING_VALUE",
    }
    .to_string()
}
