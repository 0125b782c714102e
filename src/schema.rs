//! Argument validation against server-declared input schemas.
//!
//! Servers describe tool inputs with JSON-Schema-shaped documents. The
//! document itself stays opaque; compilation extracts only what the call-time
//! check needs: the required property set and the declared primitive type of
//! each property. Anything the document does not declare is accepted.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// A JSON object, as servers ship their schemas and tools take their args.
pub type JsonObject = Map<String, Value>;

/// Compiled input contract for one tool.
#[derive(Debug, Clone, Default)]
pub struct ArgumentValidator {
    required: Vec<String>,
    property_types: HashMap<String, String>,
}

impl ArgumentValidator {
    /// Compile a validator from an opaque schema document.
    ///
    /// Malformed or partial schemas degrade to a permissive validator rather
    /// than failing tool construction; servers in the wild ship schemas with
    /// missing `type` tags and other irregularities.
    pub fn compile(schema: &JsonObject) -> Self {
        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut property_types = HashMap::new();
        if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
            for (name, property) in properties {
                if let Some(type_tag) = declared_type(property) {
                    property_types.insert(name.clone(), type_tag.to_string());
                }
            }
        }

        Self {
            required,
            property_types,
        }
    }

    /// Check an argument object against the compiled contract.
    pub fn validate(&self, args: &JsonObject) -> Result<(), String> {
        for name in &self.required {
            if !args.contains_key(name) {
                return Err(format!("missing required property '{name}'"));
            }
        }

        for (name, value) in args {
            if let Some(expected) = self.property_types.get(name) {
                if !type_matches(expected, value) {
                    return Err(format!(
                        "property '{name}' should be of type '{expected}', got {}",
                        json_type_name(value)
                    ));
                }
            }
        }

        Ok(())
    }
}

/// The `type` tag of a property schema. A union like `["string", "null"]`
/// collapses to its first entry.
fn declared_type(property: &Value) -> Option<&str> {
    match property.get("type")? {
        Value::String(tag) => Some(tag.as_str()),
        Value::Array(tags) => tags.first().and_then(Value::as_str),
        _ => None,
    }
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        // Unknown type tag: accept, the server is the authority.
        _ => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
