//! Type-safe schema generation for Perplexity structured outputs.
//!
//! Uses the `schemars` crate to generate JSON schemas from Rust types.
//!
//! # Example
//!
//! ```rust,ignore
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//! use perplexity_client::StructuredOutput;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Paper {
//!     title: String,
//!     link: String,
//! }
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct PapersAnswer {
//!     research_papers: Vec<Paper>,
//! }
//!
//! let schema = PapersAnswer::answer_schema();
//! ```

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Trait for types that can be requested as a structured answer.
///
/// Automatically implemented for any type that implements `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate a self-contained JSON schema for this type.
    ///
    /// The search API does not resolve `$ref`, so the `definitions` table is
    /// taken out of the root and each reference is replaced by its target.
    fn answer_schema() -> Value {
        let mut value = serde_json::to_value(schema_for!(Self)).unwrap_or_default();

        let definitions = match &mut value {
            Value::Object(root) => {
                root.remove("$schema");
                match root.remove("definitions") {
                    Some(Value::Object(defs)) => defs,
                    _ => Map::new(),
                }
            }
            _ => Map::new(),
        };

        let mut expanding = Vec::new();
        resolve_refs(&mut value, &definitions, &mut expanding);
        value
    }

    /// Get the schema name for this type.
    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

fn definition_name(node: &Value) -> Option<String> {
    node.get("$ref")?
        .as_str()?
        .strip_prefix(DEFINITIONS_PREFIX)
        .map(String::from)
}

/// Replace every `{"$ref": "#/definitions/Name"}` below `node` with `Name`'s schema.
///
/// A type that contains itself keeps its `$ref` at the point of recursion.
fn resolve_refs(node: &mut Value, definitions: &Map<String, Value>, expanding: &mut Vec<String>) {
    if let Some(name) = definition_name(node) {
        if expanding.contains(&name) {
            return;
        }
        if let Some(target) = definitions.get(&name) {
            *node = target.clone();
            expanding.push(name);
            resolve_refs(node, definitions, expanding);
            expanding.pop();
        }
        return;
    }

    match node {
        Value::Object(map) => map
            .values_mut()
            .for_each(|child| resolve_refs(child, definitions, expanding)),
        Value::Array(items) => items
            .iter_mut()
            .for_each(|child| resolve_refs(child, definitions, expanding)),
        _ => {}
    }
}
