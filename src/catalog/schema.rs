//! Body schema expansion.
//!
//! Body parameters reference named definitions in the API description. Those
//! definitions are turned into a sample JSON document showing the operator
//! what shape the request body should take.

use crate::constants;
use crate::error::Error;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// A schema node reduced to the shapes that matter for sample generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    /// A string, optionally restricted to a set of choices.
    String { choices: Vec<String> },
    /// Any numeric type.
    Integer,
    Boolean,
    Object { properties: IndexMap<String, Self> },
    Array { items: Box<Self> },
    /// A `$ref` to a named definition.
    Reference(String),
}

impl SchemaNode {
    /// Parses a raw schema object.
    ///
    /// # Errors
    ///
    /// Returns a schema error for non-object schemas and references that do
    /// not point into the definitions table.
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        let Value::Object(schema) = value else {
            return Err(Error::schema_error(format!(
                "schema must be an object, found: {value}"
            )));
        };

        if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
            let name = reference
                .strip_prefix(constants::DEFINITION_REF_PREFIX)
                .ok_or_else(|| {
                    Error::schema_error(format!(
                        "unsupported reference '{reference}'. Expected {}<name>",
                        constants::DEFINITION_REF_PREFIX
                    ))
                })?;
            return Ok(Self::Reference(name.to_string()));
        }

        let schema_type = schema.get("type").and_then(Value::as_str);
        match schema_type {
            Some(constants::SCHEMA_TYPE_STRING) => {
                let choices = schema
                    .get("enum")
                    .and_then(Value::as_array)
                    .map(|values| values.iter().map(scalar_text).collect())
                    .unwrap_or_default();
                Ok(Self::String { choices })
            }
            Some(constants::SCHEMA_TYPE_INTEGER | constants::SCHEMA_TYPE_NUMBER) => {
                Ok(Self::Integer)
            }
            Some(constants::SCHEMA_TYPE_BOOLEAN) => Ok(Self::Boolean),
            Some(constants::SCHEMA_TYPE_ARRAY) => {
                let items = schema.get("items").map_or_else(
                    || {
                        Ok(Self::String {
                            choices: Vec::new(),
                        })
                    },
                    Self::from_value,
                )?;
                Ok(Self::Array {
                    items: Box::new(items),
                })
            }
            Some(constants::SCHEMA_TYPE_OBJECT) | None => {
                let mut properties = IndexMap::new();
                if let Some(Value::Object(props)) = schema.get("properties") {
                    for (name, prop) in props {
                        properties.insert(name.clone(), Self::from_value(prop)?);
                    }
                }
                Ok(Self::Object { properties })
            }
            Some(other) => {
                tracing::debug!(
                    target: "cluster_cli::catalog",
                    "treating schema type '{other}' as a string"
                );
                Ok(Self::String {
                    choices: Vec::new(),
                })
            }
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Expands schema nodes into sample documents, resolving references against
/// a definitions table.
pub struct SampleGenerator<'a> {
    definitions: &'a HashMap<String, Value>,
    max_depth: usize,
}

impl<'a> SampleGenerator<'a> {
    #[must_use]
    pub const fn new(definitions: &'a HashMap<String, Value>) -> Self {
        Self {
            definitions,
            max_depth: constants::MAX_SCHEMA_DEPTH,
        }
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builds a sample document for a raw schema value.
    ///
    /// # Errors
    ///
    /// Returns a schema error if the schema is malformed, references an
    /// unknown definition, contains a reference cycle, or follows more
    /// references in a row than the configured limit.
    ///
    /// Only `$ref` hops count towards the limit. Inline objects and arrays
    /// are bounded by the document itself.
    pub fn sample(&self, schema: &Value) -> Result<Value, Error> {
        let node = SchemaNode::from_value(schema)?;
        let mut seen = HashSet::new();
        self.sample_node(&node, &mut seen, 0)
    }

    fn sample_node(
        &self,
        node: &SchemaNode,
        seen: &mut HashSet<String>,
        depth: usize,
    ) -> Result<Value, Error> {
        if depth > self.max_depth {
            return Err(Error::schema_error(format!(
                "maximum schema depth ({}) exceeded",
                self.max_depth
            )));
        }

        match node {
            SchemaNode::String { choices } if choices.is_empty() => {
                Ok(Value::String(constants::SAMPLE_STRING.to_string()))
            }
            SchemaNode::String { choices } => Ok(Value::String(choices.join("|"))),
            SchemaNode::Integer => Ok(Value::from(constants::SAMPLE_INTEGER)),
            SchemaNode::Boolean => Ok(Value::Bool(true)),
            SchemaNode::Array { items } => {
                let item = self.sample_node(items, seen, depth)?;
                Ok(Value::Array(vec![item.clone(), item]))
            }
            SchemaNode::Object { properties } => {
                let mut object = Map::new();
                for (name, property) in properties {
                    object.insert(name.clone(), self.sample_node(property, seen, depth)?);
                }
                Ok(Value::Object(object))
            }
            SchemaNode::Reference(name) => self.sample_reference(name, seen, depth),
        }
    }

    fn sample_reference(
        &self,
        name: &str,
        seen: &mut HashSet<String>,
        depth: usize,
    ) -> Result<Value, Error> {
        if !seen.insert(name.to_string()) {
            return Err(Error::schema_error(format!(
                "circular reference detected: '{name}' is part of a reference cycle"
            )));
        }

        let definition = self
            .definitions
            .get(name)
            .ok_or_else(|| Error::schema_error(format!("definition '{name}' not found")))?;
        let node = SchemaNode::from_value(definition)?;
        let sample = self.sample_node(&node, seen, depth + 1);

        seen.remove(name);
        sample
    }
}
