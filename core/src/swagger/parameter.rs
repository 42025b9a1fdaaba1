#![deny(missing_docs)]

//! # Parameters
//!
//! Path, query and body parameters of an operation.

use crate::swagger::model::Model;
use crate::swagger::property::{Property, PropertyKind, Reference};
use serde_json::{json, Map, Value};
use std::fmt;

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    /// Templated path segment.
    Path,
    /// Query string.
    Query,
    /// Request body.
    Body,
}

impl ParameterLocation {
    /// Wire name (`in` member).
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Body => "body",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value schema of a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterSchema {
    /// Inline type for path / query parameters.
    Property(Property),
    /// Schema object for body parameters.
    Model(Model),
}

/// One operation parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Location.
    pub location: ParameterLocation,
    /// Description.
    pub description: Option<String>,
    /// Whether the parameter is required.
    pub required: bool,
    /// Regular expression the value must match.
    pub pattern: Option<String>,
    /// Example value, rendered as `x-example`.
    pub example: Option<String>,
    /// `allowEmptyValue`.
    pub allow_empty_value: Option<bool>,
    /// Default value.
    pub default: Option<String>,
    /// Value schema.
    pub schema: ParameterSchema,
}

impl Parameter {
    /// A required string path parameter.
    pub fn path(name: impl Into<String>, property: Property) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Path,
            description: None,
            required: true,
            pattern: None,
            example: None,
            allow_empty_value: None,
            default: None,
            schema: ParameterSchema::Property(property),
        }
    }

    /// A query parameter.
    pub fn query(name: impl Into<String>, property: Property, required: bool) -> Self {
        Self {
            location: ParameterLocation::Query,
            required,
            ..Self::path(name, property)
        }
    }

    /// A body parameter.
    pub fn body(name: impl Into<String>, model: Model) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Body,
            description: None,
            required: true,
            pattern: None,
            example: None,
            allow_empty_value: None,
            default: None,
            schema: ParameterSchema::Model(model),
        }
    }

    /// Collects every reference reachable from the value schema.
    pub fn collect_references<'a>(&'a self, out: &mut Vec<&'a Reference>) {
        match &self.schema {
            ParameterSchema::Property(p) => p.collect_references(out),
            ParameterSchema::Model(m) => m.collect_references(out),
        }
    }

    /// Renders the parameter object.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("name".to_string(), json!(self.name));
        obj.insert("in".to_string(), json!(self.location.as_str()));
        if let Some(desc) = &self.description {
            obj.insert("description".to_string(), json!(desc));
        }
        obj.insert("required".to_string(), json!(self.required));

        match &self.schema {
            ParameterSchema::Model(model) => {
                obj.insert("schema".to_string(), model.to_json());
            }
            ParameterSchema::Property(property) => {
                if let Some(tag) = property.type_tag() {
                    obj.insert("type".to_string(), json!(tag));
                }
                if let Some(format) = property.format() {
                    obj.insert("format".to_string(), json!(format));
                }
                if let PropertyKind::Array(array) = &property.kind {
                    obj.insert("items".to_string(), array.items.to_json());
                }
                if !property.meta.enum_values.is_empty() {
                    obj.insert("enum".to_string(), json!(property.meta.enum_values));
                }
            }
        }

        if let Some(pattern) = &self.pattern {
            obj.insert("pattern".to_string(), json!(pattern));
        }
        if let Some(default) = &self.default {
            obj.insert("default".to_string(), json!(default));
        }
        if let Some(allow_empty) = self.allow_empty_value {
            obj.insert("allowEmptyValue".to_string(), json!(allow_empty));
        }
        if let Some(example) = &self.example {
            obj.insert("x-example".to_string(), json!(example));
        }
        Value::Object(obj)
    }
}
