#![deny(missing_docs)]

//! # Models
//!
//! Named schema objects (`definitions` entries and body schemas).

use crate::introspect::TypeRef;
use crate::swagger::insert_extensions;
use crate::swagger::property::{properties_json, ArraySchema, Property, Reference};
use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Shape of a model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelKind {
    /// A plain object, optionally with a map-style value schema.
    Object {
        /// `additionalProperties` schema.
        additional_properties: Option<Box<Property>>,
    },
    /// An array of one item schema.
    Array(ArraySchema),
    /// A pointer at another definition.
    Ref(Reference),
    /// An `allOf` composition.
    Composed(Vec<Model>),
}

/// A standalone named schema object.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Shape.
    pub kind: ModelKind,
    /// Name used when the model came from a named property.
    pub name: Option<String>,
    /// Title. Registry key for explicitly supplied models.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Explicit `type` tag for non-object models.
    pub type_tag: Option<String>,
    /// Format.
    pub format: Option<String>,
    /// Example value.
    pub example: Option<Value>,
    /// Default value.
    pub default: Option<Value>,
    /// `allowEmptyValue`.
    pub allow_empty_value: Option<bool>,
    /// Allowed values.
    pub enum_values: Vec<String>,
    /// Object properties in declaration order.
    pub properties: IndexMap<String, Property>,
    /// Names of required properties.
    pub required: Vec<String>,
    /// Vendor extensions.
    pub extensions: BTreeMap<String, Value>,
    /// Type the model was derived from, if any. Not rendered.
    pub type_handle: Option<TypeRef>,
}

impl Model {
    fn with_kind(kind: ModelKind) -> Self {
        Self {
            kind,
            name: None,
            title: None,
            description: None,
            type_tag: None,
            format: None,
            example: None,
            default: None,
            allow_empty_value: None,
            enum_values: Vec::new(),
            properties: IndexMap::new(),
            required: Vec::new(),
            extensions: BTreeMap::new(),
            type_handle: None,
        }
    }

    /// An empty object model.
    pub fn object() -> Self {
        Self::with_kind(ModelKind::Object {
            additional_properties: None,
        })
    }

    /// A map model whose values follow `values`.
    pub fn map(values: Property) -> Self {
        Self::with_kind(ModelKind::Object {
            additional_properties: Some(Box::new(values)),
        })
    }

    /// An array model.
    pub fn array(items: Property) -> Self {
        Self::with_kind(ModelKind::Array(ArraySchema::of(items)))
    }

    /// A reference model.
    pub fn reference(target: impl Into<String>) -> Self {
        Self::with_kind(ModelKind::Ref(Reference::new(target)))
    }

    /// An `allOf` model.
    pub fn composed(members: Vec<Model>) -> Self {
        Self::with_kind(ModelKind::Composed(members))
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the example.
    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    /// Adds a property, marking it required when `required` is set.
    pub fn with_property(mut self, name: impl Into<String>, property: Property, required: bool) -> Self {
        let name = name.into();
        if required && !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, property);
        self
    }

    /// Adds a vendor extension. Keys without the `x-` prefix are ignored.
    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key.starts_with("x-") {
            self.extensions.insert(key, value);
        }
        self
    }

    /// Records the originating type.
    pub fn with_type_handle(mut self, ty: TypeRef) -> Self {
        self.type_handle = Some(ty);
        self
    }

    /// Returns the reference if this is a reference model.
    pub fn as_reference(&self) -> Option<&Reference> {
        match &self.kind {
            ModelKind::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// Collects every reference reachable from this model.
    pub fn collect_references<'a>(&'a self, out: &mut Vec<&'a Reference>) {
        match &self.kind {
            ModelKind::Ref(r) => out.push(r),
            ModelKind::Array(array) => array.items.collect_references(out),
            ModelKind::Object {
                additional_properties: Some(values),
            } => values.collect_references(out),
            ModelKind::Object { .. } => {}
            ModelKind::Composed(members) => {
                for member in members {
                    member.collect_references(out);
                }
            }
        }
        for property in self.properties.values() {
            property.collect_references(out);
        }
    }

    /// Renders the model as a Swagger 2.0 schema object.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        match &self.kind {
            ModelKind::Ref(r) => {
                obj.insert("$ref".to_string(), json!(r.as_str()));
                return Value::Object(obj);
            }
            ModelKind::Composed(members) => {
                let all_of: Vec<Value> = members.iter().map(Model::to_json).collect();
                obj.insert("allOf".to_string(), Value::Array(all_of));
            }
            ModelKind::Array(_) => {
                obj.insert("type".to_string(), json!("array"));
            }
            ModelKind::Object { .. } => {
                let tag = self.type_tag.as_deref().unwrap_or("object");
                obj.insert("type".to_string(), json!(tag));
            }
        }

        if let Some(format) = &self.format {
            obj.insert("format".to_string(), json!(format));
        }
        if let Some(title) = &self.title {
            obj.insert("title".to_string(), json!(title));
        }
        if let Some(desc) = &self.description {
            obj.insert("description".to_string(), json!(desc));
        }
        if let Some(default) = &self.default {
            obj.insert("default".to_string(), default.clone());
        }
        if !self.enum_values.is_empty() {
            obj.insert("enum".to_string(), json!(self.enum_values));
        }
        if !self.required.is_empty() {
            obj.insert("required".to_string(), json!(self.required));
        }
        if !self.properties.is_empty() {
            obj.insert("properties".to_string(), properties_json(&self.properties));
        }
        match &self.kind {
            ModelKind::Array(array) => array.insert_into(&mut obj),
            ModelKind::Object {
                additional_properties: Some(values),
            } => {
                obj.insert("additionalProperties".to_string(), values.to_json());
            }
            _ => {}
        }
        if let Some(example) = &self.example {
            obj.insert("example".to_string(), example.clone());
        }
        if let Some(allow_empty) = self.allow_empty_value {
            obj.insert("allowEmptyValue".to_string(), json!(allow_empty));
        }
        insert_extensions(&mut obj, &self.extensions);

        Value::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swagger::property::Primitive;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_object_model_json() {
        let model = Model::object()
            .with_property("id", Property::primitive(Primitive::String), true)
            .with_property("nodes", Property::primitive(Primitive::Integer), true)
            .with_extension("x-internal", json!(false));

        assert_eq!(
            model.to_json(),
            json!({
                "type": "object",
                "required": ["id", "nodes"],
                "properties": {
                    "id": { "type": "string" },
                    "nodes": { "type": "integer", "format": "int32" }
                },
                "x-internal": false
            })
        );
    }

    #[test]
    fn test_ref_model_renders_only_ref() {
        let model = Model::reference("Shield").with_title("ignored");
        assert_eq!(model.to_json(), json!({ "$ref": "#/definitions/Shield" }));
    }

    #[test]
    fn test_composed_model_json() {
        let model = Model::composed(vec![
            Model::reference("Base"),
            Model::object().with_property("extra", Property::primitive(Primitive::Boolean), false),
        ]);
        assert_eq!(
            model.to_json(),
            json!({
                "allOf": [
                    { "$ref": "#/definitions/Base" },
                    { "type": "object", "properties": { "extra": { "type": "boolean" } } }
                ]
            })
        );
    }

    #[test]
    fn test_map_model_json() {
        let model = Model::map(Property::reference("Shield"));
        assert_eq!(
            model.to_json(),
            json!({
                "type": "object",
                "additionalProperties": { "$ref": "#/definitions/Shield" }
            })
        );
        let mut refs = Vec::new();
        model.collect_references(&mut refs);
        assert_eq!(refs.len(), 1);
    }
}
