#![deny(missing_docs)]

//! # Properties
//!
//! Inline schema fragments attached to models, parameters and responses.

use crate::swagger::insert_extensions;
use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// JSON Pointer prefix for entries of the definitions registry.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Primitive value kinds with a fixed `type` / `format` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `string`
    String,
    /// `integer` / `int32`
    Integer,
    /// `integer` / `int64`
    Long,
    /// `number` / `float`
    Float,
    /// `number` / `double`
    Double,
    /// `number` without a format.
    Decimal,
    /// `boolean`
    Boolean,
    /// `string` / `byte`
    ByteArray,
    /// `string` / `date`
    Date,
    /// `string` / `date-time`
    DateTime,
    /// `string` / `uuid`
    Uuid,
    /// `file`
    File,
    /// Untyped value, rendered as a bare `object`.
    Untyped,
}

impl Primitive {
    /// The `type` member emitted for this primitive.
    pub fn type_tag(self) -> &'static str {
        match self {
            Primitive::String
            | Primitive::ByteArray
            | Primitive::Date
            | Primitive::DateTime
            | Primitive::Uuid => "string",
            Primitive::Integer | Primitive::Long => "integer",
            Primitive::Float | Primitive::Double | Primitive::Decimal => "number",
            Primitive::Boolean => "boolean",
            Primitive::File => "file",
            Primitive::Untyped => "object",
        }
    }

    /// The `format` member emitted for this primitive, if any.
    pub fn default_format(self) -> Option<&'static str> {
        match self {
            Primitive::Integer => Some("int32"),
            Primitive::Long => Some("int64"),
            Primitive::Float => Some("float"),
            Primitive::Double => Some("double"),
            Primitive::ByteArray => Some("byte"),
            Primitive::Date => Some("date"),
            Primitive::DateTime => Some("date-time"),
            Primitive::Uuid => Some("uuid"),
            _ => None,
        }
    }

    /// Resolves a primitive from a `type` / `format` pair.
    ///
    /// Returns `None` for `object`, `array` and unknown tags.
    pub fn from_tag(type_tag: &str, format: Option<&str>) -> Option<Self> {
        match (type_tag, format) {
            ("string", Some("byte")) => Some(Primitive::ByteArray),
            ("string", Some("date")) => Some(Primitive::Date),
            ("string", Some("date-time")) => Some(Primitive::DateTime),
            ("string", Some("uuid")) => Some(Primitive::Uuid),
            ("string", _) => Some(Primitive::String),
            ("integer", Some("int64")) => Some(Primitive::Long),
            ("integer", _) => Some(Primitive::Integer),
            ("number", Some("float")) => Some(Primitive::Float),
            ("number", Some("double")) => Some(Primitive::Double),
            ("number", _) => Some(Primitive::Decimal),
            ("boolean", _) => Some(Primitive::Boolean),
            ("file", _) => Some(Primitive::File),
            _ => None,
        }
    }
}

/// A symbolic pointer at a definition (`#/definitions/{name}`).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Reference(String);

impl Reference {
    /// Creates a reference. Bare names are expanded to `#/definitions/{name}`.
    pub fn new(target: impl Into<String>) -> Self {
        let target = target.into();
        if target.starts_with('#') || target.contains('/') {
            Self(target)
        } else {
            Self(format!("{}{}", DEFINITIONS_PREFIX, target))
        }
    }

    /// Returns the full `$ref` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last pointer segment (the definition name for local refs).
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns the definition name if this points into `#/definitions/`.
    pub fn definition_name(&self) -> Option<&str> {
        self.0.strip_prefix(DEFINITIONS_PREFIX)
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reference({:?})", self.0)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata shared by every property variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMeta {
    /// Property name, when the property is known by one.
    pub name: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Format override. Falls back to the primitive's default format.
    pub format: Option<String>,
    /// Default value.
    pub default: Option<Value>,
    /// Example value.
    pub example: Option<Value>,
    /// Allowed values (string enums).
    pub enum_values: Vec<String>,
    /// Whether the owning schema lists this property as required.
    pub required: bool,
    /// `allowEmptyValue`.
    pub allow_empty_value: Option<bool>,
    /// Vendor extensions (`x-...`).
    pub extensions: BTreeMap<String, Value>,
}

/// Array item schema plus cardinality constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    /// Item schema.
    pub items: Box<Property>,
    /// `minItems`.
    pub min_items: Option<u64>,
    /// `maxItems`.
    pub max_items: Option<u64>,
    /// `uniqueItems`.
    pub unique_items: Option<bool>,
}

impl ArraySchema {
    /// Wraps an item schema without constraints.
    pub fn of(items: Property) -> Self {
        Self {
            items: Box::new(items),
            min_items: None,
            max_items: None,
            unique_items: None,
        }
    }

    pub(crate) fn insert_into(&self, obj: &mut Map<String, Value>) {
        obj.insert("items".to_string(), self.items.to_json());
        if let Some(min) = self.min_items {
            obj.insert("minItems".to_string(), json!(min));
        }
        if let Some(max) = self.max_items {
            obj.insert("maxItems".to_string(), json!(max));
        }
        if let Some(unique) = self.unique_items {
            obj.insert("uniqueItems".to_string(), json!(unique));
        }
    }
}

/// The closed set of property shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    /// A primitive value.
    Primitive(Primitive),
    /// An array of one item schema.
    Array(ArraySchema),
    /// A string-keyed map with one value schema (`additionalProperties`).
    Map(Box<Property>),
    /// A pointer at a registered definition.
    Ref(Reference),
    /// An inline object.
    Object {
        /// Nested properties.
        properties: IndexMap<String, Property>,
        /// Names of required nested properties.
        required: Vec<String>,
    },
}

/// An inline schema fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Shape of the property.
    pub kind: PropertyKind,
    /// Shared metadata.
    pub meta: PropertyMeta,
}

impl Property {
    /// Creates a property with empty metadata.
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            meta: PropertyMeta::default(),
        }
    }

    /// A primitive property.
    pub fn primitive(primitive: Primitive) -> Self {
        Self::new(PropertyKind::Primitive(primitive))
    }

    /// A string property restricted to the given values.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut property = Self::primitive(Primitive::String);
        property.meta.enum_values = values.into_iter().map(Into::into).collect();
        property
    }

    /// An array property.
    pub fn array(items: Property) -> Self {
        Self::new(PropertyKind::Array(ArraySchema::of(items)))
    }

    /// A map property whose values follow `values`.
    pub fn map(values: Property) -> Self {
        Self::new(PropertyKind::Map(Box::new(values)))
    }

    /// A reference property.
    pub fn reference(target: impl Into<String>) -> Self {
        Self::new(PropertyKind::Ref(Reference::new(target)))
    }

    /// An inline object property.
    pub fn object(properties: IndexMap<String, Property>) -> Self {
        Self::new(PropertyKind::Object {
            properties,
            required: Vec::new(),
        })
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.meta.name = Some(name.into());
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }

    /// Sets the example.
    pub fn with_example(mut self, example: Value) -> Self {
        self.meta.example = Some(example);
        self
    }

    /// Adds a vendor extension. Keys without the `x-` prefix are ignored.
    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key.starts_with("x-") {
            self.meta.extensions.insert(key, value);
        }
        self
    }

    /// The `type` member of this property, `None` for references.
    pub fn type_tag(&self) -> Option<&'static str> {
        match &self.kind {
            PropertyKind::Primitive(p) => Some(p.type_tag()),
            PropertyKind::Array(_) => Some("array"),
            PropertyKind::Map(_) | PropertyKind::Object { .. } => Some("object"),
            PropertyKind::Ref(_) => None,
        }
    }

    /// The effective format (explicit override first, then the primitive default).
    pub fn format(&self) -> Option<&str> {
        if let Some(format) = self.meta.format.as_deref() {
            return Some(format);
        }
        match &self.kind {
            PropertyKind::Primitive(p) => p.default_format(),
            _ => None,
        }
    }

    /// Returns the reference if this is a reference property.
    pub fn as_reference(&self) -> Option<&Reference> {
        match &self.kind {
            PropertyKind::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// Collects every reference reachable from this property.
    pub fn collect_references<'a>(&'a self, out: &mut Vec<&'a Reference>) {
        match &self.kind {
            PropertyKind::Ref(r) => out.push(r),
            PropertyKind::Array(array) => array.items.collect_references(out),
            PropertyKind::Map(values) => values.collect_references(out),
            PropertyKind::Object { properties, .. } => {
                for property in properties.values() {
                    property.collect_references(out);
                }
            }
            PropertyKind::Primitive(_) => {}
        }
    }

    /// Renders the property as a Swagger 2.0 schema object.
    pub fn to_json(&self) -> Value {
        if let PropertyKind::Ref(r) = &self.kind {
            return json!({ "$ref": r.as_str() });
        }

        let mut obj = Map::new();
        if let Some(tag) = self.type_tag() {
            obj.insert("type".to_string(), json!(tag));
        }
        if let Some(format) = self.format() {
            obj.insert("format".to_string(), json!(format));
        }
        self.insert_common(&mut obj);

        match &self.kind {
            PropertyKind::Array(array) => array.insert_into(&mut obj),
            PropertyKind::Map(values) => {
                obj.insert("additionalProperties".to_string(), values.to_json());
            }
            PropertyKind::Object {
                properties,
                required,
            } => {
                if !properties.is_empty() {
                    obj.insert("properties".to_string(), properties_json(properties));
                }
                if !required.is_empty() {
                    obj.insert("required".to_string(), json!(required));
                }
            }
            PropertyKind::Primitive(_) | PropertyKind::Ref(_) => {}
        }

        Value::Object(obj)
    }

    /// Writes the shared metadata members (everything except type/format/shape).
    fn insert_common(&self, obj: &mut Map<String, Value>) {
        let meta = &self.meta;
        if let Some(title) = &meta.title {
            obj.insert("title".to_string(), json!(title));
        }
        if let Some(desc) = &meta.description {
            obj.insert("description".to_string(), json!(desc));
        }
        if let Some(default) = &meta.default {
            obj.insert("default".to_string(), default.clone());
        }
        if !meta.enum_values.is_empty() {
            obj.insert("enum".to_string(), json!(meta.enum_values));
        }
        if let Some(example) = &meta.example {
            obj.insert("example".to_string(), example.clone());
        }
        if let Some(allow_empty) = meta.allow_empty_value {
            obj.insert("allowEmptyValue".to_string(), json!(allow_empty));
        }
        insert_extensions(obj, &meta.extensions);
    }
}

/// Renders a property map as a JSON object in declaration order.
pub(crate) fn properties_json(properties: &IndexMap<String, Property>) -> Value {
    let mut obj = Map::new();
    for (name, property) in properties {
        obj.insert(name.clone(), property.to_json());
    }
    Value::Object(obj)
}
