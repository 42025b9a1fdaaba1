#![deny(missing_docs)]

//! # Type Introspection
//!
//! Derives named models from types that describe their own shape.
//!
//! Types opt in by implementing [`Describe`], usually through the
//! [`describe_object!`](crate::describe_object) and
//! [`describe_enum!`](crate::describe_enum) macros. Standard library
//! primitives, collections and maps are described here.

mod primitives;

pub use primitives::Bytes;

use crate::ignore::IgnorePolicy;
use crate::swagger::model::Model;
use crate::swagger::property::{Primitive, Property, PropertyKind};
use indexmap::IndexMap;
use serde_json::Value;
use std::any::TypeId;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Strips the module path and generic arguments from a type path.
///
/// `alloc::vec::Vec<thor::Shield>` becomes `Vec`.
pub fn simple_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// A type that can describe its own schema shape.
pub trait Describe: 'static {
    /// Definition name. Defaults to the simple type name.
    fn type_name() -> String {
        simple_name(std::any::type_name::<Self>())
    }

    /// Shape of the type.
    fn shape() -> Shape;

    /// Identity used for cycle detection and ignore matching.
    fn identity() -> TypeId {
        TypeId::of::<Self>()
    }

    /// Whether a field of this type may be absent.
    fn optional() -> bool {
        false
    }
}

/// A copyable handle onto a [`Describe`] implementation.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: fn() -> TypeId,
    name: fn() -> String,
    shape: fn() -> Shape,
    optional: fn() -> bool,
}

impl TypeRef {
    /// Handle for `T`.
    pub fn of<T: Describe>() -> Self {
        Self {
            id: T::identity,
            name: T::type_name,
            shape: T::shape,
            optional: T::optional,
        }
    }

    /// Type identity.
    pub fn id(&self) -> TypeId {
        (self.id)()
    }

    /// Definition name.
    pub fn name(&self) -> String {
        (self.name)()
    }

    /// Shape.
    pub fn shape(&self) -> Shape {
        (self.shape)()
    }

    /// Whether the type may be absent.
    pub fn is_optional(&self) -> bool {
        (self.optional)()
    }

    /// Whether the type derives to a named definition.
    pub fn is_object(&self) -> bool {
        matches!(self.shape(), Shape::Object(_))
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.name())
    }
}

/// The closed set of field kinds.
#[derive(Debug, Clone)]
pub enum Shape {
    /// String enumeration with the member names.
    Enum(Vec<String>),
    /// Boolean.
    Boolean,
    /// Raw bytes.
    ByteArray,
    /// Calendar date.
    Date,
    /// Timestamp.
    DateTime,
    /// Arbitrary precision number.
    Decimal,
    /// 64-bit float.
    Double,
    /// 32-bit float.
    Float,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Long,
    /// Text.
    String,
    /// UUID.
    Uuid,
    /// Sequence or set of one element type.
    Collection(TypeRef),
    /// String-keyed map of one value type.
    Map(TypeRef),
    /// Uploaded file.
    File,
    /// Structured type with named fields.
    Object(Vec<Field>),
    /// Any JSON value.
    Untyped,
}

/// One field of an object type.
#[derive(Debug, Clone)]
pub struct Field {
    /// Wire name.
    pub name: String,
    /// Field type.
    pub ty: TypeRef,
    /// Markers an ignore policy may match on.
    pub markers: Vec<String>,
    /// Description.
    pub description: Option<String>,
}

impl Field {
    /// A field named `name` of type `ty`.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            markers: Vec::new(),
            description: None,
        }
    }

    /// Attaches a marker.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.push(marker.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The object type reached through `ty`, if it derives to a definition.
///
/// Collections and maps are followed to their element / value type.
pub fn referenceable_target(ty: TypeRef) -> Option<TypeRef> {
    match ty.shape() {
        Shape::Object(_) => Some(ty),
        Shape::Collection(inner) | Shape::Map(inner) => referenceable_target(inner),
        _ => None,
    }
}

/// Maps a type to its inline property.
///
/// Object types become references to `#/definitions/{name}`.
pub fn property_for(ty: TypeRef) -> Property {
    match ty.shape() {
        Shape::Enum(values) => Property::enumeration(values),
        Shape::Boolean => Property::primitive(Primitive::Boolean),
        Shape::ByteArray => Property::primitive(Primitive::ByteArray),
        Shape::Date => Property::primitive(Primitive::Date),
        Shape::DateTime => Property::primitive(Primitive::DateTime),
        Shape::Decimal => Property::primitive(Primitive::Decimal),
        Shape::Double => Property::primitive(Primitive::Double),
        Shape::Float => Property::primitive(Primitive::Float),
        Shape::Integer => Property::primitive(Primitive::Integer),
        Shape::Long => Property::primitive(Primitive::Long),
        Shape::String => Property::primitive(Primitive::String),
        Shape::Uuid => Property::primitive(Primitive::Uuid),
        Shape::File => Property::primitive(Primitive::File),
        Shape::Untyped => Property::primitive(Primitive::Untyped),
        Shape::Collection(element) => {
            warn_if_untyped(ty, element);
            Property::array(property_for(element))
        }
        Shape::Map(value) => {
            warn_if_untyped(ty, value);
            Property::map(property_for(value))
        }
        Shape::Object(_) => Property::reference(ty.name()),
    }
}

fn warn_if_untyped(container: TypeRef, element: TypeRef) {
    if matches!(element.shape(), Shape::Untyped) {
        tracing::warn!(
            container = %container.name(),
            "element type is untyped, falling back to a generic object schema"
        );
    }
}

/// Derives a property from a literal JSON value.
///
/// Object values become inline object properties. Returns `None` for `null`.
pub fn property_from_json(value: &Value) -> Option<Property> {
    match value {
        Value::Null => None,
        Value::Bool(_) => Some(Property::primitive(Primitive::Boolean)),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(Property::primitive(Primitive::Long)),
        Value::Number(_) => Some(Property::primitive(Primitive::Double)),
        Value::String(_) => Some(Property::primitive(Primitive::String)),
        Value::Array(items) => {
            let item = items
                .iter()
                .filter_map(property_from_json)
                .reduce(merge_items)
                .unwrap_or_else(|| Property::primitive(Primitive::Untyped));
            Some(Property::array(item))
        }
        Value::Object(map) => {
            let mut properties = IndexMap::new();
            for (key, v) in map {
                if let Some(p) = property_from_json(v) {
                    properties.insert(key.clone(), p);
                }
            }
            Some(Property::object(properties))
        }
    }
}

/// Folds the properties of object elements into one item schema.
///
/// Later elements win on shared keys; any non-object element ends the merge.
fn merge_items(item: Property, next: Property) -> Property {
    match (item, next) {
        (
            Property {
                kind: PropertyKind::Object {
                    mut properties,
                    required,
                },
                meta,
            },
            Property {
                kind: PropertyKind::Object { properties: more, .. },
                ..
            },
        ) => {
            properties.extend(more);
            Property {
                kind: PropertyKind::Object {
                    properties,
                    required,
                },
                meta,
            }
        }
        (item, _) => item,
    }
}

/// Walks object types and produces their definitions.
///
/// One introspector can derive several roots. Types already being derived
/// are never entered twice, so cyclic type graphs terminate with references.
pub struct Introspector<'a> {
    ignore: &'a dyn IgnorePolicy,
    in_progress: HashSet<TypeId>,
}

impl<'a> Introspector<'a> {
    /// Creates an introspector bound to an ignore policy.
    pub fn new(ignore: &'a dyn IgnorePolicy) -> Self {
        Self {
            ignore,
            in_progress: HashSet::new(),
        }
    }

    /// Derives `ty` and every object type it references.
    ///
    /// Returns an empty map for enums, primitives, collections and maps.
    pub fn derive(&mut self, ty: TypeRef) -> IndexMap<String, Model> {
        let mut out = IndexMap::new();
        self.derive_into(ty, &mut out);
        out
    }

    fn derive_into(&mut self, ty: TypeRef, out: &mut IndexMap<String, Model>) {
        let fields = match ty.shape() {
            Shape::Object(fields) => fields,
            _ => return,
        };
        let name = ty.name();
        if out.contains_key(&name) || !self.in_progress.insert(ty.id()) {
            return;
        }

        let mut model = Model::object().with_type_handle(ty);
        model.name = Some(name.clone());
        let mut nested = Vec::new();

        for field in fields {
            if self.ignore.ignored_field(&name, &field) || self.ignore.ignored_by_marker(&field) {
                tracing::trace!(owner = %name, field = %field.name, "field ignored");
                continue;
            }
            let required = !field.ty.is_optional();
            let mut property = property_for(field.ty);
            property.meta.required = required;
            if let Some(desc) = &field.description {
                property.meta.description = Some(desc.clone());
            }
            model = model.with_property(field.name.clone(), property, required);
            if let Some(target) = referenceable_target(field.ty) {
                nested.push(target);
            }
        }

        out.insert(name, model);
        for target in nested {
            self.derive_into(target, out);
        }
        self.in_progress.remove(&ty.id());
    }
}

/// Implements [`Describe`] for a struct by listing its fields.
///
/// Each field may carry a bracketed list of markers for ignore policies.
///
/// ```ignore
/// describe_object!(Shield {
///     id: String,
///     network: Network,
///     secret: String ["internal"],
/// });
/// ```
#[macro_export]
macro_rules! describe_object {
    ($ty:ty { $($field:ident : $fty:ty $([ $($marker:expr),* $(,)? ])?),* $(,)? }) => {
        impl $crate::introspect::Describe for $ty {
            fn shape() -> $crate::introspect::Shape {
                $crate::introspect::Shape::Object(vec![
                    $(
                        $crate::introspect::Field::new(
                            stringify!($field),
                            $crate::introspect::TypeRef::of::<$fty>(),
                        )
                        $($(.with_marker($marker))*)?
                    ),*
                ])
            }
        }
    };
}

/// Implements [`Describe`] for a fieldless enum as a string enumeration.
#[macro_export]
macro_rules! describe_enum {
    ($ty:ty { $($variant:ident),* $(,)? }) => {
        impl $crate::introspect::Describe for $ty {
            fn shape() -> $crate::introspect::Shape {
                $crate::introspect::Shape::Enum(vec![$(stringify!($variant).to_string()),*])
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ignore::{IgnoreSpec, NoIgnores};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[allow(dead_code)]
    struct Leaf {
        label: String,
        weight: f64,
    }
    crate::describe_object!(Leaf {
        label: String,
        weight: f64,
    });

    #[allow(dead_code)]
    struct Branch {
        leaves: Vec<Leaf>,
        by_name: HashMap<String, Leaf>,
        parent: Option<Box<Branch>>,
        token: String,
    }
    crate::describe_object!(Branch {
        leaves: Vec<Leaf>,
        by_name: HashMap<String, Leaf>,
        parent: Option<Box<Branch>>,
        token: String ["secret"],
    });

    #[allow(dead_code)]
    enum Colour {
        Red,
        Green,
    }
    crate::describe_enum!(Colour { Red, Green });

    #[test]
    fn test_simple_name_strips_paths_and_generics() {
        assert_eq!(simple_name("alloc::vec::Vec<thor::Shield>"), "Vec");
        assert_eq!(simple_name("thor::Shield"), "Shield");
        assert_eq!(simple_name("Shield"), "Shield");
    }

    #[test]
    fn test_primitive_types_derive_nothing() {
        let mut introspector = Introspector::new(&NoIgnores);
        assert!(introspector.derive(TypeRef::of::<String>()).is_empty());
        assert!(introspector.derive(TypeRef::of::<i64>()).is_empty());
        assert!(introspector.derive(TypeRef::of::<Colour>()).is_empty());
        assert!(introspector.derive(TypeRef::of::<Vec<Leaf>>()).is_empty());
    }

    #[test]
    fn test_leaf_derives_one_definition() {
        let mut introspector = Introspector::new(&NoIgnores);
        let defs = introspector.derive(TypeRef::of::<Leaf>());
        assert_eq!(defs.keys().collect::<Vec<_>>(), vec!["Leaf"]);
        let leaf = &defs["Leaf"];
        assert_eq!(leaf.required, vec!["label".to_string(), "weight".to_string()]);
        assert_eq!(leaf.properties["weight"].format(), Some("double"));
    }

    #[test]
    fn test_self_reference_terminates() {
        let mut introspector = Introspector::new(&NoIgnores);
        let defs = introspector.derive(TypeRef::of::<Branch>());
        assert_eq!(defs.keys().collect::<Vec<_>>(), vec!["Branch", "Leaf"]);

        let branch = &defs["Branch"];
        assert_eq!(
            branch.properties["parent"].as_reference().map(|r| r.as_str()),
            Some("#/definitions/Branch")
        );
        assert!(!branch.required.contains(&"parent".to_string()));
        match &branch.properties["by_name"].kind {
            PropertyKind::Map(values) => {
                assert_eq!(values.as_reference().map(|r| r.simple_name()), Some("Leaf"))
            }
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_marker_ignored_field_is_skipped() {
        let spec = IgnoreSpec::new().ignore_marker("secret");
        let mut introspector = Introspector::new(&spec);
        let defs = introspector.derive(TypeRef::of::<Branch>());
        assert!(!defs["Branch"].properties.contains_key("token"));
    }

    #[test]
    fn test_enum_property() {
        let prop = property_for(TypeRef::of::<Colour>());
        assert_eq!(prop.meta.enum_values, vec!["Red".to_string(), "Green".to_string()]);
    }

    #[test]
    fn test_untyped_elements_fall_back_to_object() {
        assert_eq!(
            property_for(TypeRef::of::<Vec<Value>>()).to_json(),
            serde_json::json!({ "type": "array", "items": { "type": "object" } })
        );
        assert_eq!(
            property_for(TypeRef::of::<HashMap<String, Value>>()).to_json(),
            serde_json::json!({ "type": "object", "additionalProperties": { "type": "object" } })
        );
        assert!(referenceable_target(TypeRef::of::<Vec<Value>>()).is_none());
    }

    #[test]
    fn test_array_items_merge_object_fields() {
        let prop = property_from_json(&serde_json::json!([{ "a": 1 }, null, { "b": true }]));
        assert_eq!(
            prop.map(|p| p.to_json()),
            Some(serde_json::json!({
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "a": { "type": "integer", "format": "int64" },
                        "b": { "type": "boolean" }
                    }
                }
            }))
        );
    }

    #[test]
    fn test_property_from_json() {
        let prop = property_from_json(&serde_json::json!({ "a": 1, "b": [true] }));
        let json = prop.map(|p| p.to_json());
        assert_eq!(
            json,
            Some(serde_json::json!({
                "type": "object",
                "properties": {
                    "a": { "type": "integer", "format": "int64" },
                    "b": { "type": "array", "items": { "type": "boolean" } }
                }
            }))
        );
    }
}
