#![deny(missing_docs)]

//! # Swagger 2.0 Wire Model
//!
//! Typed representation of the document graph and its JSON / YAML rendering.

pub mod definitions;
pub mod document;
pub mod model;
pub mod parameter;
pub mod property;

pub use definitions::Definitions;
pub use document::{
    Contact, Document, Example, ExternalDocs, HttpMethod, Info, License, Operation, PathItem,
    Response, Scheme, SecurityRequirement, SecurityScheme, Tag,
};
pub use model::{Model, ModelKind};
pub use parameter::{Parameter, ParameterLocation, ParameterSchema};
pub use property::{
    ArraySchema, Primitive, Property, PropertyKind, PropertyMeta, Reference, DEFINITIONS_PREFIX,
};

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Copies `x-` prefixed entries into the target object.
pub(crate) fn insert_extensions(target: &mut Map<String, Value>, extensions: &BTreeMap<String, Value>) {
    for (key, value) in extensions {
        if key.starts_with("x-") {
            target.insert(key.clone(), value.clone());
        }
    }
}
