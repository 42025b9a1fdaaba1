#![deny(missing_docs)]

//! # Property / Model Conversion
//!
//! Maps named models to inline properties and back.

use crate::swagger::model::{Model, ModelKind};
use crate::swagger::property::{Primitive, Property, PropertyKind, PropertyMeta};
use indexmap::IndexMap;

/// Converts a model into an inline property.
pub fn model_to_property(model: &Model) -> Property {
    if let ModelKind::Object {
        additional_properties: Some(values),
    } = &model.kind
    {
        let mut property = Property::map((**values).clone());
        property.meta = meta_from(model);
        property.meta.required = model
            .name
            .as_ref()
            .map(|name| model.required.contains(name))
            .unwrap_or(false);
        return property;
    }

    let kind = match &model.kind {
        ModelKind::Object { .. } => {
            let primitive = model
                .type_tag
                .as_deref()
                .and_then(|tag| Primitive::from_tag(tag, model.format.as_deref()));
            match primitive {
                Some(p) => PropertyKind::Primitive(p),
                None => PropertyKind::Object {
                    properties: model.properties.clone(),
                    required: model.required.clone(),
                },
            }
        }
        ModelKind::Array(array) => PropertyKind::Array(array.clone()),
        ModelKind::Ref(r) => PropertyKind::Ref(r.clone()),
        ModelKind::Composed(members) => compose(members),
    };

    Property {
        kind,
        meta: meta_from(model),
    }
}

fn meta_from(model: &Model) -> PropertyMeta {
    PropertyMeta {
        name: model.name.clone(),
        title: model.title.clone(),
        description: model.description.clone(),
        format: model.format.clone(),
        default: model.default.clone(),
        example: model.example.clone(),
        enum_values: model.enum_values.clone(),
        required: false,
        allow_empty_value: model.allow_empty_value,
        extensions: model.extensions.clone(),
    }
}

fn compose(members: &[Model]) -> PropertyKind {
    let mut properties = IndexMap::new();
    let mut required: Vec<String> = Vec::new();
    for member in members {
        match &member.kind {
            ModelKind::Ref(r) => {
                properties.insert(
                    r.simple_name().to_string(),
                    Property::new(PropertyKind::Ref(r.clone())),
                );
            }
            _ => {
                for (name, property) in &member.properties {
                    properties.insert(name.clone(), property.clone());
                }
            }
        }
        for name in &member.required {
            if !required.contains(name) {
                required.push(name.clone());
            }
        }
    }
    PropertyKind::Object {
        properties,
        required,
    }
}

/// Converts an inline property into a model.
pub fn property_to_model(property: &Property) -> Model {
    let meta = &property.meta;
    let mut model = match &property.kind {
        PropertyKind::Ref(r) => {
            let mut model = Model::reference(r.as_str());
            model.title = meta.title.clone();
            model.example = meta.example.clone();
            model.extensions = meta.extensions.clone();
            return model;
        }
        PropertyKind::Array(array) => {
            let mut model = Model::array((*array.items).clone());
            if let ModelKind::Array(schema) = &mut model.kind {
                *schema = array.clone();
            }
            model.description = meta.description.clone();
            model.title = meta.title.clone();
            model.example = meta.example.clone();
            model.extensions = meta.extensions.clone();
            return model;
        }
        PropertyKind::Map(values) => Model::map((**values).clone()),
        PropertyKind::Object {
            properties,
            required,
        } => {
            let mut model = Model::object();
            model.properties = properties.clone();
            model.required = required.clone();
            model
        }
        PropertyKind::Primitive(_) => {
            let mut model = Model::object();
            model.type_tag = property.type_tag().map(str::to_string);
            model
        }
    };

    model.description = meta.description.clone();
    model.example = meta.example.clone();
    model.title = meta.title.clone();
    model.name = meta.name.clone();
    model.format = property.format().map(str::to_string);
    model.default = meta.default.clone();
    model.enum_values = meta.enum_values.clone();
    model.allow_empty_value = meta.allow_empty_value;
    model.extensions = meta.extensions.clone();
    model
}
