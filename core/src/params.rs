#![deny(missing_docs)]

//! # Path & Parameter Mapping
//!
//! Rewrites route templates (`/shield/:id`) into Swagger placeholders
//! (`/shield/{id}`) and turns declared parameters into parameter objects.

use crate::descriptor::ParameterDescriptor;
use crate::error::{AppError, AppResult};
use crate::introspect::{Shape, TypeRef};
use crate::swagger::parameter::{Parameter, ParameterLocation};
use crate::swagger::property::{Primitive, Property};
use percent_encoding::percent_decode_str;
use regex::Regex;

/// One segment of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    /// Literal segment.
    Literal(String),
    /// Named placeholder (sigil or braces stripped).
    Placeholder(String),
}

/// Splits a route template into non-empty segments.
pub fn tokenize(raw: &str) -> Vec<PathToken> {
    raw.split('/')
        .filter(|segment| !segment.is_empty())
        .map(classify)
        .collect()
}

/// A sigil without a name (`:` or `{}`) stays a literal segment.
fn classify(segment: &str) -> PathToken {
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    let name = decoded
        .strip_prefix(':')
        .or_else(|| decoded.strip_prefix('{').and_then(|s| s.strip_suffix('}')));
    match name {
        Some(name) if !name.is_empty() => PathToken::Placeholder(name.to_string()),
        _ => PathToken::Literal(segment.to_string()),
    }
}

/// Rebuilds `raw` with `{name}` placeholders. Empty templates become `/`.
pub fn format_template(raw: &str) -> String {
    let mut out = String::new();
    for token in tokenize(raw) {
        out.push('/');
        match token {
            PathToken::Literal(literal) => out.push_str(&literal),
            PathToken::Placeholder(name) => {
                out.push('{');
                out.push_str(&name);
                out.push('}');
            }
        }
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Builds the path and query parameters of one operation.
///
/// Path parameters follow placeholder order and are always required.
/// Placeholders without a declaration become required string parameters.
/// Query declarations follow in declaration order.
pub fn derive_parameters(
    raw: &str,
    declared: &[ParameterDescriptor],
) -> AppResult<Vec<Parameter>> {
    let mut parameters = Vec::new();

    for token in tokenize(raw) {
        let PathToken::Placeholder(name) = token else {
            continue;
        };
        let descriptor = declared
            .iter()
            .find(|d| d.location == ParameterLocation::Path && d.name == name);
        let mut parameter = match descriptor {
            Some(d) => bind_descriptor(d)?,
            None => Parameter::path(name, Property::primitive(Primitive::String)),
        };
        parameter.location = ParameterLocation::Path;
        parameter.required = true;
        parameters.push(parameter);
    }

    for descriptor in declared
        .iter()
        .filter(|d| d.location == ParameterLocation::Query)
    {
        parameters.push(bind_descriptor(descriptor)?);
    }

    Ok(parameters)
}

fn bind_descriptor(descriptor: &ParameterDescriptor) -> AppResult<Parameter> {
    if let Some(pattern) = &descriptor.pattern {
        Regex::new(pattern).map_err(|e| {
            AppError::Config(format!(
                "Invalid pattern for parameter '{}': {}",
                descriptor.name, e
            ))
        })?;
    }

    let property = match (descriptor.object, descriptor.collection_of) {
        (Some(ty), _) => primitive_property(ty, &descriptor.name)?,
        (None, Some(item)) => Property::array(primitive_property(item, &descriptor.name)?),
        (None, None) => Property::primitive(Primitive::String),
    };

    let mut parameter = match descriptor.location {
        ParameterLocation::Query => {
            Parameter::query(descriptor.name.clone(), property, descriptor.required)
        }
        _ => Parameter::path(descriptor.name.clone(), property),
    };
    parameter.description = descriptor.description.clone();
    parameter.pattern = descriptor.pattern.clone();
    parameter.example = descriptor.example.clone();
    parameter.allow_empty_value = descriptor.allow_empty_value;
    parameter.default = descriptor.default_value.clone();
    Ok(parameter)
}

/// Maps a parameter value type to its property.
///
/// Only enums, booleans, byte arrays, numbers, strings and UUIDs qualify.
pub fn primitive_property(ty: TypeRef, parameter: &str) -> AppResult<Property> {
    let primitive = match ty.shape() {
        Shape::Enum(values) => return Ok(Property::enumeration(values)),
        Shape::Boolean => Primitive::Boolean,
        Shape::ByteArray => Primitive::ByteArray,
        Shape::Decimal => Primitive::Decimal,
        Shape::Double => Primitive::Double,
        Shape::Float => Primitive::Float,
        Shape::Integer => Primitive::Integer,
        Shape::Long => Primitive::Long,
        Shape::String => Primitive::String,
        Shape::Uuid => Primitive::Uuid,
        _ => {
            return Err(AppError::UnsupportedType(format!(
                "{} (parameter '{}')",
                ty.name(),
                parameter
            )))
        }
    };
    Ok(Property::primitive(primitive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swagger::property::PropertyKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_template() {
        assert_eq!(format_template("/shield/:id"), "/shield/{id}");
        assert_eq!(format_template("/"), "/");
        assert_eq!(format_template(""), "/");
        assert_eq!(format_template("/hammer/"), "/hammer");
        assert_eq!(format_template("//a///b"), "/a/b");
    }

    #[test]
    fn test_format_template_is_idempotent() {
        let once = format_template("/shield/:id/nodes/:node");
        assert_eq!(once, "/shield/{id}/nodes/{node}");
        assert_eq!(format_template(&once), once);
    }

    #[test]
    fn test_percent_encoded_sigil() {
        assert_eq!(format_template("/shield/%3Aid"), "/shield/{id}");
    }

    #[test]
    fn test_nameless_sigil_stays_literal() {
        assert_eq!(format_template("/shield/:"), "/shield/:");
        assert_eq!(format_template("/shield/{}"), "/shield/{}");
        let params = derive_parameters("/shield/:", &[]).unwrap_or_default();
        assert!(params.is_empty());
    }

    #[test]
    fn test_undeclared_placeholder_is_required_string() {
        let params = derive_parameters("/a/:x", &[]).unwrap_or_default();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "x");
        assert!(params[0].required);
        assert_eq!(params[0].location, ParameterLocation::Path);
    }

    #[test]
    fn test_declared_path_param_forced_required() {
        let declared = vec![ParameterDescriptor::path("id")
            .with_required(false)
            .with_object::<i64>()
            .with_example("7")];
        let params = derive_parameters("/shield/:id", &declared).unwrap_or_default();
        assert_eq!(params.len(), 1);
        assert!(params[0].required);
        assert_eq!(params[0].example.as_deref(), Some("7"));
    }

    #[test]
    fn test_query_params_follow_path_params() {
        let declared = vec![
            ParameterDescriptor::query("limit").with_object::<i32>(),
            ParameterDescriptor::query("tags").with_collection_of::<String>(),
            ParameterDescriptor::path("id"),
        ];
        let params = derive_parameters("/x/:id", &declared).unwrap_or_default();
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "limit", "tags"]);
        assert!(!params[1].required);
        match &params[2].schema {
            crate::swagger::parameter::ParameterSchema::Property(p) => {
                assert!(matches!(p.kind, PropertyKind::Array(_)))
            }
            other => panic!("unexpected schema {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_parameter_type_fails() {
        let declared = vec![ParameterDescriptor::query("when").with_object::<chrono::NaiveDate>()];
        let result = derive_parameters("/x", &declared);
        assert!(matches!(result, Err(AppError::UnsupportedType(_))));
    }

    #[test]
    fn test_invalid_pattern_fails() {
        let declared = vec![ParameterDescriptor::path("id").with_pattern("[")];
        let result = derive_parameters("/x/:id", &declared);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
