#![deny(missing_docs)]

//! # Document Assembly
//!
//! Walks endpoint descriptors and produces one [`Document`] with its
//! definitions registry. State lives in a [`BuildContext`] created per build.

use crate::config::SwaggerConfig;
use crate::convert::{model_to_property, property_to_model};
use crate::descriptor::{EndpointDescriptor, MethodDescriptor};
use crate::error::{AppError, AppResult};
use crate::ignore::IgnorePolicy;
use crate::introspect::{property_for, property_from_json, referenceable_target, Introspector, TypeRef};
use crate::params::derive_parameters;
use crate::swagger::document::{Document, Operation, Response};
use crate::swagger::model::{Model, ModelKind};
use crate::swagger::parameter::Parameter;
use crate::swagger::property::Property;

const DEFAULT_BODY_NAME: &str = "body";
const DEFAULT_BODY_DESCRIPTION: &str = "Body object description";
const DEFAULT_STATUS: &str = "200";
const DEFAULT_RESPONSE_DESCRIPTION: &str = "successful operation";

/// Mutable state of one document build.
pub struct BuildContext<'a> {
    document: Document,
    ignore: &'a dyn IgnorePolicy,
}

impl<'a> BuildContext<'a> {
    /// Starts a build on top of `document` (usually seeded from configuration).
    pub fn new(document: Document, ignore: &'a dyn IgnorePolicy) -> Self {
        Self { document, ignore }
    }

    /// The document built so far.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Adds every method of `endpoint` unless its path is ignored.
    pub fn add_endpoint(&mut self, endpoint: &EndpointDescriptor) -> AppResult<()> {
        if self.ignore.ignored_path(&endpoint.path) {
            tracing::debug!(path = %endpoint.path, "endpoint ignored");
            return Ok(());
        }
        tracing::debug!(path = %endpoint.path, methods = endpoint.methods.len(), "adding endpoint");

        let tag = endpoint.tag();
        let tag_name = tag.name.clone();
        self.document.add_tag(tag);

        for method in &endpoint.methods {
            let full_path = endpoint.full_path(method);
            let operation = self.build_operation(&tag_name, &full_path, method)?;
            self.document
                .add_operation(&full_path, method.method, operation);
        }
        Ok(())
    }

    /// Checks references and returns the finished document.
    pub fn finish(self) -> AppResult<Document> {
        let missing = self.document.unresolved_references();
        if !missing.is_empty() {
            return Err(AppError::UnresolvedReference(missing.join(", ")));
        }
        tracing::debug!(
            paths = self.document.paths.len(),
            definitions = self.document.definitions.len(),
            "document built"
        );
        Ok(self.document)
    }

    /// Derives `ty` and registers the result, keeping existing names.
    ///
    /// Collections and maps register their element type. When `preferred` is
    /// given the root definition is stored under it instead of the type name.
    /// A root that the derived models point back at keeps its type name too.
    pub fn register_type(&mut self, preferred: Option<&str>, ty: TypeRef) {
        let Some(target) = referenceable_target(ty) else {
            return;
        };
        let root = target.name();
        let derived = Introspector::new(self.ignore).derive(target);

        let mut references = Vec::new();
        for model in derived.values() {
            model.collect_references(&mut references);
        }
        let root_referenced = references
            .iter()
            .any(|r| r.definition_name() == Some(root.as_str()));

        for (name, model) in derived {
            match preferred {
                Some(p) if name == root && p != root => {
                    if root_referenced {
                        self.document
                            .definitions
                            .insert_if_absent(name, model.clone());
                    }
                    self.document.definitions.insert_if_absent(p.to_string(), model);
                }
                _ => {
                    self.document.definitions.insert_if_absent(name, model);
                }
            }
        }
    }

    fn register_model(&mut self, model: &Model) {
        if matches!(model.kind, ModelKind::Ref(_)) {
            return;
        }
        if let Some(title) = &model.title {
            self.document
                .definitions
                .insert_if_absent(title.clone(), model.clone());
        }
    }

    fn build_operation(
        &mut self,
        tag: &str,
        full_path: &str,
        method: &MethodDescriptor,
    ) -> AppResult<Operation> {
        let mut operation = Operation {
            tags: vec![tag.to_string()],
            summary: method.summary.clone(),
            description: method.description.clone(),
            operation_id: method.operation_id.clone(),
            external_docs: method.external_docs.clone(),
            deprecated: method.deprecated,
            ..Operation::default()
        };

        operation.parameters = derive_parameters(full_path, &method.parameters)?;
        if let Some(body) = self.request_body(method) {
            operation.parameters.push(body);
        }
        self.resolve_responses(method, &mut operation);

        operation.consumes = method.consumes.clone();
        operation.produces = method.produces.clone();
        operation.security = method.security.clone();
        Ok(operation)
    }

    fn request_body(&mut self, method: &MethodDescriptor) -> Option<Parameter> {
        let explicit = method.body.as_ref();

        let model = match (explicit.and_then(|b| b.model.as_ref()), method.request_type) {
            (Some(model), request_type) => {
                self.register_model(model);
                if let Some(ty) = request_type {
                    self.register_type(preferred_name(model), ty);
                }
                model.clone()
            }
            (None, Some(ty)) => {
                self.register_type(None, ty);
                let model = type_to_model(ty);
                if method.request_as_collection {
                    Model::array(model_to_property(&model))
                } else {
                    model
                }
            }
            (None, None) => return None,
        };

        let mut parameter = Parameter::body(
            explicit
                .and_then(|b| b.name.clone())
                .unwrap_or_else(|| DEFAULT_BODY_NAME.to_string()),
            model,
        );
        parameter.description = Some(
            explicit
                .and_then(|b| b.description.clone())
                .unwrap_or_else(|| DEFAULT_BODY_DESCRIPTION.to_string()),
        );
        parameter.required = explicit.and_then(|b| b.required).unwrap_or(true);
        Some(parameter)
    }

    fn resolve_responses(&mut self, method: &MethodDescriptor, operation: &mut Operation) {
        if method.responses.is_empty() {
            let mut response = Response::new(DEFAULT_RESPONSE_DESCRIPTION);
            if let Some(ty) = method.response_type {
                self.register_type(None, ty);
                response.schema = Some(response_property(method, ty));
            }
            operation
                .responses
                .insert(DEFAULT_STATUS.to_string(), response);
            return;
        }

        for (status, declared) in &method.responses {
            let mut response = declared.clone();
            if let Some(model) = &declared.response_schema {
                self.register_model(model);
                if let Some(ty) = model.type_handle {
                    self.register_type(preferred_name(model), ty);
                }
                response.schema = Some(model_to_property(model));
            } else if let Some(property) = &declared.schema {
                let model = property_to_model(property);
                self.register_model(&model);
            } else if !declared.examples.is_empty() {
                response.schema = self.example_property(declared);
            } else if let Some(ty) = method.response_type {
                self.register_type(None, ty);
                let model = property_to_model(&response_property(method, ty));
                response.schema = Some(model_to_property(&model));
                response.response_schema = Some(model);
            }
            operation.responses.insert(status.clone(), response);
        }
    }

    fn example_property(&mut self, response: &Response) -> Option<Property> {
        let mut schema = None;
        for example in response.examples.values() {
            let property = match example.type_handle {
                Some(ty) => {
                    self.register_type(None, ty);
                    Some(property_for(ty))
                }
                None => property_from_json(&example.value),
            };
            if let Some(property) = property {
                schema = Some(property.with_example(example.value.clone()));
            }
        }
        schema
    }
}

/// Name a model's type is registered under: its title, unless the model is
/// only a reference, whose target name must stay resolvable.
fn preferred_name(model: &Model) -> Option<&str> {
    match model.kind {
        ModelKind::Ref(_) => None,
        _ => model.title.as_deref(),
    }
}

/// Inline property of a response type, wrapped per the method's flags.
fn response_property(method: &MethodDescriptor, ty: TypeRef) -> Property {
    let property = property_for(ty);
    if method.response_as_collection {
        Property::array(property)
    } else if method.response_as_map {
        Property::map(property)
    } else {
        property
    }
}

/// Body model of a type: a reference for object types, inline otherwise.
pub fn type_to_model(ty: TypeRef) -> Model {
    if ty.is_object() {
        Model::reference(ty.name())
    } else {
        property_to_model(&property_for(ty))
    }
}

/// Builds a document from endpoints only, with an empty info block.
pub fn build(endpoints: &[EndpointDescriptor], ignore: &dyn IgnorePolicy) -> AppResult<Document> {
    assemble(Document::default(), endpoints, ignore)
}

/// Validates `config`, then builds the document for `endpoints`.
pub fn generate(
    config: &SwaggerConfig,
    endpoints: &[EndpointDescriptor],
    ignore: &dyn IgnorePolicy,
) -> AppResult<Document> {
    let document = config.to_document()?;
    assemble(document, endpoints, ignore)
}

fn assemble(
    document: Document,
    endpoints: &[EndpointDescriptor],
    ignore: &dyn IgnorePolicy,
) -> AppResult<Document> {
    tracing::debug!(endpoints = endpoints.len(), "building document");
    let mut context = BuildContext::new(document, ignore);
    for endpoint in endpoints {
        context.add_endpoint(endpoint)?;
    }
    context.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{BodyDescriptor, ParameterDescriptor};
    use crate::ignore::{IgnoreSpec, NoIgnores};
    use crate::swagger::document::{Example, HttpMethod};
    use crate::swagger::parameter::{ParameterLocation, ParameterSchema};
    use crate::swagger::property::{Primitive, PropertyKind};
    use pretty_assertions::assert_eq;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize)]
    struct Network {
        id: String,
        name: String,
        owner: String,
        nodes: i32,
    }
    crate::describe_object!(Network {
        id: String,
        name: String,
        owner: String,
        nodes: i32,
    });

    #[allow(dead_code)]
    struct Shield {
        id: String,
        network: Network,
    }
    crate::describe_object!(Shield {
        id: String,
        network: Network,
    });

    fn network() -> Network {
        Network {
            id: "n1".into(),
            name: "Asgard".into(),
            owner: "Thor".into(),
            nodes: 9,
        }
    }

    #[test]
    fn test_bare_method_gets_default_response() {
        let endpoints = vec![EndpointDescriptor::new("/ping").with_method(MethodDescriptor::get("/"))];
        let doc = build(&endpoints, &NoIgnores).expect("build");
        let op = &doc.paths["/ping"].operations[&HttpMethod::Get];
        assert_eq!(op.tags, vec!["ping".to_string()]);
        let response = &op.responses["200"];
        assert_eq!(response.description, "successful operation");
        assert!(response.schema.is_none());
        assert!(doc.definitions.is_empty());
    }

    #[test]
    fn test_request_type_becomes_body_reference() {
        let endpoints = vec![EndpointDescriptor::new("/shield")
            .with_method(MethodDescriptor::post("/").with_request_type::<Shield>())];
        let doc = build(&endpoints, &NoIgnores).expect("build");
        let op = &doc.paths["/shield"].operations[&HttpMethod::Post];
        let body = &op.parameters[0];
        assert_eq!(body.location, ParameterLocation::Body);
        assert_eq!(body.name, "body");
        assert_eq!(body.description.as_deref(), Some("Body object description"));
        assert_eq!(
            body.to_json()["schema"],
            json!({ "$ref": "#/definitions/Shield" })
        );
        assert!(doc.definitions.contains("Shield"));
        assert!(doc.definitions.contains("Network"));
    }

    #[test]
    fn test_request_as_collection_wraps_array() {
        let endpoints = vec![EndpointDescriptor::new("/shield").with_method(
            MethodDescriptor::put("/").with_request_as_collection::<Shield>(),
        )];
        let doc = build(&endpoints, &NoIgnores).expect("build");
        let body = &doc.paths["/shield"].operations[&HttpMethod::Put].parameters[0];
        assert_eq!(
            body.to_json()["schema"],
            json!({ "type": "array", "items": { "$ref": "#/definitions/Shield" } })
        );
    }

    #[test]
    fn test_primitive_request_is_inlined() {
        let endpoints = vec![EndpointDescriptor::new("/echo")
            .with_method(MethodDescriptor::post("/").with_request_type::<String>())];
        let doc = build(&endpoints, &NoIgnores).expect("build");
        let body = &doc.paths["/echo"].operations[&HttpMethod::Post].parameters[0];
        assert_eq!(body.to_json()["schema"], json!({ "type": "string" }));
        assert!(doc.definitions.is_empty());
    }

    #[test]
    fn test_explicit_body_model_registered_by_title() {
        let model = Model::object()
            .with_title("Credentials")
            .with_property("user", Property::primitive(Primitive::String), true);
        let endpoints = vec![EndpointDescriptor::new("/login").with_method(
            MethodDescriptor::post("/").with_body(
                BodyDescriptor::of(model)
                    .with_name("credentials")
                    .with_required(false),
            ),
        )];
        let doc = build(&endpoints, &NoIgnores).expect("build");
        let body = &doc.paths["/login"].operations[&HttpMethod::Post].parameters[0];
        assert_eq!(body.name, "credentials");
        assert!(!body.required);
        assert!(matches!(body.schema, ParameterSchema::Model(_)));
        assert!(doc.definitions.contains("Credentials"));
    }

    #[test]
    fn test_explicit_response_with_schema_model_and_handle() {
        let model = Model::reference("Network")
            .with_title("Network")
            .with_type_handle(TypeRef::of::<Network>());
        let endpoints = vec![EndpointDescriptor::new("/network").with_method(
            MethodDescriptor::get("/")
                .with_response("200", Response::new("found").with_response_schema(model))
                .with_response("404", Response::new("missing")),
        )];
        let doc = build(&endpoints, &NoIgnores).expect("build");
        let op = &doc.paths["/network"].operations[&HttpMethod::Get];
        assert_eq!(op.responses.keys().collect::<Vec<_>>(), vec!["200", "404"]);
        assert_eq!(
            op.responses["200"].schema.as_ref().and_then(|p| p.as_reference()).map(|r| r.simple_name()),
            Some("Network")
        );
        assert!(doc.definitions.contains("Network"));
    }

    #[test]
    fn test_explicit_response_falls_back_to_response_type() {
        let endpoints = vec![EndpointDescriptor::new("/network").with_method(
            MethodDescriptor::get("/")
                .with_response_as_collection::<Network>()
                .with_response("206", Response::new("partial")),
        )];
        let doc = build(&endpoints, &NoIgnores).expect("build");
        let response = &doc.paths["/network"].operations[&HttpMethod::Get].responses["206"];
        assert_eq!(
            response.to_json(),
            json!({
                "description": "partial",
                "schema": { "type": "array", "items": { "$ref": "#/definitions/Network" } }
            })
        );
    }

    #[test]
    fn test_typed_example_derives_schema() {
        let example = Example::of(&network()).expect("serialize example");
        let endpoints = vec![EndpointDescriptor::new("/network").with_method(
            MethodDescriptor::get("/").with_response(
                "200",
                Response::new("ok").with_example("application/json", example),
            ),
        )];
        let doc = build(&endpoints, &NoIgnores).expect("build");
        let response = &doc.paths["/network"].operations[&HttpMethod::Get].responses["200"];
        let schema = response.schema.as_ref().expect("schema");
        assert_eq!(schema.as_reference().map(|r| r.simple_name()), Some("Network"));
        assert_eq!(schema.meta.example.as_ref().map(|v| v["owner"].clone()), Some(json!("Thor")));
        assert!(doc.definitions.contains("Network"));
    }

    #[test]
    fn test_raw_example_builds_inline_schema() {
        let endpoints = vec![EndpointDescriptor::new("/count").with_method(
            MethodDescriptor::get("/").with_response(
                "200",
                Response::new("ok").with_example("application/json", Example::raw(json!(3))),
            ),
        )];
        let doc = build(&endpoints, &NoIgnores).expect("build");
        let schema = doc.paths["/count"].operations[&HttpMethod::Get].responses["200"]
            .schema
            .clone()
            .expect("schema");
        assert_eq!(schema.kind, PropertyKind::Primitive(Primitive::Long));
        assert_eq!(schema.meta.example, Some(json!(3)));
    }

    #[test]
    fn test_last_example_supplies_schema() {
        let endpoints = vec![EndpointDescriptor::new("/network").with_method(
            MethodDescriptor::get("/").with_response(
                "200",
                Response::new("ok")
                    .with_example("text/plain", Example::raw(json!("Asgard")))
                    .with_example("application/json", Example::of(&network()).expect("serialize example")),
            ),
        )];
        let doc = build(&endpoints, &NoIgnores).expect("build");
        let schema = doc.paths["/network"].operations[&HttpMethod::Get].responses["200"]
            .schema
            .clone()
            .expect("schema");
        assert_eq!(schema.as_reference().map(|r| r.simple_name()), Some("Network"));
        assert!(doc.definitions.contains("Network"));
    }

    #[test]
    fn test_ignored_endpoint_is_skipped() {
        let ignore = IgnoreSpec::new().ignore_path("/internal");
        let endpoints = vec![
            EndpointDescriptor::new("/internal").with_method(MethodDescriptor::get("/")),
            EndpointDescriptor::new("/public").with_method(MethodDescriptor::get("/")),
        ];
        let doc = build(&endpoints, &ignore).expect("build");
        assert_eq!(doc.paths.keys().collect::<Vec<_>>(), vec!["/public"]);
        assert_eq!(doc.tags.len(), 1);
    }

    #[test]
    fn test_unsupported_parameter_aborts_build() {
        let endpoints = vec![EndpointDescriptor::new("/shield").with_method(
            MethodDescriptor::get("/:id")
                .with_parameter(ParameterDescriptor::path("id").with_object::<Shield>()),
        )];
        let result = build(&endpoints, &NoIgnores);
        assert!(matches!(result, Err(AppError::UnsupportedType(_))));
    }

    #[test]
    fn test_unregistered_reference_fails_finish() {
        let endpoints = vec![EndpointDescriptor::new("/ghost").with_method(
            MethodDescriptor::get("/")
                .with_response("200", Response::new("ok").with_schema(Property::reference("Ghost"))),
        )];
        let result = build(&endpoints, &NoIgnores);
        match result {
            Err(AppError::UnresolvedReference(msg)) => assert_eq!(msg, "#/definitions/Ghost"),
            other => panic!("expected unresolved reference, got {:?}", other.map(|_| ())),
        }
    }

    #[allow(dead_code)]
    struct Branch {
        label: String,
        parent: Option<Box<Branch>>,
    }
    crate::describe_object!(Branch {
        label: String,
        parent: Option<Box<Branch>>,
    });

    #[test]
    fn test_titled_reference_response_keeps_type_name() {
        let model = Model::reference("Branch")
            .with_title("Tree")
            .with_type_handle(TypeRef::of::<Branch>());
        let endpoints = vec![EndpointDescriptor::new("/tree").with_method(
            MethodDescriptor::get("/").with_response("200", Response::new("ok").with_response_schema(model)),
        )];
        let doc = build(&endpoints, &NoIgnores).expect("build");
        let names: Vec<&String> = doc.definitions.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Branch"]);
        assert_eq!(
            doc.paths["/tree"].operations[&HttpMethod::Get].responses["200"].to_json()["schema"],
            json!({ "$ref": "#/definitions/Branch" })
        );
    }

    #[test]
    fn test_renamed_self_referencing_root_stays_resolvable() {
        let mut context = BuildContext::new(Document::default(), &NoIgnores);
        context.register_type(Some("Tree"), TypeRef::of::<Branch>());
        let names: Vec<&String> = context.document().definitions.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Branch", "Tree"]);
        assert!(context.finish().is_ok());
    }

    #[test]
    fn test_register_type_prefers_given_name() {
        let mut context = BuildContext::new(Document::default(), &NoIgnores);
        context.register_type(Some("Armour"), TypeRef::of::<Shield>());
        context.register_type(None, TypeRef::of::<Shield>());
        let names: Vec<&String> = context.document().definitions.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Armour", "Network", "Shield"]);
    }
}
