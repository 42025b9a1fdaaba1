#![deny(missing_docs)]

//! # Document
//!
//! Operations, paths and the top-level Swagger 2.0 document.

use crate::error::{AppError, AppResult};
use crate::introspect::TypeRef;
use crate::params::format_template;
use crate::swagger::definitions::Definitions;
use crate::swagger::insert_extensions;
use crate::swagger::model::Model;
use crate::swagger::parameter::Parameter;
use crate::swagger::property::{Property, Reference};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// HTTP verbs an operation can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// PATCH
    Patch,
}

impl HttpMethod {
    /// Lowercase key used under a path item.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transfer protocols of the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// http
    Http,
    /// https
    Https,
    /// ws
    Ws,
    /// wss
    Wss,
}

impl Scheme {
    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Ws => "ws",
            Scheme::Wss => "wss",
        }
    }
}

impl FromStr for Scheme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            "ws" => Ok(Scheme::Ws),
            "wss" => Ok(Scheme::Wss),
            other => Err(AppError::Config(format!("Unknown scheme '{}'", other))),
        }
    }
}

/// Contact information.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    /// Name.
    pub name: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// URL.
    pub url: Option<String>,
}

/// License information.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct License {
    /// Name.
    pub name: String,
    /// URL.
    pub url: Option<String>,
}

/// The info block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Terms of service URL.
    pub terms_of_service: Option<String>,
    /// Contact.
    pub contact: Option<Contact>,
    /// License.
    pub license: Option<License>,
}

impl Info {
    fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("title".to_string(), json!(self.title));
        if let Some(desc) = &self.description {
            obj.insert("description".to_string(), json!(desc));
        }
        if let Some(version) = &self.version {
            obj.insert("version".to_string(), json!(version));
        }
        if let Some(tos) = &self.terms_of_service {
            obj.insert("termsOfService".to_string(), json!(tos));
        }
        if let Some(contact) = &self.contact {
            let mut c = Map::new();
            if let Some(name) = &contact.name {
                c.insert("name".to_string(), json!(name));
            }
            if let Some(email) = &contact.email {
                c.insert("email".to_string(), json!(email));
            }
            if let Some(url) = &contact.url {
                c.insert("url".to_string(), json!(url));
            }
            obj.insert("contact".to_string(), Value::Object(c));
        }
        if let Some(license) = &self.license {
            let mut l = Map::new();
            l.insert("name".to_string(), json!(license.name));
            if let Some(url) = &license.url {
                l.insert("url".to_string(), json!(url));
            }
            obj.insert("license".to_string(), Value::Object(l));
        }
        Value::Object(obj)
    }
}

/// External documentation link.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExternalDocs {
    /// Description.
    pub description: Option<String>,
    /// URL.
    pub url: String,
}

impl ExternalDocs {
    fn to_json(&self) -> Value {
        let mut obj = Map::new();
        if let Some(desc) = &self.description {
            obj.insert("description".to_string(), json!(desc));
        }
        obj.insert("url".to_string(), json!(self.url));
        Value::Object(obj)
    }
}

/// A documentation tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tag {
    /// Tag name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// External docs.
    pub external_docs: Option<ExternalDocs>,
}

impl Tag {
    fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("name".to_string(), json!(self.name));
        if let Some(desc) = &self.description {
            obj.insert("description".to_string(), json!(desc));
        }
        if let Some(docs) = &self.external_docs {
            obj.insert("externalDocs".to_string(), docs.to_json());
        }
        Value::Object(obj)
    }
}

/// Security scheme definitions (`securityDefinitions` entries).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SecurityScheme {
    /// HTTP basic authentication.
    #[serde(rename = "basic")]
    Basic {
        /// Description.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// API key in a header or query parameter.
    #[serde(rename = "apiKey")]
    ApiKey {
        /// Header or query parameter name.
        name: String,
        /// `header` or `query`.
        #[serde(rename = "in")]
        location: String,
        /// Description.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// OAuth2.
    #[serde(rename = "oauth2", rename_all = "camelCase")]
    OAuth2 {
        /// `implicit`, `password`, `application` or `accessCode`.
        flow: String,
        /// Authorization URL.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        authorization_url: Option<String>,
        /// Token URL.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token_url: Option<String>,
        /// Scope name to description.
        #[serde(default)]
        scopes: IndexMap<String, String>,
        /// Description.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

/// A security requirement: scheme name to required scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// A literal response example.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    /// Serialized example value.
    pub value: Value,
    /// Type the value was serialized from, used to derive the schema.
    pub type_handle: Option<TypeRef>,
}

impl Example {
    /// Serializes `value` and records its type.
    pub fn of<T>(value: &T) -> AppResult<Self>
    where
        T: serde::Serialize + crate::introspect::Describe,
    {
        let value =
            serde_json::to_value(value).map_err(|e| AppError::Serialization(e.to_string()))?;
        Ok(Self {
            value,
            type_handle: Some(TypeRef::of::<T>()),
        })
    }

    /// An untyped example.
    pub fn raw(value: Value) -> Self {
        Self {
            value,
            type_handle: None,
        }
    }
}

/// One response of an operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// Description.
    pub description: String,
    /// Inline property view of the schema.
    pub schema: Option<Property>,
    /// Full schema object.
    pub response_schema: Option<Model>,
    /// Examples keyed by MIME type.
    pub examples: IndexMap<String, Example>,
}

impl Response {
    /// A response with a description only.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Sets the inline property schema.
    pub fn with_schema(mut self, schema: Property) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sets the full schema object.
    pub fn with_response_schema(mut self, model: Model) -> Self {
        self.response_schema = Some(model);
        self
    }

    /// Adds an example under a MIME type.
    ///
    /// When no schema is declared, the last example added supplies it.
    pub fn with_example(mut self, mime: impl Into<String>, example: Example) -> Self {
        self.examples.insert(mime.into(), example);
        self
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a Reference>) {
        if let Some(model) = &self.response_schema {
            model.collect_references(out);
        } else if let Some(schema) = &self.schema {
            schema.collect_references(out);
        }
    }

    /// Renders the response object.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("description".to_string(), json!(self.description));
        if let Some(model) = &self.response_schema {
            obj.insert("schema".to_string(), model.to_json());
        } else if let Some(schema) = &self.schema {
            obj.insert("schema".to_string(), schema.to_json());
        }
        if !self.examples.is_empty() {
            let mut examples = Map::new();
            for (mime, example) in &self.examples {
                examples.insert(mime.clone(), example.value.clone());
            }
            obj.insert("examples".to_string(), Value::Object(examples));
        }
        Value::Object(obj)
    }
}

/// One method bound to a path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operation {
    /// Tags.
    pub tags: Vec<String>,
    /// Summary.
    pub summary: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Operation id.
    pub operation_id: Option<String>,
    /// External docs.
    pub external_docs: Option<ExternalDocs>,
    /// Accepted MIME types.
    pub consumes: Vec<String>,
    /// Produced MIME types.
    pub produces: Vec<String>,
    /// Parameters in order.
    pub parameters: Vec<Parameter>,
    /// Responses keyed by status code.
    pub responses: IndexMap<String, Response>,
    /// Security requirements.
    pub security: Vec<SecurityRequirement>,
    /// Deprecation flag.
    pub deprecated: bool,
    /// Vendor extensions.
    pub extensions: BTreeMap<String, Value>,
}

impl Operation {
    fn collect_references<'a>(&'a self, out: &mut Vec<&'a Reference>) {
        for param in &self.parameters {
            param.collect_references(out);
        }
        for response in self.responses.values() {
            response.collect_references(out);
        }
    }

    /// Renders the operation object.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        if !self.tags.is_empty() {
            obj.insert("tags".to_string(), json!(self.tags));
        }
        if let Some(summary) = &self.summary {
            obj.insert("summary".to_string(), json!(summary));
        }
        if let Some(desc) = &self.description {
            obj.insert("description".to_string(), json!(desc));
        }
        if let Some(docs) = &self.external_docs {
            obj.insert("externalDocs".to_string(), docs.to_json());
        }
        if let Some(id) = &self.operation_id {
            obj.insert("operationId".to_string(), json!(id));
        }
        if !self.consumes.is_empty() {
            obj.insert("consumes".to_string(), json!(self.consumes));
        }
        if !self.produces.is_empty() {
            obj.insert("produces".to_string(), json!(self.produces));
        }
        if !self.parameters.is_empty() {
            let params: Vec<Value> = self.parameters.iter().map(Parameter::to_json).collect();
            obj.insert("parameters".to_string(), Value::Array(params));
        }
        let mut responses = Map::new();
        for (status, response) in &self.responses {
            responses.insert(status.clone(), response.to_json());
        }
        obj.insert("responses".to_string(), Value::Object(responses));
        if self.deprecated {
            obj.insert("deprecated".to_string(), json!(true));
        }
        if !self.security.is_empty() {
            obj.insert("security".to_string(), json!(self.security));
        }
        insert_extensions(&mut obj, &self.extensions);
        Value::Object(obj)
    }
}

/// Operations sharing one canonical template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathItem {
    /// Operations keyed by verb.
    pub operations: IndexMap<HttpMethod, Operation>,
}

impl PathItem {
    fn to_json(&self) -> Value {
        let mut obj = Map::new();
        for (method, op) in &self.operations {
            obj.insert(method.as_str().to_string(), op.to_json());
        }
        Value::Object(obj)
    }
}

/// The complete Swagger 2.0 document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Info block.
    pub info: Info,
    /// Host (and optional port).
    pub host: Option<String>,
    /// Base path.
    pub base_path: Option<String>,
    /// Tags, unique by name.
    pub tags: Vec<Tag>,
    /// Schemes, unique.
    pub schemes: Vec<Scheme>,
    /// Global consumes.
    pub consumes: Vec<String>,
    /// Global produces.
    pub produces: Vec<String>,
    /// Global security requirements.
    pub security: Vec<SecurityRequirement>,
    /// Paths keyed by canonical template.
    pub paths: IndexMap<String, PathItem>,
    /// Security scheme definitions.
    pub security_definitions: IndexMap<String, SecurityScheme>,
    /// Definitions registry.
    pub definitions: Definitions,
    /// Reusable parameters.
    pub parameters: IndexMap<String, Parameter>,
    /// Reusable responses.
    pub responses: IndexMap<String, Response>,
    /// External docs.
    pub external_docs: Option<ExternalDocs>,
    /// Vendor extensions.
    pub extensions: BTreeMap<String, Value>,
}

impl Document {
    /// Creates a document with the given info block.
    pub fn new(info: Info) -> Self {
        Self {
            info,
            ..Self::default()
        }
    }

    /// Adds a tag unless one with the same name exists.
    pub fn add_tag(&mut self, tag: Tag) {
        if !self.tags.iter().any(|t| t.name == tag.name) {
            self.tags.push(tag);
        }
    }

    /// Adds a scheme unless already present.
    pub fn add_scheme(&mut self, scheme: Scheme) {
        if !self.schemes.contains(&scheme) {
            self.schemes.push(scheme);
        }
    }

    /// Merges an operation under the canonical form of `raw_path`.
    pub fn add_operation(&mut self, raw_path: &str, method: HttpMethod, operation: Operation) {
        let template = format_template(raw_path);
        let item = self.paths.entry(template).or_default();
        if item.operations.insert(method, operation).is_some() {
            tracing::warn!(path = raw_path, method = %method, "operation replaced an earlier one");
        }
    }

    /// Registers a security scheme and requires it globally.
    pub fn add_security_definition(&mut self, name: impl Into<String>, scheme: SecurityScheme) {
        let name = name.into();
        let mut requirement = SecurityRequirement::new();
        requirement.insert(name.clone(), Vec::new());
        if !self.security.contains(&requirement) {
            self.security.push(requirement);
        }
        self.security_definitions.insert(name, scheme);
    }

    /// Returns every local reference that has no registered definition.
    pub fn unresolved_references(&self) -> Vec<String> {
        let mut refs = Vec::new();
        for item in self.paths.values() {
            for op in item.operations.values() {
                op.collect_references(&mut refs);
            }
        }
        for param in self.parameters.values() {
            param.collect_references(&mut refs);
        }
        for response in self.responses.values() {
            response.collect_references(&mut refs);
        }
        for (_, model) in self.definitions.iter() {
            model.collect_references(&mut refs);
        }

        let mut missing: Vec<String> = Vec::new();
        for r in refs {
            let unresolved = match r.definition_name() {
                Some(name) => !self.definitions.contains(name),
                None => false,
            };
            if unresolved && !missing.iter().any(|m| m == r.as_str()) {
                missing.push(r.as_str().to_string());
            }
        }
        missing
    }

    /// Builds the JSON tree of the document.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("swagger".to_string(), json!("2.0"));
        obj.insert("info".to_string(), self.info.to_json());
        if let Some(host) = &self.host {
            obj.insert("host".to_string(), json!(host));
        }
        if let Some(base) = &self.base_path {
            obj.insert("basePath".to_string(), json!(base));
        }
        if !self.tags.is_empty() {
            let tags: Vec<Value> = self.tags.iter().map(Tag::to_json).collect();
            obj.insert("tags".to_string(), Value::Array(tags));
        }
        if !self.schemes.is_empty() {
            let schemes: Vec<&str> = self.schemes.iter().map(|s| s.as_str()).collect();
            obj.insert("schemes".to_string(), json!(schemes));
        }
        if !self.consumes.is_empty() {
            obj.insert("consumes".to_string(), json!(self.consumes));
        }
        if !self.produces.is_empty() {
            obj.insert("produces".to_string(), json!(self.produces));
        }
        if !self.security.is_empty() {
            obj.insert("security".to_string(), json!(self.security));
        }

        let mut paths = Map::new();
        for (template, item) in &self.paths {
            paths.insert(template.clone(), item.to_json());
        }
        obj.insert("paths".to_string(), Value::Object(paths));

        if !self.security_definitions.is_empty() {
            let defs = serde_json::to_value(&self.security_definitions).unwrap_or_else(|e| {
                tracing::warn!("failed to render security definitions: {}", e);
                Value::Object(Map::new())
            });
            obj.insert("securityDefinitions".to_string(), defs);
        }
        if !self.definitions.is_empty() {
            obj.insert("definitions".to_string(), self.definitions.to_json());
        }
        if !self.parameters.is_empty() {
            let mut params = Map::new();
            for (name, param) in &self.parameters {
                params.insert(name.clone(), param.to_json());
            }
            obj.insert("parameters".to_string(), Value::Object(params));
        }
        if !self.responses.is_empty() {
            let mut responses = Map::new();
            for (name, response) in &self.responses {
                responses.insert(name.clone(), response.to_json());
            }
            obj.insert("responses".to_string(), Value::Object(responses));
        }
        if let Some(docs) = &self.external_docs {
            obj.insert("externalDocs".to_string(), docs.to_json());
        }
        insert_extensions(&mut obj, &self.extensions);
        Value::Object(obj)
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> AppResult<String> {
        serde_json::to_string_pretty(&self.to_json())
            .map_err(|e| AppError::Serialization(e.to_string()))
    }

    /// YAML rendering.
    pub fn to_yaml_string(&self) -> AppResult<String> {
        serde_yaml::to_string(&self.to_json()).map_err(|e| AppError::Serialization(e.to_string()))
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swagger::property::Primitive;
    use pretty_assertions::assert_eq;

    fn info() -> Info {
        Info {
            title: "Thor".into(),
            version: Some("1.0".into()),
            ..Info::default()
        }
    }

    #[test]
    fn test_scheme_parse_is_case_insensitive() {
        assert_eq!("HTTPS".parse::<Scheme>().ok(), Some(Scheme::Https));
        assert!("gopher".parse::<Scheme>().is_err());
    }

    #[test]
    fn test_add_operation_merges_methods_under_one_template() {
        let mut doc = Document::new(info());
        doc.add_operation("/shield/:id", HttpMethod::Get, Operation::default());
        doc.add_operation("/shield/{id}", HttpMethod::Post, Operation::default());
        assert_eq!(doc.paths.len(), 1);
        let item = &doc.paths["/shield/{id}"];
        assert_eq!(item.operations.len(), 2);
    }

    #[test]
    fn test_tags_and_schemes_dedup() {
        let mut doc = Document::new(info());
        doc.add_tag(Tag {
            name: "hammer".into(),
            ..Tag::default()
        });
        doc.add_tag(Tag {
            name: "hammer".into(),
            description: Some("again".into()),
            ..Tag::default()
        });
        doc.add_scheme(Scheme::Http);
        doc.add_scheme(Scheme::Http);
        assert_eq!(doc.tags.len(), 1);
        assert_eq!(doc.schemes, vec![Scheme::Http]);
    }

    #[test]
    fn test_minimal_document_json() {
        let doc = Document::new(info());
        assert_eq!(
            doc.to_json(),
            json!({
                "swagger": "2.0",
                "info": { "title": "Thor", "version": "1.0" },
                "paths": {}
            })
        );
    }

    #[test]
    fn test_security_definition_adds_requirement() {
        let mut doc = Document::new(info());
        doc.add_security_definition(
            "api_key",
            SecurityScheme::ApiKey {
                name: "X-API-KEY".into(),
                location: "header".into(),
                description: None,
            },
        );
        let json = doc.to_json();
        assert_eq!(json["security"], json!([{ "api_key": [] }]));
        assert_eq!(
            json["securityDefinitions"],
            json!({ "api_key": { "type": "apiKey", "name": "X-API-KEY", "in": "header" } })
        );
    }

    #[test]
    fn test_unresolved_references_reported() {
        let mut doc = Document::new(info());
        let mut op = Operation::default();
        op.responses.insert(
            "200".into(),
            Response::new("ok").with_schema(Property::reference("Missing")),
        );
        doc.add_operation("/x", HttpMethod::Get, op);
        doc.definitions.insert_if_absent(
            "Present",
            Model::object().with_property("n", Property::primitive(Primitive::Integer), false),
        );
        assert_eq!(doc.unresolved_references(), vec!["#/definitions/Missing".to_string()]);
    }

    #[test]
    fn test_yaml_rendering() {
        let doc = Document::new(info());
        let yaml = doc.to_yaml_string().unwrap_or_default();
        assert!(yaml.contains("swagger: '2.0'"));
        assert!(yaml.contains("title: Thor"));
    }
}
