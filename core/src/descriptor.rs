#![deny(missing_docs)]

//! # Descriptors
//!
//! Declarations handed over by the route binding layer: endpoints, their
//! methods and the parameters each method accepts.

use crate::introspect::{Describe, TypeRef};
use crate::swagger::document::{ExternalDocs, HttpMethod, Response, SecurityRequirement, Tag};
use crate::swagger::model::Model;
use crate::swagger::parameter::ParameterLocation;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard REST envelope used by [`MethodDescriptor::with_generic_response`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestResponse {
    /// Application status code.
    pub status: i32,
    /// Human readable message.
    pub message: String,
    /// Payload.
    pub data: Value,
}

crate::describe_object!(RestResponse {
    status: i32,
    message: String,
    data: Value,
});

/// A declared path or query parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    /// Parameter name (placeholder name for path parameters).
    pub name: String,
    /// Path or query.
    pub location: ParameterLocation,
    /// Description.
    pub description: Option<String>,
    /// Regular expression constraint.
    pub pattern: Option<String>,
    /// Required flag. Ignored for path parameters, which are always required.
    pub required: bool,
    /// Example value.
    pub example: Option<String>,
    /// `allowEmptyValue`.
    pub allow_empty_value: Option<bool>,
    /// Default value.
    pub default_value: Option<String>,
    /// Explicit value type.
    pub object: Option<TypeRef>,
    /// Item type when the value is a list.
    pub collection_of: Option<TypeRef>,
}

impl ParameterDescriptor {
    fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            description: None,
            pattern: None,
            required: false,
            example: None,
            allow_empty_value: None,
            default_value: None,
            object: None,
            collection_of: None,
        }
    }

    /// A path parameter.
    pub fn path(name: impl Into<String>) -> Self {
        Self {
            required: true,
            ..Self::new(name, ParameterLocation::Path)
        }
    }

    /// A query parameter, optional unless marked required.
    pub fn query(name: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Query)
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the required flag.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the example.
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Sets `allowEmptyValue`.
    pub fn with_allow_empty_value(mut self, allow: bool) -> Self {
        self.allow_empty_value = Some(allow);
        self
    }

    /// Sets the default value.
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Declares the value type.
    pub fn with_object<T: Describe>(mut self) -> Self {
        self.object = Some(TypeRef::of::<T>());
        self
    }

    /// Declares a list value with items of type `T`.
    pub fn with_collection_of<T: Describe>(mut self) -> Self {
        self.collection_of = Some(TypeRef::of::<T>());
        self
    }
}

/// An explicit request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyDescriptor {
    /// Parameter name, `body` when absent.
    pub name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Required flag, `true` when absent.
    pub required: Option<bool>,
    /// Pre-built schema, registered under its title.
    pub model: Option<Model>,
}

impl BodyDescriptor {
    /// A body carrying `model`.
    pub fn of(model: Model) -> Self {
        Self {
            model: Some(model),
            ..Self::default()
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the required flag.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }
}

/// One HTTP method of an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    /// Verb.
    pub method: HttpMethod,
    /// Path suffix appended to the endpoint prefix.
    pub path: String,
    /// Summary.
    pub summary: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Operation id.
    pub operation_id: Option<String>,
    /// External docs.
    pub external_docs: Option<ExternalDocs>,
    /// Request body type.
    pub request_type: Option<TypeRef>,
    /// Whether the body is a list of `request_type`.
    pub request_as_collection: bool,
    /// Explicit body, takes precedence over `request_type`.
    pub body: Option<BodyDescriptor>,
    /// Response body type.
    pub response_type: Option<TypeRef>,
    /// Whether the response is a list of `response_type`.
    pub response_as_collection: bool,
    /// Whether the response is a map of `response_type`.
    pub response_as_map: bool,
    /// Explicit responses keyed by status code.
    pub responses: IndexMap<String, Response>,
    /// Declared path and query parameters.
    pub parameters: Vec<ParameterDescriptor>,
    /// Accepted MIME types.
    pub consumes: Vec<String>,
    /// Produced MIME types.
    pub produces: Vec<String>,
    /// Security requirements.
    pub security: Vec<SecurityRequirement>,
    /// Deprecation flag.
    pub deprecated: bool,
}

macro_rules! verb_constructors {
    ($($fn_name:ident => $method:ident),+ $(,)?) => {
        $(
            #[doc = concat!("A `", stringify!($fn_name), "` method at `path`.")]
            pub fn $fn_name(path: impl Into<String>) -> Self {
                Self::new(HttpMethod::$method, path)
            }
        )+
    };
}

impl MethodDescriptor {
    /// A method with no request or response declared.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            summary: None,
            description: None,
            operation_id: None,
            external_docs: None,
            request_type: None,
            request_as_collection: false,
            body: None,
            response_type: None,
            response_as_collection: false,
            response_as_map: false,
            responses: IndexMap::new(),
            parameters: Vec::new(),
            consumes: Vec::new(),
            produces: Vec::new(),
            security: Vec::new(),
            deprecated: false,
        }
    }

    verb_constructors! {
        get => Get,
        put => Put,
        post => Post,
        delete => Delete,
        options => Options,
        head => Head,
        patch => Patch,
    }

    /// Sets the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the operation id.
    pub fn with_operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    /// Sets the external docs.
    pub fn with_external_docs(mut self, docs: ExternalDocs) -> Self {
        self.external_docs = Some(docs);
        self
    }

    /// Declares the request body type.
    pub fn with_request_type<T: Describe>(mut self) -> Self {
        self.request_type = Some(TypeRef::of::<T>());
        self.request_as_collection = false;
        self
    }

    /// Declares a request body that is a list of `T`.
    pub fn with_request_as_collection<T: Describe>(mut self) -> Self {
        self.request_type = Some(TypeRef::of::<T>());
        self.request_as_collection = true;
        self
    }

    /// Declares an explicit body.
    pub fn with_body(mut self, body: BodyDescriptor) -> Self {
        self.body = Some(body);
        self
    }

    /// Declares the response type.
    pub fn with_response_type<T: Describe>(mut self) -> Self {
        self.response_type = Some(TypeRef::of::<T>());
        self.response_as_collection = false;
        self.response_as_map = false;
        self
    }

    /// Declares a response that is a list of `T`.
    pub fn with_response_as_collection<T: Describe>(mut self) -> Self {
        self.response_type = Some(TypeRef::of::<T>());
        self.response_as_collection = true;
        self.response_as_map = false;
        self
    }

    /// Declares a response that maps string keys to `T`.
    pub fn with_response_as_map<T: Describe>(mut self) -> Self {
        self.response_type = Some(TypeRef::of::<T>());
        self.response_as_collection = false;
        self.response_as_map = true;
        self
    }

    /// Declares the [`RestResponse`] envelope as the response type.
    pub fn with_generic_response(self) -> Self {
        self.with_response_type::<RestResponse>()
    }

    /// Adds an explicit response for `status`.
    pub fn with_response(mut self, status: impl Into<String>, response: Response) -> Self {
        self.responses.insert(status.into(), response);
        self
    }

    /// Adds a declared parameter.
    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the accepted MIME types.
    pub fn with_consumes<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumes = types.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the produced MIME types.
    pub fn with_produces<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.produces = types.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a security requirement on scheme `name`.
    pub fn with_security(mut self, name: impl Into<String>, scopes: Vec<String>) -> Self {
        let mut requirement = SecurityRequirement::new();
        requirement.insert(name.into(), scopes);
        self.security.push(requirement);
        self
    }

    /// Marks the method deprecated.
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }
}

/// A group of methods under one path prefix and documentation tag.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDescriptor {
    /// Path prefix.
    pub path: String,
    /// Tag description.
    pub description: Option<String>,
    /// Tag external docs.
    pub external_docs: Option<ExternalDocs>,
    /// Methods in declaration order.
    pub methods: Vec<MethodDescriptor>,
}

impl EndpointDescriptor {
    /// An endpoint rooted at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            description: None,
            external_docs: None,
            methods: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the external docs.
    pub fn with_external_docs(mut self, docs: ExternalDocs) -> Self {
        self.external_docs = Some(docs);
        self
    }

    /// Adds a method.
    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// The documentation tag of this endpoint.
    pub fn tag(&self) -> Tag {
        let name = match self.path.strip_prefix('/') {
            Some(rest) => rest.to_string(),
            None => self.path.clone(),
        };
        Tag {
            name,
            description: self.description.clone(),
            external_docs: self.external_docs.clone(),
        }
    }

    /// Endpoint prefix joined with the method suffix.
    pub fn full_path(&self, method: &MethodDescriptor) -> String {
        format!("{}{}", self.path, method.path)
    }
}
