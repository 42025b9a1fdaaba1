#![deny(missing_docs)]

//! # Typed Swagger Core
//!
//! Derives Swagger 2.0 documents from declared endpoints and the Rust types
//! they consume and produce.

/// Shared error types.
pub mod error;

/// Swagger 2.0 wire model.
pub mod swagger;

/// Type introspection (Rust types -> definitions).
pub mod introspect;

/// Property / model conversion.
pub mod convert;

/// Path template and parameter mapping.
pub mod params;

/// Endpoint, method and parameter descriptors.
pub mod descriptor;

/// Ignore policies.
pub mod ignore;

/// Document assembly.
pub mod assembler;

/// Document configuration.
pub mod config;

pub use assembler::{build, generate, BuildContext};
pub use config::SwaggerConfig;
pub use convert::{model_to_property, property_to_model};
pub use descriptor::{
    BodyDescriptor, EndpointDescriptor, MethodDescriptor, ParameterDescriptor, RestResponse,
};
pub use error::{AppError, AppResult};
pub use ignore::{IgnorePolicy, IgnoreSpec, NoIgnores};
pub use introspect::{Describe, Field, Introspector, Shape, TypeRef};
pub use params::{derive_parameters, format_template};
pub use swagger::{Document, Model, Property};
