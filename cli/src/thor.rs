#![deny(missing_docs)]

//! # Thor Demo API
//!
//! Endpoint declarations of the bundled demo: a Hammer API managing the
//! network and a Shield API managing shields.

use serde::{Deserialize, Serialize};
use typed_swagger_core::swagger::{Example, Response};
use typed_swagger_core::{
    describe_object, AppResult, EndpointDescriptor, MethodDescriptor, ParameterDescriptor,
};

/// Default configuration used when no file is given.
pub const DEFAULT_CONFIG: &str = r#"
basePath: /
host: localhost:8081
info:
  title: Thor API
  description: API example for typed swagger generation
  version: 1.0.0
  termsOfService: http://example.com/terms
  schemes: [HTTP, HTTPS]
  contact:
    name: Thor
    email: thor@asgard.example
  license:
    name: Apache 2.0
    url: http://www.apache.org/licenses/LICENSE-2.0.html
"#;

/// The Thor network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    /// Identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owner.
    pub owner: String,
    /// Node count.
    pub nodes: i32,
}

describe_object!(Network {
    id: String,
    name: String,
    owner: String,
    nodes: i32,
});

/// A shield.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shield {
    /// Identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owner.
    pub owner: String,
    /// Defense rating.
    pub defense: i32,
}

describe_object!(Shield {
    id: String,
    name: String,
    owner: String,
    defense: i32,
});

/// Request to back up a network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRequest {
    /// Backup name.
    pub name: String,
    /// Network to back up.
    pub network: String,
}

describe_object!(BackupRequest {
    name: String,
    network: String,
});

/// Hammer endpoint: network export, backup and cleanup.
pub fn hammer() -> AppResult<EndpointDescriptor> {
    let sample = Network {
        id: "asgard".into(),
        name: "Asgard".into(),
        owner: "Thor".into(),
        nodes: 9,
    };
    Ok(EndpointDescriptor::new("/hammer")
        .with_description("Hammer REST API exposing all Thor utilities")
        .with_method(
            MethodDescriptor::get("/export")
                .with_description("Gets the whole Network")
                .with_produces(["application/json"])
                .with_response(
                    "200",
                    Response::new("The exported network")
                        .with_example("application/json", Example::of(&sample)?),
                ),
        )
        .with_method(
            MethodDescriptor::post("/backup")
                .with_description("Trigger Network Backup")
                .with_request_type::<BackupRequest>()
                .with_generic_response(),
        )
        .with_method(
            MethodDescriptor::delete("/")
                .with_description("Clear Thor network resources")
                .with_generic_response(),
        ))
}

/// Shield endpoint: listing, lookup and removal.
pub fn shield() -> EndpointDescriptor {
    EndpointDescriptor::new("/shield")
        .with_description("REST API for Thor Shields")
        .with_method(
            MethodDescriptor::get("/")
                .with_description("Gets the available shields")
                .with_response_as_collection::<Shield>(),
        )
        .with_method(
            MethodDescriptor::post("/:id")
                .with_description("Get Shield by ID")
                .with_parameter(
                    ParameterDescriptor::path("id")
                        .with_description("Shield identifier")
                        .with_object::<String>(),
                )
                .with_request_type::<BackupRequest>()
                .with_response_type::<Shield>(),
        )
        .with_method(
            MethodDescriptor::delete("/")
                .with_description("Delete all shields")
                .with_generic_response(),
        )
}

/// Every endpoint of the demo.
pub fn endpoints() -> AppResult<Vec<EndpointDescriptor>> {
    Ok(vec![hammer()?, shield()])
}
