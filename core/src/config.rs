#![deny(missing_docs)]

//! # Configuration
//!
//! Document level settings (info, host, schemes, security) loaded from YAML
//! or JSON and validated before any type derivation runs.

use crate::error::{AppError, AppResult};
use crate::swagger::document::{
    Contact, Document, ExternalDocs, Info, License, Scheme, SecurityRequirement, SecurityScheme,
};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use url::Url;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwaggerConfig {
    /// Base path of every operation.
    pub base_path: Option<String>,
    /// Host and optional port.
    pub host: Option<String>,
    /// Info block.
    pub info: Option<InfoConfig>,
    /// Global consumes.
    #[serde(default)]
    pub consumes: Vec<String>,
    /// Global produces.
    #[serde(default)]
    pub produces: Vec<String>,
    /// Security scheme definitions, each also required globally.
    #[serde(default)]
    pub security_definitions: IndexMap<String, SecurityScheme>,
    /// Additional global security requirements.
    #[serde(default)]
    pub security: Vec<SecurityRequirement>,
    /// Remaining keys. Only `x-` keys reach the document.
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// Info section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoConfig {
    /// API title.
    #[serde(default)]
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// API version.
    pub version: Option<String>,
    /// Terms of service URL.
    pub terms_of_service: Option<String>,
    /// Accepted schemes. When present, at least one must be recognised.
    pub schemes: Option<Vec<String>>,
    /// Contact.
    pub contact: Option<ContactConfig>,
    /// License.
    pub license: Option<LicenseConfig>,
    /// External docs.
    pub external_doc: Option<ExternalDocs>,
    /// Build metadata used as a version fallback.
    pub project: Option<ProjectConfig>,
}

/// Contact section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactConfig {
    /// Name.
    pub name: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// URL.
    pub url: Option<String>,
}

/// License section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LicenseConfig {
    /// Name.
    pub name: String,
    /// URL.
    pub url: Option<String>,
}

/// Project section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// Project version.
    pub version: Option<String>,
}

impl SwaggerConfig {
    /// Parses YAML (or JSON, which YAML accepts).
    pub fn from_yaml_str(text: &str) -> AppResult<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| AppError::Config(format!("Failed to parse configuration: {}", e)))
    }

    /// Reads and parses a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Self::from_yaml_str(&text)
    }

    /// Validates the configuration and seeds an empty document with it.
    pub fn to_document(&self) -> AppResult<Document> {
        let info_config = self
            .info
            .as_ref()
            .ok_or_else(|| AppError::Config("'info' configuration is required".into()))?;

        let mut document = Document::new(self.info(info_config));
        document.host = Some(validate_host(self.host.as_deref())?);
        document.base_path = self.base_path.clone();
        document.external_docs = info_config.external_doc.clone();
        document.consumes = self.consumes.clone();
        document.produces = self.produces.clone();

        if let Some(raw) = &info_config.schemes {
            for value in raw {
                match value.parse::<Scheme>() {
                    Ok(scheme) => document.add_scheme(scheme),
                    Err(_) => tracing::warn!(scheme = %value, "ignoring unknown scheme"),
                }
            }
            if document.schemes.is_empty() {
                return Err(AppError::Config(
                    "At least one scheme must be specified in 'info.schemes'".into(),
                ));
            }
        }

        for (name, scheme) in &self.security_definitions {
            document.add_security_definition(name.clone(), scheme.clone());
        }
        for requirement in &self.security {
            if !document.security.contains(requirement) {
                document.security.push(requirement.clone());
            }
        }
        for (key, value) in &self.extensions {
            if key.starts_with("x-") {
                document.extensions.insert(key.clone(), value.clone());
            }
        }

        Ok(document)
    }

    fn info(&self, config: &InfoConfig) -> Info {
        let version = config.version.clone().or_else(|| {
            config
                .project
                .as_ref()
                .and_then(|project| project.version.clone())
        });
        Info {
            title: config.title.clone(),
            version,
            description: config.description.clone(),
            terms_of_service: config.terms_of_service.clone(),
            contact: config.contact.as_ref().map(|c| Contact {
                name: c.name.clone(),
                email: c.email.clone(),
                url: c.url.clone(),
            }),
            license: config.license.as_ref().map(|l| License {
                name: l.name.clone(),
                url: l.url.clone(),
            }),
        }
    }
}

fn validate_host(host: Option<&str>) -> AppResult<String> {
    let host = host
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| {
            AppError::Config("'host' is required. A 'localhost' host also needs a port".into())
        })?;

    let parsed = Url::parse(&format!("http://{}", host))
        .map_err(|e| AppError::Config(format!("Invalid host '{}': {}", host, e)))?;
    if parsed.host_str().is_none() || parsed.path() != "/" {
        return Err(AppError::Config(format!("Invalid host '{}'", host)));
    }
    if parsed.host_str() == Some("localhost") && parsed.port().is_none() {
        return Err(AppError::Config(
            "A 'localhost' host needs an explicit port".into(),
        ));
    }
    Ok(host.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const CONFIG: &str = r#"
basePath: /
host: localhost:8081
x-origin: thor
ignored: true
info:
  title: Thor API
  description: Thor hammer and shield
  termsOfService: http://example.com/terms
  schemes: [HTTP, HTTPS, gopher]
  project:
    version: 1.2.0
  contact:
    name: Thor
    email: thor@asgard.example
  license:
    name: Apache 2.0
  externalDoc:
    description: More about Thor
    url: https://example.com/thor
securityDefinitions:
  api_key:
    type: apiKey
    name: X-API-KEY
    in: header
"#;

    #[test]
    fn test_full_config_to_document() {
        let config = SwaggerConfig::from_yaml_str(CONFIG).unwrap_or_default();
        let doc = match config.to_document() {
            Ok(doc) => doc,
            Err(e) => panic!("unexpected error: {}", e),
        };
        assert_eq!(doc.host.as_deref(), Some("localhost:8081"));
        assert_eq!(doc.info.version.as_deref(), Some("1.2.0"));
        assert_eq!(doc.schemes, vec![Scheme::Http, Scheme::Https]);
        assert_eq!(doc.extensions.get("x-origin"), Some(&json!("thor")));
        assert!(!doc.extensions.contains_key("ignored"));

        let json = doc.to_json();
        assert_eq!(json["security"], json!([{ "api_key": [] }]));
        assert_eq!(json["externalDocs"]["url"], json!("https://example.com/thor"));
        assert_eq!(json["info"]["license"], json!({ "name": "Apache 2.0" }));
    }

    #[test]
    fn test_missing_info_is_config_error() {
        let config = SwaggerConfig::from_yaml_str("host: api.example.com").unwrap_or_default();
        assert!(matches!(config.to_document(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_no_valid_scheme_is_config_error() {
        let config = SwaggerConfig::from_yaml_str(
            "host: api.example.com\ninfo:\n  title: t\n  schemes: [gopher]\n",
        )
        .unwrap_or_default();
        assert!(matches!(config.to_document(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_host_validation() {
        assert!(validate_host(None).is_err());
        assert!(validate_host(Some("localhost")).is_err());
        assert!(validate_host(Some("bad host")).is_err());
        assert!(validate_host(Some("api.example.com/v1")).is_err());
        assert_eq!(
            validate_host(Some("api.example.com")).ok(),
            Some("api.example.com".to_string())
        );
        assert_eq!(
            validate_host(Some("localhost:4567")).ok(),
            Some("localhost:4567".to_string())
        );
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("swagger.yaml");
        std::fs::write(&path, CONFIG).expect("write config");
        let config = SwaggerConfig::from_path(&path).expect("load config");
        assert_eq!(config.host.as_deref(), Some("localhost:8081"));

        let missing = SwaggerConfig::from_path(dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(AppError::Io(_))));
    }
}
