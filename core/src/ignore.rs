#![deny(missing_docs)]

//! # Ignore Policies
//!
//! Predicates that exclude endpoints and fields from a document build.

use crate::introspect::{Describe, Field, Shape, TypeRef};
use std::any::TypeId;
use std::collections::HashSet;

/// Caller-supplied exclusion rules. Every predicate defaults to "keep".
pub trait IgnorePolicy {
    /// Whether the endpoint at `path` is skipped entirely.
    fn ignored_path(&self, _path: &str) -> bool {
        false
    }

    /// Whether `field` of the type named `owner` is skipped.
    fn ignored_field(&self, _owner: &str, _field: &Field) -> bool {
        false
    }

    /// Whether `field` carries a marker that excludes it.
    fn ignored_by_marker(&self, _field: &Field) -> bool {
        false
    }
}

/// Policy that keeps everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIgnores;

impl IgnorePolicy for NoIgnores {}

/// Set-based ignore rules.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSpec {
    paths: HashSet<String>,
    types: HashSet<TypeId>,
    fields: HashSet<(String, String)>,
    markers: HashSet<String>,
}

impl IgnoreSpec {
    /// Empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skips the endpoint registered at `path`.
    pub fn ignore_path(mut self, path: impl Into<String>) -> Self {
        self.paths.insert(path.into());
        self
    }

    /// Skips fields of type `T`, including collections and maps of `T`.
    pub fn ignore_type<T: Describe>(mut self) -> Self {
        self.types.insert(T::identity());
        self
    }

    /// Skips one field of one type.
    pub fn ignore_field(mut self, owner: impl Into<String>, field: impl Into<String>) -> Self {
        self.fields.insert((owner.into(), field.into()));
        self
    }

    /// Skips fields carrying `marker`.
    pub fn ignore_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.insert(marker.into());
        self
    }

    fn ignored_type(&self, ty: TypeRef) -> bool {
        if self.types.contains(&ty.id()) {
            return true;
        }
        match ty.shape() {
            Shape::Collection(inner) | Shape::Map(inner) => self.types.contains(&inner.id()),
            _ => false,
        }
    }
}

impl IgnorePolicy for IgnoreSpec {
    fn ignored_path(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    fn ignored_field(&self, owner: &str, field: &Field) -> bool {
        self.fields
            .contains(&(owner.to_string(), field.name.clone()))
            || self.ignored_type(field.ty)
    }

    fn ignored_by_marker(&self, field: &Field) -> bool {
        field.markers.iter().any(|m| self.markers.contains(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_ignore_type_matches_collections_and_maps() {
        let spec = IgnoreSpec::new().ignore_type::<uuid::Uuid>();
        let direct = Field::new("id", TypeRef::of::<uuid::Uuid>());
        let list = Field::new("ids", TypeRef::of::<Vec<uuid::Uuid>>());
        let map = Field::new("by_key", TypeRef::of::<HashMap<String, uuid::Uuid>>());
        let other = Field::new("name", TypeRef::of::<String>());
        assert!(spec.ignored_field("Owner", &direct));
        assert!(spec.ignored_field("Owner", &list));
        assert!(spec.ignored_field("Owner", &map));
        assert!(!spec.ignored_field("Owner", &other));
    }

    #[test]
    fn test_ignore_field_by_owner() {
        let spec = IgnoreSpec::new().ignore_field("Shield", "secret");
        let field = Field::new("secret", TypeRef::of::<String>());
        assert!(spec.ignored_field("Shield", &field));
        assert!(!spec.ignored_field("Network", &field));
    }

    #[test]
    fn test_paths_and_markers() {
        let spec = IgnoreSpec::new().ignore_path("/internal").ignore_marker("hidden");
        assert!(spec.ignored_path("/internal"));
        assert!(!spec.ignored_path("/hammer"));
        let field = Field::new("x", TypeRef::of::<bool>()).with_marker("hidden");
        assert!(spec.ignored_by_marker(&field));
        assert!(!NoIgnores.ignored_by_marker(&field));
    }
}
