//! In-memory catalog - resource index plus dependency edges

use crate::context::{DependencyGraph, ResourceIndex};
use crate::resource::{Resource, ResourceHandle};
use crate::types::{Relationship, ResourceKey};
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A compiled catalog for one evaluation run
///
/// Holds every resource keyed by `(type, title)` and the dependency edges
/// registered between them.
#[derive(Debug, Default)]
pub struct Catalog {
    resources: BTreeMap<ResourceKey, ResourceHandle>,
    /// `(dependent, dependency)` pairs in registration order
    dependencies: Vec<(ResourceKey, ResourceKey)>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, rejecting duplicate keys
    pub fn add_resource<R: Resource + 'static>(&mut self, resource: R) -> Result<ResourceHandle> {
        self.add_handle(Arc::new(resource))
    }

    /// Add an already shared resource handle
    pub fn add_handle(&mut self, resource: ResourceHandle) -> Result<ResourceHandle> {
        let key = resource.key().clone();
        if self.resources.contains_key(&key) {
            anyhow::bail!("Duplicate declaration: {key} is already declared");
        }
        self.resources.insert(key, Arc::clone(&resource));
        Ok(resource)
    }

    /// Number of resources in the catalog
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Check if the catalog holds no resources
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Registered edges as relationships (source is evaluated first)
    pub fn relationships(&self) -> Vec<Relationship> {
        self.dependencies
            .iter()
            .map(|(dependent, dependency)| Relationship::new(dependency.clone(), dependent.clone()))
            .collect()
    }

    /// Check if `dependent` directly depends on `dependency`
    pub fn depends_on(&self, dependent: &ResourceKey, dependency: &ResourceKey) -> bool {
        self.dependencies
            .iter()
            .any(|(d, on)| d == dependent && on == dependency)
    }
}

impl ResourceIndex for Catalog {
    fn resource(&self, key: &ResourceKey) -> Option<ResourceHandle> {
        self.resources.get(key).cloned()
    }
}

impl DependencyGraph for Catalog {
    fn add_dependency(&mut self, dependent: &ResourceKey, dependency: &ResourceKey) -> Result<()> {
        if dependent == dependency {
            anyhow::bail!("{dependent} cannot depend on itself");
        }
        if !self.depends_on(dependent, dependency) {
            self.dependencies.push((dependent.clone(), dependency.clone()));
        }
        Ok(())
    }
}
