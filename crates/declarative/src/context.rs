//! Host collaborator traits
//!
//! These traits allow the declarative crate to be used without
//! depending on a specific catalog, scheduler or synchronization engine.

use crate::resource::ResourceHandle;
use crate::types::{Relationship, ResourceKey, SyncReport, TransientResource};
use anyhow::Result;

/// Resource index of a compiled catalog
pub trait ResourceIndex {
    /// Look up a resource by its exact key
    fn resource(&self, key: &ResourceKey) -> Option<ResourceHandle>;
}

/// Dependency graph that accepts extra ordering edges
///
/// The graph only exposes a "depends on" relation: registering that
/// `dependent` depends on `dependency` orders `dependency` first.
pub trait DependencyGraph: ResourceIndex {
    /// Record that `dependent` must be evaluated after `dependency`
    fn add_dependency(&mut self, dependent: &ResourceKey, dependency: &ResourceKey) -> Result<()>;

    /// Register a relationship through the dependency relation
    fn add_relationship(&mut self, relationship: &Relationship) -> Result<()> {
        self.add_dependency(&relationship.target, &relationship.source)
    }
}

/// Host resource-synchronization facility
///
/// Implement this trait to converge a transient resource description
/// through the host's own engine.
pub trait Synchronizer {
    /// Synchronize a resource description and report the resulting events
    fn synchronize(&mut self, resource: &TransientResource) -> Result<SyncReport>;
}
