//! Resource reference resolution
//!
//! References arrive in three shapes: a resource handle that is already
//! bound, a parsed `(type, title)` key that still needs binding to a
//! catalog, or a raw `Type[title]` string. All of them resolve to the
//! handle the catalog holds.

use crate::error::{Error, ReferenceProblem, Result};
use declarative::{ResourceHandle, ResourceIndex, ResourceKey};
use std::fmt;

/// A reference to a catalog resource
#[derive(Debug, Clone)]
pub enum ResourceReference {
    /// Already bound to a catalog resource
    Resolved(ResourceHandle),
    /// Parsed key, not yet bound
    Partial(ResourceKey),
    /// Unparsed `Type[title]` string
    Named(String),
}

impl ResourceReference {
    /// The key this reference denotes, without consulting a catalog
    pub fn key(&self) -> Result<ResourceKey> {
        match self {
            Self::Resolved(resource) => Ok(resource.key().clone()),
            Self::Partial(key) => Ok(key.clone()),
            Self::Named(name) => parse(name),
        }
    }

    /// Check if the reference is bound to a resource
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Resolve against a catalog index
    pub fn resolve(&self, index: &dyn ResourceIndex) -> Result<ResourceHandle> {
        let key = match self {
            Self::Resolved(resource) => return Ok(resource.clone()),
            Self::Partial(key) => key.clone(),
            Self::Named(name) => parse(name)?,
        };

        log::debug!("Resolving {key}");
        index
            .resource(&key)
            .ok_or_else(|| Error::reference(&key, ReferenceProblem::NotFound))
    }
}

fn parse(name: &str) -> Result<ResourceKey> {
    ResourceKey::parse(name).ok_or_else(|| Error::reference(name, ReferenceProblem::Malformed))
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(resource) => write!(f, "{}", resource.key()),
            Self::Partial(key) => write!(f, "{key}"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

impl From<&str> for ResourceReference {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for ResourceReference {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<ResourceKey> for ResourceReference {
    fn from(key: ResourceKey) -> Self {
        Self::Partial(key)
    }
}

impl From<ResourceHandle> for ResourceReference {
    fn from(resource: ResourceHandle) -> Self {
        Self::Resolved(resource)
    }
}

/// Resolve a single reference against a catalog index
pub fn resolve(
    reference: &ResourceReference,
    index: &dyn ResourceIndex,
) -> Result<ResourceHandle> {
    reference.resolve(index)
}

/// Resolve every reference, failing on the first one that does not resolve
pub fn resolve_all(
    references: &[ResourceReference],
    index: &dyn ResourceIndex,
) -> Result<Vec<ResourceHandle>> {
    references.iter().map(|r| r.resolve(index)).collect()
}
