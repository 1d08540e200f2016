//! Resource and property traits for declarative state management
//!
//! A Resource is a declared unit of desired state owned by the host catalog.
//! Consumers never implement type-specific behaviour; they inspect resources
//! through these traits only.

use crate::types::{Attributes, ResourceKey, Value};
use anyhow::Result;
use std::fmt;
use std::sync::Arc;

/// A single property with an independent desired-vs-live comparison
pub trait Property: Send + Sync + fmt::Debug {
    /// Property name (e.g. "ensure", "content")
    fn name(&self) -> &str;

    /// Explicitly declared desired value, if any
    fn desired(&self) -> Option<&Value>;

    /// Whether a live value satisfies the desired value
    ///
    /// The default is plain equality. Properties with looser semantics
    /// (order-insensitive lists, case-insensitive strings) override this.
    fn insync(&self, live: &Value) -> bool {
        self.desired().is_none_or(|desired| desired == live)
    }
}

/// How a [`DeclaredProperty`] compares live and desired values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparison {
    /// Values must be equal
    #[default]
    Exact,
    /// Arrays are compared as multisets; other values must be equal
    Unordered,
}

/// A property backed by a plain declared value
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredProperty {
    pub name: String,
    pub desired: Option<Value>,
    pub comparison: Comparison,
}

impl DeclaredProperty {
    pub fn new(name: &str, desired: impl Into<Value>) -> Self {
        Self {
            name: name.to_string(),
            desired: Some(desired.into()),
            comparison: Comparison::Exact,
        }
    }

    /// A property that is known to the type but not declared
    pub fn undeclared(name: &str) -> Self {
        Self {
            name: name.to_string(),
            desired: None,
            comparison: Comparison::Exact,
        }
    }

    pub fn with_comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = comparison;
        self
    }
}

impl Property for DeclaredProperty {
    fn name(&self) -> &str {
        &self.name
    }

    fn desired(&self) -> Option<&Value> {
        self.desired.as_ref()
    }

    fn insync(&self, live: &Value) -> bool {
        let Some(desired) = &self.desired else {
            return true;
        };
        match (self.comparison, desired, live) {
            (Comparison::Unordered, Value::Array(want), Value::Array(have)) => {
                same_elements(want, have)
            }
            _ => desired == live,
        }
    }
}

/// Multiset equality; elements match only when the values are equal
fn same_elements(want: &[Value], have: &[Value]) -> bool {
    if want.len() != have.len() {
        return false;
    }
    let mut remaining: Vec<&Value> = have.iter().collect();
    want.iter().all(|item| {
        remaining
            .iter()
            .position(|candidate| *candidate == item)
            .map(|found| remaining.swap_remove(found))
            .is_some()
    })
}

/// Provider capability: bulk-refresh of cached live state
///
/// Providers that cache property values across a run implement this so
/// callers that change a resource out-of-band can invalidate the cache.
pub trait Prefetchable: Send + Sync {
    /// Drop any cached live state for a resource
    fn flush_cache(&self, key: &ResourceKey);

    /// Re-read live state for the given resources
    fn prefetch(&self, keys: &[ResourceKey]) -> Result<()>;
}

/// Core trait for catalog resources
pub trait Resource: Send + Sync + fmt::Debug {
    /// Identity within the catalog
    fn key(&self) -> &ResourceKey;

    /// Full declared attribute set, as compiled into the catalog
    ///
    /// Includes relationship attributes and attributes left unset.
    fn declared_attributes(&self) -> Attributes;

    /// Whether `name` is a valid attribute for this resource's type
    fn valid_attribute(&self, name: &str) -> bool;

    /// Properties of this resource
    fn properties(&self) -> Vec<&dyn Property>;

    /// Query live property values
    ///
    /// Properties missing from the returned map are treated as unset.
    fn retrieve(&self) -> Result<Attributes>;

    /// Provider prefetch capability, if the provider supports it
    fn prefetcher(&self) -> Option<&dyn Prefetchable> {
        None
    }
}

/// A shared handle to a catalog resource
pub type ResourceHandle = Arc<dyn Resource>;
