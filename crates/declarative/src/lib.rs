//! # Declarative
//!
//! Host-side abstractions for declarative resource management.
//!
//! This crate describes what a configuration engine exposes about its
//! compiled catalog: resources with declared attributes and properties,
//! live-state probing, dependency edges and a synchronization facility.
//! It implements none of the type-specific behaviour behind them.
//!
//! ## Core Concepts
//!
//! - **Resource**: A declared unit of desired state, identified by a [`ResourceKey`]
//! - **Property**: An attribute with its own desired-vs-live comparison
//! - **Catalog**: The resource index and dependency graph for one run
//! - **Synchronizer**: Converges a [`TransientResource`] and returns a [`SyncReport`]
//!
//! ## Host Traits
//!
//! - [`ResourceIndex`]: Looks up resources by key
//! - [`DependencyGraph`]: Accepts extra ordering edges
//! - [`Synchronizer`]: Submits resource descriptions for synchronization
//! - [`Prefetchable`]: Optional provider capability to refresh cached state
//!
//! [`Catalog`] is an in-memory implementation of the index and graph traits.

pub mod catalog;
pub mod context;
pub mod diff;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use catalog::Catalog;
pub use context::{DependencyGraph, ResourceIndex, Synchronizer};
pub use diff::{PropertyDiff, ResourceDiff, compute_property_diffs};
pub use resource::{
    Comparison, DeclaredProperty, Prefetchable, Property, Resource, ResourceHandle,
};
pub use types::{
    ApplyResult, Attributes, Event, EventStatus, ExecuteSummary, Relationship, ResourceKey,
    ResourceStatus, SyncReport, TransientResource, Value, display_attributes,
};
