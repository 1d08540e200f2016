//! Diff computation for resources

use crate::resource::Resource;
use crate::types::{Attributes, Value};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A property whose live value does not satisfy its desired value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDiff {
    /// Property name
    pub property: String,
    /// Live value (`Nil` if the property was not reported)
    pub current: Value,
    /// Declared desired value
    pub desired: Value,
}

/// A diff between live and desired state of a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDiff {
    /// Reference of the resource (`Type[title]`)
    pub resource: String,
    /// Out-of-sync properties
    pub properties: Vec<PropertyDiff>,
}

impl ResourceDiff {
    /// Diff a resource against already retrieved live values,
    /// returning None if no changes needed
    pub fn against(resource: &dyn Resource, live: &Attributes) -> Option<Self> {
        let properties = compute_property_diffs(resource, live);

        if properties.is_empty() {
            return None;
        }

        Some(Self {
            resource: resource.key().to_string(),
            properties,
        })
    }

    /// Retrieve live values and diff a resource against them
    pub fn from_resource(resource: &dyn Resource) -> Result<Option<Self>> {
        let live = resource.retrieve()?;
        Ok(Self::against(resource, &live))
    }
}

/// Compare every explicitly declared property against live values
///
/// Properties without a desired value never produce a diff. Each property
/// decides for itself whether the live value is in sync.
pub fn compute_property_diffs(resource: &dyn Resource, live: &Attributes) -> Vec<PropertyDiff> {
    resource
        .properties()
        .into_iter()
        .filter_map(|prop| {
            let desired = prop.desired()?;
            let current = live.get(prop.name()).unwrap_or(&Value::Nil);
            if prop.insync(current) {
                return None;
            }
            Some(PropertyDiff {
                property: prop.name().to_string(),
                current: current.clone(),
                desired: desired.clone(),
            })
        })
        .collect()
}
