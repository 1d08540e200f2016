//! Pending-change evaluation over a gate set

use crate::error::Result;
use declarative::{Attributes, Resource, ResourceDiff, ResourceHandle, Value};

/// Name of the existence property
pub const ENSURE: &str = "ensure";

/// Check whether any gate has live state that differs from its declaration
///
/// Stops at the first gate with a pending change. Gates are only read,
/// never modified.
pub fn has_pending_change(gates: &[ResourceHandle]) -> Result<bool> {
    for gate in gates {
        if let Some(diff) = pending_diff(gate.as_ref())? {
            log::debug!(
                "{} has pending changes to: {}",
                diff.resource,
                diff.properties
                    .iter()
                    .map(|p| p.property.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            return Ok(true);
        }
        log::debug!("{} is in sync", gate.key());
    }
    Ok(false)
}

/// Out-of-sync properties of one gate, or `None` if it is in sync
pub fn pending_diff(gate: &dyn Resource) -> Result<Option<ResourceDiff>> {
    let live = gate.retrieve()?;

    if is_absent_and_should_be(gate, &live) {
        return Ok(None);
    }

    Ok(ResourceDiff::against(gate, &live))
}

/// A gate declared absent that is already absent has nothing else to compare
fn is_absent_and_should_be(gate: &dyn Resource, live: &Attributes) -> bool {
    gate.properties()
        .into_iter()
        .find(|p| p.name() == ENSURE)
        .is_some_and(|ensure| {
            let wants_absent = ensure.desired().is_some_and(Value::is_absent);
            let current = live.get(ENSURE).unwrap_or(&Value::Nil);
            wants_absent && ensure.insync(current)
        })
}
