//! Transitional apply - force a target through an alternate attribute set

use crate::error::{Error, Result};
use declarative::{
    Attributes, Resource, ResourceStatus, Synchronizer, TransientResource, display_attributes,
};
use std::slice;

/// Relationship metaparameters; ordering is contributed separately and
/// these must never reach the transient resource
pub const RELATIONSHIP_ATTRIBUTES: &[&str] = &["before", "notify", "require", "subscribe"];

/// Merge overrides onto declared attributes
///
/// Overrides win. Unset values and relationship attributes are dropped.
pub fn merge_attributes(declared: &Attributes, overrides: &Attributes) -> Attributes {
    let mut merged = declared.clone();
    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged.retain(|name, value| {
        !value.is_nil() && !RELATIONSHIP_ATTRIBUTES.contains(&name.as_str())
    });
    merged
}

/// Build the transient description of `target` carrying the overrides
pub fn transient_resource(target: &dyn Resource, overrides: &Attributes) -> TransientResource {
    TransientResource::new(
        target.key().clone(),
        merge_attributes(&target.declared_attributes(), overrides),
    )
}

/// Synchronize `target` with `overrides` applied
///
/// Returns the synchronization status of the transient resource. Any
/// failing event fails the whole apply; nothing is retried.
pub fn apply(
    target: &dyn Resource,
    overrides: &Attributes,
    sync: &mut dyn Synchronizer,
) -> Result<ResourceStatus> {
    let transient = transient_resource(target, overrides);
    log::info!(
        "Applying {} to {} ({})",
        display_attributes(&transient.attributes),
        transient.key,
        transient.label()
    );

    let report = sync.synchronize(&transient)?;

    let status = report.status(&transient.key).cloned().unwrap_or_else(|| {
        log::debug!("No status reported for {}", transient.key);
        ResourceStatus::default()
    });

    let failures: Vec<String> = status
        .failed_events()
        .map(|e| format!("{}: {}", e.property, e.message))
        .collect();
    if !failures.is_empty() {
        // Refresh still runs; the sync failure takes precedence
        if let Err(e) = refresh(target) {
            log::warn!("Failed to refresh {}: {e}", transient.key);
        }
        return Err(Error::ApplyFailure {
            resource: transient.key.to_string(),
            message: failures.join("; "),
        });
    }

    refresh(target)?;
    Ok(status)
}

/// Invalidate provider-cached state so later reads see the transition
fn refresh(target: &dyn Resource) -> Result<()> {
    let Some(prefetcher) = target.prefetcher() else {
        return Ok(());
    };
    let key = target.key();
    log::debug!("Refreshing cached state for {key}");
    prefetcher.flush_cache(key);
    prefetcher.prefetch(slice::from_ref(key))?;
    Ok(())
}
