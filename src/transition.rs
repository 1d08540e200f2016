//! The transition resource
//!
//! A transition forces its target through an alternate attribute set
//! whenever any of its gate resources (`prior_to`) has a pending change.
//! It is evaluated before the target and the gates, so the target is
//! already in its transitional state when the gates are synchronized.

use crate::apply;
use crate::error::{Error, Result};
use crate::ordering;
use crate::pending::has_pending_change;
use crate::reference::{ResourceReference, resolve_all};
use declarative::{
    ApplyResult, Attributes, DependencyGraph, Relationship, ResourceIndex, ResourceKey,
    ResourceStatus, Synchronizer, display_attributes,
};

/// Type name transitions are registered under in the catalog
pub const TRANSITION_TYPE: &str = "transition";

/// Where a transition stands for the current pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    /// `enable => false`; always in sync
    Disabled,
    /// No gate has a pending change
    InSync,
    /// At least one gate has a pending change; the transition must be applied
    Pending,
}

/// A conditional state transition
#[derive(Debug, Clone)]
pub struct Transition {
    name: String,
    target: ResourceReference,
    attributes: Attributes,
    prior_to: Vec<ResourceReference>,
    enable: bool,
}

impl Transition {
    /// Create an enabled transition
    ///
    /// `prior_to` must name at least one gate.
    pub fn new(
        name: &str,
        target: impl Into<ResourceReference>,
        attributes: Attributes,
        prior_to: Vec<ResourceReference>,
    ) -> Result<Self> {
        if prior_to.is_empty() {
            return Err(Error::MissingRequiredField("prior_to"));
        }
        Ok(Self {
            name: name.to_string(),
            target: target.into(),
            attributes,
            prior_to,
            enable: true,
        })
    }

    pub fn with_enable(mut self, enable: bool) -> Self {
        self.enable = enable;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key of the transition itself in the dependency graph
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(TRANSITION_TYPE, &self.name)
    }

    pub fn target(&self) -> &ResourceReference {
        &self.target
    }

    /// Override attributes applied to the target
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Gate resources
    pub fn prior_to(&self) -> &[ResourceReference] {
        &self.prior_to
    }

    pub fn is_enabled(&self) -> bool {
        self.enable
    }

    /// Resolve target and gates in place and check the override keys
    ///
    /// Nothing is modified unless every reference resolves.
    pub fn validate(&mut self, index: &dyn ResourceIndex) -> Result<()> {
        let target = self.target.resolve(index)?;
        let gates = resolve_all(&self.prior_to, index)?;

        let unknown: Vec<&str> = self
            .attributes
            .keys()
            .filter(|name| !target.valid_attribute(name))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(Error::InvalidAttributeSet {
                resource: target.key().to_string(),
                reason: format!("unknown attributes: {}", unknown.join(", ")),
            });
        }

        self.target = ResourceReference::Resolved(target);
        self.prior_to = gates.into_iter().map(ResourceReference::Resolved).collect();
        Ok(())
    }

    /// Decide the state for this pass
    ///
    /// A disabled transition never looks at its gates.
    pub fn state(&self, index: &dyn ResourceIndex) -> Result<TransitionState> {
        if !self.enable {
            return Ok(TransitionState::Disabled);
        }
        let gates = resolve_all(&self.prior_to, index)?;
        if has_pending_change(&gates)? {
            Ok(TransitionState::Pending)
        } else {
            Ok(TransitionState::InSync)
        }
    }

    /// Whether the transition is in sync (nothing to apply)
    pub fn is_insync(&self, index: &dyn ResourceIndex) -> Result<bool> {
        Ok(self.state(index)? != TransitionState::Pending)
    }

    /// Apply the transitional state to the target
    pub fn transition(
        &self,
        index: &dyn ResourceIndex,
        sync: &mut dyn Synchronizer,
    ) -> Result<ResourceStatus> {
        let target = self.target.resolve(index)?;
        apply::apply(target.as_ref(), &self.attributes, sync)
    }

    /// Evaluate once: check the gates and apply if needed
    ///
    /// There is no re-check after applying; the transition counts as
    /// synced for the rest of the pass.
    pub fn evaluate(
        &self,
        index: &dyn ResourceIndex,
        sync: &mut dyn Synchronizer,
    ) -> Result<ApplyResult> {
        match self.state(index)? {
            TransitionState::Disabled => Ok(ApplyResult::Skipped {
                reason: "transition disabled".to_string(),
            }),
            TransitionState::InSync => Ok(ApplyResult::NoChange),
            TransitionState::Pending => {
                log::info!("{}: {}", self.key(), self.should_description());
                let status = self.transition(index, sync)?;
                log::info!(
                    "{}: {} ({} events)",
                    self.key(),
                    self.change_description(),
                    status.events.len()
                );
                Ok(ApplyResult::Modified)
            }
        }
    }

    /// Message for an applied transition
    pub fn change_description(&self) -> String {
        format!(
            "transition state {} applied to {}",
            display_attributes(&self.attributes),
            self.target
        )
    }

    /// Message for a transition about to be applied
    pub fn should_description(&self) -> String {
        format!(
            "transition {} to state {}",
            self.target,
            display_attributes(&self.attributes)
        )
    }

    /// Ordering edges from this transition to its target and gates
    pub fn relationships(&self, index: &dyn ResourceIndex) -> Result<Vec<Relationship>> {
        ordering::relationships(self, index)
    }

    /// Register ordering edges with the graph
    pub fn contribute_ordering(
        &self,
        graph: &mut dyn DependencyGraph,
    ) -> Result<Vec<Relationship>> {
        ordering::contribute(self, graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReferenceProblem;
    use crate::testing::{MockResource, MockSync, init_logging};
    use declarative::{Catalog, Event, EventStatus, ResourceHandle, Value};
    use std::sync::Arc;

    fn stopped() -> Attributes {
        Attributes::from([("ensure".to_string(), Value::from("stopped"))])
    }

    fn service() -> MockResource {
        MockResource::new("service", "puppet")
            .property("ensure", "running")
            .property("enable", true)
            .param("subscribe", "File[/tmp/test.cfg]")
    }

    fn config_file(live_content: &str) -> MockResource {
        MockResource::new("file", "/tmp/test.cfg")
            .property("ensure", "file")
            .property("content", "enabled=1")
            .param("notify", "Service[puppet]")
            .live("ensure", "file")
            .live("content", live_content)
    }

    fn setup(live_content: &str) -> (Catalog, Arc<MockResource>, Transition) {
        let mut catalog = Catalog::new();
        catalog.add_resource(service()).unwrap();
        let file = Arc::new(config_file(live_content));
        catalog.add_handle(file.clone()).unwrap();
        let transition = Transition::new(
            "stop puppet service",
            "Service[puppet]",
            stopped(),
            vec!["File[/tmp/test.cfg]".into()],
        )
        .unwrap();
        (catalog, file, transition)
    }

    #[test]
    fn test_pending_gate_applies_transition() {
        init_logging();
        let (catalog, _, transition) = setup("enabled=0");
        let mut sync = MockSync::with_events(vec![Event::new(
            "ensure",
            EventStatus::Success,
            "ensure changed 'running' to 'stopped'",
        )]);

        assert!(!transition.is_insync(&catalog).unwrap());
        let result = transition.evaluate(&catalog, &mut sync).unwrap();

        assert_eq!(result, ApplyResult::Modified);
        assert_eq!(sync.submitted.len(), 1);
        let attrs = &sync.submitted[0].attributes;
        assert_eq!(attrs["ensure"], Value::from("stopped"));
        assert_eq!(attrs["enable"], Value::Bool(true));
        assert!(!attrs.contains_key("subscribe"));
    }

    #[test]
    fn test_insync_gate_skips_apply() {
        let (catalog, _, transition) = setup("enabled=1");
        let mut sync = MockSync::default();

        assert!(transition.is_insync(&catalog).unwrap());
        let result = transition.evaluate(&catalog, &mut sync).unwrap();

        assert_eq!(result, ApplyResult::NoChange);
        assert!(sync.submitted.is_empty());
    }

    #[test]
    fn test_absent_gate_does_not_fire() {
        let mut catalog = Catalog::new();
        catalog.add_resource(service()).unwrap();
        catalog
            .add_resource(
                MockResource::new("file", "/tmp/old.cfg")
                    .property("ensure", "absent")
                    .property("content", "enabled=1")
                    .live("ensure", "absent"),
            )
            .unwrap();
        let transition = Transition::new(
            "stop",
            "Service[puppet]",
            stopped(),
            vec!["File[/tmp/old.cfg]".into()],
        )
        .unwrap();

        assert_eq!(transition.state(&catalog).unwrap(), TransitionState::InSync);
    }

    #[test]
    fn test_failed_apply_surfaces_error() {
        let (catalog, _, transition) = setup("enabled=0");
        let mut sync = MockSync::with_events(vec![Event::new(
            "ensure",
            EventStatus::Failure,
            "Could not stop Service[puppet]",
        )]);

        let err = transition.evaluate(&catalog, &mut sync).unwrap_err();

        assert_eq!(
            err.to_string(),
            "could not transition Service[puppet]: ensure: Could not stop Service[puppet]"
        );
        assert_eq!(sync.submitted.len(), 1);
    }

    #[test]
    fn test_disabled_never_checks_gates() {
        let (catalog, file, transition) = setup("enabled=0");
        let transition = transition.with_enable(false);
        let mut sync = MockSync::default();

        assert!(transition.is_insync(&catalog).unwrap());
        let result = transition.evaluate(&catalog, &mut sync).unwrap();

        assert!(matches!(result, ApplyResult::Skipped { .. }));
        assert_eq!(file.retrievals(), 0);
        assert!(sync.submitted.is_empty());
    }

    #[test]
    fn test_validate_resolves_in_place() {
        let (catalog, file, mut transition) = setup("enabled=1");

        transition.validate(&catalog).unwrap();

        assert!(transition.target().is_resolved());
        assert!(transition.prior_to().iter().all(ResourceReference::is_resolved));
        let ResourceReference::Resolved(gate) = &transition.prior_to()[0] else {
            panic!("gate not resolved");
        };
        let file: ResourceHandle = file;
        assert!(Arc::ptr_eq(gate, &file));
    }

    #[test]
    fn test_validate_is_all_or_nothing() {
        let (catalog, _, _) = setup("enabled=1");
        let mut transition = Transition::new(
            "stop",
            "Service[puppet]",
            stopped(),
            vec!["File[/tmp/test.cfg]".into(), "File[/tmp/missing]".into()],
        )
        .unwrap();

        let err = transition.validate(&catalog).unwrap_err();

        assert!(matches!(
            err,
            Error::InvalidReference {
                problem: ReferenceProblem::NotFound,
                ..
            }
        ));
        assert!(!transition.target().is_resolved());
        assert!(!transition.prior_to()[0].is_resolved());
    }

    #[test]
    fn test_validate_rejects_unknown_attributes() {
        let (catalog, _, _) = setup("enabled=1");
        let mut attributes = stopped();
        attributes.insert("colour".into(), "blue".into());
        attributes.insert("flavour".into(), "mint".into());
        let mut transition = Transition::new(
            "stop",
            "Service[puppet]",
            attributes,
            vec!["File[/tmp/test.cfg]".into()],
        )
        .unwrap();

        let err = transition.validate(&catalog).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "invalid attributes for Service[puppet]: unknown attributes: colour, flavour"
        );
    }

    #[test]
    fn test_relationship_overrides_are_valid_attributes() {
        let (catalog, _, _) = setup("enabled=1");
        let mut attributes = stopped();
        attributes.insert("notify".into(), "Exec[reload]".into());
        let mut transition = Transition::new(
            "stop",
            "Service[puppet]",
            attributes,
            vec!["File[/tmp/test.cfg]".into()],
        )
        .unwrap();
        assert!(transition.validate(&catalog).is_ok());
    }

    #[test]
    fn test_undeclared_but_known_attributes_are_valid() {
        let mut catalog = Catalog::new();
        catalog
            .add_resource(service().accepts("hasrestart"))
            .unwrap();
        catalog.add_resource(config_file("enabled=1")).unwrap();
        let mut attributes = stopped();
        attributes.insert("hasrestart".into(), true.into());
        let mut transition = Transition::new(
            "stop",
            "Service[puppet]",
            attributes,
            vec!["File[/tmp/test.cfg]".into()],
        )
        .unwrap();
        assert!(transition.validate(&catalog).is_ok());
    }

    #[test]
    fn test_prior_to_is_required() {
        let err = Transition::new("stop", "Service[puppet]", stopped(), Vec::new()).unwrap_err();
        assert!(matches!(err, Error::MissingRequiredField("prior_to")));
    }

    #[test]
    fn test_ordering_through_transition() {
        let (mut catalog, _, transition) = setup("enabled=1");
        let edges = transition.contribute_ordering(&mut catalog).unwrap();
        assert_eq!(edges, transition.relationships(&catalog).unwrap());
        assert!(catalog.depends_on(
            &ResourceKey::new("service", "puppet"),
            &ResourceKey::new("transition", "stop puppet service")
        ));
    }

    #[test]
    fn test_descriptions() {
        let (_, _, transition) = setup("enabled=1");
        assert_eq!(
            transition.change_description(),
            "transition state {ensure => stopped} applied to Service[puppet]"
        );
        assert_eq!(
            transition.should_description(),
            "transition Service[puppet] to state {ensure => stopped}"
        );
    }
}
