//! In-memory host doubles for tests

use crate::apply::RELATIONSHIP_ATTRIBUTES;
use declarative::{
    Attributes, DeclaredProperty, Event, Prefetchable, Property, Resource, ResourceKey,
    SyncReport, Synchronizer, TransientResource, Value,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Records flush/prefetch calls
#[derive(Debug, Default)]
pub struct MockPrefetcher {
    pub calls: Mutex<Vec<String>>,
    /// Make `prefetch` fail after recording the call
    pub failing: bool,
}

impl Prefetchable for MockPrefetcher {
    fn flush_cache(&self, key: &ResourceKey) {
        self.calls.lock().unwrap().push(format!("flush {key}"));
    }

    fn prefetch(&self, keys: &[ResourceKey]) -> anyhow::Result<()> {
        for key in keys {
            self.calls.lock().unwrap().push(format!("prefetch {key}"));
        }
        if self.failing {
            anyhow::bail!("prefetch failed");
        }
        Ok(())
    }
}

/// A resource with declared attributes, properties and canned live values
#[derive(Debug)]
pub struct MockResource {
    key: ResourceKey,
    declared: Attributes,
    valid: Vec<String>,
    props: Vec<DeclaredProperty>,
    live: Attributes,
    pub retrievals: AtomicUsize,
    pub prefetcher: Option<MockPrefetcher>,
}

impl MockResource {
    pub fn new(type_name: &str, title: &str) -> Self {
        Self {
            key: ResourceKey::new(type_name, title),
            declared: Attributes::new(),
            valid: Vec::new(),
            props: Vec::new(),
            live: Attributes::new(),
            retrievals: AtomicUsize::new(0),
            prefetcher: None,
        }
    }

    /// Declare a parameter (not a property)
    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.declared.insert(name.to_string(), value.into());
        self
    }

    /// Declare a property with a desired value
    pub fn property(mut self, name: &str, desired: impl Into<Value>) -> Self {
        let desired = desired.into();
        self.declared.insert(name.to_string(), desired.clone());
        self.props.push(DeclaredProperty::new(name, desired));
        self
    }

    /// Add a property with a custom comparison
    pub fn custom_property(mut self, property: DeclaredProperty) -> Self {
        if let Some(desired) = &property.desired {
            self.declared.insert(property.name.clone(), desired.clone());
        }
        self.props.push(property);
        self
    }

    /// Accept an attribute name without declaring it
    pub fn accepts(mut self, name: &str) -> Self {
        self.valid.push(name.to_string());
        self
    }

    /// Set the live value of a property
    pub fn live(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.live.insert(name.to_string(), value.into());
        self
    }

    pub fn prefetchable(mut self) -> Self {
        self.prefetcher = Some(MockPrefetcher::default());
        self
    }

    pub fn prefetchable_failing(mut self) -> Self {
        self.prefetcher = Some(MockPrefetcher {
            failing: true,
            ..MockPrefetcher::default()
        });
        self
    }

    pub fn retrievals(&self) -> usize {
        self.retrievals.load(Ordering::SeqCst)
    }
}

impl Resource for MockResource {
    fn key(&self) -> &ResourceKey {
        &self.key
    }

    fn declared_attributes(&self) -> Attributes {
        self.declared.clone()
    }

    fn valid_attribute(&self, name: &str) -> bool {
        self.declared.contains_key(name)
            || self.valid.iter().any(|v| v == name)
            || self.props.iter().any(|p| p.name == name)
            || RELATIONSHIP_ATTRIBUTES.contains(&name)
    }

    fn properties(&self) -> Vec<&dyn Property> {
        self.props.iter().map(|p| p as &dyn Property).collect()
    }

    fn retrieve(&self) -> anyhow::Result<Attributes> {
        self.retrievals.fetch_add(1, Ordering::SeqCst);
        Ok(self.live.clone())
    }

    fn prefetcher(&self) -> Option<&dyn Prefetchable> {
        self.prefetcher.as_ref().map(|p| p as &dyn Prefetchable)
    }
}

/// Records submissions and replies with canned events
#[derive(Debug, Default)]
pub struct MockSync {
    pub submitted: Vec<TransientResource>,
    pub events: Vec<Event>,
    /// Leave the submitted resource out of the report
    pub omit_status: bool,
    /// Fail the submission itself
    pub unavailable: bool,
}

impl MockSync {
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }
}

impl Synchronizer for MockSync {
    fn synchronize(&mut self, resource: &TransientResource) -> anyhow::Result<SyncReport> {
        if self.unavailable {
            anyhow::bail!("Synchronization unavailable");
        }
        self.submitted.push(resource.clone());
        let mut report = SyncReport::default();
        if !self.omit_status {
            report.record(resource.key.clone(), self.events.clone());
        }
        Ok(report)
    }
}
