//! Core types for declarative resource management

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute name → value map, as declared on a resource
pub type Attributes = BTreeMap<String, Value>;

/// Identity of a resource within a catalog: `(type, title)`
///
/// Type names are case-insensitive and stored lowercased. The display form
/// is the canonical reference syntax, e.g. `Service[puppet]` or
/// `Apache::Vhost[default]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    type_name: String,
    title: String,
}

impl ResourceKey {
    /// Create a key, normalizing the type name
    pub fn new(type_name: &str, title: &str) -> Self {
        Self {
            type_name: type_name.trim().to_lowercase(),
            title: title.to_string(),
        }
    }

    /// Parse a `Type[title]` reference string
    ///
    /// The title may be wrapped in single or double quotes. Returns `None`
    /// when the string is not a well-formed reference.
    pub fn parse(reference: &str) -> Option<Self> {
        let reference = reference.trim();
        let (type_name, rest) = reference.split_once('[')?;
        let title = rest.strip_suffix(']')?;

        if !is_valid_type_name(type_name) {
            return None;
        }

        let title = unquote(title);
        if title.is_empty() || title.contains(['[', ']']) {
            return None;
        }

        Some(Self::new(type_name, title))
    }

    /// Lowercased type name (e.g. "service")
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Resource title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Label for a single-resource catalog built around this key: `type/title`
    pub fn catalog_label(&self) -> String {
        format!("{}/{}", self.type_name, self.title)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segments: Vec<String> = self.type_name.split("::").map(capitalize).collect();
        write!(f, "{}[{}]", segments.join("::"), self.title)
    }
}

fn is_valid_type_name(type_name: &str) -> bool {
    !type_name.is_empty()
        && type_name.split("::").all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

fn unquote(title: &str) -> &str {
    let title = title.trim();
    for quote in ['\'', '"'] {
        if let Some(inner) = title
            .strip_prefix(quote)
            .and_then(|t| t.strip_suffix(quote))
        {
            return inner;
        }
    }
    title
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// An attribute or property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`
    Unsigned(u64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// Unset value (declared but without a concrete value)
    Nil,
}

impl Value {
    /// Check if this is the unset marker
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Borrow the string payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this value spells the `absent` existence state
    pub fn is_absent(&self) -> bool {
        self.as_str() == Some("absent")
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Unsigned(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Array(items) => {
                let items: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Self::Map(map) => write!(f, "{}", display_attributes(map)),
            Self::Nil => write!(f, "undef"),
        }
    }
}

/// Render an attribute map as `{key => value, ...}`
pub fn display_attributes(attributes: &Attributes) -> String {
    let pairs: Vec<String> = attributes
        .iter()
        .map(|(k, v)| format!("{k} => {v}"))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}

/// A directed ordering edge: `source` is evaluated before `target`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub source: ResourceKey,
    pub target: ResourceKey,
}

impl Relationship {
    pub fn new(source: ResourceKey, target: ResourceKey) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.source, self.target)
    }
}

/// A synthetic resource description submitted for synchronization
///
/// Never part of the catalog; it only carries attributes to the
/// synchronization facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransientResource {
    pub key: ResourceKey,
    pub attributes: Attributes,
}

impl TransientResource {
    pub fn new(key: ResourceKey, attributes: Attributes) -> Self {
        Self { key, attributes }
    }

    /// Reproducible label for the submission: `type/title`
    pub fn label(&self) -> String {
        self.key.catalog_label()
    }
}

/// Outcome of a single property change during synchronization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Success,
    Failure,
    Noop,
    Audit,
}

/// A change event recorded while synchronizing a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub property: String,
    pub status: EventStatus,
    pub message: String,
}

impl Event {
    pub fn new(property: &str, status: EventStatus, message: &str) -> Self {
        Self {
            property: property.to_string(),
            status,
            message: message.to_string(),
        }
    }

    /// Check if the event reports a failure
    pub fn is_failure(&self) -> bool {
        self.status == EventStatus::Failure
    }
}

/// Synchronization status of one resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceStatus {
    pub events: Vec<Event>,
}

impl ResourceStatus {
    /// Events with failure status
    pub fn failed_events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_failure())
    }
}

/// Result of a synchronization submission, per resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub statuses: BTreeMap<ResourceKey, ResourceStatus>,
}

impl SyncReport {
    /// Record events for a resource
    pub fn record(&mut self, key: ResourceKey, events: Vec<Event>) {
        self.statuses.entry(key).or_default().events.extend(events);
    }

    /// Status for a resource, if the report mentions it
    pub fn status(&self, key: &ResourceKey) -> Option<&ResourceStatus> {
        self.statuses.get(key)
    }
}

/// Result of evaluating a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// No changes needed
    NoChange,
    /// Resource was modified
    Modified,
    /// Apply failed
    Failed { error: String },
    /// Apply was skipped
    Skipped { reason: String },
}

impl ApplyResult {
    /// Check if the result represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Summary of execution results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub modified: usize,
    pub skipped: usize,
    pub failed: usize,
    pub no_change: usize,
}

impl ExecuteSummary {
    /// Check if execution was fully successful (no failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total number of resources processed
    pub fn total(&self) -> usize {
        self.modified + self.skipped + self.failed + self.no_change
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, result: &ApplyResult) {
        match result {
            ApplyResult::NoChange => self.no_change += 1,
            ApplyResult::Modified => self.modified += 1,
            ApplyResult::Failed { .. } => self.failed += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
    }
}
