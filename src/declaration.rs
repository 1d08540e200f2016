//! Transition declarations loaded from TOML or JSON
//!
//! ```toml
//! [[transition]]
//! name = "stop puppet service"
//! resource = "Service[puppet]"
//! attributes = { ensure = "stopped" }
//! prior_to = "File[/tmp/test.cfg]"
//! ```

use crate::error::{Error, Result};
use crate::reference::ResourceReference;
use crate::transition::Transition;
use declarative::Value;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A single reference or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

/// A transition as written by the user, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionDecl {
    /// Free-form label; defaults to the resource reference
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub attributes: Option<Value>,
    #[serde(default)]
    pub prior_to: Option<OneOrMany>,
    #[serde(default)]
    pub enable: Option<Value>,
}

impl TryFrom<TransitionDecl> for Transition {
    type Error = Error;

    fn try_from(decl: TransitionDecl) -> Result<Self> {
        let resource = decl
            .resource
            .ok_or(Error::MissingRequiredField("resource"))?;
        let attributes = decl
            .attributes
            .ok_or(Error::MissingRequiredField("attributes"))?;
        let prior_to = decl
            .prior_to
            .ok_or(Error::MissingRequiredField("prior_to"))?;

        let Value::Map(attributes) = attributes else {
            return Err(Error::InvalidAttributeSet {
                resource,
                reason: format!("expected a hash of attribute names to values, got {attributes}"),
            });
        };

        let enable = match decl.enable {
            None => true,
            Some(value) => parse_enable(&value)?,
        };

        let name = decl.name.unwrap_or_else(|| resource.clone());
        let gates = prior_to
            .into_vec()
            .into_iter()
            .map(ResourceReference::from)
            .collect();

        Ok(Transition::new(&name, resource, attributes, gates)?.with_enable(enable))
    }
}

fn parse_enable(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(enable) => Ok(*enable),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        other => Err(Error::InvalidParameter {
            parameter: "enable",
            value: other.to_string(),
            expected: "true or false",
        }),
    }
}

/// A set of transition declarations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Declarations {
    #[serde(default, rename = "transition")]
    pub transitions: Vec<TransitionDecl>,
}

impl Declarations {
    /// Parse `[[transition]]` tables
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a JSON array of declarations or a `{"transition": [...]}` object
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        if value.is_array() {
            Ok(Self {
                transitions: serde_json::from_value(value)?,
            })
        } else {
            Ok(serde_json::from_value(value)?)
        }
    }

    /// Load declarations from a `.toml` or `.json` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let declarations = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            _ => Self::from_toml_str(&content)?,
        };
        log::debug!(
            "Loaded {} transition declarations from {}",
            declarations.transitions.len(),
            path.display()
        );
        Ok(declarations)
    }

    /// Build transitions, failing on the first invalid declaration
    pub fn into_transitions(self) -> Result<Vec<Transition>> {
        self.transitions.into_iter().map(Transition::try_from).collect()
    }
}
