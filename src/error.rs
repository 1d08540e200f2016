//! Error types for transition evaluation

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a resource reference could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceProblem {
    /// Not of the form `Type[title]`
    Malformed,
    /// Well-formed, but absent from the catalog
    NotFound,
}

impl fmt::Display for ReferenceProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "expected a reference of the form Type[title]"),
            Self::NotFound => write!(f, "no such resource in the catalog"),
        }
    }
}

/// Errors that can occur while validating or evaluating a transition
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or unknown resource reference
    #[error("invalid resource reference '{reference}': {problem}")]
    InvalidReference {
        reference: String,
        problem: ReferenceProblem,
    },

    /// Override attributes are not a map, or name attributes the target lacks
    #[error("invalid attributes for {resource}: {reason}")]
    InvalidAttributeSet { resource: String, reason: String },

    /// A required parameter was not declared
    #[error("required parameter missing: {0}")]
    MissingRequiredField(&'static str),

    /// A parameter has a value outside its accepted set
    #[error("invalid value for {parameter}: {value} ({expected})")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Synchronization reported failing events
    #[error("could not transition {resource}: {message}")]
    ApplyFailure { resource: String, message: String },

    /// Failure reported by a host collaborator
    #[error(transparent)]
    Host(#[from] anyhow::Error),

    /// Declarations could not be parsed
    #[error("failed to parse transition declarations: {0}")]
    Parse(String),

    /// Declaration file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn reference(reference: impl fmt::Display, problem: ReferenceProblem) -> Self {
        Self::InvalidReference {
            reference: reference.to_string(),
            problem,
        }
    }

    /// Whether this error is raised before any synchronization is attempted
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidReference { .. }
                | Self::InvalidAttributeSet { .. }
                | Self::MissingRequiredField(_)
                | Self::InvalidParameter { .. }
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type for transition operations
pub type Result<T> = std::result::Result<T, Error>;
