//! Error types for configuration, registry, and resolution operations.
//!
//! Provides a unified error type covering file access, parsing, definition
//! validation, and name resolution failures.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Kind of entity a name failed to resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Model,
    Fixture,
    Connection,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Model => "model",
            EntityKind::Fixture => "fixture",
            EntityKind::Connection => "connection",
        })
    }
}

/// Errors that can occur while loading or querying registries.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A definition file could not be read or parsed.
    #[error("failed to load {path}: {message}")]
    InvalidFile { path: PathBuf, message: String },

    /// Model definition failed validation.
    #[error("invalid model {name}: {message}")]
    InvalidModel { name: String, message: String },

    /// Fixture definition is inconsistent with the model it was resolved for.
    #[error("invalid fixture {name}: {message}")]
    InvalidFixture { name: String, message: String },

    /// Two registered models share a name.
    #[error("duplicate model: {0}")]
    DuplicateModel(String),

    /// Two registered fixtures share a name.
    #[error("duplicate fixture: {0}")]
    DuplicateFixture(String),

    /// The requested environment is not configured.
    #[error("unknown environment '{0}'")]
    UnknownEnvironment(String),

    /// Selector contains an empty name (e.g. `Users,,Roles`).
    #[error("malformed selector '{0}': names must be comma-separated without empty entries")]
    MalformedSelector(String),

    /// A named entity is not registered.
    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },
}

/// Convenience alias for results with [`RegistryError`].
pub type Result<T> = std::result::Result<T, RegistryError>;
