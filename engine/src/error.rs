//! Error types for command execution.
//!
//! [`CommandError`] is the taxonomy every seedbed command reports to the
//! operator. Any error ends the whole invocation; nothing is retried and
//! completed work on earlier models is kept.

use std::fmt;

use seedbed_registry::{EntityKind, RegistryError};
use thiserror::Error;

/// Failure reported by a storage driver.
///
/// Drivers convert their own error types into this one so the engine does
/// not depend on any particular driver.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StorageError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl StorageError {
    /// Creates an error from a message alone.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps a driver error, keeping it as the source.
    pub fn from_source(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Invalid command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The command requires an action and none was given.
    #[error("missing action for '{command}'")]
    MissingAction { command: &'static str },
    /// The action is not one the command supports.
    #[error("Unsupported action '{action}'")]
    UnsupportedAction { command: &'static str, action: String },
    /// The model list contains an empty entry.
    #[error("malformed model list '{0}'")]
    MalformedSelector(String),
}

/// Schema operation name used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStep {
    Create,
    Drop,
}

impl fmt::Display for SchemaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SchemaStep::Create => "create",
            SchemaStep::Drop => "drop",
        })
    }
}

/// Errors that end a seedbed command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A model, fixture, or connection name did not resolve.
    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },

    /// The driver rejected a create or drop.
    #[error("Could not {step} `{model}` schema: {source}")]
    SchemaOperationFailed {
        model: String,
        step: SchemaStep,
        #[source]
        source: StorageError,
    },

    /// A seed record failed to persist. `inserted` records went in before it.
    #[error("Error inserting for model {model} after {inserted} records: {source}")]
    FixtureInsertFailed {
        model: String,
        inserted: usize,
        #[source]
        source: StorageError,
    },

    /// The connector could not open a connection.
    #[error("failed to open connection '{name}': {source}")]
    Connection {
        name: String,
        #[source]
        source: StorageError,
    },

    /// Integrity checks could not be toggled.
    #[error("failed to toggle integrity checks: {source}")]
    Integrity {
        #[source]
        source: StorageError,
    },

    /// Configuration or registry failure.
    #[error(transparent)]
    Registry(RegistryError),
}

impl From<RegistryError> for CommandError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound { kind, name } => CommandError::NotFound { kind, name },
            RegistryError::MalformedSelector(raw) => {
                CommandError::Validation(ValidationError::MalformedSelector(raw))
            }
            other => CommandError::Registry(other),
        }
    }
}

/// Convenience alias for results with [`CommandError`].
pub type Result<T> = std::result::Result<T, CommandError>;
