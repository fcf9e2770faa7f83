//! Schema operations on one model.
//!
//! `create` always drops first, so it is safe to repeat and leaves an
//! empty table matching the model's current fields. `truncate` and `dump`
//! are accepted actions that do nothing yet; callers must not rely on them
//! having any effect.

use std::fmt;
use std::str::FromStr;

use seedbed_core::{ModelDescriptor, OperationResult, SchemaDefinition};
use tracing::debug;

use crate::error::{CommandError, Result, SchemaStep, ValidationError};
use crate::storage::StorageConnection;

/// Signature shared by every schema action handler.
pub type SchemaHandler =
    fn(&ModelDescriptor, &mut dyn StorageConnection) -> Result<Vec<OperationResult>>;

/// Actions accepted by `schema <action>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaAction {
    Create,
    Drop,
    Dump,
    Truncate,
}

impl SchemaAction {
    pub const ALL: [SchemaAction; 4] = [
        SchemaAction::Create,
        SchemaAction::Drop,
        SchemaAction::Dump,
        SchemaAction::Truncate,
    ];

    /// Validates the optional action argument of `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingAction`] when `action` is `None`
    /// and [`ValidationError::UnsupportedAction`] for unknown names.
    pub fn parse(action: Option<&str>) -> std::result::Result<Self, ValidationError> {
        action
            .ok_or(ValidationError::MissingAction { command: "schema" })?
            .parse()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaAction::Create => "create",
            SchemaAction::Drop => "drop",
            SchemaAction::Dump => "dump",
            SchemaAction::Truncate => "truncate",
        }
    }

    /// Returns the function implementing this action.
    pub fn handler(self) -> SchemaHandler {
        match self {
            SchemaAction::Create => create,
            SchemaAction::Drop => drop,
            SchemaAction::Dump => dump,
            SchemaAction::Truncate => truncate,
        }
    }
}

impl FromStr for SchemaAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SchemaAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ValidationError::UnsupportedAction {
                command: "schema",
                action: s.to_string(),
            })
    }
}

impl fmt::Display for SchemaAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drops the model's table, then creates it from the current definition.
pub fn create(
    model: &ModelDescriptor,
    conn: &mut dyn StorageConnection,
) -> Result<Vec<OperationResult>> {
    let mut results = drop(model, conn)?;

    let definition = SchemaDefinition::from_model(model);
    let statement = conn
        .create_schema(&model.table_name(), &definition)
        .map_err(|source| CommandError::SchemaOperationFailed {
            model: model.name.clone(),
            step: SchemaStep::Create,
            source,
        })?;
    debug!(model = %model.name, %statement, "created schema");
    results.push(OperationResult::ok(format!("Created {}.", model.name)).with_statement(statement));
    Ok(results)
}

/// Drops the model's table.
pub fn drop(
    model: &ModelDescriptor,
    conn: &mut dyn StorageConnection,
) -> Result<Vec<OperationResult>> {
    let statement =
        conn.drop_schema(&model.table_name())
            .map_err(|source| CommandError::SchemaOperationFailed {
                model: model.name.clone(),
                step: SchemaStep::Drop,
                source,
            })?;
    debug!(model = %model.name, %statement, "dropped schema");
    Ok(vec![
        OperationResult::ok(format!("Dropped {}.", model.name)).with_statement(statement),
    ])
}

/// Not implemented: reports success without touching storage.
pub fn truncate(
    model: &ModelDescriptor,
    _conn: &mut dyn StorageConnection,
) -> Result<Vec<OperationResult>> {
    debug!(model = %model.name, "truncate is a no-op");
    Ok(vec![OperationResult::ok(format!(
        "Truncate is not implemented; {} left unchanged.",
        model.name
    ))])
}

/// Not implemented: reports success without touching storage.
pub fn dump(
    model: &ModelDescriptor,
    _conn: &mut dyn StorageConnection,
) -> Result<Vec<OperationResult>> {
    debug!(model = %model.name, "dump is a no-op");
    Ok(vec![OperationResult::ok(format!(
        "Dump is not implemented; {} left unchanged.",
        model.name
    ))])
}
