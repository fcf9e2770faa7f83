//! Model definition validation.
//!
//! Validates structural invariants of model descriptors, catching problems
//! such as duplicate fields, unsafe identifiers, and constraints on unknown
//! columns before any DDL is generated from them.
//!
//! # Examples
//!
//! ```
//! use seedbed_core::*;
//!
//! let users = ModelDescriptor::new("Users").with_field(FieldDefinition::id("id"));
//! assert!(validate_model(&users).is_empty());
//!
//! // Invalid: no fields at all
//! let empty = ModelDescriptor::new("Users");
//! assert_eq!(validate_model(&empty), vec![DefinitionError::NoFields("Users".into())]);
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{Constraint, ModelDescriptor};

/// Model definition errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// Model name is empty or whitespace-only.
    #[error("model name cannot be empty")]
    EmptyModelName,
    /// Model declares no fields.
    #[error("model {0} declares no fields")]
    NoFields(String),
    /// Table, field, or referenced name is not a plain identifier.
    #[error("invalid identifier '{0}': must start with a letter or underscore and contain only alphanumerics and underscores")]
    InvalidIdentifier(String),
    /// Two fields share a name.
    #[error("duplicate field in model: {0}")]
    DuplicateField(String),
    /// A constraint refers to a column the model does not declare.
    #[error("constraint references unknown column: {0}")]
    UnknownColumn(String),
    /// A constraint lists no columns.
    #[error("constraint must name at least one column")]
    EmptyConstraint,
}

/// Returns `true` if `name` is safe to use as an unquoted SQL identifier.
///
/// # Examples
///
/// ```
/// assert!(seedbed_core::is_identifier("user_roles"));
/// assert!(!seedbed_core::is_identifier("users; drop"));
/// assert!(!seedbed_core::is_identifier("1users"));
/// ```
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validates a model descriptor.
///
/// Checks for an empty name, a missing field list, invalid identifiers,
/// duplicate fields, and constraints referencing undeclared columns.
/// Stops at the first problem found.
pub fn validate_model(model: &ModelDescriptor) -> Vec<DefinitionError> {
    let mut errors = Vec::new();

    if model.name.trim().is_empty() {
        errors.push(DefinitionError::EmptyModelName);
        return errors;
    }

    let table = model.table_name();
    if !is_identifier(&table) {
        errors.push(DefinitionError::InvalidIdentifier(table));
        return errors;
    }

    if model.fields.is_empty() {
        errors.push(DefinitionError::NoFields(model.name.clone()));
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for field in &model.fields {
        if !is_identifier(&field.name) {
            errors.push(DefinitionError::InvalidIdentifier(field.name.clone()));
            return errors;
        }
        if !seen.insert(field.name.as_str()) {
            errors.push(DefinitionError::DuplicateField(field.name.clone()));
            return errors;
        }
    }

    for constraint in &model.meta.constraints {
        errors.extend(validate_constraint(constraint, &seen));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_constraint(constraint: &Constraint, fields: &HashSet<&str>) -> Vec<DefinitionError> {
    let mut errors = Vec::new();

    if let Constraint::ForeignKey { to, to_column, .. } = constraint {
        for name in [to, to_column] {
            if !is_identifier(name) {
                errors.push(DefinitionError::InvalidIdentifier(name.clone()));
                return errors;
            }
        }
    }

    let columns = constraint.columns();
    if columns.is_empty() && !matches!(constraint, Constraint::Check { .. }) {
        errors.push(DefinitionError::EmptyConstraint);
        return errors;
    }
    for column in columns {
        if !fields.contains(column) {
            errors.push(DefinitionError::UnknownColumn(column.to_string()));
            return errors;
        }
    }

    errors
}
