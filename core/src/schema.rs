use serde::Serialize;

use crate::types::{Constraint, FieldDefinition, ModelDescriptor, TableOptions};

/// Storage-independent definition of one table, derived from a model.
///
/// Built fresh from a [`ModelDescriptor`] right before every create so the
/// current field definitions are always what gets applied. It is never
/// cached.
///
/// # Examples
///
/// ```
/// use seedbed_core::*;
///
/// let model = ModelDescriptor::new("Roles")
///     .with_field(FieldDefinition::id("id"))
///     .with_field(FieldDefinition::new("name", FieldType::String));
/// let schema = SchemaDefinition::from_model(&model);
/// assert_eq!(schema.fields.len(), 2);
/// assert!(schema.constraints.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDefinition {
    pub fields: Vec<FieldDefinition>,
    pub constraints: Vec<Constraint>,
    pub table: Option<TableOptions>,
}

impl SchemaDefinition {
    /// Derives the table definition from the model's current fields and metadata.
    pub fn from_model(model: &ModelDescriptor) -> Self {
        Self {
            fields: model.fields.clone(),
            constraints: model.meta.constraints.clone(),
            table: model.meta.table,
        }
    }
}
