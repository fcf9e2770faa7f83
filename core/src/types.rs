//! Model definition types.
//!
//! This module defines the data model used to describe one storage entity:
//! its fields, its backing table, table-level constraints, and which storage
//! connection it lives on. The types are designed for serialization with
//! [`serde`] so model definitions can be kept as YAML or JSON files.

use serde::{Deserialize, Serialize};

/// Name of the connection a model uses when its definition does not name one.
pub const DEFAULT_CONNECTION: &str = "default";

/// Storage type of a model field.
///
/// # Examples
///
/// ```
/// use seedbed_core::FieldType;
///
/// let ty: FieldType = serde_json::from_str("\"datetime\"").unwrap();
/// assert_eq!(ty, FieldType::DateTime);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Auto-incrementing integer primary key.
    Id,
    /// Integer value.
    Integer,
    /// Floating point value.
    Float,
    /// Bounded string (see [`FieldDefinition::length`]).
    #[default]
    String,
    /// Unbounded text.
    Text,
    /// Boolean value.
    Boolean,
    /// Calendar date.
    Date,
    /// Date and time.
    DateTime,
    /// Structured JSON document.
    Json,
}

/// Definition of a single model field.
///
/// # Examples
///
/// ```
/// use seedbed_core::{FieldDefinition, FieldType};
///
/// let email = FieldDefinition::new("email", FieldType::String)
///     .with_length(255)
///     .not_null()
///     .unique();
/// assert!(!email.nullable);
/// assert!(email.unique);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Column name
    pub name: String,
    /// Storage type
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Maximum length for string fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// Whether the column accepts NULL
    #[serde(rename = "null", default = "default_true")]
    pub nullable: bool,
    /// Column default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Whether the column carries a UNIQUE constraint
    #[serde(default)]
    pub unique: bool,
    /// Whether the column is the primary key
    #[serde(default)]
    pub primary: bool,
}

impl FieldDefinition {
    /// Creates a nullable field with no default.
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            length: None,
            nullable: true,
            default: None,
            unique: false,
            primary: false,
        }
    }

    /// Creates an `id` primary key field.
    pub fn id(name: &str) -> Self {
        Self {
            nullable: false,
            primary: true,
            ..Self::new(name, FieldType::Id)
        }
    }

    /// Sets the maximum length.
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Marks the field as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the field as UNIQUE.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Action taken on dependent rows when a referenced row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
    NoAction,
}

/// Table-level constraint declared in a model's metadata.
///
/// # Examples
///
/// ```
/// use seedbed_core::Constraint;
///
/// let fk: Constraint = serde_json::from_str(
///     r#"{"type": "foreign_key", "column": "role_id", "to": "roles"}"#,
/// ).unwrap();
/// assert_eq!(fk.columns(), vec!["role_id"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    /// `FOREIGN KEY (column) REFERENCES to(to_column)`
    ForeignKey {
        column: String,
        to: String,
        #[serde(default = "default_reference_column")]
        to_column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        on_delete: Option<ReferentialAction>,
    },
    /// Composite `UNIQUE (columns...)`
    Unique { columns: Vec<String> },
    /// Composite `PRIMARY KEY (columns...)`
    PrimaryKey { columns: Vec<String> },
    /// `CHECK (expression)`
    Check { expression: String },
}

impl Constraint {
    /// Returns the local columns this constraint refers to.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Constraint::ForeignKey { column, .. } => vec![column.as_str()],
            Constraint::Unique { columns } | Constraint::PrimaryKey { columns } => {
                columns.iter().map(String::as_str).collect()
            }
            Constraint::Check { .. } => Vec::new(),
        }
    }
}

/// Storage-specific table options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Enforce column types strictly
    #[serde(default)]
    pub strict: bool,
    /// Store the table without an implicit row id
    #[serde(default)]
    pub without_rowid: bool,
}

/// Optional table-level metadata of a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableOptions>,
}

/// Complete description of one model.
///
/// A descriptor is a read-only view produced by a registry each time a model
/// is resolved. It names the backing table ([`table_name`](Self::table_name)),
/// lists the fields in column order, and records which storage connection
/// the model lives on.
///
/// # Examples
///
/// ```
/// use seedbed_core::*;
///
/// let users = ModelDescriptor::new("UserAccounts")
///     .with_field(FieldDefinition::id("id"))
///     .with_field(FieldDefinition::new("name", FieldType::String).not_null());
///
/// assert_eq!(users.table_name(), "user_accounts");
/// assert_eq!(users.connection.as_deref(), Some(DEFAULT_CONNECTION));
/// assert!(users.persist);
/// assert!(validate_model(&users).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model name used on the command line (e.g. "Users")
    pub name: String,
    /// Explicit table name; derived from `name` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Fields in column order
    pub fields: Vec<FieldDefinition>,
    /// Constraints and table options
    #[serde(default)]
    pub meta: ModelMeta,
    /// Whether bulk schema operations include this model
    #[serde(default = "default_true")]
    pub persist: bool,
    /// Connection name; `None` means the model is not backed by storage
    #[serde(default = "default_connection")]
    pub connection: Option<String>,
}

impl ModelDescriptor {
    /// Creates a persisted model on the default connection with no fields.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            source: None,
            fields: Vec::new(),
            meta: ModelMeta::default(),
            persist: true,
            connection: default_connection(),
        }
    }

    /// Adds a field.
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a table-level constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.meta.constraints.push(constraint);
        self
    }

    /// Sets an explicit table name.
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    /// Sets the connection name, or detaches the model with `None`.
    pub fn with_connection(mut self, connection: Option<&str>) -> Self {
        self.connection = connection.map(String::from);
        self
    }

    /// Sets whether bulk operations include this model.
    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Returns the backing table name.
    ///
    /// Uses `source` when set, otherwise converts the model name from
    /// CamelCase to snake_case.
    pub fn table_name(&self) -> String {
        match &self.source {
            Some(source) => source.clone(),
            None => tableize(&self.name),
        }
    }
}

/// Converts a CamelCase model name into a snake_case table name.
///
/// # Examples
///
/// ```
/// assert_eq!(seedbed_core::tableize("Users"), "users");
/// assert_eq!(seedbed_core::tableize("UserRoles"), "user_roles");
/// assert_eq!(seedbed_core::tableize("HTTPLogs"), "http_logs");
/// ```
pub fn tableize(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            if i > 0 && (prev_lower || (prev_upper && next_lower)) && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn default_true() -> bool {
    true
}

fn default_connection() -> Option<String> {
    Some(DEFAULT_CONNECTION.to_string())
}

fn default_reference_column() -> String {
    "id".to_string()
}
