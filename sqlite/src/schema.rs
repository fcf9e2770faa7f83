//! DDL generation from schema definitions.
//!
//! Every table and column name is checked with
//! [`is_identifier`](seedbed_core::is_identifier) and then double-quoted, so
//! model definitions cannot inject SQL through names. `CHECK` expressions
//! are the exception: they are written into the statement as given.
//!
//! # Type mapping
//!
//! | Field type | Column |
//! |---|---|
//! | `id` | `INTEGER PRIMARY KEY AUTOINCREMENT` |
//! | `integer`, `boolean` | `INTEGER` |
//! | `float` | `REAL` |
//! | `string` | `TEXT`, plus `CHECK (length(col) <= n)` when a length is set |
//! | `text`, `date`, `datetime`, `json` | `TEXT` |

use seedbed_core::{
    Constraint, FieldDefinition, FieldType, ReferentialAction, SchemaDefinition, TableOptions,
    is_identifier,
};
use serde_json::Value;

use crate::error::{Result, SqliteError};

/// Default expressions SQLite evaluates at insert time.
const TIME_KEYWORDS: [&str; 3] = ["CURRENT_TIMESTAMP", "CURRENT_DATE", "CURRENT_TIME"];

/// Returns `name` double-quoted after checking it is a plain identifier.
pub(crate) fn quote_identifier(name: &str) -> Result<String> {
    if !is_identifier(name) {
        return Err(SqliteError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("\"{name}\""))
}

fn quote_all(names: &[String]) -> Result<String> {
    let quoted = names
        .iter()
        .map(|n| quote_identifier(n))
        .collect::<Result<Vec<_>>>()?;
    Ok(quoted.join(", "))
}

/// Generates the `CREATE TABLE` statement for `table`.
///
/// # Errors
///
/// Returns [`SqliteError::InvalidIdentifier`] for unsafe table or column
/// names and [`SqliteError::ConversionError`] when the definition has no
/// fields.
///
/// # Examples
///
/// ```
/// use seedbed_core::*;
/// use seedbed_sqlite::generate_create_sql;
///
/// let model = ModelDescriptor::new("Roles")
///     .with_field(FieldDefinition::id("id"))
///     .with_field(FieldDefinition::new("name", FieldType::String).with_length(50).not_null());
/// let sql = generate_create_sql("roles", &SchemaDefinition::from_model(&model)).unwrap();
/// assert!(sql.starts_with("CREATE TABLE \"roles\" ("));
/// assert!(sql.contains("\"id\" INTEGER PRIMARY KEY AUTOINCREMENT"));
/// assert!(sql.contains("\"name\" TEXT NOT NULL CHECK (length(\"name\") <= 50)"));
/// ```
pub fn generate_create_sql(table: &str, schema: &SchemaDefinition) -> Result<String> {
    let table_name = quote_identifier(table)?;
    if schema.fields.is_empty() {
        return Err(SqliteError::ConversionError(format!(
            "table {table} has no columns"
        )));
    }
    let options = schema.table.unwrap_or_default();

    // A single `primary` field is a column constraint; several become one
    // composite table-level key.
    let primary: Vec<String> = schema
        .fields
        .iter()
        .filter(|f| f.primary && f.field_type != FieldType::Id)
        .map(|f| f.name.clone())
        .collect();
    let inline_primary = primary.len() == 1;

    let mut lines = Vec::with_capacity(schema.fields.len() + schema.constraints.len() + 1);
    for field in &schema.fields {
        lines.push(column_sql(field, &options, inline_primary)?);
    }
    if primary.len() > 1 {
        lines.push(format!("PRIMARY KEY ({})", quote_all(&primary)?));
    }
    for constraint in &schema.constraints {
        lines.push(constraint_sql(constraint)?);
    }

    let mut sql = format!("CREATE TABLE {table_name} (\n    {}\n)", lines.join(",\n    "));
    let suffixes: Vec<&str> = [
        options.strict.then_some("STRICT"),
        options.without_rowid.then_some("WITHOUT ROWID"),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !suffixes.is_empty() {
        sql.push(' ');
        sql.push_str(&suffixes.join(", "));
    }
    Ok(sql)
}

/// Generates the `DROP TABLE` statement for `table`.
///
/// Dropping a table that does not exist is not an error.
pub fn generate_drop_sql(table: &str) -> Result<String> {
    Ok(format!("DROP TABLE IF EXISTS {}", quote_identifier(table)?))
}

fn column_sql(field: &FieldDefinition, options: &TableOptions, inline_primary: bool) -> Result<String> {
    let name = quote_identifier(&field.name)?;

    if field.field_type == FieldType::Id {
        // AUTOINCREMENT needs a rowid.
        return Ok(if options.without_rowid {
            format!("{name} INTEGER PRIMARY KEY")
        } else {
            format!("{name} INTEGER PRIMARY KEY AUTOINCREMENT")
        });
    }

    let mut sql = format!("{name} {}", column_type(field.field_type));
    if field.primary && inline_primary {
        sql.push_str(" PRIMARY KEY");
    }
    if !field.nullable {
        sql.push_str(" NOT NULL");
    }
    if field.unique {
        sql.push_str(" UNIQUE");
    }
    if let Some(default) = &field.default {
        sql.push_str(" DEFAULT ");
        sql.push_str(&default_literal(default));
    }
    if let (FieldType::String, Some(length)) = (field.field_type, field.length) {
        sql.push_str(&format!(" CHECK (length({name}) <= {length})"));
    }
    Ok(sql)
}

fn column_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Id | FieldType::Integer | FieldType::Boolean => "INTEGER",
        FieldType::Float => "REAL",
        FieldType::String
        | FieldType::Text
        | FieldType::Date
        | FieldType::DateTime
        | FieldType::Json => "TEXT",
    }
}

/// Renders a JSON default as an SQL literal.
fn default_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => String::from(if *b { "1" } else { "0" }),
        Value::Number(n) => n.to_string(),
        Value::String(s) if TIME_KEYWORDS.contains(&s.to_ascii_uppercase().as_str()) => {
            s.to_ascii_uppercase()
        }
        Value::String(s) => quote_literal(s),
        Value::Array(_) | Value::Object(_) => quote_literal(&value.to_string()),
    }
}

fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn constraint_sql(constraint: &Constraint) -> Result<String> {
    Ok(match constraint {
        Constraint::ForeignKey {
            column,
            to,
            to_column,
            on_delete,
        } => {
            let mut sql = format!(
                "FOREIGN KEY ({}) REFERENCES {}({})",
                quote_identifier(column)?,
                quote_identifier(to)?,
                quote_identifier(to_column)?
            );
            if let Some(action) = on_delete {
                sql.push_str(" ON DELETE ");
                sql.push_str(referential_action(*action));
            }
            sql
        }
        Constraint::Unique { columns } => format!("UNIQUE ({})", quote_all(columns)?),
        Constraint::PrimaryKey { columns } => format!("PRIMARY KEY ({})", quote_all(columns)?),
        Constraint::Check { expression } => format!("CHECK ({expression})"),
    })
}

fn referential_action(action: ReferentialAction) -> &'static str {
    match action {
        ReferentialAction::Cascade => "CASCADE",
        ReferentialAction::SetNull => "SET NULL",
        ReferentialAction::SetDefault => "SET DEFAULT",
        ReferentialAction::Restrict => "RESTRICT",
        ReferentialAction::NoAction => "NO ACTION",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedbed_core::ModelDescriptor;
    use serde_json::json;

    fn create(model: &ModelDescriptor) -> Result<String> {
        generate_create_sql(&model.table_name(), &SchemaDefinition::from_model(model))
    }

    #[test]
    fn test_create_sql_layout() {
        let model = ModelDescriptor::new("Users")
            .with_field(FieldDefinition::id("id"))
            .with_field(FieldDefinition::new("email", FieldType::String).not_null().unique());
        assert_eq!(
            create(&model).unwrap(),
            "CREATE TABLE \"users\" (\n    \"id\" INTEGER PRIMARY KEY AUTOINCREMENT,\n    \"email\" TEXT NOT NULL UNIQUE\n)"
        );
    }

    #[test]
    fn test_column_types() {
        let model = ModelDescriptor::new("Everything")
            .with_field(FieldDefinition::new("i", FieldType::Integer))
            .with_field(FieldDefinition::new("f", FieldType::Float))
            .with_field(FieldDefinition::new("b", FieldType::Boolean))
            .with_field(FieldDefinition::new("d", FieldType::Date))
            .with_field(FieldDefinition::new("dt", FieldType::DateTime))
            .with_field(FieldDefinition::new("j", FieldType::Json))
            .with_field(FieldDefinition::new("t", FieldType::Text));
        let sql = create(&model).unwrap();
        for column in [
            "\"i\" INTEGER",
            "\"f\" REAL",
            "\"b\" INTEGER",
            "\"d\" TEXT",
            "\"dt\" TEXT",
            "\"j\" TEXT",
            "\"t\" TEXT",
        ] {
            assert!(sql.contains(column), "missing {column} in {sql}");
        }
    }

    #[test]
    fn test_defaults() {
        let model = ModelDescriptor::new("Posts")
            .with_field(FieldDefinition::new("title", FieldType::String).with_default(json!("it's")))
            .with_field(FieldDefinition::new("published", FieldType::Boolean).with_default(json!(false)))
            .with_field(FieldDefinition::new("score", FieldType::Float).with_default(json!(1.5)))
            .with_field(
                FieldDefinition::new("created", FieldType::DateTime)
                    .with_default(json!("current_timestamp")),
            )
            .with_field(FieldDefinition::new("tags", FieldType::Json).with_default(json!(["a"])));
        let sql = create(&model).unwrap();
        assert!(sql.contains("\"title\" TEXT DEFAULT 'it''s'"));
        assert!(sql.contains("\"published\" INTEGER DEFAULT 0"));
        assert!(sql.contains("\"score\" REAL DEFAULT 1.5"));
        assert!(sql.contains("\"created\" TEXT DEFAULT CURRENT_TIMESTAMP"));
        assert!(sql.contains("\"tags\" TEXT DEFAULT '[\"a\"]'"));
    }

    #[test]
    fn test_table_constraints() {
        let model = ModelDescriptor::new("Memberships")
            .with_field(FieldDefinition::new("user_id", FieldType::Integer).not_null())
            .with_field(FieldDefinition::new("role_id", FieldType::Integer).not_null())
            .with_constraint(Constraint::PrimaryKey {
                columns: vec!["user_id".into(), "role_id".into()],
            })
            .with_constraint(Constraint::ForeignKey {
                column: "role_id".into(),
                to: "roles".into(),
                to_column: "id".into(),
                on_delete: Some(ReferentialAction::SetNull),
            })
            .with_constraint(Constraint::Check {
                expression: "user_id > 0".into(),
            });
        let sql = create(&model).unwrap();
        assert!(sql.contains("PRIMARY KEY (\"user_id\", \"role_id\")"));
        assert!(sql.contains("FOREIGN KEY (\"role_id\") REFERENCES \"roles\"(\"id\") ON DELETE SET NULL"));
        assert!(sql.contains("CHECK (user_id > 0)"));
    }

    #[test]
    fn test_composite_primary_from_fields() {
        let mut a = FieldDefinition::new("a", FieldType::Integer);
        a.primary = true;
        let mut b = FieldDefinition::new("b", FieldType::Integer);
        b.primary = true;
        let model = ModelDescriptor::new("Pairs").with_field(a.clone()).with_field(b);
        let sql = create(&model).unwrap();
        assert!(sql.contains("PRIMARY KEY (\"a\", \"b\")"));
        assert!(!sql.contains("\"a\" INTEGER PRIMARY KEY"));

        let single = ModelDescriptor::new("Singles").with_field(a);
        assert!(create(&single).unwrap().contains("\"a\" INTEGER PRIMARY KEY"));
    }

    #[test]
    fn test_table_options() {
        let mut model = ModelDescriptor::new("Codes")
            .with_field(FieldDefinition::id("id"))
            .with_field(FieldDefinition::new("code", FieldType::Text));
        model.meta.table = Some(TableOptions {
            strict: true,
            without_rowid: true,
        });
        let sql = create(&model).unwrap();
        assert!(sql.ends_with(") STRICT, WITHOUT ROWID"));
        assert!(sql.contains("\"id\" INTEGER PRIMARY KEY,"));
    }

    #[test]
    fn test_rejects_unsafe_identifiers() {
        let model = ModelDescriptor::new("Users").with_field(FieldDefinition::id("id"));
        assert!(matches!(
            generate_create_sql("users; DROP TABLE x", &SchemaDefinition::from_model(&model)),
            Err(SqliteError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            generate_drop_sql("a\"b"),
            Err(SqliteError::InvalidIdentifier(_))
        ));

        let model = ModelDescriptor::new("Users").with_field(FieldDefinition::new("bad name", FieldType::Text));
        assert!(matches!(create(&model), Err(SqliteError::InvalidIdentifier(_))));
    }

    #[test]
    fn test_rejects_empty_table() {
        let model = ModelDescriptor::new("Empty");
        assert!(matches!(create(&model), Err(SqliteError::ConversionError(_))));
    }

    #[test]
    fn test_drop_sql() {
        assert_eq!(generate_drop_sql("users").unwrap(), "DROP TABLE IF EXISTS \"users\"");
    }
}
