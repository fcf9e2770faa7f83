//! Conversion of fixture records into parameterized `INSERT` statements.
//!
//! Column names go through the same identifier check as DDL; values are
//! always bound as parameters, never spliced into the statement.

use rusqlite::types::Value as SqlValue;
use seedbed_core::Record;
use serde_json::Value;

use crate::error::{Result, SqliteError};
use crate::schema::quote_identifier;

/// Converts a JSON value to the SQLite value bound for it.
///
/// Booleans become `0`/`1`. Arrays and objects are stored as their JSON
/// text.
pub(crate) fn json_to_sql(value: &Value) -> Result<SqlValue> {
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::Integer(i)
            } else if n.is_u64() {
                return Err(SqliteError::ConversionError(format!(
                    "integer {n} does not fit in 64 signed bits"
                )));
            } else if let Some(f) = n.as_f64() {
                SqlValue::Real(f)
            } else {
                return Err(SqliteError::ConversionError(format!(
                    "unsupported number {n}"
                )));
            }
        }
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
    })
}

/// Builds the `INSERT` statement and its bound values for one record.
///
/// An empty record inserts a row of column defaults.
pub(crate) fn insert_statement(table: &str, record: &Record) -> Result<(String, Vec<SqlValue>)> {
    let table = quote_identifier(table)?;
    if record.is_empty() {
        return Ok((format!("INSERT INTO {table} DEFAULT VALUES"), Vec::new()));
    }

    let mut columns = Vec::with_capacity(record.len());
    let mut placeholders = Vec::with_capacity(record.len());
    let mut values = Vec::with_capacity(record.len());
    for (i, (column, value)) in record.iter().enumerate() {
        columns.push(quote_identifier(column)?);
        placeholders.push(format!("?{}", i + 1));
        values.push(json_to_sql(value)?);
    }

    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );
    Ok((sql, values))
}
