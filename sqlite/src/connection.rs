//! SQLite implementation of [`StorageConnection`].

use std::path::Path;

use rusqlite::{Connection, params, params_from_iter};
use seedbed_core::{Record, SchemaDefinition};
use seedbed_engine::{StorageConnection, StorageError};
use tracing::debug;

use crate::convert::insert_statement;
use crate::error::Result;
use crate::schema::{generate_create_sql, generate_drop_sql};

/// One open SQLite database.
///
/// Foreign key enforcement is switched on when the connection opens, since
/// SQLite leaves it off by default.
///
/// # Examples
///
/// ```
/// use seedbed_core::*;
/// use seedbed_engine::StorageConnection;
/// use seedbed_sqlite::SqliteConnection;
///
/// let mut conn = SqliteConnection::open_in_memory().unwrap();
/// let model = ModelDescriptor::new("Roles").with_field(FieldDefinition::id("id"));
/// conn.create_schema("roles", &SchemaDefinition::from_model(&model)).unwrap();
/// assert!(conn.table_exists("roles").unwrap());
/// ```
pub struct SqliteConnection {
    conn: Connection,
}

impl SqliteConnection {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wraps an existing connection.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// The underlying rusqlite connection.
    pub fn inner(&self) -> &Connection {
        &self.conn
    }

    /// Returns `true` if a table named `table` exists.
    pub fn table_exists(&self, table: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Number of rows in `table`.
    pub fn row_count(&self, table: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", crate::schema::quote_identifier(table)?);
        Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
    }

    /// Column names of `table` in declaration order.
    pub fn columns(&self, table: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let rows = stmt.query_map(params![table], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<String>, _>>()?)
    }

    /// Whether foreign key enforcement is currently on.
    pub fn integrity_checks_enabled(&self) -> Result<bool> {
        let enabled: i64 = self
            .conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;
        Ok(enabled == 1)
    }

    fn create(&mut self, table: &str, schema: &SchemaDefinition) -> Result<String> {
        let sql = generate_create_sql(table, schema)?;
        self.conn.execute_batch(&sql)?;
        debug!(table, "created table");
        Ok(sql)
    }

    fn drop_table(&mut self, table: &str) -> Result<String> {
        let sql = generate_drop_sql(table)?;
        self.conn.execute_batch(&sql)?;
        debug!(table, "dropped table");
        Ok(sql)
    }

    fn insert_record(&mut self, table: &str, record: &Record) -> Result<String> {
        let (sql, values) = insert_statement(table, record)?;
        self.conn.execute(&sql, params_from_iter(values))?;
        Ok(sql)
    }

    fn execute(&mut self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }
}

impl StorageConnection for SqliteConnection {
    fn create_schema(
        &mut self,
        table: &str,
        schema: &SchemaDefinition,
    ) -> std::result::Result<String, StorageError> {
        Ok(self.create(table, schema)?)
    }

    fn drop_schema(&mut self, table: &str) -> std::result::Result<String, StorageError> {
        Ok(self.drop_table(table)?)
    }

    fn insert(&mut self, table: &str, record: &Record) -> std::result::Result<String, StorageError> {
        Ok(self.insert_record(table, record)?)
    }

    fn set_integrity_checks(&mut self, enabled: bool) -> std::result::Result<(), StorageError> {
        let pragma = if enabled {
            "PRAGMA foreign_keys = ON;"
        } else {
            "PRAGMA foreign_keys = OFF;"
        };
        Ok(self.execute(pragma)?)
    }

    fn begin(&mut self) -> std::result::Result<(), StorageError> {
        Ok(self.execute("BEGIN")?)
    }

    fn commit(&mut self) -> std::result::Result<(), StorageError> {
        Ok(self.execute("COMMIT")?)
    }

    fn rollback(&mut self) -> std::result::Result<(), StorageError> {
        Ok(self.execute("ROLLBACK")?)
    }
}
