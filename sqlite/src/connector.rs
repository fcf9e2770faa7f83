//! Opens SQLite connections by configured name.

use std::collections::BTreeMap;

use seedbed_engine::{Connector, StorageConnection, StorageError};
use seedbed_registry::{ConnectionConfig, IN_MEMORY_DATABASE, Project};
use tracing::debug;

use crate::connection::SqliteConnection;
use crate::error::{Result, SqliteError};

/// Adapter name this driver accepts.
pub const ADAPTER: &str = "sqlite";

/// [`Connector`] over the connection map of one environment.
///
/// Every call to [`connect`](Connector::connect) opens a new connection.
/// `:memory:` databases therefore start empty each time.
#[derive(Debug, Clone, Default)]
pub struct SqliteConnector {
    connections: BTreeMap<String, ConnectionConfig>,
}

impl SqliteConnector {
    pub fn new(connections: BTreeMap<String, ConnectionConfig>) -> Self {
        Self { connections }
    }

    /// Uses the active environment's connections of `project`.
    pub fn from_project(project: &Project) -> Self {
        Self::new(project.connections().clone())
    }

    /// Opens the named connection.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::UnknownConnection`] for names not in the map,
    /// [`SqliteError::UnsupportedAdapter`] for non-SQLite connections, and
    /// [`SqliteError::DatabaseError`] if the database cannot be opened.
    pub fn open(&self, name: &str) -> Result<SqliteConnection> {
        let config = self
            .connections
            .get(name)
            .ok_or_else(|| SqliteError::UnknownConnection(name.to_string()))?;
        if config.adapter != ADAPTER {
            return Err(SqliteError::UnsupportedAdapter {
                connection: name.to_string(),
                adapter: config.adapter.clone(),
            });
        }

        debug!(connection = name, database = %config.database, "opening sqlite connection");
        if config.database == IN_MEMORY_DATABASE {
            SqliteConnection::open_in_memory()
        } else {
            SqliteConnection::open(&config.database)
        }
    }
}

impl Connector for SqliteConnector {
    fn connect(&self, name: &str) -> std::result::Result<Box<dyn StorageConnection>, StorageError> {
        Ok(Box::new(self.open(name)?))
    }
}
