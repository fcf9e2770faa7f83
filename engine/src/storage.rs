//! Storage driver seam.
//!
//! The engine never talks to a database directly. Drivers implement
//! [`StorageConnection`] for one open session and [`Connector`] for opening
//! sessions by connection name. Every engine operation receives its
//! connection as an argument.

use seedbed_core::{Record, SchemaDefinition};
use tracing::{debug, warn};

use crate::error::{CommandError, Result, StorageError};

/// One open storage session.
///
/// Methods that generate statements return the statement text so verbose
/// output can show exactly what ran.
pub trait StorageConnection {
    /// Creates the table `table` from `schema`.
    fn create_schema(
        &mut self,
        table: &str,
        schema: &SchemaDefinition,
    ) -> std::result::Result<String, StorageError>;

    /// Drops the table `table`. Dropping a missing table must succeed.
    fn drop_schema(&mut self, table: &str) -> std::result::Result<String, StorageError>;

    /// Inserts one record into `table`.
    fn insert(&mut self, table: &str, record: &Record) -> std::result::Result<String, StorageError>;

    /// Turns referential-integrity enforcement on or off for this session.
    fn set_integrity_checks(&mut self, enabled: bool) -> std::result::Result<(), StorageError>;

    fn begin(&mut self) -> std::result::Result<(), StorageError>;

    fn commit(&mut self) -> std::result::Result<(), StorageError>;

    fn rollback(&mut self) -> std::result::Result<(), StorageError>;
}

/// Opens storage sessions by connection name.
pub trait Connector {
    /// Opens a fresh session on the named connection.
    fn connect(&self, name: &str) -> std::result::Result<Box<dyn StorageConnection>, StorageError>;
}

/// Span during which integrity checks are off on one connection.
///
/// Checks are re-enabled by [`close`](Self::close), or on drop if the window
/// is abandoned by an early return or a panic.
pub struct IntegrityWindow<'c> {
    conn: &'c mut dyn StorageConnection,
    closed: bool,
}

impl<'c> IntegrityWindow<'c> {
    /// Disables integrity checks and opens the window.
    pub fn open(conn: &'c mut dyn StorageConnection) -> std::result::Result<Self, StorageError> {
        conn.set_integrity_checks(false)?;
        debug!("integrity checks disabled");
        Ok(Self {
            conn,
            closed: false,
        })
    }

    /// The connection inside the window.
    pub fn connection(&mut self) -> &mut (dyn StorageConnection + 'c) {
        &mut *self.conn
    }

    /// Re-enables integrity checks.
    pub fn close(mut self) -> std::result::Result<(), StorageError> {
        self.closed = true;
        self.conn.set_integrity_checks(true)?;
        debug!("integrity checks enabled");
        Ok(())
    }
}

impl Drop for IntegrityWindow<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(err) = self.conn.set_integrity_checks(true) {
            warn!(error = %err, "failed to re-enable integrity checks");
        }
    }
}

/// Runs `f` with integrity checks disabled on `conn`.
///
/// Checks are re-enabled whether or not `f` succeeds. An error from `f`
/// takes precedence over an error while re-enabling.
pub fn with_integrity_checks_disabled<T, F>(conn: &mut dyn StorageConnection, f: F) -> Result<T>
where
    F: FnOnce(&mut dyn StorageConnection) -> Result<T>,
{
    let mut window =
        IntegrityWindow::open(conn).map_err(|source| CommandError::Integrity { source })?;
    let outcome = f(window.connection());
    let restored = window.close();

    match (outcome, restored) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(source)) => Err(CommandError::Integrity { source }),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(restore)) => {
            warn!(error = %restore, "failed to re-enable integrity checks after error");
            Err(err)
        }
    }
}
