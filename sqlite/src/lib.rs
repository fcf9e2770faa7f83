//! SQLite storage driver for seedbed.
//!
//! This crate implements the engine's storage traits on top of
//! [`rusqlite`]: [`SqliteConnection`] is one open database and
//! [`SqliteConnector`] opens connections by the names configured for an
//! environment.
//!
//! # Architecture
//!
//! - **`schema`**: `CREATE TABLE` / `DROP TABLE` generation from a
//!   [`SchemaDefinition`](seedbed_core::SchemaDefinition)
//! - **`convert`**: fixture records to parameterized `INSERT` statements
//! - **`connection`**: the [`StorageConnection`](seedbed_engine::StorageConnection)
//!   implementation, including integrity-check toggling through
//!   `PRAGMA foreign_keys`
//! - **`connector`**: connection lookup by name
//!
//! # Quick start
//!
//! ```no_run
//! use seedbed_engine::{Options, Orchestrator, Reporter, Request};
//! use seedbed_registry::Project;
//! use seedbed_sqlite::SqliteConnector;
//!
//! # struct Quiet;
//! # impl Reporter for Quiet {
//! #     fn separator(&mut self) {}
//! #     fn message(&mut self, _: &str) {}
//! #     fn statement(&mut self, _: &str) {}
//! # }
//! let project = Project::load("seedbed.yml", "development").unwrap();
//! let connector = SqliteConnector::from_project(&project);
//! let request = Request::schema(Some("create"), None).unwrap();
//! let mut reporter = Quiet;
//! Orchestrator::new(&project, &connector, &mut reporter, Options::default())
//!     .execute(&request)
//!     .unwrap();
//! ```

mod connection;
mod connector;
mod convert;
mod error;
mod schema;

pub use connection::SqliteConnection;
pub use connector::{ADAPTER, SqliteConnector};
pub use error::{Result, SqliteError};
pub use schema::{generate_create_sql, generate_drop_sql};
