//! Schema engine, fixture loader, and command orchestration for seedbed.
//!
//! The engine is storage-agnostic. It talks to databases only through the
//! [`StorageConnection`] and [`Connector`] traits, which drivers such as
//! `seedbed-sqlite` implement.
//!
//! - **`schema`**: [`SchemaAction`] and the per-model create/drop/truncate/
//!   dump handlers.
//! - **`fixtures`**: [`FixtureAction`] and the [`FixtureLoader`].
//! - **`orchestrator`**: [`Request`] validation and the [`Orchestrator`]
//!   that runs a request model by model.
//! - **`storage`**: the driver traits and the integrity-check window.
//!
//! # Example
//!
//! ```no_run
//! use seedbed_engine::{Connector, Options, Orchestrator, Reporter, Request};
//! use seedbed_registry::Project;
//!
//! struct Stdout;
//!
//! impl Reporter for Stdout {
//!     fn separator(&mut self) {
//!         println!("{}", "-".repeat(80));
//!     }
//!     fn message(&mut self, message: &str) {
//!         println!("{message}");
//!     }
//!     fn statement(&mut self, statement: &str) {
//!         println!("\t{statement}");
//!     }
//! }
//!
//! fn reload(project: &Project, connector: &dyn Connector) -> seedbed_engine::Result<()> {
//!     let request = Request::reload(Some("Users,Roles"))?;
//!     let mut out = Stdout;
//!     Orchestrator::new(project, connector, &mut out, Options::default()).execute(&request)
//! }
//! ```

mod error;
mod fixtures;
mod orchestrator;
mod schema;
mod storage;

#[cfg(test)]
mod testing;

pub use error::{CommandError, Result, SchemaStep, StorageError, ValidationError};
pub use fixtures::{FixtureAction, FixtureLoader};
pub use orchestrator::{Options, Orchestrator, Reporter, Request};
pub use schema::{SchemaAction, SchemaHandler};
pub use storage::{Connector, IntegrityWindow, StorageConnection, with_integrity_checks_disabled};
