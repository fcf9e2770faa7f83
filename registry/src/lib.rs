//! Project configuration, registries, and name resolution for seedbed.
//!
//! This crate locates everything a seedbed command acts on:
//!
//! - **`config`**: the YAML project file ([`ProjectConfig`]) with fixture
//!   conventions and per-environment connections.
//! - **`source`**: descriptor sources ([`ModelSource`], [`FixtureSource`])
//!   backed by code ([`StaticModel`], [`StaticFixture`]) or by definition
//!   files ([`FileModel`], [`FileFixture`]).
//! - **`registry`**: ordered, name-indexed collections of sources.
//! - **`resolve`**: turning a command [`Selector`] into descriptors
//!   ([`ModelResolver`], [`FixtureResolver`]).
//! - **`project`**: a loaded [`Project`] bound to one environment.
//!
//! # Quick start
//!
//! ```no_run
//! use seedbed_registry::{Project, Selector};
//!
//! let project = Project::load("seedbed.yml", "development").unwrap();
//! let selector = Selector::parse(Some("Users,Roles")).unwrap();
//! for fixture in project.fixture_resolver().resolve(&selector).unwrap() {
//!     println!("{} -> {} records", fixture.model.name, fixture.fixture.len());
//! }
//! ```

mod config;
mod error;
mod project;
mod registry;
mod resolve;
mod source;

pub use config::{
    ConnectionConfig, DEFAULT_ENVIRONMENT, EnvironmentConfig, FixturesConfig, IN_MEMORY_DATABASE,
    ProjectConfig,
};
pub use error::{EntityKind, RegistryError, Result};
pub use project::Project;
pub use registry::{FixtureRegistry, ModelRegistry};
pub use resolve::{FixtureResolver, ModelResolver, ResolvedFixture, Selector};
pub use source::{FileFixture, FileModel, FixtureSource, ModelSource, StaticFixture, StaticModel};
