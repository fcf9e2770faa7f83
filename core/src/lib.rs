//! Core definition types for seedbed.
//!
//! This crate defines the data model shared by every other seedbed crate:
//!
//! - [`ModelDescriptor`]: one storage entity with its fields
//!   ([`FieldDefinition`]), table-level [`Constraint`]s, and connection name.
//! - [`FixtureDescriptor`]: an ordered list of seed [`Record`]s for one
//!   model, named through a [`FixtureNaming`] convention.
//! - [`SchemaDefinition`]: the table definition derived from a model right
//!   before it is created.
//! - [`OperationResult`]: what a single schema or fixture operation reports.
//!
//! Validation ([`validate_model`]) catches structural errors such as
//! duplicate fields and unsafe identifiers.
//!
//! # Example
//!
//! ```
//! use seedbed_core::*;
//!
//! let posts = ModelDescriptor::new("Posts")
//!     .with_field(FieldDefinition::id("id"))
//!     .with_field(FieldDefinition::new("title", FieldType::String).with_length(200))
//!     .with_field(FieldDefinition::new("author_id", FieldType::Integer))
//!     .with_constraint(Constraint::ForeignKey {
//!         column: "author_id".into(),
//!         to: "users".into(),
//!         to_column: "id".into(),
//!         on_delete: Some(ReferentialAction::Cascade),
//!     });
//!
//! assert!(validate_model(&posts).is_empty());
//! assert_eq!(FixtureNaming::default().fixture_name(&posts.name), "PostsFixture");
//! ```

mod fixture;
mod outcome;
mod schema;
mod types;
mod validate;

pub use fixture::{FixtureDescriptor, FixtureNaming, Record};
pub use outcome::OperationResult;
pub use schema::SchemaDefinition;
pub use types::*;
pub use validate::{DefinitionError, is_identifier, validate_model};
