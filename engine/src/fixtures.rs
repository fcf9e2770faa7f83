//! Fixture loading.
//!
//! Records are inserted one at a time in declaration order. By default a
//! failure leaves earlier records of the same fixture in place; with
//! transactional loading the whole fixture is rolled back instead.

use std::fmt;
use std::str::FromStr;

use seedbed_registry::ResolvedFixture;
use seedbed_core::OperationResult;
use tracing::{debug, warn};

use crate::error::{CommandError, Result, ValidationError};
use crate::storage::StorageConnection;

/// Actions accepted by `fixtures <action>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureAction {
    Load,
}

impl FixtureAction {
    /// Validates the optional action argument of `fixtures`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingAction`] when `action` is `None`
    /// and [`ValidationError::UnsupportedAction`] for unknown names.
    pub fn parse(action: Option<&str>) -> std::result::Result<Self, ValidationError> {
        action
            .ok_or(ValidationError::MissingAction { command: "fixtures" })?
            .parse()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FixtureAction::Load => "load",
        }
    }
}

impl FromStr for FixtureAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "load" => Ok(FixtureAction::Load),
            other => Err(ValidationError::UnsupportedAction {
                command: "fixtures",
                action: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for FixtureAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inserts fixture records into a model's table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureLoader {
    transactional: bool,
}

impl FixtureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps each fixture in a transaction so a failed record undoes the
    /// records before it.
    pub fn transactional(mut self, enabled: bool) -> Self {
        self.transactional = enabled;
        self
    }

    /// Loads every record of `resolved` into its model's table.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::FixtureInsertFailed`] at the first record the
    /// driver rejects. Later records are not attempted.
    pub fn load(
        &self,
        resolved: &ResolvedFixture,
        conn: &mut dyn StorageConnection,
    ) -> Result<OperationResult> {
        if !self.transactional {
            return insert_all(resolved, conn);
        }

        conn.begin().map_err(|source| insert_failed(resolved, 0, source))?;
        match insert_all(resolved, conn) {
            Ok(result) => {
                let inserted = result.count.unwrap_or(0);
                conn.commit()
                    .map_err(|source| insert_failed(resolved, inserted, source))?;
                Ok(result)
            }
            Err(err) => {
                if let Err(rollback) = conn.rollback() {
                    warn!(
                        model = %resolved.model.name,
                        error = %rollback,
                        "rollback after failed fixture load also failed"
                    );
                }
                Err(err)
            }
        }
    }
}

fn insert_all(
    resolved: &ResolvedFixture,
    conn: &mut dyn StorageConnection,
) -> Result<OperationResult> {
    let table = resolved.model.table_name();
    let mut inserted = 0;
    let mut statements = Vec::with_capacity(resolved.fixture.records.len());

    for record in &resolved.fixture.records {
        let statement = conn
            .insert(&table, record)
            .map_err(|source| insert_failed(resolved, inserted, source))?;
        statements.push(statement);
        inserted += 1;
    }
    debug!(
        fixture = %resolved.fixture.name,
        model = %resolved.model.name,
        inserted,
        "loaded fixture"
    );

    let mut result =
        OperationResult::ok(format!("Inserted {inserted} fixtures for {}.", resolved.model.name))
            .with_count(inserted);
    if !statements.is_empty() {
        result = result.with_statement(statements.join("\n"));
    }
    Ok(result)
}

fn insert_failed(
    resolved: &ResolvedFixture,
    inserted: usize,
    source: crate::error::StorageError,
) -> CommandError {
    CommandError::FixtureInsertFailed {
        model: resolved.model.name.clone(),
        inserted,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Event, FakeStorage};
    use seedbed_core::{FieldDefinition, FieldType, FixtureDescriptor, ModelDescriptor, Record};
    use serde_json::json;

    fn users_fixture(records: usize) -> ResolvedFixture {
        let mut fixture = FixtureDescriptor::new("UsersFixture", "Users");
        for i in 1..=records {
            fixture = fixture.with_record(Record::from_iter([
                ("id".to_string(), json!(i)),
                ("name".to_string(), json!(format!("user{i}"))),
            ]));
        }
        ResolvedFixture {
            fixture,
            model: ModelDescriptor::new("Users")
                .with_field(FieldDefinition::id("id"))
                .with_field(FieldDefinition::new("name", FieldType::String)),
        }
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(FixtureAction::parse(Some("load")), Ok(FixtureAction::Load));
        assert_eq!(
            FixtureAction::parse(None),
            Err(ValidationError::MissingAction { command: "fixtures" })
        );
        let err = FixtureAction::parse(Some("unload")).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported action 'unload'");
    }

    #[test]
    fn test_load_inserts_in_order() {
        let storage = FakeStorage::new();
        storage.seed_table("users");
        let mut conn = storage.connection("default");

        let result = FixtureLoader::new().load(&users_fixture(3), conn.as_mut()).unwrap();
        assert_eq!(result.message, "Inserted 3 fixtures for Users.");
        assert_eq!(result.count, Some(3));

        let ids: Vec<_> = storage
            .table("users")
            .unwrap()
            .iter()
            .map(|r| r["id"].clone())
            .collect();
        assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_load_empty_fixture() {
        let storage = FakeStorage::new();
        storage.seed_table("users");
        let mut conn = storage.connection("default");
        let result = FixtureLoader::new().load(&users_fixture(0), conn.as_mut()).unwrap();
        assert_eq!(result.message, "Inserted 0 fixtures for Users.");
        assert!(result.statement.is_none());
        assert!(storage.events().is_empty());
    }

    #[test]
    fn test_failure_stops_and_keeps_earlier_records() {
        let storage = FakeStorage::new();
        storage.seed_table("users");
        storage.fail_insert_at("users", 2);
        let mut conn = storage.connection("default");

        let err = FixtureLoader::new()
            .load(&users_fixture(3), conn.as_mut())
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::FixtureInsertFailed { ref model, inserted: 1, .. } if model == "Users"
        ));
        assert_eq!(storage.table("users").unwrap().len(), 1);

        let attempts = storage
            .events()
            .into_iter()
            .filter(|e| matches!(e, Event::Insert(..)))
            .count();
        assert_eq!(attempts, 2);
    }

    #[test]
    fn test_transactional_failure_rolls_back() {
        let storage = FakeStorage::new();
        storage.seed_table("users");
        storage.fail_insert_at("users", 3);
        let mut conn = storage.connection("default");

        let loader = FixtureLoader::new().transactional(true);
        let err = loader.load(&users_fixture(3), conn.as_mut()).unwrap_err();
        assert!(matches!(err, CommandError::FixtureInsertFailed { inserted: 2, .. }));
        assert_eq!(storage.table("users"), Some(Vec::new()));

        let events = storage.events();
        assert_eq!(events.first(), Some(&Event::Begin));
        assert_eq!(events.last(), Some(&Event::Rollback));
    }

    #[test]
    fn test_transactional_success_commits() {
        let storage = FakeStorage::new();
        storage.seed_table("users");
        let mut conn = storage.connection("default");

        FixtureLoader::new()
            .transactional(true)
            .load(&users_fixture(2), conn.as_mut())
            .unwrap();
        assert_eq!(storage.table("users").unwrap().len(), 2);
        assert_eq!(storage.events().last(), Some(&Event::Commit));
    }
}
