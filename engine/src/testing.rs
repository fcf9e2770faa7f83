//! In-memory storage fake that records every call.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use seedbed_core::{Record, SchemaDefinition};

use crate::error::StorageError;
use crate::storage::{Connector, StorageConnection};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Connect(String),
    Integrity(bool),
    Create(String),
    Drop(String),
    Insert(String, Record),
    Begin,
    Commit,
    Rollback,
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    tables: BTreeMap<String, Vec<Record>>,
    snapshot: Option<BTreeMap<String, Vec<Record>>>,
    insert_attempts: HashMap<String, usize>,
    fail_create: HashSet<String>,
    fail_drop: HashSet<String>,
    fail_insert: HashMap<String, usize>,
    fail_enable: bool,
    unknown_connections: HashSet<String>,
}

#[derive(Clone, Default)]
pub struct FakeStorage {
    state: Rc<RefCell<State>>,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection(&self, name: &str) -> Box<dyn StorageConnection> {
        self.state
            .borrow_mut()
            .events
            .push(Event::Connect(name.to_string()));
        Box::new(FakeConnection {
            state: Rc::clone(&self.state),
        })
    }

    pub fn events(&self) -> Vec<Event> {
        self.state
            .borrow()
            .events
            .iter()
            .filter(|e| !matches!(e, Event::Connect(_)))
            .cloned()
            .collect()
    }

    pub fn all_events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    pub fn table(&self, name: &str) -> Option<Vec<Record>> {
        self.state.borrow().tables.get(name).cloned()
    }

    pub fn seed_table(&self, name: &str) {
        self.state
            .borrow_mut()
            .tables
            .insert(name.to_string(), Vec::new());
    }

    pub fn fail_create(&self, table: &str) {
        self.state.borrow_mut().fail_create.insert(table.to_string());
    }

    pub fn fail_drop(&self, table: &str) {
        self.state.borrow_mut().fail_drop.insert(table.to_string());
    }

    /// Makes the `attempt`-th insert into `table` fail (1-based).
    pub fn fail_insert_at(&self, table: &str, attempt: usize) {
        self.state
            .borrow_mut()
            .fail_insert
            .insert(table.to_string(), attempt);
    }

    pub fn fail_integrity_enable(&self) {
        self.state.borrow_mut().fail_enable = true;
    }

    pub fn refuse_connection(&self, name: &str) {
        self.state
            .borrow_mut()
            .unknown_connections
            .insert(name.to_string());
    }
}

impl Connector for FakeStorage {
    fn connect(&self, name: &str) -> Result<Box<dyn StorageConnection>, StorageError> {
        if self.state.borrow().unknown_connections.contains(name) {
            return Err(StorageError::new(format!("unknown connection '{name}'")));
        }
        Ok(self.connection(name))
    }
}

struct FakeConnection {
    state: Rc<RefCell<State>>,
}

impl StorageConnection for FakeConnection {
    fn create_schema(
        &mut self,
        table: &str,
        schema: &SchemaDefinition,
    ) -> Result<String, StorageError> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Create(table.to_string()));
        if state.fail_create.contains(table) {
            return Err(StorageError::new(format!("cannot create {table}")));
        }
        if state.tables.contains_key(table) {
            return Err(StorageError::new(format!("table {table} already exists")));
        }
        state.tables.insert(table.to_string(), Vec::new());
        Ok(format!("CREATE TABLE {table} ({} columns)", schema.fields.len()))
    }

    fn drop_schema(&mut self, table: &str) -> Result<String, StorageError> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Drop(table.to_string()));
        if state.fail_drop.contains(table) {
            return Err(StorageError::new(format!("cannot drop {table}")));
        }
        state.tables.remove(table);
        Ok(format!("DROP TABLE IF EXISTS {table}"))
    }

    fn insert(&mut self, table: &str, record: &Record) -> Result<String, StorageError> {
        let mut state = self.state.borrow_mut();
        state
            .events
            .push(Event::Insert(table.to_string(), record.clone()));
        let attempt = {
            let counter = state.insert_attempts.entry(table.to_string()).or_insert(0);
            *counter += 1;
            *counter
        };
        if state.fail_insert.get(table) == Some(&attempt) {
            return Err(StorageError::new(format!("constraint failed on {table}")));
        }
        match state.tables.get_mut(table) {
            Some(rows) => rows.push(record.clone()),
            None => return Err(StorageError::new(format!("no such table: {table}"))),
        }
        Ok(format!("INSERT INTO {table}"))
    }

    fn set_integrity_checks(&mut self, enabled: bool) -> Result<(), StorageError> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Integrity(enabled));
        if enabled && state.fail_enable {
            return Err(StorageError::new("cannot enable integrity checks"));
        }
        Ok(())
    }

    fn begin(&mut self) -> Result<(), StorageError> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Begin);
        state.snapshot = Some(state.tables.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Commit);
        state.snapshot = None;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StorageError> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Rollback);
        if let Some(snapshot) = state.snapshot.take() {
            state.tables = snapshot;
        }
        Ok(())
    }
}
