//! Command orchestration.
//!
//! A [`Request`] is validated before anything else happens: the action is
//! parsed and the model list is split. [`Orchestrator::execute`] then
//! resolves every name up front, and only when all of them resolve does it
//! walk the models in order. Each model gets a fresh connection and its own
//! integrity-check window; the first failure ends the command and work
//! already done on earlier models is kept.

use seedbed_core::{ModelDescriptor, OperationResult};
use seedbed_registry::{EntityKind, Project, ResolvedFixture, Selector};
use tracing::{debug, info};

use crate::error::{CommandError, Result};
use crate::fixtures::{FixtureAction, FixtureLoader};
use crate::schema::SchemaAction;
use crate::storage::{Connector, StorageConnection, with_integrity_checks_disabled};

/// Receives what a command has to say to the operator.
pub trait Reporter {
    /// Marks the start of a validated command.
    fn separator(&mut self);

    /// One line of progress, e.g. `Created Users.`.
    fn message(&mut self, message: &str);

    /// Statement text behind the previous message. Only sent in verbose mode.
    fn statement(&mut self, statement: &str);
}

/// Execution switches shared by every command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Report generated statements after each successful operation.
    pub verbose: bool,
    /// Load each fixture inside a transaction.
    pub transactional: bool,
}

/// A validated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `schema create` followed by `fixtures load` on the same models.
    Reload { selector: Selector },
    Schema {
        action: SchemaAction,
        selector: Selector,
    },
    Fixtures {
        action: FixtureAction,
        selector: Selector,
    },
}

impl Request {
    /// # Errors
    ///
    /// Returns a validation error if the model list is malformed.
    pub fn reload(models: Option<&str>) -> Result<Self> {
        Ok(Request::Reload {
            selector: Selector::parse(models)?,
        })
    }

    /// # Errors
    ///
    /// Returns a validation error if the action is missing or unsupported,
    /// or if the model list is malformed.
    pub fn schema(action: Option<&str>, models: Option<&str>) -> Result<Self> {
        Ok(Request::Schema {
            action: SchemaAction::parse(action)?,
            selector: Selector::parse(models)?,
        })
    }

    /// # Errors
    ///
    /// Returns a validation error if the action is missing or unsupported,
    /// or if the model list is malformed.
    pub fn fixtures(action: Option<&str>, models: Option<&str>) -> Result<Self> {
        Ok(Request::Fixtures {
            action: FixtureAction::parse(action)?,
            selector: Selector::parse(models)?,
        })
    }
}

/// Runs validated requests against a project.
pub struct Orchestrator<'a> {
    project: &'a Project,
    connector: &'a dyn Connector,
    reporter: &'a mut dyn Reporter,
    options: Options,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        project: &'a Project,
        connector: &'a dyn Connector,
        reporter: &'a mut dyn Reporter,
        options: Options,
    ) -> Self {
        Self {
            project,
            connector,
            reporter,
            options,
        }
    }

    /// Runs one request to completion or to its first error.
    pub fn execute(&mut self, request: &Request) -> Result<()> {
        match request {
            Request::Reload { selector } => {
                self.schema(SchemaAction::Create, selector)?;
                self.fixtures(FixtureAction::Load, selector)
            }
            Request::Schema { action, selector } => self.schema(*action, selector),
            Request::Fixtures { action, selector } => self.fixtures(*action, selector),
        }
    }

    fn schema(&mut self, action: SchemaAction, selector: &Selector) -> Result<()> {
        self.reporter.separator();
        let models = self.project.model_resolver().resolve(selector)?;
        for model in &models {
            self.connection_name(model)?;
        }
        debug!(%action, count = models.len(), "resolved models");

        let handler = action.handler();
        for model in &models {
            info!(%action, model = %model.name, "schema");
            let results = self.unit_of_work(model, |conn| handler(model, conn))?;
            self.report(&results);
        }
        Ok(())
    }

    fn fixtures(&mut self, action: FixtureAction, selector: &Selector) -> Result<()> {
        self.reporter.separator();
        let resolved = self.project.fixture_resolver().resolve(selector)?;
        for item in &resolved {
            self.connection_name(&item.model)?;
        }
        debug!(%action, count = resolved.len(), "resolved fixtures");

        let loader = FixtureLoader::new().transactional(self.options.transactional);
        for item in &resolved {
            info!(%action, fixture = %item.fixture.name, model = %item.model.name, "fixtures");
            let result = match action {
                FixtureAction::Load => self.load(&loader, item)?,
            };
            self.report(std::slice::from_ref(&result));
        }
        Ok(())
    }

    fn load(&self, loader: &FixtureLoader, item: &ResolvedFixture) -> Result<OperationResult> {
        self.unit_of_work(&item.model, |conn| loader.load(item, conn))
    }

    /// Opens a connection for `model` and runs `work` with integrity checks
    /// off. The connection is closed when this returns.
    fn unit_of_work<T, F>(&self, model: &ModelDescriptor, work: F) -> Result<T>
    where
        F: FnOnce(&mut dyn StorageConnection) -> Result<T>,
    {
        let name = self.connection_name(model)?;
        let mut conn = self
            .connector
            .connect(name)
            .map_err(|source| CommandError::Connection {
                name: name.to_string(),
                source,
            })?;
        with_integrity_checks_disabled(conn.as_mut(), work)
    }

    /// The model's connection, which must be configured in the active
    /// environment.
    fn connection_name<'m>(&self, model: &'m ModelDescriptor) -> Result<&'m str> {
        let Some(name) = model.connection.as_deref() else {
            return Err(CommandError::NotFound {
                kind: EntityKind::Connection,
                name: format!("(none) for model {}", model.name),
            });
        };
        if !self.project.connections().contains_key(name) {
            return Err(CommandError::NotFound {
                kind: EntityKind::Connection,
                name: name.to_string(),
            });
        }
        Ok(name)
    }

    fn report(&mut self, results: &[OperationResult]) {
        for result in results {
            self.reporter.message(&result.message);
            if !self.options.verbose {
                continue;
            }
            if let Some(statement) = &result.statement {
                self.reporter.statement(statement);
            }
        }
    }
}
