//! Name resolution for command selectors.
//!
//! A selector names the models a command acts on: nothing (all eligible
//! models), one name, or a comma-separated list. Resolution is fail-fast:
//! every name is resolved before the caller does any work, and the first
//! unknown name aborts the whole selector.
//!
//! # Examples
//!
//! ```
//! use seedbed_core::{FieldDefinition, ModelDescriptor};
//! use seedbed_registry::{ModelRegistry, ModelResolver, Selector, StaticModel};
//!
//! let mut models = ModelRegistry::new();
//! for name in ["Users", "Roles"] {
//!     let model = ModelDescriptor::new(name).with_field(FieldDefinition::id("id"));
//!     models.register(StaticModel::new(model)).unwrap();
//! }
//!
//! let resolver = ModelResolver::new(&models);
//! let selector = Selector::parse(Some("Roles,Users")).unwrap();
//! let resolved = resolver.resolve(&selector).unwrap();
//! assert_eq!(resolved[0].name, "Roles");
//! assert_eq!(resolved[1].name, "Users");
//!
//! assert!(resolver.resolve(&Selector::parse(Some("Roles,Ghosts")).unwrap()).is_err());
//! ```

use std::collections::BTreeSet;

use seedbed_core::{FixtureDescriptor, FixtureNaming, ModelDescriptor};
use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::registry::{FixtureRegistry, ModelRegistry};
use crate::source::checked;

/// Which models a command applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Every eligible registered model.
    All,
    /// Exact, case-sensitive model names in the order given.
    Named(Vec<String>),
}

impl Selector {
    /// Parses the optional comma-separated model list of a command.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MalformedSelector`] if the list contains an
    /// empty entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use seedbed_registry::Selector;
    ///
    /// assert_eq!(Selector::parse(None).unwrap(), Selector::All);
    /// assert_eq!(
    ///     Selector::parse(Some("Users,Roles")).unwrap(),
    ///     Selector::Named(vec!["Users".into(), "Roles".into()]),
    /// );
    /// assert!(Selector::parse(Some("Users,,Roles")).is_err());
    /// ```
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Selector::All);
        };
        if raw.is_empty() {
            return Ok(Selector::All);
        }
        let names: Vec<String> = raw.split(',').map(String::from).collect();
        if names.iter().any(String::is_empty) {
            return Err(RegistryError::MalformedSelector(raw.to_string()));
        }
        Ok(Selector::Named(names))
    }
}

/// Resolves selectors to model descriptors.
pub struct ModelResolver<'a> {
    models: &'a ModelRegistry,
    connections: Option<BTreeSet<String>>,
}

impl<'a> ModelResolver<'a> {
    /// Creates a resolver that treats every named connection as configured.
    pub fn new(models: &'a ModelRegistry) -> Self {
        Self {
            models,
            connections: None,
        }
    }

    /// Restricts bulk resolution to models whose connection is in `names`.
    pub fn with_connections<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.connections = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Resolves a selector.
    ///
    /// [`Selector::All`] yields, in registry order, every model that is
    /// persisted and whose connection is configured. Only those models are
    /// validated. Named selectors yield exactly the named models regardless
    /// of those checks, and validate every one of them.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for the first unknown name, or
    /// any error raised while building a descriptor.
    pub fn resolve(&self, selector: &Selector) -> Result<Vec<ModelDescriptor>> {
        match selector {
            Selector::All => {
                let mut resolved = Vec::new();
                for source in self.models.sources() {
                    let model = source.read()?;
                    if self.is_eligible(&model) {
                        resolved.push(checked(model)?);
                    } else {
                        debug!(model = %model.name, "skipping model in bulk resolution");
                    }
                }
                Ok(resolved)
            }
            Selector::Named(names) => names.iter().map(|n| self.models.describe(n)).collect(),
        }
    }

    fn is_eligible(&self, model: &ModelDescriptor) -> bool {
        if !model.persist {
            return false;
        }
        match (&model.connection, &self.connections) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(name), Some(configured)) => configured.contains(name),
        }
    }
}

/// Fixture together with the model that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFixture {
    pub fixture: FixtureDescriptor,
    pub model: ModelDescriptor,
}

/// Resolves selectors to fixtures.
pub struct FixtureResolver<'a> {
    models: &'a ModelRegistry,
    fixtures: &'a FixtureRegistry,
    naming: FixtureNaming,
}

impl<'a> FixtureResolver<'a> {
    pub fn new(models: &'a ModelRegistry, fixtures: &'a FixtureRegistry) -> Self {
        Self {
            models,
            fixtures,
            naming: FixtureNaming::default(),
        }
    }

    /// Sets the prefix/suffix convention used for named selectors.
    pub fn with_naming(mut self, naming: FixtureNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Resolves a selector.
    ///
    /// [`Selector::All`] walks the fixture registry and pairs each fixture
    /// with the model it declares. Named selectors go model first, then look
    /// up `{prefix}{Model}{suffix}`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when a model or fixture does not
    /// resolve, or [`RegistryError::InvalidFixture`] when the fixture found
    /// by convention declares a different owning model.
    pub fn resolve(&self, selector: &Selector) -> Result<Vec<ResolvedFixture>> {
        match selector {
            Selector::All => self
                .fixtures
                .sources()
                .map(|source| {
                    let fixture = source.describe()?;
                    let model = self.models.describe(&fixture.model)?;
                    Ok(ResolvedFixture { fixture, model })
                })
                .collect(),
            Selector::Named(names) => names
                .iter()
                .map(|name| {
                    let model = self.models.describe(name)?;
                    let fixture = self.fixtures.describe(&self.naming.fixture_name(name))?;
                    if fixture.model != model.name {
                        return Err(RegistryError::InvalidFixture {
                            name: fixture.name,
                            message: format!(
                                "belongs to model '{}', not '{}'",
                                fixture.model, model.name
                            ),
                        });
                    }
                    Ok(ResolvedFixture { fixture, model })
                })
                .collect(),
        }
    }
}
