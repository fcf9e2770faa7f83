//! Ordered model and fixture registries.
//!
//! Both registries keep their sources in registration order, which is the
//! order bulk operations walk them in, and index them by name for O(1)
//! lookups.
//!
//! ```no_run
//! use seedbed_registry::{FixtureRegistry, ModelRegistry, ModelSource};
//!
//! let models = ModelRegistry::from_dir("models/").unwrap();
//! let fixtures = FixtureRegistry::from_dir("fixtures/").unwrap();
//! for source in models.sources() {
//!     println!("model {}", source.name());
//! }
//! assert_eq!(fixtures.describe("UsersFixture").unwrap().model, "Users");
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use seedbed_core::{FixtureDescriptor, ModelDescriptor};
use tracing::debug;

use crate::error::{EntityKind, RegistryError, Result};
use crate::source::{FileFixture, FileModel, FixtureSource, ModelSource, is_definition_file};

/// Registered models in registration order.
#[derive(Default)]
pub struct ModelRegistry {
    entries: Vec<Box<dyn ModelSource>>,
    index: HashMap<String, usize>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every definition file in `path`, in file-name order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IoError`] if the directory cannot be read,
    /// [`RegistryError::InvalidFile`] if a file cannot be parsed, or
    /// [`RegistryError::DuplicateModel`] if two files define the same model.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let mut registry = Self::new();
        for file in definition_files(path.as_ref())? {
            registry.register(FileModel::open(file)?)?;
        }
        debug!(count = registry.len(), "loaded model registry");
        Ok(registry)
    }

    /// Appends a source.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateModel`] if the name is taken.
    pub fn register(&mut self, source: impl ModelSource + 'static) -> Result<()> {
        let name = source.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateModel(name));
        }
        self.index.insert(name, self.entries.len());
        self.entries.push(Box::new(source));
        Ok(())
    }

    /// Builds the current descriptor of a named model.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no model has that name.
    pub fn describe(&self, name: &str) -> Result<ModelDescriptor> {
        match self.index.get(name) {
            Some(&i) => self.entries[i].describe(),
            None => Err(RegistryError::NotFound {
                kind: EntityKind::Model,
                name: name.to_string(),
            }),
        }
    }

    /// Returns the sources in registration order.
    pub fn sources(&self) -> impl Iterator<Item = &dyn ModelSource> {
        self.entries.iter().map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registered fixtures in registration order.
#[derive(Default)]
pub struct FixtureRegistry {
    entries: Vec<Box<dyn FixtureSource>>,
    index: HashMap<String, usize>,
}

impl FixtureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every definition file in `path`, in file-name order.
    ///
    /// A missing directory yields an empty registry: a project does not
    /// need fixtures to manage its schema.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut registry = Self::new();
        if !path.exists() {
            debug!(path = %path.display(), "fixture directory missing, no fixtures registered");
            return Ok(registry);
        }
        for file in definition_files(path)? {
            registry.register(FileFixture::open(file)?)?;
        }
        debug!(count = registry.len(), "loaded fixture registry");
        Ok(registry)
    }

    /// Appends a source.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateFixture`] if the name is taken.
    pub fn register(&mut self, source: impl FixtureSource + 'static) -> Result<()> {
        let name = source.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateFixture(name));
        }
        self.index.insert(name, self.entries.len());
        self.entries.push(Box::new(source));
        Ok(())
    }

    /// Builds the current descriptor of a named fixture.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no fixture has that name.
    pub fn describe(&self, name: &str) -> Result<FixtureDescriptor> {
        match self.index.get(name) {
            Some(&i) => self.entries[i].describe(),
            None => Err(RegistryError::NotFound {
                kind: EntityKind::Fixture,
                name: name.to_string(),
            }),
        }
    }

    /// Returns the sources in registration order.
    pub fn sources(&self) -> impl Iterator<Item = &dyn FixtureSource> {
        self.entries.iter().map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lists definition files in a directory sorted by file name.
fn definition_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_definition_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
