//! A loaded project: configuration, registries, and the active environment.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use seedbed_core::FixtureNaming;
use tracing::info;

use crate::config::{ConnectionConfig, ProjectConfig};
use crate::error::Result;
use crate::registry::{FixtureRegistry, ModelRegistry};
use crate::resolve::{FixtureResolver, ModelResolver};

/// Everything a command needs to resolve names for one environment.
///
/// # Examples
///
/// ```no_run
/// use seedbed_registry::{Project, Selector};
///
/// let project = Project::load("seedbed.yml", "test").unwrap();
/// let models = project.model_resolver().resolve(&Selector::All).unwrap();
/// println!("{} models on {:?}", models.len(), project.connections().keys());
/// ```
pub struct Project {
    config: ProjectConfig,
    environment: String,
    connections: BTreeMap<String, ConnectionConfig>,
    models: ModelRegistry,
    fixtures: FixtureRegistry,
}

impl Project {
    /// Loads the configuration file and the registries it points at.
    ///
    /// Model and fixture directories and relative database paths are
    /// resolved against the configuration file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownEnvironment`](crate::RegistryError::UnknownEnvironment)
    /// if `environment` is not configured, or any error raised while reading
    /// the configuration or the registries.
    pub fn load(config_path: impl AsRef<Path>, environment: &str) -> Result<Self> {
        let config_path = config_path.as_ref();
        let config = ProjectConfig::load(config_path)?;
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        // Check the environment before touching the registries.
        config.environment(environment)?;

        let models = ModelRegistry::from_dir(root.join(&config.models))?;
        let fixtures = FixtureRegistry::from_dir(root.join(&config.fixtures.path))?;
        let mut project = Self::new(config, environment, models, fixtures)?;
        project.connections = project
            .connections
            .iter()
            .map(|(name, conn)| (name.clone(), conn.anchored_at(&root)))
            .collect();

        info!(
            environment,
            models = project.models.len(),
            fixtures = project.fixtures.len(),
            "loaded project"
        );
        Ok(project)
    }

    /// Assembles a project from parts built in code.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownEnvironment`](crate::RegistryError::UnknownEnvironment)
    /// if `environment` is not configured.
    pub fn new(
        config: ProjectConfig,
        environment: &str,
        models: ModelRegistry,
        fixtures: FixtureRegistry,
    ) -> Result<Self> {
        let connections = config.environment(environment)?.connections.clone();
        Ok(Self {
            config,
            environment: environment.to_string(),
            connections,
            models,
            fixtures,
        })
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Name of the active environment.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Connections of the active environment.
    pub fn connections(&self) -> &BTreeMap<String, ConnectionConfig> {
        &self.connections
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    pub fn fixtures(&self) -> &FixtureRegistry {
        &self.fixtures
    }

    pub fn naming(&self) -> &FixtureNaming {
        &self.config.fixtures.naming
    }

    /// Model resolver limited to the active environment's connections.
    pub fn model_resolver(&self) -> ModelResolver<'_> {
        ModelResolver::new(&self.models).with_connections(self.connections.keys().cloned())
    }

    /// Fixture resolver using the configured naming convention.
    pub fn fixture_resolver(&self) -> FixtureResolver<'_> {
        FixtureResolver::new(&self.models, &self.fixtures).with_naming(self.naming().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::resolve::Selector;

    fn write_project(dir: &Path) -> PathBuf {
        std::fs::create_dir_all(dir.join("models")).unwrap();
        std::fs::create_dir_all(dir.join("fixtures")).unwrap();
        std::fs::write(
            dir.join("models/users.yml"),
            "name: Users\nfields: [{ name: id, type: id }]\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("fixtures/UsersFixture.yml"),
            "model: Users\nrecords: [{ id: 1 }]\n",
        )
        .unwrap();
        let config = dir.join("seedbed.yml");
        std::fs::write(
            &config,
            "version: \"1.0\"\nenvironments:\n  test:\n    connections:\n      default: { database: test.db }\n",
        )
        .unwrap();
        config
    }

    #[test]
    fn test_load_resolves_paths_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_project(dir.path());

        let project = Project::load(&config, "test").unwrap();
        assert_eq!(project.environment(), "test");
        assert_eq!(project.models().len(), 1);
        assert_eq!(project.fixtures().len(), 1);
        assert_eq!(
            project.connections()["default"].database,
            dir.path().join("test.db").to_string_lossy()
        );
        let resolved = project.fixture_resolver().resolve(&Selector::All).unwrap();
        assert_eq!(resolved[0].model.name, "Users");
    }

    #[test]
    fn test_load_unknown_environment() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_project(dir.path());
        assert!(matches!(
            Project::load(&config, "production"),
            Err(RegistryError::UnknownEnvironment(_))
        ));
    }
}
