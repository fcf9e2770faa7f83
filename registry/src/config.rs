//! Project configuration for seedbed.
//!
//! Defines the YAML-serializable configuration that locates model and
//! fixture definitions, sets the fixture naming convention, and maps each
//! environment to its storage connections.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! models: models
//! fixtures:
//!   path: fixtures
//!   prefix: ""
//!   suffix: Fixture
//!   transactional: false
//! environments:
//!   development:
//!     connections:
//!       default: { adapter: sqlite, database: dev.db }
//!   test:
//!     connections:
//!       default: { adapter: sqlite, database: test.db }
//! ```

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use seedbed_core::FixtureNaming;
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// Environment used when none is requested explicitly.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Database name that is never resolved against the project directory.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

/// Settings for one storage connection.
///
/// # Examples
///
/// ```
/// # use seedbed_registry::ConnectionConfig;
/// let conn = ConnectionConfig::sqlite("app.db");
/// assert_eq!(conn.adapter, "sqlite");
/// assert_eq!(conn.database, "app.db");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Storage driver name (e.g. `sqlite`).
    #[serde(default = "default_adapter")]
    pub adapter: String,
    /// Database location understood by the driver.
    pub database: String,
}

impl ConnectionConfig {
    /// Creates a SQLite connection setting.
    pub fn sqlite(database: impl Into<String>) -> Self {
        Self {
            adapter: default_adapter(),
            database: database.into(),
        }
    }

    /// Returns a copy whose relative database path is anchored at `root`.
    ///
    /// In-memory and URI databases are returned unchanged.
    pub fn anchored_at(&self, root: &Path) -> Self {
        let keep = self.database == IN_MEMORY_DATABASE
            || self.database.starts_with("file:")
            || Path::new(&self.database).is_absolute();
        if keep {
            return self.clone();
        }
        Self {
            adapter: self.adapter.clone(),
            database: root.join(&self.database).to_string_lossy().into_owned(),
        }
    }
}

/// Connection map of one environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub connections: BTreeMap<String, ConnectionConfig>,
}

/// Where fixtures live and how they are named and loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixturesConfig {
    /// Directory of fixture files, relative to the configuration file.
    #[serde(default = "default_fixtures_dir")]
    pub path: PathBuf,
    /// Prefix/suffix convention linking model names to fixture names.
    #[serde(flatten)]
    pub naming: FixtureNaming,
    /// Wrap each model's fixture load in a transaction.
    #[serde(default)]
    pub transactional: bool,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            path: default_fixtures_dir(),
            naming: FixtureNaming::default(),
            transactional: false,
        }
    }
}

/// Top-level project configuration.
///
/// Loaded from a YAML file (typically `seedbed.yml` in the project root).
/// Relative paths inside it are resolved against the file's directory.
///
/// # Examples
///
/// ```no_run
/// use seedbed_registry::ProjectConfig;
///
/// let config = ProjectConfig::load("seedbed.yml").unwrap();
/// let env = config.environment("test").unwrap();
/// println!("{} connections", env.connections.len());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Directory of model definition files.
    #[serde(default = "default_models_dir")]
    pub models: PathBuf,
    /// Fixture location and conventions.
    #[serde(default)]
    pub fixtures: FixturesConfig,
    /// Connection maps keyed by environment name.
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            models: default_models_dir(),
            fixtures: FixturesConfig::default(),
            environments: BTreeMap::new(),
        }
    }
}

impl ProjectConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](RegistryError::IoError) if the file cannot be
    /// read, or [`YamlError`](RegistryError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Adds (or replaces) a connection in an environment, creating the
    /// environment if needed.
    pub fn with_connection(
        mut self,
        environment: &str,
        name: &str,
        connection: ConnectionConfig,
    ) -> Self {
        self.environments
            .entry(environment.to_string())
            .or_default()
            .connections
            .insert(name.to_string(), connection);
        self
    }

    /// Returns the settings of one environment.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownEnvironment`] if it is not configured.
    pub fn environment(&self, name: &str) -> Result<&EnvironmentConfig> {
        self.environments
            .get(name)
            .ok_or_else(|| RegistryError::UnknownEnvironment(name.to_string()))
    }
}

fn default_adapter() -> String {
    "sqlite".to_string()
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("fixtures")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
models: app/models
fixtures:
  path: app/fixtures
  prefix: Seed
  suffix: Data
  transactional: true
environments:
  development:
    connections:
      default: { adapter: sqlite, database: dev.db }
      audit: { database: audit.db }
  test:
    connections:
      default: { adapter: sqlite, database: ":memory:" }
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: ProjectConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.models, PathBuf::from("app/models"));
        assert_eq!(config.fixtures.path, PathBuf::from("app/fixtures"));
        assert_eq!(config.fixtures.naming.fixture_name("Users"), "SeedUsersData");
        assert!(config.fixtures.transactional);
        let dev = config.environment("development").unwrap();
        assert_eq!(dev.connections.len(), 2);
        assert_eq!(dev.connections["audit"].adapter, "sqlite");
    }

    #[test]
    fn test_deserialize_minimal_uses_defaults() {
        let config: ProjectConfig = serde_yaml::from_str("version: \"1.0\"\n").unwrap();
        assert_eq!(config.models, PathBuf::from("models"));
        assert_eq!(config.fixtures.path, PathBuf::from("fixtures"));
        assert_eq!(config.fixtures.naming, FixtureNaming::default());
        assert!(!config.fixtures.transactional);
        assert!(config.environments.is_empty());
    }

    #[test]
    fn test_unknown_environment() {
        let config: ProjectConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        let err = config.environment("production").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownEnvironment(ref e) if e == "production"));
    }

    #[test]
    fn test_anchored_at() {
        let root = Path::new("/srv/app");
        assert_eq!(
            ConnectionConfig::sqlite("dev.db").anchored_at(root).database,
            Path::new("/srv/app").join("dev.db").to_string_lossy()
        );
        assert_eq!(
            ConnectionConfig::sqlite(":memory:").anchored_at(root).database,
            ":memory:"
        );
        assert_eq!(
            ConnectionConfig::sqlite("file:shared?mode=memory").anchored_at(root).database,
            "file:shared?mode=memory"
        );
    }

    #[test]
    fn test_with_connection_builds_environment() {
        let config = ProjectConfig::default().with_connection(
            "test",
            "default",
            ConnectionConfig::sqlite(":memory:"),
        );
        assert!(config.environment("test").unwrap().connections.contains_key("default"));
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seedbed.yml");

        let original: ProjectConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();

        let loaded = ProjectConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }
}
