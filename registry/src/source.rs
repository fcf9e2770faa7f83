//! Descriptor sources.
//!
//! A source produces a fresh descriptor every time it is asked. Registries
//! hold sources rather than descriptors, so a model or fixture edited on
//! disk is picked up by the next resolution without any cache to invalidate.
//!
//! Two kinds are provided for each descriptor type:
//!
//! - **Static** sources ([`StaticModel`], [`StaticFixture`]) wrap a value
//!   built in code.
//! - **File** sources ([`FileModel`], [`FileFixture`]) re-read a YAML or JSON
//!   definition file on every call.

use std::io::BufReader;
use std::path::{Path, PathBuf};

use seedbed_core::{FixtureDescriptor, ModelDescriptor, Record, validate_model};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{RegistryError, Result};

/// Produces [`ModelDescriptor`]s for one registered model.
pub trait ModelSource {
    /// Registered model name.
    fn name(&self) -> &str;

    /// Reads the current descriptor without validating it.
    fn read(&self) -> Result<ModelDescriptor>;

    /// Builds the current descriptor and validates it.
    fn describe(&self) -> Result<ModelDescriptor> {
        checked(self.read()?)
    }
}

/// Produces [`FixtureDescriptor`]s for one registered fixture.
pub trait FixtureSource {
    /// Registered fixture name.
    fn name(&self) -> &str;

    /// Builds the current descriptor.
    fn describe(&self) -> Result<FixtureDescriptor>;
}

/// Model defined in code.
#[derive(Debug, Clone)]
pub struct StaticModel(ModelDescriptor);

impl StaticModel {
    pub fn new(model: ModelDescriptor) -> Self {
        Self(model)
    }
}

impl ModelSource for StaticModel {
    fn name(&self) -> &str {
        &self.0.name
    }

    fn read(&self) -> Result<ModelDescriptor> {
        Ok(self.0.clone())
    }
}

/// Model defined by a YAML or JSON file.
#[derive(Debug, Clone)]
pub struct FileModel {
    name: String,
    path: PathBuf,
}

impl FileModel {
    /// Reads the file once to learn the model name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidFile`] if the file cannot be parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let model: ModelDescriptor = read_definition(&path)?;
        Ok(Self {
            name: model.name,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelSource for FileModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> Result<ModelDescriptor> {
        let model: ModelDescriptor = read_definition(&self.path)?;
        if model.name != self.name {
            return Err(RegistryError::InvalidModel {
                name: self.name.clone(),
                message: format!(
                    "{} now defines model '{}'",
                    self.path.display(),
                    model.name
                ),
            });
        }
        Ok(model)
    }
}

/// Fixture defined in code.
#[derive(Debug, Clone)]
pub struct StaticFixture(FixtureDescriptor);

impl StaticFixture {
    pub fn new(fixture: FixtureDescriptor) -> Self {
        Self(fixture)
    }
}

impl FixtureSource for StaticFixture {
    fn name(&self) -> &str {
        &self.0.name
    }

    fn describe(&self) -> Result<FixtureDescriptor> {
        Ok(self.0.clone())
    }
}

/// On-disk fixture layout. `name` defaults to the file stem.
#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    name: Option<String>,
    model: String,
    #[serde(default)]
    records: Vec<Record>,
}

/// Fixture defined by a YAML or JSON file.
#[derive(Debug, Clone)]
pub struct FileFixture {
    name: String,
    path: PathBuf,
}

impl FileFixture {
    /// Reads the file once to learn the fixture name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidFile`] if the file cannot be parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let fixture = read_fixture(&path)?;
        Ok(Self {
            name: fixture.name,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FixtureSource for FileFixture {
    fn name(&self) -> &str {
        &self.name
    }

    fn describe(&self) -> Result<FixtureDescriptor> {
        let fixture = read_fixture(&self.path)?;
        if fixture.name != self.name {
            return Err(RegistryError::InvalidFixture {
                name: self.name.clone(),
                message: format!(
                    "{} now defines fixture '{}'",
                    self.path.display(),
                    fixture.name
                ),
            });
        }
        Ok(fixture)
    }
}

/// Returns `true` for file extensions that hold definitions.
pub(crate) fn is_definition_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml" | "yaml" | "json")
    )
}

fn read_fixture(path: &Path) -> Result<FixtureDescriptor> {
    let file: FixtureFile = read_definition(path)?;
    let name = match file.name {
        Some(name) => name,
        None => path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(String::from)
            .ok_or_else(|| RegistryError::InvalidFile {
                path: path.to_path_buf(),
                message: "cannot derive fixture name from file name".to_string(),
            })?,
    };
    Ok(FixtureDescriptor {
        name,
        model: file.model,
        records: file.records,
    })
}

fn read_definition<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let invalid = |message: String| RegistryError::InvalidFile {
        path: path.to_path_buf(),
        message,
    };
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_reader(reader).map_err(|e| invalid(e.to_string())),
        _ => serde_yaml::from_reader(reader).map_err(|e| invalid(e.to_string())),
    }
}

pub(crate) fn checked(model: ModelDescriptor) -> Result<ModelDescriptor> {
    let errors = validate_model(&model);
    if let Some(first) = errors.first() {
        return Err(RegistryError::InvalidModel {
            name: model.name.clone(),
            message: first.to_string(),
        });
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedbed_core::{FieldDefinition, FieldType};

    #[test]
    fn test_file_model_reads_fresh_on_each_describe() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.yml");
        std::fs::write(&path, "name: Users\nfields:\n  - { name: id, type: id }\n").unwrap();

        let source = FileModel::open(&path).unwrap();
        assert_eq!(source.name(), "Users");
        assert_eq!(source.describe().unwrap().fields.len(), 1);

        std::fs::write(
            &path,
            "name: Users\nfields:\n  - { name: id, type: id }\n  - { name: email, type: string }\n",
        )
        .unwrap();
        assert_eq!(source.describe().unwrap().fields.len(), 2);
    }

    #[test]
    fn test_file_model_rejects_renamed_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.yml");
        std::fs::write(&path, "name: Users\nfields:\n  - { name: id, type: id }\n").unwrap();
        let source = FileModel::open(&path).unwrap();

        std::fs::write(&path, "name: Accounts\nfields:\n  - { name: id, type: id }\n").unwrap();
        assert!(matches!(
            source.describe(),
            Err(RegistryError::InvalidModel { .. })
        ));
    }

    #[test]
    fn test_file_model_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roles.json");
        std::fs::write(
            &path,
            r#"{"name": "Roles", "fields": [{"name": "id", "type": "id"}]}"#,
        )
        .unwrap();
        let model = FileModel::open(&path).unwrap().describe().unwrap();
        assert_eq!(model.name, "Roles");
    }

    #[test]
    fn test_static_model_is_validated() {
        let source = StaticModel::new(ModelDescriptor::new("Users"));
        assert!(matches!(
            source.describe(),
            Err(RegistryError::InvalidModel { .. })
        ));

        let source = StaticModel::new(
            ModelDescriptor::new("Users").with_field(FieldDefinition::new("id", FieldType::Id)),
        );
        assert!(source.describe().is_ok());
    }

    #[test]
    fn test_read_skips_validation() {
        let source = StaticModel::new(ModelDescriptor::new("Reports").with_persist(false));
        assert_eq!(source.read().unwrap().name, "Reports");
        assert!(source.describe().is_err());
    }

    #[test]
    fn test_file_fixture_name_defaults_to_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("UsersFixture.yml");
        std::fs::write(&path, "model: Users\nrecords:\n  - { id: 1 }\n  - { id: 2 }\n").unwrap();

        let source = FileFixture::open(&path).unwrap();
        assert_eq!(source.name(), "UsersFixture");
        let fixture = source.describe().unwrap();
        assert_eq!(fixture.model, "Users");
        assert_eq!(fixture.len(), 2);
    }

    #[test]
    fn test_unparseable_file_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yml");
        std::fs::write(&path, "name: [unterminated\n").unwrap();
        let err = FileModel::open(&path).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidFile { ref path, .. } if path.ends_with("broken.yml")));
    }

    #[test]
    fn test_is_definition_file() {
        assert!(is_definition_file(Path::new("a.yml")));
        assert!(is_definition_file(Path::new("a.yaml")));
        assert!(is_definition_file(Path::new("a.json")));
        assert!(!is_definition_file(Path::new("README.md")));
        assert!(!is_definition_file(Path::new("noext")));
    }
}
