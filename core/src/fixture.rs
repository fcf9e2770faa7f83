use serde::{Deserialize, Serialize};

/// One seed row: column name to value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Named, ordered set of seed records for one model.
///
/// Records are inserted in the order they appear, so rows that depend on
/// each other must be listed by the fixture author in a workable order.
///
/// # Examples
///
/// ```
/// use seedbed_core::{FixtureDescriptor, Record};
/// use serde_json::json;
///
/// let alice = Record::from_iter([("id".to_string(), json!(1)), ("name".to_string(), json!("alice"))]);
/// let bob = Record::from_iter([("id".to_string(), json!(2)), ("name".to_string(), json!("bob"))]);
/// let fixture = FixtureDescriptor::new("UsersFixture", "Users")
///     .with_record(alice)
///     .with_record(bob);
/// assert_eq!(fixture.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureDescriptor {
    /// Fixture name (e.g. "UsersFixture")
    pub name: String,
    /// Name of the owning model
    pub model: String,
    /// Seed records in insertion order
    #[serde(default)]
    pub records: Vec<Record>,
}

impl FixtureDescriptor {
    /// Creates an empty fixture for `model`.
    pub fn new(name: &str, model: &str) -> Self {
        Self {
            name: name.to_string(),
            model: model.to_string(),
            records: Vec::new(),
        }
    }

    /// Appends a record.
    pub fn with_record(mut self, record: Record) -> Self {
        self.records.push(record);
        self
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the fixture holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Naming convention linking a model name to its fixture name.
///
/// # Examples
///
/// ```
/// use seedbed_core::FixtureNaming;
///
/// let naming = FixtureNaming::default();
/// assert_eq!(naming.fixture_name("Users"), "UsersFixture");
///
/// let custom = FixtureNaming { prefix: "Seed".into(), suffix: String::new() };
/// assert_eq!(custom.fixture_name("Users"), "SeedUsers");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureNaming {
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl FixtureNaming {
    /// Returns `{prefix}{model}{suffix}`.
    pub fn fixture_name(&self, model: &str) -> String {
        format!("{}{}{}", self.prefix, model, self.suffix)
    }
}

impl Default for FixtureNaming {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: default_suffix(),
        }
    }
}

fn default_suffix() -> String {
    "Fixture".to_string()
}
