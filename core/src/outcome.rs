use serde::Serialize;

/// Outcome of one schema or fixture operation on one model.
///
/// # Examples
///
/// ```
/// use seedbed_core::OperationResult;
///
/// let result = OperationResult::ok("Inserted 3 fixtures for Users.").with_count(3);
/// assert!(result.success);
/// assert_eq!(result.count, Some(3));
/// assert!(result.statement.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    pub success: bool,
    /// Message shown to the operator
    pub message: String,
    /// Statement text generated by the storage driver, for verbose output
    pub statement: Option<String>,
    /// Number of records inserted by a fixture load
    pub count: Option<usize>,
}

impl OperationResult {
    /// Creates a successful result with the given message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            statement: None,
            count: None,
        }
    }

    /// Attaches the generated statement text.
    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = Some(statement.into());
        self
    }

    /// Attaches an inserted-record count.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}
