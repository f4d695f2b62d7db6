use thiserror::Error;

/// Optional driver capabilities that callers may probe for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `Driver.ExecContext`
    DriverExecContext,
    /// `Driver.QueryContext`
    DriverQueryContext,
    /// `Driver.BeginTx`
    DriverBeginTx,
    /// `Tx.ExecContext`
    TxExecContext,
    /// `Tx.QueryContext`
    TxQueryContext,
}

impl Capability {
    /// Get the capability name as it appears in log and error messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Capability::DriverExecContext => "Driver.ExecContext",
            Capability::DriverQueryContext => "Driver.QueryContext",
            Capability::DriverBeginTx => "Driver.BeginTx",
            Capability::TxExecContext => "Tx.ExecContext",
            Capability::TxQueryContext => "Tx.QueryContext",
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum DriverError {
    /// The wrapped driver or transaction lacks an optional capability
    #[error("{0} is not supported")]
    Unsupported(Capability),

    /// Error executing a statement
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// Error in query
    #[error("Query error: {0}")]
    Query(String),

    /// Error with transaction
    #[error("Transaction error: {0}")]
    TransactionError(String),

    /// Error mapping data
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// The context deadline passed before the driver ran the call
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// Generic error
    #[error("Database error: {0}")]
    Other(String),

    /// Rusqlite specific errors
    #[cfg(feature = "rusqlite")]
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

impl DriverError {
    /// Returns `true` if this error was raised for a missing optional capability.
    #[inline]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, DriverError::Unsupported(_))
    }
}

/// Result type for driver operations
pub type Result<T> = std::result::Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message() {
        let err = DriverError::Unsupported(Capability::DriverExecContext);
        assert_eq!(err.to_string(), "Driver.ExecContext is not supported");
        assert!(err.is_unsupported());

        let err = DriverError::Unsupported(Capability::TxQueryContext);
        assert_eq!(err.to_string(), "Tx.QueryContext is not supported");
    }

    #[test]
    fn test_delegated_messages() {
        assert_eq!(
            DriverError::Other("boom".into()).to_string(),
            "Database error: boom"
        );
        assert!(!DriverError::DeadlineExceeded.is_unsupported());
    }
}
