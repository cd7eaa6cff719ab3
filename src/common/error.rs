//! Error handling for the PrismDB column default layer

use thiserror::Error;

/// Main error type for PrismDB operations
#[derive(Error, Debug)]
pub enum PrismDBError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Type error: {0}")]
    Type(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Lock error: {0}")]
    Lock(String),

    /// A node was rebuilt with the wrong number of children.
    #[error("{node}: invalid children number, got {given}, expected {expected}")]
    InvalidChildrenNumber {
        node: String,
        given: usize,
        expected: usize,
    },

    /// A fixed-arity function was called with the wrong number of arguments.
    #[error("function '{name}' expected {expected} arguments, {given} received")]
    InvalidArgumentNumber {
        name: String,
        expected: usize,
        given: usize,
    },

    #[error("duplicate function name: {0}")]
    DuplicateFunction(String),

    #[error("function: '{0}' not found")]
    FunctionNotFound(String),

    #[error("function '{0}' is not allowed in a column default")]
    FunctionNotAllowed(String),

    #[error("column reference '{0}' in a column default is not yet supported")]
    ColumnReferenceNotSupported(String),

    /// The process-wide column default manager was read before startup installed it.
    #[error("column default manager is not initialized: {0}")]
    UninitializedManager(&'static str),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PrismDBError>;

/// Result type alias for PrismDB operations (alias for Result)
pub type PrismDBResult<T> = std::result::Result<T, PrismDBError>;

impl From<serde_json::Error> for PrismDBError {
    fn from(err: serde_json::Error) -> Self {
        PrismDBError::Serialization(err.to_string())
    }
}

/// Macro for creating internal errors
#[macro_export]
macro_rules! internal_err {
    ($msg:expr) => {
        $crate::common::error::PrismDBError::Internal($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::common::error::PrismDBError::Internal(format!($fmt, $($arg)*))
    };
}

/// Macro for creating execution errors
#[macro_export]
macro_rules! execution_err {
    ($msg:expr) => {
        $crate::common::error::PrismDBError::Execution($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::common::error::PrismDBError::Execution(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PrismDBError::InvalidChildrenNumber {
            node: "(1 + 2)".to_string(),
            given: 1,
            expected: 2,
        };
        assert_eq!(
            err.to_string(),
            "(1 + 2): invalid children number, got 1, expected 2"
        );

        let err = PrismDBError::InvalidArgumentNumber {
            name: "pow".to_string(),
            expected: 2,
            given: 3,
        };
        assert_eq!(err.to_string(), "function 'pow' expected 2 arguments, 3 received");

        let err = internal_err!("bad state {}", 7);
        assert_eq!(err.to_string(), "Internal error: bad state 7");
    }
}
