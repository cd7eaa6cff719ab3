//! PrismDB column defaults
//!
//! Parses, classifies and resolves column default expressions against an
//! allow-list of builtin functions, and provides the builtin function
//! registry the rest of the engine resolves calls against.
//!
//! Startup installs the process-wide [`ColumnDefaultManager`] once, either
//! through [`initialize`] or by creating a [`Database`].
pub mod catalog;
pub mod common;
pub mod database;
pub mod execution;
pub mod expression;
pub mod parser;
pub mod types;

// Re-export catalog system for convenience
pub use catalog::{
    column_default_manager, install_column_default_manager, string_to_column_default_value,
    Catalog, ColumnDefaultManager, ColumnDefaultValue, ColumnInfo, FunctionDescriptor,
    FunctionRegistry, Table, TableInfo,
};

// Re-export common types for convenience
pub use common::{PrismDBError, PrismDBResult};

// Re-export type system for convenience
pub use types::{LogicalType, TypeUtils, Value};

// Re-export expression system for convenience
pub use expression::{
    builtin_column_default_manager, builtin_functions, default_allowed_functions, full_catalog,
    transform_up, Expression, ExpressionRef,
};

// Re-export execution context and locks for convenience
pub use execution::{ExecutionContext, LockSubsystem};

// Re-export database for convenience
pub use crate::database::{Database, DatabaseConfig};

/// Install the builtin column default manager if none is installed yet
pub fn initialize() -> PrismDBResult<&'static ColumnDefaultManager> {
    let manager = builtin_column_default_manager()?;
    Ok(catalog::get_or_install_column_default_manager(move || manager))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_is_idempotent() -> PrismDBResult<()> {
        let first = initialize()?;
        let second = initialize()?;
        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(first, column_default_manager()?));
        Ok(())
    }
}
