//! Database implementation
//!
//! This module provides the main Database struct that ties together the
//! lock subsystem, the function catalog, the process-wide column default
//! manager and the table catalog.

use crate::catalog::column_default::{
    get_or_install_column_default_manager, ColumnDefaultManager, ColumnDefaultValue,
};
use crate::catalog::function::FunctionRegistry;
use crate::catalog::Catalog;
use crate::common::constants::{DEFAULT_LOCK_WAIT_TIMEOUT_SECS, DEFAULT_USER};
use crate::common::error::{PrismDBError, PrismDBResult};
use crate::execution::{ExecutionContext, LockSubsystem};
use crate::expression::{builtin_column_default_manager, builtin_functions, full_catalog};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Database configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// User new connections run as when none is given
    pub default_user: String,
    /// Cap on GET_LOCK waits, in seconds
    pub lock_wait_timeout_secs: u64,
    /// Register GET_LOCK and friends in the function catalog
    pub enable_locking_functions: bool,
    /// `tracing` filter directive used by the CLI
    pub log_level: String,
}

impl DatabaseConfig {
    /// Create a configuration for an in-memory database
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file; missing keys take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PrismDBResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        if config.default_user.is_empty() {
            return Err(PrismDBError::InvalidArgument(
                "default_user must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            default_user: DEFAULT_USER.to_string(),
            lock_wait_timeout_secs: DEFAULT_LOCK_WAIT_TIMEOUT_SECS,
            enable_locking_functions: true,
            log_level: "info".to_string(),
        }
    }
}

/// Main database instance
#[derive(Debug)]
pub struct Database {
    catalog: Catalog,
    locks: Arc<LockSubsystem>,
    column_defaults: &'static ColumnDefaultManager,
    next_connection_id: AtomicU32,
    config: DatabaseConfig,
}

impl Database {
    /// Wire up a database.
    ///
    /// The column default manager is installed process-wide on first use and
    /// shared by every later database.
    pub fn new(config: DatabaseConfig) -> PrismDBResult<Self> {
        let locks = Arc::new(LockSubsystem::with_max_wait(Duration::from_secs(
            config.lock_wait_timeout_secs,
        )));

        let functions = if config.enable_locking_functions {
            full_catalog(Arc::clone(&locks))?
        } else {
            FunctionRegistry::with_functions(builtin_functions())?
        };
        info!(
            functions = functions.function_count(),
            locking = config.enable_locking_functions,
            "built function catalog"
        );

        let manager = builtin_column_default_manager()?;
        let column_defaults = get_or_install_column_default_manager(move || manager);

        Ok(Self {
            catalog: Catalog::new(Arc::new(functions)),
            locks,
            column_defaults,
            next_connection_id: AtomicU32::new(1),
            config,
        })
    }

    /// Create a new in-memory database with the default configuration
    pub fn new_in_memory() -> PrismDBResult<Self> {
        Self::new(DatabaseConfig::in_memory())
    }

    /// Open a session; an empty user falls back to the configured default
    pub fn connect(&self, user: &str) -> ExecutionContext {
        let id = self.next_connection_id.fetch_add(1, Ordering::Relaxed);
        let user = if user.is_empty() {
            self.config.default_user.as_str()
        } else {
            user
        };
        ExecutionContext::new(id, user)
    }

    /// Resolve default text the way `DEFAULT <text>` in DDL does
    pub fn column_default(
        &self,
        ctx: &ExecutionContext,
        text: &str,
    ) -> PrismDBResult<ColumnDefaultValue> {
        self.column_defaults.string_to_column_default_value(ctx, text)
    }

    /// Drop a session's user-level locks; returns how many holds were released
    pub fn disconnect(&self, ctx: &ExecutionContext) -> usize {
        self.locks.release_all(ctx)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn column_defaults(&self) -> &'static ColumnDefaultManager {
        self.column_defaults
    }

    pub fn locks(&self) -> &Arc<LockSubsystem> {
        &self.locks
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{Expression, ExpressionRef, LiteralExpression};
    use crate::types::Value;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_config_from_json() -> PrismDBResult<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, r#"{{"default_user": "app", "enable_locking_functions": false}}"#)?;

        let config = DatabaseConfig::from_json_file(file.path())?;
        assert_eq!(
            config,
            DatabaseConfig {
                default_user: "app".to_string(),
                enable_locking_functions: false,
                ..DatabaseConfig::default()
            }
        );
        Ok(())
    }

    #[test]
    fn test_config_rejects_empty_user() -> PrismDBResult<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, r#"{{"default_user": ""}}"#)?;
        assert!(DatabaseConfig::from_json_file(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_connect_and_functions() -> PrismDBResult<()> {
        let db = Database::new_in_memory()?;
        let a = db.connect("");
        let b = db.connect("app");
        assert_eq!(a.user, DEFAULT_USER);
        assert_ne!(a.connection_id, b.connection_id);

        let get_lock = db.catalog().function("get_lock")?;
        let lit = |v: Value| Arc::new(LiteralExpression::new(v)) as ExpressionRef;
        let node = get_lock.call(vec![lit(Value::varchar("job")), lit(Value::Integer(0))])?;
        assert_eq!(node.evaluate(&a, &[])?, Value::Integer(1));
        assert_eq!(db.disconnect(&a), 1);

        let default = db.column_default(&b, "(CONNECTION_ID())")?;
        assert_eq!(default.evaluate(&b, &[])?, Value::BigInt(b.connection_id as i64));
        Ok(())
    }

    #[test]
    fn test_locking_can_be_disabled() -> PrismDBResult<()> {
        let db = Database::new(DatabaseConfig {
            enable_locking_functions: false,
            ..DatabaseConfig::default()
        })?;
        assert!(db.catalog().function("GET_LOCK").is_err());
        assert!(db.catalog().function("NOW").is_ok());
        Ok(())
    }
}
