//! Catalog System for PrismDB
//!
//! This module provides the catalog that manages tables, their column
//! defaults and the function registry expressions are resolved against.

pub mod column_default;
pub mod function;
pub mod table;

pub use column_default::*;
pub use function::*;
pub use table::*;

use crate::common::error::{PrismDBError, PrismDBResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Main catalog that manages all database metadata
#[derive(Debug)]
pub struct Catalog {
    /// Tables keyed by lowercase name
    tables: RwLock<HashMap<String, Arc<RwLock<Table>>>>,
    /// Every function callable from expressions
    functions: Arc<FunctionRegistry>,
}

impl Catalog {
    /// Create a new catalog over `functions`
    pub fn new(functions: Arc<FunctionRegistry>) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            functions,
        }
    }

    fn key(name: &str) -> String {
        name.to_lowercase()
    }

    /// Create a new table
    pub fn create_table(&self, info: TableInfo) -> PrismDBResult<Arc<RwLock<Table>>> {
        let key = Self::key(&info.table_name);
        let mut tables = self.tables.write();
        if tables.contains_key(&key) {
            return Err(PrismDBError::Catalog(format!(
                "Table '{}' already exists",
                info.table_name
            )));
        }

        let table = Arc::new(RwLock::new(Table::new(info)?));
        tables.insert(key, Arc::clone(&table));
        info!(table = %table.read().get_name(), "created table");
        Ok(table)
    }

    /// Get a table
    pub fn get_table(&self, name: &str) -> PrismDBResult<Arc<RwLock<Table>>> {
        self.tables
            .read()
            .get(&Self::key(name))
            .cloned()
            .ok_or_else(|| PrismDBError::Catalog(format!("Table '{}' does not exist", name)))
    }

    /// Drop a table
    pub fn drop_table(&self, name: &str) -> PrismDBResult<()> {
        match self.tables.write().remove(&Self::key(name)) {
            Some(_) => {
                info!(table = name, "dropped table");
                Ok(())
            }
            None => Err(PrismDBError::Catalog(format!(
                "Table '{}' does not exist",
                name
            ))),
        }
    }

    /// List table names, sorted
    pub fn list_tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tables
            .read()
            .values()
            .map(|table| table.read().get_name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Look up a function by name
    pub fn function(&self, name: &str) -> PrismDBResult<&FunctionDescriptor> {
        self.functions.lookup(name)
    }

    pub fn functions(&self) -> &Arc<FunctionRegistry> {
        &self.functions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogicalType;

    #[test]
    fn test_table_lifecycle() -> PrismDBResult<()> {
        let catalog = Catalog::new(Arc::new(FunctionRegistry::new()));
        catalog.create_table(
            TableInfo::new("Orders").with_column(ColumnInfo::new("id", LogicalType::BigInt)),
        )?;

        assert!(catalog.create_table(TableInfo::new("orders")).is_err());
        assert_eq!(catalog.list_tables(), vec!["Orders".to_string()]);
        assert_eq!(catalog.get_table("ORDERS")?.read().get_columns().len(), 1);

        catalog.drop_table("orders")?;
        assert!(catalog.get_table("orders").is_err());
        assert!(catalog.drop_table("orders").is_err());
        Ok(())
    }

    #[test]
    fn test_invalid_names() {
        let catalog = Catalog::new(Arc::new(FunctionRegistry::new()));
        assert!(catalog.create_table(TableInfo::new("")).is_err());
        assert!(catalog.create_table(TableInfo::new("x".repeat(65))).is_err());
        assert!(catalog.function("abs").is_err());
    }
}
