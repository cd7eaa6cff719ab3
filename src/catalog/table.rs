//! Table Management
//!
//! Table metadata and the row store that fills omitted columns from their
//! defaults on insert.

use crate::catalog::column_default::ColumnDefaultValue;
use crate::common::constants::MAX_IDENTIFIER_LENGTH;
use crate::common::error::{PrismDBError, PrismDBResult};
use crate::execution::ExecutionContext;
use crate::expression::Expression;
use crate::types::{LogicalType, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Column metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Column type
    pub column_type: LogicalType,
    /// Whether column can contain null values
    pub nullable: bool,
    /// Default value; serialized as its SQL text
    #[serde(default)]
    pub default_value: ColumnDefaultValue,
    /// Column position in the table
    pub column_index: usize,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, column_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            default_value: ColumnDefaultValue::empty(),
            column_index: 0,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_default(mut self, default_value: ColumnDefaultValue) -> Self {
        self.default_value = default_value;
        self
    }

    /// Value this column takes when an insert omits it
    pub fn default_for_insert(&self, ctx: &ExecutionContext) -> PrismDBResult<Value> {
        let value = self.default_value.evaluate(ctx, &[])?;
        self.coerce(value)
    }

    /// Cast `value` to the column type and enforce NOT NULL
    pub fn coerce(&self, value: Value) -> PrismDBResult<Value> {
        if value.is_null() {
            if !self.nullable {
                return Err(PrismDBError::Execution(format!(
                    "Column '{}' cannot be null",
                    self.name
                )));
            }
            return Ok(Value::Null);
        }
        value.cast_to(&self.column_type).map_err(|err| {
            PrismDBError::Execution(format!(
                "Incorrect {} value for column '{}': {}",
                self.column_type, self.name, err
            ))
        })
    }

    /// Check a default against this column.
    ///
    /// Deterministic defaults are evaluated once, so a literal that cannot
    /// be stored in the column is rejected when the column is defined.
    fn validate_default(&self, default_value: &ColumnDefaultValue) -> PrismDBResult<()> {
        if default_value.is_empty() || !default_value.is_deterministic() {
            return Ok(());
        }
        let ctx = ExecutionContext::empty();
        default_value
            .evaluate(&ctx, &[])
            .and_then(|value| self.coerce(value))
            .map(|_| ())
            .map_err(|_| {
                PrismDBError::Catalog(format!("Invalid default value for '{}'", self.name))
            })
    }
}

/// Table metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableInfo {
    pub table_name: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
        }
    }

    /// Builder-style column append; see [`Table::add_column`] for validation
    pub fn with_column(mut self, column: ColumnInfo) -> Self {
        self.columns.push(column);
        self
    }

    pub fn get_column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name.eq_ignore_ascii_case(name))
    }
}

pub(crate) fn validate_identifier(kind: &str, name: &str) -> PrismDBResult<()> {
    if name.is_empty() || name.chars().count() > MAX_IDENTIFIER_LENGTH {
        return Err(PrismDBError::Catalog(format!(
            "Incorrect {} name '{}'",
            kind, name
        )));
    }
    Ok(())
}

/// Database table
#[derive(Debug)]
pub struct Table {
    info: TableInfo,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table, validating every column the way [`Self::add_column`] does
    pub fn new(info: TableInfo) -> PrismDBResult<Self> {
        validate_identifier("table", &info.table_name)?;
        let mut table = Self {
            info: TableInfo::new(info.table_name),
            rows: Vec::new(),
        };
        for column in info.columns {
            table.add_column(column)?;
        }
        Ok(table)
    }

    /// Get table name
    pub fn get_name(&self) -> &str {
        &self.info.table_name
    }

    pub fn info(&self) -> &TableInfo {
        &self.info
    }

    pub fn get_columns(&self) -> &[ColumnInfo] {
        &self.info.columns
    }

    pub fn get_column(&self, name: &str) -> Option<&ColumnInfo> {
        self.info.get_column(name)
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_mut(&mut self, name: &str) -> PrismDBResult<&mut ColumnInfo> {
        let table = self.info.table_name.clone();
        self.info
            .columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                PrismDBError::Catalog(format!("Unknown column '{}' in '{}'", name, table))
            })
    }

    /// Append a column. Existing rows get the column's default.
    pub fn add_column(&mut self, mut column: ColumnInfo) -> PrismDBResult<()> {
        validate_identifier("column", &column.name)?;
        if self.info.get_column(&column.name).is_some() {
            return Err(PrismDBError::Catalog(format!(
                "Duplicate column name '{}'",
                column.name
            )));
        }
        column.validate_default(&column.default_value)?;

        if !self.rows.is_empty() {
            let ctx = ExecutionContext::empty();
            let fill = column.default_for_insert(&ctx)?;
            for row in &mut self.rows {
                row.push(fill.clone());
            }
        }

        column.column_index = self.info.columns.len();
        debug!(
            table = %self.info.table_name,
            column = %column.name,
            default = %column.default_value,
            "added column"
        );
        self.info.columns.push(column);
        Ok(())
    }

    /// Replace a column's default wholesale
    pub fn set_column_default(
        &mut self,
        name: &str,
        default_value: ColumnDefaultValue,
    ) -> PrismDBResult<()> {
        let column = self.column_mut(name)?;
        column.validate_default(&default_value)?;
        debug!(column = %column.name, default = %default_value, "set column default");
        column.default_value = default_value;
        Ok(())
    }

    /// Remove a column's default
    pub fn drop_column_default(&mut self, name: &str) -> PrismDBResult<()> {
        let column = self.column_mut(name)?;
        column.default_value = ColumnDefaultValue::empty();
        Ok(())
    }

    /// Build a full row from the named values an insert provides.
    ///
    /// Omitted columns take their default, evaluated now. Every value is
    /// cast to its column type and NOT NULL columns reject NULL.
    pub fn build_row(
        &self,
        ctx: &ExecutionContext,
        provided: &[(&str, Value)],
    ) -> PrismDBResult<Vec<Value>> {
        let mut slots: Vec<Option<Value>> = vec![None; self.info.columns.len()];
        for (name, value) in provided {
            let index = self.info.get_column_index(name).ok_or_else(|| {
                PrismDBError::Catalog(format!(
                    "Unknown column '{}' in '{}'",
                    name, self.info.table_name
                ))
            })?;
            if slots[index].is_some() {
                return Err(PrismDBError::Catalog(format!(
                    "Column '{}' specified twice",
                    name
                )));
            }
            slots[index] = Some(value.clone());
        }

        self.info
            .columns
            .iter()
            .zip(slots)
            .map(|(column, slot)| match slot {
                Some(value) => column.coerce(value),
                None => column.default_for_insert(ctx),
            })
            .collect()
    }

    /// Insert a row built by [`Self::build_row`]; returns the new row count
    pub fn insert(&mut self, ctx: &ExecutionContext, provided: &[(&str, Value)]) -> PrismDBResult<usize> {
        let row = self.build_row(ctx, provided)?;
        self.rows.push(row);
        Ok(self.rows.len())
    }
}
