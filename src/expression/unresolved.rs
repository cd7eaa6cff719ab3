//! Placeholder nodes produced by the binder before name resolution

use crate::common::error::{PrismDBError, PrismDBResult};
use crate::execution::ExecutionContext;
use crate::expression::utils::join_display;
use crate::expression::{check_children_count, Expression, ExpressionRef, Unresolved};
use crate::types::{LogicalType, Value};
use std::fmt;
use std::sync::Arc;

/// A function call whose name has not been looked up yet
#[derive(Debug, Clone)]
pub struct UnresolvedFunction {
    name: String,
    arguments: Vec<ExpressionRef>,
}

impl UnresolvedFunction {
    pub fn new(name: impl Into<String>, arguments: Vec<ExpressionRef>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[ExpressionRef] {
        &self.arguments
    }
}

impl fmt::Display for UnresolvedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, join_display(&self.arguments))
    }
}

impl Expression for UnresolvedFunction {
    fn return_type(&self) -> LogicalType {
        LogicalType::Invalid
    }

    fn is_nullable(&self) -> bool {
        true
    }

    fn resolved(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<ExpressionRef> {
        self.arguments.clone()
    }

    fn with_children(&self, children: Vec<ExpressionRef>) -> PrismDBResult<ExpressionRef> {
        check_children_count(self, children.len(), self.arguments.len())?;
        Ok(Arc::new(Self::new(self.name.clone(), children)))
    }

    fn evaluate(&self, _ctx: &ExecutionContext, _row: &[Value]) -> PrismDBResult<Value> {
        Err(PrismDBError::Execution(format!(
            "unresolved function '{}' cannot be evaluated",
            self.name
        )))
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_unresolved(&self) -> Option<Unresolved<'_>> {
        Some(Unresolved::Function(self))
    }
}

/// A column name that has not been bound to a table
#[derive(Debug, Clone)]
pub struct UnresolvedColumn {
    table: Option<String>,
    name: String,
}

impl UnresolvedColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
        }
    }

    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for UnresolvedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl Expression for UnresolvedColumn {
    fn return_type(&self) -> LogicalType {
        LogicalType::Invalid
    }

    fn is_nullable(&self) -> bool {
        true
    }

    fn resolved(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<ExpressionRef> {
        vec![]
    }

    fn with_children(&self, children: Vec<ExpressionRef>) -> PrismDBResult<ExpressionRef> {
        check_children_count(self, children.len(), 0)?;
        Ok(Arc::new(self.clone()))
    }

    fn evaluate(&self, _ctx: &ExecutionContext, _row: &[Value]) -> PrismDBResult<Value> {
        Err(PrismDBError::Execution(format!(
            "unresolved column '{}' cannot be evaluated",
            self
        )))
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_unresolved(&self) -> Option<Unresolved<'_>> {
        Some(Unresolved::Column(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::LiteralExpression;

    #[test]
    fn test_unresolved_function() {
        let arg: ExpressionRef = Arc::new(LiteralExpression::new(Value::integer(1)));
        let func = UnresolvedFunction::new("rand", vec![arg]);

        assert!(!func.resolved());
        assert_eq!(func.to_string(), "rand(1)");
        assert!(func.evaluate(&ExecutionContext::empty(), &[]).is_err());
        assert!(matches!(func.as_unresolved(), Some(Unresolved::Function(f)) if f.name() == "rand"));
    }

    #[test]
    fn test_unresolved_parent_is_unresolved() {
        let column: ExpressionRef = Arc::new(UnresolvedColumn::qualified("t", "a"));
        let negate = crate::expression::NegateExpression::new(column);
        assert!(!negate.resolved());
        assert_eq!(negate.to_string(), "-t.a");
    }
}
