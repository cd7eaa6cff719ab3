//! Column default values
//!
//! A column default is either a literal (`DEFAULT 2`) or an expression
//! (`DEFAULT (2)`, `DEFAULT (RAND() + 5)`). The text is parsed, classified,
//! resolved against the functions allowed in defaults and wrapped in a
//! [`ColumnDefaultValue`].
//!
//! This module only knows the [`Expression`] trait and the
//! [`FunctionRegistry`]. Parsing and resolution are reached through the
//! hooks held by a [`ColumnDefaultManager`], which the expression layer
//! builds and startup installs once into a process-wide slot.

use crate::catalog::function::FunctionRegistry;
use crate::common::error::{PrismDBError, PrismDBResult};
use crate::execution::ExecutionContext;
use crate::expression::{check_children_count, Expression, ExpressionRef};
use crate::types::{LogicalType, Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, trace};

/// Parses default text into a raw, possibly unresolved tree
pub type ParseDefaultFn =
    Arc<dyn Fn(&ExecutionContext, &str) -> PrismDBResult<ExpressionRef> + Send + Sync>;

/// Resolves every unresolved node of a raw tree
pub type TransformDefaultFn =
    Arc<dyn Fn(ExpressionRef) -> PrismDBResult<ExpressionRef> + Send + Sync>;

/// The default value of a column.
///
/// The empty value means the column has no default; it evaluates to NULL,
/// is nullable and resolved, and prints as the empty string.
#[derive(Debug, Clone, Default)]
pub struct ColumnDefaultValue {
    expression: Option<ExpressionRef>,
    literal: bool,
}

impl ColumnDefaultValue {
    pub fn new(expression: ExpressionRef, literal: bool) -> Self {
        Self {
            expression: Some(expression),
            literal,
        }
    }

    /// No default
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.expression.is_none()
    }

    /// Whether the default was written as a literal rather than a parenthesized expression
    pub fn is_literal(&self) -> bool {
        self.literal
    }

    pub fn expression(&self) -> Option<&ExpressionRef> {
        self.expression.as_ref()
    }

    /// Evaluate without a row, panicking if evaluation fails.
    ///
    /// Only call this on defaults that went through resolution, which
    /// evaluate without error.
    pub fn must_evaluate(&self, ctx: &ExecutionContext) -> Value {
        match self.evaluate(ctx, &[]) {
            Ok(value) => value,
            Err(err) => panic!("column default '{}' failed to evaluate: {}", self, err),
        }
    }
}

impl fmt::Display for ColumnDefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expression {
            None => Ok(()),
            Some(expr) if self.literal => write!(f, "{}", expr),
            Some(expr) => write!(f, "({})", expr),
        }
    }
}

impl Expression for ColumnDefaultValue {
    fn return_type(&self) -> LogicalType {
        match &self.expression {
            None => LogicalType::Null,
            Some(expr) => expr.return_type(),
        }
    }

    fn is_nullable(&self) -> bool {
        match &self.expression {
            None => true,
            Some(expr) => expr.is_nullable(),
        }
    }

    fn resolved(&self) -> bool {
        match &self.expression {
            None => true,
            Some(expr) => expr.resolved(),
        }
    }

    fn children(&self) -> Vec<ExpressionRef> {
        self.expression.iter().cloned().collect()
    }

    fn with_children(&self, children: Vec<ExpressionRef>) -> PrismDBResult<ExpressionRef> {
        check_children_count(self, children.len(), 1)?;
        match children.into_iter().next() {
            Some(child) => Ok(Arc::new(Self::new(child, self.literal))),
            None => Err(crate::internal_err!("column default rebuilt without a child")),
        }
    }

    fn evaluate(&self, ctx: &ExecutionContext, row: &[Value]) -> PrismDBResult<Value> {
        match &self.expression {
            None => Ok(Value::Null),
            Some(expr) => expr.evaluate(ctx, row),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Serialize for ColumnDefaultValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ColumnDefaultValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        if text.is_empty() {
            return Ok(ColumnDefaultValue::empty());
        }
        string_to_column_default_value(&ExecutionContext::empty(), &text)
            .map_err(serde::de::Error::custom)
    }
}

/// Parser, resolver and allow-list used to build column defaults
#[derive(Clone)]
pub struct ColumnDefaultManager {
    parse_default_string: ParseDefaultFn,
    expression_transform_up: TransformDefaultFn,
    allowed_default_functions: Arc<FunctionRegistry>,
}

impl ColumnDefaultManager {
    pub fn new(
        parse_default_string: ParseDefaultFn,
        expression_transform_up: TransformDefaultFn,
        allowed_default_functions: Arc<FunctionRegistry>,
    ) -> Self {
        Self {
            parse_default_string,
            expression_transform_up,
            allowed_default_functions,
        }
    }

    /// Functions that may appear in a column default
    pub fn allowed_default_functions(&self) -> &Arc<FunctionRegistry> {
        &self.allowed_default_functions
    }

    /// Parse `text` into a raw, unresolved tree
    pub fn parse_default_string(
        &self,
        ctx: &ExecutionContext,
        text: &str,
    ) -> PrismDBResult<ExpressionRef> {
        (self.parse_default_string)(ctx, text)
    }

    /// Parse, classify and resolve a default written as text.
    ///
    /// The text is a literal when the parsed root has no children and the
    /// text does not start with `(`. `2+2` is therefore not a literal.
    pub fn string_to_column_default_value(
        &self,
        ctx: &ExecutionContext,
        text: &str,
    ) -> PrismDBResult<ColumnDefaultValue> {
        let parsed = self.parse_default_string(ctx, text)?;
        let is_literal = parsed.children().is_empty() && !text.starts_with('(');
        trace!(text, is_literal, "parsed column default");
        self.expression_to_column_default_value(ctx, parsed, is_literal)
    }

    /// Resolve an already parsed tree into a column default.
    pub fn expression_to_column_default_value(
        &self,
        _ctx: &ExecutionContext,
        expression: ExpressionRef,
        is_literal: bool,
    ) -> PrismDBResult<ColumnDefaultValue> {
        let resolved = (self.expression_transform_up)(expression)?;
        debug!(default = %resolved, is_literal, "resolved column default");
        Ok(ColumnDefaultValue::new(resolved, is_literal))
    }

    /// Like [`Self::string_to_column_default_value`] but panics on error.
    ///
    /// For defaults known to be valid, such as builtin catalog definitions.
    pub fn must_string_to_column_default_value(
        &self,
        ctx: &ExecutionContext,
        text: &str,
    ) -> ColumnDefaultValue {
        match self.string_to_column_default_value(ctx, text) {
            Ok(value) => value,
            Err(err) => panic!("invalid column default '{}': {}", text, err),
        }
    }
}

impl fmt::Debug for ColumnDefaultManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDefaultManager")
            .field("allowed_default_functions", &self.allowed_default_functions.function_count())
            .finish_non_exhaustive()
    }
}

static COLUMN_DEFAULT_MANAGER: OnceLock<ColumnDefaultManager> = OnceLock::new();

/// Install the process-wide manager. Fails if one is already installed.
pub fn install_column_default_manager(manager: ColumnDefaultManager) -> PrismDBResult<()> {
    let functions = manager.allowed_default_functions.function_count();
    COLUMN_DEFAULT_MANAGER.set(manager).map_err(|_| {
        PrismDBError::Catalog("column default manager is already installed".to_string())
    })?;
    info!(functions, "installed column default manager");
    Ok(())
}

/// Return the process-wide manager, installing the one built by `init` if none is set.
pub fn get_or_install_column_default_manager<F>(init: F) -> &'static ColumnDefaultManager
where
    F: FnOnce() -> ColumnDefaultManager,
{
    COLUMN_DEFAULT_MANAGER.get_or_init(|| {
        let manager = init();
        info!(
            functions = manager.allowed_default_functions.function_count(),
            "installed column default manager"
        );
        manager
    })
}

/// The process-wide manager
pub fn column_default_manager() -> PrismDBResult<&'static ColumnDefaultManager> {
    COLUMN_DEFAULT_MANAGER
        .get()
        .ok_or(PrismDBError::UninitializedManager(
            "call prism_defaults::initialize() or Database::new() first",
        ))
}

/// Parse and resolve default text with the process-wide manager
pub fn string_to_column_default_value(
    ctx: &ExecutionContext,
    text: &str,
) -> PrismDBResult<ColumnDefaultValue> {
    column_default_manager()?.string_to_column_default_value(ctx, text)
}

/// Resolve a parsed tree with the process-wide manager
pub fn expression_to_column_default_value(
    ctx: &ExecutionContext,
    expression: ExpressionRef,
    is_literal: bool,
) -> PrismDBResult<ColumnDefaultValue> {
    column_default_manager()?.expression_to_column_default_value(ctx, expression, is_literal)
}

/// [`string_to_column_default_value`] that panics on error
pub fn must_string_to_column_default_value(ctx: &ExecutionContext, text: &str) -> ColumnDefaultValue {
    match column_default_manager() {
        Ok(manager) => manager.must_string_to_column_default_value(ctx, text),
        Err(err) => panic!("invalid column default '{}': {}", text, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{ArithmeticExpression, ArithmeticOperator, LiteralExpression};

    fn lit(v: i8) -> ExpressionRef {
        Arc::new(LiteralExpression::new(Value::tinyint(v)))
    }

    #[test]
    fn test_empty_default_is_safe() {
        let ctx = ExecutionContext::empty();
        let empty = ColumnDefaultValue::empty();

        assert!(empty.is_empty());
        assert!(empty.is_nullable());
        assert!(empty.resolved());
        assert_eq!(empty.to_string(), "");
        assert_eq!(empty.return_type(), LogicalType::Null);
        assert_eq!(empty.evaluate(&ctx, &[]).ok(), Some(Value::Null));
        assert_eq!(empty.must_evaluate(&ctx), Value::Null);
        assert!(empty.children().is_empty());
    }

    #[test]
    fn test_literal_and_expression_text() -> PrismDBResult<()> {
        let literal = ColumnDefaultValue::new(lit(2), true);
        assert_eq!(literal.to_string(), "2");
        assert!(literal.is_literal());

        let expression = ColumnDefaultValue::new(lit(2), false);
        assert_eq!(expression.to_string(), "(2)");
        assert!(!expression.is_literal());

        let ctx = ExecutionContext::empty();
        assert_eq!(expression.evaluate(&ctx, &[])?, Value::tinyint(2));
        Ok(())
    }

    #[test]
    fn test_with_children_keeps_literal_flag() -> PrismDBResult<()> {
        let default = ColumnDefaultValue::new(lit(2), true);
        assert!(default.with_children(vec![]).is_err());
        assert!(default.with_children(vec![lit(1), lit(2)]).is_err());

        let sum: ExpressionRef =
            Arc::new(ArithmeticExpression::new(lit(1), lit(2), ArithmeticOperator::Add));
        let rebuilt = default.with_children(vec![sum])?;
        assert_eq!(rebuilt.to_string(), "1 + 2");
        Ok(())
    }
}
