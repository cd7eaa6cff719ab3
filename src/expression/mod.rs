//! Expression system for PrismDB
//!
//! Expressions form immutable trees shared through [`ExpressionRef`]. A tree
//! produced by the parser may contain unresolved placeholders
//! ([`UnresolvedFunction`], [`UnresolvedColumn`]); resolution rewrites them
//! bottom-up with [`transform_up`].

pub mod binder;
pub mod conditional_functions;
pub mod datetime_functions;
pub mod expression;
pub mod function;
pub mod locking_functions;
pub mod math_functions;
pub mod operator;
pub mod resolver;
pub mod string_functions;
pub mod system_functions;
pub mod unresolved;

pub use binder::*;
pub use conditional_functions::*;
pub use expression::*;
pub use function::*;
pub use locking_functions::*;
pub use math_functions::Rand;
pub use operator::*;
pub use resolver::*;
pub use unresolved::*;

use crate::common::error::{PrismDBError, PrismDBResult};
use crate::execution::ExecutionContext;
use crate::types::{LogicalType, Value};
use std::fmt;
use std::sync::Arc;

/// Expression reference type
pub type ExpressionRef = Arc<dyn Expression>;

/// Expression trait that all expressions must implement
///
/// The [`fmt::Display`] form is the expression's SQL text; it is what gets
/// persisted for column defaults and re-parsed on load.
pub trait Expression: fmt::Debug + fmt::Display + Send + Sync {
    /// Get the return type of this expression
    fn return_type(&self) -> LogicalType;

    /// Check if this expression can return null
    fn is_nullable(&self) -> bool;

    /// Whether this node and every descendant are resolved
    fn resolved(&self) -> bool {
        self.children().iter().all(|child| child.resolved())
    }

    /// Check if this expression is deterministic
    fn is_deterministic(&self) -> bool {
        self.children().iter().all(|child| child.is_deterministic())
    }

    /// Get the children of this expression
    fn children(&self) -> Vec<ExpressionRef>;

    /// Rebuild this node with new children. Fails unless the count matches.
    fn with_children(&self, children: Vec<ExpressionRef>) -> PrismDBResult<ExpressionRef>;

    /// Evaluate this expression against a single row
    fn evaluate(&self, ctx: &ExecutionContext, row: &[Value]) -> PrismDBResult<Value>;

    /// Downcast to Any for type checking
    fn as_any(&self) -> &dyn std::any::Any;

    /// Placeholder nodes expose themselves here so resolution can match on them
    fn as_unresolved(&self) -> Option<Unresolved<'_>> {
        None
    }
}

/// The unresolved placeholder kinds a parsed tree may contain
#[derive(Debug, Clone, Copy)]
pub enum Unresolved<'a> {
    Function(&'a UnresolvedFunction),
    Column(&'a UnresolvedColumn),
}

/// Fail with `InvalidChildrenNumber` unless `given` matches `expected`.
pub fn check_children_count(
    node: &dyn Expression,
    given: usize,
    expected: usize,
) -> PrismDBResult<()> {
    if given != expected {
        return Err(PrismDBError::InvalidChildrenNumber {
            node: node.to_string(),
            given,
            expected,
        });
    }
    Ok(())
}

/// Rewrite a tree bottom-up.
///
/// Children are transformed first, the node is rebuilt with the results,
/// and `f` is applied to the rebuilt node. Leaves are passed to `f`
/// directly. The first error aborts the whole traversal.
pub fn transform_up<F>(expr: &ExpressionRef, f: &mut F) -> PrismDBResult<ExpressionRef>
where
    F: FnMut(ExpressionRef) -> PrismDBResult<ExpressionRef>,
{
    let children = expr.children();
    if children.is_empty() {
        return f(Arc::clone(expr));
    }

    let mut transformed = Vec::with_capacity(children.len());
    for child in &children {
        transformed.push(transform_up(child, f)?);
    }

    let rebuilt = expr.with_children(transformed)?;
    f(rebuilt)
}

/// Expression utilities
pub mod utils {
    use super::*;

    /// Count the nodes of a tree, including the root
    pub fn node_count(expr: &ExpressionRef) -> usize {
        1 + expr.children().iter().map(node_count).sum::<usize>()
    }

    /// Join children's SQL text with `", "`
    pub fn join_display(children: &[ExpressionRef]) -> String {
        children
            .iter()
            .map(|child| child.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Evaluate every child against the same row
    pub fn evaluate_all(
        children: &[ExpressionRef],
        ctx: &ExecutionContext,
        row: &[Value],
    ) -> PrismDBResult<Vec<Value>> {
        children.iter().map(|child| child.evaluate(ctx, row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn lit(v: i32) -> ExpressionRef {
        Arc::new(LiteralExpression::new(Value::integer(v)))
    }

    #[test]
    fn test_transform_up_visits_children_first() -> PrismDBResult<()> {
        let tree: ExpressionRef = Arc::new(ArithmeticExpression::new(
            lit(1),
            Arc::new(ArithmeticExpression::new(lit(2), lit(3), ArithmeticOperator::Multiply)),
            ArithmeticOperator::Add,
        ));

        let mut visited = Vec::new();
        let result = transform_up(&tree, &mut |e: ExpressionRef| {
            visited.push(e.to_string());
            Ok(e)
        })?;

        assert_eq!(visited, vec!["1", "2", "3", "2 * 3", "1 + 2 * 3"]);
        assert_eq!(result.to_string(), tree.to_string());
        assert_eq!(utils::node_count(&result), 5);
        Ok(())
    }

    #[test]
    fn test_transform_up_rewrites_leaves() -> PrismDBResult<()> {
        let tree: ExpressionRef = Arc::new(ArithmeticExpression::new(
            lit(1),
            lit(2),
            ArithmeticOperator::Add,
        ));

        let result = transform_up(&tree, &mut |e: ExpressionRef| {
            match e.as_any().downcast_ref::<LiteralExpression>() {
                Some(literal) => {
                    let doubled = literal.value().try_as_i32()? * 10;
                    Ok(lit(doubled))
                }
                None => Ok(e),
            }
        })?;

        assert_eq!(result.to_string(), "10 + 20");
        let ctx = ExecutionContext::empty();
        assert_eq!(result.evaluate(&ctx, &[])?, Value::bigint(30));
        Ok(())
    }

    #[test]
    fn test_transform_up_aborts_on_error() {
        let tree: ExpressionRef = Arc::new(ArithmeticExpression::new(
            lit(1),
            lit(2),
            ArithmeticOperator::Add,
        ));

        let mut calls = 0;
        let result = transform_up(&tree, &mut |e: ExpressionRef| {
            calls += 1;
            if e.to_string() == "1" {
                return Err(PrismDBError::InvalidValue("stop".to_string()));
            }
            Ok(e)
        });

        assert!(matches!(result, Err(PrismDBError::InvalidValue(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_with_children_checks_arity() -> PrismDBResult<()> {
        let add: ExpressionRef = Arc::new(ArithmeticExpression::new(
            lit(1),
            lit(2),
            ArithmeticOperator::Add,
        ));

        let err = add.with_children(vec![lit(1)]);
        assert!(matches!(
            err,
            Err(PrismDBError::InvalidChildrenNumber {
                given: 1,
                expected: 2,
                ..
            })
        ));

        let rebuilt = add.with_children(vec![lit(4), lit(5)])?;
        let children = rebuilt.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].to_string(), "4");
        assert_eq!(children[1].to_string(), "5");
        Ok(())
    }
}
