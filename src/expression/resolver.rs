//! Resolution of parsed column defaults
//!
//! Builds the hooks a [`ColumnDefaultManager`] needs: the binder's parser
//! and a bottom-up rewrite that swaps every unresolved function for the
//! node its allow-listed builder returns.

use crate::catalog::column_default::{ColumnDefaultManager, ParseDefaultFn, TransformDefaultFn};
use crate::catalog::function::FunctionRegistry;
use crate::common::error::{PrismDBError, PrismDBResult};
use crate::expression::binder::parse_default_string;
use crate::expression::function::default_allowed_functions;
use crate::expression::{transform_up, ExpressionRef, Unresolved};
use std::sync::Arc;
use tracing::trace;

/// Resolve a single node against `allowed`.
///
/// Unresolved functions must be allow-listed; their arguments have already
/// been resolved by the time this runs. Column references are rejected.
/// Anything else is returned unchanged.
pub fn resolve_default_node(
    allowed: &FunctionRegistry,
    node: ExpressionRef,
) -> PrismDBResult<ExpressionRef> {
    match node.as_unresolved() {
        Some(Unresolved::Function(function)) => {
            let descriptor = allowed
                .get(function.name())
                .ok_or_else(|| PrismDBError::FunctionNotAllowed(function.name().to_string()))?;
            trace!(function = function.name(), "resolving default function");
            descriptor.call(function.arguments().to_vec())
        }
        Some(Unresolved::Column(column)) => Err(PrismDBError::ColumnReferenceNotSupported(
            column.to_string(),
        )),
        None => Ok(node),
    }
}

/// Transform hook resolving a whole tree against `allowed`
pub fn default_transform(allowed: Arc<FunctionRegistry>) -> TransformDefaultFn {
    Arc::new(move |expression: ExpressionRef| {
        transform_up(&expression, &mut |node| resolve_default_node(&allowed, node))
    })
}

/// Parser hook backed by the SQL parser and binder
pub fn default_parser() -> ParseDefaultFn {
    Arc::new(parse_default_string)
}

/// Manager wired with the builtin parser, resolver and allow-list
pub fn builtin_column_default_manager() -> PrismDBResult<ColumnDefaultManager> {
    let allowed = Arc::new(default_allowed_functions()?);
    Ok(ColumnDefaultManager::new(
        default_parser(),
        default_transform(Arc::clone(&allowed)),
        allowed,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::function::FunctionDescriptor;
    use crate::execution::ExecutionContext;
    use crate::expression::{Expression, LiteralExpression, Rand};
    use crate::types::{LogicalType, Value};

    fn manager() -> PrismDBResult<ColumnDefaultManager> {
        builtin_column_default_manager()
    }

    #[test]
    fn test_literal_classification() -> PrismDBResult<()> {
        let ctx = ExecutionContext::empty();
        let m = manager()?;

        let literal = m.string_to_column_default_value(&ctx, "2")?;
        assert!(literal.is_literal());
        assert_eq!(literal.to_string(), "2");

        let paren = m.string_to_column_default_value(&ctx, "(2)")?;
        assert!(!paren.is_literal());
        assert_eq!(paren.to_string(), "(2)");

        let sum = m.string_to_column_default_value(&ctx, "2+2")?;
        assert!(!sum.is_literal());
        assert_eq!(sum.to_string(), "(2 + 2)");
        Ok(())
    }

    #[test]
    fn test_functions_resolve_innermost_first() -> PrismDBResult<()> {
        let ctx = ExecutionContext::empty();
        let value = manager()?.string_to_column_default_value(&ctx, "(GREATEST(RAND(), RAND()))")?;
        assert_eq!(value.to_string(), "(GREATEST(RAND(), RAND()))");
        assert!(value.resolved());
        assert_eq!(value.return_type(), LogicalType::Double);

        let greatest = value.children();
        let rands = greatest[0].children();
        assert_eq!(rands.len(), 2);
        assert!(rands[0].as_any().downcast_ref::<Rand>().is_some());
        Ok(())
    }

    #[test]
    fn test_rejections() -> PrismDBResult<()> {
        let ctx = ExecutionContext::empty();
        let m = manager()?;

        assert!(matches!(
            m.string_to_column_default_value(&ctx, "(GET_LOCK('x', 1))"),
            Err(PrismDBError::FunctionNotAllowed(name)) if name == "GET_LOCK"
        ));
        assert!(matches!(
            m.string_to_column_default_value(&ctx, "(a + 1)"),
            Err(PrismDBError::ColumnReferenceNotSupported(name)) if name == "a"
        ));
        assert!(matches!(
            m.string_to_column_default_value(&ctx, "(ABS(1, 2))"),
            Err(PrismDBError::InvalidArgumentNumber { expected: 1, given: 2, .. })
        ));
        assert!(matches!(
            m.string_to_column_default_value(&ctx, "(1 +"),
            Err(PrismDBError::Parse(_))
        ));
        Ok(())
    }

    #[test]
    fn test_custom_allow_list() -> PrismDBResult<()> {
        let allowed = Arc::new(FunctionRegistry::with_functions(vec![FunctionDescriptor::nullary(
            "answer",
            || Ok(Arc::new(LiteralExpression::new(Value::Integer(42))) as ExpressionRef),
        )])?);
        let m = ColumnDefaultManager::new(
            default_parser(),
            default_transform(Arc::clone(&allowed)),
            allowed,
        );
        let ctx = ExecutionContext::empty();

        let value = m.string_to_column_default_value(&ctx, "(ANSWER() + 1)")?;
        assert_eq!(value.to_string(), "(42 + 1)");
        assert_eq!(value.evaluate(&ctx, &[])?, Value::BigInt(43));
        assert!(m.string_to_column_default_value(&ctx, "(RAND())").is_err());
        Ok(())
    }
}
