//! Expression Binding
//!
//! Turns a parsed AST into an expression tree. Names are not looked up here:
//! function calls become [`UnresolvedFunction`] and column references become
//! [`UnresolvedColumn`], which resolution replaces later.

use crate::common::error::PrismDBResult;
use crate::execution::ExecutionContext;
use crate::expression::expression::{ArithmeticExpression, LiteralExpression, NegateExpression};
use crate::expression::operator::ArithmeticOperator;
use crate::expression::unresolved::{UnresolvedColumn, UnresolvedFunction};
use crate::expression::ExpressionRef;
use crate::parser::{ast, SqlParser};
use crate::types::Value;
use std::sync::Arc;
use tracing::trace;

/// Expression binder
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpressionBinder;

impl ExpressionBinder {
    pub fn new() -> Self {
        Self
    }

    /// Bind a parser AST expression to an expression tree
    pub fn bind_expression(&self, expr: &ast::Expression) -> PrismDBResult<ExpressionRef> {
        match expr {
            ast::Expression::Literal(literal) => Ok(self.bind_literal(literal)),
            ast::Expression::ColumnReference { table, column } => {
                Ok(self.bind_column_ref(table.as_deref(), column))
            }
            ast::Expression::FunctionCall { name, arguments } => {
                self.bind_function_call(name, arguments)
            }
            ast::Expression::Binary {
                left,
                operator,
                right,
            } => self.bind_binary_op(left, *operator, right),
            ast::Expression::Unary {
                operator,
                expression,
            } => self.bind_unary_op(*operator, expression),
        }
    }

    /// Bind a literal value
    fn bind_literal(&self, literal: &ast::LiteralValue) -> ExpressionRef {
        let value = match literal {
            ast::LiteralValue::Null => Value::Null,
            ast::LiteralValue::Boolean(b) => Value::Boolean(*b),
            ast::LiteralValue::Integer(i) => narrowest_integer(*i),
            ast::LiteralValue::Float(f) => Value::Double(*f),
            ast::LiteralValue::String(s) => Value::Varchar(s.clone()),
        };
        Arc::new(LiteralExpression::new(value))
    }

    fn bind_column_ref(&self, table: Option<&str>, column: &str) -> ExpressionRef {
        match table {
            Some(table) => Arc::new(UnresolvedColumn::qualified(table, column)),
            None => Arc::new(UnresolvedColumn::new(column)),
        }
    }

    fn bind_function_call(
        &self,
        name: &str,
        arguments: &[ast::Expression],
    ) -> PrismDBResult<ExpressionRef> {
        let bound = arguments
            .iter()
            .map(|arg| self.bind_expression(arg))
            .collect::<PrismDBResult<Vec<_>>>()?;
        Ok(Arc::new(UnresolvedFunction::new(name, bound)))
    }

    /// Bind a binary operation
    fn bind_binary_op(
        &self,
        left: &ast::Expression,
        op: ast::BinaryOperator,
        right: &ast::Expression,
    ) -> PrismDBResult<ExpressionRef> {
        let left = self.bind_expression(left)?;
        let right = self.bind_expression(right)?;

        let operator = match op {
            ast::BinaryOperator::Add => ArithmeticOperator::Add,
            ast::BinaryOperator::Subtract => ArithmeticOperator::Subtract,
            ast::BinaryOperator::Multiply => ArithmeticOperator::Multiply,
            ast::BinaryOperator::Divide => ArithmeticOperator::Divide,
            ast::BinaryOperator::IntegerDivide => ArithmeticOperator::IntegerDivide,
            ast::BinaryOperator::Modulo => ArithmeticOperator::Modulo,
        };

        Ok(Arc::new(ArithmeticExpression::new(left, right, operator)))
    }

    /// Bind a unary operation. A sign in front of a numeric literal is
    /// folded into the literal so `-5` stays a single leaf.
    fn bind_unary_op(
        &self,
        op: ast::UnaryOperator,
        expression: &ast::Expression,
    ) -> PrismDBResult<ExpressionRef> {
        match (op, expression) {
            (ast::UnaryOperator::Plus, _) => self.bind_expression(expression),
            (ast::UnaryOperator::Minus, ast::Expression::Literal(ast::LiteralValue::Integer(i))) => {
                let value = match i.checked_neg() {
                    Some(negated) => narrowest_integer(negated),
                    None => Value::Double(-(*i as f64)),
                };
                Ok(Arc::new(LiteralExpression::new(value)))
            }
            (ast::UnaryOperator::Minus, ast::Expression::Literal(ast::LiteralValue::Float(f))) => {
                Ok(Arc::new(LiteralExpression::new(Value::Double(-f))))
            }
            (ast::UnaryOperator::Minus, _) => {
                let child = self.bind_expression(expression)?;
                Ok(Arc::new(NegateExpression::new(child)))
            }
        }
    }
}

/// The smallest integer type that holds `value`
fn narrowest_integer(value: i64) -> Value {
    if let Ok(v) = i8::try_from(value) {
        Value::TinyInt(v)
    } else if let Ok(v) = i16::try_from(value) {
        Value::SmallInt(v)
    } else if let Ok(v) = i32::try_from(value) {
        Value::Integer(v)
    } else {
        Value::BigInt(value)
    }
}

/// Bind a parsed default expression
pub fn bind_default_expression(expr: &ast::Expression) -> PrismDBResult<ExpressionRef> {
    ExpressionBinder::new().bind_expression(expr)
}

/// Parse default text into a raw tree that may still hold unresolved nodes
pub fn parse_default_string(_ctx: &ExecutionContext, text: &str) -> PrismDBResult<ExpressionRef> {
    let ast = SqlParser::new().parse_expression(text)?;
    let bound = bind_default_expression(&ast)?;
    trace!(text, bound = %bound, "bound default expression");
    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::PrismDBError;
    use crate::types::LogicalType;

    fn bind(text: &str) -> PrismDBResult<ExpressionRef> {
        parse_default_string(&ExecutionContext::empty(), text)
    }

    #[test]
    fn test_integer_literals_take_narrowest_type() -> PrismDBResult<()> {
        assert_eq!(bind("2")?.return_type(), LogicalType::TinyInt);
        assert_eq!(bind("300")?.return_type(), LogicalType::SmallInt);
        assert_eq!(bind("70000")?.return_type(), LogicalType::Integer);
        assert_eq!(bind("5000000000")?.return_type(), LogicalType::BigInt);
        assert_eq!(bind("2.5")?.return_type(), LogicalType::Double);
        Ok(())
    }

    #[test]
    fn test_negative_literal_is_folded() -> PrismDBResult<()> {
        let negative = bind("-5")?;
        assert!(negative.children().is_empty());
        assert_eq!(negative.to_string(), "-5");
        assert_eq!(bind("-128")?.return_type(), LogicalType::TinyInt);
        assert_eq!(bind("+7")?.to_string(), "7");

        let negated = bind("-(1 + 2)")?;
        assert_eq!(negated.children().len(), 1);
        let ctx = ExecutionContext::empty();
        assert_eq!(negated.evaluate(&ctx, &[])?, Value::BigInt(-3));
        Ok(())
    }

    #[test]
    fn test_functions_and_columns_stay_unresolved() -> PrismDBResult<()> {
        let tree = bind("(RAND() + a)")?;
        assert!(!tree.resolved());
        assert_eq!(tree.to_string(), "RAND() + a");

        let children = tree.children();
        assert!(children[0].as_unresolved().is_some());
        assert!(children[1].as_unresolved().is_some());
        Ok(())
    }

    #[test]
    fn test_parse_error_propagates() {
        assert!(matches!(bind("1 +"), Err(PrismDBError::Parse(_))));
    }
}
