//! Core expression nodes: literals and arithmetic

use crate::common::error::PrismDBResult;
use crate::execution::ExecutionContext;
use crate::expression::operator::{evaluate_arithmetic, evaluate_negate, ArithmeticOperator};
use crate::expression::{check_children_count, Expression, ExpressionRef};
use crate::types::{LogicalType, Value};
use std::fmt;
use std::sync::Arc;

/// Constant value expression
#[derive(Debug, Clone)]
pub struct LiteralExpression {
    value: Value,
}

impl LiteralExpression {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Quote a string as a SQL literal that the tokenizer reads back unchanged
pub fn quote_string_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\'' => quoted.push_str("''"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

impl fmt::Display for LiteralExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(true) => write!(f, "TRUE"),
            Value::Boolean(false) => write!(f, "FALSE"),
            // Debug keeps a fractional part so "2.0" does not read back as an integer
            Value::Double(v) => write!(f, "{:?}", v),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Varchar(s) => write!(f, "{}", quote_string_literal(s)),
            v @ (Value::Date(_) | Value::Time(_) | Value::Timestamp(_)) => {
                write!(f, "{}", quote_string_literal(&v.to_string()))
            }
            other => write!(f, "{}", other),
        }
    }
}

impl Expression for LiteralExpression {
    fn return_type(&self) -> LogicalType {
        self.value.get_type()
    }

    fn is_nullable(&self) -> bool {
        self.value.is_null()
    }

    fn resolved(&self) -> bool {
        true
    }

    fn is_deterministic(&self) -> bool {
        true
    }

    fn children(&self) -> Vec<ExpressionRef> {
        vec![]
    }

    fn with_children(&self, children: Vec<ExpressionRef>) -> PrismDBResult<ExpressionRef> {
        check_children_count(self, children.len(), 0)?;
        Ok(Arc::new(self.clone()))
    }

    fn evaluate(&self, _ctx: &ExecutionContext, _row: &[Value]) -> PrismDBResult<Value> {
        Ok(self.value.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Binary arithmetic expression
///
/// The SQL text is `left op right` with no grouping, so `(2+2)/2` prints
/// as `2 + 2 / 2`.
#[derive(Debug, Clone)]
pub struct ArithmeticExpression {
    left: ExpressionRef,
    right: ExpressionRef,
    operator: ArithmeticOperator,
}

impl ArithmeticExpression {
    pub fn new(left: ExpressionRef, right: ExpressionRef, operator: ArithmeticOperator) -> Self {
        Self {
            left,
            right,
            operator,
        }
    }

    pub fn left(&self) -> &ExpressionRef {
        &self.left
    }

    pub fn right(&self) -> &ExpressionRef {
        &self.right
    }

    pub fn operator(&self) -> ArithmeticOperator {
        self.operator
    }
}

impl fmt::Display for ArithmeticExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator, self.right)
    }
}

impl Expression for ArithmeticExpression {
    fn return_type(&self) -> LogicalType {
        self.operator
            .result_type(self.left.return_type(), self.right.return_type())
    }

    fn is_nullable(&self) -> bool {
        match self.operator {
            // division by zero yields NULL
            ArithmeticOperator::Divide
            | ArithmeticOperator::IntegerDivide
            | ArithmeticOperator::Modulo => true,
            _ => self.left.is_nullable() || self.right.is_nullable(),
        }
    }

    fn children(&self) -> Vec<ExpressionRef> {
        vec![Arc::clone(&self.left), Arc::clone(&self.right)]
    }

    fn with_children(&self, children: Vec<ExpressionRef>) -> PrismDBResult<ExpressionRef> {
        check_children_count(self, children.len(), 2)?;
        let mut children = children.into_iter();
        match (children.next(), children.next()) {
            (Some(left), Some(right)) => Ok(Arc::new(Self::new(left, right, self.operator))),
            _ => Err(crate::internal_err!("arithmetic rebuilt without operands")),
        }
    }

    fn evaluate(&self, ctx: &ExecutionContext, row: &[Value]) -> PrismDBResult<Value> {
        let left = self.left.evaluate(ctx, row)?;
        let right = self.right.evaluate(ctx, row)?;
        evaluate_arithmetic(self.operator, &left, &right)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Unary minus over a non-literal operand
#[derive(Debug, Clone)]
pub struct NegateExpression {
    child: ExpressionRef,
}

impl NegateExpression {
    pub fn new(child: ExpressionRef) -> Self {
        Self { child }
    }
}

impl fmt::Display for NegateExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-{}", self.child)
    }
}

impl Expression for NegateExpression {
    fn return_type(&self) -> LogicalType {
        match self.child.return_type() {
            t if t.is_integral() => LogicalType::BigInt,
            LogicalType::Float => LogicalType::Float,
            _ => LogicalType::Double,
        }
    }

    fn is_nullable(&self) -> bool {
        self.child.is_nullable()
    }

    fn children(&self) -> Vec<ExpressionRef> {
        vec![Arc::clone(&self.child)]
    }

    fn with_children(&self, children: Vec<ExpressionRef>) -> PrismDBResult<ExpressionRef> {
        check_children_count(self, children.len(), 1)?;
        match children.into_iter().next() {
            Some(child) => Ok(Arc::new(Self::new(child))),
            None => Err(crate::internal_err!("negation rebuilt without operand")),
        }
    }

    fn evaluate(&self, ctx: &ExecutionContext, row: &[Value]) -> PrismDBResult<Value> {
        evaluate_negate(&self.child.evaluate(ctx, row)?)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(value: Value) -> ExpressionRef {
        Arc::new(LiteralExpression::new(value))
    }

    #[test]
    fn test_literal_expression() -> PrismDBResult<()> {
        let ctx = ExecutionContext::empty();
        let expr = LiteralExpression::new(Value::tinyint(2));
        assert_eq!(expr.evaluate(&ctx, &[])?, Value::tinyint(2));
        assert_eq!(expr.return_type(), LogicalType::TinyInt);
        assert!(!expr.is_nullable());
        assert!(expr.resolved());
        assert_eq!(expr.to_string(), "2");
        Ok(())
    }

    #[test]
    fn test_literal_sql_text() {
        assert_eq!(LiteralExpression::new(Value::double(2.0)).to_string(), "2.0");
        assert_eq!(LiteralExpression::new(Value::varchar("it's")).to_string(), "'it''s'");
        assert_eq!(LiteralExpression::new(Value::Null).to_string(), "NULL");
        assert_eq!(LiteralExpression::new(Value::boolean(true)).to_string(), "TRUE");
    }

    #[test]
    fn test_arithmetic_expression() -> PrismDBResult<()> {
        let ctx = ExecutionContext::empty();
        let inner: ExpressionRef = Arc::new(ArithmeticExpression::new(
            lit(Value::tinyint(2)),
            lit(Value::tinyint(2)),
            ArithmeticOperator::Add,
        ));
        let expr = ArithmeticExpression::new(inner, lit(Value::tinyint(2)), ArithmeticOperator::Divide);

        assert_eq!(expr.evaluate(&ctx, &[])?, Value::double(2.0));
        assert_eq!(expr.return_type(), LogicalType::Double);
        assert!(expr.is_nullable());
        // grouping is not preserved in the SQL text
        assert_eq!(expr.to_string(), "2 + 2 / 2");
        Ok(())
    }

    #[test]
    fn test_negate_expression() -> PrismDBResult<()> {
        let ctx = ExecutionContext::empty();
        let expr = NegateExpression::new(lit(Value::integer(4)));
        assert_eq!(expr.evaluate(&ctx, &[])?, Value::bigint(-4));
        assert_eq!(expr.to_string(), "-4");
        assert!(expr.with_children(vec![]).is_err());
        Ok(())
    }
}
