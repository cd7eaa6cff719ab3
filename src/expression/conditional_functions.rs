//! Conditional Functions
//!
//! `COALESCE`, `IF`, `IFNULL` and `NULLIF` evaluate their arguments lazily,
//! so they get their own node instead of a [`ScalarFunction`](super::ScalarFunction).

use crate::catalog::function::FunctionDescriptor;
use crate::common::error::PrismDBResult;
use crate::execution::ExecutionContext;
use crate::expression::function::check_argument_count;
use crate::expression::utils::join_display;
use crate::expression::{check_children_count, Expression, ExpressionRef};
use crate::types::{LogicalType, TypeUtils, Value};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalKind {
    Greatest,
    Least,
    Coalesce,
    If,
    IfNull,
    NullIf,
}

impl ConditionalKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConditionalKind::Greatest => "GREATEST",
            ConditionalKind::Least => "LEAST",
            ConditionalKind::Coalesce => "COALESCE",
            ConditionalKind::If => "IF",
            ConditionalKind::IfNull => "IFNULL",
            ConditionalKind::NullIf => "NULLIF",
        }
    }

    /// Accepted argument counts as `(min, max)`
    fn arity(&self) -> (usize, Option<usize>) {
        match self {
            ConditionalKind::Greatest | ConditionalKind::Least | ConditionalKind::Coalesce => {
                (1, None)
            }
            ConditionalKind::If => (3, Some(3)),
            ConditionalKind::IfNull | ConditionalKind::NullIf => (2, Some(2)),
        }
    }
}

/// A conditional function call
#[derive(Debug, Clone)]
pub struct ConditionalExpression {
    kind: ConditionalKind,
    arguments: Vec<ExpressionRef>,
}

impl ConditionalExpression {
    pub fn new(kind: ConditionalKind, arguments: Vec<ExpressionRef>) -> PrismDBResult<Self> {
        let (min, max) = kind.arity();
        check_argument_count(kind.name(), arguments.len(), min, max)?;
        Ok(Self { kind, arguments })
    }

    pub fn kind(&self) -> ConditionalKind {
        self.kind
    }

    fn build(kind: ConditionalKind, arguments: Vec<ExpressionRef>) -> PrismDBResult<ExpressionRef> {
        Ok(Arc::new(Self::new(kind, arguments)?))
    }

    /// Common type of the given arguments; VARCHAR when they have none
    fn common_type<'a>(arguments: impl Iterator<Item = &'a ExpressionRef>) -> LogicalType {
        let mut result = LogicalType::Null;
        for arg in arguments {
            result = match TypeUtils::get_max_type(&result, &arg.return_type()) {
                Ok(t) => t,
                Err(_) => return LogicalType::Varchar,
            };
        }
        result
    }

    fn branch(&self, index: usize) -> PrismDBResult<&ExpressionRef> {
        self.arguments
            .get(index)
            .ok_or_else(|| crate::internal_err!("{} is missing argument {}", self.kind.name(), index))
    }

    fn coerce(&self, value: Value) -> PrismDBResult<Value> {
        match self.return_type() {
            LogicalType::Null | LogicalType::Invalid => Ok(value),
            target => value.cast_to(&target),
        }
    }

    fn extreme(
        &self,
        ctx: &ExecutionContext,
        row: &[Value],
        keep: Ordering,
    ) -> PrismDBResult<Value> {
        let mut best: Option<Value> = None;
        for arg in &self.arguments {
            let value = arg.evaluate(ctx, row)?;
            if value.is_null() {
                return Ok(Value::Null);
            }
            best = match best {
                Some(current) if value.compare(&current)? != keep => Some(current),
                _ => Some(value),
            };
        }
        match best {
            Some(value) => self.coerce(value),
            None => Ok(Value::Null),
        }
    }
}

impl fmt::Display for ConditionalExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind.name(), join_display(&self.arguments))
    }
}

impl Expression for ConditionalExpression {
    fn return_type(&self) -> LogicalType {
        match self.kind {
            ConditionalKind::Greatest
            | ConditionalKind::Least
            | ConditionalKind::Coalesce
            | ConditionalKind::IfNull => Self::common_type(self.arguments.iter()),
            ConditionalKind::If => Self::common_type(self.arguments.iter().skip(1)),
            ConditionalKind::NullIf => self
                .arguments
                .first()
                .map_or(LogicalType::Null, |arg| arg.return_type()),
        }
    }

    fn is_nullable(&self) -> bool {
        match self.kind {
            ConditionalKind::Greatest | ConditionalKind::Least => {
                self.arguments.iter().any(|arg| arg.is_nullable())
            }
            ConditionalKind::Coalesce | ConditionalKind::IfNull => {
                self.arguments.iter().all(|arg| arg.is_nullable())
            }
            ConditionalKind::If => self.arguments.iter().skip(1).any(|arg| arg.is_nullable()),
            ConditionalKind::NullIf => true,
        }
    }

    fn children(&self) -> Vec<ExpressionRef> {
        self.arguments.clone()
    }

    fn with_children(&self, children: Vec<ExpressionRef>) -> PrismDBResult<ExpressionRef> {
        check_children_count(self, children.len(), self.arguments.len())?;
        Self::build(self.kind, children)
    }

    fn evaluate(&self, ctx: &ExecutionContext, row: &[Value]) -> PrismDBResult<Value> {
        match self.kind {
            ConditionalKind::Greatest => self.extreme(ctx, row, Ordering::Greater),
            ConditionalKind::Least => self.extreme(ctx, row, Ordering::Less),
            ConditionalKind::Coalesce | ConditionalKind::IfNull => {
                for arg in &self.arguments {
                    let value = arg.evaluate(ctx, row)?;
                    if !value.is_null() {
                        return self.coerce(value);
                    }
                }
                Ok(Value::Null)
            }
            ConditionalKind::If => {
                let condition = self.branch(0)?.evaluate(ctx, row)?;
                let truthy = !condition.is_null() && condition.try_as_boolean()?;
                let value = self.branch(if truthy { 1 } else { 2 })?.evaluate(ctx, row)?;
                self.coerce(value)
            }
            ConditionalKind::NullIf => {
                let first = self.branch(0)?.evaluate(ctx, row)?;
                let second = self.branch(1)?.evaluate(ctx, row)?;
                if !first.is_null()
                    && !second.is_null()
                    && first.compare(&second)? == Ordering::Equal
                {
                    return Ok(Value::Null);
                }
                Ok(first)
            }
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Conditional builtins
pub fn conditional_functions() -> Vec<FunctionDescriptor> {
    use ConditionalKind::*;

    vec![
        FunctionDescriptor::variadic("GREATEST", |args| {
            ConditionalExpression::build(Greatest, args)
        }),
        FunctionDescriptor::variadic("LEAST", |args| ConditionalExpression::build(Least, args)),
        FunctionDescriptor::variadic("COALESCE", |args| {
            ConditionalExpression::build(Coalesce, args)
        }),
        FunctionDescriptor::ternary("IF", |c, a, b| {
            ConditionalExpression::build(If, vec![c, a, b])
        }),
        FunctionDescriptor::binary("IFNULL", |a, b| {
            ConditionalExpression::build(IfNull, vec![a, b])
        }),
        FunctionDescriptor::binary("NULLIF", |a, b| {
            ConditionalExpression::build(NullIf, vec![a, b])
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::PrismDBError;
    use crate::expression::LiteralExpression;

    fn lit(value: Value) -> ExpressionRef {
        Arc::new(LiteralExpression::new(value))
    }

    fn eval(kind: ConditionalKind, args: Vec<ExpressionRef>) -> PrismDBResult<Value> {
        ConditionalExpression::new(kind, args)?.evaluate(&ExecutionContext::empty(), &[])
    }

    #[test]
    fn test_greatest_and_least() -> PrismDBResult<()> {
        let args = || vec![lit(Value::TinyInt(3)), lit(Value::Double(7.5)), lit(Value::Integer(-2))];
        assert_eq!(eval(ConditionalKind::Greatest, args())?, Value::Double(7.5));
        assert_eq!(eval(ConditionalKind::Least, args())?, Value::Double(-2.0));
        assert_eq!(
            eval(ConditionalKind::Greatest, vec![lit(Value::TinyInt(1)), lit(Value::Null)])?,
            Value::Null
        );

        let node = ConditionalExpression::new(ConditionalKind::Greatest, args())?;
        assert_eq!(node.return_type(), LogicalType::Double);
        assert_eq!(node.to_string(), "GREATEST(3, 7.5, -2)");
        Ok(())
    }

    #[test]
    fn test_coalesce_and_ifnull() -> PrismDBResult<()> {
        assert_eq!(
            eval(
                ConditionalKind::Coalesce,
                vec![lit(Value::Null), lit(Value::varchar("x")), lit(Value::varchar("y"))]
            )?,
            Value::varchar("x")
        );
        assert_eq!(
            eval(ConditionalKind::IfNull, vec![lit(Value::Null), lit(Value::Null)])?,
            Value::Null
        );
        let node = ConditionalExpression::new(
            ConditionalKind::Coalesce,
            vec![lit(Value::Null), lit(Value::TinyInt(1))],
        )?;
        assert!(!node.is_nullable());
        Ok(())
    }

    #[test]
    fn test_if_and_nullif() -> PrismDBResult<()> {
        let branches = |cond: Value| vec![lit(cond), lit(Value::varchar("yes")), lit(Value::varchar("no"))];
        assert_eq!(eval(ConditionalKind::If, branches(Value::Integer(1)))?, Value::varchar("yes"));
        assert_eq!(eval(ConditionalKind::If, branches(Value::Null))?, Value::varchar("no"));
        assert_eq!(
            eval(ConditionalKind::NullIf, vec![lit(Value::Integer(1)), lit(Value::TinyInt(1))])?,
            Value::Null
        );
        assert_eq!(
            eval(ConditionalKind::NullIf, vec![lit(Value::Integer(1)), lit(Value::Integer(2))])?,
            Value::Integer(1)
        );
        Ok(())
    }

    #[test]
    fn test_arity_checks() {
        assert!(matches!(
            ConditionalExpression::new(ConditionalKind::Greatest, vec![]),
            Err(PrismDBError::InvalidArgumentNumber { expected: 1, given: 0, .. })
        ));
        assert!(ConditionalExpression::new(ConditionalKind::If, vec![lit(Value::Null)]).is_err());
    }
}
