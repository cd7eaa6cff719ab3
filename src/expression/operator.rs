//! Arithmetic operator definitions and evaluation

use crate::common::error::{PrismDBError, PrismDBResult};
use crate::types::{LogicalType, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary arithmetic operators allowed in expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// `DIV`: integer division
    IntegerDivide,
    Modulo,
}

/// Operator information and metadata
#[derive(Debug, Clone)]
pub struct OperatorInfo {
    pub operator: ArithmeticOperator,
    pub name: &'static str,
    pub symbol: &'static str,
    pub is_commutative: bool,
    pub precedence: u8,
}

impl OperatorInfo {
    const fn new(
        operator: ArithmeticOperator,
        name: &'static str,
        symbol: &'static str,
        is_commutative: bool,
        precedence: u8,
    ) -> Self {
        Self {
            operator,
            name,
            symbol,
            is_commutative,
            precedence,
        }
    }
}

/// Get operator information for a given operator
pub fn get_operator_info(operator: ArithmeticOperator) -> OperatorInfo {
    use ArithmeticOperator::*;
    match operator {
        Add => OperatorInfo::new(Add, "add", "+", true, 10),
        Subtract => OperatorInfo::new(Subtract, "subtract", "-", false, 10),
        Multiply => OperatorInfo::new(Multiply, "multiply", "*", true, 20),
        Divide => OperatorInfo::new(Divide, "divide", "/", false, 20),
        IntegerDivide => OperatorInfo::new(IntegerDivide, "integer_divide", "DIV", false, 20),
        Modulo => OperatorInfo::new(Modulo, "modulo", "%", false, 20),
    }
}

impl ArithmeticOperator {
    /// Result type of applying this operator to operands of the given types
    pub fn result_type(&self, left: LogicalType, right: LogicalType) -> LogicalType {
        match self {
            ArithmeticOperator::Divide => LogicalType::Double,
            ArithmeticOperator::IntegerDivide => LogicalType::BigInt,
            _ if left.is_integral() && right.is_integral() => LogicalType::BigInt,
            _ if left == LogicalType::Null && right.is_integral() => LogicalType::BigInt,
            _ if right == LogicalType::Null && left.is_integral() => LogicalType::BigInt,
            _ => LogicalType::Double,
        }
    }
}

impl fmt::Display for ArithmeticOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", get_operator_info(*self).symbol)
    }
}

enum Operands {
    Integers(i64, i64),
    Floats(f64, f64),
}

fn numeric_operands(left: &Value, right: &Value) -> PrismDBResult<Operands> {
    let integral = |v: &Value| v.get_type().is_integral() || matches!(v, Value::Boolean(_));
    if integral(left) && integral(right) {
        return Ok(Operands::Integers(left.try_as_i64()?, right.try_as_i64()?));
    }
    match (left.try_as_f64(), right.try_as_f64()) {
        (Ok(l), Ok(r)) => Ok(Operands::Floats(l, r)),
        _ => Err(PrismDBError::Type(format!(
            "Cannot apply arithmetic to {} and {}",
            left.get_type(),
            right.get_type()
        ))),
    }
}

fn overflow(operator: ArithmeticOperator, left: i64, right: i64) -> PrismDBError {
    PrismDBError::Execution(format!(
        "BIGINT value is out of range in '{} {} {}'",
        left, operator, right
    ))
}

/// Evaluate a binary arithmetic operator on two values.
///
/// NULL operands yield NULL, as does division or modulo by zero.
pub fn evaluate_arithmetic(
    operator: ArithmeticOperator,
    left: &Value,
    right: &Value,
) -> PrismDBResult<Value> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }

    match (operator, numeric_operands(left, right)?) {
        (ArithmeticOperator::Add, Operands::Integers(l, r)) => l
            .checked_add(r)
            .map(Value::BigInt)
            .ok_or_else(|| overflow(operator, l, r)),
        (ArithmeticOperator::Subtract, Operands::Integers(l, r)) => l
            .checked_sub(r)
            .map(Value::BigInt)
            .ok_or_else(|| overflow(operator, l, r)),
        (ArithmeticOperator::Multiply, Operands::Integers(l, r)) => l
            .checked_mul(r)
            .map(Value::BigInt)
            .ok_or_else(|| overflow(operator, l, r)),
        (ArithmeticOperator::Modulo, Operands::Integers(l, r)) => {
            if r == 0 {
                return Ok(Value::Null);
            }
            Ok(Value::BigInt(l.wrapping_rem(r)))
        }
        (ArithmeticOperator::IntegerDivide, Operands::Integers(l, r)) => {
            if r == 0 {
                return Ok(Value::Null);
            }
            l.checked_div(r)
                .map(Value::BigInt)
                .ok_or_else(|| overflow(operator, l, r))
        }
        (ArithmeticOperator::Divide, Operands::Integers(l, r)) => {
            if r == 0 {
                return Ok(Value::Null);
            }
            Ok(Value::Double(l as f64 / r as f64))
        }
        (ArithmeticOperator::Add, Operands::Floats(l, r)) => Ok(Value::Double(l + r)),
        (ArithmeticOperator::Subtract, Operands::Floats(l, r)) => Ok(Value::Double(l - r)),
        (ArithmeticOperator::Multiply, Operands::Floats(l, r)) => Ok(Value::Double(l * r)),
        (ArithmeticOperator::Divide, Operands::Floats(l, r)) => {
            if r == 0.0 {
                return Ok(Value::Null);
            }
            Ok(Value::Double(l / r))
        }
        (ArithmeticOperator::Modulo, Operands::Floats(l, r)) => {
            if r == 0.0 {
                return Ok(Value::Null);
            }
            Ok(Value::Double(l % r))
        }
        (ArithmeticOperator::IntegerDivide, Operands::Floats(l, r)) => {
            if r == 0.0 {
                return Ok(Value::Null);
            }
            Ok(Value::BigInt((l / r).trunc() as i64))
        }
    }
}

/// Evaluate unary minus
pub fn evaluate_negate(operand: &Value) -> PrismDBResult<Value> {
    match operand {
        Value::Null => Ok(Value::Null),
        Value::Float(v) => Ok(Value::Float(-v)),
        Value::Double(v) => Ok(Value::Double(-v)),
        v if v.get_type().is_integral() || matches!(v, Value::Boolean(_)) => {
            let n = v.try_as_i64()?;
            n.checked_neg().map(Value::BigInt).ok_or_else(|| {
                PrismDBError::Execution(format!("BIGINT value is out of range in '-{}'", n))
            })
        }
        Value::Varchar(_) => Ok(Value::Double(-operand.try_as_f64()?)),
        _ => Err(PrismDBError::Type(format!(
            "Cannot negate {}",
            operand.get_type()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_operators() -> PrismDBResult<()> {
        let left = Value::integer(10);
        let right = Value::tinyint(4);

        assert_eq!(
            evaluate_arithmetic(ArithmeticOperator::Add, &left, &right)?,
            Value::bigint(14)
        );
        assert_eq!(
            evaluate_arithmetic(ArithmeticOperator::Subtract, &left, &right)?,
            Value::bigint(6)
        );
        assert_eq!(
            evaluate_arithmetic(ArithmeticOperator::Multiply, &left, &right)?,
            Value::bigint(40)
        );
        assert_eq!(
            evaluate_arithmetic(ArithmeticOperator::Divide, &left, &right)?,
            Value::double(2.5)
        );
        assert_eq!(
            evaluate_arithmetic(ArithmeticOperator::IntegerDivide, &left, &right)?,
            Value::bigint(2)
        );
        assert_eq!(
            evaluate_arithmetic(ArithmeticOperator::Modulo, &left, &right)?,
            Value::bigint(2)
        );
        Ok(())
    }

    #[test]
    fn test_mixed_and_null_operands() -> PrismDBResult<()> {
        assert_eq!(
            evaluate_arithmetic(ArithmeticOperator::Add, &Value::double(0.5), &Value::integer(5))?,
            Value::double(5.5)
        );
        assert_eq!(
            evaluate_arithmetic(ArithmeticOperator::Add, &Value::Null, &Value::integer(5))?,
            Value::Null
        );
        assert_eq!(
            evaluate_arithmetic(ArithmeticOperator::Divide, &Value::integer(1), &Value::integer(0))?,
            Value::Null
        );
        assert!(evaluate_arithmetic(
            ArithmeticOperator::Add,
            &Value::bigint(i64::MAX),
            &Value::integer(1)
        )
        .is_err());
        Ok(())
    }

    #[test]
    fn test_negate() -> PrismDBResult<()> {
        assert_eq!(evaluate_negate(&Value::tinyint(3))?, Value::bigint(-3));
        assert_eq!(evaluate_negate(&Value::double(1.5))?, Value::double(-1.5));
        assert_eq!(evaluate_negate(&Value::Null)?, Value::Null);
        Ok(())
    }

    #[test]
    fn test_operator_info() {
        let add_info = get_operator_info(ArithmeticOperator::Add);
        assert_eq!(add_info.symbol, "+");
        assert!(add_info.is_commutative);
        assert_eq!(add_info.precedence, 10);

        let div_info = get_operator_info(ArithmeticOperator::IntegerDivide);
        assert_eq!(div_info.symbol, "DIV");
        assert!(!div_info.is_commutative);
        assert_eq!(ArithmeticOperator::Modulo.to_string(), "%");
    }

    #[test]
    fn test_result_types() {
        assert_eq!(
            ArithmeticOperator::Add.result_type(LogicalType::TinyInt, LogicalType::Integer),
            LogicalType::BigInt
        );
        assert_eq!(
            ArithmeticOperator::Add.result_type(LogicalType::Double, LogicalType::Integer),
            LogicalType::Double
        );
        assert_eq!(
            ArithmeticOperator::Divide.result_type(LogicalType::Integer, LogicalType::Integer),
            LogicalType::Double
        );
    }
}
