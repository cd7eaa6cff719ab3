//! Scalar function expressions
//!
//! Most builtin functions are a pure computation over already evaluated
//! arguments. Those are described by a static [`ScalarFunction`] and share
//! one expression node, [`ScalarFunctionExpression`]. Functions that need
//! lazy argument evaluation, an optional seed or shared state (conditionals,
//! `RAND`, user locks) have dedicated nodes in their own modules.

use crate::catalog::function::{FunctionDescriptor, FunctionRegistry};
use crate::common::error::{PrismDBError, PrismDBResult};
use crate::execution::{ExecutionContext, LockSubsystem};
use crate::expression::utils::{evaluate_all, join_display};
use crate::expression::{
    check_children_count, conditional_functions, datetime_functions, locking_functions,
    math_functions, string_functions, system_functions, Expression, ExpressionRef,
};
use crate::types::{LogicalType, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Function classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionClassification {
    // Mathematical functions
    Mathematical,
    // String functions
    String,
    // Date/time functions
    DateTime,
    // Conditional functions
    Conditional,
    // System functions
    System,
    // User-level lock functions
    Locking,
}

/// How a function derives its return type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    Fixed(LogicalType),
    /// Same type as the first argument
    FirstArgument,
    /// BIGINT for an integral first argument, DOUBLE otherwise
    IntegralOrDouble,
}

/// Computes a function result from evaluated arguments
pub type ScalarFunctionImpl = fn(&ExecutionContext, &[Value]) -> PrismDBResult<Value>;

/// Validates unevaluated arguments when a call is built
pub type ArgumentCheck = fn(&str, &[ExpressionRef]) -> PrismDBResult<()>;

/// Static description of a scalar function
#[derive(Debug)]
pub struct ScalarFunction {
    pub name: &'static str,
    pub classification: FunctionClassification,
    pub min_args: usize,
    /// `None` means no upper bound
    pub max_args: Option<usize>,
    pub return_type: ReturnType,
    /// A NULL argument yields NULL without calling `function`
    pub propagates_null: bool,
    /// May yield NULL even when every argument is non-NULL
    pub may_return_null: bool,
    pub is_deterministic: bool,
    /// Runs once per built call, before any evaluation
    pub check_arguments: Option<ArgumentCheck>,
    pub function: ScalarFunctionImpl,
}

impl ScalarFunction {
    /// Descriptor registering this function under its own name
    pub fn descriptor(&'static self) -> FunctionDescriptor {
        self.descriptor_as(self.name)
    }

    /// Descriptor registering this function under `name`, which is also
    /// the name the built node prints.
    pub fn descriptor_as(&'static self, name: &'static str) -> FunctionDescriptor {
        match (self.min_args, self.max_args) {
            (0, Some(0)) => FunctionDescriptor::nullary(name, move || build(self, name, vec![])),
            (1, Some(1)) => FunctionDescriptor::unary(name, move |a| build(self, name, vec![a])),
            (2, Some(2)) => {
                FunctionDescriptor::binary(name, move |a, b| build(self, name, vec![a, b]))
            }
            (3, Some(3)) => FunctionDescriptor::ternary(name, move |a, b, c| {
                build(self, name, vec![a, b, c])
            }),
            _ => FunctionDescriptor::variadic(name, move |args| build(self, name, args)),
        }
    }
}

fn build(
    function: &'static ScalarFunction,
    name: &'static str,
    arguments: Vec<ExpressionRef>,
) -> PrismDBResult<ExpressionRef> {
    Ok(Arc::new(ScalarFunctionExpression::new(
        function, name, arguments,
    )?))
}

/// Fail with `InvalidArgumentNumber` unless `min <= given <= max`
pub fn check_argument_count(
    name: &str,
    given: usize,
    min: usize,
    max: Option<usize>,
) -> PrismDBResult<()> {
    let expected = if given < min {
        min
    } else {
        match max {
            Some(max) if given > max => max,
            _ => return Ok(()),
        }
    };
    Err(PrismDBError::InvalidArgumentNumber {
        name: name.to_string(),
        expected,
        given,
    })
}

/// Fetch argument `index`; arity has already been checked at build time
pub(crate) fn argument(args: &[Value], index: usize) -> PrismDBResult<&Value> {
    args.get(index)
        .ok_or_else(|| crate::internal_err!("missing argument {}", index))
}

/// A call to a [`ScalarFunction`]
#[derive(Debug, Clone)]
pub struct ScalarFunctionExpression {
    function: &'static ScalarFunction,
    name: &'static str,
    arguments: Vec<ExpressionRef>,
}

impl ScalarFunctionExpression {
    pub fn new(
        function: &'static ScalarFunction,
        name: &'static str,
        arguments: Vec<ExpressionRef>,
    ) -> PrismDBResult<Self> {
        check_argument_count(name, arguments.len(), function.min_args, function.max_args)?;
        if let Some(check) = function.check_arguments {
            check(name, &arguments)?;
        }
        Ok(Self {
            function,
            name,
            arguments,
        })
    }

    pub fn function(&self) -> &'static ScalarFunction {
        self.function
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn arguments(&self) -> &[ExpressionRef] {
        &self.arguments
    }
}

impl fmt::Display for ScalarFunctionExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            self.name.to_uppercase(),
            join_display(&self.arguments)
        )
    }
}

impl Expression for ScalarFunctionExpression {
    fn return_type(&self) -> LogicalType {
        let first = self.arguments.first().map(|arg| arg.return_type());
        match self.function.return_type {
            ReturnType::Fixed(t) => t,
            ReturnType::FirstArgument => first.unwrap_or(LogicalType::Null),
            ReturnType::IntegralOrDouble => match first {
                Some(t) if t.is_integral() => LogicalType::BigInt,
                _ => LogicalType::Double,
            },
        }
    }

    fn is_nullable(&self) -> bool {
        self.function.may_return_null
            || (self.function.propagates_null
                && self.arguments.iter().any(|arg| arg.is_nullable()))
    }

    fn is_deterministic(&self) -> bool {
        self.function.is_deterministic
            && self.arguments.iter().all(|arg| arg.is_deterministic())
    }

    fn children(&self) -> Vec<ExpressionRef> {
        self.arguments.clone()
    }

    fn with_children(&self, children: Vec<ExpressionRef>) -> PrismDBResult<ExpressionRef> {
        check_children_count(self, children.len(), self.arguments.len())?;
        Ok(Arc::new(Self::new(self.function, self.name, children)?))
    }

    fn evaluate(&self, ctx: &ExecutionContext, row: &[Value]) -> PrismDBResult<Value> {
        let values = evaluate_all(&self.arguments, ctx, row)?;
        if self.function.propagates_null && values.iter().any(Value::is_null) {
            return Ok(Value::Null);
        }
        (self.function.function)(ctx, &values)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Every builtin scalar function
pub fn builtin_functions() -> Vec<FunctionDescriptor> {
    let mut functions = Vec::new();
    functions.extend(math_functions::math_functions());
    functions.extend(string_functions::string_functions());
    functions.extend(conditional_functions::conditional_functions());
    functions.extend(datetime_functions::datetime_functions());
    functions.extend(system_functions::system_functions());
    functions
}

/// Names of the builtins that may appear in a column default
pub const DEFAULT_ALLOWED_FUNCTION_NAMES: &[&str] = &[
    // math
    "ABS", "CEIL", "CEILING", "FLOOR", "SQRT", "SIGN", "DEGREES", "RADIANS", "SIN", "COS",
    "TAN", "COT", "ACOS", "ASIN", "ATAN", "LN", "LOG", "LOG10", "LOG2", "EXP", "POW", "POWER",
    "ROUND", "RAND", "PI",
    // string
    "UPPER", "UCASE", "LOWER", "LCASE", "LENGTH", "CHAR_LENGTH", "CHARACTER_LENGTH", "REVERSE",
    "TRIM", "LTRIM", "RTRIM", "ASCII", "HEX", "CONCAT", "REPEAT", "LEFT", "SUBSTRING", "SUBSTR",
    "MID", "REPLACE", "CONCAT_WS", "LPAD", "RPAD", "INSTR", "SUBSTRING_INDEX", "TO_BASE64",
    "FROM_BASE64", "UNHEX", "BIN", "BIT_LENGTH", "SOUNDEX",
    // conditional
    "GREATEST", "LEAST", "COALESCE", "IF", "IFNULL", "NULLIF",
    // date/time
    "NOW", "CURRENT_TIMESTAMP", "LOCALTIME", "LOCALTIMESTAMP", "CURDATE", "CURRENT_DATE",
    "CURTIME", "CURRENT_TIME", "UTC_TIMESTAMP", "YEAR", "MONTH", "DAY", "DAYOFMONTH",
    "DAYOFWEEK", "WEEKDAY", "DAYOFYEAR", "WEEKOFYEAR", "HOUR", "MINUTE", "SECOND",
    "MICROSECOND", "MONTHNAME", "DAYNAME", "TIME_TO_SEC", "DATE_FORMAT", "UNIX_TIMESTAMP",
    // system
    "CONNECTION_ID", "USER", "CURRENT_USER",
];

/// Functions allowed in column defaults
pub fn default_allowed_functions() -> PrismDBResult<FunctionRegistry> {
    let allowed: Vec<FunctionDescriptor> = builtin_functions()
        .into_iter()
        .filter(|f| {
            DEFAULT_ALLOWED_FUNCTION_NAMES
                .iter()
                .any(|name| name.eq_ignore_ascii_case(f.name()))
        })
        .collect();
    FunctionRegistry::with_functions(allowed)
}

/// Builtins plus the user-level lock functions bound to `locks`
pub fn full_catalog(locks: Arc<LockSubsystem>) -> PrismDBResult<FunctionRegistry> {
    let mut registry = FunctionRegistry::with_functions(builtin_functions())?;
    registry.register(locking_functions::locking_functions(locks))?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::LiteralExpression;

    fn lit(value: Value) -> ExpressionRef {
        Arc::new(LiteralExpression::new(value))
    }

    #[test]
    fn test_argument_count_bounds() {
        assert!(check_argument_count("f", 1, 1, Some(2)).is_ok());
        assert!(check_argument_count("f", 5, 1, None).is_ok());
        assert!(matches!(
            check_argument_count("f", 0, 1, Some(2)),
            Err(PrismDBError::InvalidArgumentNumber { expected: 1, given: 0, .. })
        ));
        assert!(matches!(
            check_argument_count("f", 3, 1, Some(2)),
            Err(PrismDBError::InvalidArgumentNumber { expected: 2, given: 3, .. })
        ));
    }

    #[test]
    fn test_scalar_function_node() -> PrismDBResult<()> {
        let registry = FunctionRegistry::with_functions(builtin_functions())?;
        let upper = registry
            .lookup("upper")?
            .call(vec![lit(Value::varchar("abc"))])?;

        assert_eq!(upper.to_string(), "UPPER('abc')");
        assert_eq!(upper.return_type(), LogicalType::Varchar);
        assert!(!upper.is_nullable());
        assert!(upper.is_deterministic());

        let ctx = ExecutionContext::empty();
        assert_eq!(upper.evaluate(&ctx, &[])?, Value::varchar("ABC"));

        let rebuilt = upper.with_children(vec![lit(Value::Null)])?;
        assert!(rebuilt.is_nullable());
        assert_eq!(rebuilt.evaluate(&ctx, &[])?, Value::Null);
        assert!(upper.with_children(vec![]).is_err());
        Ok(())
    }

    #[test]
    fn test_alias_prints_registered_name() -> PrismDBResult<()> {
        let registry = FunctionRegistry::with_functions(builtin_functions())?;
        let ceiling = registry
            .lookup("Ceiling")?
            .call(vec![lit(Value::double(1.2))])?;
        assert_eq!(ceiling.to_string(), "CEILING(1.2)");
        Ok(())
    }

    #[test]
    fn test_catalogs() -> PrismDBResult<()> {
        let allowed = default_allowed_functions()?;
        assert_eq!(allowed.function_count(), DEFAULT_ALLOWED_FUNCTION_NAMES.len());
        assert!(allowed.contains("rand"));
        assert!(!allowed.contains("get_lock"));
        for name in ["substr", "concat_ws", "to_base64", "year", "date_format", "log", "atan"] {
            assert!(allowed.contains(name), "{} should be allowed", name);
        }

        let full = full_catalog(Arc::new(LockSubsystem::default()))?;
        assert!(full.contains("get_lock"));
        assert!(full.contains("release_all_locks"));
        assert!(full.function_count() > allowed.function_count());
        Ok(())
    }
}
