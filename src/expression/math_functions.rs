//! Mathematical Functions
//!
//! Value-level implementations of the builtin math functions, their
//! [`ScalarFunction`] descriptions, and the [`Rand`] node.

use crate::catalog::function::FunctionDescriptor;
use crate::common::error::{PrismDBError, PrismDBResult};
use crate::execution::ExecutionContext;
use crate::expression::function::{
    argument, check_argument_count, FunctionClassification, ReturnType, ScalarFunction,
};
use crate::expression::{check_children_count, Expression, ExpressionRef};
use crate::types::{LogicalType, Value};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

fn numeric_arg(name: &str, value: &Value) -> PrismDBResult<f64> {
    value
        .try_as_f64()
        .map_err(|_| PrismDBError::Type(format!("{} not supported for {}", name, value.get_type())))
}

fn is_integral(value: &Value) -> bool {
    value.get_type().is_integral()
}

/// ABS - Absolute value
pub fn abs(value: &Value) -> PrismDBResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        v if is_integral(v) => {
            let n = v.try_as_i64()?;
            n.checked_abs().map(Value::BigInt).ok_or_else(|| {
                PrismDBError::Execution(format!("BIGINT value is out of range in 'ABS({})'", n))
            })
        }
        v => Ok(Value::Double(numeric_arg("ABS", v)?.abs())),
    }
}

/// SIGN - Sign of a number (-1, 0, or 1)
pub fn sign(value: &Value) -> PrismDBResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    let v = numeric_arg("SIGN", value)?;
    let sign = if v < 0.0 {
        -1
    } else if v > 0.0 {
        1
    } else {
        0
    };
    Ok(Value::Integer(sign))
}

/// CEIL/CEILING - Smallest integer not less than the value
pub fn ceil(value: &Value) -> PrismDBResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        v if is_integral(v) => Ok(Value::BigInt(v.try_as_i64()?)),
        v => Ok(Value::Double(numeric_arg("CEIL", v)?.ceil())),
    }
}

/// FLOOR - Largest integer not greater than the value
pub fn floor(value: &Value) -> PrismDBResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        v if is_integral(v) => Ok(Value::BigInt(v.try_as_i64()?)),
        v => Ok(Value::Double(numeric_arg("FLOOR", v)?.floor())),
    }
}

/// SQRT - Square root; NULL for negative input
pub fn sqrt(value: &Value) -> PrismDBResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    let v = numeric_arg("SQRT", value)?;
    if v < 0.0 {
        return Ok(Value::Null);
    }
    Ok(Value::Double(v.sqrt()))
}

/// POW/POWER - Raise to power
pub fn power(base: &Value, exponent: &Value) -> PrismDBResult<Value> {
    if base.is_null() || exponent.is_null() {
        return Ok(Value::Null);
    }
    let result = numeric_arg("POWER", base)?.powf(numeric_arg("POWER", exponent)?);
    if !result.is_finite() {
        return Err(PrismDBError::Execution(format!(
            "DOUBLE value is out of range in 'POW({}, {})'",
            base, exponent
        )));
    }
    Ok(Value::Double(result))
}

/// Shared body of the logarithms: NULL for non-positive input
fn logarithm(name: &str, value: &Value, log: fn(f64) -> f64) -> PrismDBResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    let v = numeric_arg(name, value)?;
    if v <= 0.0 {
        return Ok(Value::Null);
    }
    Ok(Value::Double(log(v)))
}

/// LN - Natural logarithm
pub fn ln(value: &Value) -> PrismDBResult<Value> {
    logarithm("LN", value, f64::ln)
}

/// LOG10 - Base 10 logarithm
pub fn log10(value: &Value) -> PrismDBResult<Value> {
    logarithm("LOG10", value, f64::log10)
}

/// LOG2 - Base 2 logarithm
pub fn log2(value: &Value) -> PrismDBResult<Value> {
    logarithm("LOG2", value, f64::log2)
}

/// EXP - e raised to the value
pub fn exp(value: &Value) -> PrismDBResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    let result = numeric_arg("EXP", value)?.exp();
    if result.is_infinite() {
        return Err(PrismDBError::Execution(format!(
            "DOUBLE value is out of range in 'EXP({})'",
            value
        )));
    }
    Ok(Value::Double(result))
}

fn unary_double(name: &str, value: &Value, f: fn(f64) -> f64) -> PrismDBResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    Ok(Value::Double(f(numeric_arg(name, value)?)))
}

/// DEGREES - Radians to degrees
pub fn degrees(value: &Value) -> PrismDBResult<Value> {
    unary_double("DEGREES", value, f64::to_degrees)
}

/// RADIANS - Degrees to radians
pub fn radians(value: &Value) -> PrismDBResult<Value> {
    unary_double("RADIANS", value, f64::to_radians)
}

pub fn sin(value: &Value) -> PrismDBResult<Value> {
    unary_double("SIN", value, f64::sin)
}

pub fn cos(value: &Value) -> PrismDBResult<Value> {
    unary_double("COS", value, f64::cos)
}

pub fn tan(value: &Value) -> PrismDBResult<Value> {
    unary_double("TAN", value, f64::tan)
}

/// LOG(x) is the natural logarithm; LOG(b, x) is the base `b` logarithm.
///
/// NULL for a non-positive argument or a base of 1.
pub fn log(first: &Value, second: Option<&Value>) -> PrismDBResult<Value> {
    let Some(value) = second else {
        return logarithm("LOG", first, f64::ln);
    };
    if first.is_null() || value.is_null() {
        return Ok(Value::Null);
    }
    let base = numeric_arg("LOG", first)?;
    let v = numeric_arg("LOG", value)?;
    if base <= 0.0 || base == 1.0 || v <= 0.0 {
        return Ok(Value::Null);
    }
    Ok(Value::Double(v.ln() / base.ln()))
}

/// Inverse sine and cosine are NULL outside `[-1, 1]`
fn inverse_trig(name: &str, value: &Value, f: fn(f64) -> f64) -> PrismDBResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    let v = numeric_arg(name, value)?;
    if !(-1.0..=1.0).contains(&v) {
        return Ok(Value::Null);
    }
    Ok(Value::Double(f(v)))
}

pub fn acos(value: &Value) -> PrismDBResult<Value> {
    inverse_trig("ACOS", value, f64::acos)
}

pub fn asin(value: &Value) -> PrismDBResult<Value> {
    inverse_trig("ASIN", value, f64::asin)
}

/// ATAN(x), or ATAN(y, x) for the angle of the point `(x, y)`
pub fn atan(y: &Value, x: Option<&Value>) -> PrismDBResult<Value> {
    if y.is_null() || x.is_some_and(Value::is_null) {
        return Ok(Value::Null);
    }
    let y = numeric_arg("ATAN", y)?;
    match x {
        Some(x) => Ok(Value::Double(y.atan2(numeric_arg("ATAN", x)?))),
        None => Ok(Value::Double(y.atan())),
    }
}

/// COT - Cotangent; an error at 0
pub fn cot(value: &Value) -> PrismDBResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    let tan = numeric_arg("COT", value)?.tan();
    if tan == 0.0 {
        return Err(PrismDBError::Execution(format!(
            "DOUBLE value is out of range in 'COT({})'",
            value
        )));
    }
    Ok(Value::Double(1.0 / tan))
}

/// ROUND - Round half away from zero to `places` decimal places.
///
/// Negative `places` round to the left of the decimal point. Integral
/// input stays integral.
pub fn round(value: &Value, places: Option<&Value>) -> PrismDBResult<Value> {
    if value.is_null() || places.is_some_and(Value::is_null) {
        return Ok(Value::Null);
    }
    let places = match places {
        Some(p) => p.try_as_i64()?.clamp(-30, 30) as i32,
        None => 0,
    };

    if is_integral(value) {
        let n = value.try_as_i64()?;
        if places >= 0 {
            return Ok(Value::BigInt(n));
        }
        let factor = 10f64.powi(-places);
        let rounded = (n as f64 / factor).round() * factor;
        return Ok(Value::BigInt(rounded as i64));
    }

    let v = numeric_arg("ROUND", value)?;
    let factor = 10f64.powi(places);
    Ok(Value::Double((v * factor).round() / factor))
}

pub static ABS: ScalarFunction = ScalarFunction {
    name: "ABS",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::IntegralOrDouble,
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| abs(argument(args, 0)?),
};

pub static CEIL: ScalarFunction = ScalarFunction {
    name: "CEIL",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::IntegralOrDouble,
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| ceil(argument(args, 0)?),
};

pub static FLOOR: ScalarFunction = ScalarFunction {
    name: "FLOOR",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::IntegralOrDouble,
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| floor(argument(args, 0)?),
};

pub static SQRT: ScalarFunction = ScalarFunction {
    name: "SQRT",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| sqrt(argument(args, 0)?),
};

pub static SIGN: ScalarFunction = ScalarFunction {
    name: "SIGN",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Integer),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| sign(argument(args, 0)?),
};

pub static DEGREES: ScalarFunction = ScalarFunction {
    name: "DEGREES",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| degrees(argument(args, 0)?),
};

pub static RADIANS: ScalarFunction = ScalarFunction {
    name: "RADIANS",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| radians(argument(args, 0)?),
};

pub static SIN: ScalarFunction = ScalarFunction {
    name: "SIN",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| sin(argument(args, 0)?),
};

pub static COS: ScalarFunction = ScalarFunction {
    name: "COS",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| cos(argument(args, 0)?),
};

pub static TAN: ScalarFunction = ScalarFunction {
    name: "TAN",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| tan(argument(args, 0)?),
};

pub static LN: ScalarFunction = ScalarFunction {
    name: "LN",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| ln(argument(args, 0)?),
};

pub static LOG10: ScalarFunction = ScalarFunction {
    name: "LOG10",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| log10(argument(args, 0)?),
};

pub static LOG2: ScalarFunction = ScalarFunction {
    name: "LOG2",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| log2(argument(args, 0)?),
};

pub static LOG: ScalarFunction = ScalarFunction {
    name: "LOG",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(2),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| log(argument(args, 0)?, args.get(1)),
};

pub static ACOS: ScalarFunction = ScalarFunction {
    name: "ACOS",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| acos(argument(args, 0)?),
};

pub static ASIN: ScalarFunction = ScalarFunction {
    name: "ASIN",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| asin(argument(args, 0)?),
};

pub static ATAN: ScalarFunction = ScalarFunction {
    name: "ATAN",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(2),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| atan(argument(args, 0)?, args.get(1)),
};

pub static COT: ScalarFunction = ScalarFunction {
    name: "COT",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| cot(argument(args, 0)?),
};

pub static EXP: ScalarFunction = ScalarFunction {
    name: "EXP",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| exp(argument(args, 0)?),
};

pub static POWER: ScalarFunction = ScalarFunction {
    name: "POWER",
    classification: FunctionClassification::Mathematical,
    min_args: 2,
    max_args: Some(2),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| power(argument(args, 0)?, argument(args, 1)?),
};

pub static ROUND: ScalarFunction = ScalarFunction {
    name: "ROUND",
    classification: FunctionClassification::Mathematical,
    min_args: 1,
    max_args: Some(2),
    return_type: ReturnType::IntegralOrDouble,
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| round(argument(args, 0)?, args.get(1)),
};

pub static PI_FUNCTION: ScalarFunction = ScalarFunction {
    name: "PI",
    classification: FunctionClassification::Mathematical,
    min_args: 0,
    max_args: Some(0),
    return_type: ReturnType::Fixed(LogicalType::Double),
    propagates_null: false,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, _| Ok(Value::Double(PI)),
};

/// RAND([seed]) - Uniform double in `[0, 1)`.
///
/// Unseeded calls draw from the thread RNG. A seeded call builds a fresh
/// generator from the evaluated seed each time, so the same seed always
/// yields the same value and the node holds no state.
#[derive(Debug)]
pub struct Rand {
    seed: Option<ExpressionRef>,
}

impl Rand {
    pub fn new(seed: Option<ExpressionRef>) -> Self {
        Self { seed }
    }

    /// Build from call arguments; accepts zero or one
    pub fn from_arguments(arguments: Vec<ExpressionRef>) -> PrismDBResult<ExpressionRef> {
        check_argument_count("RAND", arguments.len(), 0, Some(1))?;
        Ok(Arc::new(Self::new(arguments.into_iter().next())))
    }

    pub fn descriptor() -> FunctionDescriptor {
        FunctionDescriptor::variadic("RAND", Self::from_arguments)
    }
}

impl fmt::Display for Rand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.seed {
            Some(seed) => write!(f, "RAND({})", seed),
            None => write!(f, "RAND()"),
        }
    }
}

impl Expression for Rand {
    fn return_type(&self) -> LogicalType {
        LogicalType::Double
    }

    fn is_nullable(&self) -> bool {
        false
    }

    fn is_deterministic(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<ExpressionRef> {
        self.seed.iter().cloned().collect()
    }

    fn with_children(&self, children: Vec<ExpressionRef>) -> PrismDBResult<ExpressionRef> {
        check_children_count(self, children.len(), self.seed.iter().count())?;
        Ok(Arc::new(Self::new(children.into_iter().next())))
    }

    fn evaluate(&self, ctx: &ExecutionContext, row: &[Value]) -> PrismDBResult<Value> {
        let Some(seed) = &self.seed else {
            return Ok(Value::Double(rand::rng().random::<f64>()));
        };

        let seed = match seed.evaluate(ctx, row)? {
            Value::Null => 0,
            v => v.try_as_i64()?,
        };
        let mut rng = StdRng::seed_from_u64(seed as u64);
        Ok(Value::Double(rng.random::<f64>()))
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Math builtins
pub fn math_functions() -> Vec<FunctionDescriptor> {
    vec![
        ABS.descriptor(),
        CEIL.descriptor(),
        CEIL.descriptor_as("CEILING"),
        FLOOR.descriptor(),
        SQRT.descriptor(),
        SIGN.descriptor(),
        DEGREES.descriptor(),
        RADIANS.descriptor(),
        SIN.descriptor(),
        COS.descriptor(),
        TAN.descriptor(),
        COT.descriptor(),
        ACOS.descriptor(),
        ASIN.descriptor(),
        ATAN.descriptor(),
        LN.descriptor(),
        LOG.descriptor(),
        LOG10.descriptor(),
        LOG2.descriptor(),
        EXP.descriptor(),
        POWER.descriptor_as("POW"),
        POWER.descriptor(),
        ROUND.descriptor(),
        PI_FUNCTION.descriptor(),
        Rand::descriptor(),
    ]
}
