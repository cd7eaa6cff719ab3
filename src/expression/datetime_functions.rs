//! Date/Time Functions
//!
//! The clock functions read the statement start time from the
//! [`ExecutionContext`], so all calls within one statement agree. The
//! extraction functions take a DATE, TIMESTAMP or date string and yield
//! NULL for text that is not a date.

use crate::catalog::function::FunctionDescriptor;
use crate::common::error::{PrismDBError, PrismDBResult};
use crate::execution::ExecutionContext;
use crate::expression::function::{
    argument, FunctionClassification, ReturnType, ScalarFunction,
};
use crate::expression::{ExpressionRef, LiteralExpression};
use crate::types::{LogicalType, Value};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_DAY: i64 = 86_400 * MICROS_PER_SECOND;

/// Largest fractional seconds precision accepted
pub const MAX_FSP: i64 = 6;

/// Fractional seconds precision from an optional argument; NULL means 0
fn fractional_precision(name: &str, args: &[Value]) -> PrismDBResult<u32> {
    let fsp = match args.first() {
        None | Some(Value::Null) => 0,
        Some(v) => v.try_as_i64()?,
    };
    if !(0..=MAX_FSP).contains(&fsp) {
        return Err(PrismDBError::InvalidArgument(format!(
            "Too-big precision {} specified for '{}'. Maximum is {}",
            fsp, name, MAX_FSP
        )));
    }
    Ok(fsp as u32)
}

/// Reject an out-of-range literal precision when the call is built, so
/// `NOW(7)` fails at definition time rather than at first evaluation.
fn check_literal_precision(name: &str, args: &[ExpressionRef]) -> PrismDBResult<()> {
    let literal = args
        .first()
        .and_then(|arg| arg.as_any().downcast_ref::<LiteralExpression>());
    match literal {
        Some(literal) => fractional_precision(name, std::slice::from_ref(literal.value())).map(|_| ()),
        None => Ok(()),
    }
}

/// Drop digits below `fsp` fractional second digits
fn truncate_micros(micros: i64, fsp: u32) -> i64 {
    let unit = 10i64.pow(6 - fsp);
    micros - micros.rem_euclid(unit)
}

/// NOW / CURRENT_TIMESTAMP - Statement start time
pub fn now(ctx: &ExecutionContext, fsp: u32) -> Value {
    Value::Timestamp(truncate_micros(ctx.query_time.timestamp_micros(), fsp))
}

/// CURDATE / CURRENT_DATE - Statement start date
pub fn current_date(ctx: &ExecutionContext) -> Value {
    let days = ctx.query_time.timestamp_micros().div_euclid(MICROS_PER_DAY);
    Value::Date(days as i32)
}

/// CURTIME / CURRENT_TIME - Statement start time of day
pub fn current_time(ctx: &ExecutionContext, fsp: u32) -> Value {
    let micros = ctx.query_time.timestamp_micros().rem_euclid(MICROS_PER_DAY);
    Value::Time(truncate_micros(micros, fsp))
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Date and time of a temporal argument; `None` when it holds no date
fn datetime_of(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Null | Value::Time(_) => None,
        Value::Timestamp(micros) => DateTime::from_timestamp_micros(*micros).map(|t| t.naive_utc()),
        Value::Date(days) => {
            DateTime::from_timestamp_micros(*days as i64 * MICROS_PER_DAY).map(|t| t.naive_utc())
        }
        other => parse_datetime(&other.to_plain_string()),
    }
}

/// Time of day of a temporal argument; TIME values and `HH:MM:SS` text included
fn time_of(value: &Value) -> Option<NaiveTime> {
    match value {
        Value::Time(micros) => NaiveTime::from_num_seconds_from_midnight_opt(
            micros.div_euclid(MICROS_PER_SECOND) as u32,
            (micros.rem_euclid(MICROS_PER_SECOND) * 1_000) as u32,
        ),
        Value::Varchar(s) => NaiveTime::parse_from_str(s.trim(), "%H:%M:%S%.f")
            .ok()
            .or_else(|| parse_datetime(s).map(|dt| dt.time())),
        other => datetime_of(other).map(|dt| dt.time()),
    }
}

fn date_part(value: &Value, part: fn(&NaiveDateTime) -> u32) -> Value {
    datetime_of(value).map_or(Value::Null, |dt| Value::Integer(part(&dt) as i32))
}

fn time_part(value: &Value, part: fn(&NaiveTime) -> u32) -> Value {
    time_of(value).map_or(Value::Null, |t| Value::Integer(part(&t) as i32))
}

pub fn year(value: &Value) -> Value {
    datetime_of(value).map_or(Value::Null, |dt| Value::Integer(dt.year()))
}

pub fn month(value: &Value) -> Value {
    date_part(value, |dt| dt.month())
}

/// DAY / DAYOFMONTH
pub fn day(value: &Value) -> Value {
    date_part(value, |dt| dt.day())
}

/// DAYOFWEEK - 1 for Sunday through 7 for Saturday
pub fn day_of_week(value: &Value) -> Value {
    date_part(value, |dt| dt.weekday().number_from_sunday())
}

/// WEEKDAY - 0 for Monday through 6 for Sunday
pub fn weekday(value: &Value) -> Value {
    date_part(value, |dt| dt.weekday().num_days_from_monday())
}

pub fn day_of_year(value: &Value) -> Value {
    date_part(value, |dt| dt.ordinal())
}

/// WEEKOFYEAR - ISO 8601 week number
pub fn week_of_year(value: &Value) -> Value {
    date_part(value, |dt| dt.iso_week().week())
}

pub fn hour(value: &Value) -> Value {
    time_part(value, |t| t.hour())
}

pub fn minute(value: &Value) -> Value {
    time_part(value, |t| t.minute())
}

pub fn second(value: &Value) -> Value {
    time_part(value, |t| t.second())
}

pub fn microsecond(value: &Value) -> Value {
    time_part(value, |t| t.nanosecond() / 1_000)
}

pub fn month_name(value: &Value) -> Value {
    datetime_of(value).map_or(Value::Null, |dt| Value::Varchar(dt.format("%B").to_string()))
}

pub fn day_name(value: &Value) -> Value {
    datetime_of(value).map_or(Value::Null, |dt| Value::Varchar(dt.format("%A").to_string()))
}

/// TIME_TO_SEC - Seconds since midnight
pub fn time_to_sec(value: &Value) -> Value {
    time_of(value).map_or(Value::Null, |t| {
        Value::BigInt(t.num_seconds_from_midnight() as i64)
    })
}

/// UNIX_TIMESTAMP([date]) - Whole seconds since the epoch.
///
/// With no argument this is the statement time. Fractional seconds are
/// dropped and dates before the epoch give 0.
pub fn unix_timestamp(ctx: &ExecutionContext, args: &[Value]) -> Value {
    match args.first() {
        None => Value::BigInt(ctx.query_time.timestamp()),
        Some(value) => datetime_of(value).map_or(Value::Null, |dt| {
            Value::BigInt(dt.and_utc().timestamp().max(0))
        }),
    }
}

/// DATE_FORMAT - Format a date with MySQL `%` specifiers.
///
/// An unknown specifier prints its letter, so `%%` is a literal `%`.
pub fn date_format(value: &Value, format: &Value) -> Value {
    let Some(dt) = datetime_of(value) else {
        return Value::Null;
    };
    let format = format.to_plain_string();
    let mut out = String::with_capacity(format.len() * 2);
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let Some(spec) = chars.next() else {
            break;
        };
        let (pm, hour12) = dt.hour12();
        match spec {
            'Y' => out.push_str(&format!("{:04}", dt.year())),
            'y' => out.push_str(&format!("{:02}", dt.year().rem_euclid(100))),
            'm' => out.push_str(&format!("{:02}", dt.month())),
            'c' => out.push_str(&dt.month().to_string()),
            'd' => out.push_str(&format!("{:02}", dt.day())),
            'e' => out.push_str(&dt.day().to_string()),
            'D' => out.push_str(&ordinal_day(dt.day())),
            'j' => out.push_str(&format!("{:03}", dt.ordinal())),
            'H' => out.push_str(&format!("{:02}", dt.hour())),
            'k' => out.push_str(&dt.hour().to_string()),
            'h' | 'I' => out.push_str(&format!("{:02}", hour12)),
            'l' => out.push_str(&hour12.to_string()),
            'i' => out.push_str(&format!("{:02}", dt.minute())),
            's' | 'S' => out.push_str(&format!("{:02}", dt.second())),
            'f' => out.push_str(&format!("{:06}", dt.nanosecond() / 1_000)),
            'p' => out.push_str(if pm { "PM" } else { "AM" }),
            'T' => out.push_str(&dt.format("%H:%M:%S").to_string()),
            'r' => out.push_str(&format!(
                "{:02}:{:02}:{:02} {}",
                hour12,
                dt.minute(),
                dt.second(),
                if pm { "PM" } else { "AM" }
            )),
            'M' => out.push_str(&dt.format("%B").to_string()),
            'b' => out.push_str(&dt.format("%b").to_string()),
            'W' => out.push_str(&dt.format("%A").to_string()),
            'a' => out.push_str(&dt.format("%a").to_string()),
            'w' => out.push_str(&dt.weekday().num_days_from_sunday().to_string()),
            other => out.push(other),
        }
    }
    Value::Varchar(out)
}

fn ordinal_day(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}

pub static NOW: ScalarFunction = ScalarFunction {
    name: "NOW",
    classification: FunctionClassification::DateTime,
    min_args: 0,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Timestamp),
    propagates_null: false,
    may_return_null: false,
    is_deterministic: false,
    check_arguments: Some(check_literal_precision),
    function: |ctx, args| Ok(now(ctx, fractional_precision("NOW", args)?)),
};

// The statement time is held in UTC, so this agrees with NOW.
pub static UTC_TIMESTAMP: ScalarFunction = ScalarFunction {
    name: "UTC_TIMESTAMP",
    classification: FunctionClassification::DateTime,
    min_args: 0,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Timestamp),
    propagates_null: false,
    may_return_null: false,
    is_deterministic: false,
    check_arguments: Some(check_literal_precision),
    function: |ctx, args| Ok(now(ctx, fractional_precision("UTC_TIMESTAMP", args)?)),
};

pub static CURDATE: ScalarFunction = ScalarFunction {
    name: "CURDATE",
    classification: FunctionClassification::DateTime,
    min_args: 0,
    max_args: Some(0),
    return_type: ReturnType::Fixed(LogicalType::Date),
    propagates_null: false,
    may_return_null: false,
    is_deterministic: false,
    check_arguments: None,
    function: |ctx, _| Ok(current_date(ctx)),
};

pub static CURTIME: ScalarFunction = ScalarFunction {
    name: "CURTIME",
    classification: FunctionClassification::DateTime,
    min_args: 0,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Time),
    propagates_null: false,
    may_return_null: false,
    is_deterministic: false,
    check_arguments: Some(check_literal_precision),
    function: |ctx, args| Ok(current_time(ctx, fractional_precision("CURTIME", args)?)),
};

pub static YEAR: ScalarFunction = ScalarFunction {
    name: "YEAR",
    classification: FunctionClassification::DateTime,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Integer),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| Ok(year(argument(args, 0)?)),
};

pub static MONTH: ScalarFunction = ScalarFunction {
    name: "MONTH",
    classification: FunctionClassification::DateTime,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Integer),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| Ok(month(argument(args, 0)?)),
};

pub static DAY: ScalarFunction = ScalarFunction {
    name: "DAY",
    classification: FunctionClassification::DateTime,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Integer),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| Ok(day(argument(args, 0)?)),
};

pub static DAYOFWEEK: ScalarFunction = ScalarFunction {
    name: "DAYOFWEEK",
    classification: FunctionClassification::DateTime,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Integer),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| Ok(day_of_week(argument(args, 0)?)),
};

pub static WEEKDAY: ScalarFunction = ScalarFunction {
    name: "WEEKDAY",
    classification: FunctionClassification::DateTime,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Integer),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| Ok(weekday(argument(args, 0)?)),
};

pub static DAYOFYEAR: ScalarFunction = ScalarFunction {
    name: "DAYOFYEAR",
    classification: FunctionClassification::DateTime,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Integer),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| Ok(day_of_year(argument(args, 0)?)),
};

pub static WEEKOFYEAR: ScalarFunction = ScalarFunction {
    name: "WEEKOFYEAR",
    classification: FunctionClassification::DateTime,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Integer),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| Ok(week_of_year(argument(args, 0)?)),
};

pub static HOUR: ScalarFunction = ScalarFunction {
    name: "HOUR",
    classification: FunctionClassification::DateTime,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Integer),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| Ok(hour(argument(args, 0)?)),
};

pub static MINUTE: ScalarFunction = ScalarFunction {
    name: "MINUTE",
    classification: FunctionClassification::DateTime,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Integer),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| Ok(minute(argument(args, 0)?)),
};

pub static SECOND: ScalarFunction = ScalarFunction {
    name: "SECOND",
    classification: FunctionClassification::DateTime,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Integer),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| Ok(second(argument(args, 0)?)),
};

pub static MICROSECOND: ScalarFunction = ScalarFunction {
    name: "MICROSECOND",
    classification: FunctionClassification::DateTime,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Integer),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| Ok(microsecond(argument(args, 0)?)),
};

pub static MONTHNAME: ScalarFunction = ScalarFunction {
    name: "MONTHNAME",
    classification: FunctionClassification::DateTime,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| Ok(month_name(argument(args, 0)?)),
};

pub static DAYNAME: ScalarFunction = ScalarFunction {
    name: "DAYNAME",
    classification: FunctionClassification::DateTime,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| Ok(day_name(argument(args, 0)?)),
};

pub static TIME_TO_SEC: ScalarFunction = ScalarFunction {
    name: "TIME_TO_SEC",
    classification: FunctionClassification::DateTime,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::BigInt),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| Ok(time_to_sec(argument(args, 0)?)),
};

pub static DATE_FORMAT: ScalarFunction = ScalarFunction {
    name: "DATE_FORMAT",
    classification: FunctionClassification::DateTime,
    min_args: 2,
    max_args: Some(2),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| Ok(date_format(argument(args, 0)?, argument(args, 1)?)),
};

pub static UNIX_TIMESTAMP: ScalarFunction = ScalarFunction {
    name: "UNIX_TIMESTAMP",
    classification: FunctionClassification::DateTime,
    min_args: 0,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::BigInt),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: false,
    check_arguments: None,
    function: |ctx, args| Ok(unix_timestamp(ctx, args)),
};

/// Date/time builtins
pub fn datetime_functions() -> Vec<FunctionDescriptor> {
    vec![
        NOW.descriptor(),
        NOW.descriptor_as("CURRENT_TIMESTAMP"),
        NOW.descriptor_as("LOCALTIME"),
        NOW.descriptor_as("LOCALTIMESTAMP"),
        UTC_TIMESTAMP.descriptor(),
        CURDATE.descriptor(),
        CURDATE.descriptor_as("CURRENT_DATE"),
        CURTIME.descriptor(),
        CURTIME.descriptor_as("CURRENT_TIME"),
        YEAR.descriptor(),
        MONTH.descriptor(),
        DAY.descriptor(),
        DAY.descriptor_as("DAYOFMONTH"),
        DAYOFWEEK.descriptor(),
        WEEKDAY.descriptor(),
        DAYOFYEAR.descriptor(),
        WEEKOFYEAR.descriptor(),
        HOUR.descriptor(),
        MINUTE.descriptor(),
        SECOND.descriptor(),
        MICROSECOND.descriptor(),
        MONTHNAME.descriptor(),
        DAYNAME.descriptor(),
        TIME_TO_SEC.descriptor(),
        DATE_FORMAT.descriptor(),
        UNIX_TIMESTAMP.descriptor(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{Expression, ScalarFunctionExpression};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn fixed_context() -> ExecutionContext {
        let time = Utc
            .with_ymd_and_hms(2024, 3, 15, 10, 30, 45)
            .single()
            .expect("valid timestamp")
            + chrono::Duration::microseconds(123_456);
        ExecutionContext::empty().with_query_time(time)
    }

    #[test]
    fn test_now_precision() -> PrismDBResult<()> {
        let ctx = fixed_context();
        let micros = ctx.query_time.timestamp_micros();

        assert_eq!(now(&ctx, 0), Value::Timestamp(micros - 123_456));
        assert_eq!(now(&ctx, 3), Value::Timestamp(micros - 456));
        assert_eq!(now(&ctx, 6), Value::Timestamp(micros));
        assert_eq!(now(&ctx, 0).to_string(), "2024-03-15 10:30:45.000000");

        assert!(fractional_precision("NOW", &[Value::Integer(7)]).is_err());
        assert_eq!(fractional_precision("NOW", &[Value::Null])?, 0);
        Ok(())
    }

    #[test]
    fn test_date_and_time() {
        let ctx = fixed_context();
        assert_eq!(current_date(&ctx).to_string(), "2024-03-15");
        assert_eq!(
            current_time(&ctx, 0),
            Value::Time((10 * 3600 + 30 * 60 + 45) * MICROS_PER_SECOND)
        );
    }

    #[test]
    fn test_literal_precision_checked_at_build() -> PrismDBResult<()> {
        let lit = |v: Value| Arc::new(LiteralExpression::new(v)) as ExpressionRef;

        for function in [&NOW, &UTC_TIMESTAMP, &CURTIME] {
            assert!(matches!(
                ScalarFunctionExpression::new(function, function.name, vec![lit(Value::Integer(7))]),
                Err(PrismDBError::InvalidArgument(msg)) if msg.contains("Too-big precision 7")
            ));
            assert!(ScalarFunctionExpression::new(function, function.name, vec![lit(Value::Integer(-1))]).is_err());
            assert!(ScalarFunctionExpression::new(function, function.name, vec![lit(Value::Integer(6))]).is_ok());
            assert!(ScalarFunctionExpression::new(function, function.name, vec![lit(Value::Null)]).is_ok());
        }

        // A computed precision can only be checked when it is evaluated
        let computed: ExpressionRef = Arc::new(ScalarFunctionExpression::new(
            &crate::expression::math_functions::ABS,
            "ABS",
            vec![lit(Value::Integer(-7))],
        )?);
        let now = ScalarFunctionExpression::new(&NOW, "NOW", vec![computed])?;
        assert!(now.evaluate(&fixed_context(), &[]).is_err());
        Ok(())
    }

    #[test]
    fn test_utc_timestamp_matches_now() -> PrismDBResult<()> {
        let ctx = fixed_context();
        for fsp in [vec![], vec![Value::Integer(3)]] {
            assert_eq!((UTC_TIMESTAMP.function)(&ctx, &fsp)?, (NOW.function)(&ctx, &fsp)?);
        }
        Ok(())
    }

    #[test]
    fn test_date_parts() {
        let ts = now(&fixed_context(), 6);
        assert_eq!(year(&ts), Value::Integer(2024));
        assert_eq!(month(&ts), Value::Integer(3));
        assert_eq!(day(&ts), Value::Integer(15));
        // 2024-03-15 is a Friday
        assert_eq!(day_of_week(&ts), Value::Integer(6));
        assert_eq!(weekday(&ts), Value::Integer(4));
        assert_eq!(day_of_year(&ts), Value::Integer(75));
        assert_eq!(week_of_year(&ts), Value::Integer(11));
        assert_eq!(hour(&ts), Value::Integer(10));
        assert_eq!(minute(&ts), Value::Integer(30));
        assert_eq!(second(&ts), Value::Integer(45));
        assert_eq!(microsecond(&ts), Value::Integer(123_456));
        assert_eq!(month_name(&ts), Value::varchar("March"));
        assert_eq!(day_name(&ts), Value::varchar("Friday"));

        assert_eq!(year(&Value::varchar("1999-12-31")), Value::Integer(1999));
        assert_eq!(day(&Value::Date(1)), Value::Integer(2));
        assert_eq!(hour(&Value::varchar("23:59:58")), Value::Integer(23));
        assert_eq!(time_to_sec(&Value::Time(3_661 * MICROS_PER_SECOND)), Value::BigInt(3_661));
        assert_eq!(year(&Value::varchar("not a date")), Value::Null);
        assert_eq!(month(&Value::Time(0)), Value::Null);
    }

    #[test]
    fn test_date_format_and_unix_timestamp() {
        let ctx = fixed_context();
        let ts = now(&ctx, 6);
        assert_eq!(
            date_format(&ts, &Value::varchar("%Y-%m-%d %H:%i:%s.%f")),
            Value::varchar("2024-03-15 10:30:45.123456")
        );
        assert_eq!(
            date_format(&ts, &Value::varchar("%W %M %D, %y %r %%")),
            Value::varchar("Friday March 15th, 24 10:30:45 AM %")
        );
        assert_eq!(
            date_format(&Value::varchar("2024-01-02"), &Value::varchar("%e/%c %a %b %j")),
            Value::varchar("2/1 Tue Jan 002")
        );
        assert_eq!(date_format(&Value::varchar("nope"), &Value::varchar("%Y")), Value::Null);

        assert_eq!(unix_timestamp(&ctx, &[]), Value::BigInt(ctx.query_time.timestamp()));
        assert_eq!(unix_timestamp(&ctx, &[ts]), Value::BigInt(ctx.query_time.timestamp()));
        assert_eq!(unix_timestamp(&ctx, &[Value::varchar("1970-01-02")]), Value::BigInt(86_400));
        assert_eq!(unix_timestamp(&ctx, &[Value::varchar("1960-01-01")]), Value::BigInt(0));
    }

    #[test]
    fn test_stable_within_statement() -> PrismDBResult<()> {
        let ctx = fixed_context();
        let first = (NOW.function)(&ctx, &[])?;
        let second = (NOW.function)(&ctx, &[])?;
        assert_eq!(first, second);
        Ok(())
    }
}
