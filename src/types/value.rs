use crate::common::error::{PrismDBError, PrismDBResult};
use crate::types::logical_type::LogicalType;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Days between 0001-01-01 (CE day 1) and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Represents a single value with type information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value (type is stored separately)
    Null,
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Integer(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    Varchar(String),
    /// Days since 1970-01-01
    Date(i32),
    /// Microseconds since midnight
    Time(i64),
    /// Microseconds since 1970-01-01 00:00:00 UTC
    Timestamp(i64),
}

impl Value {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the logical type of this value
    pub fn get_type(&self) -> LogicalType {
        match self {
            Value::Null => LogicalType::Null,
            Value::Boolean(_) => LogicalType::Boolean,
            Value::TinyInt(_) => LogicalType::TinyInt,
            Value::SmallInt(_) => LogicalType::SmallInt,
            Value::Integer(_) => LogicalType::Integer,
            Value::BigInt(_) => LogicalType::BigInt,
            Value::Float(_) => LogicalType::Float,
            Value::Double(_) => LogicalType::Double,
            Value::Varchar(_) => LogicalType::Varchar,
            Value::Date(_) => LogicalType::Date,
            Value::Time(_) => LogicalType::Time,
            Value::Timestamp(_) => LogicalType::Timestamp,
        }
    }

    /// Try to extract a boolean value
    pub fn try_as_boolean(&self) -> PrismDBResult<bool> {
        match self {
            Value::Boolean(value) => Ok(*value),
            Value::Null => Err(PrismDBError::InvalidValue(
                "Cannot extract boolean from NULL".to_string(),
            )),
            // MySQL truthiness: any non-zero number is true
            v if v.get_type().is_numeric() => Ok(v.try_as_f64()? != 0.0),
            Value::Varchar(s) => Ok(s.trim().parse::<f64>().map(|n| n != 0.0).unwrap_or(false)),
            _ => Err(PrismDBError::Type(format!(
                "Cannot extract boolean from {}",
                self.get_type()
            ))),
        }
    }

    /// Try to extract an i32 value
    pub fn try_as_i32(&self) -> PrismDBResult<i32> {
        match self {
            Value::Integer(value) => Ok(*value),
            Value::TinyInt(value) => Ok(*value as i32),
            Value::SmallInt(value) => Ok(*value as i32),
            Value::BigInt(value) => i32::try_from(*value).map_err(|_| {
                PrismDBError::InvalidValue(format!("Value {} out of range for INTEGER", value))
            }),
            Value::Null => Err(PrismDBError::InvalidValue(
                "Cannot extract i32 from NULL".to_string(),
            )),
            _ => Err(PrismDBError::Type(format!(
                "Cannot extract i32 from {}",
                self.get_type()
            ))),
        }
    }

    /// Try to extract an i64 value
    pub fn try_as_i64(&self) -> PrismDBResult<i64> {
        match self {
            Value::BigInt(value) => Ok(*value),
            Value::Integer(value) => Ok(*value as i64),
            Value::SmallInt(value) => Ok(*value as i64),
            Value::TinyInt(value) => Ok(*value as i64),
            Value::Boolean(value) => Ok(*value as i64),
            Value::Date(value) => Ok(*value as i64),
            Value::Time(value) => Ok(*value),
            Value::Timestamp(value) => Ok(*value),
            Value::Null => Err(PrismDBError::InvalidValue(
                "Cannot extract i64 from NULL".to_string(),
            )),
            _ => Err(PrismDBError::Type(format!(
                "Cannot extract i64 from {}",
                self.get_type()
            ))),
        }
    }

    /// Try to extract an f64 value
    pub fn try_as_f64(&self) -> PrismDBResult<f64> {
        match self {
            Value::Double(value) => Ok(*value),
            Value::Float(value) => Ok(*value as f64),
            Value::BigInt(value) => Ok(*value as f64),
            Value::Integer(value) => Ok(*value as f64),
            Value::SmallInt(value) => Ok(*value as f64),
            Value::TinyInt(value) => Ok(*value as f64),
            Value::Boolean(value) => Ok(if *value { 1.0 } else { 0.0 }),
            Value::Varchar(value) => value.trim().parse::<f64>().map_err(|_| {
                PrismDBError::InvalidValue(format!("Cannot convert '{}' to a number", value))
            }),
            Value::Null => Err(PrismDBError::InvalidValue(
                "Cannot extract f64 from NULL".to_string(),
            )),
            _ => Err(PrismDBError::Type(format!(
                "Cannot extract f64 from {}",
                self.get_type()
            ))),
        }
    }

    /// Try to extract a string value
    pub fn try_as_string(&self) -> PrismDBResult<String> {
        match self {
            Value::Varchar(value) => Ok(value.clone()),
            Value::Null => Err(PrismDBError::InvalidValue(
                "Cannot extract string from NULL".to_string(),
            )),
            _ => Err(PrismDBError::Type(format!(
                "Cannot extract string from {}",
                self.get_type()
            ))),
        }
    }

    /// Render this value the way string functions see it (no quoting).
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::Varchar(value) => value.clone(),
            Value::Boolean(value) => if *value { "1" } else { "0" }.to_string(),
            other => other.to_string(),
        }
    }

    /// Create a boolean value
    pub fn boolean(value: bool) -> Self {
        Value::Boolean(value)
    }

    /// Create a tiny integer value
    pub fn tinyint(value: i8) -> Self {
        Value::TinyInt(value)
    }

    /// Create an integer value
    pub fn integer(value: i32) -> Self {
        Value::Integer(value)
    }

    /// Create a big integer value
    pub fn bigint(value: i64) -> Self {
        Value::BigInt(value)
    }

    /// Create a double value
    pub fn double(value: f64) -> Self {
        Value::Double(value)
    }

    /// Create a string value
    pub fn varchar(value: impl Into<String>) -> Self {
        Value::Varchar(value.into())
    }

    /// Create a date value
    pub fn date(value: i32) -> Self {
        Value::Date(value)
    }

    /// Create a timestamp value
    pub fn timestamp(value: i64) -> Self {
        Value::Timestamp(value)
    }

    /// Cast this value to a target type
    pub fn cast_to(&self, target_type: &LogicalType) -> PrismDBResult<Value> {
        if self.is_null() {
            return Ok(Value::Null);
        }

        if &self.get_type() == target_type {
            return Ok(self.clone());
        }

        let source_type = self.get_type();
        match target_type {
            LogicalType::Boolean => Ok(Value::Boolean(self.try_as_boolean()?)),
            LogicalType::TinyInt => {
                let v = self.cast_integral()?;
                i8::try_from(v).map(Value::TinyInt).map_err(|_| out_of_range(v, target_type))
            }
            LogicalType::SmallInt => {
                let v = self.cast_integral()?;
                i16::try_from(v).map(Value::SmallInt).map_err(|_| out_of_range(v, target_type))
            }
            LogicalType::Integer => {
                let v = self.cast_integral()?;
                i32::try_from(v).map(Value::Integer).map_err(|_| out_of_range(v, target_type))
            }
            LogicalType::BigInt => Ok(Value::BigInt(self.cast_integral()?)),
            LogicalType::Float => Ok(Value::Float(self.try_as_f64()? as f32)),
            LogicalType::Double => Ok(Value::Double(self.try_as_f64()?)),
            LogicalType::Varchar => Ok(Value::Varchar(self.to_plain_string())),
            LogicalType::Date => match self {
                Value::Timestamp(micros) => Ok(Value::Date(micros.div_euclid(86_400_000_000) as i32)),
                Value::Varchar(s) => {
                    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
                        PrismDBError::InvalidValue(format!("Cannot cast '{}' to DATE", s))
                    })?;
                    Ok(Value::Date(days_since_epoch(date)))
                }
                _ => Err(cannot_cast(&source_type, target_type)),
            },
            LogicalType::Time => match self {
                Value::Timestamp(micros) => Ok(Value::Time(micros.rem_euclid(86_400_000_000))),
                Value::Varchar(s) => {
                    let time = NaiveTime::parse_from_str(s.trim(), "%H:%M:%S%.f").map_err(|_| {
                        PrismDBError::InvalidValue(format!("Cannot cast '{}' to TIME", s))
                    })?;
                    Ok(Value::Time(
                        time.num_seconds_from_midnight() as i64 * 1_000_000
                            + (time.nanosecond() / 1_000) as i64,
                    ))
                }
                _ => Err(cannot_cast(&source_type, target_type)),
            },
            LogicalType::Timestamp => match self {
                Value::Date(days) => Ok(Value::Timestamp(*days as i64 * 86_400_000_000)),
                Value::Varchar(s) => {
                    let ts = chrono::NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S%.f")
                        .map_err(|_| {
                            PrismDBError::InvalidValue(format!("Cannot cast '{}' to TIMESTAMP", s))
                        })?;
                    Ok(Value::Timestamp(ts.and_utc().timestamp_micros()))
                }
                _ => Err(cannot_cast(&source_type, target_type)),
            },
            LogicalType::Null | LogicalType::Invalid => Err(cannot_cast(&source_type, target_type)),
        }
    }

    fn cast_integral(&self) -> PrismDBResult<i64> {
        match self {
            Value::Float(_) | Value::Double(_) | Value::Varchar(_) => {
                Ok(self.try_as_f64()?.round() as i64)
            }
            _ => self.try_as_i64(),
        }
    }

    /// Compare two values for ordering
    pub fn compare(&self, other: &Value) -> PrismDBResult<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Ok(Ordering::Equal),
            // NULL sorts before any value
            (Value::Null, _) => Ok(Ordering::Less),
            (_, Value::Null) => Ok(Ordering::Greater),
            (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
            (Value::Varchar(a), Value::Varchar(b)) => Ok(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Ok(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Ok(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Ok(a.cmp(b)),
            (a, b) if a.get_type().is_integral() && b.get_type().is_integral() => {
                Ok(a.try_as_i64()?.cmp(&b.try_as_i64()?))
            }
            (a, b)
                if (a.get_type().is_numeric() || a.get_type().is_string())
                    && (b.get_type().is_numeric() || b.get_type().is_string()) =>
            {
                let left = a.try_as_f64()?;
                let right = b.try_as_f64()?;
                left.partial_cmp(&right).ok_or_else(|| {
                    PrismDBError::InvalidValue("Cannot compare NaN values".to_string())
                })
            }
            _ => Err(PrismDBError::Type(format!(
                "Cannot compare {} and {}",
                self.get_type(),
                other.get_type()
            ))),
        }
    }
}

fn cannot_cast(from: &LogicalType, to: &LogicalType) -> PrismDBError {
    PrismDBError::Type(format!("Cannot cast from {} to {}", from, to))
}

fn out_of_range(value: i64, target: &LogicalType) -> PrismDBError {
    PrismDBError::InvalidValue(format!("Value {} out of range for {}", value, target))
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::TinyInt(value) => write!(f, "{}", value),
            Value::SmallInt(value) => write!(f, "{}", value),
            Value::Integer(value) => write!(f, "{}", value),
            Value::BigInt(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", value),
            Value::Double(value) => write!(f, "{}", value),
            Value::Varchar(value) => write!(f, "'{}'", value.replace('\'', "''")),
            Value::Date(days) => {
                match NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE) {
                    Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
                    None => write!(f, "DATE({})", days),
                }
            }
            Value::Time(micros) => {
                let secs = micros.div_euclid(1_000_000) as u32;
                let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
                match NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos) {
                    Some(time) => write!(f, "{}", time.format("%H:%M:%S%.6f")),
                    None => write!(f, "TIME({})", micros),
                }
            }
            Value::Timestamp(micros) => match DateTime::from_timestamp_micros(*micros) {
                Some(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.6f")),
                None => write!(f, "TIMESTAMP({})", micros),
            },
        }
    }
}
