use crate::common::error::{PrismDBError, PrismDBResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical types represent the SQL-level types that users interact with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalType {
    /// NULL type
    Null,
    /// Boolean type (TRUE/FALSE)
    Boolean,
    /// 8-bit signed integer
    TinyInt,
    /// 16-bit signed integer
    SmallInt,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    BigInt,
    /// 32-bit floating point
    Float,
    /// 64-bit double precision
    Double,
    /// Variable length string
    Varchar,
    /// Date value (days since 1970-01-01)
    Date,
    /// Time value (microseconds since midnight)
    Time,
    /// Timestamp value (microseconds since 1970-01-01 00:00:00 UTC)
    Timestamp,
    /// Invalid/unknown type
    Invalid,
}

impl LogicalType {
    /// Check if this type is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            LogicalType::TinyInt
                | LogicalType::SmallInt
                | LogicalType::Integer
                | LogicalType::BigInt
                | LogicalType::Float
                | LogicalType::Double
        )
    }

    /// Check if this type is integral (no fractional part)
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            LogicalType::TinyInt | LogicalType::SmallInt | LogicalType::Integer | LogicalType::BigInt
        )
    }

    /// Check if this type is floating point
    pub fn is_floating_point(&self) -> bool {
        matches!(self, LogicalType::Float | LogicalType::Double)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, LogicalType::Varchar)
    }

    /// Resolve a SQL type name as written in a column definition.
    pub fn from_sql_name(name: &str) -> PrismDBResult<LogicalType> {
        let upper = name.trim().to_uppercase();
        let base = upper.split('(').next().unwrap_or("").trim();
        match base {
            "BOOL" | "BOOLEAN" => Ok(LogicalType::Boolean),
            "TINYINT" | "INT1" => Ok(LogicalType::TinyInt),
            "SMALLINT" | "INT2" => Ok(LogicalType::SmallInt),
            "INT" | "INTEGER" | "INT4" | "MEDIUMINT" => Ok(LogicalType::Integer),
            "BIGINT" | "INT8" => Ok(LogicalType::BigInt),
            "FLOAT" | "REAL" | "FLOAT4" => Ok(LogicalType::Float),
            "DOUBLE" | "FLOAT8" | "DECIMAL" | "NUMERIC" => Ok(LogicalType::Double),
            "VARCHAR" | "CHAR" | "TEXT" | "STRING" => Ok(LogicalType::Varchar),
            "DATE" => Ok(LogicalType::Date),
            "TIME" => Ok(LogicalType::Time),
            "TIMESTAMP" | "DATETIME" => Ok(LogicalType::Timestamp),
            _ => Err(PrismDBError::Type(format!("Unknown type name: {}", name))),
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Boolean => write!(f, "BOOLEAN"),
            LogicalType::TinyInt => write!(f, "TINYINT"),
            LogicalType::SmallInt => write!(f, "SMALLINT"),
            LogicalType::Integer => write!(f, "INTEGER"),
            LogicalType::BigInt => write!(f, "BIGINT"),
            LogicalType::Float => write!(f, "FLOAT"),
            LogicalType::Double => write!(f, "DOUBLE"),
            LogicalType::Varchar => write!(f, "VARCHAR"),
            LogicalType::Date => write!(f, "DATE"),
            LogicalType::Time => write!(f, "TIME"),
            LogicalType::Timestamp => write!(f, "TIMESTAMP"),
            LogicalType::Null => write!(f, "NULL"),
            LogicalType::Invalid => write!(f, "INVALID"),
        }
    }
}

/// Type system utilities
pub struct TypeUtils;

impl TypeUtils {
    /// Get the smallest type that can hold both types
    pub fn get_max_type(type1: &LogicalType, type2: &LogicalType) -> PrismDBResult<LogicalType> {
        use LogicalType::*;

        if type1 == type2 {
            return Ok(*type1);
        }

        match (type1, type2) {
            (Null, other) | (other, Null) => Ok(*other),

            // Numeric type promotion
            (a, b) if a.is_numeric() && b.is_numeric() => {
                if a.is_floating_point() || b.is_floating_point() {
                    Ok(Double)
                } else if Self::integral_rank(a) >= Self::integral_rank(b) {
                    Ok(*a)
                } else {
                    Ok(*b)
                }
            }

            (Date, Timestamp) | (Timestamp, Date) => Ok(Timestamp),

            (Varchar, _) | (_, Varchar) => Ok(Varchar),

            _ => Err(PrismDBError::Type(format!(
                "Cannot find common type between {} and {}",
                type1, type2
            ))),
        }
    }

    fn integral_rank(logical_type: &LogicalType) -> u8 {
        match logical_type {
            LogicalType::TinyInt => 1,
            LogicalType::SmallInt => 2,
            LogicalType::Integer => 3,
            LogicalType::BigInt => 4,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_type_creation() {
        let int_type = LogicalType::Integer;
        assert!(int_type.is_numeric());
        assert!(int_type.is_integral());
        assert!(!int_type.is_floating_point());

        let float_type = LogicalType::Float;
        assert!(float_type.is_numeric());
        assert!(!float_type.is_integral());
        assert!(float_type.is_floating_point());
    }

    #[test]
    fn test_from_sql_name() -> PrismDBResult<()> {
        assert_eq!(LogicalType::from_sql_name("int")?, LogicalType::Integer);
        assert_eq!(LogicalType::from_sql_name("VARCHAR(255)")?, LogicalType::Varchar);
        assert_eq!(LogicalType::from_sql_name("datetime")?, LogicalType::Timestamp);
        assert!(LogicalType::from_sql_name("geometry").is_err());
        Ok(())
    }

    #[test]
    fn test_type_promotion() -> PrismDBResult<()> {
        let max_type = TypeUtils::get_max_type(&LogicalType::TinyInt, &LogicalType::BigInt)?;
        assert_eq!(max_type, LogicalType::BigInt);

        let max_type = TypeUtils::get_max_type(&LogicalType::Integer, &LogicalType::Float)?;
        assert_eq!(max_type, LogicalType::Double);

        assert!(TypeUtils::get_max_type(&LogicalType::Boolean, &LogicalType::Date).is_err());
        Ok(())
    }
}
