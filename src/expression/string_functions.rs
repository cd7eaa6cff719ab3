//! String Functions
//!
//! Non-string arguments are converted to their plain text form first, so
//! `UPPER(5)` is `'5'`.

use crate::catalog::function::FunctionDescriptor;
use crate::common::error::{PrismDBError, PrismDBResult};
use crate::expression::function::{
    argument, FunctionClassification, ReturnType, ScalarFunction,
};
use crate::types::{LogicalType, Value};
use base64::{engine::general_purpose, Engine as _};

/// Longest string REPEAT, LPAD and RPAD will build; longer results are NULL
pub const MAX_STRING_RESULT_LENGTH: usize = 16 * 1024 * 1024;

fn count_arg(name: &str, value: &Value) -> PrismDBResult<i64> {
    value
        .try_as_i64()
        .or_else(|_| value.try_as_f64().map(|f| f.round() as i64))
        .map_err(|_| PrismDBError::Type(format!("{} requires an integer count", name)))
}

/// UPPER/UCASE - Convert to uppercase
pub fn upper(value: &Value) -> PrismDBResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        v => Ok(Value::Varchar(v.to_plain_string().to_uppercase())),
    }
}

/// LOWER/LCASE - Convert to lowercase
pub fn lower(value: &Value) -> PrismDBResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        v => Ok(Value::Varchar(v.to_plain_string().to_lowercase())),
    }
}

/// LENGTH - Number of bytes in string
pub fn length(value: &Value) -> PrismDBResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        v => Ok(Value::BigInt(v.to_plain_string().len() as i64)),
    }
}

/// CHAR_LENGTH - Number of characters in string
pub fn char_length(value: &Value) -> PrismDBResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        v => Ok(Value::BigInt(v.to_plain_string().chars().count() as i64)),
    }
}

/// REVERSE - Reverse a string
pub fn reverse(value: &Value) -> PrismDBResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        v => Ok(Value::Varchar(v.to_plain_string().chars().rev().collect())),
    }
}

/// TRIM - Remove leading and trailing spaces
pub fn trim(value: &Value) -> PrismDBResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        v => Ok(Value::Varchar(v.to_plain_string().trim_matches(' ').to_string())),
    }
}

/// LTRIM - Remove leading spaces
pub fn ltrim(value: &Value) -> PrismDBResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        v => Ok(Value::Varchar(
            v.to_plain_string().trim_start_matches(' ').to_string(),
        )),
    }
}

/// RTRIM - Remove trailing spaces
pub fn rtrim(value: &Value) -> PrismDBResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        v => Ok(Value::Varchar(
            v.to_plain_string().trim_end_matches(' ').to_string(),
        )),
    }
}

/// ASCII - Numeric value of the first byte; 0 for the empty string
pub fn ascii(value: &Value) -> PrismDBResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        v => {
            let code = v.to_plain_string().bytes().next().unwrap_or(0);
            Ok(Value::Integer(code as i32))
        }
    }
}

/// HEX - Hexadecimal form of a number or of a string's bytes
pub fn hex(value: &Value) -> PrismDBResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Varchar(s) => Ok(Value::Varchar(hex::encode_upper(s.as_bytes()))),
        v if v.get_type().is_integral() => Ok(Value::Varchar(format!("{:X}", v.try_as_i64()? as u64))),
        v if v.get_type().is_floating_point() => {
            let rounded = v.try_as_f64()?.round() as i64;
            Ok(Value::Varchar(format!("{:X}", rounded as u64)))
        }
        v => Ok(Value::Varchar(hex::encode_upper(v.to_plain_string()))),
    }
}

/// CONCAT - Concatenate all arguments; NULL if any is NULL
pub fn concat(values: &[Value]) -> PrismDBResult<Value> {
    let mut result = String::new();
    for value in values {
        if value.is_null() {
            return Ok(Value::Null);
        }
        result.push_str(&value.to_plain_string());
    }
    Ok(Value::Varchar(result))
}

/// REPEAT - Repeat a string n times; empty for n <= 0
pub fn repeat(value: &Value, n: &Value) -> PrismDBResult<Value> {
    if value.is_null() || n.is_null() {
        return Ok(Value::Null);
    }
    let s = value.to_plain_string();
    let count = count_arg("REPEAT", n)?;
    if count <= 0 || s.is_empty() {
        return Ok(Value::Varchar(String::new()));
    }
    match s.len().checked_mul(count as usize) {
        Some(len) if len <= MAX_STRING_RESULT_LENGTH => Ok(Value::Varchar(s.repeat(count as usize))),
        _ => Ok(Value::Null),
    }
}

/// LEFT - Extract leftmost characters
pub fn left(value: &Value, n: &Value) -> PrismDBResult<Value> {
    if value.is_null() || n.is_null() {
        return Ok(Value::Null);
    }
    let count = count_arg("LEFT", n)?.max(0) as usize;
    Ok(Value::Varchar(value.to_plain_string().chars().take(count).collect()))
}

/// SUBSTRING/SUBSTR/MID - Characters from a 1-based position.
///
/// A negative position counts from the end; position 0 or a non-positive
/// length gives the empty string.
pub fn substring(value: &Value, start: &Value, len: Option<&Value>) -> PrismDBResult<Value> {
    let chars: Vec<char> = value.to_plain_string().chars().collect();
    let start = count_arg("SUBSTRING", start)?;
    let total = chars.len() as i64;
    let begin = match start {
        0 => return Ok(Value::Varchar(String::new())),
        s if s > 0 => s - 1,
        s => total + s,
    };
    if begin < 0 || begin >= total {
        return Ok(Value::Varchar(String::new()));
    }
    let take = match len {
        Some(len) => count_arg("SUBSTRING", len)?.max(0),
        None => total,
    };
    Ok(Value::Varchar(
        chars[begin as usize..].iter().take(take as usize).collect(),
    ))
}

/// REPLACE - Replace every occurrence of `from` with `to`
pub fn replace(value: &Value, from: &Value, to: &Value) -> PrismDBResult<Value> {
    let s = value.to_plain_string();
    let from = from.to_plain_string();
    if from.is_empty() {
        return Ok(Value::Varchar(s));
    }
    Ok(Value::Varchar(s.replace(&from, &to.to_plain_string())))
}

/// CONCAT_WS - Join with a separator, skipping NULL arguments.
///
/// A NULL separator gives NULL.
pub fn concat_ws(values: &[Value]) -> PrismDBResult<Value> {
    let Some((separator, rest)) = values.split_first() else {
        return Ok(Value::Null);
    };
    if separator.is_null() {
        return Ok(Value::Null);
    }
    let parts: Vec<String> = rest
        .iter()
        .filter(|v| !v.is_null())
        .map(Value::to_plain_string)
        .collect();
    Ok(Value::Varchar(parts.join(&separator.to_plain_string())))
}

/// Shared body of LPAD and RPAD
fn pad(name: &str, value: &Value, len: &Value, fill: &Value, left: bool) -> PrismDBResult<Value> {
    let len = count_arg(name, len)?;
    if len < 0 || len as usize > MAX_STRING_RESULT_LENGTH {
        return Ok(Value::Null);
    }
    let len = len as usize;
    let chars: Vec<char> = value.to_plain_string().chars().collect();
    if chars.len() >= len {
        return Ok(Value::Varchar(chars[..len].iter().collect()));
    }
    let fill: Vec<char> = fill.to_plain_string().chars().collect();
    if fill.is_empty() {
        return Ok(Value::Null);
    }
    let padding: String = fill.iter().cycle().take(len - chars.len()).collect();
    let body: String = chars.into_iter().collect();
    Ok(Value::Varchar(if left {
        padding + &body
    } else {
        body + &padding
    }))
}

/// LPAD - Left-pad to `len` characters; longer strings are cut to `len`
pub fn lpad(value: &Value, len: &Value, fill: &Value) -> PrismDBResult<Value> {
    pad("LPAD", value, len, fill, true)
}

/// RPAD - Right-pad to `len` characters; longer strings are cut to `len`
pub fn rpad(value: &Value, len: &Value, fill: &Value) -> PrismDBResult<Value> {
    pad("RPAD", value, len, fill, false)
}

/// INSTR - 1-based character position of the first occurrence; 0 if absent
pub fn instr(value: &Value, needle: &Value) -> PrismDBResult<Value> {
    let s = value.to_plain_string();
    let position = s
        .find(&needle.to_plain_string())
        .map_or(0, |byte| s[..byte].chars().count() as i64 + 1);
    Ok(Value::BigInt(position))
}

/// SUBSTRING_INDEX - Text before the `count`th delimiter, counting from the
/// right when `count` is negative.
pub fn substring_index(value: &Value, delimiter: &Value, count: &Value) -> PrismDBResult<Value> {
    let s = value.to_plain_string();
    let delimiter = delimiter.to_plain_string();
    let count = count_arg("SUBSTRING_INDEX", count)?;
    if count == 0 || delimiter.is_empty() {
        return Ok(Value::Varchar(String::new()));
    }
    let wanted = count.unsigned_abs() as usize;
    let result = if count > 0 {
        match s.match_indices(&delimiter).nth(wanted - 1) {
            Some((at, _)) => s[..at].to_string(),
            None => s,
        }
    } else {
        match s.rmatch_indices(&delimiter).nth(wanted - 1) {
            Some((at, _)) => s[at + delimiter.len()..].to_string(),
            None => s,
        }
    };
    Ok(Value::Varchar(result))
}

/// TO_BASE64 - Base64 form of the string's bytes
pub fn to_base64(value: &Value) -> PrismDBResult<Value> {
    Ok(Value::Varchar(
        general_purpose::STANDARD.encode(value.to_plain_string().as_bytes()),
    ))
}

/// FROM_BASE64 - Decode base64 text; NULL when it is not valid base64 or
/// does not decode to UTF-8.
pub fn from_base64(value: &Value) -> PrismDBResult<Value> {
    let decoded = general_purpose::STANDARD
        .decode(value.to_plain_string().trim().as_bytes())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok());
    Ok(decoded.map_or(Value::Null, Value::Varchar))
}

/// UNHEX - Decode hexadecimal text; NULL for invalid input
pub fn unhex(value: &Value) -> PrismDBResult<Value> {
    let mut text = value.to_plain_string();
    if text.len() % 2 == 1 {
        text.insert(0, '0');
    }
    let decoded = hex::decode(text)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok());
    Ok(decoded.map_or(Value::Null, Value::Varchar))
}

/// BIN - Binary form of an integer; negatives use 64-bit two's complement
pub fn bin(value: &Value) -> PrismDBResult<Value> {
    let n = count_arg("BIN", value)?;
    Ok(Value::Varchar(format!("{:b}", n as u64)))
}

/// BIT_LENGTH - Length of the string in bits
pub fn bit_length(value: &Value) -> PrismDBResult<Value> {
    Ok(Value::BigInt(value.to_plain_string().len() as i64 * 8))
}

fn soundex_code(c: char) -> Option<char> {
    match c {
        'B' | 'F' | 'P' | 'V' => Some('1'),
        'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => Some('2'),
        'D' | 'T' => Some('3'),
        'L' => Some('4'),
        'M' | 'N' => Some('5'),
        'R' => Some('6'),
        _ => None,
    }
}

/// SOUNDEX - Phonetic code: the first letter, then digit codes padded to
/// at least four characters. Non-letters are ignored and longer codes are
/// not cut.
pub fn soundex(value: &Value) -> PrismDBResult<Value> {
    let mut code = String::new();
    let mut last = None;
    for c in value.to_plain_string().chars().filter(char::is_ascii_alphabetic) {
        let c = c.to_ascii_uppercase();
        let digit = soundex_code(c);
        if code.is_empty() {
            code.push(c);
        } else if let Some(d) = digit.filter(|d| Some(*d) != last) {
            code.push(d);
        }
        // H and W do not separate letters with the same code
        if !matches!(c, 'H' | 'W') {
            last = digit;
        }
    }
    if !code.is_empty() {
        while code.len() < 4 {
            code.push('0');
        }
    }
    Ok(Value::Varchar(code))
}

pub static UPPER: ScalarFunction = ScalarFunction {
    name: "UPPER",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| upper(argument(args, 0)?),
};

pub static LOWER: ScalarFunction = ScalarFunction {
    name: "LOWER",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| lower(argument(args, 0)?),
};

pub static LENGTH: ScalarFunction = ScalarFunction {
    name: "LENGTH",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::BigInt),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| length(argument(args, 0)?),
};

pub static CHAR_LENGTH: ScalarFunction = ScalarFunction {
    name: "CHAR_LENGTH",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::BigInt),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| char_length(argument(args, 0)?),
};

pub static REVERSE: ScalarFunction = ScalarFunction {
    name: "REVERSE",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| reverse(argument(args, 0)?),
};

pub static TRIM: ScalarFunction = ScalarFunction {
    name: "TRIM",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| trim(argument(args, 0)?),
};

pub static LTRIM: ScalarFunction = ScalarFunction {
    name: "LTRIM",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| ltrim(argument(args, 0)?),
};

pub static RTRIM: ScalarFunction = ScalarFunction {
    name: "RTRIM",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| rtrim(argument(args, 0)?),
};

pub static ASCII: ScalarFunction = ScalarFunction {
    name: "ASCII",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Integer),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| ascii(argument(args, 0)?),
};

pub static HEX: ScalarFunction = ScalarFunction {
    name: "HEX",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| hex(argument(args, 0)?),
};

pub static CONCAT: ScalarFunction = ScalarFunction {
    name: "CONCAT",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: None,
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| concat(args),
};

pub static REPEAT: ScalarFunction = ScalarFunction {
    name: "REPEAT",
    classification: FunctionClassification::String,
    min_args: 2,
    max_args: Some(2),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| repeat(argument(args, 0)?, argument(args, 1)?),
};

pub static LEFT: ScalarFunction = ScalarFunction {
    name: "LEFT",
    classification: FunctionClassification::String,
    min_args: 2,
    max_args: Some(2),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| left(argument(args, 0)?, argument(args, 1)?),
};

pub static SUBSTRING: ScalarFunction = ScalarFunction {
    name: "SUBSTRING",
    classification: FunctionClassification::String,
    min_args: 2,
    max_args: Some(3),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| substring(argument(args, 0)?, argument(args, 1)?, args.get(2)),
};

pub static REPLACE: ScalarFunction = ScalarFunction {
    name: "REPLACE",
    classification: FunctionClassification::String,
    min_args: 3,
    max_args: Some(3),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| replace(argument(args, 0)?, argument(args, 1)?, argument(args, 2)?),
};

pub static CONCAT_WS: ScalarFunction = ScalarFunction {
    name: "CONCAT_WS",
    classification: FunctionClassification::String,
    min_args: 2,
    max_args: None,
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: false,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| concat_ws(args),
};

pub static LPAD: ScalarFunction = ScalarFunction {
    name: "LPAD",
    classification: FunctionClassification::String,
    min_args: 3,
    max_args: Some(3),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| lpad(argument(args, 0)?, argument(args, 1)?, argument(args, 2)?),
};

pub static RPAD: ScalarFunction = ScalarFunction {
    name: "RPAD",
    classification: FunctionClassification::String,
    min_args: 3,
    max_args: Some(3),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| rpad(argument(args, 0)?, argument(args, 1)?, argument(args, 2)?),
};

pub static INSTR: ScalarFunction = ScalarFunction {
    name: "INSTR",
    classification: FunctionClassification::String,
    min_args: 2,
    max_args: Some(2),
    return_type: ReturnType::Fixed(LogicalType::BigInt),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| instr(argument(args, 0)?, argument(args, 1)?),
};

pub static SUBSTRING_INDEX: ScalarFunction = ScalarFunction {
    name: "SUBSTRING_INDEX",
    classification: FunctionClassification::String,
    min_args: 3,
    max_args: Some(3),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| substring_index(argument(args, 0)?, argument(args, 1)?, argument(args, 2)?),
};

pub static TO_BASE64: ScalarFunction = ScalarFunction {
    name: "TO_BASE64",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| to_base64(argument(args, 0)?),
};

pub static FROM_BASE64: ScalarFunction = ScalarFunction {
    name: "FROM_BASE64",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| from_base64(argument(args, 0)?),
};

pub static UNHEX: ScalarFunction = ScalarFunction {
    name: "UNHEX",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: true,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| unhex(argument(args, 0)?),
};

pub static BIN: ScalarFunction = ScalarFunction {
    name: "BIN",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| bin(argument(args, 0)?),
};

pub static BIT_LENGTH: ScalarFunction = ScalarFunction {
    name: "BIT_LENGTH",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::BigInt),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| bit_length(argument(args, 0)?),
};

pub static SOUNDEX: ScalarFunction = ScalarFunction {
    name: "SOUNDEX",
    classification: FunctionClassification::String,
    min_args: 1,
    max_args: Some(1),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: true,
    may_return_null: false,
    is_deterministic: true,
    check_arguments: None,
    function: |_, args| soundex(argument(args, 0)?),
};

/// String builtins
pub fn string_functions() -> Vec<FunctionDescriptor> {
    vec![
        UPPER.descriptor(),
        UPPER.descriptor_as("UCASE"),
        LOWER.descriptor(),
        LOWER.descriptor_as("LCASE"),
        LENGTH.descriptor(),
        CHAR_LENGTH.descriptor(),
        CHAR_LENGTH.descriptor_as("CHARACTER_LENGTH"),
        REVERSE.descriptor(),
        TRIM.descriptor(),
        LTRIM.descriptor(),
        RTRIM.descriptor(),
        ASCII.descriptor(),
        HEX.descriptor(),
        CONCAT.descriptor(),
        REPEAT.descriptor(),
        LEFT.descriptor(),
        SUBSTRING.descriptor(),
        SUBSTRING.descriptor_as("SUBSTR"),
        SUBSTRING.descriptor_as("MID"),
        REPLACE.descriptor(),
        CONCAT_WS.descriptor(),
        LPAD.descriptor(),
        RPAD.descriptor(),
        INSTR.descriptor(),
        SUBSTRING_INDEX.descriptor(),
        TO_BASE64.descriptor(),
        FROM_BASE64.descriptor(),
        UNHEX.descriptor(),
        BIN.descriptor(),
        BIT_LENGTH.descriptor(),
        SOUNDEX.descriptor(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_length() -> PrismDBResult<()> {
        assert_eq!(upper(&Value::varchar("straße"))?, Value::varchar("STRASSE"));
        assert_eq!(lower(&Value::Integer(5))?, Value::varchar("5"));
        assert_eq!(length(&Value::varchar("héllo"))?, Value::BigInt(6));
        assert_eq!(char_length(&Value::varchar("héllo"))?, Value::BigInt(5));
        Ok(())
    }

    #[test]
    fn test_trim_family() -> PrismDBResult<()> {
        assert_eq!(trim(&Value::varchar("  a b  "))?, Value::varchar("a b"));
        assert_eq!(ltrim(&Value::varchar("  a "))?, Value::varchar("a "));
        assert_eq!(rtrim(&Value::varchar(" a  "))?, Value::varchar(" a"));
        Ok(())
    }

    #[test]
    fn test_hex() -> PrismDBResult<()> {
        assert_eq!(hex(&Value::Integer(255))?, Value::varchar("FF"));
        assert_eq!(hex(&Value::varchar("abc"))?, Value::varchar("616263"));
        assert_eq!(hex(&Value::BigInt(-1))?, Value::varchar("FFFFFFFFFFFFFFFF"));
        Ok(())
    }

    #[test]
    fn test_concat_repeat_left() -> PrismDBResult<()> {
        assert_eq!(
            concat(&[Value::varchar("a"), Value::Integer(1), Value::varchar("b")])?,
            Value::varchar("a1b")
        );
        assert_eq!(concat(&[Value::varchar("a"), Value::Null])?, Value::Null);
        assert_eq!(repeat(&Value::varchar("ab"), &Value::Integer(3))?, Value::varchar("ababab"));
        assert_eq!(repeat(&Value::varchar("ab"), &Value::Integer(-1))?, Value::varchar(""));
        assert_eq!(repeat(&Value::varchar("ab"), &Value::BigInt(i64::MAX))?, Value::Null);
        assert_eq!(left(&Value::varchar("héllo"), &Value::Integer(2))?, Value::varchar("hé"));
        assert_eq!(reverse(&Value::varchar("abc"))?, Value::varchar("cba"));
        assert_eq!(ascii(&Value::varchar(""))?, Value::Integer(0));
        assert_eq!(ascii(&Value::varchar("a"))?, Value::Integer(97));
        Ok(())
    }

    #[test]
    fn test_substring_family() -> PrismDBResult<()> {
        let s = Value::varchar("Quadratically");
        assert_eq!(substring(&s, &Value::Integer(5), None)?, Value::varchar("ratically"));
        assert_eq!(substring(&s, &Value::Integer(5), Some(&Value::Integer(6)))?, Value::varchar("ratica"));
        assert_eq!(substring(&s, &Value::Integer(-3), None)?, Value::varchar("lly"));
        assert_eq!(substring(&s, &Value::Integer(0), None)?, Value::varchar(""));
        assert_eq!(substring(&s, &Value::Integer(99), None)?, Value::varchar(""));
        assert_eq!(substring(&s, &Value::Integer(-99), None)?, Value::varchar(""));
        assert_eq!(substring(&Value::varchar("héllo"), &Value::Integer(2), Some(&Value::Integer(2)))?, Value::varchar("él"));

        let url = Value::varchar("www.mysql.com");
        let dot = Value::varchar(".");
        assert_eq!(substring_index(&url, &dot, &Value::Integer(2))?, Value::varchar("www.mysql"));
        assert_eq!(substring_index(&url, &dot, &Value::Integer(-2))?, Value::varchar("mysql.com"));
        assert_eq!(substring_index(&url, &dot, &Value::Integer(9))?, url);
        assert_eq!(substring_index(&url, &dot, &Value::Integer(0))?, Value::varchar(""));

        assert_eq!(instr(&Value::varchar("foobarbar"), &Value::varchar("bar"))?, Value::BigInt(4));
        assert_eq!(instr(&Value::varchar("xbar"), &Value::varchar("foobar"))?, Value::BigInt(0));
        assert_eq!(instr(&Value::varchar("héllo"), &Value::varchar("l"))?, Value::BigInt(3));
        Ok(())
    }

    #[test]
    fn test_replace_pad_concat_ws() -> PrismDBResult<()> {
        assert_eq!(
            replace(&Value::varchar("www.mysql.com"), &Value::varchar("w"), &Value::varchar("Ww"))?,
            Value::varchar("WwWwWw.mysql.com")
        );
        assert_eq!(
            replace(&Value::varchar("abc"), &Value::varchar(""), &Value::varchar("x"))?,
            Value::varchar("abc")
        );

        assert_eq!(lpad(&Value::varchar("hi"), &Value::Integer(4), &Value::varchar("??"))?, Value::varchar("??hi"));
        assert_eq!(lpad(&Value::varchar("hi"), &Value::Integer(1), &Value::varchar("??"))?, Value::varchar("h"));
        assert_eq!(rpad(&Value::varchar("hi"), &Value::Integer(5), &Value::varchar("?!"))?, Value::varchar("hi?!?"));
        assert_eq!(rpad(&Value::varchar("hi"), &Value::Integer(5), &Value::varchar(""))?, Value::Null);
        assert_eq!(rpad(&Value::varchar("hi"), &Value::Integer(-1), &Value::varchar("x"))?, Value::Null);

        assert_eq!(
            concat_ws(&[Value::varchar(","), Value::varchar("a"), Value::Null, Value::Integer(1)])?,
            Value::varchar("a,1")
        );
        assert_eq!(concat_ws(&[Value::Null, Value::varchar("a")])?, Value::Null);
        Ok(())
    }

    #[test]
    fn test_encodings() -> PrismDBResult<()> {
        assert_eq!(to_base64(&Value::varchar("abc"))?, Value::varchar("YWJj"));
        assert_eq!(from_base64(&Value::varchar("YWJj"))?, Value::varchar("abc"));
        assert_eq!(from_base64(&Value::varchar("not base64!"))?, Value::Null);

        assert_eq!(unhex(&Value::varchar("4D7953514C"))?, Value::varchar("MySQL"));
        assert_eq!(unhex(&Value::varchar("GG"))?, Value::Null);
        assert_eq!(unhex(&Value::Integer(41))?, Value::varchar("A"));

        assert_eq!(bin(&Value::Integer(12))?, Value::varchar("1100"));
        assert_eq!(bin(&Value::Integer(0))?, Value::varchar("0"));
        assert_eq!(bit_length(&Value::varchar("text"))?, Value::BigInt(32));
        Ok(())
    }

    #[test]
    fn test_soundex() -> PrismDBResult<()> {
        assert_eq!(soundex(&Value::varchar("Hello"))?, Value::varchar("H400"));
        assert_eq!(soundex(&Value::varchar("Robert"))?, Value::varchar("R163"));
        assert_eq!(soundex(&Value::varchar("Quadratically"))?, Value::varchar("Q36324"));
        assert_eq!(soundex(&Value::varchar("Pfister"))?, Value::varchar("P236"));
        assert_eq!(soundex(&Value::varchar("123"))?, Value::varchar(""));
        Ok(())
    }
}
