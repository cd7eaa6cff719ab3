//! Session information functions

use crate::catalog::function::FunctionDescriptor;
use crate::expression::function::{FunctionClassification, ReturnType, ScalarFunction};
use crate::types::{LogicalType, Value};

pub static CONNECTION_ID: ScalarFunction = ScalarFunction {
    name: "CONNECTION_ID",
    classification: FunctionClassification::System,
    min_args: 0,
    max_args: Some(0),
    return_type: ReturnType::Fixed(LogicalType::BigInt),
    propagates_null: false,
    may_return_null: false,
    is_deterministic: false,
    check_arguments: None,
    function: |ctx, _| Ok(Value::BigInt(ctx.connection_id as i64)),
};

/// USER() and CURRENT_USER() both report `user@host`
pub static USER: ScalarFunction = ScalarFunction {
    name: "USER",
    classification: FunctionClassification::System,
    min_args: 0,
    max_args: Some(0),
    return_type: ReturnType::Fixed(LogicalType::Varchar),
    propagates_null: false,
    may_return_null: false,
    is_deterministic: false,
    check_arguments: None,
    function: |ctx, _| Ok(Value::Varchar(ctx.user_at_host())),
};

pub fn system_functions() -> Vec<FunctionDescriptor> {
    vec![
        CONNECTION_ID.descriptor(),
        USER.descriptor(),
        USER.descriptor_as("CURRENT_USER"),
    ]
}
