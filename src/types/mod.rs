//! Type system module
//!
//! - LogicalType: SQL-level type abstractions
//! - Value: Single value containers with type information

pub mod logical_type;
pub mod value;

pub use logical_type::{LogicalType, TypeUtils};
pub use value::Value;
