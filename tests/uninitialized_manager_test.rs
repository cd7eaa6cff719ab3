//! The process-wide manager before and after startup wiring.
//!
//! Kept in its own test binary so no other test installs the manager first.

use prism_defaults::catalog::{
    expression_to_column_default_value, must_string_to_column_default_value,
};
use prism_defaults::expression::LiteralExpression;
use prism_defaults::{
    builtin_column_default_manager, column_default_manager, install_column_default_manager,
    string_to_column_default_value, Database, ExecutionContext, ExpressionRef, PrismDBError,
    PrismDBResult, Value,
};
use std::sync::Arc;

#[test]
fn test_manager_lifecycle() -> PrismDBResult<()> {
    let ctx = ExecutionContext::empty();

    assert!(matches!(
        column_default_manager(),
        Err(PrismDBError::UninitializedManager(_))
    ));
    assert!(matches!(
        string_to_column_default_value(&ctx, "2"),
        Err(PrismDBError::UninitializedManager(_))
    ));
    let unparsed: ExpressionRef = Arc::new(LiteralExpression::new(Value::Integer(1)));
    assert!(expression_to_column_default_value(&ctx, unparsed.clone(), true).is_err());

    install_column_default_manager(builtin_column_default_manager()?)?;
    assert!(matches!(
        install_column_default_manager(builtin_column_default_manager()?),
        Err(PrismDBError::Catalog(_))
    ));

    let resolved = expression_to_column_default_value(&ctx, unparsed, true)?;
    assert_eq!(resolved.to_string(), "1");
    assert_eq!(must_string_to_column_default_value(&ctx, "(1 + 1)").to_string(), "(1 + 1)");

    // Later databases share the installed manager.
    let db = Database::new_in_memory()?;
    assert!(std::ptr::eq(db.column_defaults(), column_default_manager()?));
    Ok(())
}

#[test]
#[should_panic(expected = "invalid column default")]
fn test_must_variant_panics_on_bad_text() {
    let manager = match builtin_column_default_manager() {
        Ok(manager) => manager,
        Err(err) => panic!("builtin manager failed: {}", err),
    };
    manager.must_string_to_column_default_value(&ExecutionContext::empty(), "(a)");
}
