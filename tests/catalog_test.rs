//! Catalog Integration Tests
//!
//! Tables whose omitted columns are filled from their defaults at insert time.

use prism_defaults::{
    ColumnInfo, Database, DatabaseConfig, LogicalType, PrismDBError, PrismDBResult, TableInfo,
    Value,
};
use pretty_assertions::assert_eq;

fn events_table(db: &Database) -> PrismDBResult<TableInfo> {
    let ctx = db.connect("");
    Ok(TableInfo::new("events")
        .with_column(ColumnInfo::new("id", LogicalType::BigInt).not_null())
        .with_column(
            ColumnInfo::new("kind", LogicalType::Varchar)
                .not_null()
                .with_default(db.column_default(&ctx, "'click'")?),
        )
        .with_column(
            ColumnInfo::new("created", LogicalType::Timestamp)
                .with_default(db.column_default(&ctx, "CURRENT_TIMESTAMP")?),
        )
        .with_column(
            ColumnInfo::new("weight", LogicalType::Double)
                .with_default(db.column_default(&ctx, "(RAND() + 5)")?),
        ))
}

#[test]
fn test_insert_fills_defaults_per_row() -> PrismDBResult<()> {
    let db = Database::new(DatabaseConfig::in_memory())?;
    let table = db.catalog().create_table(events_table(&db)?)?;
    let ctx = db.connect("app");

    let mut guard = table.write();
    guard.insert(&ctx, &[("id", Value::Integer(1))])?;
    guard.insert(
        &ctx.next_statement(),
        &[("id", Value::Integer(2)), ("kind", Value::varchar("view"))],
    )?;

    let rows = guard.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][1], Value::varchar("click"));
    assert_eq!(rows[1][1], Value::varchar("view"));
    // CURRENT_TIMESTAMP without a precision drops fractional seconds
    assert_eq!(rows[0][2], Value::Timestamp(ctx.query_time.timestamp() * 1_000_000));

    for row in rows {
        let weight = row[3].try_as_f64()?;
        assert!((5.0..6.0).contains(&weight));
    }
    Ok(())
}

#[test]
fn test_invalid_literal_default_rejected_at_definition() -> PrismDBResult<()> {
    let db = Database::new_in_memory()?;
    let ctx = db.connect("");
    let info = TableInfo::new("bad").with_column(
        ColumnInfo::new("n", LogicalType::Integer).with_default(db.column_default(&ctx, "'abc'")?),
    );

    assert!(matches!(
        db.catalog().create_table(info),
        Err(PrismDBError::Catalog(msg)) if msg.contains("Invalid default value for 'n'")
    ));
    assert!(db.catalog().get_table("bad").is_err());
    Ok(())
}

#[test]
fn test_out_of_range_precision_rejected_at_definition() -> PrismDBResult<()> {
    let db = Database::new_in_memory()?;
    let table = db.catalog().create_table(events_table(&db)?)?;
    let ctx = db.connect("");

    assert!(matches!(
        db.column_default(&ctx, "(NOW(7))"),
        Err(PrismDBError::InvalidArgument(msg)) if msg.contains("Maximum is 6")
    ));
    assert!(matches!(
        db.column_default(&ctx, "CURRENT_TIMESTAMP(7)"),
        Err(PrismDBError::InvalidArgument(_))
    ));

    // The column keeps its earlier default
    let row = table.read().build_row(&ctx, &[("id", Value::Integer(1))])?;
    assert_eq!(row[2], Value::Timestamp(ctx.query_time.timestamp() * 1_000_000));
    Ok(())
}

#[test]
fn test_alter_defaults() -> PrismDBResult<()> {
    let db = Database::new_in_memory()?;
    let table = db.catalog().create_table(events_table(&db)?)?;
    let ctx = db.connect("");

    let mut guard = table.write();
    guard.set_column_default("weight", db.column_default(&ctx, "(PI())")?)?;
    let row = guard.build_row(&ctx, &[("id", Value::Integer(9))])?;
    assert_eq!(row[3], Value::Double(std::f64::consts::PI));

    guard.drop_column_default("weight")?;
    let row = guard.build_row(&ctx, &[("id", Value::Integer(9))])?;
    assert_eq!(row[3], Value::Null);

    guard.drop_column_default("kind")?;
    assert!(guard.build_row(&ctx, &[("id", Value::Integer(9))]).is_err());
    Ok(())
}

#[test]
fn test_table_info_serializes_defaults_as_text() -> PrismDBResult<()> {
    let db = Database::new_in_memory()?;
    let info = events_table(&db)?;

    let json = serde_json::to_string(&info)?;
    let loaded: TableInfo = serde_json::from_str(&json)?;
    let defaults: Vec<String> = loaded
        .columns
        .iter()
        .map(|c| c.default_value.to_string())
        .collect();
    assert_eq!(
        defaults,
        vec![
            "".to_string(),
            "'click'".to_string(),
            "CURRENT_TIMESTAMP()".to_string(),
            "(RAND() + 5)".to_string(),
        ]
    );
    Ok(())
}
