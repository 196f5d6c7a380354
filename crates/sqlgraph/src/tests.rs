//! Integration tests for statement building and dialect rendering.

use std::sync::Arc;

use crate::column::{Column, DataType};
use crate::dialect::Dialect;
use crate::error::{SqlError, ValidationRule};
use crate::expr::{ColumnExpr, Predicate};
use crate::table::Table;
use crate::value::Literal;

fn employees() -> Arc<Table> {
    Arc::new(
        Table::new("EMPLOYEES")
            .column("ID", DataType::Int, 0.0, true)
            .primary_key()
            .column("NAME", DataType::Text, 80.0, true)
            .column("SALARY", DataType::Decimal, 8.2, false)
            .column("DEPARTMENT_ID", DataType::Int, 0.0, true)
            .column("CREATED", DataType::Timestamp, 0.0, false)
            .auto_generated()
            .read_only(),
    )
}

fn departments() -> Arc<Table> {
    Arc::new(
        Table::new("DEPARTMENTS")
            .with_alias("t1")
            .column("ID", DataType::Int, 0.0, true)
            .primary_key()
            .column("NAME", DataType::Text, 80.0, true)
            .column("BUDGET", DataType::Decimal, 12.2, false),
    )
}

fn col(table: &Arc<Table>, name: &str) -> Arc<Column> {
    table.find_column(name).expect("fixture column").clone()
}

#[test]
fn select_defaults_to_declaration_order() {
    let e = employees();
    let sql = Dialect::Hsql.command(&e).select_sql().unwrap();
    assert_eq!(
        sql,
        "SELECT t0.ID, t0.NAME, t0.SALARY, t0.DEPARTMENT_ID, t0.CREATED FROM EMPLOYEES t0"
    );
}

#[test]
fn select_with_projection_grouping_and_ordering() {
    let e = employees();
    let sql = Dialect::Hsql
        .command(&e)
        .select(&col(&e, "DEPARTMENT_ID"))
        .select(ColumnExpr::raw("SUM(t0.SALARY)").as_alias("TOTAL"))
        .group_by(&col(&e, "DEPARTMENT_ID"))
        .having(Predicate::gt(
            ColumnExpr::raw("SUM(t0.SALARY)"),
            Literal::from(10000i64),
        ))
        .order_by_desc(ColumnExpr::raw("TOTAL"))
        .select_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT t0.DEPARTMENT_ID, SUM(t0.SALARY) AS TOTAL FROM EMPLOYEES t0 \
         GROUP BY t0.DEPARTMENT_ID HAVING SUM(t0.SALARY)>10000 ORDER BY TOTAL DESC"
    );
}

#[test]
fn select_with_join_and_where() {
    let e = employees();
    let d = departments();
    let sql = Dialect::Hsql
        .command(&e)
        .join(&d, Predicate::eq(&col(&e, "DEPARTMENT_ID"), &col(&d, "ID")))
        .where_(Predicate::gt(&col(&e, "SALARY"), Literal::from(5000i64)))
        .select_sql()
        .unwrap();
    assert!(sql.contains("INNER JOIN DEPARTMENTS t1 ON t0.DEPARTMENT_ID=t1.ID"));
    assert!(sql.contains("WHERE t0.SALARY>5000"));
}

#[test]
fn rendering_is_idempotent() {
    let e = employees();
    let cmd = Dialect::Hsql
        .command(&e)
        .where_(Predicate::gt(&col(&e, "ID"), Literal::from(100i64)))
        .limit_rows(10)
        .skip_rows(5);
    assert_eq!(cmd.select_sql().unwrap(), cmd.select_sql().unwrap());
}

#[test]
fn limit_without_skip() {
    let e = employees();
    let sql = Dialect::Hsql
        .command(&e)
        .limit_rows(10)
        .select_sql()
        .unwrap();
    assert!(sql.ends_with(" LIMIT 10"));
    assert!(!sql.contains("OFFSET"));
}

#[test]
fn limit_with_skip() {
    let e = employees();
    let sql = Dialect::Hsql
        .command(&e)
        .limit_rows(10)
        .skip_rows(5)
        .select_sql()
        .unwrap();
    assert!(sql.ends_with(" LIMIT 10 OFFSET 5"));
}

// The reference dialect cannot render an offset on its own, so a skip with
// no limit disappears from the output. Deliberate, if surprising.
#[test]
fn offset_without_limit_is_dropped() {
    let e = employees();
    let sql = Dialect::Hsql
        .command(&e)
        .skip_rows(25)
        .select_sql()
        .unwrap();
    assert!(!sql.contains("LIMIT"));
    assert!(!sql.contains("OFFSET"));
    assert!(!sql.contains("25"));
}

#[test]
fn clear_limit_resets_paging() {
    let e = employees();
    let cmd = Dialect::Hsql
        .command(&e)
        .limit_rows(10)
        .skip_rows(5)
        .clear_limit();
    assert!(!cmd.select_sql().unwrap().contains("LIMIT"));

    // Reusable with fresh paging after the reset.
    let sql = cmd.limit_rows(20).select_sql().unwrap();
    assert!(sql.ends_with(" LIMIT 20"));
}

#[test]
fn mysql_limit_syntax() {
    let e = employees();
    let sql = Dialect::MySql
        .command(&e)
        .limit_rows(10)
        .skip_rows(5)
        .select_sql()
        .unwrap();
    assert!(sql.ends_with(" LIMIT 5, 10"));
}

#[test]
fn plain_update_renders_bare_names() {
    let e = employees();
    let sql = Dialect::Hsql
        .command(&e)
        .set(&col(&e, "NAME"), "Alice")
        .where_(Predicate::eq(&col(&e, "ID"), Literal::from(7i64)))
        .update_sql()
        .unwrap();
    assert_eq!(sql, "UPDATE EMPLOYEES SET NAME='Alice' WHERE ID=7");
}

#[test]
fn update_coerces_text_into_decimal_column() {
    let e = employees();
    let sql = Dialect::Hsql
        .command(&e)
        .set(&col(&e, "SALARY"), "1234.50")
        .where_(Predicate::eq(&col(&e, "ID"), Literal::from(7i64)))
        .update_sql()
        .unwrap();
    assert!(sql.contains("SALARY=1234.50"));
}

#[test]
fn merge_emulation_keeps_literal_sources_unchanged() {
    let e = employees();
    let d = departments();
    let sql = Dialect::Hsql
        .command(&e)
        .join(&d, Predicate::eq(&col(&e, "DEPARTMENT_ID"), &col(&d, "ID")))
        .set(&col(&e, "NAME"), Literal::param("newName"))
        .update_sql()
        .unwrap();
    assert!(sql.starts_with("MERGE INTO EMPLOYEES t0 USING (SELECT t0.ID FROM EMPLOYEES t0"));
    assert!(sql.contains("INNER JOIN DEPARTMENTS t1 ON t0.DEPARTMENT_ID=t1.ID"));
    assert!(sql.contains(") q0 ON ( q0.ID=t0.ID)"));
    assert!(sql.ends_with("WHEN MATCHED THEN UPDATE SET NAME=:newName"));
}

#[test]
fn merge_emulation_aliases_expression_sources() {
    let e = employees();
    let d = departments();
    let sql = Dialect::Hsql
        .command(&e)
        .join(&d, Predicate::eq(&col(&e, "DEPARTMENT_ID"), &col(&d, "ID")))
        .set_expr(&col(&e, "NAME"), ColumnExpr::raw("UPPER(t1.NAME)"))
        .update_sql()
        .unwrap();
    assert!(sql.contains("UPPER(t1.NAME) AS COL_0"));
    assert!(sql.ends_with("WHEN MATCHED THEN UPDATE SET NAME=q0.COL_0"));
}

#[test]
fn merge_emulation_keeps_caller_aliases() {
    let e = employees();
    let d = departments();
    let sql = Dialect::Hsql
        .command(&e)
        .join(&d, Predicate::eq(&col(&e, "DEPARTMENT_ID"), &col(&d, "ID")))
        .set_expr(
            &col(&e, "NAME"),
            ColumnExpr::raw("UPPER(t1.NAME)").as_alias("NEW_NAME"),
        )
        .update_sql()
        .unwrap();
    assert!(sql.contains("UPPER(t1.NAME) AS NEW_NAME"));
    assert!(sql.contains("SET NAME=q0.NEW_NAME"));
    assert!(!sql.contains("COL_0"));
}

#[test]
fn merge_emulation_reuses_plain_column_names() {
    let e = employees();
    let d = departments();
    let sql = Dialect::Hsql
        .command(&e)
        .join(&d, Predicate::eq(&col(&e, "DEPARTMENT_ID"), &col(&d, "ID")))
        .set_expr(&col(&e, "NAME"), &col(&d, "NAME"))
        .update_sql()
        .unwrap();
    // The joined column is selected under its own name, no synthetic alias.
    assert!(sql.contains("SELECT t0.ID, t1.NAME FROM"));
    assert!(sql.contains("SET NAME=q0.NAME"));
    assert!(!sql.contains("COL_0"));
}

#[test]
fn merge_emulation_requires_primary_key() {
    let data = Arc::new(
        Table::new("DATA")
            .column("KIND", DataType::Text, 20.0, true)
            .column("VALUE", DataType::Text, 0.0, false),
    );
    let d = departments();
    let err = Dialect::Hsql
        .command(&data)
        .join(
            &d,
            Predicate::eq(ColumnExpr::raw("t0.KIND"), ColumnExpr::raw("t1.NAME")),
        )
        .set(&col(&data, "VALUE"), "x")
        .update_sql()
        .unwrap_err();
    assert!(matches!(err, SqlError::NoPrimaryKey { ref table } if table == "DATA"));
}

#[test]
fn mysql_updates_joined_rows_natively() {
    let e = employees();
    let d = departments();
    let sql = Dialect::MySql
        .command(&e)
        .join(&d, Predicate::eq(&col(&e, "DEPARTMENT_ID"), &col(&d, "ID")))
        .set(&col(&e, "NAME"), Literal::param("newName"))
        .update_sql()
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE EMPLOYEES t0 INNER JOIN DEPARTMENTS t1 ON t0.DEPARTMENT_ID=t1.ID \
         SET t0.NAME=:newName"
    );
}

#[test]
fn postgres_update_from_moves_joins_into_where() {
    let e = employees();
    let d = departments();
    let sql = Dialect::Postgres
        .command(&e)
        .join(&d, Predicate::eq(&col(&e, "DEPARTMENT_ID"), &col(&d, "ID")))
        .set(&col(&e, "NAME"), Literal::param("newName"))
        .where_(Predicate::gt(&col(&d, "BUDGET"), Literal::from(100000i64)))
        .update_sql()
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE EMPLOYEES t0 SET NAME=:newName FROM DEPARTMENTS t1 \
         WHERE t0.DEPARTMENT_ID=t1.ID AND t1.BUDGET>100000"
    );
}

#[test]
fn insert_renders_set_order() {
    let e = employees();
    let sql = Dialect::Hsql
        .command(&e)
        .set(&col(&e, "NAME"), "Alice")
        .set(&col(&e, "DEPARTMENT_ID"), 7i64)
        .insert_sql()
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO EMPLOYEES (NAME, DEPARTMENT_ID) VALUES ('Alice', 7)"
    );
}

#[test]
fn update_without_set_fails() {
    let e = employees();
    let err = Dialect::Hsql.command(&e).update_sql().unwrap_err();
    assert!(matches!(
        err,
        SqlError::Validation {
            rule: ValidationRule::EmptySet,
            ..
        }
    ));
}

#[test]
fn invalid_set_value_surfaces_at_render() {
    let e = employees();
    let err = Dialect::Hsql
        .command(&e)
        .set(&col(&e, "NAME"), Literal::Null)
        .update_sql()
        .unwrap_err();
    assert!(matches!(
        err,
        SqlError::Validation {
            rule: ValidationRule::NullOnRequired,
            ..
        }
    ));
}

#[test]
fn read_only_column_rejects_set() {
    let e = employees();
    let err = Dialect::Hsql
        .command(&e)
        .set(&col(&e, "CREATED"), Literal::Null)
        .update_sql()
        .unwrap_err();
    assert!(matches!(
        err,
        SqlError::Validation {
            rule: ValidationRule::ReadOnly,
            ..
        }
    ));
}

#[test]
fn set_target_must_belong_to_command_table() {
    let e = employees();
    let d = departments();
    let err = Dialect::Hsql
        .command(&e)
        .set(&col(&d, "NAME"), "Sales")
        .update_sql()
        .unwrap_err();
    assert!(matches!(
        err,
        SqlError::Validation {
            rule: ValidationRule::WrongTable,
            ..
        }
    ));
}

#[test]
fn execution_error_captures_sql_and_native_cause() {
    let sql = "SELECT t0.ID FROM EMPLOYEES t0";
    let err = SqlError::execution(sql, std::io::Error::other("table not found"));
    let desc = err.descriptor();
    assert_eq!(desc.kind(), "error.db.queryfailed");
    assert_eq!(desc.params()[0], sql);
    assert!(desc.params()[1].contains("table not found"));
    assert_eq!(
        desc.to_string(),
        format!("Error executing query {sql}. Native error is: table not found")
    );
}
