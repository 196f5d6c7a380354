//! Statement builder and per-dialect renderers.

use std::sync::Arc;

use crate::column::Column;
use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult, ValidationRule};
use crate::expr::{ColumnExpr, Predicate, RenderContext, SetExpr};
use crate::table::Table;
use crate::value::Literal;

/// Join flavor for [`Command::join`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
        }
    }
}

#[derive(Debug, Clone)]
struct Join {
    kind: JoinKind,
    table: Arc<Table>,
    on: Predicate,
}

/// One SQL statement under construction.
///
/// Clauses accumulate through fluent calls in any order; rendering reads the
/// accumulated state without consuming it, so an unmutated command renders
/// byte-identically any number of times.
///
/// ```
/// use std::sync::Arc;
/// use sqlgraph::{DataType, Dialect, Literal, Predicate, Table};
///
/// let employees = Arc::new(
///     Table::new("EMPLOYEES")
///         .column("ID", DataType::Int, 0.0, true)
///         .primary_key()
///         .column("NAME", DataType::Text, 80.0, true),
/// );
/// let sql = Dialect::Hsql
///     .command(&employees)
///     .where_(Predicate::gt(&employees.columns()[0], Literal::from(100i64)))
///     .limit_rows(10)
///     .select_sql()
///     .unwrap();
/// assert_eq!(
///     sql,
///     "SELECT t0.ID, t0.NAME FROM EMPLOYEES t0 WHERE t0.ID>100 LIMIT 10"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Command {
    dialect: Dialect,
    table: Arc<Table>,
    select_list: Vec<ColumnExpr>,
    joins: Vec<Join>,
    where_preds: Vec<Predicate>,
    having_preds: Vec<Predicate>,
    set_exprs: Vec<SetExpr>,
    group_by: Vec<ColumnExpr>,
    order_by: Vec<(ColumnExpr, bool)>,
    limit_rows: i64,
    skip_rows: i64,
    build_error: Option<SqlError>,
}

impl Command {
    /// Create an empty command against `table` for `dialect`.
    pub fn new(dialect: Dialect, table: Arc<Table>) -> Self {
        Self {
            dialect,
            table,
            select_list: Vec::new(),
            joins: Vec::new(),
            where_preds: Vec::new(),
            having_preds: Vec::new(),
            set_exprs: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit_rows: -1,
            skip_rows: 0,
            build_error: None,
        }
    }

    // ==================== Clause accumulation ====================

    /// Append a select-list expression. Without any, the select list is the
    /// table's columns in declaration order.
    pub fn select(mut self, expr: impl Into<ColumnExpr>) -> Self {
        self.select_list.push(expr.into());
        self
    }

    /// Add an INNER JOIN.
    pub fn join(self, table: &Arc<Table>, on: Predicate) -> Self {
        self.join_kind(JoinKind::Inner, table, on)
    }

    /// Add a LEFT JOIN.
    pub fn left_join(self, table: &Arc<Table>, on: Predicate) -> Self {
        self.join_kind(JoinKind::Left, table, on)
    }

    /// Add a join of the given kind.
    pub fn join_kind(mut self, kind: JoinKind, table: &Arc<Table>, on: Predicate) -> Self {
        self.joins.push(Join {
            kind,
            table: table.clone(),
            on,
        });
        self
    }

    /// Add a WHERE predicate (AND-joined).
    pub fn where_(mut self, predicate: Predicate) -> Self {
        self.where_preds.push(predicate);
        self
    }

    /// Add a HAVING predicate (AND-joined).
    pub fn having(mut self, predicate: Predicate) -> Self {
        self.having_preds.push(predicate);
        self
    }

    /// Add a GROUP BY expression.
    pub fn group_by(mut self, expr: impl Into<ColumnExpr>) -> Self {
        self.group_by.push(expr.into());
        self
    }

    /// Add an ascending ORDER BY expression.
    pub fn order_by(mut self, expr: impl Into<ColumnExpr>) -> Self {
        self.order_by.push((expr.into(), false));
        self
    }

    /// Add a descending ORDER BY expression.
    pub fn order_by_desc(mut self, expr: impl Into<ColumnExpr>) -> Self {
        self.order_by.push((expr.into(), true));
        self
    }

    /// Set a column to a literal value.
    ///
    /// The value is validated against the column's constraints before the
    /// set-expression is accepted; a violation is held as a build error and
    /// surfaces from the next render.
    pub fn set(self, column: &Arc<Column>, value: impl Into<Literal>) -> Self {
        let value = value.into();
        match column.validate_value(&value) {
            Ok(coerced) => self.push_set(column, ColumnExpr::Value(coerced)),
            Err(err) => self.fail(err),
        }
    }

    /// Set a column to a source expression (column reference, aliased
    /// expression, or raw fragment).
    pub fn set_expr(self, column: &Arc<Column>, source: impl Into<ColumnExpr>) -> Self {
        let source = source.into();
        if let ColumnExpr::Value(value) = source {
            return self.set(column, value);
        }
        self.push_set(column, source)
    }

    fn push_set(mut self, column: &Arc<Column>, source: ColumnExpr) -> Self {
        if column.is_read_only() {
            return self.fail(SqlError::validation(
                column.name(),
                "",
                ValidationRule::ReadOnly,
            ));
        }
        if column.table_name() != self.table.name() {
            return self.fail(SqlError::validation(
                column.name(),
                "",
                ValidationRule::WrongTable,
            ));
        }
        self.set_exprs.push(SetExpr::new(column.clone(), source));
        self
    }

    fn fail(mut self, err: SqlError) -> Self {
        // Keep the first error; later ones are usually knock-on effects.
        self.build_error.get_or_insert(err);
        self
    }

    /// Limit the number of returned rows. Negative values mean "unset".
    pub fn limit_rows(mut self, limit: i64) -> Self {
        self.limit_rows = limit;
        self
    }

    /// Skip leading rows. Ignored while no limit is set.
    pub fn skip_rows(mut self, skip: i64) -> Self {
        self.skip_rows = skip;
        self
    }

    /// Reset limit and skip to their unset sentinels so the command can be
    /// re-rendered with different paging.
    pub fn clear_limit(mut self) -> Self {
        self.limit_rows = -1;
        self.skip_rows = 0;
        self
    }

    /// The table this command reads from or writes to.
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// The dialect this command renders for.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    // ==================== Rendering ====================

    /// Render the SELECT statement.
    pub fn select_sql(&self) -> SqlResult<String> {
        self.check_build()?;
        let mut out = String::new();
        self.write_select(&mut out);
        self.dialect
            .append_limit(&mut out, self.limit_rows, self.skip_rows);
        Ok(out)
    }

    /// Render the UPDATE statement, applying the dialect's join-update
    /// strategy when the command carries joins.
    pub fn update_sql(&self) -> SqlResult<String> {
        self.check_build()?;
        if self.set_exprs.is_empty() {
            return Err(SqlError::validation(
                self.table.name(),
                "",
                ValidationRule::EmptySet,
            ));
        }
        if self.joins.is_empty() {
            return Ok(self.plain_update_sql());
        }
        match self.dialect {
            Dialect::Hsql => self.merge_update_sql(),
            Dialect::MySql => Ok(self.join_update_sql()),
            Dialect::Postgres => Ok(self.update_from_sql()),
        }
    }

    /// Render the INSERT statement from the accumulated set-expressions.
    pub fn insert_sql(&self) -> SqlResult<String> {
        self.check_build()?;
        if self.set_exprs.is_empty() {
            return Err(SqlError::validation(
                self.table.name(),
                "",
                ValidationRule::EmptySet,
            ));
        }
        let mut out = String::new();
        out.push_str("INSERT INTO ");
        self.table.write_sql(&mut out, RenderContext::FULLNAME);
        out.push_str(" (");
        for (i, set) in self.set_exprs.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            set.column().write_sql(&mut out, RenderContext::NAME);
        }
        out.push_str(") VALUES (");
        for (i, set) in self.set_exprs.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            set.source().write_sql(&mut out, RenderContext::DEFAULT);
        }
        out.push(')');
        Ok(out)
    }

    fn check_build(&self) -> SqlResult<()> {
        match &self.build_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn write_select(&self, out: &mut String) {
        out.push_str("SELECT ");
        if self.select_list.is_empty() {
            for (i, col) in self.table.columns().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                col.write_sql(out, RenderContext::ALL);
            }
        } else {
            write_expr_list(out, &self.select_list, RenderContext::ALL);
        }
        self.write_from(out);
        self.write_where(out, RenderContext::FULLNAME | RenderContext::VALUE);
        self.write_group_by(out);
        self.write_having(out);
        self.write_order_by(out);
    }

    fn write_from(&self, out: &mut String) {
        out.push_str(" FROM ");
        self.table
            .write_sql(out, RenderContext::FULLNAME | RenderContext::ALIAS);
        self.write_joins(out);
    }

    fn write_joins(&self, out: &mut String) {
        for join in &self.joins {
            out.push(' ');
            out.push_str(join.kind.as_str());
            out.push(' ');
            join.table
                .write_sql(out, RenderContext::FULLNAME | RenderContext::ALIAS);
            out.push_str(" ON ");
            join.on
                .write_sql(out, RenderContext::FULLNAME | RenderContext::VALUE);
        }
    }

    fn write_where(&self, out: &mut String, ctx: RenderContext) {
        if self.where_preds.is_empty() {
            return;
        }
        out.push_str(" WHERE ");
        for (i, pred) in self.where_preds.iter().enumerate() {
            if i > 0 {
                out.push_str(" AND ");
            }
            pred.write_sql(out, ctx);
        }
    }

    fn write_group_by(&self, out: &mut String) {
        if self.group_by.is_empty() {
            return;
        }
        out.push_str(" GROUP BY ");
        write_expr_list(
            out,
            &self.group_by,
            RenderContext::FULLNAME | RenderContext::VALUE,
        );
    }

    fn write_having(&self, out: &mut String) {
        if self.having_preds.is_empty() {
            return;
        }
        out.push_str(" HAVING ");
        for (i, pred) in self.having_preds.iter().enumerate() {
            if i > 0 {
                out.push_str(" AND ");
            }
            pred.write_sql(out, RenderContext::FULLNAME | RenderContext::VALUE);
        }
    }

    fn write_order_by(&self, out: &mut String) {
        if self.order_by.is_empty() {
            return;
        }
        out.push_str(" ORDER BY ");
        for (i, (expr, desc)) in self.order_by.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            expr.write_sql(out, RenderContext::FULLNAME | RenderContext::VALUE);
            if *desc {
                out.push_str(" DESC");
            }
        }
    }

    fn write_set_list(&self, out: &mut String, sets: &[SetExpr], ctx: RenderContext) {
        for (i, set) in sets.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            set.write_sql(out, ctx);
        }
    }

    fn plain_update_sql(&self) -> String {
        let mut out = String::new();
        out.push_str("UPDATE ");
        self.table.write_sql(&mut out, RenderContext::FULLNAME);
        out.push_str(" SET ");
        self.write_set_list(&mut out, &self.set_exprs, RenderContext::DEFAULT);
        self.write_where(&mut out, RenderContext::DEFAULT);
        out
    }

    /// Join-updates compiled into a MERGE upsert against a derived row
    /// source, for engines without native `UPDATE ... JOIN` syntax.
    ///
    /// Two passes: first collect the source list and decide synthetic names,
    /// then emit. The names chosen in pass one must match the derived select
    /// list exactly, which is why they cannot be invented while emitting.
    fn merge_update_sql(&self) -> SqlResult<String> {
        let key_columns = self.table.key_columns();
        if key_columns.is_empty() {
            return Err(SqlError::no_primary_key(self.table.name()));
        }

        // Pass 1: the derived row source selects the key columns plus every
        // expression-valued source; plain column references and expressions
        // the caller already aliased keep their names, anything else gets a
        // positional synthetic alias.
        let mut using: Vec<ColumnExpr> = key_columns.iter().map(ColumnExpr::from).collect();
        let mut merge_set: Vec<SetExpr> = Vec::with_capacity(self.set_exprs.len());
        for set in &self.set_exprs {
            match set.source() {
                ColumnExpr::Value(_) => merge_set.push(set.clone()),
                source => {
                    let expr = if source.is_plain_column() || source.is_aliased() {
                        source.clone()
                    } else {
                        source.clone().as_alias(format!("COL_{}", merge_set.len()))
                    };
                    let name = expr.name().to_string();
                    using.push(expr);
                    merge_set.push(SetExpr::new(
                        set.column().clone(),
                        ColumnExpr::raw(format!("q0.{name}")),
                    ));
                }
            }
        }

        // Pass 2: emit.
        let mut out = String::new();
        out.push_str("MERGE INTO ");
        self.table
            .write_sql(&mut out, RenderContext::FULLNAME | RenderContext::ALIAS);
        out.push_str(" USING (SELECT ");
        write_expr_list(&mut out, &using, RenderContext::ALL);
        self.write_from(&mut out);
        self.write_where(&mut out, RenderContext::FULLNAME | RenderContext::VALUE);
        self.write_group_by(&mut out);
        out.push_str(") q0 ON (");
        for (i, col) in key_columns.iter().enumerate() {
            if i > 0 {
                out.push_str(" AND");
            }
            out.push_str(" q0.");
            col.write_sql(&mut out, RenderContext::NAME);
            out.push('=');
            out.push_str(self.table.alias());
            out.push('.');
            col.write_sql(&mut out, RenderContext::NAME);
        }
        out.push_str(") WHEN MATCHED THEN UPDATE SET ");
        self.write_set_list(&mut out, &merge_set, RenderContext::DEFAULT);
        Ok(out)
    }

    /// Native join-update: MySQL updates joined rows in place.
    fn join_update_sql(&self) -> String {
        let mut out = String::new();
        out.push_str("UPDATE ");
        self.table
            .write_sql(&mut out, RenderContext::FULLNAME | RenderContext::ALIAS);
        self.write_joins(&mut out);
        out.push_str(" SET ");
        self.write_set_list(
            &mut out,
            &self.set_exprs,
            RenderContext::DEFAULT | RenderContext::FULLNAME,
        );
        self.write_where(&mut out, RenderContext::FULLNAME | RenderContext::VALUE);
        out
    }

    /// PostgreSQL join-update: joined tables move into FROM, join conditions
    /// into WHERE.
    fn update_from_sql(&self) -> String {
        let mut out = String::new();
        out.push_str("UPDATE ");
        self.table
            .write_sql(&mut out, RenderContext::FULLNAME | RenderContext::ALIAS);
        out.push_str(" SET ");
        self.write_set_list(&mut out, &self.set_exprs, RenderContext::DEFAULT);
        out.push_str(" FROM ");
        for (i, join) in self.joins.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            join.table
                .write_sql(&mut out, RenderContext::FULLNAME | RenderContext::ALIAS);
        }
        out.push_str(" WHERE ");
        let ctx = RenderContext::FULLNAME | RenderContext::VALUE;
        for (i, join) in self.joins.iter().enumerate() {
            if i > 0 {
                out.push_str(" AND ");
            }
            join.on.write_sql(&mut out, ctx);
        }
        for pred in &self.where_preds {
            out.push_str(" AND ");
            pred.write_sql(&mut out, ctx);
        }
        out
    }
}

fn write_expr_list(out: &mut String, exprs: &[ColumnExpr], ctx: RenderContext) {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        expr.write_sql(out, ctx);
    }
}
