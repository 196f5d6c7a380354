//! Table descriptors: ordered columns plus primary-key identity.

use std::sync::Arc;

use crate::column::{Column, DataType};
use crate::expr::RenderContext;

/// A named, ordered set of columns with a distinguished primary-key subset.
///
/// Column declaration order is significant: it is the default select-list
/// order. Tables are built fluently and then shared read-only (via `Arc`)
/// across any number of commands; flag methods (`primary_key`,
/// `auto_generated`, `read_only`) apply to the most recently added column.
///
/// ```
/// use std::sync::Arc;
/// use sqlgraph::{DataType, Table};
///
/// let employees = Arc::new(
///     Table::new("EMPLOYEES")
///         .column("ID", DataType::Int, 0.0, true)
///         .primary_key()
///         .column("NAME", DataType::Text, 80.0, true)
///         .column("SALARY", DataType::Decimal, 8.2, false),
/// );
/// assert_eq!(employees.key_columns().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    schema: Option<String>,
    name: String,
    alias: String,
    columns: Vec<Arc<Column>>,
}

impl Table {
    /// Create a table descriptor with the default alias `t0`.
    pub fn new(name: &str) -> Self {
        Self {
            schema: None,
            name: name.to_string(),
            alias: "t0".to_string(),
            columns: Vec::new(),
        }
    }

    /// Set the schema the table lives in.
    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.to_string());
        self
    }

    /// Set the rendering alias. Commands joining several tables must give
    /// each a distinct alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = alias.to_string();
        for col in &mut self.columns {
            Arc::make_mut(col).table_alias = self.alias.clone();
        }
        self
    }

    /// Add a column. `size` is the maximum value size (`0` = unlimited; for
    /// DECIMAL, `precision.scale`), `required` marks mandatory values.
    pub fn column(mut self, name: &str, data_type: DataType, size: f64, required: bool) -> Self {
        self.columns.push(Arc::new(Column::new(
            &self.name,
            &self.alias,
            name,
            data_type,
            size,
            required,
        )));
        self
    }

    /// Mark the last added column as part of the primary key.
    pub fn primary_key(mut self) -> Self {
        if let Some(col) = self.columns.last_mut() {
            Arc::make_mut(col).primary_key = true;
        }
        self
    }

    /// Mark the last added column as engine-generated.
    pub fn auto_generated(mut self) -> Self {
        if let Some(col) = self.columns.last_mut() {
            Arc::make_mut(col).auto_generated = true;
        }
        self
    }

    /// Mark the last added column as read-only.
    pub fn read_only(mut self) -> Self {
        if let Some(col) = self.columns.last_mut() {
            Arc::make_mut(col).read_only = true;
        }
        self
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rendering alias.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[Arc<Column>] {
        &self.columns
    }

    /// Look up a column by name.
    pub fn find_column(&self, name: &str) -> Option<&Arc<Column>> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Check if this table has a column with the given name.
    pub fn has_column(&self, name: &str) -> bool {
        self.find_column(name).is_some()
    }

    /// The primary-key columns, in declaration order.
    pub fn key_columns(&self) -> Vec<Arc<Column>> {
        self.columns
            .iter()
            .filter(|c| c.is_primary_key())
            .cloned()
            .collect()
    }

    pub(crate) fn write_sql(&self, out: &mut String, ctx: RenderContext) {
        if ctx.contains(RenderContext::FULLNAME) {
            if let Some(schema) = &self.schema {
                out.push_str(schema);
                out.push('.');
            }
        }
        out.push_str(&self.name);
        if ctx.contains(RenderContext::ALIAS) {
            out.push(' ');
            out.push_str(&self.alias);
        }
    }
}
