//! # sqlgraph
//!
//! Build SQL statements as a typed graph of columns and expressions, then
//! render the graph into dialect-correct SQL text at runtime.
//!
//! - **Typed statement graph**: tables, columns, predicates, and
//!   set-expressions instead of hand-written SQL strings
//! - **Two-phase protocol**: accumulate clauses fluently, then render;
//!   rendering never mutates the command, so repeated renders are identical
//! - **Dialect overrides**: per-engine limit/offset syntax and join-update
//!   strategies (including MERGE-based emulation for engines without native
//!   `UPDATE ... JOIN`)
//! - **Validated writes**: column metadata (size, required, read-only)
//!   checks values before a set-expression is accepted
//! - **Structured errors**: stable error kinds with substitution parameters
//!   and severity-gated `tracing` reporting
//!
//! ```
//! use std::sync::Arc;
//! use sqlgraph::{DataType, Dialect, Literal, Table};
//!
//! let employees = Arc::new(
//!     Table::new("EMPLOYEES")
//!         .column("ID", DataType::Int, 0.0, true)
//!         .primary_key()
//!         .column("NAME", DataType::Text, 80.0, true),
//! );
//! let name = employees.find_column("NAME").unwrap().clone();
//!
//! let sql = Dialect::Hsql
//!     .command(&employees)
//!     .set(&name, Literal::param("newName"))
//!     .update_sql()
//!     .unwrap();
//! assert_eq!(sql, "UPDATE EMPLOYEES SET NAME=:newName");
//! ```
//!
//! Statement execution, row mapping, and connection management live outside
//! this crate: it produces SQL text and consumes native failures (wrapping
//! them into [`SqlError::Execution`]), nothing more.

pub mod column;
pub mod command;
pub mod dialect;
pub mod error;
pub mod expr;
pub mod table;
pub mod value;

pub use column::{Column, DataType};
pub use command::{Command, JoinKind};
pub use dialect::Dialect;
pub use error::{ErrorDescriptor, LogPolicy, SqlError, SqlResult, ValidationRule};
pub use expr::{ColumnExpr, CompareOp, Predicate, RenderContext, SetExpr};
pub use table::Table;
pub use value::Literal;

#[cfg(test)]
mod tests;
