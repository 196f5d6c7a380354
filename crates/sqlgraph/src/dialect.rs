//! Target-engine SQL generation rules.
//!
//! Dialects are an enum dispatched through match arms, not a type hierarchy:
//! each variant supplies a limit/offset syntax and a join-update strategy,
//! while clause accumulation and base rendering stay in [`Command`].

use std::sync::Arc;

use crate::command::Command;
use crate::table::Table;

/// The target database engine's rendering rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// HSQLDB: `LIMIT n OFFSET m` paging; update-with-join is emulated as a
    /// MERGE upsert against a derived row source.
    #[default]
    Hsql,
    /// MySQL: `LIMIT m, n` paging; updates joined rows natively.
    MySql,
    /// PostgreSQL: `LIMIT n OFFSET m` paging; update-with-join renders as
    /// `UPDATE ... FROM`.
    Postgres,
}

impl Dialect {
    /// Create a command that renders for this dialect.
    pub fn command(self, table: &Arc<Table>) -> Command {
        Command::new(self, table.clone())
    }

    /// Append this dialect's row-limiting clause.
    ///
    /// Nothing is appended while no limit is set; in particular an offset
    /// without a limit is silently dropped, matching the base behavior of
    /// the reference dialect.
    pub(crate) fn append_limit(self, out: &mut String, limit: i64, skip: i64) {
        if limit < 0 {
            return;
        }
        match self {
            Self::Hsql | Self::Postgres => {
                out.push_str(" LIMIT ");
                out.push_str(&limit.to_string());
                if skip > 0 {
                    out.push_str(" OFFSET ");
                    out.push_str(&skip.to_string());
                }
            }
            Self::MySql => {
                out.push_str(" LIMIT ");
                if skip > 0 {
                    out.push_str(&skip.to_string());
                    out.push_str(", ");
                }
                out.push_str(&limit.to_string());
            }
        }
    }
}
