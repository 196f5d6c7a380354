//! Expression nodes, predicates, and rendering contexts.
//!
//! Every node serializes itself into a shared text buffer under a
//! [`RenderContext`], a bit-set selecting bare, qualified, or aliased
//! rendering. The context is what lets one expression graph serve a select
//! list, an ON predicate, and a SET clause without duplication.

use std::ops::BitOr;
use std::sync::Arc;

use crate::column::Column;
use crate::value::Literal;

/// Bit-set selecting how an expression renders in a clause position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext(u8);

impl RenderContext {
    /// Bare column or alias name.
    pub const NAME: RenderContext = RenderContext(0b0001);
    /// Table-qualified name.
    pub const FULLNAME: RenderContext = RenderContext(0b0010);
    /// Literal values.
    pub const VALUE: RenderContext = RenderContext(0b0100);
    /// `AS <alias>` suffixes on aliased expressions.
    pub const ALIAS: RenderContext = RenderContext(0b1000);
    /// The engine's natural choice per clause: bare names plus values.
    pub const DEFAULT: RenderContext = RenderContext(0b0101);
    /// Full select-list rendering: qualified names, values, and aliases.
    pub const ALL: RenderContext = RenderContext(0b1111);

    /// Check whether all bits of `other` are set.
    pub fn contains(self, other: RenderContext) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for RenderContext {
    type Output = RenderContext;

    fn bitor(self, rhs: RenderContext) -> RenderContext {
        RenderContext(self.0 | rhs.0)
    }
}

/// An expression usable in a select list, predicate, or ordering.
///
/// Immutable once constructed; [`ColumnExpr::as_alias`] wraps, never mutates.
#[derive(Debug, Clone)]
pub enum ColumnExpr {
    /// Reference to a table column.
    Column(Arc<Column>),
    /// A literal value appearing as an expression.
    Value(Literal),
    /// An expression renamed with `AS`.
    Aliased {
        inner: Box<ColumnExpr>,
        alias: String,
    },
    /// A raw SQL fragment, e.g. a function call over columns.
    Raw(String),
}

impl ColumnExpr {
    /// Create a raw SQL fragment expression.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }

    /// Create a literal value expression.
    pub fn value(value: impl Into<Literal>) -> Self {
        Self::Value(value.into())
    }

    /// Wrap this expression under an alias.
    pub fn as_alias(self, alias: impl Into<String>) -> Self {
        Self::Aliased {
            inner: Box::new(self),
            alias: alias.into(),
        }
    }

    /// The name this expression is referred to by: the column name, the
    /// alias for aliased expressions, empty otherwise.
    pub fn name(&self) -> &str {
        match self {
            Self::Column(col) => col.name(),
            Self::Aliased { alias, .. } => alias,
            Self::Value(_) | Self::Raw(_) => "",
        }
    }

    pub(crate) fn is_plain_column(&self) -> bool {
        matches!(self, Self::Column(_))
    }

    pub(crate) fn is_aliased(&self) -> bool {
        matches!(self, Self::Aliased { .. })
    }

    pub(crate) fn write_sql(&self, out: &mut String, ctx: RenderContext) {
        match self {
            Self::Column(col) => col.write_sql(out, ctx),
            Self::Value(value) => value.write_sql(out),
            Self::Aliased { inner, alias } => {
                if ctx.contains(RenderContext::ALIAS) {
                    inner.write_sql(out, RenderContext::DEFAULT | RenderContext::FULLNAME);
                    out.push_str(" AS ");
                    out.push_str(alias);
                } else {
                    // A reference to the aliased expression is just its name.
                    out.push_str(alias);
                }
            }
            Self::Raw(sql) => out.push_str(sql),
        }
    }
}

impl From<Arc<Column>> for ColumnExpr {
    fn from(col: Arc<Column>) -> Self {
        Self::Column(col)
    }
}

impl From<&Arc<Column>> for ColumnExpr {
    fn from(col: &Arc<Column>) -> Self {
        Self::Column(col.clone())
    }
}

impl From<Literal> for ColumnExpr {
    fn from(value: Literal) -> Self {
        Self::Value(value)
    }
}

/// Comparison operator for predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
}

impl CompareOp {
    fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Like => " LIKE ",
        }
    }
}

/// A boolean condition over expressions, AND-joined in WHERE/HAVING.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// left op right
    Compare {
        left: ColumnExpr,
        op: CompareOp,
        right: ColumnExpr,
    },
    /// expr IS NULL / IS NOT NULL
    NullCheck { expr: ColumnExpr, is_null: bool },
}

impl Predicate {
    /// Create a comparison predicate.
    pub fn cmp(
        left: impl Into<ColumnExpr>,
        op: CompareOp,
        right: impl Into<ColumnExpr>,
    ) -> Self {
        Self::Compare {
            left: left.into(),
            op,
            right: right.into(),
        }
    }

    /// left = right
    pub fn eq(left: impl Into<ColumnExpr>, right: impl Into<ColumnExpr>) -> Self {
        Self::cmp(left, CompareOp::Eq, right)
    }

    /// left <> right
    pub fn ne(left: impl Into<ColumnExpr>, right: impl Into<ColumnExpr>) -> Self {
        Self::cmp(left, CompareOp::Ne, right)
    }

    /// left > right
    pub fn gt(left: impl Into<ColumnExpr>, right: impl Into<ColumnExpr>) -> Self {
        Self::cmp(left, CompareOp::Gt, right)
    }

    /// left < right
    pub fn lt(left: impl Into<ColumnExpr>, right: impl Into<ColumnExpr>) -> Self {
        Self::cmp(left, CompareOp::Lt, right)
    }

    /// expr IS NULL
    pub fn is_null(expr: impl Into<ColumnExpr>) -> Self {
        Self::NullCheck {
            expr: expr.into(),
            is_null: true,
        }
    }

    /// expr IS NOT NULL
    pub fn is_not_null(expr: impl Into<ColumnExpr>) -> Self {
        Self::NullCheck {
            expr: expr.into(),
            is_null: false,
        }
    }

    pub(crate) fn write_sql(&self, out: &mut String, ctx: RenderContext) {
        match self {
            Self::Compare { left, op, right } => {
                left.write_sql(out, ctx);
                out.push_str(op.as_str());
                right.write_sql(out, ctx);
            }
            Self::NullCheck { expr, is_null } => {
                expr.write_sql(out, ctx);
                out.push_str(if *is_null { " IS NULL" } else { " IS NOT NULL" });
            }
        }
    }
}

/// Pairs a target column with a source value or expression.
///
/// Used only inside write statements; the target must belong to the table
/// the enclosing command writes to.
#[derive(Debug, Clone)]
pub struct SetExpr {
    column: Arc<Column>,
    source: ColumnExpr,
}

impl SetExpr {
    /// Create a set-expression.
    pub fn new(column: Arc<Column>, source: impl Into<ColumnExpr>) -> Self {
        Self {
            column,
            source: source.into(),
        }
    }

    /// The target column.
    pub fn column(&self) -> &Arc<Column> {
        &self.column
    }

    /// The source value or expression.
    pub fn source(&self) -> &ColumnExpr {
        &self.source
    }

    pub(crate) fn write_sql(&self, out: &mut String, ctx: RenderContext) {
        self.column.write_sql(out, ctx);
        out.push('=');
        self.source.write_sql(out, ctx | RenderContext::VALUE);
    }
}
