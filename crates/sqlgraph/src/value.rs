//! SQL literal values and their text rendering.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A literal value appearing in a statement.
///
/// Literals render themselves as inline SQL text; [`Literal::Param`] is the
/// exception and renders as a named placeholder (`:name`) for the execution
/// layer to bind.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    Uuid(Uuid),
    /// Named statement placeholder, rendered as `:name`.
    Param(String),
}

impl Literal {
    /// Create a named placeholder.
    pub fn param(name: impl Into<String>) -> Self {
        Self::Param(name.into())
    }

    /// Check if this literal is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render this literal as SQL text.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        match self {
            Self::Null => out.push_str("NULL"),
            Self::Bool(true) => out.push_str("TRUE"),
            Self::Bool(false) => out.push_str("FALSE"),
            Self::Int(i) => out.push_str(&i.to_string()),
            Self::Float(f) => out.push_str(&f.to_string()),
            Self::Decimal(d) => out.push_str(&d.to_string()),
            Self::Text(s) => write_quoted(out, s),
            Self::Date(d) => {
                out.push_str("DATE '");
                out.push_str(&d.format("%Y-%m-%d").to_string());
                out.push('\'');
            }
            Self::Timestamp(t) => {
                out.push_str("TIMESTAMP '");
                out.push_str(&t.format("%Y-%m-%d %H:%M:%S").to_string());
                out.push('\'');
            }
            Self::Uuid(u) => {
                out.push('\'');
                out.push_str(&u.to_string());
                out.push('\'');
            }
            Self::Param(name) => {
                out.push(':');
                out.push_str(name);
            }
        }
    }
}

/// Single-quote a string, escaping embedded quotes as `''`.
fn write_quoted(out: &mut String, s: &str) {
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Decimal> for Literal {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<NaiveDate> for Literal {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveDateTime> for Literal {
    fn from(v: NaiveDateTime) -> Self {
        Self::Timestamp(v)
    }
}

impl From<Uuid> for Literal {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl<T> From<Option<T>> for Literal
where
    T: Into<Literal>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}
