//! Error taxonomy for statement building and rendering.
//!
//! Every error carries a stable, locale-independent identity through
//! [`ErrorDescriptor`]: a dotted kind identifier plus positional parameters.
//! Human-readable text is produced by substituting the parameters into the
//! kind's template, never by ad hoc concatenation, so messages stay
//! consistent and can be localized outside this crate.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::Level;

/// Result type alias for sqlgraph operations.
pub type SqlResult<T> = Result<T, SqlError>;

/// The column constraint a value failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    /// NULL supplied for a required column.
    NullOnRequired,
    /// Value exceeds the column's declared size or precision.
    SizeExceeded,
    /// Value cannot be represented in the column's data type.
    TypeMismatch,
    /// The column is read-only and cannot be written.
    ReadOnly,
    /// The target column belongs to a different table.
    WrongTable,
    /// A write statement was rendered without any set-expressions.
    EmptySet,
}

impl ValidationRule {
    /// Stable rule identifier used in descriptors and messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NullOnRequired => "null-on-required",
            Self::SizeExceeded => "size-exceeded",
            Self::TypeMismatch => "type-mismatch",
            Self::ReadOnly => "read-only",
            Self::WrongTable => "wrong-table",
            Self::EmptySet => "empty-set",
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error types for statement building and rendering.
#[derive(Debug, Clone, Error)]
pub enum SqlError {
    /// A value failed a column's required/size/type constraint.
    #[error("Invalid value '{value}' for column {column}: {rule}")]
    Validation {
        column: String,
        value: String,
        rule: ValidationRule,
    },

    /// Row identity was required but the table declares no primary key.
    #[error("No primary key is defined for table {table}")]
    NoPrimaryKey { table: String },

    /// The native engine rejected or failed the rendered SQL.
    #[error("Error executing query {sql}. Native error is: {cause_text}")]
    Execution {
        sql: String,
        cause_text: String,
        #[source]
        cause: Arc<dyn StdError + Send + Sync>,
    },
}

impl SqlError {
    /// Create a validation error for a column constraint violation.
    pub fn validation(
        column: impl Into<String>,
        value: impl Into<String>,
        rule: ValidationRule,
    ) -> Self {
        Self::Validation {
            column: column.into(),
            value: value.into(),
            rule,
        }
    }

    /// Create a no-primary-key error for a table.
    pub fn no_primary_key(table: impl Into<String>) -> Self {
        Self::NoPrimaryKey {
            table: table.into(),
        }
    }

    /// Wrap a native driver failure together with the attempted SQL text.
    pub fn execution(
        sql: impl Into<String>,
        cause: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Execution {
            sql: sql.into(),
            cause_text: cause.to_string(),
            cause: Arc::new(cause),
        }
    }

    /// The stable identity and parameters of this error.
    pub fn descriptor(&self) -> ErrorDescriptor {
        match self {
            Self::Validation {
                column,
                value,
                rule,
            } => ErrorDescriptor::new(
                "error.db.fieldillegalvalue",
                "Invalid value '{1}' for column {0}: {2}",
                vec![column.clone(), value.clone(), rule.to_string()],
            ),
            Self::NoPrimaryKey { table } => ErrorDescriptor::new(
                "error.db.noprimarykey",
                "No primary key is defined for table {0}",
                vec![table.clone()],
            ),
            Self::Execution {
                sql, cause_text, ..
            } => ErrorDescriptor::new(
                "error.db.queryfailed",
                "Error executing query {0}. Native error is: {1}",
                vec![sql.clone(), cause_text.clone()],
            ),
        }
    }

    /// Severity used by [`LogPolicy`] gating.
    pub fn severity(&self) -> Level {
        match self {
            Self::Validation { .. } => Level::WARN,
            Self::NoPrimaryKey { .. } | Self::Execution { .. } => Level::ERROR,
        }
    }

    /// Check if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a no-primary-key error.
    pub fn is_no_primary_key(&self) -> bool {
        matches!(self, Self::NoPrimaryKey { .. })
    }
}

/// Stable error identity plus substitution parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDescriptor {
    kind: &'static str,
    template: &'static str,
    params: Vec<String>,
}

impl ErrorDescriptor {
    /// Create a descriptor from a kind identifier, template, and parameters.
    pub fn new(kind: &'static str, template: &'static str, params: Vec<String>) -> Self {
        Self {
            kind,
            template,
            params,
        }
    }

    /// The stable kind identifier, e.g. `error.db.queryfailed`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The positional substitution parameters.
    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.template.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == '{' {
                let mut num = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_digit() {
                        num.push(chars.next().expect("peeked digit"));
                    } else {
                        break;
                    }
                }
                if chars.peek() == Some(&'}') && !num.is_empty() {
                    chars.next();
                    let idx: usize = num.parse().expect("checked digits");
                    match self.params.get(idx) {
                        Some(p) => f.write_str(p)?,
                        None => write!(f, "{{{idx}}}")?,
                    }
                    continue;
                }
                write!(f, "{{{num}")?;
            } else {
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

/// Severity-gated reporting of raised errors.
///
/// If the policy's threshold covers the error's severity, the error is
/// emitted at that severity; otherwise it falls through to a DEBUG event so
/// no failure is silently dropped.
#[derive(Debug, Clone)]
pub struct LogPolicy {
    /// Most verbose severity the policy emits at full level.
    pub min_level: Level,
}

impl Default for LogPolicy {
    fn default() -> Self {
        Self {
            min_level: Level::WARN,
        }
    }
}

impl LogPolicy {
    /// Create a policy with the given threshold.
    pub fn new(min_level: Level) -> Self {
        Self { min_level }
    }

    /// Report an error through `tracing`, gated by severity.
    pub fn report(&self, err: &SqlError) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let severity = err.severity();
        let descriptor = err.descriptor();
        if severity <= self.min_level {
            emit_at_level!(
                severity,
                target: "sqlgraph.error",
                kind = descriptor.kind(),
                "{descriptor}",
            );
        } else {
            tracing::debug!(
                target: "sqlgraph.error",
                kind = descriptor.kind(),
                "{descriptor}",
            );
        }
    }
}
