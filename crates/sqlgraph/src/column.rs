//! Column metadata and value validation.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{SqlError, SqlResult, ValidationRule};
use crate::expr::RenderContext;
use crate::value::Literal;

/// The declared data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Bool,
    Int,
    Float,
    Decimal,
    Text,
    Date,
    Timestamp,
    Uuid,
}

/// Metadata for one table column, relevant when writing records.
///
/// Columns are created by [`Table`](crate::Table) builders and owned by
/// exactly one table; the owning table's name and rendering alias are baked
/// in so a column reference can render fully qualified on its own.
#[derive(Debug, Clone)]
pub struct Column {
    pub(crate) table: String,
    pub(crate) table_alias: String,
    pub(crate) name: String,
    pub(crate) data_type: DataType,
    pub(crate) size: f64,
    pub(crate) required: bool,
    pub(crate) auto_generated: bool,
    pub(crate) read_only: bool,
    pub(crate) primary_key: bool,
}

impl Column {
    pub(crate) fn new(
        table: &str,
        table_alias: &str,
        name: &str,
        data_type: DataType,
        size: f64,
        required: bool,
    ) -> Self {
        Self {
            table: table.to_string(),
            table_alias: table_alias.to_string(),
            name: name.to_string(),
            data_type,
            size,
            required,
            auto_generated: false,
            read_only: false,
            primary_key: false,
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owning table's name.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Declared data type.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Maximum size a value for this column may have.
    ///
    /// For [`DataType::Decimal`] the integer part is the precision and the
    /// fraction digit is the scale (e.g. `8.2` = up to 8 digits, 2 of them
    /// after the decimal point). `0` means unlimited.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Whether a value must be supplied for this column.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the value is generated by the engine.
    pub fn is_auto_generated(&self) -> bool {
        self.auto_generated
    }

    /// Whether the column is generally read-only.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether the column is part of the table's primary key.
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub(crate) fn write_sql(&self, out: &mut String, ctx: RenderContext) {
        if ctx.contains(RenderContext::FULLNAME) {
            out.push_str(&self.table_alias);
            out.push('.');
        }
        out.push_str(&self.name);
    }

    /// Check `value` against this column's constraints.
    ///
    /// Returns the value, coerced where the data type allows it (text parsed
    /// into numeric/temporal/uuid columns, integers widened into float and
    /// decimal columns). Named placeholders pass through unvalidated; they
    /// are bound outside the core.
    pub fn validate_value(&self, value: &Literal) -> SqlResult<Literal> {
        if value.is_null() {
            if self.required && !self.auto_generated {
                return Err(self.invalid(value, ValidationRule::NullOnRequired));
            }
            return Ok(Literal::Null);
        }
        if matches!(value, Literal::Param(_)) {
            return Ok(value.clone());
        }
        let coerced = self.coerce(value)?;
        self.check_size(&coerced)?;
        Ok(coerced)
    }

    fn invalid(&self, value: &Literal, rule: ValidationRule) -> SqlError {
        SqlError::validation(&self.name, value.to_sql(), rule)
    }

    fn coerce(&self, value: &Literal) -> SqlResult<Literal> {
        let mismatch = || self.invalid(value, ValidationRule::TypeMismatch);
        match (self.data_type, value) {
            (DataType::Bool, Literal::Bool(_))
            | (DataType::Int, Literal::Int(_))
            | (DataType::Float, Literal::Float(_))
            | (DataType::Decimal, Literal::Decimal(_))
            | (DataType::Text, Literal::Text(_))
            | (DataType::Date, Literal::Date(_))
            | (DataType::Timestamp, Literal::Timestamp(_))
            | (DataType::Uuid, Literal::Uuid(_)) => Ok(value.clone()),

            (DataType::Int, Literal::Text(s)) => s
                .trim()
                .parse::<i64>()
                .map(Literal::Int)
                .map_err(|_| mismatch()),
            (DataType::Float, Literal::Int(i)) => Ok(Literal::Float(*i as f64)),
            (DataType::Float, Literal::Text(s)) => s
                .trim()
                .parse::<f64>()
                .map(Literal::Float)
                .map_err(|_| mismatch()),
            (DataType::Decimal, Literal::Int(i)) => Ok(Literal::Decimal(Decimal::from(*i))),
            (DataType::Decimal, Literal::Float(f)) => Decimal::from_f64_retain(*f)
                .map(Literal::Decimal)
                .ok_or_else(mismatch),
            (DataType::Decimal, Literal::Text(s)) => Decimal::from_str(s.trim())
                .map(Literal::Decimal)
                .map_err(|_| mismatch()),
            (DataType::Date, Literal::Text(s)) => {
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .map(Literal::Date)
                    .map_err(|_| mismatch())
            }
            (DataType::Timestamp, Literal::Text(s)) => {
                NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S")
                    .map(Literal::Timestamp)
                    .map_err(|_| mismatch())
            }
            (DataType::Uuid, Literal::Text(s)) => Uuid::parse_str(s.trim())
                .map(Literal::Uuid)
                .map_err(|_| mismatch()),

            _ => Err(mismatch()),
        }
    }

    fn check_size(&self, value: &Literal) -> SqlResult<()> {
        if self.size <= 0.0 {
            return Ok(());
        }
        match value {
            Literal::Text(s) => {
                if s.chars().count() > self.size as usize {
                    return Err(self.invalid(value, ValidationRule::SizeExceeded));
                }
            }
            Literal::Decimal(d) => {
                let precision = self.size.trunc() as u32;
                let scale = ((self.size.fract() * 10.0).round()) as u32;
                let int_digits = {
                    let t = d.abs().trunc();
                    if t.is_zero() { 0 } else { t.to_string().len() as u32 }
                };
                if d.scale() > scale || int_digits > precision.saturating_sub(scale) {
                    return Err(self.invalid(value, ValidationRule::SizeExceeded));
                }
            }
            _ => {}
        }
        Ok(())
    }
}
