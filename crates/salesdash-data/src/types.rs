//! Column types and table schemas

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{OrderCategory, YearMonth};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// `YYYY-MM` calendar month
    Period,
    Text,
    Decimal,
    Integer,
    /// Low / Medium / High label
    OrderCategory,
}

impl ColumnType {
    /// Whether a raw, trimmed cell is a valid value of this column type.
    /// Decimals must be finite.
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            ColumnType::Period => raw.parse::<YearMonth>().is_ok(),
            ColumnType::Text => true,
            ColumnType::Decimal => raw.parse::<f64>().is_ok_and(f64::is_finite),
            ColumnType::Integer => raw.parse::<u64>().is_ok(),
            ColumnType::OrderCategory => OrderCategory::ALL.iter().any(|c| c.as_str() == raw),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColumnType::Period => "period (YYYY-MM)",
            ColumnType::Text => "text",
            ColumnType::Decimal => "finite decimal",
            ColumnType::Integer => "non-negative integer",
            ColumnType::OrderCategory => "order category (Low, Medium, High)",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldType {
    pub name: &'static str,
    pub column_type: ColumnType,
    /// Key columns must never be blank.
    pub key: bool,
}

impl FieldType {
    pub const fn key(name: &'static str, column_type: ColumnType) -> Self {
        Self { name, column_type, key: true }
    }

    pub const fn value(name: &'static str, column_type: ColumnType) -> Self {
        Self { name, column_type, key: false }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub table: &'static str,
    pub fields: Vec<FieldType>,
}

impl Schema {
    pub fn new(table: &'static str, fields: Vec<FieldType>) -> Self {
        Self { table, fields }
    }
}
