//! Number formatting for axis ticks and bar annotations

use serde::{Deserialize, Serialize};

/// Currency prefix for Brazilian real amounts
pub const CURRENCY_PREFIX: &str = "R$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// `R$1,234,567`
    Currency,
    /// `1,234,567`
    Integer,
}

impl ValueFormat {
    pub fn format(&self, value: f64) -> String {
        match self {
            ValueFormat::Currency => format_currency(value),
            ValueFormat::Integer => format_thousands(value),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueFormat::Currency => "currency",
            ValueFormat::Integer => "integer",
        }
    }
}

/// Round to a whole number and group digits by thousands.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_currency(value: f64) -> String {
    let amount = format_thousands(value);
    match amount.strip_prefix('-') {
        Some(abs) => format!("-{}{}", CURRENCY_PREFIX, abs),
        None => format!("{}{}", CURRENCY_PREFIX, amount),
    }
}
