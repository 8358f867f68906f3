//! Scalar values.
//!
//! [`CellValue`] is what a source table holds before any interpretation.
//! [`ParamValue`] is what an interval carries once materialized, or verbatim
//! from the baseline document.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A raw cell of a source record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    /// The cell is present but empty: the parameter does not apply from this date.
    Null,
    /// The table explicitly states the value is not known for this date.
    Unknown,
}

impl CellValue {
    pub fn is_unknown(&self) -> bool {
        matches!(self, CellValue::Unknown)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(number) => write!(f, "{number}"),
            CellValue::Null => f.write_str("null"),
            CellValue::Unknown => f.write_str("unknown"),
        }
    }
}

/// Value of one interval of a parameter series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Float(f64),
    /// Kept as written; compared numerically when it parses as a number.
    Raw(String),
}

impl ParamValue {
    pub fn zero() -> Self {
        ParamValue::Integer(0)
    }

    /// Numeric reading of the value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Integer(value) => Some(*value as f64),
            ParamValue::Float(value) => Some(*value),
            ParamValue::Raw(text) => text.trim().parse::<f64>().ok(),
        }
    }

    /// Equality of the numeric readings. Non-numeric values never match.
    pub fn numeric_eq(&self, other: &ParamValue) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.as_f64() == Some(0.0)
    }

    /// Integral floats become integers.
    #[must_use]
    pub fn narrowed(self) -> Self {
        match self {
            ParamValue::Float(value)
                if value.is_finite()
                    && value.fract() == 0.0
                    && value >= i64::MIN as f64
                    && value <= i64::MAX as f64 =>
            {
                ParamValue::Integer(value as i64)
            }
            other => other,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Integer(value) => write!(f, "{value}"),
            ParamValue::Float(value) => write!(f, "{value}"),
            ParamValue::Raw(text) => f.write_str(text),
        }
    }
}
