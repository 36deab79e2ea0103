// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Typed attribute values and the coercion rules used by predicate leaves.
//!
//! Predicates compare an event's attribute value against a literal after
//! coercing **both** sides to the attribute's declared type. Coercion is
//! lossless or it fails: a fractional `3.5` does not become the `int` 3, and
//! `"abc"` does not become any number. A failed coercion is not an error;
//! the comparison evaluates to `false`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Declared type of a schema attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// 8-bit signed integer.
    Byte,
    /// UTF-8 string.
    String,
}

impl AttributeType {
    /// Every supported type, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Byte,
        Self::String,
    ];

    /// Parses a type name case-insensitively.
    ///
    /// Returns `None` for names outside `int|long|float|double|byte|string`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Lowercase type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Byte => "byte",
            Self::String => "string",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AttributeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::UnknownAttributeType(s.to_string()))
    }
}

/// A single attribute value carried by an event or written as a literal.
///
/// Strings use `Arc<str>` so events can be cloned and shared across threads
/// without copying their text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// 8-bit signed integer.
    Byte(i8),
    /// UTF-8 string.
    String(Arc<str>),
    /// No value present.
    Null,
}

impl Value {
    /// Parses an expression literal: integer first, then floating point,
    /// otherwise the raw token as a string.
    #[must_use]
    pub fn parse_literal(token: &str) -> Self {
        if let Ok(v) = token.parse::<i64>() {
            return Self::Long(v);
        }
        if let Ok(v) = token.parse::<f64>() {
            return Self::Double(v);
        }
        Self::String(Arc::from(token))
    }

    /// Returns true for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Coerces this value to `ty`, or `None` when the conversion would lose
    /// information or the text does not parse.
    #[must_use]
    pub fn coerce(&self, ty: AttributeType) -> Option<Self> {
        match ty {
            AttributeType::Int => self.as_i64().and_then(|v| i32::try_from(v).ok()).map(Self::Int),
            AttributeType::Long => self.as_i64().map(Self::Long),
            AttributeType::Byte => self.as_i64().and_then(|v| i8::try_from(v).ok()).map(Self::Byte),
            AttributeType::Float => self.as_f64().map(|v| Self::Float(v as f32)),
            AttributeType::Double => self.as_f64().map(Self::Double),
            AttributeType::String => match self {
                Self::Null => None,
                Self::String(s) => Some(Self::String(Arc::clone(s))),
                other => Some(Self::String(Arc::from(other.to_string()))),
            },
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(i64::from(*v)),
            Self::Long(v) => Some(*v),
            Self::Byte(v) => Some(i64::from(*v)),
            Self::Float(v) => integral_f64(f64::from(*v)),
            Self::Double(v) => integral_f64(*v),
            Self::String(s) => s.trim().parse::<i64>().ok(),
            Self::Null => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(f64::from(*v)),
            Self::Long(v) => Some(*v as f64),
            Self::Byte(v) => Some(f64::from(*v)),
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            Self::String(s) => s.trim().parse::<f64>().ok(),
            Self::Null => None,
        }
    }

    /// Orders two values of the same variant.
    ///
    /// Returns `None` for mismatched variants, nulls, and NaN.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Long(a), Self::Long(b)) => Some(a.cmp(b)),
            (Self::Byte(a), Self::Byte(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Double(a), Self::Double(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

fn integral_f64(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Self::Byte(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(Arc::from(v))
    }
}
