// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Predicate leaves: `<attribute> <operator> <literal>`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::common::event::Event;
use crate::common::value::{AttributeType, Value};

/// Comparison operator of a predicate leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `=`, `==`, `equals`
    Eq,
    /// `!=`, `notequals`
    Ne,
    /// `>`, `greater`
    Gt,
    /// `>=`, `greaterorequal`
    Gte,
    /// `<`, `less`
    Lt,
    /// `<=`, `lessorequal`
    Lte,
}

impl CompareOp {
    /// Parses an operator token case-insensitively.
    ///
    /// Returns `None` for unrecognized tokens.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "=" | "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Gte),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Lte),
            s if s.eq_ignore_ascii_case("equals") => Some(Self::Eq),
            s if s.eq_ignore_ascii_case("notequals") => Some(Self::Ne),
            s if s.eq_ignore_ascii_case("greater") => Some(Self::Gt),
            s if s.eq_ignore_ascii_case("greaterorequal") => Some(Self::Gte),
            s if s.eq_ignore_ascii_case("less") => Some(Self::Lt),
            s if s.eq_ignore_ascii_case("lessorequal") => Some(Self::Lte),
            _ => None,
        }
    }

    /// Evaluates `ordering <op> Equal`.
    #[must_use]
    pub const fn evaluate(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => matches!(ordering, Ordering::Equal),
            Self::Ne => !matches!(ordering, Ordering::Equal),
            Self::Gt => matches!(ordering, Ordering::Greater),
            Self::Gte => !matches!(ordering, Ordering::Less),
            Self::Lt => matches!(ordering, Ordering::Less),
            Self::Lte => !matches!(ordering, Ordering::Greater),
        }
    }

    /// Symbolic form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

/// A compiled `<attribute> <operator> <literal>` test.
///
/// The attribute has already been resolved against the schema to a position
/// and a declared type; evaluation never looks names up.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Predicate {
    /// Attribute name as declared in the schema.
    pub attribute: String,
    /// Position of the attribute in the event row.
    pub index: usize,
    /// Declared attribute type both sides are coerced to.
    pub ty: AttributeType,
    /// Comparison operator.
    pub op: CompareOp,
    /// Literal as parsed from the expression (integer, float, or string).
    pub literal: Value,
    /// Literal exactly as written. String attributes compare against this,
    /// so `007` stays `"007"`.
    pub literal_text: Arc<str>,
}

impl Predicate {
    /// Creates a predicate leaf from the literal's source text.
    #[must_use]
    pub fn new(
        attribute: impl Into<String>,
        index: usize,
        ty: AttributeType,
        op: CompareOp,
        literal: &str,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            index,
            ty,
            op,
            literal: Value::parse_literal(literal),
            literal_text: Arc::from(literal),
        }
    }

    fn coerced_literal(&self) -> Option<Value> {
        match self.ty {
            AttributeType::String => Some(Value::String(Arc::clone(&self.literal_text))),
            ty => self.literal.coerce(ty),
        }
    }

    /// Tests the predicate against an event.
    ///
    /// Both the event's value and the literal are coerced to the declared
    /// type. An absent value, a failed coercion, or an unordered comparison
    /// (NaN) yields `false`.
    #[must_use]
    pub fn test(&self, event: &Event) -> bool {
        let Some(raw) = event.value(self.index) else {
            return false;
        };
        let (Some(lhs), Some(rhs)) = (raw.coerce(self.ty), self.coerced_literal()) else {
            log::trace!(
                "predicate {self}: cannot coerce '{raw}' or '{}' to {}",
                self.literal_text,
                self.ty
            );
            return false;
        };
        lhs.compare(&rhs).is_some_and(|ord| self.op.evaluate(ord))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.attribute, self.op.as_str(), self.literal_text)
    }
}
