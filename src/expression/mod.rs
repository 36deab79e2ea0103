// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Typed boolean expressions over event attributes (EBA).
//!
//! The former and latter predicates of a pair tracker are EBA trees compiled
//! from a small infix grammar against an attribute [`Schema`](crate::common::schema::Schema).
//!
//! # Grammar
//!
//! ```text
//! expr  := expr '|' expr
//!        | expr '&' expr
//!        | '!' expr
//!        | '(' expr ')'
//!        | atom
//! atom  := <attribute> <operator> <literal>     (exactly three tokens)
//! ```
//!
//! `!` binds tightest, then `&`, then `|`. Operators inside an atom:
//!
//! | Token(s) | Meaning |
//! |----------|---------|
//! | `=`, `==`, `equals` | equal |
//! | `!=`, `notequals` | not equal |
//! | `>`, `greater` | greater than |
//! | `>=`, `greaterorequal` | greater or equal |
//! | `<`, `less` | less than |
//! | `<=`, `lessorequal` | less or equal |
//!
//! Word operators are case-insensitive. Literals are parsed as integer, then
//! floating point, otherwise kept as a string.

pub mod parser;
pub mod predicate;

use std::fmt;

use crate::common::event::Event;
use predicate::Predicate;

/// An immutable boolean expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Leaf comparison.
    Predicate(Predicate),
    /// Both operands hold.
    And(Box<Expr>, Box<Expr>),
    /// Either operand holds.
    Or(Box<Expr>, Box<Expr>),
    /// Operand does not hold.
    Not(Box<Expr>),
}

impl Expr {
    /// Evaluates the expression against an event. Pure; short-circuits.
    #[must_use]
    pub fn evaluate(&self, event: &Event) -> bool {
        match self {
            Self::Predicate(p) => p.test(event),
            Self::And(l, r) => l.evaluate(event) && r.evaluate(event),
            Self::Or(l, r) => l.evaluate(event) || r.evaluate(event),
            Self::Not(x) => !x.evaluate(event),
        }
    }

    /// Number of predicate leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Predicate(_) => 1,
            Self::And(l, r) | Self::Or(l, r) => l.leaf_count() + r.leaf_count(),
            Self::Not(x) => x.leaf_count(),
        }
    }
}

/// Fully parenthesized form, accepted back by the parser. Literals print as
/// they were written, so re-parsing yields the same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(p) => write!(f, "{p}"),
            Self::And(l, r) => write!(f, "({l} & {r})"),
            Self::Or(l, r) => write!(f, "({l} | {r})"),
            Self::Not(x) => write!(f, "!{x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::value::{AttributeType, Value};
    use predicate::CompareOp;

    fn leaf(index: usize, literal: i64) -> Expr {
        Expr::Predicate(Predicate::new(
            format!("a{index}"),
            index,
            AttributeType::Long,
            CompareOp::Eq,
            &literal.to_string(),
        ))
    }

    fn row(a0: i64, a1: i64) -> Event {
        Event::new(0, vec![Value::Long(a0), Value::Long(a1)])
    }

    #[test]
    fn test_and_or_not() {
        let and = Expr::And(Box::new(leaf(0, 1)), Box::new(leaf(1, 1)));
        let or = Expr::Or(Box::new(leaf(0, 1)), Box::new(leaf(1, 1)));
        let not = Expr::Not(Box::new(leaf(0, 1)));

        assert!(and.evaluate(&row(1, 1)));
        assert!(!and.evaluate(&row(1, 0)));
        assert!(or.evaluate(&row(0, 1)));
        assert!(!or.evaluate(&row(0, 0)));
        assert!(not.evaluate(&row(0, 0)));
        assert!(!not.evaluate(&row(1, 0)));
    }

    #[test]
    fn test_leaf_count() {
        let e = Expr::Or(
            Box::new(Expr::And(Box::new(leaf(0, 1)), Box::new(leaf(1, 2)))),
            Box::new(Expr::Not(Box::new(leaf(0, 3)))),
        );
        assert_eq!(e.leaf_count(), 3);
    }

    #[test]
    fn test_display() {
        let e = Expr::Or(
            Box::new(Expr::And(Box::new(leaf(0, 1)), Box::new(leaf(1, 2)))),
            Box::new(Expr::Not(Box::new(leaf(0, 3)))),
        );
        assert_eq!(e.to_string(), "((a0 == 1 & a1 == 2) | !a0 == 3)");
    }
}
