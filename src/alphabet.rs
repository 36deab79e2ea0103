// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Four-symbol alphabet and the classifier that reduces an event to it.
//!
//! | former | latter | Symbol |
//! |--------|--------|--------|
//! | false | false | `O` |
//! | true  | false | `Z` |
//! | false | true  | `I` |
//! | true  | true  | `E` |

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::common::event::Event;
use crate::error::{Error, Result};
use crate::expression::Expr;

/// Classification of one event by which of the two predicates hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    /// Neither predicate holds.
    O,
    /// Only the latter predicate holds.
    I,
    /// Only the former predicate holds.
    Z,
    /// Both predicates hold.
    E,
}

impl Symbol {
    /// Every symbol, in transition-table column order.
    pub const ALL: [Self; 4] = [Self::O, Self::I, Self::Z, Self::E];

    /// Maps the two predicate results to a symbol. Total and pure.
    #[must_use]
    pub const fn classify(former: bool, latter: bool) -> Self {
        match (former, latter) {
            (false, false) => Self::O,
            (true, false) => Self::Z,
            (false, true) => Self::I,
            (true, true) => Self::E,
        }
    }

    /// Returns true when the former predicate holds (`Z` or `E`).
    #[must_use]
    pub const fn former_holds(self) -> bool {
        matches!(self, Self::Z | Self::E)
    }

    /// Returns true when the latter predicate holds (`I` or `E`).
    #[must_use]
    pub const fn latter_holds(self) -> bool {
        matches!(self, Self::I | Self::E)
    }

    /// Column of this symbol in a flat transition row.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-letter name.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::O => 'O',
            Self::I => 'I',
            Self::Z => 'Z',
            Self::E => 'E',
        }
    }

    /// Parses a single-letter name case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "O" | "o" => Some(Self::O),
            "I" | "i" => Some(Self::I),
            "Z" | "z" => Some(Self::Z),
            "E" | "e" => Some(Self::E),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The symbol preceding the current one, with an explicit variant for
/// "nothing processed yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PriorSymbol {
    /// No event has been classified yet.
    #[default]
    Start,
    /// The symbol of an earlier event.
    Seen(Symbol),
}

impl PriorSymbol {
    /// The symbol, or `None` at the start of the stream.
    #[must_use]
    pub const fn symbol(self) -> Option<Symbol> {
        match self {
            Self::Start => None,
            Self::Seen(s) => Some(s),
        }
    }
}

impl From<Symbol> for PriorSymbol {
    fn from(s: Symbol) -> Self {
        Self::Seen(s)
    }
}

/// Pairs the former and latter EBA trees with the symbol mapping.
///
/// Memoryless: classification depends only on the event passed in. Trackers
/// expanded from one query term share a classifier through an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    former: Arc<Expr>,
    latter: Arc<Expr>,
}

impl Classifier {
    /// Creates a classifier from the former and latter predicates.
    #[must_use]
    pub fn new(former: Expr, latter: Expr) -> Self {
        Self {
            former: Arc::new(former),
            latter: Arc::new(latter),
        }
    }

    /// The former predicate.
    #[must_use]
    pub const fn former(&self) -> &Arc<Expr> {
        &self.former
    }

    /// The latter predicate.
    #[must_use]
    pub const fn latter(&self) -> &Arc<Expr> {
        &self.latter
    }

    /// Classifies an event reference that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `event` is `None`.
    pub fn classify(&self, event: Option<&Event>) -> Result<Symbol> {
        event
            .map(|e| self.classify_event(e))
            .ok_or_else(|| Error::InvalidInput("cannot classify an absent event".to_string()))
    }

    /// Classifies an event.
    #[must_use]
    #[inline]
    pub fn classify_event(&self, event: &Event) -> Symbol {
        Symbol::classify(self.former.evaluate(event), self.latter.evaluate(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::schema::Schema;
    use crate::common::value::{AttributeType, Value};
    use crate::expression::parser::parse_expression;

    fn classifier() -> (Schema, Classifier) {
        let schema = Schema::new("vehicle")
            .with_attribute("speed", AttributeType::Int)
            .with_attribute("accel", AttributeType::Int);
        let former = parse_expression("speed > 50", &schema).unwrap();
        let latter = parse_expression("accel < 10", &schema).unwrap();
        (schema, Classifier::new(former, latter))
    }

    #[test]
    fn test_truth_table() {
        assert_eq!(Symbol::classify(false, false), Symbol::O);
        assert_eq!(Symbol::classify(true, false), Symbol::Z);
        assert_eq!(Symbol::classify(false, true), Symbol::I);
        assert_eq!(Symbol::classify(true, true), Symbol::E);
    }

    #[test]
    fn test_holds_round_trip() {
        for former in [false, true] {
            for latter in [false, true] {
                let s = Symbol::classify(former, latter);
                assert_eq!(s.former_holds(), former, "{s}");
                assert_eq!(s.latter_holds(), latter, "{s}");
            }
        }
    }

    #[test]
    fn test_index_is_dense() {
        let idx: Vec<usize> = Symbol::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(idx, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_parse_letters() {
        for s in Symbol::ALL {
            assert_eq!(Symbol::parse(&s.to_string()), Some(s));
            assert_eq!(Symbol::parse(&s.to_string().to_lowercase()), Some(s));
        }
        assert_eq!(Symbol::parse("X"), None);
        assert_eq!(Symbol::parse("*"), None);
    }

    #[test]
    fn test_prior_symbol_default_is_start() {
        assert_eq!(PriorSymbol::default(), PriorSymbol::Start);
        assert_eq!(PriorSymbol::Start.symbol(), None);
        assert_eq!(PriorSymbol::from(Symbol::Z).symbol(), Some(Symbol::Z));
    }

    #[test]
    fn test_classify_events() {
        let (schema, c) = classifier();
        let ev = |speed: i32, accel: i32| {
            schema
                .event(0, &[("speed", Value::Int(speed)), ("accel", Value::Int(accel))])
                .unwrap()
        };
        assert_eq!(c.classify_event(&ev(60, 20)), Symbol::Z);
        assert_eq!(c.classify_event(&ev(80, 8)), Symbol::E);
        assert_eq!(c.classify_event(&ev(10, 8)), Symbol::I);
        assert_eq!(c.classify_event(&ev(10, 20)), Symbol::O);
    }

    #[test]
    fn test_classify_absent_event() {
        let (_, c) = classifier();
        let err = c.classify(None).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_classify_missing_attributes_is_o() {
        let (_, c) = classifier();
        let e = Event::new(0, vec![]);
        assert_eq!(c.classify(Some(&e)).unwrap(), Symbol::O);
    }
}
