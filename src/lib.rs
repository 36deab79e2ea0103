// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! # `pierel` — Interval relations over event streams
//!
//! Detects when the intervals over which two predicates hold (predicate
//! intervals, or PIEs) satisfy an interval-algebra relation, one event at a
//! time.
//!
//! ## Pipeline
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | Predicates | [`expression`] | Typed boolean expressions over event attributes |
//! | Alphabet | [`alphabet`] | Reduces an event to `O`, `I`, `Z` or `E` |
//! | Automata | [`automaton`] | One DFA per primitive relation |
//! | Tracking | [`tracker`] | Interval endpoints, trigger and completion |
//! | Relations | [`relation`] | Relation names and `before`/`after` expansion |
//!
//! ## Relations
//!
//! Allen's thirteen relations, with `before` and `after` expanded into the
//! primitives `followed-by`/`meets` and `follow`/`met-by`, which are
//! observable on a stream of point events.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use pierel::alphabet::Classifier;
//! use pierel::automaton::builtin::TableRegistry;
//! use pierel::common::schema::Schema;
//! use pierel::common::value::{AttributeType, Value};
//! use pierel::expression::parser::parse_expression;
//! use pierel::relation::PrimitiveRelation;
//! use pierel::tracker::pair::PiePair;
//!
//! let schema = Schema::new("vehicle")
//!     .with_attribute("speed", AttributeType::Int)
//!     .with_attribute("accel", AttributeType::Int);
//! let classifier = Classifier::new(
//!     parse_expression("speed > 50", &schema)?,
//!     parse_expression("accel < 10", &schema)?,
//! );
//! let registry = TableRegistry::builtin()?;
//! let mut pair = PiePair::new(
//!     registry.require(PrimitiveRelation::Overlaps)?,
//!     Arc::new(classifier),
//! );
//!
//! let mut emitted = Vec::new();
//! for (ts, speed, accel) in [(1, 60, 20), (2, 80, 8), (3, 10, 8)] {
//!     let event = schema.event(ts, &[("speed", Value::Int(speed)), ("accel", Value::Int(accel))])?;
//!     emitted.extend(pair.step_by_event(event.into_ref()));
//! }
//! assert!(pair.is_trigger());
//! assert_eq!(emitted[0].former_end_us, Some(3));
//! # Ok::<(), pierel::Error>(())
//! ```

pub mod alphabet;
pub mod automaton;
pub mod common;
pub mod error;
pub mod expression;
pub mod relation;
pub mod tracker;

pub use error::{Error, Result};
