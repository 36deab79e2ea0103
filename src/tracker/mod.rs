// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Interval tracking on top of the automata.
//!
//! A [`PiePair`](pair::PiePair) watches one relation between the former and
//! latter predicate intervals (PIEs) of a single event stream. A
//! [`TermTracker`](term::TermTracker) drives one pair per primitive relation
//! of an expanded query term.

pub mod interval;
pub mod pair;
pub mod term;
