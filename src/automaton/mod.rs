// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Deterministic finite automata over the four-symbol alphabet.
//!
//! - [`table`]: validated, immutable transition tables and the serde contract
//!   they are described with.
//! - [`dfa`]: the per-stream automaton instance and its trigger/completion
//!   signals.
//! - [`builtin`]: reference automata for every primitive relation.

pub mod builtin;
pub mod dfa;
pub mod table;
