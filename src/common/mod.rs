// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Common types shared across the classifier, automata, and trackers.

pub mod event;
pub mod schema;
pub mod value;
