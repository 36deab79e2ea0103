// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Event type shared by the classifier, the pair tracker, and interval
//! results.
//!
//! An [`Event`] is a timestamp plus positional attribute values laid out by a
//! [`Schema`](crate::common::schema::Schema). Interval endpoints hold the
//! event that opened or closed an interval, so events are passed around as
//! [`EventRef`] (`Arc<Event>`): recording an endpoint is a reference-count
//! increment, not a copy of the attribute row.

use std::sync::Arc;

use crate::common::value::Value;

/// Shared handle to an immutable event.
pub type EventRef = Arc<Event>;

/// A single timestamped point event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Timestamp in microseconds since Unix epoch.
    pub timestamp_us: i64,
    /// Attribute values in schema order. [`Value::Null`] marks an absent value.
    pub values: Vec<Value>,
}

impl Event {
    /// Creates a new event from a timestamp and schema-ordered values.
    #[must_use]
    pub const fn new(timestamp_us: i64, values: Vec<Value>) -> Self {
        Self {
            timestamp_us,
            values,
        }
    }

    /// Wraps the event in an [`EventRef`].
    #[must_use]
    pub fn into_ref(self) -> EventRef {
        Arc::new(self)
    }

    /// Returns the value at `idx`, or `None` if it is out of range or null.
    #[must_use]
    #[inline]
    pub fn value(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx).filter(|v| !v.is_null())
    }
}
