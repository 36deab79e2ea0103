// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Interval results handed downstream.
//!
//! Both types keep the endpoint events themselves for consumers that need
//! attribute values, and serialize as plain data (relation, timestamps,
//! completion flag) for hand-off across process boundaries.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::common::event::EventRef;
use crate::expression::Expr;
use crate::relation::Relation;

/// One predicate interval (IE): the span over which a predicate held.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalCandidate {
    /// The predicate that held over the interval.
    #[serde(serialize_with = "as_display")]
    pub predicate: Arc<Expr>,
    /// Event on which the predicate started to hold.
    #[serde(skip)]
    pub start: EventRef,
    /// Event on which the predicate stopped holding, if it has.
    #[serde(skip)]
    pub end: Option<EventRef>,
    /// Timestamp of `start`.
    pub start_us: i64,
    /// Timestamp of `end`.
    pub end_us: Option<i64>,
}

impl IntervalCandidate {
    /// Creates a candidate, deriving the timestamps from the events.
    #[must_use]
    pub fn new(predicate: Arc<Expr>, start: EventRef, end: Option<EventRef>) -> Self {
        let start_us = start.timestamp_us;
        let end_us = end.as_ref().map(|e| e.timestamp_us);
        Self {
            predicate,
            start,
            end,
            start_us,
            end_us,
        }
    }

    /// Returns true while the interval has no end event.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Length of a closed interval in microseconds.
    #[must_use]
    pub fn duration_us(&self) -> Option<i64> {
        self.end_us.map(|end| end.saturating_sub(self.start_us))
    }
}

/// A former/latter interval pair (IEP) that satisfied a relation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalPair {
    /// Relation the pair is reported under.
    pub relation: Relation,
    /// Event that opened the former interval.
    #[serde(skip)]
    pub former_start: EventRef,
    /// Event that closed the former interval, if it has closed.
    #[serde(skip)]
    pub former_end: Option<EventRef>,
    /// Event that opened the latter interval.
    #[serde(skip)]
    pub latter_start: EventRef,
    /// Event that closed the latter interval, if it has closed.
    #[serde(skip)]
    pub latter_end: Option<EventRef>,
    /// Timestamp of `former_start`.
    pub former_start_us: i64,
    /// Timestamp of `former_end`.
    pub former_end_us: Option<i64>,
    /// Timestamp of `latter_start`.
    pub latter_start_us: i64,
    /// Timestamp of `latter_end`.
    pub latter_end_us: Option<i64>,
    /// The relation can no longer be invalidated by later events.
    pub is_completed: bool,
}

impl IntervalPair {
    /// Creates a pair, deriving the timestamps from the events.
    #[must_use]
    pub fn new(
        relation: Relation,
        former: (EventRef, Option<EventRef>),
        latter: (EventRef, Option<EventRef>),
        is_completed: bool,
    ) -> Self {
        let (former_start, former_end) = former;
        let (latter_start, latter_end) = latter;
        Self {
            relation,
            former_start_us: former_start.timestamp_us,
            former_end_us: former_end.as_ref().map(|e| e.timestamp_us),
            latter_start_us: latter_start.timestamp_us,
            latter_end_us: latter_end.as_ref().map(|e| e.timestamp_us),
            former_start,
            former_end,
            latter_start,
            latter_end,
            is_completed,
        }
    }

    pub(crate) fn close_former(&mut self, end: &EventRef) {
        if self.former_end.is_none() {
            self.former_end_us = Some(end.timestamp_us);
            self.former_end = Some(Arc::clone(end));
        }
    }

    pub(crate) fn close_latter(&mut self, end: &EventRef) {
        if self.latter_end.is_none() {
            self.latter_end_us = Some(end.timestamp_us);
            self.latter_end = Some(Arc::clone(end));
        }
    }
}

impl fmt::Display for IntervalPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = |v: Option<i64>| v.map_or_else(|| "..".to_string(), |t| t.to_string());
        write!(
            f,
            "[{}, {}] {} [{}, {}]",
            self.former_start_us,
            end(self.former_end_us),
            self.relation,
            self.latter_start_us,
            end(self.latter_end_us)
        )?;
        if self.is_completed {
            write!(f, " (completed)")?;
        }
        Ok(())
    }
}

fn as_display<T: fmt::Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
