// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Term tracker: one pair tracker per primitive relation of a query term.

use std::sync::Arc;

use crate::alphabet::Classifier;
use crate::automaton::builtin::TableRegistry;
use crate::common::event::EventRef;
use crate::error::Result;
use crate::relation::RelationTerm;
use crate::tracker::interval::IntervalPair;
use crate::tracker::pair::PiePair;

/// Drives every primitive relation of an expanded term over the same stream.
///
/// All pairs share the term's classifier and the registry's tables. A
/// composite such as `before` holds when any of its primitives does, so the
/// trigger and completion signals are OR-ed across pairs.
#[derive(Debug, Clone)]
pub struct TermTracker {
    term: RelationTerm,
    pairs: Vec<PiePair>,
}

impl TermTracker {
    /// Instantiates one [`PiePair`] per primitive relation of `term`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedAutomaton`](crate::Error::MalformedAutomaton)
    /// if `registry` has no table for one of the term's relations.
    pub fn new(
        term: &RelationTerm,
        classifier: Arc<Classifier>,
        registry: &TableRegistry,
    ) -> Result<Self> {
        let pairs = term
            .primitives
            .iter()
            .map(|&primitive| {
                let table = registry.require(primitive)?;
                Ok(PiePair::with_relation(
                    table,
                    Arc::clone(&classifier),
                    term.reported_relation(primitive),
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        log::debug!(
            "tracking {:?} as {} automata",
            term.original,
            pairs.len()
        );
        Ok(Self {
            term: term.clone(),
            pairs,
        })
    }

    /// Feeds `event` to every pair, returning every pair emitted.
    pub fn step_by_event(&mut self, event: &EventRef) -> Vec<IntervalPair> {
        self.pairs
            .iter_mut()
            .filter_map(|pair| pair.step_by_event(Arc::clone(event)))
            .collect()
    }

    /// Returns true if any pair triggered on the last event.
    #[must_use]
    pub fn any_trigger(&self) -> bool {
        self.pairs.iter().any(PiePair::is_trigger)
    }

    /// Returns true if any pair completed on the last event.
    #[must_use]
    pub fn any_completed(&self) -> bool {
        self.pairs.iter().any(PiePair::is_completed)
    }

    /// Returns true if any pair is in an accepting state.
    #[must_use]
    pub fn any_final(&self) -> bool {
        self.pairs.iter().any(PiePair::is_final)
    }

    /// The expanded term.
    #[must_use]
    pub const fn term(&self) -> &RelationTerm {
        &self.term
    }

    /// The per-relation trackers, in relation order.
    #[must_use]
    pub fn pairs(&self) -> &[PiePair] {
        &self.pairs
    }

    /// Resets every pair.
    pub fn reset(&mut self) {
        self.pairs.iter_mut().for_each(PiePair::reset);
    }
}
