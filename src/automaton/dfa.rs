// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Mutable automaton instance stepping over classified symbols.

use std::sync::Arc;

use crate::alphabet::{PriorSymbol, Symbol};
use crate::automaton::table::{CompletionPolicy, State, StateId, TransitionTable};
use crate::error::{Error, Result};
use crate::relation::PrimitiveRelation;

/// One running automaton over a shared [`TransitionTable`].
///
/// Driven by a single ordered stream through `&mut self`; not meant to be
/// stepped concurrently. Many instances may share one table.
#[derive(Debug, Clone)]
pub struct Dfa {
    table: Arc<TransitionTable>,
    current: StateId,
    last: Option<StateId>,
    current_symbol: PriorSymbol,
    last_symbol: PriorSymbol,
    changed: bool,
}

impl Dfa {
    /// Creates an automaton positioned at the table's initial state.
    #[must_use]
    pub fn new(table: Arc<TransitionTable>) -> Self {
        let current = table.initial();
        Self {
            table,
            current,
            last: None,
            current_symbol: PriorSymbol::Start,
            last_symbol: PriorSymbol::Start,
            changed: false,
        }
    }

    /// Returns to the initial configuration, as if no symbol had been read.
    pub fn reset(&mut self) {
        self.current = self.table.initial();
        self.last = None;
        self.current_symbol = PriorSymbol::Start;
        self.last_symbol = PriorSymbol::Start;
        self.changed = false;
    }

    /// Advances on `symbol`.
    ///
    /// # Panics
    ///
    /// Panics if the table has no explicit and no wildcard edge for the
    /// current state. Tables built by [`TransitionTable::build`] are total,
    /// so this only fires on a broken build-time invariant.
    pub fn step(&mut self, symbol: Symbol) {
        if let Err(e) = self.try_step(symbol) {
            panic!("{e}");
        }
    }

    /// Advances on `symbol`, reporting a missing transition as an error
    /// instead of panicking. The automaton is left unchanged on error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedAutomaton`] if neither an explicit nor a
    /// wildcard edge leaves the current state.
    pub fn try_step(&mut self, symbol: Symbol) -> Result<()> {
        let from = self.current;
        let target = if from == self.table.initial() && self.table.initial_is_wildcard_only() {
            self.table.wildcard(from)
        } else {
            self.table.resolve(from, symbol)
        };
        let Some(to) = target else {
            return Err(Error::malformed_automaton(
                self.table.relation().as_str(),
                format!(
                    "no transition from state '{}' on '{symbol}'",
                    self.table.state(from)
                ),
            ));
        };

        self.last = Some(from);
        self.current = to;
        self.last_symbol = self.current_symbol;
        self.current_symbol = PriorSymbol::Seen(symbol);
        self.changed = to != from;

        if self.changed {
            log::trace!(
                "{}: '{}' --{symbol}--> '{}'",
                self.table.relation(),
                self.table.state(from),
                self.table.state(to)
            );
        }
        Ok(())
    }

    /// Relation this automaton decides.
    #[must_use]
    pub fn relation(&self) -> PrimitiveRelation {
        self.table.relation()
    }

    /// The shared transition table.
    #[must_use]
    pub const fn table(&self) -> &Arc<TransitionTable> {
        &self.table
    }

    /// Current state.
    #[must_use]
    pub fn current_state(&self) -> &State {
        self.table.state(self.current)
    }

    /// State before the most recent step, or `None` before the first step.
    #[must_use]
    pub fn last_state(&self) -> Option<&State> {
        self.last.map(|id| self.table.state(id))
    }

    /// Symbol consumed by the most recent step.
    #[must_use]
    pub const fn current_symbol(&self) -> PriorSymbol {
        self.current_symbol
    }

    /// Symbol consumed by the step before the most recent one.
    #[must_use]
    pub const fn last_symbol(&self) -> PriorSymbol {
        self.last_symbol
    }

    /// Returns true if the current state accepts.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.current_state().is_final()
    }

    /// Returns true if the most recent step moved to a different state.
    #[must_use]
    pub const fn is_state_changed(&self) -> bool {
        self.changed
    }

    /// Rising edge into acceptance: the previous state existed and did not
    /// accept, the current one does.
    #[must_use]
    pub fn is_trigger(&self) -> bool {
        self.last_state().is_some_and(|s| !s.is_final()) && self.is_final()
    }

    /// Relation-dependent completion signal.
    ///
    /// For `finishes`, `finished-by` and `equals` this equals
    /// [`is_trigger`](Self::is_trigger). For every other relation it is the
    /// falling edge out of acceptance.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        match self.table.completion_policy() {
            CompletionPolicy::OnTrigger => self.is_trigger(),
            CompletionPolicy::OnExit => {
                self.last_state().is_some_and(State::is_final) && !self.is_final()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::table::AutomatonDef;
    use Symbol::{E, I, O, Z};

    fn table(relation: PrimitiveRelation) -> Arc<TransitionTable> {
        // idle --Z--> hit, hit --Z--> hit, everything else back to idle.
        let def = AutomatonDef::new(relation)
            .initial("idle")
            .accepting("hit")
            .on("idle", &[(Z, "hit")])
            .otherwise("idle", "idle")
            .on("hit", &[(Z, "hit")])
            .otherwise("hit", "idle");
        Arc::new(TransitionTable::build(&def).unwrap())
    }

    #[test]
    fn test_fresh_automaton() {
        let dfa = Dfa::new(table(PrimitiveRelation::Meets));
        assert_eq!(dfa.current_state().name(), "idle");
        assert!(dfa.last_state().is_none());
        assert_eq!(dfa.current_symbol(), PriorSymbol::Start);
        assert!(!dfa.is_final());
        assert!(!dfa.is_trigger());
        assert!(!dfa.is_completed());
        assert!(!dfa.is_state_changed());
    }

    #[test]
    fn test_trigger_then_hold_then_exit() {
        let mut dfa = Dfa::new(table(PrimitiveRelation::Meets));

        dfa.step(Z);
        assert!(dfa.is_trigger());
        assert!(dfa.is_final());
        assert!(!dfa.is_completed());
        assert!(dfa.is_state_changed());

        dfa.step(Z);
        assert!(!dfa.is_trigger());
        assert!(dfa.is_final());
        assert!(!dfa.is_completed());
        assert!(!dfa.is_state_changed());

        dfa.step(O);
        assert!(!dfa.is_trigger());
        assert!(!dfa.is_final());
        assert!(dfa.is_completed());
        assert!(dfa.is_state_changed());

        dfa.step(O);
        assert!(!dfa.is_completed());
        assert!(!dfa.is_state_changed());
    }

    #[test]
    fn test_point_relation_completes_on_trigger() {
        let mut dfa = Dfa::new(table(PrimitiveRelation::Equals));
        dfa.step(Z);
        assert!(dfa.is_trigger());
        assert!(dfa.is_completed());
        dfa.step(E);
        assert!(!dfa.is_trigger());
        assert!(!dfa.is_completed());
    }

    #[test]
    fn test_symbols_shift() {
        let mut dfa = Dfa::new(table(PrimitiveRelation::Meets));
        dfa.step(I);
        assert_eq!(dfa.last_symbol(), PriorSymbol::Start);
        assert_eq!(dfa.current_symbol(), PriorSymbol::Seen(I));
        dfa.step(E);
        assert_eq!(dfa.last_symbol(), PriorSymbol::Seen(I));
        assert_eq!(dfa.current_symbol(), PriorSymbol::Seen(E));
        assert_eq!(dfa.last_state().map(State::name), Some("idle"));
    }

    #[test]
    fn test_reset() {
        let mut dfa = Dfa::new(table(PrimitiveRelation::Meets));
        dfa.step(Z);
        dfa.reset();
        assert_eq!(dfa.current_state().name(), "idle");
        assert!(dfa.last_state().is_none());
        assert!(!dfa.is_state_changed());
        assert_eq!(dfa.current_symbol(), PriorSymbol::Start);
    }

    #[test]
    fn test_wildcard_only_initial_ignores_symbol() {
        // `boot` has only a wildcard edge: the first symbol is consumed without
        // being interpreted, even though `idle` would have accepted a Z.
        let def = AutomatonDef::new(PrimitiveRelation::Follow)
            .initial("boot")
            .state("idle")
            .accepting("hit")
            .otherwise("boot", "idle")
            .on("idle", &[(Z, "hit")])
            .otherwise("idle", "idle")
            .otherwise("hit", "idle");
        let mut dfa = Dfa::new(Arc::new(TransitionTable::build(&def).unwrap()));

        dfa.step(Z);
        assert_eq!(dfa.current_state().name(), "idle");
        assert!(!dfa.is_final());
        dfa.step(Z);
        assert_eq!(dfa.current_state().name(), "hit");
        assert!(dfa.is_trigger());
    }

    #[test]
    fn test_instances_share_table() {
        let t = table(PrimitiveRelation::Meets);
        let mut a = Dfa::new(Arc::clone(&t));
        let b = Dfa::new(Arc::clone(&t));
        a.step(Z);
        assert!(a.is_final());
        assert!(!b.is_final());
        assert_eq!(Arc::strong_count(&t), 3);
    }
}
