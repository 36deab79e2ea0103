// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Reference automata for the thirteen primitive relations, and the registry
//! that shares compiled tables between trackers.
//!
//! Each automaton reads the symbol stream of one former/latter pair. Written
//! as symbol runs (`X+` = one or more events classified `X`), the accepting
//! shapes are:
//!
//! | Relation | Shape | Accepts while |
//! |----------|-------|---------------|
//! | overlaps | `Z+ E+ I` | `I+` |
//! | overlapped-by | `I+ E+ Z` | `Z+` |
//! | starts | `(O or start) E+ I` | `I+` |
//! | started-by | `(O or start) E+ Z` | `Z+` |
//! | during | `I+ E+ I` | `I+` |
//! | contains | `Z+ E+ Z` | `Z+` |
//! | finishes | `I+ E+ O` | the single `O` |
//! | finished-by | `Z+ E+ O` | the single `O` |
//! | equals | `(O or start) E+ O` | the single `O` |
//! | meets | `Z+ I` | `I+` |
//! | met-by | `I+ Z` | `Z+` |
//! | follow | `I+ O+ Z` | `Z+` |
//! | followed-by | `Z+ O+ I` | `I+` |
//!
//! Any symbol that breaks a shape falls back to the state that symbol would
//! reach from scratch, so a new candidate can start on the very event that
//! ended the previous one.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::alphabet::Symbol::{self, E, I, O, Z};
use crate::automaton::table::{AutomatonDef, TransitionTable};
use crate::error::{Error, Result};
use crate::relation::PrimitiveRelation;

/// The reference automaton definition for `relation`.
#[must_use]
pub fn builtin_definition(relation: PrimitiveRelation) -> AutomatonDef {
    use PrimitiveRelation as R;
    match relation {
        R::Overlaps => overlap_shape(R::Overlaps, Z, I),
        R::OverlappedBy => overlap_shape(R::OverlappedBy, I, Z),
        R::Starts => start_shape(R::Starts, I, Z),
        R::StartedBy => start_shape(R::StartedBy, Z, I),
        R::During => nested_shape(R::During, I, Z),
        R::Contains => nested_shape(R::Contains, Z, I),
        R::Finishes => finish_shape(R::Finishes, I, Z),
        R::FinishedBy => finish_shape(R::FinishedBy, Z, I),
        R::Equals => equals_shape(),
        R::Meets => meet_shape(R::Meets, Z, I),
        R::MetBy => meet_shape(R::MetBy, I, Z),
        R::Follow => follow_shape(R::Follow, I, Z),
        R::FollowedBy => follow_shape(R::FollowedBy, Z, I),
    }
}

// `first+ E+ second`, accepting while `second` holds. `first` is the symbol of
// the interval that starts earlier (Z for overlaps, I for overlapped-by).
fn overlap_shape(relation: PrimitiveRelation, first: Symbol, second: Symbol) -> AutomatonDef {
    AutomatonDef::new(relation)
        .initial("idle")
        .state("first")
        .state("both")
        .accepting("overlap")
        .on("idle", &[(first, "first")])
        .otherwise("idle", "idle")
        .on("first", &[(first, "first"), (E, "both")])
        .otherwise("first", "idle")
        .on("both", &[(E, "both"), (second, "overlap"), (first, "first")])
        .otherwise("both", "idle")
        .on("overlap", &[(second, "overlap"), (first, "first")])
        .otherwise("overlap", "idle")
}

// Both intervals open on the same event (out of O or the stream start), then
// `ends_first`'s partner keeps going: accepting while `survivor` holds.
fn start_shape(relation: PrimitiveRelation, survivor: Symbol, other: Symbol) -> AutomatonDef {
    AutomatonDef::new(relation)
        .initial("idle")
        .state("busy")
        .state("both")
        .accepting("started")
        .on("idle", &[(O, "idle"), (E, "both")])
        .otherwise("idle", "busy")
        .on("busy", &[(O, "idle")])
        .otherwise("busy", "busy")
        .on("both", &[(E, "both"), (survivor, "started"), (other, "busy"), (O, "idle")])
        .on("started", &[(survivor, "started"), (O, "idle")])
        .otherwise("started", "busy")
}

// `outer+ E+ outer`: the inner interval opens and closes while `outer` holds.
fn nested_shape(relation: PrimitiveRelation, outer: Symbol, inner: Symbol) -> AutomatonDef {
    AutomatonDef::new(relation)
        .initial("idle")
        .state("outer")
        .state("both")
        .accepting("nested")
        .on("idle", &[(outer, "outer")])
        .otherwise("idle", "idle")
        .on("outer", &[(outer, "outer"), (E, "both")])
        .otherwise("outer", "idle")
        .on("both", &[(E, "both"), (outer, "nested"), (inner, "idle"), (O, "idle")])
        .on("nested", &[(outer, "nested"), (E, "both")])
        .otherwise("nested", "idle")
}

// `longer+ E+ O`: both intervals close on the same event.
fn finish_shape(relation: PrimitiveRelation, longer: Symbol, shorter: Symbol) -> AutomatonDef {
    AutomatonDef::new(relation)
        .initial("idle")
        .state("longer")
        .state("both")
        .accepting("finished")
        .on("idle", &[(longer, "longer")])
        .otherwise("idle", "idle")
        .on("longer", &[(longer, "longer"), (E, "both")])
        .otherwise("longer", "idle")
        .on("both", &[(E, "both"), (O, "finished"), (longer, "longer"), (shorter, "idle")])
        .on("finished", &[(longer, "longer")])
        .otherwise("finished", "idle")
}

fn equals_shape() -> AutomatonDef {
    AutomatonDef::new(PrimitiveRelation::Equals)
        .initial("idle")
        .state("busy")
        .state("both")
        .accepting("equal")
        .on("idle", &[(O, "idle"), (E, "both")])
        .otherwise("idle", "busy")
        .on("busy", &[(O, "idle")])
        .otherwise("busy", "busy")
        .on("both", &[(E, "both"), (O, "equal")])
        .otherwise("both", "busy")
        .on("equal", &[(O, "idle"), (E, "both")])
        .otherwise("equal", "busy")
}

// `first+ second`: one interval hands over to the other on a single event.
fn meet_shape(relation: PrimitiveRelation, first: Symbol, second: Symbol) -> AutomatonDef {
    AutomatonDef::new(relation)
        .initial("idle")
        .state("first")
        .accepting("met")
        .on("idle", &[(first, "first")])
        .otherwise("idle", "idle")
        .on("first", &[(first, "first"), (second, "met")])
        .otherwise("first", "idle")
        .on("met", &[(second, "met"), (first, "first")])
        .otherwise("met", "idle")
}

// `first+ O+ second`: the `second` interval opens after a gap. Every later
// `second` interval separated by a gap follows the same `first` interval.
fn follow_shape(relation: PrimitiveRelation, first: Symbol, second: Symbol) -> AutomatonDef {
    AutomatonDef::new(relation)
        .initial("idle")
        .state("first")
        .state("gap")
        .accepting("followed")
        .on("idle", &[(first, "first")])
        .otherwise("idle", "idle")
        .on("first", &[(first, "first"), (O, "gap")])
        .otherwise("first", "idle")
        .on("gap", &[(O, "gap"), (second, "followed"), (first, "first")])
        .otherwise("gap", "idle")
        .on("followed", &[(second, "followed"), (O, "gap"), (first, "first")])
        .otherwise("followed", "idle")
}

/// Compiled transition tables keyed by relation.
///
/// Tables are immutable and handed out as `Arc`s, so every tracker for the
/// same relation shares one copy.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    tables: BTreeMap<PrimitiveRelation, Arc<TransitionTable>>,
}

impl TableRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the reference automaton of every primitive
    /// relation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedAutomaton`] if a reference definition fails
    /// validation.
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        for relation in PrimitiveRelation::ALL {
            registry.insert(&builtin_definition(relation))?;
        }
        log::debug!("registered {} built-in automata", registry.tables.len());
        Ok(registry)
    }

    /// Compiles `def` and registers it for its relation, replacing any table
    /// already registered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedAutomaton`] if `def` fails validation; the
    /// registry is left unchanged.
    pub fn insert(&mut self, def: &AutomatonDef) -> Result<Arc<TransitionTable>> {
        let table = Arc::new(TransitionTable::build(def)?);
        self.tables.insert(def.relation, Arc::clone(&table));
        Ok(table)
    }

    /// The table for `relation`, if registered.
    #[must_use]
    pub fn get(&self, relation: PrimitiveRelation) -> Option<Arc<TransitionTable>> {
        self.tables.get(&relation).cloned()
    }

    /// The table for `relation`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedAutomaton`] if no table is registered.
    pub fn require(&self, relation: PrimitiveRelation) -> Result<Arc<TransitionTable>> {
        self.get(relation).ok_or_else(|| {
            Error::malformed_automaton(relation.as_str(), "no automaton registered")
        })
    }

    /// Registered relations in order.
    pub fn relations(&self) -> impl Iterator<Item = PrimitiveRelation> + '_ {
        self.tables.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Symbol;
    use crate::automaton::dfa::Dfa;
    use crate::automaton::table::CompletionPolicy;

    fn run(relation: PrimitiveRelation, word: &str) -> Vec<(bool, bool, bool)> {
        let registry = TableRegistry::builtin().unwrap();
        let mut dfa = Dfa::new(registry.require(relation).unwrap());
        word.chars()
            .map(|c| {
                dfa.step(Symbol::parse(&c.to_string()).unwrap());
                (dfa.is_trigger(), dfa.is_final(), dfa.is_completed())
            })
            .collect()
    }

    /// Index of the first triggering step, if any.
    fn trigger_at(relation: PrimitiveRelation, word: &str) -> Option<usize> {
        run(relation, word).iter().position(|&(t, _, _)| t)
    }

    /// Index of the first completing step, if any.
    fn completed_at(relation: PrimitiveRelation, word: &str) -> Option<usize> {
        run(relation, word).iter().position(|&(_, _, c)| c)
    }

    #[test]
    fn test_all_builtins_validate() {
        let registry = TableRegistry::builtin().unwrap();
        let registered: Vec<_> = registry.relations().collect();
        assert_eq!(registered, PrimitiveRelation::ALL.to_vec());
        for relation in PrimitiveRelation::ALL {
            let t = registry.require(relation).unwrap();
            assert_eq!(t.relation(), relation);
            assert!(!t.initial_is_wildcard_only(), "{relation}");
        }
    }

    #[test]
    fn test_overlaps() {
        assert_eq!(trigger_at(PrimitiveRelation::Overlaps, "ZEI"), Some(2));
        assert_eq!(completed_at(PrimitiveRelation::Overlaps, "ZEIIZ"), Some(4));
        assert_eq!(completed_at(PrimitiveRelation::Overlaps, "ZEIO"), Some(3));
        assert_eq!(trigger_at(PrimitiveRelation::Overlaps, "IEZ"), None);
        assert_eq!(trigger_at(PrimitiveRelation::Overlaps, "ZEZ"), None);
        assert_eq!(trigger_at(PrimitiveRelation::Overlaps, "EI"), None);
    }

    #[test]
    fn test_overlapped_by() {
        assert_eq!(trigger_at(PrimitiveRelation::OverlappedBy, "OIEZ"), Some(3));
        assert_eq!(trigger_at(PrimitiveRelation::OverlappedBy, "ZEI"), None);
    }

    #[test]
    fn test_starts() {
        assert_eq!(trigger_at(PrimitiveRelation::Starts, "EI"), Some(1));
        assert_eq!(trigger_at(PrimitiveRelation::Starts, "OEEI"), Some(3));
        assert_eq!(completed_at(PrimitiveRelation::Starts, "EIIO"), Some(3));
        // Latter was already running when the former began.
        assert_eq!(trigger_at(PrimitiveRelation::Starts, "IEI"), None);
        assert_eq!(trigger_at(PrimitiveRelation::Starts, "EZ"), None);
    }

    #[test]
    fn test_started_by() {
        assert_eq!(trigger_at(PrimitiveRelation::StartedBy, "EZ"), Some(1));
        assert_eq!(trigger_at(PrimitiveRelation::StartedBy, "ZEZ"), None);
        assert_eq!(trigger_at(PrimitiveRelation::StartedBy, "EI"), None);
    }

    #[test]
    fn test_during() {
        assert_eq!(trigger_at(PrimitiveRelation::During, "IEI"), Some(2));
        assert_eq!(trigger_at(PrimitiveRelation::During, "IEO"), None);
        assert_eq!(trigger_at(PrimitiveRelation::During, "IEZ"), None);
        // A second former interval inside the same latter retriggers.
        let steps = run(PrimitiveRelation::During, "IEIEI");
        let triggers: Vec<usize> = steps
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.0.then_some(i))
            .collect();
        assert_eq!(triggers, vec![2, 4]);
        assert!(steps[3].2, "leaving acceptance completes the first match");
    }

    #[test]
    fn test_contains() {
        assert_eq!(trigger_at(PrimitiveRelation::Contains, "ZEZ"), Some(2));
        assert_eq!(trigger_at(PrimitiveRelation::Contains, "ZEI"), None);
    }

    #[test]
    fn test_finishes_is_point() {
        let steps = run(PrimitiveRelation::Finishes, "IEOO");
        assert_eq!(steps[2], (true, true, true));
        assert_eq!(steps[3], (false, false, false));
        assert_eq!(trigger_at(PrimitiveRelation::Finishes, "EO"), None);
        assert_eq!(trigger_at(PrimitiveRelation::Finishes, "IEI"), None);
    }

    #[test]
    fn test_finished_by_is_point() {
        let steps = run(PrimitiveRelation::FinishedBy, "ZZEO");
        assert_eq!(steps[3], (true, true, true));
        assert_eq!(trigger_at(PrimitiveRelation::FinishedBy, "IEO"), None);
    }

    #[test]
    fn test_equals() {
        let steps = run(PrimitiveRelation::Equals, "EEO");
        assert_eq!(steps[2], (true, true, true));
        assert_eq!(trigger_at(PrimitiveRelation::Equals, "OEO"), Some(2));
        assert_eq!(trigger_at(PrimitiveRelation::Equals, "ZEO"), None);
        assert_eq!(trigger_at(PrimitiveRelation::Equals, "EZO"), None);
        // Back-to-back equal pairs.
        let steps = run(PrimitiveRelation::Equals, "EOEO");
        assert!(steps[1].0 && steps[3].0);
    }

    #[test]
    fn test_meets() {
        assert_eq!(trigger_at(PrimitiveRelation::Meets, "ZZI"), Some(2));
        assert_eq!(completed_at(PrimitiveRelation::Meets, "ZIIO"), Some(3));
        assert_eq!(trigger_at(PrimitiveRelation::Meets, "ZOI"), None);
        assert_eq!(trigger_at(PrimitiveRelation::Meets, "ZEI"), None);
    }

    #[test]
    fn test_met_by() {
        assert_eq!(trigger_at(PrimitiveRelation::MetBy, "IZ"), Some(1));
        assert_eq!(trigger_at(PrimitiveRelation::MetBy, "IOZ"), None);
    }

    #[test]
    fn test_follow() {
        assert_eq!(trigger_at(PrimitiveRelation::Follow, "IOOZ"), Some(3));
        assert_eq!(trigger_at(PrimitiveRelation::Follow, "IZ"), None);
        assert_eq!(completed_at(PrimitiveRelation::Follow, "IOZZO"), Some(4));
    }

    #[test]
    fn test_followed_by() {
        assert_eq!(trigger_at(PrimitiveRelation::FollowedBy, "ZOI"), Some(2));
        assert_eq!(trigger_at(PrimitiveRelation::FollowedBy, "ZI"), None);
        // Another latter interval after a gap follows the same former one.
        let steps = run(PrimitiveRelation::FollowedBy, "ZOIOI");
        assert!(steps[2].0 && steps[4].0);
    }

    #[test]
    fn test_converse_shapes_mirror() {
        // Swapping Z and I in a word maps a relation's matches onto its converse.
        let swap = |w: &str| -> String {
            w.chars()
                .map(|c| match c {
                    'Z' => 'I',
                    'I' => 'Z',
                    other => other,
                })
                .collect()
        };
        for (relation, word) in [
            (PrimitiveRelation::Overlaps, "OZEIO"),
            (PrimitiveRelation::Starts, "EIO"),
            (PrimitiveRelation::During, "IEIO"),
            (PrimitiveRelation::Finishes, "IEOO"),
            (PrimitiveRelation::Meets, "ZIO"),
            (PrimitiveRelation::Follow, "IOZO"),
        ] {
            assert_eq!(
                run(relation, word),
                run(relation.converse(), &swap(word)),
                "{relation} vs {}",
                relation.converse()
            );
        }
    }

    #[test]
    fn test_completion_policies() {
        let registry = TableRegistry::builtin().unwrap();
        for relation in PrimitiveRelation::ALL {
            let expected = if relation.is_point_accepting() {
                CompletionPolicy::OnTrigger
            } else {
                CompletionPolicy::OnExit
            };
            assert_eq!(registry.require(relation).unwrap().completion_policy(), expected);
        }
    }

    #[test]
    fn test_definition_json_round_trip() {
        let def = builtin_definition(PrimitiveRelation::Overlaps);
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["relation"], "overlaps");
        assert_eq!(json["states"][0]["name"], "idle");
        assert_eq!(json["states"][3]["final"], true);
        assert_eq!(json["edges"][1]["label"], "*");

        let back: AutomatonDef = serde_json::from_value(json).unwrap();
        assert_eq!(back, def);
        let mut registry = TableRegistry::new();
        registry.insert(&back).unwrap();
        assert_eq!(registry.relations().count(), 1);
    }

    #[test]
    fn test_require_missing() {
        let err = TableRegistry::new()
            .require(PrimitiveRelation::Meets)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedAutomaton { .. }));
    }

    #[test]
    fn test_insert_replaces_and_rejects() {
        let mut registry = TableRegistry::builtin().unwrap();
        let custom = AutomatonDef::new(PrimitiveRelation::Meets)
            .initial("idle")
            .accepting("hit")
            .on("idle", &[(E, "hit")])
            .otherwise("idle", "idle")
            .otherwise("hit", "idle");
        registry.insert(&custom).unwrap();
        assert_eq!(
            registry.require(PrimitiveRelation::Meets).unwrap().states().len(),
            2
        );

        let broken = AutomatonDef::new(PrimitiveRelation::Meets).initial("idle");
        assert!(registry.insert(&broken).is_err());
        assert_eq!(
            registry.require(PrimitiveRelation::Meets).unwrap().states().len(),
            2
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::alphabet::Symbol;
    use crate::automaton::dfa::Dfa;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn builtins_are_total_over_any_stream(
            rel_idx in 0..13usize,
            symbols in proptest::collection::vec(prop::sample::select(Symbol::ALL.to_vec()), 0..80),
        ) {
            let relation = PrimitiveRelation::ALL[rel_idx];
            let registry = TableRegistry::builtin().unwrap();
            let mut dfa = Dfa::new(registry.require(relation).unwrap());
            for s in symbols {
                prop_assert!(dfa.try_step(s).is_ok());
                if relation.is_point_accepting() {
                    prop_assert_eq!(dfa.is_completed(), dfa.is_trigger());
                }
            }
        }
    }
}
