// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Transition tables: the validated, immutable half of an automaton.
//!
//! A table is described by an [`AutomatonDef`] (states plus labeled edges,
//! as delivered by an external graph loader or by the built-in definitions)
//! and compiled by [`TransitionTable::build`] into a flat layout:
//!
//! ```text
//! explicit: [Option<StateId>; num_states * 4]   row = state, column = symbol
//! wildcard: [Option<StateId>; num_states]       per-state default edge
//! ```
//!
//! Validation guarantees totality: every state resolves every symbol, either
//! through an explicit entry or through its wildcard default. Stepping is two
//! array reads.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::alphabet::Symbol;
use crate::error::{Error, Result};
use crate::relation::PrimitiveRelation;

/// Index of a state within its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    /// Position of the state in [`TransitionTable::states`].
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named automaton state. Equality and hashing use the name only.
#[derive(Debug, Clone)]
pub struct State {
    name: String,
    is_final: bool,
}

impl State {
    /// State name, unique within its table.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true for accepting states.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.is_final
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// When a tracker reports a matched pair as completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionPolicy {
    /// Completion coincides with the trigger (point-coincident relations).
    OnTrigger,
    /// Completion is the falling edge out of acceptance.
    OnExit,
}

impl CompletionPolicy {
    /// Policy governing `relation`.
    #[must_use]
    pub const fn for_relation(relation: PrimitiveRelation) -> Self {
        if relation.is_point_accepting() {
            Self::OnTrigger
        } else {
            Self::OnExit
        }
    }
}

/// Edge label: one symbol, or the per-state wildcard default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EdgeLabel {
    /// Taken on exactly this symbol.
    Symbol(Symbol),
    /// Taken when no symbol-specific edge matches.
    Wildcard,
}

impl TryFrom<String> for EdgeLabel {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        if s.trim() == "*" {
            return Ok(Self::Wildcard);
        }
        Symbol::parse(&s)
            .map(Self::Symbol)
            .ok_or_else(|| Error::malformed_automaton("?", format!("unknown edge label '{s}'")))
    }
}

impl From<EdgeLabel> for String {
    fn from(label: EdgeLabel) -> Self {
        label.to_string()
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol(s) => write!(f, "{s}"),
            Self::Wildcard => f.write_str("*"),
        }
    }
}

/// One state in an [`AutomatonDef`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDef {
    /// Unique state name.
    pub name: String,
    /// Accepting state.
    #[serde(default, rename = "final")]
    pub is_final: bool,
    /// Start state; exactly one per automaton.
    #[serde(default)]
    pub initial: bool,
}

/// One labeled edge in an [`AutomatonDef`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDef {
    /// Source state name.
    pub from: String,
    /// Symbol or wildcard.
    pub label: EdgeLabel,
    /// Target state name.
    pub to: String,
}

/// Declarative description of one relation's automaton.
///
/// This is the hand-off format from an external topology loader. It carries
/// no guarantees until compiled by [`TransitionTable::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonDef {
    /// Relation this automaton decides.
    pub relation: PrimitiveRelation,
    /// States in declaration order.
    pub states: Vec<StateDef>,
    /// Labeled edges.
    pub edges: Vec<EdgeDef>,
}

impl AutomatonDef {
    /// Starts an empty definition for `relation`.
    #[must_use]
    pub const fn new(relation: PrimitiveRelation) -> Self {
        Self {
            relation,
            states: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Adds the (non-accepting) initial state.
    #[must_use]
    pub fn initial(mut self, name: &str) -> Self {
        self.states.push(StateDef {
            name: name.to_string(),
            is_final: false,
            initial: true,
        });
        self
    }

    /// Adds a non-accepting state.
    #[must_use]
    pub fn state(mut self, name: &str) -> Self {
        self.states.push(StateDef {
            name: name.to_string(),
            is_final: false,
            initial: false,
        });
        self
    }

    /// Adds an accepting state.
    #[must_use]
    pub fn accepting(mut self, name: &str) -> Self {
        self.states.push(StateDef {
            name: name.to_string(),
            is_final: true,
            initial: false,
        });
        self
    }

    /// Adds symbol-labeled edges out of `from`.
    #[must_use]
    pub fn on(mut self, from: &str, edges: &[(Symbol, &str)]) -> Self {
        for &(symbol, to) in edges {
            self.edges.push(EdgeDef {
                from: from.to_string(),
                label: EdgeLabel::Symbol(symbol),
                to: to.to_string(),
            });
        }
        self
    }

    /// Adds the wildcard default edge out of `from`.
    #[must_use]
    pub fn otherwise(mut self, from: &str, to: &str) -> Self {
        self.edges.push(EdgeDef {
            from: from.to_string(),
            label: EdgeLabel::Wildcard,
            to: to.to_string(),
        });
        self
    }
}

/// A validated, total transition table for one primitive relation.
///
/// Immutable after [`build`](Self::build); share it between automaton
/// instances through an `Arc`.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    relation: PrimitiveRelation,
    states: Vec<State>,
    initial: StateId,
    explicit: Vec<Option<StateId>>,
    wildcard: Vec<Option<StateId>>,
    initial_wildcard_only: bool,
}

impl TransitionTable {
    /// Compiles and validates a definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedAutomaton`] if the definition has no states,
    /// duplicate state names, not exactly one initial state, no accepting
    /// state, an edge naming an unknown state, two edges with the same source
    /// and label, or a state that leaves some symbol unresolved.
    pub fn build(def: &AutomatonDef) -> Result<Self> {
        let relation = def.relation;
        let fail = |message: String| Error::malformed_automaton(relation.as_str(), message);

        if def.states.is_empty() {
            return Err(fail("automaton has no states".to_string()));
        }

        let mut ids: HashMap<&str, StateId> = HashMap::with_capacity(def.states.len());
        let mut states = Vec::with_capacity(def.states.len());
        let mut initial: Option<StateId> = None;
        for (i, s) in def.states.iter().enumerate() {
            let id = StateId(u32::try_from(i).map_err(|_| fail("too many states".to_string()))?);
            if ids.insert(s.name.as_str(), id).is_some() {
                return Err(fail(format!("duplicate state '{}'", s.name)));
            }
            if s.initial {
                if let Some(prev) = initial.replace(id) {
                    return Err(fail(format!(
                        "multiple initial states: '{}' and '{}'",
                        def.states[prev.index()].name, s.name
                    )));
                }
            }
            states.push(State {
                name: s.name.clone(),
                is_final: s.is_final,
            });
        }
        let initial = initial.ok_or_else(|| fail("no initial state".to_string()))?;
        if !states.iter().any(State::is_final) {
            return Err(fail("no accepting state".to_string()));
        }

        let lookup = |name: &str| {
            ids.get(name)
                .copied()
                .ok_or_else(|| fail(format!("edge references unknown state '{name}'")))
        };

        let mut explicit = vec![None; states.len() * Symbol::ALL.len()];
        let mut wildcard = vec![None; states.len()];
        for edge in &def.edges {
            let from = lookup(&edge.from)?;
            let to = lookup(&edge.to)?;
            let slot = match edge.label {
                EdgeLabel::Symbol(sym) => &mut explicit[slot_index(from, sym)],
                EdgeLabel::Wildcard => &mut wildcard[from.index()],
            };
            if slot.replace(to).is_some() {
                return Err(fail(format!(
                    "state '{}' has more than one '{}' edge",
                    edge.from, edge.label
                )));
            }
        }

        for (i, state) in states.iter().enumerate() {
            if wildcard[i].is_some() {
                continue;
            }
            let row = &explicit[i * Symbol::ALL.len()..(i + 1) * Symbol::ALL.len()];
            if let Some(missing) = Symbol::ALL.into_iter().find(|s| row[s.index()].is_none()) {
                return Err(fail(format!(
                    "state '{state}' has no '{missing}' edge and no wildcard default"
                )));
            }
        }

        let initial_row = &explicit
            [initial.index() * Symbol::ALL.len()..(initial.index() + 1) * Symbol::ALL.len()];
        let initial_wildcard_only =
            wildcard[initial.index()].is_some() && initial_row.iter().all(Option::is_none);

        log::debug!(
            "built automaton for '{relation}': {} states, {} edges, initial '{}'",
            states.len(),
            def.edges.len(),
            states[initial.index()]
        );

        Ok(Self {
            relation,
            states,
            initial,
            explicit,
            wildcard,
            initial_wildcard_only,
        })
    }

    /// Relation this table decides.
    #[must_use]
    pub const fn relation(&self) -> PrimitiveRelation {
        self.relation
    }

    /// Completion policy of the governing relation.
    #[must_use]
    pub const fn completion_policy(&self) -> CompletionPolicy {
        CompletionPolicy::for_relation(self.relation)
    }

    /// The initial state.
    #[must_use]
    pub const fn initial(&self) -> StateId {
        self.initial
    }

    /// All states in declaration order.
    #[must_use]
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// The state with the given id.
    #[must_use]
    #[inline]
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }

    /// Looks a state up by name.
    #[must_use]
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .position(|s| s.name == name)
            .and_then(|i| u32::try_from(i).ok())
            .map(StateId)
    }

    /// Returns true when the initial state's only outgoing edge is its
    /// wildcard default.
    #[must_use]
    pub const fn initial_is_wildcard_only(&self) -> bool {
        self.initial_wildcard_only
    }

    /// The explicit edge for `(from, symbol)`.
    #[must_use]
    #[inline]
    pub fn explicit(&self, from: StateId, symbol: Symbol) -> Option<StateId> {
        self.explicit.get(slot_index(from, symbol)).copied().flatten()
    }

    /// The wildcard default of `from`.
    #[must_use]
    #[inline]
    pub fn wildcard(&self, from: StateId) -> Option<StateId> {
        self.wildcard.get(from.index()).copied().flatten()
    }

    /// Resolves `(from, symbol)`: explicit edge first, then the wildcard.
    #[must_use]
    #[inline]
    pub fn resolve(&self, from: StateId, symbol: Symbol) -> Option<StateId> {
        self.explicit(from, symbol).or_else(|| self.wildcard(from))
    }
}

#[inline]
const fn slot_index(from: StateId, symbol: Symbol) -> usize {
    from.index() * Symbol::ALL.len() + symbol.index()
}
