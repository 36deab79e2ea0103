// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Pair tracker: one automaton, one classifier, four interval endpoints.
//!
//! Each event is classified, fed to the automaton, and, if the automaton moved
//! to a different state, tested against four edges of the symbol stream:
//!
//! | Edge | previous symbol | current symbol | Records |
//! |------|-----------------|----------------|---------|
//! | former start | `O`, `I` or none | `Z`, `E` | former start |
//! | former end | `Z`, `E` | `O`, `I` | former end |
//! | latter start | `O`, `Z` or none | `I`, `E` | latter start |
//! | latter end | `I`, `E` | `O`, `Z` | latter end |
//!
//! Endpoints move only on state changes, so a repeated symbol never touches
//! them. When the automaton triggers, the current endpoints are snapshotted as
//! an [`IntervalPair`]; that snapshot is closed off by later end edges and
//! emitted again, completed, when the automaton completes.

use std::sync::Arc;

use crate::alphabet::{Classifier, PriorSymbol, Symbol};
use crate::automaton::dfa::Dfa;
use crate::automaton::table::TransitionTable;
use crate::common::event::EventRef;
use crate::error::{Error, Result};
use crate::relation::Relation;
use crate::tracker::interval::{IntervalCandidate, IntervalPair};

#[derive(Debug, Clone, Default)]
struct Endpoints {
    start: Option<EventRef>,
    end: Option<EventRef>,
    open: bool,
}

impl Endpoints {
    fn open_at(&mut self, event: &EventRef) {
        self.start = Some(Arc::clone(event));
        self.open = true;
    }

    fn close_at(&mut self, event: &EventRef) {
        self.end = Some(Arc::clone(event));
        self.open = false;
    }

    /// Start and, unless a newer start superseded it, end of the interval.
    fn current(&self) -> Option<(EventRef, Option<EventRef>)> {
        let start = self.start.clone()?;
        let end = if self.open { None } else { self.end.clone() };
        Some((start, end))
    }
}

/// Tracks one relation between the former and latter intervals of a stream.
#[derive(Debug, Clone)]
pub struct PiePair {
    dfa: Dfa,
    classifier: Arc<Classifier>,
    relation: Relation,
    last_symbol: PriorSymbol,
    current_symbol: PriorSymbol,
    former: Endpoints,
    latter: Endpoints,
    matched: Option<IntervalPair>,
}

impl PiePair {
    /// Creates a tracker over `table`, reporting under the table's relation.
    #[must_use]
    pub fn new(table: Arc<TransitionTable>, classifier: Arc<Classifier>) -> Self {
        let relation = table.relation().into();
        Self::with_relation(table, classifier, relation)
    }

    /// Creates a tracker whose results are reported as `relation`, e.g.
    /// `before` for a `followed-by` automaton expanded from a `before` term.
    #[must_use]
    pub fn with_relation(
        table: Arc<TransitionTable>,
        classifier: Arc<Classifier>,
        relation: Relation,
    ) -> Self {
        Self {
            dfa: Dfa::new(table),
            classifier,
            relation,
            last_symbol: PriorSymbol::Start,
            current_symbol: PriorSymbol::Start,
            former: Endpoints::default(),
            latter: Endpoints::default(),
            matched: None,
        }
    }

    /// Processes the next event of the stream.
    ///
    /// Returns the matched pair when this step triggers or completes the
    /// relation, `None` otherwise.
    pub fn step_by_event(&mut self, event: EventRef) -> Option<IntervalPair> {
        let symbol = self.classifier.classify_event(&event);
        self.last_symbol = self.current_symbol;
        self.current_symbol = PriorSymbol::Seen(symbol);
        self.dfa.step(symbol);

        if self.dfa.is_state_changed() {
            self.update_endpoints(self.last_symbol, symbol, &event);
        }

        if self.dfa.is_trigger() {
            self.matched = self.snapshot();
        }
        if self.dfa.is_completed() {
            let mut done = self.matched.take().or_else(|| self.snapshot())?;
            done.is_completed = true;
            log::trace!("{}: completed {done}", self.dfa.relation());
            return Some(done);
        }
        if self.dfa.is_trigger() {
            log::trace!("{}: triggered", self.dfa.relation());
            return self.matched.clone();
        }
        None
    }

    /// [`step_by_event`](Self::step_by_event) for an event that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `event` is `None`. The tracker is
    /// left unchanged.
    pub fn try_step_event(&mut self, event: Option<EventRef>) -> Result<Option<IntervalPair>> {
        let event = event
            .ok_or_else(|| Error::InvalidInput("cannot step on an absent event".to_string()))?;
        Ok(self.step_by_event(event))
    }

    fn update_endpoints(&mut self, last: PriorSymbol, current: Symbol, event: &EventRef) {
        let was_former = last.symbol().is_some_and(Symbol::former_holds);
        let was_latter = last.symbol().is_some_and(Symbol::latter_holds);

        match (was_former, current.former_holds()) {
            (false, true) => {
                log::trace!("former starts at {}", event.timestamp_us);
                self.former.open_at(event);
            }
            (true, false) => {
                log::trace!("former ends at {}", event.timestamp_us);
                self.former.close_at(event);
                if let Some(m) = self.matched.as_mut() {
                    m.close_former(event);
                }
            }
            _ => {}
        }
        match (was_latter, current.latter_holds()) {
            (false, true) => {
                log::trace!("latter starts at {}", event.timestamp_us);
                self.latter.open_at(event);
            }
            (true, false) => {
                log::trace!("latter ends at {}", event.timestamp_us);
                self.latter.close_at(event);
                if let Some(m) = self.matched.as_mut() {
                    m.close_latter(event);
                }
            }
            _ => {}
        }
    }

    fn snapshot(&self) -> Option<IntervalPair> {
        Some(IntervalPair::new(
            self.relation,
            self.former.current()?,
            self.latter.current()?,
            false,
        ))
    }

    /// Returns to the initial configuration, forgetting all endpoints.
    pub fn reset(&mut self) {
        self.dfa.reset();
        self.last_symbol = PriorSymbol::Start;
        self.current_symbol = PriorSymbol::Start;
        self.former = Endpoints::default();
        self.latter = Endpoints::default();
        self.matched = None;
    }

    /// Relation results are reported under.
    #[must_use]
    pub const fn relation(&self) -> Relation {
        self.relation
    }

    /// The underlying automaton.
    #[must_use]
    pub const fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// See [`Dfa::is_final`].
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.dfa.is_final()
    }

    /// See [`Dfa::is_trigger`].
    #[must_use]
    pub fn is_trigger(&self) -> bool {
        self.dfa.is_trigger()
    }

    /// See [`Dfa::is_completed`].
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.dfa.is_completed()
    }

    /// See [`Dfa::is_state_changed`].
    #[must_use]
    pub const fn is_state_changed(&self) -> bool {
        self.dfa.is_state_changed()
    }

    /// Symbol of the most recent event.
    #[must_use]
    pub const fn current_symbol(&self) -> PriorSymbol {
        self.current_symbol
    }

    /// Symbol of the event before the most recent one.
    #[must_use]
    pub const fn last_symbol(&self) -> PriorSymbol {
        self.last_symbol
    }

    /// Most recent former-start event.
    #[must_use]
    pub const fn former_start(&self) -> Option<&EventRef> {
        self.former.start.as_ref()
    }

    /// Most recent former-end event.
    #[must_use]
    pub const fn former_end(&self) -> Option<&EventRef> {
        self.former.end.as_ref()
    }

    /// Most recent latter-start event.
    #[must_use]
    pub const fn latter_start(&self) -> Option<&EventRef> {
        self.latter.start.as_ref()
    }

    /// Most recent latter-end event.
    #[must_use]
    pub const fn latter_end(&self) -> Option<&EventRef> {
        self.latter.end.as_ref()
    }

    /// The former interval as currently tracked. Its end is `None` while it
    /// is still open.
    #[must_use]
    pub fn former_interval(&self) -> Option<IntervalCandidate> {
        let (start, end) = self.former.current()?;
        Some(IntervalCandidate::new(
            Arc::clone(self.classifier.former()),
            start,
            end,
        ))
    }

    /// The latter interval as currently tracked.
    #[must_use]
    pub fn latter_interval(&self) -> Option<IntervalCandidate> {
        let (start, end) = self.latter.current()?;
        Some(IntervalCandidate::new(
            Arc::clone(self.classifier.latter()),
            start,
            end,
        ))
    }

    /// The pair matched by the last trigger while it is pending, otherwise the
    /// pair formed by the current endpoints.
    #[must_use]
    pub fn interval_pair(&self) -> Option<IntervalPair> {
        self.matched.clone().or_else(|| self.snapshot())
    }
}
