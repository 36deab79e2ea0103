// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Relation algebra: relation identifiers and composite-relation expansion.
//!
//! Three enumerations overlap:
//!
//! | Enum | Members | Role |
//! |------|---------|------|
//! | [`PrimitiveRelation`] | 11 Allen relations without before/after, plus `follow`, `followed-by` | One automaton each |
//! | [`AllenRelation`] | The classical 13 | Query vocabulary |
//! | [`Relation`] | Union of both (15) | Canonical form carried by results |
//!
//! `before` and `after` have no automaton of their own. A query term that
//! names them is expanded by [`expand_relations`] into a disjunction of
//! primitive relations, each tracked by its own automaton; the consumer ORs
//! their trigger signals.
//!
//! | Composite | Expands to |
//! |-----------|------------|
//! | `before` | `followed-by` ∪ [`BEFORE_LIKE`] |
//! | `after`  | `follow` ∪ [`AFTER_LIKE`] |

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Canonical relation between a former and a latter interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    /// Former ends no later than latter starts (composite: `followed-by` or
    /// `meets`).
    Before,
    /// Former starts no earlier than latter ends (composite: `follow` or
    /// `met-by`).
    After,
    /// Former starts first, latter starts inside former, former ends inside latter.
    Overlaps,
    /// Converse of `overlaps`.
    OverlappedBy,
    /// Both start together, former ends first.
    Starts,
    /// Both start together, latter ends first.
    StartedBy,
    /// Former lies strictly inside latter.
    During,
    /// Latter lies strictly inside former.
    Contains,
    /// Former starts after latter, both end together.
    Finishes,
    /// Latter starts after former, both end together.
    FinishedBy,
    /// Both start and end together.
    Equals,
    /// Former ends exactly where latter starts.
    Meets,
    /// Latter ends exactly where former starts.
    MetBy,
    /// Former occurs after latter with a gap (point-event stream form of `after`).
    Follow,
    /// Latter occurs after former with a gap (point-event stream form of `before`).
    FollowedBy,
}

/// Relation with exactly one automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveRelation {
    /// See [`Relation::Overlaps`].
    Overlaps,
    /// See [`Relation::OverlappedBy`].
    OverlappedBy,
    /// See [`Relation::Starts`].
    Starts,
    /// See [`Relation::StartedBy`].
    StartedBy,
    /// See [`Relation::During`].
    During,
    /// See [`Relation::Contains`].
    Contains,
    /// See [`Relation::Finishes`].
    Finishes,
    /// See [`Relation::FinishedBy`].
    FinishedBy,
    /// See [`Relation::Equals`].
    Equals,
    /// See [`Relation::Meets`].
    Meets,
    /// See [`Relation::MetBy`].
    MetBy,
    /// See [`Relation::Follow`].
    Follow,
    /// See [`Relation::FollowedBy`].
    FollowedBy,
}

/// Allen's thirteen interval relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllenRelation {
    /// See [`Relation::Before`].
    Before,
    /// See [`Relation::After`].
    After,
    /// See [`Relation::Overlaps`].
    Overlaps,
    /// See [`Relation::OverlappedBy`].
    OverlappedBy,
    /// See [`Relation::Starts`].
    Starts,
    /// See [`Relation::StartedBy`].
    StartedBy,
    /// See [`Relation::During`].
    During,
    /// See [`Relation::Contains`].
    Contains,
    /// See [`Relation::Finishes`].
    Finishes,
    /// See [`Relation::FinishedBy`].
    FinishedBy,
    /// See [`Relation::Equals`].
    Equals,
    /// See [`Relation::Meets`].
    Meets,
    /// See [`Relation::MetBy`].
    MetBy,
}

/// Primitive relations OR-ed into `before` besides `followed-by`.
pub const BEFORE_LIKE: [PrimitiveRelation; 1] = [PrimitiveRelation::Meets];

/// Primitive relations OR-ed into `after` besides `follow`.
pub const AFTER_LIKE: [PrimitiveRelation; 1] = [PrimitiveRelation::MetBy];

impl Relation {
    /// Every canonical relation.
    pub const ALL: [Self; 15] = [
        Self::Before,
        Self::After,
        Self::Overlaps,
        Self::OverlappedBy,
        Self::Starts,
        Self::StartedBy,
        Self::During,
        Self::Contains,
        Self::Finishes,
        Self::FinishedBy,
        Self::Equals,
        Self::Meets,
        Self::MetBy,
        Self::Follow,
        Self::FollowedBy,
    ];

    /// Kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Overlaps => "overlaps",
            Self::OverlappedBy => "overlapped-by",
            Self::Starts => "starts",
            Self::StartedBy => "started-by",
            Self::During => "during",
            Self::Contains => "contains",
            Self::Finishes => "finishes",
            Self::FinishedBy => "finished-by",
            Self::Equals => "equals",
            Self::Meets => "meets",
            Self::MetBy => "met-by",
            Self::Follow => "follow",
            Self::FollowedBy => "followed-by",
        }
    }

    /// Parses a relation name, ignoring case, `-`, `_` and spaces, so
    /// `overlapped-by`, `OVERLAPPED_BY` and `overlappedBy` are all accepted.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|r| normalize(r.as_str()) == wanted)
    }

    /// The primitive relation with the same meaning, or `None` for
    /// `before`/`after`.
    #[must_use]
    pub const fn as_primitive(self) -> Option<PrimitiveRelation> {
        Some(match self {
            Self::Before | Self::After => return None,
            Self::Overlaps => PrimitiveRelation::Overlaps,
            Self::OverlappedBy => PrimitiveRelation::OverlappedBy,
            Self::Starts => PrimitiveRelation::Starts,
            Self::StartedBy => PrimitiveRelation::StartedBy,
            Self::During => PrimitiveRelation::During,
            Self::Contains => PrimitiveRelation::Contains,
            Self::Finishes => PrimitiveRelation::Finishes,
            Self::FinishedBy => PrimitiveRelation::FinishedBy,
            Self::Equals => PrimitiveRelation::Equals,
            Self::Meets => PrimitiveRelation::Meets,
            Self::MetBy => PrimitiveRelation::MetBy,
            Self::Follow => PrimitiveRelation::Follow,
            Self::FollowedBy => PrimitiveRelation::FollowedBy,
        })
    }

    /// The Allen relation with the same meaning, or `None` for
    /// `follow`/`followed-by`.
    #[must_use]
    pub const fn as_allen(self) -> Option<AllenRelation> {
        Some(match self {
            Self::Follow | Self::FollowedBy => return None,
            Self::Before => AllenRelation::Before,
            Self::After => AllenRelation::After,
            Self::Overlaps => AllenRelation::Overlaps,
            Self::OverlappedBy => AllenRelation::OverlappedBy,
            Self::Starts => AllenRelation::Starts,
            Self::StartedBy => AllenRelation::StartedBy,
            Self::During => AllenRelation::During,
            Self::Contains => AllenRelation::Contains,
            Self::Finishes => AllenRelation::Finishes,
            Self::FinishedBy => AllenRelation::FinishedBy,
            Self::Equals => AllenRelation::Equals,
            Self::Meets => AllenRelation::Meets,
            Self::MetBy => AllenRelation::MetBy,
        })
    }

    /// Returns true for `before` and `after`.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::Before | Self::After)
    }

    /// The relation obtained by swapping former and latter.
    #[must_use]
    pub const fn converse(self) -> Self {
        match self {
            Self::Before => Self::After,
            Self::After => Self::Before,
            Self::Overlaps => Self::OverlappedBy,
            Self::OverlappedBy => Self::Overlaps,
            Self::Starts => Self::StartedBy,
            Self::StartedBy => Self::Starts,
            Self::During => Self::Contains,
            Self::Contains => Self::During,
            Self::Finishes => Self::FinishedBy,
            Self::FinishedBy => Self::Finishes,
            Self::Equals => Self::Equals,
            Self::Meets => Self::MetBy,
            Self::MetBy => Self::Meets,
            Self::Follow => Self::FollowedBy,
            Self::FollowedBy => Self::Follow,
        }
    }
}

impl PrimitiveRelation {
    /// Every primitive relation.
    pub const ALL: [Self; 13] = [
        Self::Overlaps,
        Self::OverlappedBy,
        Self::Starts,
        Self::StartedBy,
        Self::During,
        Self::Contains,
        Self::Finishes,
        Self::FinishedBy,
        Self::Equals,
        Self::Meets,
        Self::MetBy,
        Self::Follow,
        Self::FollowedBy,
    ];

    /// Kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        Relation::from_primitive(self).as_str()
    }

    /// Parses a relation name; composite names are rejected.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Relation::parse(s).and_then(Relation::as_primitive)
    }

    /// Returns true for relations whose acceptance is a single point in the
    /// stream: completion coincides with the trigger.
    #[must_use]
    pub const fn is_point_accepting(self) -> bool {
        matches!(self, Self::Finishes | Self::FinishedBy | Self::Equals)
    }

    /// The primitive relation obtained by swapping former and latter.
    #[must_use]
    pub const fn converse(self) -> Self {
        match Relation::from_primitive(self).converse().as_primitive() {
            Some(r) => r,
            None => self,
        }
    }
}

impl AllenRelation {
    /// Every Allen relation.
    pub const ALL: [Self; 13] = [
        Self::Before,
        Self::After,
        Self::Overlaps,
        Self::OverlappedBy,
        Self::Starts,
        Self::StartedBy,
        Self::During,
        Self::Contains,
        Self::Finishes,
        Self::FinishedBy,
        Self::Equals,
        Self::Meets,
        Self::MetBy,
    ];

    /// Kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        Relation::from_allen(self).as_str()
    }

    /// Parses a relation name; `follow`/`followed-by` are rejected.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Relation::parse(s).and_then(Relation::as_allen)
    }
}

impl Relation {
    const fn from_primitive(r: PrimitiveRelation) -> Self {
        match r {
            PrimitiveRelation::Overlaps => Self::Overlaps,
            PrimitiveRelation::OverlappedBy => Self::OverlappedBy,
            PrimitiveRelation::Starts => Self::Starts,
            PrimitiveRelation::StartedBy => Self::StartedBy,
            PrimitiveRelation::During => Self::During,
            PrimitiveRelation::Contains => Self::Contains,
            PrimitiveRelation::Finishes => Self::Finishes,
            PrimitiveRelation::FinishedBy => Self::FinishedBy,
            PrimitiveRelation::Equals => Self::Equals,
            PrimitiveRelation::Meets => Self::Meets,
            PrimitiveRelation::MetBy => Self::MetBy,
            PrimitiveRelation::Follow => Self::Follow,
            PrimitiveRelation::FollowedBy => Self::FollowedBy,
        }
    }

    const fn from_allen(r: AllenRelation) -> Self {
        match r {
            AllenRelation::Before => Self::Before,
            AllenRelation::After => Self::After,
            AllenRelation::Overlaps => Self::Overlaps,
            AllenRelation::OverlappedBy => Self::OverlappedBy,
            AllenRelation::Starts => Self::Starts,
            AllenRelation::StartedBy => Self::StartedBy,
            AllenRelation::During => Self::During,
            AllenRelation::Contains => Self::Contains,
            AllenRelation::Finishes => Self::Finishes,
            AllenRelation::FinishedBy => Self::FinishedBy,
            AllenRelation::Equals => Self::Equals,
            AllenRelation::Meets => Self::Meets,
            AllenRelation::MetBy => Self::MetBy,
        }
    }
}

impl From<PrimitiveRelation> for Relation {
    fn from(r: PrimitiveRelation) -> Self {
        Self::from_primitive(r)
    }
}

impl From<AllenRelation> for Relation {
    fn from(r: AllenRelation) -> Self {
        Self::from_allen(r)
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

macro_rules! relation_text {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse(s).ok_or_else(|| Error::UnknownRelation(s.to_string()))
            }
        }
    )*};
}

relation_text!(Relation, PrimitiveRelation, AllenRelation);

/// A query term after composite relations have been expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RelationTerm {
    /// Primitive relations to instantiate automata for, deduplicated and ordered.
    pub primitives: BTreeSet<PrimitiveRelation>,
    /// The relations exactly as the term listed them.
    pub original: Vec<Relation>,
    /// `before` was listed: trigger signals must be OR-ed across its expansion.
    pub has_before: bool,
    /// `after` was listed: trigger signals must be OR-ed across its expansion.
    pub has_after: bool,
}

impl RelationTerm {
    /// The canonical relation a primitive's results should be reported as.
    ///
    /// A primitive listed directly reports as itself. One that is only present
    /// because of a composite expansion reports as that composite.
    #[must_use]
    pub fn reported_relation(&self, primitive: PrimitiveRelation) -> Relation {
        let direct = Relation::from(primitive);
        if self.original.contains(&direct) {
            return direct;
        }
        if self.has_before && expansion(Relation::Before).contains(&primitive) {
            return Relation::Before;
        }
        if self.has_after && expansion(Relation::After).contains(&primitive) {
            return Relation::After;
        }
        direct
    }
}

fn expansion(relation: Relation) -> Vec<PrimitiveRelation> {
    match relation {
        Relation::Before => {
            let mut v = vec![PrimitiveRelation::FollowedBy];
            v.extend_from_slice(&BEFORE_LIKE);
            v
        }
        Relation::After => {
            let mut v = vec![PrimitiveRelation::Follow];
            v.extend_from_slice(&AFTER_LIKE);
            v
        }
        other => other.as_primitive().into_iter().collect(),
    }
}

/// Expands the relations of one query term into the primitive relations to
/// track.
///
/// # Examples
///
/// ```
/// use pierel::relation::{expand_relations, PrimitiveRelation, Relation};
///
/// let term = expand_relations(&[Relation::Before, Relation::During]);
/// assert!(term.has_before);
/// assert!(term.primitives.contains(&PrimitiveRelation::FollowedBy));
/// assert!(term.primitives.contains(&PrimitiveRelation::During));
/// ```
#[must_use]
pub fn expand_relations(relations: &[Relation]) -> RelationTerm {
    let mut primitives = BTreeSet::new();
    for &relation in relations {
        primitives.extend(expansion(relation));
    }
    RelationTerm {
        primitives,
        original: relations.to_vec(),
        has_before: relations.contains(&Relation::Before),
        has_after: relations.contains(&Relation::After),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spellings() {
        for s in ["overlapped-by", "OVERLAPPED_BY", "overlappedBy", "overlapped by"] {
            assert_eq!(Relation::parse(s), Some(Relation::OverlappedBy), "{s}");
        }
        assert_eq!(Relation::parse("sideways"), None);
        assert!(matches!(
            "sideways".parse::<Relation>(),
            Err(Error::UnknownRelation(_))
        ));
    }

    #[test]
    fn test_display_parse_all() {
        for r in Relation::ALL {
            assert_eq!(r.to_string().parse::<Relation>().unwrap(), r);
        }
    }

    #[test]
    fn test_primitive_rejects_composites() {
        assert_eq!(PrimitiveRelation::parse("before"), None);
        assert_eq!(PrimitiveRelation::parse("met-by"), Some(PrimitiveRelation::MetBy));
        assert_eq!(AllenRelation::parse("follow"), None);
        assert_eq!(AllenRelation::parse("after"), Some(AllenRelation::After));
    }

    #[test]
    fn test_conversions_cover_union() {
        let from_prim: BTreeSet<Relation> =
            PrimitiveRelation::ALL.into_iter().map(Relation::from).collect();
        let from_allen: BTreeSet<Relation> =
            AllenRelation::ALL.into_iter().map(Relation::from).collect();
        let union: BTreeSet<Relation> = from_prim.union(&from_allen).copied().collect();
        assert_eq!(union.len(), 15);
        for r in Relation::ALL {
            assert!(r.as_primitive().is_some() || r.is_composite());
        }
    }

    #[test]
    fn test_converse_is_involution() {
        for r in Relation::ALL {
            assert_eq!(r.converse().converse(), r);
        }
        assert_eq!(Relation::Equals.converse(), Relation::Equals);
        assert_eq!(
            PrimitiveRelation::Follow.converse(),
            PrimitiveRelation::FollowedBy
        );
    }

    #[test]
    fn test_point_accepting_set() {
        let point: Vec<_> = PrimitiveRelation::ALL
            .into_iter()
            .filter(|r| r.is_point_accepting())
            .collect();
        assert_eq!(
            point,
            vec![
                PrimitiveRelation::Finishes,
                PrimitiveRelation::FinishedBy,
                PrimitiveRelation::Equals
            ]
        );
    }

    #[test]
    fn test_expand_before() {
        let term = expand_relations(&[Relation::Before]);
        assert!(term.has_before);
        assert!(!term.has_after);
        let expected: BTreeSet<_> = [PrimitiveRelation::FollowedBy, PrimitiveRelation::Meets]
            .into_iter()
            .collect();
        assert_eq!(term.primitives, expected);
        assert_eq!(term.original, vec![Relation::Before]);
    }

    #[test]
    fn test_expand_after() {
        let term = expand_relations(&[Relation::After]);
        assert!(term.has_after);
        let expected: BTreeSet<_> = [PrimitiveRelation::Follow, PrimitiveRelation::MetBy]
            .into_iter()
            .collect();
        assert_eq!(term.primitives, expected);
    }

    #[test]
    fn test_before_and_after_include_gapless_handover() {
        let before = expand_relations(&[Relation::Before]).primitives;
        let after = expand_relations(&[Relation::After]).primitives;
        assert!(before.contains(&PrimitiveRelation::Meets));
        assert!(after.contains(&PrimitiveRelation::MetBy));
        let mirrored: BTreeSet<_> = before.iter().map(|p| p.converse()).collect();
        assert_eq!(mirrored, after);
        assert_eq!(Relation::Before.converse(), Relation::After);
    }

    #[test]
    fn test_expand_primitives_unchanged() {
        let term = expand_relations(&[Relation::Overlaps, Relation::Equals, Relation::Overlaps]);
        assert!(!term.has_before && !term.has_after);
        assert_eq!(term.primitives.len(), 2);
        assert_eq!(term.original.len(), 3);
    }

    #[test]
    fn test_expand_empty() {
        let term = expand_relations(&[]);
        assert!(term.primitives.is_empty());
        assert!(term.original.is_empty());
    }

    #[test]
    fn test_reported_relation() {
        let term = expand_relations(&[Relation::Before, Relation::Meets, Relation::After]);
        assert_eq!(term.reported_relation(PrimitiveRelation::Meets), Relation::Meets);
        assert_eq!(
            term.reported_relation(PrimitiveRelation::FollowedBy),
            Relation::Before
        );
        assert_eq!(term.reported_relation(PrimitiveRelation::MetBy), Relation::After);
    }

    #[test]
    fn test_serde_kebab_case() {
        let json = serde_json::to_string(&Relation::FinishedBy).unwrap();
        assert_eq!(json, "\"finished-by\"");
        let r: PrimitiveRelation = serde_json::from_str("\"followed-by\"").unwrap();
        assert_eq!(r, PrimitiveRelation::FollowedBy);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn expansion_is_never_composite(idx in proptest::collection::vec(0..15usize, 0..8)) {
            let relations: Vec<Relation> = idx.iter().map(|&i| Relation::ALL[i]).collect();
            let term = expand_relations(&relations);
            prop_assert_eq!(term.has_before, relations.contains(&Relation::Before));
            prop_assert_eq!(term.has_after, relations.contains(&Relation::After));
            for r in &relations {
                if let Some(p) = r.as_primitive() {
                    prop_assert!(term.primitives.contains(&p));
                }
            }
            if term.has_before {
                prop_assert!(term.primitives.contains(&PrimitiveRelation::FollowedBy));
            }
            if term.has_after {
                prop_assert!(term.primitives.contains(&PrimitiveRelation::Follow));
            }
        }
    }
}
