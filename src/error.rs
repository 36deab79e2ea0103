// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Crate-wide error type.
//!
//! Every fallible constructor (schema resolution, expression parsing,
//! automaton validation) reports through [`Error`] before any event is
//! processed. The per-event path never returns errors for legitimate data:
//! predicate coercion failures evaluate to `false`, and a missing transition
//! at step time is an assertion failure rather than an `Err`.

/// Errors raised while building or feeding the interval-relation core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An event reference was absent where one is required.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A transition table is not a total, well-formed automaton.
    #[error("malformed automaton for '{relation}': {message}")]
    MalformedAutomaton {
        /// Governing relation (or table name) of the rejected automaton.
        relation: String,
        /// What the validation found.
        message: String,
    },

    /// An EBA expression string failed to parse.
    #[error("malformed expression at position {position}: {message}")]
    MalformedExpression {
        /// Human-readable error message.
        message: String,
        /// Byte offset in the expression where the error was detected.
        position: usize,
    },

    /// An expression atom names an attribute the schema does not declare.
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),

    /// A schema declares the same attribute name twice (case-insensitive).
    #[error("duplicate attribute '{0}'")]
    DuplicateAttribute(String),

    /// A schema declares an attribute type outside the supported vocabulary.
    #[error("unknown attribute type '{0}'")]
    UnknownAttributeType(String),

    /// A relation name does not match any known relation.
    #[error("unknown relation '{0}'")]
    UnknownRelation(String),
}

impl Error {
    pub(crate) fn malformed_automaton(relation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedAutomaton {
            relation: relation.into(),
            message: message.into(),
        }
    }

    pub(crate) fn malformed_expression(message: impl Into<String>, position: usize) -> Self {
        Self::MalformedExpression {
            message: message.into(),
            position,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
