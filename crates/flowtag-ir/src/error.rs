// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Construction-time errors for IR values.
//!
//! Rendering and equality never fail. Everything that can go wrong is caught
//! while building the IR: unknown or cyclic types, duplicate names, and
//! identifiers that cannot be emitted inside a Datalog string.

use thiserror::Error;

/// Errors raised while constructing IR values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IrError {
    /// A field referenced a named type that was never declared.
    #[error("unknown type `{0}`")]
    UnknownType(String),
    /// Named schema references form a cycle.
    #[error("cyclic schema: {cycle}")]
    CyclicSchema {
        /// The cycle, rendered as `A -> B -> A`.
        cycle: String,
    },
    /// Two fields of one schema share a name.
    #[error("duplicate field `{field}` in schema `{schema}`")]
    DuplicateField {
        /// Schema name (`<anonymous>` for inline schemas).
        schema: String,
        /// The repeated field name.
        field: String,
    },
    /// A schema name was declared more than once.
    #[error("schema `{0}` declared more than once")]
    DuplicateSchema(String),
    /// Top-level schema declarations must carry a name.
    #[error("top-level schema declarations need a name")]
    UnnamedSchema,
    /// An identifier cannot be emitted verbatim inside a Datalog string.
    #[error("invalid identifier {ident:?}: {reason}")]
    InvalidIdentifier {
        /// The rejected identifier.
        ident: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// Only spec-rooted access paths can be instantiated.
    #[error("access path `{0}` is already rooted at a concrete handle connection")]
    AlreadyInstantiated(String),
}
