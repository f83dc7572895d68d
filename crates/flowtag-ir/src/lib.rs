// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Flowtag IR: the structural data model of the information-flow pipeline.
//!
//! An [`AccessPath`] names one piece of data: a root (a concrete handle
//! connection, or a handle connection spec) followed by a chain of field
//! selectors. [`Edge`]s declare that data may flow between two access paths.
//! A [`TagCheck`] binds a [`Predicate`] over tags to an access path.
//!
//! Everything here is an immutable value. The single piece of mutable state is
//! the [`DatalogPrintContext`], created fresh for each program emission and
//! threaded by `&mut` through every call that needs a unique label.
//!
//! # Determinism Invariant
//!
//! Rendering is a pure function of the IR values and the order in which items
//! are handed to one context. Equality is structural throughout; identity is
//! only ever used as a shortcut that must agree with the structural answer.
//!
//! # Identifier Precondition
//!
//! Root names and field names are emitted inside double-quoted Datalog
//! strings without escaping. They must not contain `"`, `.`, `\`, whitespace,
//! or control characters. [`validate_identifier`] checks this; the `try_*`
//! constructors and the manifest loader call it, the plain constructors assume
//! it.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::use_self,
    clippy::option_if_let_else,
    clippy::doc_markdown,
    clippy::too_many_lines,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::needless_pass_by_value,
    clippy::multiple_crate_versions
)]

mod access_path;
mod access_path_root;
mod access_path_selectors;
mod access_path_selectors_set;
mod datalog_print_context;
mod edge;
mod error;
mod ident;
mod ownership;
mod predicate;
mod selector;
mod tag_check;
mod tag_claim;
pub mod types;

pub use access_path::AccessPath;
pub use access_path_root::{
    AccessPathRoot, HandleConnectionAccessPathRoot, HandleConnectionSpecAccessPathRoot,
};
pub use access_path_selectors::AccessPathSelectors;
pub use access_path_selectors_set::AccessPathSelectorsSet;
pub use datalog_print_context::{DatalogPrintContext, HelperRule};
pub use edge::Edge;
pub use error::IrError;
pub use ident::validate_identifier;
pub use ownership::OwnsAccessPath;
pub use predicate::{Predicate, TagPresence};
pub use selector::{FieldSelector, Selector};
pub use tag_check::TagCheck;
pub use tag_claim::TagClaim;
