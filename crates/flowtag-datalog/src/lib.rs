// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Datalog program assembly for flowtag.
//!
//! [`DatalogProgram`] gathers IR items and renders them in one emission pass
//! with one fresh [`DatalogPrintContext`](flowtag_ir::DatalogPrintContext).
//! [`Manifest`] is the JSON carrier that feeds IR values into a program.
//! [`AuthorizationLogicCompiler`] wraps the external compiler whose output is
//! spliced in by `#include`, and only when it succeeded.

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

pub mod authorization_logic;
pub mod manifest;
pub mod program;

pub use authorization_logic::{
    generate_datalog_facts_from_authorization_logic, read_fact_lines, AuthLogicError,
    AuthorizationLogicCompiler,
};
pub use manifest::{
    AuthorizationLogicDecl, CheckDecl, FlowDecl, HandleDecl, Manifest, ManifestError,
};
pub use program::{AmbiguousAccessPath, DatalogProgram};
