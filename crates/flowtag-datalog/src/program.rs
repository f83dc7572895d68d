// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! One Datalog program, rendered in a single emission pass.

use std::collections::btree_map::{BTreeMap, Entry};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use flowtag_ir::{AccessPath, DatalogPrintContext, Edge, OwnsAccessPath, TagCheck, TagClaim};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::AuthLogicError;

/// Two different access paths that would share one Datalog term.
///
/// A spec root `ps.hs` followed by selectors can spell the same string as a
/// concrete root `r.p.h`. Facts about one would then be read as facts about
/// the other.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("access paths {first:?} and {second:?} both render as \"{term}\"")]
pub struct AmbiguousAccessPath {
    /// The shared term.
    pub term: String,
    /// The path seen first.
    pub first: AccessPath,
    /// The conflicting path.
    pub second: AccessPath,
}

/// IR items destined for one Datalog program, in insertion order.
///
/// Rendering creates its own [`DatalogPrintContext`], so rendering the same
/// program twice yields identical text and check labels are unique across the
/// whole output.
#[derive(Debug, Clone, Default)]
pub struct DatalogProgram {
    includes: Vec<PathBuf>,
    claims: Vec<TagClaim>,
    ownership: Vec<OwnsAccessPath>,
    edges: Vec<Edge>,
    checks: Vec<TagCheck>,
}

impl DatalogProgram {
    /// An empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an `#include` line (policy rules, compiled authorization logic).
    pub fn add_include(&mut self, path: impl Into<PathBuf>) {
        self.includes.push(path.into());
    }

    /// Adds a tag claim.
    pub fn add_claim(&mut self, claim: TagClaim) {
        self.claims.push(claim);
    }

    /// Adds an ownership fact.
    pub fn add_ownership(&mut self, fact: OwnsAccessPath) {
        self.ownership.push(fact);
    }

    /// Adds a flow edge.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Adds a tag check.
    pub fn add_check(&mut self, check: TagCheck) {
        self.checks.push(check);
    }

    /// Includes the compiled facts of an authorization-logic module, but only
    /// if compilation succeeded.
    ///
    /// A failed compilation means no usable facts for that module: the output
    /// file is neither read nor included. Returns whether it was included.
    pub fn include_authorization_logic(
        &mut self,
        module: &str,
        compiled: Result<PathBuf, AuthLogicError>,
    ) -> bool {
        match compiled {
            Ok(path) => {
                info!(module, path = %path.display(), "including authorization logic facts");
                self.includes.push(path);
                true
            }
            Err(err) => {
                warn!(module, error = %err, "authorization logic unavailable; module facts dropped");
                false
            }
        }
    }

    /// Included files, in order.
    pub fn includes(&self) -> &[PathBuf] {
        &self.includes
    }

    /// Flow edges, in order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Tag checks, in order.
    pub fn checks(&self) -> &[TagCheck] {
        &self.checks
    }

    /// Tag claims, in order.
    pub fn claims(&self) -> &[TagClaim] {
        &self.claims
    }

    /// Ownership facts, in order.
    pub fn ownership(&self) -> &[OwnsAccessPath] {
        &self.ownership
    }

    /// Every access path mentioned by a claim, ownership fact, edge, or
    /// check, in rendering order.
    pub fn access_paths(&self) -> impl Iterator<Item = &AccessPath> {
        self.claims
            .iter()
            .map(TagClaim::access_path)
            .chain(self.ownership.iter().map(OwnsAccessPath::access_path))
            .chain(self.edges.iter().flat_map(|edge| [edge.source(), edge.target()]))
            .chain(self.checks.iter().map(TagCheck::access_path))
    }

    /// The first pair of structurally different access paths whose Datalog
    /// terms coincide, if any.
    ///
    /// Rendering does not check this; callers assembling a program from
    /// untrusted input should.
    pub fn find_ambiguous_access_path(&self) -> Option<AmbiguousAccessPath> {
        let ctxt = DatalogPrintContext::new();
        let mut seen: BTreeMap<String, &AccessPath> = BTreeMap::new();
        for path in self.access_paths() {
            match seen.entry(path.to_datalog(&ctxt)) {
                Entry::Vacant(slot) => {
                    slot.insert(path);
                }
                Entry::Occupied(slot) if *slot.get() != path => {
                    return Some(AmbiguousAccessPath {
                        term: slot.key().clone(),
                        first: (*slot.get()).clone(),
                        second: path.clone(),
                    });
                }
                Entry::Occupied(_) => {}
            }
        }
        None
    }

    /// Renders the whole program with a fresh context.
    pub fn render(&self) -> String {
        self.render_with(DatalogPrintContext::new())
    }

    /// Renders the whole program with `ctxt`, which is consumed: a context
    /// covers exactly one emission.
    #[instrument(skip_all, fields(
        edges = self.edges.len(),
        checks = self.checks.len(),
        namespace = ctxt.namespace().unwrap_or("")
    ))]
    pub fn render_with(&self, mut ctxt: DatalogPrintContext) -> String {
        let mut out = String::new();

        for path in &self.includes {
            push_include(&mut out, path);
        }
        if !self.includes.is_empty() {
            out.push('\n');
        }

        section(&mut out, "Claims", &self.claims, ToString::to_string);
        section(&mut out, "Ownership", &self.ownership, ToString::to_string);
        section(&mut out, "Edges", &self.edges, ToString::to_string);
        section(&mut out, "Checks", &self.checks, |check| {
            let mut line = check.to_datalog(&mut ctxt);
            line.push('\n');
            line
        });

        let labels = ctxt.labels_issued();
        let helpers = ctxt.into_helper_rules();
        section(&mut out, "Helper relations", &helpers, |helper| {
            format!(".decl {}(owner: symbol)\n{}\n", helper.relation, helper.rule)
        });

        info!(labels, helpers = helpers.len(), bytes = out.len(), "rendered datalog program");
        out
    }
}

fn push_include(out: &mut String, path: &Path) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "#include \"{}\"", path.display());
}

fn section<T>(out: &mut String, title: &str, items: &[T], mut render: impl FnMut(&T) -> String) {
    if items.is_empty() {
        return;
    }
    // Writing into a String cannot fail.
    let _ = writeln!(out, "// {title}");
    for item in items {
        out.push_str(&render(item));
    }
    out.push('\n');
}
