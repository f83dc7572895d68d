// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Naming state for one program emission.

use crate::{validate_identifier, IrError};

/// An auxiliary relation minted while compiling a predicate, plus the rule
/// that defines it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct HelperRule {
    /// Relation name, unique within the emission.
    pub relation: String,
    /// The complete defining rule, terminated by `.`.
    pub rule: String,
}

/// Mutable naming context threaded through one emission pass.
///
/// Labels handed out by one instance are pairwise distinct. Create a fresh
/// context per emission and drop it afterwards. It has no reset, no `Clone`,
/// and no process-wide counter behind it.
///
/// Workers that emit in parallel each take their own context. Giving each a
/// distinct [`namespace`](DatalogPrintContext::with_namespace) keeps their
/// label sets disjoint, so the outputs can be concatenated as they are.
#[derive(Debug, Default)]
pub struct DatalogPrintContext {
    namespace: Option<String>,
    next_check: u64,
    next_helper: u64,
    helper_rules: Vec<HelperRule>,
}

impl DatalogPrintContext {
    /// A fresh context with no namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh context whose labels and helper relations are prefixed with
    /// `namespace_`.
    pub fn with_namespace(namespace: impl Into<String>) -> Result<Self, IrError> {
        let namespace = namespace.into();
        validate_identifier(&namespace)?;
        Ok(Self {
            namespace: Some(namespace),
            ..Self::default()
        })
    }

    /// The namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns a label never returned before by this context.
    pub fn get_unique_check_label(&mut self) -> String {
        let n = self.next_check;
        self.next_check += 1;
        self.qualify(&format!("check_num_{n}"))
    }

    /// Returns a relation name never returned before by this context.
    pub fn get_unique_helper_relation(&mut self) -> String {
        let n = self.next_helper;
        self.next_helper += 1;
        self.qualify(&format!("notHelper{n}"))
    }

    /// Records a helper rule to be emitted alongside the program.
    pub fn add_helper_rule(&mut self, relation: String, rule: String) {
        self.helper_rules.push(HelperRule { relation, rule });
    }

    /// Helper rules recorded so far, in the order they were minted.
    pub fn helper_rules(&self) -> &[HelperRule] {
        &self.helper_rules
    }

    /// Number of check labels handed out.
    pub fn labels_issued(&self) -> u64 {
        self.next_check
    }

    /// Ends the emission, yielding the recorded helper rules.
    pub fn into_helper_rules(self) -> Vec<HelperRule> {
        self.helper_rules
    }

    fn qualify(&self, name: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}_{name}"),
            None => name.to_owned(),
        }
    }
}
