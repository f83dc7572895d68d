// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Checks of tag predicates on access paths.

use std::sync::Arc;

use crate::predicate::same_predicate;
use crate::{AccessPath, AccessPathRoot, DatalogPrintContext, IrError, Predicate};

/// A requirement that `predicate` holds for every owner of `access_path`.
///
/// The predicate is shared, not owned: the spec-side check and its
/// implementation-side copy ([`TagCheck::instantiate`]) point at the same
/// `Arc<Predicate>`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagCheck {
    access_path: AccessPath,
    predicate: Arc<Predicate>,
}

impl TagCheck {
    /// Checks `predicate` on `access_path`.
    pub fn new(access_path: AccessPath, predicate: Arc<Predicate>) -> Self {
        Self {
            access_path,
            predicate,
        }
    }

    /// The checked access path.
    pub fn access_path(&self) -> &AccessPath {
        &self.access_path
    }

    /// The shared predicate.
    pub fn predicate(&self) -> &Arc<Predicate> {
        &self.predicate
    }

    /// The implementation-side copy of a spec-side check, bound to `root`.
    /// The copy shares this check's predicate.
    pub fn instantiate(&self, root: AccessPathRoot) -> Result<Self, IrError> {
        Ok(Self {
            access_path: self.access_path.instantiate(root)?,
            predicate: Arc::clone(&self.predicate),
        })
    }

    /// Validates the path and every tag of the predicate.
    pub fn validate(&self) -> Result<(), IrError> {
        self.access_path.validate()?;
        self.predicate.validate()
    }

    /// Renders the `isCheck` fact and the `check` rule.
    ///
    /// One fresh label from `ctxt` appears in both clauses. `isCheck` is
    /// unconditional; `check` is derivable only for owners whose view of the
    /// path satisfies the predicate. A driver compares the two relations: every
    /// check passed iff they hold the same labels.
    pub fn to_datalog(&self, ctxt: &mut DatalogPrintContext) -> String {
        let label = ctxt.get_unique_check_label();
        let path = self.access_path.to_datalog(ctxt);
        let body = self.predicate.to_datalog_rule_body(&self.access_path, ctxt);
        format!(
            "isCheck(\"{label}\", \"{path}\"). check(\"{label}\", owner, \"{path}\") :- ownsAccessPath(owner, \"{path}\"), {body}."
        )
    }
}

impl PartialEq for TagCheck {
    fn eq(&self, other: &Self) -> bool {
        self.access_path == other.access_path && same_predicate(&self.predicate, &other.predicate)
    }
}

impl Eq for TagCheck {}
