// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fully-qualified names for pieces of data.

use std::fmt;

use crate::{AccessPathRoot, AccessPathSelectors, DatalogPrintContext, IrError};

/// A root plus a selector chain: the fully-qualified name of one piece of data.
///
/// Equality is exactly "roots equal and chains equal". Nothing is normalized
/// on construction.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessPath {
    root: AccessPathRoot,
    #[cfg_attr(feature = "serde", serde(default))]
    selectors: AccessPathSelectors,
}

impl AccessPath {
    /// Joins `root` and `selectors`.
    pub fn new(root: AccessPathRoot, selectors: AccessPathSelectors) -> Self {
        Self { root, selectors }
    }

    /// The root.
    pub fn root(&self) -> &AccessPathRoot {
        &self.root
    }

    /// The selector chain below the root.
    pub fn selectors(&self) -> &AccessPathSelectors {
        &self.selectors
    }

    /// The term used inside Datalog facts.
    ///
    /// Currently identical to the display form. It is a separate operation so
    /// the serialized form can diverge from the human-readable one without
    /// touching callers. The context is read, never mutated.
    pub fn to_datalog(&self, _ctxt: &DatalogPrintContext) -> String {
        self.to_string()
    }

    /// Rebinds a spec-rooted path to the concrete `root`, keeping selectors.
    ///
    /// Paths that already start at a concrete handle connection are rejected.
    pub fn instantiate(&self, root: AccessPathRoot) -> Result<Self, IrError> {
        if self.root.is_instantiated() {
            return Err(IrError::AlreadyInstantiated(self.to_string()));
        }
        Ok(Self::new(root, self.selectors.clone()))
    }

    /// Validates every identifier on the path.
    pub fn validate(&self) -> Result<(), IrError> {
        self.root.validate()?;
        self.selectors.validate()
    }
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.selectors.is_empty() {
            write!(f, "{}", self.root)
        } else {
            write!(f, "{}.{}", self.root, self.selectors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hc(r: &str, p: &str, h: &str) -> AccessPathRoot {
        AccessPathRoot::handle_connection(r, p, h)
    }

    #[test]
    fn nested_selectors_follow_the_root() {
        let path = AccessPath::new(hc("r", "p", "h"), AccessPathSelectors::from_fields(["x", "y"]));
        assert_eq!(path.to_string(), "r.p.h.x.y");
    }

    #[test]
    fn empty_selectors_render_root_alone() {
        let path = AccessPath::new(hc("pre", "fix", "1"), AccessPathSelectors::new());
        assert_eq!(path.to_string(), "pre.fix.1");
        assert_eq!(path.to_datalog(&DatalogPrintContext::new()), "pre.fix.1");
    }

    #[test]
    fn instantiate_rebinds_spec_roots_only() {
        let spec = AccessPath::new(
            AccessPathRoot::handle_connection_spec("ps", "hs"),
            AccessPathSelectors::from_fields(["f"]),
        );
        let concrete = spec.instantiate(hc("r", "p", "h")).unwrap();
        assert_eq!(concrete.to_string(), "r.p.h.f");
        assert_eq!(concrete.selectors(), spec.selectors());

        let err = concrete.instantiate(hc("r2", "p2", "h2")).unwrap_err();
        assert_eq!(err, IrError::AlreadyInstantiated("r.p.h.f".into()));
    }
}
