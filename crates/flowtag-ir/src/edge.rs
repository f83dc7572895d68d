// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Flow edges between access paths.

use std::fmt;

use crate::AccessPath;

/// Data may flow from `source` to `target`.
///
/// Ordered: `Edge(a, b)` and `Edge(b, a)` are different edges.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    source: AccessPath,
    target: AccessPath,
}

impl Edge {
    /// Creates the edge `source -> target`.
    pub fn new(source: AccessPath, target: AccessPath) -> Self {
        Self { source, target }
    }

    /// Where data flows from.
    pub fn source(&self) -> &AccessPath {
        &self.source
    }

    /// Where data flows to.
    pub fn target(&self) -> &AccessPath {
        &self.target
    }
}

/// `edge("<source>", "<target>").` plus a trailing newline.
impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "edge(\"{}\", \"{}\").", self.source, self.target)
    }
}
