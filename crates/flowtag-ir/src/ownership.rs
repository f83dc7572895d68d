// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ownership facts binding the `owner` variable of check rules.

use std::fmt;

use crate::{validate_identifier, AccessPath, IrError};

/// `owner` owns the data named by `access_path`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OwnsAccessPath {
    owner: String,
    access_path: AccessPath,
}

impl OwnsAccessPath {
    /// Creates the ownership fact.
    pub fn new(owner: impl Into<String>, access_path: AccessPath) -> Self {
        Self {
            owner: owner.into(),
            access_path,
        }
    }

    /// The owning principal.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The owned path.
    pub fn access_path(&self) -> &AccessPath {
        &self.access_path
    }

    /// Validates every identifier the fact renders.
    pub fn validate(&self) -> Result<(), IrError> {
        validate_identifier(&self.owner)?;
        self.access_path.validate()
    }
}

/// `ownsAccessPath("<owner>", "<path>").` plus a trailing newline.
impl fmt::Display for OwnsAccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ownsAccessPath(\"{}\", \"{}\").", self.owner, self.access_path)
    }
}
