// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Claims that a particle attaches a tag to an access path.

use std::fmt;

use crate::{validate_identifier, AccessPath, IrError};

/// `claiming_particle` asserts that data at `access_path` carries `tag`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagClaim {
    claiming_particle: String,
    access_path: AccessPath,
    tag: String,
}

impl TagClaim {
    /// Creates the claim.
    pub fn new(
        claiming_particle: impl Into<String>,
        access_path: AccessPath,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            claiming_particle: claiming_particle.into(),
            access_path,
            tag: tag.into(),
        }
    }

    /// The particle making the claim.
    pub fn claiming_particle(&self) -> &str {
        &self.claiming_particle
    }

    /// The claimed-upon path.
    pub fn access_path(&self) -> &AccessPath {
        &self.access_path
    }

    /// The claimed tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Validates every identifier the claim renders.
    pub fn validate(&self) -> Result<(), IrError> {
        validate_identifier(&self.claiming_particle)?;
        self.access_path.validate()?;
        validate_identifier(&self.tag)
    }
}

/// `claimHasTag("<particle>", "<path>", "<tag>").` plus a trailing newline.
impl fmt::Display for TagClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "claimHasTag(\"{}\", \"{}\", \"{}\").",
            self.claiming_particle, self.access_path, self.tag
        )
    }
}
