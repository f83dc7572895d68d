// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Where an access path begins.

use std::fmt;

use crate::{validate_identifier, IrError};

/// A concrete handle connection: `recipe.particle.handle`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandleConnectionAccessPathRoot {
    recipe: String,
    particle: String,
    handle: String,
}

impl HandleConnectionAccessPathRoot {
    /// Creates a root from already-validated names.
    pub fn new(
        recipe: impl Into<String>,
        particle: impl Into<String>,
        handle: impl Into<String>,
    ) -> Self {
        Self {
            recipe: recipe.into(),
            particle: particle.into(),
            handle: handle.into(),
        }
    }

    /// Recipe name.
    pub fn recipe(&self) -> &str {
        &self.recipe
    }

    /// Particle name within the recipe.
    pub fn particle(&self) -> &str {
        &self.particle
    }

    /// Handle name within the particle.
    pub fn handle(&self) -> &str {
        &self.handle
    }
}

impl fmt::Display for HandleConnectionAccessPathRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.recipe, self.particle, self.handle)
    }
}

/// A handle connection of a particle spec, not yet bound to a recipe:
/// `particle_spec.handle_spec`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandleConnectionSpecAccessPathRoot {
    particle_spec: String,
    handle_spec: String,
}

impl HandleConnectionSpecAccessPathRoot {
    /// Creates a spec root from already-validated names.
    pub fn new(particle_spec: impl Into<String>, handle_spec: impl Into<String>) -> Self {
        Self {
            particle_spec: particle_spec.into(),
            handle_spec: handle_spec.into(),
        }
    }

    /// Particle spec name.
    pub fn particle_spec(&self) -> &str {
        &self.particle_spec
    }

    /// Handle connection spec name.
    pub fn handle_spec(&self) -> &str {
        &self.handle_spec
    }
}

impl fmt::Display for HandleConnectionSpecAccessPathRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.particle_spec, self.handle_spec)
    }
}

/// The root of an access path.
///
/// Two roots are equal only if they are the same variant with equal fields;
/// a spec root never equals a concrete root.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum AccessPathRoot {
    /// A handle connection inside an instantiated recipe.
    HandleConnection(HandleConnectionAccessPathRoot),
    /// A handle connection of a particle spec.
    HandleConnectionSpec(HandleConnectionSpecAccessPathRoot),
}

impl AccessPathRoot {
    /// Shorthand for a [`HandleConnectionAccessPathRoot`].
    pub fn handle_connection(
        recipe: impl Into<String>,
        particle: impl Into<String>,
        handle: impl Into<String>,
    ) -> Self {
        Self::HandleConnection(HandleConnectionAccessPathRoot::new(recipe, particle, handle))
    }

    /// Shorthand for a [`HandleConnectionSpecAccessPathRoot`].
    pub fn handle_connection_spec(
        particle_spec: impl Into<String>,
        handle_spec: impl Into<String>,
    ) -> Self {
        Self::HandleConnectionSpec(HandleConnectionSpecAccessPathRoot::new(
            particle_spec,
            handle_spec,
        ))
    }

    /// Like [`AccessPathRoot::handle_connection`], validating each name.
    pub fn try_handle_connection(
        recipe: impl Into<String>,
        particle: impl Into<String>,
        handle: impl Into<String>,
    ) -> Result<Self, IrError> {
        let root = Self::handle_connection(recipe, particle, handle);
        root.validate()?;
        Ok(root)
    }

    /// Like [`AccessPathRoot::handle_connection_spec`], validating each name.
    pub fn try_handle_connection_spec(
        particle_spec: impl Into<String>,
        handle_spec: impl Into<String>,
    ) -> Result<Self, IrError> {
        let root = Self::handle_connection_spec(particle_spec, handle_spec);
        root.validate()?;
        Ok(root)
    }

    /// `true` for roots that name a concrete handle connection.
    pub fn is_instantiated(&self) -> bool {
        match self {
            Self::HandleConnection(_) => true,
            Self::HandleConnectionSpec(_) => false,
        }
    }

    /// Validates every identifying string of this root.
    pub fn validate(&self) -> Result<(), IrError> {
        match self {
            Self::HandleConnection(root) => {
                validate_identifier(&root.recipe)?;
                validate_identifier(&root.particle)?;
                validate_identifier(&root.handle)
            }
            Self::HandleConnectionSpec(root) => {
                validate_identifier(&root.particle_spec)?;
                validate_identifier(&root.handle_spec)
            }
        }
    }
}

impl From<HandleConnectionAccessPathRoot> for AccessPathRoot {
    fn from(root: HandleConnectionAccessPathRoot) -> Self {
        Self::HandleConnection(root)
    }
}

impl From<HandleConnectionSpecAccessPathRoot> for AccessPathRoot {
    fn from(root: HandleConnectionSpecAccessPathRoot) -> Self {
        Self::HandleConnectionSpec(root)
    }
}

impl fmt::Display for AccessPathRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HandleConnection(root) => fmt::Display::fmt(root, f),
            Self::HandleConnectionSpec(root) => fmt::Display::fmt(root, f),
        }
    }
}
