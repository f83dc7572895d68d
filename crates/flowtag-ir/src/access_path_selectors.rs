// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ordered selector chains.

use std::fmt;

use crate::{IrError, Selector};

/// An ordered chain of [`Selector`]s, outermost first.
///
/// The empty chain is valid and means "the root itself". Chains are stored
/// flat; equality compares length and then elements in order.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct AccessPathSelectors(Vec<Selector>);

impl AccessPathSelectors {
    /// The empty chain.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds a chain from selectors given outermost first.
    pub fn from_selectors(selectors: impl IntoIterator<Item = Selector>) -> Self {
        Self(selectors.into_iter().collect())
    }

    /// Builds a chain of field selectors, outermost first.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Selector::field).collect())
    }

    /// Returns this chain with `parent` placed in front of it.
    pub fn prepend(mut self, parent: Selector) -> Self {
        self.0.insert(0, parent);
        self
    }

    /// Appends `child` as the new innermost selector.
    pub fn push(&mut self, child: Selector) {
        self.0.push(child);
    }

    /// Number of selectors in the chain.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the empty chain.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the selectors outermost first.
    pub fn iter(&self) -> std::slice::Iter<'_, Selector> {
        self.0.iter()
    }

    /// Validates every selector's identifying string.
    pub fn validate(&self) -> Result<(), IrError> {
        self.0.iter().try_for_each(Selector::validate)
    }
}

impl<'a> IntoIterator for &'a AccessPathSelectors {
    type Item = &'a Selector;
    type IntoIter = std::slice::Iter<'a, Selector>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Selector> for AccessPathSelectors {
    fn from_iter<T: IntoIterator<Item = Selector>>(iter: T) -> Self {
        Self::from_selectors(iter)
    }
}

/// Dot-joined selectors; the empty chain renders as the empty string.
impl fmt::Display for AccessPathSelectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut selectors = self.0.iter();
        if let Some(first) = selectors.next() {
            fmt::Display::fmt(first, f)?;
            for selector in selectors {
                write!(f, ".{selector}")?;
            }
        }
        Ok(())
    }
}
