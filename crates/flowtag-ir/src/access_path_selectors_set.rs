// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Sets of selector chains.

use std::collections::{btree_set, BTreeSet};

use crate::{AccessPath, AccessPathRoot, AccessPathSelectors, Selector};

/// A set of [`AccessPathSelectors`].
///
/// Backed by a `BTreeSet`, so iteration order is sorted and stable across runs.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct AccessPathSelectorsSet(BTreeSet<AccessPathSelectors>);

impl AccessPathSelectorsSet {
    /// The empty set.
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// The set holding only the empty chain (a leaf: the root itself).
    pub fn leaf() -> Self {
        Self(BTreeSet::from([AccessPathSelectors::new()]))
    }

    /// Inserts `selectors`; returns `false` if it was already present.
    pub fn insert(&mut self, selectors: AccessPathSelectors) -> bool {
        self.0.insert(selectors)
    }

    /// Returns a set where `parent` is placed in front of every chain.
    pub fn prepend_to_all(parent: &Selector, set: Self) -> Self {
        set.0
            .into_iter()
            .map(|chain| chain.prepend(parent.clone()))
            .collect()
    }

    /// Chains present in either set.
    pub fn union(&self, other: &Self) -> Self {
        self.0.union(&other.0).cloned().collect()
    }

    /// Chains present in both sets.
    pub fn intersection(&self, other: &Self) -> Self {
        self.0.intersection(&other.0).cloned().collect()
    }

    /// Chains present in `self` but not in `other`.
    pub fn difference(&self, other: &Self) -> Self {
        self.0.difference(&other.0).cloned().collect()
    }

    /// `true` if every chain of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.0.is_subset(&other.0)
    }

    /// `true` if `selectors` is in the set.
    pub fn contains(&self, selectors: &AccessPathSelectors) -> bool {
        self.0.contains(selectors)
    }

    /// Number of chains.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if the set has no chains.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates chains in sorted order.
    pub fn iter(&self) -> btree_set::Iter<'_, AccessPathSelectors> {
        self.0.iter()
    }

    /// One [`AccessPath`] per chain, all rooted at `root`, in sorted order.
    pub fn instantiate(&self, root: &AccessPathRoot) -> Vec<AccessPath> {
        self.0
            .iter()
            .map(|chain| AccessPath::new(root.clone(), chain.clone()))
            .collect()
    }
}

impl FromIterator<AccessPathSelectors> for AccessPathSelectorsSet {
    fn from_iter<T: IntoIterator<Item = AccessPathSelectors>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for AccessPathSelectorsSet {
    type Item = AccessPathSelectors;
    type IntoIter = btree_set::IntoIter<AccessPathSelectors>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AccessPathSelectorsSet {
    type Item = &'a AccessPathSelectors;
    type IntoIter = btree_set::Iter<'a, AccessPathSelectors>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
