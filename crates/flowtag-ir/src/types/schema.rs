// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Record schemas.

use std::collections::BTreeMap;

use crate::types::Type;
use crate::{AccessPathSelectorsSet, Selector};

/// An optional name plus uniquely named fields.
///
/// Built once by [`TypeFactory`](crate::types::TypeFactory) and never
/// mutated. Fields are kept sorted by name.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Schema {
    name: Option<String>,
    fields: BTreeMap<String, Type>,
}

impl Schema {
    pub(crate) fn new(name: Option<String>, fields: BTreeMap<String, Type>) -> Self {
        Self { name, fields }
    }

    /// Schema name, if declared with one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fields by name.
    pub fn fields(&self) -> &BTreeMap<String, Type> {
        &self.fields
    }

    /// Every selector chain from the schema's root down to a leaf field.
    ///
    /// Each field contributes its sub-type's chains with the field's own
    /// selector placed in front; a leaf field contributes `[field]`. An empty
    /// schema yields the empty set.
    pub fn access_path_selectors_set(&self) -> AccessPathSelectorsSet {
        let mut set = AccessPathSelectorsSet::new();
        for (name, ty) in &self.fields {
            let field = Selector::field(name.as_str());
            for chain in
                AccessPathSelectorsSet::prepend_to_all(&field, ty.access_path_selectors_set())
            {
                set.insert(chain);
            }
        }
        set
    }
}
