// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Structural types and their leaf enumeration.
//!
//! A [`Type`] is either a primitive leaf or an entity backed by a [`Schema`].
//! Schemas are only built by [`TypeFactory`], which rejects unknown and
//! cyclic references, so every resolved type is a finite `Arc` tree and
//! [`Type::access_path_selectors_set`] always terminates.

mod schema;
mod type_factory;

pub use schema::Schema;
pub use type_factory::{FieldDecl, SchemaDecl, TypeDecl, TypeFactory};

use std::sync::Arc;

use crate::AccessPathSelectorsSet;

/// A type with no further structure.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PrimitiveType;

/// A record type described by a [`Schema`].
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EntityType {
    schema: Arc<Schema>,
}

impl EntityType {
    pub(crate) fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    /// The schema describing this entity's fields.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }
}

/// A field type.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Type {
    /// Leaf type.
    Primitive(PrimitiveType),
    /// Record type.
    Entity(EntityType),
}

impl Type {
    /// Every selector chain from a value of this type down to a leaf.
    ///
    /// A primitive, or an entity with no fields, is itself a leaf and yields
    /// only the empty chain.
    pub fn access_path_selectors_set(&self) -> AccessPathSelectorsSet {
        match self {
            Self::Primitive(_) => AccessPathSelectorsSet::leaf(),
            Self::Entity(entity) => {
                let set = entity.schema.access_path_selectors_set();
                if set.is_empty() {
                    AccessPathSelectorsSet::leaf()
                } else {
                    set
                }
            }
        }
    }
}
