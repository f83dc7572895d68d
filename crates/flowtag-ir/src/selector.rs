// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Atomic access-path steps.

use std::fmt;

use crate::{validate_identifier, IrError};

/// Selects a named field of a record.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct FieldSelector(String);

impl FieldSelector {
    /// Creates a selector for `field`. The name must satisfy
    /// [`validate_identifier`]; use [`FieldSelector::try_new`] to check.
    pub fn new(field: impl Into<String>) -> Self {
        Self(field.into())
    }

    /// Creates a selector after validating the field name.
    pub fn try_new(field: impl Into<String>) -> Result<Self, IrError> {
        let field = field.into();
        validate_identifier(&field)?;
        Ok(Self(field))
    }

    /// The selected field name.
    pub fn field_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One step of an access path.
///
/// Field access is the only kind today. New kinds extend this enum; every
/// consumer matches exhaustively, so the compiler finds each site to update.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Selector {
    /// Named field access.
    Field(FieldSelector),
}

impl Selector {
    /// Shorthand for `Selector::Field(FieldSelector::new(name))`.
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(FieldSelector::new(name))
    }

    /// Validates the identifying string carried by this selector.
    pub fn validate(&self) -> Result<(), IrError> {
        match self {
            Self::Field(field) => validate_identifier(field.field_name()),
        }
    }
}

impl From<FieldSelector> for Selector {
    fn from(field: FieldSelector) -> Self {
        Self::Field(field)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => fmt::Display::fmt(field, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_selector_renders_its_name() {
        assert_eq!(Selector::field("field1").to_string(), "field1");
    }

    #[test]
    fn equality_is_by_payload() {
        assert_eq!(Selector::field("x"), Selector::Field(FieldSelector::new("x")));
        assert_ne!(Selector::field("x"), Selector::field("y"));
    }

    #[test]
    fn try_new_rejects_dotted_names() {
        assert!(FieldSelector::try_new("x.y").is_err());
        assert!(FieldSelector::try_new("x").is_ok());
    }
}
