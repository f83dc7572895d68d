// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Declarations and their resolution into [`Type`]s.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::types::{EntityType, PrimitiveType, Schema, Type};
use crate::{validate_identifier, IrError};

/// A field declaration.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDecl {
    /// Field name; must satisfy [`validate_identifier`].
    pub name: String,
    /// Declared type.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ty: TypeDecl,
}

impl FieldDecl {
    /// Declares `name: ty`.
    pub fn new(name: impl Into<String>, ty: TypeDecl) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A schema declaration. Top-level declarations need a name; inline ones may
/// omit it.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchemaDecl {
    /// Schema name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    /// Fields in declaration order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fields: Vec<FieldDecl>,
}

impl SchemaDecl {
    /// A named schema with `fields`.
    pub fn named(name: impl Into<String>, fields: Vec<FieldDecl>) -> Self {
        Self {
            name: Some(name.into()),
            fields,
        }
    }

    /// An anonymous (inline) schema with `fields`.
    pub fn inline(fields: Vec<FieldDecl>) -> Self {
        Self { name: None, fields }
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

/// A type declaration, possibly referring to a named schema.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum TypeDecl {
    /// A leaf.
    Primitive,
    /// An inline record.
    Schema(SchemaDecl),
    /// A reference to a schema declared on the factory.
    Named {
        /// The referenced schema name.
        name: String,
    },
}

impl TypeDecl {
    /// Reference to the named schema `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named { name: name.into() }
    }
}

/// Builds immutable [`Schema`]s and [`Type`]s from declarations.
///
/// Named schemas are declared first and resolved lazily; each resolves to one
/// shared `Arc<Schema>`. Resolution fails on references to undeclared names,
/// on duplicate field names, and on reference cycles.
#[derive(Debug, Default)]
pub struct TypeFactory {
    declared: BTreeMap<String, SchemaDecl>,
    resolved: BTreeMap<String, Arc<Schema>>,
}

impl TypeFactory {
    /// An empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named schema declaration.
    pub fn declare(&mut self, decl: SchemaDecl) -> Result<(), IrError> {
        let name = decl.name.clone().ok_or(IrError::UnnamedSchema)?;
        validate_identifier(&name)?;
        if self.declared.contains_key(&name) {
            return Err(IrError::DuplicateSchema(name));
        }
        self.declared.insert(name, decl);
        Ok(())
    }

    /// Names of all declared schemas, sorted.
    pub fn declared_names(&self) -> impl Iterator<Item = &str> {
        self.declared.keys().map(String::as_str)
    }

    /// A primitive leaf type.
    pub fn make_primitive_type(&self) -> Type {
        Type::Primitive(PrimitiveType)
    }

    /// Resolves the named schema.
    pub fn schema(&mut self, name: &str) -> Result<Arc<Schema>, IrError> {
        self.resolve_named(name, &mut Vec::new())
    }

    /// Resolves an arbitrary type declaration.
    pub fn resolve(&mut self, decl: &TypeDecl) -> Result<Type, IrError> {
        self.resolve_type(decl, &mut Vec::new())
    }

    /// Resolves every declared schema, surfacing the first error.
    pub fn resolve_all(&mut self) -> Result<(), IrError> {
        let names: Vec<String> = self.declared.keys().cloned().collect();
        for name in names {
            self.resolve_named(&name, &mut Vec::new())?;
        }
        Ok(())
    }

    fn resolve_named(&mut self, name: &str, stack: &mut Vec<String>) -> Result<Arc<Schema>, IrError> {
        if let Some(schema) = self.resolved.get(name) {
            return Ok(Arc::clone(schema));
        }
        if let Some(start) = stack.iter().position(|n| n == name) {
            let mut cycle = stack.split_off(start);
            cycle.push(name.to_owned());
            return Err(IrError::CyclicSchema {
                cycle: cycle.join(" -> "),
            });
        }
        let decl = self
            .declared
            .get(name)
            .cloned()
            .ok_or_else(|| IrError::UnknownType(name.to_owned()))?;

        stack.push(name.to_owned());
        let schema = Arc::new(self.build_schema(&decl, stack)?);
        stack.pop();

        debug!(schema = name, fields = schema.fields().len(), "resolved schema");
        self.resolved.insert(name.to_owned(), Arc::clone(&schema));
        Ok(schema)
    }

    fn build_schema(&mut self, decl: &SchemaDecl, stack: &mut Vec<String>) -> Result<Schema, IrError> {
        let mut fields = BTreeMap::new();
        for field in &decl.fields {
            validate_identifier(&field.name)?;
            if fields.contains_key(&field.name) {
                return Err(IrError::DuplicateField {
                    schema: decl.display_name().to_owned(),
                    field: field.name.clone(),
                });
            }
            let ty = self.resolve_type(&field.ty, stack)?;
            fields.insert(field.name.clone(), ty);
        }
        Ok(Schema::new(decl.name.clone(), fields))
    }

    fn resolve_type(&mut self, decl: &TypeDecl, stack: &mut Vec<String>) -> Result<Type, IrError> {
        match decl {
            TypeDecl::Primitive => Ok(self.make_primitive_type()),
            TypeDecl::Schema(inline) => Ok(Type::Entity(EntityType::new(Arc::new(
                self.build_schema(inline, stack)?,
            )))),
            TypeDecl::Named { name } => Ok(Type::Entity(EntityType::new(
                self.resolve_named(name, stack)?,
            ))),
        }
    }
}
