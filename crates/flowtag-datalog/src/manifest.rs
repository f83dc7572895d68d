// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON manifests carrying IR values into a [`DatalogProgram`].

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flowtag_ir::types::{SchemaDecl, TypeDecl, TypeFactory};
use flowtag_ir::{
    validate_identifier, AccessPath, AccessPathRoot, AccessPathSelectorsSet, Edge, IrError,
    OwnsAccessPath, Predicate, TagCheck, TagClaim,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{AmbiguousAccessPath, DatalogProgram};

/// Errors raised while loading or resolving a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {}: {source}", path.display())]
    Io {
        /// Manifest path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The manifest is not valid JSON for this format.
    #[error("malformed manifest: {0}")]
    Json(#[from] serde_json::Error),
    /// An IR value failed construction-time checks.
    #[error(transparent)]
    Ir(#[from] IrError),
    /// A check names an undeclared predicate.
    #[error("unknown predicate `{0}`")]
    UnknownPredicate(String),
    /// A handle or flow names an undeclared schema.
    #[error("unknown schema `{0}`")]
    UnknownSchema(String),
    /// Two different access paths in the program share one Datalog term.
    #[error(transparent)]
    AmbiguousAccessPath(#[from] AmbiguousAccessPath),
}

/// A handle connection whose every leaf field is owned by `owner`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandleDecl {
    /// Owning principal.
    pub owner: String,
    /// The handle connection.
    pub root: AccessPathRoot,
    /// Name of the schema the handle carries.
    pub schema: String,
}

/// Field-wise flow from one handle connection to another of the same schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowDecl {
    /// Source root.
    pub from: AccessPathRoot,
    /// Target root.
    pub to: AccessPathRoot,
    /// Schema shared by both ends.
    pub schema: String,
}

/// A check of a named predicate, plus its implementation-side copies.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckDecl {
    /// The checked path (usually spec-rooted).
    pub access_path: AccessPath,
    /// Key into [`Manifest::predicates`].
    pub predicate: String,
    /// Concrete roots the check is also instantiated at. Every copy shares the
    /// declared predicate.
    #[serde(default)]
    pub instantiate_as: Vec<AccessPathRoot>,
}

/// An authorization-logic module to compile and include.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorizationLogicDecl {
    /// Module name (`<module>.auth` in, `<module>.dl` out).
    pub module: String,
    /// Directory holding the source.
    pub input_dir: PathBuf,
    /// Directory receiving the compiled facts.
    pub output_dir: PathBuf,
}

/// The manifest document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Named schema declarations.
    pub schemas: Vec<SchemaDecl>,
    /// Named predicates, interned once and shared by every check naming them.
    pub predicates: BTreeMap<String, Predicate>,
    /// Handles expanded into ownership facts.
    pub handles: Vec<HandleDecl>,
    /// Flows expanded into one edge per leaf field.
    pub flows: Vec<FlowDecl>,
    /// Explicit edges.
    pub edges: Vec<Edge>,
    /// Tag claims.
    pub claims: Vec<TagClaim>,
    /// Tag checks.
    pub checks: Vec<CheckDecl>,
    /// Extra `#include` files.
    pub includes: Vec<PathBuf>,
    /// Authorization-logic module, compiled by the caller.
    pub authorization_logic: Option<AuthorizationLogicDecl>,
}

impl Manifest {
    /// Parses a manifest from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a manifest file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// A factory holding every declared schema, fully resolved.
    pub fn type_factory(&self) -> Result<TypeFactory, ManifestError> {
        let mut factory = TypeFactory::new();
        for decl in &self.schemas {
            factory.declare(decl.clone())?;
        }
        factory.resolve_all()?;
        Ok(factory)
    }

    /// Leaf selector chains of the named schema.
    pub fn selectors_of(&self, schema: &str) -> Result<AccessPathSelectorsSet, ManifestError> {
        let mut factory = self.type_factory()?;
        leaf_chains(&mut factory, schema)
    }

    /// Validates every identifier and resolves the manifest into a program.
    ///
    /// The authorization-logic module is not compiled here; the caller runs
    /// the compiler and hands the result to
    /// [`DatalogProgram::include_authorization_logic`].
    pub fn into_program(self) -> Result<DatalogProgram, ManifestError> {
        let mut factory = self.type_factory()?;
        let mut program = DatalogProgram::new();

        for path in self.includes {
            program.add_include(path);
        }

        for claim in self.claims {
            claim.validate()?;
            program.add_claim(claim);
        }

        for handle in &self.handles {
            validate_identifier(&handle.owner)?;
            handle.root.validate()?;
            for path in leaf_chains(&mut factory, &handle.schema)?.instantiate(&handle.root) {
                program.add_ownership(OwnsAccessPath::new(handle.owner.as_str(), path));
            }
        }

        for flow in &self.flows {
            flow.from.validate()?;
            flow.to.validate()?;
            let chains = leaf_chains(&mut factory, &flow.schema)?;
            for (source, target) in chains
                .instantiate(&flow.from)
                .into_iter()
                .zip(chains.instantiate(&flow.to))
            {
                program.add_edge(Edge::new(source, target));
            }
        }

        for edge in self.edges {
            edge.source().validate()?;
            edge.target().validate()?;
            program.add_edge(edge);
        }

        let mut predicates = BTreeMap::new();
        for (name, predicate) in self.predicates {
            predicate.validate()?;
            predicates.insert(name, Arc::new(predicate));
        }

        for decl in self.checks {
            let predicate = predicates
                .get(&decl.predicate)
                .ok_or_else(|| ManifestError::UnknownPredicate(decl.predicate.clone()))?;
            let check = TagCheck::new(decl.access_path, Arc::clone(predicate));
            check.validate()?;
            let copies = decl
                .instantiate_as
                .into_iter()
                .map(|root| {
                    root.validate()?;
                    check.instantiate(root)
                })
                .collect::<Result<Vec<_>, IrError>>()?;
            program.add_check(check);
            for copy in copies {
                program.add_check(copy);
            }
        }

        debug!(
            edges = program.edges().len(),
            checks = program.checks().len(),
            ownership = program.ownership().len(),
            "resolved manifest"
        );
        if let Some(ambiguous) = program.find_ambiguous_access_path() {
            return Err(ambiguous.into());
        }
        Ok(program)
    }
}

fn leaf_chains(factory: &mut TypeFactory, schema: &str) -> Result<AccessPathSelectorsSet, ManifestError> {
    if !factory.declared_names().any(|name| name == schema) {
        return Err(ManifestError::UnknownSchema(schema.to_owned()));
    }
    Ok(factory
        .resolve(&TypeDecl::named(schema))?
        .access_path_selectors_set())
}
