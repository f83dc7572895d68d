// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Toolchain configuration for flowtag tools.
//!
//! Settings are JSON documents addressed by key. A [`ConfigStore`] moves raw
//! documents in and out of storage; [`ConfigService`] decodes and encodes
//! them. [`FsConfigStore`] keeps one `<key>.json` file per document.

#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::use_self,
    clippy::option_if_let_else,
    clippy::doc_markdown,
    clippy::too_many_lines,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::needless_pass_by_value,
    clippy::multiple_crate_versions
)]

mod fs;
mod toolchain;

pub use fs::FsConfigStore;
pub use toolchain::{CompilerArgStyle, ToolchainConfig, TOOLCHAIN_KEY};

use std::io;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Storage port for raw config documents.
pub trait ConfigStore {
    /// The document stored under `key`, or `None` if nothing is stored.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError>;
    /// Replaces the document stored under `key`.
    fn write(&self, key: &str, document: &[u8]) -> Result<(), ConfigError>;
}

/// Errors raised while reading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no per-user config directory.
    #[error("no config directory for this platform")]
    NoConfigDir,
    /// Storage failed.
    #[error("config I/O on {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// A document did not decode, or a value did not encode.
    #[error("config `{key}` is not valid JSON for its type: {source}")]
    Json {
        /// Config key.
        key: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Typed access to the documents of one store.
#[derive(Debug)]
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Wraps `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwraps the store.
    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// Decodes the document under `key`. Absent and blank documents give
    /// `Ok(None)`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        let Some(document) = self.store.read(key)? else {
            return Ok(None);
        };
        if document.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&document)
            .map(Some)
            .map_err(|source| ConfigError::Json {
                key: key.to_owned(),
                source,
            })
    }

    /// Encodes `value` as pretty JSON under `key`.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let mut document =
            serde_json::to_vec_pretty(value).map_err(|source| ConfigError::Json {
                key: key.to_owned(),
                source,
            })?;
        document.push(b'\n');
        self.store.write(key, &document)
    }

    /// The stored toolchain settings, or the defaults when none are stored.
    pub fn toolchain(&self) -> Result<ToolchainConfig, ConfigError> {
        Ok(self.get(TOOLCHAIN_KEY)?.unwrap_or_default())
    }

    /// Stores `toolchain` under [`TOOLCHAIN_KEY`].
    pub fn set_toolchain(&self, toolchain: &ToolchainConfig) -> Result<(), ConfigError> {
        self.put(TOOLCHAIN_KEY, toolchain)
    }
}
