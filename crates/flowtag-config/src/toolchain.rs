// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Settings for the external tools the pipeline drives.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Config key under which [`ToolchainConfig`] is stored.
pub const TOOLCHAIN_KEY: &str = "toolchain";

/// How the module name and directories are passed to the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompilerArgStyle {
    /// `--module <m> --input-dir <i> --output-dir <o>`.
    #[default]
    Flags,
    /// `<m> <i> <o>`.
    Positional,
}

/// External toolchain settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Authorization-logic compiler executable (looked up on `PATH` if relative).
    pub authorization_compiler: PathBuf,
    /// Arguments placed before the module and directory arguments
    /// (e.g. a script path when the compiler is an interpreter).
    pub compiler_leading_args: Vec<String>,
    /// Argument convention of that compiler.
    pub compiler_args: CompilerArgStyle,
    /// Files `#include`d at the top of every emitted program.
    pub includes: Vec<PathBuf>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            authorization_compiler: PathBuf::from("authorization-logic"),
            compiler_leading_args: Vec::new(),
            compiler_args: CompilerArgStyle::Flags,
            includes: Vec::new(),
        }
    }
}
