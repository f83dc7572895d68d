// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Boundary to the external authorization-logic compiler.
//!
//! The compiler is an opaque subprocess. Given a module name and a directory
//! holding `<module>.auth`, it writes `<module>.dl` into the output directory
//! and exits successfully. On any failure the output file is undefined and is
//! never read.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use flowtag_config::{CompilerArgStyle, ToolchainConfig};
use flowtag_ir::validate_identifier;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Why a module produced no usable facts.
#[derive(Debug, Error)]
pub enum AuthLogicError {
    /// The module name cannot name a file pair.
    #[error("invalid module name {0:?}")]
    InvalidModule(String),
    /// The input directory does not exist.
    #[error("input directory {} does not exist", .0.display())]
    MissingInputDir(PathBuf),
    /// The output directory does not exist.
    #[error("output directory {} does not exist", .0.display())]
    MissingOutputDir(PathBuf),
    /// `<input_dir>/<module>.auth` does not exist.
    #[error("authorization logic source {} does not exist", .0.display())]
    MissingSource(PathBuf),
    /// The compiler could not be started.
    #[error("failed to spawn `{}`: {source}", program.display())]
    Spawn {
        /// Compiler executable.
        program: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The compiler ran and reported failure.
    #[error("authorization logic compiler failed ({status}): {stderr}")]
    CompilerFailed {
        /// Exit status.
        status: ExitStatus,
        /// Captured standard error.
        stderr: String,
    },
    /// The compiler succeeded but wrote no `<module>.dl`.
    #[error("compiler produced no output at {}", .0.display())]
    MissingOutput(PathBuf),
}

/// Handle to the external compiler executable.
#[derive(Debug, Clone)]
pub struct AuthorizationLogicCompiler {
    program: PathBuf,
    leading_args: Vec<OsString>,
    arg_style: CompilerArgStyle,
}

impl AuthorizationLogicCompiler {
    /// A compiler invoked as `program --module <m> --input-dir <i> --output-dir <o>`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            arg_style: CompilerArgStyle::Flags,
        }
    }

    /// The compiler named by a toolchain config.
    pub fn from_config(config: &ToolchainConfig) -> Self {
        Self::new(&config.authorization_compiler)
            .with_leading_args(&config.compiler_leading_args)
            .with_arg_style(config.compiler_args)
    }

    /// Arguments placed before the module and directory arguments.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the argument convention.
    pub fn with_arg_style(mut self, style: CompilerArgStyle) -> Self {
        self.arg_style = style;
        self
    }

    /// The executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Compiles `<input_dir>/<module>.auth` into `<output_dir>/<module>.dl`
    /// and returns the output path.
    #[instrument(skip(self), fields(program = %self.program.display()))]
    pub fn compile(
        &self,
        module: &str,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<PathBuf, AuthLogicError> {
        validate_identifier(module).map_err(|_| AuthLogicError::InvalidModule(module.to_owned()))?;
        if !input_dir.is_dir() {
            return Err(AuthLogicError::MissingInputDir(input_dir.to_path_buf()));
        }
        let source = input_dir.join(format!("{module}.auth"));
        if !source.is_file() {
            return Err(AuthLogicError::MissingSource(source));
        }
        if !output_dir.is_dir() {
            return Err(AuthLogicError::MissingOutputDir(output_dir.to_path_buf()));
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args);
        match self.arg_style {
            CompilerArgStyle::Flags => {
                cmd.arg("--module")
                    .arg(module)
                    .arg("--input-dir")
                    .arg(input_dir)
                    .arg("--output-dir")
                    .arg(output_dir);
            }
            CompilerArgStyle::Positional => {
                cmd.arg(module).arg(input_dir).arg(output_dir);
            }
        }
        debug!(?cmd, "spawning authorization logic compiler");

        let output = cmd.output().map_err(|source| AuthLogicError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        if !output.status.success() {
            return Err(AuthLogicError::CompilerFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let produced = output_dir.join(format!("{module}.dl"));
        if !produced.is_file() {
            return Err(AuthLogicError::MissingOutput(produced));
        }
        info!(module, output = %produced.display(), "compiled authorization logic");
        Ok(produced)
    }
}

/// Exit-code form of [`AuthorizationLogicCompiler::compile`]: `0` on success,
/// `1` on any failure.
pub fn generate_datalog_facts_from_authorization_logic(
    compiler: &AuthorizationLogicCompiler,
    module_name: &str,
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
) -> i32 {
    match compiler.compile(module_name, input_dir.as_ref(), output_dir.as_ref()) {
        Ok(_) => 0,
        Err(err) => {
            warn!(module = module_name, error = %err, "authorization logic compilation failed");
            1
        }
    }
}

/// Reads a fact file as lines, for order-insensitive comparison.
pub fn read_fact_lines(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    Ok(fs::read_to_string(path)?.lines().map(str::to_owned).collect())
}
