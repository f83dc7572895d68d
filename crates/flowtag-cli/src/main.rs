// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `flowtag` entrypoint.
//!
//! # Usage
//! ```text
//! flowtag [--config <dir>] [-v] emit <manifest.json> [-o out.dl] [--namespace ns]
//! flowtag [--config <dir>] [-v] selectors <manifest.json> <schema>
//! flowtag [--config <dir>] [-v] authz --module M --input-dir I --output-dir O
//! ```
//!
//! `authz` exits with `0` when the module compiled and `1` otherwise. The
//! other commands exit non-zero on error. Logs go to stderr so `emit` output
//! can be piped.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use flowtag_config::{ConfigService, FsConfigStore, ToolchainConfig};
use flowtag_datalog::{
    generate_datalog_facts_from_authorization_logic, AuthorizationLogicCompiler, Manifest,
};
use flowtag_ir::DatalogPrintContext;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "flowtag",
    author,
    version,
    about = "Emit Datalog facts and checks for information-flow analysis",
    disable_help_subcommand = true
)]
struct Cli {
    /// Directory holding `toolchain.json` (defaults to the platform config dir).
    #[arg(long, global = true, value_name = "DIR")]
    config: Option<PathBuf>,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a manifest as one Datalog program.
    Emit(EmitArgs),
    /// Print the leaf selector chains of a schema, one per line.
    Selectors(SelectorsArgs),
    /// Compile an authorization-logic module into Datalog facts.
    Authz(AuthzArgs),
}

#[derive(Args, Debug)]
struct EmitArgs {
    /// Manifest JSON file.
    manifest: PathBuf,

    /// Write the program here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Prefix for check labels and helper relations.
    #[arg(long)]
    namespace: Option<String>,

    /// Authorization-logic compiler, overriding the configured one.
    #[arg(long, value_name = "PATH")]
    compiler: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SelectorsArgs {
    /// Manifest JSON file.
    manifest: PathBuf,

    /// Schema name.
    schema: String,
}

#[derive(Args, Debug)]
struct AuthzArgs {
    /// Module name; reads `<input-dir>/<module>.auth`.
    #[arg(long)]
    module: String,

    /// Directory holding the module source.
    #[arg(long, value_name = "DIR")]
    input_dir: PathBuf,

    /// Directory receiving `<module>.dl`.
    #[arg(long, value_name = "DIR")]
    output_dir: PathBuf,

    /// Authorization-logic compiler, overriding the configured one.
    #[arg(long, value_name = "PATH")]
    compiler: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    let toolchain = load_toolchain(cli.config.as_deref())?;

    match cli.command {
        Commands::Emit(args) => run_emit(args, &toolchain).map(|()| ExitCode::SUCCESS),
        Commands::Selectors(args) => run_selectors(&args).map(|()| ExitCode::SUCCESS),
        Commands::Authz(args) => Ok(run_authz(&args, &toolchain)),
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn load_toolchain(dir: Option<&Path>) -> Result<ToolchainConfig> {
    let store = match dir {
        Some(dir) => FsConfigStore::at(dir),
        None => match FsConfigStore::platform() {
            Ok(store) => store,
            Err(err) => {
                warn!(error = %err, "using default toolchain");
                return Ok(ToolchainConfig::default());
            }
        },
    };
    let config = ConfigService::new(store);
    let toolchain = config.toolchain().with_context(|| {
        format!("failed to load toolchain config from {}", config.store().dir().display())
    })?;
    debug!(?toolchain, config = %config.store().dir().display(), "toolchain loaded");
    Ok(toolchain)
}

fn compiler_for(toolchain: &ToolchainConfig, program: Option<&Path>) -> AuthorizationLogicCompiler {
    match program {
        Some(program) => {
            AuthorizationLogicCompiler::new(program).with_arg_style(toolchain.compiler_args)
        }
        None => AuthorizationLogicCompiler::from_config(toolchain),
    }
}

fn run_emit(args: EmitArgs, toolchain: &ToolchainConfig) -> Result<()> {
    let mut manifest = Manifest::load(&args.manifest)?;
    let base = args.manifest.parent().unwrap_or_else(|| Path::new(""));
    let authorization_logic = manifest.authorization_logic.take();
    let mut includes = toolchain.includes.clone();
    includes.append(&mut manifest.includes);
    manifest.includes = includes;

    let mut program = manifest
        .into_program()
        .with_context(|| format!("failed to resolve {}", args.manifest.display()))?;

    if let Some(decl) = authorization_logic {
        let compiler = compiler_for(toolchain, args.compiler.as_deref());
        let compiled = compiler.compile(
            &decl.module,
            &base.join(&decl.input_dir),
            &base.join(&decl.output_dir),
        );
        program.include_authorization_logic(&decl.module, compiled);
    }

    let ctxt = match args.namespace {
        Some(namespace) => DatalogPrintContext::with_namespace(namespace)?,
        None => DatalogPrintContext::new(),
    };
    let text = program.render_with(ctxt);

    if let Some(path) = &args.output {
        fs::write(path, &text).with_context(|| format!("failed to write {}", path.display()))?;
        info!(output = %path.display(), bytes = text.len(), "program written");
    } else {
        io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .context("failed to write program to stdout")?;
    }
    Ok(())
}

fn run_selectors(args: &SelectorsArgs) -> Result<()> {
    let manifest = Manifest::load(&args.manifest)?;
    let chains = manifest
        .selectors_of(&args.schema)
        .with_context(|| format!("failed to resolve schema `{}`", args.schema))?;
    let mut out = io::stdout().lock();
    for chain in &chains {
        writeln!(out, "{chain}").context("failed to write to stdout")?;
    }
    Ok(())
}

fn run_authz(args: &AuthzArgs, toolchain: &ToolchainConfig) -> ExitCode {
    let compiler = compiler_for(toolchain, args.compiler.as_deref());
    let code = generate_datalog_facts_from_authorization_logic(
        &compiler,
        &args.module,
        &args.input_dir,
        &args.output_dir,
    );
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
