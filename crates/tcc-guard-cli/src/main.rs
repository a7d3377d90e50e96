// crates/tcc-guard-cli/src/main.rs
// ============================================================================
// Module: TCC Guard CLI
// Description: CLI entrypoint for checking and wiring registry manifests.
// Purpose: Run the bootstrap passes outside a live container.
// Dependencies: clap, serde_json, tcc-guard-config, tcc-guard-core
// ============================================================================

//! ## Overview
//! `tcc-guard check` loads a registry manifest and runs the read-only
//! bootstrap passes, printing a summary. `tcc-guard wire` runs every pass
//! including context wiring and emits the wired service descriptors as JSON.
//! Any violation exits non-zero with the violation message on stderr.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use tcc_guard_config::AuditSinkKind;
use tcc_guard_config::ConfigError;
use tcc_guard_config::GuardConfig;
use tcc_guard_config::RegistryManifest;
use tcc_guard_core::Bootstrap;
use tcc_guard_core::BootstrapAuditSink;
use tcc_guard_core::BootstrapError;
use tcc_guard_core::FileAuditSink;
use tcc_guard_core::NoopAuditSink;
use tcc_guard_core::ServiceId;
use tcc_guard_core::ServiceRegistry;
use tcc_guard_core::StderrAuditSink;
use tcc_guard_core::ValidationReport;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Definition
// ============================================================================

/// TCC Guard CLI arguments.
#[derive(Debug, Parser)]
#[command(name = "tcc-guard", about = "Validate and wire TCC service registries.")]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Supported CLI subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a registry manifest without wiring it.
    Check {
        /// Registry manifest to validate.
        #[arg(long, value_name = "FILE")]
        manifest: PathBuf,
        /// Configuration file (defaults to `TCC_GUARD_CONFIG` or `tcc-guard.toml`).
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Validate and wire a registry manifest, emitting the wired descriptors.
    Wire {
        /// Registry manifest to wire.
        #[arg(long, value_name = "FILE")]
        manifest: PathBuf,
        /// Configuration file (defaults to `TCC_GUARD_CONFIG` or `tcc-guard.toml`).
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Output file for the wired descriptors (defaults to stdout).
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration or manifest loading failed.
    #[error("failed to load input: {0}")]
    Config(#[from] ConfigError),
    /// A bootstrap rule was violated.
    #[error("bootstrap failed [{category}]: {0}", category = category_label(.0))]
    Bootstrap(#[from] BootstrapError),
    /// Writing output or opening the audit log failed.
    #[error("output error: {0}")]
    Output(String),
}

/// Returns the stable category label of a bootstrap violation.
fn category_label(err: &BootstrapError) -> &'static str {
    err.category().as_str()
}

// ============================================================================
// SECTION: CLI Execution
// ============================================================================

/// CLI entrypoint.
fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}

/// Executes the CLI command.
fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Check {
            manifest,
            config,
        } => check(&manifest, config.as_deref()),
        Command::Wire {
            manifest,
            config,
            out,
        } => wire(&manifest, config.as_deref(), out.as_deref()),
    }
}

/// Runs the read-only passes and prints a summary.
fn check(manifest: &Path, config: Option<&Path>) -> Result<(), CliError> {
    let (config, registry) = load_inputs(manifest, config)?;
    let sink = build_sink(&config)?;
    let report = Bootstrap::new(config.well_known()).validate(&registry, sink.as_ref())?;
    write_stdout(&summary(&report))
}

/// Runs every pass and emits the wired descriptors.
fn wire(manifest: &Path, config: Option<&Path>, out: Option<&Path>) -> Result<(), CliError> {
    let (config, mut registry) = load_inputs(manifest, config)?;
    let sink = build_sink(&config)?;
    Bootstrap::new(config.well_known()).run(&mut registry, sink.as_ref())?;
    let mut payload = serde_json::to_string_pretty(registry.services())
        .map_err(|err| CliError::Output(err.to_string()))?;
    payload.push('\n');
    match out {
        Some(path) => fs::write(path, payload).map_err(|err| CliError::Output(err.to_string())),
        None => write_stdout(&payload),
    }
}

/// Reports CLI errors to stderr and returns a failure exit code.
fn report_error(err: &CliError) -> ExitCode {
    let mut stderr = std::io::stderr();
    let _ = writeln!(stderr, "{err}");
    ExitCode::FAILURE
}

// ============================================================================
// SECTION: CLI Helpers
// ============================================================================

/// Loads the configuration and builds the registry from the manifest.
fn load_inputs(
    manifest: &Path,
    config: Option<&Path>,
) -> Result<(GuardConfig, ServiceRegistry), CliError> {
    let config = GuardConfig::load(config)?;
    let registry = RegistryManifest::load(manifest)?.into_registry()?;
    Ok((config, registry))
}

/// Builds the audit sink selected by the configuration.
fn build_sink(config: &GuardConfig) -> Result<Box<dyn BootstrapAuditSink>, CliError> {
    match (config.audit.sink, config.audit.path.as_deref()) {
        (AuditSinkKind::Stderr, _) => Ok(Box::new(StderrAuditSink)),
        (AuditSinkKind::None, _) => Ok(Box::new(NoopAuditSink)),
        (AuditSinkKind::File, Some(path)) => FileAuditSink::new(Path::new(path.trim()))
            .map(|sink| Box::new(sink) as Box<dyn BootstrapAuditSink>)
            .map_err(|err| CliError::Output(format!("audit log {path}: {err}"))),
        (AuditSinkKind::File, None) => {
            Err(CliError::Output("audit.path is required for the file sink".to_string()))
        }
    }
}

/// Formats the check summary.
fn summary(report: &ValidationReport) -> String {
    let mut lines = vec![
        format!("compensable: {}", join_ids(&report.compensable)),
        format!("plain: {}", join_ids(&report.plain)),
    ];
    for skipped in &report.skipped {
        lines.push(format!("skipped: {} ({})", skipped.service, skipped.reason));
    }
    lines.push("registry valid".to_string());
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Joins service ids with commas, or `-` when empty.
fn join_ids(ids: &[ServiceId]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter().map(ServiceId::as_str).collect::<Vec<_>>().join(", ")
}

/// Writes text to stdout.
fn write_stdout(text: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout();
    stdout.write_all(text.as_bytes()).map_err(|err| CliError::Output(err.to_string()))
}
