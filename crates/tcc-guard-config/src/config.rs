// crates/tcc-guard-config/src/config.rs
// ============================================================================
// Module: TCC Guard Configuration
// Description: Configuration loading and validation for TCC Guard.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: tcc-guard-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The path comes from the caller, then the `TCC_GUARD_CONFIG` environment
//! variable, then the default file name. Only the default file may be absent,
//! in which case defaults apply; any other missing or invalid input fails
//! closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use tcc_guard_core::TypeName;
use tcc_guard_core::WellKnownTypes;
use tcc_guard_core::core::well_known::DEFAULT_CONTEXT_CONSUMER_TYPE;
use tcc_guard_core::core::well_known::DEFAULT_CONTEXT_PROPERTY;
use tcc_guard_core::core::well_known::DEFAULT_CONTEXT_TYPE;
use tcc_guard_core::core::well_known::DEFAULT_REMOTE_EXCEPTION;
use tcc_guard_core::core::well_known::DEFAULT_UNCHECKED_EXCEPTION;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "tcc-guard.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "TCC_GUARD_CONFIG";
/// Maximum configuration or manifest file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a configured type name.
pub(crate) const MAX_TYPE_NAME_LENGTH: usize = 512;
/// Maximum number of unchecked exception roots.
pub(crate) const MAX_UNCHECKED_EXCEPTIONS: usize = 64;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Top-level TCC Guard configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardConfig {
    /// Well-known type names used by the bootstrap passes.
    #[serde(default)]
    pub types: TypesConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl GuardConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        if resolved.is_default && !resolved.path.exists() {
            return Ok(Self::default());
        }
        let content = read_limited(&resolved.path, "config")?;
        let mut config: Self =
            toml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.types.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Returns the well-known type names for the bootstrap passes.
    #[must_use]
    pub fn well_known(&self) -> WellKnownTypes {
        self.types.to_well_known()
    }
}

/// Well-known type names configuration (`[types]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypesConfig {
    /// Transport-layer exception compensable methods must not declare.
    #[serde(default = "default_remote_exception")]
    pub remote_exception: String,
    /// Exception roots exempt from rollback enrollment.
    #[serde(default = "default_unchecked_exceptions")]
    pub unchecked_exceptions: Vec<String>,
    /// Shared transaction-context type.
    #[serde(default = "default_context")]
    pub context: String,
    /// Context consumer capability type.
    #[serde(default = "default_context_consumer")]
    pub context_consumer: String,
    /// Construction property receiving the context reference.
    #[serde(default = "default_context_property")]
    pub context_property: String,
}

impl Default for TypesConfig {
    fn default() -> Self {
        Self {
            remote_exception: default_remote_exception(),
            unchecked_exceptions: default_unchecked_exceptions(),
            context: default_context(),
            context_consumer: default_context_consumer(),
            context_property: default_context_property(),
        }
    }
}

impl TypesConfig {
    /// Validates type names and the context property.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a name is empty, too long, or malformed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_type_name("types.remote_exception", &self.remote_exception)?;
        validate_type_name("types.context", &self.context)?;
        validate_type_name("types.context_consumer", &self.context_consumer)?;
        if self.unchecked_exceptions.is_empty() {
            return Err(ConfigError::Invalid(
                "types.unchecked_exceptions must list at least one type".to_string(),
            ));
        }
        if self.unchecked_exceptions.len() > MAX_UNCHECKED_EXCEPTIONS {
            return Err(ConfigError::Invalid(format!(
                "types.unchecked_exceptions exceeds max entries ({MAX_UNCHECKED_EXCEPTIONS})"
            )));
        }
        for name in &self.unchecked_exceptions {
            validate_type_name("types.unchecked_exceptions", name)?;
        }
        if self.context == self.context_consumer {
            return Err(ConfigError::Invalid(
                "types.context and types.context_consumer must differ".to_string(),
            ));
        }
        if !is_identifier(&self.context_property) {
            return Err(ConfigError::Invalid(
                "types.context_property must be a valid identifier".to_string(),
            ));
        }
        Ok(())
    }

    /// Converts the configured names into [`WellKnownTypes`].
    #[must_use]
    pub fn to_well_known(&self) -> WellKnownTypes {
        WellKnownTypes {
            remote_exception: TypeName::new(self.remote_exception.trim()),
            unchecked_exceptions: self
                .unchecked_exceptions
                .iter()
                .map(|name| TypeName::new(name.trim()))
                .collect(),
            context: TypeName::new(self.context.trim()),
            context_consumer: TypeName::new(self.context_consumer.trim()),
            context_property: self.context_property.clone(),
        }
    }
}

/// Audit sink kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Audit output disabled.
    None,
}

/// Audit configuration (`[audit]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Selected sink.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path, required for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates sink selection.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file sink has no valid path, or a
    /// path is given for another sink.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, self.path.as_deref()) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => Err(ConfigError::Invalid(
                "audit.path is required when audit.sink = \"file\"".to_string(),
            )),
            (_, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only allowed when audit.sink = \"file\"".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration or manifest loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default remote exception type name.
fn default_remote_exception() -> String {
    DEFAULT_REMOTE_EXCEPTION.to_string()
}

/// Default unchecked exception roots.
fn default_unchecked_exceptions() -> Vec<String> {
    vec![DEFAULT_UNCHECKED_EXCEPTION.to_string()]
}

/// Default context type name.
fn default_context() -> String {
    DEFAULT_CONTEXT_TYPE.to_string()
}

/// Default context consumer type name.
fn default_context_consumer() -> String {
    DEFAULT_CONTEXT_CONSUMER_TYPE.to_string()
}

/// Default context property name.
fn default_context_property() -> String {
    DEFAULT_CONTEXT_PROPERTY.to_string()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Config path together with how it was chosen.
struct ResolvedPath {
    /// Path to read.
    path: PathBuf,
    /// True when neither the caller nor the environment supplied a path.
    is_default: bool,
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<ResolvedPath, ConfigError> {
    if let Some(path) = path {
        return Ok(ResolvedPath {
            path: path.to_path_buf(),
            is_default: false,
        });
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(ResolvedPath {
            path: PathBuf::from(env_path),
            is_default: false,
        });
    }
    Ok(ResolvedPath {
        path: PathBuf::from(DEFAULT_CONFIG_NAME),
        is_default: true,
    })
}

/// Validates a path against length limits.
fn validate_path(path: &Path, label: &str) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{label} path exceeds max length")));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{label} path component too long")));
        }
    }
    Ok(())
}

/// Reads a UTF-8 file after enforcing path and size limits.
pub(crate) fn read_limited(path: &Path, label: &str) -> Result<String, ConfigError> {
    validate_path(path, label)?;
    let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid(format!("{label} file exceeds size limit")));
    }
    String::from_utf8(bytes)
        .map_err(|_| ConfigError::Invalid(format!("{label} file must be utf-8")))
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    validate_path(Path::new(trimmed), field)
}

/// Validates a configured type name.
fn validate_type_name(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TYPE_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

/// Returns true when `value` is an ASCII identifier.
fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|rest| rest.is_ascii_alphanumeric() || rest == '_')
}

// ============================================================================
// SECTION: Tests
// ============================================================================
