// crates/tcc-guard-config/src/manifest.rs
// ============================================================================
// Module: Registry Manifest
// Description: Declarative TOML description of types and service descriptors.
// Purpose: Feed the bootstrap passes from a file instead of a live container.
// Dependencies: tcc-guard-core, serde, toml
// ============================================================================

//! ## Overview
//! A manifest lists type definitions under `[[types]]` and service
//! descriptors under `[[services]]`, in registration order:
//!
//! ```toml
//! [[types]]
//! name = "Pay"
//! kind = "interface"
//! methods = [{ name = "charge" }]
//!
//! [[services]]
//! id = "pay"
//! type_name = "PayTry"
//! ```
//!
//! Manifests are read under the same limits as configuration files.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use tcc_guard_core::BootstrapError;
use tcc_guard_core::ServiceDescriptor;
use tcc_guard_core::ServiceRegistry;
use tcc_guard_core::TypeDef;

use crate::config::ConfigError;
use crate::config::read_limited;

// ============================================================================
// SECTION: Manifest
// ============================================================================

/// Parsed registry manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryManifest {
    /// Type definitions, including exception types.
    #[serde(default)]
    pub types: Vec<TypeDef>,
    /// Service descriptors in registration order.
    #[serde(default)]
    pub services: Vec<ServiceDescriptor>,
}

impl RegistryManifest {
    /// Loads a manifest from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file violates limits or fails to parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read_limited(path, "manifest")?;
        Self::from_toml_str(&content)
    }

    /// Parses a manifest from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not a valid manifest.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Builds the service registry described by the manifest.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError`] when type names or service ids repeat.
    pub fn into_registry(self) -> Result<ServiceRegistry, BootstrapError> {
        ServiceRegistry::new(self.types, self.services)
    }
}
