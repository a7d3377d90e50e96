// crates/tcc-guard-config/src/lib.rs
// ============================================================================
// Module: TCC Guard Config Library
// Description: Canonical config model and registry manifest loading.
// Purpose: Single source of truth for tcc-guard.toml and manifest semantics.
// Dependencies: tcc-guard-core, serde, toml
// ============================================================================

//! ## Overview
//! `tcc-guard-config` defines the configuration model for TCC Guard and the
//! TOML registry manifest format consumed by the CLI. Both inputs are loaded
//! under the same strict size, path, and encoding limits and fail closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod manifest;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use manifest::RegistryManifest;
