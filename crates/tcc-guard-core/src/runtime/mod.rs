// crates/tcc-guard-core/src/runtime/mod.rs
// ============================================================================
// Module: TCC Guard Runtime
// Description: Bootstrap passes over the service registry.
// Purpose: Scan, validate, resolve, and wire the registry before startup.
// Dependencies: crate::{audit, core, error}
// ============================================================================

//! ## Overview
//! The runtime hosts the four bootstrap passes and the orchestrator that runs
//! them. Every pass is synchronous and runs once per registry lifecycle,
//! before any service is constructed.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod bootstrap;
pub mod resolver;
pub mod rules;
pub mod scanner;
pub mod validator;
pub mod wiring;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use bootstrap::Bootstrap;
pub use bootstrap::BootstrapReport;
pub use bootstrap::ValidationReport;
pub use resolver::resolve_delegate;
pub use resolver::resolve_delegates;
pub use scanner::CompensableService;
pub use scanner::RegistryScan;
pub use scanner::SkippedDescriptor;
pub use validator::validate_contracts;
pub use validator::validate_service;
pub use wiring::WiringPlan;
pub use wiring::WiringReport;
pub use wiring::plan_context_wiring;
pub use wiring::wire_context;
