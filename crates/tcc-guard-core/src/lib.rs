// crates/tcc-guard-core/src/lib.rs
// ============================================================================
// Module: TCC Guard Core Library
// Description: Public API surface for the TCC bootstrap validator.
// Purpose: Expose the registry model, bootstrap passes, errors, and audit sinks.
// Dependencies: crate::{audit, core, error, runtime}
// ============================================================================

//! ## Overview
//! TCC Guard validates a Try-Confirm-Cancel service registry before any
//! compensable service is invoked. It classifies registered services, enforces
//! the structural and policy rules that make compensation safe (confirm/cancel
//! shape, propagation levels, remote-exception declarations, rollback
//! coverage), and injects a deferred reference to the single shared
//! transaction context into every consumer.
//!
//! All violations are fatal. A run yields either a report or exactly one
//! [`BootstrapError`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod error;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use audit::AuditEventKind;
pub use audit::BootstrapAuditEvent;
pub use audit::BootstrapAuditSink;
pub use audit::FileAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use error::BootstrapError;
pub use error::ErrorCategory;
pub use runtime::Bootstrap;
pub use runtime::BootstrapReport;
pub use runtime::RegistryScan;
pub use runtime::SkippedDescriptor;
pub use runtime::ValidationReport;
pub use runtime::WiringPlan;
pub use runtime::WiringReport;
pub use runtime::plan_context_wiring;
pub use runtime::resolve_delegates;
pub use runtime::validate_contracts;
pub use runtime::wire_context;
