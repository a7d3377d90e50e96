// crates/tcc-guard-core/src/runtime/bootstrap.rs
// ============================================================================
// Module: Bootstrap Orchestration
// Description: Single entry point running every bootstrap pass in order.
// Purpose: Turn a registry into either a clean report or the first violation.
// Dependencies: crate::{audit, core, error, runtime}
// ============================================================================

//! ## Overview
//! [`Bootstrap`] runs the scanner, the contract validator, the cross-reference
//! resolver, and finally context wiring. It is a pure function of the registry
//! and the well-known type names: no state survives between runs and the first
//! violation aborts the run. Wiring happens last so a contract violation never
//! leaves a partially wired registry behind.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::audit::AuditEventKind;
use crate::audit::BootstrapAuditEvent;
use crate::audit::BootstrapAuditSink;
use crate::core::ServiceId;
use crate::core::ServiceRegistry;
use crate::core::WellKnownTypes;
use crate::error::BootstrapError;
use crate::runtime::resolver::resolve_delegates;
use crate::runtime::scanner::RegistryScan;
use crate::runtime::scanner::SkippedDescriptor;
use crate::runtime::validator::validate_contracts;
use crate::runtime::wiring::WiringReport;
use crate::runtime::wiring::wire_context;

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Outcome of the read-only passes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationReport {
    /// Compensable services in registration order.
    pub compensable: Vec<ServiceId>,
    /// Plain services in id order.
    pub plain: Vec<ServiceId>,
    /// Descriptors skipped because their type did not load.
    pub skipped: Vec<SkippedDescriptor>,
}

/// Outcome of a full bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BootstrapReport {
    /// Result of scanning, validation, and resolution.
    pub validation: ValidationReport,
    /// Result of context wiring.
    pub wiring: WiringReport,
}

// ============================================================================
// SECTION: Bootstrap
// ============================================================================

/// Runs the bootstrap passes against a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bootstrap {
    /// Distinguished type names used by the passes.
    well_known: WellKnownTypes,
}

impl Bootstrap {
    /// Creates a bootstrap runner.
    #[must_use]
    pub const fn new(well_known: WellKnownTypes) -> Self {
        Self {
            well_known,
        }
    }

    /// Runs the scanner, contract validator, and cross-reference resolver.
    ///
    /// # Errors
    ///
    /// Returns the first [`BootstrapError`] encountered.
    pub fn validate(
        &self,
        registry: &ServiceRegistry,
        sink: &dyn BootstrapAuditSink,
    ) -> Result<ValidationReport, BootstrapError> {
        let result = self.validate_registry(registry, sink);
        report_outcome(&result, sink);
        result
    }

    /// Runs every pass and applies context wiring.
    ///
    /// # Errors
    ///
    /// Returns the first [`BootstrapError`] encountered. The registry is not
    /// modified when an error is returned.
    pub fn run(
        &self,
        registry: &mut ServiceRegistry,
        sink: &dyn BootstrapAuditSink,
    ) -> Result<BootstrapReport, BootstrapError> {
        let result = self.validate_registry(registry, sink).and_then(|validation| {
            let wiring = wire_context(registry, &self.well_known, sink)?;
            Ok(BootstrapReport {
                validation,
                wiring,
            })
        });
        report_outcome(&result, sink);
        result
    }

    /// Read-only passes without outcome reporting.
    fn validate_registry(
        &self,
        registry: &ServiceRegistry,
        sink: &dyn BootstrapAuditSink,
    ) -> Result<ValidationReport, BootstrapError> {
        let scan = RegistryScan::scan(registry, sink);
        validate_contracts(&scan, &self.well_known, sink)?;
        resolve_delegates(&scan, &self.well_known, sink)?;
        Ok(ValidationReport {
            compensable: scan.compensable().iter().map(|service| service.id.clone()).collect(),
            plain: scan.plain_ids().cloned().collect(),
            skipped: scan.skipped().to_vec(),
        })
    }
}

/// Records the completion or failure event for a run.
fn report_outcome<T>(result: &Result<T, BootstrapError>, sink: &dyn BootstrapAuditSink) {
    match result {
        Ok(_) => sink.record(&BootstrapAuditEvent::new(AuditEventKind::BootstrapCompleted)),
        Err(err) => sink.record(&BootstrapAuditEvent::failure(err)),
    }
}
