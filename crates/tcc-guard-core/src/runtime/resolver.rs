// crates/tcc-guard-core/src/runtime/resolver.rs
// ============================================================================
// Module: Cross-Reference Resolver
// Description: Confirm/cancel delegate resolution and delegate method checks.
// Purpose: Guarantee every named delegate exists and can compensate safely.
// Dependencies: crate::{audit, core, error, runtime}
// ============================================================================

//! ## Overview
//! A compensable service may name a confirm delegate and a cancel delegate by
//! service id. For each non-blank key, confirm before cancel:
//! 1. the key must not name a compensable service;
//! 2. the key must name a plain service that was scanned successfully;
//! 3. every try-interface method must resolve on the delegate's type, and the
//!    resolved method must pass the remote-exception ban, the propagation
//!    whitelist, and the rollback-coverage check.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::audit::AuditEventKind;
use crate::audit::BootstrapAuditEvent;
use crate::audit::BootstrapAuditSink;
use crate::core::RoleMarker;
use crate::core::ServiceId;
use crate::core::TypeDef;
use crate::core::WellKnownTypes;
use crate::error::BootstrapError;
use crate::runtime::rules;
use crate::runtime::scanner::CompensableService;
use crate::runtime::scanner::RegistryScan;
use crate::runtime::validator::load_interface;
use crate::runtime::validator::resolve_implementation;

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves and checks the delegates of every compensable service.
///
/// # Errors
///
/// Returns the first [`BootstrapError`] encountered.
pub fn resolve_delegates(
    scan: &RegistryScan<'_>,
    well_known: &WellKnownTypes,
    sink: &dyn BootstrapAuditSink,
) -> Result<(), BootstrapError> {
    for service in scan.compensable() {
        let delegates = [
            (RoleMarker::Confirm, service.metadata.confirm_delegate()),
            (RoleMarker::Cancel, service.metadata.cancel_delegate()),
        ];
        for (role, key) in delegates {
            let Some(delegate) = key else {
                continue;
            };
            resolve_delegate(scan, well_known, service, role, delegate)?;
            sink.record(
                &BootstrapAuditEvent::new(AuditEventKind::DelegateValidated)
                    .with_service(delegate)
                    .with_detail(format!("{role} delegate of {}", service.id)),
            );
        }
    }
    Ok(())
}

/// Resolves one delegate key and checks its methods.
///
/// # Errors
///
/// Returns the first [`BootstrapError`] encountered for this delegate.
pub fn resolve_delegate(
    scan: &RegistryScan<'_>,
    well_known: &WellKnownTypes,
    service: &CompensableService<'_>,
    role: RoleMarker,
    delegate: &ServiceId,
) -> Result<(), BootstrapError> {
    let implementation = lookup_delegate(scan, service.id, role, delegate)?;
    let catalog = scan.catalog();
    let interface = load_interface(catalog, service)?;
    for interface_method in &interface.methods {
        let resolved = resolve_implementation(
            catalog,
            delegate,
            implementation,
            interface,
            &interface_method.name,
            &interface_method.parameter_types,
        )?;
        rules::check_remote_exception(catalog, well_known, delegate, &resolved)?;
        rules::check_propagation(delegate, &resolved)?;
        rules::check_rollback_coverage(catalog, well_known, delegate, &resolved)?;
    }
    Ok(())
}

/// Finds the implementation type of a delegate key.
fn lookup_delegate<'a>(
    scan: &RegistryScan<'a>,
    service: &ServiceId,
    role: RoleMarker,
    delegate: &ServiceId,
) -> Result<&'a TypeDef, BootstrapError> {
    if scan.is_compensable(delegate) {
        return Err(BootstrapError::DelegateIsCompensable {
            service: service.clone(),
            role,
            delegate: delegate.clone(),
        });
    }
    scan.plain(delegate).ok_or_else(|| BootstrapError::DelegateNotFound {
        service: service.clone(),
        role,
        delegate: delegate.clone(),
    })
}
