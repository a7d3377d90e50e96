// crates/tcc-guard-core/src/runtime/rules.rs
// ============================================================================
// Module: Method Contract Rules
// Description: Per-method policy checks shared by try methods and delegates.
// Purpose: Enforce remote-exception, propagation, and rollback-coverage rules.
// Dependencies: crate::{core, error}
// ============================================================================

//! ## Overview
//! Each rule inspects one resolved method and fails with the first violation.
//! The contract validator applies the remote-exception and propagation rules
//! to try methods; the cross-reference resolver applies all three to the
//! methods of confirm and cancel delegates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ResolvedMethod;
use crate::core::ServiceId;
use crate::core::TransactionalAttribute;
use crate::core::TypeCatalog;
use crate::core::WellKnownTypes;
use crate::error::BootstrapError;

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Rejects methods declaring the remote-call exception or one of its subtypes.
///
/// # Errors
///
/// Returns [`BootstrapError::RemoteExceptionDeclared`] for the first offending
/// exception type.
pub fn check_remote_exception(
    catalog: &TypeCatalog,
    well_known: &WellKnownTypes,
    service: &ServiceId,
    resolved: &ResolvedMethod<'_>,
) -> Result<(), BootstrapError> {
    let remote = &well_known.remote_exception;
    let declared = resolved
        .method
        .exception_types
        .iter()
        .find(|exception| catalog.is_assignable(remote, exception));
    match declared {
        Some(exception) => Err(BootstrapError::RemoteExceptionDeclared {
            service: service.clone(),
            method: resolved.signature(),
            exception: exception.clone(),
            remote: remote.clone(),
        }),
        None => Ok(()),
    }
}

/// Requires a transactional attribute with a compensable-safe propagation.
///
/// The attribute is looked up on the method first and then on its declaring
/// type. Returns the effective attribute on success.
///
/// # Errors
///
/// Returns [`BootstrapError::MissingTransactional`] when no attribute applies
/// and [`BootstrapError::DisallowedPropagation`] for any propagation outside
/// `REQUIRED`, `MANDATORY`, `SUPPORTS`, and `REQUIRES_NEW`.
pub fn check_propagation<'a>(
    service: &ServiceId,
    resolved: &ResolvedMethod<'a>,
) -> Result<&'a TransactionalAttribute, BootstrapError> {
    let attribute = effective_transactional(service, resolved)?;
    if !attribute.propagation.is_compensable_safe() {
        return Err(BootstrapError::DisallowedPropagation {
            service: service.clone(),
            method: resolved.signature(),
            propagation: attribute.propagation,
        });
    }
    Ok(attribute)
}

/// Requires every checked exception of a delegate method to be enrolled in
/// `rollback_for`.
///
/// Exceptions assignable to one of the unchecked roots roll back by
/// convention and need no enrollment.
///
/// # Errors
///
/// Returns [`BootstrapError::RollbackByNameUnsupported`] when the attribute
/// uses rollback-by-class-name and [`BootstrapError::RollbackNotCovered`] for
/// the first uncovered checked exception.
pub fn check_rollback_coverage(
    catalog: &TypeCatalog,
    well_known: &WellKnownTypes,
    service: &ServiceId,
    resolved: &ResolvedMethod<'_>,
) -> Result<(), BootstrapError> {
    let attribute = effective_transactional(service, resolved)?;
    if !attribute.rollback_for_class_name.is_empty() {
        return Err(BootstrapError::RollbackByNameUnsupported {
            service: service.clone(),
            method: resolved.signature(),
        });
    }
    for exception in &resolved.method.exception_types {
        let unchecked = well_known
            .unchecked_exceptions
            .iter()
            .any(|root| catalog.is_assignable(root, exception));
        if unchecked {
            continue;
        }
        let covered = attribute
            .rollback_for
            .iter()
            .any(|rollback| catalog.is_assignable(rollback, exception));
        if !covered {
            return Err(BootstrapError::RollbackNotCovered {
                service: service.clone(),
                method: resolved.signature(),
                exception: exception.clone(),
            });
        }
    }
    Ok(())
}

/// Returns the effective transactional attribute or a missing-attribute error.
fn effective_transactional<'a>(
    service: &ServiceId,
    resolved: &ResolvedMethod<'a>,
) -> Result<&'a TransactionalAttribute, BootstrapError> {
    resolved.transactional().ok_or_else(|| BootstrapError::MissingTransactional {
        service: service.clone(),
        method: resolved.signature(),
    })
}
