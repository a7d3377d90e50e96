// crates/tcc-guard-core/src/runtime/validator.rs
// ============================================================================
// Module: Contract Validator
// Description: Structural and policy checks for compensable services.
// Purpose: Fail fast on try-side contract violations before any service runs.
// Dependencies: crate::{audit, core, error, runtime::rules, runtime::scanner}
// ============================================================================

//! ## Overview
//! For every compensable service, in registration order, the validator walks
//! the try interface's declared methods in declaration order. Each interface
//! method must resolve to an implementation method with the same name and
//! parameter types; the resolved method then goes through, in order:
//! 1. the simplified-mode shape check (only when `simplified` is set);
//! 2. the remote-exception ban;
//! 3. the propagation whitelist.
//!
//! The first violation aborts validation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::audit::AuditEventKind;
use crate::audit::BootstrapAuditEvent;
use crate::audit::BootstrapAuditSink;
use crate::core::MethodSignature;
use crate::core::ResolvedMethod;
use crate::core::RoleMarker;
use crate::core::ServiceId;
use crate::core::TypeCatalog;
use crate::core::TypeDef;
use crate::core::TypeName;
use crate::core::WellKnownTypes;
use crate::error::BootstrapError;
use crate::runtime::rules;
use crate::runtime::scanner::CompensableService;
use crate::runtime::scanner::RegistryScan;

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates every compensable service found by the scan.
///
/// # Errors
///
/// Returns the first [`BootstrapError`] encountered.
pub fn validate_contracts(
    scan: &RegistryScan<'_>,
    well_known: &WellKnownTypes,
    sink: &dyn BootstrapAuditSink,
) -> Result<(), BootstrapError> {
    for service in scan.compensable() {
        validate_service(scan.catalog(), well_known, service)?;
        sink.record(
            &BootstrapAuditEvent::new(AuditEventKind::ServiceValidated)
                .with_service(service.id)
                .with_type(&service.implementation.name),
        );
    }
    Ok(())
}

/// Validates one compensable service.
///
/// # Errors
///
/// Returns the first [`BootstrapError`] encountered for this service.
pub fn validate_service(
    catalog: &TypeCatalog,
    well_known: &WellKnownTypes,
    service: &CompensableService<'_>,
) -> Result<(), BootstrapError> {
    let interface = load_interface(catalog, service)?;
    if service.metadata.simplified && interface.methods.is_empty() {
        return Err(BootstrapError::SimplifiedWithoutMethod {
            service: service.id.clone(),
            interface: interface.name.clone(),
        });
    }
    for interface_method in &interface.methods {
        let resolved = resolve_implementation(
            catalog,
            service.id,
            service.implementation,
            interface,
            &interface_method.name,
            &interface_method.parameter_types,
        )?;
        if service.metadata.simplified {
            check_simplified(service, interface, &resolved)?;
        }
        rules::check_remote_exception(catalog, well_known, service.id, &resolved)?;
        rules::check_propagation(service.id, &resolved)?;
    }
    Ok(())
}

/// Loads the try interface named by the compensable metadata.
///
/// # Errors
///
/// Returns [`BootstrapError::UnknownInterface`] when the type cannot be loaded
/// and [`BootstrapError::InterfaceRequired`] when it is not an interface.
pub(crate) fn load_interface<'a>(
    catalog: &'a TypeCatalog,
    service: &CompensableService<'_>,
) -> Result<&'a TypeDef, BootstrapError> {
    let interface_type = &service.metadata.interface_type;
    let interface =
        catalog.load(interface_type).map_err(|_| BootstrapError::UnknownInterface {
            service: service.id.clone(),
            interface: interface_type.clone(),
        })?;
    if !interface.is_interface() {
        return Err(BootstrapError::InterfaceRequired {
            service: service.id.clone(),
            type_name: interface_type.clone(),
        });
    }
    Ok(interface)
}

/// Resolves the implementation of an interface method on `implementation`.
///
/// # Errors
///
/// Returns [`BootstrapError::MissingMethod`] when no matching method exists.
pub(crate) fn resolve_implementation<'a>(
    catalog: &'a TypeCatalog,
    service: &ServiceId,
    implementation: &'a TypeDef,
    interface: &TypeDef,
    name: &str,
    parameter_types: &[TypeName],
) -> Result<ResolvedMethod<'a>, BootstrapError> {
    catalog.resolve_method(implementation, name, parameter_types).ok_or_else(|| {
        BootstrapError::MissingMethod {
            service: service.clone(),
            implementation: implementation.name.clone(),
            method: MethodSignature {
                owner: interface.name.clone(),
                name: name.to_string(),
                parameter_types: parameter_types.to_vec(),
            },
        }
    })
}

// ============================================================================
// SECTION: Simplified Mode
// ============================================================================

/// Checks the simplified-mode shape for one resolved try method.
///
/// The try method must not carry a role marker, the interface must declare a
/// single method, and the implementation type may declare at most one confirm
/// and one cancel method, each with the try method's parameter types.
fn check_simplified(
    service: &CompensableService<'_>,
    interface: &TypeDef,
    try_method: &ResolvedMethod<'_>,
) -> Result<(), BootstrapError> {
    if let Some(role) = try_method.method.role {
        return Err(BootstrapError::TryMethodIsRole {
            service: service.id.clone(),
            method: try_method.signature(),
            role,
        });
    }
    if interface.methods.len() > 1 {
        return Err(BootstrapError::SimplifiedMultipleMethods {
            service: service.id.clone(),
            interface: interface.name.clone(),
            count: interface.methods.len(),
        });
    }

    let implementation = service.implementation;
    let mut confirm_seen = false;
    let mut cancel_seen = false;
    for method in &implementation.methods {
        let Some(role) = method.role else {
            continue;
        };
        if method.parameter_types != try_method.method.parameter_types {
            return Err(BootstrapError::RoleSignatureMismatch {
                service: service.id.clone(),
                role,
                role_method: method.signature(&implementation.name),
                try_method: try_method.signature(),
            });
        }
        let seen = match role {
            RoleMarker::Confirm => &mut confirm_seen,
            RoleMarker::Cancel => &mut cancel_seen,
        };
        if *seen {
            return Err(BootstrapError::DuplicateRoleMarker {
                service: service.id.clone(),
                role,
                type_name: implementation.name.clone(),
            });
        }
        *seen = true;
    }
    Ok(())
}
