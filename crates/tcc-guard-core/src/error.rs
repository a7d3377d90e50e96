// crates/tcc-guard-core/src/error.rs
// ============================================================================
// Module: Bootstrap Error Definitions
// Description: Fatal contract violations raised by the bootstrap passes.
// Purpose: Report exactly one descriptive violation per bootstrap run.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Every rule violation is fatal. The first violation aborts the whole
//! bootstrap and is surfaced as a single [`BootstrapError`] naming the
//! offending service, type, or method. Each variant belongs to one
//! [`ErrorCategory`] so callers can group diagnostics without matching on
//! every variant.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::core::MethodSignature;
use crate::core::Propagation;
use crate::core::RoleMarker;
use crate::core::ServiceId;
use crate::core::TypeName;

// ============================================================================
// SECTION: Categories
// ============================================================================

/// Broad classification of bootstrap violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Wrong type kind, missing method, or mismatched parameter list.
    Structural,
    /// Too many methods, markers, or context singletons.
    Cardinality,
    /// Delegate key naming a missing or compensable service.
    Reference,
    /// Disallowed propagation, remote exceptions, or rollback coverage.
    Policy,
}

impl ErrorCategory {
    /// Returns a stable label for the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Cardinality => "cardinality",
            Self::Reference => "reference",
            Self::Policy => "policy",
        }
    }
}

// ============================================================================
// SECTION: Bootstrap Error
// ============================================================================

/// Fatal violation detected while bootstrapping the registry.
///
/// # Invariants
/// - Messages always name the offending service, type, or method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    // ============================================================================
    // SECTION: Structural Errors
    // ============================================================================
    /// Two type definitions share a name.
    #[error("type `{type_name}` is defined more than once")]
    DuplicateTypeName {
        /// Duplicated type name.
        type_name: TypeName,
    },
    /// Two service descriptors share an id.
    #[error("service id `{service}` is registered more than once")]
    DuplicateServiceId {
        /// Duplicated service id.
        service: ServiceId,
    },
    /// Compensable metadata names an interface that is not registered.
    #[error("compensable service `{service}` names interface `{interface}` which cannot be loaded")]
    UnknownInterface {
        /// Compensable service.
        service: ServiceId,
        /// Unregistered interface type.
        interface: TypeName,
    },
    /// Compensable metadata names a concrete type instead of an interface.
    #[error("compensable service `{service}`: interface_type `{type_name}` must be an interface")]
    InterfaceRequired {
        /// Compensable service.
        service: ServiceId,
        /// Offending type.
        type_name: TypeName,
    },
    /// An interface method has no matching implementation method.
    #[error("service `{service}`: `{implementation}` must implement interface method `{method}`")]
    MissingMethod {
        /// Service whose implementation is incomplete.
        service: ServiceId,
        /// Implementation type searched.
        implementation: TypeName,
        /// Interface method without a match.
        method: MethodSignature,
    },
    /// A simplified try method also carries a confirm or cancel marker.
    #[error("service `{service}`: the try method `{method}` can not be the same as the {role} method")]
    TryMethodIsRole {
        /// Compensable service.
        service: ServiceId,
        /// Try method carrying the marker.
        method: MethodSignature,
        /// Marker found on the try method.
        role: RoleMarker,
    },
    /// A confirm/cancel method's parameters differ from the try method's.
    #[error(
        "service `{service}`: the parameter types of {role} method `{role_method}` differ from the try method `{try_method}`"
    )]
    RoleSignatureMismatch {
        /// Compensable service.
        service: ServiceId,
        /// Marker carried by the mismatched method.
        role: RoleMarker,
        /// Mismatched confirm/cancel method.
        role_method: MethodSignature,
        /// Try method.
        try_method: MethodSignature,
    },
    /// A simplified compensable interface declares no method at all.
    #[error("service `{service}`: interface `{interface}` bound in simplified mode declares no method")]
    SimplifiedWithoutMethod {
        /// Compensable service.
        service: ServiceId,
        /// Empty interface.
        interface: TypeName,
    },

    // ============================================================================
    // SECTION: Cardinality Errors
    // ============================================================================
    /// A simplified compensable interface declares several methods.
    #[error(
        "service `{service}`: interface `{interface}` bound in simplified mode supports only one method, found {count}"
    )]
    SimplifiedMultipleMethods {
        /// Compensable service.
        service: ServiceId,
        /// Interface with too many methods.
        interface: TypeName,
        /// Number of declared methods.
        count: usize,
    },
    /// Several methods on one implementation type carry the same role marker.
    #[error("service `{service}`: more than one {role} method is specified on `{type_name}`")]
    DuplicateRoleMarker {
        /// Compensable service.
        service: ServiceId,
        /// Duplicated marker.
        role: RoleMarker,
        /// Implementation type.
        type_name: TypeName,
    },
    /// More than one service implements the shared transaction context.
    #[error("duplicated context: services `{first}` and `{second}` both provide the transaction context")]
    DuplicateContext {
        /// First context service found.
        first: ServiceId,
        /// Second context service found.
        second: ServiceId,
    },

    // ============================================================================
    // SECTION: Reference Errors
    // ============================================================================
    /// A confirm/cancel key names another compensable service.
    #[error("the {role} delegate `{delegate}` of `{service}` cannot be a compensable service")]
    DelegateIsCompensable {
        /// Compensable service owning the key.
        service: ServiceId,
        /// Delegate role.
        role: RoleMarker,
        /// Referenced service id.
        delegate: ServiceId,
    },
    /// A confirm/cancel key names no successfully scanned plain service.
    #[error("the {role} delegate `{delegate}` of `{service}` not exists")]
    DelegateNotFound {
        /// Compensable service owning the key.
        service: ServiceId,
        /// Delegate role.
        role: RoleMarker,
        /// Referenced service id.
        delegate: ServiceId,
    },

    // ============================================================================
    // SECTION: Policy Errors
    // ============================================================================
    /// A method declares the remote-call exception or a subtype of it.
    #[error(
        "service `{service}`: method `{method}` must not declare remote exception `{exception}` (remote kind `{remote}`)"
    )]
    RemoteExceptionDeclared {
        /// Service owning the method.
        service: ServiceId,
        /// Offending method.
        method: MethodSignature,
        /// Declared exception type.
        exception: TypeName,
        /// Configured remote exception kind.
        remote: TypeName,
    },
    /// Neither the method nor its declaring type carries a transactional attribute.
    #[error("service `{service}`: method `{method}` must specify a transactional attribute")]
    MissingTransactional {
        /// Service owning the method.
        service: ServiceId,
        /// Offending method.
        method: MethodSignature,
    },
    /// The effective propagation level is not allowed for compensable methods.
    #[error("service `{service}`: method `{method}` does not support propagation level {propagation}")]
    DisallowedPropagation {
        /// Service owning the method.
        service: ServiceId,
        /// Offending method.
        method: MethodSignature,
        /// Declared propagation level.
        propagation: Propagation,
    },
    /// A delegate's transactional attribute uses rollback-by-class-name.
    #[error(
        "service `{service}`: transactional attribute on delegate method `{method}` does not support rollback_for_class_name"
    )]
    RollbackByNameUnsupported {
        /// Delegate service.
        service: ServiceId,
        /// Offending method.
        method: MethodSignature,
    },
    /// A checked exception on a delegate method is not enrolled for rollback.
    #[error("service `{service}`: rollback_for on method `{method}` must include `{exception}`")]
    RollbackNotCovered {
        /// Delegate service.
        service: ServiceId,
        /// Offending method.
        method: MethodSignature,
        /// Uncovered checked exception.
        exception: TypeName,
    },
}

impl BootstrapError {
    /// Returns the category of this violation.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateTypeName {
                ..
            }
            | Self::DuplicateServiceId {
                ..
            }
            | Self::UnknownInterface {
                ..
            }
            | Self::InterfaceRequired {
                ..
            }
            | Self::MissingMethod {
                ..
            }
            | Self::TryMethodIsRole {
                ..
            }
            | Self::RoleSignatureMismatch {
                ..
            }
            | Self::SimplifiedWithoutMethod {
                ..
            } => ErrorCategory::Structural,
            Self::SimplifiedMultipleMethods {
                ..
            }
            | Self::DuplicateRoleMarker {
                ..
            }
            | Self::DuplicateContext {
                ..
            } => ErrorCategory::Cardinality,
            Self::DelegateIsCompensable {
                ..
            }
            | Self::DelegateNotFound {
                ..
            } => ErrorCategory::Reference,
            Self::RemoteExceptionDeclared {
                ..
            }
            | Self::MissingTransactional {
                ..
            }
            | Self::DisallowedPropagation {
                ..
            }
            | Self::RollbackByNameUnsupported {
                ..
            }
            | Self::RollbackNotCovered {
                ..
            } => ErrorCategory::Policy,
        }
    }

    /// Returns the service the violation is attributed to, when any.
    #[must_use]
    pub const fn service(&self) -> Option<&ServiceId> {
        match self {
            Self::DuplicateTypeName {
                ..
            } => None,
            Self::DuplicateContext {
                second,
                ..
            } => Some(second),
            Self::DuplicateServiceId {
                service,
            }
            | Self::UnknownInterface {
                service,
                ..
            }
            | Self::InterfaceRequired {
                service,
                ..
            }
            | Self::MissingMethod {
                service,
                ..
            }
            | Self::TryMethodIsRole {
                service,
                ..
            }
            | Self::RoleSignatureMismatch {
                service,
                ..
            }
            | Self::SimplifiedWithoutMethod {
                service,
                ..
            }
            | Self::SimplifiedMultipleMethods {
                service,
                ..
            }
            | Self::DuplicateRoleMarker {
                service,
                ..
            }
            | Self::DelegateIsCompensable {
                service,
                ..
            }
            | Self::DelegateNotFound {
                service,
                ..
            }
            | Self::RemoteExceptionDeclared {
                service,
                ..
            }
            | Self::MissingTransactional {
                service,
                ..
            }
            | Self::DisallowedPropagation {
                service,
                ..
            }
            | Self::RollbackByNameUnsupported {
                service,
                ..
            }
            | Self::RollbackNotCovered {
                service,
                ..
            } => Some(service),
        }
    }
}
