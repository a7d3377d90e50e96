// crates/tcc-guard-core/src/core/transactional.rs
// ============================================================================
// Module: Transactional Metadata
// Description: Declarative transaction attributes and TCC role markers.
// Purpose: Model propagation levels, rollback rules, and confirm/cancel tags.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Transactional attributes are attached to methods or to their declaring
//! types. The bootstrap passes only read them: propagation must guarantee or
//! accept a surrounding transaction, and confirm/cancel delegates must enroll
//! every checked exception as a rollback trigger.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::TypeName;

// ============================================================================
// SECTION: Propagation
// ============================================================================

/// Transaction propagation level declared by a transactional attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Propagation {
    /// Join the current transaction or start a new one.
    #[default]
    Required,
    /// Join the current transaction when one exists.
    Supports,
    /// Require an existing transaction.
    Mandatory,
    /// Always start a new transaction.
    RequiresNew,
    /// Suspend the current transaction.
    NotSupported,
    /// Fail when a transaction exists.
    Never,
    /// Run in a nested savepoint.
    Nested,
}

impl Propagation {
    /// All propagation levels in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Required,
        Self::Supports,
        Self::Mandatory,
        Self::RequiresNew,
        Self::NotSupported,
        Self::Never,
        Self::Nested,
    ];

    /// Returns a stable label for the propagation level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "REQUIRED",
            Self::Supports => "SUPPORTS",
            Self::Mandatory => "MANDATORY",
            Self::RequiresNew => "REQUIRES_NEW",
            Self::NotSupported => "NOT_SUPPORTED",
            Self::Never => "NEVER",
            Self::Nested => "NESTED",
        }
    }

    /// Returns true when a compensable entry point may declare this level.
    ///
    /// Only levels that guarantee or accept a surrounding transaction qualify.
    #[must_use]
    pub const fn is_compensable_safe(self) -> bool {
        matches!(self, Self::Required | Self::Mandatory | Self::Supports | Self::RequiresNew)
    }
}

impl fmt::Display for Propagation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Transactional Attribute
// ============================================================================

/// Declarative transactional attribute on a method or type.
///
/// # Invariants
/// - `rollback_for_class_name` is carried only so it can be rejected on
///   confirm/cancel delegates; it is never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionalAttribute {
    /// Propagation level.
    #[serde(default)]
    pub propagation: Propagation,
    /// Exception types that trigger rollback.
    #[serde(default)]
    pub rollback_for: Vec<TypeName>,
    /// Exception class names that trigger rollback (unsupported on delegates).
    #[serde(default)]
    pub rollback_for_class_name: Vec<String>,
}

impl TransactionalAttribute {
    /// Creates an attribute with the given propagation and no rollback rules.
    #[must_use]
    pub const fn new(propagation: Propagation) -> Self {
        Self {
            propagation,
            rollback_for: Vec::new(),
            rollback_for_class_name: Vec::new(),
        }
    }

    /// Adds an exception type to the `rollback_for` list.
    #[must_use]
    pub fn with_rollback_for(mut self, exception: impl Into<TypeName>) -> Self {
        self.rollback_for.push(exception.into());
        self
    }
}

// ============================================================================
// SECTION: Role Markers
// ============================================================================

/// Method-level tag naming the confirm or cancel half of a simplified service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleMarker {
    /// The method implements confirm.
    Confirm,
    /// The method implements cancel.
    Cancel,
}

impl RoleMarker {
    /// Returns a stable label for the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for RoleMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
