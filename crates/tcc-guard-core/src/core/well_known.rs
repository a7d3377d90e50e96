// crates/tcc-guard-core/src/core/well_known.rs
// ============================================================================
// Module: Well-Known Types
// Description: Distinguished type names the bootstrap passes test against.
// Purpose: Keep framework type names out of the validation logic.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The bootstrap passes never hard-code framework type names. The remote-call
//! exception, the unchecked exception roots, the shared context type, and the
//! context-consumer capability are supplied through [`WellKnownTypes`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::TypeName;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default remote-call exception type.
pub const DEFAULT_REMOTE_EXCEPTION: &str = "RemotingException";
/// Default unchecked exception root.
pub const DEFAULT_UNCHECKED_EXCEPTION: &str = "RuntimeException";
/// Default shared transaction-context type.
pub const DEFAULT_CONTEXT_TYPE: &str = "CompensableContext";
/// Default context-consumer capability type.
pub const DEFAULT_CONTEXT_CONSUMER_TYPE: &str = "CompensableContextAware";
/// Default construction property receiving the context reference.
pub const DEFAULT_CONTEXT_PROPERTY: &str = "compensableContext";

// ============================================================================
// SECTION: Well-Known Types
// ============================================================================

/// Distinguished type names used by the bootstrap passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellKnownTypes {
    /// Transport-layer exception that compensable methods must not declare.
    pub remote_exception: TypeName,
    /// Exception roots that trigger rollback without explicit enrollment.
    pub unchecked_exceptions: Vec<TypeName>,
    /// Shared transaction-context type (exactly one implementation allowed).
    pub context: TypeName,
    /// Capability type declaring a settable context slot.
    pub context_consumer: TypeName,
    /// Construction property receiving the deferred context reference.
    pub context_property: String,
}

impl Default for WellKnownTypes {
    fn default() -> Self {
        Self {
            remote_exception: TypeName::new(DEFAULT_REMOTE_EXCEPTION),
            unchecked_exceptions: vec![TypeName::new(DEFAULT_UNCHECKED_EXCEPTION)],
            context: TypeName::new(DEFAULT_CONTEXT_TYPE),
            context_consumer: TypeName::new(DEFAULT_CONTEXT_CONSUMER_TYPE),
            context_property: DEFAULT_CONTEXT_PROPERTY.to_string(),
        }
    }
}
