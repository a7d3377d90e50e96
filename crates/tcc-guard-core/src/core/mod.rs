// crates/tcc-guard-core/src/core/mod.rs
// ============================================================================
// Module: TCC Guard Core Types
// Description: Registry, type catalog, and transactional metadata model.
// Purpose: Provide statically typed metadata built once at registry load.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! TCC Guard core types describe the service registry handed over by the
//! surrounding container: service descriptors, the type catalog used for
//! introspection, transactional attributes, and the well-known framework type
//! names. The bootstrap passes in [`crate::runtime`] read these types and
//! never re-derive metadata on their own.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod service;
pub mod transactional;
pub mod types;
pub mod well_known;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::ServiceId;
pub use identifiers::TypeName;
pub use service::CompensableMetadata;
pub use service::ConstructionMetadata;
pub use service::DeferredReference;
pub use service::PropertyValue;
pub use service::ServiceDescriptor;
pub use service::ServiceRegistry;
pub use transactional::Propagation;
pub use transactional::RoleMarker;
pub use transactional::TransactionalAttribute;
pub use types::MethodDef;
pub use types::MethodSignature;
pub use types::ResolvedMethod;
pub use types::TypeCatalog;
pub use types::TypeDef;
pub use types::TypeKind;
pub use types::TypeLoadError;
pub use well_known::WellKnownTypes;
