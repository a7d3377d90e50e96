// crates/tcc-guard-core/src/runtime/scanner.rs
// ============================================================================
// Module: Registry Scanner
// Description: Classification of registered services as compensable or plain.
// Purpose: Produce the lookup tables consumed by validation and resolution.
// Dependencies: crate::{audit, core}
// ============================================================================

//! ## Overview
//! The scanner walks every descriptor in registration order, loads its
//! implementation type, and classifies it:
//! - types carrying [`CompensableMetadata`] become compensable services;
//! - every other loadable type becomes a plain service (a potential
//!   confirm/cancel delegate).
//!
//! Descriptors whose type cannot be loaded are recorded as skipped and
//! reported to the audit sink. They are neither compensable nor valid delegate
//! targets, so a later reference to one of them fails in the resolver with a
//! "not exists" error while unrelated unloadable services stay harmless.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Serialize;

use crate::audit::AuditEventKind;
use crate::audit::BootstrapAuditEvent;
use crate::audit::BootstrapAuditSink;
use crate::core::CompensableMetadata;
use crate::core::ServiceId;
use crate::core::ServiceRegistry;
use crate::core::TypeCatalog;
use crate::core::TypeDef;
use crate::core::TypeName;

// ============================================================================
// SECTION: Scan Results
// ============================================================================

/// Service whose implementation type participates in TCC.
#[derive(Debug, Clone, Copy)]
pub struct CompensableService<'a> {
    /// Service id.
    pub id: &'a ServiceId,
    /// Loaded implementation type.
    pub implementation: &'a TypeDef,
    /// Compensable metadata carried by the implementation type.
    pub metadata: &'a CompensableMetadata,
}

/// Descriptor excluded from classification because its type did not load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDescriptor {
    /// Service id.
    pub service: ServiceId,
    /// Declared implementation type, when any.
    pub type_name: Option<TypeName>,
    /// Load failure description.
    pub reason: String,
}

/// Classification of every registered descriptor.
///
/// # Invariants
/// - A service id appears in at most one of compensable, plain, or skipped.
/// - Compensable services keep registration order.
#[derive(Debug, Clone)]
pub struct RegistryScan<'a> {
    /// Type catalog the scan was performed against.
    catalog: &'a TypeCatalog,
    /// Compensable services in registration order.
    compensable: Vec<CompensableService<'a>>,
    /// Ids of compensable services.
    compensable_ids: BTreeSet<&'a ServiceId>,
    /// Plain services by id.
    plain: BTreeMap<&'a ServiceId, &'a TypeDef>,
    /// Descriptors whose type could not be loaded.
    skipped: Vec<SkippedDescriptor>,
}

impl<'a> RegistryScan<'a> {
    /// Scans every descriptor in the registry.
    ///
    /// Load failures are recorded and reported; they never abort the scan.
    #[must_use]
    pub fn scan(registry: &'a ServiceRegistry, sink: &dyn BootstrapAuditSink) -> Self {
        let catalog = registry.catalog();
        let mut scan = Self {
            catalog,
            compensable: Vec::new(),
            compensable_ids: BTreeSet::new(),
            plain: BTreeMap::new(),
            skipped: Vec::new(),
        };
        for descriptor in registry.services() {
            let Some(type_name) = &descriptor.type_name else {
                scan.skip(sink, &descriptor.id, None, "no implementation type declared");
                continue;
            };
            let implementation = match catalog.load(type_name) {
                Ok(implementation) => implementation,
                Err(err) => {
                    scan.skip(sink, &descriptor.id, Some(type_name), &err.to_string());
                    continue;
                }
            };
            let classification = if let Some(metadata) = &implementation.compensable {
                scan.compensable.push(CompensableService {
                    id: &descriptor.id,
                    implementation,
                    metadata,
                });
                scan.compensable_ids.insert(&descriptor.id);
                "compensable"
            } else {
                scan.plain.insert(&descriptor.id, implementation);
                "plain"
            };
            sink.record(
                &BootstrapAuditEvent::new(AuditEventKind::ServiceClassified)
                    .with_service(&descriptor.id)
                    .with_type(type_name)
                    .with_detail(classification),
            );
        }
        scan
    }

    /// Records a skipped descriptor and reports it.
    fn skip(
        &mut self,
        sink: &dyn BootstrapAuditSink,
        service: &ServiceId,
        type_name: Option<&TypeName>,
        reason: &str,
    ) {
        let mut event = BootstrapAuditEvent::new(AuditEventKind::DescriptorSkipped)
            .with_service(service)
            .with_detail(reason);
        if let Some(type_name) = type_name {
            event = event.with_type(type_name);
        }
        sink.record(&event);
        self.skipped.push(SkippedDescriptor {
            service: service.clone(),
            type_name: type_name.cloned(),
            reason: reason.to_string(),
        });
    }

    /// Returns the type catalog used by the scan.
    #[must_use]
    pub const fn catalog(&self) -> &'a TypeCatalog {
        self.catalog
    }

    /// Returns compensable services in registration order.
    #[must_use]
    pub fn compensable(&self) -> &[CompensableService<'a>] {
        &self.compensable
    }

    /// Returns true when the id names a compensable service.
    #[must_use]
    pub fn is_compensable(&self, id: &ServiceId) -> bool {
        self.compensable_ids.contains(id)
    }

    /// Returns the implementation type of a plain service.
    #[must_use]
    pub fn plain(&self, id: &ServiceId) -> Option<&'a TypeDef> {
        self.plain.get(id).copied()
    }

    /// Iterates over plain service ids in id order.
    pub fn plain_ids(&self) -> impl Iterator<Item = &'a ServiceId> + '_ {
        self.plain.keys().copied()
    }

    /// Returns descriptors skipped because their type did not load.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedDescriptor] {
        &self.skipped
    }
}
