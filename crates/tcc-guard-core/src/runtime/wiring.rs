// crates/tcc-guard-core/src/runtime/wiring.rs
// ============================================================================
// Module: Context Wiring
// Description: Deferred injection of the shared transaction context.
// Purpose: Point every context consumer at the single context singleton.
// Dependencies: crate::{audit, core, error}
// ============================================================================

//! ## Overview
//! Context wiring is independent of the contract passes. It runs in two steps:
//! - planning scans every loadable implementation type, collects context
//!   consumers, and locates the context singleton (a second one is fatal);
//! - applying sets the configured construction property of each consumer to
//!   a [`DeferredReference`] naming the singleton.
//!
//! Nothing is mutated until planning succeeds, so a failed run leaves no
//! partial wiring behind. When no context singleton exists, consumers are left
//! unwired and the container reports the gap when it resolves them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::audit::AuditEventKind;
use crate::audit::BootstrapAuditEvent;
use crate::audit::BootstrapAuditSink;
use crate::core::DeferredReference;
use crate::core::PropertyValue;
use crate::core::ServiceId;
use crate::core::ServiceRegistry;
use crate::core::WellKnownTypes;
use crate::error::BootstrapError;

// ============================================================================
// SECTION: Plan and Report
// ============================================================================

/// Wiring decisions computed without mutating the registry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WiringPlan {
    /// Context singleton, when one exists.
    context: Option<ServiceId>,
    /// Context consumers in registration order.
    consumers: Vec<ServiceId>,
}

impl WiringPlan {
    /// Returns the context singleton, when one exists.
    #[must_use]
    pub const fn context(&self) -> Option<&ServiceId> {
        self.context.as_ref()
    }

    /// Returns the context consumers in registration order.
    #[must_use]
    pub fn consumers(&self) -> &[ServiceId] {
        &self.consumers
    }

    /// Applies the plan to the registry.
    ///
    /// Consumers that are no longer registered are ignored.
    pub fn apply(
        self,
        registry: &mut ServiceRegistry,
        property: &str,
        sink: &dyn BootstrapAuditSink,
    ) -> WiringReport {
        let Some(context) = self.context else {
            if !self.consumers.is_empty() {
                sink.record(&BootstrapAuditEvent::new(AuditEventKind::ContextAbsent).with_detail(
                    format!("{} context consumers left unwired", self.consumers.len()),
                ));
            }
            return WiringReport::default();
        };
        let mut wired = Vec::with_capacity(self.consumers.len());
        for consumer in self.consumers {
            let Some(descriptor) = registry.service_mut(&consumer) else {
                continue;
            };
            descriptor
                .construction
                .set(property, PropertyValue::Reference(DeferredReference::new(context.clone())));
            sink.record(
                &BootstrapAuditEvent::new(AuditEventKind::ContextWired)
                    .with_service(&consumer)
                    .with_detail(format!("{property} -> {context}")),
            );
            wired.push(consumer);
        }
        WiringReport {
            context: Some(context),
            wired,
        }
    }
}

/// Outcome of context wiring.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct WiringReport {
    /// Context singleton referenced by consumers.
    pub context: Option<ServiceId>,
    /// Consumers that received the deferred reference.
    pub wired: Vec<ServiceId>,
}

// ============================================================================
// SECTION: Wiring
// ============================================================================

/// Plans context wiring for the registry.
///
/// # Errors
///
/// Returns [`BootstrapError::DuplicateContext`] when more than one service
/// type is assignable to the context type.
pub fn plan_context_wiring(
    registry: &ServiceRegistry,
    well_known: &WellKnownTypes,
    sink: &dyn BootstrapAuditSink,
) -> Result<WiringPlan, BootstrapError> {
    let catalog = registry.catalog();
    let mut plan = WiringPlan::default();
    for descriptor in registry.services() {
        let Some(type_name) = &descriptor.type_name else {
            sink.record(
                &BootstrapAuditEvent::new(AuditEventKind::DescriptorSkipped)
                    .with_service(&descriptor.id)
                    .with_detail("context wiring: no implementation type declared"),
            );
            continue;
        };
        if let Err(err) = catalog.load(type_name) {
            sink.record(
                &BootstrapAuditEvent::new(AuditEventKind::DescriptorSkipped)
                    .with_service(&descriptor.id)
                    .with_type(type_name)
                    .with_detail(format!("context wiring: {err}")),
            );
            continue;
        }
        if catalog.is_assignable(&well_known.context_consumer, type_name) {
            plan.consumers.push(descriptor.id.clone());
        }
        if catalog.is_assignable(&well_known.context, type_name) {
            if let Some(first) = &plan.context {
                return Err(BootstrapError::DuplicateContext {
                    first: first.clone(),
                    second: descriptor.id.clone(),
                });
            }
            plan.context = Some(descriptor.id.clone());
        }
    }
    Ok(plan)
}

/// Plans and applies context wiring.
///
/// # Errors
///
/// Returns [`BootstrapError::DuplicateContext`] when more than one context
/// singleton exists; the registry is left untouched in that case.
pub fn wire_context(
    registry: &mut ServiceRegistry,
    well_known: &WellKnownTypes,
    sink: &dyn BootstrapAuditSink,
) -> Result<WiringReport, BootstrapError> {
    let plan = plan_context_wiring(registry, well_known, sink)?;
    Ok(plan.apply(registry, &well_known.context_property, sink))
}
