// crates/tcc-guard-core/tests/wiring.rs
// ============================================================================
// Module: Context Wiring Tests
// Description: Deferred context injection and singleton enforcement.
// Purpose: Ensure consumers see exactly one context and failures mutate nothing.
// Dependencies: tcc-guard-core
// ============================================================================
//! ## Overview
//! Integration tests for [`tcc_guard_core::wire_context`].

#![allow(
    clippy::use_debug,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only debug output and assertions are permitted."
)]

mod support;

use support::RegistryFixture;
use support::TestResult;
use support::ensure;
use support::expect_violation;
use tcc_guard_core::AuditEventKind;
use tcc_guard_core::DeferredReference;
use tcc_guard_core::ErrorCategory;
use tcc_guard_core::MemoryAuditSink;
use tcc_guard_core::NoopAuditSink;
use tcc_guard_core::PropertyValue;
use tcc_guard_core::ServiceDescriptor;
use tcc_guard_core::ServiceId;
use tcc_guard_core::ServiceRegistry;
use tcc_guard_core::TypeDef;
use tcc_guard_core::WellKnownTypes;
use tcc_guard_core::plan_context_wiring;
use tcc_guard_core::wire_context;

/// Fixture with the context and consumer capability types.
fn context_fixture() -> RegistryFixture {
    RegistryFixture::new()
        .with_type(TypeDef::interface("CompensableContext"))
        .with_type(TypeDef::interface("CompensableContextAware"))
        .with_type(TypeDef::class("TransactionContext").extends("CompensableContext"))
        .with_type(TypeDef::class("OrderHandler").extends("CompensableContextAware"))
        .with_type(TypeDef::class("AuditHandler").extends("OrderHandler"))
        .with_type(TypeDef::class("Plain"))
}

/// Returns the context property of a service, when set.
fn context_property(registry: &ServiceRegistry, id: &str) -> Option<PropertyValue> {
    registry
        .service(&ServiceId::new(id))
        .and_then(|descriptor| descriptor.construction.get("compensableContext"))
        .cloned()
}

#[test]
fn single_context_is_injected_into_every_consumer() -> TestResult {
    let mut registry = context_fixture()
        .with_service("orders", "OrderHandler")
        .with_service("context", "TransactionContext")
        .with_service("audit", "AuditHandler")
        .with_service("plain", "Plain")
        .build()?;
    let sink = MemoryAuditSink::new();
    let report = wire_context(&mut registry, &WellKnownTypes::default(), &sink)?;

    ensure(report.context == Some(ServiceId::new("context")), "context singleton")?;
    let wired: Vec<&str> = report.wired.iter().map(ServiceId::as_str).collect();
    ensure(wired == ["orders", "audit"], format!("unexpected wired set: {wired:?}"))?;
    let expected = PropertyValue::Reference(DeferredReference::new("context"));
    ensure(context_property(&registry, "orders") == Some(expected.clone()), "orders wired")?;
    ensure(context_property(&registry, "audit") == Some(expected), "subclass consumer wired")?;
    ensure(context_property(&registry, "plain").is_none(), "plain service untouched")?;
    ensure(sink.events_of(AuditEventKind::ContextWired).len() == 2, "one event per consumer")?;
    Ok(())
}

#[test]
fn existing_property_value_is_replaced() -> TestResult {
    let mut consumer = ServiceDescriptor::new("orders", "OrderHandler");
    consumer
        .construction
        .set("compensableContext", PropertyValue::Literal("stale".to_string()));
    let mut registry = context_fixture()
        .with_descriptor(consumer)
        .with_service("context", "TransactionContext")
        .build()?;
    wire_context(&mut registry, &WellKnownTypes::default(), &NoopAuditSink)?;
    ensure(
        context_property(&registry, "orders")
            == Some(PropertyValue::Reference(DeferredReference::new("context"))),
        "stale literal replaced by the deferred reference",
    )?;
    Ok(())
}

#[test]
fn duplicate_context_fails_without_mutation() -> TestResult {
    let mut registry = context_fixture()
        .with_service("orders", "OrderHandler")
        .with_service("contextA", "TransactionContext")
        .with_service("contextB", "TransactionContext")
        .build()?;
    let before = registry.clone();
    let err = expect_violation(
        wire_context(&mut registry, &WellKnownTypes::default(), &NoopAuditSink),
        "duplicated context",
    )?;
    ensure(err.category() == ErrorCategory::Cardinality, "cardinality category")?;
    ensure(err.to_string().contains("`contextA` and `contextB`"), format!("unexpected: {err}"))?;
    ensure(registry == before, "registry must be untouched")?;
    Ok(())
}

#[test]
fn missing_context_leaves_consumers_unwired() -> TestResult {
    let mut registry = context_fixture().with_service("orders", "OrderHandler").build()?;
    let sink = MemoryAuditSink::new();
    let report = wire_context(&mut registry, &WellKnownTypes::default(), &sink)?;
    ensure(report.context.is_none() && report.wired.is_empty(), "nothing wired")?;
    ensure(context_property(&registry, "orders").is_none(), "consumer left unwired")?;
    ensure(sink.events_of(AuditEventKind::ContextAbsent).len() == 1, "absence is reported")?;
    Ok(())
}

#[test]
fn unloadable_descriptors_are_skipped_during_planning() -> TestResult {
    let registry = context_fixture()
        .with_service("context", "TransactionContext")
        .with_service("ghost", "com.example.Ghost")
        .with_descriptor(ServiceDescriptor::untyped("factoryMade"))
        .build()?;
    let sink = MemoryAuditSink::new();
    let plan = plan_context_wiring(&registry, &WellKnownTypes::default(), &sink)?;
    ensure(plan.context() == Some(&ServiceId::new("context")), "context located")?;
    ensure(plan.consumers().is_empty(), "no consumers")?;
    let skipped = sink.events_of(AuditEventKind::DescriptorSkipped);
    let services: Vec<String> = skipped
        .iter()
        .filter_map(|event| event.service.as_ref().map(ToString::to_string))
        .collect();
    ensure(services == ["ghost", "factoryMade"], format!("unexpected skips: {services:?}"))?;
    ensure(
        skipped.iter().all(|event| {
            event.detail.as_deref().is_some_and(|detail| detail.starts_with("context wiring:"))
        }),
        "detail names the wiring pass",
    )?;
    Ok(())
}

#[test]
fn configured_property_name_is_used() -> TestResult {
    let mut registry = context_fixture()
        .with_service("orders", "OrderHandler")
        .with_service("context", "TransactionContext")
        .build()?;
    let well_known = WellKnownTypes {
        context_property: "txContext".to_string(),
        ..WellKnownTypes::default()
    };
    wire_context(&mut registry, &well_known, &NoopAuditSink)?;
    let descriptor = registry.service(&ServiceId::new("orders")).ok_or("orders registered")?;
    ensure(descriptor.construction.get("txContext").is_some(), "configured property set")?;
    ensure(descriptor.construction.get("compensableContext").is_none(), "default property unused")?;
    Ok(())
}
