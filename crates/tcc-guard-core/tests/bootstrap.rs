// crates/tcc-guard-core/tests/bootstrap.rs
// ============================================================================
// Module: Bootstrap Orchestration Tests
// Description: End-to-end runs over complete registries.
// Purpose: Ensure passes run in order and violations abort before wiring.
// Dependencies: tcc-guard-core
// ============================================================================
//! ## Overview
//! Integration tests for [`tcc_guard_core::Bootstrap`].

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
use support::pay_fixture;
use tcc_guard_core::AuditEventKind;
use tcc_guard_core::Bootstrap;
use tcc_guard_core::CompensableMetadata;
use tcc_guard_core::ErrorCategory;
use tcc_guard_core::MemoryAuditSink;
use tcc_guard_core::ServiceId;
use tcc_guard_core::TypeDef;
use tcc_guard_core::WellKnownTypes;

/// Pay fixture extended with a context singleton and one consumer.
fn full_fixture() -> RegistryFixture {
    pay_fixture()
        .with_type(TypeDef::interface("CompensableContext"))
        .with_type(TypeDef::interface("CompensableContextAware"))
        .with_type(TypeDef::class("TransactionContext").extends("CompensableContext"))
        .with_type(TypeDef::class("PayListener").extends("CompensableContextAware"))
        .with_service("context", "TransactionContext")
        .with_service("listener", "PayListener")
}

#[test]
fn clean_registry_produces_full_report() -> TestResult {
    let mut registry = full_fixture().with_service("legacy", "com.example.Missing").build()?;
    let sink = MemoryAuditSink::new();
    let report = Bootstrap::default().run(&mut registry, &sink)?;

    let compensable: Vec<&str> =
        report.validation.compensable.iter().map(ServiceId::as_str).collect();
    ensure(compensable == ["pay"], format!("unexpected compensable: {compensable:?}"))?;
    let plain: Vec<&str> = report.validation.plain.iter().map(ServiceId::as_str).collect();
    ensure(
        plain == ["context", "listener", "payCancel", "payConfirm"],
        format!("unexpected plain: {plain:?}"),
    )?;
    ensure(report.validation.skipped.len() == 1, "legacy skipped")?;
    ensure(report.wiring.wired == [ServiceId::new("listener")], "listener wired")?;

    let events = sink.events();
    ensure(
        events.last().map(|event| event.event) == Some(AuditEventKind::BootstrapCompleted.as_str()),
        "completion is the final event",
    )?;
    Ok(())
}

#[test]
fn contract_violation_aborts_before_wiring() -> TestResult {
    let mut registry = full_fixture()
        .with_type(
            TypeDef::class("BrokenTry")
                .extends("Pay")
                .with_compensable(CompensableMetadata::new("Pay").with_confirm("nowhere"))
                .with_method(
                    tcc_guard_core::MethodDef::new("charge")
                        .with_transactional(support::required()),
                ),
        )
        .with_service("broken", "BrokenTry")
        .build()?;
    let before = registry.clone();
    let sink = MemoryAuditSink::new();
    let err = expect_violation(Bootstrap::default().run(&mut registry, &sink), "not exists")?;
    ensure(err.category() == ErrorCategory::Reference, "reference category")?;
    ensure(registry == before, "no wiring after a violation")?;
    ensure(sink.events_of(AuditEventKind::ContextWired).is_empty(), "no wiring events")?;

    let failures = sink.events_of(AuditEventKind::BootstrapFailed);
    let failure = failures.first().ok_or("failure event recorded")?;
    ensure(failure.category == Some(ErrorCategory::Reference), "failure carries category")?;
    ensure(failure.service == Some(ServiceId::new("broken")), "failure names the service")?;
    Ok(())
}

#[test]
fn validate_does_not_wire() -> TestResult {
    let registry = full_fixture().build()?;
    let sink = MemoryAuditSink::new();
    let report = Bootstrap::default().validate(&registry, &sink)?;
    ensure(report.compensable == [ServiceId::new("pay")], "pay validated")?;
    ensure(sink.events_of(AuditEventKind::ContextWired).is_empty(), "validation never wires")?;
    ensure(sink.events_of(AuditEventKind::BootstrapCompleted).len() == 1, "completion reported")?;
    Ok(())
}

#[test]
fn custom_remote_exception_kind_is_honored() -> TestResult {
    let mut registry = RegistryFixture::new()
        .with_type(TypeDef::class("GatewayException").extends("Exception"))
        .with_type(support::pay_interface())
        .with_type(
            TypeDef::class("PayTry")
                .extends("Pay")
                .with_compensable(CompensableMetadata::new("Pay"))
                .with_method(
                    tcc_guard_core::MethodDef::new("charge")
                        .with_transactional(support::required())
                        .with_exception("GatewayException"),
                ),
        )
        .with_service("pay", "PayTry")
        .build()?;
    let well_known = WellKnownTypes {
        remote_exception: "GatewayException".into(),
        ..WellKnownTypes::default()
    };
    let bootstrap = Bootstrap::new(well_known);
    expect_violation(
        bootstrap.run(&mut registry, &tcc_guard_core::NoopAuditSink),
        "must not declare remote exception `GatewayException`",
    )?;
    Bootstrap::default().run(&mut registry, &tcc_guard_core::NoopAuditSink)?;
    Ok(())
}

#[test]
fn repeated_runs_are_idempotent() -> TestResult {
    let mut registry = full_fixture().build()?;
    let first = Bootstrap::default().run(&mut registry, &tcc_guard_core::NoopAuditSink)?;
    let snapshot = registry.clone();
    let second = Bootstrap::default().run(&mut registry, &tcc_guard_core::NoopAuditSink)?;
    ensure(first == second, "reports match across runs")?;
    ensure(registry == snapshot, "second run rewires identically")?;
    Ok(())
}
