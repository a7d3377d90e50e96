// crates/tcc-guard-core/tests/proptest_rules.rs
// ============================================================================
// Module: Policy Rule Property-Based Tests
// Description: Property tests for propagation and rollback-coverage rules.
// Purpose: Detect invariant drift across randomized hierarchies and attributes.
// ============================================================================

//! Property-based tests for bootstrap policy invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use tcc_guard_core::Bootstrap;
use tcc_guard_core::CompensableMetadata;
use tcc_guard_core::MethodDef;
use tcc_guard_core::NoopAuditSink;
use tcc_guard_core::Propagation;
use tcc_guard_core::ServiceDescriptor;
use tcc_guard_core::ServiceRegistry;
use tcc_guard_core::TransactionalAttribute;
use tcc_guard_core::TypeCatalog;
use tcc_guard_core::TypeDef;
use tcc_guard_core::TypeName;

/// Name of the `index`-th exception in a linear chain.
fn chain_name(index: usize) -> String {
    format!("Chain{index}Exception")
}

/// Linear exception chain `Chain0Exception <- Chain1Exception <- ...`.
fn chain(len: usize) -> Vec<TypeDef> {
    (0 .. len)
        .map(|index| {
            let def = TypeDef::class(chain_name(index).as_str());
            if index == 0 { def } else { def.extends(chain_name(index - 1).as_str()) }
        })
        .collect()
}

/// Registry with a `pay` try service using `try_attr` and a `payCancel`
/// delegate declaring `declared` with `delegate_attr`.
fn registry(
    try_attr: TransactionalAttribute,
    delegate_attr: TransactionalAttribute,
    declared: &str,
    len: usize,
) -> ServiceRegistry {
    let mut types = chain(len);
    types.push(TypeDef::interface("Pay").with_method(MethodDef::new("charge")));
    types.push(
        TypeDef::class("PayTry")
            .extends("Pay")
            .with_compensable(CompensableMetadata::new("Pay").with_cancel("payCancel"))
            .with_method(MethodDef::new("charge").with_transactional(try_attr)),
    );
    types.push(
        TypeDef::class("PayCancel")
            .extends("Pay")
            .with_method(
                MethodDef::new("charge")
                    .with_transactional(delegate_attr)
                    .with_exception(declared),
            ),
    );
    ServiceRegistry::new(
        types,
        [ServiceDescriptor::new("pay", "PayTry"), ServiceDescriptor::new("payCancel", "PayCancel")],
    )
    .unwrap()
}

proptest! {
    #[test]
    fn propagation_whitelist_decides_acceptance(
        propagation in prop::sample::select(Propagation::ALL.to_vec()),
    ) {
        let attr = TransactionalAttribute::new(propagation).with_rollback_for("Chain0Exception");
        let mut registry = registry(attr.clone(), attr, "Chain0Exception", 1);
        let result = Bootstrap::default().run(&mut registry, &NoopAuditSink);
        prop_assert_eq!(result.is_ok(), propagation.is_compensable_safe());
    }

    #[test]
    fn chain_assignability_follows_depth(len in 1usize .. 8, a in 0usize .. 8, b in 0usize .. 8) {
        let catalog = TypeCatalog::from_types(chain(len)).unwrap();
        let target = TypeName::new(chain_name(a % len));
        let candidate = TypeName::new(chain_name(b % len));
        prop_assert_eq!(catalog.is_assignable(&target, &candidate), a % len <= b % len);
    }

    #[test]
    fn rollback_coverage_requires_a_supertype_entry(
        len in 1usize .. 6,
        declared in 0usize .. 6,
        enrolled in 0usize .. 6,
    ) {
        let declared = declared % len;
        let enrolled = enrolled % len;
        let mut registry = registry(
            TransactionalAttribute::new(Propagation::Required),
            TransactionalAttribute::new(Propagation::Required)
                .with_rollback_for(chain_name(enrolled).as_str()),
            &chain_name(declared),
            len,
        );
        let result = Bootstrap::default().run(&mut registry, &NoopAuditSink);
        prop_assert_eq!(result.is_ok(), enrolled <= declared);
    }
}
