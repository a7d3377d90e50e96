// crates/tcc-guard-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared registry fixtures and result helpers for bootstrap tests.
// ============================================================================
//! ## Overview
//! Shared registry builders and Result-based assertions for the integration
//! suites of tcc-guard-core.

#![allow(
    dead_code,
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test helpers are selectively used across suites."
)]

use std::error::Error;
use std::fmt;

use tcc_guard_core::BootstrapError;
use tcc_guard_core::CompensableMetadata;
use tcc_guard_core::MethodDef;
use tcc_guard_core::Propagation;
use tcc_guard_core::ServiceDescriptor;
use tcc_guard_core::ServiceRegistry;
use tcc_guard_core::TransactionalAttribute;
use tcc_guard_core::TypeDef;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across bootstrap integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition {
        Ok(())
    } else {
        Err(Box::new(TestError {
            message: message.into(),
        }))
    }
}

/// Unwraps an expected bootstrap error and checks its message.
///
/// # Errors
/// Returns a `TestError` when the result is `Ok` or the message does not
/// contain `fragment`.
pub fn expect_violation<T>(
    result: Result<T, BootstrapError>,
    fragment: &str,
) -> TestResult<BootstrapError> {
    let Err(err) = result else {
        return Err(Box::new(TestError {
            message: format!("expected violation containing `{fragment}`"),
        }));
    };
    let message = err.to_string();
    ensure(message.contains(fragment), format!("unexpected error: {message}"))?;
    Ok(err)
}

// ========================================================================
// Registry Fixtures
// ========================================================================

/// Returns a transactional attribute with `REQUIRED` propagation.
pub fn required() -> TransactionalAttribute {
    TransactionalAttribute::new(Propagation::Required)
}

/// Returns the base exception hierarchy shared by every fixture.
pub fn exception_types() -> Vec<TypeDef> {
    vec![
        TypeDef::class("Exception"),
        TypeDef::class("RuntimeException").extends("Exception"),
        TypeDef::class("IllegalStateException").extends("RuntimeException"),
        TypeDef::class("IOException").extends("Exception"),
        TypeDef::class("FileNotFoundException").extends("IOException"),
        TypeDef::class("RemotingException").extends("Exception"),
        TypeDef::class("RpcTimeoutException").extends("RemotingException"),
    ]
}

/// Incremental registry builder seeded with the base exception hierarchy.
#[derive(Debug, Clone)]
pub struct RegistryFixture {
    /// Type definitions.
    types: Vec<TypeDef>,
    /// Service descriptors in registration order.
    services: Vec<ServiceDescriptor>,
}

impl Default for RegistryFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryFixture {
    /// Creates a fixture holding only the exception hierarchy.
    pub fn new() -> Self {
        Self {
            types: exception_types(),
            services: Vec::new(),
        }
    }

    /// Adds a type definition.
    pub fn with_type(mut self, def: TypeDef) -> Self {
        self.types.push(def);
        self
    }

    /// Registers a service with the given implementation type.
    pub fn with_service(mut self, id: &str, type_name: &str) -> Self {
        self.services.push(ServiceDescriptor::new(id, type_name));
        self
    }

    /// Registers a prebuilt descriptor.
    pub fn with_descriptor(mut self, descriptor: ServiceDescriptor) -> Self {
        self.services.push(descriptor);
        self
    }

    /// Builds the registry.
    ///
    /// # Errors
    /// Returns an error when the registry rejects the fixture.
    pub fn build(self) -> TestResult<ServiceRegistry> {
        Ok(ServiceRegistry::new(self.types, self.services)?)
    }
}

/// The canonical `Pay { charge() }` try interface.
pub fn pay_interface() -> TypeDef {
    TypeDef::interface("Pay").with_method(MethodDef::new("charge"))
}

/// A compensable `Pay` implementation with the given metadata.
pub fn pay_try(metadata: CompensableMetadata) -> TypeDef {
    TypeDef::class("PayTry")
        .extends("Pay")
        .with_compensable(metadata)
        .with_method(MethodDef::new("charge").with_transactional(required()))
}

/// A plain delegate class named `name` implementing `charge()` with the
/// given method definition.
pub fn delegate(name: &str, method: MethodDef) -> TypeDef {
    TypeDef::class(name).extends("Pay").with_method(method)
}

/// Fixture with a valid `pay` service delegating to `payConfirm` and
/// `payCancel`.
pub fn pay_fixture() -> RegistryFixture {
    RegistryFixture::new()
        .with_type(pay_interface())
        .with_type(pay_try(
            CompensableMetadata::new("Pay").with_confirm("payConfirm").with_cancel("payCancel"),
        ))
        .with_type(delegate("PayConfirm", MethodDef::new("charge").with_transactional(required())))
        .with_type(delegate("PayCancel", MethodDef::new("charge").with_transactional(required())))
        .with_service("pay", "PayTry")
        .with_service("payConfirm", "PayConfirm")
        .with_service("payCancel", "PayCancel")
}
