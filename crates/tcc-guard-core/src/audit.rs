// crates/tcc-guard-core/src/audit.rs
// ============================================================================
// Module: Bootstrap Audit Logging
// Description: Structured audit events for the bootstrap passes.
// Purpose: Emit JSON-line diagnostics without hard logging dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The bootstrap passes report what they skipped, classified, validated, and
//! wired through a [`BootstrapAuditSink`]. Deployments route the events to
//! stderr, an append-only file, or nowhere. Load failures during scanning are
//! only ever reported here; they never abort the bootstrap on their own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::ServiceId;
use crate::core::TypeName;
use crate::error::BootstrapError;
use crate::error::ErrorCategory;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Audit event classification.
///
/// # Invariants
/// - Labels are stable for log processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventKind {
    /// A descriptor's implementation type could not be loaded.
    DescriptorSkipped,
    /// A descriptor was classified as compensable or plain.
    ServiceClassified,
    /// A compensable service passed contract validation.
    ServiceValidated,
    /// A confirm/cancel delegate passed cross-reference checks.
    DelegateValidated,
    /// A context consumer received a deferred context reference.
    ContextWired,
    /// No context singleton exists; consumers stay unwired.
    ContextAbsent,
    /// All passes completed.
    BootstrapCompleted,
    /// A pass aborted the bootstrap.
    BootstrapFailed,
}

impl AuditEventKind {
    /// Returns a stable label for the event.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DescriptorSkipped => "descriptor_skipped",
            Self::ServiceClassified => "service_classified",
            Self::ServiceValidated => "service_validated",
            Self::DelegateValidated => "delegate_validated",
            Self::ContextWired => "context_wired",
            Self::ContextAbsent => "context_absent",
            Self::BootstrapCompleted => "bootstrap_completed",
            Self::BootstrapFailed => "bootstrap_failed",
        }
    }
}

/// Bootstrap audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Service the event concerns, when any.
    pub service: Option<ServiceId>,
    /// Type the event concerns, when any.
    pub type_name: Option<TypeName>,
    /// Violation category for failure events.
    pub category: Option<ErrorCategory>,
    /// Free-form detail.
    pub detail: Option<String>,
}

impl BootstrapAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(kind: AuditEventKind) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: kind.as_str(),
            timestamp_ms,
            service: None,
            type_name: None,
            category: None,
            detail: None,
        }
    }

    /// Creates a failure event from a bootstrap error.
    #[must_use]
    pub fn failure(err: &BootstrapError) -> Self {
        let mut event = Self::new(AuditEventKind::BootstrapFailed).with_detail(err.to_string());
        event.service = err.service().cloned();
        event.category = Some(err.category());
        event
    }

    /// Sets the service the event concerns.
    #[must_use]
    pub fn with_service(mut self, service: &ServiceId) -> Self {
        self.service = Some(service.clone());
        self
    }

    /// Sets the type the event concerns.
    #[must_use]
    pub fn with_type(mut self, type_name: &TypeName) -> Self {
        self.type_name = Some(type_name.clone());
        self
    }

    /// Sets the event detail.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for bootstrap events.
pub trait BootstrapAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &BootstrapAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl BootstrapAuditSink for StderrAuditSink {
    fn record(&self, event: &BootstrapAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl BootstrapAuditSink for FileAuditSink {
    fn record(&self, event: &BootstrapAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<BootstrapAuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty in-memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<BootstrapAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns the recorded events with the given kind.
    #[must_use]
    pub fn events_of(&self, kind: AuditEventKind) -> Vec<BootstrapAuditEvent> {
        self.events().into_iter().filter(|event| event.event == kind.as_str()).collect()
    }
}

impl BootstrapAuditSink for MemoryAuditSink {
    fn record(&self, event: &BootstrapAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl BootstrapAuditSink for NoopAuditSink {
    fn record(&self, _event: &BootstrapAuditEvent) {}
}
