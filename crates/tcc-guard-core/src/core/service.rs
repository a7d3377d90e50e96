// crates/tcc-guard-core/src/core/service.rs
// ============================================================================
// Module: Service Registry Model
// Description: Service descriptors, compensable metadata, and construction data.
// Purpose: Represent the container registry the bootstrap passes inspect.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ServiceRegistry`] pairs the [`TypeCatalog`] with the ordered list of
//! [`ServiceDescriptor`]s registered by the surrounding container. Descriptors
//! are read-only to the bootstrap passes except for their
//! [`ConstructionMetadata`], into which context wiring inserts a
//! [`DeferredReference`] that the container resolves at construction time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ServiceId;
use crate::core::identifiers::TypeName;
use crate::core::types::TypeCatalog;
use crate::core::types::TypeDef;
use crate::error::BootstrapError;

// ============================================================================
// SECTION: Compensable Metadata
// ============================================================================

/// TCC participation metadata attached to an implementation type.
///
/// # Invariants
/// - `interface_type` must name an interface type.
/// - Delegate keys, when set, must name plain (non-compensable) services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensableMetadata {
    /// Interface exposing the try methods.
    pub interface_type: TypeName,
    /// When true, confirm and cancel live on the implementation type itself.
    #[serde(default)]
    pub simplified: bool,
    /// Service id of the confirm delegate.
    #[serde(default)]
    pub confirmable_key: Option<ServiceId>,
    /// Service id of the cancel delegate.
    #[serde(default)]
    pub cancellable_key: Option<ServiceId>,
}

impl CompensableMetadata {
    /// Creates metadata for the given try interface with no delegates.
    #[must_use]
    pub fn new(interface_type: impl Into<TypeName>) -> Self {
        Self {
            interface_type: interface_type.into(),
            simplified: false,
            confirmable_key: None,
            cancellable_key: None,
        }
    }

    /// Enables simplified mode.
    #[must_use]
    pub const fn simplified(mut self) -> Self {
        self.simplified = true;
        self
    }

    /// Sets the confirm delegate key.
    #[must_use]
    pub fn with_confirm(mut self, key: impl Into<ServiceId>) -> Self {
        self.confirmable_key = Some(key.into());
        self
    }

    /// Sets the cancel delegate key.
    #[must_use]
    pub fn with_cancel(mut self, key: impl Into<ServiceId>) -> Self {
        self.cancellable_key = Some(key.into());
        self
    }

    /// Returns the confirm delegate key unless it is absent or blank.
    #[must_use]
    pub fn confirm_delegate(&self) -> Option<&ServiceId> {
        self.confirmable_key.as_ref().filter(|key| !key.is_blank())
    }

    /// Returns the cancel delegate key unless it is absent or blank.
    #[must_use]
    pub fn cancel_delegate(&self) -> Option<&ServiceId> {
        self.cancellable_key.as_ref().filter(|key| !key.is_blank())
    }
}

// ============================================================================
// SECTION: Construction Metadata
// ============================================================================

/// Named reference to another service, resolved later by the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredReference {
    /// Referenced service id.
    pub service: ServiceId,
}

impl DeferredReference {
    /// Creates a deferred reference to the given service.
    #[must_use]
    pub fn new(service: impl Into<ServiceId>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

/// Value assigned to a construction property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Literal configuration value.
    Literal(String),
    /// Reference resolved at construction time.
    Reference(DeferredReference),
}

/// Mutable construction metadata of a service descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionMetadata {
    /// Property values keyed by property name.
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl ConstructionMetadata {
    /// Sets a property, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.properties.insert(name.into(), value);
    }

    /// Returns a property value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

// ============================================================================
// SECTION: Service Descriptors
// ============================================================================

/// Registered service descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Unique service id.
    pub id: ServiceId,
    /// Declared implementation type; absent for factory-produced services.
    #[serde(default)]
    pub type_name: Option<TypeName>,
    /// Construction metadata consumed by the container.
    #[serde(default)]
    pub construction: ConstructionMetadata,
}

impl ServiceDescriptor {
    /// Creates a descriptor with the given id and implementation type.
    #[must_use]
    pub fn new(id: impl Into<ServiceId>, type_name: impl Into<TypeName>) -> Self {
        Self {
            id: id.into(),
            type_name: Some(type_name.into()),
            construction: ConstructionMetadata::default(),
        }
    }

    /// Creates a descriptor without a declared implementation type.
    #[must_use]
    pub fn untyped(id: impl Into<ServiceId>) -> Self {
        Self {
            id: id.into(),
            type_name: None,
            construction: ConstructionMetadata::default(),
        }
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Service registry inspected by the bootstrap passes.
///
/// # Invariants
/// - Service ids are unique.
/// - Services keep registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceRegistry {
    /// Type introspection surface.
    catalog: TypeCatalog,
    /// Descriptors in registration order.
    services: Vec<ServiceDescriptor>,
}

impl ServiceRegistry {
    /// Builds a registry from type definitions and descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError`] when type names or service ids are duplicated.
    pub fn new(
        types: impl IntoIterator<Item = TypeDef>,
        services: impl IntoIterator<Item = ServiceDescriptor>,
    ) -> Result<Self, BootstrapError> {
        let catalog = TypeCatalog::from_types(types)?;
        let services: Vec<ServiceDescriptor> = services.into_iter().collect();
        let mut seen = BTreeSet::new();
        for service in &services {
            if !seen.insert(&service.id) {
                return Err(BootstrapError::DuplicateServiceId {
                    service: service.id.clone(),
                });
            }
        }
        Ok(Self {
            catalog,
            services,
        })
    }

    /// Returns the type catalog.
    #[must_use]
    pub const fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Returns descriptors in registration order.
    #[must_use]
    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    /// Returns a descriptor by id.
    #[must_use]
    pub fn service(&self, id: &ServiceId) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|service| &service.id == id)
    }

    /// Returns a mutable descriptor by id.
    pub(crate) fn service_mut(&mut self, id: &ServiceId) -> Option<&mut ServiceDescriptor> {
        self.services.iter_mut().find(|service| &service.id == id)
    }
}
