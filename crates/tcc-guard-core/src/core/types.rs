// crates/tcc-guard-core/src/core/types.rs
// ============================================================================
// Module: Type Catalog
// Description: Statically typed type and method metadata for registered services.
// Purpose: Provide the introspection surface the bootstrap passes consume.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Type metadata is built once when the registry is loaded and never
//! re-derived afterwards. The catalog answers the handful of questions the
//! bootstrap passes ask: load a type by name, test assignability between two
//! types, and resolve a method by name and parameter types along the class
//! hierarchy.
//!
//! Assignability is reflexive and transitive over `supertypes`. Types that are
//! not registered in the catalog are assignable only to themselves, and
//! cyclic supertype declarations terminate instead of recursing forever.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::TypeName;
use crate::core::service::CompensableMetadata;
use crate::core::transactional::RoleMarker;
use crate::core::transactional::TransactionalAttribute;
use crate::error::BootstrapError;

// ============================================================================
// SECTION: Type Definitions
// ============================================================================

/// Kind of a registered type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Interface type; may be named by compensable metadata.
    Interface,
    /// Concrete or abstract class, including exception types.
    Class,
}

/// Method declared directly on a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    /// Method name.
    pub name: String,
    /// Parameter types in declaration order.
    #[serde(default)]
    pub parameter_types: Vec<TypeName>,
    /// Declared exception types.
    #[serde(default)]
    pub exception_types: Vec<TypeName>,
    /// Method-level transactional attribute.
    #[serde(default)]
    pub transactional: Option<TransactionalAttribute>,
    /// Confirm/cancel role marker.
    #[serde(default)]
    pub role: Option<RoleMarker>,
}

impl MethodDef {
    /// Creates a method with no parameters, exceptions, or attributes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter_types: Vec::new(),
            exception_types: Vec::new(),
            transactional: None,
            role: None,
        }
    }

    /// Sets the parameter types.
    #[must_use]
    pub fn with_parameters<I, T>(mut self, parameter_types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        self.parameter_types = parameter_types.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a declared exception type.
    #[must_use]
    pub fn with_exception(mut self, exception: impl Into<TypeName>) -> Self {
        self.exception_types.push(exception.into());
        self
    }

    /// Sets the method-level transactional attribute.
    #[must_use]
    pub fn with_transactional(mut self, attribute: TransactionalAttribute) -> Self {
        self.transactional = Some(attribute);
        self
    }

    /// Sets the confirm/cancel role marker.
    #[must_use]
    pub const fn with_role(mut self, role: RoleMarker) -> Self {
        self.role = Some(role);
        self
    }

    /// Returns true when name and parameter types match exactly.
    #[must_use]
    pub fn matches(&self, name: &str, parameter_types: &[TypeName]) -> bool {
        self.name == name && self.parameter_types == parameter_types
    }

    /// Returns the signature of this method as declared on `owner`.
    #[must_use]
    pub fn signature(&self, owner: &TypeName) -> MethodSignature {
        MethodSignature {
            owner: owner.clone(),
            name: self.name.clone(),
            parameter_types: self.parameter_types.clone(),
        }
    }
}

/// Registered type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Fully qualified type name.
    pub name: TypeName,
    /// Interface or class.
    pub kind: TypeKind,
    /// Superclass and implemented interfaces.
    #[serde(default)]
    pub supertypes: Vec<TypeName>,
    /// Methods declared directly on this type, in declaration order.
    #[serde(default)]
    pub methods: Vec<MethodDef>,
    /// Type-level transactional attribute (fallback for methods).
    #[serde(default)]
    pub transactional: Option<TransactionalAttribute>,
    /// Compensable metadata when the type participates in TCC.
    #[serde(default)]
    pub compensable: Option<CompensableMetadata>,
}

impl TypeDef {
    /// Creates an interface type with no methods.
    #[must_use]
    pub fn interface(name: impl Into<TypeName>) -> Self {
        Self::with_kind(name.into(), TypeKind::Interface)
    }

    /// Creates a class type with no methods.
    #[must_use]
    pub fn class(name: impl Into<TypeName>) -> Self {
        Self::with_kind(name.into(), TypeKind::Class)
    }

    /// Creates an empty type of the given kind.
    const fn with_kind(name: TypeName, kind: TypeKind) -> Self {
        Self {
            name,
            kind,
            supertypes: Vec::new(),
            methods: Vec::new(),
            transactional: None,
            compensable: None,
        }
    }

    /// Adds a supertype (superclass or implemented interface).
    #[must_use]
    pub fn extends(mut self, supertype: impl Into<TypeName>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    /// Adds a declared method.
    #[must_use]
    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    /// Sets the type-level transactional attribute.
    #[must_use]
    pub fn with_transactional(mut self, attribute: TransactionalAttribute) -> Self {
        self.transactional = Some(attribute);
        self
    }

    /// Attaches compensable metadata.
    #[must_use]
    pub fn with_compensable(mut self, metadata: CompensableMetadata) -> Self {
        self.compensable = Some(metadata);
        self
    }

    /// Returns true for interface types.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Finds a method declared directly on this type.
    #[must_use]
    pub fn declared_method(&self, name: &str, parameter_types: &[TypeName]) -> Option<&MethodDef> {
        self.methods.iter().find(|method| method.matches(name, parameter_types))
    }
}

// ============================================================================
// SECTION: Method Signatures
// ============================================================================

/// Human-readable method identity used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSignature {
    /// Type the method was looked up on.
    pub owner: TypeName,
    /// Method name.
    pub name: String,
    /// Parameter types in declaration order.
    pub parameter_types: Vec<TypeName>,
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.owner, self.name)?;
        for (index, parameter) in self.parameter_types.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{parameter}")?;
        }
        f.write_str(")")
    }
}

/// Method found by hierarchy resolution, with the type that declares it.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedMethod<'a> {
    /// Matched method.
    pub method: &'a MethodDef,
    /// Type that declares the matched method.
    pub declaring_type: &'a TypeDef,
    /// Type-level attribute of the declaring type or its nearest class
    /// supertype carrying one.
    pub type_transactional: Option<&'a TransactionalAttribute>,
}

impl<'a> ResolvedMethod<'a> {
    /// Returns the effective transactional attribute.
    ///
    /// The method-level attribute wins; otherwise the type-level attribute
    /// inherited along the declaring type's class hierarchy applies.
    #[must_use]
    pub fn transactional(&self) -> Option<&'a TransactionalAttribute> {
        self.method.transactional.as_ref().or(self.type_transactional)
    }

    /// Returns the signature as declared on the declaring type.
    #[must_use]
    pub fn signature(&self) -> MethodSignature {
        self.method.signature(&self.declaring_type.name)
    }
}

// ============================================================================
// SECTION: Type Catalog
// ============================================================================

/// Failure to load a type from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeLoadError {
    /// The named type is not registered.
    #[error("type `{0}` is not registered in the type catalog")]
    NotFound(TypeName),
}

/// Registry of type definitions keyed by name.
///
/// # Invariants
/// - Type names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeCatalog {
    /// Type definitions by name.
    types: BTreeMap<TypeName, TypeDef>,
}

impl TypeCatalog {
    /// Builds a catalog from type definitions.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::DuplicateTypeName`] when two definitions share
    /// a name.
    pub fn from_types(types: impl IntoIterator<Item = TypeDef>) -> Result<Self, BootstrapError> {
        let mut catalog = BTreeMap::new();
        for def in types {
            if catalog.contains_key(&def.name) {
                return Err(BootstrapError::DuplicateTypeName {
                    type_name: def.name,
                });
            }
            catalog.insert(def.name.clone(), def);
        }
        Ok(Self {
            types: catalog,
        })
    }

    /// Loads a type by name.
    ///
    /// # Errors
    ///
    /// Returns [`TypeLoadError::NotFound`] when the type is not registered.
    pub fn load(&self, name: &TypeName) -> Result<&TypeDef, TypeLoadError> {
        self.types.get(name).ok_or_else(|| TypeLoadError::NotFound(name.clone()))
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true when no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over type definitions in name order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// Returns true when a value of `candidate` can be used where `target` is
    /// expected.
    #[must_use]
    pub fn is_assignable(&self, target: &TypeName, candidate: &TypeName) -> bool {
        let mut visited = BTreeSet::new();
        let mut pending = vec![candidate];
        while let Some(current) = pending.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(def) = self.types.get(current) {
                pending.extend(def.supertypes.iter());
            }
        }
        false
    }

    /// Resolves a method by name and parameter types on `owner` or one of its
    /// class supertypes.
    ///
    /// Supertypes are searched depth-first in declaration order. Interface
    /// supertypes are skipped because their methods carry no implementation.
    #[must_use]
    pub fn resolve_method<'a>(
        &'a self,
        owner: &'a TypeDef,
        name: &str,
        parameter_types: &[TypeName],
    ) -> Option<ResolvedMethod<'a>> {
        let mut visited = BTreeSet::new();
        self.resolve_in(owner, name, parameter_types, &mut visited)
    }

    /// Recursive step of [`TypeCatalog::resolve_method`].
    fn resolve_in<'a>(
        &'a self,
        owner: &'a TypeDef,
        name: &str,
        parameter_types: &[TypeName],
        visited: &mut BTreeSet<&'a TypeName>,
    ) -> Option<ResolvedMethod<'a>> {
        if !visited.insert(&owner.name) {
            return None;
        }
        if let Some(method) = owner.declared_method(name, parameter_types) {
            return Some(ResolvedMethod {
                method,
                declaring_type: owner,
                type_transactional: self.inherited_transactional(owner),
            });
        }
        for supertype in &owner.supertypes {
            let Some(parent) = self.types.get(supertype) else {
                continue;
            };
            if parent.is_interface() {
                continue;
            }
            if let Some(found) = self.resolve_in(parent, name, parameter_types, visited) {
                return Some(found);
            }
        }
        None
    }

    /// Returns the type-level attribute of `owner`, or of the nearest class
    /// supertype declaring one.
    ///
    /// Interface attributes are not inherited. Cycles end the walk.
    fn inherited_transactional<'a>(
        &'a self,
        owner: &'a TypeDef,
    ) -> Option<&'a TransactionalAttribute> {
        let mut visited = BTreeSet::new();
        let mut current = Some(owner);
        while let Some(def) = current {
            if !visited.insert(&def.name) {
                return None;
            }
            if let Some(attribute) = def.transactional.as_ref() {
                return Some(attribute);
            }
            current = def
                .supertypes
                .iter()
                .filter_map(|name| self.types.get(name))
                .find(|parent| !parent.is_interface());
        }
        None
    }
}
