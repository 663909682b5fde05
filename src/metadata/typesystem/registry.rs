//! In-memory type registry and metadata resolver.
//!
//! The [`TypeRegistry`] holds every [`TypeDefinition`] of a loaded module set and resolves
//! references against them. It is the collaborator the substitution views and the interface
//! mapper consume through [`MetadataResolver`].
//!
//! # Registry Architecture
//!
//! - **Token-based lookup**: primary storage in a `SkipMap` keyed by metadata token
//! - **Identity lookup**: `DashMap` from [`TypeIdentity`] to token, used for reference resolution
//! - **Name lookup**: `DashMap` from full name to tokens, used for primitives and convenience queries
//!
//! All indices are lock-free or sharded; a registry can be shared across threads behind an `Arc`
//! and queried while other threads insert.
//!
//! # Examples
//!
//! ```rust
//! use cilgraph::metadata::{
//!     resolver::MetadataResolver,
//!     typesystem::{TypeBuilder, TypeNode, TypeRegistry},
//! };
//!
//! let registry = TypeRegistry::new();
//! let list = TypeBuilder::class("System.Collections.Generic", "List`1")
//!     .scope("mscorlib")
//!     .generic_parameters(["T"])
//!     .build();
//! let definition = registry.define(&list, 0x0010_0001)?;
//!
//! let closed = TypeNode::generic_instance(&list, vec![TypeNode::sz_array(&list.generic_parameters()[0])])?;
//! assert_eq!(registry.resolve_type(&closed)?.token, definition.token);
//! # Ok::<(), cilgraph::Error>(())
//! ```

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::{
    error::not_supported,
    metadata::{
        members::{
            EventDefinitionRc, EventRc, FieldDefinitionRc, FieldRc, MethodDefinitionRc, MethodRc,
            PropertyDefinitionRc, PropertyRc,
        },
        resolver::MetadataResolver,
        token::Token,
        typesystem::{
            are_same_type, methods_match, CilPrimitiveKind, TypeDefinition, TypeDefinitionRc,
            TypeIdentity, TypeNode, TypeRc,
        },
    },
    Error::{MemberNotFound, TypeNotFound},
    Result,
};

/// Thread-safe store of type definitions, resolving references by identity
pub struct TypeRegistry {
    /// Primary storage indexed by metadata token
    types: SkipMap<Token, TypeDefinitionRc>,
    /// Next free row, shared by every table this registry allocates tokens for
    next_row: AtomicU32,
    /// Secondary index: identity of the declared named type
    types_by_identity: DashMap<TypeIdentity, Token>,
    /// Secondary index: full name (namespace.name)
    types_by_fullname: DashMap<String, Vec<Token>>,
}

impl TypeRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        TypeRegistry {
            types: SkipMap::new(),
            next_row: AtomicU32::new(1),
            types_by_identity: DashMap::new(),
            types_by_fullname: DashMap::new(),
        }
    }

    /// Allocate a fresh token in `table`
    ///
    /// ## Arguments
    /// * 'table' - The table byte, e.g. [`Token::METHOD_DEF`]
    pub fn next_token(&self, table: u8) -> Token {
        let row = self.next_row.fetch_add(1, Ordering::Relaxed);
        Token::from_parts(table, row)
    }

    /// Insert a definition
    ///
    /// A definition with the same identity replaces the previous one in the identity index.
    ///
    /// ## Arguments
    /// * 'definition' - The type to register
    pub fn insert(&self, definition: &TypeDefinitionRc) {
        let token = definition.token;
        let full_name = definition.full_name();

        if let Some(identity) = definition.reference().identity() {
            if let Some(previous) = self.types_by_identity.insert(identity.clone(), token) {
                if previous != token {
                    warn!(
                        %full_name,
                        previous = %previous,
                        replacement = %token,
                        "replacing a type definition with the same identity"
                    );
                }
            }
        }

        self.types_by_fullname
            .entry(full_name.clone())
            .or_default()
            .push(token);
        self.types.insert(token, definition.clone());

        debug!(%full_name, %token, "registered type definition");
    }

    /// Create, register and return a definition for `reference` with a fresh `TypeDef` token
    ///
    /// ## Arguments
    /// * 'reference' - The named type to define
    /// * 'flags'     - The raw `TypeAttributes`
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `reference` is not a named type
    pub fn define(&self, reference: &TypeRc, flags: u32) -> Result<TypeDefinitionRc> {
        let definition = TypeDefinition::new(self.next_token(Token::TYPE_DEF), flags, reference)?;
        self.insert(&definition);
        Ok(definition)
    }

    /// Look up a type by its metadata token
    #[must_use]
    pub fn get(&self, token: &Token) -> Option<TypeDefinitionRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Look up the first type registered under `fullname` (`Namespace.Name`, nested as `Outer/Inner`)
    #[must_use]
    pub fn get_by_fullname(&self, fullname: &str) -> Option<TypeDefinitionRc> {
        let tokens = self.types_by_fullname.get(fullname)?;
        tokens.value().iter().find_map(|token| self.get(token))
    }

    /// Number of registered definitions
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All registered definitions, in token order
    #[must_use]
    pub fn all_types(&self) -> Vec<TypeDefinitionRc> {
        self.types.iter().map(|entry| entry.value().clone()).collect()
    }

    fn resolve_primitive(&self, kind: CilPrimitiveKind) -> Result<TypeDefinitionRc> {
        let fullname = format!("{}.{}", kind.namespace(), kind.name());
        self.get_by_fullname(&fullname)
            .ok_or(TypeNotFound(fullname))
    }

    fn declaring_definition(
        &self,
        declaring_type: Option<TypeRc>,
        member: &str,
    ) -> Result<TypeDefinitionRc> {
        match declaring_type {
            Some(declaring) => self.resolve_type(&declaring),
            None => Err(not_supported!("'{}' has no declaring type", member)),
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataResolver for TypeRegistry {
    fn resolve_type(&self, reference: &TypeRc) -> Result<TypeDefinitionRc> {
        let element = reference.element_type();
        match element.as_ref() {
            TypeNode::Primitive(kind) => self.resolve_primitive(*kind),
            TypeNode::Named(named) => {
                if named.scope().is_none() {
                    return Err(not_supported!(
                        "'{}' has no owning scope",
                        reference.full_name()
                    ));
                }

                self.types_by_identity
                    .get(named.identity())
                    .and_then(|token| self.get(token.value()))
                    .ok_or_else(|| TypeNotFound(reference.full_name()))
            }
            _ => Err(not_supported!(
                "'{}' does not denote a definable type",
                reference.full_name()
            )),
        }
    }

    fn resolve_method(&self, reference: &MethodRc) -> Result<MethodDefinitionRc> {
        let method = reference.get_element_method();
        let definition = self.declaring_definition(method.declaring_type(), &method.full_name())?;

        let methods = definition.methods();
        if let Some(found) = methods
            .iter()
            .find(|candidate| Arc::ptr_eq(candidate.reference(), &method))
        {
            return Ok(found.clone());
        }

        methods
            .into_iter()
            .find(|candidate| {
                methods_match(candidate.reference(), &method)
                    && are_same_type(&candidate.reference().return_type(), &method.return_type())
            })
            .ok_or_else(|| MemberNotFound(method.full_name()))
    }

    fn resolve_field(&self, reference: &FieldRc) -> Result<FieldDefinitionRc> {
        let definition =
            self.declaring_definition(reference.declaring_type(), &reference.full_name())?;

        let fields = definition.fields();
        if let Some(found) = fields
            .iter()
            .find(|candidate| Arc::ptr_eq(candidate.reference(), reference))
        {
            return Ok(found.clone());
        }

        fields
            .into_iter()
            .find(|candidate| {
                candidate.name() == reference.name()
                    && are_same_type(&candidate.reference().field_type(), &reference.field_type())
            })
            .ok_or_else(|| MemberNotFound(reference.full_name()))
    }

    fn resolve_property(&self, reference: &PropertyRc) -> Result<PropertyDefinitionRc> {
        let definition =
            self.declaring_definition(reference.declaring_type(), &reference.full_name())?;

        let properties = definition.properties();
        if let Some(found) = properties
            .iter()
            .find(|candidate| Arc::ptr_eq(candidate.reference(), reference))
        {
            return Ok(found.clone());
        }

        properties
            .into_iter()
            .find(|candidate| {
                candidate.name() == reference.name()
                    && are_same_type(
                        &candidate.reference().property_type(),
                        &reference.property_type(),
                    )
            })
            .ok_or_else(|| MemberNotFound(reference.full_name()))
    }

    fn resolve_event(&self, reference: &EventRc) -> Result<EventDefinitionRc> {
        let definition =
            self.declaring_definition(reference.declaring_type(), &reference.full_name())?;

        let events = definition.events();
        if let Some(found) = events
            .iter()
            .find(|candidate| Arc::ptr_eq(candidate.reference(), reference))
        {
            return Ok(found.clone());
        }

        events
            .into_iter()
            .find(|candidate| candidate.name() == reference.name())
            .ok_or_else(|| MemberNotFound(reference.full_name()))
    }
}
