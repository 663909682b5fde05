//! # cilgraph Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the cilgraph library. Import this module to get quick access to the essential
//! types for building and querying a type graph.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cilgraph operations
pub use crate::Error;

/// The result type used throughout cilgraph
pub use crate::Result;

/// Metadata token type identifying definitions
pub use crate::metadata::token::Token;

// ================================================================================================
// Type System
// ================================================================================================

/// Core type system components
pub use crate::metadata::typesystem::{
    are_same_type, methods_match, ArrayDimension, CilPrimitiveKind, TypeBuilder, TypeDefinition,
    TypeDefinitionRc, TypeList, TypeNode, TypeRc, TypeRegistry,
};

// ================================================================================================
// Generics
// ================================================================================================

/// Generic contexts used for substitution
pub use crate::metadata::generics::{
    CombinedContext, GenericContext, MethodContext, TypeContext,
};

// ================================================================================================
// Members
// ================================================================================================

/// Member references
pub use crate::metadata::members::{
    CallingConvention, EventReference, FieldReference, FunctionPointerType, MemberReference,
    MethodBuilder, MethodReference, MethodSignature, ParameterList, ParameterReference,
    PropertyReference,
};

/// Reference counted member handles
pub use crate::metadata::members::{EventRc, FieldRc, MethodList, MethodRc, ParamRc, PropertyRc};

/// Member definitions and their attributes
pub use crate::metadata::members::{
    EventDefinition, EventDefinitionRc, FieldDefinition, FieldDefinitionRc, MethodAccessFlags,
    MethodDefinition, MethodDefinitionRc, MethodModifiers, PropertyDefinition,
    PropertyDefinitionRc,
};

// ================================================================================================
// Resolution and Interface Mapping
// ================================================================================================

/// The resolver boundary
pub use crate::metadata::resolver::MetadataResolver;

/// Interface method mapping
pub use crate::metadata::interfaces::{
    get_interface_mapping, interface_mappings, InterfaceMethodMapper, MapperConfig,
    TypeInterfaceMapping,
};
