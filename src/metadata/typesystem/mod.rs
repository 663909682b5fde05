//! .NET type references, type definitions and the registry that resolves them.
//!
//! # Key Components
//!
//! - [`TypeNode`]: closed enumeration of every shape a type reference can take
//! - [`TypeBuilder`]: fluent construction of named types and their generic parameters
//! - [`CilPrimitiveKind`]: built-in primitive types (int32, string, object, etc.)
//! - [`TypeDefinition`]: a declared type with its member tables
//! - [`TypeRegistry`]: thread-safe store of definitions implementing
//!   [`crate::metadata::resolver::MetadataResolver`]
//! - [`are_same_type`] / [`methods_match`]: structural equality used by resolution and mapping
//!
//! # Type System Features
//!
//! - **Composite specifications**: pointers, by-refs, pinned and sentinel markers, custom
//!   modifiers, function pointers, generic instances and arrays each wrap exactly one element
//! - **Generic support**: generic parameters are keyed by provider and position, never by name
//! - **Shared nodes**: every node is an `Arc`; substitution reuses unchanged subtrees
//!
//! # Examples
//!
//! ```rust
//! use cilgraph::metadata::typesystem::{CilPrimitiveKind, TypeBuilder, TypeNode};
//!
//! let dictionary = TypeBuilder::class("System.Collections.Generic", "Dictionary`2")
//!     .generic_parameters(["TKey", "TValue"])
//!     .build();
//! let string = TypeNode::primitive(CilPrimitiveKind::String);
//! let int32 = TypeNode::primitive(CilPrimitiveKind::I4);
//!
//! let closed = TypeNode::generic_instance(&dictionary, vec![string, TypeNode::sz_array(&int32)])?;
//! assert_eq!(
//!     closed.full_name(),
//!     "System.Collections.Generic.Dictionary`2<string,int32[]>"
//! );
//! assert!(!closed.contains_generic_parameter());
//! # Ok::<(), cilgraph::Error>(())
//! ```

mod base;
mod builder;
mod compare;
mod definition;
mod primitives;
mod registry;

pub use base::{
    ArrayDimension, ArrayType, GenericInstanceType, GenericParameter, MethodId, ModifierType,
    NamedType, ParameterProvider, TypeIdentity, TypeList, TypeNode, TypeRc,
};
pub use builder::TypeBuilder;
pub use compare::{are_same_type, methods_match};
pub use definition::{TypeDefinition, TypeDefinitionRc};
pub use primitives::CilPrimitiveKind;
pub use registry::TypeRegistry;
