//! Type and member graph of .NET metadata.
//!
//! This module contains the in-memory model of ECMA-335 type and member references, the generic
//! substitution engine that turns unbound declarations into the views the runtime sees, and the
//! interface method mapper built on top of both.
//!
//! # Key Components
//!
//! - [`typesystem`] - Type references, definitions, structural comparison and the type registry
//! - [`generics`] - Generic contexts and `apply_type_arguments`
//! - [`members`] - Field, method, property, event and parameter references plus their definitions
//! - [`interfaces`] - Interface method mapping and runtime member enumeration
//! - [`resolver`] - The boundary between references and the definitions they name
//! - [`token`] - Metadata table row references identifying definitions
//!
//! # Examples
//!
//! ```rust
//! use cilgraph::metadata::{
//!     generics::CombinedContext,
//!     members::FieldReference,
//!     typesystem::{CilPrimitiveKind, TypeBuilder, TypeNode},
//! };
//!
//! let list = TypeBuilder::class("System.Collections.Generic", "List`1")
//!     .scope("mscorlib")
//!     .generic_parameters(["T"])
//!     .build();
//! let t = list.generic_parameters()[0].clone();
//! let items = FieldReference::new("_items", &TypeNode::sz_array(&t), Some(&list));
//!
//! let list_of_int = TypeNode::generic_instance(
//!     &list,
//!     vec![TypeNode::primitive(CilPrimitiveKind::I4)],
//! )?;
//! let view = items.runtime_reference_in(&CombinedContext::for_type(&list_of_int));
//! assert_eq!(view.field_type().full_name(), "int32[]");
//! # Ok::<(), cilgraph::Error>(())
//! ```

/// Generic contexts and type argument substitution
pub mod generics;
/// Interface method mapping and runtime member views
pub mod interfaces;
/// Member references and definitions
pub mod members;
/// The boundary to the owner of declared metadata
pub mod resolver;
/// Metadata tokens
pub mod token;
/// Type references, definitions and the registry
pub mod typesystem;
