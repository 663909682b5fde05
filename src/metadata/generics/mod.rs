//! Generic contexts and the substitution engine.
//!
//! [`crate::metadata::typesystem::TypeNode::apply_type_arguments`] walks a type node and replaces
//! every generic parameter the given [`GenericContext`] binds. Unchanged subtrees are returned as
//! the very same `Arc`, so `Arc::ptr_eq(&input, &output)` tells whether substitution did anything.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use cilgraph::metadata::{
//!     generics::TypeContext,
//!     typesystem::{CilPrimitiveKind, TypeBuilder, TypeNode},
//! };
//!
//! let list = TypeBuilder::class("System.Collections.Generic", "List`1")
//!     .generic_parameters(["T"])
//!     .build();
//! let t = list.generic_parameters()[0].clone();
//! let string = TypeNode::primitive(CilPrimitiveKind::String);
//! let context = TypeContext::new(&TypeNode::generic_instance(&list, vec![string.clone()])?)?;
//!
//! let pointer = TypeNode::pointer(&t);
//! assert_eq!(pointer.apply_type_arguments(&context).full_name(), "string*");
//!
//! // Closed nodes come back untouched
//! let closed = TypeNode::sz_array(&string);
//! assert!(Arc::ptr_eq(&closed.apply_type_arguments(&context), &closed));
//! # Ok::<(), cilgraph::Error>(())
//! ```

mod context;
mod substitution;

pub use context::{CombinedContext, GenericBinding, GenericContext, MethodContext, TypeContext};
pub(crate) use substitution::apply_all;
