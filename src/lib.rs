// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # cilgraph
//!
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](LICENSE-APACHE)
//!
//! An in-memory graph of .NET (ECMA-335) type and member references, with generic substitution
//! and interface implementation mapping.
//!
//! Metadata declares generic members in unbound form: `List<T>` declares `Add(T)` and a field
//! `_items` of type `T[]`. Tools that reason about `List<string>` need those members as the
//! runtime sees them. `cilgraph` provides the reference model, the substitution engine that
//! produces those views, and a mapper that finds which method of a type implements a given
//! interface method.
//!
//! ## Features
//!
//! - **Closed type model** - every type reference shape is a variant of one enum, shared via `Arc`
//! - **Identity preserving substitution** - unchanged subtrees come back as the same `Arc`
//! - **Runtime member views** - constructed fields, methods, properties and events derive their
//!   types on access through a generic context
//! - **Interface mapping** - explicit, implicit and inherited implementations, in parallel
//!   across all interfaces of a type
//! - **Pluggable resolution** - a [`metadata::resolver::MetadataResolver`] connects references
//!   to definitions; [`metadata::typesystem::TypeRegistry`] is the in-memory implementation
//!
//! ## Quick Start
//!
//! ```rust
//! use cilgraph::prelude::*;
//!
//! let dictionary = TypeBuilder::class("System.Collections.Generic", "Dictionary`2")
//!     .scope("mscorlib")
//!     .generic_parameters(["TKey", "TValue"])
//!     .build();
//! let params = dictionary.generic_parameters().to_vec();
//!
//! let try_get = MethodBuilder::new("TryGetValue")
//!     .declaring_type(&dictionary)
//!     .returns(&TypeNode::primitive(CilPrimitiveKind::Boolean))
//!     .instance()
//!     .parameter("key", &params[0])
//!     .parameter("value", &TypeNode::by_reference(&params[1]))
//!     .build();
//!
//! let closed = TypeNode::generic_instance(
//!     &dictionary,
//!     vec![
//!         TypeNode::primitive(CilPrimitiveKind::String),
//!         TypeNode::primitive(CilPrimitiveKind::I4),
//!     ],
//! )?;
//! let view = try_get.runtime_reference_in(&CombinedContext::for_type(&closed));
//! assert_eq!(
//!     view.full_name(),
//!     "bool System.Collections.Generic.Dictionary`2<string,int32>::TryGetValue(string,int32&)"
//! );
//! # Ok::<(), cilgraph::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`metadata`] - Type system, generics, members, resolution and interface mapping
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events and never installs a subscriber.
//! Registry insertions and base type fallthrough in the mapper log at `debug`, candidate
//! selection at `trace`.

#[macro_use]
pub(crate) mod error;
pub(crate) mod utils;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use cilgraph::prelude::*;
///
/// let registry = TypeRegistry::new();
/// assert!(registry.is_empty());
/// ```
pub mod prelude;

/// Type and member references, generic substitution and interface mapping
pub mod metadata;

/// `cilgraph` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `cilgraph` Error type
///
/// # Examples
///
/// ```rust
/// use cilgraph::{Error, metadata::typesystem::{TypeBuilder, TypeRegistry}};
/// use cilgraph::metadata::resolver::MetadataResolver;
///
/// let registry = TypeRegistry::new();
/// let missing = TypeBuilder::class("Sample", "Missing").scope("Sample").build();
///
/// match registry.resolve_type(&missing) {
///     Err(Error::TypeNotFound(name)) => assert_eq!(name, "Sample.Missing"),
///     other => panic!("unexpected {:?}", other.map(|d| d.full_name())),
/// }
/// ```
pub use error::Error;
