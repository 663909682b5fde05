//! Builder for named type references.
//!
//! This module provides the [`TypeBuilder`] struct, which offers a fluent API for constructing
//! named types (classes, interfaces and value types) together with the generic parameter nodes
//! they own. Composite specifications are built directly through the constructors on
//! [`crate::metadata::typesystem::TypeNode`].
//!
//! # Example
//!
//! ```rust
//! use cilgraph::metadata::typesystem::{TypeBuilder, TypeNode, CilPrimitiveKind};
//!
//! let dictionary = TypeBuilder::class("System.Collections.Generic", "Dictionary`2")
//!     .scope("System.Private.CoreLib")
//!     .generic_parameters(["TKey", "TValue"])
//!     .build();
//!
//! let key = dictionary.generic_parameters()[0].clone();
//! let keys = TypeNode::sz_array(&key);
//! assert_eq!(keys.full_name(), "TKey[]");
//! ```

use std::sync::Arc;

use crate::metadata::typesystem::{
    NamedType, ParameterProvider, TypeIdentity, TypeNode, TypeRc,
};

/// Provides a fluent API for building named type references
pub struct TypeBuilder {
    /// Owning module or assembly
    scope: Option<String>,
    /// Namespace of the type
    namespace: String,
    /// Simple name of the type
    name: String,
    /// Enclosing type for nested types
    declaring_type: Option<TypeRc>,
    /// Value type or reference type
    is_value_type: bool,
    /// Names of the declared generic parameters
    generic_parameters: Vec<String>,
}

impl TypeBuilder {
    /// Start building a reference type
    ///
    /// ## Arguments
    /// * 'namespace' - The namespace of the type
    /// * 'name'      - The simple name of the type
    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeBuilder {
            scope: None,
            namespace: namespace.into(),
            name: name.into(),
            declaring_type: None,
            is_value_type: false,
            generic_parameters: Vec::new(),
        }
    }

    /// Start building a value type
    ///
    /// ## Arguments
    /// * 'namespace' - The namespace of the type
    /// * 'name'      - The simple name of the type
    pub fn value_type(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeBuilder {
            is_value_type: true,
            ..TypeBuilder::class(namespace, name)
        }
    }

    /// Set the owning module or assembly
    ///
    /// ## Arguments
    /// * 'scope' - Name of the module or assembly
    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Nest the type inside `declaring_type`
    ///
    /// The nested type inherits the enclosing type's scope unless one was set explicitly.
    ///
    /// ## Arguments
    /// * 'declaring_type' - The enclosing type
    #[must_use]
    pub fn nested_in(mut self, declaring_type: &TypeRc) -> Self {
        if self.scope.is_none() {
            self.scope = declaring_type.scope().map(str::to_string);
        }
        self.declaring_type = Some(declaring_type.clone());
        self
    }

    /// Declare generic parameters by name, in positional order
    ///
    /// ## Arguments
    /// * 'names' - The parameter names (e.g. `["TKey", "TValue"]`)
    #[must_use]
    pub fn generic_parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generic_parameters = names.into_iter().map(Into::into).collect();
        self
    }

    /// Finish building and return the type node
    #[must_use]
    pub fn build(self) -> TypeRc {
        let identity = TypeIdentity {
            scope: self.scope,
            namespace: self.namespace,
            name: self.name,
            enclosing: self.declaring_type.as_ref().map(|declaring| declaring.full_name()),
            arity: self.generic_parameters.len(),
        };

        let generic_parameters = self
            .generic_parameters
            .into_iter()
            .enumerate()
            .map(|(position, name)| {
                TypeNode::generic_parameter(
                    name,
                    position,
                    ParameterProvider::Type(identity.clone()),
                )
            })
            .collect();

        Arc::new(TypeNode::Named(NamedType {
            declaring_type: self.declaring_type,
            is_value_type: self.is_value_type,
            generic_parameters,
            identity,
        }))
    }
}
