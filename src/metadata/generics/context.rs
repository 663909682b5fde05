//! Generic instantiation contexts.
//!
//! A context answers one question: "which argument is bound to parameter `n` of provider `p`?".
//! [`TypeContext`] is derived from a generic type instance and binds type parameters,
//! [`MethodContext`] is derived from a generic method instance and binds method parameters, and
//! [`CombinedContext`] composes the two. Lookups ask the method binding first and fall through to
//! the type binding; a parameter neither binding knows is left unresolved.

use crate::{
    error::invalid_argument,
    metadata::{
        members::MethodRc,
        typesystem::{GenericParameter, ParameterProvider, TypeList, TypeNode, TypeRc},
    },
    Result,
};

/// The arguments bound to one parameter provider
#[derive(Debug, Clone)]
pub struct GenericBinding {
    provider: ParameterProvider,
    arguments: TypeList,
}

impl GenericBinding {
    /// Create a new binding
    ///
    /// ## Arguments
    /// * 'provider'  - The generic type or method whose parameters are bound
    /// * 'arguments' - The bound arguments, by position
    #[must_use]
    pub fn new(provider: ParameterProvider, arguments: TypeList) -> Self {
        GenericBinding {
            provider,
            arguments,
        }
    }

    /// The provider whose parameters are bound
    #[must_use]
    pub fn provider(&self) -> &ParameterProvider {
        &self.provider
    }

    /// The bound arguments
    #[must_use]
    pub fn arguments(&self) -> &[TypeRc] {
        &self.arguments
    }

    /// The argument bound to `parameter`, if this binding covers its provider
    #[must_use]
    pub fn resolve(&self, parameter: &GenericParameter) -> Option<&TypeRc> {
        if parameter.provider() != &self.provider {
            return None;
        }

        self.arguments.get(parameter.position())
    }
}

/// A view mapping generic parameters to their bound arguments
pub trait GenericContext: Send + Sync {
    /// The binding for the type parameter provider
    fn type_binding(&self) -> Option<&GenericBinding>;

    /// The binding for the method parameter provider
    fn method_binding(&self) -> Option<&GenericBinding>;

    /// The instantiated type this context was derived from
    fn instance_type(&self) -> Option<&TypeRc>;

    /// The instantiated method this context was derived from
    fn instance_method(&self) -> Option<&MethodRc> {
        None
    }

    /// The argument bound to `parameter`, trying the method binding before the type binding
    fn resolve(&self, parameter: &GenericParameter) -> Option<TypeRc> {
        self.method_binding()
            .and_then(|binding| binding.resolve(parameter))
            .or_else(|| {
                self.type_binding()
                    .and_then(|binding| binding.resolve(parameter))
            })
            .cloned()
    }

    /// Returns true if the context binds nothing
    fn is_empty(&self) -> bool {
        self.type_binding().is_none() && self.method_binding().is_none()
    }
}

/// Context derived from a generic type instance
#[derive(Debug, Clone)]
pub struct TypeContext {
    instance: TypeRc,
    binding: GenericBinding,
}

impl TypeContext {
    /// Derive a context from a generic type instance
    ///
    /// Arguments may themselves still be generic; they are bound as they are.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `instance` is not a generic instance
    pub fn new(instance: &TypeRc) -> Result<Self> {
        let TypeNode::GenericInstance(generic) = instance.as_ref() else {
            return Err(invalid_argument!(
                "'{}' is not a generic instance",
                instance.full_name()
            ));
        };

        let Some(provider) = generic.provider() else {
            return Err(invalid_argument!(
                "generic instance '{}' has no named element",
                instance.full_name()
            ));
        };

        Ok(TypeContext {
            instance: instance.clone(),
            binding: GenericBinding::new(provider, generic.arguments().to_vec()),
        })
    }
}

impl GenericContext for TypeContext {
    fn type_binding(&self) -> Option<&GenericBinding> {
        Some(&self.binding)
    }

    fn method_binding(&self) -> Option<&GenericBinding> {
        None
    }

    fn instance_type(&self) -> Option<&TypeRc> {
        Some(&self.instance)
    }
}

/// Context derived from a generic method instance
#[derive(Debug, Clone)]
pub struct MethodContext {
    instance: MethodRc,
    binding: GenericBinding,
}

impl MethodContext {
    /// Derive a context from a generic method instance
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `instance` binds no method arguments
    pub fn new(instance: &MethodRc) -> Result<Self> {
        match instance.method_binding() {
            Some(binding) => Ok(MethodContext {
                instance: instance.clone(),
                binding,
            }),
            None => Err(invalid_argument!(
                "'{}' is not a generic method instance",
                instance.full_name()
            )),
        }
    }
}

impl GenericContext for MethodContext {
    fn type_binding(&self) -> Option<&GenericBinding> {
        None
    }

    fn method_binding(&self) -> Option<&GenericBinding> {
        Some(&self.binding)
    }

    fn instance_type(&self) -> Option<&TypeRc> {
        None
    }

    fn instance_method(&self) -> Option<&MethodRc> {
        Some(&self.instance)
    }
}

/// A type context and a method context composed into one
#[derive(Debug, Clone, Default)]
pub struct CombinedContext {
    type_context: Option<TypeContext>,
    method_context: Option<MethodContext>,
}

impl CombinedContext {
    /// Compose two optional contexts
    #[must_use]
    pub fn new(type_context: Option<TypeContext>, method_context: Option<MethodContext>) -> Self {
        CombinedContext {
            type_context,
            method_context,
        }
    }

    /// The context a type provides: bindings if it is a generic instance, nothing otherwise
    #[must_use]
    pub fn for_type(declaring_type: &TypeRc) -> Self {
        CombinedContext {
            type_context: TypeContext::new(declaring_type).ok(),
            method_context: None,
        }
    }

    /// The context a method provides: its declaring type's bindings plus its own
    #[must_use]
    pub fn for_method(method: &MethodRc) -> Self {
        CombinedContext {
            type_context: method
                .declaring_type()
                .and_then(|declaring| TypeContext::new(&declaring).ok()),
            method_context: MethodContext::new(method).ok(),
        }
    }

    /// The type half
    #[must_use]
    pub fn type_context(&self) -> Option<&TypeContext> {
        self.type_context.as_ref()
    }

    /// The method half
    #[must_use]
    pub fn method_context(&self) -> Option<&MethodContext> {
        self.method_context.as_ref()
    }
}

impl GenericContext for CombinedContext {
    fn type_binding(&self) -> Option<&GenericBinding> {
        self.type_context
            .as_ref()
            .and_then(GenericContext::type_binding)
    }

    fn method_binding(&self) -> Option<&GenericBinding> {
        self.method_context
            .as_ref()
            .and_then(GenericContext::method_binding)
    }

    fn instance_type(&self) -> Option<&TypeRc> {
        self.type_context
            .as_ref()
            .and_then(GenericContext::instance_type)
    }

    fn instance_method(&self) -> Option<&MethodRc> {
        self.method_context
            .as_ref()
            .and_then(GenericContext::instance_method)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::{
        members::{MethodBuilder, MethodReference},
        typesystem::{CilPrimitiveKind, TypeBuilder},
    };

    fn parameter(node: &TypeRc) -> &GenericParameter {
        match node.as_ref() {
            TypeNode::GenericParameter(parameter) => parameter,
            _ => panic!("expected a generic parameter"),
        }
    }

    #[test]
    fn test_type_context_binds_type_parameters() {
        let list = TypeBuilder::class("System.Collections.Generic", "List`1")
            .generic_parameters(["T"])
            .build();
        let string = TypeNode::primitive(CilPrimitiveKind::String);
        let instance = TypeNode::generic_instance(&list, vec![string.clone()]).unwrap();

        let context = TypeContext::new(&instance).unwrap();
        let t = list.generic_parameters()[0].clone();

        let resolved = context.resolve(parameter(&t)).unwrap();
        assert!(Arc::ptr_eq(&resolved, &string));
        assert!(Arc::ptr_eq(context.instance_type().unwrap(), &instance));
    }

    #[test]
    fn test_type_context_rejects_non_instances() {
        let list = TypeBuilder::class("System.Collections.Generic", "List`1")
            .generic_parameters(["T"])
            .build();
        assert!(TypeContext::new(&list).is_err());

        let combined = CombinedContext::for_type(&list);
        assert!(combined.is_empty());
        assert!(combined.instance_type().is_none());
    }

    #[test]
    fn test_unbound_arguments_pass_through() {
        let outer = TypeBuilder::class("Sample", "Outer`1")
            .generic_parameters(["T"])
            .build();
        let list = TypeBuilder::class("System.Collections.Generic", "List`1")
            .generic_parameters(["T"])
            .build();
        let outer_t = outer.generic_parameters()[0].clone();

        let instance = TypeNode::generic_instance(&list, vec![outer_t.clone()]).unwrap();
        let context = TypeContext::new(&instance).unwrap();

        let list_t = list.generic_parameters()[0].clone();
        assert!(Arc::ptr_eq(
            &context.resolve(parameter(&list_t)).unwrap(),
            &outer_t
        ));
        assert!(context.resolve(parameter(&outer_t)).is_none());
    }

    #[test]
    fn test_combined_prefers_method_binding() {
        let holder = TypeBuilder::class("Sample", "Holder`1")
            .generic_parameters(["T"])
            .build();
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);
        let string = TypeNode::primitive(CilPrimitiveKind::String);
        let instance = TypeNode::generic_instance(&holder, vec![int32.clone()]).unwrap();

        let builder = MethodBuilder::new("Convert").generic_parameters(["U"]);
        let u = builder.generic_parameter(0).unwrap();
        let method = builder.declaring_type(&instance).returns(&u).build();
        let closed = MethodReference::generic_instance(&method, vec![string.clone()]).unwrap();

        let context = CombinedContext::for_method(&closed);
        assert!(!context.is_empty());
        assert!(Arc::ptr_eq(context.instance_type().unwrap(), &instance));
        assert!(Arc::ptr_eq(context.instance_method().unwrap(), &closed));

        let t = holder.generic_parameters()[0].clone();
        assert!(Arc::ptr_eq(&context.resolve(parameter(&t)).unwrap(), &int32));
        assert!(Arc::ptr_eq(&context.resolve(parameter(&u)).unwrap(), &string));
    }

    #[test]
    fn test_method_context_requires_instance() {
        let method = MethodBuilder::new("Plain").build();
        assert!(MethodContext::new(&method).is_err());
    }
}
