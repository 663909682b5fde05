//! Generic substitution over the type reference model.
//!
//! [`TypeNode::apply_type_arguments`] replaces every generic parameter bound by a context with its
//! argument. The walk allocates a new node only along paths where a child actually changed; when
//! nothing changed the input `Arc` itself is returned, so `Arc::ptr_eq(&input, &output)` is the
//! "did substitution do anything" test.

use std::sync::Arc;

use crate::metadata::{
    generics::GenericContext,
    members::MethodSignature,
    typesystem::{ArrayType, GenericInstanceType, ModifierType, TypeList, TypeNode, TypeRc},
};

impl TypeNode {
    /// Substitute the generic parameters bound by `context`
    ///
    /// ## Arguments
    /// * 'context' - The instantiation to apply
    ///
    /// Returns `self` (the same `Arc`) when the result is unchanged.
    #[must_use]
    pub fn apply_type_arguments(self: &Arc<Self>, context: &dyn GenericContext) -> TypeRc {
        match self.as_ref() {
            TypeNode::Primitive(_) | TypeNode::Named(_) => self.clone(),
            TypeNode::GenericParameter(parameter) => context
                .resolve(parameter)
                .unwrap_or_else(|| self.clone()),
            TypeNode::Pointer(element) => {
                self.substitute_element(element, context, TypeNode::Pointer)
            }
            TypeNode::ByReference(element) => {
                self.substitute_element(element, context, TypeNode::ByReference)
            }
            TypeNode::Pinned(element) => {
                self.substitute_element(element, context, TypeNode::Pinned)
            }
            TypeNode::Sentinel(element) => {
                self.substitute_element(element, context, TypeNode::Sentinel)
            }
            TypeNode::Array(array) => self.substitute_element(&array.element, context, |e| {
                TypeNode::Array(ArrayType {
                    element: e,
                    dimensions: array.dimensions.clone(),
                })
            }),
            TypeNode::RequiredModifier(modifier) => self
                .substitute_modifier(modifier, context)
                .map_or_else(
                    || self.clone(),
                    |modified| Arc::new(TypeNode::RequiredModifier(modified)),
                ),
            TypeNode::OptionalModifier(modifier) => self
                .substitute_modifier(modifier, context)
                .map_or_else(
                    || self.clone(),
                    |modified| Arc::new(TypeNode::OptionalModifier(modified)),
                ),
            TypeNode::GenericInstance(instance) => {
                if !self.contains_generic_parameter() {
                    return self.clone();
                }

                let (arguments, changed) = apply_all(&instance.arguments, context);
                if !changed {
                    return self.clone();
                }

                Arc::new(TypeNode::GenericInstance(GenericInstanceType {
                    element: instance.element.clone(),
                    arguments,
                }))
            }
            TypeNode::FunctionPointer(signature) => {
                if !signature.contains_generic_parameter() {
                    return self.clone();
                }

                let return_type = signature.return_type();
                let new_return = return_type.apply_type_arguments(context);
                let (parameters, parameters_changed) =
                    apply_all(&signature.parameter_types(), context);

                if !parameters_changed && Arc::ptr_eq(&new_return, &return_type) {
                    return self.clone();
                }

                Arc::new(TypeNode::FunctionPointer(
                    signature.rebuild(new_return, parameters),
                ))
            }
        }
    }

    fn substitute_element<F>(
        self: &Arc<Self>,
        element: &TypeRc,
        context: &dyn GenericContext,
        wrap: F,
    ) -> TypeRc
    where
        F: FnOnce(TypeRc) -> TypeNode,
    {
        if !self.contains_generic_parameter() {
            return self.clone();
        }

        let substituted = element.apply_type_arguments(context);
        if Arc::ptr_eq(&substituted, element) {
            return self.clone();
        }

        Arc::new(wrap(substituted))
    }

    fn substitute_modifier(
        &self,
        modifier: &ModifierType,
        context: &dyn GenericContext,
    ) -> Option<ModifierType> {
        let new_modifier = modifier.modifier.apply_type_arguments(context);
        let new_element = modifier.element.apply_type_arguments(context);

        if Arc::ptr_eq(&new_modifier, &modifier.modifier)
            && Arc::ptr_eq(&new_element, &modifier.element)
        {
            return None;
        }

        Some(ModifierType {
            modifier: new_modifier,
            element: new_element,
        })
    }
}

/// Substitute every node of `nodes`, reporting whether any of them changed
pub(crate) fn apply_all(nodes: &[TypeRc], context: &dyn GenericContext) -> (TypeList, bool) {
    let mut changed = false;
    let substituted = nodes
        .iter()
        .map(|node| {
            let result = node.apply_type_arguments(context);
            changed |= !Arc::ptr_eq(&result, node);
            result
        })
        .collect();

    (substituted, changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        generics::TypeContext,
        members::{FunctionPointerType, MethodSignature},
        typesystem::{CilPrimitiveKind, TypeBuilder},
    };

    struct Fixture {
        list: TypeRc,
        t: TypeRc,
        int32: TypeRc,
        context: TypeContext,
    }

    fn fixture() -> Fixture {
        let list = TypeBuilder::class("System.Collections.Generic", "List`1")
            .generic_parameters(["T"])
            .build();
        let t = list.generic_parameters()[0].clone();
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);
        let instance = TypeNode::generic_instance(&list, vec![int32.clone()]).unwrap();

        Fixture {
            list,
            t,
            int32,
            context: TypeContext::new(&instance).unwrap(),
        }
    }

    #[test]
    fn test_leaves_are_returned_unchanged() {
        let f = fixture();
        let string = TypeNode::primitive(CilPrimitiveKind::String);

        assert!(Arc::ptr_eq(&string.apply_type_arguments(&f.context), &string));
        assert!(Arc::ptr_eq(&f.list.apply_type_arguments(&f.context), &f.list));
    }

    #[test]
    fn test_every_wrapper_substitutes_its_element() {
        let f = fixture();
        let volatile = TypeBuilder::class("System.Runtime.CompilerServices", "IsVolatile").build();

        let cases = [
            (TypeNode::pointer(&f.t), "int32*"),
            (TypeNode::by_reference(&f.t), "int32&"),
            (TypeNode::pinned(&f.t), "int32"),
            (TypeNode::sentinel(&f.t), "int32"),
            (TypeNode::sz_array(&f.t), "int32[]"),
            (TypeNode::array(&f.t, 3).unwrap(), "int32[,,]"),
            (
                TypeNode::required_modifier(&volatile, &f.t),
                "int32 modreq(System.Runtime.CompilerServices.IsVolatile)",
            ),
        ];

        for (node, expected) in cases {
            let result = node.apply_type_arguments(&f.context);
            assert!(!Arc::ptr_eq(&result, &node));
            assert_eq!(result.full_name(), expected);
            assert!(!result.contains_generic_parameter());
        }
    }

    #[test]
    fn test_modifier_substitutes_modifier_part() {
        let f = fixture();
        let modified = TypeNode::optional_modifier(&f.t, &f.int32);

        let result = modified.apply_type_arguments(&f.context);
        let TypeNode::OptionalModifier(parts) = result.as_ref() else {
            panic!("expected an optional modifier");
        };
        assert!(Arc::ptr_eq(parts.element(), &f.int32));
        assert!(Arc::ptr_eq(parts.modifier(), &f.int32));
    }

    #[test]
    fn test_unrelated_parameter_is_preserved() {
        let f = fixture();
        let other = TypeBuilder::class("Sample", "Other`1")
            .generic_parameters(["T"])
            .build();
        let foreign = TypeNode::pointer(&other.generic_parameters()[0]);

        assert!(Arc::ptr_eq(&foreign.apply_type_arguments(&f.context), &foreign));
    }

    #[test]
    fn test_function_pointer_substitution() {
        let f = fixture();
        let void = TypeNode::primitive(CilPrimitiveKind::Void);

        let generic = TypeNode::function_pointer(
            FunctionPointerType::new(&f.t)
                .parameter(&f.t)
                .parameter(&void),
        );
        let result = generic.apply_type_arguments(&f.context);
        assert!(!Arc::ptr_eq(&result, &generic));
        assert_eq!(result.full_name(), "method int32 *(int32,void)");

        let TypeNode::FunctionPointer(signature) = result.as_ref() else {
            panic!("expected a function pointer");
        };
        assert!(Arc::ptr_eq(&signature.parameters()[1].parameter_type(), &void));

        let closed = TypeNode::function_pointer(FunctionPointerType::new(&void).parameter(&void));
        assert!(Arc::ptr_eq(&closed.apply_type_arguments(&f.context), &closed));
    }

    #[test]
    fn test_apply_all_reports_changes() {
        let f = fixture();
        let (nodes, changed) = apply_all(&[f.int32.clone()], &f.context);
        assert!(!changed);
        assert!(Arc::ptr_eq(&nodes[0], &f.int32));

        let (nodes, changed) = apply_all(&[f.int32.clone(), f.t.clone()], &f.context);
        assert!(changed);
        assert!(Arc::ptr_eq(&nodes[1], &f.int32));
    }
}
