//! Structural equality of type and method references.
//!
//! Two references denote the same entity when their shapes match node by node. Named types
//! compare by full name, generic parameters by position and provider kind (`!n` for types, `!!n`
//! for methods) rather than by their textual names, and a named `System.Int32` equals the
//! `int32` primitive.

use std::sync::Arc;

use crate::metadata::{
    members::{MethodRc, MethodSignature},
    typesystem::{CilPrimitiveKind, TypeNode, TypeRc},
};

/// Returns true if `a` and `b` denote the same type
#[must_use]
pub fn are_same_type(a: &TypeRc, b: &TypeRc) -> bool {
    if Arc::ptr_eq(a, b) {
        return true;
    }

    match (a.as_ref(), b.as_ref()) {
        (
            TypeNode::Primitive(_) | TypeNode::Named(_),
            TypeNode::Primitive(_) | TypeNode::Named(_),
        ) => match (as_primitive(a), as_primitive(b)) {
            (Some(left), Some(right)) => left == right,
            (None, None) => a.full_name() == b.full_name(),
            _ => false,
        },
        (TypeNode::GenericParameter(left), TypeNode::GenericParameter(right)) => {
            left.position() == right.position()
                && left.provider().is_method() == right.provider().is_method()
        }
        (TypeNode::Pointer(left), TypeNode::Pointer(right))
        | (TypeNode::ByReference(left), TypeNode::ByReference(right))
        | (TypeNode::Pinned(left), TypeNode::Pinned(right))
        | (TypeNode::Sentinel(left), TypeNode::Sentinel(right)) => are_same_type(left, right),
        (TypeNode::RequiredModifier(left), TypeNode::RequiredModifier(right))
        | (TypeNode::OptionalModifier(left), TypeNode::OptionalModifier(right)) => {
            are_same_type(left.modifier(), right.modifier())
                && are_same_type(left.element(), right.element())
        }
        (TypeNode::GenericInstance(left), TypeNode::GenericInstance(right)) => {
            are_same_type(left.element(), right.element())
                && are_same_list(left.arguments(), right.arguments())
        }
        (TypeNode::Array(left), TypeNode::Array(right)) => {
            left.rank() == right.rank() && are_same_type(left.element(), right.element())
        }
        (TypeNode::FunctionPointer(left), TypeNode::FunctionPointer(right)) => {
            are_same_type(&left.return_type(), &right.return_type())
                && are_same_list(&left.parameter_types(), &right.parameter_types())
        }
        _ => false,
    }
}

/// Returns true if both methods share name, generic arity and pairwise equal parameter types
#[must_use]
pub fn methods_match(a: &MethodRc, b: &MethodRc) -> bool {
    if Arc::ptr_eq(a, b) {
        return true;
    }

    if a.name() != b.name()
        || a.generic_arity() != b.generic_arity()
        || a.parameter_count() != b.parameter_count()
    {
        return false;
    }

    a.parameters()
        .iter()
        .zip(b.parameters().iter())
        .all(|(left, right)| are_same_type(&left.parameter_type(), &right.parameter_type()))
}

fn are_same_list(a: &[TypeRc], b: &[TypeRc]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(left, right)| are_same_type(left, right))
}

fn as_primitive(node: &TypeRc) -> Option<CilPrimitiveKind> {
    match node.as_ref() {
        TypeNode::Primitive(kind) => Some(*kind),
        TypeNode::Named(named) if named.declaring_type().is_none() => {
            CilPrimitiveKind::from_runtime_name(named.namespace(), named.name())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        members::MethodBuilder,
        typesystem::TypeBuilder,
    };

    #[test]
    fn test_primitive_normalization() {
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);
        let named = TypeBuilder::value_type("System", "Int32").scope("mscorlib").build();
        let other = TypeBuilder::value_type("System", "Int64").scope("mscorlib").build();

        assert!(are_same_type(&int32, &named));
        assert!(are_same_type(&named, &int32));
        assert!(!are_same_type(&int32, &other));
        assert!(are_same_type(
            &TypeNode::sz_array(&named),
            &TypeNode::sz_array(&int32)
        ));
        assert!(!are_same_type(
            &TypeNode::sz_array(&int32),
            &TypeNode::pointer(&int32)
        ));
    }

    #[test]
    fn test_generic_parameters_compare_by_position() {
        let foo = TypeBuilder::class("Sample", "Foo`1")
            .generic_parameters(["T"])
            .build();
        let ifoo = TypeBuilder::class("Sample", "IFoo`1")
            .generic_parameters(["U"])
            .build();
        let t = foo.generic_parameters()[0].clone();
        let u = ifoo.generic_parameters()[0].clone();
        assert!(are_same_type(&t, &u));

        let builder = MethodBuilder::new("Map").generic_parameters(["T"]);
        let method_t = builder.generic_parameter(0).unwrap();
        assert!(!are_same_type(&t, &method_t));
    }

    #[test]
    fn test_generic_instances_compare_structurally() {
        let list = TypeBuilder::class("System.Collections.Generic", "List`1")
            .scope("mscorlib")
            .generic_parameters(["T"])
            .build();
        let string = TypeNode::primitive(CilPrimitiveKind::String);
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);

        let a = TypeNode::generic_instance(&list, vec![string.clone()]).unwrap();
        let b = TypeNode::generic_instance(&list, vec![string]).unwrap();
        let c = TypeNode::generic_instance(&list, vec![int32]).unwrap();

        assert!(are_same_type(&a, &b));
        assert!(!are_same_type(&a, &c));
    }

    #[test]
    fn test_methods_match() {
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);
        let string = TypeNode::primitive(CilPrimitiveKind::String);

        let a = MethodBuilder::new("Run").instance().parameter("x", &int32).build();
        let b = MethodBuilder::new("Run").parameter("y", &int32).build();
        let c = MethodBuilder::new("Run").parameter("x", &string).build();
        let d = MethodBuilder::new("Walk").parameter("x", &int32).build();

        assert!(a.has_this());
        assert!(methods_match(&a, &b));
        assert!(!methods_match(&a, &c));
        assert!(!methods_match(&a, &d));
    }
}
