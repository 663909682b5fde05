//! Member references, their runtime views and their definitions.
//!
//! Every member kind is a closed enum over a declared form and its specifications:
//!
//! - [`FieldReference`], [`PropertyReference`], [`EventReference`]: `Member` or `Constructed`
//! - [`MethodReference`]: `Member`, `GenericInstance` or `Constructed`
//! - [`ParameterReference`]: owned by a [`ParameterList`] that keeps indices consistent
//!
//! A runtime view (`runtime_reference`) presents a member as it appears under a generic
//! instantiation. Views are built on demand and never mutate the declared member; when nothing
//! would change the original `Arc` is handed back.
//!
//! # Examples
//!
//! ```rust
//! use cilgraph::metadata::{
//!     members::FieldReference,
//!     typesystem::{CilPrimitiveKind, TypeBuilder, TypeNode},
//! };
//!
//! let list = TypeBuilder::class("System.Collections.Generic", "List`1")
//!     .generic_parameters(["T"])
//!     .build();
//! let t = list.generic_parameters()[0].clone();
//! let closed = TypeNode::generic_instance(&list, vec![TypeNode::primitive(CilPrimitiveKind::String)])?;
//!
//! let items = FieldReference::new("_items", &TypeNode::sz_array(&t), Some(&closed));
//! assert_eq!(
//!     items.runtime_reference().full_name(),
//!     "string[] System.Collections.Generic.List`1<string>::_items"
//! );
//! # Ok::<(), cilgraph::Error>(())
//! ```

mod attributes;
mod definitions;
mod event;
mod field;
mod member;
mod method;
mod params;
mod property;
mod signature;

use std::sync::Arc;

pub use attributes::{
    FieldAttributes, MethodAccessFlags, MethodModifiers, MethodVtableFlags, TypeAttributes,
    FIELD_ACCESS_MASK, METHOD_ACCESS_MASK, METHOD_VTABLE_LAYOUT_MASK, TYPE_CLASS_SEMANTICS_MASK,
    TYPE_VISIBILITY_MASK,
};
pub use definitions::{
    EventDefinition, EventDefinitionRc, FieldDefinition, FieldDefinitionRc, MethodDefinition,
    MethodDefinitionRc, PropertyDefinition, PropertyDefinitionRc,
};
pub use event::{ConstructedEvent, EventMember, EventRc, EventReference};
pub use field::{ConstructedField, FieldMember, FieldRc, FieldReference};
pub use member::MemberReference;
pub use method::{
    ConstructedMethod, GenericInstanceMethod, MethodBuilder, MethodList, MethodMember, MethodRc,
    MethodReference,
};
pub use params::{ParamRc, ParameterList, ParameterReference};
pub use property::{ConstructedProperty, PropertyMember, PropertyRc, PropertyReference};
pub use signature::{CallingConvention, FunctionPointerType, MethodSignature, SignatureHeader};

use crate::metadata::{
    generics::{CombinedContext, GenericContext},
    typesystem::TypeRc,
};

/// Returns true when viewing a member through `context` would not change it: nothing mentions a
/// generic parameter and the context does not move the member to another declaring type.
pub(crate) fn view_is_identity(
    declaring_type: Option<&TypeRc>,
    context: &CombinedContext,
    contains_generic_parameter: bool,
) -> bool {
    let same_declaring = match context.instance_type() {
        None => true,
        Some(instance) => declaring_type.is_some_and(|declaring| Arc::ptr_eq(declaring, instance)),
    };

    same_declaring && !contains_generic_parameter
}
