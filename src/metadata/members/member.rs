//! A single handle over every kind of member reference.
//!
//! [`MemberReference`] wraps a field, method, property, event or parameter and forwards the
//! queries they share. Conversions from each `*Rc` alias are provided through [`From`].

use crate::metadata::{
    members::{EventRc, FieldRc, MethodRc, ParamRc, PropertyRc},
    typesystem::TypeRc,
};

/// Any member reference, for code that walks members without caring about their kind
#[derive(Debug, Clone)]
pub enum MemberReference {
    /// A field
    Field(FieldRc),
    /// A method
    Method(MethodRc),
    /// A property
    Property(PropertyRc),
    /// An event
    Event(EventRc),
    /// A parameter
    Parameter(ParamRc),
}

impl MemberReference {
    /// The member name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            MemberReference::Field(field) => field.name(),
            MemberReference::Method(method) => method.name(),
            MemberReference::Property(property) => property.name(),
            MemberReference::Event(event) => event.name(),
            MemberReference::Parameter(parameter) => parameter.name(),
        }
    }

    /// The member's full name; a parameter renders as `<type> <name>`
    #[must_use]
    pub fn full_name(&self) -> String {
        match self {
            MemberReference::Field(field) => field.full_name(),
            MemberReference::Method(method) => method.full_name(),
            MemberReference::Property(property) => property.full_name(),
            MemberReference::Event(event) => event.full_name(),
            MemberReference::Parameter(parameter) => format!(
                "{} {}",
                parameter.parameter_type().full_name(),
                parameter.name()
            ),
        }
    }

    /// The declaring type; parameters have none
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeRc> {
        match self {
            MemberReference::Field(field) => field.declaring_type(),
            MemberReference::Method(method) => method.declaring_type(),
            MemberReference::Property(property) => property.declaring_type(),
            MemberReference::Event(event) => event.declaring_type(),
            MemberReference::Parameter(_) => None,
        }
    }

    /// Returns true if any typed part mentions a generic parameter
    #[must_use]
    pub fn contains_generic_parameter(&self) -> bool {
        match self {
            MemberReference::Field(field) => field.contains_generic_parameter(),
            MemberReference::Method(method) => method.contains_generic_parameter(),
            MemberReference::Property(property) => property.contains_generic_parameter(),
            MemberReference::Event(event) => event.contains_generic_parameter(),
            MemberReference::Parameter(parameter) => parameter.contains_generic_parameter(),
        }
    }

    /// The member as the runtime sees it; parameters are returned unchanged
    #[must_use]
    pub fn runtime_reference(&self) -> MemberReference {
        match self {
            MemberReference::Field(field) => MemberReference::Field(field.runtime_reference()),
            MemberReference::Method(method) => MemberReference::Method(method.runtime_reference()),
            MemberReference::Property(property) => {
                MemberReference::Property(property.runtime_reference())
            }
            MemberReference::Event(event) => MemberReference::Event(event.runtime_reference()),
            MemberReference::Parameter(parameter) => MemberReference::Parameter(parameter.clone()),
        }
    }
}

impl From<FieldRc> for MemberReference {
    fn from(field: FieldRc) -> Self {
        MemberReference::Field(field)
    }
}

impl From<MethodRc> for MemberReference {
    fn from(method: MethodRc) -> Self {
        MemberReference::Method(method)
    }
}

impl From<PropertyRc> for MemberReference {
    fn from(property: PropertyRc) -> Self {
        MemberReference::Property(property)
    }
}

impl From<EventRc> for MemberReference {
    fn from(event: EventRc) -> Self {
        MemberReference::Event(event)
    }
}

impl From<ParamRc> for MemberReference {
    fn from(parameter: ParamRc) -> Self {
        MemberReference::Parameter(parameter)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::{
        members::{FieldReference, MethodBuilder, ParameterReference},
        typesystem::{CilPrimitiveKind, TypeBuilder, TypeNode},
    };

    #[test]
    fn test_umbrella_dispatch() {
        let foo = TypeBuilder::class("Sample", "Foo`1")
            .generic_parameters(["T"])
            .build();
        let t = foo.generic_parameters()[0].clone();
        let string = TypeNode::primitive(CilPrimitiveKind::String);
        let closed = TypeNode::generic_instance(&foo, vec![string]).unwrap();

        let field: MemberReference = FieldReference::new("value", &t, Some(&closed)).into();
        assert!(field.contains_generic_parameter());
        assert_eq!(field.name(), "value");

        let view = field.runtime_reference();
        assert!(!view.contains_generic_parameter());
        assert_eq!(view.full_name(), "string Sample.Foo`1<string>::value");
        assert!(Arc::ptr_eq(&view.declaring_type().unwrap(), &closed));

        let method: MemberReference = MethodBuilder::new("Run").build().into();
        assert!(method.declaring_type().is_none());
        assert!(!method.contains_generic_parameter());

        let parameter: MemberReference = ParameterReference::new("item", &t).into();
        assert_eq!(parameter.full_name(), "T item");
        assert!(parameter.declaring_type().is_none());
    }
}
