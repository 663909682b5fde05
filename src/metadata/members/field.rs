//! Field references and their constructed runtime views.

use std::sync::{Arc, RwLock};

use crate::{
    error::not_supported,
    metadata::{
        generics::{CombinedContext, GenericContext},
        members::{view_is_identity, FieldDefinitionRc},
        resolver::MetadataResolver,
        typesystem::TypeRc,
    },
    utils::{read_cloned, replace},
    Result,
};

/// A reference counted `FieldReference`
pub type FieldRc = Arc<FieldReference>;

/// A plain reference to a declared field
#[derive(Debug)]
pub struct FieldMember {
    name: RwLock<String>,
    declaring_type: RwLock<Option<TypeRc>>,
    field_type: RwLock<TypeRc>,
}

/// The runtime view of a field under a generic context
#[derive(Debug)]
pub struct ConstructedField {
    element: FieldRc,
    context: CombinedContext,
}

impl ConstructedField {
    /// The field this view was built from
    #[must_use]
    pub fn element(&self) -> &FieldRc {
        &self.element
    }

    /// The context the view substitutes through
    #[must_use]
    pub fn context(&self) -> &CombinedContext {
        &self.context
    }
}

/// A reference to a field
#[derive(Debug)]
pub enum FieldReference {
    /// A declared field
    Member(FieldMember),
    /// A runtime view under a generic context
    Constructed(ConstructedField),
}

impl FieldReference {
    /// Create a field reference
    ///
    /// ## Arguments
    /// * 'name'             - The field name
    /// * '`field_type`'     - The declared field type
    /// * '`declaring_type`' - The type declaring the field
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        field_type: &TypeRc,
        declaring_type: Option<&TypeRc>,
    ) -> FieldRc {
        Arc::new(FieldReference::Member(FieldMember {
            name: RwLock::new(name.into()),
            declaring_type: RwLock::new(declaring_type.cloned()),
            field_type: RwLock::new(field_type.clone()),
        }))
    }

    /// The field name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            FieldReference::Member(member) => read_cloned(&member.name),
            FieldReference::Constructed(constructed) => constructed.element.name(),
        }
    }

    /// Rename the field; a constructed view renames its element
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the name lock is poisoned
    pub fn set_name(&self, name: impl Into<String>) -> Result<()> {
        match self {
            FieldReference::Member(member) => replace(&member.name, name.into()),
            FieldReference::Constructed(constructed) => constructed.element.set_name(name),
        }
    }

    /// The declaring type; the context's instance type for constructed views
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeRc> {
        match self {
            FieldReference::Member(member) => read_cloned(&member.declaring_type),
            FieldReference::Constructed(constructed) => constructed
                .context
                .instance_type()
                .cloned()
                .or_else(|| constructed.element.declaring_type()),
        }
    }

    /// Change the declaring type of a declared field
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] on constructed views
    pub fn set_declaring_type(&self, declaring_type: &TypeRc) -> Result<()> {
        match self {
            FieldReference::Member(member) => {
                replace(&member.declaring_type, Some(declaring_type.clone()))
            }
            FieldReference::Constructed(_) => Err(self.immutable("declaring type")),
        }
    }

    /// The field type; substituted for constructed views
    #[must_use]
    pub fn field_type(&self) -> TypeRc {
        match self {
            FieldReference::Member(member) => read_cloned(&member.field_type),
            FieldReference::Constructed(constructed) => constructed
                .element
                .field_type()
                .apply_type_arguments(&constructed.context),
        }
    }

    /// Change the type of a declared field
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] on constructed views
    pub fn set_field_type(&self, field_type: &TypeRc) -> Result<()> {
        match self {
            FieldReference::Member(member) => replace(&member.field_type, field_type.clone()),
            FieldReference::Constructed(_) => Err(self.immutable("field type")),
        }
    }

    /// Returns true for constructed views
    #[must_use]
    pub fn is_constructed(&self) -> bool {
        matches!(self, FieldReference::Constructed(_))
    }

    /// Returns true if the field type or the declaring type mentions a generic parameter
    #[must_use]
    pub fn contains_generic_parameter(&self) -> bool {
        self.field_type().contains_generic_parameter()
            || self
                .declaring_type()
                .is_some_and(|declaring| declaring.contains_generic_parameter())
    }

    /// `Declaring::Name`
    #[must_use]
    pub fn member_full_name(&self) -> String {
        match self.declaring_type() {
            Some(declaring) => format!("{}::{}", declaring.full_name(), self.name()),
            None => self.name(),
        }
    }

    /// `<type> Declaring::Name`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.field_type().full_name(), self.member_full_name())
    }

    /// Resolve to the declared definition; constructed views defer to their element
    ///
    /// # Errors
    /// Returns the resolver's error if the definition cannot be located
    pub fn resolve(self: &Arc<Self>, resolver: &dyn MetadataResolver) -> Result<FieldDefinitionRc> {
        match self.as_ref() {
            FieldReference::Member(_) => resolver.resolve_field(self),
            FieldReference::Constructed(constructed) => constructed.element.resolve(resolver),
        }
    }

    /// The field as the runtime sees it through its declaring generic instance
    #[must_use]
    pub fn runtime_reference(self: &Arc<Self>) -> FieldRc {
        match self.declaring_type() {
            Some(declaring) if declaring.is_generic_instance() => {
                self.runtime_reference_in(&CombinedContext::for_type(&declaring))
            }
            _ => self.clone(),
        }
    }

    /// The field viewed through `context`
    #[must_use]
    pub fn runtime_reference_in(self: &Arc<Self>, context: &CombinedContext) -> FieldRc {
        if view_is_identity(
            self.declaring_type().as_ref(),
            context,
            self.contains_generic_parameter(),
        ) {
            return self.clone();
        }

        Arc::new(FieldReference::Constructed(ConstructedField {
            element: self.clone(),
            context: context.clone(),
        }))
    }

    fn immutable(&self, property: &str) -> crate::Error {
        not_supported!(
            "cannot set the {} of constructed field '{}'",
            property,
            self.member_full_name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::{CilPrimitiveKind, TypeBuilder, TypeNode};

    #[test]
    fn test_field_runtime_view() {
        let foo = TypeBuilder::class("Sample", "Foo`1")
            .generic_parameters(["T"])
            .build();
        let t = foo.generic_parameters()[0].clone();
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);
        let closed = TypeNode::generic_instance(&foo, vec![int32.clone()]).unwrap();

        let field = FieldReference::new("Items", &TypeNode::sz_array(&t), Some(&closed));
        assert_eq!(field.full_name(), "T[] Sample.Foo`1<int32>::Items");

        let view = field.runtime_reference();
        assert!(view.is_constructed());
        assert_eq!(view.full_name(), "int32[] Sample.Foo`1<int32>::Items");
        assert!(!view.contains_generic_parameter());
        assert_eq!(field.field_type().full_name(), "T[]");
    }

    #[test]
    fn test_field_identity_shortcuts() {
        let object = TypeBuilder::class("System", "Object").build();
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);
        let field = FieldReference::new("count", &int32, Some(&object));
        assert!(Arc::ptr_eq(&field.runtime_reference(), &field));

        let foo = TypeBuilder::class("Sample", "Foo`1")
            .generic_parameters(["T"])
            .build();
        let closed = TypeNode::generic_instance(&foo, vec![int32.clone()]).unwrap();
        let closed_field = FieldReference::new("count", &int32, Some(&closed));
        assert!(Arc::ptr_eq(
            &closed_field.runtime_reference(),
            &closed_field
        ));
    }

    #[test]
    fn test_constructed_field_name_forwards() {
        let foo = TypeBuilder::class("Sample", "Foo`1")
            .generic_parameters(["T"])
            .build();
        let t = foo.generic_parameters()[0].clone();
        let string = TypeNode::primitive(CilPrimitiveKind::String);
        let closed = TypeNode::generic_instance(&foo, vec![string.clone()]).unwrap();

        let field = FieldReference::new("value", &t, Some(&foo));
        let view = field.runtime_reference_in(&CombinedContext::for_type(&closed));

        view.set_name("renamed").unwrap();
        assert_eq!(field.name(), "renamed");
        assert!(Arc::ptr_eq(&view.declaring_type().unwrap(), &closed));
        assert!(matches!(
            view.set_field_type(&string),
            Err(crate::Error::NotSupported(_))
        ));
        assert!(matches!(
            view.set_declaring_type(&foo),
            Err(crate::Error::NotSupported(_))
        ));
    }
}
