use std::sync::{Arc, OnceLock};

use crate::{
    error::{invalid_argument, not_supported},
    metadata::{
        members::{
            EventDefinitionRc, FieldDefinitionRc, MethodDefinitionRc, PropertyDefinitionRc,
            TypeAttributes,
        },
        token::Token,
        typesystem::{TypeList, TypeRc},
    },
    Result,
};

/// A reference counted `TypeDefinition`
pub type TypeDefinitionRc = Arc<TypeDefinition>;

/// A declared type with its member tables
///
/// Member lists are append-only and preserve declaration order. Everything they hold is scoped to
/// this type's own generic parameters; use the views in [`crate::metadata::interfaces`] to see
/// them through a generic instance.
#[derive(Debug)]
pub struct TypeDefinition {
    /// Token
    pub token: Token,
    /// Attributes
    pub flags: TypeAttributes,
    reference: TypeRc,
    base: OnceLock<TypeRc>,
    interfaces: boxcar::Vec<TypeRc>,
    methods: boxcar::Vec<MethodDefinitionRc>,
    fields: boxcar::Vec<FieldDefinitionRc>,
    properties: boxcar::Vec<PropertyDefinitionRc>,
    events: boxcar::Vec<EventDefinitionRc>,
}

impl TypeDefinition {
    /// Create a new type definition
    ///
    /// ## Arguments
    /// * 'token'     - The `TypeDef` token
    /// * 'flags'     - The raw `TypeAttributes`
    /// * 'reference' - The named type node this definition declares
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `reference` is not a named type
    pub fn new(token: Token, flags: u32, reference: &TypeRc) -> Result<TypeDefinitionRc> {
        if !reference.is_named() {
            return Err(invalid_argument!(
                "'{}' is not a named type and cannot be defined",
                reference.full_name()
            ));
        }

        Ok(Arc::new(TypeDefinition {
            token,
            flags: TypeAttributes::from_bits_truncate(flags),
            reference: reference.clone(),
            base: OnceLock::new(),
            interfaces: boxcar::Vec::new(),
            methods: boxcar::Vec::new(),
            fields: boxcar::Vec::new(),
            properties: boxcar::Vec::new(),
            events: boxcar::Vec::new(),
        }))
    }

    /// The named type node this definition declares
    #[must_use]
    pub fn reference(&self) -> &TypeRc {
        &self.reference
    }

    /// Returns the full name (`Namespace.Name`) of the type
    #[must_use]
    pub fn full_name(&self) -> String {
        self.reference.full_name()
    }

    /// Access the base type of this type, if it exists
    #[must_use]
    pub fn base_type(&self) -> Option<TypeRc> {
        self.base.get().cloned()
    }

    /// Set the base type
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] if the base type has already been set
    pub fn set_base_type(&self, base: &TypeRc) -> Result<()> {
        self.base.set(base.clone()).map_err(|_| {
            not_supported!("the base type of '{}' is already set", self.full_name())
        })
    }

    /// Record an implemented interface
    pub fn add_interface(&self, interface: &TypeRc) {
        self.interfaces.push(interface.clone());
    }

    /// Record a declared method
    pub fn add_method(&self, method: &MethodDefinitionRc) {
        self.methods.push(method.clone());
    }

    /// Record a declared field
    pub fn add_field(&self, field: &FieldDefinitionRc) {
        self.fields.push(field.clone());
    }

    /// Record a declared property
    pub fn add_property(&self, property: &PropertyDefinitionRc) {
        self.properties.push(property.clone());
    }

    /// Record a declared event
    pub fn add_event(&self, event: &EventDefinitionRc) {
        self.events.push(event.clone());
    }

    /// The interfaces this type declares it implements
    #[must_use]
    pub fn interfaces(&self) -> TypeList {
        self.interfaces.iter().map(|(_, t)| t.clone()).collect()
    }

    /// All declared methods, constructors included
    #[must_use]
    pub fn methods(&self) -> Vec<MethodDefinitionRc> {
        self.methods.iter().map(|(_, m)| m.clone()).collect()
    }

    /// All declared fields
    #[must_use]
    pub fn fields(&self) -> Vec<FieldDefinitionRc> {
        self.fields.iter().map(|(_, f)| f.clone()).collect()
    }

    /// All declared properties
    #[must_use]
    pub fn properties(&self) -> Vec<PropertyDefinitionRc> {
        self.properties.iter().map(|(_, p)| p.clone()).collect()
    }

    /// All declared events
    #[must_use]
    pub fn events(&self) -> Vec<EventDefinitionRc> {
        self.events.iter().map(|(_, e)| e.clone()).collect()
    }

    /// Instance and type constructors
    #[must_use]
    pub fn constructors(&self) -> Vec<MethodDefinitionRc> {
        self.methods
            .iter()
            .filter(|(_, method)| method.is_constructor())
            .map(|(_, method)| method.clone())
            .collect()
    }

    /// The type initializer (`.cctor`), if declared
    #[must_use]
    pub fn static_constructor(&self) -> Option<MethodDefinitionRc> {
        self.constructors()
            .into_iter()
            .find(|constructor| constructor.is_static())
    }

    /// Declared methods that are not constructors
    #[must_use]
    pub fn methods_without_constructors(&self) -> Vec<MethodDefinitionRc> {
        self.methods
            .iter()
            .filter(|(_, method)| !method.is_constructor())
            .map(|(_, method)| method.clone())
            .collect()
    }

    /// The first field called `name`
    #[must_use]
    pub fn field(&self, name: &str) -> Option<FieldDefinitionRc> {
        self.fields
            .iter()
            .find(|(_, field)| field.name() == name)
            .map(|(_, field)| field.clone())
    }

    /// The first property called `name`
    #[must_use]
    pub fn property(&self, name: &str) -> Option<PropertyDefinitionRc> {
        self.properties
            .iter()
            .find(|(_, property)| property.name() == name)
            .map(|(_, property)| property.clone())
    }

    /// Returns true for interfaces
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flags.is_interface()
    }

    /// Returns true for abstract types
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(TypeAttributes::ABSTRACT)
    }

    /// Returns true for value types
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        self.reference.is_value_type()
    }

    /// Returns true if the type derives from `System.Enum`
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.base_type()
            .is_some_and(|base| base.full_name() == "System.Enum")
    }

    /// Returns true if the type declares generic parameters
    #[must_use]
    pub fn has_generic_parameters(&self) -> bool {
        self.reference.has_generic_parameters()
    }

    /// The type of the instance field backing an enum
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the type is not an enum or declares no
    /// instance field
    pub fn enum_underlying_type(&self) -> Result<TypeRc> {
        if !self.is_enum() {
            return Err(invalid_argument!("'{}' is not an enum", self.full_name()));
        }

        self.fields
            .iter()
            .find(|(_, field)| !field.is_static())
            .map(|(_, field)| field.reference().field_type())
            .ok_or_else(|| {
                invalid_argument!("enum '{}' declares no instance field", self.full_name())
            })
    }
}
