//! Member definitions: the declared side a member reference resolves to.
//!
//! A definition pairs the metadata `Token` and attribute flags of a declared member with the
//! reference node describing its signature. The reference is scoped to the declaring type's own
//! generic parameters; runtime views are derived from it on demand.

use std::sync::Arc;

use crate::metadata::{
    members::{
        EventRc, FieldAttributes, FieldRc, MethodAccessFlags, MethodList, MethodModifiers,
        MethodRc, MethodVtableFlags, PropertyRc,
    },
    token::Token,
};

/// A reference counted `MethodDefinition`
pub type MethodDefinitionRc = Arc<MethodDefinition>;
/// A reference counted `FieldDefinition`
pub type FieldDefinitionRc = Arc<FieldDefinition>;
/// A reference counted `PropertyDefinition`
pub type PropertyDefinitionRc = Arc<PropertyDefinition>;
/// A reference counted `EventDefinition`
pub type EventDefinitionRc = Arc<EventDefinition>;

/// A declared method
#[derive(Debug)]
pub struct MethodDefinition {
    /// Token
    pub token: Token,
    /// Access level
    pub flags_access: MethodAccessFlags,
    /// Vtable layout
    pub flags_vtable: MethodVtableFlags,
    /// Modifiers
    pub flags_modifiers: MethodModifiers,
    reference: MethodRc,
    overrides: boxcar::Vec<MethodRc>,
}

impl MethodDefinition {
    /// Create a new method definition
    ///
    /// ## Arguments
    /// * 'token'     - The `MethodDef` token
    /// * 'flags'     - The raw `MethodAttributes`
    /// * 'reference' - The declared signature, scoped to the declaring type
    #[must_use]
    pub fn new(token: Token, flags: u32, reference: &MethodRc) -> MethodDefinitionRc {
        Arc::new(MethodDefinition {
            token,
            flags_access: MethodAccessFlags::from_method_flags(flags),
            flags_vtable: MethodVtableFlags::from_method_flags(flags),
            flags_modifiers: MethodModifiers::from_method_flags(flags),
            reference: reference.clone(),
            overrides: boxcar::Vec::new(),
        })
    }

    /// The declared reference
    #[must_use]
    pub fn reference(&self) -> &MethodRc {
        &self.reference
    }

    /// The method name
    #[must_use]
    pub fn name(&self) -> String {
        self.reference.name()
    }

    /// Record a method this one explicitly overrides (a `MethodImpl` entry)
    pub fn add_override(&self, overridden: &MethodRc) {
        self.overrides.push(overridden.clone());
    }

    /// The methods this one explicitly overrides, in declaration order
    #[must_use]
    pub fn overrides(&self) -> MethodList {
        self.overrides.iter().map(|(_, method)| method.clone()).collect()
    }

    /// Returns true if the override table has entries
    #[must_use]
    pub fn has_overrides(&self) -> bool {
        self.overrides.count() > 0
    }

    /// Returns true for public methods
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.flags_access == MethodAccessFlags::PUBLIC
    }

    /// Returns true for private methods
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.flags_access == MethodAccessFlags::PRIVATE
    }

    /// Returns true for static methods
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags_modifiers.contains(MethodModifiers::STATIC)
    }

    /// Returns true for virtual methods
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.flags_modifiers.contains(MethodModifiers::VIRTUAL)
    }

    /// Returns true for abstract methods
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags_modifiers.contains(MethodModifiers::ABSTRACT)
    }

    /// Returns true for instance and type constructors
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.flags_modifiers
            .contains(MethodModifiers::SPECIAL_NAME | MethodModifiers::RTSPECIAL_NAME)
            && matches!(self.name().as_str(), ".ctor" | ".cctor")
    }
}

/// A declared field
#[derive(Debug)]
pub struct FieldDefinition {
    /// Token
    pub token: Token,
    /// Attributes
    pub flags: FieldAttributes,
    reference: FieldRc,
}

impl FieldDefinition {
    /// Create a new field definition
    ///
    /// ## Arguments
    /// * 'token'     - The `Field` token
    /// * 'flags'     - The raw `FieldAttributes`
    /// * 'reference' - The declared field, scoped to the declaring type
    #[must_use]
    pub fn new(token: Token, flags: u32, reference: &FieldRc) -> FieldDefinitionRc {
        Arc::new(FieldDefinition {
            token,
            flags: FieldAttributes::from_bits_truncate(flags),
            reference: reference.clone(),
        })
    }

    /// The declared reference
    #[must_use]
    pub fn reference(&self) -> &FieldRc {
        &self.reference
    }

    /// The field name
    #[must_use]
    pub fn name(&self) -> String {
        self.reference.name()
    }

    /// Returns true for static fields
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(FieldAttributes::STATIC)
    }

    /// Returns true for compile time constants
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.flags.contains(FieldAttributes::LITERAL)
    }
}

/// A declared property
#[derive(Debug)]
pub struct PropertyDefinition {
    /// Token
    pub token: Token,
    /// Raw `PropertyAttributes`
    pub flags: u32,
    reference: PropertyRc,
}

impl PropertyDefinition {
    /// Create a new property definition
    #[must_use]
    pub fn new(token: Token, flags: u32, reference: &PropertyRc) -> PropertyDefinitionRc {
        Arc::new(PropertyDefinition {
            token,
            flags,
            reference: reference.clone(),
        })
    }

    /// The declared reference
    #[must_use]
    pub fn reference(&self) -> &PropertyRc {
        &self.reference
    }

    /// The property name
    #[must_use]
    pub fn name(&self) -> String {
        self.reference.name()
    }
}

/// A declared event
#[derive(Debug)]
pub struct EventDefinition {
    /// Token
    pub token: Token,
    /// Raw `EventAttributes`
    pub flags: u32,
    reference: EventRc,
}

impl EventDefinition {
    /// Create a new event definition
    #[must_use]
    pub fn new(token: Token, flags: u32, reference: &EventRc) -> EventDefinitionRc {
        Arc::new(EventDefinition {
            token,
            flags,
            reference: reference.clone(),
        })
    }

    /// The declared reference
    #[must_use]
    pub fn reference(&self) -> &EventRc {
        &self.reference
    }

    /// The event name
    #[must_use]
    pub fn name(&self) -> String {
        self.reference.name()
    }
}
