//! The boundary to whatever owns the declared metadata.
//!
//! References are lightweight and may point into modules that are not loaded; a
//! [`MetadataResolver`] turns them into definitions. [`crate::metadata::typesystem::TypeRegistry`]
//! is the in-memory implementation; a metadata reader plugs in by implementing the same trait.

use crate::{
    metadata::{
        members::{
            EventDefinitionRc, EventRc, FieldDefinitionRc, FieldRc, MethodDefinitionRc, MethodRc,
            PropertyDefinitionRc, PropertyRc,
        },
        typesystem::{TypeDefinitionRc, TypeRc},
    },
    Result,
};

/// Resolves references to their definitions
///
/// Implementations report [`crate::Error::NotSupported`] for references without an owning scope
/// and [`crate::Error::TypeNotFound`] / [`crate::Error::MemberNotFound`] when the definition does
/// not exist.
pub trait MetadataResolver: Send + Sync {
    /// Resolve a type; specifications resolve through their innermost element
    ///
    /// # Errors
    /// Returns an error if the type has no scope or is not known
    fn resolve_type(&self, reference: &TypeRc) -> Result<TypeDefinitionRc>;

    /// Resolve a declared method reference
    ///
    /// # Errors
    /// Returns an error if the declaring type or the method cannot be located
    fn resolve_method(&self, reference: &MethodRc) -> Result<MethodDefinitionRc>;

    /// Resolve a declared field reference
    ///
    /// # Errors
    /// Returns an error if the declaring type or the field cannot be located
    fn resolve_field(&self, reference: &FieldRc) -> Result<FieldDefinitionRc>;

    /// Resolve a declared property reference
    ///
    /// # Errors
    /// Returns an error if the declaring type or the property cannot be located
    fn resolve_property(&self, reference: &PropertyRc) -> Result<PropertyDefinitionRc>;

    /// Resolve a declared event reference
    ///
    /// # Errors
    /// Returns an error if the declaring type or the event cannot be located
    fn resolve_event(&self, reference: &EventRc) -> Result<EventDefinitionRc>;
}
