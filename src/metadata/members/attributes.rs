//! Attribute flags of type and member definitions (ECMA-335 §II.23.1).
//!
//! Method attributes are split into logical groups the way the raw `Flags` column packs them:
//! the access level and the vtable layout occupy masked ranges and compare by equality, the
//! remaining bits are independent modifiers.

use bitflags::bitflags;

/// Bitmask for the method access level
pub const METHOD_ACCESS_MASK: u32 = 0x0007;
/// Bitmask for the vtable layout
pub const METHOD_VTABLE_LAYOUT_MASK: u32 = 0x0100;
/// Bitmask for the field access level
pub const FIELD_ACCESS_MASK: u32 = 0x0007;
/// Bitmask for the type visibility
pub const TYPE_VISIBILITY_MASK: u32 = 0x0007;
/// Bitmask for the class semantics (class or interface)
pub const TYPE_CLASS_SEMANTICS_MASK: u32 = 0x0020;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Method access flags
    pub struct MethodAccessFlags: u32 {
        /// Member not referenceable
        const COMPILER_CONTROLLED = 0x0000;
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this Assembly
        const FAM_AND_ASSEM = 0x0002;
        /// Accessibly by anyone in the Assembly
        const ASSEM = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessibly by sub-types anywhere, plus anyone in assembly
        const FAM_OR_ASSEM = 0x0005;
        /// Accessibly by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
    }
}

impl MethodAccessFlags {
    /// Extract access flags from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & METHOD_ACCESS_MASK)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Method vtable layout flags
    pub struct MethodVtableFlags: u32 {
        /// Method reuses existing slot in vtable
        const REUSE_SLOT = 0x0000;
        /// Method always gets a new slot in the vtable
        const NEW_SLOT = 0x0100;
    }
}

impl MethodVtableFlags {
    /// Extract vtable layout flags from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & METHOD_VTABLE_LAYOUT_MASK)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Method modifiers and properties
    pub struct MethodModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name+sig, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method can only be overriden if also accessible
        const STRICT = 0x0200;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// CLI provides 'special' behavior, depending upon the name of the method
        const RTSPECIAL_NAME = 0x1000;
        /// Implementation is forwarded through PInvoke
        const PINVOKE_IMPL = 0x2000;
        /// Method has security associate with it
        const HAS_SECURITY = 0x4000;
        /// Method calls another method containing security code
        const REQUIRE_SEC_OBJECT = 0x8000;
    }
}

impl MethodModifiers {
    /// Extract method modifiers from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & !METHOD_ACCESS_MASK & !METHOD_VTABLE_LAYOUT_MASK)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Field attributes; the access level is a masked value, see [`FIELD_ACCESS_MASK`]
    pub struct FieldAttributes: u32 {
        /// Member not referenceable
        const COMPILER_CONTROLLED = 0x0000;
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this Assembly
        const FAM_AND_ASSEM = 0x0002;
        /// Accessibly by anyone in the Assembly
        const ASSEMBLY = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessibly by sub-types anywhere, plus anyone in assembly
        const FAM_OR_ASSEM = 0x0005;
        /// Accessibly by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Field can only be initialized, not written to after init
        const INIT_ONLY = 0x0020;
        /// Value is compile time constant
        const LITERAL = 0x0040;
        /// Field should not be serialized when type is remoted
        const NOT_SERIALIZED = 0x0080;
        /// Field has RVA
        const HAS_FIELD_RVA = 0x0100;
        /// Field is special
        const SPECIAL_NAME = 0x0200;
        /// CLI provides 'special' behavior, depending upon the name of the field
        const RTSPECIAL_NAME = 0x0400;
        /// Field has marshalling information
        const HAS_FIELD_MARSHAL = 0x1000;
        /// Implementation is forwarded through `PInvoke`
        const PINVOKE_IMPL = 0x2000;
        /// Field has default
        const HAS_DEFAULT = 0x8000;
    }
}

impl FieldAttributes {
    /// The access level bits
    #[must_use]
    pub fn access(self) -> FieldAttributes {
        FieldAttributes::from_bits_truncate(self.bits() & FIELD_ACCESS_MASK)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Type attributes; visibility and class semantics are masked values
    pub struct TypeAttributes: u32 {
        /// Type has no public scope
        const NOT_PUBLIC = 0x0000_0000;
        /// Type has public scope
        const PUBLIC = 0x0000_0001;
        /// Nested type with public visibility
        const NESTED_PUBLIC = 0x0000_0002;
        /// Nested type with private visibility
        const NESTED_PRIVATE = 0x0000_0003;
        /// Nested type with family visibility
        const NESTED_FAMILY = 0x0000_0004;
        /// Nested type with assembly visibility
        const NESTED_ASSEMBLY = 0x0000_0005;
        /// Nested type with family and assembly visibility
        const NESTED_FAM_AND_ASSEM = 0x0000_0006;
        /// Nested type with family or assembly visibility
        const NESTED_FAM_OR_ASSEM = 0x0000_0007;
        /// Fields are laid out sequentially
        const SEQUENTIAL_LAYOUT = 0x0000_0008;
        /// Field layout is explicit
        const EXPLICIT_LAYOUT = 0x0000_0010;
        /// Type is an interface
        const INTERFACE = 0x0000_0020;
        /// Class is abstract
        const ABSTRACT = 0x0000_0080;
        /// Class is sealed
        const SEALED = 0x0000_0100;
        /// Class name is special
        const SPECIAL_NAME = 0x0000_0400;
        /// Class is imported
        const IMPORT = 0x0000_1000;
        /// Class is serializable
        const SERIALIZABLE = 0x0000_2000;
        /// Initialize the class before the first static field access
        const BEFORE_FIELD_INIT = 0x0010_0000;
        /// CLI provides 'special' behavior, depending upon the name of the type
        const RTSPECIAL_NAME = 0x0000_0800;
    }
}

impl TypeAttributes {
    /// Returns true if the class semantics bits mark an interface
    #[must_use]
    pub fn is_interface(self) -> bool {
        self.bits() & TYPE_CLASS_SEMANTICS_MASK == TypeAttributes::INTERFACE.bits()
    }

    /// The visibility bits
    #[must_use]
    pub fn visibility(self) -> TypeAttributes {
        TypeAttributes::from_bits_truncate(self.bits() & TYPE_VISIBILITY_MASK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_flag_groups() {
        // public | static | virtual | newslot | hidebysig
        let raw = 0x0006 | 0x0010 | 0x0040 | 0x0100 | 0x0080;

        assert_eq!(
            MethodAccessFlags::from_method_flags(raw),
            MethodAccessFlags::PUBLIC
        );
        assert_eq!(
            MethodVtableFlags::from_method_flags(raw),
            MethodVtableFlags::NEW_SLOT
        );

        let modifiers = MethodModifiers::from_method_flags(raw);
        assert!(modifiers.contains(MethodModifiers::STATIC | MethodModifiers::VIRTUAL));
        assert!(!modifiers.contains(MethodModifiers::ABSTRACT));
    }

    #[test]
    fn test_private_is_not_public() {
        let access = MethodAccessFlags::from_method_flags(0x0001);
        assert_eq!(access, MethodAccessFlags::PRIVATE);
        assert_ne!(access, MethodAccessFlags::PUBLIC);
        assert_ne!(
            MethodAccessFlags::from_method_flags(0x0003),
            MethodAccessFlags::PRIVATE
        );
    }

    #[test]
    fn test_type_and_field_masks() {
        let interface =
            TypeAttributes::PUBLIC | TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT;
        assert!(interface.is_interface());
        assert_eq!(interface.visibility(), TypeAttributes::PUBLIC);
        assert!(!TypeAttributes::SEALED.is_interface());

        let field = FieldAttributes::PRIVATE | FieldAttributes::STATIC | FieldAttributes::INIT_ONLY;
        assert_eq!(field.access(), FieldAttributes::PRIVATE);
    }
}
