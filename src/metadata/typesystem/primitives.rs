//! Built-in primitive types of the runtime.
//!
//! Primitives are closed leaves of the type graph: they never contain a generic parameter and
//! substitution always returns them unchanged. Their `FullName` is the IL keyword (`int32`,
//! `string`, ...) rather than the `System.*` name, matching how signatures are usually printed.

use std::fmt;

use strum::{EnumCount, EnumIter, IntoEnumIterator};

/// The primitive element types of ECMA-335 signatures (§II.23.1.16)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum CilPrimitiveKind {
    /// System.Void - represents no value
    Void,
    /// System.Boolean - true/false value
    Boolean,
    /// System.Char - Unicode 16-bit character
    Char,
    /// System.SByte - signed 8-bit integer
    I1,
    /// System.Byte - unsigned 8-bit integer
    U1,
    /// System.Int16 - signed 16-bit integer
    I2,
    /// System.UInt16 - unsigned 16-bit integer
    U2,
    /// System.Int32 - signed 32-bit integer
    I4,
    /// System.UInt32 - unsigned 32-bit integer
    U4,
    /// System.Int64 - signed 64-bit integer
    I8,
    /// System.UInt64 - unsigned 64-bit integer
    U8,
    /// System.Single - 32-bit floating point
    R4,
    /// System.Double - 64-bit floating point
    R8,
    /// System.IntPtr - native sized signed integer
    I,
    /// System.UIntPtr - native sized unsigned integer
    U,
    /// System.Object - base class for all reference types
    Object,
    /// System.String - immutable string of Unicode characters
    String,
    /// System.TypedReference - type-safe pointer (used by compiler)
    TypedReference,
}

impl CilPrimitiveKind {
    /// The IL keyword used when printing this primitive
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            CilPrimitiveKind::Void => "void",
            CilPrimitiveKind::Boolean => "bool",
            CilPrimitiveKind::Char => "char",
            CilPrimitiveKind::I1 => "int8",
            CilPrimitiveKind::U1 => "uint8",
            CilPrimitiveKind::I2 => "int16",
            CilPrimitiveKind::U2 => "uint16",
            CilPrimitiveKind::I4 => "int32",
            CilPrimitiveKind::U4 => "uint32",
            CilPrimitiveKind::I8 => "int64",
            CilPrimitiveKind::U8 => "uint64",
            CilPrimitiveKind::R4 => "float32",
            CilPrimitiveKind::R8 => "float64",
            CilPrimitiveKind::I => "native int",
            CilPrimitiveKind::U => "native uint",
            CilPrimitiveKind::Object => "object",
            CilPrimitiveKind::String => "string",
            CilPrimitiveKind::TypedReference => "typedref",
        }
    }

    /// Get the namespace of the runtime type backing this primitive
    #[must_use]
    pub fn namespace(&self) -> &'static str {
        "System"
    }

    /// Get the short name (without namespace) of the runtime type backing this primitive
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CilPrimitiveKind::Void => "Void",
            CilPrimitiveKind::Boolean => "Boolean",
            CilPrimitiveKind::Char => "Char",
            CilPrimitiveKind::I1 => "SByte",
            CilPrimitiveKind::U1 => "Byte",
            CilPrimitiveKind::I2 => "Int16",
            CilPrimitiveKind::U2 => "UInt16",
            CilPrimitiveKind::I4 => "Int32",
            CilPrimitiveKind::U4 => "UInt32",
            CilPrimitiveKind::I8 => "Int64",
            CilPrimitiveKind::U8 => "UInt64",
            CilPrimitiveKind::R4 => "Single",
            CilPrimitiveKind::R8 => "Double",
            CilPrimitiveKind::I => "IntPtr",
            CilPrimitiveKind::U => "UIntPtr",
            CilPrimitiveKind::Object => "Object",
            CilPrimitiveKind::String => "String",
            CilPrimitiveKind::TypedReference => "TypedReference",
        }
    }

    /// Look up the primitive backing a `System.*` runtime type, if any
    ///
    /// ## Arguments
    /// * 'namespace' - The namespace of the named type
    /// * 'name'      - The simple name of the named type
    #[must_use]
    pub fn from_runtime_name(namespace: &str, name: &str) -> Option<Self> {
        if namespace != "System" {
            return None;
        }

        CilPrimitiveKind::iter().find(|kind| kind.name() == name)
    }

    /// Check if this primitive is a value type
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        !matches!(
            self,
            CilPrimitiveKind::Void | CilPrimitiveKind::Object | CilPrimitiveKind::String
        )
    }
}

impl fmt::Display for CilPrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_unique() {
        let mut keywords: Vec<_> = CilPrimitiveKind::iter().map(|k| k.keyword()).collect();
        keywords.sort_unstable();
        keywords.dedup();
        assert_eq!(keywords.len(), CilPrimitiveKind::COUNT);
    }

    #[test]
    fn test_value_types() {
        assert!(CilPrimitiveKind::I4.is_value_type());
        assert!(CilPrimitiveKind::Boolean.is_value_type());
        assert!(CilPrimitiveKind::TypedReference.is_value_type());
        assert!(!CilPrimitiveKind::String.is_value_type());
        assert!(!CilPrimitiveKind::Object.is_value_type());
        assert!(!CilPrimitiveKind::Void.is_value_type());
    }

    #[test]
    fn test_from_runtime_name() {
        assert_eq!(
            CilPrimitiveKind::from_runtime_name("System", "Int32"),
            Some(CilPrimitiveKind::I4)
        );
        assert_eq!(
            CilPrimitiveKind::from_runtime_name("System", "String"),
            Some(CilPrimitiveKind::String)
        );
        assert_eq!(CilPrimitiveKind::from_runtime_name("Other", "Int32"), None);
        assert_eq!(CilPrimitiveKind::from_runtime_name("System", "Guid"), None);
    }

    #[test]
    fn test_display_uses_keyword() {
        assert_eq!(CilPrimitiveKind::I4.to_string(), "int32");
        assert_eq!(CilPrimitiveKind::I.to_string(), "native int");
    }
}
