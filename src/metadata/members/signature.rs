//! Method signatures shared by method references and function pointer types.
//!
//! # Key Types
//! - [`CallingConvention`]: the calling convention byte of a signature
//! - [`SignatureHeader`]: the mutable `has_this` / `explicit_this` / calling convention triple
//! - [`MethodSignature`]: read access to a complete signature, with derived queries
//! - [`FunctionPointerType`]: the signature carried by a function pointer type node

use std::sync::{
    atomic::{AtomicBool, AtomicU8, Ordering},
    Arc,
};

use strum::{FromRepr, IntoStaticStr};

use crate::metadata::{
    members::{ParamRc, ParameterList, ParameterReference},
    typesystem::TypeRc,
};

/// Calling convention of a method signature (ECMA-335 §II.23.2.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr, IntoStaticStr)]
#[repr(u8)]
pub enum CallingConvention {
    /// Managed default convention
    #[default]
    Default = 0x00,
    /// Unmanaged cdecl
    C = 0x01,
    /// Unmanaged stdcall
    StdCall = 0x02,
    /// Unmanaged thiscall
    ThisCall = 0x03,
    /// Unmanaged fastcall
    FastCall = 0x04,
    /// Managed variable argument list
    VarArg = 0x05,
    /// Generic method
    Generic = 0x10,
}

/// The header flags of a method signature
///
/// Shared between a method and its parameter list so that parameters can compute their
/// `sequence` from the owner's implicit-this state.
#[derive(Debug, Default)]
pub struct SignatureHeader {
    has_this: AtomicBool,
    explicit_this: AtomicBool,
    calling_convention: AtomicU8,
}

impl SignatureHeader {
    /// Create a new header
    ///
    /// ## Arguments
    /// * '`has_this`'           - The method takes an instance receiver
    /// * '`explicit_this`'      - The receiver is listed as an explicit parameter
    /// * '`calling_convention`' - The calling convention
    #[must_use]
    pub fn new(has_this: bool, explicit_this: bool, calling_convention: CallingConvention) -> Self {
        SignatureHeader {
            has_this: AtomicBool::new(has_this),
            explicit_this: AtomicBool::new(explicit_this),
            calling_convention: AtomicU8::new(calling_convention as u8),
        }
    }

    /// The method takes an instance receiver
    pub fn has_this(&self) -> bool {
        self.has_this.load(Ordering::Acquire)
    }

    /// Set whether the method takes an instance receiver
    pub fn set_has_this(&self, value: bool) {
        self.has_this.store(value, Ordering::Release);
    }

    /// The receiver is listed as an explicit parameter
    pub fn explicit_this(&self) -> bool {
        self.explicit_this.load(Ordering::Acquire)
    }

    /// Set whether the receiver is listed as an explicit parameter
    pub fn set_explicit_this(&self, value: bool) {
        self.explicit_this.store(value, Ordering::Release);
    }

    /// The calling convention
    pub fn calling_convention(&self) -> CallingConvention {
        CallingConvention::from_repr(self.calling_convention.load(Ordering::Acquire))
            .unwrap_or_default()
    }

    /// Set the calling convention
    pub fn set_calling_convention(&self, value: CallingConvention) {
        self.calling_convention
            .store(value as u8, Ordering::Release);
    }

    /// `has_this && !explicit_this`
    pub fn has_implicit_this(&self) -> bool {
        self.has_this() && !self.explicit_this()
    }

    /// A detached copy of the current flags
    #[must_use]
    pub fn snapshot(&self) -> SignatureHeader {
        SignatureHeader::new(
            self.has_this(),
            self.explicit_this(),
            self.calling_convention(),
        )
    }
}

/// Read access to a method signature
pub trait MethodSignature {
    /// The method takes an instance receiver
    fn has_this(&self) -> bool;

    /// The receiver is listed as an explicit parameter
    fn explicit_this(&self) -> bool;

    /// The calling convention
    fn calling_convention(&self) -> CallingConvention;

    /// The return type
    fn return_type(&self) -> TypeRc;

    /// The parameters, in declaration order
    fn parameters(&self) -> Vec<ParamRc>;

    /// `has_this && !explicit_this`
    fn has_implicit_this(&self) -> bool {
        self.has_this() && !self.explicit_this()
    }

    /// Returns true if the signature has at least one parameter
    fn has_parameters(&self) -> bool {
        !self.parameters().is_empty()
    }

    /// Returns true for vararg signatures
    fn is_vararg(&self) -> bool {
        self.calling_convention() == CallingConvention::VarArg
    }

    /// Index of the first parameter marked with a sentinel, if any
    fn sentinel_position(&self) -> Option<usize> {
        self.parameters()
            .iter()
            .position(|parameter| parameter.parameter_type().is_sentinel())
    }

    /// The parenthesised parameter list, e.g. `(int32,...,string)`
    fn signature_full_name(&self) -> String {
        let mut out = String::from("(");
        for (index, parameter) in self.parameters().iter().enumerate() {
            if index > 0 {
                out.push(',');
            }

            let parameter_type = parameter.parameter_type();
            if parameter_type.is_sentinel() {
                out.push_str("...,");
            }
            out.push_str(&parameter_type.full_name());
        }
        out.push(')');
        out
    }
}

/// The signature of a function pointer type
///
/// The signature is frozen once the node is built: the header is only reachable as a copy and
/// [`MethodSignature::parameters`] hands out freshly numbered parameters on every call.
#[derive(Debug)]
pub struct FunctionPointerType {
    header: SignatureHeader,
    return_type: TypeRc,
    parameters: Vec<(String, TypeRc)>,
}

impl FunctionPointerType {
    /// Create a static, default-convention function pointer signature without parameters
    ///
    /// ## Arguments
    /// * '`return_type`' - The return type
    #[must_use]
    pub fn new(return_type: &TypeRc) -> Self {
        Self::with_header(SignatureHeader::default(), return_type)
    }

    /// Create a function pointer signature with explicit header flags
    ///
    /// ## Arguments
    /// * 'header'        - The signature flags
    /// * '`return_type`' - The return type
    #[must_use]
    pub fn with_header(header: SignatureHeader, return_type: &TypeRc) -> Self {
        FunctionPointerType {
            header,
            return_type: return_type.clone(),
            parameters: Vec::new(),
        }
    }

    /// Append an unnamed parameter
    #[must_use]
    pub fn parameter(mut self, parameter_type: &TypeRc) -> Self {
        self.parameters
            .push((String::new(), parameter_type.clone()));
        self
    }

    /// A copy of the signature flags
    #[must_use]
    pub fn header(&self) -> SignatureHeader {
        self.header.snapshot()
    }

    /// The declared parameter types, in order
    #[must_use]
    pub fn parameter_types(&self) -> Vec<TypeRc> {
        self.parameters
            .iter()
            .map(|(_, parameter_type)| parameter_type.clone())
            .collect()
    }

    /// Returns true if the return type or any parameter type contains a generic parameter
    #[must_use]
    pub fn contains_generic_parameter(&self) -> bool {
        self.return_type.contains_generic_parameter()
            || self
                .parameters
                .iter()
                .any(|(_, parameter_type)| parameter_type.contains_generic_parameter())
    }

    /// `method <return> *(<parameters>)`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!(
            "method {} *{}",
            self.return_type.full_name(),
            self.signature_full_name()
        )
    }

    /// Build a copy of this signature with replaced types, keeping flags and parameter names
    pub(crate) fn rebuild(&self, return_type: TypeRc, parameter_types: Vec<TypeRc>) -> Self {
        FunctionPointerType {
            header: self.header.snapshot(),
            return_type,
            parameters: self
                .parameters
                .iter()
                .zip(parameter_types)
                .map(|((name, _), parameter_type)| (name.clone(), parameter_type))
                .collect(),
        }
    }
}

impl MethodSignature for FunctionPointerType {
    fn has_this(&self) -> bool {
        self.header.has_this()
    }

    fn explicit_this(&self) -> bool {
        self.header.explicit_this()
    }

    fn calling_convention(&self) -> CallingConvention {
        self.header.calling_convention()
    }

    fn return_type(&self) -> TypeRc {
        self.return_type.clone()
    }

    fn parameters(&self) -> Vec<ParamRc> {
        ParameterList::with_parameters(
            Arc::new(self.header.snapshot()),
            self.parameters
                .iter()
                .map(|(name, parameter_type)| ParameterReference::new(name.clone(), parameter_type)),
        )
        .to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::{CilPrimitiveKind, TypeNode};

    #[test]
    fn test_calling_convention_repr() {
        assert_eq!(
            CallingConvention::from_repr(0x05),
            Some(CallingConvention::VarArg)
        );
        assert_eq!(
            CallingConvention::from_repr(0x10),
            Some(CallingConvention::Generic)
        );
        assert_eq!(CallingConvention::from_repr(0x0F), None);

        let name: &'static str = CallingConvention::StdCall.into();
        assert_eq!(name, "StdCall");
    }

    #[test]
    fn test_header_flags() {
        let header = SignatureHeader::new(true, false, CallingConvention::Default);
        assert!(header.has_implicit_this());

        header.set_explicit_this(true);
        assert!(!header.has_implicit_this());

        header.set_calling_convention(CallingConvention::VarArg);
        assert_eq!(header.calling_convention(), CallingConvention::VarArg);

        let copy = header.snapshot();
        header.set_has_this(false);
        assert!(copy.has_this());
    }

    #[test]
    fn test_function_pointer_naming() {
        let void = TypeNode::primitive(CilPrimitiveKind::Void);
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);
        let string = TypeNode::primitive(CilPrimitiveKind::String);

        let signature = FunctionPointerType::new(&void)
            .parameter(&int32)
            .parameter(&string);
        assert_eq!(signature.full_name(), "method void *(int32,string)");

        let node = TypeNode::function_pointer(signature);
        assert_eq!(node.name(), "method");
        assert!(!node.contains_generic_parameter());
    }

    #[test]
    fn test_sentinel_rendering() {
        let void = TypeNode::primitive(CilPrimitiveKind::Void);
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);
        let double = TypeNode::primitive(CilPrimitiveKind::R8);

        let signature = FunctionPointerType::with_header(
            SignatureHeader::new(false, false, CallingConvention::VarArg),
            &void,
        )
        .parameter(&int32)
        .parameter(&TypeNode::sentinel(&double));

        assert!(signature.is_vararg());
        assert_eq!(signature.sentinel_position(), Some(1));
        assert_eq!(signature.signature_full_name(), "(int32,...,float64)");
    }

    #[test]
    fn test_function_pointer_is_frozen() {
        let void = TypeNode::primitive(CilPrimitiveKind::Void);
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);
        let string = TypeNode::primitive(CilPrimitiveKind::String);

        let node = TypeNode::function_pointer(FunctionPointerType::new(&void).parameter(&int32));
        let TypeNode::FunctionPointer(signature) = node.as_ref() else {
            panic!("expected a function pointer node");
        };

        let parameters = signature.parameters();
        assert_eq!(parameters[0].index(), Some(0));
        assert_eq!(parameters[0].sequence(), Some(0));
        parameters[0].set_parameter_type(&string).unwrap();
        signature.header().set_has_this(true);

        assert!(!signature.has_this());
        assert_eq!(node.full_name(), "method void *(int32)");
        assert_eq!(signature.parameter_types()[0].full_name(), "int32");
    }
}
