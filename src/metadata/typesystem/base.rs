//! The type reference model.
//!
//! A [`TypeNode`] is a reference to a type. Leaves are primitives, named types and generic
//! parameters; every other variant is a composite specification wrapping exactly one element
//! (plus a modifier, an argument list or a signature, depending on the variant). Nodes are shared
//! through [`TypeRc`] and never mutated once built, which is what allows substitution to signal
//! "nothing changed" by handing back the very same `Arc`.
//!
//! # Naming
//!
//! `full_name` follows the textual conventions used by IL disassemblers:
//!
//! | Variant            | Example                         |
//! |--------------------|---------------------------------|
//! | Primitive          | `int32`                         |
//! | Named (nested)     | `System.Outer/Inner`            |
//! | Pointer            | `int32*`                        |
//! | ByReference        | `int32&`                        |
//! | Pinned / Sentinel  | element name, unchanged         |
//! | Modifiers          | `int32 modreq(System.IsVolatile)` |
//! | Array              | `int32[]`, `int32[,]`           |
//! | Generic instance   | `System.Collections.Generic.List`1<string>` |
//! | Function pointer   | `method void *(int32)`          |

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use crate::{
    error::{invalid_argument, not_supported},
    metadata::{members::FunctionPointerType, typesystem::CilPrimitiveKind},
    Result,
};

/// A reference counted `TypeNode`
pub type TypeRc = Arc<TypeNode>;
/// A list of `TypeNode` references
pub type TypeList = Vec<TypeRc>;

static NEXT_METHOD_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a declared method, used as the provider key of its generic
/// parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(u64);

impl MethodId {
    /// Allocate a fresh identity
    #[must_use]
    pub fn next() -> Self {
        MethodId(NEXT_METHOD_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw value of this identity
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Identity of a named type: two references with equal identities denote the same entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeIdentity {
    /// Module or assembly the type belongs to
    pub scope: Option<String>,
    /// Namespace, empty for nested types and the global namespace
    pub namespace: String,
    /// Simple name, including the arity suffix (e.g. "List`1")
    pub name: String,
    /// Full name of the enclosing type for nested types
    pub enclosing: Option<String>,
    /// Number of generic parameters the type declares
    pub arity: usize,
}

impl TypeIdentity {
    /// The full name this identity renders as (`Namespace.Name` or `Outer/Inner`)
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.enclosing {
            Some(enclosing) => format!("{}/{}", enclosing, self.name),
            None if self.namespace.is_empty() => self.name.clone(),
            None => format!("{}.{}", self.namespace, self.name),
        }
    }
}

/// The entity that declares a generic parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParameterProvider {
    /// A generic type (`!n` parameters)
    Type(TypeIdentity),
    /// A generic method (`!!n` parameters)
    Method(MethodId),
}

impl ParameterProvider {
    /// Returns true if the provider is a method
    #[must_use]
    pub fn is_method(&self) -> bool {
        matches!(self, ParameterProvider::Method(_))
    }
}

/// A placeholder for a type argument
///
/// Two generic parameters denote the same placeholder iff their provider and position match;
/// the textual name is informational only.
#[derive(Debug, Clone)]
pub struct GenericParameter {
    name: String,
    position: usize,
    provider: ParameterProvider,
}

impl GenericParameter {
    /// Create a new generic parameter
    ///
    /// ## Arguments
    /// * 'name'     - The declared name (e.g. "T")
    /// * 'position' - Zero-based position in the provider's parameter list
    /// * 'provider' - The type or method declaring the parameter
    #[must_use]
    pub fn new(name: impl Into<String>, position: usize, provider: ParameterProvider) -> Self {
        GenericParameter {
            name: name.into(),
            position,
            provider,
        }
    }

    /// The declared name of the parameter
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based position of the parameter
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The entity declaring the parameter
    #[must_use]
    pub fn provider(&self) -> &ParameterProvider {
        &self.provider
    }
}

impl PartialEq for GenericParameter {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.provider == other.provider
    }
}

impl Eq for GenericParameter {}

/// A reference to a named type (class, interface, value type, enum or delegate)
#[derive(Debug)]
pub struct NamedType {
    pub(crate) declaring_type: Option<TypeRc>,
    pub(crate) is_value_type: bool,
    pub(crate) generic_parameters: TypeList,
    pub(crate) identity: TypeIdentity,
}

impl NamedType {
    /// The module or assembly that owns the type, if known
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.identity.scope.as_deref()
    }

    /// The namespace of the type
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.identity.namespace
    }

    /// The simple name of the type
    #[must_use]
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// The enclosing type of a nested type
    #[must_use]
    pub fn declaring_type(&self) -> Option<&TypeRc> {
        self.declaring_type.as_ref()
    }

    /// The generic parameter nodes this type declares, in positional order
    #[must_use]
    pub fn generic_parameters(&self) -> &[TypeRc] {
        &self.generic_parameters
    }

    /// The identity of this type
    #[must_use]
    pub fn identity(&self) -> &TypeIdentity {
        &self.identity
    }
}

/// Bounds of a single array dimension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArrayDimension {
    /// Lower bound, if specified
    pub lower_bound: Option<i32>,
    /// Upper bound, if specified
    pub upper_bound: Option<i32>,
}

impl ArrayDimension {
    /// Create a dimension with explicit bounds
    #[must_use]
    pub fn new(lower_bound: Option<i32>, upper_bound: Option<i32>) -> Self {
        ArrayDimension {
            lower_bound,
            upper_bound,
        }
    }

    /// Returns true if either bound is known
    #[must_use]
    pub fn is_sized(&self) -> bool {
        self.lower_bound.is_some() || self.upper_bound.is_some()
    }
}

impl fmt::Display for ArrayDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_sized() {
            return Ok(());
        }

        if let Some(lower) = self.lower_bound {
            write!(f, "{}", lower)?;
        }
        f.write_str("...")?;
        if let Some(upper) = self.upper_bound {
            write!(f, "{}", upper)?;
        }
        Ok(())
    }
}

/// An array specification
#[derive(Debug)]
pub struct ArrayType {
    pub(crate) element: TypeRc,
    pub(crate) dimensions: Vec<ArrayDimension>,
}

impl ArrayType {
    /// The element type of the array
    #[must_use]
    pub fn element(&self) -> &TypeRc {
        &self.element
    }

    /// The number of dimensions
    #[must_use]
    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    /// The dimension bounds
    #[must_use]
    pub fn dimensions(&self) -> &[ArrayDimension] {
        &self.dimensions
    }

    /// Returns true for a single-dimension, zero-based array without bounds
    #[must_use]
    pub fn is_vector(&self) -> bool {
        self.dimensions.len() == 1 && !self.dimensions[0].is_sized()
    }
}

/// A custom modifier (`modreq` / `modopt`) applied to an element type
#[derive(Debug)]
pub struct ModifierType {
    pub(crate) modifier: TypeRc,
    pub(crate) element: TypeRc,
}

impl ModifierType {
    /// The modifier type (e.g. `System.Runtime.CompilerServices.IsVolatile`)
    #[must_use]
    pub fn modifier(&self) -> &TypeRc {
        &self.modifier
    }

    /// The modified element type
    #[must_use]
    pub fn element(&self) -> &TypeRc {
        &self.element
    }
}

/// A generic type instantiated with concrete (or still generic) arguments
#[derive(Debug)]
pub struct GenericInstanceType {
    pub(crate) element: TypeRc,
    pub(crate) arguments: TypeList,
}

impl GenericInstanceType {
    /// The open generic type being instantiated
    #[must_use]
    pub fn element(&self) -> &TypeRc {
        &self.element
    }

    /// The type arguments, positionally matching the element's generic parameters
    #[must_use]
    pub fn arguments(&self) -> &[TypeRc] {
        &self.arguments
    }

    /// The provider whose parameters the arguments bind
    #[must_use]
    pub fn provider(&self) -> Option<ParameterProvider> {
        match self.element.as_ref() {
            TypeNode::Named(named) => Some(ParameterProvider::Type(named.identity.clone())),
            _ => None,
        }
    }
}

/// A reference to a type
#[derive(Debug)]
pub enum TypeNode {
    /// A built-in primitive
    Primitive(CilPrimitiveKind),
    /// A named class, interface or value type
    Named(NamedType),
    /// A generic type or method parameter
    GenericParameter(GenericParameter),
    /// An unmanaged pointer (`T*`)
    Pointer(TypeRc),
    /// A managed reference (`T&`)
    ByReference(TypeRc),
    /// A pinned local marker
    Pinned(TypeRc),
    /// The vararg sentinel marker
    Sentinel(TypeRc),
    /// A required custom modifier
    RequiredModifier(ModifierType),
    /// An optional custom modifier
    OptionalModifier(ModifierType),
    /// A function pointer with its own signature
    FunctionPointer(FunctionPointerType),
    /// A generic instantiation
    GenericInstance(GenericInstanceType),
    /// An array
    Array(ArrayType),
}

impl TypeNode {
    /// Create a primitive leaf
    #[must_use]
    pub fn primitive(kind: CilPrimitiveKind) -> TypeRc {
        Arc::new(TypeNode::Primitive(kind))
    }

    /// Create a generic parameter leaf
    ///
    /// ## Arguments
    /// * 'name'     - The declared name
    /// * 'position' - Zero-based position
    /// * 'provider' - The declaring type or method
    #[must_use]
    pub fn generic_parameter(
        name: impl Into<String>,
        position: usize,
        provider: ParameterProvider,
    ) -> TypeRc {
        Arc::new(TypeNode::GenericParameter(GenericParameter::new(
            name, position, provider,
        )))
    }

    /// Create an unmanaged pointer to `element`
    #[must_use]
    pub fn pointer(element: &TypeRc) -> TypeRc {
        Arc::new(TypeNode::Pointer(element.clone()))
    }

    /// Create a managed reference to `element`
    #[must_use]
    pub fn by_reference(element: &TypeRc) -> TypeRc {
        Arc::new(TypeNode::ByReference(element.clone()))
    }

    /// Mark `element` as pinned
    #[must_use]
    pub fn pinned(element: &TypeRc) -> TypeRc {
        Arc::new(TypeNode::Pinned(element.clone()))
    }

    /// Mark `element` as the first vararg parameter
    #[must_use]
    pub fn sentinel(element: &TypeRc) -> TypeRc {
        Arc::new(TypeNode::Sentinel(element.clone()))
    }

    /// Apply a required custom modifier to `element`
    #[must_use]
    pub fn required_modifier(modifier: &TypeRc, element: &TypeRc) -> TypeRc {
        Arc::new(TypeNode::RequiredModifier(ModifierType {
            modifier: modifier.clone(),
            element: element.clone(),
        }))
    }

    /// Apply an optional custom modifier to `element`
    #[must_use]
    pub fn optional_modifier(modifier: &TypeRc, element: &TypeRc) -> TypeRc {
        Arc::new(TypeNode::OptionalModifier(ModifierType {
            modifier: modifier.clone(),
            element: element.clone(),
        }))
    }

    /// Create a single-dimension, zero-based array of `element`
    #[must_use]
    pub fn sz_array(element: &TypeRc) -> TypeRc {
        Arc::new(TypeNode::Array(ArrayType {
            element: element.clone(),
            dimensions: vec![ArrayDimension::default()],
        }))
    }

    /// Create an array of `element` with `rank` unbounded dimensions
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `rank` is zero
    pub fn array(element: &TypeRc, rank: usize) -> Result<TypeRc> {
        Self::array_with_dimensions(element, vec![ArrayDimension::default(); rank])
    }

    /// Create an array of `element` with explicit dimension bounds
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `dimensions` is empty
    pub fn array_with_dimensions(
        element: &TypeRc,
        dimensions: Vec<ArrayDimension>,
    ) -> Result<TypeRc> {
        if dimensions.is_empty() {
            return Err(invalid_argument!("array rank must be at least 1"));
        }

        Ok(Arc::new(TypeNode::Array(ArrayType {
            element: element.clone(),
            dimensions,
        })))
    }

    /// Wrap a function pointer signature into a type node
    #[must_use]
    pub fn function_pointer(signature: FunctionPointerType) -> TypeRc {
        Arc::new(TypeNode::FunctionPointer(signature))
    }

    /// Instantiate the generic named type `element` with `arguments`
    ///
    /// ## Arguments
    /// * 'element'   - An open generic named type
    /// * 'arguments' - One argument per generic parameter of `element`
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `element` is not a named type or the
    /// argument count does not match its generic arity
    pub fn generic_instance(element: &TypeRc, arguments: TypeList) -> Result<TypeRc> {
        let TypeNode::Named(named) = element.as_ref() else {
            return Err(invalid_argument!(
                "generic instance element must be a named type, got '{}'",
                element.full_name()
            ));
        };

        if named.generic_parameters.len() != arguments.len() {
            return Err(invalid_argument!(
                "'{}' declares {} generic parameters but {} arguments were supplied",
                element.full_name(),
                named.generic_parameters.len(),
                arguments.len()
            ));
        }

        Ok(Self::instance_unchecked(element.clone(), arguments))
    }

    pub(crate) fn instance_unchecked(element: TypeRc, arguments: TypeList) -> TypeRc {
        Arc::new(TypeNode::GenericInstance(GenericInstanceType {
            element,
            arguments,
        }))
    }

    /// The simple name of the type
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            TypeNode::Primitive(kind) => kind.keyword().to_string(),
            TypeNode::Named(named) => named.identity.name.clone(),
            TypeNode::GenericParameter(param) => param.name.clone(),
            TypeNode::Pointer(element) => format!("{}*", element.name()),
            TypeNode::ByReference(element) => format!("{}&", element.name()),
            TypeNode::Pinned(element) | TypeNode::Sentinel(element) => element.name(),
            TypeNode::RequiredModifier(modifier) => format!(
                "{} modreq({})",
                modifier.element.name(),
                modifier.modifier.full_name()
            ),
            TypeNode::OptionalModifier(modifier) => format!(
                "{} modopt({})",
                modifier.element.name(),
                modifier.modifier.full_name()
            ),
            TypeNode::FunctionPointer(_) => "method".to_string(),
            TypeNode::GenericInstance(instance) => instance.element.name(),
            TypeNode::Array(array) => format!("{}{}", array.element.name(), array_suffix(array)),
        }
    }

    /// The full, human-readable name of the type
    #[must_use]
    pub fn full_name(&self) -> String {
        let mut out = String::new();
        self.write_full_name(&mut out);
        out
    }

    fn write_full_name(&self, out: &mut String) {
        match self {
            TypeNode::Primitive(kind) => out.push_str(kind.keyword()),
            TypeNode::Named(named) => match &named.declaring_type {
                Some(declaring) => {
                    declaring.write_full_name(out);
                    out.push('/');
                    out.push_str(&named.identity.name);
                }
                None => out.push_str(&named.identity.full_name()),
            },
            TypeNode::GenericParameter(param) => out.push_str(&param.name),
            TypeNode::Pointer(element) => {
                element.write_full_name(out);
                out.push('*');
            }
            TypeNode::ByReference(element) => {
                element.write_full_name(out);
                out.push('&');
            }
            TypeNode::Pinned(element) | TypeNode::Sentinel(element) => {
                element.write_full_name(out);
            }
            TypeNode::RequiredModifier(modifier) => {
                modifier.element.write_full_name(out);
                out.push_str(" modreq(");
                modifier.modifier.write_full_name(out);
                out.push(')');
            }
            TypeNode::OptionalModifier(modifier) => {
                modifier.element.write_full_name(out);
                out.push_str(" modopt(");
                modifier.modifier.write_full_name(out);
                out.push(')');
            }
            TypeNode::FunctionPointer(signature) => {
                out.push_str(&signature.full_name());
            }
            TypeNode::GenericInstance(instance) => {
                instance.element.write_full_name(out);
                out.push('<');
                for (index, argument) in instance.arguments.iter().enumerate() {
                    if index > 0 {
                        out.push(',');
                    }
                    argument.write_full_name(out);
                }
                out.push('>');
            }
            TypeNode::Array(array) => {
                array.element.write_full_name(out);
                out.push_str(&array_suffix(array));
            }
        }
    }

    /// Returns true if instances of this type are value types
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        match self {
            TypeNode::Primitive(kind) => kind.is_value_type(),
            TypeNode::Named(named) => named.is_value_type,
            TypeNode::Pinned(element) | TypeNode::Sentinel(element) => element.is_value_type(),
            TypeNode::RequiredModifier(modifier) | TypeNode::OptionalModifier(modifier) => {
                modifier.element.is_value_type()
            }
            TypeNode::GenericInstance(instance) => instance.element.is_value_type(),
            TypeNode::GenericParameter(_)
            | TypeNode::Pointer(_)
            | TypeNode::ByReference(_)
            | TypeNode::FunctionPointer(_)
            | TypeNode::Array(_) => false,
        }
    }

    /// Returns true if this node is, or transitively contains, a generic parameter
    ///
    /// Computed on every call; nodes do not cache it.
    #[must_use]
    pub fn contains_generic_parameter(&self) -> bool {
        match self {
            TypeNode::Primitive(_) => false,
            TypeNode::Named(named) => named
                .declaring_type
                .as_ref()
                .is_some_and(|declaring| declaring.contains_generic_parameter()),
            TypeNode::GenericParameter(_) => true,
            TypeNode::Pointer(element)
            | TypeNode::ByReference(element)
            | TypeNode::Pinned(element)
            | TypeNode::Sentinel(element) => element.contains_generic_parameter(),
            TypeNode::RequiredModifier(modifier) | TypeNode::OptionalModifier(modifier) => {
                modifier.modifier.contains_generic_parameter()
                    || modifier.element.contains_generic_parameter()
            }
            TypeNode::FunctionPointer(signature) => signature.contains_generic_parameter(),
            TypeNode::GenericInstance(instance) => {
                instance
                    .arguments
                    .iter()
                    .any(|argument| argument.contains_generic_parameter())
                    || instance.element.contains_generic_parameter()
            }
            TypeNode::Array(array) => array.element.contains_generic_parameter(),
        }
    }

    /// The directly wrapped element of a composite specification
    #[must_use]
    pub fn element(&self) -> Option<&TypeRc> {
        match self {
            TypeNode::Pointer(element)
            | TypeNode::ByReference(element)
            | TypeNode::Pinned(element)
            | TypeNode::Sentinel(element) => Some(element),
            TypeNode::RequiredModifier(modifier) | TypeNode::OptionalModifier(modifier) => {
                Some(&modifier.element)
            }
            TypeNode::GenericInstance(instance) => Some(&instance.element),
            TypeNode::Array(array) => Some(&array.element),
            TypeNode::Primitive(_)
            | TypeNode::Named(_)
            | TypeNode::GenericParameter(_)
            | TypeNode::FunctionPointer(_) => None,
        }
    }

    /// The innermost element type; leaves and function pointers return themselves
    #[must_use]
    pub fn element_type(self: &Arc<Self>) -> TypeRc {
        let mut current = self.clone();
        while let Some(element) = current.element().cloned() {
            current = element;
        }
        current
    }

    /// The type declaring this one
    ///
    /// For a generic instance this is the element's declaring type, never a reconstruction
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeRc> {
        match self {
            TypeNode::Named(named) => named.declaring_type.clone(),
            TypeNode::GenericInstance(instance) => instance.element.declaring_type(),
            _ => None,
        }
    }

    /// Declaring types are fixed when a node is built
    ///
    /// # Errors
    /// Always returns [`crate::Error::NotSupported`]
    pub fn set_declaring_type(&self, _declaring_type: &TypeRc) -> Result<()> {
        Err(not_supported!(
            "the declaring type of '{}' is derived and cannot be set",
            self.full_name()
        ))
    }

    /// The generic parameters declared by a named type
    #[must_use]
    pub fn generic_parameters(&self) -> &[TypeRc] {
        match self {
            TypeNode::Named(named) => &named.generic_parameters,
            _ => &[],
        }
    }

    /// Returns true if this named type declares generic parameters
    #[must_use]
    pub fn has_generic_parameters(&self) -> bool {
        !self.generic_parameters().is_empty()
    }

    /// The arguments of a generic instance
    #[must_use]
    pub fn generic_arguments(&self) -> &[TypeRc] {
        match self {
            TypeNode::GenericInstance(instance) => &instance.arguments,
            _ => &[],
        }
    }

    /// The identity of the named type at the root of this node, if any
    #[must_use]
    pub fn identity(&self) -> Option<&TypeIdentity> {
        match self {
            TypeNode::Named(named) => Some(&named.identity),
            TypeNode::FunctionPointer(_)
            | TypeNode::Primitive(_)
            | TypeNode::GenericParameter(_) => None,
            _ => self.element().and_then(|element| element.identity()),
        }
    }

    /// The owning scope of the innermost named type
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.identity()
            .and_then(|identity| identity.scope.as_deref())
    }

    /// The namespace of the innermost named type (empty otherwise)
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.identity()
            .map_or("", |identity| identity.namespace.as_str())
    }

    /// Returns true for primitive leaves
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeNode::Primitive(_))
    }

    /// Returns true for named types
    #[must_use]
    pub fn is_named(&self) -> bool {
        matches!(self, TypeNode::Named(_))
    }

    /// Returns true for generic parameters
    #[must_use]
    pub fn is_generic_parameter(&self) -> bool {
        matches!(self, TypeNode::GenericParameter(_))
    }

    /// Returns true for unmanaged pointers
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeNode::Pointer(_))
    }

    /// Returns true for managed references
    #[must_use]
    pub fn is_by_reference(&self) -> bool {
        matches!(self, TypeNode::ByReference(_))
    }

    /// Returns true for pinned markers
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        matches!(self, TypeNode::Pinned(_))
    }

    /// Returns true for vararg sentinels
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        matches!(self, TypeNode::Sentinel(_))
    }

    /// Returns true for required modifiers
    #[must_use]
    pub fn is_required_modifier(&self) -> bool {
        matches!(self, TypeNode::RequiredModifier(_))
    }

    /// Returns true for optional modifiers
    #[must_use]
    pub fn is_optional_modifier(&self) -> bool {
        matches!(self, TypeNode::OptionalModifier(_))
    }

    /// Returns true for function pointers
    #[must_use]
    pub fn is_function_pointer(&self) -> bool {
        matches!(self, TypeNode::FunctionPointer(_))
    }

    /// Returns true for generic instances
    #[must_use]
    pub fn is_generic_instance(&self) -> bool {
        matches!(self, TypeNode::GenericInstance(_))
    }

    /// Returns true for arrays
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, TypeNode::Array(_))
    }

    /// Returns true for composite specifications
    #[must_use]
    pub fn is_specification(&self) -> bool {
        !matches!(
            self,
            TypeNode::Primitive(_) | TypeNode::Named(_) | TypeNode::GenericParameter(_)
        )
    }
}

fn array_suffix(array: &ArrayType) -> String {
    if array.is_vector() {
        return "[]".to_string();
    }

    let dimensions: Vec<String> = array.dimensions.iter().map(ToString::to_string).collect();
    format!("[{}]", dimensions.join(","))
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::TypeBuilder;

    #[test]
    fn test_composite_names() {
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);
        let volatile = TypeBuilder::class("System.Runtime.CompilerServices", "IsVolatile").build();

        assert_eq!(TypeNode::pointer(&int32).full_name(), "int32*");
        assert_eq!(TypeNode::by_reference(&int32).full_name(), "int32&");
        assert_eq!(TypeNode::pinned(&int32).full_name(), "int32");
        assert_eq!(TypeNode::sentinel(&int32).full_name(), "int32");
        assert_eq!(
            TypeNode::required_modifier(&volatile, &int32).full_name(),
            "int32 modreq(System.Runtime.CompilerServices.IsVolatile)"
        );
        assert_eq!(
            TypeNode::optional_modifier(&volatile, &int32).full_name(),
            "int32 modopt(System.Runtime.CompilerServices.IsVolatile)"
        );
    }

    #[test]
    fn test_array_names() {
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);

        assert_eq!(TypeNode::sz_array(&int32).full_name(), "int32[]");
        assert_eq!(TypeNode::array(&int32, 2).unwrap().full_name(), "int32[,]");

        let bounded = TypeNode::array_with_dimensions(
            &int32,
            vec![ArrayDimension::new(Some(0), Some(5))],
        )
        .unwrap();
        assert_eq!(bounded.full_name(), "int32[0...5]");

        assert!(matches!(
            TypeNode::array(&int32, 0),
            Err(crate::Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_nested_names() {
        let outer = TypeBuilder::class("Sample", "Outer").build();
        let inner = TypeBuilder::class("", "Inner").nested_in(&outer).build();

        assert_eq!(inner.full_name(), "Sample.Outer/Inner");
        assert_eq!(inner.name(), "Inner");
        assert!(Arc::ptr_eq(&inner.declaring_type().unwrap(), &outer));
    }

    #[test]
    fn test_generic_instance_validation() {
        let list = TypeBuilder::class("System.Collections.Generic", "List`1")
            .generic_parameters(["T"])
            .build();
        let string = TypeNode::primitive(CilPrimitiveKind::String);

        let instance = TypeNode::generic_instance(&list, vec![string.clone()]).unwrap();
        assert_eq!(
            instance.full_name(),
            "System.Collections.Generic.List`1<string>"
        );
        assert_eq!(instance.name(), "List`1");

        assert!(matches!(
            TypeNode::generic_instance(&list, vec![]),
            Err(crate::Error::InvalidArgument(_))
        ));
        assert!(matches!(
            TypeNode::generic_instance(&string, vec![]),
            Err(crate::Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_generic_instance_declaring_type() {
        let outer = TypeBuilder::class("Sample", "Outer`1")
            .generic_parameters(["T"])
            .build();
        let inner = TypeBuilder::class("", "Inner`1")
            .nested_in(&outer)
            .generic_parameters(["T"])
            .build();
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);

        let instance = TypeNode::generic_instance(&inner, vec![int32]).unwrap();
        assert!(Arc::ptr_eq(&instance.declaring_type().unwrap(), &outer));
        assert!(matches!(
            instance.set_declaring_type(&outer),
            Err(crate::Error::NotSupported(_))
        ));
    }

    #[test]
    fn test_contains_generic_parameter() {
        let list = TypeBuilder::class("System.Collections.Generic", "List`1")
            .generic_parameters(["T"])
            .build();
        let t = list.generic_parameters()[0].clone();
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);

        assert!(!list.contains_generic_parameter());
        assert!(t.contains_generic_parameter());
        assert!(TypeNode::pointer(&t).contains_generic_parameter());
        assert!(TypeNode::sz_array(&t).contains_generic_parameter());
        assert!(TypeNode::optional_modifier(&t, &int32).contains_generic_parameter());

        let open = TypeNode::generic_instance(&list, vec![t]).unwrap();
        let closed = TypeNode::generic_instance(&list, vec![int32]).unwrap();
        assert!(open.contains_generic_parameter());
        assert!(!closed.contains_generic_parameter());
    }

    #[test]
    fn test_element_type_and_predicates() {
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);
        let nested = TypeNode::sz_array(&TypeNode::pointer(&TypeNode::by_reference(&int32)));

        assert!(Arc::ptr_eq(&nested.element_type(), &int32));
        assert!(nested.is_array());
        assert!(nested.is_specification());
        assert!(!int32.is_specification());
        assert!(nested.element().unwrap().is_pointer());
        assert!(int32.is_value_type());
        assert!(!TypeNode::pointer(&int32).is_value_type());
    }

    #[test]
    fn test_generic_parameter_identity() {
        let provider = ParameterProvider::Method(MethodId::next());
        let a = GenericParameter::new("T", 0, provider.clone());
        let b = GenericParameter::new("U", 0, provider);
        let c = GenericParameter::new("T", 0, ParameterProvider::Method(MethodId::next()));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
