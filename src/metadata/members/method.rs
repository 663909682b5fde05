//! Method references and their specifications.
//!
//! [`MethodReference`] is a closed enumeration of the three shapes a method reference can take:
//!
//! - [`MethodMember`]: a plain reference to a declared method, with mutable name, declaring type,
//!   return type, header flags and parameters
//! - [`GenericInstanceMethod`]: a generic method closed over type arguments; everything except
//!   the arguments is read through from the element method
//! - [`ConstructedMethod`]: the runtime view of an element method under a [`CombinedContext`];
//!   typed parts are substituted on every access, nothing is memoized
//!
//! Specifications are immutable with respect to their element: every setter on them fails with
//! [`crate::Error::NotSupported`].

use std::sync::{Arc, OnceLock, RwLock};

use crate::{
    error::{invalid_argument, not_supported},
    metadata::{
        generics::{apply_all, CombinedContext, GenericBinding, GenericContext},
        members::{
            view_is_identity, CallingConvention, MethodDefinitionRc, MethodSignature, ParamRc,
            ParameterList, ParameterReference, SignatureHeader,
        },
        resolver::MetadataResolver,
        typesystem::{CilPrimitiveKind, MethodId, ParameterProvider, TypeList, TypeNode, TypeRc},
    },
    utils::{read_cloned, replace},
    Result,
};

/// A reference counted `MethodReference`
pub type MethodRc = Arc<MethodReference>;
/// A list of `MethodReference`s
pub type MethodList = Vec<MethodRc>;

/// A plain reference to a declared method
#[derive(Debug)]
pub struct MethodMember {
    id: MethodId,
    name: RwLock<String>,
    declaring_type: RwLock<Option<TypeRc>>,
    return_type: RwLock<TypeRc>,
    parameters: ParameterList,
    generic_parameter_names: Vec<String>,
    generic_parameters: OnceLock<TypeList>,
}

impl MethodMember {
    /// The identity used as provider key of this method's generic parameters
    #[must_use]
    pub fn id(&self) -> MethodId {
        self.id
    }

    /// The parameter list, for structural edits
    #[must_use]
    pub fn parameter_list(&self) -> &ParameterList {
        &self.parameters
    }

    /// The generic parameter nodes, created on first access
    #[must_use]
    pub fn generic_parameters(&self) -> &TypeList {
        self.generic_parameters.get_or_init(|| {
            self.generic_parameter_names
                .iter()
                .enumerate()
                .map(|(position, name)| {
                    TypeNode::generic_parameter(
                        name.clone(),
                        position,
                        ParameterProvider::Method(self.id),
                    )
                })
                .collect()
        })
    }
}

/// A generic method closed over type arguments
#[derive(Debug)]
pub struct GenericInstanceMethod {
    element: MethodRc,
    binding: GenericBinding,
}

impl GenericInstanceMethod {
    /// The open generic method
    #[must_use]
    pub fn element(&self) -> &MethodRc {
        &self.element
    }

    /// The type arguments
    #[must_use]
    pub fn arguments(&self) -> &[TypeRc] {
        self.binding.arguments()
    }
}

/// The runtime view of a method under a generic context
#[derive(Debug)]
pub struct ConstructedMethod {
    element: MethodRc,
    context: CombinedContext,
}

impl ConstructedMethod {
    /// The method this view was built from
    #[must_use]
    pub fn element(&self) -> &MethodRc {
        &self.element
    }

    /// The context the view substitutes through
    #[must_use]
    pub fn context(&self) -> &CombinedContext {
        &self.context
    }
}

/// A reference to a method
#[derive(Debug)]
pub enum MethodReference {
    /// A declared method
    Member(MethodMember),
    /// A generic method instantiation
    GenericInstance(GenericInstanceMethod),
    /// A runtime view under a generic context
    Constructed(ConstructedMethod),
}

impl MethodReference {
    /// Close the generic method `element` over `arguments`
    ///
    /// ## Arguments
    /// * 'element'   - A generic method that is not itself an instantiation
    /// * 'arguments' - One argument per generic parameter of `element`
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `element` is not an open generic method or the
    /// argument count does not match its arity
    pub fn generic_instance(element: &MethodRc, arguments: TypeList) -> Result<MethodRc> {
        if element.is_generic_instance() {
            return Err(invalid_argument!(
                "'{}' is already a generic method instance",
                element.full_name()
            ));
        }

        let arity = element.generic_arity();
        if arity == 0 || arity != arguments.len() {
            return Err(invalid_argument!(
                "'{}' declares {} generic parameters but {} arguments were supplied",
                element.full_name(),
                arity,
                arguments.len()
            ));
        }

        Ok(Arc::new(MethodReference::GenericInstance(
            GenericInstanceMethod {
                element: element.clone(),
                binding: GenericBinding::new(ParameterProvider::Method(element.id()), arguments),
            },
        )))
    }

    /// The identity of the innermost declared method
    #[must_use]
    pub fn id(&self) -> MethodId {
        match self {
            MethodReference::Member(member) => member.id,
            MethodReference::GenericInstance(instance) => instance.element.id(),
            MethodReference::Constructed(constructed) => constructed.element.id(),
        }
    }

    /// The directly wrapped method of a specification
    #[must_use]
    pub fn element_method(&self) -> Option<&MethodRc> {
        match self {
            MethodReference::Member(_) => None,
            MethodReference::GenericInstance(instance) => Some(&instance.element),
            MethodReference::Constructed(constructed) => Some(&constructed.element),
        }
    }

    /// The innermost declared method
    #[must_use]
    pub fn get_element_method(self: &Arc<Self>) -> MethodRc {
        let mut current = self.clone();
        while let Some(element) = current.element_method().cloned() {
            current = element;
        }
        current
    }

    /// The method name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            MethodReference::Member(member) => read_cloned(&member.name),
            MethodReference::GenericInstance(instance) => instance.element.name(),
            MethodReference::Constructed(constructed) => constructed.element.name(),
        }
    }

    /// Rename a declared method
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] on specifications
    pub fn set_name(&self, name: impl Into<String>) -> Result<()> {
        match self {
            MethodReference::Member(member) => replace(&member.name, name.into()),
            _ => Err(self.immutable("name")),
        }
    }

    /// The declaring type
    ///
    /// A constructed view is declared by its context's instance type, falling back to the
    /// element's declaring type.
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeRc> {
        match self {
            MethodReference::Member(member) => read_cloned(&member.declaring_type),
            MethodReference::GenericInstance(instance) => instance.element.declaring_type(),
            MethodReference::Constructed(constructed) => constructed
                .context
                .instance_type()
                .cloned()
                .or_else(|| constructed.element.declaring_type()),
        }
    }

    /// Change the declaring type of a declared method
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] on specifications
    pub fn set_declaring_type(&self, declaring_type: &TypeRc) -> Result<()> {
        match self {
            MethodReference::Member(member) => {
                replace(&member.declaring_type, Some(declaring_type.clone()))
            }
            _ => Err(self.immutable("declaring type")),
        }
    }

    /// The return type; substituted for constructed views
    #[must_use]
    pub fn return_type(&self) -> TypeRc {
        match self {
            MethodReference::Member(member) => read_cloned(&member.return_type),
            MethodReference::GenericInstance(instance) => instance.element.return_type(),
            MethodReference::Constructed(constructed) => constructed
                .element
                .return_type()
                .apply_type_arguments(&constructed.context),
        }
    }

    /// Change the return type of a declared method
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] on specifications
    pub fn set_return_type(&self, return_type: &TypeRc) -> Result<()> {
        match self {
            MethodReference::Member(member) => replace(&member.return_type, return_type.clone()),
            _ => Err(self.immutable("return type")),
        }
    }

    /// The signature header of the innermost declared method
    #[must_use]
    pub fn header(&self) -> &Arc<SignatureHeader> {
        match self {
            MethodReference::Member(member) => member.parameters.owner(),
            MethodReference::GenericInstance(instance) => instance.element.header(),
            MethodReference::Constructed(constructed) => constructed.element.header(),
        }
    }

    /// Set whether a declared method takes an instance receiver
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] on specifications
    pub fn set_has_this(&self, value: bool) -> Result<()> {
        self.member("has_this")?.parameters.owner().set_has_this(value);
        Ok(())
    }

    /// Set whether a declared method lists its receiver explicitly
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] on specifications
    pub fn set_explicit_this(&self, value: bool) -> Result<()> {
        self.member("explicit_this")?
            .parameters
            .owner()
            .set_explicit_this(value);
        Ok(())
    }

    /// Set the calling convention of a declared method
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] on specifications
    pub fn set_calling_convention(&self, value: CallingConvention) -> Result<()> {
        self.member("calling convention")?
            .parameters
            .owner()
            .set_calling_convention(value);
        Ok(())
    }

    /// The parameters; freshly substituted for constructed views
    #[must_use]
    pub fn parameters(&self) -> Vec<ParamRc> {
        match self {
            MethodReference::Member(member) => member.parameters.to_vec(),
            MethodReference::GenericInstance(instance) => instance.element.parameters(),
            MethodReference::Constructed(constructed) => ParameterList::with_parameters(
                constructed.element.header().clone(),
                constructed.element.parameters().iter().map(|parameter| {
                    ParameterReference::new(
                        parameter.name(),
                        &parameter
                            .parameter_type()
                            .apply_type_arguments(&constructed.context),
                    )
                }),
            )
            .to_vec(),
        }
    }

    /// Number of parameters
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        match self {
            MethodReference::Member(member) => member.parameters.len(),
            MethodReference::GenericInstance(instance) => instance.element.parameter_count(),
            MethodReference::Constructed(constructed) => constructed.element.parameter_count(),
        }
    }

    /// The parameter list of a declared method, for structural edits
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] on specifications
    pub fn parameter_list(&self) -> Result<&ParameterList> {
        Ok(&self.member("parameters")?.parameters)
    }

    /// Append a parameter to a declared method
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] on specifications, or
    /// [`crate::Error::InvalidArgument`] if `parameter` already belongs to a signature
    pub fn add_parameter(&self, parameter: ParamRc) -> Result<()> {
        self.parameter_list()?.add(parameter)
    }

    /// The generic parameters a declared method owns; empty for specifications
    #[must_use]
    pub fn generic_parameters(&self) -> TypeList {
        match self {
            MethodReference::Member(member) => member.generic_parameters().clone(),
            _ => Vec::new(),
        }
    }

    /// Returns true if this is a declared method with generic parameters
    #[must_use]
    pub fn has_generic_parameters(&self) -> bool {
        match self {
            MethodReference::Member(member) => !member.generic_parameter_names.is_empty(),
            _ => false,
        }
    }

    /// Number of generic parameters of the innermost declared method
    #[must_use]
    pub fn generic_arity(&self) -> usize {
        match self {
            MethodReference::Member(member) => member.generic_parameter_names.len(),
            MethodReference::GenericInstance(instance) => instance.element.generic_arity(),
            MethodReference::Constructed(constructed) => constructed.element.generic_arity(),
        }
    }

    /// The generic arguments; substituted through the context for constructed views
    #[must_use]
    pub fn generic_arguments(&self) -> TypeList {
        match self {
            MethodReference::Member(_) => Vec::new(),
            MethodReference::GenericInstance(instance) => instance.binding.arguments().to_vec(),
            MethodReference::Constructed(constructed) => {
                apply_all(&constructed.element.generic_arguments(), &constructed.context).0
            }
        }
    }

    /// Returns true for generic method instantiations
    #[must_use]
    pub fn is_generic_instance(&self) -> bool {
        matches!(self, MethodReference::GenericInstance(_))
    }

    /// Returns true for constructed views
    #[must_use]
    pub fn is_constructed(&self) -> bool {
        matches!(self, MethodReference::Constructed(_))
    }

    /// The method arguments this reference binds, if any
    #[must_use]
    pub fn method_binding(&self) -> Option<GenericBinding> {
        match self {
            MethodReference::Member(_) => None,
            MethodReference::GenericInstance(instance) => Some(instance.binding.clone()),
            MethodReference::Constructed(_) => {
                let arguments = self.generic_arguments();
                if arguments.is_empty() {
                    None
                } else {
                    Some(GenericBinding::new(
                        ParameterProvider::Method(self.id()),
                        arguments,
                    ))
                }
            }
        }
    }

    /// Returns true if any typed part mentions a generic parameter
    #[must_use]
    pub fn contains_generic_parameter(&self) -> bool {
        match self {
            MethodReference::GenericInstance(instance) => {
                instance
                    .binding
                    .arguments()
                    .iter()
                    .any(|argument| argument.contains_generic_parameter())
                    || instance.element.contains_generic_parameter()
            }
            MethodReference::Member(_) | MethodReference::Constructed(_) => {
                self.declaring_type()
                    .is_some_and(|declaring| declaring.contains_generic_parameter())
                    || self.return_type().contains_generic_parameter()
                    || self
                        .parameters()
                        .iter()
                        .any(|parameter| parameter.contains_generic_parameter())
                    || self
                        .generic_arguments()
                        .iter()
                        .any(|argument| argument.contains_generic_parameter())
            }
        }
    }

    /// `Declaring::Name` plus the generic argument or parameter list
    #[must_use]
    pub fn member_full_name(&self) -> String {
        let mut out = match self.declaring_type() {
            Some(declaring) => format!("{}::{}", declaring.full_name(), self.name()),
            None => self.name(),
        };

        match self {
            MethodReference::Member(member) => {
                push_list(&mut out, member.generic_parameter_names.iter().cloned());
            }
            MethodReference::GenericInstance(instance) => {
                push_list(
                    &mut out,
                    instance.binding.arguments().iter().map(|a| a.full_name()),
                );
            }
            MethodReference::Constructed(constructed) => {
                let arguments = self.generic_arguments();
                if arguments.is_empty() {
                    if let MethodReference::Member(member) = constructed.element.as_ref() {
                        push_list(&mut out, member.generic_parameter_names.iter().cloned());
                    }
                } else {
                    push_list(&mut out, arguments.iter().map(|a| a.full_name()));
                }
            }
        }

        out
    }

    /// `<return> <Declaring::Name><args>(<parameters>)`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!(
            "{} {}{}",
            self.return_type().full_name(),
            self.member_full_name(),
            self.signature_full_name()
        )
    }

    /// Resolve to the declared definition; specifications defer to their element
    ///
    /// # Errors
    /// Returns the resolver's error if the definition cannot be located
    pub fn resolve(
        self: &Arc<Self>,
        resolver: &dyn MetadataResolver,
    ) -> Result<MethodDefinitionRc> {
        match self.as_ref() {
            MethodReference::Member(_) => resolver.resolve_method(self),
            MethodReference::GenericInstance(instance) => instance.element.resolve(resolver),
            MethodReference::Constructed(constructed) => constructed.element.resolve(resolver),
        }
    }

    /// The methods this one explicitly overrides, viewed through this reference's context
    ///
    /// # Errors
    /// Returns the resolver's error if the definition cannot be located
    pub fn overrides(self: &Arc<Self>, resolver: &dyn MetadataResolver) -> Result<MethodList> {
        match self.as_ref() {
            MethodReference::Member(_) => Ok(self.resolve(resolver)?.overrides()),
            MethodReference::GenericInstance(instance) => {
                let context = CombinedContext::for_method(self);
                Ok(instance
                    .element
                    .overrides(resolver)?
                    .iter()
                    .map(|overridden| overridden.runtime_reference_in(&context))
                    .collect())
            }
            MethodReference::Constructed(constructed) => Ok(constructed
                .element
                .overrides(resolver)?
                .iter()
                .map(|overridden| overridden.runtime_reference_in(&constructed.context))
                .collect()),
        }
    }

    /// The reference as the runtime sees it
    ///
    /// Returns `self` unless this is a generic method instance or is declared by a generic type
    /// instance; then the view under this method's own context.
    #[must_use]
    pub fn runtime_reference(self: &Arc<Self>) -> MethodRc {
        let declared_by_instance = self
            .declaring_type()
            .is_some_and(|declaring| declaring.is_generic_instance());

        if !(self.is_generic_instance() || declared_by_instance) {
            return self.clone();
        }

        self.runtime_reference_in(&CombinedContext::for_method(self))
    }

    /// The reference viewed through `context`
    ///
    /// Returns `self` when the view would not differ: nothing mentions a generic parameter and the
    /// context does not move the method to another declaring type.
    #[must_use]
    pub fn runtime_reference_in(self: &Arc<Self>, context: &CombinedContext) -> MethodRc {
        if view_is_identity(
            self.declaring_type().as_ref(),
            context,
            self.contains_generic_parameter(),
        ) {
            return self.clone();
        }

        Arc::new(MethodReference::Constructed(ConstructedMethod {
            element: self.clone(),
            context: context.clone(),
        }))
    }

    fn member(&self, property: &str) -> Result<&MethodMember> {
        match self {
            MethodReference::Member(member) => Ok(member),
            _ => Err(self.immutable(property)),
        }
    }

    fn immutable(&self, property: &str) -> crate::Error {
        not_supported!(
            "cannot set the {} of method specification '{}'",
            property,
            self.member_full_name()
        )
    }
}

impl MethodSignature for MethodReference {
    fn has_this(&self) -> bool {
        self.header().has_this()
    }

    fn explicit_this(&self) -> bool {
        self.header().explicit_this()
    }

    fn calling_convention(&self) -> CallingConvention {
        self.header().calling_convention()
    }

    fn return_type(&self) -> TypeRc {
        MethodReference::return_type(self)
    }

    fn parameters(&self) -> Vec<ParamRc> {
        MethodReference::parameters(self)
    }

    fn has_parameters(&self) -> bool {
        self.parameter_count() > 0
    }
}

fn push_list<I: Iterator<Item = String>>(out: &mut String, items: I) {
    let items: Vec<String> = items.collect();
    if items.is_empty() {
        return;
    }

    out.push('<');
    out.push_str(&items.join(","));
    out.push('>');
}

/// Provides a fluent API for building declared method references
pub struct MethodBuilder {
    id: MethodId,
    name: String,
    declaring_type: Option<TypeRc>,
    return_type: Option<TypeRc>,
    header: SignatureHeader,
    parameters: Vec<(String, TypeRc)>,
    generic_parameters: Vec<String>,
}

impl MethodBuilder {
    /// Start building a static, `void`, parameterless method
    ///
    /// ## Arguments
    /// * 'name' - The method name
    pub fn new(name: impl Into<String>) -> Self {
        MethodBuilder {
            id: MethodId::next(),
            name: name.into(),
            declaring_type: None,
            return_type: None,
            header: SignatureHeader::default(),
            parameters: Vec::new(),
            generic_parameters: Vec::new(),
        }
    }

    /// Set the declaring type
    #[must_use]
    pub fn declaring_type(mut self, declaring_type: &TypeRc) -> Self {
        self.declaring_type = Some(declaring_type.clone());
        self
    }

    /// Set the return type
    #[must_use]
    pub fn returns(mut self, return_type: &TypeRc) -> Self {
        self.return_type = Some(return_type.clone());
        self
    }

    /// Make the method an instance method with an implicit receiver
    #[must_use]
    pub fn instance(self) -> Self {
        self.header.set_has_this(true);
        self
    }

    /// List the receiver explicitly
    #[must_use]
    pub fn explicit_this(self) -> Self {
        self.header.set_explicit_this(true);
        self
    }

    /// Set the calling convention
    #[must_use]
    pub fn calling_convention(self, calling_convention: CallingConvention) -> Self {
        self.header.set_calling_convention(calling_convention);
        self
    }

    /// Append a parameter
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, parameter_type: &TypeRc) -> Self {
        self.parameters.push((name.into(), parameter_type.clone()));
        self
    }

    /// Declare generic parameters by name, in positional order
    #[must_use]
    pub fn generic_parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generic_parameters = names.into_iter().map(Into::into).collect();
        self
    }

    /// A node for the generic parameter at `position`, for use in the signature being built
    #[must_use]
    pub fn generic_parameter(&self, position: usize) -> Option<TypeRc> {
        self.generic_parameters.get(position).map(|name| {
            TypeNode::generic_parameter(name.clone(), position, ParameterProvider::Method(self.id))
        })
    }

    /// Finish building and return the method reference
    #[must_use]
    pub fn build(self) -> MethodRc {
        if !self.generic_parameters.is_empty()
            && self.header.calling_convention() == CallingConvention::Default
        {
            self.header
                .set_calling_convention(CallingConvention::Generic);
        }

        let parameters = ParameterList::with_parameters(
            Arc::new(self.header),
            self.parameters
                .into_iter()
                .map(|(name, parameter_type)| ParameterReference::new(name, &parameter_type)),
        );

        let return_type = self
            .return_type
            .unwrap_or_else(|| TypeNode::primitive(CilPrimitiveKind::Void));

        Arc::new(MethodReference::Member(MethodMember {
            id: self.id,
            name: RwLock::new(self.name),
            declaring_type: RwLock::new(self.declaring_type),
            return_type: RwLock::new(return_type),
            parameters,
            generic_parameter_names: self.generic_parameters,
            generic_parameters: OnceLock::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        members::MethodDefinition,
        token::Token,
        typesystem::{TypeBuilder, TypeRegistry},
    };

    struct Holder {
        holder: TypeRc,
        t: TypeRc,
        int32: TypeRc,
        string: TypeRc,
        closed: TypeRc,
    }

    fn holder() -> Holder {
        let holder = TypeBuilder::class("Sample", "Holder`1")
            .scope("Sample")
            .generic_parameters(["T"])
            .build();
        let t = holder.generic_parameters()[0].clone();
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);
        let string = TypeNode::primitive(CilPrimitiveKind::String);
        let closed = TypeNode::generic_instance(&holder, vec![int32.clone()]).unwrap();
        Holder {
            holder,
            t,
            int32,
            string,
            closed,
        }
    }

    #[test]
    fn test_member_full_name() {
        let h = holder();
        let method = MethodBuilder::new("Put")
            .declaring_type(&h.holder)
            .instance()
            .parameter("value", &h.t)
            .parameter("count", &h.int32)
            .build();

        assert_eq!(method.full_name(), "void Sample.Holder`1::Put(T,int32)");
        assert!(method.contains_generic_parameter());
        assert!(method.has_implicit_this());
        assert_eq!(method.parameters()[1].sequence(), Some(2));
    }

    #[test]
    fn test_generic_method_naming_and_convention() {
        let builder = MethodBuilder::new("Map").generic_parameters(["U", "V"]);
        let u = builder.generic_parameter(0).unwrap();
        let method = builder.returns(&u).parameter("value", &u).build();

        assert_eq!(method.full_name(), "U Map<U,V>(U)");
        assert_eq!(method.calling_convention(), CallingConvention::Generic);
        assert_eq!(method.generic_arity(), 2);

        let params = method.generic_parameters();
        assert_eq!(params.len(), 2);
        let again = method.generic_parameters();
        assert!(Arc::ptr_eq(&params[0], &again[0]));
    }

    #[test]
    fn test_generic_instance_delegates_to_element() {
        let builder = MethodBuilder::new("Map").generic_parameters(["U"]).instance();
        let u = builder.generic_parameter(0).unwrap();
        let h = holder();
        let method = builder
            .declaring_type(&h.holder)
            .returns(&u)
            .parameter("value", &u)
            .build();

        let instance = MethodReference::generic_instance(&method, vec![h.string.clone()]).unwrap();
        assert_eq!(instance.name(), "Map");
        assert!(instance.has_this());
        assert!(Arc::ptr_eq(&instance.return_type(), &method.return_type()));
        assert!(Arc::ptr_eq(
            &instance.parameters()[0],
            &method.parameters()[0]
        ));
        assert_eq!(instance.member_full_name(), "Sample.Holder`1::Map<string>");
        assert!(Arc::ptr_eq(&instance.get_element_method(), &method));

        assert!(matches!(
            instance.set_name("Other"),
            Err(crate::Error::NotSupported(_))
        ));
        assert!(matches!(
            instance.set_return_type(&h.int32),
            Err(crate::Error::NotSupported(_))
        ));
        assert!(matches!(
            instance.set_calling_convention(CallingConvention::C),
            Err(crate::Error::NotSupported(_))
        ));
        assert!(instance.parameter_list().is_err());
    }

    #[test]
    fn test_generic_instance_validation() {
        let h = holder();
        let plain = MethodBuilder::new("Plain").build();
        assert!(MethodReference::generic_instance(&plain, vec![h.int32.clone()]).is_err());

        let generic = MethodBuilder::new("Map").generic_parameters(["U"]).build();
        assert!(MethodReference::generic_instance(&generic, vec![]).is_err());

        let instance = MethodReference::generic_instance(&generic, vec![h.int32.clone()]).unwrap();
        assert!(MethodReference::generic_instance(&instance, vec![h.int32.clone()]).is_err());
    }

    #[test]
    fn test_runtime_reference_of_plain_method_is_identity() {
        let object = TypeBuilder::class("System", "Object").build();
        let method = MethodBuilder::new("ToString")
            .declaring_type(&object)
            .returns(&TypeNode::primitive(CilPrimitiveKind::String))
            .build();

        assert!(Arc::ptr_eq(&method.runtime_reference(), &method));
    }

    #[test]
    fn test_runtime_reference_under_generic_instance() {
        let h = holder();
        let method = MethodBuilder::new("Get")
            .declaring_type(&h.holder)
            .returns(&h.t)
            .parameter("key", &h.string)
            .build();

        let view = method.runtime_reference_in(&CombinedContext::for_type(&h.closed));
        assert!(view.is_constructed());
        assert!(Arc::ptr_eq(&view.declaring_type().unwrap(), &h.closed));
        assert!(Arc::ptr_eq(&view.return_type(), &h.int32));
        assert!(Arc::ptr_eq(
            &view.parameters()[0].parameter_type(),
            &h.string
        ));
        assert_eq!(
            view.full_name(),
            "int32 Sample.Holder`1<int32>::Get(string)"
        );
        assert!(!view.contains_generic_parameter());
        assert!(Arc::ptr_eq(&view.get_element_method(), &method));

        assert!(matches!(
            view.set_declaring_type(&h.holder),
            Err(crate::Error::NotSupported(_))
        ));
        assert!(method.return_type().is_generic_parameter());
    }

    #[test]
    fn test_runtime_reference_of_closed_member_is_identity() {
        let h = holder();
        let method = MethodBuilder::new("Count")
            .declaring_type(&h.closed)
            .returns(&h.int32)
            .build();

        assert!(Arc::ptr_eq(&method.runtime_reference(), &method));
    }

    #[test]
    fn test_runtime_reference_of_generic_instance() {
        let h = holder();
        let builder = MethodBuilder::new("Convert").generic_parameters(["U"]);
        let u = builder.generic_parameter(0).unwrap();
        let method = builder
            .declaring_type(&h.closed)
            .returns(&u)
            .parameter("value", &h.t)
            .build();
        let instance = MethodReference::generic_instance(&method, vec![h.string.clone()]).unwrap();

        let view = instance.runtime_reference();
        assert!(view.is_constructed());
        assert_eq!(
            view.full_name(),
            "string Sample.Holder`1<int32>::Convert<string>(int32)"
        );
        assert!(Arc::ptr_eq(&view.generic_arguments()[0], &h.string));
        assert!(view.method_binding().is_some());
    }

    #[test]
    fn test_overrides_follow_the_reference_context() {
        let registry = TypeRegistry::new();
        let void = TypeNode::primitive(CilPrimitiveKind::Void);
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);
        let string = TypeNode::primitive(CilPrimitiveKind::String);

        let ibox = TypeBuilder::class("Sample", "IBox`1")
            .scope("Sample")
            .generic_parameters(["T"])
            .build();
        let ibox_t = ibox.generic_parameters()[0].clone();
        let boxed = TypeBuilder::class("Sample", "Box`1")
            .scope("Sample")
            .generic_parameters(["V"])
            .build();
        let v = boxed.generic_parameters()[0].clone();
        let ibox_of_v = TypeNode::generic_instance(&ibox, vec![v.clone()]).unwrap();
        let box_def = registry.define(&boxed, 0x0001).unwrap();
        box_def.add_interface(&ibox_of_v);

        let put = MethodBuilder::new("Sample.IBox<V>.Put")
            .declaring_type(&boxed)
            .instance()
            .parameter("item", &v)
            .build();
        let put_def = MethodDefinition::new(registry.next_token(Token::METHOD_DEF), 0x01E1, &put);
        box_def.add_method(&put_def);
        let put_slot = MethodBuilder::new("Put")
            .declaring_type(&ibox_of_v)
            .returns(&void)
            .instance()
            .parameter("item", &ibox_t)
            .build();
        put_def.add_override(&put_slot);

        let declared = put.overrides(&registry).unwrap();
        assert_eq!(declared.len(), 1);
        assert!(Arc::ptr_eq(&declared[0], &put_slot));
        assert_eq!(declared[0].full_name(), "void Sample.IBox`1<V>::Put(T)");

        let box_of_int = TypeNode::generic_instance(&boxed, vec![int32.clone()]).unwrap();
        let view = put.runtime_reference_in(&CombinedContext::for_type(&box_of_int));
        let viewed = view.overrides(&registry).unwrap();
        assert_eq!(viewed.len(), 1);
        assert!(viewed[0].is_constructed());
        assert!(Arc::ptr_eq(&viewed[0].get_element_method(), &put_slot));
        assert!(Arc::ptr_eq(&viewed[0].declaring_type().unwrap(), &box_of_int));
        assert_eq!(viewed[0].full_name(), "void Sample.Box`1<int32>::Put(T)");

        let iconverter = TypeBuilder::class("Sample", "IConverter")
            .scope("Sample")
            .build();
        let converter = TypeBuilder::class("Sample", "Converter")
            .scope("Sample")
            .build();
        let converter_def = registry.define(&converter, 0x0001).unwrap();

        let slot_builder = MethodBuilder::new("Convert")
            .declaring_type(&iconverter)
            .instance()
            .generic_parameters(["W"]);
        let convert_slot = slot_builder.parameter("value", &int32).build();
        let builder = MethodBuilder::new("Sample.IConverter.Convert")
            .declaring_type(&converter)
            .instance()
            .generic_parameters(["U"]);
        let u = builder.generic_parameter(0).unwrap();
        let convert = builder.parameter("value", &int32).build();
        let convert_def =
            MethodDefinition::new(registry.next_token(Token::METHOD_DEF), 0x01E1, &convert);
        converter_def.add_method(&convert_def);
        let slot_of_u = MethodReference::generic_instance(&convert_slot, vec![u]).unwrap();
        convert_def.add_override(&slot_of_u);

        assert_eq!(
            convert.overrides(&registry).unwrap()[0].full_name(),
            "void Sample.IConverter::Convert<U>(int32)"
        );

        let instance = MethodReference::generic_instance(&convert, vec![string.clone()]).unwrap();
        let viewed = instance.overrides(&registry).unwrap();
        assert_eq!(viewed.len(), 1);
        assert!(viewed[0].is_constructed());
        assert!(Arc::ptr_eq(&viewed[0].generic_arguments()[0], &string));
        assert_eq!(
            viewed[0].full_name(),
            "void Sample.IConverter::Convert<string>(int32)"
        );
    }

    #[test]
    fn test_add_parameter_rejects_attached_parameter() {
        let h = holder();
        let first = MethodBuilder::new("First")
            .declaring_type(&h.holder)
            .parameter("value", &h.t)
            .build();
        let second = MethodBuilder::new("Second").declaring_type(&h.holder).build();

        let shared = first.parameters()[0].clone();
        assert!(matches!(
            second.add_parameter(shared.clone()),
            Err(crate::Error::InvalidArgument(_))
        ));
        assert_eq!(second.parameter_count(), 0);
        assert_eq!(shared.index(), Some(0));
        assert!(Arc::ptr_eq(&shared.owner().unwrap(), first.header()));
    }
}
