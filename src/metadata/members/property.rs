//! Property references and their constructed runtime views.
//!
//! Properties carry a parameter list for indexers; a constructed view substitutes the indexer
//! parameters together with the property type.

use std::sync::{Arc, RwLock};

use crate::{
    error::not_supported,
    metadata::{
        generics::{CombinedContext, GenericContext},
        members::{
            view_is_identity, ParamRc, ParameterList, ParameterReference, PropertyDefinitionRc,
            SignatureHeader,
        },
        resolver::MetadataResolver,
        typesystem::TypeRc,
    },
    utils::{read_cloned, replace},
    Result,
};

/// A reference counted `PropertyReference`
pub type PropertyRc = Arc<PropertyReference>;

/// A plain reference to a declared property
#[derive(Debug)]
pub struct PropertyMember {
    name: RwLock<String>,
    declaring_type: RwLock<Option<TypeRc>>,
    property_type: RwLock<TypeRc>,
    parameters: ParameterList,
}

/// The runtime view of a property under a generic context
#[derive(Debug)]
pub struct ConstructedProperty {
    element: PropertyRc,
    context: CombinedContext,
}

impl ConstructedProperty {
    /// The property this view was built from
    #[must_use]
    pub fn element(&self) -> &PropertyRc {
        &self.element
    }
}

/// A reference to a property
#[derive(Debug)]
pub enum PropertyReference {
    /// A declared property
    Member(PropertyMember),
    /// A runtime view under a generic context
    Constructed(ConstructedProperty),
}

impl PropertyReference {
    /// Create a property reference without indexer parameters
    ///
    /// ## Arguments
    /// * 'name'             - The property name
    /// * '`property_type`'  - The declared property type
    /// * '`declaring_type`' - The type declaring the property
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        property_type: &TypeRc,
        declaring_type: Option<&TypeRc>,
    ) -> PropertyRc {
        Arc::new(PropertyReference::Member(PropertyMember {
            name: RwLock::new(name.into()),
            declaring_type: RwLock::new(declaring_type.cloned()),
            property_type: RwLock::new(property_type.clone()),
            parameters: ParameterList::new(Arc::new(SignatureHeader::default())),
        }))
    }

    /// The property name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            PropertyReference::Member(member) => read_cloned(&member.name),
            PropertyReference::Constructed(constructed) => constructed.element.name(),
        }
    }

    /// Rename a declared property
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] on constructed views
    pub fn set_name(&self, name: impl Into<String>) -> Result<()> {
        match self {
            PropertyReference::Member(member) => replace(&member.name, name.into()),
            PropertyReference::Constructed(_) => Err(self.immutable("name")),
        }
    }

    /// The declaring type; the context's instance type for constructed views
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeRc> {
        match self {
            PropertyReference::Member(member) => read_cloned(&member.declaring_type),
            PropertyReference::Constructed(constructed) => constructed
                .context
                .instance_type()
                .cloned()
                .or_else(|| constructed.element.declaring_type()),
        }
    }

    /// The property type; substituted for constructed views
    #[must_use]
    pub fn property_type(&self) -> TypeRc {
        match self {
            PropertyReference::Member(member) => read_cloned(&member.property_type),
            PropertyReference::Constructed(constructed) => constructed
                .element
                .property_type()
                .apply_type_arguments(&constructed.context),
        }
    }

    /// Change the type of a declared property
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] on constructed views
    pub fn set_property_type(&self, property_type: &TypeRc) -> Result<()> {
        match self {
            PropertyReference::Member(member) => {
                replace(&member.property_type, property_type.clone())
            }
            PropertyReference::Constructed(_) => Err(self.immutable("property type")),
        }
    }

    /// The indexer parameters; freshly substituted for constructed views
    #[must_use]
    pub fn parameters(&self) -> Vec<ParamRc> {
        match self {
            PropertyReference::Member(member) => member.parameters.to_vec(),
            PropertyReference::Constructed(constructed) => ParameterList::with_parameters(
                Arc::new(SignatureHeader::default()),
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

    /// Append an indexer parameter to a declared property
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] on constructed views, or
    /// [`crate::Error::InvalidArgument`] if `parameter` already belongs to a signature
    pub fn add_parameter(&self, parameter: ParamRc) -> Result<()> {
        match self {
            PropertyReference::Member(member) => member.parameters.add(parameter),
            PropertyReference::Constructed(_) => Err(self.immutable("parameters")),
        }
    }

    /// Returns true for constructed views
    #[must_use]
    pub fn is_constructed(&self) -> bool {
        matches!(self, PropertyReference::Constructed(_))
    }

    /// Returns true if the property type, an indexer parameter or the declaring type mentions a
    /// generic parameter
    #[must_use]
    pub fn contains_generic_parameter(&self) -> bool {
        self.property_type().contains_generic_parameter()
            || self
                .declaring_type()
                .is_some_and(|declaring| declaring.contains_generic_parameter())
            || self
                .parameters()
                .iter()
                .any(|parameter| parameter.contains_generic_parameter())
    }

    /// `Declaring::Name`
    #[must_use]
    pub fn member_full_name(&self) -> String {
        match self.declaring_type() {
            Some(declaring) => format!("{}::{}", declaring.full_name(), self.name()),
            None => self.name(),
        }
    }

    /// `<type> Declaring::Name(<parameters>)`
    #[must_use]
    pub fn full_name(&self) -> String {
        let parameters: Vec<String> = self
            .parameters()
            .iter()
            .map(|parameter| parameter.parameter_type().full_name())
            .collect();

        format!(
            "{} {}({})",
            self.property_type().full_name(),
            self.member_full_name(),
            parameters.join(",")
        )
    }

    /// Resolve to the declared definition; constructed views defer to their element
    ///
    /// # Errors
    /// Returns the resolver's error if the definition cannot be located
    pub fn resolve(
        self: &Arc<Self>,
        resolver: &dyn MetadataResolver,
    ) -> Result<PropertyDefinitionRc> {
        match self.as_ref() {
            PropertyReference::Member(_) => resolver.resolve_property(self),
            PropertyReference::Constructed(constructed) => constructed.element.resolve(resolver),
        }
    }

    /// The property as the runtime sees it through its declaring generic instance
    #[must_use]
    pub fn runtime_reference(self: &Arc<Self>) -> PropertyRc {
        match self.declaring_type() {
            Some(declaring) if declaring.is_generic_instance() => {
                self.runtime_reference_in(&CombinedContext::for_type(&declaring))
            }
            _ => self.clone(),
        }
    }

    /// The property viewed through `context`
    #[must_use]
    pub fn runtime_reference_in(self: &Arc<Self>, context: &CombinedContext) -> PropertyRc {
        if view_is_identity(
            self.declaring_type().as_ref(),
            context,
            self.contains_generic_parameter(),
        ) {
            return self.clone();
        }

        Arc::new(PropertyReference::Constructed(ConstructedProperty {
            element: self.clone(),
            context: context.clone(),
        }))
    }

    fn immutable(&self, property: &str) -> crate::Error {
        not_supported!(
            "cannot set the {} of constructed property '{}'",
            property,
            self.member_full_name()
        )
    }
}
