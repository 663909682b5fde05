//! The interface method mapper.
//!
//! For a target type and one of its interfaces, the mapper pairs every method the interface
//! declares with the method of the target that implements it, the way the runtime builds an
//! interface map:
//!
//! 1. A private method with an override entry naming the interface method is an explicit
//!    implementation and wins immediately.
//! 2. Otherwise the first public method with a matching name and signature is the implicit
//!    implementation.
//! 3. Otherwise the search continues in the base type.
//!
//! Methods inherited by the interface from its own base interfaces are not mapped.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    error::invalid_argument,
    metadata::{
        generics::{CombinedContext, GenericContext},
        interfaces::view::{collect_interfaces, methods_of, DEFAULT_MAX_DEPTH},
        members::{MethodList, MethodRc},
        resolver::MetadataResolver,
        typesystem::{are_same_type, methods_match, TypeDefinitionRc, TypeRc},
    },
    Error, Result,
};

/// Tunables of the [`InterfaceMethodMapper`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapperConfig {
    /// Maximum number of base types searched before giving up with [`Error::RecursionLimit`]
    pub max_depth: usize,
    /// Honor private methods with override entries as explicit implementations
    pub allow_explicit: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_explicit: true,
        }
    }
}

/// Interface methods paired with the target methods implementing them
///
/// `interface_methods` and `target_methods` are parallel: slot `i` of the target list holds the
/// implementation of interface method `i`, or `None` if nothing in the base chain implements it.
#[derive(Debug, Clone)]
pub struct TypeInterfaceMapping {
    /// The interface that was mapped
    pub interface_type: TypeRc,
    /// The type implementing it
    pub target_type: TypeRc,
    /// Methods declared by the interface, viewed through its generic arguments
    pub interface_methods: MethodList,
    /// Implementation of each interface method, if one was found
    pub target_methods: Vec<Option<MethodRc>>,
}

impl TypeInterfaceMapping {
    /// Iterate over `(interface method, implementation)` pairs in declaration order
    pub fn pairs(&self) -> impl Iterator<Item = (&MethodRc, Option<&MethodRc>)> {
        self.interface_methods
            .iter()
            .zip(self.target_methods.iter().map(Option::as_ref))
    }

    /// The implementation of `interface_method`
    ///
    /// The method is looked up by reference first, then by name and signature.
    #[must_use]
    pub fn implementation_of(&self, interface_method: &MethodRc) -> Option<&MethodRc> {
        let position = self
            .interface_methods
            .iter()
            .position(|method| Arc::ptr_eq(method, interface_method))
            .or_else(|| {
                self.interface_methods
                    .iter()
                    .position(|method| methods_match(method, interface_method))
            })?;

        self.target_methods.get(position)?.as_ref()
    }

    /// Number of interface methods without an implementation
    #[must_use]
    pub fn unimplemented(&self) -> usize {
        self.target_methods
            .iter()
            .filter(|method| method.is_none())
            .count()
    }
}

/// Finds the methods of a type that implement the methods of an interface
pub struct InterfaceMethodMapper<'a> {
    resolver: &'a dyn MetadataResolver,
    config: MapperConfig,
}

impl<'a> InterfaceMethodMapper<'a> {
    /// Create a mapper with the default configuration
    ///
    /// ## Arguments
    /// * 'resolver' - Locates the definitions behind types and methods
    #[must_use]
    pub fn new(resolver: &'a dyn MetadataResolver) -> Self {
        Self::with_config(resolver, MapperConfig::default())
    }

    /// Create a mapper with a custom configuration
    ///
    /// ## Arguments
    /// * 'resolver' - Locates the definitions behind types and methods
    /// * 'config'   - Search limits and explicit implementation handling
    #[must_use]
    pub fn with_config(resolver: &'a dyn MetadataResolver, config: MapperConfig) -> Self {
        InterfaceMethodMapper { resolver, config }
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Find the method of `ty` or one of its base types implementing `interface_method`
    ///
    /// ## Arguments
    /// * 'ty'               - The type to search; candidates of a generic instance are viewed
    ///                        through its arguments
    /// * 'interface_method' - The interface method, viewed through the interface's arguments
    ///
    /// # Errors
    /// Returns the resolver's error if a type or candidate method cannot be resolved, and
    /// [`Error::RecursionLimit`] if the base chain is longer than the configured maximum
    pub fn find_implementation(
        &self,
        ty: &TypeRc,
        interface_method: &MethodRc,
    ) -> Result<Option<MethodRc>> {
        self.find_at_depth(ty, interface_method, 0)
    }

    /// Map every method of `interface_type` to its implementation in `target_type`
    ///
    /// ## Arguments
    /// * 'target_type'    - The implementing type
    /// * 'interface_type' - An interface `target_type` or one of its bases declares
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `interface_type` is not an interface, if
    /// `target_type` is a generic parameter, if a generic interface is mapped onto an array, or if
    /// `target_type` does not implement `interface_type`. Resolution failures are propagated.
    pub fn map(
        &self,
        target_type: &TypeRc,
        interface_type: &TypeRc,
    ) -> Result<TypeInterfaceMapping> {
        let interface_definition = self.resolver.resolve_type(interface_type)?;
        if !interface_definition.is_interface() {
            return Err(invalid_argument!(
                "'{}' is not an interface",
                interface_type.full_name()
            ));
        }

        if target_type.is_generic_parameter() {
            return Err(invalid_argument!(
                "cannot map interfaces of generic parameter '{}'",
                target_type.full_name()
            ));
        }

        if interface_definition.has_generic_parameters() && target_type.is_array() {
            return Err(invalid_argument!(
                "cannot map generic interface '{}' onto array '{}'",
                interface_type.full_name(),
                target_type.full_name()
            ));
        }

        if !self.implements(target_type, &interface_definition)? {
            return Err(invalid_argument!(
                "'{}' does not implement '{}'",
                target_type.full_name(),
                interface_type.full_name()
            ));
        }

        self.method_mappings(target_type, interface_type)
    }

    /// Map every distinct interface `target_type` implements
    ///
    /// Interfaces without an owning scope or whose definition is unknown are skipped. The
    /// mappings are computed in parallel and returned in interface order.
    ///
    /// # Errors
    /// Returns the first error any single mapping reports
    pub fn map_all(&self, target_type: &TypeRc) -> Result<Vec<TypeInterfaceMapping>> {
        let mut interfaces: Vec<TypeRc> = Vec::new();
        for interface in collect_interfaces(target_type, self.resolver, self.config.max_depth)? {
            if interfaces
                .iter()
                .any(|known| are_same_type(known, &interface))
            {
                continue;
            }

            if interface.scope().is_none() {
                debug!(interface = %interface.full_name(), "skipping interface without scope");
                continue;
            }

            match self.resolver.resolve_type(&interface) {
                Ok(_) => interfaces.push(interface),
                Err(Error::TypeNotFound(name)) => {
                    debug!(interface = %name, "skipping unresolvable interface");
                }
                Err(error) => return Err(error),
            }
        }

        interfaces
            .par_iter()
            .map(|interface| self.method_mappings(target_type, interface))
            .collect()
    }

    /// Walks the base chain one level at a time, so a base that cannot be resolved only fails
    /// the check when no closer type declares the interface
    fn implements(
        &self,
        target_type: &TypeRc,
        interface_definition: &TypeDefinitionRc,
    ) -> Result<bool> {
        let mut current = Some(target_type.clone());
        let mut depth = 0;

        while let Some(level) = current {
            if depth > self.config.max_depth {
                return Err(Error::RecursionLimit(self.config.max_depth));
            }

            let definition = self.resolver.resolve_type(&level)?;
            for interface in definition.interfaces().iter() {
                if self.is_definition_of(interface, interface_definition)? {
                    return Ok(true);
                }
            }

            current = definition
                .base_type()
                .map(|base| base.apply_type_arguments(&CombinedContext::for_type(&level)));
            depth += 1;
        }

        Ok(false)
    }

    fn is_definition_of(
        &self,
        interface: &TypeRc,
        interface_definition: &TypeDefinitionRc,
    ) -> Result<bool> {
        if interface.scope().is_none() {
            debug!(interface = %interface.full_name(), "skipping interface without scope");
            return Ok(false);
        }

        match self.resolver.resolve_type(interface) {
            Ok(definition) => Ok(Arc::ptr_eq(&definition, interface_definition)),
            Err(Error::TypeNotFound(name)) => {
                debug!(interface = %name, "skipping unresolvable interface");
                Ok(false)
            }
            Err(error) => Err(error),
        }
    }

    fn method_mappings(
        &self,
        target_type: &TypeRc,
        interface_type: &TypeRc,
    ) -> Result<TypeInterfaceMapping> {
        let interface_methods = methods_of(interface_type, self.resolver)?;
        let target_methods = interface_methods
            .iter()
            .map(|interface_method| self.find_implementation(target_type, interface_method))
            .collect::<Result<Vec<_>>>()?;

        Ok(TypeInterfaceMapping {
            interface_type: interface_type.clone(),
            target_type: target_type.clone(),
            interface_methods,
            target_methods,
        })
    }

    fn find_at_depth(
        &self,
        ty: &TypeRc,
        interface_method: &MethodRc,
        depth: usize,
    ) -> Result<Option<MethodRc>> {
        if depth > self.config.max_depth {
            return Err(Error::RecursionLimit(self.config.max_depth));
        }

        let context = CombinedContext::for_type(ty);
        let mut implicit = None;

        for candidate in methods_of(ty, self.resolver)? {
            let definition = candidate.resolve(self.resolver)?;

            if definition.is_public() {
                if implicit.is_none() && methods_match(interface_method, &candidate) {
                    trace!(candidate = %candidate.full_name(), "implicit candidate");
                    implicit = Some(candidate);
                }
            } else if self.config.allow_explicit
                && definition.is_private()
                && definition.has_overrides()
            {
                for overridden in definition.overrides() {
                    let overridden = normalize_override(&overridden, &context);
                    let same_declaring = match (
                        overridden.declaring_type(),
                        interface_method.declaring_type(),
                    ) {
                        (Some(left), Some(right)) => are_same_type(&left, &right),
                        _ => false,
                    };

                    if same_declaring && methods_match(&overridden, interface_method) {
                        trace!(candidate = %candidate.full_name(), "explicit implementation");
                        return Ok(Some(candidate));
                    }
                }
            }
        }

        if implicit.is_some() {
            return Ok(implicit);
        }

        let Some(base) = self.base_of(ty)? else {
            return Ok(None);
        };

        debug!(
            ty = %ty.full_name(),
            base = %base.full_name(),
            method = %interface_method.name(),
            "no implementation, searching base type"
        );
        self.find_at_depth(&base, interface_method, depth + 1)
    }

    fn base_of(&self, ty: &TypeRc) -> Result<Option<TypeRc>> {
        let definition = self.resolver.resolve_type(ty)?;
        let context = CombinedContext::for_type(ty);

        Ok(definition
            .base_type()
            .map(|base| base.apply_type_arguments(&context)))
    }
}

/// Brings an override entry into the instantiation the candidate is viewed in
///
/// The entry is declared in unbound form (`IFoo<T>::Bar(!0)`); its declaring type is substituted
/// through the candidate's context and the entry is then viewed through that declaring type.
fn normalize_override(overridden: &MethodRc, context: &CombinedContext) -> MethodRc {
    let Some(declaring) = overridden.declaring_type() else {
        return overridden.clone();
    };

    let declaring = if context.is_empty() {
        declaring
    } else {
        declaring.apply_type_arguments(context)
    };

    if !overridden.contains_generic_parameter() && !declaring.is_generic_instance() {
        return overridden.clone();
    }

    overridden.runtime_reference_in(&CombinedContext::for_type(&declaring))
}

/// Map every method of `interface_type` to its implementation in `target_type`
///
/// Convenience over [`InterfaceMethodMapper::map`] with the default configuration.
///
/// # Errors
/// See [`InterfaceMethodMapper::map`]
pub fn get_interface_mapping(
    target_type: &TypeRc,
    interface_type: &TypeRc,
    resolver: &dyn MetadataResolver,
) -> Result<TypeInterfaceMapping> {
    InterfaceMethodMapper::new(resolver).map(target_type, interface_type)
}

/// Map every distinct interface `target_type` implements
///
/// Convenience over [`InterfaceMethodMapper::map_all`] with the default configuration.
///
/// # Errors
/// See [`InterfaceMethodMapper::map_all`]
pub fn interface_mappings(
    target_type: &TypeRc,
    resolver: &dyn MetadataResolver,
) -> Result<Vec<TypeInterfaceMapping>> {
    InterfaceMethodMapper::new(resolver).map_all(target_type)
}
