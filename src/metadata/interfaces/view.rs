//! Runtime views of a type's declared members.
//!
//! Definitions describe their members in unbound form: `List<T>` declares `Add(T)`. The helpers in
//! this module enumerate the members of any type node as the runtime sees them, so the members of
//! `List<int>` come back as views declared by `List<int>` taking `int32`.

use crate::{
    metadata::{
        generics::{CombinedContext, GenericContext},
        members::{EventRc, FieldRc, MethodList, PropertyRc},
        resolver::MetadataResolver,
        typesystem::{TypeList, TypeRc},
    },
    Error, Result,
};

/// Default bound on base type chains walked by the helpers and the mapper
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// The declared methods of `ty`, constructors excluded, viewed through its generic arguments
///
/// ## Arguments
/// * 'ty'       - The type whose methods to enumerate; generic instances substitute their arguments
/// * 'resolver' - Locates the definition behind `ty`
///
/// # Errors
/// Returns the resolver's error if `ty` cannot be resolved
pub fn methods_of(ty: &TypeRc, resolver: &dyn MetadataResolver) -> Result<MethodList> {
    let definition = resolver.resolve_type(ty)?;
    let context = CombinedContext::for_type(ty);

    Ok(definition
        .methods_without_constructors()
        .iter()
        .map(|method| {
            if context.is_empty() {
                method.reference().clone()
            } else {
                method.reference().runtime_reference_in(&context)
            }
        })
        .collect())
}

/// The declared fields of `ty`, viewed through its generic arguments
///
/// # Errors
/// Returns the resolver's error if `ty` cannot be resolved
pub fn fields_of(ty: &TypeRc, resolver: &dyn MetadataResolver) -> Result<Vec<FieldRc>> {
    let definition = resolver.resolve_type(ty)?;
    let context = CombinedContext::for_type(ty);

    Ok(definition
        .fields()
        .iter()
        .map(|field| {
            if context.is_empty() {
                field.reference().clone()
            } else {
                field.reference().runtime_reference_in(&context)
            }
        })
        .collect())
}

/// The declared properties of `ty`, viewed through its generic arguments
///
/// # Errors
/// Returns the resolver's error if `ty` cannot be resolved
pub fn properties_of(ty: &TypeRc, resolver: &dyn MetadataResolver) -> Result<Vec<PropertyRc>> {
    let definition = resolver.resolve_type(ty)?;
    let context = CombinedContext::for_type(ty);

    Ok(definition
        .properties()
        .iter()
        .map(|property| {
            if context.is_empty() {
                property.reference().clone()
            } else {
                property.reference().runtime_reference_in(&context)
            }
        })
        .collect())
}

/// The declared events of `ty`, viewed through its generic arguments
///
/// # Errors
/// Returns the resolver's error if `ty` cannot be resolved
pub fn events_of(ty: &TypeRc, resolver: &dyn MetadataResolver) -> Result<Vec<EventRc>> {
    let definition = resolver.resolve_type(ty)?;
    let context = CombinedContext::for_type(ty);

    Ok(definition
        .events()
        .iter()
        .map(|event| {
            if context.is_empty() {
                event.reference().clone()
            } else {
                event.reference().runtime_reference_in(&context)
            }
        })
        .collect())
}

/// The base type of `ty`, with the generic arguments of `ty` substituted into it
///
/// For `class Derived<T> : Base<T[]>`, the base of `Derived<int>` is `Base<int[]>`.
///
/// # Errors
/// Returns the resolver's error if `ty` cannot be resolved
pub fn base_type_of(ty: &TypeRc, resolver: &dyn MetadataResolver) -> Result<Option<TypeRc>> {
    let definition = resolver.resolve_type(ty)?;
    let context = CombinedContext::for_type(ty);

    Ok(definition
        .base_type()
        .map(|base| base.apply_type_arguments(&context)))
}

/// Every interface `ty` declares, followed by those of its base types, substituted level by level
///
/// Duplicates are kept; an interface re-declared by a base type appears once per declaration.
///
/// # Errors
/// Returns the resolver's error if `ty` or a base type cannot be resolved, and
/// [`Error::RecursionLimit`] if the base chain exceeds [`DEFAULT_MAX_DEPTH`]
pub fn interfaces_of(ty: &TypeRc, resolver: &dyn MetadataResolver) -> Result<TypeList> {
    collect_interfaces(ty, resolver, DEFAULT_MAX_DEPTH)
}

pub(crate) fn collect_interfaces(
    ty: &TypeRc,
    resolver: &dyn MetadataResolver,
    max_depth: usize,
) -> Result<TypeList> {
    let mut interfaces = Vec::new();
    let mut current = Some(ty.clone());
    let mut depth = 0;

    while let Some(level) = current {
        if depth > max_depth {
            return Err(Error::RecursionLimit(max_depth));
        }

        let definition = resolver.resolve_type(&level)?;
        let context = CombinedContext::for_type(&level);
        interfaces.extend(
            definition
                .interfaces()
                .iter()
                .map(|interface| interface.apply_type_arguments(&context)),
        );

        current = definition
            .base_type()
            .map(|base| base.apply_type_arguments(&context));
        depth += 1;
    }

    Ok(interfaces)
}
