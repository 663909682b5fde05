//! Parameters and the parameter list of a signature.
//!
//! A [`ParameterList`] owns the position bookkeeping of its parameters: every structural change
//! (add, insert, set, remove, clear) rewrites the `index` and owner back-reference of the
//! affected parameters in one place. A parameter removed from its list is detached and reports
//! neither an index nor a sequence number. A parameter belongs to at most one list; adding one
//! that is still attached elsewhere is rejected.
//!
//! # Sequence numbers
//!
//! `sequence` is the position as seen by the runtime's argument slots: for an instance method
//! with an implicit receiver, slot 0 is `this` and the first declared parameter has sequence 1.

use std::{
    fmt,
    sync::{
        atomic::{AtomicIsize, Ordering},
        Arc, RwLock,
    },
};

use crate::{
    error::invalid_argument,
    metadata::{members::SignatureHeader, typesystem::TypeRc},
    utils::{read_cloned, read_lock, replace, write_lock},
    Result,
};

/// A reference counted `ParameterReference`
pub type ParamRc = Arc<ParameterReference>;

const DETACHED: isize = -1;

/// A parameter of a method or function pointer signature
#[derive(Debug)]
pub struct ParameterReference {
    name: RwLock<String>,
    parameter_type: RwLock<TypeRc>,
    index: AtomicIsize,
    owner: RwLock<Option<Arc<SignatureHeader>>>,
}

impl ParameterReference {
    /// Create a detached parameter
    ///
    /// ## Arguments
    /// * 'name'             - The parameter name (may be empty)
    /// * '`parameter_type`' - The declared type
    #[must_use]
    pub fn new(name: impl Into<String>, parameter_type: &TypeRc) -> ParamRc {
        Arc::new(ParameterReference {
            name: RwLock::new(name.into()),
            parameter_type: RwLock::new(parameter_type.clone()),
            index: AtomicIsize::new(DETACHED),
            owner: RwLock::new(None),
        })
    }

    /// The parameter name
    #[must_use]
    pub fn name(&self) -> String {
        read_cloned(&self.name)
    }

    /// Rename the parameter
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the name lock is poisoned
    pub fn set_name(&self, name: impl Into<String>) -> Result<()> {
        replace(&self.name, name.into())
    }

    /// The declared type
    #[must_use]
    pub fn parameter_type(&self) -> TypeRc {
        read_cloned(&self.parameter_type)
    }

    /// Change the declared type
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the type lock is poisoned
    pub fn set_parameter_type(&self, parameter_type: &TypeRc) -> Result<()> {
        replace(&self.parameter_type, parameter_type.clone())
    }

    /// Zero-based position in the owning list, `None` when detached
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.index.load(Ordering::Acquire)).ok()
    }

    /// Argument slot of this parameter, `None` when detached
    #[must_use]
    pub fn sequence(&self) -> Option<usize> {
        let index = self.index()?;
        let owner = read_lock(&self.owner);
        match owner.as_ref() {
            Some(header) if header.has_implicit_this() => Some(index + 1),
            Some(_) => Some(index),
            None => None,
        }
    }

    /// The header of the owning signature
    #[must_use]
    pub fn owner(&self) -> Option<Arc<SignatureHeader>> {
        read_cloned(&self.owner)
    }

    /// Returns true if the declared type contains a generic parameter
    #[must_use]
    pub fn contains_generic_parameter(&self) -> bool {
        self.parameter_type().contains_generic_parameter()
    }

    fn attach(&self, owner: &Arc<SignatureHeader>, index: usize) {
        *write_lock(&self.owner) = Some(owner.clone());
        self.index
            .store(isize::try_from(index).unwrap_or(DETACHED), Ordering::Release);
    }

    fn detach(&self) {
        *write_lock(&self.owner) = None;
        self.index.store(DETACHED, Ordering::Release);
    }
}

impl fmt::Display for ParameterReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// The ordered parameters of one signature
#[derive(Debug)]
pub struct ParameterList {
    owner: Arc<SignatureHeader>,
    items: RwLock<Vec<ParamRc>>,
}

impl ParameterList {
    /// Create an empty list owned by `owner`
    #[must_use]
    pub fn new(owner: Arc<SignatureHeader>) -> Self {
        ParameterList {
            owner,
            items: RwLock::new(Vec::new()),
        }
    }

    /// Create a list from freshly built, detached parameters
    pub(crate) fn with_parameters(
        owner: Arc<SignatureHeader>,
        parameters: impl IntoIterator<Item = ParamRc>,
    ) -> Self {
        let items: Vec<ParamRc> = parameters.into_iter().collect();
        let list = ParameterList {
            owner,
            items: RwLock::new(Vec::new()),
        };
        list.renumber(&items, 0);
        *write_lock(&list.items) = items;
        list
    }

    /// The header of the owning signature
    #[must_use]
    pub fn owner(&self) -> &Arc<SignatureHeader> {
        &self.owner
    }

    /// Number of parameters
    #[must_use]
    pub fn len(&self) -> usize {
        read_lock(&self.items).len()
    }

    /// Returns true if the list has no parameters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        read_lock(&self.items).is_empty()
    }

    /// The parameter at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ParamRc> {
        read_lock(&self.items).get(index).cloned()
    }

    /// A snapshot of all parameters
    #[must_use]
    pub fn to_vec(&self) -> Vec<ParamRc> {
        read_cloned(&self.items)
    }

    /// The declared types of all parameters
    #[must_use]
    pub fn parameter_types(&self) -> Vec<TypeRc> {
        read_lock(&self.items)
            .iter()
            .map(|parameter| parameter.parameter_type())
            .collect()
    }

    /// Append a parameter
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `parameter` is attached to a list
    pub fn add(&self, parameter: ParamRc) -> Result<()> {
        Self::ensure_detached(&parameter)?;

        let mut items = write_lock(&self.items);
        items.push(parameter);
        self.renumber(&items, items.len() - 1);
        Ok(())
    }

    /// Insert a parameter at `index`, shifting later parameters
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `index` is greater than the length or
    /// `parameter` is attached to a list
    pub fn insert(&self, index: usize, parameter: ParamRc) -> Result<()> {
        Self::ensure_detached(&parameter)?;

        let mut items = write_lock(&self.items);
        if index > items.len() {
            return Err(invalid_argument!(
                "insert index {} out of range for {} parameters",
                index,
                items.len()
            ));
        }

        items.insert(index, parameter);
        self.renumber(&items, index);
        Ok(())
    }

    /// Replace the parameter at `index`, returning the detached previous one
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `index` is out of range or `parameter` is
    /// attached to a list
    pub fn set(&self, index: usize, parameter: ParamRc) -> Result<ParamRc> {
        Self::ensure_detached(&parameter)?;

        let mut items = write_lock(&self.items);
        let Some(slot) = items.get_mut(index) else {
            return Err(invalid_argument!("parameter index {} out of range", index));
        };

        let previous = std::mem::replace(slot, parameter);
        previous.detach();
        self.renumber(&items, index);
        Ok(previous)
    }

    /// Remove the parameter at `index`, shifting later parameters
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `index` is out of range
    pub fn remove(&self, index: usize) -> Result<ParamRc> {
        let mut items = write_lock(&self.items);
        if index >= items.len() {
            return Err(invalid_argument!("parameter index {} out of range", index));
        }

        let removed = items.remove(index);
        removed.detach();
        self.renumber(&items, index);
        Ok(removed)
    }

    /// Remove `parameter` by identity; returns false if it is not in this list
    pub fn remove_item(&self, parameter: &ParamRc) -> bool {
        let position = read_lock(&self.items)
            .iter()
            .position(|item| Arc::ptr_eq(item, parameter));

        match position {
            Some(index) => self.remove(index).is_ok(),
            None => false,
        }
    }

    /// Remove all parameters
    pub fn clear(&self) {
        let mut items = write_lock(&self.items);
        for parameter in items.drain(..) {
            parameter.detach();
        }
    }

    fn ensure_detached(parameter: &ParamRc) -> Result<()> {
        if parameter.owner().is_some() {
            return Err(invalid_argument!(
                "parameter '{}' already belongs to a signature",
                parameter.name()
            ));
        }
        Ok(())
    }

    fn renumber(&self, items: &[ParamRc], from: usize) {
        for (index, parameter) in items.iter().enumerate().skip(from) {
            parameter.attach(&self.owner, index);
        }
    }
}
