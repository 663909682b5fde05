//! Event references and their constructed runtime views.

use std::sync::{Arc, RwLock};

use crate::{
    error::not_supported,
    metadata::{
        generics::{CombinedContext, GenericContext},
        members::{view_is_identity, EventDefinitionRc},
        resolver::MetadataResolver,
        typesystem::TypeRc,
    },
    utils::{read_cloned, replace},
    Result,
};

/// A reference counted `EventReference`
pub type EventRc = Arc<EventReference>;

/// A plain reference to a declared event
#[derive(Debug)]
pub struct EventMember {
    name: RwLock<String>,
    declaring_type: RwLock<Option<TypeRc>>,
    event_type: RwLock<TypeRc>,
}

/// The runtime view of an event under a generic context
#[derive(Debug)]
pub struct ConstructedEvent {
    element: EventRc,
    context: CombinedContext,
}

impl ConstructedEvent {
    /// The event this view was built from
    #[must_use]
    pub fn element(&self) -> &EventRc {
        &self.element
    }
}

/// A reference to an event
#[derive(Debug)]
pub enum EventReference {
    /// A declared event
    Member(EventMember),
    /// A runtime view under a generic context
    Constructed(ConstructedEvent),
}

impl EventReference {
    /// Create an event reference
    ///
    /// ## Arguments
    /// * 'name'             - The event name
    /// * '`event_type`'     - The delegate type of the event
    /// * '`declaring_type`' - The type declaring the event
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        event_type: &TypeRc,
        declaring_type: Option<&TypeRc>,
    ) -> EventRc {
        Arc::new(EventReference::Member(EventMember {
            name: RwLock::new(name.into()),
            declaring_type: RwLock::new(declaring_type.cloned()),
            event_type: RwLock::new(event_type.clone()),
        }))
    }

    /// The event name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            EventReference::Member(member) => read_cloned(&member.name),
            EventReference::Constructed(constructed) => constructed.element.name(),
        }
    }

    /// Rename the event; a constructed view renames its element
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the name lock is poisoned
    pub fn set_name(&self, name: impl Into<String>) -> Result<()> {
        match self {
            EventReference::Member(member) => replace(&member.name, name.into()),
            EventReference::Constructed(constructed) => constructed.element.set_name(name),
        }
    }

    /// The declaring type; the context's instance type for constructed views
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeRc> {
        match self {
            EventReference::Member(member) => read_cloned(&member.declaring_type),
            EventReference::Constructed(constructed) => constructed
                .context
                .instance_type()
                .cloned()
                .or_else(|| constructed.element.declaring_type()),
        }
    }

    /// The delegate type; substituted for constructed views
    #[must_use]
    pub fn event_type(&self) -> TypeRc {
        match self {
            EventReference::Member(member) => read_cloned(&member.event_type),
            EventReference::Constructed(constructed) => constructed
                .element
                .event_type()
                .apply_type_arguments(&constructed.context),
        }
    }

    /// Change the delegate type of a declared event
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] on constructed views
    pub fn set_event_type(&self, event_type: &TypeRc) -> Result<()> {
        match self {
            EventReference::Member(member) => replace(&member.event_type, event_type.clone()),
            EventReference::Constructed(_) => Err(not_supported!(
                "cannot set the event type of constructed event '{}'",
                self.member_full_name()
            )),
        }
    }

    /// Returns true for constructed views
    #[must_use]
    pub fn is_constructed(&self) -> bool {
        matches!(self, EventReference::Constructed(_))
    }

    /// Returns true if the event type or the declaring type mentions a generic parameter
    #[must_use]
    pub fn contains_generic_parameter(&self) -> bool {
        self.event_type().contains_generic_parameter()
            || self
                .declaring_type()
                .is_some_and(|declaring| declaring.contains_generic_parameter())
    }

    /// `Declaring::Name`
    #[must_use]
    pub fn member_full_name(&self) -> String {
        match self.declaring_type() {
            Some(declaring) => format!("{}::{}", declaring.full_name(), self.name()),
            None => self.name(),
        }
    }

    /// `<type> Declaring::Name`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.event_type().full_name(), self.member_full_name())
    }

    /// Resolve to the declared definition; constructed views defer to their element
    ///
    /// # Errors
    /// Returns the resolver's error if the definition cannot be located
    pub fn resolve(self: &Arc<Self>, resolver: &dyn MetadataResolver) -> Result<EventDefinitionRc> {
        match self.as_ref() {
            EventReference::Member(_) => resolver.resolve_event(self),
            EventReference::Constructed(constructed) => constructed.element.resolve(resolver),
        }
    }

    /// The event as the runtime sees it through its declaring generic instance
    #[must_use]
    pub fn runtime_reference(self: &Arc<Self>) -> EventRc {
        match self.declaring_type() {
            Some(declaring) if declaring.is_generic_instance() => {
                self.runtime_reference_in(&CombinedContext::for_type(&declaring))
            }
            _ => self.clone(),
        }
    }

    /// The event viewed through `context`
    #[must_use]
    pub fn runtime_reference_in(self: &Arc<Self>, context: &CombinedContext) -> EventRc {
        if view_is_identity(
            self.declaring_type().as_ref(),
            context,
            self.contains_generic_parameter(),
        ) {
            return self.clone();
        }

        Arc::new(EventReference::Constructed(ConstructedEvent {
            element: self.clone(),
            context: context.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        members::{MethodBuilder, MethodReference},
        typesystem::{TypeBuilder, TypeNode},
    };

    #[test]
    fn test_event_runtime_view() {
        let handler = TypeBuilder::class("System", "EventHandler`1")
            .generic_parameters(["TEventArgs"])
            .build();
        let foo = TypeBuilder::class("Sample", "Foo`1")
            .generic_parameters(["T"])
            .build();
        let t = foo.generic_parameters()[0].clone();
        let args = TypeBuilder::class("System.ComponentModel", "CancelEventArgs").build();

        let open_handler = TypeNode::generic_instance(&handler, vec![t]).unwrap();
        let closed = TypeNode::generic_instance(&foo, vec![args]).unwrap();
        let event = EventReference::new("Changed", &open_handler, Some(&closed));

        let view = event.runtime_reference();
        assert!(view.is_constructed());
        assert_eq!(
            view.full_name(),
            "System.EventHandler`1<System.ComponentModel.CancelEventArgs> Sample.Foo`1<System.ComponentModel.CancelEventArgs>::Changed"
        );

        view.set_name("Updated").unwrap();
        assert_eq!(event.name(), "Updated");
        assert!(view.set_event_type(&open_handler).is_err());
    }

    #[test]
    fn test_view_on_plain_declaring_type() {
        let handler = TypeBuilder::class("System", "EventHandler`1")
            .generic_parameters(["TEventArgs"])
            .build();
        let foo = TypeBuilder::class("Sample", "Foo").build();
        let args = TypeBuilder::class("System", "EventArgs").build();

        let builder = MethodBuilder::new("Subscribe")
            .declaring_type(&foo)
            .generic_parameters(["TArgs"]);
        let t_args = builder.generic_parameter(0).unwrap();
        let subscribe = builder.build();
        let subscribe_of_args = MethodReference::generic_instance(&subscribe, vec![args]).unwrap();

        let handler_of_t = TypeNode::generic_instance(&handler, vec![t_args]).unwrap();
        let event = EventReference::new("Raised", &handler_of_t, Some(&foo));
        assert!(event.contains_generic_parameter());

        let view = event.runtime_reference_in(&CombinedContext::for_method(&subscribe_of_args));
        assert!(view.is_constructed());
        assert!(!view.contains_generic_parameter());
        assert!(Arc::ptr_eq(&view.declaring_type().unwrap(), &foo));
        assert_eq!(
            view.full_name(),
            "System.EventHandler`1<System.EventArgs> Sample.Foo::Raised"
        );

        assert!(matches!(
            view.set_event_type(&handler),
            Err(crate::Error::NotSupported(_))
        ));
        assert!(Arc::ptr_eq(&event.event_type(), &handler_of_t));

        assert!(Arc::ptr_eq(&event.runtime_reference(), &event));
    }

    #[test]
    fn test_open_declaring_instance_contains_generic_parameter() {
        let foo = TypeBuilder::class("Sample", "Foo`1")
            .generic_parameters(["T"])
            .build();
        let open = TypeNode::generic_instance(&foo, foo.generic_parameters().to_vec()).unwrap();
        let handler = TypeBuilder::class("System", "EventHandler").build();

        let on_definition = EventReference::new("Changed", &handler, Some(&foo));
        assert!(!on_definition.contains_generic_parameter());
        assert!(Arc::ptr_eq(&on_definition.runtime_reference(), &on_definition));

        let changed = EventReference::new("Changed", &handler, Some(&open));
        assert!(changed.contains_generic_parameter());
        assert_eq!(changed.full_name(), "System.EventHandler Sample.Foo`1<T>::Changed");
    }
}
