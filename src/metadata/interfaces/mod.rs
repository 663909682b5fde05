//! Interface implementation mapping and runtime member views.
//!
//! # Key Components
//!
//! - [`InterfaceMethodMapper`]: pairs interface methods with their implementations
//! - [`TypeInterfaceMapping`]: the parallel interface method / implementation lists
//! - [`MapperConfig`]: base chain limit and explicit implementation handling
//! - [`methods_of`], [`fields_of`], [`properties_of`], [`events_of`], [`base_type_of`],
//!   [`interfaces_of`]: members of any type node as the runtime sees them
//!
//! # Examples
//!
//! ```rust
//! use cilgraph::metadata::{
//!     interfaces::get_interface_mapping,
//!     members::{MethodBuilder, MethodDefinition, MethodAccessFlags},
//!     token::Token,
//!     typesystem::{CilPrimitiveKind, TypeBuilder, TypeNode, TypeRegistry},
//! };
//!
//! let registry = TypeRegistry::new();
//! let int32 = TypeNode::primitive(CilPrimitiveKind::I4);
//! let void = TypeNode::primitive(CilPrimitiveKind::Void);
//!
//! let counter = TypeBuilder::class("Sample", "ICounter").scope("Sample").build();
//! let interface = registry.define(&counter, 0x00A0)?;
//! let increment = MethodBuilder::new("Increment")
//!     .declaring_type(&counter)
//!     .returns(&void)
//!     .instance()
//!     .parameter("by", &int32)
//!     .build();
//! interface.add_method(&MethodDefinition::new(Token::new(0x0600_0001), 0x05C6, &increment));
//!
//! let clock = TypeBuilder::class("Sample", "Clock").scope("Sample").build();
//! let class = registry.define(&clock, 0x0001)?;
//! class.add_interface(&counter);
//! let tick = MethodBuilder::new("Increment")
//!     .declaring_type(&clock)
//!     .returns(&void)
//!     .instance()
//!     .parameter("amount", &int32)
//!     .build();
//! let flags = MethodAccessFlags::PUBLIC.bits();
//! class.add_method(&MethodDefinition::new(Token::new(0x0600_0002), flags, &tick));
//!
//! let mapping = get_interface_mapping(&clock, &counter, &registry)?;
//! assert_eq!(
//!     mapping.target_methods[0].as_ref().map(|m| m.full_name()),
//!     Some("void Sample.Clock::Increment(int32)".to_string())
//! );
//! # Ok::<(), cilgraph::Error>(())
//! ```

mod mapper;
mod view;

pub use mapper::{
    get_interface_mapping, interface_mappings, InterfaceMethodMapper, MapperConfig,
    TypeInterfaceMapping,
};
pub use view::{
    base_type_of, events_of, fields_of, interfaces_of, methods_of, properties_of,
    DEFAULT_MAX_DEPTH,
};
