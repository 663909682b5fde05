//! Sample type graphs shared by the unit tests.
//!
//! [`SampleModule`] registers a small corner of the base class library plus a few sample types:
//!
//! ```text
//! System.Object                     ToString()
//! System.IDisposable                Dispose()
//! IList`1<T>                        Add(T)
//! List`1<T> : Object, IList`1<T>    .ctor(), Add(T), Clear(), _items: T[], Count, Changed
//! Sample.DerivedList`1<U> : List`1<U>, IDisposable
//!                                   Dispose()
//! Sample.ExplicitDisposable : Object, IDisposable
//!                                   private System.IDisposable.Dispose() overrides IDisposable::Dispose
//! ```

use crate::metadata::{
    members::{
        EventDefinition, EventReference, FieldDefinition, FieldReference, MethodBuilder,
        MethodDefinition, MethodDefinitionRc, MethodRc, PropertyDefinition, PropertyReference,
    },
    token::Token,
    typesystem::{CilPrimitiveKind, TypeBuilder, TypeDefinitionRc, TypeNode, TypeRc, TypeRegistry},
};

pub const CLASS: u32 = 0x0001;
pub const INTERFACE: u32 = 0x00A1;

pub const PUBLIC_METHOD: u32 = 0x0086;
pub const INTERFACE_METHOD: u32 = 0x05C6;
pub const EXPLICIT_METHOD: u32 = 0x01E1;
pub const CONSTRUCTOR: u32 = 0x1886;

pub struct SampleModule {
    pub registry: TypeRegistry,
    pub object: TypeRc,
    pub disposable: TypeRc,
    pub ilist: TypeRc,
    pub list: TypeRc,
    pub derived_list: TypeRc,
    pub explicit_disposable: TypeRc,
    pub dispose: MethodRc,
}

impl SampleModule {
    pub fn new() -> Self {
        let registry = TypeRegistry::new();
        let void = TypeNode::primitive(CilPrimitiveKind::Void);
        let int32 = TypeNode::primitive(CilPrimitiveKind::I4);
        let string = TypeNode::primitive(CilPrimitiveKind::String);

        let object = TypeBuilder::class("System", "Object").scope("mscorlib").build();
        let object_def = registry.define(&object, CLASS).unwrap();
        add_method(
            &registry,
            &object_def,
            CONSTRUCTOR,
            &MethodBuilder::new(".ctor").declaring_type(&object).instance().build(),
        );
        add_method(
            &registry,
            &object_def,
            PUBLIC_METHOD,
            &MethodBuilder::new("ToString")
                .declaring_type(&object)
                .returns(&string)
                .instance()
                .build(),
        );

        let disposable = TypeBuilder::class("System", "IDisposable")
            .scope("mscorlib")
            .build();
        let disposable_def = registry.define(&disposable, INTERFACE).unwrap();
        let dispose = MethodBuilder::new("Dispose")
            .declaring_type(&disposable)
            .instance()
            .build();
        add_method(&registry, &disposable_def, INTERFACE_METHOD, &dispose);

        let ilist = TypeBuilder::class("System.Collections.Generic", "IList`1")
            .scope("mscorlib")
            .generic_parameters(["T"])
            .build();
        let ilist_def = registry.define(&ilist, INTERFACE).unwrap();
        add_method(
            &registry,
            &ilist_def,
            INTERFACE_METHOD,
            &MethodBuilder::new("Add")
                .declaring_type(&ilist)
                .returns(&void)
                .instance()
                .parameter("item", &ilist.generic_parameters()[0])
                .build(),
        );

        let list = TypeBuilder::class("System.Collections.Generic", "List`1")
            .scope("mscorlib")
            .generic_parameters(["T"])
            .build();
        let t = list.generic_parameters()[0].clone();
        let list_def = registry.define(&list, CLASS).unwrap();
        list_def.set_base_type(&object).unwrap();
        list_def.add_interface(&TypeNode::generic_instance(&ilist, vec![t.clone()]).unwrap());
        add_method(
            &registry,
            &list_def,
            CONSTRUCTOR,
            &MethodBuilder::new(".ctor").declaring_type(&list).instance().build(),
        );
        add_method(
            &registry,
            &list_def,
            PUBLIC_METHOD,
            &MethodBuilder::new("Add")
                .declaring_type(&list)
                .returns(&void)
                .instance()
                .parameter("item", &t)
                .build(),
        );
        add_method(
            &registry,
            &list_def,
            PUBLIC_METHOD,
            &MethodBuilder::new("Clear")
                .declaring_type(&list)
                .instance()
                .build(),
        );
        list_def.add_field(&FieldDefinition::new(
            registry.next_token(Token::FIELD),
            0x0001,
            &FieldReference::new("_items", &TypeNode::sz_array(&t), Some(&list)),
        ));
        list_def.add_property(&PropertyDefinition::new(
            registry.next_token(Token::PROPERTY),
            0,
            &PropertyReference::new("Count", &int32, Some(&list)),
        ));
        let handler = TypeBuilder::class("System", "EventHandler")
            .scope("mscorlib")
            .build();
        list_def.add_event(&EventDefinition::new(
            registry.next_token(Token::EVENT),
            0,
            &EventReference::new("Changed", &handler, Some(&list)),
        ));

        let derived_list = TypeBuilder::class("Sample", "DerivedList`1")
            .scope("Sample")
            .generic_parameters(["U"])
            .build();
        let u = derived_list.generic_parameters()[0].clone();
        let derived_def = registry.define(&derived_list, CLASS).unwrap();
        derived_def
            .set_base_type(&TypeNode::generic_instance(&list, vec![u]).unwrap())
            .unwrap();
        derived_def.add_interface(&disposable);
        add_method(
            &registry,
            &derived_def,
            PUBLIC_METHOD,
            &MethodBuilder::new("Dispose")
                .declaring_type(&derived_list)
                .instance()
                .build(),
        );

        let explicit_disposable = TypeBuilder::class("Sample", "ExplicitDisposable")
            .scope("Sample")
            .build();
        let explicit_def = registry.define(&explicit_disposable, CLASS).unwrap();
        explicit_def.set_base_type(&object).unwrap();
        explicit_def.add_interface(&disposable);
        let explicit = MethodDefinition::new(
            registry.next_token(Token::METHOD_DEF),
            EXPLICIT_METHOD,
            &MethodBuilder::new("System.IDisposable.Dispose")
                .declaring_type(&explicit_disposable)
                .instance()
                .build(),
        );
        explicit.add_override(&dispose);
        explicit_def.add_method(&explicit);

        SampleModule {
            registry,
            object,
            disposable,
            ilist,
            list,
            derived_list,
            explicit_disposable,
            dispose,
        }
    }

    pub fn string(&self) -> TypeRc {
        TypeNode::primitive(CilPrimitiveKind::String)
    }

    pub fn int32(&self) -> TypeRc {
        TypeNode::primitive(CilPrimitiveKind::I4)
    }

    pub fn list_of(&self, argument: &TypeRc) -> TypeRc {
        TypeNode::generic_instance(&self.list, vec![argument.clone()]).unwrap()
    }

    pub fn ilist_of(&self, argument: &TypeRc) -> TypeRc {
        TypeNode::generic_instance(&self.ilist, vec![argument.clone()]).unwrap()
    }

    pub fn derived_list_of(&self, argument: &TypeRc) -> TypeRc {
        TypeNode::generic_instance(&self.derived_list, vec![argument.clone()]).unwrap()
    }
}

pub fn add_method(
    registry: &TypeRegistry,
    definition: &TypeDefinitionRc,
    flags: u32,
    method: &MethodRc,
) -> MethodDefinitionRc {
    let method_def = MethodDefinition::new(registry.next_token(Token::METHOD_DEF), flags, method);
    definition.add_method(&method_def);
    method_def
}
