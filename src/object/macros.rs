//! Declaring object classes
//!
//! ```ignore
//! aeroproxy::object_type! {
//!     pub struct Dog("Dog") {
//!         "name" => name / set_name: String,
//!         "age" => age / set_age: i32,
//!         "owner" => owner / set_owner: Option<Person>,
//!     }
//! }
//! ```
//!
//! Expands to a handle struct over `Object`, its `ObjectType` impl, and one
//! getter/setter pair per property. Accessors call `get_as`/`set_as` with the
//! property name, so they share resolution and coercion with dynamic access.
//! Property order is slot order.

/// Declares a statically typed object class.
#[macro_export]
macro_rules! object_type {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($class:literal) {
            $( $prop:literal => $getter:ident / $setter:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            object: $crate::object::Object,
        }

        impl $crate::object::FromObject for $name {
            fn from_object(object: $crate::object::Object) -> Self {
                Self { object }
            }
        }

        impl $crate::object::ObjectType for $name {
            const CLASS_NAME: &'static str = $class;

            fn object_schema() -> $crate::schema::SchemaResult<$crate::schema::ObjectSchema> {
                $crate::schema::ObjectSchema::builder($class)
                    $(
                        .property(
                            $prop,
                            <$ty as $crate::value::Property>::PROPERTY_TYPE,
                            <$ty as $crate::value::Property>::object_class(),
                        )
                    )*
                    .build()
            }

            fn register_links(
                registry: &$crate::schema::SchemaRegistry,
            ) -> $crate::schema::SchemaResult<()> {
                let _ = registry;
                $( <$ty as $crate::value::Property>::register_class(registry)?; )*
                Ok(())
            }

            fn as_object(&self) -> &$crate::object::Object {
                &self.object
            }

            fn into_object(self) -> $crate::object::Object {
                self.object
            }
        }

        #[allow(dead_code)]
        impl $name {
            /// Standalone instance holding default values.
            $vis fn new() -> $crate::error::AccessorResult<Self> {
                let schema = $crate::schema::SchemaRegistry::global().resolve::<Self>()?;
                Ok(Self {
                    object: $crate::object::Object::new(schema),
                })
            }

            /// Standalone instance initialized in property order.
            $vis fn from_values(
                values: Vec<$crate::value::Value>,
            ) -> $crate::error::AccessorResult<Self> {
                let schema = $crate::schema::SchemaRegistry::global().resolve::<Self>()?;
                Ok(Self {
                    object: $crate::object::Object::from_values(schema, values)?,
                })
            }

            $vis fn object(&self) -> &$crate::object::Object {
                &self.object
            }

            $(
                $vis fn $getter(&self) -> $crate::error::AccessorResult<$ty> {
                    self.object.get_as::<$ty>($prop)
                }

                $vis fn $setter(&self, value: $ty) -> $crate::error::AccessorResult<()> {
                    self.object.set_as::<$ty>($prop, value)
                }
            )*
        }
    };
}
