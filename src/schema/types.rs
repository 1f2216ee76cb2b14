//! Schema type definitions
//!
//! Supported property types:
//! - bool
//! - int8 / int16 / int32 / int64 (canonical 64-bit storage)
//! - float: IEEE-754 single precision
//! - double: IEEE-754 double precision
//! - string: UTF-8 string
//! - binary: opaque bytes
//! - date: fixed-point timestamp
//! - object: link to another object

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::errors::{SchemaError, SchemaResult};
use crate::error::{AccessorError, AccessorResult};

/// Declared property type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Bool,
    Int8,
    Int16,
    Int32,
    /// General integer property
    #[serde(alias = "int")]
    Int64,
    Float,
    Double,
    String,
    Binary,
    Date,
    /// Link to another object
    Object,
}

impl PropertyType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyType::Bool => "bool",
            PropertyType::Int8 => "int8",
            PropertyType::Int16 => "int16",
            PropertyType::Int32 => "int32",
            PropertyType::Int64 => "int64",
            PropertyType::Float => "float",
            PropertyType::Double => "double",
            PropertyType::String => "string",
            PropertyType::Binary => "binary",
            PropertyType::Date => "date",
            PropertyType::Object => "object",
        }
    }

    /// Bit width of integer types, `None` for everything else
    pub fn integer_width(&self) -> Option<u32> {
        match self {
            PropertyType::Int8 => Some(8),
            PropertyType::Int16 => Some(16),
            PropertyType::Int32 => Some(32),
            PropertyType::Int64 => Some(64),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.integer_width().is_some()
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Describes one property: name, declared type and storage slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub slot: usize,
    /// Linked class for `object` properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_class: Option<String>,
}

/// Key used by dynamic access: a property name or a slot index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKey<'a> {
    Name(&'a str),
    Slot(usize),
}

impl<'a> From<&'a str> for PropertyKey<'a> {
    fn from(name: &'a str) -> Self {
        PropertyKey::Name(name)
    }
}

impl<'a> From<&'a String> for PropertyKey<'a> {
    fn from(name: &'a String) -> Self {
        PropertyKey::Name(name.as_str())
    }
}

impl From<usize> for PropertyKey<'_> {
    fn from(slot: usize) -> Self {
        PropertyKey::Slot(slot)
    }
}

/// Ordered property table for one class.
///
/// Declaration order defines both the slot index and the positional
/// initializer mapping. Slots are always the dense range `0..n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectSchema {
    class_name: String,
    properties: Vec<PropertyDescriptor>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl ObjectSchema {
    /// Start building a schema for `class_name`
    pub fn builder(class_name: impl Into<String>) -> ObjectSchemaBuilder {
        ObjectSchemaBuilder {
            class_name: class_name.into(),
            properties: Vec::new(),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Properties in slot order
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Look up a property by name
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.by_name.get(name).map(|&slot| &self.properties[slot])
    }

    /// Resolve a dynamic key to its descriptor.
    ///
    /// This is the single resolution step shared by typed and dynamic access.
    pub fn descriptor<'k>(&self, key: impl Into<PropertyKey<'k>>) -> AccessorResult<&PropertyDescriptor> {
        match key.into() {
            PropertyKey::Name(name) => {
                self.property(name)
                    .ok_or_else(|| AccessorError::UnknownProperty {
                        class_name: self.class_name.clone(),
                        name: name.to_string(),
                    })
            }
            PropertyKey::Slot(index) => {
                self.properties
                    .get(index)
                    .ok_or_else(|| AccessorError::IndexOutOfRange {
                        class_name: self.class_name.clone(),
                        index,
                        count: self.properties.len(),
                    })
            }
        }
    }

    /// Property names in slot order
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    /// Classes this schema links to
    pub fn linked_classes(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter_map(|p| p.object_class.as_deref())
    }

    /// Converts to the on-disk definition format
    pub fn to_definition(&self) -> SchemaDefinition {
        SchemaDefinition {
            class_name: self.class_name.clone(),
            properties: self
                .properties
                .iter()
                .map(|p| PropertyDefinition {
                    name: p.name.clone(),
                    property_type: p.property_type,
                    object_class: p.object_class.clone(),
                })
                .collect(),
        }
    }

    /// Builds and validates a schema from its definition
    pub fn from_definition(definition: SchemaDefinition) -> SchemaResult<Self> {
        let mut builder = ObjectSchema::builder(definition.class_name);
        for property in definition.properties {
            builder = builder.property(property.name, property.property_type, property.object_class);
        }
        builder.build()
    }
}

/// Builder assigning slots in declaration order
#[derive(Debug, Clone)]
pub struct ObjectSchemaBuilder {
    class_name: String,
    properties: Vec<(String, PropertyType, Option<String>)>,
}

impl ObjectSchemaBuilder {
    /// Declare a property. `object_class` is only meaningful for links.
    pub fn property<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        property_type: PropertyType,
        object_class: Option<S>,
    ) -> Self {
        self.properties
            .push((name.into(), property_type, object_class.map(Into::into)));
        self
    }

    /// Declare a primitive property
    pub fn primitive(self, name: impl Into<String>, property_type: PropertyType) -> Self {
        self.property(name, property_type, None::<String>)
    }

    /// Declare a link property
    pub fn link(self, name: impl Into<String>, object_class: impl Into<String>) -> Self {
        self.property(name, PropertyType::Object, Some(object_class.into()))
    }

    pub fn build(self) -> SchemaResult<ObjectSchema> {
        if self.class_name.is_empty() {
            return Err(SchemaError::malformed_schema("<builder>", "class name is empty"));
        }

        let mut properties = Vec::with_capacity(self.properties.len());
        let mut by_name = HashMap::with_capacity(self.properties.len());

        for (slot, (name, property_type, object_class)) in self.properties.into_iter().enumerate() {
            if name.is_empty() {
                return Err(SchemaError::malformed_schema(
                    &self.class_name,
                    format!("property at slot {} has an empty name", slot),
                ));
            }
            if by_name.insert(name.clone(), slot).is_some() {
                return Err(SchemaError::duplicate_property(&self.class_name, &name));
            }

            let object_class = match property_type {
                PropertyType::Object => match object_class {
                    Some(class) if !class.is_empty() => Some(class),
                    _ => return Err(SchemaError::missing_link_target(&self.class_name, &name)),
                },
                _ => None,
            };

            properties.push(PropertyDescriptor {
                name,
                property_type,
                slot,
                object_class,
            });
        }

        Ok(ObjectSchema {
            class_name: self.class_name,
            properties,
            by_name,
        })
    }
}

/// JSON definition of a schema. Slots are implied by property order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub class_name: String,
    pub properties: Vec<PropertyDefinition>,
}

/// JSON definition of one property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_class: Option<String>,
}
