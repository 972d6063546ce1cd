// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Logic for parsing and interacting with schemas in Avro format.

mod canonical;
mod name;
mod parser;
mod record;
mod registry;
mod resolve;
mod union;

pub(crate) use crate::schema::parser::Parser;
pub use crate::schema::{
    name::{Name, Names, NamesRef, Namespace, NamespaceRef},
    record::{RecordField, RecordFieldOrder, RecordSchema},
    resolve::ResolvedSchema,
    union::UnionSchema,
};
use crate::{AvroResult, error::Details};
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Represents documentation for complex Avro schemas.
pub type Documentation = Option<String>;

/// Attributes of a schema this crate does not interpret, in document order.
pub type Attributes = Map<String, JsonValue>;

/// The eight Avro primitive types.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, IntoStaticStr, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveType {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
}

impl PrimitiveType {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// The kind of a [`Schema`], with primitives told apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SchemaKind {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Array,
    Map,
    Union,
    Record,
    Enum,
    Fixed,
    Ref,
}

impl From<PrimitiveType> for SchemaKind {
    fn from(primitive: PrimitiveType) -> Self {
        match primitive {
            PrimitiveType::Null => SchemaKind::Null,
            PrimitiveType::Boolean => SchemaKind::Boolean,
            PrimitiveType::Int => SchemaKind::Int,
            PrimitiveType::Long => SchemaKind::Long,
            PrimitiveType::Float => SchemaKind::Float,
            PrimitiveType::Double => SchemaKind::Double,
            PrimitiveType::Bytes => SchemaKind::Bytes,
            PrimitiveType::String => SchemaKind::String,
        }
    }
}

impl From<&Schema> for SchemaKind {
    fn from(schema: &Schema) -> Self {
        match schema {
            Schema::Primitive(primitive) => primitive.primitive.into(),
            Schema::Array(_) => SchemaKind::Array,
            Schema::Map(_) => SchemaKind::Map,
            Schema::Union(_) => SchemaKind::Union,
            Schema::Record(_) => SchemaKind::Record,
            Schema::Enum(_) => SchemaKind::Enum,
            Schema::Fixed(_) => SchemaKind::Fixed,
            Schema::Ref { .. } => SchemaKind::Ref,
        }
    }
}

/// Represents any valid Avro schema
/// More information about Avro schemas can be found in the
/// [Avro Specification](https://avro.apache.org/docs/++version++/specification/#schema-declaration)
///
/// A named type is defined inline exactly once, at its first occurrence in the document.
/// Every later use, including recursive uses from inside its own definition, is a
/// [`Schema::Ref`] resolved through a [`ResolvedSchema`].
#[derive(Clone, Debug, PartialEq)]
pub enum Schema {
    /// One of the eight primitive types, possibly annotated.
    Primitive(PrimitiveSchema),
    /// An `array` Avro schema.
    ///
    /// All items will have the same schema.
    Array(ArraySchema),
    /// A `map` Avro schema.
    ///
    /// Keys are always strings and all values will have the same schema.
    Map(MapSchema),
    /// A `union` Avro schema.
    Union(UnionSchema),
    /// A `record` (or `error`) Avro schema.
    Record(RecordSchema),
    /// An `enum` Avro schema.
    Enum(EnumSchema),
    /// A `fixed` Avro schema.
    Fixed(FixedSchema),
    /// A reference to a named schema defined elsewhere in the same document.
    Ref { name: Name },
}

/// A primitive schema with its optional annotations.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimitiveSchema {
    pub primitive: PrimitiveType,
    pub logical_type: Option<String>,
    pub attributes: Attributes,
}

impl PrimitiveSchema {
    /// A bare primitive without annotations.
    pub fn new(primitive: PrimitiveType) -> Self {
        Self {
            primitive,
            logical_type: None,
            attributes: Attributes::new(),
        }
    }

    fn is_bare(&self) -> bool {
        self.logical_type.is_none() && self.attributes.is_empty()
    }
}

/// A description of an Array schema.
#[derive(Clone, Debug, PartialEq)]
pub struct ArraySchema {
    pub items: Box<Schema>,
    pub logical_type: Option<String>,
    pub attributes: Attributes,
}

impl ArraySchema {
    pub fn new(items: Schema) -> Self {
        Self {
            items: Box::new(items),
            logical_type: None,
            attributes: Attributes::new(),
        }
    }
}

/// A description of a Map schema.
#[derive(Clone, Debug, PartialEq)]
pub struct MapSchema {
    pub values: Box<Schema>,
    pub logical_type: Option<String>,
    pub attributes: Attributes,
}

impl MapSchema {
    pub fn new(values: Schema) -> Self {
        Self {
            values: Box::new(values),
            logical_type: None,
            attributes: Attributes::new(),
        }
    }
}

/// A description of an Enum schema.
#[derive(bon::Builder, Debug, Clone, PartialEq)]
pub struct EnumSchema {
    /// The name of the schema
    pub name: Name,
    /// The documentation of the schema
    #[builder(default)]
    pub doc: Documentation,
    /// The set of symbols of the schema
    pub symbols: Vec<String>,
    /// The `logicalType` annotation, if any.
    pub logical_type: Option<String>,
    /// The custom attributes of the schema
    #[builder(default)]
    pub attributes: Attributes,
}

impl EnumSchema {
    /// Position of `symbol`, if the enum declares it.
    pub fn symbol_index(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }
}

/// A description of a Fixed schema.
#[derive(bon::Builder, Debug, Clone, PartialEq)]
pub struct FixedSchema {
    /// The name of the schema
    pub name: Name,
    /// The documentation of the schema. Accepted on input, never written out.
    #[builder(default)]
    pub doc: Documentation,
    /// The size of the fixed schema
    pub size: usize,
    /// The `logicalType` annotation, if any.
    pub logical_type: Option<String>,
    /// The custom attributes of the schema
    #[builder(default)]
    pub attributes: Attributes,
}

impl From<PrimitiveType> for Schema {
    fn from(primitive: PrimitiveType) -> Self {
        Schema::Primitive(PrimitiveSchema::new(primitive))
    }
}

impl Schema {
    /// Parse a schema from its JSON text.
    ///
    /// Named types may be referenced before they are defined, as long as the definition
    /// appears somewhere in the same document.
    pub fn parse_str(input: &str) -> AvroResult<Schema> {
        let value: JsonValue = serde_json::from_str(input).map_err(Details::ParseSchemaJson)?;
        Self::parse(&value)
    }

    /// Parse a schema from an already decoded JSON document.
    pub fn parse(value: &JsonValue) -> AvroResult<Schema> {
        Parser::default().parse_document(value)
    }

    /// An `array` schema of `items`.
    pub fn array(items: Schema) -> Self {
        Schema::Array(ArraySchema::new(items))
    }

    /// A `map` schema of `values`.
    pub fn map(values: Schema) -> Self {
        Schema::Map(MapSchema::new(values))
    }

    /// Returns the name of the schema if it is a named type or a reference to one.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Schema::Record(RecordSchema { name, .. })
            | Schema::Enum(EnumSchema { name, .. })
            | Schema::Fixed(FixedSchema { name, .. })
            | Schema::Ref { name } => Some(name),
            _ => None,
        }
    }

    /// Returns the namespace of the schema if it has one.
    pub fn namespace(&self) -> NamespaceRef<'_> {
        self.name().and_then(Name::namespace)
    }

    /// Whether this is a `record`, `enum` or `fixed` definition.
    pub fn is_named(&self) -> bool {
        matches!(
            self,
            Schema::Record(_) | Schema::Enum(_) | Schema::Fixed(_)
        )
    }

    /// Returns the doc of the schema if it has one.
    pub fn doc(&self) -> Option<&str> {
        match self {
            Schema::Record(RecordSchema { doc, .. })
            | Schema::Enum(EnumSchema { doc, .. })
            | Schema::Fixed(FixedSchema { doc, .. }) => doc.as_deref(),
            _ => None,
        }
    }

    /// Returns the `logicalType` annotation, if any.
    pub fn logical_type(&self) -> Option<&str> {
        match self {
            Schema::Primitive(PrimitiveSchema { logical_type, .. })
            | Schema::Array(ArraySchema { logical_type, .. })
            | Schema::Map(MapSchema { logical_type, .. })
            | Schema::Record(RecordSchema { logical_type, .. })
            | Schema::Enum(EnumSchema { logical_type, .. })
            | Schema::Fixed(FixedSchema { logical_type, .. }) => logical_type.as_deref(),
            Schema::Union(_) | Schema::Ref { .. } => None,
        }
    }

    /// Returns the attributes this crate does not interpret.
    pub fn custom_attributes(&self) -> Option<&Attributes> {
        match self {
            Schema::Primitive(PrimitiveSchema { attributes, .. })
            | Schema::Array(ArraySchema { attributes, .. })
            | Schema::Map(MapSchema { attributes, .. })
            | Schema::Record(RecordSchema { attributes, .. })
            | Schema::Enum(EnumSchema { attributes, .. })
            | Schema::Fixed(FixedSchema { attributes, .. }) => Some(attributes),
            Schema::Union(_) | Schema::Ref { .. } => None,
        }
    }

    /// The identity of this schema as a union branch: the primitive name, `array`, `map`,
    /// `union`, or the fullname of a named type.
    pub fn type_signature(&self) -> String {
        match self {
            Schema::Primitive(primitive) => primitive.primitive.as_str().to_string(),
            Schema::Array(_) => "array".to_string(),
            Schema::Map(_) => "map".to_string(),
            Schema::Union(_) => "union".to_string(),
            Schema::Record(RecordSchema { name, .. })
            | Schema::Enum(EnumSchema { name, .. })
            | Schema::Fixed(FixedSchema { name, .. })
            | Schema::Ref { name } => name.fullname(),
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.try_to_text().map_err(|_| fmt::Error)?)
    }
}
