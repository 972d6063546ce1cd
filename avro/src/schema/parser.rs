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

use crate::error::Details;
use crate::schema::{
    ArraySchema, EnumSchema, FixedSchema, MapSchema, Name, NamespaceRef, PrimitiveSchema,
    PrimitiveType, RecordField, RecordSchema, Schema, UnionSchema, registry::Registry,
};
use crate::util::MapHelper;
use crate::validator::validate_enum_symbol_name;
use crate::AvroResult;
use log::debug;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

const NAMED_ATTRIBUTES: [&str; 5] = ["type", "name", "namespace", "doc", "logicalType"];

/// Recursive descent over one JSON schema document.
#[derive(Default)]
pub(crate) struct Parser {
    registry: Registry,
}

impl Parser {
    /// Parse a whole document, checking that every referenced name got defined.
    pub(crate) fn parse_document(mut self, value: &Value) -> AvroResult<Schema> {
        let schema = self.parse(value, None)?;
        self.registry.finish()?;
        Ok(schema)
    }

    /// Create a `Schema` from a `serde_json::Value` representing a JSON Avro schema.
    pub(crate) fn parse(
        &mut self,
        value: &Value,
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Schema> {
        match *value {
            Value::String(ref t) => self.parse_known_schema(t.as_str(), enclosing_namespace),
            Value::Object(ref data) => self.parse_complex(data, enclosing_namespace),
            Value::Array(ref data) => self.parse_union(data, enclosing_namespace),
            _ => Err(Details::ParseSchemaFromValidJson.into()),
        }
    }

    /// Parse a string as a primitive type or a reference to a named type.
    fn parse_known_schema(
        &mut self,
        name: &str,
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Schema> {
        if let Ok(primitive) = PrimitiveType::from_str(name) {
            return Ok(Schema::from(primitive));
        }
        match name {
            "record" | "error" | "enum" | "fixed" | "array" | "map" => {
                Err(Details::ReservedTypeName(name.to_string()).into())
            }
            _ => {
                let fullname = Name::new_with_enclosing_namespace(name, enclosing_namespace)?;
                Ok(self.registry.reference(fullname))
            }
        }
    }

    /// Parse a JSON object, dispatching on its `type` attribute.
    fn parse_complex(
        &mut self,
        complex: &Map<String, Value>,
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Schema> {
        let logical_type = complex.logical_type()?;
        match complex.get("type") {
            Some(Value::String(t)) => match t.as_str() {
                "record" => self.parse_record(complex, enclosing_namespace, logical_type, false),
                "error" => self.parse_record(complex, enclosing_namespace, logical_type, true),
                "enum" => self.parse_enum(complex, enclosing_namespace, logical_type),
                "fixed" => self.parse_fixed(complex, enclosing_namespace, logical_type),
                "array" => self.parse_array(complex, enclosing_namespace, logical_type),
                "map" => self.parse_map(complex, enclosing_namespace, logical_type),
                other => match PrimitiveType::from_str(other) {
                    Ok(primitive) => Ok(Schema::Primitive(PrimitiveSchema {
                        primitive,
                        logical_type,
                        attributes: complex.custom_attributes(&["type", "logicalType"]),
                    })),
                    Err(_) => self.parse_known_schema(other, enclosing_namespace),
                },
            },
            Some(Value::Object(data)) => self.parse_complex(data, enclosing_namespace),
            Some(Value::Array(variants)) => self.parse_union(variants, enclosing_namespace),
            Some(other) => Err(Details::GetComplexType(other.clone()).into()),
            None => Err(Details::GetComplexTypeField.into()),
        }
    }

    /// Parse a `serde_json::Value` representing an Avro record (or error) type into a `Schema`.
    fn parse_record(
        &mut self,
        complex: &Map<String, Value>,
        enclosing_namespace: NamespaceRef,
        logical_type: Option<String>,
        is_error: bool,
    ) -> AvroResult<Schema> {
        let fully_qualified_name = Name::parse(complex, enclosing_namespace)?;
        let doc = complex.doc()?;
        let fields_json = match complex.get("fields") {
            Some(Value::Array(fields)) => fields,
            Some(other) => return Err(Details::GetRecordFieldsArray(other.clone()).into()),
            None => return Err(Details::GetRecordFieldsJson.into()),
        };

        self.registry.register(&fully_qualified_name)?;
        debug!("Going to parse record schema: {fully_qualified_name:?}");

        let mut lookup = BTreeMap::new();
        let mut fields = Vec::with_capacity(fields_json.len());
        for (position, field) in fields_json.iter().enumerate() {
            let field = RecordField::parse(field, position, self, &fully_qualified_name)?;
            if lookup.insert(field.name.clone(), position).is_some() {
                return Err(Details::FieldNameDuplicate(field.name).into());
            }
            fields.push(field);
        }

        let mut reserved = NAMED_ATTRIBUTES.to_vec();
        reserved.push("fields");
        Ok(Schema::Record(RecordSchema {
            name: fully_qualified_name,
            doc,
            fields,
            lookup,
            is_error,
            logical_type,
            attributes: complex.custom_attributes(&reserved),
        }))
    }

    /// Parse a `serde_json::Value` representing an Avro enum type into a `Schema`.
    fn parse_enum(
        &mut self,
        complex: &Map<String, Value>,
        enclosing_namespace: NamespaceRef,
        logical_type: Option<String>,
    ) -> AvroResult<Schema> {
        let fully_qualified_name = Name::parse(complex, enclosing_namespace)?;
        let doc = complex.doc()?;
        let symbols_json = complex.get("symbols").ok_or(Details::GetEnumSymbolsField)?;

        let symbols: Vec<String> = symbols_json
            .as_array()
            .and_then(|symbols| {
                symbols
                    .iter()
                    .map(|symbol| symbol.as_str().map(|s| s.to_string()))
                    .collect::<Option<_>>()
            })
            .ok_or_else(|| Details::GetEnumSymbols(symbols_json.clone()))?;

        let mut existing_symbols: HashSet<&String> = HashSet::with_capacity(symbols.len());
        for symbol in symbols.iter() {
            validate_enum_symbol_name(symbol)?;

            // Ensure there are no duplicate symbols
            if !existing_symbols.insert(symbol) {
                return Err(Details::EnumSymbolDuplicate(symbol.to_string()).into());
            }
        }

        self.registry.register(&fully_qualified_name)?;

        let mut reserved = NAMED_ATTRIBUTES.to_vec();
        reserved.push("symbols");
        Ok(Schema::Enum(EnumSchema {
            name: fully_qualified_name,
            doc,
            symbols,
            logical_type,
            attributes: complex.custom_attributes(&reserved),
        }))
    }

    /// Parse a `serde_json::Value` representing an Avro fixed type into a `Schema`.
    fn parse_fixed(
        &mut self,
        complex: &Map<String, Value>,
        enclosing_namespace: NamespaceRef,
        logical_type: Option<String>,
    ) -> AvroResult<Schema> {
        let fully_qualified_name = Name::parse(complex, enclosing_namespace)?;
        let doc = complex.doc()?;
        let size = match complex.get("size") {
            Some(size) => size
                .as_u64()
                .and_then(|size| usize::try_from(size).ok())
                .ok_or_else(|| Details::GetFixedSizeFieldPositive(size.clone())),
            None => Err(Details::GetFixedSizeField),
        }?;

        self.registry.register(&fully_qualified_name)?;

        let mut reserved = NAMED_ATTRIBUTES.to_vec();
        reserved.push("size");
        Ok(Schema::Fixed(FixedSchema {
            name: fully_qualified_name,
            doc,
            size,
            logical_type,
            attributes: complex.custom_attributes(&reserved),
        }))
    }

    /// Parse a `serde_json::Value` representing an Avro array type into a `Schema`.
    fn parse_array(
        &mut self,
        complex: &Map<String, Value>,
        enclosing_namespace: NamespaceRef,
        logical_type: Option<String>,
    ) -> AvroResult<Schema> {
        let items = complex
            .get("items")
            .ok_or_else(|| Details::GetArrayItemsField.into())
            .and_then(|items| self.parse(items, enclosing_namespace))?;
        Ok(Schema::Array(ArraySchema {
            items: Box::new(items),
            logical_type,
            attributes: complex.custom_attributes(&["type", "items", "logicalType"]),
        }))
    }

    /// Parse a `serde_json::Value` representing an Avro map type into a `Schema`.
    fn parse_map(
        &mut self,
        complex: &Map<String, Value>,
        enclosing_namespace: NamespaceRef,
        logical_type: Option<String>,
    ) -> AvroResult<Schema> {
        let values = complex
            .get("values")
            .ok_or_else(|| Details::GetMapValuesField.into())
            .and_then(|values| self.parse(values, enclosing_namespace))?;
        Ok(Schema::Map(MapSchema {
            values: Box::new(values),
            logical_type,
            attributes: complex.custom_attributes(&["type", "values", "logicalType"]),
        }))
    }

    /// Parse a `serde_json::Value` representing an Avro union type into a `Schema`.
    fn parse_union(
        &mut self,
        items: &[Value],
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Schema> {
        if items.is_empty() {
            return Err(Details::EmptyUnion.into());
        }
        let schemas = items
            .iter()
            .map(|v| self.parse(v, enclosing_namespace))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Schema::Union(UnionSchema::new(schemas)?))
    }
}
