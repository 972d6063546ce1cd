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

//! Normalized JSON form of a [`Schema`].
//!
//! The output is compact JSON with a fixed key order. A named type writes its
//! `namespace` only when it differs from the namespace of the enclosing named type,
//! and a reference is written relative to that enclosing namespace.

use crate::{
    AvroResult,
    error::Details,
    schema::{
        ArraySchema, Attributes, EnumSchema, FixedSchema, MapSchema, NamespaceRef, RecordField,
        RecordSchema, Schema,
    },
};
use serde::{
    Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};

impl Schema {
    /// The normalized JSON text of this schema, or the serializer's error.
    pub fn try_to_text(&self) -> AvroResult<String> {
        serde_json::to_string(self).map_err(|e| Details::SerializeSchema(e).into())
    }

    /// The normalized JSON text of this schema.
    ///
    /// # Panics
    ///
    /// If the schema cannot be serialized, see [`Schema::try_to_text`].
    pub fn to_text(&self) -> String {
        self.try_to_text().unwrap_or_else(|e| panic!("Cannot serialize schema: {e}"))
    }
}

impl Serialize for Schema {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Canonical {
            schema: self,
            enclosing_namespace: None,
        }
        .serialize(serializer)
    }
}

/// A schema seen from inside the named type whose namespace is `enclosing_namespace`.
struct Canonical<'a> {
    schema: &'a Schema,
    enclosing_namespace: NamespaceRef<'a>,
}

impl<'a> Canonical<'a> {
    fn nested(&self, schema: &'a Schema, enclosing_namespace: NamespaceRef<'a>) -> Self {
        Canonical {
            schema,
            enclosing_namespace,
        }
    }
}

/// `logicalType` followed by the custom attributes.
fn serialize_annotations<M: SerializeMap>(
    map: &mut M,
    logical_type: &Option<String>,
    attributes: &Attributes,
) -> Result<(), M::Error> {
    if let Some(logical_type) = logical_type {
        map.serialize_entry("logicalType", logical_type)?;
    }
    for (key, value) in attributes {
        map.serialize_entry(key, value)?;
    }
    Ok(())
}

impl Serialize for Canonical<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let enclosing_namespace = self.enclosing_namespace;
        match self.schema {
            Schema::Ref { name } => {
                serializer.serialize_str(&name.relative_to(enclosing_namespace))
            }
            Schema::Primitive(primitive) if primitive.is_bare() => {
                serializer.serialize_str(primitive.primitive.as_str())
            }
            Schema::Primitive(primitive) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", primitive.primitive.as_str())?;
                serialize_annotations(&mut map, &primitive.logical_type, &primitive.attributes)?;
                map.end()
            }
            Schema::Array(ArraySchema {
                items,
                logical_type,
                attributes,
            }) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("items", &self.nested(items, enclosing_namespace))?;
                serialize_annotations(&mut map, logical_type, attributes)?;
                map.end()
            }
            Schema::Map(MapSchema {
                values,
                logical_type,
                attributes,
            }) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", "map")?;
                map.serialize_entry("values", &self.nested(values, enclosing_namespace))?;
                serialize_annotations(&mut map, logical_type, attributes)?;
                map.end()
            }
            Schema::Union(inner) => {
                let variants = inner.variants();
                let mut seq = serializer.serialize_seq(Some(variants.len()))?;
                for v in variants {
                    seq.serialize_element(&self.nested(v, enclosing_namespace))?;
                }
                seq.end()
            }
            Schema::Record(RecordSchema {
                name,
                doc,
                fields,
                is_error,
                logical_type,
                attributes,
                lookup: _lookup,
            }) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", if *is_error { "error" } else { "record" })?;
                map.serialize_entry("name", name.name())?;
                if name.namespace() != enclosing_namespace {
                    map.serialize_entry("namespace", name.namespace().unwrap_or_default())?;
                }
                if let Some(docstr) = doc {
                    map.serialize_entry("doc", docstr)?;
                }
                serialize_annotations(&mut map, logical_type, attributes)?;
                let fields: Vec<CanonicalField<'_>> = fields
                    .iter()
                    .map(|field| CanonicalField {
                        field,
                        enclosing_namespace: name.namespace(),
                    })
                    .collect();
                map.serialize_entry("fields", &fields)?;
                map.end()
            }
            Schema::Enum(EnumSchema {
                name,
                doc,
                symbols,
                logical_type,
                attributes,
            }) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", "enum")?;
                map.serialize_entry("name", name.name())?;
                if name.namespace() != enclosing_namespace {
                    map.serialize_entry("namespace", name.namespace().unwrap_or_default())?;
                }
                if let Some(docstr) = doc {
                    map.serialize_entry("doc", docstr)?;
                }
                serialize_annotations(&mut map, logical_type, attributes)?;
                map.serialize_entry("symbols", symbols)?;
                map.end()
            }
            Schema::Fixed(FixedSchema {
                name,
                doc: _doc,
                size,
                logical_type,
                attributes,
            }) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", "fixed")?;
                map.serialize_entry("name", name.name())?;
                if name.namespace() != enclosing_namespace {
                    map.serialize_entry("namespace", name.namespace().unwrap_or_default())?;
                }
                serialize_annotations(&mut map, logical_type, attributes)?;
                map.serialize_entry("size", size)?;
                map.end()
            }
        }
    }
}

struct CanonicalField<'a> {
    field: &'a RecordField,
    enclosing_namespace: NamespaceRef<'a>,
}

impl Serialize for CanonicalField<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let field = self.field;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &field.name)?;
        map.serialize_entry(
            "type",
            &Canonical {
                schema: &field.schema,
                enclosing_namespace: self.enclosing_namespace,
            },
        )?;
        if let Some(default) = &field.default {
            map.serialize_entry("default", default)?;
        }
        if let Some(order) = field.order {
            map.serialize_entry("order", <&str>::from(order))?;
        }
        if let Some(doc) = &field.doc {
            map.serialize_entry("doc", doc)?;
        }
        for (key, value) in &field.custom_attributes {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TestResult, schema::PrimitiveType};
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_primitive_is_a_string() -> TestResult {
        assert_eq!(Schema::parse_str(r#"{"type": "int"}"#)?.to_text(), r#""int""#);
        assert_eq!(Schema::from(PrimitiveType::Null).to_string(), r#""null""#);
        assert_eq!(Schema::from(PrimitiveType::Long).try_to_text()?, r#""long""#);
        Ok(())
    }

    #[test]
    fn nested_namespace_is_written_when_it_changes() -> TestResult {
        let schema = Schema::parse_str(
            r#"{"type": "record", "name": "Outer", "namespace": "a", "fields": [
                {"name": "same", "type": {"type": "fixed", "name": "F", "size": 1}},
                {"name": "other", "type": {"type": "fixed", "name": "b.G", "size": 1}},
                {"name": "none", "type": {"type": "fixed", "name": "H", "namespace": "", "size": 1}},
                {"name": "again", "type": "b.G"}]}"#,
        )?;
        assert_eq!(
            schema.to_text(),
            concat!(
                r#"{"type":"record","name":"Outer","namespace":"a","fields":["#,
                r#"{"name":"same","type":{"type":"fixed","name":"F","size":1}},"#,
                r#"{"name":"other","type":{"type":"fixed","name":"G","namespace":"b","size":1}},"#,
                r#"{"name":"none","type":{"type":"fixed","name":"H","namespace":"","size":1}},"#,
                r#"{"name":"again","type":"b.G"}]}"#
            )
        );
        Ok(())
    }

    #[test]
    fn canonical_text_parses_back_to_the_same_schema() -> TestResult {
        let input = r#"{"type": "record", "name": "LongList", "namespace": "x",
            "doc": "Linked list", "fields": [
              {"name": "value", "type": "long", "order": "ignore"},
              {"name": "next", "type": ["null", "LongList"], "default": null}]}"#;
        let schema = Schema::parse_str(input)?;
        let text = schema.to_text();
        assert_eq!(Schema::parse_str(&text)?, schema);
        assert_eq!(Schema::parse_str(&text)?.to_text(), text);
        Ok(())
    }
}
