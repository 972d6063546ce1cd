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

use crate::schema::{Attributes, Documentation, Name, RecordField};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

/// A description of a Record schema.
#[derive(bon::Builder, Clone, PartialEq)]
pub struct RecordSchema {
    /// The name of the schema
    pub name: Name,
    /// The documentation of the schema
    #[builder(default)]
    pub doc: Documentation,
    /// The set of fields of the schema
    #[builder(default)]
    pub fields: Vec<RecordField>,
    /// The `lookup` table maps field names to their position in the `Vec`
    /// of `fields`.
    #[builder(skip = calculate_lookup_table(&fields))]
    pub lookup: BTreeMap<String, usize>,
    /// Declared with `"type": "error"` rather than `"type": "record"`.
    #[builder(default)]
    pub is_error: bool,
    /// The `logicalType` annotation, if any.
    pub logical_type: Option<String>,
    /// The custom attributes of the schema
    #[builder(default)]
    pub attributes: Attributes,
}

impl Debug for RecordSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("RecordSchema");
        debug.field("name", &self.name);
        if let Some(doc) = &self.doc {
            debug.field("doc", doc);
        }
        debug.field("fields", &self.fields);
        if self.is_error {
            debug.field("is_error", &self.is_error);
        }
        if let Some(logical_type) = &self.logical_type {
            debug.field("logical_type", logical_type);
        }
        if !self.attributes.is_empty() {
            debug.field("attributes", &self.attributes);
        }
        debug.finish_non_exhaustive()
    }
}

impl RecordSchema {
    /// The field called `name`, if the record has one.
    pub fn field(&self, name: &str) -> Option<&RecordField> {
        self.lookup.get(name).and_then(|&idx| self.fields.get(idx))
    }
}

/// Calculate the lookup table for the given fields.
fn calculate_lookup_table(fields: &[RecordField]) -> BTreeMap<String, usize> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| (field.name.clone(), i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        TestResult,
        schema::{PrimitiveType, Schema},
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_is_built_from_fields() -> TestResult {
        let record = RecordSchema::builder()
            .name(Name::new("example.User")?)
            .fields(vec![
                RecordField::builder()
                    .name("name")
                    .schema(Schema::from(PrimitiveType::String))
                    .build(),
                RecordField::builder()
                    .name("age")
                    .schema(Schema::from(PrimitiveType::Int))
                    .position(1)
                    .build(),
            ])
            .build();

        assert_eq!(record.lookup.get("age"), Some(&1));
        assert_eq!(
            record.field("name").map(|f| &f.schema),
            Some(&Schema::from(PrimitiveType::String))
        );
        assert!(record.field("missing").is_none());
        assert!(!record.is_error);
        Ok(())
    }
}
