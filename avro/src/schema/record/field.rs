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

use crate::AvroResult;
use crate::error::Details;
use crate::schema::{Attributes, Documentation, Name, Parser, Schema};
use crate::util::MapHelper;
use crate::validator::validate_record_field_name;
use serde_json::{Map, Value};
use std::str::FromStr;
use strum_macros::{EnumString, IntoStaticStr};

/// Represents a `field` in a `record` Avro schema.
#[derive(bon::Builder, Clone, Debug, PartialEq)]
pub struct RecordField {
    /// Name of the field.
    #[builder(into)]
    pub name: String,
    /// Documentation of the field.
    #[builder(default)]
    pub doc: Documentation,
    /// Default value of the field, kept as written.
    pub default: Option<Value>,
    /// Schema of the field.
    pub schema: Schema,
    /// Sort order of the field, when one was declared.
    pub order: Option<RecordFieldOrder>,
    /// Position of the field in the list of `fields` of its parent `Schema`
    #[builder(default)]
    pub position: usize,
    /// All attributes of the field this crate does not interpret, in document order.
    #[builder(default)]
    pub custom_attributes: Attributes,
}

/// Represents any valid order for a `field` in a `record` Avro schema.
#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab_case")]
pub enum RecordFieldOrder {
    Ascending,
    Descending,
    Ignore,
}

const RESERVED_FIELD_ATTRIBUTES: &[&str] = &["name", "type", "default", "order", "doc"];

impl RecordField {
    /// Parse one element of a record's `fields` array.
    pub(crate) fn parse(
        field: &Value,
        position: usize,
        parser: &mut Parser,
        enclosing_record: &Name,
    ) -> AvroResult<Self> {
        let field = field
            .as_object()
            .ok_or_else(|| Details::GetRecordFieldObject(field.clone()))?;
        let name = match field.get("name") {
            Some(Value::String(name)) => name.clone(),
            _ => return Err(Details::GetNameFieldFromRecord.into()),
        };
        validate_record_field_name(&name)?;

        let field_type = field
            .get("type")
            .ok_or_else(|| Details::GetRecordFieldTypeField(name.clone()))?;
        let order = Self::parse_order(field)?;
        let doc = field.doc()?;

        let schema = parser.parse(field_type, enclosing_record.namespace())?;

        Ok(RecordField {
            name,
            doc,
            default: field.get("default").cloned(),
            schema,
            order,
            position,
            custom_attributes: field.custom_attributes(RESERVED_FIELD_ATTRIBUTES),
        })
    }

    fn parse_order(field: &Map<String, Value>) -> AvroResult<Option<RecordFieldOrder>> {
        match field.get("order") {
            None => Ok(None),
            Some(Value::String(order)) => RecordFieldOrder::from_str(order)
                .map(Some)
                .map_err(|_| Details::InvalidFieldOrder(Value::String(order.clone())).into()),
            Some(other) => Err(Details::InvalidFieldOrder(other.clone()).into()),
        }
    }

    /// Returns true if this `RecordField` is a union whose first variant is `null`.
    pub fn is_nullable(&self) -> bool {
        match &self.schema {
            Schema::Union(inner) => inner.is_nullable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TestResult, schema::PrimitiveType};
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_defaults() {
        let field = RecordField::builder()
            .name("count")
            .schema(Schema::from(PrimitiveType::Long))
            .build();
        assert_eq!(field.position, 0);
        assert_eq!(field.order, None);
        assert!(field.custom_attributes.is_empty());
        assert!(!field.is_nullable());
    }

    #[test]
    fn order_must_be_known() -> TestResult {
        let json = serde_json::json!({"order": "descending"});
        let map = json.as_object().expect("object literal");
        assert_eq!(
            RecordField::parse_order(map)?,
            Some(RecordFieldOrder::Descending)
        );

        let json = serde_json::json!({"order": "bad"});
        let map = json.as_object().expect("object literal");
        assert!(RecordField::parse_order(map).is_err());
        Ok(())
    }
}
