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

use crate::{
    AvroResult,
    error::Details,
    schema::{
        ArraySchema, EnumSchema, FixedSchema, MapSchema, Name, PrimitiveSchema, PrimitiveType,
        RecordSchema, ResolvedSchema, Schema, SchemaKind, UnionSchema,
    },
    types::{Value, ValueKind},
    zigzag::{write_int, write_long},
};
use log::error;
use std::{borrow::Borrow, collections::HashMap, io::Write};

/// Encode a `Value` into avro format, guided by its `Schema`.
///
/// Returns the number of bytes written. Values whose shape disagrees with the schema are
/// rejected.
pub fn encode<W: Write>(value: &Value, schema: &Schema, writer: &mut W) -> AvroResult<usize> {
    let rs = ResolvedSchema::try_from(schema)?;
    encode_internal(value, schema, rs.get_names(), writer)
}

/// Encode a `Value` into a fresh byte vector.
pub fn to_avro_datum(schema: &Schema, value: &Value) -> AvroResult<Vec<u8>> {
    let mut buffer = Vec::new();
    encode(value, schema, &mut buffer)?;
    Ok(buffer)
}

fn write_all<W: Write>(bytes: &[u8], writer: &mut W) -> AvroResult<usize> {
    writer.write_all(bytes).map_err(Details::WriteBytes)?;
    Ok(bytes.len())
}

pub(crate) fn encode_bytes<B: AsRef<[u8]> + ?Sized, W: Write>(
    s: &B,
    writer: &mut W,
) -> AvroResult<usize> {
    let bytes = s.as_ref();
    let len = write_long(bytes.len() as i64, writer)?;
    Ok(len + write_all(bytes, writer)?)
}

fn mismatch(value: &Value, schema: &Schema) -> Details {
    error!("Cannot encode {value:?} as {schema:?}");
    Details::ValueDoesNotMatchSchema {
        value_kind: ValueKind::from(value),
        schema_kind: SchemaKind::from(schema),
    }
}

fn encode_primitive<W: Write>(
    value: &Value,
    schema: &Schema,
    primitive: PrimitiveType,
    writer: &mut W,
) -> AvroResult<usize> {
    match (primitive, value) {
        (PrimitiveType::Null, Value::Null) => Ok(0),
        (PrimitiveType::Boolean, Value::Boolean(b)) => write_all(&[u8::from(*b)], writer),
        (PrimitiveType::Int, Value::Int(i)) => write_int(*i, writer),
        (PrimitiveType::Long, Value::Long(i)) => write_long(*i, writer),
        (PrimitiveType::Long, Value::Int(i)) => write_long(i64::from(*i), writer),
        (PrimitiveType::Float, Value::Float(x)) => write_all(&x.to_le_bytes(), writer),
        (PrimitiveType::Double, Value::Double(x)) => write_all(&x.to_le_bytes(), writer),
        (PrimitiveType::Bytes, Value::Bytes(bytes)) => encode_bytes(bytes, writer),
        (PrimitiveType::String, Value::String(s)) => encode_bytes(s, writer),
        _ => Err(mismatch(value, schema).into()),
    }
}

pub(crate) fn encode_internal<W: Write, S: Borrow<Schema>>(
    value: &Value,
    schema: &Schema,
    names: &HashMap<Name, S>,
    writer: &mut W,
) -> AvroResult<usize> {
    match schema {
        Schema::Ref { name } => {
            let resolved = names
                .get(name)
                .ok_or_else(|| Details::SchemaResolutionError(name.clone()))?;
            encode_internal(value, resolved.borrow(), names, writer)
        }
        Schema::Primitive(PrimitiveSchema { primitive, .. }) => {
            encode_primitive(value, schema, *primitive, writer)
        }
        Schema::Fixed(FixedSchema { size, .. }) => match value {
            Value::Fixed(_, bytes) | Value::Bytes(bytes) => {
                if bytes.len() != *size {
                    return Err(Details::CompareFixedSizes {
                        size: *size,
                        n: bytes.len(),
                    }
                    .into());
                }
                write_all(bytes, writer)
            }
            _ => Err(mismatch(value, schema).into()),
        },
        Schema::Enum(EnumSchema { symbols, .. }) => {
            let index = match value {
                Value::Enum(index, _) if (*index as usize) < symbols.len() => *index as usize,
                Value::Enum(index, _) => {
                    return Err(Details::GetEnumValue {
                        index: i64::from(*index),
                        nsymbols: symbols.len(),
                    }
                    .into());
                }
                Value::String(symbol) => symbols
                    .iter()
                    .position(|s| s == symbol)
                    .ok_or_else(|| Details::GetEnumSymbol(symbol.clone()))?,
                _ => return Err(mismatch(value, schema).into()),
            };
            write_int(index as i32, writer)
        }
        Schema::Union(UnionSchema { schemas, .. }) => match value {
            Value::Union(index, item) => {
                let variant = schemas.get(*index as usize).ok_or(Details::GetUnionVariant {
                    index: i64::from(*index),
                    num_variants: schemas.len(),
                })?;
                let len = write_long(i64::from(*index), writer)?;
                Ok(len + encode_internal(item, variant, names, writer)?)
            }
            _ => Err(mismatch(value, schema).into()),
        },
        Schema::Array(ArraySchema { items, .. }) => match value {
            Value::Array(values) => {
                let mut written = 0;
                if !values.is_empty() {
                    written += write_long(values.len() as i64, writer)?;
                    for item in values {
                        written += encode_internal(item, items, names, writer)?;
                    }
                }
                Ok(written + write_long(0, writer)?)
            }
            _ => Err(mismatch(value, schema).into()),
        },
        Schema::Map(MapSchema { values: inner, .. }) => match value {
            Value::Map(entries) => {
                let mut written = 0;
                if !entries.is_empty() {
                    written += write_long(entries.len() as i64, writer)?;
                    for (key, item) in entries {
                        written += encode_bytes(key, writer)?;
                        written += encode_internal(item, inner, names, writer)?;
                    }
                }
                Ok(written + write_long(0, writer)?)
            }
            _ => Err(mismatch(value, schema).into()),
        },
        Schema::Record(RecordSchema { fields, .. }) => match value {
            Value::Record(value_fields) => {
                let mut written = 0;
                for field in fields {
                    let item = value_fields
                        .iter()
                        .find(|(name, _)| *name == field.name)
                        .map(|(_, item)| item)
                        .ok_or_else(|| Details::GetField(field.name.clone()))?;
                    written += encode_internal(item, &field.schema, names, writer)?;
                }
                Ok(written)
            }
            _ => Err(mismatch(value, schema).into()),
        },
    }
}
