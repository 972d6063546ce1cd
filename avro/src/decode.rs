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
        RecordSchema, ResolvedSchema, Schema, UnionSchema,
    },
    types::Value,
    util::{safe_depth, safe_len},
    zigzag::{read_int, read_long},
};
use std::{borrow::Borrow, collections::HashMap, io::Read};

/// Decode a length, failing on negative values and on lengths above the allocation limit.
fn decode_len<R: Read>(reader: &mut R) -> AvroResult<usize> {
    let len = read_long(reader)?;
    let len = usize::try_from(len).map_err(|_| Details::NegativeLength(len))?;
    safe_len(len)
}

/// Decode the item count of an array or map block. A negative count is followed by the
/// block's size in bytes, which is read and discarded.
fn decode_seq_len<R: Read>(reader: &mut R) -> AvroResult<usize> {
    let raw_len = read_long(reader)?;
    if raw_len < 0 {
        let _size = read_long(reader)?;
    }
    usize::try_from(raw_len.unsigned_abs()).map_err(|_| Details::IntegerOverflow.into())
}

/// Add a block of `len` items to the running `total` of an array or map, checking that
/// all of them fit under the allocation limit. Items may encode to zero bytes, so the
/// limit applies to their in-memory size.
fn grow_seq<T>(total: usize, len: usize) -> AvroResult<usize> {
    let total = total.checked_add(len).ok_or(Details::IntegerOverflow)?;
    safe_len(total.saturating_mul(size_of::<T>()))?;
    Ok(total)
}

/// Decode a `Value` from avro format given its `Schema`.
pub fn decode<R: Read>(schema: &Schema, reader: &mut R) -> AvroResult<Value> {
    let rs = ResolvedSchema::try_from(schema)?;
    decode_internal(schema, rs.get_names(), reader)
}

fn decode_primitive<R: Read>(primitive: PrimitiveType, reader: &mut R) -> AvroResult<Value> {
    match primitive {
        PrimitiveType::Null => Ok(Value::Null),
        PrimitiveType::Boolean => {
            let mut buf = [0u8; 1];
            reader
                .read_exact(&mut buf[..])
                .map_err(Details::ReadBoolean)?;
            match buf[0] {
                0u8 => Ok(Value::Boolean(false)),
                1u8 => Ok(Value::Boolean(true)),
                other => Err(Details::BoolValue(other).into()),
            }
        }
        PrimitiveType::Int => read_int(reader).map(Value::Int),
        PrimitiveType::Long => read_long(reader).map(Value::Long),
        PrimitiveType::Float => {
            let mut buf = [0u8; std::mem::size_of::<f32>()];
            reader.read_exact(&mut buf[..]).map_err(Details::ReadFloat)?;
            Ok(Value::Float(f32::from_le_bytes(buf)))
        }
        PrimitiveType::Double => {
            let mut buf = [0u8; std::mem::size_of::<f64>()];
            reader
                .read_exact(&mut buf[..])
                .map_err(Details::ReadDouble)?;
            Ok(Value::Double(f64::from_le_bytes(buf)))
        }
        PrimitiveType::Bytes => {
            let len = decode_len(reader)?;
            let mut buf = vec![0u8; len];
            reader.read_exact(&mut buf).map_err(Details::ReadBytes)?;
            Ok(Value::Bytes(buf))
        }
        PrimitiveType::String => decode_string(reader).map(Value::String),
    }
}

fn decode_string<R: Read>(reader: &mut R) -> AvroResult<String> {
    let len = decode_len(reader)?;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).map_err(Details::ReadString)?;
    String::from_utf8(buf).map_err(|e| Details::ConvertToUtf8(e).into())
}

pub(crate) fn decode_internal<R: Read, S: Borrow<Schema>>(
    schema: &Schema,
    names: &HashMap<Name, S>,
    reader: &mut R,
) -> AvroResult<Value> {
    decode_nested(schema, names, reader, 0)
}

fn decode_nested<R: Read, S: Borrow<Schema>>(
    schema: &Schema,
    names: &HashMap<Name, S>,
    reader: &mut R,
    depth: usize,
) -> AvroResult<Value> {
    let depth = safe_depth(depth)?;
    match schema {
        Schema::Primitive(PrimitiveSchema { primitive, .. }) => {
            decode_primitive(*primitive, reader)
        }
        Schema::Fixed(FixedSchema { size, .. }) => {
            let mut buf = vec![0u8; safe_len(*size)?];
            reader
                .read_exact(&mut buf)
                .map_err(|e| Details::ReadFixed(e, *size))?;
            Ok(Value::Fixed(*size, buf))
        }
        Schema::Array(ArraySchema { items, .. }) => {
            let mut values = Vec::new();
            let mut total = 0;

            loop {
                let len = decode_seq_len(reader)?;
                if len == 0 {
                    break;
                }
                total = grow_seq::<Value>(total, len)?;

                values.reserve(len.min(1024));
                for _ in 0..len {
                    values.push(decode_nested(items, names, reader, depth)?);
                }
            }

            Ok(Value::Array(values))
        }
        Schema::Map(MapSchema { values: inner, .. }) => {
            let mut items = HashMap::new();
            let mut total = 0;

            loop {
                let len = decode_seq_len(reader)?;
                if len == 0 {
                    break;
                }
                total = grow_seq::<(String, Value)>(total, len)?;

                items.reserve(len.min(1024));
                for _ in 0..len {
                    let key = decode_string(reader)?;
                    let value = decode_nested(inner, names, reader, depth)?;
                    items.insert(key, value);
                }
            }

            Ok(Value::Map(items))
        }
        Schema::Union(UnionSchema { schemas, .. }) => {
            let index = read_long(reader)?;
            let variant = usize::try_from(index)
                .ok()
                .and_then(|i| schemas.get(i))
                .ok_or(Details::GetUnionVariant {
                    index,
                    num_variants: schemas.len(),
                })?;
            let value = decode_nested(variant, names, reader, depth)?;
            Ok(Value::Union(index as u32, Box::new(value)))
        }
        Schema::Record(RecordSchema { fields, .. }) => {
            let mut items = Vec::with_capacity(fields.len());
            for field in fields {
                items.push((
                    field.name.clone(),
                    decode_nested(&field.schema, names, reader, depth)?,
                ));
            }
            Ok(Value::Record(items))
        }
        Schema::Enum(EnumSchema { symbols, .. }) => {
            let index = read_int(reader)?;
            let symbol = usize::try_from(index)
                .ok()
                .and_then(|i| symbols.get(i))
                .ok_or(Details::GetEnumValue {
                    index: i64::from(index),
                    nsymbols: symbols.len(),
                })?;
            Ok(Value::Enum(index as u32, symbol.clone()))
        }
        Schema::Ref { name } => {
            let resolved = names
                .get(name)
                .ok_or_else(|| Details::SchemaResolutionError(name.clone()))?;
            decode_nested(resolved.borrow(), names, reader, depth)
        }
    }
}
