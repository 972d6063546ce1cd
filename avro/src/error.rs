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
    schema::{Name, SchemaKind},
    types::ValueKind,
};
use serde_json::Value as JsonValue;
use std::{error::Error as _, fmt, io};

/// Errors encountered by this crate.
///
/// Use [`kind`](Self::kind) to classify a failure, and [`details`](Self::details) or
/// [`into_details`](Self::into_details) for the precise [`Details`].
#[derive(thiserror::Error, Debug)]
#[repr(transparent)]
#[error(transparent)]
pub struct Error {
    details: Box<Details>,
}

impl Error {
    pub fn new(details: Details) -> Self {
        Self {
            details: Box::new(details),
        }
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn into_details(self) -> Details {
        *self.details
    }

    /// The broad category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        self.details.kind()
    }

    /// Whether the underlying cause is the input ending before a read could complete.
    pub(crate) fn is_unexpected_eof(&self) -> bool {
        self.details.io_error().map(io::Error::kind) == Some(io::ErrorKind::UnexpectedEof)
    }
}

impl From<Details> for Error {
    fn from(details: Details) -> Self {
        Self::new(details)
    }
}

/// Coarse classification of every [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum ErrorKind {
    /// The schema text is not valid JSON or is not a valid schema.
    SchemaParse,
    /// A variable-length integer is truncated or longer than ten bytes.
    Decode,
    /// Datum bytes disagree with the schema they are decoded against.
    SchemaMismatch,
    /// The container header is malformed.
    Format,
    /// A block's sync marker differs from the header's, or a block cannot be decompressed.
    CorruptFile,
    /// The header names a codec that is not registered.
    UnsupportedCodec,
    /// The file ends inside the header or inside a block.
    TruncatedFile,
    /// Any other failure of the underlying byte source.
    Io,
}

#[derive(thiserror::Error)]
pub enum Details {
    // Schema parsing
    #[error("Failed to parse schema from JSON: {0}")]
    ParseSchemaJson(#[source] serde_json::Error),

    #[error("Failed to serialize schema to JSON: {0}")]
    SerializeSchema(#[source] serde_json::Error),

    #[error("Must be a JSON string, object or array")]
    ParseSchemaFromValidJson,

    #[error("Unknown type: {0}")]
    UnknownType(Name),

    #[error("Two named schemas defined for the same fullname: {0}")]
    DuplicateName(Name),

    #[error("`{0}` is a complex type and must be defined inside an object")]
    ReservedTypeName(String),

    #[error("Invalid schema name {0}. It must match the regex '{1}'")]
    InvalidSchemaName(String, &'static str),

    #[error("Invalid namespace {0}. It must match the regex '{1}'")]
    InvalidNamespace(String, &'static str),

    #[error("No `name` field")]
    GetNameField,

    #[error("`name` must be a string, got: {0}")]
    GetNameFieldType(JsonValue),

    #[error("`namespace` must be a string, got: {0}")]
    GetNamespaceFieldType(JsonValue),

    #[error("`doc` must be a string, got: {0}")]
    GetDocFieldType(JsonValue),

    #[error("`logicalType` must be a string, got: {0}")]
    GetLogicalTypeFieldType(JsonValue),

    #[error("No `type` in complex type")]
    GetComplexTypeField,

    #[error("Invalid `type` in complex type: {0}")]
    GetComplexType(JsonValue),

    #[error("No `fields` in record")]
    GetRecordFieldsJson,

    #[error("`fields` must be a JSON array, got: {0}")]
    GetRecordFieldsArray(JsonValue),

    #[error("Record field must be a JSON object, got: {0}")]
    GetRecordFieldObject(JsonValue),

    #[error("No `name` in record field")]
    GetNameFieldFromRecord,

    #[error("No `type` in record field {0}")]
    GetRecordFieldTypeField(String),

    #[error("Invalid field name {0}")]
    FieldName(String),

    #[error("Duplicate field name {0}")]
    FieldNameDuplicate(String),

    #[error("Invalid record field order: {0}")]
    InvalidFieldOrder(JsonValue),

    #[error("No `symbols` field in enum")]
    GetEnumSymbolsField,

    #[error("Enum `symbols` must be an array of strings, got: {0}")]
    GetEnumSymbols(JsonValue),

    #[error("Invalid enum symbol name {0}")]
    EnumSymbolName(String),

    #[error("Duplicate enum symbol {0}")]
    EnumSymbolDuplicate(String),

    #[error("No `items` in array")]
    GetArrayItemsField,

    #[error("No `values` in map")]
    GetMapValuesField,

    #[error("Fixed schema `size` value must be a positive integer: {0}")]
    GetFixedSizeFieldPositive(JsonValue),

    #[error("Fixed schema has no `size`")]
    GetFixedSizeField,

    #[error("Unions must have at least one branch")]
    EmptyUnion,

    #[error("Unions may not directly contain a union")]
    GetNestedUnion,

    #[error("Unions cannot contain duplicate types, found duplicate: {0}")]
    GetUnionDuplicate(String),

    // Integer codec
    #[error("Overflow when decoding integer value")]
    IntegerOverflow,

    #[error("Failed to read bytes for decoding variable length integer: {0}")]
    ReadVariableIntegerBytes(#[source] io::Error),

    #[error("Int value {1} does not fit in 32 bits")]
    ZagI32(#[source] std::num::TryFromIntError, i64),

    #[error("Failed to write encoded bytes: {0}")]
    WriteBytes(#[source] io::Error),

    // Datum decoding and encoding
    #[error("Invalid u8 for bool: {0}")]
    BoolValue(u8),

    #[error("Negative length {0}")]
    NegativeLength(i64),

    #[error("Unable to allocate {desired} bytes (maximum allowed: {maximum})")]
    MemoryAllocation { desired: usize, maximum: usize },

    #[error("Datum nesting exceeds the maximum decoding depth of {maximum}")]
    DecodeDepth { maximum: usize },

    #[error("Failed to read boolean bytes: {0}")]
    ReadBoolean(#[source] io::Error),

    #[error("Failed to read bytes: {0}")]
    ReadBytes(#[source] io::Error),

    #[error("Failed to read string: {0}")]
    ReadString(#[source] io::Error),

    #[error("Failed to read float: {0}")]
    ReadFloat(#[source] io::Error),

    #[error("Failed to read double: {0}")]
    ReadDouble(#[source] io::Error),

    #[error("Failed to read fixed number of bytes '{1}': {0}")]
    ReadFixed(#[source] io::Error, usize),

    #[error("Failed to convert &[u8] to UTF-8: {0}")]
    ConvertToUtf8(#[source] std::string::FromUtf8Error),

    #[error("Union index {index} out of bounds: {num_variants}")]
    GetUnionVariant { index: i64, num_variants: usize },

    #[error("Enum symbol index out of bounds: {index} (symbols: {nsymbols})")]
    GetEnumValue { index: i64, nsymbols: usize },

    #[error("Enum symbol not found: {0}")]
    GetEnumSymbol(String),

    #[error("Fixed size mismatch, expected: {size}, got: {n}")]
    CompareFixedSizes { size: usize, n: usize },

    #[error("Missing field in record: {0}")]
    GetField(String),

    #[error("Value of kind {value_kind:?} cannot be encoded as {schema_kind}")]
    ValueDoesNotMatchSchema {
        value_kind: ValueKind,
        schema_kind: SchemaKind,
    },

    #[error("Unresolved schema reference: {0}")]
    SchemaResolutionError(Name),

    // Container files
    #[error("Wrong magic in header")]
    HeaderMagic,

    #[error("Failed to read header: {0}")]
    ReadHeader(#[source] io::Error),

    #[error("No `avro.schema` in header metadata")]
    GetAvroSchemaFromMap,

    #[error("The header metadata is not a map of bytes")]
    GetHeaderMetadata,

    #[error("Failed to convert header metadata to UTF-8: {0}")]
    ConvertToUtf8Error(#[source] std::str::Utf8Error),

    #[error("Failed to read marker bytes: {0}")]
    ReadMarker(#[source] io::Error),

    #[error("Failed to read block marker bytes: {0}")]
    ReadBlockMarker(#[source] io::Error),

    #[error("Failed to read block bytes into buffer: {0}")]
    ReadIntoBuf(#[source] io::Error),

    #[error("Block marker does not match header marker")]
    GetBlockMarker,

    #[error("Invalid block header: object count {count}, byte size {size}")]
    InvalidBlockHeader { count: i64, size: i64 },

    #[error("Block has {0} bytes left after its last object")]
    BlockTrailingBytes(usize),

    #[error("File ended unexpectedly while reading the {0}")]
    TruncatedFile(&'static str),

    #[error("Codec '{0}' is not supported/enabled")]
    CodecNotSupported(String),

    #[error("Failed to decompress with deflate: {0}")]
    DeflateDecompress(#[source] io::Error),

    #[cfg(feature = "snappy")]
    #[error("Failed to decompress with snappy: {0}")]
    SnappyDecompress(#[source] snap::Error),

    #[cfg(feature = "snappy")]
    #[error("Failed to get snappy decompression length: {0}")]
    GetSnappyDecompressLen(#[source] snap::Error),

    #[cfg(feature = "snappy")]
    #[error("Snappy block is too short to hold a checksum")]
    SnappyChecksumMissing,

    #[cfg(feature = "snappy")]
    #[error("Bad Snappy CRC32; expected {expected:x} but got {actual:x}")]
    SnappyCrc32 { expected: u32, actual: u32 },

    #[error("Custom codec failed: {0}")]
    CustomCodec(String),
}

impl Details {
    /// The broad category of this failure.
    pub fn kind(&self) -> ErrorKind {
        use Details::*;
        match self {
            ParseSchemaJson(_)
            | SerializeSchema(_)
            | ParseSchemaFromValidJson
            | UnknownType(_)
            | DuplicateName(_)
            | ReservedTypeName(_)
            | InvalidSchemaName(..)
            | InvalidNamespace(..)
            | GetNameField
            | GetNameFieldType(_)
            | GetNamespaceFieldType(_)
            | GetDocFieldType(_)
            | GetLogicalTypeFieldType(_)
            | GetComplexTypeField
            | GetComplexType(_)
            | GetRecordFieldsJson
            | GetRecordFieldsArray(_)
            | GetRecordFieldObject(_)
            | GetNameFieldFromRecord
            | GetRecordFieldTypeField(_)
            | FieldName(_)
            | FieldNameDuplicate(_)
            | InvalidFieldOrder(_)
            | GetEnumSymbolsField
            | GetEnumSymbols(_)
            | EnumSymbolName(_)
            | EnumSymbolDuplicate(_)
            | GetArrayItemsField
            | GetMapValuesField
            | GetFixedSizeFieldPositive(_)
            | GetFixedSizeField
            | EmptyUnion
            | GetNestedUnion
            | GetUnionDuplicate(_) => ErrorKind::SchemaParse,

            IntegerOverflow | ReadVariableIntegerBytes(_) => ErrorKind::Decode,

            ReadBoolean(e) | ReadBytes(e) | ReadString(e) | ReadFloat(e) | ReadDouble(e)
            | ReadFixed(e, _) => {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    ErrorKind::SchemaMismatch
                } else {
                    ErrorKind::Io
                }
            }
            ZagI32(..)
            | BoolValue(_)
            | NegativeLength(_)
            | MemoryAllocation { .. }
            | DecodeDepth { .. }
            | ConvertToUtf8(_)
            | GetUnionVariant { .. }
            | GetEnumValue { .. }
            | GetEnumSymbol(_)
            | CompareFixedSizes { .. }
            | GetField(_)
            | ValueDoesNotMatchSchema { .. }
            | SchemaResolutionError(_)
            | BlockTrailingBytes(_) => ErrorKind::SchemaMismatch,

            HeaderMagic | GetAvroSchemaFromMap | GetHeaderMetadata | ConvertToUtf8Error(_) => {
                ErrorKind::Format
            }

            ReadHeader(e) | ReadMarker(e) | ReadBlockMarker(e) | ReadIntoBuf(e) => {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    ErrorKind::TruncatedFile
                } else {
                    ErrorKind::Io
                }
            }
            TruncatedFile(_) => ErrorKind::TruncatedFile,

            GetBlockMarker | InvalidBlockHeader { .. } | DeflateDecompress(_) | CustomCodec(_) => {
                ErrorKind::CorruptFile
            }
            #[cfg(feature = "snappy")]
            SnappyDecompress(_)
            | GetSnappyDecompressLen(_)
            | SnappyChecksumMissing
            | SnappyCrc32 { .. } => ErrorKind::CorruptFile,

            CodecNotSupported(_) => ErrorKind::UnsupportedCodec,

            WriteBytes(_) => ErrorKind::Io,
        }
    }

    fn io_error(&self) -> Option<&io::Error> {
        use Details::*;
        match self {
            ReadVariableIntegerBytes(e)
            | WriteBytes(e)
            | ReadBoolean(e)
            | ReadBytes(e)
            | ReadString(e)
            | ReadFloat(e)
            | ReadDouble(e)
            | ReadFixed(e, _)
            | ReadHeader(e)
            | ReadMarker(e)
            | ReadBlockMarker(e)
            | ReadIntoBuf(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Debug for Details {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut msg = self.to_string();
        if let Some(e) = self.source() {
            msg.extend([": ", &e.to_string()]);
        }
        write!(f, "{msg}")
    }
}
