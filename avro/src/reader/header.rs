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
    AvroResult, Error,
    codec::{Codecs, Decompressor},
    decode::decode_internal,
    error::Details,
    schema::{Names, PrimitiveType, Schema},
    types::Value,
};
use log::{debug, warn};
use std::{collections::HashMap, fmt, io::Read, sync::Arc};

/// The four bytes every container file starts with.
pub(super) const MAGIC: [u8; 4] = *b"Obj\x01";

/// Length of the sync marker that follows the header and every block.
pub(super) const SYNC_SIZE: usize = 16;

const SCHEMA_KEY: &str = "avro.schema";
const CODEC_KEY: &str = "avro.codec";

/// Everything the header of a container file tells about its blocks.
pub(super) struct Header {
    pub(super) schema: Schema,
    pub(super) codec_name: String,
    pub(super) decompressor: Arc<dyn Decompressor>,
    pub(super) sync: [u8; SYNC_SIZE],
    pub(super) user_metadata: HashMap<String, Vec<u8>>,
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Header")
            .field("schema", &self.schema)
            .field("codec_name", &self.codec_name)
            .field("sync", &self.sync)
            .field("user_metadata", &self.user_metadata)
            .finish_non_exhaustive()
    }
}

impl Header {
    /// Read the magic, the metadata map and the sync marker.
    pub(super) fn read<R: Read>(reader: &mut R, codecs: &Codecs) -> AvroResult<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic).map_err(Details::ReadHeader)?;
        if magic != MAGIC {
            return Err(Details::HeaderMagic.into());
        }

        let mut metadata = read_metadata(reader)?;

        let schema_bytes = metadata
            .remove(SCHEMA_KEY)
            .ok_or(Details::GetAvroSchemaFromMap)?;
        let schema_text =
            std::str::from_utf8(&schema_bytes).map_err(Details::ConvertToUtf8Error)?;
        let schema = Schema::parse_str(schema_text)?;

        let codec_name = match metadata.remove(CODEC_KEY) {
            Some(bytes) => std::str::from_utf8(&bytes)
                .map_err(Details::ConvertToUtf8Error)?
                .to_string(),
            None => "null".to_string(),
        };
        let decompressor = codecs.get(&codec_name)?;

        let mut user_metadata = HashMap::new();
        for (key, value) in metadata {
            if key.starts_with("avro.") {
                warn!("Ignoring unknown metadata key: {key}");
            } else {
                user_metadata.insert(key, value);
            }
        }

        let mut sync = [0u8; SYNC_SIZE];
        reader.read_exact(&mut sync).map_err(Details::ReadMarker)?;

        debug!(
            "Read container header: codec {codec_name}, {} user metadata entries",
            user_metadata.len()
        );
        Ok(Header {
            schema,
            codec_name,
            decompressor,
            sync,
            user_metadata,
        })
    }
}

/// Decode the header's `map<bytes>` datum.
fn read_metadata<R: Read>(reader: &mut R) -> AvroResult<HashMap<String, Vec<u8>>> {
    let meta_schema = Schema::map(Schema::from(PrimitiveType::Bytes));
    let value = decode_internal(&meta_schema, &Names::new(), reader).map_err(|e| {
        if e.is_unexpected_eof() {
            Error::from(Details::TruncatedFile("header metadata"))
        } else {
            e
        }
    })?;

    let Value::Map(entries) = value else {
        return Err(Details::GetHeaderMetadata.into());
    };
    entries
        .into_iter()
        .map(|(key, value)| match value {
            Value::Bytes(bytes) => Ok((key, bytes)),
            _ => Err(Error::from(Details::GetHeaderMetadata)),
        })
        .collect()
}
