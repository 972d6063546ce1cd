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

//! Decompression of container file blocks.
//!
//! A file names its codec in the `avro.codec` header entry. The name is looked up in a
//! [`Codecs`] registry, which knows the built-in [`Codec`]s and can be extended with any
//! [`Decompressor`].

use crate::{
    AvroResult,
    error::{Details, Error},
    util::max_allocation_bytes,
    util::DEFAULT_MAX_ALLOCATION_BYTES,
};
use std::{collections::HashMap, fmt, sync::Arc};
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Turns the payload of one block back into datum bytes.
pub trait Decompressor: Send + Sync {
    /// Decompress a block payload in-place.
    fn decompress(&self, stream: &mut Vec<u8>) -> AvroResult<()>;
}

impl<F> Decompressor for F
where
    F: Fn(&[u8]) -> AvroResult<Vec<u8>> + Send + Sync,
{
    fn decompress(&self, stream: &mut Vec<u8>) -> AvroResult<()> {
        *stream = self(stream)?;
        Ok(())
    }
}

/// The compression codecs built into this crate.
#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab_case")]
pub enum Codec {
    /// The `Null` codec simply passes through data uncompressed.
    Null,
    /// The `Deflate` codec writes the data block using the deflate algorithm
    /// as specified in RFC 1951, and typically implemented using the zlib library.
    /// Note that this format (unlike the "zlib format" in RFC 1950) does not have a checksum.
    Deflate,
    #[cfg(feature = "snappy")]
    /// The `Snappy` codec uses Google's [Snappy](http://google.github.io/snappy/)
    /// compression library. Each compressed block is followed by the 4-byte, big-endian
    /// CRC32 checksum of the uncompressed data in the block.
    Snappy,
}

impl Codec {
    /// The name of the codec as written in the `avro.codec` header entry.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Decompress a stream of bytes in-place.
    pub fn decompress(self, stream: &mut Vec<u8>) -> AvroResult<()> {
        *stream = match self {
            Codec::Null => return Ok(()),
            Codec::Deflate => {
                let limit = max_allocation_bytes(DEFAULT_MAX_ALLOCATION_BYTES);
                miniz_oxide::inflate::decompress_to_vec_with_limit(stream, limit).map_err(|e| {
                    let err = {
                        use miniz_oxide::inflate::TINFLStatus::*;
                        use std::io::{Error, ErrorKind};
                        match e.status {
                            FailedCannotMakeProgress | NeedsMoreInput => {
                                Error::from(ErrorKind::UnexpectedEof)
                            }
                            Adler32Mismatch | Failed | BadParam => {
                                Error::from(ErrorKind::InvalidData)
                            }
                            HasMoreOutput => Error::other(format!(
                                "decompressed block exceeds the allocation limit of {limit} bytes"
                            )),
                            Done => Error::other("inflate failed with a success status"),
                        }
                    };
                    Error::new(Details::DeflateDecompress(err))
                })?
            }
            #[cfg(feature = "snappy")]
            Codec::Snappy => {
                let Some(body_len) = stream.len().checked_sub(4) else {
                    return Err(Details::SnappyChecksumMissing.into());
                };
                let decompressed_size = snap::raw::decompress_len(&stream[..body_len])
                    .map_err(Details::GetSnappyDecompressLen)?;
                let mut decoded = vec![0; crate::util::safe_len(decompressed_size)?];
                snap::raw::Decoder::new()
                    .decompress(&stream[..body_len], &mut decoded[..])
                    .map_err(Details::SnappyDecompress)?;

                let mut last_four: [u8; 4] = [0; 4];
                last_four.copy_from_slice(&stream[body_len..]);
                let expected: u32 = u32::from_be_bytes(last_four);

                let mut hasher = crc32fast::Hasher::new();
                hasher.update(&decoded);
                let actual = hasher.finalize();

                if expected != actual {
                    return Err(Details::SnappyCrc32 { expected, actual }.into());
                }
                decoded
            }
        };

        Ok(())
    }
}

impl Decompressor for Codec {
    fn decompress(&self, stream: &mut Vec<u8>) -> AvroResult<()> {
        Codec::decompress(*self, stream)
    }
}

/// Decompressors by codec name.
///
/// The default registry holds every built-in [`Codec`] enabled at compile time.
#[derive(Clone)]
pub struct Codecs {
    decompressors: HashMap<String, Arc<dyn Decompressor>>,
}

impl Default for Codecs {
    fn default() -> Self {
        let decompressors = Codec::iter()
            .map(|codec| {
                (
                    codec.name().to_string(),
                    Arc::new(codec) as Arc<dyn Decompressor>,
                )
            })
            .collect();
        Self { decompressors }
    }
}

impl Codecs {
    /// Register `decompressor` under `name`, replacing any previous one.
    pub fn register(
        mut self,
        name: impl Into<String>,
        decompressor: impl Decompressor + 'static,
    ) -> Self {
        self.decompressors
            .insert(name.into(), Arc::new(decompressor));
        self
    }

    /// The decompressor registered under `name`.
    pub fn get(&self, name: &str) -> AvroResult<Arc<dyn Decompressor>> {
        self.decompressors
            .get(name)
            .cloned()
            .ok_or_else(|| Details::CodecNotSupported(name.to_string()).into())
    }

    /// All registered codec names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.decompressors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Codecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codecs")
            .field("names", &self.names())
            .finish()
    }
}
