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

//! Logic handling reading from Avro container files at user level.

mod block;
mod header;

use crate::{
    AvroResult,
    codec::Codecs,
    decode::decode,
    schema::Schema,
    types::Value,
};
use block::Block;
use bon::bon;
use std::{collections::HashMap, io::Read};

/// Main interface for reading Avro container files.
///
/// The header is read when the `Reader` is created. Datums are then decoded lazily, one
/// per call to [`Iterator::next`]:
///
/// ```no_run
/// # use avro_core::Reader;
/// # use std::io::Cursor;
/// # let input = Cursor::new(Vec::<u8>::new());
/// for value in Reader::new(input).unwrap() {
///     match value {
///         Ok(v) => println!("{:?}", v),
///         Err(e) => println!("Error: {}", e),
///     };
/// }
/// ```
///
/// Iteration stops after the first error.
#[derive(Debug)]
pub struct Reader<R> {
    block: Block<R>,
    errored: bool,
}

#[bon]
impl<R: Read> Reader<R> {
    /// Creates a `Reader` given something implementing the `io::Read` trait to read from,
    /// using the built-in codecs.
    ///
    /// **NOTE** The avro header is going to be read automatically upon creation of the `Reader`.
    pub fn new(reader: R) -> AvroResult<Reader<R>> {
        Reader::builder(reader).build()
    }

    /// Creates a `Reader` with an optional registry of decompressors to pick the block codec
    /// from.
    ///
    /// **NOTE** The avro header is going to be read automatically upon creation of the `Reader`.
    #[builder(finish_fn = build)]
    pub fn builder(
        #[builder(start_fn)] reader: R,
        codecs: Option<Codecs>,
    ) -> AvroResult<Reader<R>> {
        let codecs = codecs.unwrap_or_default();
        let block = Block::new(reader, &codecs)?;
        Ok(Reader {
            block,
            errored: false,
        })
    }

    /// Get a reference to the writer `Schema`.
    #[inline]
    pub fn writer_schema(&self) -> &Schema {
        self.block.writer_schema()
    }

    /// Get a reference to the user metadata
    #[inline]
    pub fn user_metadata(&self) -> &HashMap<String, Vec<u8>> {
        self.block.user_metadata()
    }

    /// The codec named in the header, `null` when absent.
    #[inline]
    pub fn codec_name(&self) -> &str {
        self.block.codec_name()
    }
}

impl<R: Read> Iterator for Reader<R> {
    type Item = AvroResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        // to prevent keep on reading after the first error occurs
        if self.errored {
            return None;
        };
        match self.block.read_next() {
            Ok(opt) => opt.map(Ok),
            Err(e) => {
                self.errored = true;
                Some(Err(e))
            }
        }
    }
}

/// Open a container file, reading its header. Same as [`Reader::new`].
pub fn open<R: Read>(reader: R) -> AvroResult<Reader<R>> {
    Reader::new(reader)
}

/// Decode a single `Value` encoded in Avro format given its `Schema` and anything
/// implementing `io::Read` to read from.
///
/// **NOTE** This function does NOT read a container header or data blocks; use
/// [`Reader`] for files.
pub fn from_avro_datum<R: Read>(schema: &Schema, reader: &mut R) -> AvroResult<Value> {
    decode(schema, reader)
}
