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

use super::header::{Header, SYNC_SIZE};
use crate::{
    AvroResult, Error,
    codec::Codecs,
    decode::decode_internal,
    error::Details,
    schema::{Names, ResolvedSchema, Schema},
    types::Value,
    util,
    zigzag::{read_long, read_long_or_eof},
};
use log::debug;
use std::{collections::HashMap, io::Read};

/// Internal Block reader.
#[derive(Debug)]
pub(super) struct Block<R> {
    reader: R,
    header: Header,
    /// Payload of the current block, already decompressed.
    buf: Vec<u8>,
    buf_idx: usize,
    /// Number of datums left in the current block.
    message_count: usize,
    names: Names,
}

impl<R: Read> Block<R> {
    pub(super) fn new(mut reader: R, codecs: &Codecs) -> AvroResult<Block<R>> {
        let header = Header::read(&mut reader, codecs)?;
        let names = ResolvedSchema::try_from(&header.schema)?.to_names();
        Ok(Block {
            reader,
            header,
            buf: vec![],
            buf_idx: 0,
            message_count: 0,
            names,
        })
    }

    pub(super) fn writer_schema(&self) -> &Schema {
        &self.header.schema
    }

    pub(super) fn user_metadata(&self) -> &HashMap<String, Vec<u8>> {
        &self.header.user_metadata
    }

    pub(super) fn codec_name(&self) -> &str {
        &self.header.codec_name
    }

    fn fill_buf(&mut self, n: usize) -> AvroResult<()> {
        // The buffer must hold exactly `n` bytes, codecs read all of it.
        self.buf.resize(util::safe_len(n)?, 0);
        self.reader
            .read_exact(&mut self.buf)
            .map_err(Details::ReadIntoBuf)?;
        self.buf_idx = 0;
        Ok(())
    }

    /// Read the next block into the internal buffer. Returns `false` when the stream ended
    /// cleanly at a block boundary.
    fn read_block_next(&mut self) -> AvroResult<bool> {
        if self.buf_idx < self.buf.len() {
            return Err(Details::BlockTrailingBytes(self.buf.len() - self.buf_idx).into());
        }

        let Some(count) = read_long_or_eof(&mut self.reader).map_err(truncated_header)? else {
            return Ok(false);
        };
        let size = read_long(&mut self.reader).map_err(truncated_header)?;
        let (Ok(message_count), Ok(block_bytes)) = (usize::try_from(count), usize::try_from(size))
        else {
            return Err(Details::InvalidBlockHeader { count, size }.into());
        };

        self.fill_buf(block_bytes)?;
        let mut marker = [0u8; SYNC_SIZE];
        self.reader
            .read_exact(&mut marker)
            .map_err(Details::ReadBlockMarker)?;
        if marker != self.header.sync {
            return Err(Details::GetBlockMarker.into());
        }

        self.header.decompressor.decompress(&mut self.buf)?;
        self.message_count = message_count;
        debug!(
            "Read block of {message_count} datums: {block_bytes} bytes stored, {} bytes decompressed",
            self.buf.len()
        );
        Ok(true)
    }

    pub(super) fn read_next(&mut self) -> AvroResult<Option<Value>> {
        while self.message_count == 0 {
            if !self.read_block_next()? {
                return Ok(None);
            }
        }

        let mut block_bytes = &self.buf[self.buf_idx..];
        let b_original = block_bytes.len();

        let item = decode_internal(&self.header.schema, &self.names, &mut block_bytes)?;

        self.buf_idx += b_original - block_bytes.len();
        self.message_count -= 1;
        Ok(Some(item))
    }
}

/// A varint of the block header cut short by the end of the stream.
fn truncated_header(err: Error) -> Error {
    if err.is_unexpected_eof() {
        Details::TruncatedFile("block header").into()
    } else {
        err
    }
}
