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

//! Allocation limits and small JSON helpers shared by the parser and the decoders.

use crate::{AvroResult, error::Details, schema::Documentation};
use serde_json::{Map, Value};
use std::sync::{
    Once,
    atomic::{AtomicUsize, Ordering},
};

/// Maximum number of bytes that can be allocated when decoding a length-prefixed
/// value or a container block.
/// See [`max_allocation_bytes`] to change this limit.
pub const DEFAULT_MAX_ALLOCATION_BYTES: usize = 512 * 1024 * 1024;
static MAX_ALLOCATION_BYTES: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_ALLOCATION_BYTES);
static MAX_ALLOCATION_BYTES_ONCE: Once = Once::new();

/// Maximum nesting of complex values when decoding a datum.
/// See [`max_decode_depth`] to change this limit.
pub const DEFAULT_MAX_DECODE_DEPTH: usize = 512;
static MAX_DECODE_DEPTH: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_DECODE_DEPTH);
static MAX_DECODE_DEPTH_ONCE: Once = Once::new();

/// Set a new maximum number of bytes that can be allocated when decoding data.
/// Once called, the limit cannot be changed.
///
/// **NOTE** This function must be called before decoding **any** data. The
/// library leverages [`std::sync::Once`] to set the limit either when calling
/// this method, or when decoding for the first time.
pub fn max_allocation_bytes(num_bytes: usize) -> usize {
    MAX_ALLOCATION_BYTES_ONCE.call_once(|| {
        MAX_ALLOCATION_BYTES.store(num_bytes, Ordering::Release);
    });
    MAX_ALLOCATION_BYTES.load(Ordering::Acquire)
}

/// Check that `len` bytes may be allocated under the configured limit.
pub fn safe_len(len: usize) -> AvroResult<usize> {
    let max_bytes = max_allocation_bytes(DEFAULT_MAX_ALLOCATION_BYTES);

    if len <= max_bytes {
        Ok(len)
    } else {
        Err(Details::MemoryAllocation {
            desired: len,
            maximum: max_bytes,
        }
        .into())
    }
}

/// Set the maximum nesting depth of decoded datums. Like [`max_allocation_bytes`], the
/// limit is fixed by the first call, either this one or the first decode.
pub fn max_decode_depth(depth: usize) -> usize {
    MAX_DECODE_DEPTH_ONCE.call_once(|| {
        MAX_DECODE_DEPTH.store(depth, Ordering::Release);
    });
    MAX_DECODE_DEPTH.load(Ordering::Acquire)
}

/// Check that a value nested `depth` levels deep may still be decoded.
pub(crate) fn safe_depth(depth: usize) -> AvroResult<usize> {
    let maximum = max_decode_depth(DEFAULT_MAX_DECODE_DEPTH);

    if depth <= maximum {
        Ok(depth + 1)
    } else {
        Err(Details::DecodeDepth { maximum }.into())
    }
}

/// Typed lookups of optional string attributes in a schema JSON object.
pub(crate) trait MapHelper {
    /// `Ok(None)` when absent, an error when present but not a string.
    fn optional_string(
        &self,
        key: &str,
        error: fn(Value) -> Details,
    ) -> AvroResult<Option<String>>;

    fn doc(&self) -> AvroResult<Documentation> {
        self.optional_string("doc", Details::GetDocFieldType)
    }

    fn logical_type(&self) -> AvroResult<Option<String>> {
        self.optional_string("logicalType", Details::GetLogicalTypeFieldType)
    }

    /// Every attribute not listed in `reserved`, in document order.
    fn custom_attributes(&self, reserved: &[&str]) -> Map<String, Value>;
}

impl MapHelper for Map<String, Value> {
    fn optional_string(
        &self,
        key: &str,
        error: fn(Value) -> Details,
    ) -> AvroResult<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(error(other.clone()).into()),
        }
    }

    fn custom_attributes(&self, reserved: &[&str]) -> Map<String, Value> {
        self.iter()
            .filter(|(key, _)| !reserved.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}
