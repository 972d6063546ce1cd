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

use super::{IntegerBackend, MAX_VARINT_LEN, unterminated};
use crate::{AvroResult, error::Details};

/// Fixed-width backend operating on `i64`/`u64`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Native;

impl IntegerBackend for Native {
    fn shift_left(value: i64, shift: u32) -> i64 {
        (value as u64).checked_shl(shift).unwrap_or(0) as i64
    }

    fn shift_right(value: i64, shift: u32) -> i64 {
        value >> shift.min(63)
    }

    fn encode_long(value: i64, buf: &mut [u8; MAX_VARINT_LEN]) -> usize {
        let mut z = (Self::shift_left(value, 1) ^ Self::shift_right(value, 63)) as u64;
        let mut i = 0;
        while z > 0x7F {
            buf[i] = (z & 0x7F) as u8 | 0x80;
            z >>= 7;
            i += 1;
        }
        buf[i] = z as u8;
        i + 1
    }

    fn decode_long(bytes: &[u8]) -> AvroResult<(i64, usize)> {
        let mut z = 0u64;
        for (j, &byte) in bytes.iter().enumerate() {
            if j >= MAX_VARINT_LEN {
                return Err(Details::IntegerOverflow.into());
            }
            z |= u64::from(byte & 0x7F) << (7 * j);
            if byte & 0x80 == 0 {
                let value = (z >> 1) as i64 ^ -((z & 1) as i64);
                return Ok((value, j + 1));
            }
        }
        Err(unterminated().into())
    }
}
