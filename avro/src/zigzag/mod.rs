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

//! Zigzag variable-length coding of signed integers.
//!
//! A signed value `n` is first mapped to `(n << 1) ^ (n >> 63)`, so that values of small
//! magnitude become small unsigned numbers, and then written in groups of seven bits, least
//! significant group first, with the high bit set on every byte but the last.
//!
//! The arithmetic is pluggable through [`IntegerBackend`]. [`Native`] works on `i64`
//! directly, [`BigInteger`] works on arbitrary-precision integers and reduces every result
//! back to 64-bit two's complement. Both produce identical bytes for every input. The
//! backend used by the datum codec is [`ActiveBackend`].

mod bignum;
mod native;

pub use bignum::BigInteger;
pub use native::Native;

use crate::{AvroResult, error::Details};
use std::io::{self, Read, Write};

/// Longest varint accepted for a 64-bit value.
pub const MAX_VARINT_LEN: usize = 10;

/// Arithmetic used to zigzag-encode and decode 64-bit integers.
pub trait IntegerBackend {
    /// `value << shift` keeping only the low 64 bits. Shifts of 64 or more yield 0.
    fn shift_left(value: i64, shift: u32) -> i64;

    /// Arithmetic `value >> shift`. Shifts of 64 or more yield 0 or -1, matching the sign.
    fn shift_right(value: i64, shift: u32) -> i64;

    /// Zigzag varint bytes of `value`, written into `buf`. Returns the number of bytes used.
    fn encode_long(value: i64, buf: &mut [u8; MAX_VARINT_LEN]) -> usize;

    /// Decode one varint from the start of `bytes`, returning the value and the number of
    /// bytes consumed.
    fn decode_long(bytes: &[u8]) -> AvroResult<(i64, usize)>;
}

#[cfg(not(feature = "arbitrary-precision"))]
pub type ActiveBackend = Native;

#[cfg(feature = "arbitrary-precision")]
pub type ActiveBackend = BigInteger;

/// `value << shift` with the active backend.
pub fn shift_left(value: i64, shift: u32) -> i64 {
    ActiveBackend::shift_left(value, shift)
}

/// Arithmetic `value >> shift` with the active backend.
pub fn shift_right(value: i64, shift: u32) -> i64 {
    ActiveBackend::shift_right(value, shift)
}

/// Zigzag varint encoding of a long.
pub fn encode_long(value: i64) -> Vec<u8> {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let len = ActiveBackend::encode_long(value, &mut buf);
    buf[..len].to_vec()
}

/// Zigzag varint encoding of an int.
pub fn encode_int(value: i32) -> Vec<u8> {
    encode_long(i64::from(value))
}

/// Decode a long from a byte sequence holding exactly one varint.
pub fn decode_long(bytes: &[u8]) -> AvroResult<i64> {
    let (value, _) = decode_slice(bytes)?;
    Ok(value)
}

/// Decode a long from the start of `bytes`, returning it with the number of bytes consumed.
pub fn decode_slice(bytes: &[u8]) -> AvroResult<(i64, usize)> {
    ActiveBackend::decode_long(bytes)
}

/// Write the zigzag varint encoding of `value`, returning the number of bytes written.
pub fn write_long<W: Write>(value: i64, writer: &mut W) -> AvroResult<usize> {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let len = ActiveBackend::encode_long(value, &mut buf);
    writer.write_all(&buf[..len]).map_err(Details::WriteBytes)?;
    Ok(len)
}

pub fn write_int<W: Write>(value: i32, writer: &mut W) -> AvroResult<usize> {
    write_long(i64::from(value), writer)
}

/// Read one zigzag varint long from a stream.
pub fn read_long<R: Read>(reader: &mut R) -> AvroResult<i64> {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let len = read_varint(reader, &mut buf, 0)?;
    decode_long(&buf[..len])
}

/// Read one zigzag varint int from a stream, failing when it does not fit 32 bits.
pub fn read_int<R: Read>(reader: &mut R) -> AvroResult<i32> {
    let value = read_long(reader)?;
    i32::try_from(value).map_err(|e| Details::ZagI32(e, value).into())
}

/// Like [`read_long`], but the stream ending before the first byte yields `None`.
pub(crate) fn read_long_or_eof<R: Read>(reader: &mut R) -> AvroResult<Option<i64>> {
    let mut buf = [0u8; MAX_VARINT_LEN];
    match reader.read_exact(&mut buf[..1]) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(Details::ReadVariableIntegerBytes(e).into()),
    }
    let len = if buf[0] & 0x80 == 0 {
        1
    } else {
        read_varint(reader, &mut buf, 1)?
    };
    decode_long(&buf[..len]).map(Some)
}

/// Copy varint bytes into `buf[start..]` until a byte without the continuation bit.
fn read_varint<R: Read>(
    reader: &mut R,
    buf: &mut [u8; MAX_VARINT_LEN],
    start: usize,
) -> AvroResult<usize> {
    for i in start..MAX_VARINT_LEN {
        reader
            .read_exact(&mut buf[i..=i])
            .map_err(Details::ReadVariableIntegerBytes)?;
        if buf[i] & 0x80 == 0 {
            return Ok(i + 1);
        }
    }
    Err(Details::IntegerOverflow.into())
}

/// The error for a varint that stops before its terminating byte.
fn unterminated() -> Details {
    Details::ReadVariableIntegerBytes(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "varint ended without a terminating byte",
    ))
}
