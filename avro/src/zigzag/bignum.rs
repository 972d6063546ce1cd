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
use num_bigint::{BigInt, BigUint, Sign};

/// Arbitrary-precision backend.
///
/// Every intermediate result is computed exactly and then reduced modulo 2^64 into the
/// two's complement range of `i64`, so the output matches [`Native`](super::Native)
/// bit for bit.
#[derive(Clone, Copy, Debug, Default)]
pub struct BigInteger;

fn modulus() -> BigInt {
    BigInt::from(1u8) << 64usize
}

/// The low 64 bits of `value` in two's complement, as an unsigned number.
fn low_bits(value: &BigInt) -> BigUint {
    let modulus = modulus();
    let reduced = ((value % &modulus) + &modulus) % &modulus;
    reduced.to_biguint().unwrap_or_default()
}

/// Reinterpret a number below 2^64 as a signed 64-bit value.
fn to_i64(bits: &BigUint) -> i64 {
    bits.to_u64_digits().first().copied().unwrap_or(0) as i64
}

/// Floor division by 2^shift.
fn floor_shr(value: &BigInt, shift: usize) -> BigInt {
    if value.sign() == Sign::Minus {
        let magnitude: BigInt = -value - 1;
        -(magnitude >> shift) - 1
    } else {
        value >> shift
    }
}

impl IntegerBackend for BigInteger {
    fn shift_left(value: i64, shift: u32) -> i64 {
        if shift >= 64 {
            return 0;
        }
        to_i64(&low_bits(&(BigInt::from(value) << shift as usize)))
    }

    fn shift_right(value: i64, shift: u32) -> i64 {
        let shifted = floor_shr(&BigInt::from(value), shift.min(63) as usize);
        to_i64(&low_bits(&shifted))
    }

    fn encode_long(value: i64, buf: &mut [u8; MAX_VARINT_LEN]) -> usize {
        let n = BigInt::from(value);
        let doubled = low_bits(&(&n << 1usize));
        let sign = low_bits(&floor_shr(&n, 63));
        let mut z = doubled ^ sign;

        let low_mask = BigUint::from(0x7Fu8);
        let mut i = 0;
        while z > low_mask {
            let group = to_i64(&(&z & &low_mask)) as u8;
            buf[i] = group | 0x80;
            z >>= 7usize;
            i += 1;
        }
        buf[i] = to_i64(&z) as u8;
        i + 1
    }

    fn decode_long(bytes: &[u8]) -> AvroResult<(i64, usize)> {
        let mut acc = BigUint::default();
        for (j, &byte) in bytes.iter().enumerate() {
            if j >= MAX_VARINT_LEN {
                return Err(Details::IntegerOverflow.into());
            }
            acc |= BigUint::from(byte & 0x7F) << (7 * j);
            if byte & 0x80 == 0 {
                let z = low_bits(&BigInt::from(acc));
                let half = BigInt::from(&z >> 1usize);
                let value = if to_i64(&z) & 1 == 1 { -half - 1 } else { half };
                return Ok((to_i64(&low_bits(&value)), j + 1));
            }
        }
        Err(unterminated().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TestResult, zigzag::Native};
    use pretty_assertions::assert_eq;

    #[test]
    fn agrees_with_native_on_edges() -> TestResult {
        for value in [0, 1, -1, 63, -64, 64, i64::from(i32::MAX), i64::MIN, i64::MAX] {
            let mut big = [0u8; MAX_VARINT_LEN];
            let mut native = [0u8; MAX_VARINT_LEN];
            let big_len = BigInteger::encode_long(value, &mut big);
            let native_len = Native::encode_long(value, &mut native);
            assert_eq!(big[..big_len], native[..native_len]);
            assert_eq!(BigInteger::decode_long(&big[..big_len])?, (value, big_len));
            for shift in [0, 1, 7, 63, 64] {
                assert_eq!(
                    BigInteger::shift_left(value, shift),
                    Native::shift_left(value, shift)
                );
                assert_eq!(
                    BigInteger::shift_right(value, shift),
                    Native::shift_right(value, shift)
                );
            }
        }
        Ok(())
    }

    #[test]
    fn floor_shift_rounds_towards_negative_infinity() {
        assert_eq!(floor_shr(&BigInt::from(-100), 7), BigInt::from(-1));
        assert_eq!(floor_shr(&BigInt::from(-1000000), 7), BigInt::from(-7813));
        assert_eq!(floor_shr(&BigInt::from(1000000), 7), BigInt::from(7812));
    }
}
