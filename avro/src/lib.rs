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

//! The core of **[Apache Avro](https://avro.apache.org/)**: schemas, the binary encoding of
//! datums and the reading of object container files.
//!
//! A [`Schema`] is parsed from its JSON text with [`Schema::parse_str`]. Named types (records,
//! enums and fixed) are defined once and referred to by name everywhere else, which is how
//! recursive schemas are expressed. Displaying a schema yields its canonical JSON text.
//!
//! Datums are represented by the generic [`Value`](types::Value) type. [`to_avro_datum`] and
//! [`from_avro_datum`] convert between values and the binary encoding of a single datum, and a
//! [`Reader`] iterates over the values stored in a container file:
//!
//! ```
//! use avro_core::{Schema, from_avro_datum, to_avro_datum, types::Value};
//!
//! let schema = Schema::parse_str(r#"{"type": "array", "items": "long"}"#).unwrap();
//! let value = Value::Array(vec![Value::Long(-1), Value::Long(64)]);
//! let bytes = to_avro_datum(&schema, &value).unwrap();
//! assert_eq!(bytes, [0x04, 0x01, 0x80, 0x01, 0x00]);
//! assert_eq!(from_avro_datum(&schema, &mut &bytes[..]).unwrap(), value);
//! ```
//!
//! # Features
//!
//! - `snappy`: enable support for the Snappy codec
//! - `arbitrary-precision`: use the [`BigInteger`](zigzag::BigInteger) backend for the
//!   zigzag integer codec
//!
//! # MSRV
//!
//! The current MSRV is 1.88.0.

mod codec;
mod decode;
mod encode;
mod reader;
mod validator;

pub mod error;
pub mod schema;
pub mod types;
pub mod util;
pub mod zigzag;

pub use codec::{Codec, Codecs, Decompressor};
pub use decode::decode;
pub use encode::{encode, to_avro_datum};
pub use error::{Error, ErrorKind};
pub use reader::{Reader, from_avro_datum, open};
pub use schema::Schema;

/// A convenience type alias for `Result`s with `Error`s.
pub type AvroResult<T> = Result<T, Error>;

#[cfg(test)]
pub(crate) type TestResult = anyhow::Result<()>;
