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

use crate::AvroResult;
use crate::error::Details;
use crate::schema::Schema;
use log::warn;
use std::collections::BTreeMap;

/// A description of a Union schema
#[derive(Debug, Clone)]
pub struct UnionSchema {
    /// The schemas that make up this union
    pub(crate) schemas: Vec<Schema>,
    // Branch position by type signature, which also guarantees the signatures are unique.
    variant_index: BTreeMap<String, usize>,
}

impl UnionSchema {
    /// Creates a new UnionSchema from a vector of schemas.
    ///
    /// # Errors
    /// Will return an error if `schemas` is empty, contains a union, or has two branches
    /// with the same type signature (the same primitive, `array` or `map` kind, or the
    /// same fullname for named types).
    pub fn new(schemas: Vec<Schema>) -> AvroResult<Self> {
        if schemas.is_empty() {
            return Err(Details::EmptyUnion.into());
        }
        let mut variant_index = BTreeMap::new();
        for (i, schema) in schemas.iter().enumerate() {
            if let Schema::Union(_) = schema {
                return Err(Details::GetNestedUnion.into());
            }
            let signature = schema.type_signature();
            if variant_index.contains_key(&signature) {
                return Err(Details::GetUnionDuplicate(signature).into());
            }
            variant_index.insert(signature, i);
        }
        if schemas.len() == 1 {
            warn!("Union with a single branch: {}", schemas[0].type_signature());
        }
        Ok(UnionSchema {
            schemas,
            variant_index,
        })
    }

    /// Returns a slice to all variants of this schema.
    pub fn variants(&self) -> &[Schema] {
        &self.schemas
    }

    /// Position of the branch with the given type signature.
    pub fn variant_position(&self, signature: &str) -> Option<usize> {
        self.variant_index.get(signature).copied()
    }

    /// Returns true if the first variant of this `UnionSchema` is `null`.
    pub fn is_nullable(&self) -> bool {
        self.variant_index.get("null") == Some(&0)
    }
}

// No need to compare variant_index, it is derivative of schemas.
impl PartialEq for UnionSchema {
    fn eq(&self, other: &UnionSchema) -> bool {
        self.schemas.eq(&other.schemas)
    }
}
