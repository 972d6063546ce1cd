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
    error::Details,
    schema::{
        EnumSchema, FixedSchema, Name, Names, NamesRef, RecordSchema, Schema, UnionSchema,
    },
};
use std::collections::HashMap;

/// A schema together with the table of every named type it defines.
///
/// Named types are stored once, at their definition, and referred to by
/// [`Schema::Ref`] everywhere else. Resolving a reference yields the defining node
/// itself, so a recursive reference resolves to the very record that contains it.
#[derive(Debug)]
pub struct ResolvedSchema<'s> {
    names_ref: NamesRef<'s>,
    root: &'s Schema,
}

impl<'s> TryFrom<&'s Schema> for ResolvedSchema<'s> {
    type Error = Error;

    fn try_from(schema: &'s Schema) -> AvroResult<Self> {
        let mut rs = ResolvedSchema {
            names_ref: HashMap::new(),
            root: schema,
        };
        let mut references = Vec::new();
        rs.collect(schema, &mut references)?;
        if let Some(name) = references
            .into_iter()
            .find(|name| !rs.names_ref.contains_key(*name))
        {
            return Err(Details::UnknownType(name.clone()).into());
        }
        Ok(rs)
    }
}

impl<'s> ResolvedSchema<'s> {
    pub fn root(&self) -> &'s Schema {
        self.root
    }

    pub fn get_names(&self) -> &NamesRef<'s> {
        &self.names_ref
    }

    /// The definition bound to `name`.
    pub fn resolve(&self, name: &Name) -> AvroResult<&'s Schema> {
        self.names_ref
            .get(name)
            .copied()
            .ok_or_else(|| Details::SchemaResolutionError(name.clone()).into())
    }

    /// An owned copy of the names table.
    pub fn to_names(&self) -> Names {
        self.names_ref
            .iter()
            .map(|(name, schema)| (name.clone(), (*schema).clone()))
            .collect()
    }

    fn collect(&mut self, schema: &'s Schema, references: &mut Vec<&'s Name>) -> AvroResult<()> {
        match schema {
            Schema::Primitive(_) => {}
            Schema::Array(array) => self.collect(&array.items, references)?,
            Schema::Map(map) => self.collect(&map.values, references)?,
            Schema::Union(UnionSchema { schemas, .. }) => {
                for schema in schemas {
                    self.collect(schema, references)?;
                }
            }
            Schema::Enum(EnumSchema { name, .. }) | Schema::Fixed(FixedSchema { name, .. }) => {
                self.define(name, schema)?
            }
            Schema::Record(RecordSchema { name, fields, .. }) => {
                self.define(name, schema)?;
                for field in fields {
                    self.collect(&field.schema, references)?;
                }
            }
            Schema::Ref { name } => references.push(name),
        }
        Ok(())
    }

    fn define(&mut self, name: &Name, schema: &'s Schema) -> AvroResult<()> {
        if self.names_ref.insert(name.clone(), schema).is_some() {
            return Err(Details::DuplicateName(name.clone()).into());
        }
        Ok(())
    }
}
