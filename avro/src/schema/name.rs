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

use serde_json::{Map, Value};
use std::{
    collections::HashMap,
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

use crate::{
    AvroResult, Error, Schema,
    error::Details,
    util::MapHelper,
    validator::{validate_namespace, validate_schema_name},
};

/// The fully qualified name of a `record`, `enum` or `fixed` schema.
///
/// A fullname has two parts, a namespace and a name. The namespace is either given
/// explicitly, taken from a dotted name (`com.example.Foo`), or inherited from the
/// enclosing named type.
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name {
    namespace: Namespace,
    name: String,
}

/// Schemas owned by fullname.
pub type Names = HashMap<Name, Schema>;
/// Schemas borrowed by fullname.
pub type NamesRef<'a> = HashMap<Name, &'a Schema>;
/// The namespace of a named schema.
pub type Namespace = Option<String>;
/// The borrowed namespace of a named schema.
pub type NamespaceRef<'a> = Option<&'a str>;

impl Name {
    /// Create a new `Name`, splitting a dotted `name` into namespace and name.
    pub fn new(name: &str) -> AvroResult<Self> {
        Self::new_with_enclosing_namespace(name, None)
    }

    /// Create a new `Name` using `enclosing_namespace` when `name` has no namespace of its own.
    ///
    /// An empty enclosing namespace is the null namespace. A leading dot (`.Foo`) also
    /// places the name in the null namespace.
    pub fn new_with_enclosing_namespace(
        name: &str,
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Self> {
        let index_of_name = validate_schema_name(name)?;

        match index_of_name {
            0 => {
                let namespace = match enclosing_namespace {
                    Some(namespace) if !namespace.is_empty() => {
                        validate_namespace(namespace)?;
                        Some(namespace.to_string())
                    }
                    _ => None,
                };
                Ok(Self {
                    namespace,
                    name: name.to_string(),
                })
            }
            1 => Ok(Self {
                namespace: None,
                name: name[1..].to_string(),
            }),
            _ => Ok(Self {
                namespace: Some(name[..index_of_name - 1].to_string()),
                name: name[index_of_name..].to_string(),
            }),
        }
    }

    /// Read the `name` and `namespace` attributes of a named schema definition.
    pub(crate) fn parse(
        complex: &Map<String, Value>,
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Self> {
        let name = match complex.get("name") {
            Some(Value::String(name)) => name,
            Some(other) => return Err(Details::GetNameFieldType(other.clone()).into()),
            None => return Err(Details::GetNameField.into()),
        };
        let namespace = complex.optional_string("namespace", Details::GetNamespaceFieldType)?;
        Self::new_with_enclosing_namespace(name, namespace.as_deref().or(enclosing_namespace))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> NamespaceRef<'_> {
        self.namespace.as_deref()
    }

    /// Namespace and name joined by a dot, or just the name in the null namespace.
    pub fn fullname(&self) -> String {
        self.to_string()
    }

    /// How a reference to this name is written inside `enclosing_namespace`. A name in the
    /// null namespace gets a leading dot when the enclosing namespace is not null.
    pub(crate) fn relative_to(&self, enclosing_namespace: NamespaceRef) -> String {
        match (self.namespace(), enclosing_namespace) {
            (namespace, enclosing) if namespace == enclosing => self.name.clone(),
            (None, Some(_)) => format!(".{}", self.name),
            _ => self.fullname(),
        }
    }
}

impl TryFrom<&str> for Name {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Debug for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("Name");
        debug.field("name", &self.name);
        match &self.namespace {
            Some(namespace) => debug.field("namespace", namespace).finish(),
            None => debug.finish_non_exhaustive(),
        }
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{namespace}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}
