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
    AvroResult,
    error::Details,
    schema::{Name, Schema},
};
use log::debug;
use std::collections::HashSet;

/// The named types of one schema document.
///
/// A fresh registry is created for every parse. Definitions are registered before their
/// bodies are parsed, so a type may refer to itself. References to names that are not
/// registered yet are remembered and checked once the whole document has been read.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    defined: HashSet<Name>,
    pending: Vec<Name>,
}

impl Registry {
    /// Bind `name` to the definition being parsed.
    pub(crate) fn register(&mut self, name: &Name) -> AvroResult<()> {
        if !self.defined.insert(name.clone()) {
            return Err(Details::DuplicateName(name.clone()).into());
        }
        debug!("Registering {name}");
        Ok(())
    }

    /// Whether `name` has been defined so far.
    pub(crate) fn lookup(&self, name: &Name) -> bool {
        self.defined.contains(name)
    }

    /// A reference to `name`, which must be defined by the end of the document.
    pub(crate) fn reference(&mut self, name: Name) -> Schema {
        if !self.lookup(&name) {
            debug!("Forward reference to {name}");
            self.pending.push(name.clone());
        }
        Schema::Ref { name }
    }

    /// Check that every forward reference was eventually defined.
    pub(crate) fn finish(self) -> AvroResult<()> {
        match self
            .pending
            .into_iter()
            .find(|name| !self.defined.contains(name))
        {
            Some(name) => Err(Details::UnknownType(name).into()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TestResult, error::ErrorKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn duplicate_registration_fails() -> TestResult {
        let mut registry = Registry::default();
        let name = Name::new("a.Node")?;
        registry.register(&name)?;
        let err = registry.register(&name).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaParse);
        assert!(matches!(err.details(), Details::DuplicateName(n) if *n == name));
        Ok(())
    }

    #[test]
    fn forward_reference_resolved_later() -> TestResult {
        let mut registry = Registry::default();
        let name = Name::new("Later")?;
        assert_eq!(
            registry.reference(name.clone()),
            Schema::Ref { name: name.clone() }
        );
        assert!(!registry.lookup(&name));
        registry.register(&name)?;
        assert!(registry.lookup(&name));
        registry.finish()?;
        Ok(())
    }

    #[test]
    fn unresolved_reference_fails_at_finish() -> TestResult {
        let mut registry = Registry::default();
        registry.reference(Name::new("Missing")?);
        let err = registry.finish().unwrap_err();
        assert!(matches!(err.details(), Details::UnknownType(n) if n.name() == "Missing"));
        Ok(())
    }
}
