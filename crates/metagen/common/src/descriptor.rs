// Metagen
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Snapshot-independent structural type descriptors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Open (unbound) description of a type declaration.
///
/// Generic parameters are kept by name, so `Foo<int>` and `Foo<string>` share the
/// descriptor `Foo<T>`. The descriptor owns all of its data and stays valid after the
/// symbol table it was read from is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Dotted namespace, empty for the global namespace
    #[serde(default)]
    pub namespace: String,
    /// Enclosing types, outermost first
    #[serde(default)]
    pub containing_types: Vec<String>,
    /// Simple name without generic arity
    pub name: String,
    /// Generic parameter names, in declaration order
    #[serde(default)]
    pub type_parameters: Vec<String>,
}

impl TypeDescriptor {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            containing_types: Vec::new(),
            name: name.into(),
            type_parameters: Vec::new(),
        }
    }

    /// Add generic parameters
    pub fn with_type_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// Nest this type inside `containing`, outermost first
    pub fn nested_in<I, S>(mut self, containing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.containing_types = containing.into_iter().map(Into::into).collect();
        self
    }

    pub fn arity(&self) -> usize {
        self.type_parameters.len()
    }

    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    /// Stable lookup name, e.g. ``Ns.Outer+Inner`1``
    pub fn metadata_name(&self) -> String {
        let mut out = String::new();
        if !self.namespace.is_empty() {
            out.push_str(&self.namespace);
            out.push('.');
        }
        for outer in &self.containing_types {
            out.push_str(outer);
            out.push('+');
        }
        out.push_str(&self.name);
        if self.is_generic() {
            out.push('`');
            out.push_str(&self.arity().to_string());
        }
        out
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.namespace.is_empty() {
            write!(f, "{}.", self.namespace)?;
        }
        for outer in &self.containing_types {
            write!(f, "{outer}.")?;
        }
        f.write_str(&self.name)?;
        if self.is_generic() {
            write!(f, "<{}>", self.type_parameters.join(", "))?;
        }
        Ok(())
    }
}
