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

//! Symbol handles and attribute data exposed by a symbol table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a module (a unit of symbol declaration)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(pub u32);

/// Identity of a type symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl ModuleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module#{}", self.0)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

/// A symbol that can carry attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Module(ModuleId),
    Type(TypeId),
}

impl From<ModuleId> for Symbol {
    fn from(id: ModuleId) -> Self {
        Symbol::Module(id)
    }
}

impl From<TypeId> for Symbol {
    fn from(id: TypeId) -> Self {
        Symbol::Type(id)
    }
}

/// Declaration kind of a type symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Interface,
    Enum,
}

impl TypeKind {
    pub fn is_interface(self) -> bool {
        matches!(self, TypeKind::Interface)
    }
}

/// Kind of an attribute constructor argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantKind {
    /// Bool, integer or string value
    Primitive,
    /// Reference to a type symbol
    TypeReference,
    Array,
    Null,
}

impl fmt::Display for ConstantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstantKind::Primitive => "constant",
            ConstantKind::TypeReference => "type reference",
            ConstantKind::Array => "array",
            ConstantKind::Null => "null",
        };
        f.write_str(name)
    }
}

/// Constant value passed to an attribute constructor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TypedConstant {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    Type(TypeId),
    Array(Vec<TypedConstant>),
}

impl TypedConstant {
    /// Shorthand for a string constant
    pub fn string(value: impl Into<String>) -> Self {
        TypedConstant::String(value.into())
    }

    pub fn kind(&self) -> ConstantKind {
        match self {
            TypedConstant::Null => ConstantKind::Null,
            TypedConstant::Bool(_) | TypedConstant::Int(_) | TypedConstant::String(_) => ConstantKind::Primitive,
            TypedConstant::Type(_) => ConstantKind::TypeReference,
            TypedConstant::Array(_) => ConstantKind::Array,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedConstant::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            TypedConstant::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<TypeId> {
        match self {
            TypedConstant::Type(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for TypedConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedConstant::Null => f.write_str("null"),
            TypedConstant::Bool(value) => write!(f, "{value}"),
            TypedConstant::Int(value) => write!(f, "{value}"),
            TypedConstant::String(value) => write!(f, "{value:?}"),
            TypedConstant::Type(id) => write!(f, "typeof({id})"),
            TypedConstant::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// One application of an attribute to a symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeInstance {
    /// The attribute's type
    pub attribute_type: TypeId,
    /// Positional constructor arguments
    #[serde(default)]
    pub arguments: Vec<TypedConstant>,
}

impl AttributeInstance {
    pub fn new(attribute_type: TypeId, arguments: Vec<TypedConstant>) -> Self {
        Self { attribute_type, arguments }
    }

    /// Constructor argument at `index`
    pub fn argument(&self, index: usize) -> Option<&TypedConstant> {
        self.arguments.get(index)
    }
}
