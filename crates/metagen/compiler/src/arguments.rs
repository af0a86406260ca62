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

//! Typed access to marker attribute constructor arguments

use crate::error::{GeneratorError, GeneratorResult};
use crate::markers::short_name;
use metagen_common::{AttributeInstance, TypeId, TypedConstant};

/// Reads the arguments of one attribute instance, producing malformed-input errors that
/// name the attribute and the symbol it was applied to.
pub(crate) struct ArgumentReader<'a> {
    attribute: &'a AttributeInstance,
    marker: &'static str,
    target: String,
}

impl<'a> ArgumentReader<'a> {
    pub fn new(attribute: &'a AttributeInstance, marker: &'static str, target: String) -> Self {
        Self { attribute, marker, target }
    }

    /// Positional arguments, flattening a lone array argument
    pub fn variadic(&self) -> &'a [TypedConstant] {
        match self.attribute.arguments.as_slice() {
            [TypedConstant::Array(items)] => items,
            arguments => arguments,
        }
    }

    pub fn required(&self, index: usize) -> GeneratorResult<&'a TypedConstant> {
        self.attribute.argument(index).ok_or_else(|| GeneratorError::MissingArgument {
            attribute: self.attribute_name(),
            target: self.target.clone(),
            index,
        })
    }

    pub fn string(&self, index: usize) -> GeneratorResult<&'a str> {
        let argument = self.required(index)?;
        argument.as_str().ok_or_else(|| self.unexpected(argument, "string"))
    }

    pub fn type_reference(&self, index: usize) -> GeneratorResult<TypeId> {
        let argument = self.required(index)?;
        argument.as_type().ok_or_else(|| self.unexpected(argument, "type reference"))
    }

    pub fn integer(&self, index: usize) -> GeneratorResult<i64> {
        let argument = self.required(index)?;
        argument.as_int().ok_or_else(|| self.unexpected(argument, "integer"))
    }

    pub fn unexpected(&self, argument: &TypedConstant, expected: &'static str) -> GeneratorError {
        GeneratorError::UnexpectedArgument {
            attribute: self.attribute_name(),
            argument: argument.to_string(),
            target: self.target.clone(),
            expected,
            found: argument.kind(),
        }
    }

    pub fn invalid(&self, details: impl Into<String>) -> GeneratorError {
        GeneratorError::InvalidArgument {
            attribute: self.attribute_name(),
            target: self.target.clone(),
            details: details.into(),
        }
    }

    pub fn attribute_name(&self) -> String {
        short_name(self.marker).to_string()
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::names;
    use metagen_common::ConstantKind;

    fn reader(attribute: &AttributeInstance) -> ArgumentReader<'_> {
        ArgumentReader::new(attribute, names::ALIAS, "type App.Foo".to_string())
    }

    #[test]
    fn test_string_argument() {
        let attribute = AttributeInstance::new(TypeId(0), vec![TypedConstant::string("foo")]);
        assert_eq!(reader(&attribute).string(0), Ok("foo"));
    }

    #[test]
    fn test_wrong_kind_names_attribute_and_target() {
        let attribute = AttributeInstance::new(TypeId(0), vec![TypedConstant::Int(7)]);
        match reader(&attribute).string(0) {
            Err(GeneratorError::UnexpectedArgument {
                attribute,
                argument,
                target,
                expected,
                found,
            }) => {
                assert_eq!(attribute, "Alias");
                assert_eq!(argument, "7");
                assert_eq!(target, "type App.Foo");
                assert_eq!(expected, "string");
                assert_eq!(found, ConstantKind::Primitive);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_missing_argument() {
        let attribute = AttributeInstance::new(TypeId(0), vec![]);
        assert!(matches!(reader(&attribute).type_reference(0), Err(GeneratorError::MissingArgument { index: 0, .. })));
    }

    #[test]
    fn test_variadic_flattens_single_array() {
        let items = vec![TypedConstant::string("a"), TypedConstant::Type(TypeId(3))];
        let packed = AttributeInstance::new(TypeId(0), vec![TypedConstant::Array(items.clone())]);
        let spread = AttributeInstance::new(TypeId(0), items.clone());
        assert_eq!(reader(&packed).variadic(), items.as_slice());
        assert_eq!(reader(&spread).variadic(), items.as_slice());
    }
}
