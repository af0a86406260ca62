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

//! Error handling for the generator pipeline

use metagen_common::ConstantKind;
use thiserror::Error;

/// Errors raised by the resolver and the analysis stages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    // Configuration errors
    #[error("Cannot find type with metadata name {metadata_name}")]
    MarkerNotFound { metadata_name: String },

    // Malformed input
    #[error("Unrecognized argument type in attribute [{attribute}({argument})] on {target}: expected {expected}, found {found}")]
    UnexpectedArgument {
        attribute: String,
        argument: String,
        target: String,
        expected: &'static str,
        found: ConstantKind,
    },

    #[error("Attribute [{attribute}] on {target} is missing constructor argument {index}")]
    MissingArgument { attribute: String, target: String, index: usize },

    #[error("Attribute [{attribute}] on {target} has an invalid value: {details}")]
    InvalidArgument { attribute: String, target: String, details: String },

    #[error("Type {type_name} referenced by [{attribute}] on {target} has no declaring module")]
    NoDeclaringModule { attribute: String, type_name: String, target: String },

    // Control
    #[error("Generation was cancelled")]
    Cancelled,

    // Internal errors
    #[error("Internal generator error: {0}")]
    Internal(String),
}

/// Classification of a [`GeneratorError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required marker type is missing from the symbol table
    Configuration,
    /// The input program violates a marker attribute's contract
    MalformedInput,
    /// The host asked the run to stop
    Cancelled,
    /// Anything else
    Internal,
}

impl GeneratorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeneratorError::MarkerNotFound { .. } => ErrorKind::Configuration,
            GeneratorError::UnexpectedArgument { .. }
            | GeneratorError::MissingArgument { .. }
            | GeneratorError::InvalidArgument { .. }
            | GeneratorError::NoDeclaringModule { .. } => ErrorKind::MalformedInput,
            GeneratorError::Cancelled => ErrorKind::Cancelled,
            GeneratorError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        GeneratorError::Internal(message.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, GeneratorError::Cancelled)
    }
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;
