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

//! Structured diagnostics reported at the pipeline boundary

use crate::error::GeneratorError;
use serde::Serialize;
use std::fmt;

pub mod codes {
    /// A required marker type is missing
    pub const MARKER_NOT_FOUND: &str = "MG0001";
    /// A marker attribute argument has the wrong kind or value
    pub const MALFORMED_ARGUMENT: &str = "MG0002";
    /// A referenced type has no declaring module
    pub const NO_DECLARING_MODULE: &str = "MG0003";
    /// Anything that is not an expected generator error
    pub const UNHANDLED: &str = "MG9999";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// One message for the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Map a generator error onto its diagnostic
    pub fn from_error(error: &GeneratorError) -> Self {
        let code = match error {
            GeneratorError::MarkerNotFound { .. } => codes::MARKER_NOT_FOUND,
            GeneratorError::UnexpectedArgument { .. } | GeneratorError::MissingArgument { .. } | GeneratorError::InvalidArgument { .. } => {
                codes::MALFORMED_ARGUMENT
            }
            GeneratorError::NoDeclaringModule { .. } => codes::NO_DECLARING_MODULE,
            GeneratorError::Cancelled | GeneratorError::Internal(_) => codes::UNHANDLED,
        };
        match code {
            codes::UNHANDLED => Self::unhandled(&error.to_string()),
            _ => Self::error(code, error.to_string()),
        }
    }

    /// Diagnostic for an unexpected fault
    pub fn unhandled(description: &str) -> Self {
        Self::error(codes::UNHANDLED, format!("An unhandled error occurred in the code generator: {description}"))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.code, self.message)
    }
}
