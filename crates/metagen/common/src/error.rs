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

//! Errors raised while loading symbol table snapshots

use crate::symbols::{ModuleId, TypeId};
use thiserror::Error;

/// Errors that can occur while loading or validating a snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Root module {0} is not declared")]
    MissingRoot(ModuleId),

    #[error("{owner} references undeclared module {module}")]
    UnknownModule { owner: String, module: ModuleId },

    #[error("{owner} references undeclared type {ty}")]
    UnknownType { owner: String, ty: TypeId },
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
