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

//! Metagen Tools Library
//!
//! Reference host for the generator: loads JSON symbol table snapshots and build
//! properties from disk, runs the pipeline and writes the generated artifacts.

pub mod cli;
pub mod emitter;

pub use cli::generate::{GenerateArgs, GenerateSummary, run_generate};
pub use cli::modules::{ModulesArgs, list_modules};
pub use emitter::JsonEmitter;

use anyhow::{Context, Result};
use metagen_common::{MemorySymbolTable, Snapshot};
use metagen_compiler::BuildProperties;
use std::fs;
use std::path::Path;

/// Load a JSON snapshot written by `MemorySymbolTable::to_json`
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let json = fs::read_to_string(path).with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let table = MemorySymbolTable::from_json(&json).with_context(|| format!("invalid snapshot {}", path.display()))?;
    Ok(Snapshot::from_table(table))
}

/// Load build properties from a flat JSON object of strings
pub fn load_properties(path: &Path) -> Result<BuildProperties> {
    let json = fs::read_to_string(path).with_context(|| format!("failed to read properties {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("invalid properties {}", path.display()))
}
