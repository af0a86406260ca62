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

//! Modules command: show which modules a snapshot pulls into generation

use crate::load_snapshot;
use anyhow::Result;
use clap::Args;
use metagen_compiler::{CancellationToken, DeclaringModuleResolver, MarkerResolver};
use std::path::PathBuf;

/// Arguments for the modules command
#[derive(Args, Debug, Clone)]
pub struct ModulesArgs {
    /// Path to the JSON symbol table snapshot
    #[arg(long, value_name = "SNAPSHOT_FILE")]
    pub snapshot: PathBuf,
}

/// Module names in discovery order, root first; unnamed modules show their id
pub fn list_modules(args: &ModulesArgs) -> Result<Vec<String>> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let table = snapshot.table();
    let markers = MarkerResolver::new(table);
    let cancel = CancellationToken::new();
    let modules = DeclaringModuleResolver::new(table, &markers, &cancel).resolve()?;

    Ok(modules.iter().map(|module| table.module_name(module).unwrap_or_else(|| module.to_string())).collect())
}
