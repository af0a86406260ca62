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

//! Shared symbol model for the Metagen code generator
//!
//! This crate defines everything the generator core needs to know about a host's
//! symbol table:
//! - Opaque module and type handles plus attribute data (`symbols`)
//! - Snapshot-independent type descriptors (`descriptor`)
//! - The `SymbolTable` capability trait and `Snapshot` handle (`table`)
//! - Content fingerprints (`fingerprint`)
//! - An in-memory, JSON-loadable symbol table (`memory`)

pub mod descriptor;
pub mod error;
pub mod fingerprint;
pub mod memory;
pub mod symbols;
pub mod table;

pub use descriptor::TypeDescriptor;
pub use error::{SnapshotError, SnapshotResult};
pub use fingerprint::{Fingerprint, FingerprintHasher};
pub use memory::{MemorySymbolTable, ModuleDecl, SymbolTableBuilder, TableData, TypeDecl};
pub use symbols::{AttributeInstance, ConstantKind, ModuleId, Symbol, TypeId, TypeKind, TypedConstant};
pub use table::{Snapshot, SymbolTable};
