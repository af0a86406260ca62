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

//! Symbol table capability interface

use crate::descriptor::TypeDescriptor;
use crate::fingerprint::Fingerprint;
use crate::symbols::{AttributeInstance, ModuleId, Symbol, TypeId, TypeKind};
use std::fmt;
use std::sync::Arc;

/// Read-only queries over one compilation snapshot.
///
/// Every analysis depends on this trait only. Handles returned by one table are
/// meaningless to another; anything that must outlive the snapshot is converted
/// to a [`TypeDescriptor`] first.
pub trait SymbolTable: Send + Sync {
    /// The module being compiled
    fn root_module(&self) -> ModuleId;

    /// Display name of a module, if it has one
    fn module_name(&self, module: ModuleId) -> Option<String>;

    /// Look up a type by its metadata name
    fn resolve_type(&self, metadata_name: &str) -> Option<TypeId>;

    /// Types declared in `module`, in stable declaration order (nested types included)
    fn declared_types(&self, module: ModuleId) -> Vec<TypeId>;

    /// Instances of `attribute_type` applied directly to `symbol`, in source order
    fn attributes_on(&self, symbol: Symbol, attribute_type: TypeId) -> Vec<AttributeInstance>;

    /// Module that declares `ty`; `None` for built-ins with no owning module
    fn declaring_module(&self, ty: TypeId) -> Option<ModuleId>;

    /// Unbound generic definition of `ty`
    fn original_definition(&self, ty: TypeId) -> TypeId {
        ty
    }

    fn base_type(&self, ty: TypeId) -> Option<TypeId>;

    /// Every interface `ty` implements, directly or through inheritance
    fn implemented_interfaces(&self, ty: TypeId) -> Vec<TypeId>;

    fn type_kind(&self, ty: TypeId) -> TypeKind;

    /// Snapshot-independent descriptor of the type's open definition
    fn to_open_descriptor(&self, ty: TypeId) -> TypeDescriptor;

    /// Content fingerprint; equal fingerprints mean value-equal snapshots
    fn fingerprint(&self) -> Fingerprint;
}

/// Shared handle to one symbol table snapshot.
///
/// Two snapshots compare equal when their content fingerprints match, which is what
/// the incremental pipeline uses to decide whether the root input changed.
#[derive(Clone)]
pub struct Snapshot {
    table: Arc<dyn SymbolTable>,
    fingerprint: Fingerprint,
}

impl Snapshot {
    pub fn new(table: Arc<dyn SymbolTable>) -> Self {
        let fingerprint = table.fingerprint();
        Self { table, fingerprint }
    }

    pub fn from_table<T: SymbolTable + 'static>(table: T) -> Self {
        Self::new(Arc::new(table))
    }

    pub fn table(&self) -> &dyn SymbolTable {
        self.table.as_ref()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl Eq for Snapshot {}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot").field("fingerprint", &self.fingerprint).finish()
    }
}
