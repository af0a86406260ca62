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

//! Well-known marker attributes and their run-scoped resolution cache

use crate::error::{GeneratorError, GeneratorResult};
use metagen_common::{SymbolTable, TypeId};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Stable metadata names of the marker attributes
pub mod names {
    pub const GENERATE_CODE_FOR_DECLARING_MODULE: &str = "Metagen.GenerateCodeForDeclaringModuleAttribute";
    pub const ALIAS: &str = "Metagen.AliasAttribute";
    pub const COMPOUND_TYPE_ALIAS: &str = "Metagen.CompoundTypeAliasAttribute";
    pub const ID: &str = "Metagen.IdAttribute";
    pub const GENERATE_SERIALIZER: &str = "Metagen.GenerateSerializerAttribute";
    pub const USE_ACTIVATOR: &str = "Metagen.UseActivatorAttribute";
    pub const IMMUTABLE: &str = "Metagen.ImmutableAttribute";
    pub const REGISTER_SERIALIZER: &str = "Metagen.RegisterSerializerAttribute";
    pub const REGISTER_COPIER: &str = "Metagen.RegisterCopierAttribute";
    pub const REGISTER_ACTIVATOR: &str = "Metagen.RegisterActivatorAttribute";
    pub const REGISTER_CONVERTER: &str = "Metagen.RegisterConverterAttribute";
    pub const GENERATE_METHOD_SERIALIZERS: &str = "Metagen.GenerateMethodSerializersAttribute";
    pub const APPLICATION_PART: &str = "Metagen.ApplicationPartAttribute";

    /// Every marker name, required ones first
    pub const ALL: &[&str] = &[
        GENERATE_CODE_FOR_DECLARING_MODULE,
        ALIAS,
        COMPOUND_TYPE_ALIAS,
        ID,
        GENERATE_SERIALIZER,
        APPLICATION_PART,
        USE_ACTIVATOR,
        IMMUTABLE,
        REGISTER_SERIALIZER,
        REGISTER_COPIER,
        REGISTER_ACTIVATOR,
        REGISTER_CONVERTER,
        GENERATE_METHOD_SERIALIZERS,
    ];
}

/// Short display name of a marker: `Metagen.AliasAttribute` -> `Alias`
pub fn short_name(metadata_name: &str) -> &str {
    let simple = metadata_name.rsplit('.').next().unwrap_or(metadata_name);
    simple.strip_suffix("Attribute").unwrap_or(simple)
}

/// Marker type handles for one snapshot.
///
/// Shared by reference between concurrently running stages. Lookups go through a read
/// lock; a miss resolves against the symbol table and the first writer wins, so a race
/// only costs a duplicate lookup.
pub struct MarkerResolver<'a> {
    table: &'a dyn SymbolTable,
    resolved: RwLock<HashMap<&'static str, Option<TypeId>>>,
}

impl<'a> MarkerResolver<'a> {
    pub fn new(table: &'a dyn SymbolTable) -> Self {
        Self {
            table,
            resolved: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve a marker that must exist
    pub fn require(&self, metadata_name: &'static str) -> GeneratorResult<TypeId> {
        self.lookup(metadata_name).ok_or_else(|| GeneratorError::MarkerNotFound {
            metadata_name: metadata_name.to_string(),
        })
    }

    /// Resolve a marker that may be absent
    pub fn optional(&self, metadata_name: &'static str) -> Option<TypeId> {
        self.lookup(metadata_name)
    }

    /// Number of distinct names looked up so far
    pub fn cached_len(&self) -> usize {
        self.resolved.read().len()
    }

    fn lookup(&self, metadata_name: &'static str) -> Option<TypeId> {
        if let Some(hit) = self.resolved.read().get(metadata_name) {
            return *hit;
        }
        let resolved = self.table.resolve_type(metadata_name);
        debug!(marker = metadata_name, found = resolved.is_some(), "resolved marker type");
        *self.resolved.write().entry(metadata_name).or_insert(resolved)
    }
}
