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

//! Analysis stages
//!
//! Each stage scans the resolved module set for one family of marker attributes and
//! produces an immutable, value-comparable output. Stages never read each other's
//! outputs, so they can be evaluated in any order or concurrently.

pub mod alias;
pub mod application_part;
pub mod compound_alias;
pub mod serializer;
pub mod well_known_id;

pub use alias::{AliasEntry, TypeAliasStage};
pub use application_part::ApplicationPartStage;
pub use compound_alias::{CompoundAliasComponent, CompoundAliasEntry, CompoundTypeAliasStage};
pub use serializer::{InvokableImplementation, SerializerClassification, SerializerStage};
pub use well_known_id::{WellKnownIdEntry, WellKnownTypeIdStage};

use crate::cancellation::CancellationToken;
use crate::error::GeneratorResult;
use crate::markers::MarkerResolver;
use crate::resolver::ModuleSet;
use metagen_common::{AttributeInstance, Symbol, SymbolTable, TypeId};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// The fixed set of analysis channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    TypeAliases,
    CompoundTypeAliases,
    WellKnownTypeIds,
    Serializers,
    ApplicationParts,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::TypeAliases,
        Channel::CompoundTypeAliases,
        Channel::WellKnownTypeIds,
        Channel::Serializers,
        Channel::ApplicationParts,
    ];

    /// Node name used in run reports and logs
    pub fn name(self) -> &'static str {
        match self {
            Channel::TypeAliases => "type_aliases",
            Channel::CompoundTypeAliases => "compound_type_aliases",
            Channel::WellKnownTypeIds => "well_known_type_ids",
            Channel::Serializers => "serializers",
            Channel::ApplicationParts => "application_parts",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One pure analysis over the module set
pub trait AnalysisStage: Send + Sync {
    /// Output of the analysis; compared by value to detect unchanged results
    type Output: PartialEq + Send + Sync;

    /// The channel this stage populates
    fn channel(&self) -> Channel;

    /// Run the analysis
    fn analyze(&self, cx: &StageContext<'_>) -> GeneratorResult<Self::Output>;
}

/// Read-only state shared by all stages of one run
#[derive(Clone, Copy)]
pub struct StageContext<'a> {
    pub table: &'a dyn SymbolTable,
    pub modules: &'a ModuleSet,
    pub markers: &'a MarkerResolver<'a>,
    pub cancel: &'a CancellationToken,
}

impl<'a> StageContext<'a> {
    pub fn new(table: &'a dyn SymbolTable, modules: &'a ModuleSet, markers: &'a MarkerResolver<'a>, cancel: &'a CancellationToken) -> Self {
        Self {
            table,
            modules,
            markers,
            cancel,
        }
    }

    /// Visit every declared type of every examined module.
    ///
    /// Modules are visited in discovery order and types in declaration order.
    /// Cancellation is checked before each type.
    pub fn for_each_declared_type<F>(&self, mut visit: F) -> GeneratorResult<()>
    where
        F: FnMut(TypeId) -> GeneratorResult<()>,
    {
        for module in self.modules.iter() {
            self.cancel.check()?;
            for ty in self.table.declared_types(module) {
                self.cancel.check()?;
                visit(ty)?;
            }
        }
        Ok(())
    }

    /// Attributes of `marker` applied directly to `ty`
    pub fn attributes(&self, ty: TypeId, marker: TypeId) -> Vec<AttributeInstance> {
        self.table.attributes_on(Symbol::Type(ty), marker)
    }

    /// Label used in error messages
    pub fn type_label(&self, ty: TypeId) -> String {
        format!("type {}", self.table.to_open_descriptor(ty))
    }
}

/// Whether `ty` carries `marker`, optionally looking through its ancestors.
///
/// The inherited lookup checks the type itself, then every implemented interface,
/// then each type of the base chain. A cyclic base chain is cut at the first repeat.
pub fn has_attribute(table: &dyn SymbolTable, ty: TypeId, marker: TypeId, inherited: bool) -> bool {
    let carries = |candidate: TypeId| !table.attributes_on(Symbol::Type(candidate), marker).is_empty();

    if carries(ty) {
        return true;
    }
    if !inherited {
        return false;
    }
    if table.implemented_interfaces(ty).into_iter().any(carries) {
        return true;
    }

    let mut seen = HashSet::from([ty]);
    let mut current = table.base_type(ty);
    while let Some(base) = current {
        if !seen.insert(base) {
            break;
        }
        if carries(base) {
            return true;
        }
        current = table.base_type(base);
    }
    false
}
