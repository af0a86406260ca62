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

//! Declaring-module discovery
//!
//! A module opts other modules into generation by carrying
//! `[GenerateCodeForDeclaringModule(typeof(T))]`: the module that declares `T` is
//! then scanned too, and so on transitively. The module graph this describes may
//! contain cycles, so expansion tracks visited modules.

use crate::cancellation::CancellationToken;
use crate::error::{GeneratorError, GeneratorResult};
use crate::arguments::ArgumentReader;
use crate::markers::{MarkerResolver, names};
use metagen_common::{AttributeInstance, ModuleId, Symbol, SymbolTable, TypeId};
use serde::Serialize;
use std::collections::HashSet;
use std::vec;
use tracing::{debug, trace};

/// Modules to examine, in the order they were first discovered (root first)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModuleSet {
    modules: Vec<ModuleId>,
}

impl ModuleSet {
    /// A set holding only `root`
    pub fn root_only(root: ModuleId) -> Self {
        Self { modules: vec![root] }
    }

    pub fn root(&self) -> ModuleId {
        self.modules[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.modules.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Never true; a module set always holds its root
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn contains(&self, module: ModuleId) -> bool {
        self.modules.contains(&module)
    }

    pub fn as_slice(&self) -> &[ModuleId] {
        &self.modules
    }
}

/// Human-readable label for a module, used in error messages
pub(crate) fn module_label(table: &dyn SymbolTable, module: ModuleId) -> String {
    match table.module_name(module) {
        Some(name) => format!("module {name}"),
        None => format!("module {module}"),
    }
}

/// Expands the root module into every module reachable through declaring-module markers
pub struct DeclaringModuleResolver<'a> {
    table: &'a dyn SymbolTable,
    markers: &'a MarkerResolver<'a>,
    cancel: &'a CancellationToken,
}

impl<'a> DeclaringModuleResolver<'a> {
    pub fn new(table: &'a dyn SymbolTable, markers: &'a MarkerResolver<'a>, cancel: &'a CancellationToken) -> Self {
        Self { table, markers, cancel }
    }

    /// Resolve the module set for the table's root module
    pub fn resolve(&self) -> GeneratorResult<ModuleSet> {
        self.resolve_from(self.table.root_module())
    }

    /// Resolve the module set reachable from `root`.
    ///
    /// The root is marked visited before its attributes are read, so an edge leading
    /// back to it is a no-op and the root is scanned exactly once. Expansion is
    /// depth-first over an explicit stack, so chain length is bounded by memory rather
    /// than by the thread's stack.
    pub fn resolve_from(&self, root: ModuleId) -> GeneratorResult<ModuleSet> {
        let marker = self.markers.require(names::GENERATE_CODE_FOR_DECLARING_MODULE)?;

        let mut visited = HashSet::from([root]);
        let mut order = vec![root];
        let mut stack = vec![self.frame(root, marker)?];

        while let Some((module, attributes)) = stack.last_mut() {
            let module = *module;
            let Some(attribute) = attributes.next() else {
                stack.pop();
                continue;
            };

            let declaring = self.declaring_module_of(module, &attribute)?;
            if !visited.insert(declaring) {
                trace!(module = %declaring, "module already expanded");
                continue;
            }
            order.push(declaring);
            stack.push(self.frame(declaring, marker)?);
        }

        debug!(root = %root, modules = order.len(), "resolved declaring modules");
        Ok(ModuleSet { modules: order })
    }

    /// Start expanding `module`: its declaring-module attributes in source order
    fn frame(&self, module: ModuleId, marker: TypeId) -> GeneratorResult<(ModuleId, vec::IntoIter<AttributeInstance>)> {
        self.cancel.check()?;
        Ok((module, self.table.attributes_on(Symbol::Module(module), marker).into_iter()))
    }

    /// The module declaring the type named by `attribute`, found on `module`
    fn declaring_module_of(&self, module: ModuleId, attribute: &AttributeInstance) -> GeneratorResult<ModuleId> {
        let args = ArgumentReader::new(attribute, names::GENERATE_CODE_FOR_DECLARING_MODULE, module_label(self.table, module));
        let ty = args.type_reference(0)?;

        let definition = self.table.original_definition(ty);
        self.table.declaring_module(definition).ok_or_else(|| GeneratorError::NoDeclaringModule {
            attribute: args.attribute_name(),
            type_name: self.table.to_open_descriptor(definition).to_string(),
            target: args.target().to_string(),
        })
    }
}
