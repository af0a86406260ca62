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

//! In-memory symbol table
//!
//! A plain-data [`SymbolTable`] that hosts can deserialize from JSON or build in code.
//! Module and type handles are indices into the declaration vectors, so declaration
//! order is exactly the order entries were added.

use crate::descriptor::TypeDescriptor;
use crate::error::{SnapshotError, SnapshotResult};
use crate::fingerprint::Fingerprint;
use crate::symbols::{AttributeInstance, ModuleId, Symbol, TypeId, TypeKind, TypedConstant};
use crate::table::SymbolTable;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A declared module
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleDecl {
    #[serde(default)]
    pub name: Option<String>,
    /// Module-level attributes
    #[serde(default)]
    pub attributes: Vec<AttributeInstance>,
}

/// A type symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDecl {
    pub descriptor: TypeDescriptor,
    /// Declaring module, `None` for built-ins and constructed generics
    #[serde(default)]
    pub module: Option<ModuleId>,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub base: Option<TypeId>,
    /// Directly implemented interfaces
    #[serde(default)]
    pub interfaces: Vec<TypeId>,
    #[serde(default)]
    pub attributes: Vec<AttributeInstance>,
    /// Generic definition this type was constructed from
    #[serde(default)]
    pub definition: Option<TypeId>,
}

/// Serializable content of a [`MemorySymbolTable`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableData {
    pub root: ModuleId,
    pub modules: Vec<ModuleDecl>,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

/// Symbol table backed by owned declaration vectors
#[derive(Debug, Clone)]
pub struct MemorySymbolTable {
    data: TableData,
    by_name: HashMap<String, TypeId>,
    declared: Vec<Vec<TypeId>>,
    fingerprint: Fingerprint,
}

impl MemorySymbolTable {
    /// Validate and index table data
    pub fn from_data(data: TableData) -> SnapshotResult<Self> {
        validate(&data)?;
        Ok(Self::index(data))
    }

    /// Parse and validate a JSON snapshot
    pub fn from_json(json: &str) -> SnapshotResult<Self> {
        let data: TableData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    pub fn to_json(&self) -> SnapshotResult<String> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    pub fn data(&self) -> &TableData {
        &self.data
    }

    fn index(data: TableData) -> Self {
        let mut declared = vec![Vec::new(); data.modules.len()];
        let mut by_name: HashMap<String, TypeId> = HashMap::new();

        for (i, decl) in data.types.iter().enumerate() {
            let id = TypeId(i as u32);
            if decl.definition.is_some() {
                continue;
            }
            if let Some(module) = decl.module {
                if let Some(list) = declared.get_mut(module.index()) {
                    list.push(id);
                }
            }
            // Root module declarations win name clashes, otherwise first declaration wins
            let name = decl.descriptor.metadata_name();
            let in_root = decl.module == Some(data.root);
            let keep_existing = by_name
                .get(&name)
                .is_some_and(|existing| !in_root || data.types[existing.index()].module == Some(data.root));
            if !keep_existing {
                by_name.insert(name, id);
            }
        }

        let fingerprint = Fingerprint::of(&data);
        Self {
            data,
            by_name,
            declared,
            fingerprint,
        }
    }

    fn type_decl(&self, ty: TypeId) -> Option<&TypeDecl> {
        self.data.types.get(ty.index())
    }

    fn collect_interfaces(&self, ty: TypeId, seen: &mut HashSet<TypeId>, out: &mut Vec<TypeId>) {
        let Some(decl) = self.type_decl(ty) else { return };
        for &iface in &decl.interfaces {
            if seen.insert(iface) {
                out.push(iface);
                self.collect_interfaces(iface, seen, out);
            }
        }
    }
}

impl SymbolTable for MemorySymbolTable {
    fn root_module(&self) -> ModuleId {
        self.data.root
    }

    fn module_name(&self, module: ModuleId) -> Option<String> {
        self.data.modules.get(module.index()).and_then(|m| m.name.clone())
    }

    fn resolve_type(&self, metadata_name: &str) -> Option<TypeId> {
        self.by_name.get(metadata_name).copied()
    }

    fn declared_types(&self, module: ModuleId) -> Vec<TypeId> {
        self.declared.get(module.index()).cloned().unwrap_or_default()
    }

    fn attributes_on(&self, symbol: Symbol, attribute_type: TypeId) -> Vec<AttributeInstance> {
        let attributes = match symbol {
            Symbol::Module(id) => self.data.modules.get(id.index()).map(|m| &m.attributes),
            Symbol::Type(id) => self.type_decl(id).map(|t| &t.attributes),
        };
        attributes
            .map(|attrs| attrs.iter().filter(|a| a.attribute_type == attribute_type).cloned().collect())
            .unwrap_or_default()
    }

    fn declaring_module(&self, ty: TypeId) -> Option<ModuleId> {
        self.type_decl(ty).and_then(|t| t.module)
    }

    fn original_definition(&self, ty: TypeId) -> TypeId {
        self.type_decl(ty).and_then(|t| t.definition).unwrap_or(ty)
    }

    fn base_type(&self, ty: TypeId) -> Option<TypeId> {
        self.type_decl(ty).and_then(|t| t.base)
    }

    fn implemented_interfaces(&self, ty: TypeId) -> Vec<TypeId> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut current = Some(ty);
        let mut visited_bases = HashSet::new();
        while let Some(t) = current {
            if !visited_bases.insert(t) {
                break;
            }
            self.collect_interfaces(t, &mut seen, &mut out);
            current = self.base_type(t);
        }
        out
    }

    fn type_kind(&self, ty: TypeId) -> TypeKind {
        self.type_decl(ty).map(|t| t.kind).unwrap_or_default()
    }

    fn to_open_descriptor(&self, ty: TypeId) -> TypeDescriptor {
        let definition = self.original_definition(ty);
        match self.type_decl(definition) {
            Some(decl) => decl.descriptor.clone(),
            None => TypeDescriptor::new("", format!("<unknown {ty}>")),
        }
    }

    fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}

fn validate(data: &TableData) -> SnapshotResult<()> {
    if data.root.index() >= data.modules.len() {
        return Err(SnapshotError::MissingRoot(data.root));
    }

    for (i, module) in data.modules.iter().enumerate() {
        check_attributes(data, &format!("module#{i}"), &module.attributes)?;
    }

    for (i, decl) in data.types.iter().enumerate() {
        let owner = format!("type#{i} ({})", decl.descriptor);
        if let Some(module) = decl.module {
            check_module(data, &owner, module)?;
        }
        for ty in decl.base.iter().chain(decl.definition.iter()).chain(decl.interfaces.iter()) {
            check_type(data, &owner, *ty)?;
        }
        check_attributes(data, &owner, &decl.attributes)?;
    }
    Ok(())
}

fn check_module(data: &TableData, owner: &str, module: ModuleId) -> SnapshotResult<()> {
    if module.index() >= data.modules.len() {
        return Err(SnapshotError::UnknownModule {
            owner: owner.to_string(),
            module,
        });
    }
    Ok(())
}

fn check_type(data: &TableData, owner: &str, ty: TypeId) -> SnapshotResult<()> {
    if ty.index() >= data.types.len() {
        return Err(SnapshotError::UnknownType { owner: owner.to_string(), ty });
    }
    Ok(())
}

fn check_attributes(data: &TableData, owner: &str, attributes: &[AttributeInstance]) -> SnapshotResult<()> {
    for attr in attributes {
        check_type(data, owner, attr.attribute_type)?;
        let mut pending: Vec<&TypedConstant> = attr.arguments.iter().collect();
        while let Some(arg) = pending.pop() {
            match arg {
                TypedConstant::Type(ty) => check_type(data, owner, *ty)?,
                TypedConstant::Array(items) => pending.extend(items.iter()),
                _ => {}
            }
        }
    }
    Ok(())
}

/// Programmatic construction of a [`MemorySymbolTable`].
///
/// Handles returned by the builder are only valid for the table it builds.
#[derive(Debug, Clone)]
pub struct SymbolTableBuilder {
    data: TableData,
}

impl SymbolTableBuilder {
    /// Start a table whose root module is named `root_name`
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            data: TableData {
                root: ModuleId(0),
                modules: vec![ModuleDecl {
                    name: Some(root_name.into()),
                    attributes: Vec::new(),
                }],
                types: Vec::new(),
            },
        }
    }

    pub fn root(&self) -> ModuleId {
        self.data.root
    }

    pub fn add_module(&mut self, name: impl Into<String>) -> ModuleId {
        self.push_module(Some(name.into()))
    }

    pub fn add_unnamed_module(&mut self) -> ModuleId {
        self.push_module(None)
    }

    fn push_module(&mut self, name: Option<String>) -> ModuleId {
        let id = ModuleId(self.data.modules.len() as u32);
        self.data.modules.push(ModuleDecl { name, attributes: Vec::new() });
        id
    }

    /// Declare a type in `module`
    pub fn add_type(&mut self, module: ModuleId, descriptor: TypeDescriptor, kind: TypeKind) -> TypeId {
        self.push_type(TypeDecl {
            descriptor,
            module: Some(module),
            kind,
            base: None,
            interfaces: Vec::new(),
            attributes: Vec::new(),
            definition: None,
        })
    }

    /// Declare a class in `module`
    pub fn add_class(&mut self, module: ModuleId, namespace: &str, name: &str) -> TypeId {
        self.add_type(module, TypeDescriptor::new(namespace, name), TypeKind::Class)
    }

    /// Declare an interface in `module`
    pub fn add_interface(&mut self, module: ModuleId, namespace: &str, name: &str) -> TypeId {
        self.add_type(module, TypeDescriptor::new(namespace, name), TypeKind::Interface)
    }

    /// Add a type that no module declares (a built-in)
    pub fn add_builtin(&mut self, descriptor: TypeDescriptor) -> TypeId {
        self.push_type(TypeDecl {
            descriptor,
            module: None,
            kind: TypeKind::Struct,
            base: None,
            interfaces: Vec::new(),
            attributes: Vec::new(),
            definition: None,
        })
    }

    /// Add a constructed instance of a generic definition
    pub fn add_constructed(&mut self, definition: TypeId, descriptor: TypeDescriptor) -> TypeId {
        let kind = self.data.types.get(definition.index()).map(|t| t.kind).unwrap_or_default();
        self.push_type(TypeDecl {
            descriptor,
            module: None,
            kind,
            base: None,
            interfaces: Vec::new(),
            attributes: Vec::new(),
            definition: Some(definition),
        })
    }

    fn push_type(&mut self, decl: TypeDecl) -> TypeId {
        let id = TypeId(self.data.types.len() as u32);
        self.data.types.push(decl);
        id
    }

    pub fn set_base(&mut self, ty: TypeId, base: TypeId) {
        if let Some(decl) = self.data.types.get_mut(ty.index()) {
            decl.base = Some(base);
        }
    }

    pub fn implement(&mut self, ty: TypeId, interface: TypeId) {
        if let Some(decl) = self.data.types.get_mut(ty.index()) {
            decl.interfaces.push(interface);
        }
    }

    pub fn add_type_attribute(&mut self, ty: TypeId, attribute_type: TypeId, arguments: Vec<TypedConstant>) {
        if let Some(decl) = self.data.types.get_mut(ty.index()) {
            decl.attributes.push(AttributeInstance::new(attribute_type, arguments));
        }
    }

    pub fn add_module_attribute(&mut self, module: ModuleId, attribute_type: TypeId, arguments: Vec<TypedConstant>) {
        if let Some(decl) = self.data.modules.get_mut(module.index()) {
            decl.attributes.push(AttributeInstance::new(attribute_type, arguments));
        }
    }

    pub fn build(self) -> MemorySymbolTable {
        MemorySymbolTable::index(self.data)
    }

    pub fn into_data(self) -> TableData {
        self.data
    }
}
