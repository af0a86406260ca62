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

//! Read tracking for nodes that query the symbol table
//!
//! A node that reads the snapshot records every answer it was given. When the next
//! snapshot arrives those reads are replayed, and if every answer is still the same the
//! previous output is reused without running the node again. An edit that touches only
//! one channel's markers therefore leaves the other channels untouched.

use super::NodeState;
use super::cache::Evaluation;
use super::metrics::NodeStats;
use crate::error::GeneratorResult;
use metagen_common::{AttributeInstance, Fingerprint, ModuleId, Symbol, SymbolTable, TypeDescriptor, TypeId, TypeKind};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// One answer given by the symbol table
#[derive(Debug, Clone, PartialEq)]
enum Read {
    RootModule(ModuleId),
    ModuleName(ModuleId, Option<String>),
    ResolveType(String, Option<TypeId>),
    DeclaredTypes(ModuleId, Vec<TypeId>),
    AttributesOn(Symbol, TypeId, Vec<AttributeInstance>),
    DeclaringModule(TypeId, Option<ModuleId>),
    OriginalDefinition(TypeId, TypeId),
    BaseType(TypeId, Option<TypeId>),
    ImplementedInterfaces(TypeId, Vec<TypeId>),
    TypeKind(TypeId, TypeKind),
    OpenDescriptor(TypeId, TypeDescriptor),
}

impl Read {
    fn holds(&self, table: &dyn SymbolTable) -> bool {
        match self {
            Read::RootModule(module) => table.root_module() == *module,
            Read::ModuleName(module, name) => table.module_name(*module) == *name,
            Read::ResolveType(name, ty) => table.resolve_type(name) == *ty,
            Read::DeclaredTypes(module, types) => table.declared_types(*module) == *types,
            Read::AttributesOn(symbol, marker, attributes) => table.attributes_on(*symbol, *marker) == *attributes,
            Read::DeclaringModule(ty, module) => table.declaring_module(*ty) == *module,
            Read::OriginalDefinition(ty, definition) => table.original_definition(*ty) == *definition,
            Read::BaseType(ty, base) => table.base_type(*ty) == *base,
            Read::ImplementedInterfaces(ty, interfaces) => table.implemented_interfaces(*ty) == *interfaces,
            Read::TypeKind(ty, kind) => table.type_kind(*ty) == *kind,
            Read::OpenDescriptor(ty, descriptor) => table.to_open_descriptor(*ty) == *descriptor,
        }
    }
}

/// Answers observed by one evaluation, in the order they were asked
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadLog {
    reads: Vec<Read>,
}

impl ReadLog {
    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    /// Whether `table` still gives every recorded answer
    pub fn holds(&self, table: &dyn SymbolTable) -> bool {
        self.reads.iter().all(|read| read.holds(table))
    }
}

/// Symbol table wrapper that logs every answer it forwards.
///
/// The fingerprint is passed through unrecorded; it identifies the snapshot, not a fact
/// a node depends on.
pub struct RecordingTable<'a> {
    inner: &'a dyn SymbolTable,
    reads: Mutex<Vec<Read>>,
}

impl<'a> RecordingTable<'a> {
    pub fn new(inner: &'a dyn SymbolTable) -> Self {
        Self {
            inner,
            reads: Mutex::new(Vec::new()),
        }
    }

    pub fn into_log(self) -> ReadLog {
        ReadLog { reads: self.reads.into_inner() }
    }

    fn record<T: Clone>(&self, answer: T, read: impl FnOnce(T) -> Read) -> T {
        self.reads.lock().push(read(answer.clone()));
        answer
    }
}

impl SymbolTable for RecordingTable<'_> {
    fn root_module(&self) -> ModuleId {
        self.record(self.inner.root_module(), Read::RootModule)
    }

    fn module_name(&self, module: ModuleId) -> Option<String> {
        self.record(self.inner.module_name(module), |name| Read::ModuleName(module, name))
    }

    fn resolve_type(&self, metadata_name: &str) -> Option<TypeId> {
        self.record(self.inner.resolve_type(metadata_name), |ty| Read::ResolveType(metadata_name.to_string(), ty))
    }

    fn declared_types(&self, module: ModuleId) -> Vec<TypeId> {
        self.record(self.inner.declared_types(module), |types| Read::DeclaredTypes(module, types))
    }

    fn attributes_on(&self, symbol: Symbol, attribute_type: TypeId) -> Vec<AttributeInstance> {
        self.record(self.inner.attributes_on(symbol, attribute_type), |attributes| Read::AttributesOn(symbol, attribute_type, attributes))
    }

    fn declaring_module(&self, ty: TypeId) -> Option<ModuleId> {
        self.record(self.inner.declaring_module(ty), |module| Read::DeclaringModule(ty, module))
    }

    fn original_definition(&self, ty: TypeId) -> TypeId {
        self.record(self.inner.original_definition(ty), |definition| Read::OriginalDefinition(ty, definition))
    }

    fn base_type(&self, ty: TypeId) -> Option<TypeId> {
        self.record(self.inner.base_type(ty), |base| Read::BaseType(ty, base))
    }

    fn implemented_interfaces(&self, ty: TypeId) -> Vec<TypeId> {
        self.record(self.inner.implemented_interfaces(ty), |interfaces| Read::ImplementedInterfaces(ty, interfaces))
    }

    fn type_kind(&self, ty: TypeId) -> TypeKind {
        self.record(self.inner.type_kind(ty), |kind| Read::TypeKind(ty, kind))
    }

    fn to_open_descriptor(&self, ty: TypeId) -> TypeDescriptor {
        self.record(self.inner.to_open_descriptor(ty), |descriptor| Read::OpenDescriptor(ty, descriptor))
    }

    fn fingerprint(&self) -> Fingerprint {
        self.inner.fingerprint()
    }
}

#[derive(Debug)]
struct Tracked<K, O> {
    fingerprint: Fingerprint,
    key: K,
    reads: ReadLog,
    value: Arc<O>,
}

/// A cached DAG node that queries the snapshot directly.
///
/// `K` carries the node's inputs other than the snapshot. The node is served from
/// cache when `K` is equal and either the snapshot fingerprint matches or every
/// recorded read still holds against the new snapshot. Only the fingerprint and the
/// recorded answers are kept, never the snapshot itself.
#[derive(Debug)]
pub struct TrackedMemo<K, O> {
    node: &'static str,
    last: Option<Tracked<K, O>>,
    stats: NodeStats,
}

impl<K, O> TrackedMemo<K, O>
where
    K: PartialEq,
    O: PartialEq,
{
    pub fn new(node: &'static str) -> Self {
        Self {
            node,
            last: None,
            stats: NodeStats::default(),
        }
    }

    pub fn node(&self) -> &'static str {
        self.node
    }

    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }

    /// Last successfully computed value
    pub fn current(&self) -> Option<&Arc<O>> {
        self.last.as_ref().map(|last| &last.value)
    }

    /// Reads recorded by the last successful computation
    pub fn reads(&self) -> Option<&ReadLog> {
        self.last.as_ref().map(|last| &last.reads)
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    /// Evaluate the node against `table`, identified by `fingerprint`.
    ///
    /// `compute` receives a recording view of `table`; every query it makes becomes a
    /// dependency of the result.
    pub fn evaluate<F>(&mut self, table: &dyn SymbolTable, fingerprint: Fingerprint, key: K, caching: bool, compute: F) -> GeneratorResult<Evaluation<O>>
    where
        F: FnOnce(&dyn SymbolTable) -> GeneratorResult<O>,
    {
        if caching {
            if let Some(last) = &mut self.last {
                if last.key == key && (last.fingerprint == fingerprint || last.reads.holds(table)) {
                    if last.fingerprint != fingerprint {
                        debug!(node = self.node, reads = last.reads.len(), "reads still hold on new snapshot");
                        last.fingerprint = fingerprint;
                    }
                    self.stats.cache_hits += 1;
                    debug!(node = self.node, state = %NodeState::Cached, "evaluated node");
                    return Ok(Evaluation {
                        node: self.node,
                        value: Arc::clone(&last.value),
                        state: NodeState::Cached,
                        duration: Duration::ZERO,
                    });
                }
            }
        }

        let start = Instant::now();
        let recording = RecordingTable::new(table);
        let view: &dyn SymbolTable = &recording;
        let output = compute(view)?;
        let reads = recording.into_log();
        let duration = start.elapsed();
        self.stats.evaluations += 1;
        self.stats.last_duration = duration;

        let (value, state) = match self.last.take() {
            Some(previous) if *previous.value == output => (previous.value, NodeState::Unchanged),
            Some(_) => (Arc::new(output), NodeState::Modified),
            None => (Arc::new(output), NodeState::New),
        };
        if caching {
            self.last = Some(Tracked {
                fingerprint,
                key,
                reads,
                value: Arc::clone(&value),
            });
        }

        debug!(node = self.node, state = %state, elapsed_us = duration.as_micros() as u64, "evaluated node");
        Ok(Evaluation {
            node: self.node,
            value,
            state,
            duration,
        })
    }
}
