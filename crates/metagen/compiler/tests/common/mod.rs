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

#![allow(dead_code)]

use metagen_common::{
    AttributeInstance, Fingerprint, MemorySymbolTable, ModuleId, Snapshot, Symbol, SymbolTable, SymbolTableBuilder, TypeDescriptor, TypeId, TypeKind, TypedConstant,
};
use metagen_compiler::{CancellationToken, Emitter, GeneratorOptions, GeneratorResult, MetadataModel};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Handles of every marker type registered by [`Fixture::new`]
#[derive(Debug, Clone, Copy)]
pub struct Markers {
    pub declaring_module: TypeId,
    pub alias: TypeId,
    pub compound_alias: TypeId,
    pub id: TypeId,
    pub generate_serializer: TypeId,
    pub application_part: TypeId,
    pub use_activator: TypeId,
    pub immutable: TypeId,
    pub register_serializer: TypeId,
    pub register_copier: TypeId,
    pub register_activator: TypeId,
    pub register_converter: TypeId,
    pub generate_method_serializers: TypeId,
}

/// A symbol table under construction with the marker vocabulary already declared
/// in a separate `Metagen.Abstractions` module.
pub struct Fixture {
    pub builder: SymbolTableBuilder,
    pub markers: Markers,
}

impl Fixture {
    pub fn new(root_name: &str) -> Self {
        let mut builder = SymbolTableBuilder::new(root_name);
        let abstractions = builder.add_module("Metagen.Abstractions");
        let mut marker = |name: &str| builder.add_class(abstractions, "Metagen", name);
        let markers = Markers {
            declaring_module: marker("GenerateCodeForDeclaringModuleAttribute"),
            alias: marker("AliasAttribute"),
            compound_alias: marker("CompoundTypeAliasAttribute"),
            id: marker("IdAttribute"),
            generate_serializer: marker("GenerateSerializerAttribute"),
            application_part: marker("ApplicationPartAttribute"),
            use_activator: marker("UseActivatorAttribute"),
            immutable: marker("ImmutableAttribute"),
            register_serializer: marker("RegisterSerializerAttribute"),
            register_copier: marker("RegisterCopierAttribute"),
            register_activator: marker("RegisterActivatorAttribute"),
            register_converter: marker("RegisterConverterAttribute"),
            generate_method_serializers: marker("GenerateMethodSerializersAttribute"),
        };
        Self { builder, markers }
    }

    pub fn root(&self) -> ModuleId {
        self.builder.root()
    }

    pub fn class(&mut self, module: ModuleId, namespace: &str, name: &str) -> TypeId {
        self.builder.add_class(module, namespace, name)
    }

    pub fn generic_class(&mut self, module: ModuleId, namespace: &str, name: &str, parameters: &[&str]) -> TypeId {
        let descriptor = TypeDescriptor::new(namespace, name).with_type_parameters(parameters.iter().copied());
        self.builder.add_type(module, descriptor, TypeKind::Class)
    }

    pub fn alias(&mut self, ty: TypeId, alias: &str) {
        let marker = self.markers.alias;
        self.builder.add_type_attribute(ty, marker, vec![TypedConstant::string(alias)]);
    }

    pub fn tag(&mut self, ty: TypeId, marker: TypeId) {
        self.builder.add_type_attribute(ty, marker, vec![]);
    }

    /// `[GenerateCodeForDeclaringModule(typeof(target))]` on `module`
    pub fn declare_through(&mut self, module: ModuleId, target: TypeId) {
        let marker = self.markers.declaring_module;
        self.builder.add_module_attribute(module, marker, vec![TypedConstant::Type(target)]);
    }

    pub fn build(self) -> MemorySymbolTable {
        self.builder.build()
    }

    pub fn snapshot(self) -> Snapshot {
        Snapshot::from_table(self.build())
    }
}

/// Table that requests cancellation when the attributes of `trigger` are read
pub struct CancelOnRead {
    pub inner: MemorySymbolTable,
    pub trigger: Symbol,
    pub token: CancellationToken,
}

impl SymbolTable for CancelOnRead {
    fn root_module(&self) -> ModuleId {
        self.inner.root_module()
    }

    fn module_name(&self, module: ModuleId) -> Option<String> {
        self.inner.module_name(module)
    }

    fn resolve_type(&self, metadata_name: &str) -> Option<TypeId> {
        self.inner.resolve_type(metadata_name)
    }

    fn declared_types(&self, module: ModuleId) -> Vec<TypeId> {
        self.inner.declared_types(module)
    }

    fn attributes_on(&self, symbol: Symbol, attribute_type: TypeId) -> Vec<AttributeInstance> {
        if symbol == self.trigger {
            self.token.cancel();
        }
        self.inner.attributes_on(symbol, attribute_type)
    }

    fn declaring_module(&self, ty: TypeId) -> Option<ModuleId> {
        self.inner.declaring_module(ty)
    }

    fn original_definition(&self, ty: TypeId) -> TypeId {
        self.inner.original_definition(ty)
    }

    fn base_type(&self, ty: TypeId) -> Option<TypeId> {
        self.inner.base_type(ty)
    }

    fn implemented_interfaces(&self, ty: TypeId) -> Vec<TypeId> {
        self.inner.implemented_interfaces(ty)
    }

    fn type_kind(&self, ty: TypeId) -> TypeKind {
        self.inner.type_kind(ty)
    }

    fn to_open_descriptor(&self, ty: TypeId) -> TypeDescriptor {
        self.inner.to_open_descriptor(ty)
    }

    fn fingerprint(&self) -> Fingerprint {
        self.inner.fingerprint()
    }
}

/// Emits the model and options as JSON and counts invocations
#[derive(Debug, Default)]
pub struct JsonModelEmitter {
    calls: AtomicUsize,
}

impl JsonModelEmitter {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Emitter for JsonModelEmitter {
    fn emit(&self, model: &MetadataModel, options: &GeneratorOptions) -> GeneratorResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let document = serde_json::json!({ "model": model, "options": options });
        serde_json::to_string_pretty(&document).map_err(|e| metagen_compiler::GeneratorError::internal(e.to_string()))
    }
}
