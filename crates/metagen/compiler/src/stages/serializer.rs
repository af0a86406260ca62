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

//! Serializer, copier and activator classification
//!
//! Categories are independent and may overlap: an immutable type tagged for
//! serialization shows up both as serializable and as a default copier.

use super::{AnalysisStage, Channel, StageContext, has_attribute};
use crate::error::GeneratorResult;
use crate::markers::names;
use metagen_common::{TypeDescriptor, TypeId};
use serde::Serialize;
use tracing::trace;

/// A concrete type implementing an invokable interface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InvokableImplementation {
    pub interface: TypeDescriptor,
    pub implementation: TypeDescriptor,
}

/// Declared types grouped by the marker attributes they carry
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SerializerClassification {
    pub serializable_types: Vec<TypeDescriptor>,
    pub activatable_types: Vec<TypeDescriptor>,
    pub default_copiers: Vec<TypeDescriptor>,
    pub detected_serializers: Vec<TypeDescriptor>,
    pub detected_copiers: Vec<TypeDescriptor>,
    pub detected_activators: Vec<TypeDescriptor>,
    pub detected_converters: Vec<TypeDescriptor>,
    pub invokable_interfaces: Vec<TypeDescriptor>,
    pub invokable_interface_implementations: Vec<InvokableImplementation>,
}

impl SerializerClassification {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Default)]
pub struct SerializerStage;

/// Marker handles for one classification pass; optional markers may be absent
struct Markers {
    generate_serializer: TypeId,
    use_activator: Option<TypeId>,
    immutable: Option<TypeId>,
    register_serializer: Option<TypeId>,
    register_copier: Option<TypeId>,
    register_activator: Option<TypeId>,
    register_converter: Option<TypeId>,
    generate_method_serializers: Option<TypeId>,
}

impl AnalysisStage for SerializerStage {
    type Output = SerializerClassification;

    fn channel(&self) -> Channel {
        Channel::Serializers
    }

    fn analyze(&self, cx: &StageContext<'_>) -> GeneratorResult<SerializerClassification> {
        let markers = Markers {
            generate_serializer: cx.markers.require(names::GENERATE_SERIALIZER)?,
            use_activator: cx.markers.optional(names::USE_ACTIVATOR),
            immutable: cx.markers.optional(names::IMMUTABLE),
            register_serializer: cx.markers.optional(names::REGISTER_SERIALIZER),
            register_copier: cx.markers.optional(names::REGISTER_COPIER),
            register_activator: cx.markers.optional(names::REGISTER_ACTIVATOR),
            register_converter: cx.markers.optional(names::REGISTER_CONVERTER),
            generate_method_serializers: cx.markers.optional(names::GENERATE_METHOD_SERIALIZERS),
        };
        let mut result = SerializerClassification::default();

        cx.for_each_declared_type(|ty| {
            classify(cx, &markers, ty, &mut result);
            Ok(())
        })?;

        Ok(result)
    }
}

fn classify(cx: &StageContext<'_>, markers: &Markers, ty: TypeId, result: &mut SerializerClassification) {
    let table = cx.table;
    let own = |marker: Option<TypeId>| marker.is_some_and(|m| has_attribute(table, ty, m, false));
    let inherited = |marker: Option<TypeId>| marker.is_some_and(|m| has_attribute(table, ty, m, true));
    let descriptor = || table.to_open_descriptor(ty);

    if own(Some(markers.generate_serializer)) {
        result.serializable_types.push(descriptor());
    }
    if inherited(markers.use_activator) {
        result.activatable_types.push(descriptor());
    }
    if own(markers.immutable) {
        result.default_copiers.push(descriptor());
    }
    if own(markers.register_serializer) {
        result.detected_serializers.push(descriptor());
    }
    if own(markers.register_copier) {
        result.detected_copiers.push(descriptor());
    }
    if own(markers.register_activator) {
        result.detected_activators.push(descriptor());
    }
    if own(markers.register_converter) {
        result.detected_converters.push(descriptor());
    }

    let Some(method_marker) = markers.generate_method_serializers else {
        return;
    };
    if table.type_kind(ty).is_interface() {
        if has_attribute(table, ty, method_marker, true) {
            result.invokable_interfaces.push(descriptor());
        }
        return;
    }
    for interface in table.implemented_interfaces(ty) {
        if has_attribute(table, interface, method_marker, true) {
            trace!(implementation = %ty, interface = %interface, "found invokable implementation");
            result.invokable_interface_implementations.push(InvokableImplementation {
                interface: table.to_open_descriptor(interface),
                implementation: descriptor(),
            });
        }
    }
}
