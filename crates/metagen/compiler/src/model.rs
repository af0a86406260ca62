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

//! The unified metadata model and the stage combinator

use crate::stages::{AliasEntry, Channel, CompoundAliasEntry, SerializerClassification, WellKnownIdEntry};
use serde::Serialize;
use std::sync::Arc;

/// The joined outputs of every analysis channel.
///
/// Each channel is held by `Arc` so an unchanged channel keeps its identity across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelOutputs {
    pub type_aliases: Arc<Vec<AliasEntry>>,
    pub compound_type_aliases: Arc<Vec<CompoundAliasEntry>>,
    pub well_known_type_ids: Arc<Vec<WellKnownIdEntry>>,
    pub serializers: Arc<SerializerClassification>,
    pub application_parts: Arc<Vec<String>>,
}

/// Immutable aggregate handed to the emission stage.
///
/// Every channel is always present; an analysis that found nothing contributes an
/// empty collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataModel {
    type_aliases: Arc<Vec<AliasEntry>>,
    compound_type_aliases: Arc<Vec<CompoundAliasEntry>>,
    well_known_type_ids: Arc<Vec<WellKnownIdEntry>>,
    serializers: Arc<SerializerClassification>,
    application_parts: Arc<Vec<String>>,
}

impl MetadataModel {
    /// Route each channel output into its slot
    pub fn assemble(outputs: &ChannelOutputs) -> Self {
        Self {
            type_aliases: Arc::clone(&outputs.type_aliases),
            compound_type_aliases: Arc::clone(&outputs.compound_type_aliases),
            well_known_type_ids: Arc::clone(&outputs.well_known_type_ids),
            serializers: Arc::clone(&outputs.serializers),
            application_parts: Arc::clone(&outputs.application_parts),
        }
    }

    pub fn type_aliases(&self) -> &[AliasEntry] {
        &self.type_aliases
    }

    pub fn compound_type_aliases(&self) -> &[CompoundAliasEntry] {
        &self.compound_type_aliases
    }

    pub fn well_known_type_ids(&self) -> &[WellKnownIdEntry] {
        &self.well_known_type_ids
    }

    pub fn serializers(&self) -> &SerializerClassification {
        &self.serializers
    }

    pub fn application_parts(&self) -> &[String] {
        &self.application_parts
    }

    /// Whether `channel` holds the very same allocation in both models
    pub fn shares_channel(&self, other: &MetadataModel, channel: Channel) -> bool {
        match channel {
            Channel::TypeAliases => Arc::ptr_eq(&self.type_aliases, &other.type_aliases),
            Channel::CompoundTypeAliases => Arc::ptr_eq(&self.compound_type_aliases, &other.compound_type_aliases),
            Channel::WellKnownTypeIds => Arc::ptr_eq(&self.well_known_type_ids, &other.well_known_type_ids),
            Channel::Serializers => Arc::ptr_eq(&self.serializers, &other.serializers),
            Channel::ApplicationParts => Arc::ptr_eq(&self.application_parts, &other.application_parts),
        }
    }
}
