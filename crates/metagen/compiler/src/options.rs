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

//! Run options derived from host build properties

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Build properties as handed over by the host
pub type BuildProperties = BTreeMap<String, String>;

pub mod keys {
    pub const DESIGN_TIME_BUILD: &str = "build_property.metagen_designtimebuild";
    pub const ATTACH_DEBUGGER: &str = "build_property.metagen_attachdebugger";
    pub const GENERATE_FIELD_IDS: &str = "build_property.metagen_generatefieldids";
    pub const IMMUTABLE_ATTRIBUTES: &str = "build_property.metagen_immutableattributes";
    pub const ALIAS_ATTRIBUTES: &str = "build_property.metagen_aliasattributes";
    pub const ID_ATTRIBUTES: &str = "build_property.metagen_idattributes";
    pub const GENERATE_SERIALIZER_ATTRIBUTES: &str = "build_property.metagen_generateserializerattributes";
}

/// Which members receive generated field ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldIdMode {
    #[default]
    None,
    PublicProperties,
}

impl FieldIdMode {
    fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("none") {
            Some(FieldIdMode::None)
        } else if value.eq_ignore_ascii_case("publicproperties") {
            Some(FieldIdMode::PublicProperties)
        } else {
            None
        }
    }
}

/// Options consumed by the emission stage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct GeneratorOptions {
    pub attach_debugger: bool,
    pub generate_field_ids: FieldIdMode,
    pub immutable_attributes: Vec<String>,
    pub alias_attributes: Vec<String>,
    pub id_attributes: Vec<String>,
    pub generate_serializer_attributes: Vec<String>,
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive options from build properties.
    ///
    /// Returns `None` for design-time builds, in which case nothing is emitted.
    pub fn from_build_properties(properties: &BuildProperties) -> Option<Self> {
        if flag(properties, keys::DESIGN_TIME_BUILD) {
            debug!("design-time build, options withheld");
            return None;
        }

        let mut options = Self::new();
        options.attach_debugger = flag(properties, keys::ATTACH_DEBUGGER);
        if let Some(raw) = properties.get(keys::GENERATE_FIELD_IDS) {
            match FieldIdMode::parse(raw.trim()) {
                Some(mode) => options.generate_field_ids = mode,
                None => debug!(value = %raw, "ignoring unrecognized field id mode"),
            }
        }
        options.immutable_attributes = list(properties, keys::IMMUTABLE_ATTRIBUTES);
        options.alias_attributes = list(properties, keys::ALIAS_ATTRIBUTES);
        options.id_attributes = list(properties, keys::ID_ATTRIBUTES);
        options.generate_serializer_attributes = list(properties, keys::GENERATE_SERIALIZER_ATTRIBUTES);
        Some(options)
    }

    pub fn with_attach_debugger(mut self, enable: bool) -> Self {
        self.attach_debugger = enable;
        self
    }

    pub fn with_field_ids(mut self, mode: FieldIdMode) -> Self {
        self.generate_field_ids = mode;
        self
    }
}

fn flag(properties: &BuildProperties, key: &str) -> bool {
    properties.get(key).is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
}

fn list(properties: &BuildProperties, key: &str) -> Vec<String> {
    properties
        .get(key)
        .map(|value| value.split(';').map(str::trim).filter(|item| !item.is_empty()).map(str::to_string).collect())
        .unwrap_or_default()
}
