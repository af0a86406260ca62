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

//! Compound type alias discovery

use super::{AnalysisStage, Channel, StageContext};
use crate::arguments::ArgumentReader;
use crate::error::GeneratorResult;
use crate::markers::names;
use metagen_common::{TypeDescriptor, TypedConstant};
use serde::Serialize;

/// One segment of a compound alias
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CompoundAliasComponent {
    Text(String),
    Type(TypeDescriptor),
}

/// A type reachable through a multi-part alias such as `("inv", typeof(Grain), "Method")`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CompoundAliasEntry {
    pub components: Vec<CompoundAliasComponent>,
    pub target: TypeDescriptor,
}

#[derive(Debug, Default)]
pub struct CompoundTypeAliasStage;

impl AnalysisStage for CompoundTypeAliasStage {
    type Output = Vec<CompoundAliasEntry>;

    fn channel(&self) -> Channel {
        Channel::CompoundTypeAliases
    }

    fn analyze(&self, cx: &StageContext<'_>) -> GeneratorResult<Vec<CompoundAliasEntry>> {
        let marker = cx.markers.require(names::COMPOUND_TYPE_ALIAS)?;
        let mut entries = Vec::new();

        cx.for_each_declared_type(|ty| {
            for attribute in cx.attributes(ty, marker) {
                let args = ArgumentReader::new(&attribute, names::COMPOUND_TYPE_ALIAS, cx.type_label(ty));
                let values = args.variadic();
                if values.is_empty() {
                    args.required(0)?;
                    return Err(args.invalid("a compound alias needs at least one component"));
                }

                let mut components = Vec::with_capacity(values.len());
                for value in values {
                    let component = match value {
                        TypedConstant::String(text) => CompoundAliasComponent::Text(text.clone()),
                        TypedConstant::Type(component) => CompoundAliasComponent::Type(cx.table.to_open_descriptor(*component)),
                        other => return Err(args.unexpected(other, "string or type reference")),
                    };
                    components.push(component);
                }

                entries.push(CompoundAliasEntry {
                    components,
                    target: cx.table.to_open_descriptor(ty),
                });
            }
            Ok(())
        })?;

        Ok(entries)
    }
}
