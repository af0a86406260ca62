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

//! Type alias discovery

use super::{AnalysisStage, Channel, StageContext};
use crate::arguments::ArgumentReader;
use crate::error::GeneratorResult;
use crate::markers::names;
use metagen_common::TypeDescriptor;
use serde::Serialize;

/// A type and the alias it is known by
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AliasEntry {
    pub type_descriptor: TypeDescriptor,
    pub alias: String,
}

impl AliasEntry {
    pub fn new(type_descriptor: TypeDescriptor, alias: impl Into<String>) -> Self {
        Self {
            type_descriptor,
            alias: alias.into(),
        }
    }
}

/// Collects `[Alias("...")]` applied directly to declared types
#[derive(Debug, Default)]
pub struct TypeAliasStage;

impl AnalysisStage for TypeAliasStage {
    type Output = Vec<AliasEntry>;

    fn channel(&self) -> Channel {
        Channel::TypeAliases
    }

    fn analyze(&self, cx: &StageContext<'_>) -> GeneratorResult<Vec<AliasEntry>> {
        let marker = cx.markers.require(names::ALIAS)?;
        let mut entries = Vec::new();

        cx.for_each_declared_type(|ty| {
            for attribute in cx.attributes(ty, marker) {
                let args = ArgumentReader::new(&attribute, names::ALIAS, cx.type_label(ty));
                let alias = args.string(0)?;
                if alias.is_empty() {
                    return Err(args.invalid("alias must not be empty"));
                }
                entries.push(AliasEntry::new(cx.table.to_open_descriptor(ty), alias));
            }
            Ok(())
        })?;

        Ok(entries)
    }
}
