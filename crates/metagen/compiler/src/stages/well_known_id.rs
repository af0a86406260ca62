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

//! Well-known type id discovery

use super::{AnalysisStage, Channel, StageContext};
use crate::arguments::ArgumentReader;
use crate::error::GeneratorResult;
use crate::markers::names;
use metagen_common::TypeDescriptor;
use serde::Serialize;

/// A type bound to a stable numeric id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WellKnownIdEntry {
    pub type_descriptor: TypeDescriptor,
    pub id: u32,
}

#[derive(Debug, Default)]
pub struct WellKnownTypeIdStage;

impl AnalysisStage for WellKnownTypeIdStage {
    type Output = Vec<WellKnownIdEntry>;

    fn channel(&self) -> Channel {
        Channel::WellKnownTypeIds
    }

    fn analyze(&self, cx: &StageContext<'_>) -> GeneratorResult<Vec<WellKnownIdEntry>> {
        let marker = cx.markers.require(names::ID)?;
        let mut entries = Vec::new();

        cx.for_each_declared_type(|ty| {
            for attribute in cx.attributes(ty, marker) {
                let args = ArgumentReader::new(&attribute, names::ID, cx.type_label(ty));
                let raw = args.integer(0)?;
                let id = u32::try_from(raw).map_err(|_| args.invalid(format!("id {raw} is outside the range 0..={}", u32::MAX)))?;
                entries.push(WellKnownIdEntry {
                    type_descriptor: cx.table.to_open_descriptor(ty),
                    id,
                });
            }
            Ok(())
        })?;

        Ok(entries)
    }
}
