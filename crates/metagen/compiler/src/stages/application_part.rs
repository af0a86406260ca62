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

//! Application part discovery

use super::{AnalysisStage, Channel, StageContext};
use crate::arguments::ArgumentReader;
use crate::error::GeneratorResult;
use crate::markers::names;
use crate::resolver::module_label;
use metagen_common::Symbol;

/// Lists the root module's name followed by every `[ApplicationPart("...")]` found on
/// the examined modules. First occurrence wins.
#[derive(Debug, Default)]
pub struct ApplicationPartStage;

impl AnalysisStage for ApplicationPartStage {
    type Output = Vec<String>;

    fn channel(&self) -> Channel {
        Channel::ApplicationParts
    }

    fn analyze(&self, cx: &StageContext<'_>) -> GeneratorResult<Vec<String>> {
        let marker = cx.markers.require(names::APPLICATION_PART)?;
        let mut parts: Vec<String> = Vec::new();
        let mut push = |part: &str| {
            if !parts.iter().any(|existing| existing == part) {
                parts.push(part.to_string());
            }
        };

        if let Some(name) = cx.table.module_name(cx.modules.root()) {
            push(&name);
        }
        for module in cx.modules.iter() {
            cx.cancel.check()?;
            for attribute in cx.table.attributes_on(Symbol::Module(module), marker) {
                let args = ArgumentReader::new(&attribute, names::APPLICATION_PART, module_label(cx.table, module));
                push(args.string(0)?);
            }
        }

        Ok(parts)
    }
}
