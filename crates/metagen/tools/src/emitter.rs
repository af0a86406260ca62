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

//! JSON emission of the metadata model

use metagen_compiler::{Emitter, GeneratorError, GeneratorOptions, GeneratorResult, MetadataModel};
use serde_json::json;

/// Writes the model and the options it was generated with as pretty-printed JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonEmitter;

impl Emitter for JsonEmitter {
    fn emit(&self, model: &MetadataModel, options: &GeneratorOptions) -> GeneratorResult<String> {
        let document = json!({
            "options": options,
            "model": model,
        });
        serde_json::to_string_pretty(&document).map_err(|e| GeneratorError::internal(format!("failed to serialize model: {e}")))
    }
}
