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

//! Interfaces between the pipeline, the emission stage and the host

use crate::diagnostics::Diagnostic;
use crate::error::GeneratorResult;
use crate::model::MetadataModel;
use crate::options::GeneratorOptions;

/// Turns a finished model into generated source text
pub trait Emitter: Send + Sync {
    fn emit(&self, model: &MetadataModel, options: &GeneratorOptions) -> GeneratorResult<String>;
}

/// Host sink for the products of a run
pub trait SourceOutput {
    fn add_source(&mut self, hint_name: &str, text: &str);

    fn report_diagnostic(&mut self, diagnostic: Diagnostic);

    /// Called before emission when the attach-debugger option is set
    fn launch_debugger(&mut self) {}
}

/// One generated artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedSource {
    pub hint_name: String,
    pub text: String,
}

/// In-memory [`SourceOutput`]
#[derive(Debug, Default)]
pub struct CollectedOutput {
    pub sources: Vec<GeneratedSource>,
    pub diagnostics: Vec<Diagnostic>,
    pub debugger_requests: usize,
}

impl CollectedOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SourceOutput for CollectedOutput {
    fn add_source(&mut self, hint_name: &str, text: &str) {
        self.sources.push(GeneratedSource {
            hint_name: hint_name.to_string(),
            text: text.to_string(),
        });
    }

    fn report_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn launch_debugger(&mut self) {
        self.debugger_requests += 1;
    }
}

/// Artifact name for a module: `<module>.metagen`, or `assembly.metagen` when unnamed
pub fn hint_name(module_name: Option<&str>) -> String {
    let stem = module_name.map(str::trim).filter(|name| !name.is_empty()).unwrap_or("assembly");
    format!("{stem}.metagen")
}
