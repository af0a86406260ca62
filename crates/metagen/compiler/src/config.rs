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

//! Configuration for the generator pipeline

/// Configuration for [`GeneratorPipeline`](crate::pipeline::GeneratorPipeline)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Reuse memoized stage outputs when inputs are unchanged
    pub enable_caching: bool,
    /// Evaluate the analysis channels concurrently
    pub enable_parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            enable_caching: true,
            enable_parallel: false,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable caching
    pub fn with_caching(mut self, enable: bool) -> Self {
        self.enable_caching = enable;
        self
    }

    /// Enable or disable parallel stage evaluation
    pub fn with_parallel(mut self, enable: bool) -> Self {
        self.enable_parallel = enable;
        self
    }
}
