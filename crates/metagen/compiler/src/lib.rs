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

//! Metagen generator core
//!
//! Derives a build-time metadata model from a host symbol table:
//! - Declaring-module discovery across module boundaries (`resolver`)
//! - Independent analysis stages, one per channel (`stages`)
//! - Memoized evaluation keyed by value equality (`incremental`)
//! - The stage combinator and unified model (`model`)
//! - The pipeline boundary turning failures into diagnostics (`pipeline`)

mod arguments;

pub mod cancellation;
pub mod config;
pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod incremental;
pub mod markers;
pub mod model;
pub mod options;
pub mod pipeline;
pub mod resolver;
pub mod stages;

pub use cancellation::CancellationToken;
pub use config::PipelineConfig;
pub use diagnostics::{Diagnostic, Severity};
pub use emit::{CollectedOutput, Emitter, GeneratedSource, SourceOutput, hint_name};
pub use error::{ErrorKind, GeneratorError, GeneratorResult};
pub use incremental::{NodeState, RunReport};
pub use markers::MarkerResolver;
pub use model::{ChannelOutputs, MetadataModel};
pub use options::{BuildProperties, FieldIdMode, GeneratorOptions};
pub use pipeline::{GeneratorPipeline, RunOutcome};
pub use resolver::{DeclaringModuleResolver, ModuleSet};
pub use stages::{AliasEntry, AnalysisStage, Channel, CompoundAliasComponent, CompoundAliasEntry, InvokableImplementation, SerializerClassification, StageContext, WellKnownIdEntry};
