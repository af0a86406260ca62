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

//! The incremental generator pipeline
//!
//! ```text
//! Snapshot ─► modules ─┬─► type_aliases ──────────┐
//!                      ├─► compound_type_aliases ─┤
//!                      ├─► well_known_type_ids ───┼─► model ─┐
//!                      ├─► serializers ───────────┤          │
//!                      └─► application_parts ─────┘          ├─► artifact
//! BuildProperties ─► options ────────────────────────────────┤
//! Snapshot ─► hint_name ─────────────────────────────────────┘
//! ```
//!
//! Nodes reading the snapshot (`modules`, the five channels and `hint_name`) remember
//! the snapshot fingerprint and the answers they were given, never the snapshot itself.
//! A channel whose answers survive an edit is not recomputed.
//!
//! [`GeneratorPipeline::run`] is the error boundary: every failure, including panics,
//! ends up as exactly one diagnostic and no artifact.

use crate::cancellation::CancellationToken;
use crate::config::PipelineConfig;
use crate::diagnostics::Diagnostic;
use crate::emit::{Emitter, GeneratedSource, SourceOutput, hint_name};
use crate::error::{GeneratorError, GeneratorResult};
use crate::incremental::{Evaluation, Memo, RunReport, TrackedMemo};
use crate::markers::MarkerResolver;
use crate::model::{ChannelOutputs, MetadataModel};
use crate::options::{BuildProperties, GeneratorOptions};
use crate::resolver::{DeclaringModuleResolver, ModuleSet};
use crate::stages::{
    AliasEntry, AnalysisStage, ApplicationPartStage, CompoundAliasEntry, CompoundTypeAliasStage, SerializerClassification, SerializerStage, StageContext,
    TypeAliasStage, WellKnownIdEntry, WellKnownTypeIdStage,
};
use metagen_common::{Fingerprint, Snapshot, SymbolTable};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, debug_span, info, info_span, warn};

/// What every analysis stage reads during one run
#[derive(Clone, Copy)]
struct StageInputs<'a> {
    table: &'a dyn SymbolTable,
    fingerprint: Fingerprint,
    modules: &'a Arc<ModuleSet>,
    cancel: &'a CancellationToken,
}

/// Upstream of the emission node
type ArtifactInput = (Arc<MetadataModel>, GeneratorOptions, Arc<String>);

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// One artifact was added to the output
    Generated,
    /// Options were withheld by the host; nothing was emitted or reported
    Declined,
    /// One diagnostic was reported and nothing was emitted
    Failed,
    /// The run was cancelled; nothing was emitted or reported
    Cancelled,
}

impl RunOutcome {
    pub fn is_failure(self) -> bool {
        matches!(self, RunOutcome::Failed)
    }
}

/// Memoized generator DAG for one compilation, reused across snapshots
pub struct GeneratorPipeline {
    config: PipelineConfig,
    emitter: Arc<dyn Emitter>,
    modules: TrackedMemo<(), ModuleSet>,
    type_aliases: TrackedMemo<Arc<ModuleSet>, Vec<AliasEntry>>,
    compound_type_aliases: TrackedMemo<Arc<ModuleSet>, Vec<CompoundAliasEntry>>,
    well_known_type_ids: TrackedMemo<Arc<ModuleSet>, Vec<WellKnownIdEntry>>,
    serializers: TrackedMemo<Arc<ModuleSet>, SerializerClassification>,
    application_parts: TrackedMemo<Arc<ModuleSet>, Vec<String>>,
    model: Memo<ChannelOutputs, MetadataModel>,
    options: Memo<BuildProperties, Option<GeneratorOptions>>,
    hint_name: TrackedMemo<(), String>,
    artifact: Memo<ArtifactInput, GeneratedSource>,
    report: RunReport,
}

impl GeneratorPipeline {
    pub fn new(config: PipelineConfig, emitter: Arc<dyn Emitter>) -> Self {
        Self {
            config,
            emitter,
            modules: TrackedMemo::new("modules"),
            type_aliases: TrackedMemo::new(TypeAliasStage.channel().name()),
            compound_type_aliases: TrackedMemo::new(CompoundTypeAliasStage.channel().name()),
            well_known_type_ids: TrackedMemo::new(WellKnownTypeIdStage.channel().name()),
            serializers: TrackedMemo::new(SerializerStage.channel().name()),
            application_parts: TrackedMemo::new(ApplicationPartStage.channel().name()),
            model: Memo::new("model"),
            options: Memo::new("options"),
            hint_name: TrackedMemo::new("hint_name"),
            artifact: Memo::new("artifact"),
            report: RunReport::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Node outcomes of the latest run
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Model of the latest successful run
    pub fn model(&self) -> Option<Arc<MetadataModel>> {
        self.model.current().cloned()
    }

    /// Module set of the latest successful resolution
    pub fn modules(&self) -> Option<Arc<ModuleSet>> {
        self.modules.current().cloned()
    }

    /// Drop every memoized value
    pub fn clear_cache(&mut self) {
        self.modules.clear();
        self.type_aliases.clear();
        self.compound_type_aliases.clear();
        self.well_known_type_ids.clear();
        self.serializers.clear();
        self.application_parts.clear();
        self.model.clear();
        self.options.clear();
        self.hint_name.clear();
        self.artifact.clear();
    }

    /// Run the generator over `snapshot`, writing the artifact or a diagnostic to `output`
    pub fn run(&mut self, snapshot: &Snapshot, properties: &BuildProperties, output: &mut dyn SourceOutput, cancel: &CancellationToken) -> RunOutcome {
        let span = info_span!("metagen_run", snapshot = %snapshot.fingerprint());
        let _guard = span.enter();
        self.report = RunReport::new();

        let result = catch_unwind(AssertUnwindSafe(|| self.execute(snapshot, properties, output, cancel)));
        match result {
            Ok(Ok(Some(artifact))) => {
                info!(hint = %artifact.hint_name, recomputed = ?self.report.recomputed(), "generated source");
                output.add_source(&artifact.hint_name, &artifact.text);
                RunOutcome::Generated
            }
            Ok(Ok(None)) => {
                info!("options withheld, emission declined");
                RunOutcome::Declined
            }
            Ok(Err(GeneratorError::Cancelled)) => {
                info!("run cancelled");
                RunOutcome::Cancelled
            }
            Ok(Err(error)) => {
                warn!(kind = ?error.kind(), %error, "generation failed");
                output.report_diagnostic(Diagnostic::from_error(&error));
                RunOutcome::Failed
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(%message, "generator panicked");
                output.report_diagnostic(Diagnostic::unhandled(&message));
                RunOutcome::Failed
            }
        }
    }

    fn execute(
        &mut self,
        snapshot: &Snapshot,
        properties: &BuildProperties,
        output: &mut dyn SourceOutput,
        cancel: &CancellationToken,
    ) -> GeneratorResult<Option<Arc<GeneratedSource>>> {
        cancel.check()?;
        let caching = self.config.enable_caching;
        let table = snapshot.table();
        let fingerprint = snapshot.fingerprint();

        let modules = self.modules.evaluate(table, fingerprint, (), caching, |table| {
            let markers = MarkerResolver::new(table);
            DeclaringModuleResolver::new(table, &markers, cancel).resolve()
        })?;
        self.report.record(&modules);
        let modules = modules.value;

        let inputs = StageInputs {
            table,
            fingerprint,
            modules: &modules,
            cancel,
        };
        let outputs = self.evaluate_channels(&inputs)?;

        let model = self.model.evaluate(outputs, caching, |outputs| Ok(MetadataModel::assemble(outputs)))?;
        self.report.record(&model);

        let options = self.options.evaluate(properties.clone(), caching, |properties| Ok(GeneratorOptions::from_build_properties(properties)))?;
        self.report.record(&options);
        let Some(options) = (*options.value).clone() else {
            return Ok(None);
        };
        if options.attach_debugger {
            output.launch_debugger();
        }

        let hint = self.hint_name.evaluate(table, fingerprint, (), caching, |table| Ok(hint_name(table.module_name(table.root_module()).as_deref())))?;
        self.report.record(&hint);

        cancel.check()?;
        let emitter = Arc::clone(&self.emitter);
        let artifact = self.artifact.evaluate((model.value, options, hint.value), caching, |(model, options, hint)| {
            let text = emitter.emit(model, options)?;
            Ok(GeneratedSource {
                hint_name: hint.to_string(),
                text,
            })
        })?;
        self.report.record(&artifact);

        Ok(Some(artifact.value))
    }

    /// Evaluate the analysis stages and join their outputs.
    ///
    /// Failures surface in channel order whether or not the stages ran in parallel.
    fn evaluate_channels(&mut self, inputs: &StageInputs<'_>) -> GeneratorResult<ChannelOutputs> {
        let caching = self.config.enable_caching;
        let parallel = self.config.enable_parallel;
        let Self {
            type_aliases,
            compound_type_aliases,
            well_known_type_ids,
            serializers,
            application_parts,
            report,
            ..
        } = self;

        let (aliases, compound, ids, classification, parts) = if parallel {
            debug!("evaluating channels in parallel");
            let ((aliases, compound), (ids, (classification, parts))) = rayon::join(
                || {
                    rayon::join(
                        || run_stage(&TypeAliasStage, type_aliases, inputs, caching),
                        || run_stage(&CompoundTypeAliasStage, compound_type_aliases, inputs, caching),
                    )
                },
                || {
                    rayon::join(
                        || run_stage(&WellKnownTypeIdStage, well_known_type_ids, inputs, caching),
                        || {
                            rayon::join(
                                || run_stage(&SerializerStage, serializers, inputs, caching),
                                || run_stage(&ApplicationPartStage, application_parts, inputs, caching),
                            )
                        },
                    )
                },
            );
            (aliases?, compound?, ids?, classification?, parts?)
        } else {
            (
                run_stage(&TypeAliasStage, type_aliases, inputs, caching)?,
                run_stage(&CompoundTypeAliasStage, compound_type_aliases, inputs, caching)?,
                run_stage(&WellKnownTypeIdStage, well_known_type_ids, inputs, caching)?,
                run_stage(&SerializerStage, serializers, inputs, caching)?,
                run_stage(&ApplicationPartStage, application_parts, inputs, caching)?,
            )
        };

        report.record(&aliases);
        report.record(&compound);
        report.record(&ids);
        report.record(&classification);
        report.record(&parts);

        Ok(ChannelOutputs {
            type_aliases: aliases.value,
            compound_type_aliases: compound.value,
            well_known_type_ids: ids.value,
            serializers: classification.value,
            application_parts: parts.value,
        })
    }
}

fn run_stage<S: AnalysisStage>(
    stage: &S,
    memo: &mut TrackedMemo<Arc<ModuleSet>, S::Output>,
    inputs: &StageInputs<'_>,
    caching: bool,
) -> GeneratorResult<Evaluation<S::Output>> {
    let _span = debug_span!("stage", channel = %stage.channel()).entered();
    memo.evaluate(inputs.table, inputs.fingerprint, Arc::clone(inputs.modules), caching, |table| {
        let markers = MarkerResolver::new(table);
        stage.analyze(&StageContext::new(table, inputs.modules, &markers, inputs.cancel))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
