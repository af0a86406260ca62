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

//! Generate command

use crate::emitter::JsonEmitter;
use crate::{load_properties, load_snapshot};
use anyhow::{Context, Result};
use clap::Args;
use metagen_compiler::{BuildProperties, CancellationToken, CollectedOutput, Diagnostic, GeneratorPipeline, PipelineConfig, RunOutcome, RunReport};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Arguments for the generate command
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the JSON symbol table snapshot
    #[arg(long, value_name = "SNAPSHOT_FILE")]
    pub snapshot: PathBuf,

    /// Path to a JSON object of build properties
    #[arg(long, value_name = "PROPERTIES_FILE")]
    pub properties: Option<PathBuf>,

    /// Directory receiving generated artifacts
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Evaluate analysis channels in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Disable memoization
    #[arg(long)]
    pub no_cache: bool,
}

/// What a generate invocation produced
#[derive(Debug)]
pub struct GenerateSummary {
    pub outcome: RunOutcome,
    pub written: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
    pub report: RunReport,
}

/// Execute the generate command
pub fn run_generate(args: &GenerateArgs) -> Result<GenerateSummary> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let properties = match &args.properties {
        Some(path) => load_properties(path)?,
        None => BuildProperties::new(),
    };
    debug!(fingerprint = %snapshot.fingerprint(), properties = properties.len(), "loaded inputs");

    let config = PipelineConfig::new().with_parallel(args.parallel).with_caching(!args.no_cache);
    let mut pipeline = GeneratorPipeline::new(config, Arc::new(JsonEmitter));
    let mut output = CollectedOutput::new();
    let outcome = pipeline.run(&snapshot, &properties, &mut output, &CancellationToken::new());

    let mut written = Vec::with_capacity(output.sources.len());
    if !output.sources.is_empty() {
        fs::create_dir_all(&args.out).with_context(|| format!("failed to create {}", args.out.display()))?;
    }
    for source in &output.sources {
        let path = args.out.join(format!("{}.json", source.hint_name));
        fs::write(&path, &source.text).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote artifact");
        written.push(path);
    }

    Ok(GenerateSummary {
        outcome,
        written,
        diagnostics: output.diagnostics,
        report: pipeline.report().clone(),
    })
}
