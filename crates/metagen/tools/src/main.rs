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

//! Metagen CLI Tool
//!
//! Main entry point for the metagen command-line interface.

use anyhow::Result;
use clap::{Parser, Subcommand};
use metagen_compiler::RunOutcome;
use metagen_tools::{GenerateArgs, ModulesArgs, list_modules, run_generate};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "metagen")]
#[command(about = "Metagen - build-time metadata generator")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the metadata artifact for a snapshot
    Generate(GenerateArgs),
    /// Print the modules examined for a snapshot
    Modules(ModulesArgs),
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match cli.command {
        Commands::Generate(args) => {
            let summary = run_generate(&args)?;
            for diagnostic in &summary.diagnostics {
                eprintln!("{diagnostic}");
            }
            for path in &summary.written {
                println!("{}", path.display());
            }
            if cli.verbose {
                for record in &summary.report.nodes {
                    println!("{:<24} {:<10} {:?}", record.node, record.state, record.duration);
                }
            }
            match summary.outcome {
                RunOutcome::Failed => return Ok(ExitCode::FAILURE),
                RunOutcome::Declined => println!("Emission declined (design-time build)"),
                RunOutcome::Cancelled => println!("Generation cancelled"),
                RunOutcome::Generated => {}
            }
        }
        Commands::Modules(args) => {
            for name in list_modules(&args)? {
                println!("{name}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
