//! Emit command - Write a program out as a Pulumi YAML project.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use wright_engine::{run_program, PulumiYamlEngine, PulumiYamlProject, StackProgram, StackSettings};
use wright_programs::ProgramRegistry;

use super::StackArgs;

#[derive(Args)]
pub struct EmitArgs {
    #[command(flatten)]
    pub stack: StackArgs,

    /// Directory to write Pulumi.yaml into
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,
}

/// Run `program` against the YAML engine and write the project into `out`.
pub async fn emit_program(
    program: &dyn StackProgram,
    settings: StackSettings,
    out: &Path,
) -> Result<PathBuf> {
    let engine = PulumiYamlEngine::new(
        PulumiYamlProject::new(program.project()).with_description(program.description()),
    );

    run_program(program, Arc::new(engine.clone()), settings)
        .await
        .with_context(|| format!("Program {} failed", program.name()))?;

    engine
        .write_to(out)
        .with_context(|| format!("Failed to write project into {}", out.display()))
}

pub async fn execute(args: EmitArgs) -> Result<()> {
    let registry = ProgramRegistry::standard();
    let program = registry.get_required(&args.stack.program)?;
    let settings = args.stack.settings(program.project())?;

    let path = emit_program(program.as_ref(), settings, &args.out).await?;

    info!("Emitted {} for stack {}", program.name(), args.stack.stack);
    println!("✅ Wrote {}", path.display());

    Ok(())
}
