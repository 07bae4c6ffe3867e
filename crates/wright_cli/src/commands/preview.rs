//! Preview command - Print the resources a program would declare.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::info;

use wright_engine::{run_program, Plan, RecordingEngine};
use wright_programs::ProgramRegistry;

use super::StackArgs;

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub stack: StackArgs,

    /// Output format of the plan
    #[arg(short, long, value_enum, default_value_t = PlanFormat::Yaml)]
    pub format: PlanFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    Yaml,
    Json,
}

pub fn render_plan(plan: &Plan, format: PlanFormat) -> Result<String> {
    Ok(match format {
        PlanFormat::Yaml => serde_yaml::to_string(plan)?,
        PlanFormat::Json => serde_json::to_string_pretty(plan)?,
    })
}

pub async fn execute(args: PreviewArgs) -> Result<()> {
    let registry = ProgramRegistry::standard();
    let program = registry.get_required(&args.stack.program)?;
    let settings = args.stack.settings(program.project())?;

    let engine = RecordingEngine::new();
    let summary = run_program(program.as_ref(), Arc::new(engine.clone()), settings)
        .await
        .with_context(|| format!("Program {} failed", program.name()))?;

    info!(
        "Preview of {} on stack {} took {}ms",
        summary.program,
        summary.stack,
        summary.duration_ms()
    );
    print!("{}", render_plan(&engine.plan(), args.format)?);

    Ok(())
}
