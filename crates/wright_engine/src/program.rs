//! Program entry points.
//!
//! A program is a linear list of declarations against a [`RunContext`].
//! [`run_program`] opens the context, runs the program and, only if every
//! declaration succeeded, registers the exported outputs.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use crate::context::{RunContext, StackSettings};
use crate::engine::ResourceEngine;
use crate::error::EngineResult;

/// A provisioning program.
#[async_trait]
pub trait StackProgram: Send + Sync {
    /// Unique program name.
    fn name(&self) -> &str;

    /// Project the program's stacks belong to. Also the default configuration namespace.
    fn project(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Declare the program's resources and outputs.
    ///
    /// Implementations return the first error unchanged.
    async fn run(&self, ctx: &mut RunContext) -> EngineResult<()>;
}

/// Declared resource as listed in a [`RunSummary`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredResource {
    pub name: String,
    #[serde(rename = "type")]
    pub type_token: String,
    pub urn: String,
}

/// Outcome of a successful program run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: Uuid,
    pub program: String,
    pub project: String,
    pub stack: String,
    pub resources: Vec<DeclaredResource>,
    pub exports: BTreeMap<String, Value>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn duration_ms(&self) -> i64 {
        (self.completed_at - self.started_at).num_milliseconds()
    }

    pub fn export_names(&self) -> Vec<&str> {
        self.exports.keys().map(String::as_str).collect()
    }
}

/// Run a program against an engine.
pub async fn run_program(
    program: &dyn StackProgram,
    engine: Arc<dyn ResourceEngine>,
    settings: StackSettings,
) -> EngineResult<RunSummary> {
    let started_at = Utc::now();
    let mut ctx = RunContext::new(program.project(), settings, engine);

    info!(
        "Running program {} ({}/{}), run {}",
        program.name(),
        ctx.project(),
        ctx.stack(),
        ctx.run_id()
    );

    if let Err(e) = program.run(&mut ctx).await {
        error!("Program {} failed: {}", program.name(), e);
        return Err(e);
    }

    ctx.complete().await?;

    let summary = RunSummary {
        run_id: ctx.run_id(),
        program: program.name().to_string(),
        project: ctx.project().to_string(),
        stack: ctx.stack().to_string(),
        resources: ctx
            .resources()
            .iter()
            .map(|r| DeclaredResource {
                name: r.name().to_string(),
                type_token: r.type_token().to_string(),
                urn: r.urn().to_string(),
            })
            .collect(),
        exports: ctx.exports().clone(),
        started_at,
        completed_at: Utc::now(),
    };

    info!(
        "Program {} declared {} resource(s) and {} output(s)",
        summary.program,
        summary.resources.len(),
        summary.exports.len()
    );
    Ok(summary)
}
