//! CLI command definitions.
//!
//! This module defines the command structure for the stackwright CLI.
//! Each subcommand runs a registered program against a different engine.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use wright_engine::{StackConfig, StackSettings};

pub mod emit;
pub mod list;
pub mod preview;

/// stackwright - typed infrastructure programs for Pulumi stacks
#[derive(Parser)]
#[command(name = "wright")]
#[command(version, about = "stackwright - typed infrastructure programs for Pulumi stacks")]
#[command(long_about = r#"
stackwright declares cloud clusters and the applications running on them as
typed Rust programs, and hands the declarations to an engine.

COMMANDS:
  list     → Show the bundled programs
  preview  → Run a program against the recording engine and print the plan
  emit     → Run a program and write it out as a Pulumi YAML project

CONFIGURATION:
  Values are read from Pulumi.<stack>.yaml in the current directory (or the
  file given with --config-file). --config key=value overrides a value; keys
  without a namespace belong to the program's project.

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Configuration error
  5 - Engine error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "WRIGHT_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the bundled programs
    List(list::ListArgs),

    /// Print the resources a program would declare
    Preview(preview::PreviewArgs),

    /// Write a program out as a Pulumi YAML project
    Emit(emit::EmitArgs),
}

/// Program and stack selection shared by the run commands.
#[derive(Args, Debug, Clone)]
pub struct StackArgs {
    /// Name of the program to run (see `wright list`)
    #[arg(short, long)]
    pub program: String,

    /// Stack to run against
    #[arg(short, long, default_value = "dev", env = "WRIGHT_STACK")]
    pub stack: String,

    /// Stack configuration file [default: Pulumi.<stack>.yaml if present]
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// Configuration override as key=value (repeatable)
    #[arg(short, long = "config", value_name = "KEY=VALUE")]
    pub config: Vec<String>,
}

impl StackArgs {
    /// Resolve stack settings from the working directory.
    pub fn settings(&self, project: &str) -> Result<StackSettings> {
        let current_dir = std::env::current_dir()?;
        self.settings_in(&current_dir, project)
    }

    /// Resolve stack settings, looking for the default configuration file in `dir`.
    pub fn settings_in(&self, dir: &Path, project: &str) -> Result<StackSettings> {
        let mut config = match self.config_path(dir) {
            Some(path) => {
                info!("Using stack configuration {}", path.display());
                StackConfig::from_file(&path).with_context(|| {
                    format!("Failed to load configuration {}", path.display())
                })?
            }
            None => {
                debug!("No configuration file for stack {}", self.stack);
                StackConfig::new()
            }
        };

        for assignment in &self.config {
            config.apply_override(assignment, project)?;
        }

        Ok(StackSettings::new(&self.stack).with_config(config))
    }

    fn config_path(&self, dir: &Path) -> Option<PathBuf> {
        if let Some(path) = &self.config_file {
            return Some(path.clone());
        }

        let default = dir.join(format!("Pulumi.{}.yaml", self.stack));
        default.exists().then_some(default)
    }
}
